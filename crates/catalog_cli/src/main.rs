//! Command-line host for the catalog services.
//!
//! # Responsibility
//! - Map subcommands onto `catalog_core` service operations.
//! - Print one JSON document per invocation on stdout.
//!
//! # Invariants
//! - Success prints `{"ok":true,"data":...}` and exits 0.
//! - Failure prints `{"ok":false,"kind":...,"message":...}` and exits non-zero.

use catalog_core::db::DbError;
use catalog_core::{
    init_logging_from_config, AddCatalogItemDto, AddRawProductDto, AddVarietyDto,
    CancellationToken, CatalogConfig, CatalogItemService, ConfigError, RawProductService,
    RepoError, ServiceError, SqliteCatalogItemRepository, SqliteRawProductRepository,
    SqliteVarietyRepository, UpdateCatalogItemDto, UpdateRawProductDto, UpdateVarietyDto,
    VarietyService,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Manage raw products, varieties and catalog items")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file; overrides `database.path`
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level; overrides `logging.level`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory; overrides `logging.dir`
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Raw product operations
    RawProduct {
        #[command(subcommand)]
        action: RawProductCommand,
    },
    /// Variety operations
    Variety {
        #[command(subcommand)]
        action: VarietyCommand,
    },
    /// Catalog item operations
    CatalogItem {
        #[command(subcommand)]
        action: CatalogItemCommand,
    },
}

#[derive(Subcommand)]
enum RawProductCommand {
    /// List all raw products
    List,
    /// Show one raw product by id
    Get { id: Uuid },
    /// Show one raw product by short code
    GetByCode { short_code: String },
    /// Show a raw product by id together with its varieties
    WithVarieties { id: Uuid },
    /// Show a raw product by short code together with its varieties
    WithVarietiesByCode { short_code: String },
    /// Create a raw product
    Add(RawProductFields),
    /// Overwrite a raw product
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: RawProductFields,
    },
    /// Delete a raw product without dependents
    Delete { id: Uuid },
}

#[derive(Args)]
struct RawProductFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    short_code: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum VarietyCommand {
    /// List varieties, optionally of one raw product
    List {
        #[arg(long)]
        raw_product_id: Option<Uuid>,
    },
    /// Show one variety by id
    Get { id: Uuid },
    /// Show one variety by short code within a raw product
    GetByCode {
        short_code: String,
        #[arg(long)]
        raw_product_id: Uuid,
    },
    /// Create a variety
    Add(VarietyFields),
    /// Overwrite a variety
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: VarietyFields,
    },
    /// Delete a variety
    Delete { id: Uuid },
}

#[derive(Args)]
struct VarietyFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    short_code: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    raw_product_id: Uuid,
}

#[derive(Subcommand)]
enum CatalogItemCommand {
    /// List catalog items, optionally of one raw product
    List {
        #[arg(long)]
        raw_product_id: Option<Uuid>,
    },
    /// Show one catalog item by id
    Get { id: Uuid },
    /// Show one catalog item by short code
    GetByCode { short_code: String },
    /// Create a catalog item
    Add(CatalogItemFields),
    /// Overwrite a catalog item
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: CatalogItemFields,
    },
    /// Delete a catalog item
    Delete { id: Uuid },
}

#[derive(Args)]
struct CatalogItemFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    short_code: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    ean: Option<String>,
    #[arg(long)]
    total_weight: f64,
    #[arg(long)]
    raw_product_id: Uuid,
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    Service(ServiceError),
    Output(serde_json::Error),
}

impl CliError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Logging(_) => "logging_error",
            Self::Db(_) | Self::Repo(_) => "database_error",
            Self::Service(err) => err.kind().as_str(),
            Self::Output(_) => "output_error",
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "{message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to encode output: {err}"),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

#[derive(Serialize)]
struct Success {
    ok: bool,
    data: serde_json::Value,
}

#[derive(Serialize)]
struct Failure<'a> {
    ok: bool,
    kind: &'a str,
    message: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(data) => {
            print_json(&Success { ok: true, data });
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_json(&Failure {
                ok: false,
                kind: err.kind(),
                message: err.to_string(),
            });
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to encode output: {err}"),
    }
}

fn run(cli: Cli) -> Result<serde_json::Value, CliError> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::from_file(path)?,
        None => CatalogConfig::default(),
    };
    if cli.db.is_some() {
        config.database.path = cli.db;
    }
    if cli.log_level.is_some() {
        config.logging.level = cli.log_level;
    }
    if cli.log_dir.is_some() {
        config.logging.dir = cli.log_dir;
    }

    init_logging_from_config(&config.logging).map_err(CliError::Logging)?;
    let conn = config.open_database()?;
    let cancel = CancellationToken::new();

    match cli.command {
        Command::RawProduct { action } => run_raw_product(&conn, action, &cancel),
        Command::Variety { action } => run_variety(&conn, action, &cancel),
        Command::CatalogItem { action } => run_catalog_item(&conn, action, &cancel),
    }
}

fn run_raw_product(
    conn: &Connection,
    action: RawProductCommand,
    cancel: &CancellationToken,
) -> Result<serde_json::Value, CliError> {
    let service = RawProductService::new(SqliteRawProductRepository::try_new(conn)?);
    let data = match action {
        RawProductCommand::List => serde_json::to_value(service.get_all(cancel)?)?,
        RawProductCommand::Get { id } => serde_json::to_value(service.get_by_id(id, cancel)?)?,
        RawProductCommand::GetByCode { short_code } => {
            serde_json::to_value(service.get_by_code(&short_code, cancel)?)?
        }
        RawProductCommand::WithVarieties { id } => {
            serde_json::to_value(service.get_with_varieties_by_id(id, cancel)?)?
        }
        RawProductCommand::WithVarietiesByCode { short_code } => {
            serde_json::to_value(service.get_with_varieties_by_code(&short_code, cancel)?)?
        }
        RawProductCommand::Add(fields) => {
            let id = service.add(
                &AddRawProductDto {
                    name: fields.name,
                    short_code: fields.short_code,
                    description: fields.description,
                },
                cancel,
            )?;
            info!("event=cli_command module=cli status=ok command=raw_product_add id={id}");
            serde_json::json!({ "id": id })
        }
        RawProductCommand::Update { id, fields } => {
            service.update(
                &UpdateRawProductDto {
                    id,
                    name: fields.name,
                    short_code: fields.short_code,
                    description: fields.description,
                },
                cancel,
            )?;
            serde_json::json!({ "id": id })
        }
        RawProductCommand::Delete { id } => {
            service.delete_by_id(id, cancel)?;
            serde_json::json!({ "id": id })
        }
    };
    Ok(data)
}

fn run_variety(
    conn: &Connection,
    action: VarietyCommand,
    cancel: &CancellationToken,
) -> Result<serde_json::Value, CliError> {
    let service = VarietyService::new(SqliteVarietyRepository::try_new(conn)?);
    let data = match action {
        VarietyCommand::List { raw_product_id } => {
            let varieties = match raw_product_id {
                Some(raw_product_id) => service.get_by_raw_product_id(raw_product_id, cancel)?,
                None => service.get_all(cancel)?,
            };
            serde_json::to_value(varieties)?
        }
        VarietyCommand::Get { id } => serde_json::to_value(service.get_by_id(id, cancel)?)?,
        VarietyCommand::GetByCode {
            short_code,
            raw_product_id,
        } => serde_json::to_value(service.get_by_code(&short_code, raw_product_id, cancel)?)?,
        VarietyCommand::Add(fields) => {
            let id = service.add(
                &AddVarietyDto {
                    name: fields.name,
                    short_code: fields.short_code,
                    description: fields.description,
                    raw_product_id: fields.raw_product_id,
                },
                cancel,
            )?;
            info!("event=cli_command module=cli status=ok command=variety_add id={id}");
            serde_json::json!({ "id": id })
        }
        VarietyCommand::Update { id, fields } => {
            service.update(
                &UpdateVarietyDto {
                    id,
                    name: fields.name,
                    short_code: fields.short_code,
                    description: fields.description,
                    raw_product_id: fields.raw_product_id,
                },
                cancel,
            )?;
            serde_json::json!({ "id": id })
        }
        VarietyCommand::Delete { id } => {
            service.delete_by_id(id, cancel)?;
            serde_json::json!({ "id": id })
        }
    };
    Ok(data)
}

fn run_catalog_item(
    conn: &Connection,
    action: CatalogItemCommand,
    cancel: &CancellationToken,
) -> Result<serde_json::Value, CliError> {
    let service = CatalogItemService::new(SqliteCatalogItemRepository::try_new(conn)?);
    let data = match action {
        CatalogItemCommand::List { raw_product_id } => {
            let items = match raw_product_id {
                Some(raw_product_id) => service.get_by_raw_product_id(raw_product_id, cancel)?,
                None => service.get_all(cancel)?,
            };
            serde_json::to_value(items)?
        }
        CatalogItemCommand::Get { id } => serde_json::to_value(service.get_by_id(id, cancel)?)?,
        CatalogItemCommand::GetByCode { short_code } => {
            serde_json::to_value(service.get_by_code(&short_code, cancel)?)?
        }
        CatalogItemCommand::Add(fields) => {
            let id = service.add(
                &AddCatalogItemDto {
                    name: fields.name,
                    short_code: fields.short_code,
                    description: fields.description,
                    ean: fields.ean,
                    total_weight: fields.total_weight,
                    raw_product_id: fields.raw_product_id,
                },
                cancel,
            )?;
            info!("event=cli_command module=cli status=ok command=catalog_item_add id={id}");
            serde_json::json!({ "id": id })
        }
        CatalogItemCommand::Update { id, fields } => {
            service.update(
                &UpdateCatalogItemDto {
                    id,
                    name: fields.name,
                    short_code: fields.short_code,
                    description: fields.description,
                    ean: fields.ean,
                    total_weight: fields.total_weight,
                    raw_product_id: fields.raw_product_id,
                },
                cancel,
            )?;
            serde_json::json!({ "id": id })
        }
        CatalogItemCommand::Delete { id } => {
            service.delete_by_id(id, cancel)?;
            serde_json::json!({ "id": id })
        }
    };
    Ok(data)
}
