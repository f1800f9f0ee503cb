use catalog_core::db::open_db_in_memory;
use catalog_core::{
    AddCatalogItemDto, AddRawProductDto, AddVarietyDto, CancellationToken, CatalogItemService,
    RawProductId, RawProductService, ServiceError, ServiceErrorKind, SqliteCatalogItemRepository,
    SqliteRawProductRepository, SqliteVarietyRepository, UpdateRawProductDto, VarietyService,
};
use rusqlite::Connection;
use uuid::Uuid;

fn raw_products(conn: &Connection) -> RawProductService<SqliteRawProductRepository<'_>> {
    RawProductService::new(SqliteRawProductRepository::try_new(conn).unwrap())
}

fn add_dto(name: &str, short_code: &str) -> AddRawProductDto {
    AddRawProductDto {
        name: name.to_string(),
        short_code: short_code.to_string(),
        description: None,
    }
}

fn add_variety(conn: &Connection, raw_product_id: RawProductId, short_code: &str) {
    let service = VarietyService::new(SqliteVarietyRepository::try_new(conn).unwrap());
    service
        .add(
            &AddVarietyDto {
                name: format!("Variety {short_code}"),
                short_code: short_code.to_string(),
                description: None,
                raw_product_id,
            },
            &CancellationToken::new(),
        )
        .unwrap();
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn add_then_get_by_id_roundtrips_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    let request = AddRawProductDto {
        name: "Apple".to_string(),
        short_code: "APL".to_string(),
        description: Some("Pome fruit".to_string()),
    };
    let id = service.add(&request, &cancel).unwrap();

    let loaded = service.get_by_id(id, &cancel).unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name, request.name);
    assert_eq!(loaded.short_code, request.short_code);
    assert_eq!(loaded.description, request.description);

    let by_code = service.get_by_code("APL", &cancel).unwrap();
    assert_eq!(by_code, loaded);
}

#[test]
fn duplicate_short_code_is_rejected_without_write() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    let err = service
        .add(&add_dto("Another apple", "APL"), &cancel)
        .unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::DuplicateKey);
    assert_eq!(err.to_string(), "ShortCode is already in use.");
    assert_eq!(count_rows(&conn, "raw_products"), 1);
}

#[test]
fn short_code_comparison_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    service.add(&add_dto("Apple lower", "apl"), &cancel).unwrap();

    assert!(matches!(
        service.get_by_code("Apl", &cancel),
        Err(ServiceError::NotFound(_))
    ));
    assert_eq!(count_rows(&conn, "raw_products"), 2);
}

#[test]
fn invalid_request_fails_validation_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);

    let err = service
        .add(&add_dto("", "TOO-LONG-CODE"), &CancellationToken::new())
        .unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::ValidationFailed);
    assert_eq!(
        err.to_string(),
        "Validation failed: Name is required.; ShortCode cannot exceed 10 characters."
    );
    assert_eq!(count_rows(&conn, "raw_products"), 0);
}

#[test]
fn get_by_id_on_missing_row_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);

    let err = service
        .get_by_id(Uuid::new_v4(), &CancellationToken::new())
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    assert_eq!(err.to_string(), "RawProduct not found.");
}

#[test]
fn get_all_on_empty_catalog_is_empty_success() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);

    let items = service.get_all(&CancellationToken::new()).unwrap();
    assert!(items.is_empty());
}

#[test]
fn get_all_is_ordered_by_short_code() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto("Pear", "PER"), &cancel).unwrap();
    service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    service.add(&add_dto("Cherry", "CHR"), &cancel).unwrap();

    let codes: Vec<String> = service
        .get_all(&cancel)
        .unwrap()
        .into_iter()
        .map(|item| item.short_code)
        .collect();
    assert_eq!(codes, ["APL", "CHR", "PER"]);
}

#[test]
fn update_to_own_short_code_is_not_a_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    let id = service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    service
        .update(
            &UpdateRawProductDto {
                id,
                name: "Green apple".to_string(),
                short_code: "APL".to_string(),
                description: Some("sour".to_string()),
            },
            &cancel,
        )
        .unwrap();

    let loaded = service.get_by_id(id, &cancel).unwrap();
    assert_eq!(loaded.name, "Green apple");
    assert_eq!(loaded.description.as_deref(), Some("sour"));
}

#[test]
fn update_to_short_code_of_other_row_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    let pear_id = service.add(&add_dto("Pear", "PER"), &cancel).unwrap();

    let err = service
        .update(
            &UpdateRawProductDto {
                id: pear_id,
                name: "Pear".to_string(),
                short_code: "APL".to_string(),
                description: None,
            },
            &cancel,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::DuplicateKey);
    assert_eq!(service.get_by_id(pear_id, &cancel).unwrap().short_code, "PER");
}

#[test]
fn update_missing_row_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);

    let err = service
        .update(
            &UpdateRawProductDto {
                id: Uuid::new_v4(),
                name: "Ghost".to_string(),
                short_code: "GST".to_string(),
                description: None,
            },
            &CancellationToken::new(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
}

#[test]
fn aggregate_read_without_varieties_is_empty_success() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    let id = service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    let aggregate = service.get_with_varieties_by_id(id, &cancel).unwrap();

    assert_eq!(aggregate.id, id);
    assert!(aggregate.varieties.is_empty());
}

#[test]
fn aggregate_read_includes_only_own_varieties_with_parent_name() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    let apple = service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    let pear = service.add(&add_dto("Pear", "PER"), &cancel).unwrap();
    add_variety(&conn, apple, "GAL");
    add_variety(&conn, apple, "FUJ");
    add_variety(&conn, pear, "WIL");

    let aggregate = service.get_with_varieties_by_code("APL", &cancel).unwrap();
    let codes: Vec<&str> = aggregate
        .varieties
        .iter()
        .map(|variety| variety.short_code.as_str())
        .collect();
    assert_eq!(codes, ["FUJ", "GAL"]);
    assert!(aggregate
        .varieties
        .iter()
        .all(|variety| variety.raw_product_name == "Apple" && variety.raw_product_id == apple));
}

#[test]
fn aggregate_read_on_missing_parent_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);

    let err = service
        .get_with_varieties_by_code("NOPE", &CancellationToken::new())
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
}

#[test]
fn delete_removes_unreferenced_raw_product() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    let id = service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    service.delete_by_id(id, &cancel).unwrap();

    assert_eq!(
        service.get_by_id(id, &cancel).unwrap_err().kind(),
        ServiceErrorKind::NotFound
    );
    assert_eq!(
        service.delete_by_id(id, &cancel).unwrap_err().kind(),
        ServiceErrorKind::NotFound
    );
}

#[test]
fn delete_is_restricted_while_dependents_exist() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    let apple = service.add(&add_dto("Apple", "APL"), &cancel).unwrap();
    add_variety(&conn, apple, "GAL");
    let items = CatalogItemService::new(SqliteCatalogItemRepository::try_new(&conn).unwrap());
    let item_id = items
        .add(
            &AddCatalogItemDto {
                name: "Apple crate".to_string(),
                short_code: "APC".to_string(),
                description: None,
                ean: None,
                total_weight: 10.0,
                raw_product_id: apple,
            },
            &cancel,
        )
        .unwrap();

    let err = service.delete_by_id(apple, &cancel).unwrap_err();
    match &err {
        ServiceError::HasDependents(dependents) => {
            assert_eq!(dependents.varieties, 1);
            assert_eq!(dependents.catalog_items, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "RawProduct is still referenced by 1 varieties and 1 catalog items."
    );
    assert_eq!(count_rows(&conn, "raw_products"), 1);

    items.delete_by_id(item_id, &cancel).unwrap();
    conn.execute("DELETE FROM varieties;", []).unwrap();
    service.delete_by_id(apple, &cancel).unwrap();
    assert_eq!(count_rows(&conn, "raw_products"), 0);
}

#[test]
fn cancelled_token_stops_add_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = service.add(&add_dto("Apple", "APL"), &cancel).unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Cancelled);
    assert_eq!(err.to_string(), "The operation was cancelled.");
    assert_eq!(count_rows(&conn, "raw_products"), 0);
}

#[test]
fn cancelled_token_wins_over_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = service.get_by_id(Uuid::new_v4(), &cancel).unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Cancelled);
}

#[test]
fn unique_index_backstops_a_lost_race() {
    let conn = open_db_in_memory().unwrap();
    let service = raw_products(&conn);
    let cancel = CancellationToken::new();

    // Simulates a concurrent writer committing between check and insert.
    conn.execute_batch(
        "CREATE TEMP TRIGGER race_writer BEFORE INSERT ON raw_products
         WHEN NEW.name = 'Racer'
         BEGIN
             INSERT INTO raw_products (id, name, short_code, description)
             VALUES ('00000000-0000-4000-8000-0000000000aa', 'Other', NEW.short_code, NULL);
         END;",
    )
    .unwrap();

    let err = service.add(&add_dto("Racer", "RCE"), &cancel).unwrap_err();
    assert_eq!(err.to_string(), "Database update error.");
    match err {
        ServiceError::StoreUpdate(source) => assert!(source.is_constraint_violation()),
        other => panic!("unexpected error: {other}"),
    }
}
