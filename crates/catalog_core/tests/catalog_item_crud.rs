use catalog_core::db::open_db_in_memory;
use catalog_core::{
    AddCatalogItemDto, AddRawProductDto, CancellationToken, CatalogItemService, RawProductId,
    RawProductService, ServiceError, ServiceErrorKind, SqliteCatalogItemRepository,
    SqliteRawProductRepository, UpdateCatalogItemDto,
};
use rusqlite::Connection;
use uuid::Uuid;

fn catalog_items(conn: &Connection) -> CatalogItemService<SqliteCatalogItemRepository<'_>> {
    CatalogItemService::new(SqliteCatalogItemRepository::try_new(conn).unwrap())
}

fn seed_raw_product(conn: &Connection, name: &str, short_code: &str) -> RawProductId {
    RawProductService::new(SqliteRawProductRepository::try_new(conn).unwrap())
        .add(
            &AddRawProductDto {
                name: name.to_string(),
                short_code: short_code.to_string(),
                description: None,
            },
            &CancellationToken::new(),
        )
        .unwrap()
}

fn add_dto(raw_product_id: RawProductId, short_code: &str, total_weight: f64) -> AddCatalogItemDto {
    AddCatalogItemDto {
        name: format!("Item {short_code}"),
        short_code: short_code.to_string(),
        description: None,
        ean: None,
        total_weight,
        raw_product_id,
    }
}

fn item_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM catalog_items;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_then_get_roundtrips_fields() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    let request = AddCatalogItemDto {
        name: "Apple box 5kg".to_string(),
        short_code: "APB5".to_string(),
        description: Some("Mixed sizes".to_string()),
        ean: Some("8001234567890".to_string()),
        total_weight: 5.25,
        raw_product_id: apple,
    };
    let id = service.add(&request, &cancel).unwrap();

    let loaded = service.get_by_id(id, &cancel).unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name, request.name);
    assert_eq!(loaded.short_code, request.short_code);
    assert_eq!(loaded.description, request.description);
    assert_eq!(loaded.ean, request.ean);
    assert_eq!(loaded.total_weight, 5.25);
    assert_eq!(loaded.raw_product_id, apple);
    assert_eq!(loaded.raw_product_name, "Apple");

    assert_eq!(service.get_by_code("APB5", &cancel).unwrap(), loaded);
}

#[test]
fn non_positive_weight_fails_validation_before_duplicate_check() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto(apple, "APB", 1.0), &cancel).unwrap();

    for weight in [0.0, -2.5] {
        let err = service
            .add(&add_dto(apple, "APB", weight), &cancel)
            .unwrap_err();
        match err {
            ServiceError::ValidationFailed(validation) => {
                assert_eq!(
                    validation.messages(),
                    ["Total weight must be greater than zero."]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn short_code_is_unique_across_raw_products() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let pear = seed_raw_product(&conn, "Pear", "PER");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto(apple, "BOX", 3.0), &cancel).unwrap();
    let err = service.add(&add_dto(pear, "BOX", 3.0), &cancel).unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::DuplicateKey);
    assert_eq!(err.to_string(), "ShortCode is already in use.");
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn unknown_raw_product_is_a_store_update_error() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_items(&conn);

    let err = service
        .add(&add_dto(Uuid::new_v4(), "ORP", 1.0), &CancellationToken::new())
        .unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::StoreUpdateError);
    assert!(!err.kind().is_caller_error());
    assert_eq!(item_count(&conn), 0);
}

#[test]
fn get_by_raw_product_id_filters_items() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let pear = seed_raw_product(&conn, "Pear", "PER");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto(apple, "APB", 1.0), &cancel).unwrap();
    service.add(&add_dto(apple, "APA", 2.0), &cancel).unwrap();
    service.add(&add_dto(pear, "PEB", 3.0), &cancel).unwrap();

    let codes: Vec<String> = service
        .get_by_raw_product_id(apple, &cancel)
        .unwrap()
        .into_iter()
        .map(|item| item.short_code)
        .collect();
    assert_eq!(codes, ["APA", "APB"]);

    let all: Vec<String> = service
        .get_all(&cancel)
        .unwrap()
        .into_iter()
        .map(|item| item.short_code)
        .collect();
    assert_eq!(all, ["APA", "APB", "PEB"]);
}

#[test]
fn update_changes_fields_and_may_move_parent() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let pear = seed_raw_product(&conn, "Pear", "PER");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    let id = service.add(&add_dto(apple, "BOX", 1.0), &cancel).unwrap();
    service
        .update(
            &UpdateCatalogItemDto {
                id,
                name: "Pear box".to_string(),
                short_code: "BOX".to_string(),
                description: None,
                ean: Some("1234567890123".to_string()),
                total_weight: 7.5,
                raw_product_id: pear,
            },
            &cancel,
        )
        .unwrap();

    let loaded = service.get_by_id(id, &cancel).unwrap();
    assert_eq!(loaded.name, "Pear box");
    assert_eq!(loaded.total_weight, 7.5);
    assert_eq!(loaded.ean.as_deref(), Some("1234567890123"));
    assert_eq!(loaded.raw_product_name, "Pear");
}

#[test]
fn update_to_taken_short_code_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto(apple, "ONE", 1.0), &cancel).unwrap();
    let two = service.add(&add_dto(apple, "TWO", 2.0), &cancel).unwrap();

    let err = service
        .update(
            &UpdateCatalogItemDto {
                id: two,
                name: "Item TWO".to_string(),
                short_code: "ONE".to_string(),
                description: None,
                ean: None,
                total_weight: 2.0,
                raw_product_id: apple,
            },
            &cancel,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::DuplicateKey);
    assert_eq!(service.get_by_id(two, &cancel).unwrap().short_code, "TWO");
}

#[test]
fn delete_then_get_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    let id = service.add(&add_dto(apple, "BOX", 1.0), &cancel).unwrap();
    service.delete_by_id(id, &cancel).unwrap();

    let err = service.get_by_id(id, &cancel).unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    assert_eq!(err.to_string(), "CatalogItem not found.");
    assert_eq!(
        service.delete_by_id(id, &cancel).unwrap_err().kind(),
        ServiceErrorKind::NotFound
    );
}

#[test]
fn cancelled_token_stops_delete() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let service = catalog_items(&conn);
    let id = service
        .add(&add_dto(apple, "BOX", 1.0), &CancellationToken::new())
        .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = service.delete_by_id(id, &cancel).unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::Cancelled);
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn get_by_code_on_missing_code_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let service = catalog_items(&conn);
    let cancel = CancellationToken::new();

    service.add(&add_dto(apple, "BOX", 1.0), &cancel).unwrap();

    let err = service.get_by_code("CRATE", &cancel).unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);
    assert_eq!(err.to_string(), "CatalogItem not found.");
}

#[test]
fn infinite_weight_is_rejected_without_write() {
    let conn = open_db_in_memory().unwrap();
    let apple = seed_raw_product(&conn, "Apple", "APL");
    let service = catalog_items(&conn);

    let err = service
        .add(&add_dto(apple, "BOX", f64::INFINITY), &CancellationToken::new())
        .unwrap_err();

    assert_eq!(err.kind(), ServiceErrorKind::ValidationFailed);
    assert_eq!(item_count(&conn), 0);
}
