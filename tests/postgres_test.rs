//! Integration tests against a live PostgreSQL database
//!
//! Run with `DATABASE_URL` set and `--ignored`.

use rowshape::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, SqlEnum)]
pub enum Fuel {
    #[default]
    Petrol,
    Diesel,
    Electric,
}

#[derive(Debug, Clone, Default, PartialEq, Shape)]
#[table(name = "rowshape_cars")]
pub struct Car {
    #[key]
    pub id: i32,
    pub make: String,
    pub fuel: Fuel,
    #[generated]
    pub date_registered: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Shape)]
#[table(name = "rowshape_items")]
pub struct Item {
    #[key]
    #[generated]
    pub id: i32,
    pub name: String,
}

async fn setup_mapper() -> Mapper<PgPool> {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    Mapper::new(pool)
}

async fn reset_tables(mapper: &mut Mapper<PgPool>) {
    let statements = [
        "DROP TABLE IF EXISTS rowshape_cars",
        "DROP TABLE IF EXISTS rowshape_items",
        "CREATE TABLE rowshape_cars (
            id INTEGER PRIMARY KEY,
            make TEXT NOT NULL,
            fuel TEXT NOT NULL,
            date_registered TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
        "CREATE TABLE rowshape_items (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL
        )",
    ];
    for sql in statements {
        mapper.execute(sql, &()).await.expect("Failed to reset tables");
    }
}

fn car(id: i32, make: &str) -> Car {
    Car {
        id,
        make: make.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_upsert_insert_then_update() {
    let mut mapper = setup_mapper().await;
    reset_tables(&mut mapper).await;

    let first = mapper.upsert_objects(&[car(1, "Volvo")]).await.unwrap();
    let second = mapper.upsert_objects(&[car(1, "Saab")]).await.unwrap();

    assert_eq!(first, vec![true]);
    assert_eq!(second, vec![false]);

    let stored: Car = mapper.get(&[&1]).await.unwrap().unwrap();
    assert_eq!(stored.make, "Saab");
    assert!(stored.date_registered.is_some());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_if_missing_skips_existing() {
    let mut mapper = setup_mapper().await;
    reset_tables(&mut mapper).await;

    let existing: Vec<Car> = (0..25).map(|id| car(id, "Volvo")).collect();
    assert_eq!(mapper.insert_objects(&existing).await.unwrap(), 25);

    let all: Vec<Car> = (0..100).map(|id| car(id, "Saab")).collect();
    let inserted = mapper
        .insert_if_missing("rowshape_cars", &all, &["id"])
        .await
        .unwrap();

    assert_eq!(inserted, 75);
    let volvos: i64 = mapper
        .scalar(
            "SELECT count(*) FROM rowshape_cars WHERE make=@make",
            &Parameters::new().with("make", "Volvo"),
        )
        .await
        .unwrap();
    assert_eq!(volvos, 25);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_enum_round_trip() {
    let mut mapper = setup_mapper().await;
    reset_tables(&mut mapper).await;

    let mut tesla = car(7, "Tesla");
    tesla.fuel = Fuel::Electric;
    mapper.insert_object(&mut tesla).await.unwrap();

    let stored: String = mapper
        .scalar("SELECT fuel FROM rowshape_cars WHERE id=@id", &tesla)
        .await
        .unwrap();
    assert_eq!(stored, "Electric");

    let loaded: Car = mapper.get(&[&7]).await.unwrap().unwrap();
    assert_eq!(loaded.fuel, Fuel::Electric);
    assert_eq!(loaded.date_registered, tesla.date_registered);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_object_reads_serial_key() {
    let mut mapper = setup_mapper().await;
    reset_tables(&mut mapper).await;

    let mut first = Item {
        name: "lamp".to_string(),
        ..Default::default()
    };
    let mut second = Item {
        name: "desk".to_string(),
        ..Default::default()
    };
    mapper.insert_object(&mut first).await.unwrap();
    mapper.insert_object(&mut second).await.unwrap();

    assert!(first.id > 0);
    assert_eq!(second.id, first.id + 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_transaction_rollback() {
    let mut mapper = setup_mapper().await;
    reset_tables(&mut mapper).await;

    let mut transaction = mapper.begin().await.unwrap();
    transaction.insert_objects(&[car(1, "Volvo")]).await.unwrap();
    transaction.rollback().await.unwrap();

    let count: i64 = mapper
        .scalar("SELECT count(*) FROM rowshape_cars", &())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_numeric_columns_decode_as_decimal() {
    let mut mapper = setup_mapper().await;

    let rows: Vec<Vec<SqlValue>> = mapper
        .query_array("SELECT 7::numeric AS price, 12.50::numeric(6,2) AS rate, NULL::numeric AS unset", &())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![vec![
            SqlValue::Numeric(Decimal::from(7)),
            SqlValue::Numeric(Decimal::new(1250, 2)),
            SqlValue::Null(SqlType::Numeric),
        ]]
    );

    let doubled: Decimal = mapper
        .scalar(
            "SELECT @price * 2",
            &Parameters::new().with("price", Decimal::new(1999, 2)),
        )
        .await
        .unwrap();
    assert_eq!(doubled, Decimal::new(3998, 2));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unmapped_type_is_a_decode_error() {
    let mut mapper = setup_mapper().await;

    let result: Result<Vec<Vec<SqlValue>>, ShapeError> = mapper
        .query_array("SELECT interval '1 day' AS span", &())
        .try_collect()
        .await;

    assert!(matches!(result, Err(ShapeError::Database(_))));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_scalar_without_columns_is_empty_result() {
    let mut mapper = setup_mapper().await;

    let result = mapper.scalar::<i32, _>("SELECT", &()).await;

    assert!(matches!(result, Err(ShapeError::EmptyResult)));
}
