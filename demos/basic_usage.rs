//! Basic rowshape usage
//!
//! Expects a `rowshape.toml` (or `ROWSHAPE_CONFIG`) pointing at a PostgreSQL
//! database. Run with `cargo run --example basic_usage`.

use rowshape::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, SqlEnum)]
pub enum Fuel {
    #[default]
    Petrol,
    Electric,
}

#[derive(Debug, Clone, Default, Shape)]
#[table(name = "demo_cars")]
pub struct Car {
    #[key]
    pub id: i32,
    pub make: String,
    pub fuel: Fuel,
    #[generated]
    pub date_registered: Option<DateTime<Utc>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut mapper = Mapper::connect(&config).await?;

    mapper
        .execute(
            "CREATE TABLE IF NOT EXISTS demo_cars (
                id INTEGER PRIMARY KEY,
                make TEXT NOT NULL,
                fuel TEXT NOT NULL,
                date_registered TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            &(),
        )
        .await?;

    let mut volvo = Car {
        id: 1,
        make: "Volvo".to_string(),
        ..Default::default()
    };
    mapper.insert_object(&mut volvo).await?;
    println!("Inserted {} at {:?}", volvo.make, volvo.date_registered);

    let fleet = vec![
        Car {
            id: 1,
            make: "Volvo".to_string(),
            fuel: Fuel::Electric,
            ..Default::default()
        },
        Car {
            id: 2,
            make: "Saab".to_string(),
            ..Default::default()
        },
    ];
    let outcomes = mapper.upsert_objects(&fleet).await?;
    println!("Upsert outcomes (true = inserted): {:?}", outcomes);

    let mut cars = mapper.query::<Car, _>(
        "SELECT * FROM demo_cars WHERE fuel=@fuel",
        &Parameters::new().with("fuel", Fuel::Electric),
    );
    while let Some(car) = cars.try_next().await? {
        println!("Electric: {:?}", car);
    }
    drop(cars);

    let removed = mapper.delete_object(&fleet[1]).await?;
    println!("Removed {} row(s)", removed);

    Ok(())
}
