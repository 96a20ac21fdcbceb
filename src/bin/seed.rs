use std::str::FromStr;

use product_catalog::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    repository::{NewProduct, ProductRepository},
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure the schema exists.
    run_migrations(&orm).await?;

    let repository = ProductRepository::new(orm);
    let existing: Vec<String> = repository
        .list_all()
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();

    let products = [
        ("Laptop", "14-inch ultrabook, 16 GB RAM", "999.99", 10),
        ("Mechanical Keyboard", "Tenkeyless, brown switches", "89.50", 25),
        ("USB-C Hub", "7-in-1 with HDMI and card reader", "34.00", 40),
        ("Desk Lamp", "", "19.99", 0),
    ];

    let mut inserted = 0;
    for (name, description, price, quantity) in products {
        // Names are not unique in the schema, so skip what an earlier run added.
        if existing.iter().any(|n| n == name) {
            continue;
        }
        repository
            .create(NewProduct {
                name: name.to_string(),
                description: (!description.is_empty()).then(|| description.to_string()),
                price: Decimal::from_str(price)?,
                quantity,
                image_url: None,
            })
            .await?;
        inserted += 1;
    }

    println!("Seeded {inserted} products");
    Ok(())
}
