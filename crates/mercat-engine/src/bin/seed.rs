//! # Seed Data Generator
//!
//! Populates a local store with demo marketplace data for development.
//!
//! ## Usage
//! ```bash
//! # Seed into ./data (default)
//! cargo run -p mercat-engine --bin seed
//!
//! # Seed into a custom data dir
//! cargo run -p mercat-engine --bin seed -- --data-dir ./demo-data
//! ```
//!
//! Seeds products across all three tax categories and shops across all
//! three business models, then lists a few products in each catalogue
//! through the same registry operations the engine uses. Skips seeding
//! when the products document already has entries.

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use mercat_engine::listings::expand_catalogue;
use mercat_engine::{ProductRegistry, ShopRegistry};
use mercat_store::{Backend, LocalStore};

/// name, brand, mrp, category tag, average rating (REDUCED only)
const PRODUCTS: &[(&str, &str, f64, &str, f64)] = &[
    ("Olive Oil", "Borges", 12.5, "REDUCED", 4.2),
    ("Table Wine", "Celler Nou", 8.0, "REDUCED", 3.1),
    ("Bread", "El Molí", 2.0, "SUPER_REDUCED", 0.0),
    ("Cured Ham", "Casa Riera", 320.0, "SUPER_REDUCED", 0.0),
    ("Television", "Acme", 600.0, "GENERAL", 0.0),
    ("Headphones", "Acme", 90.0, "GENERAL", 0.0),
];

/// name, description, founding year, model tag, loyalty threshold,
/// sponsor brand
const SHOPS: &[(&str, &str, i32, &str, f64, Option<&str>)] = &[
    (
        "Can Petra",
        "A corner store with a bit of everything",
        1987,
        "LOYALTY",
        250.0,
        None,
    ),
    (
        "Mercat Vell",
        "The old market hall",
        1874,
        "SPONSORED",
        0.0,
        Some("Acme"),
    ),
    (
        "Botiga Nova",
        "No frills, no discounts",
        2015,
        "MAX_PROFIT",
        0.0,
        None,
    ),
];

/// shop, product, listed price
const LISTINGS: &[(&str, &str, f64)] = &[
    ("Can Petra", "Olive Oil", 11.0),
    ("Can Petra", "Bread", 1.8),
    ("Can Petra", "Cured Ham", 290.0),
    ("Mercat Vell", "Television", 550.0),
    ("Mercat Vell", "Headphones", 85.0),
    ("Mercat Vell", "Olive Oil", 12.0),
    ("Botiga Nova", "Table Wine", 7.5),
    ("Botiga Nova", "Bread", 2.0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut data_dir = PathBuf::from("./data");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data-dir" | "-d" => {
                if i + 1 < args.len() {
                    data_dir = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mercat Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --data-dir <PATH>  Data directory (default: ./data)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mercat Seed Data Generator");
    println!("==========================");
    println!("Data dir: {}", data_dir.display());
    println!();

    let store = LocalStore::new(&data_dir);

    // Bootstrap the products document so the registry can open, then
    // check for existing data to keep the seed idempotent.
    if !store.products_path().exists() {
        store.save_products(&[]).await?;
    }

    let mut products = ProductRegistry::open(Backend::local_only(store.clone())).await?;
    let existing = products.list().await?;
    if !existing.is_empty() {
        println!("Store already has {} products", existing.len());
        println!("Skipping seed to avoid duplicates.");
        println!("Delete the data directory to regenerate.");
        return Ok(());
    }

    let mut shops = ShopRegistry::open(Backend::local_only(store)).await?;

    println!("Seeding products...");
    for (name, brand, mrp, category, rating) in PRODUCTS {
        products.create(name, brand, *mrp, category, *rating).await?;
        println!("  + \"{}\" by \"{}\" [{}]", name, brand, category);
    }

    println!();
    println!("Seeding shops...");
    for (name, description, since, model, threshold, sponsor) in SHOPS {
        shops
            .create(name, description, *since, model, *threshold, *sponsor)
            .await?;
        println!("  + \"{}\" since {} [{}]", name, since, model);
    }

    println!();
    println!("Expanding catalogues...");
    for (shop, product, price) in LISTINGS {
        expand_catalogue(&products, &mut shops, shop, product, *price).await?;
        println!("  + \"{}\" at \"{}\" for {:.2}", product, shop, price);
    }

    println!();
    println!(
        "Seed complete: {} products, {} shops, {} listings",
        PRODUCTS.len(),
        SHOPS.len(),
        LISTINGS.len()
    );

    Ok(())
}
