//! # Catalog Seeder
//!
//! Populates the database with the card catalog.
//!
//! ## Usage
//! ```bash
//! # Seed the catalog (skips if cards already exist)
//! cargo run -p cardex-db --bin seed
//!
//! # Wipe and reseed the catalog
//! cargo run -p cardex-db --bin seed -- --reset
//!
//! # Specify database path
//! cargo run -p cardex-db --bin seed -- --db ./data/cardex.db
//! ```
//!
//! This is the only mutation path for catalog records: cards are immutable
//! after creation, and `--reset` is the explicit admin-style reseed. A reseed
//! may strand ownership/cart rows pointing at removed card ids; the purchase
//! engine tolerates and skips those.

use chrono::Utc;
use std::env;
use uuid::Uuid;

use cardex_core::{Card, Rarity};
use cardex_db::{Database, DbConfig};

/// The fixed six-card catalog.
///
/// (name, element, power, ability, price_cents, rarity, collector_number)
const CATALOG: &[(&str, &str, i64, &str, i64, Rarity, i64)] = &[
    (
        "Emberwing Drake",
        "Fire",
        120,
        "Cinder Breath",
        2999,
        Rarity::Legendary,
        1,
    ),
    (
        "Static Vole",
        "Storm",
        60,
        "Arc Pulse",
        999,
        Rarity::Rare,
        2,
    ),
    (
        "Tidehorn Leviathan",
        "Water",
        100,
        "Rip Current",
        1999,
        Rarity::Rare,
        3,
    ),
    (
        "Mossback Sprout",
        "Grass/Poison",
        70,
        "Briar Lash",
        1299,
        Rarity::Common,
        4,
    ),
    (
        "Gloomveil Shade",
        "Ghost/Poison",
        90,
        "Umbral Grasp",
        2299,
        Rarity::Rare,
        5,
    ),
    (
        "Mindrender Apex",
        "Psychic",
        150,
        "Null Storm",
        4999,
        Rarity::Legendary,
        6,
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cardex_dev.db");
    let mut reset = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--reset" | "-r" => {
                reset = true;
            }
            "--help" | "-h" => {
                println!("Cardex Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cardex_dev.db)");
                println!("  -r, --reset        Delete existing cards and reseed");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Cardex Catalog Seeder");
    println!("========================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing cards
    let existing = db.cards().count().await?;
    if existing > 0 {
        if reset {
            println!("🗑️  Deleting {} existing cards...", existing);
            db.cards().delete_all().await?;
        } else {
            println!("⚠ Database already has {} cards", existing);
            println!("  Skipping seed to avoid duplicates.");
            println!("  Run with --reset to wipe and reseed.");
            return Ok(());
        }
    }

    println!();
    println!("✨ Adding {} cards...", CATALOG.len());

    let now = Utc::now();
    for (name, element, power, ability, price_cents, rarity, collector_number) in CATALOG {
        let card = Card {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            element: element.to_string(),
            power: *power,
            ability: ability.to_string(),
            price_cents: *price_cents,
            rarity: *rarity,
            image_url: format!("https://cards.example.com/art/{}.png", collector_number),
            collector_number: *collector_number,
            created_at: now,
        };

        db.cards().insert(&card).await?;
        println!("   ✅ Added {} - {}", card.name, card.price());
    }

    println!();
    println!("🎉 Seed complete!");
    println!();
    println!("📊 Catalog Summary:");
    for (idx, (name, _, _, _, price_cents, rarity, _)) in CATALOG.iter().enumerate() {
        println!(
            "   {}. {} ({:?}) - ${}.{:02}",
            idx + 1,
            name,
            rarity,
            price_cents / 100,
            price_cents % 100
        );
    }

    Ok(())
}
