//! # Catalog Seeder
//!
//! Loads a starter catalog into a development database.
//!
//! ## Usage
//! ```bash
//! cargo run -p folio-db --bin seed
//! cargo run -p folio-db --bin seed -- --db ./data/folio.db
//! ```

use chrono::Utc;
use std::env;
use folio_core::Book;
use folio_db::{Database, DbConfig, DbError};

/// (id, title, author, price in cents)
const STARTER_CATALOG: &[(&str, &str, &str, i64)] = &[
    ("1", "The Lord of the Rings", "J.R.R. Tolkien", 2500),
    ("2", "Pride and Prejudice", "Jane Austen", 1500),
    ("3", "1984", "George Orwell", 2000),
    ("4", "Dune", "Frank Herbert", 1899),
    ("5", "The Left Hand of Darkness", "Ursula K. Le Guin", 1650),
    ("6", "Beloved", "Toni Morrison", 1725),
    ("7", "One Hundred Years of Solitude", "Gabriel Garcia Marquez", 1999),
    ("8", "The Name of the Rose", "Umberto Eco", 1450),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./folio.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Folio catalog seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./folio.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Database: {}", db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let now = Utc::now();
    let mut inserted = 0;
    let mut skipped = 0;

    for (id, title, author, price_cents) in STARTER_CATALOG {
        let book = Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            price_cents: *price_cents,
            created_at: now,
            updated_at: now,
        };

        match db.books().insert(&book).await {
            Ok(()) => inserted += 1,
            Err(DbError::UniqueViolation { .. }) => skipped += 1,
            Err(e) => {
                eprintln!("Failed to insert {}: {}", book.id, e);
            }
        }
    }

    println!("✓ Inserted {} books ({} already present)", inserted, skipped);
    println!("  Catalog now holds {} books", db.books().count().await?);

    db.close().await;
    Ok(())
}
