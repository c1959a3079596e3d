//! # Seed Data Generator
//!
//! Populates the database with a catalog for local development, and
//! optionally places a few demo orders through the order service.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default) into MYSHOP_DB_PATH or ./myshop.db
//! cargo run -p myshop-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p myshop-db --bin seed -- --count 2000
//!
//! # Specify database path and place 20 demo orders
//! cargo run -p myshop-db --bin seed -- --db ./data/myshop.db --orders 20
//! ```
//!
//! ## Generated Products
//! Five categories (electronics, home, books, apparel, garden), each product
//! in several variants:
//! - Price: 4.99 - 84.99 plus a variant surcharge
//! - Stock: 0 - 60
//! - Every 15th product inactive

use std::env;

use chrono::Utc;
use myshop_core::{LineRequest, Product, ProductStatus};
use myshop_db::repository::product::generate_product_id;
use myshop_db::{Database, DbConfig, OrderError};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Product categories for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "electronics",
        &[
            "USB-C Cable",
            "Wireless Mouse",
            "Mechanical Keyboard",
            "Bluetooth Speaker",
            "Phone Stand",
            "Power Bank",
            "Webcam",
            "Noise Cancelling Headphones",
        ],
    ),
    (
        "home",
        &[
            "Desk Lamp",
            "Coffee Mug",
            "French Press",
            "Throw Pillow",
            "Wall Clock",
            "Scented Candle",
            "Storage Basket",
            "Cutting Board",
        ],
    ),
    (
        "books",
        &[
            "Rust in Practice",
            "Systems Design Notes",
            "The Garden Year",
            "Cooking for One",
            "City Walks",
            "Pocket Atlas",
            "Short Stories Vol 1",
            "Field Guide to Birds",
        ],
    ),
    (
        "apparel",
        &[
            "Cotton T-Shirt",
            "Hoodie",
            "Rain Jacket",
            "Wool Socks",
            "Baseball Cap",
            "Running Shorts",
            "Denim Jeans",
            "Canvas Sneakers",
        ],
    ),
    (
        "garden",
        &[
            "Watering Can",
            "Pruning Shears",
            "Seed Starter Kit",
            "Garden Gloves",
            "Terracotta Pot",
            "Bird Feeder",
            "Hose Nozzle",
            "Compost Bin",
        ],
    ),
];

/// Variants and their surcharge in cents
const VARIANTS: &[(&str, i64)] = &[
    ("S", 0),
    ("M", 0),
    ("L", 200),
    ("XL", 400),
    ("Black", 0),
    ("White", 0),
    ("Blue", 150),
    ("Bundle", 1500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut orders: usize = 0;
    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    orders = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MyShop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -o, --orders <N>   Demo orders to place afterwards (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: $MYSHOP_DB_PATH or ./myshop.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(
        database = %config.database_path.display(),
        products = count,
        orders,
        "Seeding database"
    );

    let db = Database::new(config).await?;
    if !db.health_check().await {
        return Err("database is not responding".into());
    }

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping catalog seed");
    } else {
        seed_catalog(&db, count).await?;
    }

    if orders > 0 {
        place_demo_orders(&db, orders).await?;
    }

    info!("Seed complete");
    db.close().await;

    Ok(())
}

async fn seed_catalog(db: &Database, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category, names) in CATEGORIES {
        for (product_idx, name) in names.iter().enumerate() {
            for (variant_idx, (variant, surcharge)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated * 31 + product_idx * 7 + variant_idx;
                let product = generate_product(category, name, variant, *surcharge, seed);

                if let Err(e) = db.products().insert(&product).await {
                    warn!(name = %product.name, error = %e, "Failed to insert product");
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    info!(generated, "Products inserted");
                }
            }
        }
    }

    let elapsed = start.elapsed();
    info!(
        generated,
        elapsed_ms = elapsed.as_millis() as u64,
        "Catalog generated"
    );

    Ok(())
}

/// Places orders for a demo user, cycling through the first page of the
/// catalog. Stock-outs are expected and only logged.
async fn place_demo_orders(db: &Database, orders: usize) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = db
        .products()
        .list(myshop_core::PageRequest::new(1, 50))
        .await?;
    if catalog.items.is_empty() {
        warn!("No products to order");
        return Ok(());
    }

    let service = db.order_service();
    let mut placed = 0;

    for n in 0..orders {
        let first = &catalog.items[n % catalog.items.len()];
        let second = &catalog.items[(n * 7 + 3) % catalog.items.len()];
        let lines = vec![
            LineRequest::new(first.id.clone(), 1 + (n % 3) as i64),
            LineRequest::new(second.id.clone(), 1),
        ];

        match service.place_order("demo-user-0001", lines).await {
            Ok(order) => {
                placed += 1;
                info!(order_no = %order.order_no, total = %order.total(), "Demo order placed");
            }
            Err(e @ OrderError::InsufficientStock { .. }) => {
                warn!(error = %e, "Demo order skipped");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let page = service
        .get_user_orders("demo-user-0001", Some(1), Some(10))
        .await?;
    info!(placed, total_for_user = page.total, "Demo orders done");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(
    category: &str,
    name: &str,
    variant: &str,
    surcharge: i64,
    seed: usize,
) -> Product {
    let now = Utc::now();

    // Price: base 4.99-84.99 + variant surcharge
    let base_price = 499 + ((seed * 37) % 8000) as i64;
    let price_cents = base_price + surcharge;

    // Stock 0-60
    let stock = (seed % 61) as i64;

    let status = if seed % 15 == 0 {
        ProductStatus::Inactive
    } else {
        ProductStatus::Active
    };

    Product {
        id: generate_product_id(),
        name: format!("{} ({})", name, variant),
        description: Some(format!("{} from the {} range", name, category)),
        price_cents,
        stock,
        status,
        category_id: Some(category.to_string()),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
