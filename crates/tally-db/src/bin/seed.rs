//! # Seed Data Generator
//!
//! Populates a development database with categories, products and, on
//! request, a few demo sales.
//!
//! ## Usage
//! ```bash
//! # Seed 200 products into $TALLY_DB_PATH (default ./tally.db)
//! cargo run -p tally-db --bin seed
//!
//! # Custom amount and path, plus 25 demo checkouts
//! cargo run -p tally-db --bin seed -- --count 500 --db ./data/tally.db --sales 25
//! ```
//!
//! Prices are deterministic per product index, so two seeded databases
//! report the same figures for the same demo sales.

use std::env;
use std::time::Instant;

use tally_core::{CheckoutItem, CheckoutRequest, NewCategory, NewProduct};
use tally_db::config::Settings;
use tally_db::{Database, DbResult};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Categories and the product names seeded into each.
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Drinks",
        "Hot and cold beverages",
        &[
            "Kopi Susu",
            "Es Teh Manis",
            "Teh Tarik",
            "Jus Alpukat",
            "Air Mineral",
            "Es Jeruk",
            "Cokelat Panas",
            "Kopi Hitam",
        ],
    ),
    (
        "Food",
        "Kitchen dishes",
        &[
            "Nasi Goreng",
            "Mie Goreng",
            "Ayam Bakar",
            "Sate Ayam",
            "Gado-Gado",
            "Soto Ayam",
            "Nasi Uduk",
            "Bakso",
        ],
    ),
    (
        "Snacks",
        "Counter snacks",
        &[
            "Kerupuk",
            "Pisang Goreng",
            "Roti Bakar",
            "Martabak Manis",
            "Tahu Isi",
            "Risoles",
        ],
    ),
];

/// Portion variants and their price add-on in minor units.
const PORTIONS: &[(&str, i64)] = &[
    ("Regular", 0),
    ("Large", 4_000),
    ("Jumbo", 8_000),
    ("Family", 20_000),
];

struct Args {
    count: usize,
    db_path: Option<String>,
    sales: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let mut settings = Settings::from_env()?;
    if let Some(path) = args.db_path {
        settings.database_path = path.into();
    }

    info!(
        path = %settings.database_path.display(),
        count = args.count,
        sales = args.sales,
        "Tally POS seed"
    );

    let db = Database::new(settings.db_config()).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has products, skipping catalog seed"
        );
    } else {
        let start = Instant::now();
        let seeded = seed_catalog(&db, args.count).await?;
        info!(seeded, elapsed = ?start.elapsed(), "Catalog seeded");
    }

    if args.sales > 0 {
        demo_sales(&db, args.sales).await?;
    }

    let stats = db.reports().dashboard().await?;
    info!(dashboard = %serde_json::to_string(&stats)?, "Seed complete");

    db.close().await;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// Returns `None` when only help was requested.
fn parse_args() -> Result<Option<Args>, String> {
    let argv: Vec<String> = env::args().collect();
    let mut args = Args {
        count: 200,
        db_path: None,
        sales: 0,
    };

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--count" | "-c" => {
                args.count = flag_value(&argv, i)?
                    .parse()
                    .map_err(|_| "--count expects a number".to_string())?;
                i += 1;
            }
            "--db" | "-d" => {
                args.db_path = Some(flag_value(&argv, i)?.to_string());
                i += 1;
            }
            "--sales" | "-s" => {
                args.sales = flag_value(&argv, i)?
                    .parse()
                    .map_err(|_| "--sales expects a number".to_string())?;
                i += 1;
            }
            "--help" | "-h" => {
                println!("Tally POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: $TALLY_DB_PATH)");
                println!("  -s, --sales <N>    Demo checkouts to run after seeding (default: 0)");
                println!("  -h, --help         Show this help message");
                return Ok(None);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(Some(args))
}

fn flag_value(argv: &[String], i: usize) -> Result<&str, String> {
    argv.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} expects a value", argv[i]))
}

async fn seed_catalog(db: &Database, count: usize) -> DbResult<usize> {
    let mut seeded = 0;

    'categories: for (cat_idx, (name, description, products)) in CATALOG.iter().enumerate() {
        let category = db
            .categories()
            .insert(&NewCategory {
                name: name.to_string(),
                description: description.to_string(),
            })
            .await?;

        for (prod_idx, product_name) in products.iter().enumerate() {
            for (portion, addon) in PORTIONS {
                if seeded >= count {
                    break 'categories;
                }
                let index = cat_idx * 100 + prod_idx * PORTIONS.len() + seeded;
                db.products()
                    .insert(&generate_product(
                        product_name,
                        portion,
                        *addon,
                        category.id,
                        index,
                    ))
                    .await?;
                seeded += 1;
            }
        }
    }

    Ok(seeded)
}

/// Deterministic product: base price 5.000-24.000 plus portion add-on,
/// stock 0-59 so some rows land below the low-stock threshold.
fn generate_product(
    name: &str,
    portion: &str,
    addon: i64,
    category_id: i64,
    index: usize,
) -> NewProduct {
    let base_price = 5_000 + ((index * 1_700) % 20_000) as i64;
    NewProduct {
        name: format!("{name} {portion}"),
        price: base_price / 500 * 500 + addon,
        stock: ((index * 37) % 60) as i64,
        category_id: Some(category_id),
    }
}

/// Runs checkouts against whatever stock exists and voids every fifth one.
async fn demo_sales(db: &Database, sales: usize) -> DbResult<()> {
    let products = db.products().count().await?;
    if products == 0 {
        warn!("No products to sell");
        return Ok(());
    }

    let (mut committed, mut rejected, mut voided) = (0usize, 0usize, 0usize);
    for n in 0..sales {
        let first = (n as i64 * 7) % products + 1;
        let second = (n as i64 * 13 + 3) % products + 1;
        let request = CheckoutRequest::new(vec![
            CheckoutItem::new(first, 1 + (n as i64 % 3)),
            CheckoutItem::new(second, 1),
        ])
        .with_discount(if n % 4 == 0 { 2_000 } else { 0 })
        .with_payment_method(if n % 2 == 0 { "cash" } else { "qris" });

        match db.orders().checkout(request).await {
            Ok(order) => {
                committed += 1;
                if n % 5 == 4 {
                    db.orders().void(order.id).await?;
                    voided += 1;
                }
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Demo checkout rejected");
                rejected += 1;
            }
        }
    }

    info!(committed, rejected, voided, "Demo sales done");
    Ok(())
}
