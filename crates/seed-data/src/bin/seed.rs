//! Default seed script - resets plp_bookstore.books to the fixed catalog
//!
//! Run with:
//! ```
//! MONGO_URI=mongodb://127.0.0.1:27017 cargo run -p seed-data --bin seed
//! ```

use anyhow::Context;
use bookstore::config::Settings;
use bookstore::database::BookStore;
use bookstore::logging::init_logging;
use seed_data::db::run_seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = Settings::from_env();
    tracing::info!("Connecting to database at {}", settings.redacted_uri());

    let store = BookStore::connect(&settings)
        .await
        .context("Error seeding database")?;
    let namespace = store.namespace();

    let report = run_seed(store).await.context("Error seeding database")?;
    println!(
        "Inserted {} book documents into {}",
        report.inserted, namespace
    );

    Ok(())
}
