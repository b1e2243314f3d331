//! Canned query script - runs the fixed query, update, aggregation and
//! indexing sequence against the books collection.
//!
//! Run with:
//! ```
//! MONGO_URI=mongodb://127.0.0.1:27017 cargo run -p bookstore --bin queries
//! ```

use anyhow::Context;
use bookstore::config::Settings;
use bookstore::database::BookStore;
use bookstore::logging::init_logging;
use bookstore::runner::QueryRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = Settings::from_env();
    tracing::info!("Connecting to database at {}", settings.redacted_uri());

    let store = BookStore::connect(&settings)
        .await
        .context("Error running queries")?;

    let report = QueryRunner::new(&store, std::io::stdout()).run().await;
    store.shutdown().await;

    for failure in report.failures() {
        tracing::warn!(
            "Step {} failed: {}",
            failure.step.name(),
            failure.error.as_deref().unwrap_or_default()
        );
    }
    tracing::info!(
        "Query run finished: {}/{} steps succeeded",
        report.outcomes.len() - report.failures().count(),
        report.outcomes.len()
    );

    Ok(())
}
