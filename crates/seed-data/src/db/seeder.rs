//! Database seeding utilities.

use bookstore::database::BookStore;
use bookstore::errors::StoreError;
use bookstore::models::Book;
use thiserror::Error;
use tracing::info;

use crate::catalog::catalog;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Store(#[from] StoreError),
    #[error("Expected {expected} books after seeding, found {actual}")]
    CountMismatch { expected: u64, actual: u64 },
}

/// Counts from one seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Documents removed by the reset.
    pub deleted: u64,
    /// Documents written from the catalog.
    pub inserted: usize,
}

/// Resets the books collection to a fixed set of books.
pub struct Seeder<'a> {
    store: &'a BookStore,
    books: Vec<Book>,
}

impl<'a> Seeder<'a> {
    /// Creates a seeder that writes the standard catalog.
    pub fn new(store: &'a BookStore) -> Self {
        Self {
            store,
            books: catalog(),
        }
    }

    /// Replaces the books to write.
    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }

    /// Deletes every document, then inserts the books.
    ///
    /// Not an upsert: a second run produces the same collection, not a doubled one.
    pub async fn seed(&self) -> Result<SeedReport, SeedError> {
        let namespace = self.store.namespace();

        info!("Clearing {namespace}...");
        let deleted = self.store.clear().await?;
        info!("Removed {deleted} existing documents");

        info!("Seeding {} books...", self.books.len());
        let inserted = self.store.insert_books(&self.books).await?;
        info!("Seeded {inserted} books into {namespace}");

        Ok(SeedReport { deleted, inserted })
    }

    /// Checks that the collection holds exactly the seeded books.
    pub async fn verify(&self) -> Result<u64, SeedError> {
        let expected = self.books.len() as u64;
        let actual = self.store.count().await?;
        if actual != expected {
            return Err(SeedError::CountMismatch { expected, actual });
        }
        Ok(actual)
    }
}

/// Seeds the standard catalog, checks the count and releases the client.
pub async fn run_seed(store: BookStore) -> Result<SeedReport, SeedError> {
    run_seed_with(store, catalog()).await
}

/// Like [`run_seed`] with a caller-chosen set of books.
///
/// The client is shut down whether or not seeding worked.
pub async fn run_seed_with(store: BookStore, books: Vec<Book>) -> Result<SeedReport, SeedError> {
    let outcome = seed_and_verify(&store, books).await;
    store.shutdown().await;
    outcome
}

async fn seed_and_verify(store: &BookStore, books: Vec<Book>) -> Result<SeedReport, SeedError> {
    let seeder = Seeder::new(store).with_books(books);
    let report = seeder.seed().await?;
    seeder.verify().await?;
    Ok(report)
}
