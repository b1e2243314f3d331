//! Seed data for the plp_bookstore books collection.
//!
//! This crate holds the fixed twelve-book catalog and the [`db::Seeder`]
//! that resets the collection to it. Seeding is a full replace: every run
//! deletes the existing documents before inserting the catalog, so running
//! it twice still leaves exactly twelve books.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let store = BookStore::connect(&Settings::from_env()).await?;
//! // Seeds, checks the count and shuts the client down
//! let report = run_seed(store).await?;
//! ```

pub mod catalog;
pub mod db;

pub use bookstore::models::Book;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::catalog::{CATALOG_SIZE, catalog};
    pub use crate::db::{SeedError, SeedReport, Seeder, run_seed};
    pub use bookstore::config::Settings;
    pub use bookstore::database::BookStore;
    pub use bookstore::models::Book;
}
