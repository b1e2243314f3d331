//! Access layer and canned query runner for the `plp_bookstore.books` collection.
//!
//! The crate is shared by the two bookstore programs:
//! - `queries` (this crate's binary) runs the fixed demonstration sequence
//!   through [`runner::QueryRunner`].
//! - `seed` (in the `seed-data` crate) resets the collection to the fixed catalog.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bookstore::prelude::*;
//!
//! let settings = Settings::from_env();
//! let store = BookStore::connect(&settings).await?;
//! let fantasy = store.find_books(queries::genre_is("Fantasy")).await?;
//! store.shutdown().await;
//! ```

pub mod config;
pub mod database;
pub mod errors;
pub mod explain;
pub mod logging;
pub mod models;
pub mod queries;
pub mod runner;
pub mod table;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::Settings;
    pub use crate::database::{BookStore, FindQuery, UpdateSummary};
    pub use crate::errors::StoreError;
    pub use crate::explain::PlanKind;
    pub use crate::models::Book;
    pub use crate::queries::{self, Page, SortOrder};
    pub use crate::runner::{QueryRunner, RunReport, Step};
    pub use crate::table::{Table, TableRow};
}
