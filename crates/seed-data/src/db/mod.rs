//! Database integration for seeding the books collection.
//!
//! The [`Seeder`] resets the collection and writes the catalog in one batch.
//! [`run_seed`] wraps a whole run and releases the client afterwards.

mod seeder;

pub use seeder::{SeedError, SeedReport, Seeder, run_seed, run_seed_with};
