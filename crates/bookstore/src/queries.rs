//! Filter, projection, sort and pipeline builders for the books collection.
//!
//! Everything here is a plain [`Document`] so the shapes can be checked
//! without a server.

use mongodb::IndexModel;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;

/// Page size used by the paginated listing.
pub const PAGE_SIZE: u64 = 5;

/// Single-field ascending index on `title`.
pub const TITLE_INDEX: &str = "title_idx";

/// Compound index on `author` ascending, `published_year` descending.
pub const AUTHOR_YEAR_INDEX: &str = "author_year_idx";

pub fn genre_is(genre: &str) -> Document {
    doc! { "genre": genre }
}

pub fn author_is(author: &str) -> Document {
    doc! { "author": author }
}

pub fn title_is(title: &str) -> Document {
    doc! { "title": title }
}

pub fn published_after(year: i32) -> Document {
    doc! { "published_year": { "$gt": year } }
}

pub fn in_stock_published_after(year: i32) -> Document {
    doc! { "in_stock": true, "published_year": { "$gt": year } }
}

pub fn set_price(price: f64) -> Document {
    doc! { "$set": { "price": price } }
}

pub fn title_author_price_projection() -> Document {
    doc! { "title": 1, "author": 1, "price": 1, "_id": 0 }
}

pub fn title_price_projection() -> Document {
    doc! { "title": 1, "price": 1, "_id": 0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

pub fn by_price(order: SortOrder) -> Document {
    doc! { "price": order.direction() }
}

pub fn by_title() -> Document {
    doc! { "title": SortOrder::Ascending.direction() }
}

/// A 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    /// Page `number` (1-based) of `size` documents. Page 0 is treated as page 1.
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size,
        }
    }

    /// Documents to skip: `(number - 1) * size`, saturating at `u64::MAX`.
    pub fn skip(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }

    pub fn next(&self) -> Self {
        Self::new(self.number.saturating_add(1), self.size)
    }
}

/// Average price and book count per genre, most expensive genre first.
pub fn average_price_by_genre() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$genre",
                "averagePrice": { "$avg": "$price" },
                "count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "averagePrice": -1 } },
    ]
}

/// Book count per author, highest first, keeping `limit` authors.
pub fn top_authors(limit: i64) -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$author", "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1 } },
        doc! { "$limit": limit },
    ]
}

/// Book count per publication decade, oldest decade first.
///
/// The decade is `floor(published_year / 10) * 10`, computed server-side.
pub fn count_by_decade() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": {
                    "$multiply": [
                        { "$floor": { "$divide": ["$published_year", 10] } },
                        10,
                    ]
                },
                "count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Client-side counterpart of the decade expression in [`count_by_decade`].
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Rounds to two fraction digits.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The two indexes created by the indexing demonstration.
pub fn index_models() -> Vec<IndexModel> {
    vec![
        IndexModel::builder()
            .keys(doc! { "title": 1 })
            .options(IndexOptions::builder().name(TITLE_INDEX.to_string()).build())
            .build(),
        IndexModel::builder()
            .keys(doc! { "author": 1, "published_year": -1 })
            .options(
                IndexOptions::builder()
                    .name(AUTHOR_YEAR_INDEX.to_string())
                    .build(),
            )
            .build(),
    ]
}
