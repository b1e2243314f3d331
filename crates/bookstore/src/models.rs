//! Book documents and the row shapes printed by the query runner.

use serde::{Deserialize, Serialize};

use crate::queries::round_cents;
use crate::table::TableRow;

/// A book document in the `books` collection.
///
/// The store-assigned `_id` is not modelled; it is ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    /// Price in currency units with two fraction digits.
    pub price: f64,
    pub in_stock: bool,
    pub pages: i32,
    pub publisher: String,
}

impl Book {
    /// True when every string field is non-empty and the numeric fields are positive.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty()
            && !self.author.is_empty()
            && !self.genre.is_empty()
            && !self.publisher.is_empty()
            && self.published_year > 0
            && self.price > 0.0
            && self.pages > 0
    }
}

fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Title, author and year of a full book document.
#[derive(Debug, Clone, PartialEq)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.published_year,
        }
    }
}

impl TableRow for BookSummary {
    fn headers() -> &'static [&'static str] {
        &["title", "author", "year"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.author.clone(),
            self.year.to_string(),
        ]
    }
}

/// Title and year of a full book document.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleYear {
    pub title: String,
    pub year: i32,
}

impl From<&Book> for TitleYear {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            year: book.published_year,
        }
    }
}

impl TableRow for TitleYear {
    fn headers() -> &'static [&'static str] {
        &["title", "year"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.title.clone(), self.year.to_string()]
    }
}

/// Projection `{ title, author, price }` without `_id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TitleAuthorPrice {
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl TableRow for TitleAuthorPrice {
    fn headers() -> &'static [&'static str] {
        &["title", "author", "price"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.author.clone(),
            format_price(self.price),
        ]
    }
}

/// Projection `{ title, price }` without `_id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TitlePrice {
    pub title: String,
    pub price: f64,
}

impl TableRow for TitlePrice {
    fn headers() -> &'static [&'static str] {
        &["title", "price"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.title.clone(), format_price(self.price)]
    }
}

/// Output of the average-price-by-genre pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenreStats {
    #[serde(rename = "_id")]
    pub genre: String,
    #[serde(rename = "averagePrice")]
    pub average_price: f64,
    pub count: i64,
}

impl TableRow for GenreStats {
    fn headers() -> &'static [&'static str] {
        &["genre", "averagePrice", "count"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.genre.clone(),
            round_cents(self.average_price).to_string(),
            self.count.to_string(),
        ]
    }
}

/// Output of the books-per-author pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorCount {
    #[serde(rename = "_id")]
    pub author: String,
    pub count: i64,
}

impl TableRow for AuthorCount {
    fn headers() -> &'static [&'static str] {
        &["author", "count"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.author.clone(), self.count.to_string()]
    }
}

/// Output of the books-per-decade pipeline.
///
/// The server computes the decade with `$floor`/`$multiply`, which yields a double.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecadeCount {
    #[serde(rename = "_id")]
    pub decade: f64,
    pub count: i64,
}

impl DecadeCount {
    /// The decade as a year. The server value is already a whole number;
    /// rounding only absorbs floating-point noise.
    pub fn decade(&self) -> i32 {
        self.decade.round() as i32
    }
}

impl TableRow for DecadeCount {
    fn headers() -> &'static [&'static str] {
        &["decade", "count"]
    }

    fn cells(&self) -> Vec<String> {
        vec![format!("{}s", self.decade()), self.count.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    fn martian() -> Book {
        Book {
            title: "The Martian".into(),
            author: "Andy Weir".into(),
            genre: "Science Fiction".into(),
            published_year: 2011,
            price: 11.99,
            in_stock: true,
            pages: 369,
            publisher: "Crown".into(),
        }
    }

    #[test]
    fn test_book_ignores_object_id() {
        let doc = doc! {
            "_id": bson::oid::ObjectId::new(),
            "title": "The Martian",
            "author": "Andy Weir",
            "genre": "Science Fiction",
            "published_year": 2011,
            "price": 11.99,
            "in_stock": true,
            "pages": 369,
            "publisher": "Crown",
        };
        let book: Book = bson::from_document(doc).unwrap();
        assert_eq!(book, martian());
        assert!(book.is_complete());
    }

    #[test]
    fn test_incomplete_book() {
        let mut book = martian();
        book.publisher.clear();
        assert!(!book.is_complete());
    }

    #[test]
    fn test_summary_rows() {
        let book = martian();
        assert_eq!(
            BookSummary::from(&book).cells(),
            vec!["The Martian", "Andy Weir", "2011"]
        );
        assert_eq!(TitleYear::from(&book).cells(), vec!["The Martian", "2011"]);
    }

    #[test]
    fn test_price_cells_keep_two_digits() {
        let row = TitlePrice {
            title: "The Name of the Wind".into(),
            price: 12.0,
        };
        assert_eq!(row.cells()[1], "12.00");
    }

    #[test]
    fn test_genre_stats_from_pipeline_output() {
        let doc = doc! { "_id": "Fantasy", "averagePrice": 11.326666666, "count": 3_i32 };
        let stats: GenreStats = bson::from_document(doc).unwrap();
        assert_eq!(stats.genre, "Fantasy");
        assert_eq!(stats.count, 3);
        assert_eq!(stats.cells()[1], "11.33");
    }

    #[test]
    fn test_decade_from_double() {
        let doc = doc! { "_id": 1930.0, "count": 1_i32 };
        let decade: DecadeCount = bson::from_document(doc).unwrap();
        assert_eq!(decade.decade(), 1930);
        assert_eq!(decade.cells(), vec!["1930s", "1"]);
    }

    #[test]
    fn test_decade_rounds_float_noise() {
        let below = DecadeCount {
            decade: 1999.999_999_9,
            count: 2,
        };
        assert_eq!(below.decade(), 2000);
        assert_eq!(below.cells()[0], "2000s");
    }
}
