//! The fixed book catalog.

use bookstore::models::Book;

/// Number of books in [`catalog`].
pub const CATALOG_SIZE: usize = 12;

#[allow(clippy::too_many_arguments)]
fn book(
    title: &str,
    author: &str,
    genre: &str,
    published_year: i32,
    price: f64,
    in_stock: bool,
    pages: i32,
    publisher: &str,
) -> Book {
    Book {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        published_year,
        price,
        in_stock,
        pages,
        publisher: publisher.to_string(),
    }
}

/// The twelve books written by every seed run, in insertion order.
#[rustfmt::skip]
pub fn catalog() -> Vec<Book> {
    vec![
        book("The Silent Patient", "Alex Michaelides", "Thriller", 2019, 12.99, true, 336, "Celadon Books"),
        book("Educated", "Tara Westover", "Memoir", 2018, 14.99, true, 352, "Random House"),
        book("The Testaments", "Margaret Atwood", "Fiction", 2019, 16.50, false, 419, "Chatto & Windus"),
        book("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 10.99, true, 310, "George Allen & Unwin"),
        book("Harry Potter and the Sorcerer's Stone", "J.K. Rowling", "Fantasy", 1997, 9.99, true, 309, "Bloomsbury"),
        book("The Martian", "Andy Weir", "Science Fiction", 2011, 11.99, true, 369, "Crown"),
        book("Dune", "Frank Herbert", "Science Fiction", 1965, 13.99, false, 412, "Chilton"),
        book("Lean Startup", "Eric Ries", "Business", 2011, 19.99, true, 336, "Crown Business"),
        book("Sapiens", "Yuval Noah Harari", "Non-Fiction", 2014, 18.99, true, 443, "Harvill Secker"),
        book("The Name of the Wind", "Patrick Rothfuss", "Fantasy", 2007, 12.00, false, 662, "DAW Books"),
        book("Atomic Habits", "James Clear", "Self-Help", 2018, 17.00, true, 320, "Avery"),
        book("The Alchemist", "Paulo Coelho", "Fiction", 1988, 8.99, true, 208, "HarperOne"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore::queries::decade_of;
    use std::collections::{BTreeMap, HashSet};

    #[test]
    fn test_catalog_size_and_completeness() {
        let books = catalog();
        assert_eq!(books.len(), CATALOG_SIZE);
        assert!(books.iter().all(Book::is_complete));
    }

    #[test]
    fn test_titles_unique() {
        let titles: HashSet<_> = catalog().into_iter().map(|b| b.title).collect();
        assert_eq!(titles.len(), CATALOG_SIZE);
    }

    #[test]
    fn test_fantasy_titles() {
        let fantasy: Vec<_> = catalog()
            .into_iter()
            .filter(|b| b.genre == "Fantasy")
            .map(|b| b.title)
            .collect();
        assert_eq!(
            fantasy,
            vec![
                "The Hobbit",
                "Harry Potter and the Sorcerer's Stone",
                "The Name of the Wind"
            ]
        );
    }

    #[test]
    fn test_scripted_targets_present() {
        let books = catalog();
        for title in ["The Martian", "The Alchemist", "Dune"] {
            assert_eq!(books.iter().filter(|b| b.title == title).count(), 1);
        }
    }

    #[test]
    fn test_decades_partition_catalog() {
        let mut decades: BTreeMap<i32, usize> = BTreeMap::new();
        for book in catalog() {
            *decades.entry(decade_of(book.published_year)).or_default() += 1;
        }
        assert_eq!(decades.values().sum::<usize>(), CATALOG_SIZE);
        assert_eq!(decades.keys().next(), Some(&1930));
        assert_eq!(decades[&2010], 7);
    }
}
