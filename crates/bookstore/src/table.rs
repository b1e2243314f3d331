//! Console tables for query results.
//!
//! Rendering follows the familiar shell layout: an `(index)` column followed
//! by one column per field, every column padded to its widest cell.

use std::fmt;

/// A value that renders as a single table row.
pub trait TableRow {
    /// Column headers, in display order.
    fn headers() -> &'static [&'static str];

    /// Cell values, one per header.
    fn cells(&self) -> Vec<String>;
}

const INDEX_HEADER: &str = "(index)";

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from typed rows.
    pub fn from_rows<R: TableRow>(rows: &[R]) -> Self {
        let mut table = Self::new(R::headers().iter().copied());
        for row in rows {
            table.push_row(row.cells());
        }
        table
    }

    /// Appends a row. Short rows are padded with empty cells; extra cells are dropped.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let index_width = self
            .rows
            .len()
            .saturating_sub(1)
            .to_string()
            .len()
            .max(INDEX_HEADER.len());

        let mut widths = vec![index_width];
        for (col, header) in self.headers.iter().enumerate() {
            let widest_cell = self
                .rows
                .iter()
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0);
            widths.push(header.chars().count().max(widest_cell));
        }
        widths
    }
}

fn write_separator(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    for width in widths {
        write!(f, "+{}", "-".repeat(width + 2))?;
    }
    writeln!(f, "+")
}

fn write_cells<'a>(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    for (cell, width) in cells.zip(widths) {
        let pad = width - cell.chars().count();
        write!(f, "| {}{} ", cell, " ".repeat(pad))?;
    }
    writeln!(f, "|")
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        write_separator(f, &widths)?;
        write_cells(
            f,
            &widths,
            std::iter::once(INDEX_HEADER).chain(self.headers.iter().map(String::as_str)),
        )?;
        write_separator(f, &widths)?;

        for (index, row) in self.rows.iter().enumerate() {
            let index = index.to_string();
            write_cells(
                f,
                &widths,
                std::iter::once(index.as_str()).chain(row.iter().map(String::as_str)),
            )?;
        }
        if !self.rows.is_empty() {
            write_separator(f, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, u32);

    impl TableRow for Pair {
        fn headers() -> &'static [&'static str] {
            &["name", "qty"]
        }

        fn cells(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_render_pads_columns() {
        let table = Table::from_rows(&[Pair("Dune", 3), Pair("Sapiens", 12)]);
        let expected = "\
+---------+---------+-----+
| (index) | name    | qty |
+---------+---------+-----+
| 0       | Dune    | 3   |
| 1       | Sapiens | 12  |
+---------+---------+-----+
";
        assert_eq!(table.to_string(), expected);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let table = Table::from_rows::<Pair>(&[]);
        assert!(table.is_empty());
        assert_eq!(table.to_string().lines().count(), 3);
    }

    #[test]
    fn test_push_row_normalizes_width() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec!["1".to_string()]);
        table.push_row(vec!["1".into(), "2".into(), "3".into()]);
        assert!(table.to_string().contains("| 0       | 1 |   |"));
        assert!(!table.to_string().contains('3'));
    }

    #[test]
    fn test_width_counts_chars_not_bytes() {
        let mut table = Table::new(["title"]);
        table.push_row(vec!["Café".to_string()]);
        let rendered = table.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0].chars().count(), lines[3].chars().count());
    }
}
