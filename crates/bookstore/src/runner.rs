//! The canned query sequence.
//!
//! [`Step::ALL`] fixes the order. Each step prints its result set as it
//! completes; a failing step is logged and the run moves on to the next one.
//! The index steps must stay in the order drop, explain, create, explain so
//! that the two plans show the change from a collection scan to an index scan.

use std::io::{self, Write};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::database::{BookStore, FindQuery};
use crate::errors::StoreError;
use crate::explain::{self, PlanKind};
use crate::models::{
    AuthorCount, BookSummary, DecadeCount, GenreStats, TitleAuthorPrice, TitlePrice, TitleYear,
};
use crate::queries::{self, PAGE_SIZE, Page, SortOrder};
use crate::table::{Table, TableRow};

const GENRE: &str = "Fantasy";
const AFTER_YEAR: i32 = 2010;
const AUTHOR: &str = "Andy Weir";
const REPRICED_TITLE: &str = "The Martian";
const NEW_PRICE: f64 = 12.99;
const DELETED_TITLE: &str = "The Alchemist";
const EXPLAINED_TITLE: &str = "Dune";
const DEMO_PAGES: [u64; 2] = [1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    GenreFilter,
    PublishedAfter,
    AuthorFilter,
    UpdatePrice,
    DeleteByTitle,
    InStockPublishedAfter,
    SortByPriceAscending,
    SortByPriceDescending,
    Pagination,
    AveragePriceByGenre,
    TopAuthor,
    CountByDecade,
    DropTitleIndex,
    ExplainBeforeIndex,
    CreateIndexes,
    ExplainAfterIndex,
}

impl Step {
    /// Every step, in execution order.
    pub const ALL: [Step; 16] = [
        Step::GenreFilter,
        Step::PublishedAfter,
        Step::AuthorFilter,
        Step::UpdatePrice,
        Step::DeleteByTitle,
        Step::InStockPublishedAfter,
        Step::SortByPriceAscending,
        Step::SortByPriceDescending,
        Step::Pagination,
        Step::AveragePriceByGenre,
        Step::TopAuthor,
        Step::CountByDecade,
        Step::DropTitleIndex,
        Step::ExplainBeforeIndex,
        Step::CreateIndexes,
        Step::ExplainAfterIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::GenreFilter => "genre_filter",
            Step::PublishedAfter => "published_after",
            Step::AuthorFilter => "author_filter",
            Step::UpdatePrice => "update_price",
            Step::DeleteByTitle => "delete_by_title",
            Step::InStockPublishedAfter => "in_stock_published_after",
            Step::SortByPriceAscending => "sort_by_price_ascending",
            Step::SortByPriceDescending => "sort_by_price_descending",
            Step::Pagination => "pagination",
            Step::AveragePriceByGenre => "average_price_by_genre",
            Step::TopAuthor => "top_author",
            Step::CountByDecade => "count_by_decade",
            Step::DropTitleIndex => "drop_title_index",
            Step::ExplainBeforeIndex => "explain_before_index",
            Step::CreateIndexes => "create_indexes",
            Step::ExplainAfterIndex => "explain_after_index",
        }
    }

    /// Section banner printed before the first step of each group.
    pub fn section(self) -> Option<&'static str> {
        match self {
            Step::GenreFilter => Some("Basic queries"),
            Step::InStockPublishedAfter => Some("Advanced queries"),
            Step::AveragePriceByGenre => Some("Aggregations"),
            Step::DropTitleIndex => Some("Indexing & explain()"),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

/// Result of one step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: Step,
    /// Error message when the step failed.
    pub error: Option<String>,
}

/// What happened during a run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
    /// Plan of the title lookup before the indexes were created.
    pub plan_before_index: Option<PlanKind>,
    /// Plan of the title lookup after the indexes were created.
    pub plan_after_index: Option<PlanKind>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    pub fn succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Runs [`Step::ALL`] against a store, writing tables to `out`.
pub struct QueryRunner<'a, W: Write> {
    store: &'a BookStore,
    out: W,
}

impl<'a, W: Write> QueryRunner<'a, W> {
    pub fn new(store: &'a BookStore, out: W) -> Self {
        Self { store, out }
    }

    /// Gives back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    pub async fn run(&mut self) -> RunReport {
        let mut report = RunReport::default();

        for step in Step::ALL {
            if let Some(section) = step.section() {
                if let Err(e) = writeln!(self.out, "\n--- {section} ---") {
                    warn!("Failed to write section header: {e}");
                }
            }

            let error = match self.execute(step, &mut report).await {
                Ok(()) => None,
                Err(e) => {
                    error!(step = step.name(), "Step failed: {e}");
                    Some(e.to_string())
                }
            };
            report.outcomes.push(StepOutcome { step, error });
        }

        if let Err(e) = self.out.flush() {
            warn!("Failed to flush output: {e}");
        }
        report
    }

    async fn execute(&mut self, step: Step, report: &mut RunReport) -> Result<(), StepError> {
        match step {
            Step::GenreFilter => {
                let books = self.store.find_books(queries::genre_is(GENRE)).await?;
                let rows: Vec<BookSummary> = books.iter().map(BookSummary::from).collect();
                self.print_table(&format!("Books in genre = {GENRE}"), &rows)?;
            }
            Step::PublishedAfter => {
                let books = self
                    .store
                    .find_books(queries::published_after(AFTER_YEAR))
                    .await?;
                let rows: Vec<TitleYear> = books.iter().map(TitleYear::from).collect();
                self.print_table(&format!("Books published after {AFTER_YEAR}"), &rows)?;
            }
            Step::AuthorFilter => {
                let books = self.store.find_books(queries::author_is(AUTHOR)).await?;
                let rows: Vec<TitleYear> = books.iter().map(TitleYear::from).collect();
                self.print_table(&format!("Books by {AUTHOR}"), &rows)?;
            }
            Step::UpdatePrice => {
                let summary = self.store.update_price(REPRICED_TITLE, NEW_PRICE).await?;
                writeln!(
                    self.out,
                    "\nUpdatePrice - matched: {}, modified: {}",
                    summary.matched, summary.modified
                )?;
            }
            Step::DeleteByTitle => {
                let deleted = self.store.delete_by_title(DELETED_TITLE).await?;
                writeln!(self.out, "\nDelete - deletedCount: {deleted}")?;
            }
            Step::InStockPublishedAfter => {
                let query = FindQuery::new(queries::in_stock_published_after(AFTER_YEAR))
                    .projection(queries::title_author_price_projection());
                let rows: Vec<TitleAuthorPrice> = self.store.find_projected(query).await?;
                self.print_table(&format!("In-stock & published after {AFTER_YEAR}"), &rows)?;
            }
            Step::SortByPriceAscending => {
                self.print_by_price(SortOrder::Ascending, "ascending").await?;
            }
            Step::SortByPriceDescending => {
                self.print_by_price(SortOrder::Descending, "descending").await?;
            }
            Step::Pagination => {
                for number in DEMO_PAGES {
                    let page = Page::new(number, PAGE_SIZE);
                    let query = FindQuery::all()
                        .projection(queries::title_author_price_projection())
                        .sort(queries::by_title())
                        .page(page);
                    let rows: Vec<TitleAuthorPrice> = self.store.find_projected(query).await?;
                    self.print_table(
                        &format!("Page {} (pageSize={})", page.number, page.size),
                        &rows,
                    )?;
                }
            }
            Step::AveragePriceByGenre => {
                let rows: Vec<GenreStats> = self
                    .store
                    .aggregate(queries::average_price_by_genre())
                    .await?;
                self.print_table("Average price by genre", &rows)?;
            }
            Step::TopAuthor => {
                let rows: Vec<AuthorCount> = self.store.aggregate(queries::top_authors(1)).await?;
                self.print_table("Author with most books", &rows)?;
            }
            Step::CountByDecade => {
                let rows: Vec<DecadeCount> =
                    self.store.aggregate(queries::count_by_decade()).await?;
                self.print_table("Books grouped by decade", &rows)?;
            }
            Step::DropTitleIndex => {
                if self.store.drop_index_if_exists(queries::TITLE_INDEX).await? {
                    info!("Dropped index {}", queries::TITLE_INDEX);
                }
            }
            Step::ExplainBeforeIndex => {
                report.plan_before_index = Some(self.print_plan("before index").await?);
            }
            Step::CreateIndexes => {
                let names = self.store.create_indexes().await?;
                writeln!(self.out, "\nCreated index: {}", names.join(" and "))?;
            }
            Step::ExplainAfterIndex => {
                report.plan_after_index = Some(self.print_plan("after index").await?);
                writeln!(
                    self.out,
                    "\nSummary: look for COLLSCAN before index (collection scan) and IXSCAN / index usage after index creation."
                )?;
            }
        }
        Ok(())
    }

    async fn print_by_price(&mut self, order: SortOrder, label: &str) -> Result<(), StepError> {
        let query = FindQuery::all()
            .projection(queries::title_price_projection())
            .sort(queries::by_price(order));
        let rows: Vec<TitlePrice> = self.store.find_projected(query).await?;
        self.print_table(&format!("Books sorted by price ({label})"), &rows)?;
        Ok(())
    }

    async fn print_plan(&mut self, label: &str) -> Result<PlanKind, StepError> {
        let raw = self
            .store
            .explain_find(queries::title_is(EXPLAINED_TITLE))
            .await?;
        let plan = explain::winning_plan(&raw);
        let kind = PlanKind::classify(&plan);

        writeln!(self.out, "\nExplain ({label}) - winning plan:")?;
        writeln!(self.out, "{}", explain::to_pretty_json(&plan))?;
        info!(
            stages = ?explain::plan_stages(&plan),
            "Title lookup {label}: {kind}"
        );
        Ok(kind)
    }

    fn print_table<R: TableRow>(&mut self, title: &str, rows: &[R]) -> io::Result<()> {
        writeln!(self.out, "\n{title}:")?;
        write!(self.out, "{}", Table::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(step: Step) -> usize {
        Step::ALL.iter().position(|s| *s == step).unwrap()
    }

    #[test]
    fn test_index_creation_between_explains() {
        assert!(position(Step::DropTitleIndex) < position(Step::ExplainBeforeIndex));
        assert!(position(Step::ExplainBeforeIndex) < position(Step::CreateIndexes));
        assert!(position(Step::CreateIndexes) < position(Step::ExplainAfterIndex));
        assert_eq!(Step::ALL.last(), Some(&Step::ExplainAfterIndex));
    }

    #[test]
    fn test_writes_precede_advanced_queries() {
        assert!(position(Step::UpdatePrice) < position(Step::DeleteByTitle));
        assert!(position(Step::DeleteByTitle) < position(Step::InStockPublishedAfter));
    }

    #[test]
    fn test_step_names_unique() {
        let names: std::collections::HashSet<_> = Step::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), Step::ALL.len());
    }

    #[test]
    fn test_sections() {
        let sections: Vec<_> = Step::ALL.iter().filter_map(|s| s.section()).collect();
        assert_eq!(
            sections,
            vec![
                "Basic queries",
                "Advanced queries",
                "Aggregations",
                "Indexing & explain()"
            ]
        );
        assert_eq!(Step::ALL[0].section(), Some("Basic queries"));
    }

    #[test]
    fn test_report_failures() {
        let report = RunReport {
            outcomes: vec![
                StepOutcome {
                    step: Step::GenreFilter,
                    error: None,
                },
                StepOutcome {
                    step: Step::TopAuthor,
                    error: Some("Read error".into()),
                },
            ],
            ..RunReport::default()
        };
        assert!(!report.succeeded());
        assert_eq!(report.failures().count(), 1);
        assert!(RunReport::default().succeeded());
    }
}
