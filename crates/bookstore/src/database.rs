use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::Settings;
use crate::errors::{StoreError, is_missing_index_error};
use crate::models::Book;
use crate::queries::{self, Page};

/// Matched and modified counts of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

/// A `find` with optional projection, sort and paging.
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    pub filter: Document,
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

impl FindQuery {
    pub fn new(filter: Document) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.skip = Some(page.skip());
        self.limit = Some(page.limit());
        self
    }
}

/// Handle to the books collection.
///
/// Owns the driver client; call [`BookStore::shutdown`] once at the end of a run.
#[derive(Clone)]
pub struct BookStore {
    client: Client,
    database: Database,
    books: Collection<Book>,
}

impl BookStore {
    /// Connects and pings the server so an unreachable server fails here
    /// rather than on the first query.
    pub async fn connect(settings: &Settings) -> Result<Self, StoreError> {
        let connect_error = |source: mongodb::error::Error| StoreError::Connect {
            uri: settings.redacted_uri(),
            source,
        };

        let client = Client::with_uri_str(&settings.uri)
            .await
            .map_err(connect_error)?;
        let database = client.database(&settings.database);
        if let Err(source) = database.run_command(doc! { "ping": 1 }).await {
            drop(database);
            client.shutdown().await;
            return Err(connect_error(source));
        }

        info!("Connected to {}", settings.redacted_uri());

        let books = database.collection::<Book>(&settings.collection);
        Ok(Self {
            client,
            database,
            books,
        })
    }

    /// `database.collection` of the books collection.
    pub fn namespace(&self) -> String {
        self.books.namespace().to_string()
    }

    /// Releases the client's connections and background tasks.
    pub async fn shutdown(self) {
        let Self { client, .. } = self;
        client.shutdown().await;
        debug!("Client shut down");
    }

    /// Removes every document. Returns the number removed.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = self
            .books
            .delete_many(doc! {})
            .await
            .map_err(StoreError::write("delete_many"))?;
        Ok(result.deleted_count)
    }

    /// Inserts `books` in one batch. Returns the number inserted.
    pub async fn insert_books(&self, books: &[Book]) -> Result<usize, StoreError> {
        if books.is_empty() {
            return Ok(0);
        }
        let result = self
            .books
            .insert_many(books)
            .await
            .map_err(StoreError::write("insert_many"))?;
        Ok(result.inserted_ids.len())
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.books
            .count_documents(doc! {})
            .await
            .map_err(StoreError::read("count_documents"))
    }

    /// Full book documents matching `filter`, in natural order.
    pub async fn find_books(&self, filter: Document) -> Result<Vec<Book>, StoreError> {
        let cursor = self
            .books
            .find(filter)
            .await
            .map_err(StoreError::read("find"))?;
        cursor
            .try_collect::<Vec<_>>()
            .await
            .map_err(StoreError::read("find"))
    }

    /// Runs `query`, decoding each (usually projected) document as `R`.
    pub async fn find_projected<R>(&self, query: FindQuery) -> Result<Vec<R>, StoreError>
    where
        R: DeserializeOwned + Unpin + Send + Sync,
    {
        let collection = self.books.clone_with_type::<R>();
        let mut find = collection.find(query.filter);
        if let Some(projection) = query.projection {
            find = find.projection(projection);
        }
        if let Some(sort) = query.sort {
            find = find.sort(sort);
        }
        if let Some(skip) = query.skip {
            find = find.skip(skip);
        }
        if let Some(limit) = query.limit {
            find = find.limit(limit);
        }

        let cursor = find.await.map_err(StoreError::read("find"))?;
        cursor
            .try_collect::<Vec<_>>()
            .await
            .map_err(StoreError::read("find"))
    }

    /// Sets the price of the first book titled `title`.
    pub async fn update_price(&self, title: &str, price: f64) -> Result<UpdateSummary, StoreError> {
        let result = self
            .books
            .update_one(queries::title_is(title), queries::set_price(price))
            .await
            .map_err(StoreError::write("update_one"))?;
        Ok(UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    /// Deletes the first book titled `title`. Returns the number deleted (0 or 1).
    pub async fn delete_by_title(&self, title: &str) -> Result<u64, StoreError> {
        let result = self
            .books
            .delete_one(queries::title_is(title))
            .await
            .map_err(StoreError::write("delete_one"))?;
        Ok(result.deleted_count)
    }

    /// Runs an aggregation pipeline and decodes each output document as `R`.
    pub async fn aggregate<R: DeserializeOwned>(
        &self,
        pipeline: Vec<Document>,
    ) -> Result<Vec<R>, StoreError> {
        let cursor = self
            .books
            .aggregate(pipeline)
            .await
            .map_err(StoreError::read("aggregate"))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(StoreError::read("aggregate"))?;

        documents
            .into_iter()
            .map(|document| bson::from_document(document).map_err(StoreError::from))
            .collect()
    }

    /// Drops the index called `name`.
    ///
    /// Returns `Ok(false)` when the index or the collection does not exist.
    pub async fn drop_index_if_exists(&self, name: &str) -> Result<bool, StoreError> {
        match self.books.drop_index(name).await {
            Ok(()) => Ok(true),
            Err(err) if is_missing_index_error(&err) => {
                debug!("Index {name} not present");
                Ok(false)
            }
            Err(err) => Err(StoreError::index(name)(err)),
        }
    }

    /// Creates `title_idx` and `author_year_idx`. Returns the index names.
    pub async fn create_indexes(&self) -> Result<Vec<String>, StoreError> {
        let result = self
            .books
            .create_indexes(queries::index_models())
            .await
            .map_err(StoreError::index("title_idx, author_year_idx"))?;
        Ok(result.index_names)
    }

    pub async fn index_names(&self) -> Result<Vec<String>, StoreError> {
        self.books
            .list_index_names()
            .await
            .map_err(StoreError::read("list_indexes"))
    }

    /// Explains a `find` on `filter` with `executionStats` verbosity.
    ///
    /// Returns the raw explain document; see [`crate::explain::winning_plan`].
    pub async fn explain_find(&self, filter: Document) -> Result<Document, StoreError> {
        let command = doc! {
            "explain": {
                "find": self.books.name(),
                "filter": filter,
            },
            "verbosity": "executionStats",
        };
        self.database
            .run_command(command)
            .await
            .map_err(StoreError::read("explain"))
    }

    /// Drops the whole database. Used to clean up throwaway test databases.
    pub async fn drop_database(&self) -> Result<(), StoreError> {
        self.database
            .drop()
            .await
            .map_err(StoreError::write("drop_database"))
    }
}
