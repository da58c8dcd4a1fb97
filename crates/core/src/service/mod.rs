//! Catalog service - wires the record source, popular cache and memorized
//! store together behind the operations the HTTP layer exposes.

mod types;

pub use types::*;

use std::sync::Arc;

use tracing::{info, warn};

use crate::book::Book;
use crate::memorized::{MemorizedBook, MemorizedStore, StoreError};
use crate::metrics::MEMORIZE_ATTEMPTS;
use crate::popular::PopularCache;
use crate::source::RecordSource;

/// Orchestrates the catalog operations.
pub struct CatalogService {
    source: Arc<dyn RecordSource>,
    popular: Arc<PopularCache>,
    memorized: Arc<dyn MemorizedStore>,
}

impl CatalogService {
    /// Build a service with a fresh popular cache over `source`.
    pub fn new(source: Arc<dyn RecordSource>, memorized: Arc<dyn MemorizedStore>) -> Self {
        let popular = Arc::new(PopularCache::new(Arc::clone(&source)));
        Self {
            source,
            popular,
            memorized,
        }
    }

    pub fn popular_cache(&self) -> &PopularCache {
        &self.popular
    }

    /// Populate the popular cache ahead of the first request.
    ///
    /// Failures are logged and swallowed; the first read will try again.
    pub async fn prefetch(&self) {
        match self.popular.get_or_populate().await {
            Ok(books) => info!(count = books.len(), "Prefetched popular books"),
            Err(e) => warn!(error = %e, "Failed to prefetch popular books"),
        }
    }

    /// The popular snapshot, fetching it if the cache is empty.
    pub async fn popular(&self) -> Result<Vec<Book>, CatalogError> {
        Ok(self.popular.get_or_populate().await?)
    }

    /// Re-fetch the popular listing, keeping the old one on failure.
    pub async fn refresh_popular(&self) -> Result<Vec<Book>, CatalogError> {
        Ok(self.popular.refresh().await?)
    }

    /// Filter the cached popular snapshot by title.
    pub async fn filter_popular(&self, query: &str) -> Vec<Book> {
        self.popular.search_cached(query.trim()).await
    }

    /// Search the live site. Results are never cached.
    ///
    /// A blank query returns nothing without contacting the site.
    pub async fn search_site(&self, query: &str) -> Result<Vec<Book>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        match self.source.fetch_search(query).await {
            Ok(books) => {
                info!(query = query, count = books.len(), "Site search completed");
                Ok(books)
            }
            Err(e) => {
                warn!(query = query, error = %e, "Site search failed");
                Err(e.into())
            }
        }
    }

    /// Pin a book into the memorized store.
    pub fn memorize(&self, book: &Book) -> Result<MemorizedBook, CatalogError> {
        let book = Book::new(book.title.trim(), book.link.trim());

        let result = self.memorized.insert_if_absent(&book);
        let label = match &result {
            Ok(_) => "stored",
            Err(StoreError::DuplicateTitle(_)) => "duplicate",
            Err(StoreError::InvalidInput(_)) => "invalid",
            Err(_) => "unavailable",
        };
        MEMORIZE_ATTEMPTS.with_label_values(&[label]).inc();

        match result {
            Ok(entry) => {
                info!(title = %entry.title, "Memorized book");
                Ok(entry)
            }
            Err(e) => {
                warn!(title = %book.title, error = %e, "Failed to memorize book");
                Err(e.into())
            }
        }
    }

    /// Memorized books, newest first.
    pub fn memorized(&self) -> Result<Vec<MemorizedBook>, CatalogError> {
        self.memorized.list_by_recency().map_err(|e| {
            warn!(error = %e, "Failed to load memorized books");
            e.into()
        })
    }

    /// Whether a title is already memorized.
    pub fn is_memorized(&self, title: &str) -> Result<bool, CatalogError> {
        Ok(self.memorized.contains(title.trim())?)
    }

    pub fn memorized_count(&self) -> Result<u64, CatalogError> {
        Ok(self.memorized.count()?)
    }

    /// Remove a memorized book by title.
    pub fn forget(&self, title: &str) -> Result<(), CatalogError> {
        let title = title.trim();
        match self.memorized.remove_by_title(title) {
            Ok(()) => {
                info!(title = title, "Removed memorized book");
                Ok(())
            }
            Err(e) => {
                warn!(title = title, error = %e, "Failed to remove memorized book");
                Err(e.into())
            }
        }
    }
}
