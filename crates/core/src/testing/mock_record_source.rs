//! Mock record source for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::book::Book;
use crate::source::{RecordSource, SourceError};

/// Mock implementation of the RecordSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable popular and search listings (verbatim, uncapped)
/// - Count popular fetches and record search queries
/// - Simulate a one-shot failure and fetch latency
///
/// # Example
///
/// ```rust,ignore
/// use shelf_core::testing::{MockRecordSource, fixtures};
///
/// let source = MockRecordSource::with_popular(fixtures::numbered_books(3));
/// source.set_next_error(SourceError::Timeout).await;
///
/// assert!(source.fetch_popular().await.is_err());
/// assert_eq!(source.fetch_popular().await?.len(), 3);
/// assert_eq!(source.popular_calls(), 2);
/// ```
pub struct MockRecordSource {
    /// Books returned by `fetch_popular`.
    popular: Arc<RwLock<Vec<Book>>>,
    /// Books returned by `fetch_search`.
    search_results: Arc<RwLock<Vec<Book>>>,
    /// If set, the next fetch of either kind fails with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
    /// Simulated latency applied to every fetch.
    delay: Arc<RwLock<Option<Duration>>>,
    /// Number of `fetch_popular` calls, including failed ones.
    popular_calls: AtomicUsize,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<String>>>,
}

impl std::fmt::Debug for MockRecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRecordSource")
            .field("popular_calls", &self.popular_calls())
            .finish_non_exhaustive()
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecordSource {
    /// Create a new mock source with empty listings.
    pub fn new() -> Self {
        Self::with_popular(Vec::new())
    }

    /// Create a mock source with a predefined popular listing.
    pub fn with_popular(popular: Vec<Book>) -> Self {
        Self {
            popular: Arc::new(RwLock::new(popular)),
            search_results: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
            popular_calls: AtomicUsize::new(0),
            searches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the popular listing for subsequent fetches.
    pub async fn set_popular(&self, books: Vec<Book>) {
        *self.popular.write().await = books;
    }

    /// Set the search results for subsequent searches.
    pub async fn set_search_results(&self, books: Vec<Book>) {
        *self.search_results.write().await = books;
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every fetch by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Number of popular fetches performed.
    pub fn popular_calls(&self) -> usize {
        self.popular_calls.load(Ordering::SeqCst)
    }

    /// Search queries received, in order.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    async fn simulate(&self) -> Result<(), SourceError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_popular(&self) -> Result<Vec<Book>, SourceError> {
        self.popular_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        Ok(self.popular.read().await.clone())
    }

    async fn fetch_search(&self, query: &str) -> Result<Vec<Book>, SourceError> {
        self.searches.write().await.push(query.to_string());
        self.simulate().await?;
        Ok(self.search_results.read().await.clone())
    }
}
