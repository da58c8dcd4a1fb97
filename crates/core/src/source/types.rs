//! Types for the record source abstraction.

use async_trait::async_trait;
use thiserror::Error;

use crate::book::Book;

/// Errors that can occur while fetching listings from the remote site.
///
/// Messages are captured as strings so one failure can be handed to every
/// caller waiting on the same fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Trait for backends that turn remote listing pages into `Book` records.
///
/// Implementations drop records with a blank title or link and cap their
/// output (`POPULAR_LIMIT` for popular, `SEARCH_LIMIT` for search). A page
/// without matching markup is an empty `Ok`, not an error.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Fetch the current popular listing.
    async fn fetch_popular(&self) -> Result<Vec<Book>, SourceError>;

    /// Run a free-text title search on the remote site.
    async fn fetch_search(&self, query: &str) -> Result<Vec<Book>, SourceError>;
}
