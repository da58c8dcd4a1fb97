//! In-memory popular snapshot with single-flight population.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::book::{Book, POPULAR_LIMIT};
use crate::metrics::POPULAR_SNAPSHOT_SIZE;
use crate::source::{RecordSource, SourceError};

#[derive(Debug, Default)]
struct Snapshot {
    books: Vec<Book>,
    /// Error from the most recent fetch, cleared by the next success.
    last_error: Option<SourceError>,
}

/// Holds the current popular snapshot and coordinates fetches into it.
///
/// Readers share the lock; populate and refresh hold it exclusively for the
/// whole fetch-and-swap, so at most one fetch is in flight per cache. Every
/// read hands out a copy of the snapshot.
pub struct PopularCache {
    source: Arc<dyn RecordSource>,
    snapshot: RwLock<Snapshot>,
    /// Completed fetches. Bumped under the write lock, read before any lock
    /// so callers can tell whether a fetch finished while they waited.
    fetches: AtomicU64,
}

impl PopularCache {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Snapshot::default()),
            fetches: AtomicU64::new(0),
        }
    }

    /// Return the current snapshot, populating it first if it is empty.
    ///
    /// Concurrent callers on an empty cache collapse into one fetch and all
    /// observe its outcome. A failed populate leaves the cache empty, so the
    /// next call fetches again.
    pub async fn get_or_populate(&self) -> Result<Vec<Book>, SourceError> {
        let seen = self.fetches.load(Ordering::Acquire);

        {
            let snapshot = self.snapshot.read().await;
            if !snapshot.books.is_empty() {
                return Ok(snapshot.books.clone());
            }
        }

        let mut snapshot = self.snapshot.write().await;
        if !snapshot.books.is_empty() {
            return Ok(snapshot.books.clone());
        }

        // A fetch completed while we were queued: share its outcome.
        if self.fetches.load(Ordering::Acquire) != seen {
            debug!("Popular cache populated by a concurrent caller");
            return match &snapshot.last_error {
                Some(err) => Err(err.clone()),
                None => Ok(snapshot.books.clone()),
            };
        }

        info!(source = self.source.name(), "Populating popular cache");
        let result = self.source.fetch_popular().await;
        self.fetches.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(books) => {
                Self::replace(&mut snapshot, books);
                Ok(snapshot.books.clone())
            }
            Err(e) => {
                warn!(error = %e, "Failed to populate popular cache");
                snapshot.books.clear();
                snapshot.last_error = Some(e.clone());
                POPULAR_SNAPSHOT_SIZE.set(0);
                Err(e)
            }
        }
    }

    /// Fetch a fresh snapshot and replace the stored one.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn refresh(&self) -> Result<Vec<Book>, SourceError> {
        let mut snapshot = self.snapshot.write().await;

        info!(source = self.source.name(), "Refreshing popular cache");
        let result = self.source.fetch_popular().await;
        self.fetches.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(books) => {
                Self::replace(&mut snapshot, books);
                Ok(snapshot.books.clone())
            }
            Err(e) => {
                warn!(
                    error = %e,
                    kept = snapshot.books.len(),
                    "Refresh failed, keeping previous popular snapshot"
                );
                snapshot.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Entries whose title contains `query`, ignoring case, in snapshot order.
    ///
    /// An empty query returns the whole snapshot. Never fetches.
    pub async fn search_cached(&self, query: &str) -> Vec<Book> {
        if query.is_empty() {
            return self.snapshot().await;
        }

        let snapshot = self.snapshot.read().await;
        let needle = query.to_lowercase();
        snapshot
            .books
            .iter()
            .filter(|book| book.title_contains_lower(&needle))
            .cloned()
            .collect()
    }

    /// Copy of the current snapshot without populating.
    pub async fn snapshot(&self) -> Vec<Book> {
        self.snapshot.read().await.books.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshot.read().await.books.is_empty()
    }

    fn replace(snapshot: &mut Snapshot, mut books: Vec<Book>) {
        books.truncate(POPULAR_LIMIT);
        info!(count = books.len(), "Popular snapshot replaced");
        POPULAR_SNAPSHOT_SIZE.set(books.len() as i64);
        snapshot.books = books;
        snapshot.last_error = None;
    }
}

impl std::fmt::Debug for PopularCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopularCache")
            .field("source", &self.source.name())
            .field("fetches", &self.fetches.load(Ordering::Relaxed))
            .finish()
    }
}
