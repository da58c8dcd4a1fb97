//! Types for the memorized store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::book::Book;

/// A book the user pinned, stamped with when it was memorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorizedBook {
    /// Unique key within the store.
    pub title: String,
    pub link: String,
    pub memorized_at: DateTime<Utc>,
}

impl MemorizedBook {
    pub fn to_book(&self) -> Book {
        Book::new(self.title.clone(), self.link.clone())
    }
}

impl From<MemorizedBook> for Book {
    fn from(entry: MemorizedBook) -> Self {
        Book::new(entry.title, entry.link)
    }
}

/// Errors for memorized store operations.
///
/// `Unavailable` means the durable medium could not be used; the other
/// variants are logical outcomes of a reachable store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Book '{0}' is already memorized")]
    DuplicateTitle(String),

    #[error("Book '{0}' is not memorized")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
