//! Memorized store - books the user pinned for later.
//!
//! Titles are unique. Entries are immutable once stored and are listed
//! newest first.

mod sqlite;
mod types;

pub use sqlite::SqliteMemorizedStore;
pub use types::*;

use crate::book::Book;

/// Trait for memorized book storage.
pub trait MemorizedStore: Send + Sync {
    /// Store `book` stamped with the current time.
    ///
    /// Fails with `InvalidInput` for a blank title or link (checked first),
    /// and with `DuplicateTitle` if the title is already stored. Concurrent
    /// inserts of the same title never both succeed.
    fn insert_if_absent(&self, book: &Book) -> Result<MemorizedBook, StoreError>;

    /// All entries, most recently memorized first.
    ///
    /// Entries with equal timestamps come back latest insert first.
    fn list_by_recency(&self) -> Result<Vec<MemorizedBook>, StoreError>;

    /// Delete the entry with this title.
    ///
    /// Fails with `InvalidInput` for a blank title and `NotFound` if absent.
    fn remove_by_title(&self, title: &str) -> Result<(), StoreError>;

    /// Check whether a title is memorized.
    fn contains(&self, title: &str) -> Result<bool, StoreError>;

    /// Number of memorized entries.
    fn count(&self) -> Result<u64, StoreError>;
}

/// Reject books that may not enter the store.
pub(crate) fn validate_book(book: &Book) -> Result<(), StoreError> {
    if book.title.trim().is_empty() || book.link.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "book title and link cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "book title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
