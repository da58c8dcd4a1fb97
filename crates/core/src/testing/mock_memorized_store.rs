//! Mock memorized store for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::book::Book;
use crate::memorized::{
    validate_book, validate_title, MemorizedBook, MemorizedStore, StoreError,
};

#[derive(Debug, Default)]
struct Entries {
    /// (insertion sequence, entry)
    rows: Vec<(u64, MemorizedBook)>,
    next_seq: u64,
}

/// In-memory implementation of the MemorizedStore trait.
///
/// Honors the same contract as `SqliteMemorizedStore` and can simulate an
/// unreachable medium with `set_unavailable(true)`.
#[derive(Debug, Default)]
pub struct MockMemorizedStore {
    entries: Mutex<Entries>,
    unavailable: AtomicBool,
}

impl MockMemorizedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<MutexGuard<'_, Entries>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store offline".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("mock store lock poisoned".to_string()))
    }
}

impl MemorizedStore for MockMemorizedStore {
    fn insert_if_absent(&self, book: &Book) -> Result<MemorizedBook, StoreError> {
        validate_book(book)?;
        let mut entries = self.entries()?;

        if entries.rows.iter().any(|(_, e)| e.title == book.title) {
            return Err(StoreError::DuplicateTitle(book.title.clone()));
        }

        let entry = MemorizedBook {
            title: book.title.clone(),
            link: book.link.clone(),
            memorized_at: Utc::now(),
        };
        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.rows.push((seq, entry.clone()));
        Ok(entry)
    }

    fn list_by_recency(&self) -> Result<Vec<MemorizedBook>, StoreError> {
        let entries = self.entries()?;
        let mut rows = entries.rows.clone();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.memorized_at
                .cmp(&a.memorized_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(rows.into_iter().map(|(_, e)| e).collect())
    }

    fn remove_by_title(&self, title: &str) -> Result<(), StoreError> {
        validate_title(title)?;
        let mut entries = self.entries()?;

        let before = entries.rows.len();
        entries.rows.retain(|(_, e)| e.title != title);
        if entries.rows.len() == before {
            return Err(StoreError::NotFound(title.to_string()));
        }
        Ok(())
    }

    fn contains(&self, title: &str) -> Result<bool, StoreError> {
        let entries = self.entries()?;
        Ok(entries.rows.iter().any(|(_, e)| e.title == title))
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.entries()?.rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_basics() {
        let store = MockMemorizedStore::new();
        store.insert_if_absent(&Book::new("A", "a")).unwrap();
        store.insert_if_absent(&Book::new("B", "b")).unwrap();

        assert_eq!(
            store.insert_if_absent(&Book::new("A", "a2")),
            Err(StoreError::DuplicateTitle("A".to_string()))
        );

        let titles: Vec<_> = store
            .list_by_recency()
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);

        assert_eq!(
            store.remove_by_title("C"),
            Err(StoreError::NotFound("C".to_string()))
        );
        store.remove_by_title("A").unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_unavailable_toggle() {
        let store = MockMemorizedStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.count(), Err(StoreError::Unavailable(_))));

        store.set_unavailable(false);
        assert_eq!(store.count().unwrap(), 0);
    }
}
