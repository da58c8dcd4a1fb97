//! SQLite-backed memorized store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, types::Type, Connection};

use super::{validate_book, validate_title, MemorizedBook, MemorizedStore, StoreError};
use crate::book::Book;

/// SQLite-backed memorized store.
///
/// The connection mutex serializes every operation, and the `UNIQUE` title
/// column makes check-and-insert a single statement.
pub struct SqliteMemorizedStore {
    conn: Mutex<Connection>,
}

impl SqliteMemorizedStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(unavailable)?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(unavailable)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS memorized_books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL UNIQUE,
                link TEXT NOT NULL,
                memorized_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_memorized_books_memorized_at
                ON memorized_books(memorized_at DESC);
            "#,
        )
        .map_err(unavailable)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    /// Insert with an explicit timestamp instead of the current time.
    pub fn insert_at(
        &self,
        book: &Book,
        memorized_at: DateTime<Utc>,
    ) -> Result<MemorizedBook, StoreError> {
        validate_book(book)?;
        // Stored with microsecond precision; return exactly what is stored.
        let memorized_at = memorized_at.trunc_subsecs(6);
        let conn = self.conn()?;

        let inserted = conn
            .execute(
                "INSERT INTO memorized_books (title, link, memorized_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(title) DO NOTHING",
                params![
                    &book.title,
                    &book.link,
                    memorized_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )
            .map_err(unavailable)?;

        if inserted == 0 {
            return Err(StoreError::DuplicateTitle(book.title.clone()));
        }

        Ok(MemorizedBook {
            title: book.title.clone(),
            link: book.link.clone(),
            memorized_at,
        })
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<MemorizedBook> {
        let memorized_at_str: String = row.get(2)?;
        let memorized_at = DateTime::parse_from_rfc3339(&memorized_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

        Ok(MemorizedBook {
            title: row.get(0)?,
            link: row.get(1)?,
            memorized_at,
        })
    }
}

impl MemorizedStore for SqliteMemorizedStore {
    fn insert_if_absent(&self, book: &Book) -> Result<MemorizedBook, StoreError> {
        self.insert_at(book, Utc::now())
    }

    fn list_by_recency(&self) -> Result<Vec<MemorizedBook>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT title, link, memorized_at FROM memorized_books
                 ORDER BY memorized_at DESC, id DESC",
            )
            .map_err(unavailable)?;

        let rows = stmt
            .query_map([], Self::row_to_entry)
            .map_err(unavailable)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(unavailable)?);
        }
        Ok(entries)
    }

    fn remove_by_title(&self, title: &str) -> Result<(), StoreError> {
        validate_title(title)?;
        let conn = self.conn()?;

        let rows_affected = conn
            .execute(
                "DELETE FROM memorized_books WHERE title = ?",
                params![title],
            )
            .map_err(unavailable)?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(title.to_string()));
        }

        Ok(())
    }

    fn contains(&self, title: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM memorized_books WHERE title = ?",
                params![title],
                |row| row.get(0),
            )
            .map_err(unavailable)?;

        Ok(count > 0)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM memorized_books", [], |row| row.get(0))
            .map_err(unavailable)?;

        Ok(count as u64)
    }
}

fn unavailable(e: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn create_test_store() -> SqliteMemorizedStore {
        SqliteMemorizedStore::in_memory().unwrap()
    }

    fn book(title: &str) -> Book {
        Book::new(title, format!("https://www.royalroad.com/fiction/{}", title.len()))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn titles(entries: &[MemorizedBook]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_insert_and_list() {
        let store = create_test_store();
        let entry = store.insert_if_absent(&book("Super Supportive")).unwrap();

        assert_eq!(entry.title, "Super Supportive");
        let entries = store.list_by_recency().unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_insert_at_returns_stored_timestamp() {
        let store = create_test_store();
        let precise = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();

        let entry = store.insert_at(&book("Beware of Chicken"), precise).unwrap();
        assert_eq!(entry.memorized_at.timestamp_subsec_nanos(), 123_456_000);

        let entries = store.list_by_recency().unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_insert_duplicate_title_fails() {
        let store = create_test_store();
        store.insert_if_absent(&book("Azarinth Healer")).unwrap();

        let result = store.insert_if_absent(&Book::new("Azarinth Healer", "https://other"));
        assert_eq!(
            result,
            Err(StoreError::DuplicateTitle("Azarinth Healer".to_string()))
        );

        let entries = store.list_by_recency().unwrap();
        assert_eq!(entries.len(), 1);
        assert_ne!(entries[0].link, "https://other");
    }

    #[test]
    fn test_insert_validates_before_duplicate_check() {
        let store = create_test_store();
        store.insert_if_absent(&book("Taken")).unwrap();

        let result = store.insert_if_absent(&Book::new("Taken", ""));
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));

        let result = store.insert_if_absent(&Book::new("  ", "https://x"));
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_list_newest_first() {
        let store = create_test_store();
        store.insert_at(&book("A"), at(1)).unwrap();
        store.insert_at(&book("B"), at(2)).unwrap();
        store.insert_at(&book("C"), at(3)).unwrap();

        let entries = store.list_by_recency().unwrap();
        assert_eq!(titles(&entries), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_list_ties_are_deterministic() {
        let store = create_test_store();
        store.insert_at(&book("First"), at(5)).unwrap();
        store.insert_at(&book("Second"), at(5)).unwrap();
        store.insert_at(&book("Older"), at(1)).unwrap();

        let first = store.list_by_recency().unwrap();
        let second = store.list_by_recency().unwrap();
        assert_eq!(first, second);
        assert_eq!(titles(&first), vec!["Second", "First", "Older"]);
    }

    #[test]
    fn test_sequential_inserts_list_newest_first() {
        let store = create_test_store();
        for title in ["A", "B", "C"] {
            store.insert_if_absent(&book(title)).unwrap();
        }

        let entries = store.list_by_recency().unwrap();
        assert_eq!(titles(&entries), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_remove_by_title() {
        let store = create_test_store();
        store.insert_if_absent(&book("Keep")).unwrap();
        store.insert_if_absent(&book("Drop")).unwrap();

        store.remove_by_title("Drop").unwrap();

        let entries = store.list_by_recency().unwrap();
        assert_eq!(titles(&entries), vec!["Keep"]);
        assert!(!store.contains("Drop").unwrap());
    }

    #[test]
    fn test_remove_nonexistent() {
        let store = create_test_store();
        let result = store.remove_by_title("Never Inserted");
        assert_eq!(
            result,
            Err(StoreError::NotFound("Never Inserted".to_string()))
        );
    }

    #[test]
    fn test_remove_blank_title() {
        let store = create_test_store();
        let result = store.remove_by_title("");
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));
    }

    #[test]
    fn test_title_can_be_memorized_again_after_remove() {
        let store = create_test_store();
        store.insert_if_absent(&book("Again")).unwrap();
        store.remove_by_title("Again").unwrap();
        store.insert_if_absent(&book("Again")).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_inserts_same_title() {
        let store = Arc::new(create_test_store());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.insert_if_absent(&book("Contested")))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::DuplicateTitle(_))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shelf.db");

        {
            let store = SqliteMemorizedStore::new(&path).unwrap();
            store.insert_if_absent(&book("Durable")).unwrap();
        }

        let store = SqliteMemorizedStore::new(&path).unwrap();
        assert!(store.contains("Durable").unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_unreachable_path_is_unavailable() {
        let result = SqliteMemorizedStore::new(Path::new("/nonexistent/dir/shelf.db"));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
