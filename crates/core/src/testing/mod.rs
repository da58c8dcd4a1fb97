//! Testing utilities and mock implementations.
//!
//! Mocks implement the same traits as the production backends so the cache,
//! the service and the HTTP layer can be exercised without network access or
//! a database file.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_core::testing::{fixtures, MockMemorizedStore, MockRecordSource};
//!
//! let source = Arc::new(MockRecordSource::with_popular(fixtures::numbered_books(5)));
//! let store = Arc::new(MockMemorizedStore::new());
//! let service = CatalogService::new(source.clone(), store.clone());
//! ```

mod mock_memorized_store;
mod mock_record_source;

pub use mock_memorized_store::MockMemorizedStore;
pub use mock_record_source::MockRecordSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::book::Book;

    /// A book with a Royal Road style link.
    pub fn book(title: &str, id: u32) -> Book {
        Book::new(title, format!("https://www.royalroad.com/fiction/{}", id))
    }

    /// `count` books titled "Book 1", "Book 2", ... in order.
    pub fn numbered_books(count: usize) -> Vec<Book> {
        (1..=count)
            .map(|i| book(&format!("Book {}", i), i as u32))
            .collect()
    }
}
