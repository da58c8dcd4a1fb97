//! The `Book` record shared by every component.

use serde::{Deserialize, Serialize};

/// Maximum number of entries in the popular snapshot.
pub const POPULAR_LIMIT: usize = 10;

/// Maximum number of results returned by a live site search.
pub const SEARCH_LIMIT: usize = 15;

/// A single fiction listing: its title and a link to its page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub link: String,
}

impl Book {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Both fields must be non-blank for a record to enter the catalog.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.link.trim().is_empty()
    }

    /// Case-insensitive substring match on the title.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn title_contains_lower(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
    }
}
