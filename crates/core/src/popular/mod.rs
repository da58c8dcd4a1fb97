//! Popular cache - the in-memory snapshot of the site's popular listing.
//!
//! The snapshot is populated lazily on first read (or by a startup prefetch),
//! replaced wholesale on refresh, and never persisted.

mod cache;

pub use cache::PopularCache;
