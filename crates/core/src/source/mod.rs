//! Record source abstraction.
//!
//! A `RecordSource` turns a remote listing or search page into an ordered,
//! length-capped list of `Book` records. `RoyalRoadSource` is the HTTP
//! implementation; tests use `testing::MockRecordSource`.

mod royalroad;
mod types;

pub use royalroad::{parse_popular, parse_search, RoyalRoadSource};
pub use types::*;
