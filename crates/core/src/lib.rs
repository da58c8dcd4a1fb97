pub mod book;
pub mod config;
pub mod memorized;
pub mod metrics;
pub mod popular;
pub mod service;
pub mod source;
pub mod testing;

pub use book::{Book, POPULAR_LIMIT, SEARCH_LIMIT};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, CacheConfig,
    Config, ConfigError, DatabaseConfig, SanitizedConfig, ServerConfig, SourceConfig,
};
pub use memorized::{MemorizedBook, MemorizedStore, SqliteMemorizedStore, StoreError};
pub use popular::PopularCache;
pub use service::{CatalogError, CatalogErrorKind, CatalogService};
pub use source::{RecordSource, RoyalRoadSource, SourceError};
