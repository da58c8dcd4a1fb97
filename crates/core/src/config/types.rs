use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8090
}

/// Database configuration (memorized books)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shelf.db")
}

/// Remote listing site configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Site root, e.g. "https://www.royalroad.com"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.royalroad.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RoyalRoadBot/1.0)".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Popular cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Fetch the popular listing at startup instead of on first request
    #[serde(default = "default_prefetch")]
    pub prefetch: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefetch: default_prefetch(),
        }
    }
}

fn default_prefetch() -> bool {
    true
}

/// Config view for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub source: SanitizedSourceConfig,
    pub cache: CacheConfig,
    pub database_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourceConfig {
    pub base_url: String,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            source: SanitizedSourceConfig {
                base_url: config.source.base_url.clone(),
                timeout_secs: config.source.timeout_secs,
            },
            cache: config.cache.clone(),
            database_configured: !config.database.path.as_os_str().is_empty(),
        }
    }
}
