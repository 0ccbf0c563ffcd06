use std::env;

use crate::adapters::HttpConfig;

#[cfg(feature = "tracing")]
use tracing::warn;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Process configuration. Defaults match a plain local run; each field can be
/// overridden from the environment or a `.env` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Reads `TODO_LISTEN_ADDR`, `DATABASE_URL` and `TODO_MAX_CONNECTIONS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(addr) = lookup("TODO_LISTEN_ADDR") {
            config.http.addr = addr;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(raw) = lookup("TODO_MAX_CONNECTIONS") {
            match raw.parse::<u32>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => {
                    #[cfg(feature = "tracing")]
                    warn!(value = %raw, "Ignoring invalid TODO_MAX_CONNECTIONS");
                }
            }
        }
        config
    }
}
