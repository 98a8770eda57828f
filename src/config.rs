//! Runtime configuration.

use std::path::PathBuf;

use anyhow::Result;

use crate::auth::Latency;
use crate::storage::{SqliteStore, StorageAdapter};

pub const DEFAULT_PORT: u16 = 3000;
/// Dev server of the web front end.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Service configuration loaded from environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP port (from TICKET_DESK_PORT)
    pub port: u16,
    /// Database file (from TICKET_DESK_DB); `None` uses the platform data directory
    pub db_path: Option<PathBuf>,
    /// Keep the key-value area in memory instead of on disk
    pub in_memory: bool,
    /// Delay before login/signup resolve (from TICKET_DESK_LATENCY_MS)
    pub latency: Latency,
    /// Origins allowed to call the API cross-origin (from TICKET_DESK_CORS_ORIGINS, comma-separated)
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: None,
            in_memory: false,
            latency: Latency::default(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables. Unparsable values fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("TICKET_DESK_PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let db_path = lookup("TICKET_DESK_DB")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let latency = lookup("TICKET_DESK_LATENCY_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Latency::from_millis)
            .unwrap_or(defaults.latency);

        let cors_origins = lookup("TICKET_DESK_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            port,
            db_path,
            in_memory: false,
            latency,
            cors_origins,
        }
    }

    /// Open and migrate the configured key-value area.
    pub fn open_storage(&self) -> Result<StorageAdapter> {
        let store = if self.in_memory {
            SqliteStore::open_memory()?
        } else if let Some(path) = &self.db_path {
            tracing::debug!(path = %path.display(), "Opening storage");
            SqliteStore::open(path.clone())?
        } else {
            SqliteStore::open_default()?
        };
        store.migrate()?;
        Ok(StorageAdapter::new(store))
    }
}
