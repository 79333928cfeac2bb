use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SymdexError;
use crate::format::TableFormat;
use crate::index::TableSource;
use crate::Result;

/// Index settings configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub source: TableSource,
    /// Results returned when a query gives no limit
    pub default_limit: usize,
    /// Upper bound on any requested limit
    pub max_limit: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            source: TableSource::directory("docs/html/search", "all"),
            default_limit: 20,
            max_limit: 500,
        }
    }
}

impl IndexSettings {
    /// Clamp a requested limit to the configured bounds
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub http_port: u16,
    /// Allow cross-origin requests from any site
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            http_port: 8080,
            permissive_cors: true,
        }
    }
}

impl ServerConfig {
    /// `host:port` the listener binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }
}

/// Top-level configuration, as read from a TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub index: IndexSettings,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Read a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
            .map_err(|e| SymdexError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML configuration text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| SymdexError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.max_limit == 0 {
            return Err(SymdexError::Config("index.max_limit must be positive".to_string()));
        }
        if let TableSource::Directory { category, .. } = &self.index.source {
            if category.is_empty() || !category.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(SymdexError::Config(format!(
                    "invalid search table category '{}'",
                    category
                )));
            }
        }
        Ok(())
    }

    /// Serve a single table file
    pub fn with_table_file(mut self, path: impl Into<PathBuf>, format: TableFormat) -> Self {
        self.index.source = TableSource::file(path, format);
        self
    }

    /// Serve one category of a Doxygen `search/` directory
    pub fn with_search_dir(mut self, path: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        self.index.source = TableSource::directory(path, category);
        self
    }

    pub fn with_http_port(mut self, port: u16) -> Self {
        self.server.http_port = port;
        self
    }

    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.server.bind_addr = addr.into();
        self
    }
}
