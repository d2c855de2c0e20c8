//! Configuration management for crm-joins.
//!
//! Handles loading configuration from TOML files and environment variables,
//! with support for named store connections and display settings.

use crate::error::{JoinsError, Result};
use crate::render::OutputFormat;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable consulted when no store is configured elsewhere.
pub const DATABASE_ENV_VAR: &str = "CRM_JOINS_DATABASE";

/// Main configuration structure for crm-joins.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// How results are printed.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Named store connections.
    #[serde(default)]
    pub connections: HashMap<String, StoreConfig>,
}

/// Display settings for printed results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of rows shown per result (the lesson's "head").
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Maximum width of a rendered column before truncation.
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,

    /// Default output format.
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_preview_rows() -> usize {
    5
}

fn default_max_column_width() -> usize {
    40
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            max_column_width: default_max_column_width(),
            output: OutputFormat::default(),
        }
    }
}

/// Location of a relational store.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Creates a store config for the given file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Creates a store config from a connection string.
    ///
    /// Accepts `sqlite:relative.db`, `sqlite://relative.db`,
    /// `sqlite:///absolute/path.db`, or a bare file path.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        if !conn_str.contains(':') || !conn_str.starts_with("sqlite") {
            if looks_like_url(conn_str) {
                let scheme = conn_str.split(':').next().unwrap_or_default();
                return Err(JoinsError::config(format!(
                    "Invalid scheme '{scheme}'. Expected 'sqlite'"
                )));
            }
            return Ok(Self::from_path(conn_str));
        }

        let url = Url::parse(conn_str)
            .map_err(|e| JoinsError::config(format!("Invalid connection string: {e}")))?;

        if url.scheme() != "sqlite" {
            return Err(JoinsError::config(format!(
                "Invalid scheme '{}'. Expected 'sqlite'",
                url.scheme()
            )));
        }

        // The URL keeps escapes like %20; the file name must not.
        let encoded = format!("{}{}", url.host_str().unwrap_or(""), url.path());
        let path = percent_decode_str(&encoded)
            .decode_utf8()
            .map_err(|e| JoinsError::config(format!("Invalid connection string: {e}")))?;
        if path.is_empty() {
            return Err(JoinsError::config(
                "Connection string does not name a database file",
            ));
        }

        Ok(Self::from_path(path.into_owned()))
    }

    /// Applies `CRM_JOINS_DATABASE` as the default path.
    pub fn apply_env_defaults(&mut self) {
        if self.path.is_none() {
            self.path = std::env::var_os(DATABASE_ENV_VAR).map(PathBuf::from);
        }
    }

    /// Returns a display string for logs and headers.
    pub fn display_string(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "unknown".to_string(),
        }
    }
}

/// Returns true for strings with a URL-like `scheme:` prefix.
///
/// Single-letter schemes are treated as Windows drive letters.
fn looks_like_url(s: &str) -> bool {
    match s.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("crm-joins")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| JoinsError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            JoinsError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named connection, or the default connection if name is None.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&StoreConfig> {
        let key = name.unwrap_or("default");
        self.connections.get(key)
    }
}
