//! Configuration for the expense tracker

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants;

// =============================================================================
// File-based Configuration (expenses.toml)
// =============================================================================

/// Configuration loaded from expenses.toml. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: Option<Backend>,
    /// Log file (CSV) or database file (SQLite)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Symbol shown next to amounts (default ₹)
    pub currency_symbol: Option<String>,
}

/// Storage backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Csv,
    Sqlite,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse {}. Check for:\n\
                 - Unknown sections or keys (allowed: [server] host/port, [storage] backend/path, [display] currency_symbol)\n\
                 - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
                 - Incorrect data types (port must be a number, backend \"csv\" or \"sqlite\")",
                path.display()
            )
        })
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Values the command line can override
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backend: Option<Backend>,
    pub data_file: Option<PathBuf>,
}

/// Main configuration struct with resolved values
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: Backend,
    pub data_file: PathBuf,
    pub currency_symbol: String,
}

impl Config {
    /// Merge file values and command-line overrides (command line wins)
    pub fn resolve(file_config: FileConfig, overrides: Overrides) -> Self {
        let backend = overrides
            .backend
            .or(file_config.storage.backend)
            .unwrap_or_default();

        let data_file = overrides
            .data_file
            .or(file_config.storage.path)
            .unwrap_or_else(|| {
                PathBuf::from(match backend {
                    Backend::Csv => constants::EXPENSES_FILENAME,
                    Backend::Sqlite => constants::DATABASE_FILENAME,
                })
            });

        Self {
            host: overrides
                .host
                .or(file_config.server.host)
                .unwrap_or_else(|| constants::DEFAULT_HOST.to_string()),
            port: overrides
                .port
                .or(file_config.server.port)
                .unwrap_or(constants::DEFAULT_PORT),
            backend,
            data_file,
            currency_symbol: file_config
                .display
                .currency_symbol
                .unwrap_or_else(|| constants::DEFAULT_CURRENCY_SYMBOL.to_string()),
        }
    }

    /// Address to bind the web server to (host names are resolved at bind time)
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
