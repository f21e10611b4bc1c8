use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::dns_server::DnsServerConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::retry::RetryConfig;
use super::sources::SourcesConfig;
use super::sync::SyncConfig;
use crate::source::SourceSelection;
use crate::validators;

/// Complete runtime configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dns_server: DnsServerConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values supplied on the command line or through the environment.
/// Each `Some` wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cache_target_host: Option<String>,
    pub all_sources: Option<bool>,
    pub source_names: Option<Vec<String>>,
    pub index_url: Option<String>,
    pub max_concurrent_fetches: Option<usize>,
    pub progress_batch_size: Option<usize>,
    pub cache_file_path: Option<PathBuf>,
    pub strict: Option<bool>,
    pub remove_stale: Option<bool>,
    pub dry_run: Option<bool>,
    pub log_level: Option<String>,
}

impl Config {
    /// Read the optional TOML file, then layer the overrides on top.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub fn apply_overrides(&mut self, o: CliOverrides) {
        if let Some(v) = o.api_base_url {
            self.dns_server.api_base_url = v;
        }
        if let Some(v) = o.username {
            self.dns_server.username = v;
        }
        if let Some(v) = o.password {
            self.dns_server.password = v;
        }
        if let Some(v) = o.cache_target_host {
            self.sync.cache_target_host = v;
        }
        if let Some(v) = o.all_sources {
            self.sources.all = v;
        }
        if let Some(v) = o.source_names {
            self.sources.names = v;
        }
        if let Some(v) = o.index_url {
            self.sources.index_url = v;
        }
        if let Some(v) = o.max_concurrent_fetches {
            self.sync.max_concurrent_fetches = v;
        }
        if let Some(v) = o.progress_batch_size {
            self.sync.progress_batch_size = v;
        }
        if let Some(v) = o.cache_file_path {
            self.sync.cache_file_path = Some(v);
        }
        if let Some(v) = o.strict {
            self.sync.strict = v;
        }
        if let Some(v) = o.remove_stale {
            self.sync.remove_stale = v;
        }
        if let Some(v) = o.dry_run {
            self.sync.dry_run = v;
        }
        if let Some(v) = o.log_level {
            self.logging.level = v;
        }
    }

    /// Checks everything a `run` needs. `list-sources` only needs the index URL
    /// and calls [`Config::validate_index`] instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dns_server.api_base_url.trim().is_empty() {
            return Err(ConfigError::Missing("ADGUARD_API"));
        }
        validators::validate_url(&self.dns_server.api_base_url).map_err(|message| {
            ConfigError::Invalid {
                field: "ADGUARD_API",
                message,
            }
        })?;
        if self.dns_server.username.is_empty() {
            return Err(ConfigError::Missing("ADGUARD_USERNAME"));
        }
        if self.dns_server.password.is_empty() {
            return Err(ConfigError::Missing("ADGUARD_PASSWORD"));
        }

        let target = self.sync.cache_target_host.trim();
        if target.is_empty() {
            return Err(ConfigError::Missing("LANCACHE_SERVER"));
        }
        if target.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "LANCACHE_SERVER",
                message: format!("'{}' contains whitespace", target),
            });
        }

        self.sources.selection()?;
        self.validate_index()?;

        if self.sync.max_concurrent_fetches == 0 {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_fetches",
                message: "must be at least 1".to_string(),
            });
        }
        if self.sync.progress_batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "progress_batch_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "retry.max_attempts",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn validate_index(&self) -> Result<(), ConfigError> {
        validators::validate_url(&self.sources.index_url).map_err(|message| {
            ConfigError::Invalid {
                field: "sources.index_url",
                message,
            }
        })
    }

    pub fn source_selection(&self) -> Result<SourceSelection, ConfigError> {
        self.sources.selection()
    }

    /// The answer every managed rewrite must carry.
    pub fn target(&self) -> &str {
        self.sync.cache_target_host.trim()
    }
}
