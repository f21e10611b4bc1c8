//! Configuration module for Lancache Sync
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `dns_server`: Rewrite management API endpoint and credentials
//! - `sources`: Upstream domain-list selection
//! - `sync`: Reconciliation tuning (target, concurrency, batching, cache)
//! - `retry`: Backoff settings shared by every network call
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod dns_server;
pub mod errors;
pub mod logging;
pub mod retry;
pub mod root;
pub mod sources;
pub mod sync;

pub use dns_server::DnsServerConfig;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use retry::RetryConfig;
pub use root::{CliOverrides, Config};
pub use sources::{parse_service_names, SourcesConfig, DEFAULT_INDEX_URL};
pub use sync::SyncConfig;
