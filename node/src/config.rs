// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_BIND_ADDR: &str = "MERKLE_BIND_ADDR";
pub const ENV_HASH_LOG: &str = "MERKLE_HASH_LOG";
pub const ENV_MAX_BODY_BYTES: &str = "MERKLE_MAX_BODY_BYTES";

const DEFAULT_HASH_LOG: &str = "merkle_hashes.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Durable leaf-hash log. `None` keeps the tree in memory only.
    pub hash_log_path: Option<PathBuf>,
    pub max_body_bytes: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            hash_log_path: None,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `MERKLE_*` environment variables.
    ///
    /// The hash log defaults to `merkle_hashes.log`; set `MERKLE_HASH_LOG`
    /// to an empty string to run without persistence.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self {
            hash_log_path: Some(PathBuf::from(DEFAULT_HASH_LOG)),
            ..Self::default()
        };

        if let Some(value) = lookup(ENV_BIND_ADDR) {
            cfg.bind_addr = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BIND_ADDR,
                value,
            })?;
        }

        if let Some(value) = lookup(ENV_HASH_LOG) {
            cfg.hash_log_path = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }

        if let Some(value) = lookup(ENV_MAX_BODY_BYTES) {
            cfg.max_body_bytes = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_MAX_BODY_BYTES,
                value,
            })?;
        }

        Ok(cfg)
    }
}
