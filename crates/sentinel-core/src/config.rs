//! Configuration management for Sentinel processors.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`SENTINEL__FINGERPRINT__*`)
//! 2. Config file (`sentinel.toml`, `[fingerprint]` section)
//! 3. Defaults

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options for the fingerprint processor.
///
/// Names are validated when the processor is built, not here, so that a
/// config file can be loaded and inspected before anything is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FingerprintConfig {
    /// Hash function used for the fingerprint (case-insensitive, default: "sha256").
    #[serde(default = "default_hash")]
    pub hash: String,

    /// Output encoding: hex, base32 or base64 (case-insensitive, default: "hex").
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Fields whose values are concatenated, in order, before hashing.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// Field the encoded fingerprint is written to.
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_hash() -> String {
    "sha256".to_string()
}

fn default_encoding() -> String {
    "hex".to_string()
}

fn default_fields() -> Vec<String> {
    vec!["message".to_string()]
}

fn default_target() -> String {
    "fingerprint".to_string()
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            hash: default_hash(),
            encoding: default_encoding(),
            fields: default_fields(),
            target: default_target(),
        }
    }
}

impl FingerprintConfig {
    /// Load the `[fingerprint]` section from `{file_prefix}.*` and the environment.
    ///
    /// The file is optional. A missing section yields the defaults; a
    /// present but malformed one is an error.
    pub fn load(file_prefix: &str) -> Result<Self, ConfigError> {
        Self::load_with_env(file_prefix, "SENTINEL")
    }

    fn load_with_env(file_prefix: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("fingerprint.fields"),
            )
            .build()?;

        match cfg.get::<FingerprintConfig>("fingerprint") {
            Ok(c) => Ok(c),
            Err(config::ConfigError::NotFound(_)) => {
                tracing::debug!(file_prefix, "No fingerprint section found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
