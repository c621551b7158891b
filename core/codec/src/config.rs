// ledgerlink/core/codec/src/config.rs

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Limits applied by the transaction codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Largest accepted `data` payload in bytes. Bounds worst-case
    /// encode and hash cost for a single transaction.
    #[serde(default = "default_max_data_len")]
    pub max_data_len: usize,

    /// Deepest list nesting accepted by the general RLP decoder.
    #[serde(default = "default_max_rlp_depth")]
    pub max_rlp_depth: usize,
}

fn default_max_data_len() -> usize {
    128 * 1024
}

fn default_max_rlp_depth() -> usize {
    ledgerlink_primitives::rlp::DEFAULT_MAX_DEPTH
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_data_len: default_max_data_len(),
            max_rlp_depth: default_max_rlp_depth(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse codec config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid codec config: {0}")]
    Invalid(String),
}

impl CodecConfig {
    /// Parse from TOML; missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading codec config {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("loading codec config {}", path.display()))?;
        tracing::debug!(
            max_data_len = config.max_data_len,
            max_rlp_depth = config.max_rlp_depth,
            "Loaded codec config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_data_len == 0 {
            return Err(ConfigError::Invalid(
                "max_data_len must be greater than zero".to_string(),
            ));
        }
        if self.max_rlp_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_rlp_depth must allow at least one list level".to_string(),
            ));
        }
        Ok(())
    }
}
