//! Configuration for the message signer

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default environment variable holding the wallet's private key
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Wallet settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSettings {
    /// Name of the environment variable the wallet key is read from
    pub private_key_env: String,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            private_key_env: PRIVATE_KEY_ENV.to_string(),
        }
    }
}

/// Export settings for signed messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Spaces of indentation in the exported JSON
    pub indent: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Wallet settings
    #[serde(default)]
    pub wallet: WalletSettings,
    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,
    /// Path to audit log file (JSONL), disabled when unset
    #[serde(default)]
    pub audit_log_path: Option<String>,
}

impl Config {
    /// Load a JSON config file, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}
