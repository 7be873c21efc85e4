//! Database configuration (`niaga.toml`)
//!
//! Every key is optional; a missing file or section means defaults.
//!
//! ```toml
//! [storage]
//! durability = "strict"
//! snapshot_every = 1000
//!
//! [engine]
//! max_commit_retries = 8
//! default_minimum_stock = 5
//!
//! [server]
//! bind = "127.0.0.1:5000"
//! session_ttl_secs = 43200
//! ```

use niaga_core::{NiagaError, NiagaResult};
use niaga_durability::DurabilityMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the config file inside the data directory
pub const CONFIG_FILE: &str = "niaga.toml";

/// Storage and durability settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// When commits reach the disk
    pub durability: DurabilityMode,
    /// Commits between automatic checkpoints, 0 disables them
    pub snapshot_every: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            durability: DurabilityMode::Strict,
            snapshot_every: 1000,
        }
    }
}

/// Transaction and business defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attempts after a commit conflict before giving up
    pub max_commit_retries: u32,
    /// Reorder threshold for stock items created without one
    pub default_minimum_stock: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_commit_retries: 8,
            default_minimum_stock: 5,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// Idle lifetime of a login session
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            session_ttl_secs: 12 * 60 * 60,
        }
    }
}

/// Contents of `niaga.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NiagaConfig {
    /// `[storage]`
    pub storage: StorageConfig,
    /// `[engine]`
    pub engine: EngineConfig,
    /// `[server]`
    pub server: ServerConfig,
}

impl NiagaConfig {
    /// Config for a database that never touches the disk
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.storage.durability = DurabilityMode::InMemory;
        config
    }

    /// Parse TOML text
    pub fn from_toml(text: &str) -> NiagaResult<Self> {
        toml::from_str(text)
            .map_err(|e| NiagaError::invalid_input(format!("invalid {}: {}", CONFIG_FILE, e)))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> NiagaResult<String> {
        toml::to_string_pretty(self).map_err(NiagaError::serialization)
    }

    /// Load `niaga.toml` from `dir`, or defaults when it does not exist
    pub fn load(dir: impl AsRef<Path>) -> NiagaResult<Self> {
        let path = dir.as_ref().join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(NiagaError::storage(format!("read {}", path.display()), e)),
        }
    }

    /// Write this config to `dir/niaga.toml`, creating `dir` if needed
    pub fn write(&self, dir: impl AsRef<Path>) -> NiagaResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| NiagaError::storage(format!("create {}", dir.display()), e))?;
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, self.to_toml()?)
            .map_err(|e| NiagaError::storage(format!("write {}", path.display()), e))
    }

    /// Write the default config unless a config file already exists
    ///
    /// Returns true when a file was created.
    pub fn write_default(dir: impl AsRef<Path>) -> NiagaResult<bool> {
        let dir = dir.as_ref();
        if dir.join(CONFIG_FILE).exists() {
            return Ok(false);
        }
        Self::default().write(dir)?;
        Ok(true)
    }
}
