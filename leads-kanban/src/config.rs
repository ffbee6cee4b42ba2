//! Board configuration loaded with Figment
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Default values
//! 2. An optional TOML file
//! 3. Environment variables prefixed `LEADS_KANBAN_`

use crate::drag::CancelPolicy;
use crate::error::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LEADS_KANBAN_";

/// Default storage key for the board document
pub const DEFAULT_STORAGE_KEY: &str = "leads-kanban-board";

/// Default quiet period before a save is written
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Default directory for the file store, relative to the working directory
pub const DEFAULT_STORAGE_DIR: &str = ".leads-kanban";

/// Settings for one board instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Key the board document is stored under
    pub storage_key: String,
    /// Debounce window for saves, in milliseconds
    pub debounce_ms: u64,
    /// What a cancelled drag does to intermediate moves
    pub cancel_policy: CancelPolicy,
    /// Directory for the file store
    pub storage_dir: PathBuf,
    /// Keep the board in process memory only, ignoring `storage_dir`
    pub in_memory: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cancel_policy: CancelPolicy::default(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            in_memory: false,
        }
    }
}

impl BoardConfig {
    /// Load from defaults and environment only
    pub fn load() -> Result<Self> {
        Self::extract(Self::figment(None))
    }

    /// Load from defaults, a TOML file (if it exists) and environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::extract(Self::figment(Some(path.as_ref())))
    }

    /// Build the figment with all sources in precedence order
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            debug!("Loading board config file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        debug!(
            storage_key = %config.storage_key,
            debounce_ms = config.debounce_ms,
            "Loaded board config"
        );
        Ok(config)
    }

    /// Debounce window as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
