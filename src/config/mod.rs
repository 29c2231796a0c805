//! Layered configuration loading using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables with the `SPRINTBOARD_` prefix, using `__` to
//!    separate sections (`SPRINTBOARD_STORAGE__DATABASE_URL` sets
//!    `storage.database_url`)
//! 2. A TOML file, `sprintboard.toml` in the working directory by default
//! 3. Built-in defaults

mod error;

pub use error::ConfigError;

use crate::board::domain::StageKey;
use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "sprintboard.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SPRINTBOARD_";

/// Complete crate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintboardConfig {
    /// Persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Attachment limits.
    #[serde(default)]
    pub attachments: AttachmentConfig,
    /// Board rules.
    #[serde(default)]
    pub board: BoardConfig,
}

/// Which persistence variant to start with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// The remote database, falling back to local files when it fails.
    #[default]
    Remote,
    /// Local files only.
    Local,
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persistence variant.
    pub mode: StorageMode,
    /// `PostgreSQL` connection string for the remote variant.
    pub database_url: Option<String>,
    /// Directory holding the local collections.
    pub local_dir: Utf8PathBuf,
    /// Maximum number of pooled remote connections.
    pub pool_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::default(),
            database_url: None,
            local_dir: Utf8PathBuf::from(".sprintboard"),
            pool_size: 4,
        }
    }
}

/// Attachment limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    /// Largest accepted attachment, in bytes.
    pub max_bytes: u64,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Board rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Key of the stage whose issues count as finished when a sprint closes.
    pub done_stage_key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            done_stage_key: "done".to_owned(),
        }
    }
}

impl BoardConfig {
    /// Returns the done stage key as a validated [`StageKey`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a malformed key.
    pub fn done_key(&self) -> Result<StageKey, ConfigError> {
        StageKey::new(self.done_stage_key.as_str()).map_err(|err| ConfigError::InvalidValue {
            field: "board.done_stage_key",
            reason: err.to_string(),
        })
    }
}

impl SprintboardConfig {
    /// Loads configuration from `sprintboard.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is
    /// out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Utf8Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads configuration from the TOML file at `path` and the environment.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is
    /// out of range.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider chain without extracting it.
    #[must_use]
    pub fn figment(path: &Utf8Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_std_path()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Checks values the types cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.pool_size",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.attachments.max_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "attachments.max_bytes",
                reason: "must be positive".to_owned(),
            });
        }
        self.board.done_key().map(drop)
    }
}
