//! # voc-config
//!
//! Layered configuration loading for tinyvoc using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TINYVOC_*` prefix, `__` as separator)
//! 2. An explicit config file passed by the caller (`--config`)
//! 3. Project-level `.tinyvoc/config.toml`
//! 4. User-level `~/.config/tinyvoc/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TINYVOC_LINEAGE__FILE_NAME` -> `lineage.file_name`,
//! `TINYVOC_HASHING__CHUNK_SIZE` -> `hashing.chunk_size`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use voc_config::VocConfig;
//!
//! let config = VocConfig::load_with_dotenv(None).expect("config");
//! let settings = config.settings().expect("valid settings");
//! println!("sidecar name: {}", settings.file_name);
//! ```

mod error;
mod hashing;
mod lineage;
mod scan;

pub use error::ConfigError;
pub use hashing::HashingConfig;
pub use lineage::LineageConfig;
pub use scan::ScanConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use voc_core::LineageSettings;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "TINYVOC_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VocConfig {
    #[serde(default)]
    pub lineage: LineageConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl VocConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`VocConfig::load_with_dotenv`] for
    /// `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `explicit` does not exist and
    /// [`ConfigError::Figment`] if a layer cannot be extracted.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit.filter(|path| !path.is_file()) {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }
        Self::figment(explicit).extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// See [`VocConfig::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path().filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = Self::project_config_path();
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tinyvoc").join("config.toml"))
    }

    /// Path to the project config file, relative to the working directory.
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".tinyvoc").join("config.toml")
    }

    /// Validate and convert into the settings consumed by `voc-core`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for empty names, a zero chunk
    /// size, or a zero depth cap.
    pub fn settings(&self) -> Result<LineageSettings, ConfigError> {
        let file_name = self.lineage.file_name.trim();
        if file_name.is_empty() {
            return Err(ConfigError::invalid("lineage.file_name", "must not be empty"));
        }
        if Path::new(file_name).components().count() != 1 {
            return Err(ConfigError::invalid(
                "lineage.file_name",
                "must be a plain file name",
            ));
        }
        if self.lineage.frames_suffix.is_empty() {
            return Err(ConfigError::invalid(
                "lineage.frames_suffix",
                "must not be empty",
            ));
        }
        if self.lineage.max_depth == 0 {
            return Err(ConfigError::invalid("lineage.max_depth", "must be at least 1"));
        }
        if self.hashing.chunk_size == 0 {
            return Err(ConfigError::invalid("hashing.chunk_size", "must be at least 1"));
        }

        let annotation_extension = self
            .scan
            .annotation_extension
            .trim()
            .trim_start_matches('.')
            .to_string();
        if annotation_extension.is_empty() {
            return Err(ConfigError::invalid(
                "scan.annotation_extension",
                "must not be empty",
            ));
        }

        Ok(LineageSettings {
            file_name: file_name.to_string(),
            frames_suffix: self.lineage.frames_suffix.clone(),
            max_depth: self.lineage.max_depth,
            chunk_size: self.hashing.chunk_size,
            annotation_extension,
        })
    }
}
