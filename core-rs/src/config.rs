/**
 * config.rs
 * Parser for .roleguard.yaml files
 *
 * Format:
 * ```yaml
 * apiVersion: roleguard/v1
 * store:
 *   backend: file
 *   path: .roleguard/credentials.json
 * logLevel: info
 * ```
 *
 * A relative store path is resolved against the directory holding the
 * config file.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::RoleGuardError;
use crate::storage::CredentialStore;

/// Config file name looked up in a project directory
pub const CONFIG_FILE: &str = ".roleguard.yaml";

pub const API_VERSION: &str = "roleguard/v1";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Storage backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

/// Store section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".roleguard").join("credentials.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::File,
            path: default_store_path(),
        }
    }
}

/// .roleguard.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleGuardConfig {
    pub api_version: String,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory the config was loaded from; relative paths resolve here
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for RoleGuardConfig {
    fn default() -> Self {
        RoleGuardConfig {
            api_version: API_VERSION.to_string(),
            store: StoreConfig::default(),
            log_level: default_log_level(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl RoleGuardConfig {
    /// Load .roleguard.yaml from specified path
    ///
    /// # Example
    /// ```no_run
    /// # use roleguard_core::RoleGuardConfig;
    /// let config = RoleGuardConfig::load(".roleguard.yaml")?;
    /// # Ok::<(), roleguard_core::RoleGuardError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RoleGuardError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RoleGuardError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(path)?;

        let mut config: RoleGuardConfig = serde_yaml::from_str(&content).map_err(|e| {
            RoleGuardError::ParseError(format!("Invalid .roleguard.yaml: {}", e))
        })?;

        config.validate()?;
        config.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(config)
    }

    /// Load .roleguard.yaml from a directory, or defaults rooted there if absent
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RoleGuardError> {
        let dir = dir.as_ref();
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Self::load(config_path);
        }

        Ok(RoleGuardConfig {
            base_dir: dir.to_path_buf(),
            ..Default::default()
        })
    }

    /// Validate config structure
    ///
    /// Ensures:
    /// - apiVersion is "roleguard/v1"
    /// - logLevel is a known tracing level
    /// - the file backend has a non-empty path
    pub fn validate(&self) -> Result<(), RoleGuardError> {
        if self.api_version != API_VERSION {
            return Err(RoleGuardError::Validation(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(RoleGuardError::Validation(format!(
                "Invalid logLevel '{}': expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.store.backend == StoreBackend::File && self.store.path.as_os_str().is_empty() {
            return Err(RoleGuardError::Validation(
                "store.path cannot be empty for the file backend".to_string(),
            ));
        }

        Ok(())
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RoleGuardError> {
        let yaml = serde_yaml::to_string(self).map_err(|e| {
            RoleGuardError::SerializationError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    /// Absolute-or-base-relative credentials file path
    pub fn store_path(&self) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            self.base_dir.join(&self.store.path)
        }
    }

    /// Open the configured credential store
    pub fn open_store(&self) -> CredentialStore {
        match self.store.backend {
            StoreBackend::File => CredentialStore::open_file(self.store_path()),
            StoreBackend::Memory => CredentialStore::in_memory(),
        }
    }
}
