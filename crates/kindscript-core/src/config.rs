//! Configuration types for KindScript (`kindscript.toml`).

use crate::contract::ContractType;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the project-level configuration file.
pub const CONFIG_FILE_NAME: &str = "kindscript.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindScriptConfig {
    /// Source discovery settings.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Per-contract settings keyed by contract type (`purity`, `mirrors`)
    /// or by the constraint key that declares it (`pure`,
    /// `filesystem.mirrors`).
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractConfig>,
}

impl KindScriptConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for unknown contract names or an
    /// empty extension list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.extensions.is_empty() {
            return Err(ConfigError::Validation {
                message: "project.extensions must list at least one extension".into(),
            });
        }
        if let Some(unknown) = self
            .contracts
            .keys()
            .find(|name| ContractType::from_config_key(name).is_none())
        {
            return Err(ConfigError::Validation {
                message: format!(
                    "unknown contract '{unknown}' (expected one of: {})",
                    ContractType::ALL.map(ContractType::constraint_name).join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Checks if a contract type is enabled.
    ///
    /// Disabled under either of its keys means disabled.
    #[must_use]
    pub fn is_contract_enabled(&self, contract_type: ContractType) -> bool {
        self.settings_for(contract_type)
            .all(|c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a contract type.
    ///
    /// The constraint key (`pure`) takes precedence over the type
    /// identifier (`purity`) when both are present.
    #[must_use]
    pub fn contract_severity(&self, contract_type: ContractType) -> Option<Severity> {
        self.contracts
            .get(contract_type.constraint_name())
            .and_then(|c| c.severity)
            .or_else(|| {
                self.contracts
                    .get(contract_type.as_str())
                    .and_then(|c| c.severity)
            })
    }

    fn settings_for(&self, contract_type: ContractType) -> impl Iterator<Item = &ContractConfig> {
        self.contracts
            .iter()
            .filter(move |(key, _)| ContractType::from_config_key(key) == Some(contract_type))
            .map(|(_, settings)| settings)
    }
}

/// Source discovery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory scanned for sources, relative to the project directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extensions treated as sources.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            respect_gitignore: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "tsx".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string(), "**/dist/**".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-contract configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Whether contracts of this type are checked.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this contract type's diagnostics.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Well-formed TOML with invalid values.
    #[error("Invalid config: {message}")]
    Validation {
        /// What is wrong.
        message: String,
    },
}
