//! Finding and loading `kindscript.toml` for a check run.
//!
//! Lookup order: the `--config` flag, then `kindscript.toml` in the checked
//! directory, then `config.toml` in the user config directory
//! (`$KINDSCRIPT_CONFIG_DIR`, else `~/.config/kindscript`). When none of
//! them exists the built-in defaults apply.

use anyhow::{Context, Result};
use kindscript_core::utils::paths::{normalize, resolve_path};
use kindscript_core::{KindScriptConfig, CONFIG_FILE_NAME};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

const USER_CONFIG_NAME: &str = "config.toml";
const CONFIG_DIR_VAR: &str = "KINDSCRIPT_CONFIG_DIR";

/// Which file, if any, supplied the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Named with `--config`.
    Flag(PathBuf),
    /// `kindscript.toml` in the checked directory.
    Project(PathBuf),
    /// `config.toml` in the user config directory.
    User(PathBuf),
    /// Nothing found.
    BuiltIn,
}

impl ConfigOrigin {
    fn file(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Project(p) | Self::User(p) => Some(p),
            Self::BuiltIn => None,
        }
    }

    /// Whether a relative `project.root` is anchored at this file's directory.
    fn anchors_root(&self) -> bool {
        matches!(self, Self::Flag(_) | Self::Project(_))
    }
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(p) => write!(f, "{} (--config)", p.display()),
            Self::Project(p) => write!(f, "{}", p.display()),
            Self::User(p) => write!(f, "{} (user config)", p.display()),
            Self::BuiltIn => f.write_str("built-in defaults"),
        }
    }
}

/// Configuration ready for a check run.
#[derive(Debug)]
pub struct LoadedConfig {
    /// Parsed settings, with `project.root` already anchored.
    pub config: KindScriptConfig,
    /// Where they came from.
    pub origin: ConfigOrigin,
}

/// Where to look for configuration files.
#[derive(Debug, Clone)]
pub struct ConfigLookup {
    user_dir: Option<PathBuf>,
}

impl ConfigLookup {
    /// Reads the user config directory from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_user_dir(
            std::env::var_os(CONFIG_DIR_VAR)
                .map(PathBuf::from)
                .or_else(|| home::home_dir().map(|h| h.join(".config").join("kindscript"))),
        )
    }

    /// Uses `dir`, if any, as the user config directory.
    #[must_use]
    pub fn with_user_dir(user_dir: Option<PathBuf>) -> Self {
        Self { user_dir }
    }

    /// Picks the configuration file for `project_dir`.
    ///
    /// A flag path is taken as given; a missing file surfaces on load.
    #[must_use]
    pub fn locate(&self, project_dir: &Path, flag: Option<&Path>) -> ConfigOrigin {
        if let Some(path) = flag {
            return ConfigOrigin::Flag(path.to_path_buf());
        }

        let project_file = project_dir.join(CONFIG_FILE_NAME);
        if project_file.is_file() {
            return ConfigOrigin::Project(project_file);
        }

        self.user_dir
            .as_ref()
            .map(|dir| dir.join(USER_CONFIG_NAME))
            .filter(|p| p.is_file())
            .map_or(ConfigOrigin::BuiltIn, ConfigOrigin::User)
    }

    /// Locates and parses the configuration for `project_dir`.
    ///
    /// A relative `project.root` read from a flag or project file is
    /// rebased onto that file's directory.
    ///
    /// # Errors
    ///
    /// Fails if the chosen file cannot be read or does not validate.
    pub fn load(&self, project_dir: &Path, flag: Option<&Path>) -> Result<LoadedConfig> {
        let origin = self.locate(project_dir, flag);
        debug!("Configuration from {origin}");

        let Some(file) = origin.file() else {
            return Ok(LoadedConfig {
                config: KindScriptConfig::default(),
                origin,
            });
        };

        let mut config = KindScriptConfig::from_file(file)
            .with_context(|| format!("Failed to load config: {}", file.display()))?;

        if origin.anchors_root() && config.project.root.is_relative() {
            let file = file
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", file.display()))?;
            if let Some(dir) = file.parent() {
                let anchored = resolve_path(
                    &normalize(&dir.to_string_lossy()),
                    &config.project.root.to_string_lossy(),
                );
                debug!("project.root anchored at {anchored}");
                config.project.root = PathBuf::from(anchored);
            }
        }

        Ok(LoadedConfig { config, origin })
    }
}
