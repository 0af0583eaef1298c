//! Tree settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rstree/rstree.toml`
//! 3. Explicit config file (`--config FILE`)
//! 4. Environment variables: `RSTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{TreeError, TreeResult};

/// Behaviour switches of a [`Tree`](crate::Tree).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    /// Expanded flag given to newly inserted nodes
    pub expand_new: bool,
    /// Allow more than one selected range
    pub multiple_selection: bool,
    /// Run the consistency checker after every mutation (debug builds)
    pub verify_consistency: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            expand_new: true,
            multiple_selection: false,
            verify_consistency: false,
        }
    }
}

/// Settings as read from one file: `None` means "not specified, inherit".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    expand_new: Option<bool>,
    multiple_selection: Option<bool>,
    verify_consistency: Option<bool>,
}

/// XDG config directory for rstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rstree").map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rstree.toml"))
}

fn load_raw_settings(path: &Path) -> TreeResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| TreeError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl TreeSettings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            expand_new: overlay.expand_new.unwrap_or(self.expand_new),
            multiple_selection: overlay.multiple_selection.unwrap_or(self.multiple_selection),
            verify_consistency: overlay.verify_consistency.unwrap_or(self.verify_consistency),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> TreeResult<Self> {
        Self::load_layers(global_config_path().as_deref(), explicit, None)
    }

    /// Layered loading with every source injectable. `env` replaces the
    /// process environment when given.
    pub(crate) fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> TreeResult<Self> {
        let mut current = Self::default();

        if let Some(path) = global.filter(|p| p.exists()) {
            debug!(path = %path.display(), "loading global config");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config file");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current, env)
    }

    /// Apply RSTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Option<config::Map<String, String>>) -> TreeResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RSTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("expand_new") {
            settings.expand_new = val;
        }
        if let Ok(val) = config.get_bool("multiple_selection") {
            settings.multiple_selection = val;
        }
        if let Ok(val) = config.get_bool("verify_consistency") {
            settings.verify_consistency = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> TreeResult<String> {
        toml::to_string_pretty(self).map_err(|e| TreeError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rstree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rstree/rstree.toml
#   File:   --config FILE
#   Env:    RSTREE_* environment variables (e.g. RSTREE_EXPAND_NEW=false)

# New nodes start expanded
# expand_new = true

# Keep more than one selected range
# multiple_selection = false

# Check every link after each mutation (debug builds only, slow)
# verify_consistency = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> TreeError {
    TreeError::Config {
        message: e.to_string(),
    }
}
