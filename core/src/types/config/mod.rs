mod runtime;
mod window;

pub use runtime::RuntimeOptions;
pub use window::WindowOptions;

use crate::rpc::UnknownMethodPolicy;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides [`WebViewOptions::data_path`] when set.
pub const DATA_DIR_ENV: &str = "EDGEVIEW_DATA_DIR";

pub const CONFIG_FILE_NAME: &str = "edgeview.toml";

/// Everything needed to create a window with an embedded browser.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewOptions {
    /// Enables devtools and the default context menus.
    pub debug: bool,
    /// Keeps the browser focused whenever the window is activated.
    pub autofocus: bool,
    /// Browser profile directory. `None` lets WebView2 pick one next to the
    /// executable.
    pub data_path: Option<PathBuf>,
    pub unknown_method: UnknownMethodPolicy,
    pub window: WindowOptions,
    pub runtime: RuntimeOptions,
}

impl WebViewOptions {
    /// Returns the config file path within the given directory.
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Loads options from a TOML file. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns a list of problems. Empty when the options are usable as-is.
    pub fn validate(&self) -> Vec<String> {
        self.window.validate()
    }

    /// Returns a copy with invalid values replaced by defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        Self {
            window: self.window.with_defaults_for_invalid(),
            ..self.clone()
        }
    }

    /// Data path after applying the [`DATA_DIR_ENV`] override.
    pub fn resolved_data_path(&self) -> Option<PathBuf> {
        self.data_path_with_override(std::env::var_os(DATA_DIR_ENV))
    }

    fn data_path_with_override(&self, value: Option<OsString>) -> Option<PathBuf> {
        value
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.data_path.clone())
    }
}

/// Errors that can occur when loading or saving options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests;
