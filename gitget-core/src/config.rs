//! Configuration management for git-get
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GITGET_*)
//! 3. Config file (~/.config/git-get/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::address::CanonicalUrl;
use crate::git::CloneOptions;
use crate::{Error, Result};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory every repository is cloned under
    pub root: PathBuf,

    /// Default options for `get`
    pub clone: CloneOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            clone: CloneOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/git-get/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("git-get").join("config.toml"))
    }

    /// `~/repositories`, or a relative `repositories` without a home dir
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join("repositories")
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GITGET_ROOT: Directory repositories are cloned under
    /// - GITGET_BARE: `true` or `1` to clone without a working tree
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = var("GITGET_ROOT") {
            self.root = PathBuf::from(root);
        }

        if let Some(bare) = var("GITGET_BARE") {
            self.clone.bare = matches!(bare.to_ascii_lowercase().as_str(), "true" | "1");
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.root = root;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(root: Option<PathBuf>) -> Result<Self> {
        Ok(Self::load()?.with_env_overrides().with_cli_overrides(root))
    }

    /// Where `url` is cloned to
    ///
    /// Rooted derived paths (eg. from `file:///abs/path`) stay under `root`.
    pub fn repo_path(&self, url: &CanonicalUrl) -> PathBuf {
        let path = url.to_path();
        self.root.join(path.trim_start_matches('/'))
    }
}
