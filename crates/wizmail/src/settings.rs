//! User settings loaded from `<config_dir>/wizmail/settings.json`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use wizmail_core::AnalysisLevel;

/// Log filter used when neither `RUST_LOG` nor the settings file sets one.
pub const DEFAULT_LOG_FILTER: &str = "wizmail=info,wizmail_core=info";

const APP_DIR: &str = "wizmail";

/// Persistent settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database file. Defaults to `<data_dir>/wizmail/wizmail.db`.
    pub database_path: Option<PathBuf>,
    /// `tracing` filter directive.
    pub log_filter: Option<String>,
    /// Heuristic depth for `analyze`.
    pub analysis_level: AnalysisLevel,
    /// Default page size for listings.
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            log_filter: None,
            analysis_level: AnalysisLevel::Standard,
            page_size: 50,
        }
    }
}

impl Settings {
    /// Location of the settings file.
    #[must_use]
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("settings.json")
    }

    /// Load settings from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read or parsed.
    pub async fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::path()).await
    }

    /// Load settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read or parsed.
    pub async fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading settings from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("parsing settings in {}", path.display()))
    }

    /// Database file to open, honoring an explicit override.
    #[must_use]
    pub fn database_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.database_path.clone())
            .unwrap_or_else(default_database_path)
    }

    /// Filter directive for logging when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("wizmail.db")
}
