//! Shared state for command handlers.

use std::path::Path;

use anyhow::Context;
use tracing::debug;
use wizmail_core::{AnalysisOptions, Mailbox};

use crate::output::Output;
use crate::settings::Settings;

/// Everything a command needs: the open mailbox, settings and output mode.
pub struct AppContext {
    /// Open mailbox.
    pub mailbox: Mailbox,
    /// Loaded settings.
    pub settings: Settings,
    /// Output mode.
    pub output: Output,
}

impl AppContext {
    /// Open the configured database, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory can't be created or the database
    /// can't be opened.
    pub async fn open(
        settings: Settings,
        database: Option<&Path>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let path = settings.database_path(database);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let path_str = path
            .to_str()
            .with_context(|| format!("database path is not UTF-8: {}", path.display()))?;
        let mailbox = Mailbox::open(path_str)
            .await
            .with_context(|| format!("opening database {}", path.display()))?;

        debug!(path = %path.display(), "Mailbox ready");
        Ok(Self {
            mailbox,
            settings,
            output: Output::new(json),
        })
    }

    /// Build a context around an existing mailbox.
    #[must_use]
    pub fn with_mailbox(mailbox: Mailbox, settings: Settings, output: Output) -> Self {
        Self {
            mailbox,
            settings,
            output,
        }
    }

    /// Analysis options at the configured level.
    #[must_use]
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions::with_level(self.settings.analysis_level)
    }
}
