//! `wizmail` - command-line client over a local mail store.
//!
//! Folders are derived views over one email collection; categories are
//! user rules matched against sender, subject, body and labels.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod context;
pub mod output;
pub mod settings;

use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use context::AppContext;
use settings::Settings;

/// Install the global subscriber. `RUST_LOG` wins over `filter`.
///
/// Logs go to stderr so JSON output on stdout stays parseable.
pub fn init_logging(filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load settings, open the mailbox and run the requested command.
///
/// # Errors
///
/// Returns an error if settings can't be loaded, the database can't be
/// opened, or the command fails.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load().await?;
    init_logging(settings.log_filter());
    debug!(settings = %Settings::path().display(), "Loaded settings");

    let ctx = AppContext::open(settings, cli.database.as_deref(), cli.json).await?;
    commands::dispatch(&ctx, cli.command).await
}
