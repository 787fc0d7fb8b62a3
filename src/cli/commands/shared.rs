//! Shared components for CLI commands
//!
//! Logging setup, progress bar construction and the colored status line used
//! by both the single-file and directory commands.

use crate::Result;
use crate::app::models::RunOutcome;
use crate::cli::args::LoggingOptions;
use crate::constants::LOG_TARGET;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Set up structured logging on stderr
///
/// `RUST_LOG` overrides the level derived from the verbosity flags. Calling
/// this twice in one process is harmless; the first subscriber stays active.
pub fn setup_logging(logging: &LoggingOptions) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = logging.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let initialized = if logging.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };

    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
    Ok(())
}

/// Create a progress bar with the standard styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Outcome label colored by severity
pub fn colored_outcome(outcome: RunOutcome) -> ColoredString {
    let label = outcome.to_string();
    match outcome {
        RunOutcome::Good => label.green().bold(),
        RunOutcome::Fair => label.yellow().bold(),
        RunOutcome::Bad => label.red().bold(),
    }
}
