//! Check command: validate a single file

use super::shared::{colored_outcome, setup_logging};
use crate::app::models::CheckResult;
use crate::app::services::delimiter_checker::DelimiterChecker;
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::{Error, Result};
use tokio::task;
use tracing::debug;

/// Run the check command and return the process exit code
///
/// The run itself is blocking file I/O, so it executes on the blocking pool.
pub async fn run_check(args: CheckArgs) -> Result<i32> {
    setup_logging(&args.logging)?;
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config()?;
    let checker = DelimiterChecker::new(config);
    let path = args.file.clone();

    let result = task::spawn_blocking(move || checker.check(&path))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Check task failed: {}", e)))??;

    match args.output_format {
        OutputFormat::Human => print_human(&result),
        OutputFormat::Json => print_json(&result)?,
    }

    Ok(result.exit_code())
}

fn print_human(result: &CheckResult) {
    println!(
        "{}: {} ({} bad of {} records, delimiter count {})",
        result.path.display(),
        colored_outcome(result.outcome),
        result.bad_record_count(),
        result.stats.total_records,
        result.delimiter_count()
    );

    if let Some(artifact) = &result.artifact_path {
        println!("  Details: {}", artifact.display());
    }
    if let Some(rewritten) = &result.rewritten_path {
        println!("  Rewritten: {}", rewritten.display());
    }
}

fn print_json(result: &CheckResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| Error::configuration(format!("Failed to serialize check result: {}", e)))?;

    println!("{}", json);
    Ok(())
}
