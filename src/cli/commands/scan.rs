//! Scan command: validate every matching file in a directory

use super::shared::{colored_outcome, create_progress_bar, setup_logging};
use crate::Result;
use crate::app::models::RunOutcome;
use crate::app::services::directory_scanner::{DirectoryScanner, FileStatus, ScanSummary};
use crate::cli::args::ScanArgs;
use crate::constants::ERROR_DELIMITER_FILE_SUFFIX;
use colored::*;
use indicatif::HumanDuration;
use std::time::Instant;
use tracing::{debug, info};

/// Run the scan command and return the process exit code
pub async fn run_scan(args: ScanArgs) -> Result<i32> {
    let start_time = Instant::now();
    setup_logging(&args.logging)?;
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config()?;
    let scanner = DirectoryScanner::new(config);

    let progress = args
        .logging
        .show_progress()
        .then(|| create_progress_bar(0, "Checking files"));

    let summary = scanner.scan(progress.as_ref()).await?;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    print_summary(&summary);
    info!(
        "Directory scan finished in {}",
        HumanDuration(start_time.elapsed())
    );

    Ok(summary.exit_code())
}

fn print_summary(summary: &ScanSummary) {
    for report in &summary.files {
        match &report.status {
            FileStatus::Checked(result) => println!(
                "{}: {} ({} bad of {} records)",
                report.path.display(),
                colored_outcome(result.outcome),
                result.bad_record_count(),
                result.stats.total_records
            ),
            FileStatus::Failed { message, exit_code } => println!(
                "{}: {} ({}, exit code {})",
                report.path.display(),
                "ERROR".red().bold(),
                message,
                exit_code
            ),
        }
    }

    println!();
    println!(
        "Checked {} file(s): {} good, {} fair, {} bad, {} failed",
        summary.files_checked(),
        summary.count(RunOutcome::Good),
        summary.count(RunOutcome::Fair),
        summary.count(RunOutcome::Bad),
        summary.failed()
    );

    let failing = summary.failing_files();
    let line = format!(
        "Directory {} has {} badly delimited file(s)",
        summary.directory.display(),
        failing
    );
    if failing == 0 {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
        println!(
            "See the {} reports next to each file for details (written with -w)",
            ERROR_DELIMITER_FILE_SUFFIX
        );
    }
}
