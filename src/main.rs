use anyhow::Context;
use clap::Parser;
use delimiter_checker::app::services::report;
use delimiter_checker::cli::{args::Args, commands};
use delimiter_checker::constants::exit_codes;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(exit_codes::SUCCESS);
    }

    // Every report written by this process shares one timestamp
    let _ = report::run_timestamp();

    let runtime = match tokio::runtime::Runtime::new().context("Failed to create async runtime") {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(exit_codes::FAILURE);
        }
    };

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(delimiter_checker::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(error.exit_code());
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Delimiter Checker - Delimited File Field-Count Validator");
    println!("========================================================");
    println!();
    println!("Verify that every record of a delimited text file has the same number");
    println!("of delimiters as its header record.");
    println!();
    println!("USAGE:");
    println!("    delimiter-checker <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    check       Check a single delimited file");
    println!("    scan        Check every matching file in a directory");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXIT CODES:");
    println!("    0  GOOD or FAIR");
    println!("    1  BAD (or at least one failing file in a directory)");
    println!("    3  File not found");
    println!("    4  Invalid UTF-8 in a record");
    println!("    5  Any other failure");
    println!();
    println!("EXAMPLES:");
    println!("    # Check a CSV file and write a report if it has bad records:");
    println!("    delimiter-checker check , data.csv -w");
    println!();
    println!("    # Check a TSV file, tolerating over-count records:");
    println!("    delimiter-checker check tab data.tsv -i");
    println!();
    println!("    # Check every .psv file below a directory:");
    println!("    delimiter-checker scan '|' /data/incoming --suffix .psv -R");
    println!();
    println!("For detailed help on any command, use:");
    println!("    delimiter-checker <COMMAND> --help");
}
