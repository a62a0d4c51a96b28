//! drug-overlap CLI.

use std::io::{self, IsTerminal};

use clap::Parser;
use drug_overlap_cli::cli::{Cli, Command, LogFormatArg};
use drug_overlap_cli::commands::{run_batch, run_compare};
use drug_overlap_cli::logging::{init_logging, LogConfig, LogFormat};
use drug_overlap_cli::summary::{print_batch_summary, print_summary};

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match &cli.command {
        Command::Compare(args) => match run_compare(args) {
            Ok(report) => {
                print_summary(&report);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Batch(args) => match run_batch(args) {
            Ok(report) => {
                print_batch_summary(&report);
                if report.has_failures() { 1 } else { 0 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        // RUST_LOG applies only when no -v/-q flag was given
        use_env_filter: !cli.verbosity.is_present(),
        with_ansi: cli.log_file.is_none() && io::stderr().is_terminal(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        log_file: cli.log_file.clone(),
    }
}
