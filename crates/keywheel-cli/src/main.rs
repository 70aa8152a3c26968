//! Keywheel CLI - audio analysis for DJ libraries
//!
//! This binary analyzes audio files through an external extractor and prints
//! BPM, musical key (with Camelot notation) and approximate loudness as JSON.

mod cli_args;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use keywheel_cli::commands::analyze::AnalyzeOptions;
use keywheel_cli::config::ConfigOverrides;
use keywheel_cli::{commands, logging};
use keywheel_core::ReportShape;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return parse_error_exit_code(e.kind());
        }
    };
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            path,
            format,
            compact,
            pretty,
            output,
            extractor,
            timeout,
            config,
        } => run_analyze(
            path.as_deref(),
            &format,
            Commands::pretty_override(compact, pretty),
            output,
            ConfigOverrides {
                extractor,
                timeout_seconds: timeout,
            },
            config.as_deref(),
        ),
        Commands::Camelot { key, scale, json } => commands::camelot::run(&key, &scale, json),
        #[cfg(feature = "native")]
        Commands::Probe { path } => commands::probe::run(&path),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

/// Help and version requests succeed; every other parse error exits 1.
fn parse_error_exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    }
}

fn run_analyze(
    path: Option<&str>,
    format: &str,
    pretty: Option<bool>,
    output_path: Option<String>,
    overrides: ConfigOverrides,
    config_path: Option<&str>,
) -> Result<ExitCode> {
    let shape: ReportShape = format.parse().map_err(anyhow::Error::msg)?;
    let options = AnalyzeOptions {
        shape,
        pretty,
        output_path,
    };

    commands::analyze::run_configured(path, &options, config_path.map(Path::new), &overrides)
}
