//! Analyze command implementation
//!
//! Runs the analysis engine on one audio file and prints the result record as
//! JSON.

use anyhow::Result;
use keywheel_core::{AnalysisOutcome, Analyzer, ReportShape};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

use super::json_output::output_json;
use crate::backends::analyzer_from_config;
use crate::config::{self, ConfigOverrides};

/// Error reported when no input path is given in full format.
pub const NO_PATH_ERROR: &str = "No file path provided";

/// Usage line printed when no input path is given in minimal format.
pub const MINIMAL_USAGE: &str = "usage: keywheel analyze <audiofile>";

/// Presentation options for the analyze command.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Which fields to emit
    pub shape: ReportShape,
    /// Pretty-print the JSON; `None` picks the shape's default
    pub pretty: Option<bool>,
    /// Output file path (default: stdout)
    pub output_path: Option<String>,
}

impl AnalyzeOptions {
    /// Whether the JSON should be pretty-printed.
    ///
    /// Full reports default to pretty output, minimal reports to one line.
    pub fn pretty(&self) -> bool {
        self.pretty
            .unwrap_or(matches!(self.shape, ReportShape::Full))
    }
}

/// Analyzes one file and returns the outcome.
pub fn analyze_path(path: &Path, analyzer: &dyn Analyzer) -> AnalysisOutcome {
    info!(analyzer = analyzer.name(), path = %path.display(), "analyzing");
    let outcome = AnalysisOutcome::from_adapter(analyzer.analyze(path));
    if let Some(result) = outcome.result() {
        debug!(bpm = result.bpm, key = %result.key_raw, "analysis complete");
    } else if let AnalysisOutcome::Failure { error } = &outcome {
        debug!(%error, "analysis failed");
    }
    outcome
}

/// Run the analyze command with the extractor described by the config.
///
/// A missing input path is reported before any config is read. A config file
/// that cannot be loaded becomes a failure record like any analysis failure.
pub fn run_configured(
    input_path: Option<&str>,
    options: &AnalyzeOptions,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ExitCode> {
    if input_path.is_none() {
        return report_missing_path(options);
    }

    let config = match config::load(config_path, overrides) {
        Ok((config, source)) => {
            if let Some(source) = source {
                debug!(config = %source.display(), "loaded config file");
            }
            config
        }
        Err(e) => return report_failure(&e.to_string(), options),
    };

    run(input_path, options, &analyzer_from_config(&config))
}

/// Run the analyze command
///
/// # Arguments
/// * `input_path` - Path to the audio file; `None` is a usage error
/// * `options` - Output shape, formatting and destination
/// * `analyzer` - Engine that performs the analysis
///
/// # Returns
/// Exit code: 0 on success, 1 on usage error or failed analysis
pub fn run(
    input_path: Option<&str>,
    options: &AnalyzeOptions,
    analyzer: &dyn Analyzer,
) -> Result<ExitCode> {
    let Some(input) = input_path else {
        return report_missing_path(options);
    };

    let outcome = analyze_path(Path::new(input), analyzer);
    let report = outcome.project(options.shape);
    let json = report.to_json(options.pretty())?;
    output_json(&json, options.output_path.as_deref())?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn report_missing_path(options: &AnalyzeOptions) -> Result<ExitCode> {
    match options.shape {
        ReportShape::Full => report_failure(NO_PATH_ERROR, options),
        ReportShape::Minimal => {
            eprintln!("{}", MINIMAL_USAGE);
            Ok(ExitCode::from(1))
        }
    }
}

/// Writes a failure record and returns exit code 1.
fn report_failure(error: &str, options: &AnalyzeOptions) -> Result<ExitCode> {
    let report = AnalysisOutcome::failure(error).project(options.shape);
    let json = report.to_json(options.pretty())?;
    output_json(&json, options.output_path.as_deref())?;
    Ok(ExitCode::from(1))
}
