//! Keywheel End-to-End Test Infrastructure
//!
//! Shared fixtures for the integration tests:
//!
//! - [`StubAnalyzer`]: an in-process analyzer with a canned result
//! - [`ReportHarness`]: runs the analyze command into a temp file and reads
//!   the JSON back
//! - [`ExtractorScript`] (unix): a shell script standing in for the external
//!   extractor
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p keywheel-tests
//! ```

use keywheel_cli::commands::analyze::{self, AnalyzeOptions};
use keywheel_core::{Analyzer, AnalyzerError, AnalyzerResult, RawAnalysis, ReportShape};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;

/// Raw analysis for a 128 BPM track in C# minor at reference loudness.
pub fn c_sharp_minor_at_128() -> RawAnalysis {
    RawAnalysis {
        bpm: 128.0,
        key: "C#".to_string(),
        scale: "minor".to_string(),
        key_strength: 0.9,
        replay_gain: 0.0,
        beats_confidence: 0.95,
        intro_secs: None,
        outro_secs: None,
    }
}

/// Analyzer returning a fixed result for every path.
pub struct StubAnalyzer {
    result: Result<RawAnalysis, String>,
}

impl StubAnalyzer {
    /// Stub that always succeeds with `raw`.
    pub fn succeeding(raw: RawAnalysis) -> Self {
        Self { result: Ok(raw) }
    }

    /// Stub that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }
}

impl Analyzer for StubAnalyzer {
    fn analyze(&self, _path: &Path) -> AnalyzerResult<RawAnalysis> {
        self.result.clone().map_err(AnalyzerError::failed)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Output of one analyze run.
#[derive(Debug)]
pub struct ReportRun {
    pub exit_code: ExitCode,
    /// Raw file contents, empty when nothing was written
    pub text: String,
}

impl ReportRun {
    /// Parses the written JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("invalid JSON {:?}: {}", self.text, e))
    }

    pub fn assert_success(&self) {
        assert_eq!(
            self.exit_code,
            ExitCode::SUCCESS,
            "expected success, got {}",
            self.text
        );
    }

    pub fn assert_failure(&self) {
        assert_eq!(
            self.exit_code,
            ExitCode::from(1),
            "expected failure, got {}",
            self.text
        );
    }
}

/// Runs the analyze command with its output redirected to a temp file.
pub struct ReportHarness {
    /// Working directory for test outputs.
    pub work_dir: TempDir,
}

impl ReportHarness {
    pub fn new() -> Self {
        Self {
            work_dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.work_dir.path().join(name)
    }

    /// Creates an (empty) input file and returns its path.
    pub fn touch(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, b"").expect("failed to write input file");
        path
    }

    /// Runs `keywheel analyze` against `analyzer`.
    pub fn analyze(
        &self,
        input: Option<&Path>,
        shape: ReportShape,
        pretty: Option<bool>,
        analyzer: &dyn Analyzer,
    ) -> ReportRun {
        let out = self.path("report.json");
        let _ = fs::remove_file(&out);

        let options = AnalyzeOptions {
            shape,
            pretty,
            output_path: Some(out.to_string_lossy().into_owned()),
        };
        let input = input.map(|p| p.to_string_lossy().into_owned());
        let exit_code =
            analyze::run(input.as_deref(), &options, analyzer).expect("analyze command errored");

        ReportRun {
            exit_code,
            text: fs::read_to_string(&out).unwrap_or_default(),
        }
    }
}

impl Default for ReportHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A POSIX shell script used as the external extractor.
#[cfg(unix)]
pub struct ExtractorScript {
    pub path: PathBuf,
}

#[cfg(unix)]
impl ExtractorScript {
    /// Writes `body` as an `sh` script inside `dir`.
    pub fn write(dir: &Path, body: &str) -> Self {
        let path = dir.join("extractor.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("failed to write script");
        Self { path }
    }

    /// Script that prints `json` and exits with `code`.
    pub fn printing(dir: &Path, json: &str, code: i32) -> Self {
        Self::write(dir, &format!("cat <<'EOF'\n{}\nEOF\nexit {}", json, code))
    }
}
