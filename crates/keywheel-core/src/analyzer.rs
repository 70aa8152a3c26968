//! Boundary to the external audio-analysis engine.
//!
//! Tempo, key and loudness extraction are not performed here. An [`Analyzer`]
//! wraps whatever engine does that work (a subprocess, a native library, a
//! test stub) and hands back a [`RawAnalysis`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Raw values reported by an analysis engine for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    /// Tempo estimate in beats per minute
    pub bpm: f64,
    /// Key spelling as reported (e.g., "C#", "Bb")
    pub key: String,
    /// Scale label as reported (normally "major" or "minor")
    pub scale: String,
    /// Key detection strength, 0.0-1.0
    pub key_strength: f64,
    /// ReplayGain adjustment in dB
    pub replay_gain: f64,
    /// Beat tracker confidence, 0.0-1.0
    pub beats_confidence: f64,
    /// End of the intro in seconds, when the engine reports it
    #[serde(default)]
    pub intro_secs: Option<f64>,
    /// Start of the outro in seconds, when the engine reports it
    #[serde(default)]
    pub outro_secs: Option<f64>,
}

/// Errors reported by an analyzer.
///
/// The `Display` text of each variant is what ends up in the `error` field of
/// a failure record.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The input file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The analysis engine could not be started.
    #[error("failed to start analyzer '{program}': {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The analysis engine did not finish in time.
    #[error("analyzer timed out after {timeout_seconds} seconds")]
    Timeout {
        /// Configured timeout.
        timeout_seconds: u64,
    },

    /// The analysis engine exited unsuccessfully.
    #[error("analyzer exited with code {code}: {stderr}")]
    NonZeroExit {
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The analysis engine's output could not be understood.
    #[error("analyzer produced invalid output: {message}")]
    InvalidOutput {
        /// Parse failure description.
        message: String,
    },

    /// The analysis engine reported a failure of its own.
    #[error("{0}")]
    Failed(String),
}

impl AnalyzerError {
    /// Creates an engine-reported failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Creates an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            message: message.into(),
        }
    }
}

/// Result type for analyzer calls.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// An audio-analysis engine.
///
/// Implementations are synchronous and may block for as long as the engine
/// takes to decode and analyze the file.
pub trait Analyzer {
    /// Analyzes one audio file.
    fn analyze(&self, path: &Path) -> AnalyzerResult<RawAnalysis>;

    /// Short name of this analyzer (for logging).
    fn name(&self) -> &'static str;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(&self, path: &Path) -> AnalyzerResult<RawAnalysis> {
        (**self).analyze(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, path: &Path) -> AnalyzerResult<RawAnalysis> {
        (**self).analyze(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
