//! Analysis result records and their JSON projections.
//!
//! An [`AnalysisResult`] is built once from an analyzer's [`RawAnalysis`] and
//! never modified. How it is presented is decided afterwards by projecting it
//! into one of the output shapes ([`ReportShape`]) without touching the
//! record itself.

use crate::analyzer::{AnalyzerError, RawAnalysis};
use crate::camelot::{camelot, CamelotCode};
use crate::loudness::approximate_lufs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Complete analysis of one audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Key and scale joined by a space (e.g., "C# minor")
    pub key_raw: String,
    /// Camelot code, absent when the key spelling is not recognized
    pub key_camelot: Option<CamelotCode>,
    /// Key spelling as reported by the analyzer
    pub key: String,
    /// Scale label as reported by the analyzer
    pub scale: String,
    /// Key detection strength, 0.0-1.0
    pub key_strength: f64,
    /// Approximate loudness derived from ReplayGain
    pub loudness: f64,
    /// Beat tracker confidence, 0.0-1.0
    pub beats_confidence: f64,
    /// ReplayGain adjustment in dB
    pub replay_gain: f64,
    /// End of the intro in seconds
    pub intro_secs: Option<f64>,
    /// Start of the outro in seconds
    pub outro_secs: Option<f64>,
}

impl AnalysisResult {
    /// Derives the result record from raw analyzer output.
    pub fn from_raw(raw: RawAnalysis) -> Self {
        let key_camelot = camelot(&raw.key, &raw.scale);
        let key_raw = format!("{} {}", raw.key, raw.scale);

        Self {
            bpm: raw.bpm,
            key_raw,
            key_camelot,
            key: raw.key,
            scale: raw.scale,
            key_strength: raw.key_strength,
            loudness: approximate_lufs(raw.replay_gain),
            beats_confidence: raw.beats_confidence,
            replay_gain: raw.replay_gain,
            intro_secs: raw.intro_secs,
            outro_secs: raw.outro_secs,
        }
    }
}

/// Outcome of analyzing one file: a full result or a failure message.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Analysis succeeded.
    Success(AnalysisResult),
    /// Analysis failed; no partial values are kept.
    Failure {
        /// Human-readable failure message
        error: String,
    },
}

impl AnalysisOutcome {
    /// Converts an analyzer's return value into an outcome.
    pub fn from_adapter(result: Result<RawAnalysis, AnalyzerError>) -> Self {
        match result {
            Ok(raw) => Self::Success(AnalysisResult::from_raw(raw)),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    /// Creates a failure outcome.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    /// Returns true for a successful analysis.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the result on success.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure { .. } => None,
        }
    }

    /// Projects this outcome into the requested output shape.
    ///
    /// Failures always project to a [`FailureReport`] regardless of shape.
    pub fn project(&self, shape: ReportShape) -> Report {
        match (self, shape) {
            (Self::Success(result), ReportShape::Full) => Report::Full(FullReport::from(result)),
            (Self::Success(result), ReportShape::Minimal) => {
                Report::Minimal(MinimalReport::from(result))
            }
            (Self::Failure { error }, _) => Report::Failure(FailureReport::new(error.clone())),
        }
    }
}

/// Output shape for an analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportShape {
    /// Every field, with a `success` flag.
    #[default]
    Full,
    /// Reduced field set without `success`, plus gain and intro/outro markers.
    Minimal,
}

impl ReportShape {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportShape::Full => "full",
            ReportShape::Minimal => "minimal",
        }
    }
}

impl fmt::Display for ReportShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(ReportShape::Full),
            "minimal" => Ok(ReportShape::Minimal),
            other => Err(format!(
                "unknown report format '{}': expected 'full' or 'minimal'",
                other
            )),
        }
    }
}

/// Full success record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    /// Always true
    pub success: bool,
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Key and scale joined by a space
    pub key_raw: String,
    /// Camelot code, null when the key is not recognized
    pub key_camelot: Option<CamelotCode>,
    /// Key spelling as reported
    pub key: String,
    /// Scale label as reported
    pub scale: String,
    /// Key detection strength, 0.0-1.0
    pub key_strength: f64,
    /// Approximate loudness in LUFS
    pub loudness: f64,
    /// Beat tracker confidence, 0.0-1.0
    pub beats_confidence: f64,
}

impl From<&AnalysisResult> for FullReport {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            success: true,
            bpm: result.bpm,
            key_raw: result.key_raw.clone(),
            key_camelot: result.key_camelot,
            key: result.key.clone(),
            scale: result.scale.clone(),
            key_strength: result.key_strength,
            loudness: result.loudness,
            beats_confidence: result.beats_confidence,
        }
    }
}

/// Minimal success record.
///
/// Loudness is emitted as `lufs` in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalReport {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Key and scale joined by a space
    pub key_raw: String,
    /// Camelot code, null when the key is not recognized
    pub key_camelot: Option<CamelotCode>,
    /// Approximate loudness in LUFS
    pub lufs: f64,
    /// ReplayGain adjustment in dB
    pub replay_gain: f64,
    /// End of the intro in seconds, null when unknown
    pub intro_secs: Option<f64>,
    /// Start of the outro in seconds, null when unknown
    pub outro_secs: Option<f64>,
}

impl From<&AnalysisResult> for MinimalReport {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            bpm: result.bpm,
            key_raw: result.key_raw.clone(),
            key_camelot: result.key_camelot,
            lufs: result.loudness,
            replay_gain: result.replay_gain,
            intro_secs: result.intro_secs,
            outro_secs: result.outro_secs,
        }
    }
}

/// Failure record, shared by both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Always false
    pub success: bool,
    /// Failure message
    pub error: String,
}

impl FailureReport {
    /// Creates a failure record.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// A projected report ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Full(FullReport),
    Minimal(MinimalReport),
    Failure(FailureReport),
}

impl Report {
    /// Returns true unless this is a failure record.
    pub fn is_success(&self) -> bool {
        !matches!(self, Report::Failure(_))
    }

    /// Serializes the report, pretty-printed with 2-space indentation or on a
    /// single line.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
