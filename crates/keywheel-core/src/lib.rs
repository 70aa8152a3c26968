//! keywheel core library
//!
//! Turns the raw output of an audio-analysis engine into DJ-friendly records:
//! musical keys in Camelot wheel notation, an approximate loudness figure, and
//! JSON-ready reports.
//!
//! No signal processing happens in this crate. Tempo, key and ReplayGain come
//! from an external engine behind the [`Analyzer`] trait.
//!
//! # Example
//!
//! ```
//! use keywheel_core::{AnalysisOutcome, RawAnalysis, ReportShape};
//!
//! let raw = RawAnalysis {
//!     bpm: 128.0,
//!     key: "C#".to_string(),
//!     scale: "minor".to_string(),
//!     key_strength: 0.9,
//!     replay_gain: 0.0,
//!     beats_confidence: 0.95,
//!     intro_secs: None,
//!     outro_secs: None,
//! };
//!
//! let outcome = AnalysisOutcome::from_adapter(Ok(raw));
//! let json = outcome.project(ReportShape::Full).to_json(false).unwrap();
//! assert!(json.contains("\"key_camelot\":\"3A\""));
//! ```
//!
//! # Modules
//!
//! - [`camelot`]: key spelling and scale to Camelot code
//! - [`loudness`]: ReplayGain to approximate LUFS
//! - [`analyzer`]: the analysis engine boundary
//! - [`report`]: result record, outcome, and output projections

pub mod analyzer;
pub mod camelot;
pub mod loudness;
pub mod report;

pub use analyzer::{Analyzer, AnalyzerError, AnalyzerResult, RawAnalysis};
pub use camelot::{camelot, CamelotCode, KeyName, ParseCamelotError, Scale};
pub use loudness::{approximate_lufs, REPLAY_GAIN_REFERENCE_DB};
pub use report::{
    AnalysisOutcome, AnalysisResult, FailureReport, FullReport, MinimalReport, Report,
    ReportShape,
};
