//! Analysis engine backends.
//!
//! The analysis itself (decoding, beat tracking, key detection, ReplayGain) is
//! done by an external engine. This module connects that engine to the
//! [`keywheel_core::Analyzer`] trait.
//!
//! # Subprocess Protocol
//!
//! 1. CLI spawns `<command> <args...>` with `{path}` replaced by the input
//!    file (or the path appended when no argument mentions `{path}`)
//! 2. Extractor analyzes the file and prints one JSON document on stdout:
//!    - success: `{ bpm, key, scale, key_strength, replay_gain,
//!      beats_confidence, intro_secs?, outro_secs? }`
//!    - failure: `{ error }`
//! 3. Exit code 0 = success, non-zero = failure
//! 4. The extractor is killed if it runs past the configured timeout

mod subprocess;

pub use subprocess::{SubprocessAnalyzer, SubprocessConfig};

use crate::config::Config;

/// Builds the analyzer described by the configuration.
pub fn analyzer_from_config(config: &Config) -> SubprocessAnalyzer {
    SubprocessAnalyzer::new(SubprocessConfig::from(&config.extractor))
}
