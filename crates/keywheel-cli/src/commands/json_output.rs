//! JSON output plumbing shared by the commands.

use anyhow::{Context, Result};
use keywheel_core::CamelotCode;
use serde::{Deserialize, Serialize};
use std::fs;

/// Result of `keywheel camelot --json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CamelotLookupOutput {
    /// Key spelling as given
    pub key: String,
    /// Scale label as given
    pub scale: String,
    /// Camelot code, null when the key is not recognized
    pub camelot: Option<CamelotCode>,
}

impl CamelotLookupOutput {
    /// Looks up the code for a key/scale pair.
    pub fn lookup(key: &str, scale: &str) -> Self {
        Self {
            key: key.to_string(),
            scale: scale.to_string(),
            camelot: keywheel_core::camelot(key, scale),
        }
    }
}

/// Writes serialized JSON to a file, or prints it to stdout.
pub fn output_json(json: &str, output_path: Option<&str>) -> Result<()> {
    if let Some(out_path) = output_path {
        fs::write(out_path, json).with_context(|| format!("Failed to write to: {}", out_path))?;
    } else {
        println!("{}", json);
    }

    Ok(())
}
