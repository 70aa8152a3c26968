//! Probe command: BPM and key from the native analyzer library.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

use crate::ffi::native;

/// Run the probe command
///
/// Prints `BPM: <bpm>` and `Key: <key>` on success.
pub fn run(path: &str) -> Result<ExitCode> {
    info!(%path, "probing with native analyzer");
    let probe = native::analyze_file(Path::new(path))
        .with_context(|| format!("Failed to probe: {}", path))?;

    println!("BPM: {}", probe.bpm);
    println!("Key: {}", probe.key);

    Ok(ExitCode::SUCCESS)
}
