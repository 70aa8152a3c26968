//! CLI argument definitions for the keywheel command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// Keywheel - BPM, key and loudness analysis for DJ libraries
#[derive(Parser)]
#[command(name = "keywheel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Analyze an audio file and print BPM, key and loudness as JSON
    Analyze {
        /// Path to the audio file
        path: Option<String>,

        /// Output shape (full, minimal)
        #[arg(long, default_value = "full", value_parser = ["full", "minimal"])]
        format: String,

        /// Print single-line JSON
        #[arg(long, conflicts_with = "pretty")]
        compact: bool,

        /// Print indented JSON
        #[arg(long)]
        pretty: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Extractor executable (overrides the config file)
        #[arg(long, env = "KEYWHEEL_EXTRACTOR")]
        extractor: Option<String>,

        /// Extractor timeout in seconds, 0 disables it
        #[arg(long, env = "KEYWHEEL_TIMEOUT")]
        timeout: Option<u64>,

        /// Path to a keywheel.toml config file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the Camelot code for a key and scale
    Camelot {
        /// Key spelling (e.g., C#, Db, F)
        key: String,

        /// Scale (major or minor)
        scale: String,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Print BPM and key using the native analyzer library
    #[cfg(feature = "native")]
    Probe {
        /// Path to the audio file
        path: String,
    },
}

impl Commands {
    /// `--compact`/`--pretty` as a tri-state.
    pub fn pretty_override(compact: bool, pretty: bool) -> Option<bool> {
        if compact {
            Some(false)
        } else if pretty {
            Some(true)
        } else {
            None
        }
    }
}
