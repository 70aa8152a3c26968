//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout carries nothing but the JSON report.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "keywheel_cli=debug,keywheel_core=debug,warn"
    } else {
        "warn"
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the `verbose` flag. Calling this twice is
/// harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
