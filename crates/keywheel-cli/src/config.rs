//! Configuration loading.
//!
//! Values are layered: built-in defaults, then a TOML config file, then
//! command-line flags (which clap also fills from `KEYWHEEL_*` environment
//! variables).
//!
//! ```toml
//! [extractor]
//! command = "/usr/local/bin/keywheel-extractor"
//! args = ["--json", "{path}"]
//! timeout_seconds = 120
//!
//! [extractor.env]
//! OMP_NUM_THREADS = "1"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "keywheel.toml";

/// Placeholder replaced by the input path in extractor arguments.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Default extractor timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has wrongly typed values.
    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// External analysis engine settings.
    pub extractor: ExtractorConfig,
}

/// How to invoke the external analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Executable name or path.
    pub command: String,
    /// Arguments; `{path}` is replaced by the input file.
    pub args: Vec<String>,
    /// Seconds to wait before killing the extractor. 0 waits forever.
    pub timeout_seconds: u64,
    /// Extra environment variables for the extractor.
    pub env: BTreeMap<String, String>,
    /// Directory to run the extractor in. Defaults to the current directory.
    pub working_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            command: "keywheel-extractor".to_string(),
            args: vec![PATH_PLACEHOLDER.to_string()],
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            env: BTreeMap::new(),
            working_dir: None,
        }
    }
}

impl ExtractorConfig {
    /// Timeout as a duration, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

/// Values that override the config file, usually from flags or env vars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub extractor: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Config {
    /// Applies overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref command) = overrides.extractor {
            self.extractor.command = command.clone();
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.extractor.timeout_seconds = timeout;
        }
    }
}

/// Finds the config file to load.
///
/// An explicit path is returned as-is (and must exist when loaded). Otherwise
/// `./keywheel.toml` is preferred over `<config dir>/keywheel/config.toml`.
pub fn discover_config_file(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("keywheel").join("config.toml"))
        .filter(|path| path.exists())
}

/// Loads config from a TOML file.
pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

/// Parses config from a TOML string. `path` is only used in error messages.
pub fn parse_toml(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

/// Loads the effective configuration.
///
/// Returns the config together with the file it was read from, if any.
pub fn load(
    cli_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let source = discover_config_file(cli_path);
    let mut config = match source {
        Some(ref path) => load_from_file(path)?,
        None => Config::default(),
    };
    config.apply_overrides(overrides);

    Ok((config, source))
}
