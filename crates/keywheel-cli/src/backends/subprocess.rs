//! Subprocess-based analyzer.
//!
//! Runs an external extractor executable once per file and reads a JSON
//! document from its stdout:
//!
//! ```json
//! {"bpm": 128.0, "key": "C#", "scale": "minor", "key_strength": 0.9,
//!  "replay_gain": -2.5, "beats_confidence": 0.95}
//! ```
//!
//! or, on failure, `{"error": "<message>"}`. `intro_secs` and `outro_secs`
//! may be added when the engine detects them.

use crate::config::{ExtractorConfig, PATH_PLACEHOLDER};
use keywheel_core::{Analyzer, AnalyzerError, AnalyzerResult, RawAnalysis};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Interval between checks on a running extractor.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Configuration for the subprocess analyzer.
#[derive(Debug, Clone)]
pub struct SubprocessConfig {
    /// Executable to run.
    pub program: String,
    /// Arguments; `{path}` is substituted with the input path.
    pub args: Vec<String>,
    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
    /// Kill the extractor after this long. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Working directory for the extractor.
    pub working_dir: Option<PathBuf>,
}

impl SubprocessConfig {
    /// Creates a config that runs `program <path>` with the default timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::from(&ExtractorConfig::default())
        }
    }

    /// Replaces the argument list.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&ExtractorConfig> for SubprocessConfig {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            program: config.command.clone(),
            args: config.args.clone(),
            env: config.env.clone(),
            timeout: config.timeout(),
            working_dir: config.working_dir.clone(),
        }
    }
}

/// Analyzer that delegates to an external extractor process.
#[derive(Debug, Clone)]
pub struct SubprocessAnalyzer {
    config: SubprocessConfig,
}

impl SubprocessAnalyzer {
    /// Creates a new subprocess analyzer.
    pub fn new(config: SubprocessConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &SubprocessConfig {
        &self.config
    }

    /// Builds the argument list for one input file.
    ///
    /// Every `{path}` occurrence is substituted. If no argument mentions
    /// `{path}`, the input path is appended.
    fn build_args(&self, input: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| arg.replace(PATH_PLACEHOLDER, &input))
            .collect();

        if !self.config.args.iter().any(|a| a.contains(PATH_PLACEHOLDER)) {
            args.push(input.into_owned());
        }

        args
    }

    fn build_command(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(self.build_args(input));

        for (key, value) in &self.config.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        if let Some(ref cwd) = self.config.working_dir {
            cmd.current_dir(cwd);
        }

        cmd
    }
}

impl Analyzer for SubprocessAnalyzer {
    fn analyze(&self, path: &Path) -> AnalyzerResult<RawAnalysis> {
        if !path.exists() {
            return Err(AnalyzerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut cmd = self.build_command(path);
        debug!(
            program = %self.config.program,
            input = %path.display(),
            "spawning extractor"
        );

        let start = Instant::now();
        let child = cmd.spawn().map_err(|source| AnalyzerError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;

        let output = wait_with_timeout(child, self.config.timeout)?;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            status = %output.status,
            "extractor finished"
        );

        parse_output(&output)
    }

    fn name(&self) -> &'static str {
        "subprocess"
    }
}

/// What an extractor prints on stdout.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtractorDocument {
    Error { error: String },
    Analysis(RawAnalysis),
}

/// Captured result of a finished extractor.
#[derive(Debug)]
struct ExtractorOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

fn parse_document(stdout: &[u8]) -> Result<ExtractorDocument, AnalyzerError> {
    if stdout.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(AnalyzerError::invalid_output("extractor printed nothing"));
    }
    serde_json::from_slice(stdout).map_err(|e| AnalyzerError::invalid_output(e.to_string()))
}

fn parse_output(output: &ExtractorOutput) -> AnalyzerResult<RawAnalysis> {
    let document = parse_document(&output.stdout);

    if !output.status.success() {
        // Prefer the extractor's own message over the exit code.
        if let Ok(ExtractorDocument::Error { error }) = document {
            return Err(AnalyzerError::Failed(error));
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(code = ?output.status.code(), "extractor exited unsuccessfully");
        return Err(AnalyzerError::NonZeroExit {
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    match document? {
        ExtractorDocument::Analysis(raw) => Ok(raw),
        ExtractorDocument::Error { error } => Err(AnalyzerError::Failed(error)),
    }
}

/// Reads a pipe to completion on a background thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    match pipe {
        Some(mut pipe) => {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                let _ = tx.send(buf);
            });
        }
        None => {
            let _ = tx.send(Vec::new());
        }
    }
    rx
}

/// Waits for a reader to finish. Returns `None` once `deadline` has passed.
fn collect(rx: &Receiver<Vec<u8>>, deadline: Option<Instant>) -> Option<Vec<u8>> {
    let Some(deadline) = deadline else {
        return Some(rx.recv().unwrap_or_default());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

fn timed_out(limit: Duration) -> AnalyzerError {
    warn!(timeout_secs = limit.as_secs(), "extractor timed out");
    AnalyzerError::Timeout {
        timeout_seconds: limit.as_secs(),
    }
}

/// Waits for a child process and its output, giving up once `timeout` has
/// elapsed.
///
/// The deadline also covers draining stdout and stderr, including pipes held
/// open by processes the extractor left running.
fn wait_with_timeout(
    mut child: Child,
    timeout: Option<Duration>,
) -> AnalyzerResult<ExtractorOutput> {
    let deadline = timeout.map(|limit| Instant::now() + limit);
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let (Some(stdout), Some(stderr)) =
                    (collect(&stdout, deadline), collect(&stderr, deadline))
                else {
                    return Err(timed_out(timeout.unwrap_or_default()));
                };
                return Ok(ExtractorOutput {
                    status,
                    stdout,
                    stderr,
                });
            }
            Ok(None) => {
                if let (Some(limit), Some(deadline)) = (timeout, deadline) {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(timed_out(limit));
                    }
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return Err(AnalyzerError::Spawn {
                    program: "extractor".to_string(),
                    source: e,
                });
            }
        }
    }
}
