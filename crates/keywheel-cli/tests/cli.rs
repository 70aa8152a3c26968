//! End-to-end tests for the `keywheel` binary.
//!
//! Each test runs the built binary in a fresh working directory with `HOME`
//! and `XDG_CONFIG_HOME` pointed at it, so no user config leaks in.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running the keywheel CLI.
#[derive(Debug)]
struct CliResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl CliResult {
    fn from_output(output: Output) -> Self {
        Self {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not JSON ({}).\nstdout: {}\nstderr: {}",
                e, self.stdout, self.stderr
            )
        })
    }

    fn assert_exit(&self, code: i32) {
        assert_eq!(
            self.exit_code, code,
            "unexpected exit code.\nstdout: {}\nstderr: {}",
            self.stdout, self.stderr
        );
    }
}

fn workspace() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn run_cli_with_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> CliResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keywheel"));
    cmd.args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("NO_COLOR", "1")
        .env_remove("KEYWHEEL_EXTRACTOR")
        .env_remove("KEYWHEEL_TIMEOUT")
        .env_remove("RUST_LOG");
    for (key, value) in env {
        cmd.env(key, value);
    }
    CliResult::from_output(cmd.output().expect("failed to run keywheel"))
}

fn run_cli(dir: &Path, args: &[&str]) -> CliResult {
    run_cli_with_env(dir, args, &[])
}

fn write_broken_config(dir: &Path) {
    fs::write(dir.join("keywheel.toml"), "[extractor]\nbogus = 1\n").unwrap();
}

#[test]
fn missing_path_prints_failure_record() {
    let dir = workspace();
    let result = run_cli(dir.path(), &["analyze"]);
    result.assert_exit(1);
    assert_eq!(
        result.json(),
        json!({"success": false, "error": "No file path provided"})
    );
}

#[test]
fn missing_path_minimal_prints_usage() {
    let dir = workspace();
    let result = run_cli(dir.path(), &["analyze", "--format", "minimal"]);
    result.assert_exit(1);
    assert_eq!(result.stdout, "");
    assert!(result.stderr.contains("usage: keywheel analyze <audiofile>"));
}

#[test]
fn usage_errors_exit_one() {
    let dir = workspace();
    run_cli(dir.path(), &["analyze", "a.mp3", "b.mp3"]).assert_exit(1);
    run_cli(dir.path(), &[]).assert_exit(1);
    run_cli(dir.path(), &["analyze", "a.mp3", "--format", "csv"]).assert_exit(1);
    run_cli_with_env(
        dir.path(),
        &["analyze", "a.mp3"],
        &[("KEYWHEEL_TIMEOUT", "abc")],
    )
    .assert_exit(1);
}

#[test]
fn help_exits_zero() {
    let dir = workspace();
    let result = run_cli(dir.path(), &["--help"]);
    result.assert_exit(0);
    assert!(result.stdout.contains("analyze"));
}

#[test]
fn nonexistent_file_prints_failure_record() {
    let dir = workspace();
    let missing = dir.path().join("missing.mp3");
    let missing = missing.to_str().unwrap();

    let result = run_cli(dir.path(), &["analyze", missing]);
    result.assert_exit(1);
    assert_eq!(
        result.json(),
        json!({"success": false, "error": format!("file not found: {}", missing)})
    );
}

#[test]
fn broken_config_prints_failure_record() {
    let dir = workspace();
    write_broken_config(dir.path());

    let result = run_cli(dir.path(), &["analyze", "/nonexistent.mp3"]);
    result.assert_exit(1);
    let report = result.json();
    assert_eq!(report["success"], false);
    let error = report["error"].as_str().unwrap();
    assert!(error.starts_with("failed to parse config file"), "{}", error);
    assert!(error.contains("bogus"), "{}", error);
}

#[test]
fn broken_config_does_not_mask_missing_path() {
    let dir = workspace();
    write_broken_config(dir.path());

    let result = run_cli(dir.path(), &["analyze"]);
    result.assert_exit(1);
    assert_eq!(
        result.json(),
        json!({"success": false, "error": "No file path provided"})
    );
}

#[test]
fn camelot_lookup() {
    let dir = workspace();

    let result = run_cli(dir.path(), &["camelot", "Db", "major"]);
    result.assert_exit(0);
    assert!(result.stdout.contains("3B"));

    let result = run_cli(dir.path(), &["camelot", "H", "minor", "--json"]);
    result.assert_exit(1);
    assert_eq!(
        result.json(),
        json!({"key": "H", "scale": "minor", "camelot": null})
    );
}

#[cfg(unix)]
mod extractor {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"{"bpm": 128.0, "key": "C#", "scale": "minor", "key_strength": 0.9, "replay_gain": 0.0, "beats_confidence": 0.95}"#;

    /// Writes an `sh` extractor printing `body` and a config that runs it.
    fn setup(dir: &Path, body: &str) -> String {
        let script = dir.join("extractor.sh");
        fs::write(&script, body).unwrap();
        fs::write(
            dir.join("keywheel.toml"),
            format!(
                "[extractor]\ncommand = \"sh\"\nargs = [\"{}\", \"{{path}}\"]\ntimeout_seconds = 30\n",
                script.display()
            ),
        )
        .unwrap();

        let input = dir.join("track.mp3");
        fs::write(&input, b"ID3").unwrap();
        input.to_string_lossy().into_owned()
    }

    #[test]
    fn success_full_report() {
        let dir = workspace();
        let input = setup(dir.path(), &format!("echo '{}'", DOCUMENT));

        let result = run_cli(dir.path(), &["analyze", &input]);
        result.assert_exit(0);
        assert!(result.stdout.starts_with("{\n  \"success\": true,"));
        assert_eq!(
            result.json(),
            json!({
                "success": true,
                "bpm": 128.0,
                "key_raw": "C# minor",
                "key_camelot": "3A",
                "key": "C#",
                "scale": "minor",
                "key_strength": 0.9,
                "loudness": -18.0,
                "beats_confidence": 0.95,
            })
        );
    }

    #[test]
    fn success_minimal_report() {
        let dir = workspace();
        let input = setup(dir.path(), &format!("echo '{}'", DOCUMENT));

        let result = run_cli(dir.path(), &["analyze", &input, "--format", "minimal"]);
        result.assert_exit(0);
        assert_eq!(
            result.stdout.trim_end(),
            r#"{"bpm":128.0,"key_raw":"C# minor","key_camelot":"3A","lufs":-18.0,"replay_gain":0.0,"intro_secs":null,"outro_secs":null}"#
        );
    }

    #[test]
    fn extractor_error_document() {
        let dir = workspace();
        let input = setup(dir.path(), r#"echo '{"error": "Could not decode audio"}'; exit 1"#);

        let result = run_cli(dir.path(), &["analyze", &input]);
        result.assert_exit(1);
        assert_eq!(
            result.json(),
            json!({"success": false, "error": "Could not decode audio"})
        );
    }

    #[test]
    fn timeout_flag_overrides_config() {
        let dir = workspace();
        let input = setup(
            dir.path(),
            &format!("sleep 6 &\necho '{}'", DOCUMENT),
        );

        let result = run_cli(dir.path(), &["analyze", &input, "--timeout", "1"]);
        result.assert_exit(1);
        assert_eq!(
            result.json(),
            json!({"success": false, "error": "analyzer timed out after 1 seconds"})
        );
    }
}
