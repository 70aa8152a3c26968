//! End-to-end tests for the analyze command with an in-process analyzer.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p keywheel-tests --test e2e_analyze
//! ```

use keywheel_core::{AnalysisOutcome, RawAnalysis, ReportShape};
use keywheel_tests::{c_sharp_minor_at_128, ReportHarness, StubAnalyzer};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn full_report_for_c_sharp_minor() {
    let harness = ReportHarness::new();
    let input = harness.touch("track.mp3");
    let analyzer = StubAnalyzer::succeeding(c_sharp_minor_at_128());

    let run = harness.analyze(Some(&input), ReportShape::Full, None, &analyzer);
    run.assert_success();
    assert_eq!(
        run.json(),
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
fn full_report_is_pretty_by_default() {
    let harness = ReportHarness::new();
    let analyzer = StubAnalyzer::succeeding(c_sharp_minor_at_128());

    let run = harness.analyze(
        Some(&harness.path("a.mp3")),
        ReportShape::Full,
        None,
        &analyzer,
    );
    assert!(run.text.starts_with("{\n  \"success\": true,\n  \"bpm\": 128.0,"));

    let run = harness.analyze(
        Some(&harness.path("a.mp3")),
        ReportShape::Full,
        Some(false),
        &analyzer,
    );
    assert!(run.text.starts_with("{\"success\":true,\"bpm\":128.0,"));
}

#[test]
fn minimal_report_fields() {
    let harness = ReportHarness::new();
    let analyzer = StubAnalyzer::succeeding(RawAnalysis {
        replay_gain: 3.0,
        intro_secs: Some(12.5),
        outro_secs: Some(301.0),
        ..c_sharp_minor_at_128()
    });

    let run = harness.analyze(
        Some(&harness.path("a.mp3")),
        ReportShape::Minimal,
        None,
        &analyzer,
    );
    run.assert_success();
    assert_eq!(
        run.text,
        r#"{"bpm":128.0,"key_raw":"C# minor","key_camelot":"3A","lufs":-21.0,"replay_gain":3.0,"intro_secs":12.5,"outro_secs":301.0}"#
    );
}

#[test]
fn unrecognized_key_keeps_success() {
    let harness = ReportHarness::new();
    let analyzer = StubAnalyzer::succeeding(RawAnalysis {
        key: "c#".to_string(),
        ..c_sharp_minor_at_128()
    });

    let run = harness.analyze(
        Some(&harness.path("a.mp3")),
        ReportShape::Full,
        None,
        &analyzer,
    );
    run.assert_success();
    let report = run.json();
    assert_eq!(report["success"], true);
    assert_eq!(report["key_raw"], "c# minor");
    assert_eq!(report["key_camelot"], serde_json::Value::Null);
}

#[test]
fn analyzer_failure_becomes_failure_record() {
    let harness = ReportHarness::new();
    let analyzer = StubAnalyzer::failing("file not found");

    for shape in [ReportShape::Full, ReportShape::Minimal] {
        let run = harness.analyze(Some(&harness.path("gone.mp3")), shape, None, &analyzer);
        run.assert_failure();
        assert_eq!(
            run.json(),
            json!({"success": false, "error": "file not found"})
        );
    }
}

#[test]
fn missing_path_in_full_format() {
    let harness = ReportHarness::new();
    let analyzer = StubAnalyzer::succeeding(c_sharp_minor_at_128());

    let run = harness.analyze(None, ReportShape::Full, None, &analyzer);
    run.assert_failure();
    assert_eq!(
        run.json(),
        json!({"success": false, "error": "No file path provided"})
    );
}

#[test]
fn missing_path_in_minimal_format_writes_nothing() {
    let harness = ReportHarness::new();
    let analyzer = StubAnalyzer::succeeding(c_sharp_minor_at_128());

    let run = harness.analyze(None, ReportShape::Minimal, None, &analyzer);
    run.assert_failure();
    assert_eq!(run.text, "");
}

#[test]
fn formatting_is_idempotent() {
    let first = AnalysisOutcome::from_adapter(Ok(c_sharp_minor_at_128()));
    let second = AnalysisOutcome::from_adapter(Ok(c_sharp_minor_at_128()));
    assert_eq!(first, second);

    for shape in [ReportShape::Full, ReportShape::Minimal] {
        assert_eq!(
            first.project(shape).to_json(false).unwrap(),
            second.project(shape).to_json(false).unwrap()
        );
    }
}
