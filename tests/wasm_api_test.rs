//! WASM API test
//!
//! Exercises the JavaScript-facing conversion functions in a browser.

#![cfg(target_arch = "wasm32")]

use score2ly::api::{convert_score_to_lilypond, convert_score_with_report, score_file_stem};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SCORE: &str = r#"{"fifths": 2, "parts": [{"measures": [{"notes": [
    {"staff": 1, "tick": 0, "type": 1, "elems": [{"step": 2, "octave": 4}]}
]}]}]}"#;

const DETAIL: &str = r#"{"name": "Song", "typename": "Writer", "author": "Uploader"}"#;

#[wasm_bindgen_test]
fn test_convert_returns_lilypond() {
    let ly = convert_score_to_lilypond(SCORE.to_string(), DETAIL.to_string(), None).unwrap();
    assert!(ly.contains("\\key d \\major"));
    assert!(ly.contains("  d'1 |"));
    assert!(ly.contains("title = \"Song\""));
}

#[wasm_bindgen_test]
fn test_convert_with_settings() {
    let settings = r#"{"midi_tempo": 96}"#.to_string();
    let ly = convert_score_to_lilypond(SCORE.to_string(), DETAIL.to_string(), Some(settings))
        .unwrap();
    assert!(ly.contains("\\tempo 4 = 96"));
}

#[wasm_bindgen_test]
fn test_invalid_inputs_are_errors() {
    assert!(convert_score_to_lilypond("{".to_string(), DETAIL.to_string(), None).is_err());
    assert!(convert_score_to_lilypond(SCORE.to_string(), "[".to_string(), None).is_err());
    assert!(
        convert_score_to_lilypond(SCORE.to_string(), DETAIL.to_string(), Some("{x".to_string()))
            .is_err()
    );
}

#[wasm_bindgen_test]
fn test_report() {
    let report = convert_score_with_report(SCORE.to_string(), DETAIL.to_string(), None).unwrap();
    let report: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(report["fileStem"], "Song-Writer");
    // lower staff is empty and gets padded
    assert_eq!(report["adjustments"].as_array().map(Vec::len), Some(1));
    assert!(report["lilypondSource"].as_str().unwrap().starts_with("\\version"));
}

#[wasm_bindgen_test]
fn test_file_stem() {
    let stem = score_file_stem(r#"{"name": "A/B", "typename": "C"}"#.to_string()).unwrap();
    assert_eq!(stem, "A B-C");
}
