//! Conversion entry points for the WASM API
//!
//! JavaScript hands over the raw score JSON and the song-detail record and
//! receives LilyPond text back. Errors surface as thrown strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::helpers::js_error;
use crate::converters::{ConversionSettings, ParseError};
use crate::models::ScoreMetadata;
use crate::{wasm_info, wasm_log, wasm_warn};

/// JSON payload returned by [`convert_score_with_report`]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionReport {
    lilypond_source: String,
    file_stem: String,
    adjustments: Vec<String>,
}

fn parse_settings(settings_json: Option<String>) -> Result<Option<ConversionSettings>, JsValue> {
    match settings_json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| js_error("Settings parse error", ParseError::InvalidSettings(e.to_string()))),
        _ => Ok(None),
    }
}

fn parse_metadata(metadata_json: &str) -> Result<ScoreMetadata, JsValue> {
    ScoreMetadata::from_json(metadata_json).map_err(|e| js_error("Metadata parse error", e))
}

fn convert(
    score_json: &str,
    metadata: &ScoreMetadata,
    settings_json: Option<String>,
) -> Result<crate::converters::ConversionResult, JsValue> {
    let settings = parse_settings(settings_json)?;
    let result = crate::converters::convert_score_to_lilypond(score_json, metadata, settings)
        .map_err(|e| js_error("Conversion error", e))?;

    wasm_info!("  LilyPond generated: {} bytes", result.lilypond_source.len());
    if !result.adjustments.is_empty() {
        wasm_warn!("  {} measure(s) adjusted during conversion", result.adjustments.len());
        for adjustment in &result.adjustments {
            wasm_log!("    {}", adjustment);
        }
    }
    Ok(result)
}

/// Convert a piano score to a complete LilyPond document
///
/// # Parameters
/// - `score_json`: the score document (`fifths`, `parts` → `measures` → `notes`)
/// - `metadata_json`: song-detail record with `name`, `typename` and `author`
/// - `settings_json`: optional [`ConversionSettings`] overrides
///
/// # Returns
/// The LilyPond source text
#[wasm_bindgen(js_name = convertScoreToLilypond)]
pub fn convert_score_to_lilypond(
    score_json: String,
    metadata_json: String,
    settings_json: Option<String>,
) -> Result<String, JsValue> {
    wasm_info!("convertScoreToLilypond called");

    let metadata = parse_metadata(&metadata_json)?;
    let result = convert(&score_json, &metadata, settings_json)?;

    wasm_info!("convertScoreToLilypond completed successfully");
    Ok(result.lilypond_source)
}

/// Same as [`convert_score_to_lilypond`], but returns a JSON report
///
/// ```json
/// { "lilypondSource": "...", "fileStem": "Title-Composer", "adjustments": ["..."] }
/// ```
#[wasm_bindgen(js_name = convertScoreWithReport)]
pub fn convert_score_with_report(
    score_json: String,
    metadata_json: String,
    settings_json: Option<String>,
) -> Result<String, JsValue> {
    wasm_info!("convertScoreWithReport called");

    let metadata = parse_metadata(&metadata_json)?;
    let result = convert(&score_json, &metadata, settings_json)?;

    let report = ConversionReport {
        lilypond_source: result.lilypond_source,
        file_stem: metadata.file_stem(),
        adjustments: result.adjustments.iter().map(ToString::to_string).collect(),
    };
    serde_json::to_string(&report).map_err(|e| js_error("Result serialization error", e))
}

/// File name stem (`Title-Composer`) for the score described by a detail record
#[wasm_bindgen(js_name = scoreFileStem)]
pub fn score_file_stem(metadata_json: String) -> Result<String, JsValue> {
    Ok(parse_metadata(&metadata_json)?.file_stem())
}
