//! Piano score to LilyPond converter module
//!
//! Converts the JSON piano scores delivered by the sheet-music service into
//! LilyPond 2.20 source with one treble and one bass voice per part.
//!
//! # Overview
//!
//! The converter is a pure string-to-string pipeline:
//! 1. **Parse**: Deserialize the score JSON with serde (lenient field types)
//! 2. **Index**: Collect tie-starting pitch elements in one pass
//! 3. **Render**: Render each staff of each part measure by measure
//! 4. **Generate**: Fill the piano-staff document template
//!
//! Malformed values degrade to defaults and under-filled measures are padded
//! with rests; the applied repairs are reported in [`ConversionResult`].
//!
//! # Basic Usage
//!
//! ```
//! use score2ly::converters::score_to_lilypond::convert_score_to_lilypond;
//! use score2ly::models::ScoreMetadata;
//!
//! let score = r#"{"fifths": 0, "parts": [{"measures": [{"notes": [
//!     {"staff": 1, "tick": 0, "type": 2, "elems": [{"step": 1, "octave": 4}]}
//! ]}]}]}"#;
//! let metadata = ScoreMetadata::new("Title", "Composer", "Arranger");
//!
//! let result = convert_score_to_lilypond(score, &metadata, None).unwrap();
//! assert!(result.lilypond_source.contains("  c'2 r2 |"));
//! ```

pub mod errors;
pub mod types;
pub mod ties;
pub mod staff;
pub mod templates;
pub mod lilypond;

// Re-export main API
pub use errors::{ConversionError, ParseError};
pub use types::{
    duration, pitch, Adjustment, AdjustmentKind, ConversionResult, ConversionSettings, Duration,
    Rational, Staff,
};
pub use ties::TieIndex;
pub use staff::{StaffOutput, StaffRenderer};
pub use lilypond::generate_lilypond_document;

use crate::models::{Score, ScoreMetadata};

/// Convert a score JSON document to LilyPond source code.
///
/// # Arguments
///
/// * `score_json` - Score document as delivered by the service
/// * `metadata` - Title / composer / arranger for the header
/// * `settings` - Optional conversion settings (uses defaults if None)
///
/// # Returns
///
/// * `Ok(ConversionResult)` - LilyPond source and the repairs applied
/// * `Err(ConversionError)` - Unreadable JSON or more than 26 parts
pub fn convert_score_to_lilypond(
    score_json: &str,
    metadata: &ScoreMetadata,
    settings: Option<ConversionSettings>,
) -> Result<ConversionResult, ConversionError> {
    let settings = settings.unwrap_or_default();
    let score = Score::from_json(score_json)?;

    log::debug!("Converting score with {} part(s)", score.parts.len());

    let result = generate_lilypond_document(&score, metadata, &settings)?;

    for adjustment in &result.adjustments {
        log::debug!("{}", adjustment);
    }

    Ok(result)
}
