//! Format converters
//!
//! This module contains converters from the score model to notation formats.

pub mod score_to_lilypond;

// Re-export for convenience
pub use score_to_lilypond::{
    convert_score_to_lilypond,
    ConversionError,
    ConversionResult,
    ConversionSettings,
    ParseError,
};
