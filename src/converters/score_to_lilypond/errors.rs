//! Error types for score conversion
//!
//! Only unreadable input and an out-of-range voice name abort a conversion;
//! every other irregularity in the score is absorbed by the renderer.

use thiserror::Error;

/// Top-level conversion error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Input could not be read
    #[error("Input parsing failed: {0}")]
    ParseError(#[from] ParseError),

    /// Voice names only exist for parts 1 through 26
    #[error("Part index {0} has no voice name (supported: 1-26)")]
    VoiceIndexOutOfRange(usize),

    /// Document template could not be compiled or rendered
    #[error("Template rendering failed: {0}")]
    Template(String),
}

/// Fatal input errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Score document is not valid JSON or has the wrong shape
    #[error("Invalid score JSON: {0}")]
    InvalidJson(String),

    /// Metadata record is not valid JSON or has the wrong shape
    #[error("Invalid metadata JSON: {0}")]
    InvalidMetadata(String),

    /// Conversion settings are not valid JSON or have the wrong shape
    #[error("Invalid settings JSON: {0}")]
    InvalidSettings(String),
}
