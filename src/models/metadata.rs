//! Display metadata for a converted score
//!
//! The strings come from the song-detail record of the upstream service
//! (`name`, `typename`, `author`) and are treated as opaque text.

use serde::{Deserialize, Serialize};

use super::serde_helpers::lenient_string;
use crate::converters::score_to_lilypond::errors::ParseError;

/// Characters that cannot appear in a file name on common platforms
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMetadata {
    /// Song title
    #[serde(default, alias = "name", deserialize_with = "lenient_string")]
    pub title: Option<String>,

    /// Original author of the piece
    #[serde(default, alias = "typename", deserialize_with = "lenient_string")]
    pub composer: Option<String>,

    /// Uploader / arranger of this score
    #[serde(default, alias = "author", deserialize_with = "lenient_string")]
    pub arranger: Option<String>,
}

impl ScoreMetadata {
    pub fn new(
        title: impl Into<String>,
        composer: impl Into<String>,
        arranger: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            composer: Some(composer.into()),
            arranger: Some(arranger.into()),
        }
    }

    /// Parse metadata from a song-detail JSON record
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError::InvalidMetadata(e.to_string()))
    }

    /// Base name (without extension) for files derived from this score
    pub fn file_stem(&self) -> String {
        format!(
            "{}-{}",
            safe_filename(self.title.as_deref().unwrap_or_default()),
            safe_filename(self.composer.as_deref().unwrap_or_default())
        )
    }
}

/// Replace characters that are invalid in file names with spaces
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { ' ' } else { c })
        .collect()
}
