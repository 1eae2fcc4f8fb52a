//! Input models
//!
//! Score data and display metadata as delivered by the upstream service.

pub mod metadata;
pub mod score;
pub mod serde_helpers;

// Re-export commonly used types
pub use metadata::{safe_filename, ScoreMetadata};
pub use score::*;
