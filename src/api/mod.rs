//! Score converter WASM API
//!
//! JavaScript-facing functions. `helpers` holds the console logging macros
//! and error conversion; `export` holds the conversion entry points.

pub mod helpers;
pub mod export;

pub use export::{convert_score_to_lilypond, convert_score_with_report, score_file_stem};
