//! Piano score to LilyPond converter
//!
//! Turns the JSON score documents served by online piano-sheet sites into
//! LilyPond source with a two-staff piano layout. Usable as a native library
//! or compiled to WASM (see [`api`]).

pub mod models;
pub mod converters;
pub mod api;

// Re-export commonly used types
pub use converters::{
    convert_score_to_lilypond, ConversionError, ConversionResult, ConversionSettings, ParseError,
};
pub use models::{safe_filename, Score, ScoreMetadata};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Score converter WASM module initialized");
}
