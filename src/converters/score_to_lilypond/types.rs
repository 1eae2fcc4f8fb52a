//! Type definitions for score conversion
//!
//! This module defines the types used in the conversion pipeline:
//! - Public API types (ConversionResult, ConversionSettings, Adjustment)
//! - Duration and pitch models with their LilyPond spellings
//! - Staff, clef, key, time signature and voice naming

use std::fmt;

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::converters::score_to_lilypond::errors::ConversionError;
use crate::models::{PitchElement, TimeSignatureOverride};

/// Exact durations, measured in quarter notes
pub type Rational = Rational64;

// ============================================================================
// PUBLIC API TYPES
// ============================================================================

/// Result of a score to LilyPond conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// Generated LilyPond source code
    pub lilypond_source: String,

    /// Repairs and leniencies applied while rendering
    pub adjustments: Vec<Adjustment>,
}

/// Configuration options for conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Value of the `\version` statement
    pub target_lilypond_version: String,

    /// Quarter-note tempo of the `\midi` block
    pub midi_tempo: u32,

    /// `\key` argument used when the key signature indicator is unknown
    pub fallback_key: String,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            target_lilypond_version: "2.20.0".to_string(),
            midi_tempo: 80,
            fallback_key: "b \\major".to_string(),
        }
    }
}

/// A graceful repair made to one measure of one staff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    /// 1-based part index
    pub part: usize,
    pub staff: Staff,
    /// 1-based measure index within the part
    pub measure: usize,
    pub kind: AdjustmentKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustmentKind {
    /// Under-filled measure completed with rests
    PaddedWithRests { added: Vec<Duration> },
    /// Shortfall below the smallest rest value, left as is
    UnfilledRemainder { remaining: Rational },
    /// Notes exceed the time signature; accepted without truncation
    Overfull { excess: Rational },
    /// Unusable time signature change, previous signature kept
    IgnoredTimeSignature {
        beats: Option<i64>,
        beat_unit: Option<i64>,
    },
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part {} {} staff, measure {}: ", self.part, self.staff, self.measure)?;
        match &self.kind {
            AdjustmentKind::PaddedWithRests { added } => {
                let rests: Vec<String> = added.iter().map(|d| format!("r{}", d)).collect();
                write!(f, "padded with {}", rests.join(" "))
            }
            AdjustmentKind::UnfilledRemainder { remaining } => {
                write!(f, "{} quarter(s) left unfilled", remaining)
            }
            AdjustmentKind::Overfull { excess } => {
                write!(f, "overfull by {} quarter(s)", excess)
            }
            AdjustmentKind::IgnoredTimeSignature { beats, beat_unit } => {
                write!(f, "ignored time signature {:?}/{:?}", beats, beat_unit)
            }
        }
    }
}

// ============================================================================
// DURATION
// ============================================================================

/// Rhythmic value of a note, from whole down to thirty-second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteType {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl NoteType {
    /// All values, longest first
    pub const ALL: [NoteType; 6] = [
        NoteType::Whole,
        NoteType::Half,
        NoteType::Quarter,
        NoteType::Eighth,
        NoteType::Sixteenth,
        NoteType::ThirtySecond,
    ];

    /// Map a type code (1, 2, 4, 8, 16, 32); anything else is a quarter
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => NoteType::Whole,
            2 => NoteType::Half,
            4 => NoteType::Quarter,
            8 => NoteType::Eighth,
            16 => NoteType::Sixteenth,
            32 => NoteType::ThirtySecond,
            _ => {
                log::warn!("Unknown note type code {}, using a quarter note", code);
                NoteType::Quarter
            }
        }
    }

    /// LilyPond duration number
    pub fn token(self) -> &'static str {
        match self {
            NoteType::Whole => "1",
            NoteType::Half => "2",
            NoteType::Quarter => "4",
            NoteType::Eighth => "8",
            NoteType::Sixteenth => "16",
            NoteType::ThirtySecond => "32",
        }
    }

    /// Undotted length in quarter notes
    pub fn quarter_length(self) -> Rational {
        match self {
            NoteType::Whole => Rational::from_integer(4),
            NoteType::Half => Rational::from_integer(2),
            NoteType::Quarter => Rational::from_integer(1),
            NoteType::Eighth => Rational::new(1, 2),
            NoteType::Sixteenth => Rational::new(1, 4),
            NoteType::ThirtySecond => Rational::new(1, 8),
        }
    }
}

/// Musical duration: a note type plus augmentation dots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    pub note_type: NoteType,
    pub dots: u8,
}

impl Duration {
    pub fn new(note_type: NoteType, dots: u8) -> Self {
        Self { note_type, dots }
    }

    pub fn from_code(type_code: i64, dots: u8) -> Self {
        Self::new(NoteType::from_code(type_code), dots)
    }

    /// LilyPond spelling, e.g. "4", "8.", "2.."
    pub fn to_lilypond_string(&self) -> String {
        format!("{}{}", self.note_type.token(), ".".repeat(self.dots as usize))
    }

    /// Length in quarter notes; each dot adds half the previous increment
    pub fn quarter_length(&self) -> Rational {
        let mut increment = self.note_type.quarter_length();
        let mut total = increment;
        for _ in 0..self.dots {
            increment /= 2;
            total += increment;
        }
        total
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_lilypond_string())
    }
}

/// Duration token and exact quarter-note length for a type code and dot count
pub fn duration(type_code: i64, dots: u8) -> (String, Rational) {
    let duration = Duration::from_code(type_code, dots);
    (duration.to_lilypond_string(), duration.quarter_length())
}

// ============================================================================
// PITCH
// ============================================================================

/// Diatonic step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// 1 = C … 7 = B; unknown values fall back to C
    pub fn from_number(number: i64) -> Self {
        match number {
            1 => Step::C,
            2 => Step::D,
            3 => Step::E,
            4 => Step::F,
            5 => Step::G,
            6 => Step::A,
            7 => Step::B,
            _ => Step::C,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Step::C => "c",
            Step::D => "d",
            Step::E => "e",
            Step::F => "f",
            Step::G => "g",
            Step::A => "a",
            Step::B => "b",
        }
    }
}

/// Chromatic alteration of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alteration {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Alteration {
    /// Semitone offset; anything outside -2..=2 is treated as natural
    pub fn from_semitones(semitones: i64) -> Self {
        match semitones {
            -2 => Alteration::DoubleFlat,
            -1 => Alteration::Flat,
            1 => Alteration::Sharp,
            2 => Alteration::DoubleSharp,
            _ => Alteration::Natural,
        }
    }

    /// Dutch (LilyPond default) suffix
    pub fn suffix(self) -> &'static str {
        match self {
            Alteration::DoubleFlat => "eses",
            Alteration::Flat => "es",
            Alteration::Natural => "",
            Alteration::Sharp => "is",
            Alteration::DoubleSharp => "isis",
        }
    }
}

/// Octave with no marks in absolute LilyPond pitch (`c` = C3)
pub const REFERENCE_OCTAVE: i64 = 3;

/// Octaves outside this range are clamped before rendering marks
pub const OCTAVE_RANGE: std::ops::RangeInclusive<i64> = -64..=64;

/// Musical pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub step: Step,
    pub alteration: Alteration,
    /// Octave number (4 = middle C octave)
    pub octave: i64,
}

impl Pitch {
    pub fn new(step: Step, alteration: Alteration, octave: i64) -> Self {
        Self {
            step,
            alteration,
            octave,
        }
    }

    /// Build from raw step / alter / octave values
    pub fn from_raw(step: i64, alter: i64, octave: i64) -> Self {
        Self::new(
            Step::from_number(step),
            Alteration::from_semitones(alter),
            octave,
        )
    }

    pub fn from_element(elem: &PitchElement) -> Self {
        Self::from_raw(elem.step.unwrap_or(0), elem.alter.unwrap_or(0), elem.octave())
    }

    /// Absolute LilyPond pitch, e.g. "fis''" or "bes,"
    pub fn to_lilypond_string(&self) -> String {
        format!(
            "{}{}{}",
            self.step.letter(),
            self.alteration.suffix(),
            self.octave_marks()
        )
    }

    fn octave_marks(&self) -> String {
        // c'' is octave 5, c' is octave 4 (middle C), c is octave 3, c, is octave 2
        let octave = self.octave.clamp(*OCTAVE_RANGE.start(), *OCTAVE_RANGE.end());
        if octave > REFERENCE_OCTAVE {
            "'".repeat((octave - REFERENCE_OCTAVE) as usize)
        } else {
            ",".repeat((REFERENCE_OCTAVE - octave) as usize)
        }
    }
}

/// Pitch token for a step / alteration / octave triple
pub fn pitch(step: i64, alter: i64, octave: i64) -> String {
    Pitch::from_raw(step, alter, octave).to_lilypond_string()
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Key signature as a circle-of-fifths offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignature {
    pub fifths: Option<i64>,
}

impl KeySignature {
    pub fn new(fifths: Option<i64>) -> Self {
        Self { fifths }
    }

    /// `\key` argument for known offsets (-7..=7), always in major
    pub fn to_lilypond(&self) -> Option<&'static str> {
        let key = match self.fifths? {
            0 => "c \\major",
            1 => "g \\major",
            2 => "d \\major",
            3 => "a \\major",
            4 => "e \\major",
            5 => "b \\major",
            6 => "fis \\major",
            7 => "cis \\major",
            -1 => "f \\major",
            -2 => "bes \\major",
            -3 => "ees \\major",
            -4 => "aes \\major",
            -5 => "des \\major",
            -6 => "ges \\major",
            -7 => "ces \\major",
            _ => return None,
        };
        Some(key)
    }

    /// `\key` argument, falling back to `fallback` for unknown offsets
    pub fn to_lilypond_or<'a>(&self, fallback: &'a str) -> &'a str {
        match self.to_lilypond() {
            Some(key) => key,
            None => {
                log::warn!(
                    "Unknown key signature {:?}, using \"{}\"",
                    self.fifths,
                    fallback
                );
                fallback
            }
        }
    }
}

/// Largest accepted beat count or beat unit in a time signature
pub const MAX_TIME_SIGNATURE_VALUE: u32 = 1024;

/// Time signature in effect for a measure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats: u32,
    pub beat_unit: u32,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats: 4,
            beat_unit: 4,
        }
    }
}

impl TimeSignature {
    /// Validate a raw override; `None` if it cannot define a measure length
    pub fn from_override(raw: &TimeSignatureOverride) -> Option<Self> {
        let beats = u32::try_from(raw.beats?).ok()?;
        let beat_unit = u32::try_from(raw.beat_unit?).ok().filter(|&u| u > 0)?;
        if beats > MAX_TIME_SIGNATURE_VALUE || beat_unit > MAX_TIME_SIGNATURE_VALUE {
            return None;
        }
        Some(Self { beats, beat_unit })
    }

    /// Expected measure length: `beats × 4 / beat_unit` quarter notes
    pub fn measure_length(&self) -> Rational {
        Rational::new(i64::from(self.beats) * 4, i64::from(self.beat_unit))
    }

    pub fn to_lilypond(&self) -> String {
        format!("\\time {}/{}", self.beats, self.beat_unit)
    }
}

/// Clef types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClefType {
    Treble,
    Bass,
}

impl ClefType {
    pub fn to_lilypond(self) -> &'static str {
        match self {
            ClefType::Treble => "\\clef treble",
            ClefType::Bass => "\\clef bass",
        }
    }
}

/// Staff of a two-staff piano part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Staff {
    /// Right hand, selector 1
    Upper,
    /// Left hand, selector 2
    Lower,
}

impl Staff {
    pub const ALL: [Staff; 2] = [Staff::Upper, Staff::Lower];

    /// Value of the note `staff` field selecting this staff
    pub fn selector(self) -> i64 {
        match self {
            Staff::Upper => 1,
            Staff::Lower => 2,
        }
    }

    pub fn clef(self) -> ClefType {
        match self {
            Staff::Upper => ClefType::Treble,
            Staff::Lower => ClefType::Bass,
        }
    }

    /// Variable name prefix of the staff's voice block
    pub fn voice_prefix(self) -> &'static str {
        match self {
            Staff::Upper => "right",
            Staff::Lower => "left",
        }
    }
}

impl fmt::Display for Staff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staff::Upper => f.write_str("upper"),
            Staff::Lower => f.write_str("lower"),
        }
    }
}

/// Letter suffix naming the voices of a part (part 1 → "A" … part 26 → "Z")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceName(char);

impl VoiceName {
    pub fn from_part_index(index: usize) -> Result<Self, ConversionError> {
        if !(1..=26).contains(&index) {
            return Err(ConversionError::VoiceIndexOutOfRange(index));
        }
        Ok(Self((b'A' + (index - 1) as u8) as char))
    }

    /// Variable name of the given staff's voice, e.g. "rightA"
    pub fn variable(&self, staff: Staff) -> String {
        format!("{}{}", staff.voice_prefix(), self.0)
    }
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
