//! Piano score input model
//!
//! Read-only view of the upstream score document: parts → measures → notes →
//! pitch elements. Field names follow the upstream JSON keys; accessors
//! apply the defaults the converter relies on.

use serde::{Deserialize, Serialize};

use super::serde_helpers::{lenient_i64, lenient_id, lenient_string, null_as_default, present};
use crate::converters::score_to_lilypond::errors::ParseError;

/// Key signature assumed when the score does not carry one
pub const DEFAULT_FIFTHS: i64 = 5;

/// Most augmentation dots honoured on a single note
pub const MAX_DOTS: u8 = 8;

fn default_fifths() -> Option<i64> {
    Some(DEFAULT_FIFTHS)
}

/// A complete score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    /// Circle-of-fifths key signature indicator (`None` when present but unusable)
    #[serde(default = "default_fifths", deserialize_with = "lenient_i64")]
    pub fifths: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
}

impl Score {
    /// Parse a score from its JSON text
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError::InvalidJson(e.to_string()))
    }

    /// Parse a score from an already decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, ParseError> {
        serde_json::from_value(value).map_err(|e| ParseError::InvalidJson(e.to_string()))
    }

    /// Iterate every pitch element of every note in every part
    pub fn elements(&self) -> impl Iterator<Item = &PitchElement> {
        self.parts
            .iter()
            .flat_map(|part| part.measures.iter())
            .flat_map(|measure| measure.notes.iter())
            .flat_map(|note| note.elems.iter())
    }
}

/// One instrument grouping, rendered as an upper and a lower staff
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, deserialize_with = "null_as_default")]
    pub measures: Vec<Measure>,
}

/// One bar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Measure {
    /// Time signature change starting at this measure
    #[serde(default)]
    pub time: Option<TimeSignatureOverride>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<Note>,
}

/// Raw time signature as found in the data (`beatu` is the beat unit)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSignatureOverride {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub beats: Option<i64>,

    #[serde(default, rename = "beatu", deserialize_with = "lenient_i64")]
    pub beat_unit: Option<i64>,
}

/// One rhythmic event (note, chord or rest) on one staff
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Note {
    /// 1 = upper staff, 2 = lower staff
    #[serde(default, deserialize_with = "lenient_i64")]
    pub staff: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub tick: Option<i64>,

    /// Rhythmic type code: 1, 2, 4, 8, 16, 32
    #[serde(default, rename = "type", deserialize_with = "lenient_i64")]
    pub note_type: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub dots: Option<i64>,

    /// Legacy single-dot flag, only consulted when `dots` is absent
    #[serde(default, deserialize_with = "lenient_i64")]
    pub dot: Option<i64>,

    /// Written back only when set; key presence is what marks a rest
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub rest: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub arts: Vec<Articulation>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub elems: Vec<PitchElement>,
}

impl Note {
    pub fn tick(&self) -> i64 {
        self.tick.unwrap_or(0)
    }

    pub fn type_code(&self) -> i64 {
        self.note_type.unwrap_or(4)
    }

    /// Effective augmentation dot count
    pub fn dot_count(&self) -> u8 {
        match self.dots {
            Some(dots) => dots.clamp(0, i64::from(MAX_DOTS)) as u8,
            None if self.dot == Some(1) => 1,
            None => 0,
        }
    }

    pub fn has_arpeggio(&self) -> bool {
        self.arts.iter().any(Articulation::is_arpeggio)
    }
}

/// Articulation attached to a note
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Articulation {
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
}

impl Articulation {
    pub fn is_arpeggio(&self) -> bool {
        self.kind.as_deref() == Some("arpeggiate")
    }
}

/// One sounding pitch within a note
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchElement {
    /// Diatonic step, C = 1 … B = 7
    #[serde(default, deserialize_with = "lenient_i64")]
    pub step: Option<i64>,

    /// Semitone alteration, -2 … 2
    #[serde(default, deserialize_with = "lenient_i64")]
    pub alter: Option<i64>,

    /// Octave number, 4 is the octave starting at middle C
    #[serde(default, deserialize_with = "lenient_i64")]
    pub octave: Option<i64>,

    /// Identifier used only to resolve ties
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pairs: Vec<MarkerPair>,
}

impl PitchElement {
    pub fn octave(&self) -> i64 {
        self.octave.unwrap_or(4)
    }

    /// Whether a tie marker pair is attached to this element
    pub fn has_tie_marker(&self) -> bool {
        self.pairs.iter().any(MarkerPair::is_tie)
    }
}

/// Spanning marker attached to an element (ties, slurs, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerPair {
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
}

impl MarkerPair {
    pub fn is_tie(&self) -> bool {
        self.kind.as_deref() == Some("tied")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_defaults() {
        let score = Score::from_json("{}").unwrap();
        assert_eq!(score.fifths, Some(DEFAULT_FIFTHS));
        assert!(score.parts.is_empty());

        let score = Score::from_json(r#"{"fifths": null, "parts": null}"#).unwrap();
        assert_eq!(score.fifths, None);
        assert!(score.parts.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Score::from_json("{not json"),
            Err(ParseError::InvalidJson(_))
        ));
        assert!(Score::from_json(r#"{"parts": 3}"#).is_err());
    }

    #[test]
    fn test_note_fields() {
        let note: Note = serde_json::from_value(json!({
            "staff": 2,
            "tick": 480,
            "type": 8,
            "dot": 1,
            "rest": {},
            "arts": [{"type": "arpeggiate"}],
        }))
        .unwrap();
        assert_eq!(note.staff, Some(2));
        assert_eq!(note.tick(), 480);
        assert_eq!(note.type_code(), 8);
        assert_eq!(note.dot_count(), 1);
        assert!(note.rest);
        assert!(note.has_arpeggio());
        assert!(note.elems.is_empty());
    }

    #[test]
    fn test_note_defaults() {
        let note: Note = serde_json::from_value(json!({})).unwrap();
        assert_eq!(note.staff, None);
        assert_eq!(note.tick(), 0);
        assert_eq!(note.type_code(), 4);
        assert_eq!(note.dot_count(), 0);
        assert!(!note.rest);
        assert!(!note.has_arpeggio());
    }

    #[test]
    fn test_dots_take_precedence_over_legacy_flag() {
        let note: Note = serde_json::from_value(json!({"dots": 2, "dot": 1})).unwrap();
        assert_eq!(note.dot_count(), 2);

        let note: Note = serde_json::from_value(json!({"dots": 0, "dot": 1})).unwrap();
        assert_eq!(note.dot_count(), 0);

        let note: Note = serde_json::from_value(json!({"dot": 2})).unwrap();
        assert_eq!(note.dot_count(), 0);

        let note: Note = serde_json::from_value(json!({"dots": -1})).unwrap();
        assert_eq!(note.dot_count(), 0);
    }

    #[test]
    fn test_time_signature_strings() {
        let measure: Measure =
            serde_json::from_value(json!({"time": {"beats": "3", "beatu": "8"}})).unwrap();
        let time = measure.time.unwrap();
        assert_eq!(time.beats, Some(3));
        assert_eq!(time.beat_unit, Some(8));
    }

    #[test]
    fn test_element_tie_marker() {
        let elem: PitchElement = serde_json::from_value(json!({
            "step": 5, "alter": -1, "octave": 3, "id": 17,
            "pairs": [{"type": "slur"}, {"type": "tied"}],
        }))
        .unwrap();
        assert_eq!(elem.id.as_deref(), Some("17"));
        assert_eq!(elem.octave(), 3);
        assert!(elem.has_tie_marker());

        let elem: PitchElement = serde_json::from_value(json!({"tied": "end"})).unwrap();
        assert_eq!(elem.octave(), 4);
        assert!(!elem.has_tie_marker());
    }

    #[test]
    fn test_serialized_score_reads_back_the_same() {
        let score = Score::from_value(json!({
            "fifths": -2,
            "parts": [{"measures": [{"notes": [
                {"staff": 1, "tick": 0, "type": 4, "elems": [{"step": 3, "id": "e1"}]},
                {"staff": 2, "tick": 0, "type": 2, "dots": 1, "rest": {}},
            ]}]}]
        }))
        .unwrap();

        let reread = Score::from_json(&serde_json::to_string(&score).unwrap()).unwrap();
        assert_eq!(reread.fifths, Some(-2));
        let notes = &reread.parts[0].measures[0].notes;
        assert!(!notes[0].rest);
        assert_eq!(notes[0].elems[0].id.as_deref(), Some("e1"));
        assert!(notes[1].rest);
        assert_eq!(notes[1].dot_count(), 1);
    }

    #[test]
    fn test_elements_iterates_whole_score() {
        let score = Score::from_value(json!({
            "parts": [
                {"measures": [{"notes": [{"elems": [{"id": "a"}, {"id": "b"}]}]}]},
                {"measures": [{"notes": [{"rest": 1}, {"elems": [{"id": "c"}]}]}]},
            ]
        }))
        .unwrap();
        let ids: Vec<_> = score.elements().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
