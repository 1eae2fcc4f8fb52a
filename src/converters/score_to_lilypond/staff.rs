//! Staff rendering
//!
//! Turns the measures of one part into LilyPond lines for one staff. Notes
//! sharing a tick are merged into a chord, every measure is checked against
//! its time signature and under-filled measures are completed with rests.

use crate::converters::score_to_lilypond::ties::TieIndex;
use crate::converters::score_to_lilypond::types::{
    Adjustment, AdjustmentKind, Duration, NoteType, Pitch, Rational, Staff, TimeSignature,
};
use crate::models::{Measure, Note, PitchElement};

/// Rendered lines of one staff plus the repairs made on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffOutput {
    pub lines: Vec<String>,
    pub adjustments: Vec<Adjustment>,
}

/// Tokens of one measure and how they measure up to the time signature
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMeasure {
    /// Note, chord and rest tokens including any padding rests
    pub tokens: Vec<String>,
    /// Length of the notes found in the data
    pub duration: Rational,
    /// Length implied by the time signature
    pub target: Rational,
    /// Rests appended to reach `target`
    pub padding: Vec<Duration>,
    /// Shortfall too small for any rest value
    pub remainder: Rational,
}

impl RenderedMeasure {
    /// Total length of the rendered tokens
    pub fn rendered_length(&self) -> Rational {
        self.padding
            .iter()
            .fold(self.duration, |total, rest| total + rest.quarter_length())
    }

    /// One output line, e.g. `  c'4 r4 r2 |`
    pub fn to_line(&self) -> String {
        format!("  {} |", self.tokens.join(" "))
    }
}

/// Renders staves of a single part against a shared tie index
pub struct StaffRenderer<'a> {
    ties: &'a TieIndex,
    part: usize,
}

impl<'a> StaffRenderer<'a> {
    /// `part` is the 1-based part index used in adjustment reports
    pub fn new(ties: &'a TieIndex, part: usize) -> Self {
        Self { ties, part }
    }

    /// Render every measure of the part for one staff
    pub fn render(&self, measures: &[Measure], staff: Staff) -> StaffOutput {
        let mut output = StaffOutput::default();
        let mut time = TimeSignature::default();

        for (index, measure) in measures.iter().enumerate() {
            let number = index + 1;

            if let Some(raw) = &measure.time {
                match TimeSignature::from_override(raw) {
                    Some(change) => {
                        time = change;
                        output.lines.push(format!("  {}", time.to_lilypond()));
                    }
                    None => {
                        log::warn!(
                            "Part {} measure {}: ignoring time signature {:?}/{:?}",
                            self.part,
                            number,
                            raw.beats,
                            raw.beat_unit
                        );
                        output.adjustments.push(self.adjustment(
                            staff,
                            number,
                            AdjustmentKind::IgnoredTimeSignature {
                                beats: raw.beats,
                                beat_unit: raw.beat_unit,
                            },
                        ));
                    }
                }
            }

            let rendered = self.render_measure(measure, staff, time);

            if !rendered.padding.is_empty() {
                output.adjustments.push(self.adjustment(
                    staff,
                    number,
                    AdjustmentKind::PaddedWithRests {
                        added: rendered.padding.clone(),
                    },
                ));
            }
            if rendered.remainder > Rational::from_integer(0) {
                output.adjustments.push(self.adjustment(
                    staff,
                    number,
                    AdjustmentKind::UnfilledRemainder {
                        remaining: rendered.remainder,
                    },
                ));
            }
            if rendered.duration > rendered.target {
                log::debug!(
                    "Part {} {} staff measure {} is overfull: {} > {}",
                    self.part,
                    staff,
                    number,
                    rendered.duration,
                    rendered.target
                );
                output.adjustments.push(self.adjustment(
                    staff,
                    number,
                    AdjustmentKind::Overfull {
                        excess: rendered.duration - rendered.target,
                    },
                ));
            }

            output.lines.push(rendered.to_line());
        }

        output
    }

    /// Render one measure under the given time signature
    pub fn render_measure(
        &self,
        measure: &Measure,
        staff: Staff,
        time: TimeSignature,
    ) -> RenderedMeasure {
        let target = time.measure_length();

        let mut notes: Vec<&Note> = measure
            .notes
            .iter()
            .filter(|note| note.staff == Some(staff.selector()))
            .collect();
        // stable: notes at the same tick keep their order
        notes.sort_by_key(|note| note.tick());

        let mut tokens = Vec::new();
        let mut duration = Rational::from_integer(0);

        for group in tick_groups(&notes) {
            let (token, length) = self.render_group(group);
            duration += length;
            tokens.extend(token);
        }

        let (padding, remainder) = if duration < target {
            rest_padding(target - duration)
        } else {
            (Vec::new(), Rational::from_integer(0))
        };
        tokens.extend(padding.iter().map(|rest| format!("r{}", rest)));

        RenderedMeasure {
            tokens,
            duration,
            target,
            padding,
            remainder,
        }
    }

    /// Token for one tick-group and the length it occupies.
    ///
    /// The length is counted even when the group yields no token.
    fn render_group(&self, group: &[&Note]) -> (Option<String>, Rational) {
        let first = group[0];
        let duration = Duration::from_code(first.type_code(), first.dot_count());
        let length = duration.quarter_length();

        let token = match group {
            [note] if note.rest => Some(format!("r{}", duration)),
            [note] => match note.elems.as_slice() {
                [] => None,
                [elem] => Some(self.note_token(elem, duration)),
                elems => Some(self.chord_token(elems.iter(), duration, note.has_arpeggio())),
            },
            notes => {
                let arpeggio = notes.iter().any(|note| note.has_arpeggio());
                let mut elems = notes.iter().flat_map(|note| note.elems.iter()).peekable();
                if elems.peek().is_some() {
                    Some(self.chord_token(elems, duration, arpeggio))
                } else {
                    None
                }
            }
        };

        (token, length)
    }

    fn note_token(&self, elem: &PitchElement, duration: Duration) -> String {
        let mut token = format!("{}{}", Pitch::from_element(elem).to_lilypond_string(), duration);
        if self.ties.starts_tie(elem.id.as_deref()) {
            token.push_str(" ~");
        }
        token
    }

    fn chord_token<'e>(
        &self,
        elems: impl Iterator<Item = &'e PitchElement>,
        duration: Duration,
        arpeggio: bool,
    ) -> String {
        let mut tied = false;
        let pitches: Vec<String> = elems
            .map(|elem| {
                tied |= self.ties.starts_tie(elem.id.as_deref());
                Pitch::from_element(elem).to_lilypond_string()
            })
            .collect();

        let mut token = format!("<{}>{}", pitches.join(" "), duration);
        if arpeggio {
            token.push_str(" \\arpeggio");
        }
        if tied {
            token.push_str(" ~");
        }
        token
    }

    fn adjustment(&self, staff: Staff, measure: usize, kind: AdjustmentKind) -> Adjustment {
        Adjustment {
            part: self.part,
            staff,
            measure,
            kind,
        }
    }
}

/// Split tick-sorted notes into runs sharing the same tick
fn tick_groups<'n>(notes: &'n [&'n Note]) -> Vec<&'n [&'n Note]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=notes.len() {
        if i == notes.len() || notes[i].tick() != notes[start].tick() {
            if i > start {
                groups.push(&notes[start..i]);
            }
            start = i;
        }
    }
    groups
}

/// Greedy rest decomposition of a shortfall, longest values first.
///
/// Returns the rests and whatever is left below the shortest rest value.
pub fn rest_padding(shortfall: Rational) -> (Vec<Duration>, Rational) {
    let mut remaining = shortfall;
    let mut rests = Vec::new();

    for note_type in NoteType::ALL {
        let length = note_type.quarter_length();
        while remaining >= length {
            rests.push(Duration::new(note_type, 0));
            remaining -= length;
        }
    }

    (rests, remaining)
}
