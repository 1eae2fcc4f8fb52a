//! LilyPond document assembly
//!
//! Renders both staves of every part into named voice blocks and places the
//! first part's voices on a piano staff.

use crate::converters::score_to_lilypond::errors::ConversionError;
use crate::converters::score_to_lilypond::staff::StaffRenderer;
use crate::converters::score_to_lilypond::templates::{
    render_lilypond, render_piano_staff_fallback, LilyPondTemplate, TemplateContext,
};
use crate::converters::score_to_lilypond::ties::TieIndex;
use crate::converters::score_to_lilypond::types::{
    ConversionResult, ConversionSettings, KeySignature, Staff, VoiceName,
};
use crate::models::{Score, ScoreMetadata};

/// Generate the LilyPond document for a score
pub fn generate_lilypond_document(
    score: &Score,
    metadata: &ScoreMetadata,
    settings: &ConversionSettings,
) -> Result<ConversionResult, ConversionError> {
    let ties = TieIndex::build(score);
    let key = KeySignature::new(score.fifths).to_lilypond_or(&settings.fallback_key);

    let mut voices = String::new();
    let mut adjustments = Vec::new();

    for (index, part) in score.parts.iter().enumerate() {
        let part_number = index + 1;
        let name = VoiceName::from_part_index(part_number)?;
        let renderer = StaffRenderer::new(&ties, part_number);

        for staff in Staff::ALL {
            let output = renderer.render(&part.measures, staff);
            voices.push_str(&voice_block(&name.variable(staff), staff, key, &output.lines));
            adjustments.extend(output.adjustments);
        }
        log::debug!(
            "Rendered part {} ({} measures)",
            part_number,
            part.measures.len()
        );
    }

    // Only the first part is placed on the piano staff
    let first = VoiceName::from_part_index(1)?;

    let context = TemplateContext::builder(settings.target_lilypond_version.clone(), voices)
        .title(escape_lilypond_string(metadata.title.as_deref().unwrap_or_default()))
        .composer(escape_lilypond_string(metadata.composer.as_deref().unwrap_or_default()))
        .arranger(escape_lilypond_string(metadata.arranger.as_deref().unwrap_or_default()))
        .staff_voices(first.variable(Staff::Upper), first.variable(Staff::Lower))
        .midi_tempo(settings.midi_tempo)
        .build();

    let lilypond_source = match render_lilypond(LilyPondTemplate::PianoStaff, &context) {
        Ok(output) => output,
        Err(e) => {
            log::error!("{}; using built-in layout", e);
            render_piano_staff_fallback(&context)
        }
    };

    Ok(ConversionResult {
        lilypond_source,
        adjustments,
    })
}

/// One voice definition: clef, key and the staff's measure lines
fn voice_block(variable: &str, staff: Staff, key: &str, lines: &[String]) -> String {
    format!(
        "\n{} = {{\n  {}\n  \\key {}\n{}\n}}\n",
        variable,
        staff.clef().to_lilypond(),
        key,
        lines.join("\n")
    )
}

/// Escape special characters for LilyPond strings
fn escape_lilypond_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generate(score: serde_json::Value) -> Result<ConversionResult, ConversionError> {
        let score = Score::from_value(score).unwrap();
        generate_lilypond_document(
            &score,
            &ScoreMetadata::new("T", "C", "A"),
            &ConversionSettings::default(),
        )
    }

    #[test]
    fn test_voice_block_layout() {
        let block = voice_block(
            "leftB",
            Staff::Lower,
            "d \\major",
            &["  \\time 3/4".to_string(), "  r2 r4 |".to_string()],
        );
        assert_eq!(
            block,
            "\nleftB = {\n  \\clef bass\n  \\key d \\major\n  \\time 3/4\n  r2 r4 |\n}\n"
        );
    }

    #[test]
    fn test_empty_voice_block() {
        let block = voice_block("rightA", Staff::Upper, "c \\major", &[]);
        assert_eq!(block, "\nrightA = {\n  \\clef treble\n  \\key c \\major\n\n}\n");
    }

    #[test]
    fn test_escape_header_strings() {
        assert_eq!(escape_lilypond_string(r#"Say "hi" \o/"#), r#"Say \"hi\" \\o/"#);
    }

    #[test]
    fn test_every_part_gets_voices_but_only_first_is_scored() {
        let result = generate(json!({"fifths": 0, "parts": [{}, {}, {}]})).unwrap();
        let ly = &result.lilypond_source;
        for name in ["rightA", "leftA", "rightB", "leftB", "rightC", "leftC"] {
            assert!(ly.contains(&format!("\n{} = {{\n", name)), "missing {}", name);
        }
        assert!(ly.contains("\\new Staff = \"upper\" \\rightA\n"));
        assert!(ly.contains("\\new Staff = \"lower\" \\leftA\n"));
        assert!(!ly.contains("\\rightB\n"));
    }

    #[test]
    fn test_part_limit() {
        let parts: Vec<serde_json::Value> = (0..26).map(|_| json!({})).collect();
        assert!(generate(json!({"parts": parts})).is_ok());

        let parts: Vec<serde_json::Value> = (0..27).map(|_| json!({})).collect();
        assert_eq!(
            generate(json!({"parts": parts})),
            Err(ConversionError::VoiceIndexOutOfRange(27))
        );
    }

    #[test]
    fn test_key_applies_to_both_staves() {
        let result = generate(json!({"fifths": -2, "parts": [{}]})).unwrap();
        assert_eq!(result.lilypond_source.matches("\\key bes \\major\n").count(), 2);

        let result = generate(json!({"fifths": "x", "parts": [{}]})).unwrap();
        assert_eq!(result.lilypond_source.matches("\\key b \\major\n").count(), 2);
    }

    #[test]
    fn test_adjustments_collected_from_all_staves() {
        let result = generate(json!({"parts": [
            {"measures": [{"notes": [
                {"staff": 1, "tick": 0, "type": 1, "elems": [{"step": 1, "octave": 4}]},
            ]}]},
        ]}))
        .unwrap();
        // upper staff is complete, lower staff is empty and gets a whole rest
        assert_eq!(result.adjustments.len(), 1);
        assert_eq!(result.adjustments[0].staff, Staff::Lower);
        assert_eq!(result.adjustments[0].part, 1);
    }
}
