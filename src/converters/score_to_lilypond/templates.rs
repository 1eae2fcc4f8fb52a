//! LilyPond template rendering
//!
//! The document skeleton (version, header, score block) lives in a Mustache
//! template; the voice blocks are rendered in Rust and inserted verbatim.
//! All placeholders use triple braces so nothing is HTML-escaped.

use serde::Serialize;

use crate::converters::score_to_lilypond::errors::ConversionError;

/// Template selection for LilyPond output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LilyPondTemplate {
    /// Header, voice definitions and a two-staff piano score
    PianoStaff,
}

/// Context data for template rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    /// LilyPond version (e.g., "2.20.0")
    pub version: String,
    /// Header fields, already escaped for LilyPond strings
    pub title: String,
    pub composer: String,
    pub arranger: String,
    /// Voice definition blocks, each starting with a blank line
    pub voices: String,
    /// Variable names bound into the piano staff
    pub upper_voice: String,
    pub lower_voice: String,
    pub midi_tempo: String,
}

impl TemplateContext {
    pub fn builder(version: String, voices: String) -> TemplateContextBuilder {
        TemplateContextBuilder::new(version, voices)
    }
}

/// Builder for TemplateContext
pub struct TemplateContextBuilder {
    context: TemplateContext,
}

impl TemplateContextBuilder {
    pub fn new(version: String, voices: String) -> Self {
        Self {
            context: TemplateContext {
                version,
                title: String::new(),
                composer: String::new(),
                arranger: String::new(),
                voices,
                upper_voice: String::new(),
                lower_voice: String::new(),
                midi_tempo: String::new(),
            },
        }
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.context.title = title.into();
        self
    }

    pub fn composer<S: Into<String>>(mut self, composer: S) -> Self {
        self.context.composer = composer.into();
        self
    }

    pub fn arranger<S: Into<String>>(mut self, arranger: S) -> Self {
        self.context.arranger = arranger.into();
        self
    }

    /// Names of the voices placed on the upper and lower staff
    pub fn staff_voices<S: Into<String>>(mut self, upper: S, lower: S) -> Self {
        self.context.upper_voice = upper.into();
        self.context.lower_voice = lower.into();
        self
    }

    pub fn midi_tempo(mut self, tempo: u32) -> Self {
        self.context.midi_tempo = tempo.to_string();
        self
    }

    pub fn build(self) -> TemplateContext {
        self.context
    }
}

/// Get template content by type
pub fn get_template_content(template_type: LilyPondTemplate) -> &'static str {
    match template_type {
        LilyPondTemplate::PianoStaff => include_str!("templates/piano_staff.ly.mustache"),
    }
}

/// Render a LilyPond document using a template
pub fn render_lilypond(
    template_type: LilyPondTemplate,
    context: &TemplateContext,
) -> Result<String, ConversionError> {
    let template = mustache::compile_str(get_template_content(template_type))
        .map_err(|e| ConversionError::Template(e.to_string()))?;
    template
        .render_to_string(context)
        .map_err(|e| ConversionError::Template(e.to_string()))
}

/// Hardcoded rendering of the piano staff layout, byte-identical to the template
pub fn render_piano_staff_fallback(context: &TemplateContext) -> String {
    let mut output = String::new();
    output.push_str(&format!("\\version \"{}\"\n\n", context.version));
    output.push_str("\\header {\n");
    output.push_str(&format!("  title = \"{}\"\n", context.title));
    output.push_str(&format!("  composer = \"{}\"\n", context.composer));
    output.push_str(&format!("  arranger = \"{}\"\n", context.arranger));
    output.push_str("  tagline = ##f\n");
    output.push_str("}\n");
    output.push_str(&context.voices);
    output.push_str("\n\\score {\n");
    output.push_str("  \\new PianoStaff <<\n");
    output.push_str(&format!("    \\new Staff = \"upper\" \\{}\n", context.upper_voice));
    output.push_str(&format!("    \\new Staff = \"lower\" \\{}\n", context.lower_voice));
    output.push_str("  >>\n");
    output.push_str("  \\layout { }\n");
    output.push_str(&format!("  \\midi {{ \\tempo 4 = {} }}\n", context.midi_tempo));
    output.push_str("}\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> TemplateContext {
        TemplateContext::builder(
            "2.20.0".to_string(),
            "\nrightA = {\n  c'1 |\n}\n".to_string(),
        )
        .title("Song <&>")
        .composer("Someone")
        .arranger("Uploader")
        .staff_voices("rightA", "leftA")
        .midi_tempo(80)
        .build()
    }

    #[test]
    fn test_template_context_builder() {
        let context = sample_context();
        assert_eq!(context.version, "2.20.0");
        assert_eq!(context.title, "Song <&>");
        assert_eq!(context.upper_voice, "rightA");
        assert_eq!(context.lower_voice, "leftA");
        assert_eq!(context.midi_tempo, "80");
    }

    #[test]
    fn test_render_piano_staff_template() {
        let rendered = render_lilypond(LilyPondTemplate::PianoStaff, &sample_context()).unwrap();
        assert!(rendered.starts_with("\\version \"2.20.0\"\n\n\\header {\n"));
        assert!(rendered.contains("  title = \"Song <&>\"\n"));
        assert!(rendered.contains("}\n\nrightA = {\n  c'1 |\n}\n\n\\score {\n"));
        assert!(rendered.contains("    \\new Staff = \"upper\" \\rightA\n"));
        assert!(rendered.contains("  \\midi { \\tempo 4 = 80 }\n"));
        assert!(rendered.ends_with("}\n"));
    }

    #[test]
    fn test_fallback_matches_template() {
        let context = sample_context();
        let rendered = render_lilypond(LilyPondTemplate::PianoStaff, &context).unwrap();
        assert_eq!(rendered, render_piano_staff_fallback(&context));

        let empty = TemplateContext::builder("2.24.0".to_string(), String::new())
            .staff_voices("rightA", "leftA")
            .midi_tempo(120)
            .build();
        let rendered = render_lilypond(LilyPondTemplate::PianoStaff, &empty).unwrap();
        assert_eq!(rendered, render_piano_staff_fallback(&empty));
    }
}
