use serde::{Deserialize, Serialize};
use std::fmt;

pub const SUMMARY_TEMPLATE: &str =
    "Please provide a concise summary of the following text:\n\n{text}\n\nSummary:";
pub const BULLET_POINTS_TEMPLATE: &str = "Please generate a list of bullet points summarizing the key points from the following text:\n\n{text}\n\nBullet points:";

const TEXT_PLACEHOLDER: &str = "{text}";

/// Which derived field a generation request populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Summary,
    BulletPoints,
}

impl OutputKind {
    pub fn template(self) -> &'static str {
        match self {
            OutputKind::Summary => SUMMARY_TEMPLATE,
            OutputKind::BulletPoints => BULLET_POINTS_TEMPLATE,
        }
    }

    /// Name of the record field this kind writes to.
    pub fn field_name(self) -> &'static str {
        match self {
            OutputKind::Summary => "summary",
            OutputKind::BulletPoints => "bullet_points",
        }
    }

    /// Substitutes the submitted text into the fixed template.
    ///
    /// Only the single placeholder in the template is replaced, so a
    /// literal `{text}` inside the user's input is passed through verbatim.
    pub fn render_prompt(self, text: &str) -> String {
        let template = self.template();
        match template.split_once(TEXT_PLACEHOLDER) {
            Some((head, tail)) => {
                let mut prompt = String::with_capacity(template.len() + text.len());
                prompt.push_str(head);
                prompt.push_str(text);
                prompt.push_str(tail);
                prompt
            }
            None => template.to_string(),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_wraps_text() {
        let prompt = OutputKind::Summary.render_prompt("The quick brown fox.");
        assert_eq!(
            prompt,
            "Please provide a concise summary of the following text:\n\nThe quick brown fox.\n\nSummary:"
        );
    }

    #[test]
    fn bullet_points_prompt_wraps_text() {
        let prompt = OutputKind::BulletPoints.render_prompt("Line one. Line two.");
        assert!(prompt.starts_with(
            "Please generate a list of bullet points summarizing the key points from the following text:"
        ));
        assert!(prompt.contains("\n\nLine one. Line two.\n\n"));
        assert!(prompt.ends_with("Bullet points:"));
    }

    #[test]
    fn placeholder_inside_input_is_not_expanded_again() {
        let prompt = OutputKind::Summary.render_prompt("literal {text} marker");
        assert!(prompt.contains("literal {text} marker"));
        assert_eq!(prompt.matches("{text}").count(), 1);
    }

    #[test]
    fn field_names_match_record_fields() {
        assert_eq!(OutputKind::Summary.field_name(), "summary");
        assert_eq!(OutputKind::BulletPoints.to_string(), "bullet_points");
    }
}
