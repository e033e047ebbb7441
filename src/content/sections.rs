//! Splits a completion reply into labeled sections.
//!
//! The model is asked to emit four headers but nothing guarantees it does,
//! so parsing is permissive: unknown chunks are dropped and a missing post
//! header falls back to the whole reply.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLabel {
    UserStyleSummary,
    RegionalTrendsInsight,
    GeneratedPost,
    ImagePrompt,
}

impl SectionLabel {
    /// Labels in the order chunks are tested against them
    pub const ALL: [SectionLabel; 4] = [
        SectionLabel::UserStyleSummary,
        SectionLabel::RegionalTrendsInsight,
        SectionLabel::GeneratedPost,
        SectionLabel::ImagePrompt,
    ];

    /// Marker text the model writes in front of the section
    pub fn header(self) -> &'static str {
        match self {
            SectionLabel::UserStyleSummary => "User Style Summary:",
            SectionLabel::RegionalTrendsInsight => "Regional Trends Insight:",
            SectionLabel::GeneratedPost => "Generated LinkedIn Post:",
            SectionLabel::ImagePrompt => "LinkedIn-Optimized Image Prompt:",
        }
    }

    /// Title shown above the section body
    pub fn title(self) -> &'static str {
        match self {
            SectionLabel::UserStyleSummary => "🎯 User Style Summary",
            SectionLabel::RegionalTrendsInsight => "📈 Regional Trends Insight",
            SectionLabel::GeneratedPost => "✍️ Generated LinkedIn Post",
            SectionLabel::ImagePrompt => "🖼️ LinkedIn-Optimized Image Prompt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: SectionLabel,
    pub body: String,
}

impl Section {
    fn new(label: SectionLabel, body: impl Into<String>) -> Self {
        Self {
            label,
            body: body.into(),
        }
    }
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternation = SectionLabel::ALL
            .iter()
            .map(|label| regex::escape(label.header()))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation).expect("header alternation is a valid regex")
    })
}

fn post_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"(?s){}(.*?)(?:{}|{}|\z)",
            regex::escape(SectionLabel::GeneratedPost.header()),
            regex::escape(SectionLabel::UserStyleSummary.header()),
            regex::escape(SectionLabel::RegionalTrendsInsight.header()),
        );
        Regex::new(&pattern).expect("post pattern is a valid regex")
    })
}

/// Cut `raw` immediately before every header occurrence. The header stays
/// at the front of the chunk that follows it.
fn split_chunks(raw: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;

    for m in header_regex().find_iter(raw) {
        if m.start() > start {
            chunks.push(&raw[start..m.start()]);
        }
        start = m.start();
    }
    if start < raw.len() {
        chunks.push(&raw[start..]);
    }

    chunks
}

/// Sections of one reply, in source order
pub type FormattedOutput = Vec<Section>;

/// Parse a reply into sections, in the order they appear.
///
/// A chunk becomes a section when it contains one of the headers; the first
/// header (in [`SectionLabel::ALL`] order) wins and is removed from the body.
/// Image prompt chunks are only kept when `include_image_section` is set.
pub fn parse(raw: &str, include_image_section: bool) -> FormattedOutput {
    let mut sections = Vec::new();

    for chunk in split_chunks(raw) {
        if chunk.trim().is_empty() {
            continue;
        }

        let Some(label) = SectionLabel::ALL
            .into_iter()
            .find(|label| chunk.contains(label.header()))
        else {
            continue;
        };

        if label == SectionLabel::ImagePrompt && !include_image_section {
            tracing::debug!("Dropping image prompt section (not requested)");
            continue;
        }

        let body = chunk.replacen(label.header(), "", 1);
        sections.push(Section::new(label, body.trim()));
    }

    sections
}

/// Pull the post body out of a reply for the clipboard.
///
/// Falls back to the whole reply, trimmed, when there is no post header.
pub fn extract_post(raw: &str) -> String {
    match post_regex().captures(raw).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_sections_in_source_order() {
        let raw = "User Style Summary: Friendly.\nGenerated LinkedIn Post: Hello world.\nRegional Trends Insight: Growing.";
        let sections = parse(raw, false);

        assert_eq!(
            sections,
            vec![
                Section::new(SectionLabel::UserStyleSummary, "Friendly."),
                Section::new(SectionLabel::GeneratedPost, "Hello world."),
                Section::new(SectionLabel::RegionalTrendsInsight, "Growing."),
            ]
        );
        assert_eq!(extract_post(raw), "Hello world.");
    }

    #[test]
    fn test_no_headers() {
        let raw = "Just a plain paragraph about hiring.";
        assert!(parse(raw, true).is_empty());
        assert_eq!(extract_post(raw), raw);
    }

    #[test]
    fn test_no_headers_fallback_is_trimmed() {
        let raw = "\n  A bare paragraph about hiring.  \n";
        assert!(parse(raw, false).is_empty());
        assert_eq!(extract_post(raw), "A bare paragraph about hiring.");
    }

    #[test]
    fn test_image_prompt_gated_by_flag() {
        let raw = "LinkedIn-Optimized Image Prompt: A sunrise.";
        assert_eq!(
            parse(raw, true),
            vec![Section::new(SectionLabel::ImagePrompt, "A sunrise.")]
        );
        assert!(parse(raw, false).is_empty());
    }

    #[test]
    fn test_image_prompt_dropped_among_other_sections() {
        let raw = "Generated LinkedIn Post: Post.\nLinkedIn-Optimized Image Prompt: Skyline.\nRegional Trends Insight: Up.";
        let labels: Vec<_> = parse(raw, false).into_iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![SectionLabel::GeneratedPost, SectionLabel::RegionalTrendsInsight]
        );
    }

    #[test]
    fn test_preamble_without_header_is_dropped() {
        let raw = "Sure! Here you go.\n\nUser Style Summary: Crisp and direct.";
        let sections = parse(raw, false);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "Crisp and direct.");
    }

    #[test]
    fn test_duplicate_headers_kept() {
        let raw = "Generated LinkedIn Post: First.\nGenerated LinkedIn Post: Second.";
        let sections = parse(raw, false);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, "First.");
        assert_eq!(sections[1].body, "Second.");
        // Lazy capture stops at end of text, so the first post runs to the end
        assert_eq!(extract_post(raw), "First.\nGenerated LinkedIn Post: Second.");
    }

    #[test]
    fn test_markdown_decorated_headers() {
        let raw = "**User Style Summary:** Warm.\n**Generated LinkedIn Post:** Big news!";
        let sections = parse(raw, false);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label, SectionLabel::UserStyleSummary);
        assert_eq!(sections[0].body, "** Warm.\n**");
        assert_eq!(sections[1].body, "** Big news!");
    }

    #[test]
    fn test_extract_post_stops_at_next_known_header() {
        let raw = "Generated LinkedIn Post:\n  Line one.\n  Line two.\n\nUser Style Summary: Calm.";
        assert_eq!(extract_post(raw), "Line one.\n  Line two.");
    }

    #[test]
    fn test_extract_post_runs_through_image_prompt() {
        // Only the summary and trends headers terminate the post
        let raw = "Generated LinkedIn Post: Hi.\nLinkedIn-Optimized Image Prompt: Sun.";
        assert_eq!(extract_post(raw), "Hi.\nLinkedIn-Optimized Image Prompt: Sun.");
    }

    #[test]
    fn test_extract_post_trailing_text() {
        let raw = "Generated LinkedIn Post:   Launch day is here.  \n";
        assert_eq!(extract_post(raw), "Launch day is here.");
    }

    #[test]
    fn test_blank_header_body() {
        let raw = "User Style Summary:   \nRegional Trends Insight: Rising.";
        let sections = parse(raw, false);
        assert_eq!(sections[0], Section::new(SectionLabel::UserStyleSummary, ""));
        assert_eq!(sections[1].body, "Rising.");
    }

    #[test]
    fn test_parse_is_pure() {
        let raw = "Regional Trends Insight: A\nGenerated LinkedIn Post: B\nLinkedIn-Optimized Image Prompt: C";
        assert_eq!(parse(raw, true), parse(raw, true));
        assert_eq!(parse(raw, true).len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("", true).is_empty());
        assert_eq!(extract_post(""), "");
    }
}
