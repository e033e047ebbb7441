pub mod prompt;
pub mod sections;
pub mod validate;

use serde::Serialize;

use sections::FormattedOutput;

/// A validated, trimmed form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub api_key: String,
    pub topic: String,
    pub profile_url: String,
    pub industry: String,
    pub generate_image: bool,
}

impl GenerationRequest {
    /// Key as shown in the request summary
    pub fn masked_api_key(&self) -> &'static str {
        if self.api_key.is_empty() {
            ""
        } else {
            "••••••••••••••••"
        }
    }
}

/// Everything derived from one completion reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedContent {
    pub sections: FormattedOutput,
    pub post: String,
    #[serde(skip)]
    pub raw: String,
}

impl GeneratedContent {
    /// Parse a reply. Surrounding whitespace is dropped first, whether the
    /// text came from the API or from a saved file.
    pub fn from_reply(raw: impl Into<String>, include_image_section: bool) -> Self {
        let raw = raw.into().trim().to_string();
        Self {
            sections: sections::parse(&raw, include_image_section),
            post: sections::extract_post(&raw),
            raw,
        }
    }
}
