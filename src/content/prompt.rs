//! Prompt assembly for a generation request

use crate::llm::ChatMessage;

use super::GenerationRequest;

pub const SYSTEM_PROMPT: &str = "You are an expert LinkedIn content strategist and social media analyst specializing in the Indian market. You excel at creating personalized, culturally relevant content that matches individual user styles while incorporating current trending strategies. You have deep knowledge of LinkedIn engagement patterns, Indian professional culture, and regional content preferences.";

const IMAGE_INSTRUCTION: &str = r#"
4. If image generation is requested, create a LinkedIn-optimized image prompt that:
   - Is visually engaging, professional, and closely aligned with the topic and post content
   - Uses imagery suited for LinkedIn (simple, vibrant, relevant to professional context)
   - Output a clear, concise description for image generation (DALL-E or similar)
   - Ensure image fits recommended LinkedIn post aspect ratio (1200x627px)
   - Include this as a separate section: "**LinkedIn-Optimized Image Prompt:**""#;

const IMAGE_FORMAT_LINE: &str = "4. **LinkedIn-Optimized Image Prompt**: A short, descriptive prompt suitable for GPT/DALL-E image generation, relevant and appropriate for LinkedIn.";

/// Build the user prompt for `request`, targeting `region`
pub fn build_user_prompt(request: &GenerationRequest, region: &str) -> String {
    let image_instruction = if request.generate_image { IMAGE_INSTRUCTION } else { "" };
    let image_format = if request.generate_image { IMAGE_FORMAT_LINE } else { "" };
    let image_flag = if request.generate_image { "Yes" } else { "No" };
    let tailored = if request.generate_image {
        "(if included) the image prompt are "
    } else {
        "content is "
    };

    format!(
        r#"You are an AI content assistant specialized in crafting personalized LinkedIn posts.

Inputs:
- Topic overview provided by the user: "{topic}"
- User's LinkedIn profile URL: "{url}"
- Industry keyword: "{industry}"
- User's region or cultural context: {region}
- Generate image: {image_flag}

Tasks:
1. Analyze the publicly available information on the LinkedIn profile at "{url}", focusing on the user's recent posts.
2. Extract and summarize the user's typical writing tone (e.g., professional, conversational, motivational), style (e.g., storytelling, data-driven, concise), and frequent themes or topics.
3. Research current LinkedIn engagement trends relevant to {region} professionals and the topic "{topic}", identifying effective post formats, hooks, and language nuances.
4. Generate a fresh LinkedIn post that:
   - Reflects the user's unique voice and writing style as deduced from their recent content.
   - Aligns closely with the user-provided topic "{topic}".
   - Incorporates culturally relevant references or examples tailored to the {region} audience.
   - Is engaging, concise (ideally 100-250 words), and encourages meaningful interaction.
   - Uses compelling hooks, relevant industry insights, and clear calls to action.
   - Applies formatting such as short paragraphs, bullets, or bold text for scan-ability.{image_instruction}
5. Present the output as a polished, ready-to-post LinkedIn update.
6. Ensure that no private or sensitive data is included or referenced.
7. Do not include the API key in the generated content or responses.

Output format:
1. **User Style Summary**: 2-3 sentences capturing tone and style.
2. **Regional Trends Insight**: 2-3 bullets outlining engagement trends for "{topic}" in {region}.
3. **Generated LinkedIn Post**: Formatted, ready-for-LinkedIn content (under 250 words if possible).
{image_format}

Make sure the text and {tailored}tailored for professional appeal and high engagement on LinkedIn.

Note: Since the LinkedIn profile at {url} cannot actually be accessed, base the content on general best practices and trending strategies for LinkedIn content in {region}, tailored to the topic and industry keyword provided."#,
        topic = request.topic,
        url = request.profile_url,
        industry = request.industry,
    )
}

/// System persona followed by the user prompt
pub fn build_messages(request: &GenerationRequest, region: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(request, region)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::sections::SectionLabel;

    fn request(generate_image: bool) -> GenerationRequest {
        GenerationRequest {
            api_key: "sk-abcdefghijklmnopqrstuvwx".to_string(),
            topic: "AI in agritech".to_string(),
            profile_url: "https://linkedin.com/in/farmer".to_string(),
            industry: "Agriculture".to_string(),
            generate_image,
        }
    }

    #[test]
    fn test_prompt_interpolates_inputs() {
        let prompt = build_user_prompt(&request(false), "India");
        assert!(prompt.contains(r#"Topic overview provided by the user: "AI in agritech""#));
        assert!(prompt.contains(r#"Industry keyword: "Agriculture""#));
        assert!(prompt.contains("User's region or cultural context: India"));
        assert!(prompt.contains("Generate image: No"));
    }

    #[test]
    fn test_image_section_only_when_requested() {
        let without = build_user_prompt(&request(false), "India");
        let with = build_user_prompt(&request(true), "India");

        assert!(!without.contains("LinkedIn-Optimized Image Prompt"));
        assert!(with.contains("**LinkedIn-Optimized Image Prompt:**"));
        assert!(with.contains("Generate image: Yes"));
    }

    #[test]
    fn test_prompt_does_not_leak_api_key() {
        let prompt = build_user_prompt(&request(true), "India");
        assert!(!prompt.contains("sk-abcdefghijklmnopqrstuvwx"));
    }

    #[test]
    fn test_prompt_names_parsed_sections() {
        let prompt = build_user_prompt(&request(true), "Brazil");
        for label in [
            SectionLabel::UserStyleSummary,
            SectionLabel::RegionalTrendsInsight,
            SectionLabel::GeneratedPost,
        ] {
            let name = label.header().trim_end_matches(':');
            assert!(prompt.contains(name), "missing {name}");
        }
        assert!(prompt.contains("in Brazil"));
    }

    #[test]
    fn test_messages_roles() {
        let messages = build_messages(&request(false), "India");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }
}
