//! Form field validation
//!
//! Every rule trims its input first. `validate_form` reports all failing
//! fields so the UI can mark each of them at once.

use thiserror::Error;

use super::GenerationRequest;

pub const TOPIC_MAX_CHARS: usize = 500;
pub const INDUSTRY_MAX_CHARS: usize = 50;
const API_KEY_PREFIX: &str = "sk-";
const API_KEY_MIN_CHARS: usize = 20;
const PROFILE_HOST: &str = "linkedin.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ApiKey,
    Topic,
    ProfileUrl,
    Industry,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} is required", .0.required_name())]
    Required(Field),
    #[error("Please enter a valid OpenAI API key")]
    InvalidApiKey,
    #[error("Topic description must be under 500 characters")]
    TopicTooLong,
    #[error("Please enter a valid LinkedIn URL")]
    InvalidProfileUrl,
    #[error("Industry keyword must be under 50 characters")]
    IndustryTooLong,
}

impl Field {
    fn required_name(self) -> &'static str {
        match self {
            Field::ApiKey => "API key",
            Field::Topic => "Topic description",
            Field::ProfileUrl => "LinkedIn URL",
            Field::Industry => "Industry keyword",
        }
    }
}

impl ValidationError {
    /// The field this error belongs to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required(field) => *field,
            ValidationError::InvalidApiKey => Field::ApiKey,
            ValidationError::TopicTooLong => Field::Topic,
            ValidationError::InvalidProfileUrl => Field::ProfileUrl,
            ValidationError::IndustryTooLong => Field::Industry,
        }
    }
}

/// Raw form input, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub api_key: String,
    pub topic: String,
    pub profile_url: String,
    pub industry: String,
    pub generate_image: bool,
}

impl FormInput {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::ApiKey => &self.api_key,
            Field::Topic => &self.topic,
            Field::ProfileUrl => &self.profile_url,
            Field::Industry => &self.industry,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::ApiKey => &mut self.api_key,
            Field::Topic => &mut self.topic,
            Field::ProfileUrl => &mut self.profile_url,
            Field::Industry => &mut self.industry,
        }
    }
}

pub fn validate_api_key(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(Field::ApiKey));
    }
    if !value.starts_with(API_KEY_PREFIX) || value.chars().count() < API_KEY_MIN_CHARS {
        return Err(ValidationError::InvalidApiKey);
    }
    Ok(())
}

pub fn validate_topic(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(Field::Topic));
    }
    if value.chars().count() > TOPIC_MAX_CHARS {
        return Err(ValidationError::TopicTooLong);
    }
    Ok(())
}

pub fn validate_profile_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(Field::ProfileUrl));
    }
    if !value.contains(PROFILE_HOST) {
        return Err(ValidationError::InvalidProfileUrl);
    }
    Ok(())
}

pub fn validate_industry(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(Field::Industry));
    }
    if value.chars().count() > INDUSTRY_MAX_CHARS {
        return Err(ValidationError::IndustryTooLong);
    }
    Ok(())
}

/// Validate a single field
pub fn validate_field(input: &FormInput, field: Field) -> Result<(), ValidationError> {
    let value = input.value(field);
    match field {
        Field::ApiKey => validate_api_key(value),
        Field::Topic => validate_topic(value),
        Field::ProfileUrl => validate_profile_url(value),
        Field::Industry => validate_industry(value),
    }
}

/// Validate the whole form, returning a trimmed request or every error found
pub fn validate_form(input: &FormInput) -> Result<GenerationRequest, Vec<ValidationError>> {
    let errors: Vec<ValidationError> = [Field::ApiKey, Field::Topic, Field::ProfileUrl, Field::Industry]
        .into_iter()
        .filter_map(|field| validate_field(input, field).err())
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(GenerationRequest {
        api_key: input.api_key.trim().to_string(),
        topic: input.topic.trim().to_string(),
        profile_url: input.profile_url.trim().to_string(),
        industry: input.industry.trim().to_string(),
        generate_image: input.generate_image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> FormInput {
        FormInput {
            api_key: "sk-abcdefghijklmnopqrstuvwx".to_string(),
            topic: "Remote hiring in fintech".to_string(),
            profile_url: "https://www.linkedin.com/in/someone".to_string(),
            industry: "Fintech".to_string(),
            generate_image: true,
        }
    }

    #[test]
    fn test_api_key_rules() {
        assert_eq!(validate_api_key("   "), Err(ValidationError::Required(Field::ApiKey)));
        assert_eq!(validate_api_key("pk-abcdefghijklmnopqrstu"), Err(ValidationError::InvalidApiKey));
        assert_eq!(validate_api_key("sk-short"), Err(ValidationError::InvalidApiKey));
        assert!(validate_api_key("  sk-12345678901234567  ").is_ok());
    }

    #[test]
    fn test_topic_length_limit() {
        assert!(validate_topic(&"a".repeat(TOPIC_MAX_CHARS)).is_ok());
        assert_eq!(
            validate_topic(&"a".repeat(TOPIC_MAX_CHARS + 1)),
            Err(ValidationError::TopicTooLong)
        );
    }

    #[test]
    fn test_profile_url_needs_linkedin() {
        assert_eq!(
            validate_profile_url("https://example.com/me"),
            Err(ValidationError::InvalidProfileUrl)
        );
        assert!(validate_profile_url("linkedin.com/in/me").is_ok());
    }

    #[test]
    fn test_industry_length_limit() {
        assert!(validate_industry(&"x".repeat(INDUSTRY_MAX_CHARS)).is_ok());
        assert_eq!(
            validate_industry(&"x".repeat(INDUSTRY_MAX_CHARS + 1)),
            Err(ValidationError::IndustryTooLong)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::Required(Field::ApiKey).to_string(),
            "API key is required"
        );
        assert_eq!(
            ValidationError::Required(Field::Topic).to_string(),
            "Topic description is required"
        );
        assert_eq!(
            ValidationError::TopicTooLong.to_string(),
            "Topic description must be under 500 characters"
        );
        assert_eq!(
            ValidationError::IndustryTooLong.to_string(),
            "Industry keyword must be under 50 characters"
        );
        assert_eq!(
            ValidationError::InvalidApiKey.to_string(),
            "Please enter a valid OpenAI API key"
        );
        assert_eq!(
            ValidationError::Required(Field::ProfileUrl).to_string(),
            "LinkedIn URL is required"
        );
        assert_eq!(
            ValidationError::InvalidProfileUrl.to_string(),
            "Please enter a valid LinkedIn URL"
        );
        assert_eq!(
            ValidationError::Required(Field::Industry).to_string(),
            "Industry keyword is required"
        );
    }

    #[test]
    fn test_validate_form_collects_all_errors() {
        let errors = validate_form(&FormInput::default()).unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(
            fields,
            vec![Field::ApiKey, Field::Topic, Field::ProfileUrl, Field::Industry]
        );
    }

    #[test]
    fn test_validate_form_trims() {
        let mut form = valid_form();
        form.topic = "  Remote hiring in fintech \n".to_string();
        let request = validate_form(&form).unwrap();
        assert_eq!(request.topic, "Remote hiring in fintech");
        assert!(request.generate_image);
    }
}
