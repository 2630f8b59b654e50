//! Field Validation
//!
//! Per-field format checks and the error map that drives inline messages.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::model::Field;

/// Minimum API key length before the key is flagged as suspicious
pub const MIN_API_KEY_LEN: usize = 10;

/// Minimum deployment name length
pub const MIN_DEPLOYMENT_LEN: usize = 2;

static ENDPOINT_REGEX: OnceLock<Regex> = OnceLock::new();

fn endpoint_regex() -> &'static Regex {
    ENDPOINT_REGEX.get_or_init(|| {
        Regex::new(r"^https://[^\r\n\x{2028}\x{2029}]+\.openai\.azure\.com$").expect("Invalid endpoint regex")
    })
}

/// User-facing validation failure for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid Azure OpenAI endpoint (https://your-resource.openai.azure.com)")]
    InvalidEndpoint,

    #[error("API key seems too short")]
    ApiKeyTooShort,

    #[error("Deployment name is required")]
    DeploymentTooShort,
}

/// Check one field value. Empty values are never reported.
pub fn validate(field: Field, value: &str) -> Option<ValidationError> {
    if value.is_empty() {
        return None;
    }

    match field {
        Field::AzureEndpoint if !endpoint_regex().is_match(value) => {
            Some(ValidationError::InvalidEndpoint)
        }
        Field::ApiKey if value.chars().count() < MIN_API_KEY_LEN => {
            Some(ValidationError::ApiKeyTooShort)
        }
        Field::Deployment if value.chars().count() < MIN_DEPLOYMENT_LEN => {
            Some(ValidationError::DeploymentTooShort)
        }
        _ => None,
    }
}

/// Fields currently failing validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<Field, ValidationError>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace or remove the entry for `field`; other entries are untouched
    pub fn apply(&mut self, field: Field, result: Option<ValidationError>) {
        match result {
            Some(err) => {
                self.entries.insert(field, err);
            }
            None => {
                self.entries.remove(&field);
            }
        }
    }

    pub fn get(&self, field: Field) -> Option<ValidationError> {
        self.entries.get(&field).copied()
    }

    #[cfg(test)]
    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_endpoints() {
        for endpoint in [
            "https://foo.openai.azure.com",
            "https://my-resource.openai.azure.com",
            "https://a.b.openai.azure.com",
        ] {
            assert_eq!(validate(Field::AzureEndpoint, endpoint), None, "{}", endpoint);
        }
    }

    #[test]
    fn test_invalid_endpoints() {
        for endpoint in [
            "not-a-url",
            "http://foo.openai.azure.com",
            "https://.openai.azure.com",
            "https://foo.openai.azure.com/",
            "https://foo.openai.azure.com.evil",
            "https://foo.cognitiveservices.azure.com",
            " https://foo.openai.azure.com",
            "https://a\r.openai.azure.com",
            "https://a\n.openai.azure.com",
            "https://a\u{2028}.openai.azure.com",
            "https://a\u{2029}.openai.azure.com",
        ] {
            assert_eq!(
                validate(Field::AzureEndpoint, endpoint),
                Some(ValidationError::InvalidEndpoint),
                "{}",
                endpoint
            );
        }
    }

    #[test]
    fn test_empty_values_pass() {
        for field in [Field::AzureEndpoint, Field::ApiKey, Field::Deployment, Field::ApiVersion] {
            assert_eq!(validate(field, ""), None);
        }
    }

    #[test]
    fn test_api_key_length() {
        assert_eq!(validate(Field::ApiKey, "abcdefghi"), Some(ValidationError::ApiKeyTooShort));
        assert_eq!(validate(Field::ApiKey, "a"), Some(ValidationError::ApiKeyTooShort));
        assert_eq!(validate(Field::ApiKey, "abcdefghij"), None);
        assert_eq!(validate(Field::ApiKey, &"k".repeat(84)), None);
    }

    #[test]
    fn test_lengths_count_chars_not_bytes() {
        // 5 scalar values, 10 UTF-16 units, 20 bytes
        assert_eq!(validate(Field::ApiKey, "😀😀😀😀😀"), Some(ValidationError::ApiKeyTooShort));
        assert_eq!(validate(Field::ApiKey, &"é".repeat(10)), None);
        assert_eq!(validate(Field::Deployment, "é"), Some(ValidationError::DeploymentTooShort));
        assert_eq!(validate(Field::Deployment, "éé"), None);
    }

    #[test]
    fn test_deployment_length() {
        assert_eq!(validate(Field::Deployment, "x"), Some(ValidationError::DeploymentTooShort));
        assert_eq!(validate(Field::Deployment, "gp"), None);
        assert_eq!(validate(Field::Deployment, "gpt-4o"), None);
    }

    #[test]
    fn test_api_version_never_fails() {
        assert_eq!(validate(Field::ApiVersion, "anything"), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::InvalidEndpoint.to_string(),
            "Please enter a valid Azure OpenAI endpoint (https://your-resource.openai.azure.com)"
        );
        assert_eq!(ValidationError::ApiKeyTooShort.to_string(), "API key seems too short");
        assert_eq!(ValidationError::DeploymentTooShort.to_string(), "Deployment name is required");
    }

    #[test]
    fn test_error_map_apply_touches_one_field() {
        let mut errors = ErrorMap::new();
        errors.apply(Field::AzureEndpoint, Some(ValidationError::InvalidEndpoint));
        errors.apply(Field::ApiKey, Some(ValidationError::ApiKeyTooShort));
        assert_eq!(errors.len(), 2);

        errors.apply(Field::ApiKey, None);
        assert_eq!(errors.get(Field::AzureEndpoint), Some(ValidationError::InvalidEndpoint));
        assert!(!errors.contains(Field::ApiKey));

        errors.clear();
        assert!(errors.is_empty());
    }

    proptest! {
        #[test]
        fn prop_well_formed_endpoint_passes(label in "[^\r\n\u{2028}\u{2029}]+") {
            let endpoint = format!("https://{label}.openai.azure.com");
            prop_assert_eq!(validate(Field::AzureEndpoint, &endpoint), None);
        }

        #[test]
        fn prop_other_endpoints_fail(value in "\\PC{1,40}") {
            prop_assume!(!endpoint_regex().is_match(&value));
            prop_assert_eq!(validate(Field::AzureEndpoint, &value), Some(ValidationError::InvalidEndpoint));
        }

        #[test]
        fn prop_line_terminator_in_label_fails(
            head in "[a-z]{0,8}",
            tail in "[a-z]{0,8}",
            sep in prop::sample::select(vec!['\r', '\n', '\u{2028}', '\u{2029}']),
        ) {
            let endpoint = format!("https://{head}{sep}{tail}.openai.azure.com");
            prop_assert_eq!(validate(Field::AzureEndpoint, &endpoint), Some(ValidationError::InvalidEndpoint));
        }

        #[test]
        fn prop_short_keys_flagged(key in "\\PC{1,9}") {
            prop_assert_eq!(validate(Field::ApiKey, &key), Some(ValidationError::ApiKeyTooShort));
        }

        #[test]
        fn prop_long_keys_pass(key in "\\PC{10,64}") {
            prop_assert_eq!(validate(Field::ApiKey, &key), None);
        }

        #[test]
        fn prop_one_char_deployment_flagged(name in "\\PC") {
            prop_assert_eq!(validate(Field::Deployment, &name), Some(ValidationError::DeploymentTooShort));
        }

        #[test]
        fn prop_longer_deployments_pass(name in "\\PC{2,40}") {
            prop_assert_eq!(validate(Field::Deployment, &name), None);
        }
    }
}
