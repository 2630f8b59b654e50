//! Credential Models
//!
//! The Azure OpenAI connection record and its field identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Azure OpenAI REST API version, restricted to the tokens the form offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    #[default]
    V2023_05_15,
    V2023_06_01Preview,
    V2023_07_01Preview,
    V2023_08_01Preview,
    V2023_09_01Preview,
    V2023_12_01Preview,
    V2024_02_15Preview,
}

impl ApiVersion {
    /// All selectable versions in display order
    pub const ALL: [ApiVersion; 7] = [
        Self::V2023_05_15,
        Self::V2023_06_01Preview,
        Self::V2023_07_01Preview,
        Self::V2023_08_01Preview,
        Self::V2023_09_01Preview,
        Self::V2023_12_01Preview,
        Self::V2024_02_15Preview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2023_05_15 => "2023-05-15",
            Self::V2023_06_01Preview => "2023-06-01-preview",
            Self::V2023_07_01Preview => "2023-07-01-preview",
            Self::V2023_08_01Preview => "2023-08-01-preview",
            Self::V2023_09_01Preview => "2023-09-01-preview",
            Self::V2023_12_01Preview => "2023-12-01-preview",
            Self::V2024_02_15Preview => "2024-02-15-preview",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    /// Next version, wrapping to the first
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous version, wrapping to the last
    pub fn prev(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported API version: {0}")]
pub struct UnknownApiVersion(pub String);

impl FromStr for ApiVersion {
    type Err = UnknownApiVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownApiVersion(s.to_string()))
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Form field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    AzureEndpoint,
    ApiKey,
    Deployment,
    ApiVersion,
}

impl Field {
    /// Fields that must be non-empty for the set to be complete
    pub const REQUIRED: [Field; 3] = [Self::AzureEndpoint, Self::ApiKey, Self::Deployment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AzureEndpoint => "azureEndpoint",
            Self::ApiKey => "apiKey",
            Self::Deployment => "deployment",
            Self::ApiVersion => "apiVersion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AzureEndpoint => "Azure Endpoint",
            Self::ApiKey => "API Key",
            Self::Deployment => "Deployment Name",
            Self::ApiVersion => "API Version",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::AzureEndpoint => "https://your-resource.openai.azure.com",
            Self::ApiKey => "Enter your Azure OpenAI API key",
            Self::Deployment => "your-deployment-name",
            Self::ApiVersion => "",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

/// One Azure OpenAI connection configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSet {
    pub azure_endpoint: String,
    pub api_key: String,
    pub deployment: String,
    #[zeroize(skip)]
    #[serde(default)]
    pub api_version: ApiVersion,
}

impl CredentialSet {
    pub fn new(
        azure_endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: ApiVersion,
    ) -> Self {
        Self {
            azure_endpoint: azure_endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version,
        }
    }

    /// Text value of a field; the version yields its token
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::AzureEndpoint => &self.azure_endpoint,
            Field::ApiKey => &self.api_key,
            Field::Deployment => &self.deployment,
            Field::ApiVersion => self.api_version.as_str(),
        }
    }

    /// Mutable text slot for a text field, `None` for the version
    pub(crate) fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::AzureEndpoint => Some(&mut self.azure_endpoint),
            Field::ApiKey => Some(&mut self.api_key),
            Field::Deployment => Some(&mut self.deployment),
            Field::ApiVersion => None,
        }
    }

    /// API key reduced to its last four characters
    pub fn masked_key(&self) -> String {
        let count = self.api_key.chars().count();
        if count <= 4 {
            return "•".repeat(count);
        }
        let tail: String = self.api_key.chars().skip(count - 4).collect();
        format!("{}{}", "•".repeat(4), tail)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("azure_endpoint", &self.azure_endpoint)
            .field("api_key", &"[REDACTED]")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Externally supplied seed; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialCredentials {
    pub azure_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub deployment: Option<String>,
    pub api_version: Option<String>,
}

impl PartialCredentials {
    /// Fill fields missing here from `other`
    pub fn or(self, other: PartialCredentials) -> Self {
        Self {
            azure_endpoint: self.azure_endpoint.or(other.azure_endpoint),
            api_key: self.api_key.or(other.api_key),
            deployment: self.deployment.or(other.deployment),
            api_version: self.api_version.or(other.api_version),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.azure_endpoint.is_none()
            && self.api_key.is_none()
            && self.deployment.is_none()
            && self.api_version.is_none()
    }

    /// Resolve into a full record. Empty or unknown versions fall back to the default.
    pub fn into_credentials(self) -> CredentialSet {
        let api_version = match self.api_version.as_deref() {
            None | Some("") => ApiVersion::default(),
            Some(token) => token.parse().unwrap_or_else(|e: UnknownApiVersion| {
                tracing::warn!(error = %e, fallback = %ApiVersion::default(), "ignoring seeded API version");
                ApiVersion::default()
            }),
        };

        CredentialSet::new(
            self.azure_endpoint.unwrap_or_default(),
            self.api_key.unwrap_or_default(),
            self.deployment.unwrap_or_default(),
            api_version,
        )
    }
}
