//! Change Notification
//!
//! Completeness gate and the callback seam towards the owning component.

use super::model::{CredentialSet, Field};

/// What the owner receives after every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyPayload {
    /// All required fields are non-empty. Format validity is not implied.
    Complete(CredentialSet),
    /// Treat as if no credentials are configured
    Incomplete,
}

impl NotifyPayload {
    /// Run the completeness gate over a snapshot
    pub fn from_credentials(creds: &CredentialSet) -> Self {
        if is_complete(creds) {
            Self::Complete(creds.clone())
        } else {
            Self::Incomplete
        }
    }

    pub fn into_option(self) -> Option<CredentialSet> {
        match self {
            Self::Complete(creds) => Some(creds),
            Self::Incomplete => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Complete(_) => "complete",
            Self::Incomplete => "incomplete",
        }
    }
}

/// Endpoint, key and deployment are all non-empty
pub fn is_complete(creds: &CredentialSet) -> bool {
    Field::REQUIRED.iter().all(|f| !creds.get(*f).is_empty())
}

/// Receiver for credential changes. Each call supersedes the previous one.
pub trait CredentialsListener {
    fn on_credentials_change(&mut self, payload: NotifyPayload);
}

impl<F> CredentialsListener for F
where
    F: FnMut(NotifyPayload),
{
    fn on_credentials_change(&mut self, payload: NotifyPayload) {
        self(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::model::ApiVersion;

    #[test]
    fn test_complete_requires_three_fields() {
        let full = CredentialSet::new("https://foo.openai.azure.com", "abcdefghij", "prod", ApiVersion::default());
        assert!(is_complete(&full));

        let no_endpoint = CredentialSet::new("", "abcdefghij", "prod", ApiVersion::default());
        assert!(!is_complete(&no_endpoint));

        let no_key = CredentialSet::new("https://foo.openai.azure.com", "", "prod", ApiVersion::default());
        assert!(!is_complete(&no_key));

        let no_deployment = CredentialSet::new("https://foo.openai.azure.com", "abcdefghij", "", ApiVersion::default());
        assert!(!is_complete(&no_deployment));
    }

    #[test]
    fn test_complete_ignores_format() {
        let creds = CredentialSet::new("not-a-url", "k", "d", ApiVersion::default());
        assert!(is_complete(&creds));
        assert_eq!(NotifyPayload::from_credentials(&creds), NotifyPayload::Complete(creds.clone()));
    }

    #[test]
    fn test_payload_option() {
        assert_eq!(NotifyPayload::Incomplete.into_option(), None);

        let creds = CredentialSet::new("e", "k", "d", ApiVersion::default());
        let payload = NotifyPayload::Complete(creds.clone());
        assert_eq!(payload.kind(), "complete");
        assert_eq!(payload.into_option(), Some(creds));
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |p: NotifyPayload| seen.push(p.kind());
            listener.on_credentials_change(NotifyPayload::Incomplete);
        }
        assert_eq!(seen, vec!["incomplete"]);
    }
}
