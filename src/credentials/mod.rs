//! Credentials Module
//!
//! Azure OpenAI credential record, field validation and the form state
//! that reports complete credential sets to its owner.

pub mod form;
pub mod model;
pub mod notify;
pub mod validate;

// Re-exports
pub use form::{AzureCredentialsForm, Focus};
pub use model::{CredentialSet, Field, PartialCredentials};
pub use notify::{CredentialsListener, NotifyPayload};
pub use validate::ErrorMap;
