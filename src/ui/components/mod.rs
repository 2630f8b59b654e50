//! UI Components
//!
//! Widgets for the Azure OpenAI settings screen.

pub mod form;
pub mod statusline;

// Re-exports
pub use form::{AzureCredentialsFormWidget, FormLayout, Hit};
pub use statusline::{HelpBar, MessageType, StatusLine};
