//! Input Module
//!
//! Maps keyboard input to form actions.

pub mod keymap;

// Re-exports
pub use keymap::{form_action, Action};
