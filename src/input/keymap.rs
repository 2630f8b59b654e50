//! Keymap
//!
//! Key bindings for the credentials form mapped to actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::credentials::Focus;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Focus
    NextFocus,
    PrevFocus,

    // Panel
    Activate,
    ToggleExpanded,
    ToggleApiKeyVisibility,
    Clear,

    // API version selector
    NextVersion,
    PrevVersion,

    // Text input
    InsertChar(char),
    DeleteChar,
    DeleteCharForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ClearLine,

    // Application
    Quit,

    // No action
    None,
}

/// Map a key event to an action given the focused element
pub fn form_action(key: KeyEvent, focus: Focus) -> Action {
    if let Some(action) = global_action(key) {
        return action;
    }

    match focus {
        Focus::Header | Focus::Clear => button_action(key),
        Focus::ApiVersion => select_action(key),
        Focus::Endpoint | Focus::ApiKey | Focus::Deployment => text_input_action(key),
    }
}

/// Bindings that apply regardless of focus
fn global_action(key: KeyEvent) -> Option<Action> {
    let action = match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Tab, KeyModifiers::NONE) | (KeyCode::Down, _) => Action::NextFocus,
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => Action::PrevFocus,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::ToggleApiKeyVisibility,
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => Action::Clear,
        (KeyCode::Char('e'), KeyModifiers::ALT) => Action::ToggleExpanded,
        _ => return None,
    };
    Some(action)
}

fn button_action(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        _ => Action::None,
    }
}

fn select_action(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right => Action::NextVersion,
        KeyCode::Left => Action::PrevVersion,
        _ => Action::None,
    }
}

/// Map key event to action in a text field
pub fn text_input_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Backspace, _) => Action::DeleteChar,
        (KeyCode::Delete, _) => Action::DeleteCharForward,
        (KeyCode::Left, _) => Action::CursorLeft,
        (KeyCode::Right, _) => Action::CursorRight,
        (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => Action::CursorHome,
        (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => Action::CursorEnd,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ClearLine,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::InsertChar(c),
        _ => Action::None,
    }
}
