//! Credential Form State
//!
//! Holds the Azure OpenAI credential record, its validation errors and the
//! view flags of the settings panel. Every value change is validated and
//! reported to the listener before the handler returns.

use tracing::{debug, warn};
use zeroize::Zeroize;

use super::model::{ApiVersion, CredentialSet, Field, PartialCredentials};
use super::notify::{is_complete, CredentialsListener, NotifyPayload};
use super::validate::{validate, ErrorMap, ValidationError};

/// Focusable element of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Header,
    Endpoint,
    ApiKey,
    Deployment,
    ApiVersion,
    Clear,
}

impl Focus {
    /// Tab order while the panel is expanded
    pub const RING: [Focus; 6] = [
        Self::Header,
        Self::Endpoint,
        Self::ApiKey,
        Self::Deployment,
        Self::ApiVersion,
        Self::Clear,
    ];

    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Endpoint => Some(Field::AzureEndpoint),
            Self::ApiKey => Some(Field::ApiKey),
            Self::Deployment => Some(Field::Deployment),
            Self::ApiVersion => Some(Field::ApiVersion),
            Self::Header | Self::Clear => None,
        }
    }

    pub fn from_field(field: Field) -> Self {
        match field {
            Field::AzureEndpoint => Self::Endpoint,
            Field::ApiKey => Self::ApiKey,
            Field::Deployment => Self::Deployment,
            Field::ApiVersion => Self::ApiVersion,
        }
    }

    /// Focus on an editable text input
    pub fn text_field(&self) -> Option<Field> {
        self.field().filter(|f| *f != Field::ApiVersion)
    }

    fn index(&self) -> usize {
        Self::RING.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Azure OpenAI credentials form
pub struct AzureCredentialsForm<L: CredentialsListener> {
    credentials: CredentialSet,
    errors: ErrorMap,
    is_expanded: bool,
    show_api_key: bool,
    focus: Focus,
    cursor: usize,
    listener: L,
}

impl<L: CredentialsListener> AzureCredentialsForm<L> {
    /// Mount the form. Seeded values are neither validated nor reported.
    pub fn new(initial: Option<PartialCredentials>, listener: L) -> Self {
        let credentials = initial.map(PartialCredentials::into_credentials).unwrap_or_default();

        Self {
            credentials,
            errors: ErrorMap::new(),
            is_expanded: false,
            show_api_key: false,
            focus: Focus::Header,
            cursor: 0,
            listener,
        }
    }

    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<ValidationError> {
        self.errors.get(field)
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn show_api_key(&self) -> bool {
        self.show_api_key
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Cursor position in characters within the focused text field
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All required fields are non-empty
    pub fn is_complete(&self) -> bool {
        is_complete(&self.credentials)
    }

    /// Complete and no field currently fails validation
    pub fn show_ready_indicator(&self) -> bool {
        self.is_complete() && self.errors.is_empty()
    }

    /// Replace a field value, validate it and notify the listener
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let mut value = value.into();

        if field == Field::ApiVersion {
            match value.parse::<ApiVersion>() {
                Ok(version) => self.credentials.api_version = version,
                Err(e) => {
                    warn!(error = %e, "rejected API version change");
                    return;
                }
            }
        } else if let Some(slot) = self.credentials.text_mut(field) {
            slot.zeroize();
            std::mem::swap(slot, &mut value);
        }

        self.commit_change(field);
    }

    pub fn select_api_version(&mut self, version: ApiVersion) {
        self.credentials.api_version = version;
        self.commit_change(Field::ApiVersion);
    }

    pub fn cycle_api_version(&mut self, forward: bool) {
        let current = self.credentials.api_version;
        self.select_api_version(if forward { current.next() } else { current.prev() });
    }

    fn commit_change(&mut self, field: Field) {
        let value = self.credentials.get(field);
        let result = validate(field, value);
        let len = value.chars().count();
        self.errors.apply(field, result);

        let payload = NotifyPayload::from_credentials(&self.credentials);
        debug!(
            field = field.as_str(),
            len,
            invalid = result.is_some(),
            payload = payload.kind(),
            "credential field changed"
        );
        self.listener.on_credentials_change(payload);
    }

    /// Reset every field including the version, drop all errors and report no credentials
    pub fn clear(&mut self) {
        self.credentials.zeroize();
        self.credentials = CredentialSet::default();
        self.errors.clear();
        self.cursor = 0;

        debug!("credentials cleared");
        self.listener.on_credentials_change(NotifyPayload::Incomplete);
    }

    pub fn toggle_expanded(&mut self) {
        self.is_expanded = !self.is_expanded;
        if !self.is_expanded {
            self.focus = Focus::Header;
        }
        debug!(expanded = self.is_expanded, "panel toggled");
    }

    /// Only affects how the key is rendered
    pub fn toggle_api_key_visibility(&mut self) {
        self.show_api_key = !self.show_api_key;
        debug!(visible = self.show_api_key, "api key visibility toggled");
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if !self.is_expanded && focus != Focus::Header {
            return;
        }
        self.focus = focus;
        self.cursor = self.focused_len();
    }

    pub fn next_focus(&mut self) {
        if !self.is_expanded {
            return;
        }
        let next = Focus::RING[(self.focus.index() + 1) % Focus::RING.len()];
        self.set_focus(next);
    }

    pub fn prev_focus(&mut self) {
        if !self.is_expanded {
            return;
        }
        let len = Focus::RING.len();
        let prev = Focus::RING[(self.focus.index() + len - 1) % len];
        self.set_focus(prev);
    }

    /// Press the focused element. Returns false when it has no press action.
    pub fn activate(&mut self) -> bool {
        match self.focus {
            Focus::Header => self.toggle_expanded(),
            Focus::Clear => self.clear(),
            Focus::ApiVersion => self.cycle_api_version(true),
            Focus::Endpoint | Focus::ApiKey | Focus::Deployment => return false,
        }
        true
    }

    fn focused_len(&self) -> usize {
        self.focus
            .text_field()
            .map(|f| self.credentials.get(f).chars().count())
            .unwrap_or(0)
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String, &mut usize) -> bool) {
        let Some(field) = self.focus.text_field() else { return };
        let mut value = self.credentials.get(field).to_string();
        let mut cursor = self.cursor.min(value.chars().count());

        if edit(&mut value, &mut cursor) {
            self.cursor = cursor;
            self.set_field(field, value);
        } else {
            value.zeroize();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit_focused(|value, cursor| {
            let at = byte_offset(value, *cursor);
            value.insert(at, c);
            *cursor += 1;
            true
        });
    }

    pub fn delete_char(&mut self) {
        self.edit_focused(|value, cursor| {
            if *cursor == 0 {
                return false;
            }
            *cursor -= 1;
            let at = byte_offset(value, *cursor);
            value.remove(at);
            true
        });
    }

    pub fn delete_char_forward(&mut self) {
        self.edit_focused(|value, cursor| {
            if *cursor >= value.chars().count() {
                return false;
            }
            let at = byte_offset(value, *cursor);
            value.remove(at);
            true
        });
    }

    pub fn clear_field(&mut self) {
        self.edit_focused(|value, cursor| {
            if value.is_empty() {
                return false;
            }
            value.zeroize();
            *cursor = 0;
            true
        });
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.focused_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.focused_len();
    }
}

fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}
