//! Application State
//!
//! Owns the credentials form and keeps whatever the form last reported.

mod config;
mod input;

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::Frame;
use tracing::info;

use crate::credentials::{AzureCredentialsForm, CredentialSet, CredentialsListener, NotifyPayload};
use crate::ui::{MessageType, Renderer, UiState};

pub use config::{default_log_file, prepare_log_dir, resolve_initial, AppConfig};

/// Latest credentials reported by the form. Each report replaces the previous one.
#[derive(Debug, Default)]
pub struct ReceivedCredentials {
    latest: Option<CredentialSet>,
    updates: usize,
}

impl ReceivedCredentials {
    pub fn latest(&self) -> Option<&CredentialSet> {
        self.latest.as_ref()
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl CredentialsListener for ReceivedCredentials {
    fn on_credentials_change(&mut self, payload: NotifyPayload) {
        let was_configured = self.latest.is_some();
        self.latest = payload.into_option();
        self.updates += 1;

        if was_configured != self.latest.is_some() {
            info!(configured = self.latest.is_some(), "credential availability changed");
        }
    }
}

pub struct App {
    pub config: AppConfig,
    pub form: AzureCredentialsForm<ReceivedCredentials>,
    pub terminal_size: Rect,
    pub message: Option<(String, MessageType, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut form = AzureCredentialsForm::new(config.initial.clone(), ReceivedCredentials::default());
        if config.start_expanded {
            form.toggle_expanded();
        }

        Self {
            config,
            form,
            terminal_size: Rect::default(),
            message: None,
            should_quit: false,
        }
    }

    /// Credentials the application may use right now
    pub fn received(&self) -> Option<&CredentialSet> {
        self.form.listener().latest()
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.terminal_size = frame.area();
        self.check_message_expiry();

        let state = UiState {
            form: &self.form,
            received: self.received(),
            message: self.message.as_ref().map(|(m, t, _)| (m.as_str(), *t)),
        };

        Renderer::render(frame, &state);
    }

    fn check_message_expiry(&mut self) {
        let timeout = self.config.message_timeout;
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, _, time)| time.elapsed() > timeout);

        if expired {
            self.message = None;
        }
    }

    pub fn set_message(&mut self, msg: &str, msg_type: MessageType) {
        self.message = Some((msg.to_string(), msg_type, Instant::now()));
    }
}
