//! Renderer
//!
//! Main rendering logic for the application.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::components::{AzureCredentialsFormWidget, HelpBar, MessageType, StatusLine};
use crate::credentials::{AzureCredentialsForm, CredentialSet, CredentialsListener};

pub struct UiState<'a, L: CredentialsListener> {
    pub form: &'a AzureCredentialsForm<L>,
    pub received: Option<&'a CredentialSet>,
    pub message: Option<(&'a str, MessageType)>,
}

pub struct Renderer;

impl Renderer {
    pub fn render<L: CredentialsListener>(frame: &mut Frame, state: &UiState<'_, L>) {
        let chunks = create_main_layout(frame.area());

        frame.render_widget(AzureCredentialsFormWidget::new(state.form), chunks[0]);
        render_status_line(frame, chunks[1], state);
        frame.render_widget(HelpBar::for_focus(state.form.focus(), state.form.is_expanded()), chunks[2]);
    }

    /// Area the form is drawn into for a given terminal size
    pub fn content_area(size: Rect) -> Rect {
        create_main_layout(size)[0]
    }
}

fn create_main_layout(size: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size)
}

fn render_status_line<L: CredentialsListener>(frame: &mut Frame, area: Rect, state: &UiState<'_, L>) {
    let mut status = StatusLine::new(state.received).focus(state.form.focus());

    if let Some((msg, msg_type)) = state.message {
        status = status.message(msg, msg_type);
    }

    frame.render_widget(status, area);
}
