//! Status Line Component
//!
//! Shows what the owning application last received from the form,
//! transient messages, and key hints for the focused element.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::credentials::{CredentialSet, Focus};

/// Message type for status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
}

impl MessageType {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::White,
            Self::Success => Color::Green,
        }
    }
}

/// Status line widget
pub struct StatusLine<'a> {
    received: Option<&'a CredentialSet>,
    message: Option<(&'a str, MessageType)>,
    focus: Option<Focus>,
}

impl<'a> StatusLine<'a> {
    pub fn new(received: Option<&'a CredentialSet>) -> Self {
        Self {
            received,
            message: None,
            focus: None,
        }
    }

    pub fn message(mut self, msg: &'a str, msg_type: MessageType) -> Self {
        self.message = Some((msg, msg_type));
        self
    }

    pub fn focus(mut self, focus: Focus) -> Self {
        self.focus = Some(focus);
        self
    }
}

/// One-line summary of a received credential set; the key is masked
pub fn summarize(creds: &CredentialSet) -> String {
    let host = creds
        .azure_endpoint
        .strip_prefix("https://")
        .unwrap_or(&creds.azure_endpoint);
    format!(
        "{} · {} · {} · key {}",
        host,
        creds.deployment,
        creds.api_version,
        creds.masked_key()
    )
}

fn focus_name(focus: Focus) -> &'static str {
    match focus {
        Focus::Header => "panel",
        Focus::Endpoint => "endpoint",
        Focus::ApiKey => "api key",
        Focus::Deployment => "deployment",
        Focus::ApiVersion => "api version",
        Focus::Clear => "clear",
    }
}

impl<'a> Widget for StatusLine<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(Color::DarkGray));

        let mut x = area.x;

        // Connection indicator
        let (indicator, indicator_style) = match self.received {
            Some(_) => (" CONFIGURED ", Style::default().fg(Color::Black).bg(Color::Green)),
            None => (" NOT CONFIGURED ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        };
        buf.set_stringn(x, area.y, indicator, usize::from(area.width), indicator_style.add_modifier(Modifier::BOLD));
        x = x.saturating_add(indicator.len() as u16 + 1).min(area.right());

        let remaining = usize::from(area.right().saturating_sub(x));
        if let Some((msg, msg_type)) = self.message {
            buf.set_stringn(x, area.y, msg, remaining, Style::default().fg(msg_type.color()).bg(Color::DarkGray));
        } else {
            let text = match self.received {
                Some(creds) => summarize(creds),
                None => "no credentials configured".to_string(),
            };
            buf.set_stringn(x, area.y, text, remaining, Style::default().fg(Color::White).bg(Color::DarkGray));
        }

        if let Some(focus) = self.focus {
            let right_text = focus_name(focus);
            let right_x = area.x + area.width.saturating_sub(right_text.len() as u16 + 1);
            if right_x > x {
                buf.set_string(right_x, area.y, right_text, Style::default().fg(Color::Gray).bg(Color::DarkGray));
            }
        }
    }
}

/// Help bar widget
pub struct HelpBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
}

impl<'a> HelpBar<'a> {
    pub fn for_focus(focus: Focus, expanded: bool) -> Self {
        let mut hints = match focus {
            Focus::Header if expanded => vec![("Enter", "collapse"), ("Tab", "next")],
            Focus::Header => vec![("Enter", "expand")],
            Focus::Endpoint | Focus::Deployment => vec![("Tab", "next"), ("C-u", "clear field")],
            Focus::ApiKey => vec![("Tab", "next"), ("C-s", "show/hide key"), ("C-u", "clear field")],
            Focus::ApiVersion => vec![("←/→", "change version"), ("Tab", "next")],
            Focus::Clear => vec![("Enter", "clear all"), ("Tab", "next")],
        };
        hints.push(("C-l", "clear"));
        hints.push(("Esc", "quit"));
        Self { hints }
    }
}

impl<'a> Widget for HelpBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
        }
        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::model::ApiVersion;

    fn row(widget: impl Widget, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_summarize_masks_key() {
        let creds = CredentialSet::new("https://foo.openai.azure.com", "abcdefghij", "prod", ApiVersion::default());
        let summary = summarize(&creds);
        assert_eq!(summary, "foo.openai.azure.com · prod · 2023-05-15 · key ••••ghij");
    }

    #[test]
    fn test_status_without_credentials() {
        let text = row(StatusLine::new(None), 80);
        assert!(text.contains("NOT CONFIGURED"));
        assert!(text.contains("no credentials configured"));
    }

    #[test]
    fn test_status_message_overrides_summary() {
        let creds = CredentialSet::new("https://foo.openai.azure.com", "abcdefghij", "prod", ApiVersion::default());
        let text = row(StatusLine::new(Some(&creds)).message("Credentials cleared", MessageType::Info), 80);
        assert!(text.contains("CONFIGURED"));
        assert!(text.contains("Credentials cleared"));
        assert!(!text.contains("prod"));
    }

    #[test]
    fn test_help_bar_for_api_key() {
        let text = row(HelpBar::for_focus(Focus::ApiKey, true), 120);
        assert!(text.contains("show/hide key"));
    }
}
