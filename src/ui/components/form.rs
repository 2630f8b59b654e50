//! Azure Credentials Form Component
//!
//! Collapsible settings panel with the endpoint, API key, deployment and
//! API version inputs. Layout is computed separately from drawing so mouse
//! clicks can be hit-tested against the same rectangles.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::credentials::{AzureCredentialsForm, CredentialsListener, ErrorMap, Field, Focus};

pub const PANEL_WIDTH: u16 = 72;

const TITLE: &str = "Azure OpenAI Settings";
const SETTINGS_ICON: &str = "󰒓";
const INFO_ICON: &str = "󰋽";
const EYE_ICON: &str = "󰈈";
const EYE_OFF_ICON: &str = "󰈉";
const READY_DOT: &str = "●";
const MASK_CHAR: char = '•';

const PRIVACY_TITLE: &str = "Privacy & Security";
const PRIVACY_NOTE: &str = "Your credentials are used only for this session and are never stored, \
logged, or shared. They are transmitted securely over HTTPS and discarded immediately after use.";
const HELP_TITLE: &str = "Need help finding these values?";
const HELP_HINT: &str = "Visit your Azure OpenAI resource in the Azure portal. Your endpoint and \
keys are in the \"Keys and Endpoint\" section.";

const CLEAR_LABEL: &str = "[ Clear ]";
const READY_LABEL: &str = "Ready to use";
const EYE_WIDTH: u16 = 3;

/// Display order of the inputs
const FIELDS: [Field; 4] = [Field::AzureEndpoint, Field::ApiKey, Field::Deployment, Field::ApiVersion];

/// Region of the panel hit by a mouse click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Header,
    EyeToggle,
    Clear,
    Field(Field),
}

/// Rectangles for one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub field: Field,
    pub label: Rect,
    pub input: Rect,
    pub error: Option<Rect>,
}

/// Panel geometry for a given area and form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    pub panel: Rect,
    pub header: Rect,
    pub privacy: Option<Rect>,
    pub fields: Vec<FieldSlot>,
    pub eye: Option<Rect>,
    pub clear: Option<Rect>,
    pub ready: Option<Rect>,
    pub help: Option<Rect>,
}

/// Allocates rows top to bottom inside the panel
struct RowCursor {
    x: u16,
    y: u16,
    width: u16,
    bottom: u16,
}

impl RowCursor {
    fn take(&mut self, height: u16) -> Option<Rect> {
        if height == 0 || self.y.saturating_add(height) > self.bottom {
            return None;
        }
        let rect = Rect::new(self.x, self.y, self.width, height);
        self.y += height;
        Some(rect)
    }

    fn skip(&mut self) {
        self.y = self.y.saturating_add(1).min(self.bottom);
    }
}

impl FormLayout {
    pub fn compute(area: Rect, expanded: bool, errors: &ErrorMap) -> Self {
        let width = PANEL_WIDTH.min(area.width.saturating_sub(4)).max(area.width.min(20));
        let inner_width = width.saturating_sub(2);
        let wanted = content_height(inner_width, expanded, errors) + 2;
        let height = wanted.min(area.height);

        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + u16::from(area.height > height);
        let panel = Rect::new(x, y, width, height.min(area.bottom().saturating_sub(y)));

        let mut rows = RowCursor {
            x: panel.x + 1,
            y: panel.y + 1,
            width: inner_width,
            bottom: panel.bottom().saturating_sub(1),
        };

        let header = rows.take(1).unwrap_or(Rect::new(panel.x, panel.y, 0, 0));
        let mut layout = Self {
            panel,
            header,
            privacy: None,
            fields: Vec::new(),
            eye: None,
            clear: None,
            ready: None,
            help: None,
        };

        if !expanded {
            return layout;
        }

        rows.skip();
        layout.privacy = rows.take(1 + wrapped_height(PRIVACY_NOTE, inner_width));
        rows.skip();

        for field in FIELDS {
            let Some(label) = rows.take(1) else { break };
            let Some(input) = rows.take(1) else { break };
            let error = errors
                .get(field)
                .and_then(|e| rows.take(wrapped_height(&e.to_string(), inner_width)));
            rows.skip();

            if field == Field::ApiKey && input.width > EYE_WIDTH {
                layout.eye = Some(Rect::new(input.right() - EYE_WIDTH, input.y, EYE_WIDTH, 1));
            }
            layout.fields.push(FieldSlot { field, label, input, error });
        }

        if let Some(actions) = rows.take(1) {
            let clear_width = (CLEAR_LABEL.len() as u16).min(actions.width);
            layout.clear = Some(Rect::new(actions.x, actions.y, clear_width, 1));

            let ready_x = actions.x + clear_width + 2;
            let ready_width = actions.right().saturating_sub(ready_x);
            if ready_width > 0 {
                layout.ready = Some(Rect::new(ready_x, actions.y, ready_width, 1));
            }
        }

        rows.skip();
        layout.help = rows.take(1 + wrapped_height(HELP_HINT, inner_width));

        layout
    }

    #[cfg(test)]
    pub fn slot(&self, field: Field) -> Option<&FieldSlot> {
        self.fields.iter().find(|s| s.field == field)
    }

    /// Interactive region under a terminal cell
    pub fn hit(&self, x: u16, y: u16) -> Option<Hit> {
        if contains(self.header, x, y) {
            return Some(Hit::Header);
        }
        if self.eye.is_some_and(|r| contains(r, x, y)) {
            return Some(Hit::EyeToggle);
        }
        if self.clear.is_some_and(|r| contains(r, x, y)) {
            return Some(Hit::Clear);
        }
        self.fields
            .iter()
            .find(|s| contains(s.input, x, y) || contains(s.label, x, y))
            .map(|s| Hit::Field(s.field))
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

fn content_height(width: u16, expanded: bool, errors: &ErrorMap) -> u16 {
    if !expanded {
        return 1;
    }

    let privacy = 1 + wrapped_height(PRIVACY_NOTE, width);
    let fields: u16 = FIELDS
        .iter()
        .map(|f| {
            let error = errors.get(*f).map_or(0, |e| wrapped_height(&e.to_string(), width));
            2 + error + 1
        })
        .sum();
    let help = 1 + wrapped_height(HELP_HINT, width);

    // header, gap, privacy, gap, fields, actions, gap, help
    1 + 1 + privacy + 1 + fields + 1 + 1 + help
}

/// Lines needed to word-wrap `text` at `width` columns
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut lines = 1u16;
    let mut col = 0usize;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if col == 0 {
            col = len;
        } else if col + 1 + len <= width {
            col += 1 + len;
        } else {
            lines += 1;
            col = len;
        }
        while col > width {
            lines += 1;
            col -= width;
        }
    }
    lines
}

/// Azure credentials form widget
pub struct AzureCredentialsFormWidget<'a, L: CredentialsListener> {
    form: &'a AzureCredentialsForm<L>,
}

impl<'a, L: CredentialsListener> AzureCredentialsFormWidget<'a, L> {
    pub fn new(form: &'a AzureCredentialsForm<L>) -> Self {
        Self { form }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.form.focus() == Focus::Header;
        let base = if focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        buf.set_style(area, base);

        let mut spans = vec![
            Span::styled(SETTINGS_ICON, base.fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled(TITLE, base.fg(Color::White).add_modifier(Modifier::BOLD)),
        ];
        if self.form.show_ready_indicator() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(READY_DOT, base.fg(Color::Green)));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let chevron = if self.form.is_expanded() { "▴" } else { "▾" };
        if area.width > 0 {
            buf.set_string(area.right() - 1, area.y, chevron, base.fg(Color::Magenta));
        }
    }

    fn render_privacy(&self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(vec![
                Span::styled(INFO_ICON, Style::default().fg(Color::Blue)),
                Span::raw(" "),
                Span::styled(PRIVACY_TITLE, Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(PRIVACY_NOTE, Style::default().fg(Color::LightBlue))),
        ];
        Paragraph::new(lines).wrap(Wrap { trim: true }).render(area, buf);
    }

    fn render_field(&self, slot: &FieldSlot, eye: Option<Rect>, buf: &mut Buffer) {
        let field = slot.field;
        let focused = self.form.focus() == Focus::from_field(field);
        let has_error = self.form.error(field).is_some();

        // Label with required marker
        let label_style = if focused {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
        };
        let mut label = vec![Span::styled(field.label(), label_style)];
        if field.is_required() {
            label.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }
        buf.set_line(slot.label.x, slot.label.y, &Line::from(label), slot.label.width);

        // Input background
        let bg = match (focused, has_error) {
            (_, true) => Color::Rgb(60, 20, 20),
            (true, false) => Color::DarkGray,
            (false, false) => Color::Black,
        };
        buf.set_style(slot.input, Style::default().bg(bg));

        let value_width = match eye {
            Some(_) => slot.input.width.saturating_sub(EYE_WIDTH + 1),
            None => slot.input.width,
        };

        if field == Field::ApiVersion {
            let text = format!("◂ {} ▸", self.form.credentials().api_version);
            buf.set_stringn(slot.input.x, slot.input.y, text, usize::from(value_width), Style::default().fg(Color::Yellow).bg(bg));
        } else {
            self.render_text_value(field, slot.input, value_width, focused, bg, buf);
        }

        if let Some(eye) = eye {
            let icon = if self.form.show_api_key() { EYE_OFF_ICON } else { EYE_ICON };
            buf.set_string(eye.x + 1, eye.y, icon, Style::default().fg(Color::Gray).bg(bg));
        }

        if let (Some(area), Some(err)) = (slot.error, self.form.error(field)) {
            Paragraph::new(err.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(area, buf);
        }
    }

    fn render_text_value(&self, field: Field, input: Rect, width: u16, focused: bool, bg: Color, buf: &mut Buffer) {
        let value = self.form.credentials().get(field);
        let width = usize::from(width);

        if value.is_empty() {
            let placeholder = Style::default().fg(Color::DarkGray).bg(bg).add_modifier(Modifier::ITALIC);
            buf.set_stringn(input.x, input.y, field.placeholder(), width, placeholder);
        } else {
            let shown: Vec<char> = if field == Field::ApiKey && !self.form.show_api_key() {
                vec![MASK_CHAR; value.chars().count()]
            } else {
                value.chars().collect()
            };

            // Keep the cursor in view for long values
            let cursor = if focused { self.form.cursor() } else { 0 };
            let offset = cursor.saturating_sub(width.saturating_sub(1));
            let visible: String = shown.iter().skip(offset).take(width).collect();

            let style = if field == Field::ApiKey {
                Style::default().fg(Color::Green).bg(bg)
            } else {
                Style::default().fg(Color::White).bg(bg)
            };
            buf.set_stringn(input.x, input.y, visible, width, style);
        }

        if focused && width > 0 {
            let cursor = self.form.cursor().min(width - 1) as u16;
            if let Some(cell) = buf.cell_mut((input.x + cursor, input.y)) {
                cell.set_style(Style::default().bg(Color::White).fg(Color::Black));
            }
        }
    }

    fn render_actions(&self, clear: Rect, ready: Option<Rect>, buf: &mut Buffer) {
        let clear_style = if self.form.focus() == Focus::Clear {
            Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        buf.set_stringn(clear.x, clear.y, CLEAR_LABEL, usize::from(clear.width), clear_style);

        if let Some(ready) = ready.filter(|_| self.form.show_ready_indicator()) {
            let line = Line::from(vec![
                Span::styled(READY_DOT, Style::default().fg(Color::Green)),
                Span::raw(" "),
                Span::styled(READY_LABEL, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            ]);
            buf.set_line(ready.x, ready.y, &line, ready.width);
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(HELP_TITLE, Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(HELP_HINT, Style::default().fg(Color::DarkGray))),
        ];
        Paragraph::new(lines).wrap(Wrap { trim: true }).render(area, buf);
    }
}

impl<'a, L: CredentialsListener> Widget for AzureCredentialsFormWidget<'a, L> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = FormLayout::compute(area, self.form.is_expanded(), self.form.errors());

        Clear.render(layout.panel, buf);
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .style(Style::default().bg(Color::Black))
            .render(layout.panel, buf);

        self.render_header(layout.header, buf);

        if !self.form.is_expanded() {
            return;
        }

        if let Some(privacy) = layout.privacy {
            self.render_privacy(privacy, buf);
        }

        for slot in &layout.fields {
            let eye = if slot.field == Field::ApiKey { layout.eye } else { None };
            self.render_field(slot, eye, buf);
        }

        if let Some(clear) = layout.clear {
            self.render_actions(clear, layout.ready, buf);
        }

        if let Some(help) = layout.help {
            self.render_help(help, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::validate::ValidationError;
    use crate::credentials::NotifyPayload;

    fn noop(_: NotifyPayload) {}

    type TestForm = AzureCredentialsForm<fn(NotifyPayload)>;

    fn form() -> TestForm {
        AzureCredentialsForm::new(None, noop as fn(NotifyPayload))
    }

    fn render(form: &TestForm, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        AzureCredentialsFormWidget::new(form).render(area, &mut buf);

        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn filled(endpoint: &str) -> TestForm {
        let mut form = form();
        form.toggle_expanded();
        form.set_field(Field::AzureEndpoint, endpoint);
        form.set_field(Field::ApiKey, "abcdefghij");
        form.set_field(Field::Deployment, "prod");
        form
    }

    #[test]
    fn test_wrapped_height() {
        assert_eq!(wrapped_height("short", 20), 1);
        assert_eq!(wrapped_height("aaaa bbbb cccc", 9), 2);
        assert_eq!(wrapped_height("abcdefghij", 4), 3);
    }

    #[test]
    fn test_collapsed_layout() {
        let layout = FormLayout::compute(Rect::new(0, 0, 100, 40), false, &ErrorMap::new());
        assert_eq!(layout.panel.height, 3);
        assert!(layout.fields.is_empty());
        assert!(layout.clear.is_none());
        assert_eq!(layout.hit(layout.header.x + 2, layout.header.y), Some(Hit::Header));
    }

    #[test]
    fn test_expanded_layout_hits() {
        let layout = FormLayout::compute(Rect::new(0, 0, 100, 60), true, &ErrorMap::new());
        assert_eq!(layout.fields.len(), 4);

        let eye = layout.eye.unwrap();
        assert_eq!(layout.hit(eye.x, eye.y), Some(Hit::EyeToggle));

        let clear = layout.clear.unwrap();
        assert_eq!(layout.hit(clear.x, clear.y), Some(Hit::Clear));

        let deployment = layout.slot(Field::Deployment).unwrap();
        assert_eq!(layout.hit(deployment.input.x, deployment.input.y), Some(Hit::Field(Field::Deployment)));

        assert_eq!(layout.hit(0, 59), None);
    }

    #[test]
    fn test_error_rows_shift_layout() {
        let area = Rect::new(0, 0, 100, 60);
        let clean = FormLayout::compute(area, true, &ErrorMap::new());

        let mut errors = ErrorMap::new();
        errors.apply(Field::AzureEndpoint, Some(ValidationError::InvalidEndpoint));
        let with_error = FormLayout::compute(area, true, &errors);

        let slot = with_error.slot(Field::AzureEndpoint).unwrap();
        assert!(slot.error.is_some());
        assert!(with_error.slot(Field::ApiKey).unwrap().input.y > clean.slot(Field::ApiKey).unwrap().input.y);
    }

    #[test]
    fn test_small_area_does_not_overflow() {
        let area = Rect::new(0, 0, 30, 8);
        let layout = FormLayout::compute(area, true, &ErrorMap::new());
        assert!(layout.panel.bottom() <= area.bottom());
        for slot in &layout.fields {
            assert!(slot.input.bottom() < layout.panel.bottom());
        }

        let mut form = form();
        form.toggle_expanded();
        render(&form, 30, 8);
    }

    #[test]
    fn test_render_collapsed_hides_inputs() {
        let text = render(&form(), 90, 40);
        assert!(text.contains(TITLE));
        assert!(!text.contains("Azure Endpoint"));
    }

    #[test]
    fn test_render_ready_indicator() {
        let text = render(&filled("https://foo.openai.azure.com"), 90, 50);
        assert!(text.contains(READY_LABEL));
        assert!(!text.contains("Please enter a valid"));
    }

    #[test]
    fn test_render_invalid_endpoint_hides_ready() {
        let text = render(&filled("not-a-url"), 90, 50);
        assert!(!text.contains(READY_LABEL));
        assert!(text.contains("Please enter a valid Azure OpenAI endpoint"));
    }

    #[test]
    fn test_render_masks_api_key() {
        let mut form = filled("https://foo.openai.azure.com");
        let masked = render(&form, 90, 50);
        assert!(!masked.contains("abcdefghij"));
        assert!(masked.contains(&"•".repeat(10)));

        form.toggle_api_key_visibility();
        let shown = render(&form, 90, 50);
        assert!(shown.contains("abcdefghij"));
        assert_eq!(form.credentials().api_key, "abcdefghij");
    }
}
