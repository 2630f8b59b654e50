use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tracing::trace;

use crate::credentials::{Field, Focus};
use crate::input::{form_action, Action};
use crate::ui::{FormLayout, Hit, MessageType, Renderer};

use super::App;

impl App {
    /// Handle a key press. Returns true when the application should exit.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        let action = form_action(key, self.form.focus());
        trace!(?action, "key action");
        self.execute_action(action);
        self.should_quit
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let area = Renderer::content_area(self.terminal_size);
        let layout = FormLayout::compute(area, self.form.is_expanded(), self.form.errors());

        match layout.hit(mouse.column, mouse.row) {
            Some(Hit::Header) => {
                self.form.set_focus(Focus::Header);
                self.form.toggle_expanded();
            }
            Some(Hit::EyeToggle) => self.form.toggle_api_key_visibility(),
            Some(Hit::Clear) => self.execute_action(Action::Clear),
            Some(Hit::Field(field)) => {
                self.form.set_focus(Focus::from_field(field));
                if field == Field::ApiVersion {
                    self.execute_action(Action::NextVersion);
                }
            }
            None => {}
        }
    }

    pub fn execute_action(&mut self, action: Action) {
        let was_configured = self.received().is_some();

        match action {
            Action::NextFocus => self.form.next_focus(),
            Action::PrevFocus => self.form.prev_focus(),
            Action::Activate => {
                let clearing = self.form.focus() == Focus::Clear;
                if self.form.activate() && clearing {
                    self.set_message("Credentials cleared", MessageType::Info);
                }
            }
            Action::ToggleExpanded => self.form.toggle_expanded(),
            Action::ToggleApiKeyVisibility => self.form.toggle_api_key_visibility(),
            Action::Clear => {
                self.form.clear();
                self.set_message("Credentials cleared", MessageType::Info);
            }
            Action::NextVersion => self.form.cycle_api_version(true),
            Action::PrevVersion => self.form.cycle_api_version(false),
            Action::InsertChar(c) => self.form.insert_char(c),
            Action::DeleteChar => self.form.delete_char(),
            Action::DeleteCharForward => self.form.delete_char_forward(),
            Action::CursorLeft => self.form.cursor_left(),
            Action::CursorRight => self.form.cursor_right(),
            Action::CursorHome => self.form.cursor_home(),
            Action::CursorEnd => self.form.cursor_end(),
            Action::ClearLine => self.form.clear_field(),
            Action::Quit => self.should_quit = true,
            Action::None => {}
        }

        if !was_configured && self.received().is_some() {
            self.set_message("Credentials complete", MessageType::Success);
        }
    }
}
