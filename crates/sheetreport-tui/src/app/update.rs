use std::path::PathBuf;

use super::{App, Focus, InputMode};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::ForceQuit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(..) | Action::None => return false,
            _ => {}
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::Cancel => self.confirm_quit = false,
                _ => {}
            }
            return false;
        }

        // An open notice blocks everything until dismissed.
        if !self.notices.is_empty() {
            match action {
                Action::Activate | Action::Cancel => {
                    self.notices.pop_front();
                }
                Action::Quit => self.confirm_quit = true,
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::Cancel => self.show_help = false,
                Action::Quit => self.confirm_quit = true,
                _ => {}
            }
            return false;
        }

        if self.input_mode == InputMode::TextInput {
            self.update_text(action);
            self.sync();
            return false;
        }

        match action {
            Action::Quit => self.confirm_quit = true,
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::Activate => self.activate(),
            // Login is dimmed while a session is open.
            Action::Login if self.workflow.is_authenticated() => {}
            Action::Login => self.login(),
            Action::Logout => {
                let cmd = self.workflow.logout();
                self.outbox.extend(cmd);
            }
            Action::Generate => {
                // Disabled controls ignore activation.
                if self.workflow.gate().generate_enabled {
                    let cmd = self.workflow.generate();
                    self.outbox.extend(cmd);
                }
            }
            Action::Upload => {
                let cmd = self.workflow.upload();
                self.outbox.extend(cmd);
            }
            Action::RefreshFiles => {
                let cmd = self.workflow.refresh_files();
                self.outbox.push(cmd);
            }
            Action::ToggleHelp => self.show_help = true,
            _ => {}
        }
        self.sync();
        false
    }

    fn update_text(&mut self, action: Action) {
        let Some(field) = self.text_field_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match action {
            Action::InsertChar(ch) => field.insert(ch),
            Action::Backspace => field.backspace(),
            Action::DeleteForward => field.delete_forward(),
            Action::CursorLeft => field.left(),
            Action::CursorRight => field.right(),
            Action::CursorHome => field.home(),
            Action::CursorEnd => field.end(),
            Action::CancelInput => {
                field.cancel();
                self.input_mode = InputMode::Normal;
            }
            Action::ConfirmInput => {
                self.commit_text();
                // Enter in the password field submits the login form.
                if self.focus == Focus::Password {
                    self.login();
                }
            }
            Action::FocusNext => {
                self.commit_text();
                self.focus = self.focus.next();
            }
            Action::FocusPrev => {
                self.commit_text();
                self.focus = self.focus.prev();
            }
            _ => {}
        }
    }

    fn commit_text(&mut self) {
        if let Some(field) = self.text_field_mut() {
            field.commit();
        }
        if self.focus == Focus::UploadPath {
            let path = self.upload_path.value().trim();
            let chosen = (!path.is_empty()).then(|| PathBuf::from(path));
            self.workflow.choose_upload(chosen);
        }
        self.input_mode = InputMode::Normal;
    }

    fn login(&mut self) {
        let cmd = self
            .workflow
            .login(self.email.value(), self.password.value());
        self.outbox.extend(cmd);
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, rows) = match self.focus {
            Focus::Files => (
                &mut self.file_cursor,
                self.workflow.catalog().options().len(),
            ),
            Focus::Sheets if self.workflow.gate().sheet_selector_enabled => (
                &mut self.sheet_cursor,
                self.workflow.sheets().options().sheets().len(),
            ),
            _ => return,
        };
        if rows == 0 {
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(rows - 1);
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Email | Focus::Password | Focus::UploadPath => {
                if let Some(field) = self.text_field_mut() {
                    field.begin_edit();
                    self.input_mode = InputMode::TextInput;
                }
            }
            Focus::Files => {
                let id = self
                    .workflow
                    .catalog()
                    .options()
                    .get(self.file_cursor)
                    .and_then(|o| o.file_id().cloned());
                self.sheet_cursor = 0;
                let cmd = self.workflow.select_file(id.as_ref());
                self.outbox.extend(cmd);
            }
            Focus::Sheets => {
                if !self.workflow.gate().sheet_selector_enabled {
                    return;
                }
                let name = self
                    .workflow
                    .sheets()
                    .options()
                    .sheets()
                    .get(self.sheet_cursor)
                    .cloned();
                if let Some(name) = name {
                    self.workflow.select_sheet(Some(&name));
                }
            }
        }
    }
}
