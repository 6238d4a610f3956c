mod backend;
mod update;

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Layout};

use sheetreport_core::{Command, Notice, Workflow};

use crate::model::text_field::TextField;
use crate::theme::Theme;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    TextInput,
}

/// The focus ring, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Email,
    Password,
    Files,
    Sheets,
    UploadPath,
}

impl Focus {
    const RING: [Focus; 5] = [
        Focus::Email,
        Focus::Password,
        Focus::Files,
        Focus::Sheets,
        Focus::UploadPath,
    ];

    fn position(self) -> usize {
        Self::RING.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::RING[(self.position() + 1) % Self::RING.len()]
    }

    pub fn prev(self) -> Self {
        Self::RING[(self.position() + Self::RING.len() - 1) % Self::RING.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, Focus::Email | Focus::Password | Focus::UploadPath)
    }
}

/// Main application state.
pub struct App {
    pub workflow: Workflow,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub email: TextField,
    pub password: TextField,
    pub upload_path: TextField,
    /// Row under the cursor in the file list; row 0 is the sentinel.
    pub file_cursor: usize,
    pub sheet_cursor: usize,
    pub server_url: String,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// Notices waiting to be shown; the front one is the open modal.
    pub notices: VecDeque<Notice>,
    /// Commands produced by the last updates, drained by the main loop.
    pub outbox: Vec<Command>,
    pub files_refreshed_at: Option<DateTime<Local>>,
}

impl App {
    pub fn new(server_url: impl Into<String>, email: Option<String>, theme: Theme) -> Self {
        let focus = if email.is_some() {
            Focus::Password
        } else {
            Focus::Email
        };
        Self {
            workflow: Workflow::new(),
            focus,
            input_mode: InputMode::Normal,
            email: TextField::new(email.unwrap_or_default()),
            password: TextField::default(),
            upload_path: TextField::default(),
            file_cursor: 0,
            sheet_cursor: 0,
            server_url: server_url.into(),
            theme,
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            notices: VecDeque::new(),
            outbox: Vec::new(),
            files_refreshed_at: None,
        }
    }

    /// Queue the initial file listing.
    pub fn start(&mut self) {
        let cmd = self.workflow.startup();
        self.outbox.push(cmd);
    }

    /// Take every command queued since the last call.
    pub fn drain_outbox(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    /// True while any request the user is waiting on is in flight.
    pub fn is_busy(&self) -> bool {
        let wf = &self.workflow;
        wf.session().is_busy()
            || wf.catalog().is_loading()
            || wf.report().is_generating()
            || wf.upload_state().is_uploading()
            || matches!(wf.sheets().options(), sheetreport_core::SheetOptions::Loading)
    }

    fn text_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            Focus::Email => Some(&mut self.email),
            Focus::Password => Some(&mut self.password),
            Focus::UploadPath => Some(&mut self.upload_path),
            Focus::Files | Focus::Sheets => None,
        }
    }

    /// Move workflow notices into the modal queue and keep list cursors in
    /// range of what the lists currently hold.
    fn sync(&mut self) {
        self.notices.extend(self.workflow.take_notices());

        let file_rows = self.workflow.catalog().options().len();
        self.file_cursor = self.file_cursor.min(file_rows.saturating_sub(1));
        let sheet_rows = self.workflow.sheets().options().sheets().len();
        self.sheet_cursor = self.sheet_cursor.min(sheet_rows.saturating_sub(1));
    }

    /// Put the file cursor back on the selected file after the list changed
    /// under it.
    fn follow_selection(&mut self) {
        let row = match self.workflow.selection().file_id() {
            Some(id) => self
                .workflow
                .catalog()
                .options()
                .iter()
                .position(|o| o.file_id() == Some(id)),
            None => Some(0),
        };
        if let Some(row) = row {
            self.file_cursor = row;
        }
    }

    /// Render the whole screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(area);

        crate::view::banner::render_status_bar(f, header, self);

        let [left, right] =
            Layout::horizontal([Constraint::Length(44), Constraint::Min(30)]).areas(body);
        let [session, files, sheets, upload] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .areas(left);

        crate::view::session::render(f, session, self);
        crate::view::selectors::render_files(f, files, self);
        crate::view::selectors::render_sheets(f, sheets, self);
        crate::view::upload::render(f, upload, self);
        crate::view::report::render(f, right, self);
        crate::view::banner::render_footer(f, footer, self);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if let Some(notice) = self.current_notice() {
            crate::view::notice::render(f, notice, self.notices.len(), &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;
