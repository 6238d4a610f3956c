//! The workflow controller.
//!
//! [`Workflow`] composes the session, catalog, selection, sheet resolver,
//! report view and upload coordinator. User intents mutate state right away
//! and hand back the [`Command`] to run; finished requests come back as
//! [`Completion`]s through [`Workflow::apply`].
//!
//! Every command is stamped with the current session epoch. A cascade reset
//! (logout or an expired session) bumps the epoch, so anything still in
//! flight from before the reset is dropped when it lands.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::FileCatalog;
use crate::executor::{Command, Completion, Operation, Outcome};
use crate::gate::{self, Gate};
use crate::report::{ReportRequest, ReportView};
use crate::selection::Selection;
use crate::session::SessionController;
use crate::sheets::{SheetApply, SheetResolver};
use crate::upload::UploadCoordinator;
use crate::{FileId, Notice};

/// Shown when the server rejects a request from an authenticated session.
pub const SESSION_EXPIRED: &str = "session expired, log in again";
pub const LOGOUT_FAILED: &str = "logout failed";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workflow {
    session: SessionController,
    catalog: FileCatalog,
    selection: Selection,
    sheets: SheetResolver,
    report: ReportView,
    upload: UploadCoordinator,
    notices: VecDeque<Notice>,
    epoch: u64,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn catalog(&self) -> &FileCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn sheets(&self) -> &SheetResolver {
        &self.sheets
    }

    pub fn report(&self) -> &ReportView {
        &self.report
    }

    pub fn upload_state(&self) -> &UploadCoordinator {
        &self.upload
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn gate(&self) -> Gate {
        gate::evaluate(&self.selection)
    }

    /// Drain pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn command(&self, op: Operation) -> Command {
        Command {
            epoch: self.epoch,
            op,
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    // --- user intents ---

    /// Initial file listing. The server decides whether it needs a session.
    pub fn startup(&mut self) -> Command {
        self.refresh_files()
    }

    pub fn refresh_files(&mut self) -> Command {
        self.catalog.begin_load();
        self.command(Operation::LoadFiles)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Option<Command> {
        match self.session.begin_login(email, password) {
            Ok(credentials) => Some(self.command(Operation::Login(credentials))),
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    pub fn logout(&mut self) -> Option<Command> {
        match self.session.begin_logout() {
            Ok(()) => Some(self.command(Operation::Logout)),
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    /// Change the selected file. `None` (the sentinel) or an id that is not
    /// in the catalog goes back to the no-file state without a request.
    /// Choosing any listed file, even the current one, reloads its sheets.
    pub fn select_file(&mut self, file_id: Option<&FileId>) -> Option<Command> {
        let Some(file) = file_id.and_then(|id| self.catalog.get(id)).cloned() else {
            self.reset_selection();
            return None;
        };
        tracing::debug!(file_id = %file.id, "file selected");
        self.selection.choose_file(&file);
        let ticket = self.sheets.begin(file.id);
        Some(self.command(Operation::LoadSheets(ticket)))
    }

    /// Choose a sheet from the loaded set; `None` clears it. Returns false
    /// if the name is not one of the loaded sheets.
    pub fn select_sheet(&mut self, name: Option<&str>) -> bool {
        match name {
            None => {
                self.selection.clear_sheet();
                true
            }
            Some(name) if self.sheets.contains(name) => self.selection.choose_sheet(name),
            Some(name) => {
                tracing::debug!(sheet = name, "ignoring unknown sheet");
                false
            }
        }
    }

    pub fn generate(&mut self) -> Option<Command> {
        match ReportRequest::from_selection(&self.selection) {
            Ok(request) => {
                self.report.begin(request.clone());
                Some(self.command(Operation::GenerateReport(request)))
            }
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    pub fn choose_upload(&mut self, path: Option<PathBuf>) {
        self.upload.choose(path);
    }

    pub fn chosen_upload(&self) -> Option<&Path> {
        self.upload.chosen()
    }

    pub fn upload(&mut self) -> Option<Command> {
        match self.upload.begin() {
            Ok(file) => Some(self.command(Operation::Upload(file))),
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    // --- completions ---

    /// Fold a finished request back in, returning any follow-up commands.
    pub fn apply(&mut self, completion: Completion) -> Vec<Command> {
        let Completion { epoch, outcome } = completion;
        if epoch != self.epoch {
            tracing::debug!(
                epoch,
                current = self.epoch,
                "discarding completion from ended session"
            );
            return Vec::new();
        }

        let unauthorized = outcome.error().is_some_and(|e| e.is_unauthorized());
        if unauthorized && !matches!(outcome, Outcome::LoggedIn(_)) && self.session.expire() {
            self.cascade_reset();
            self.notify(Notice::error(SESSION_EXPIRED));
            return Vec::new();
        }

        match outcome {
            Outcome::LoggedIn(result) => match self.session.finish_login(result) {
                Ok(()) => vec![self.refresh_files()],
                Err(reason) => {
                    self.notify(Notice::error(reason));
                    Vec::new()
                }
            },
            Outcome::LoggedOut(result) => {
                match self.session.finish_logout(result) {
                    Ok(()) => self.cascade_reset(),
                    Err(e) => self.notify(Notice::error(format!(
                        "{LOGOUT_FAILED}: {}",
                        e.reason_or(LOGOUT_FAILED)
                    ))),
                }
                Vec::new()
            }
            Outcome::FilesLoaded(result) => {
                if self.catalog.apply(result)
                    && let Some(id) = self.selection.file_id()
                    && self.catalog.get(id).is_none()
                {
                    tracing::info!(file_id = %id, "selected file no longer listed");
                    self.reset_selection();
                }
                Vec::new()
            }
            Outcome::SheetsLoaded { ticket, result } => {
                if self.sheets.complete(&ticket, result) == SheetApply::Applied {
                    self.selection.clear_sheet();
                }
                Vec::new()
            }
            Outcome::ReportGenerated { request, result } => {
                match result {
                    Ok(data) => {
                        tracing::info!(
                            file_id = %request.file_id,
                            sheet = %request.sheet_name,
                            rows = data.len(),
                            "report rendered"
                        );
                        self.report.render(request, data);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "report generation failed");
                        self.report.fail();
                        self.notify(Notice::error(format!("report generation failed: {e}")));
                    }
                }
                Vec::new()
            }
            Outcome::Uploaded { file, result } => match self.upload.finish(result) {
                Ok(()) => {
                    tracing::info!(file = file.file_name(), "upload complete");
                    self.notify(Notice::info(format!("file uploaded: {}", file.file_name())));
                    vec![self.refresh_files()]
                }
                Err(reason) => {
                    self.notify(Notice::error(reason));
                    Vec::new()
                }
            },
        }
    }

    fn reset_selection(&mut self) {
        self.selection.clear();
        self.sheets.reset();
    }

    /// Back to a blank workflow: no selection, no sheets, no files, no
    /// report. In-flight work from before is invalidated by the new epoch.
    fn cascade_reset(&mut self) {
        self.reset_selection();
        self.catalog.clear();
        self.report.clear();
        self.upload.abandon();
        self.session.abandon_requests();
        self.epoch += 1;
        tracing::info!(epoch = self.epoch, "workflow reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::remote_file;
    use crate::sheets::SheetOptions;
    use crate::{NoticeLevel, ValidationError};

    fn done(epoch: u64, outcome: Outcome) -> Completion {
        Completion { epoch, outcome }
    }

    fn logged_in() -> Workflow {
        let mut wf = Workflow::new();
        wf.login("a@b.c", "pw").unwrap();
        let follow = wf.apply(done(0, Outcome::LoggedIn(Ok(()))));
        assert_eq!(follow.len(), 1);
        wf.apply(done(
            0,
            Outcome::FilesLoaded(Ok(vec![
                remote_file("1", "sales", ".xlsx"),
                remote_file("2", "notes", ".pdf"),
                remote_file("3", "legacy", ".xls"),
            ])),
        ));
        wf
    }

    fn sheets_done(wf: &mut Workflow, cmd: Command, sheets: &[&str]) {
        let Operation::LoadSheets(ticket) = cmd.op else {
            panic!("expected sheet fetch, got {:?}", cmd.op);
        };
        wf.apply(done(
            cmd.epoch,
            Outcome::SheetsLoaded {
                ticket,
                result: Ok(sheets.iter().map(|s| s.to_string()).collect()),
            },
        ));
    }

    fn ready() -> Workflow {
        let mut wf = logged_in();
        let cmd = wf.select_file(Some(&FileId::new("1"))).unwrap();
        sheets_done(&mut wf, cmd, &["Q1", "Q2"]);
        assert!(wf.select_sheet(Some("Q1")));
        wf
    }

    #[test]
    fn empty_login_fails_locally() {
        let mut wf = Workflow::new();
        assert!(wf.login("", "").is_none());
        let notices = wf.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, ValidationError::EmptyCredentials.to_string());
        assert!(wf.take_notices().is_empty());
    }

    #[test]
    fn login_success_loads_files() {
        let mut wf = Workflow::new();
        let cmd = wf.login("a@b.c", "pw").unwrap();
        assert!(matches!(cmd.op, Operation::Login(_)));
        let follow = wf.apply(done(0, Outcome::LoggedIn(Ok(()))));
        assert!(wf.is_authenticated());
        assert!(matches!(follow[0].op, Operation::LoadFiles));
        assert!(wf.catalog().is_loading());
    }

    #[test]
    fn rejected_login_shows_reason() {
        let mut wf = Workflow::new();
        wf.login("a@b.c", "bad").unwrap();
        let follow = wf.apply(done(
            0,
            Outcome::LoggedIn(Err(ApiError::Rejected {
                status: 401,
                detail: Some("Incorrect email or password".into()),
            })),
        ));
        assert!(follow.is_empty());
        assert!(!wf.is_authenticated());
        assert_eq!(wf.take_notices()[0].message, "Incorrect email or password");
        assert_eq!(wf.epoch(), 0);
    }

    #[test]
    fn selecting_file_starts_sheet_fetch() {
        let mut wf = logged_in();
        let cmd = wf.select_file(Some(&FileId::new("3"))).unwrap();
        assert_eq!(wf.sheets().options(), &SheetOptions::Loading);
        assert!(wf.gate().sheet_selector_enabled);
        assert!(!wf.gate().generate_enabled);
        assert_eq!(
            wf.selection().extension(),
            Some(crate::SpreadsheetExtension::Xls)
        );
        sheets_done(&mut wf, cmd, &[]);
        assert_eq!(wf.sheets().options(), &SheetOptions::NoSheets);
        assert!(!wf.gate().generate_enabled);
    }

    #[test]
    fn sentinel_or_unknown_file_resets() {
        let mut wf = ready();
        assert!(wf.select_file(None).is_none());
        assert_eq!(wf.gate(), Gate::default());
        assert_eq!(wf.sheets().options(), &SheetOptions::NeedsFile);

        // Filtered-out files cannot be selected.
        assert!(wf.select_file(Some(&FileId::new("2"))).is_none());
        assert!(!wf.selection().has_file());
    }

    #[test]
    fn unknown_sheet_is_refused() {
        let mut wf = ready();
        assert!(!wf.select_sheet(Some("Q9")));
        assert_eq!(wf.selection().sheet_name(), Some("Q1"));
        assert!(wf.select_sheet(None));
        assert!(!wf.gate().generate_enabled);
    }

    #[test]
    fn stale_sheet_listing_is_ignored() {
        let mut wf = logged_in();
        let first = wf.select_file(Some(&FileId::new("1"))).unwrap();
        let second = wf.select_file(Some(&FileId::new("3"))).unwrap();
        sheets_done(&mut wf, second, &["L1"]);
        sheets_done(&mut wf, first, &["S1"]);
        assert_eq!(wf.sheets().options().sheets(), &["L1".to_string()]);
        assert!(!wf.select_sheet(Some("S1")));
    }

    #[test]
    fn generate_without_sheet_is_local_error() {
        let mut wf = logged_in();
        assert!(wf.generate().is_none());
        assert_eq!(
            wf.take_notices()[0].message,
            ValidationError::NoFileSelected.to_string()
        );
    }

    #[test]
    fn report_renders_sorted() {
        let mut wf = ready();
        let cmd = wf.generate().unwrap();
        let Operation::GenerateReport(request) = cmd.op else {
            panic!("expected report request");
        };
        assert_eq!(request.sheet_name, "Q1");
        assert!(wf.report().is_generating());
        wf.apply(done(
            0,
            Outcome::ReportGenerated {
                request,
                result: Ok([("A".to_string(), 10.5), ("B".to_string(), 42.0)]
                    .into_iter()
                    .collect()),
            },
        ));
        assert!(wf.report().is_visible());
        assert_eq!(wf.report().rows()[0].label, "B");
    }

    #[test]
    fn report_failure_reports_status() {
        let mut wf = ready();
        let Operation::GenerateReport(request) = wf.generate().unwrap().op else {
            panic!("expected report request");
        };
        wf.apply(done(
            0,
            Outcome::ReportGenerated {
                request,
                result: Err(ApiError::Rejected {
                    status: 500,
                    detail: None,
                }),
            },
        ));
        assert!(!wf.report().is_visible());
        assert!(!wf.report().is_generating());
        let notice = &wf.take_notices()[0];
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "report generation failed: HTTP 500");
    }

    #[test]
    fn logout_cascades_and_drops_late_completions() {
        let mut wf = ready();
        let report_cmd = wf.generate().unwrap();
        let logout = wf.logout().unwrap();
        wf.apply(done(logout.epoch, Outcome::LoggedOut(Ok(()))));

        assert!(!wf.is_authenticated());
        assert_eq!(wf.gate(), Gate::default());
        assert!(wf.catalog().files().is_empty());
        assert_eq!(wf.sheets().options(), &SheetOptions::NeedsFile);
        assert!(wf.report().placeholder_visible());
        assert_eq!(wf.epoch(), 1);

        let Operation::GenerateReport(request) = report_cmd.op else {
            panic!("expected report request");
        };
        wf.apply(done(
            report_cmd.epoch,
            Outcome::ReportGenerated {
                request,
                result: Ok([("A".to_string(), 1.0)].into_iter().collect()),
            },
        ));
        assert!(wf.report().placeholder_visible());
        wf.apply(done(
            0,
            Outcome::FilesLoaded(Ok(vec![remote_file("1", "sales", ".xlsx")])),
        ));
        assert!(wf.catalog().files().is_empty());
    }

    #[test]
    fn failed_logout_keeps_everything() {
        let mut wf = ready();
        wf.logout().unwrap();
        wf.apply(done(
            0,
            Outcome::LoggedOut(Err(ApiError::Transport("reset".into()))),
        ));
        assert!(wf.is_authenticated());
        assert!(wf.gate().generate_enabled);
        assert_eq!(wf.epoch(), 0);
        assert!(wf.take_notices()[0].message.starts_with(LOGOUT_FAILED));
    }

    #[test]
    fn relogin_refused_and_logout_leaves_session_idle() {
        let mut wf = ready();
        assert!(wf.login("a@b.c", "pw").is_none());
        assert_eq!(
            wf.take_notices()[0].message,
            ValidationError::AlreadyAuthenticated.to_string()
        );
        assert!(!wf.session().is_busy());

        let logout = wf.logout().unwrap();
        wf.apply(done(logout.epoch, Outcome::LoggedOut(Ok(()))));
        assert!(!wf.is_authenticated());
        assert!(!wf.session().is_busy());

        // A login answer from before the logout must not log the user back in.
        wf.apply(done(0, Outcome::LoggedIn(Ok(()))));
        assert!(!wf.is_authenticated());
        assert!(!wf.session().is_busy());

        assert!(wf.login("a@b.c", "pw").is_some());
        assert!(wf.session().is_busy());
    }

    #[test]
    fn logout_while_logged_out_is_refused() {
        let mut wf = Workflow::new();
        assert!(wf.logout().is_none());
        assert_eq!(
            wf.take_notices()[0].message,
            ValidationError::NotAuthenticated.to_string()
        );
    }

    #[test]
    fn unauthorized_response_expires_session() {
        let mut wf = ready();
        let cmd = wf.refresh_files();
        wf.apply(done(
            cmd.epoch,
            Outcome::FilesLoaded(Err(ApiError::Rejected {
                status: 401,
                detail: Some("Not authenticated".into()),
            })),
        ));
        assert!(!wf.is_authenticated());
        assert!(!wf.selection().has_file());
        assert_eq!(wf.epoch(), 1);
        assert_eq!(wf.take_notices()[0].message, SESSION_EXPIRED);
    }

    #[test]
    fn unauthorized_before_login_is_soft() {
        let mut wf = Workflow::new();
        let cmd = wf.startup();
        wf.apply(done(
            cmd.epoch,
            Outcome::FilesLoaded(Err(ApiError::Rejected {
                status: 401,
                detail: None,
            })),
        ));
        assert_eq!(wf.epoch(), 0);
        assert!(wf.take_notices().is_empty());
        assert!(wf.catalog().last_error().is_some());
    }

    #[test]
    fn refresh_drops_selection_of_vanished_file() {
        let mut wf = ready();
        wf.refresh_files();
        wf.apply(done(
            0,
            Outcome::FilesLoaded(Ok(vec![remote_file("3", "legacy", ".xls")])),
        ));
        assert!(!wf.selection().has_file());
        assert_eq!(wf.sheets().options(), &SheetOptions::NeedsFile);
    }

    #[test]
    fn refresh_keeps_selection_of_listed_file() {
        let mut wf = ready();
        wf.refresh_files();
        wf.apply(done(
            0,
            Outcome::FilesLoaded(Ok(vec![
                remote_file("1", "sales", ".xlsx"),
                remote_file("4", "new", ".xlsx"),
            ])),
        ));
        assert_eq!(wf.selection().sheet_name(), Some("Q1"));
        assert!(wf.gate().generate_enabled);
    }

    #[test]
    fn upload_validation_and_success() {
        let mut wf = logged_in();
        assert!(wf.upload().is_none());
        wf.take_notices();

        wf.choose_upload(Some(PathBuf::from("/tmp/report.pdf")));
        assert!(wf.upload().is_none());
        assert!(wf.take_notices()[0].message.contains("report.pdf"));

        wf.choose_upload(Some(PathBuf::from("/tmp/report.XLSX")));
        let cmd = wf.upload().unwrap();
        let Operation::Upload(file) = cmd.op else {
            panic!("expected upload");
        };
        let follow = wf.apply(done(
            0,
            Outcome::Uploaded {
                file,
                result: Ok(()),
            },
        ));
        assert!(matches!(follow[0].op, Operation::LoadFiles));
        assert_eq!(wf.chosen_upload(), None);
        assert_eq!(wf.take_notices()[0].level, NoticeLevel::Info);
    }

    #[test]
    fn state_serializes() {
        let wf = ready();
        let json = serde_json::to_string(&wf).unwrap();
        let back: Workflow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.selection(), wf.selection());
    }
}
