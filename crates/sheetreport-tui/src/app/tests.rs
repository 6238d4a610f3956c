use super::*;
use crate::action::Action;
use sheetreport_core::api::mock::remote_file;
use sheetreport_core::{ApiError, Completion, NoticeLevel, Operation, Outcome, SheetOptions};

/// Create a minimal App for testing (no backend, nothing loaded).
fn test_app() -> App {
    App::new("http://reports.test", None, Theme::default_theme())
}

fn complete(app: &mut App, outcome: Outcome) {
    let epoch = app.workflow.epoch();
    app.handle_completion(Completion { epoch, outcome });
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.update(Action::InsertChar(ch));
    }
}

/// Logged in with two spreadsheets listed, outbox empty.
fn logged_in_app() -> App {
    let mut app = App::new(
        "http://reports.test",
        Some("analyst@example.com".into()),
        Theme::default_theme(),
    );
    app.password.set("secret");
    app.update(Action::Login);
    app.drain_outbox();
    complete(&mut app, Outcome::LoggedIn(Ok(())));
    app.drain_outbox();
    complete(
        &mut app,
        Outcome::FilesLoaded(Ok(vec![
            remote_file("1", "sales", ".xlsx"),
            remote_file("2", "minutes", ".pdf"),
            remote_file("3", "legacy", ".xls"),
        ])),
    );
    assert!(app.workflow.is_authenticated());
    app
}

/// Select the file under `row` in the file list and resolve its sheets.
fn select_file_with_sheets(app: &mut App, row: usize, sheets: &[&str]) {
    app.focus = Focus::Files;
    app.file_cursor = row;
    app.update(Action::Activate);
    let cmds = app.drain_outbox();
    assert_eq!(cmds.len(), 1);
    let Operation::LoadSheets(ticket) = cmds[0].op.clone() else {
        panic!("expected a sheet fetch, got {:?}", cmds[0].op);
    };
    complete(
        app,
        Outcome::SheetsLoaded {
            ticket,
            result: Ok(sheets.iter().map(|s| s.to_string()).collect()),
        },
    );
}

// ── Focus ring ──────────────────────────────────────────────────

#[test]
fn focus_ring_wraps_both_ways() {
    let mut app = test_app();
    assert_eq!(app.focus, Focus::Email);
    app.update(Action::FocusPrev);
    assert_eq!(app.focus, Focus::UploadPath);
    app.update(Action::FocusNext);
    app.update(Action::FocusNext);
    assert_eq!(app.focus, Focus::Password);
}

#[test]
fn prefilled_email_starts_on_password() {
    let app = App::new("http://x", Some("a@b.c".into()), Theme::default_theme());
    assert_eq!(app.focus, Focus::Password);
    assert_eq!(app.email.value(), "a@b.c");
}

#[test]
fn start_queues_file_listing() {
    let mut app = test_app();
    app.start();
    let cmds = app.drain_outbox();
    assert_eq!(cmds.len(), 1);
    assert!(matches!(cmds[0].op, Operation::LoadFiles));
    assert!(app.is_busy());
    assert!(app.drain_outbox().is_empty());
}

// ── Session ─────────────────────────────────────────────────────

#[test]
fn login_queues_request_then_file_listing() {
    let mut app = test_app();
    app.email.set("analyst@example.com");
    app.password.set("secret");
    app.update(Action::Login);

    let cmds = app.drain_outbox();
    assert!(matches!(&cmds[..], [c] if matches!(c.op, Operation::Login(_))));

    complete(&mut app, Outcome::LoggedIn(Ok(())));
    let cmds = app.drain_outbox();
    assert!(matches!(&cmds[..], [c] if matches!(c.op, Operation::LoadFiles)));
    assert!(app.workflow.is_authenticated());
}

#[test]
fn enter_on_password_submits_login() {
    let mut app = test_app();
    app.email.set("analyst@example.com");
    app.focus = Focus::Password;
    app.update(Action::Activate);
    assert_eq!(app.input_mode, InputMode::TextInput);
    type_text(&mut app, "secret");
    app.update(Action::ConfirmInput);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.password.value(), "secret");
    let cmds = app.drain_outbox();
    assert!(matches!(&cmds[..], [c] if matches!(c.op, Operation::Login(_))));
}

#[test]
fn empty_credentials_open_notice_until_dismissed() {
    let mut app = test_app();
    app.email.set("analyst@example.com");
    app.update(Action::Login);

    assert!(app.drain_outbox().is_empty());
    let notice = app.current_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);

    // The modal swallows other keys.
    app.update(Action::FocusNext);
    assert_eq!(app.focus, Focus::Email);

    app.update(Action::Activate);
    assert!(app.current_notice().is_none());
}

#[test]
fn rejected_login_shows_server_reason() {
    let mut app = test_app();
    app.email.set("analyst@example.com");
    app.password.set("wrong");
    app.update(Action::Login);
    complete(
        &mut app,
        Outcome::LoggedIn(Err(ApiError::Rejected {
            status: 401,
            detail: Some("Incorrect email or password".into()),
        })),
    );
    assert!(!app.workflow.is_authenticated());
    assert_eq!(
        app.current_notice().map(|n| n.message.as_str()),
        Some("Incorrect email or password")
    );
}

#[test]
fn login_key_ignored_while_logged_in() {
    let mut app = logged_in_app();
    app.update(Action::Login);
    assert!(app.drain_outbox().is_empty());
    assert!(app.current_notice().is_none());
    assert!(!app.is_busy());
}

// ── Selection and report ────────────────────────────────────────

#[test]
fn file_list_shows_only_spreadsheets() {
    let app = logged_in_app();
    let labels: Vec<String> = app
        .workflow
        .catalog()
        .options()
        .iter()
        .map(|o| o.label())
        .collect();
    assert_eq!(labels, vec!["\u{2014}", "sales.xlsx", "legacy.xls"]);
    assert!(app.files_refreshed_at.is_some());
}

#[test]
fn cursor_stays_inside_file_list() {
    let mut app = logged_in_app();
    app.focus = Focus::Files;
    for _ in 0..10 {
        app.update(Action::MoveDown);
    }
    assert_eq!(app.file_cursor, 2);
    for _ in 0..10 {
        app.update(Action::MoveUp);
    }
    assert_eq!(app.file_cursor, 0);
}

#[test]
fn choosing_sheet_enables_generate() {
    let mut app = logged_in_app();
    select_file_with_sheets(&mut app, 1, &["Q1 2024", "Q2"]);
    assert!(app.workflow.gate().sheet_selector_enabled);
    assert!(!app.workflow.gate().generate_enabled);

    app.focus = Focus::Sheets;
    app.update(Action::MoveDown);
    app.update(Action::Activate);
    assert_eq!(app.workflow.selection().sheet_name(), Some("Q2"));

    app.update(Action::Generate);
    let cmds = app.drain_outbox();
    let [cmd] = &cmds[..] else {
        panic!("expected one command, got {cmds:?}");
    };
    let Operation::GenerateReport(request) = &cmd.op else {
        panic!("expected report generation, got {:?}", cmd.op);
    };
    assert_eq!(request.sheet_name, "Q2");
}

#[test]
fn generate_ignored_while_disabled() {
    let mut app = logged_in_app();
    app.update(Action::Generate);
    assert!(app.drain_outbox().is_empty());
    assert!(app.current_notice().is_none());

    select_file_with_sheets(&mut app, 1, &["Q1 2024"]);
    app.update(Action::Generate);
    assert!(app.drain_outbox().is_empty());
}

#[test]
fn sheet_list_is_inert_without_file() {
    let mut app = logged_in_app();
    app.focus = Focus::Sheets;
    app.update(Action::MoveDown);
    app.update(Action::Activate);
    assert_eq!(app.sheet_cursor, 0);
    assert!(!app.workflow.selection().has_sheet());
}

#[test]
fn sentinel_row_clears_selection() {
    let mut app = logged_in_app();
    select_file_with_sheets(&mut app, 2, &["Лист1"]);
    assert!(app.workflow.selection().has_file());

    app.file_cursor = 0;
    app.update(Action::Activate);
    assert!(app.drain_outbox().is_empty());
    assert!(!app.workflow.selection().has_file());
    assert_eq!(app.workflow.sheets().options(), &SheetOptions::NeedsFile);
}

#[test]
fn report_failure_shows_status() {
    let mut app = logged_in_app();
    select_file_with_sheets(&mut app, 1, &["Q1 2024"]);
    app.focus = Focus::Sheets;
    app.update(Action::Activate);
    app.update(Action::Generate);
    let cmds = app.drain_outbox();
    let Operation::GenerateReport(request) = cmds[0].op.clone() else {
        panic!("expected report generation");
    };

    complete(
        &mut app,
        Outcome::ReportGenerated {
            request,
            result: Err(ApiError::Rejected {
                status: 500,
                detail: None,
            }),
        },
    );
    assert_eq!(
        app.current_notice().map(|n| n.message.as_str()),
        Some("report generation failed: HTTP 500")
    );
    assert!(app.workflow.report().placeholder_visible());
}

// ── Upload ──────────────────────────────────────────────────────

#[test]
fn upload_path_commit_records_choice() {
    let mut app = logged_in_app();
    app.focus = Focus::UploadPath;
    app.update(Action::Activate);
    type_text(&mut app, "q3.XLS");
    app.update(Action::ConfirmInput);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(
        app.workflow.chosen_upload(),
        Some(std::path::Path::new("q3.XLS"))
    );

    app.update(Action::Upload);
    let cmds = app.drain_outbox();
    assert!(matches!(&cmds[..], [c] if matches!(c.op, Operation::Upload(_))));
}

#[test]
fn escape_discards_edit() {
    let mut app = test_app();
    app.focus = Focus::UploadPath;
    app.upload_path.set("kept.xlsx");
    app.update(Action::Activate);
    type_text(&mut app, "-junk");
    app.update(Action::CancelInput);

    assert_eq!(app.upload_path.value(), "kept.xlsx");
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.workflow.chosen_upload().is_none());
}

#[test]
fn successful_upload_clears_path_and_refreshes() {
    let mut app = logged_in_app();
    app.upload_path.set("budget.xlsx");
    app.workflow.choose_upload(Some("budget.xlsx".into()));
    app.update(Action::Upload);
    let cmds = app.drain_outbox();
    let Operation::Upload(file) = cmds[0].op.clone() else {
        panic!("expected upload");
    };

    complete(&mut app, Outcome::Uploaded { file, result: Ok(()) });
    assert_eq!(app.upload_path.value(), "");
    assert_eq!(app.current_notice().unwrap().level, NoticeLevel::Info);
    let cmds = app.drain_outbox();
    assert!(matches!(&cmds[..], [c] if matches!(c.op, Operation::LoadFiles)));
}

// ── Logout and expiry ───────────────────────────────────────────

#[test]
fn logout_resets_lists_and_cursors() {
    let mut app = logged_in_app();
    select_file_with_sheets(&mut app, 2, &["A", "B"]);
    app.focus = Focus::Sheets;
    app.update(Action::MoveDown);
    let epoch = app.workflow.epoch();

    app.update(Action::Logout);
    let cmds = app.drain_outbox();
    assert!(matches!(&cmds[..], [c] if matches!(c.op, Operation::Logout)));
    complete(&mut app, Outcome::LoggedOut(Ok(())));

    assert!(!app.workflow.is_authenticated());
    assert_eq!(app.workflow.epoch(), epoch + 1);
    assert_eq!(app.file_cursor, 0);
    assert_eq!(app.sheet_cursor, 0);
    assert!(app.files_refreshed_at.is_none());
    assert_eq!(app.workflow.catalog().options().len(), 1);
}

#[test]
fn completion_from_before_logout_is_dropped() {
    let mut app = logged_in_app();
    let old_epoch = app.workflow.epoch();
    app.update(Action::RefreshFiles);
    app.drain_outbox();
    app.update(Action::Logout);
    complete(&mut app, Outcome::LoggedOut(Ok(())));

    app.handle_completion(Completion {
        epoch: old_epoch,
        outcome: Outcome::FilesLoaded(Ok(vec![remote_file("9", "late", ".xlsx")])),
    });
    assert!(app.workflow.catalog().files().is_empty());
    assert!(app.files_refreshed_at.is_none());
}

#[test]
fn expired_session_resets_and_notifies() {
    let mut app = logged_in_app();
    select_file_with_sheets(&mut app, 1, &["Q1 2024"]);
    app.update(Action::RefreshFiles);
    app.drain_outbox();

    complete(
        &mut app,
        Outcome::FilesLoaded(Err(ApiError::Rejected {
            status: 401,
            detail: Some("Not authenticated".into()),
        })),
    );
    assert!(!app.workflow.is_authenticated());
    assert!(!app.workflow.selection().has_file());
    assert_eq!(app.current_notice().unwrap().level, NoticeLevel::Error);
}

// ── Overlays and quitting ───────────────────────────────────────

#[test]
fn help_toggles_and_blocks_actions() {
    let mut app = logged_in_app();
    app.update(Action::ToggleHelp);
    assert!(app.show_help);
    app.update(Action::RefreshFiles);
    assert!(app.drain_outbox().is_empty());
    app.update(Action::Cancel);
    assert!(!app.show_help);
}

#[test]
fn quit_needs_confirmation() {
    let mut app = test_app();
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);
    assert!(!app.should_quit);

    app.update(Action::Cancel);
    assert!(!app.confirm_quit);

    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn force_quit_skips_confirmation() {
    let mut app = test_app();
    assert!(app.update(Action::ForceQuit));
    assert!(app.should_quit);
}

#[test]
fn tick_advances_spinner() {
    let mut app = test_app();
    app.update(Action::Tick);
    app.update(Action::Tick);
    assert_eq!(app.tick, 2);
}
