//! Runs workflow commands against a [`ReportApi`].
//!
//! The workflow never awaits anything itself. It hands out [`Command`]s and
//! later folds the matching [`Completion`]s back in, so any number of
//! requests can be in flight while the user keeps interacting.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, RemoteFile, ReportApi, ReportData};
use crate::report::ReportRequest;
use crate::session::Credentials;
use crate::sheets::SheetTicket;
use crate::upload::LocalFile;

/// A request the workflow wants made.
#[derive(Debug, Clone)]
pub enum Operation {
    Login(Credentials),
    Logout,
    LoadFiles,
    LoadSheets(SheetTicket),
    GenerateReport(ReportRequest),
    Upload(LocalFile),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Login(_) => "login",
            Operation::Logout => "logout",
            Operation::LoadFiles => "load_files",
            Operation::LoadSheets(_) => "load_sheets",
            Operation::GenerateReport(_) => "generate_report",
            Operation::Upload(_) => "upload",
        }
    }
}

/// An [`Operation`] tagged with the session epoch it was issued in.
#[derive(Debug, Clone)]
pub struct Command {
    pub epoch: u64,
    pub op: Operation,
}

/// Result of one [`Operation`], echoing what is needed to fold it back in.
#[derive(Debug, Clone)]
pub enum Outcome {
    LoggedIn(Result<(), ApiError>),
    LoggedOut(Result<(), ApiError>),
    FilesLoaded(Result<Vec<RemoteFile>, ApiError>),
    SheetsLoaded {
        ticket: SheetTicket,
        result: Result<Vec<String>, ApiError>,
    },
    ReportGenerated {
        request: ReportRequest,
        result: Result<ReportData, ApiError>,
    },
    Uploaded {
        file: LocalFile,
        result: Result<(), ApiError>,
    },
}

impl Outcome {
    /// The error carried by this outcome, if the request failed.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Outcome::LoggedIn(r) | Outcome::LoggedOut(r) => r.as_ref().err(),
            Outcome::FilesLoaded(r) => r.as_ref().err(),
            Outcome::SheetsLoaded { result, .. } => result.as_ref().err(),
            Outcome::ReportGenerated { result, .. } => result.as_ref().err(),
            Outcome::Uploaded { result, .. } => result.as_ref().err(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub epoch: u64,
    pub outcome: Outcome,
}

/// Perform one command and package its result.
pub async fn execute(api: &dyn ReportApi, command: Command) -> Completion {
    let Command { epoch, op } = command;
    let outcome = match op {
        Operation::Login(credentials) => Outcome::LoggedIn(api.login(&credentials).await),
        Operation::Logout => Outcome::LoggedOut(api.logout().await),
        Operation::LoadFiles => Outcome::FilesLoaded(api.list_files().await),
        Operation::LoadSheets(ticket) => {
            let result = api.list_sheets(&ticket.file_id).await;
            Outcome::SheetsLoaded { ticket, result }
        }
        Operation::GenerateReport(request) => {
            let result = api.generate_report(&request).await;
            Outcome::ReportGenerated { request, result }
        }
        Operation::Upload(file) => {
            let result = api.upload(&file).await;
            Outcome::Uploaded { file, result }
        }
    };
    Completion { epoch, outcome }
}

/// Long-lived backend loop.
///
/// Every command runs as its own task. A new sheet fetch cancels the one
/// before it, since only the latest file's sheets can still be shown. The
/// loop ends when `shutdown` fires or the command channel closes.
pub async fn run(
    api: Arc<dyn ReportApi>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    completions: mpsc::UnboundedSender<Completion>,
    shutdown: CancellationToken,
) {
    let mut sheet_cancel = shutdown.child_token();

    loop {
        let command = tokio::select! {
            _ = shutdown.cancelled() => break,
            cmd = commands.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        let cancel = if matches!(command.op, Operation::LoadSheets(_)) {
            sheet_cancel.cancel();
            sheet_cancel = shutdown.child_token();
            sheet_cancel.clone()
        } else {
            shutdown.child_token()
        };

        let name = command.op.name();
        tracing::debug!(op = name, epoch = command.epoch, "dispatching request");

        let api = api.clone();
        let tx = completions.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(op = name, "request superseded");
                }
                completion = execute(api.as_ref(), command) => {
                    let _ = tx.send(completion);
                }
            }
        });
    }
}
