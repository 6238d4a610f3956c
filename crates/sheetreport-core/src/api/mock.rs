//! Mock report server for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ApiError, ApiFuture, RemoteFile, ReportApi, ReportData};
use crate::FileId;
use crate::report::ReportRequest;
use crate::session::Credentials;
use crate::upload::LocalFile;

/// Which endpoint a call went to, for call counting and latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListFiles,
    ListSheets,
    GenerateReport,
    Upload,
    Login,
    Logout,
}

/// A hand-rolled mock implementing [`ReportApi`] for tests.
///
/// Every endpoint answers from a canned result that tests set up front and
/// may swap at any time. Sheet listings are keyed by file id; ids without
/// an entry answer 404. Optional per-endpoint latency lets tests hold a
/// request in flight while something else happens.
pub struct MockApi {
    files: Mutex<Result<Vec<RemoteFile>, ApiError>>,
    sheets: Mutex<HashMap<FileId, Result<Vec<String>, ApiError>>>,
    report: Mutex<Result<ReportData, ApiError>>,
    upload: Mutex<Result<(), ApiError>>,
    login: Mutex<Result<(), ApiError>>,
    logout: Mutex<Result<(), ApiError>>,
    delays: Mutex<HashMap<Endpoint, Duration>>,
    calls: Mutex<HashMap<Endpoint, usize>>,
    total_calls: AtomicUsize,
    last_report_request: Mutex<Option<ReportRequest>>,
    last_upload_name: Mutex<Option<String>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// A server with no files, accepting every login, logout and upload.
    pub fn new() -> Self {
        Self {
            files: Mutex::new(Ok(Vec::new())),
            sheets: Mutex::new(HashMap::new()),
            report: Mutex::new(Ok(ReportData::new())),
            upload: Mutex::new(Ok(())),
            login: Mutex::new(Ok(())),
            logout: Mutex::new(Ok(())),
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            total_calls: AtomicUsize::new(0),
            last_report_request: Mutex::new(None),
            last_upload_name: Mutex::new(None),
        }
    }

    pub fn with_files(self, files: Vec<RemoteFile>) -> Self {
        self.set_files(Ok(files));
        self
    }

    pub fn with_sheets(self, file_id: &str, sheets: &[&str]) -> Self {
        self.set_sheets(
            file_id,
            Ok(sheets.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    pub fn with_report(self, data: &[(&str, f64)]) -> Self {
        self.set_report(Ok(data
            .iter()
            .map(|(label, amount)| (label.to_string(), *amount))
            .collect()));
        self
    }

    /// Set simulated latency for one endpoint.
    pub fn with_delay(self, endpoint: Endpoint, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(endpoint, delay);
        self
    }

    pub fn set_files(&self, result: Result<Vec<RemoteFile>, ApiError>) {
        *self.files.lock().unwrap() = result;
    }

    pub fn set_sheets(&self, file_id: &str, result: Result<Vec<String>, ApiError>) {
        self.sheets
            .lock()
            .unwrap()
            .insert(FileId::new(file_id), result);
    }

    pub fn set_report(&self, result: Result<ReportData, ApiError>) {
        *self.report.lock().unwrap() = result;
    }

    pub fn set_upload(&self, result: Result<(), ApiError>) {
        *self.upload.lock().unwrap() = result;
    }

    pub fn set_login(&self, result: Result<(), ApiError>) {
        *self.login.lock().unwrap() = result;
    }

    pub fn set_logout(&self, result: Result<(), ApiError>) {
        *self.logout.lock().unwrap() = result;
    }

    /// How many times `endpoint` has been called.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&endpoint)
            .copied()
            .unwrap_or(0)
    }

    /// How many calls were made across all endpoints.
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn last_report_request(&self) -> Option<ReportRequest> {
        self.last_report_request.lock().unwrap().clone()
    }

    pub fn last_upload_name(&self) -> Option<String> {
        self.last_upload_name.lock().unwrap().clone()
    }

    fn record(&self, endpoint: Endpoint) -> Option<Duration> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
        self.delays.lock().unwrap().get(&endpoint).copied()
    }
}

/// Build a [`RemoteFile`] for mock listings.
pub fn remote_file(id: &str, name: &str, extension: &str) -> RemoteFile {
    RemoteFile {
        id: FileId::new(id),
        name: name.to_string(),
        extension: extension.to_string(),
    }
}

async fn after(delay: Option<Duration>) {
    if let Some(d) = delay {
        tokio::time::sleep(d).await;
    }
}

impl ReportApi for MockApi {
    fn list_files(&self) -> ApiFuture<'_, Vec<RemoteFile>> {
        let delay = self.record(Endpoint::ListFiles);
        let result = self.files.lock().unwrap().clone();
        Box::pin(async move {
            after(delay).await;
            result
        })
    }

    fn list_sheets<'a>(&'a self, file_id: &'a FileId) -> ApiFuture<'a, Vec<String>> {
        let delay = self.record(Endpoint::ListSheets);
        let result = self
            .sheets
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .unwrap_or(Err(ApiError::Rejected {
                status: 404,
                detail: Some("File not found".into()),
            }));
        Box::pin(async move {
            after(delay).await;
            result
        })
    }

    fn generate_report<'a>(&'a self, request: &'a ReportRequest) -> ApiFuture<'a, ReportData> {
        let delay = self.record(Endpoint::GenerateReport);
        *self.last_report_request.lock().unwrap() = Some(request.clone());
        let result = self.report.lock().unwrap().clone();
        Box::pin(async move {
            after(delay).await;
            result
        })
    }

    fn upload<'a>(&'a self, file: &'a LocalFile) -> ApiFuture<'a, ()> {
        let delay = self.record(Endpoint::Upload);
        *self.last_upload_name.lock().unwrap() = Some(file.file_name().to_string());
        let result = self.upload.lock().unwrap().clone();
        Box::pin(async move {
            after(delay).await;
            result
        })
    }

    fn login<'a>(&'a self, _credentials: &'a Credentials) -> ApiFuture<'a, ()> {
        let delay = self.record(Endpoint::Login);
        let result = self.login.lock().unwrap().clone();
        Box::pin(async move {
            after(delay).await;
            result
        })
    }

    fn logout(&self) -> ApiFuture<'_, ()> {
        let delay = self.record(Endpoint::Logout);
        let result = self.logout.lock().unwrap().clone();
        Box::pin(async move {
            after(delay).await;
            result
        })
    }
}
