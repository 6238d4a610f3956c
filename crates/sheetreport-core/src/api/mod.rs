//! The HTTP contract consumed by the workflow, behind the [`ReportApi`] trait.

pub mod client;
pub mod mock;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FileId;
use crate::report::ReportRequest;
use crate::session::Credentials;
use crate::upload::LocalFile;

pub use client::HttpApi;

/// Boxed future returned by every [`ReportApi`] method.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Aggregated report as sent by the server: label to amount, unordered.
pub type ReportData = HashMap<String, f64>;

/// Error type for requests against the report server.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server could not be reached or the connection broke.
    #[error("could not connect to server: {0}")]
    Transport(String),
    /// The server answered 2xx but the body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
    /// Non-2xx response. `detail` is the server-supplied reason, if any.
    #[error("HTTP {status}")]
    Rejected { status: u16, detail: Option<String> },
    /// A local file could not be read for upload.
    #[error("could not read file: {0}")]
    Io(String),
}

impl ApiError {
    /// A 401 means the session cookie or bearer token is no longer accepted.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Rejected { status: 401, .. })
    }

    /// Server-supplied reason for a rejection.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// User-facing reason: the server's detail when present, otherwise
    /// `fallback` for rejections and a generic connectivity message for
    /// transport failures.
    pub fn reason_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                detail: Some(d), ..
            } => d.clone(),
            ApiError::Rejected { detail: None, .. } => fallback.to_string(),
            ApiError::Transport(_) => "could not connect to server".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// One entry of `GET /v1/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub id: FileId,
    pub name: String,
    pub extension: String,
}

/// Body of `GET /v1/upload/{id}`; only the sheet names matter here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetListing {
    #[serde(default)]
    pub sheet: Option<Vec<String>>,
}

impl SheetListing {
    pub fn into_sheets(self) -> Vec<String> {
        self.sheet.unwrap_or_default()
    }
}

/// Body of a successful `POST /v1/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The report server as seen by the workflow.
pub trait ReportApi: Send + Sync {
    /// `GET /v1/upload`: every uploaded file, unfiltered.
    fn list_files(&self) -> ApiFuture<'_, Vec<RemoteFile>>;

    /// `GET /v1/upload/{id}`: sheet names of one file.
    fn list_sheets<'a>(&'a self, file_id: &'a FileId) -> ApiFuture<'a, Vec<String>>;

    /// `GET /v1/report/{id}/generate-report`: aggregated amounts.
    fn generate_report<'a>(&'a self, request: &'a ReportRequest) -> ApiFuture<'a, ReportData>;

    /// `POST /v1/upload`: multipart upload of a local file.
    fn upload<'a>(&'a self, file: &'a LocalFile) -> ApiFuture<'a, ()>;

    /// `POST /v1/auth/login`.
    fn login<'a>(&'a self, credentials: &'a Credentials) -> ApiFuture<'a, ()>;

    /// `POST /v1/auth/logout`.
    fn logout(&self) -> ApiFuture<'_, ()>;
}

/// Pull a human-readable reason out of an error body.
///
/// Handles `{"detail": "..."}` and FastAPI validation bodies of the form
/// `{"detail": [{"msg": "..."}]}`. Anything else yields `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|i| i.get("msg").and_then(|m| m.as_str()))
            .map(str::to_string),
        _ => None,
    }
}

/// Decode a report body into label/amount pairs.
///
/// Amounts may be JSON numbers or numeric strings; anything else is a
/// decode error, as is a body that is not an object.
pub fn decode_report(value: serde_json::Value) -> Result<ReportData, ApiError> {
    let serde_json::Value::Object(map) = value else {
        return Err(ApiError::Decode("report body is not an object".into()));
    };
    let mut data = ReportData::with_capacity(map.len());
    for (label, amount) in map {
        let parsed = match &amount {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(parsed) = parsed else {
            return Err(ApiError::Decode(format!(
                "amount for {label:?} is not numeric: {amount}"
            )));
        };
        data.insert(label, parsed);
    }
    Ok(data)
}
