use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod api;
pub mod catalog;
pub mod config_file;
pub mod executor;
pub mod extension;
pub mod gate;
pub mod report;
pub mod selection;
pub mod session;
pub mod sheets;
pub mod upload;
pub mod workflow;

// Re-export for convenience
pub use api::{ApiError, HttpApi, ReportApi};
pub use catalog::{FileCatalog, FileOption};
pub use executor::{Command, Completion, Operation, Outcome};
pub use extension::SpreadsheetExtension;
pub use gate::Gate;
pub use report::{ReportRequest, ReportRow, ReportView};
pub use selection::Selection;
pub use session::{Credentials, SessionState};
pub use sheets::{SheetOptions, SheetTicket};
pub use upload::LocalFile;
pub use workflow::Workflow;

/// Opaque server-side identifier of an uploaded file.
///
/// The server emits UUID strings; numeric ids are accepted and kept in their
/// decimal form so the identifier round-trips into URLs unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FileId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(FileId(s)),
            serde_json::Value::Number(n) => Ok(FileId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "file id must be a string or number, got {other}"
            ))),
        }
    }
}

/// An uploaded spreadsheet as presented by the file catalog.
///
/// Only files with an accepted extension become descriptors; see
/// [`FileDescriptor::from_remote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: FileId,
    pub name: String,
    pub extension: SpreadsheetExtension,
}

impl FileDescriptor {
    /// Convert a server listing entry, dropping files whose extension is not
    /// exactly one of the accepted set.
    pub fn from_remote(remote: api::RemoteFile) -> Option<Self> {
        let extension = SpreadsheetExtension::from_exact(&remote.extension)?;
        Some(Self {
            id: remote.id,
            name: remote.name,
            extension,
        })
    }

    /// Name shown in the file selector: stem plus extension.
    pub fn display_name(&self) -> String {
        format!("{}{}", self.name, self.extension)
    }
}

/// Failures detected on the client before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("enter email and password")]
    EmptyCredentials,
    #[error("select a file to upload")]
    NoFileChosen,
    #[error("only {} files are allowed: {name}", SpreadsheetExtension::accepted_list())]
    DisallowedExtension { name: String },
    #[error("select a file first")]
    NoFileSelected,
    #[error("select a sheet first")]
    NoSheetSelected,
    #[error("not logged in")]
    NotAuthenticated,
    #[error("already logged in, log out first")]
    AlreadyAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible message; the terminal front end shows these as a modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
