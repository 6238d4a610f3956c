//! The list of uploaded spreadsheets offered in the file selector.

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, RemoteFile};
use crate::{FileDescriptor, FileId};

/// Label of the always-present "no selection" entry.
pub const SENTINEL_LABEL: &str = "\u{2014}";

/// One row of the file selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOption<'a> {
    /// The "no selection" entry; always first.
    Sentinel,
    File(&'a FileDescriptor),
}

impl FileOption<'_> {
    pub fn label(&self) -> String {
        match self {
            FileOption::Sentinel => SENTINEL_LABEL.to_string(),
            FileOption::File(f) => f.display_name(),
        }
    }

    pub fn file_id(&self) -> Option<&FileId> {
        match self {
            FileOption::Sentinel => None,
            FileOption::File(f) => Some(&f.id),
        }
    }
}

/// Keep only files whose extension exactly matches the accepted set.
pub fn filter_accepted(remote: Vec<RemoteFile>) -> Vec<FileDescriptor> {
    let total = remote.len();
    let files: Vec<FileDescriptor> = remote
        .into_iter()
        .filter_map(FileDescriptor::from_remote)
        .collect();
    if files.len() != total {
        tracing::debug!(
            total,
            kept = files.len(),
            "skipped files with unsupported extension"
        );
    }
    files
}

/// Eligible uploaded files from the most recent successful listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileCatalog {
    files: Vec<FileDescriptor>,
    loading: bool,
    last_error: Option<String>,
}

impl FileCatalog {
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error from the last failed listing, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Selector rows: the sentinel followed by every eligible file.
    pub fn options(&self) -> Vec<FileOption<'_>> {
        std::iter::once(FileOption::Sentinel)
            .chain(self.files.iter().map(FileOption::File))
            .collect()
    }

    pub fn get(&self, id: &FileId) -> Option<&FileDescriptor> {
        self.files.iter().find(|f| &f.id == id)
    }

    pub(crate) fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Fold a listing result in. A failure is logged and leaves the previous
    /// list untouched. Returns true if the list was replaced.
    pub(crate) fn apply(&mut self, result: Result<Vec<RemoteFile>, ApiError>) -> bool {
        self.loading = false;
        match result {
            Ok(remote) => {
                self.files = filter_accepted(remote);
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load file list");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.files.clear();
        self.loading = false;
        self.last_error = None;
    }
}
