//! Local file validation and upload bookkeeping.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::{SpreadsheetExtension, ValidationError};

/// Reason shown when the server rejects an upload without saying why.
pub const UPLOAD_FAILED: &str = "upload failed";

/// A local spreadsheet that passed the extension check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    path: PathBuf,
    file_name: String,
    extension: SpreadsheetExtension,
}

impl LocalFile {
    /// Validate `path` for upload. The extension comes from the filename
    /// suffix and is compared ignoring case.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ValidationError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if file_name.is_empty() {
            return Err(ValidationError::NoFileChosen);
        }
        let extension = SpreadsheetExtension::from_file_name(&file_name).ok_or_else(|| {
            ValidationError::DisallowedExtension {
                name: file_name.clone(),
            }
        })?;
        Ok(Self {
            path,
            file_name,
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn extension(&self) -> SpreadsheetExtension {
        self.extension
    }
}

/// Holds the chosen local file between "choose" and a successful upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadCoordinator {
    chosen: Option<PathBuf>,
    in_flight: bool,
}

impl UploadCoordinator {
    pub fn chosen(&self) -> Option<&Path> {
        self.chosen.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight
    }

    /// Choose a file; an empty path clears the choice.
    pub(crate) fn choose(&mut self, path: Option<PathBuf>) {
        self.chosen = path.filter(|p| !p.as_os_str().is_empty());
    }

    /// Validate the chosen file. Nothing is sent when this fails.
    pub(crate) fn begin(&mut self) -> Result<LocalFile, ValidationError> {
        let path = self.chosen.clone().ok_or(ValidationError::NoFileChosen)?;
        let file = LocalFile::from_path(path)?;
        self.in_flight = true;
        Ok(file)
    }

    /// The session ended while the upload was in flight; its completion will
    /// never be applied.
    pub(crate) fn abandon(&mut self) {
        self.in_flight = false;
    }

    /// Success clears the chosen file; failure keeps it for a retry and
    /// returns the reason to show.
    pub(crate) fn finish(&mut self, result: Result<(), ApiError>) -> Result<(), String> {
        self.in_flight = false;
        match result {
            Ok(()) => {
                self.chosen = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "upload failed");
                Err(e.reason_or(UPLOAD_FAILED))
            }
        }
    }
}
