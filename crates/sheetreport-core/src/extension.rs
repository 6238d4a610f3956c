//! The accepted spreadsheet extensions.
//!
//! The file catalog and the upload check share this one set. The catalog
//! compares the server's `extension` field exactly; uploads derive the
//! extension from a local filename and compare case-insensitively.

use serde::{Deserialize, Serialize};

/// A spreadsheet format the report workflow can aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpreadsheetExtension {
    /// Office Open XML workbook.
    Xlsx,
    /// Legacy binary workbook.
    Xls,
}

impl SpreadsheetExtension {
    pub const ALL: [SpreadsheetExtension; 2] =
        [SpreadsheetExtension::Xlsx, SpreadsheetExtension::Xls];

    /// Wire form, including the leading dot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xlsx => ".xlsx",
            Self::Xls => ".xls",
        }
    }

    /// Exact match against the server's extension field.
    pub fn from_exact(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == ext)
    }

    /// Derive the extension from a filename suffix, ignoring case.
    ///
    /// The suffix runs from the last `.` to the end of the name. Names
    /// without a dot have no extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let dot = name.rfind('.')?;
        let suffix = name[dot..].to_ascii_lowercase();
        Self::from_exact(&suffix)
    }

    /// Human-readable list of accepted extensions, e.g. `.xlsx, .xls`.
    pub fn accepted_list() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for SpreadsheetExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
