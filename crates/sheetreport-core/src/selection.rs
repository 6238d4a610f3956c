use serde::{Deserialize, Serialize};

use crate::{FileDescriptor, FileId, SpreadsheetExtension};

/// The in-progress (file, sheet) choice.
///
/// Fields are private so the invariants hold by construction: the extension
/// always comes from the chosen file descriptor, and a sheet can only be set
/// while a file is chosen. Choosing a file (even the same one again) drops
/// the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    file_id: Option<FileId>,
    extension: Option<SpreadsheetExtension>,
    sheet_name: Option<String>,
}

impl Selection {
    pub fn file_id(&self) -> Option<&FileId> {
        self.file_id.as_ref()
    }

    pub fn extension(&self) -> Option<SpreadsheetExtension> {
        self.extension
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    pub fn has_file(&self) -> bool {
        self.file_id.is_some()
    }

    pub fn has_sheet(&self) -> bool {
        self.sheet_name.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub(crate) fn choose_file(&mut self, file: &FileDescriptor) {
        self.file_id = Some(file.id.clone());
        self.extension = Some(file.extension);
        self.sheet_name = None;
    }

    /// Returns false (and changes nothing) if no file is chosen.
    pub(crate) fn choose_sheet(&mut self, name: &str) -> bool {
        if self.file_id.is_none() || name.is_empty() {
            return false;
        }
        self.sheet_name = Some(name.to_string());
        true
    }

    pub(crate) fn clear_sheet(&mut self) {
        self.sheet_name = None;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
