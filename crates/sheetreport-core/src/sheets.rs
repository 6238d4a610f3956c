//! Sheet names of the selected file, with stale-response protection.
//!
//! Each fetch is issued under a [`SheetTicket`] carrying a generation
//! number. Only the completion whose ticket matches the latest generation is
//! applied; anything older is a response for a file the user has already
//! moved away from and is dropped.

use serde::{Deserialize, Serialize};

use crate::FileId;
use crate::api::ApiError;

pub const PLACEHOLDER_NEEDS_FILE: &str = "select a file first";
pub const PLACEHOLDER_LOADING: &str = "loading\u{2026}";
pub const PLACEHOLDER_NO_SHEETS: &str = "no sheets";
pub const PLACEHOLDER_ERROR: &str = "error";

/// What the sheet selector currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetOptions {
    #[default]
    NeedsFile,
    Loading,
    Loaded(Vec<String>),
    NoSheets,
    Failed(String),
}

impl SheetOptions {
    /// Placeholder text, or `None` when real sheet names are listed.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            SheetOptions::NeedsFile => Some(PLACEHOLDER_NEEDS_FILE),
            SheetOptions::Loading => Some(PLACEHOLDER_LOADING),
            SheetOptions::Loaded(_) => None,
            SheetOptions::NoSheets => Some(PLACEHOLDER_NO_SHEETS),
            SheetOptions::Failed(_) => Some(PLACEHOLDER_ERROR),
        }
    }

    pub fn sheets(&self) -> &[String] {
        match self {
            SheetOptions::Loaded(s) => s,
            _ => &[],
        }
    }
}

/// Identifies one sheet fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTicket {
    pub file_id: FileId,
    pub generation: u64,
}

/// Outcome of folding a completion into the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetApply {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetResolver {
    options: SheetOptions,
    generation: u64,
}

impl SheetResolver {
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.sheets().iter().any(|s| s == name)
    }

    /// No file selected: show the explanatory placeholder and invalidate any
    /// fetch still in flight.
    pub(crate) fn reset(&mut self) {
        self.generation += 1;
        self.options = SheetOptions::NeedsFile;
    }

    /// Start a fetch for `file_id`; the loading placeholder shows until the
    /// matching completion arrives.
    pub(crate) fn begin(&mut self, file_id: FileId) -> SheetTicket {
        self.generation += 1;
        self.options = SheetOptions::Loading;
        SheetTicket {
            file_id,
            generation: self.generation,
        }
    }

    pub(crate) fn complete(
        &mut self,
        ticket: &SheetTicket,
        result: Result<Vec<String>, ApiError>,
    ) -> SheetApply {
        if ticket.generation != self.generation {
            tracing::debug!(
                file_id = %ticket.file_id,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale sheet listing"
            );
            return SheetApply::Stale;
        }
        self.options = match result {
            Ok(sheets) if sheets.is_empty() => SheetOptions::NoSheets,
            Ok(sheets) => SheetOptions::Loaded(sheets),
            Err(e) => {
                tracing::warn!(file_id = %ticket.file_id, error = %e, "failed to load sheets");
                SheetOptions::Failed(e.to_string())
            }
        };
        SheetApply::Applied
    }
}
