//! Report generation requests and the rendered report table.

use serde::{Deserialize, Serialize};

use crate::api::ReportData;
use crate::selection::Selection;
use crate::{FileId, SpreadsheetExtension, ValidationError};

/// The exact (file, extension, sheet) triple a report is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub file_id: FileId,
    pub extension: SpreadsheetExtension,
    pub sheet_name: String,
}

impl ReportRequest {
    /// Re-validate the selection at the moment the user asks for a report.
    pub fn from_selection(selection: &Selection) -> Result<Self, ValidationError> {
        let (Some(file_id), Some(extension)) = (selection.file_id(), selection.extension())
        else {
            return Err(ValidationError::NoFileSelected);
        };
        let sheet_name = selection
            .sheet_name()
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::NoSheetSelected)?;
        Ok(Self {
            file_id: file_id.clone(),
            extension,
            sheet_name: sheet_name.to_string(),
        })
    }

    /// Request path with percent-encoded id, extension and sheet name.
    pub fn path_and_query(&self) -> String {
        format!(
            "/v1/report/{}/generate-report?extension={}&sheet_name={}",
            urlencoding::encode(self.file_id.as_str()),
            urlencoding::encode(self.extension.as_str()),
            urlencoding::encode(&self.sheet_name),
        )
    }
}

/// One aggregation bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub amount: f64,
}

impl ReportRow {
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount)
    }
}

/// Two fractional digits, e.g. `42.00`.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Rows sorted by amount, largest first. Ties keep no particular order.
pub fn sort_rows(data: ReportData) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = data
        .into_iter()
        .map(|(label, amount)| ReportRow { label, amount })
        .collect();
    rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    rows
}

/// The rendered report table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportView {
    rows: Vec<ReportRow>,
    visible: bool,
    in_flight: Option<ReportRequest>,
    /// The request the current rows were generated for.
    source: Option<ReportRequest>,
}

impl ReportView {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// The table is visible once a report has rendered.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The "no report yet" placeholder shows exactly while the table is hidden.
    pub fn placeholder_visible(&self) -> bool {
        !self.visible
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn source(&self) -> Option<&ReportRequest> {
        self.source.as_ref()
    }

    pub(crate) fn begin(&mut self, request: ReportRequest) {
        self.in_flight = Some(request);
    }

    /// Replace the whole table body and show it.
    pub(crate) fn render(&mut self, request: ReportRequest, data: ReportData) {
        self.rows = sort_rows(data);
        self.visible = true;
        self.in_flight = None;
        self.source = Some(request);
    }

    /// A failed generation leaves the previous table as it was.
    pub(crate) fn fail(&mut self) {
        self.in_flight = None;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
