//! REST API types for frontend integration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{Diagnostic, Invoice, Summary};
use crate::pipeline::CheckResult;

/// Body of `POST /api/validate` and `POST /api/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Complete CSV document.
    pub csv: String,
}

/// Overall outcome of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// No diagnostics.
    Ready,
    /// Records were produced but something needs review.
    Warning,
    /// Nothing usable came out of the sheet.
    Error,
}

/// Response sent to the frontend after validating a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// Unique job identifier
    pub job_id: String,

    pub status: CheckStatus,

    /// Valid invoice rows, sorted by item
    pub invoices: Vec<Invoice>,

    pub diagnostics: Vec<Diagnostic>,

    pub metadata: ResponseMetadata,
}

/// Metadata about the check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub csv_info: CsvMetadata,
    pub summary: Summary,
    pub checked_at: DateTime<Utc>,
}

/// CSV input metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl From<CheckResult> for CheckResponse {
    fn from(result: CheckResult) -> Self {
        let summary = result.report.summary();

        let status = if result.report.is_clean() {
            CheckStatus::Ready
        } else if result.report.invoices.is_empty() {
            CheckStatus::Error
        } else {
            CheckStatus::Warning
        };

        CheckResponse {
            job_id: Uuid::new_v4().to_string(),
            status,
            invoices: result.report.invoices,
            diagnostics: result.report.diagnostics,
            metadata: ResponseMetadata {
                csv_info: CsvMetadata {
                    encoding: result.csv_info.encoding,
                    row_count: result.csv_info.row_count,
                    columns: result.csv_info.columns,
                },
                summary,
                checked_at: Utc::now(),
            },
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "invoices": [],
        "diagnostics": [],
    })
}
