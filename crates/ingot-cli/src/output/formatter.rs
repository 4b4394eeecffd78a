//! Output formatter trait for CLI results.

use anyhow::Result;
use ingot_core::CheckReport;
use ingot_core::IngestReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format ingestion result
    fn format_ingest_result(&self, report: &IngestReport) -> Result<()>;

    /// Format validation-only result
    fn format_check_result(&self, archive: &Path, report: &CheckReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            code: None,
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(
        operation: impl Into<String>,
        code: Option<&'static str>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            code,
            error: Some(error.into()),
        }
    }
}
