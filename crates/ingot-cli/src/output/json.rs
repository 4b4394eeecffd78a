//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::error::find_ingest_error;
use anyhow::Result;
use ingot_core::CheckReport;
use ingot_core::IngestReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter {
    operation: &'static str,
}

impl JsonFormatter {
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct IngestOutput {
    marker_path: String,
    wrapper_folder: Option<String>,
    files_moved: usize,
    media_copied: usize,
    entries_skipped: usize,
    markers_seen: usize,
    entry_count: usize,
    bytes_extracted: u64,
    upload_bytes: u64,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl From<&IngestReport> for IngestOutput {
    fn from(report: &IngestReport) -> Self {
        let relocation = &report.relocation;
        Self {
            marker_path: relocation.marker_path.display().to_string(),
            wrapper_folder: relocation.wrapper_folder.clone(),
            files_moved: relocation.files_moved,
            media_copied: relocation.media_copied,
            entries_skipped: relocation.entries_skipped,
            markers_seen: relocation.markers_seen,
            entry_count: report.entry_count,
            bytes_extracted: report.bytes_extracted,
            upload_bytes: report.upload_bytes,
            duration_ms: report.duration.as_millis(),
            warnings: relocation.warnings.clone(),
        }
    }
}

#[derive(Serialize)]
struct CheckOutput {
    archive: String,
    format: &'static str,
    entry_count: usize,
    extracted_bytes: u64,
    compressed_bytes: u64,
    ratio: Option<f64>,
}

impl OutputFormatter for JsonFormatter {
    fn format_ingest_result(&self, report: &IngestReport) -> Result<()> {
        Self::output(&JsonOutput::success(self.operation, IngestOutput::from(report)))
    }

    fn format_check_result(&self, archive: &Path, report: &CheckReport) -> Result<()> {
        let structure = &report.structure;
        let data = CheckOutput {
            archive: archive.display().to_string(),
            format: report.format.name(),
            entry_count: structure.entry_count,
            extracted_bytes: structure.extracted_bytes,
            compressed_bytes: structure.compressed_bytes,
            ratio: structure.ratio,
        };

        Self::output(&JsonOutput::success(self.operation, data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let code = find_ingest_error(error).map(ingot_core::IngestError::code);
        let output = JsonOutput::error(self.operation, code, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    // Warnings are already part of the ingest result.
    fn format_warning(&self, _message: &str) {}
}
