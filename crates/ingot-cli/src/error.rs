//! Error conversion utilities for CLI.
//!
//! Converts ingot-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance. The original
//! `IngestError` stays in the chain so JSON output can report its code.

use anyhow::Result;
use ingot_core::IngestError;
use std::path::Path;

/// Wraps `IngestError` in an anyhow error carrying an operator hint.
pub fn convert_ingest_error(err: IngestError, archive: &Path) -> anyhow::Error {
    let archive = archive.display();
    let message = match &err {
        IngestError::TooLarge { .. } => format!(
            "Upload '{archive}' rejected\n\
             HINT: Use --max-upload-size to accept larger uploads."
        ),
        IngestError::InvalidFormat { .. } => format!(
            "'{archive}' is not a supported archive\n\
             HINT: Supported formats: zip, tar.gz"
        ),
        IngestError::TooManyFiles { .. } => format!(
            "Archive '{archive}' has too many entries\n\
             HINT: Use --max-entries to raise the limit if the export is legitimate."
        ),
        IngestError::CompressionBomb { .. } => format!(
            "Security violation: Archive '{archive}' appears to be a decompression bomb\n\
             HINT: Use --max-ratio to allow higher ratios if legitimate."
        ),
        IngestError::UnsafePath { .. } => format!(
            "Security violation: Archive '{archive}' contains an entry escaping its directory\n\
             HINT: This archive may be malicious. Do not ingest from untrusted sources."
        ),
        IngestError::EmptyArchive => format!("Archive '{archive}' contains no entries"),
        IngestError::ExtractedTooLarge { .. } => format!(
            "Archive '{archive}' expands beyond the extraction limit\n\
             HINT: Use --max-extracted-size to raise the limit."
        ),
        IngestError::ExtractionFailed { .. } => format!(
            "Could not extract '{archive}'\n\
             HINT: The archive may be corrupted or truncated."
        ),
        IngestError::MarkerNotFound { marker } => format!(
            "'{archive}' does not look like a conversation export\n\
             HINT: No {marker} was found. Use --marker to look for a different file."
        ),
        IngestError::Io { .. } => format!("I/O error while processing '{archive}'"),
    };

    anyhow::Error::new(err).context(message)
}

/// Adds context to a core result about the archive being processed
pub fn add_archive_context<T>(result: Result<T, IngestError>, archive: &Path) -> Result<T> {
    result.map_err(|e| convert_ingest_error(e, archive))
}

/// Finds the core error in an anyhow chain, if there is one.
pub fn find_ingest_error(error: &anyhow::Error) -> Option<&IngestError> {
    error.chain().find_map(|e| e.downcast_ref::<IngestError>())
}
