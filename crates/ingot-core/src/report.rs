//! Ingestion reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of relocating extracted entries into an export layout.
#[derive(Debug, Clone, Default)]
pub struct RelocationReport {
    /// Final location of the marker file.
    pub marker_path: PathBuf,

    /// Wrapper folder stripped from destination paths, if one was detected.
    pub wrapper_folder: Option<String>,

    /// Number of ordinary files moved into the export root.
    pub files_moved: usize,

    /// Number of media files copied into the media root.
    pub media_copied: usize,

    /// Number of entries skipped because of unsafe paths or I/O failures.
    pub entries_skipped: usize,

    /// Number of marker candidates that were accepted.
    ///
    /// Values above one mean later markers replaced earlier ones.
    pub markers_seen: usize,

    /// Warnings generated during relocation.
    pub warnings: Vec<String>,
}

impl RelocationReport {
    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Summary of a complete ingestion.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Relocation results.
    pub relocation: RelocationReport,

    /// Number of entries reported by the decoder.
    pub entry_count: usize,

    /// Sum of extracted entry sizes in bytes.
    pub bytes_extracted: u64,

    /// Compressed upload size in bytes.
    pub upload_bytes: u64,

    /// Wall-clock duration of the whole pipeline.
    pub duration: Duration,
}

impl IngestReport {
    /// Final location of the marker file.
    #[must_use]
    pub fn marker_path(&self) -> &Path {
        &self.relocation.marker_path
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.relocation.has_warnings()
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
///
/// # Examples
///
/// ```
/// use ingot_core::report::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
