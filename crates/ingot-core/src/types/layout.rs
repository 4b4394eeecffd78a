//! Destination layout for relocated export contents.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::IngestError;
use crate::Result;

/// Destination directories for one ingestion.
///
/// The export root receives the marker file and ordinary files; the media
/// root receives classified media. Both are created on demand, and their
/// contents belong to the caller once relocation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLayout {
    export_root: PathBuf,
    media_root: PathBuf,
}

impl ExportLayout {
    /// Creates a layout from export and media roots.
    pub fn new(export_root: impl Into<PathBuf>, media_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
            media_root: media_root.into(),
        }
    }

    /// Root receiving the marker file and ordinary files.
    #[must_use]
    pub fn export_root(&self) -> &Path {
        &self.export_root
    }

    /// Root receiving media files.
    #[must_use]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Creates both roots if missing. Idempotent.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.export_root, &self.media_root] {
            fs::create_dir_all(dir).map_err(|e| IngestError::io(dir, e))?;
        }
        Ok(())
    }
}
