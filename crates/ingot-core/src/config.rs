//! Ingestion configuration.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::IngestError;
use crate::Result;

/// Default marker file identifying the root conversation document.
pub const DEFAULT_MARKER_FILE: &str = "conversations.json";

/// Default prefix for scratch directory names.
pub const DEFAULT_SCRATCH_PREFIX: &str = "ingot-upload-";

/// Size and shape limits applied to every upload.
///
/// Limits are static configuration. The ingestion pipeline only ever reads
/// them.
///
/// # Examples
///
/// ```
/// use ingot_core::ValidationLimits;
///
/// let limits = ValidationLimits {
///     max_upload_bytes: 100 * 1024 * 1024, // 100 MB
///     ..Default::default()
/// };
/// assert_eq!(limits.max_entry_count, 100_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Maximum size of the compressed upload in bytes.
    pub max_upload_bytes: u64,

    /// Maximum sum of extracted entry sizes in bytes.
    pub max_extracted_bytes: u64,

    /// Maximum compression ratio allowed (extracted / compressed).
    pub max_compression_ratio: f64,

    /// Maximum number of entries in the archive.
    pub max_entry_count: usize,
}

impl Default for ValidationLimits {
    /// Default values:
    /// - `max_upload_bytes`: 2 GiB
    /// - `max_extracted_bytes`: 8 GiB
    /// - `max_compression_ratio`: 100.0
    /// - `max_entry_count`: 100,000
    fn default() -> Self {
        Self {
            max_upload_bytes: 2 * 1024 * 1024 * 1024,
            max_extracted_bytes: 8 * 1024 * 1024 * 1024,
            max_compression_ratio: 100.0,
            max_entry_count: 100_000,
        }
    }
}

/// Full configuration for one ingestion pipeline.
///
/// Pass by reference (`&IngestConfig`). Share across threads with
/// `Arc<IngestConfig>` if needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Upload and archive limits.
    pub limits: ValidationLimits,

    /// File name of the conversation-export marker file.
    pub marker_file_name: String,

    /// Prefix for scratch directory names.
    pub scratch_prefix: String,

    /// Parent directory for scratch areas (system temp dir when `None`).
    pub scratch_root: Option<PathBuf>,

    /// Run the trial-extraction structure check before the real extraction.
    pub validate_structure: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            limits: ValidationLimits::default(),
            marker_file_name: DEFAULT_MARKER_FILE.to_string(),
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            scratch_root: None,
            validate_structure: true,
        }
    }
}

impl IngestConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
        serde_json::from_slice(&raw).map_err(|e| {
            IngestError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Sets the validation limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the marker file name.
    #[must_use]
    pub fn with_marker_file_name(mut self, name: impl Into<String>) -> Self {
        self.marker_file_name = name.into();
        self
    }

    /// Sets the parent directory for scratch areas.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Enables or disables the trial-extraction structure check.
    #[must_use]
    pub fn with_structure_validation(mut self, enabled: bool) -> Self {
        self.validate_structure = enabled;
        self
    }
}
