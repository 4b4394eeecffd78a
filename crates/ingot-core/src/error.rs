//! Error types for archive ingestion.

use std::path::PathBuf;
use thiserror::Error;

use crate::progress::ProgressStage;
use crate::report::format_size;

/// Result type alias using `IngestError`.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can terminate an ingestion.
///
/// Every variant is terminal for the current pipeline invocation. None of
/// them are retried internally.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Upload exceeds the configured maximum size.
    #[error("upload too large: {} exceeds maximum of {}", human(.size), human(.max))]
    TooLarge {
        /// Actual upload size in bytes.
        size: u64,
        /// Maximum allowed upload size in bytes.
        max: u64,
    },

    /// Upload does not start with a recognized archive signature.
    #[error("invalid archive format: no recognized signature in leading bytes {header}")]
    InvalidFormat {
        /// Hex rendering of the inspected leading bytes.
        header: String,
    },

    /// Archive contains more entries than allowed.
    #[error("archive contains too many entries ({count} > {max})")]
    TooManyFiles {
        /// Number of entries reported by the decoder.
        count: usize,
        /// Maximum allowed entry count.
        max: usize,
    },

    /// Extracted/compressed ratio exceeds the configured maximum.
    #[error(
        "potential decompression bomb: compressed={compressed} bytes, extracted={extracted} bytes (ratio: {ratio:.2})"
    )]
    CompressionBomb {
        /// Compressed payload size in bytes.
        compressed: u64,
        /// Sum of extracted entry sizes in bytes.
        extracted: u64,
        /// Computed compression ratio.
        ratio: f64,
    },

    /// Archive entry path would escape its destination.
    #[error("unsafe path in archive: {path}")]
    UnsafePath {
        /// The raw path as stored in the archive.
        path: String,
    },

    /// Decoder produced no entries.
    #[error("archive is empty")]
    EmptyArchive,

    /// Extracted content exceeds the absolute size ceiling.
    #[error("extracted content too large: {} exceeds maximum of {}", human(.size), human(.max))]
    ExtractedTooLarge {
        /// Sum of extracted entry sizes in bytes.
        size: u64,
        /// Maximum allowed extracted size in bytes.
        max: u64,
    },

    /// Decompression capability failed.
    #[error("extraction failed: {reason}")]
    ExtractionFailed {
        /// Opaque failure description from the decoder.
        reason: String,
    },

    /// No entry matched the marker file rule.
    #[error("marker file {marker} not found in archive")]
    MarkerNotFound {
        /// Marker file name that was searched for.
        marker: String,
    },

    /// I/O operation failed outside per-entry relocation.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

fn human(bytes: &u64) -> String {
    format_size(*bytes)
}

impl IngestError {
    /// Wraps an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error indicates hostile or malformed input.
    ///
    /// # Examples
    ///
    /// ```
    /// use ingot_core::IngestError;
    ///
    /// let err = IngestError::UnsafePath {
    ///     path: "../etc/passwd".into(),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = IngestError::EmptyArchive;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::TooLarge { .. }
                | Self::TooManyFiles { .. }
                | Self::CompressionBomb { .. }
                | Self::UnsafePath { .. }
                | Self::ExtractedTooLarge { .. }
        )
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "TOO_LARGE",
            Self::InvalidFormat { .. } => "INVALID_FORMAT",
            Self::TooManyFiles { .. } => "TOO_MANY_FILES",
            Self::CompressionBomb { .. } => "COMPRESSION_BOMB",
            Self::UnsafePath { .. } => "UNSAFE_PATH",
            Self::EmptyArchive => "EMPTY_ARCHIVE",
            Self::ExtractedTooLarge { .. } => "EXTRACTED_TOO_LARGE",
            Self::ExtractionFailed { .. } => "EXTRACTION_FAILED",
            Self::MarkerNotFound { .. } => "MARKER_NOT_FOUND",
            Self::Io { .. } => "IO_ERROR",
        }
    }

    /// Pipeline stage that raises this kind of error.
    ///
    /// `Io` errors may come from any stage and report `Error`.
    #[must_use]
    pub const fn stage(&self) -> ProgressStage {
        match self {
            Self::TooLarge { .. }
            | Self::InvalidFormat { .. }
            | Self::TooManyFiles { .. }
            | Self::CompressionBomb { .. }
            | Self::UnsafePath { .. } => ProgressStage::Validating,
            Self::EmptyArchive | Self::ExtractedTooLarge { .. } | Self::ExtractionFailed { .. } => {
                ProgressStage::Extracting
            }
            Self::MarkerNotFound { .. } => ProgressStage::Organizing,
            Self::Io { .. } => ProgressStage::Error,
        }
    }
}
