//! Common traits for archive decoders.

use std::path::Path;

use thiserror::Error;

use crate::ExtractedEntry;
use crate::IngestError;

/// Failure reported by a decoder.
///
/// The pipeline treats every variant as an opaque `ExtractionFailed`.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// I/O error while reading the archive or writing entries.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container could not be parsed.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] ::zip::result::ZipError),

    /// Archive structure is malformed.
    #[error("malformed archive: {0}")]
    Malformed(String),
}

impl From<DecodeError> for IngestError {
    fn from(err: DecodeError) -> Self {
        Self::ExtractionFailed {
            reason: err.to_string(),
        }
    }
}

/// Decompression capability consumed by the pipeline.
///
/// Implementations extract `archive` into `target_dir` and return every
/// entry in archive order. Entries whose paths are unsafe must still be
/// reported (so validation can reject the archive) but must not be written.
pub trait ArchiveDecoder: Send + Sync {
    /// Decodes the archive at `archive` into `target_dir`.
    fn decode(&self, archive: &Path, target_dir: &Path)
    -> Result<Vec<ExtractedEntry>, DecodeError>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDecoder;

    impl ArchiveDecoder for FixedDecoder {
        fn decode(
            &self,
            _archive: &Path,
            _target_dir: &Path,
        ) -> Result<Vec<ExtractedEntry>, DecodeError> {
            Ok(vec![ExtractedEntry::file("a.txt", 1)])
        }

        fn format_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_trait_object() {
        let decoder: Box<dyn ArchiveDecoder> = Box::new(FixedDecoder);
        assert_eq!(decoder.format_name(), "fixed");
        let entries = decoder
            .decode(Path::new("in"), Path::new("out"))
            .unwrap_or_default();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_decode_error_becomes_extraction_failed() {
        let err: IngestError = DecodeError::Malformed("truncated header".into()).into();
        assert!(
            matches!(err, IngestError::ExtractionFailed { ref reason } if reason.contains("truncated header"))
        );
    }
}
