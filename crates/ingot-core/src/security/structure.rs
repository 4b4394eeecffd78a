//! Archive structure validation by trial extraction.

use crate::ExtractedEntry;
use crate::IngestConfig;
use crate::IngestError;
use crate::Result;
use crate::ScratchArea;
use crate::UploadPayload;
use crate::ValidationLimits;
use crate::formats::ArchiveDecoder;
use crate::types::SafePath;
use crate::types::entry::total_size;

use super::zipbomb::compression_ratio;
use super::zipbomb::validate_compression_ratio;

/// Shape of an archive that passed structure validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureReport {
    /// Number of entries reported by the decoder.
    pub entry_count: usize,
    /// Sum of reported entry sizes in bytes.
    pub extracted_bytes: u64,
    /// Compressed payload size in bytes.
    pub compressed_bytes: u64,
    /// Extracted/compressed ratio (`None` for an empty payload).
    pub ratio: Option<f64>,
}

/// Validates archive structure by decoding into a throwaway scratch area.
///
/// The trial extraction materializes content on disk even though only the
/// entry metadata is inspected. The scratch area is removed before
/// [`StructureValidator::validate`] returns, whatever the outcome.
pub struct StructureValidator<'a> {
    config: &'a IngestConfig,
    decoder: &'a dyn ArchiveDecoder,
}

impl<'a> StructureValidator<'a> {
    /// Creates a validator using `decoder` for the trial extraction.
    #[must_use]
    pub fn new(config: &'a IngestConfig, decoder: &'a dyn ArchiveDecoder) -> Self {
        Self { config, decoder }
    }

    /// Runs the trial extraction and checks the resulting entry list.
    ///
    /// # Errors
    ///
    /// - `TooManyFiles` if the entry count exceeds the limit
    /// - `CompressionBomb` if the compression ratio exceeds the limit
    /// - `UnsafePath` for the first entry whose path would escape
    /// - `ExtractionFailed` if the decoder fails
    pub fn validate(&self, payload: &UploadPayload) -> Result<StructureReport> {
        let scratch = ScratchArea::create(self.config)?;
        let staged = scratch.staging_path();
        let compressed = payload.persist_to(&staged)?;

        let entries = self.decoder.decode(&staged, &scratch.contents_dir())?;
        log::debug!(
            "trial extraction via {} produced {} entries",
            self.decoder.format_name(),
            entries.len()
        );

        check_entries(&entries, compressed, &self.config.limits)
    }
}

/// Checks an entry list against the limits: count, then ratio, then paths.
///
/// # Errors
///
/// Same as [`StructureValidator::validate`], minus decoder failures.
pub fn check_entries(
    entries: &[ExtractedEntry],
    compressed_bytes: u64,
    limits: &ValidationLimits,
) -> Result<StructureReport> {
    if entries.len() > limits.max_entry_count {
        return Err(IngestError::TooManyFiles {
            count: entries.len(),
            max: limits.max_entry_count,
        });
    }

    let extracted_bytes = total_size(entries);
    validate_compression_ratio(
        compressed_bytes,
        extracted_bytes,
        limits.max_compression_ratio,
    )?;

    for entry in entries {
        SafePath::validate(&entry.relative_path)?;
    }

    Ok(StructureReport {
        entry_count: entries.len(),
        extracted_bytes,
        compressed_bytes,
        ratio: compression_ratio(compressed_bytes, extracted_bytes),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedDecoder;
    use crate::test_utils::ZipTestBuilder;
    use crate::formats::ZipDecoder;
    use tempfile::TempDir;

    fn limits(max_entries: usize, max_ratio: f64) -> ValidationLimits {
        ValidationLimits {
            max_entry_count: max_entries,
            max_compression_ratio: max_ratio,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_entries_ok() {
        let entries = vec![
            ExtractedEntry::directory("export/"),
            ExtractedEntry::file("export/conversations.json", 2),
        ];
        let report = check_entries(&entries, 100, &limits(10, 100.0)).unwrap();
        assert_eq!(report.entry_count, 2);
        assert_eq!(report.extracted_bytes, 2);
        assert_eq!(report.ratio, Some(0.02));
    }

    #[test]
    fn test_check_entries_too_many() {
        let entries: Vec<_> = (0..5)
            .map(|i| ExtractedEntry::file(format!("f{i}"), 1))
            .collect();
        let err = check_entries(&entries, 100, &limits(4, 100.0)).unwrap_err();
        assert!(matches!(err, IngestError::TooManyFiles { count: 5, max: 4 }));
    }

    #[test]
    fn test_check_entries_count_before_ratio() {
        let entries: Vec<_> = (0..5)
            .map(|i| ExtractedEntry::file(format!("f{i}"), 1_000_000))
            .collect();
        let err = check_entries(&entries, 1, &limits(4, 100.0)).unwrap_err();
        assert!(matches!(err, IngestError::TooManyFiles { .. }));
    }

    #[test]
    fn test_check_entries_bomb() {
        let entries = vec![ExtractedEntry::file("bomb.bin", 1_000_000)];
        let err = check_entries(&entries, 1000, &limits(10, 100.0)).unwrap_err();
        assert!(matches!(err, IngestError::CompressionBomb { .. }));
    }

    #[test]
    fn test_check_entries_first_unsafe_path_reported() {
        let entries = vec![
            ExtractedEntry::file("ok.txt", 1),
            ExtractedEntry::file("../first", 1),
            ExtractedEntry::file("/second", 1),
        ];
        let err = check_entries(&entries, 100, &limits(10, 100.0)).unwrap_err();
        assert!(matches!(err, IngestError::UnsafePath { ref path } if path == "../first"));
    }

    #[test]
    fn test_validate_leaves_no_scratch_residue() {
        let root = TempDir::new().unwrap();
        let config = IngestConfig::default()
            .with_scratch_root(root.path())
            .with_limits(limits(1, 100.0));
        let decoder = ScriptedDecoder::new().file("a", b"a").file("b", b"b");
        let validator = StructureValidator::new(&config, &decoder);

        let result = validator.validate(&UploadPayload::from_bytes(b"PK\x03\x04".to_vec()));

        assert!(matches!(result, Err(IngestError::TooManyFiles { .. })));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_validate_decoder_failure_cleans_up() {
        let root = TempDir::new().unwrap();
        let config = IngestConfig::default().with_scratch_root(root.path());
        let decoder = ScriptedDecoder::new().failing("corrupt central directory");
        let validator = StructureValidator::new(&config, &decoder);

        let result = validator.validate(&UploadPayload::from_bytes(b"PK\x03\x04".to_vec()));

        assert!(matches!(result, Err(IngestError::ExtractionFailed { .. })));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_validate_real_zip_bomb() {
        let root = TempDir::new().unwrap();
        let config = IngestConfig::default().with_scratch_root(root.path());
        let data = ZipTestBuilder::new()
            .add_deflated_file("zeros.bin", &vec![0u8; 4 * 1024 * 1024])
            .build();
        let decoder = ZipDecoder::new();
        let validator = StructureValidator::new(&config, &decoder);

        let result = validator.validate(&UploadPayload::from_bytes(data));

        assert!(matches!(result, Err(IngestError::CompressionBomb { .. })));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_validate_success_cleans_up() {
        let root = TempDir::new().unwrap();
        let config = IngestConfig::default().with_scratch_root(root.path());
        let data = ZipTestBuilder::new()
            .add_file("export/conversations.json", b"[]")
            .build();
        let decoder = ZipDecoder::new();
        let validator = StructureValidator::new(&config, &decoder);

        let report = validator.validate(&UploadPayload::from_bytes(data)).unwrap();

        assert_eq!(report.entry_count, 1);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
