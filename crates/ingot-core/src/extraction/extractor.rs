//! Decoder-driven extraction with post-extraction size checks.

use std::path::Path;

use crate::ExtractedEntry;
use crate::IngestError;
use crate::Result;
use crate::ScratchArea;
use crate::UploadPayload;
use crate::ValidationLimits;
use crate::formats::ArchiveDecoder;
use crate::security::validate_upload;
use crate::types::entry::total_size;

/// Extracts an upload into a scratch area using a decoder.
///
/// The upload is validated again (size and signature) before anything is
/// written, so the extractor is safe to call without a preceding
/// validation pass.
///
/// # Examples
///
/// ```
/// use ingot_core::IngestConfig;
/// use ingot_core::ScratchArea;
/// use ingot_core::UploadPayload;
/// use ingot_core::extraction::SecureExtractor;
/// use ingot_core::formats::ZipDecoder;
/// use ingot_core::test_utils::ZipTestBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IngestConfig::default();
/// let payload = UploadPayload::from_bytes(
///     ZipTestBuilder::new()
///         .add_file("export/conversations.json", b"[]")
///         .build(),
/// );
///
/// let scratch = ScratchArea::create(&config)?;
/// let decoder = ZipDecoder::new();
/// let entries = SecureExtractor::new(&config.limits, &decoder).extract(&payload, &scratch)?;
/// assert_eq!(entries.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct SecureExtractor<'a> {
    limits: &'a ValidationLimits,
    decoder: &'a dyn ArchiveDecoder,
}

impl<'a> SecureExtractor<'a> {
    /// Creates an extractor bound to `limits` and `decoder`.
    #[must_use]
    pub fn new(limits: &'a ValidationLimits, decoder: &'a dyn ArchiveDecoder) -> Self {
        Self { limits, decoder }
    }

    /// Extracts into the scratch area's contents directory.
    ///
    /// # Errors
    ///
    /// See [`SecureExtractor::extract_to`].
    pub fn extract(
        &self,
        payload: &UploadPayload,
        scratch: &ScratchArea,
    ) -> Result<Vec<ExtractedEntry>> {
        self.extract_to(payload, scratch, &scratch.contents_dir())
    }

    /// Extracts into `target_dir`, staging the payload in `scratch`.
    ///
    /// # Errors
    ///
    /// - `TooLarge` or `InvalidFormat` if the upload fails validation
    /// - `ExtractionFailed` if the decoder fails
    /// - `EmptyArchive` if the decoder reports no entries
    /// - `ExtractedTooLarge` if the reported sizes exceed the ceiling
    pub fn extract_to(
        &self,
        payload: &UploadPayload,
        scratch: &ScratchArea,
        target_dir: &Path,
    ) -> Result<Vec<ExtractedEntry>> {
        validate_upload(payload, self.limits.max_upload_bytes)?;

        let staged = scratch.staging_path();
        payload.persist_to(&staged)?;

        let entries = self.decoder.decode(&staged, target_dir)?;
        if entries.is_empty() {
            return Err(IngestError::EmptyArchive);
        }

        let size = total_size(&entries);
        if size > self.limits.max_extracted_bytes {
            return Err(IngestError::ExtractedTooLarge {
                size,
                max: self.limits.max_extracted_bytes,
            });
        }

        log::debug!(
            "extracted {} entries ({size} bytes) into {}",
            entries.len(),
            target_dir.display()
        );
        Ok(entries)
    }
}
