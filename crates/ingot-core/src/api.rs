//! High-level public API for ingesting conversation-export archives.

use crate::ExportLayout;
use crate::IngestConfig;
use crate::IngestReport;
use crate::ProgressReporter;
use crate::ProgressSink;
use crate::ProgressStage;
use crate::Result;
use crate::ScratchArea;
use crate::UploadPayload;
use crate::extraction::SecureExtractor;
use crate::formats::ArchiveDecoder;
use crate::formats::ArchiveType;
use crate::formats::decoder_for;
use crate::relocate::FileRelocator;
use crate::security::StructureReport;
use crate::security::StructureValidator;
use crate::security::validate_upload;
use crate::types::entry::total_size;

/// Outcome of validating an upload without ingesting it.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Detected archive format.
    pub format: ArchiveType,
    /// Structure found by trial extraction.
    pub structure: StructureReport,
}

/// Runs the ingestion pipeline with a fixed configuration.
///
/// Uses the built-in decoder for the detected format unless a custom one
/// is supplied with [`Ingestor::with_decoder`].
///
/// # Examples
///
/// ```
/// use ingot_core::CollectingProgress;
/// use ingot_core::ExportLayout;
/// use ingot_core::IngestConfig;
/// use ingot_core::Ingestor;
/// use ingot_core::UploadPayload;
/// use ingot_core::test_utils::ZipTestBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let layout = ExportLayout::new(temp.path().join("export"), temp.path().join("media"));
/// let payload = UploadPayload::from_bytes(
///     ZipTestBuilder::new()
///         .add_file("export/conversations.json", b"[]")
///         .build(),
/// );
///
/// let mut progress = CollectingProgress::new();
/// let report = Ingestor::new(IngestConfig::default()).ingest(&payload, &layout, &mut progress)?;
/// assert!(report.marker_path().is_file());
/// # Ok(())
/// # }
/// ```
pub struct Ingestor {
    config: IngestConfig,
    decoder: Option<Box<dyn ArchiveDecoder>>,
}

impl Ingestor {
    /// Creates an ingestor using the built-in decoders.
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            decoder: None,
        }
    }

    /// Uses `decoder` for every archive instead of the built-in ones.
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl ArchiveDecoder + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Validates the upload and its structure without relocating anything.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn check(&self, payload: &UploadPayload) -> Result<CheckReport> {
        let format = validate_upload(payload, self.config.limits.max_upload_bytes)?;
        let fallback;
        let decoder = match &self.decoder {
            Some(decoder) => &**decoder,
            None => {
                fallback = decoder_for(format, &self.config.limits);
                &*fallback
            }
        };
        let structure = StructureValidator::new(&self.config, decoder).validate(payload)?;
        Ok(CheckReport { format, structure })
    }

    /// Ingests `payload` into `layout`, reporting progress to `sink`.
    ///
    /// On failure an `Error` event carrying the error message is delivered
    /// before the error is returned. The scratch area is removed on every
    /// path. Files already relocated before a failure stay in place.
    ///
    /// # Errors
    ///
    /// Returns the first terminal error; see [`IngestError`](crate::IngestError).
    pub fn ingest(
        &self,
        payload: &UploadPayload,
        layout: &ExportLayout,
        sink: &mut dyn ProgressSink,
    ) -> Result<IngestReport> {
        let mut progress = ProgressReporter::new(sink);
        let result = self.run(payload, layout, &mut progress);
        if let Err(e) = &result {
            log::warn!("ingestion failed in {} stage: {e}", progress.stage());
            progress.fail(e.to_string());
        }
        result
    }

    fn run(
        &self,
        payload: &UploadPayload,
        layout: &ExportLayout,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<IngestReport> {
        let limits = &self.config.limits;
        progress.report(ProgressStage::Initializing, 0, "Preparing upload");

        progress.report(ProgressStage::Validating, 5, "Validating upload");
        let format = validate_upload(payload, limits.max_upload_bytes)?;
        let upload_bytes = payload.len()?;

        let fallback;
        let decoder = match &self.decoder {
            Some(decoder) => &**decoder,
            None => {
                fallback = decoder_for(format, limits);
                &*fallback
            }
        };

        if self.config.validate_structure {
            progress.report(ProgressStage::Validating, 15, "Checking archive structure");
            let structure = StructureValidator::new(&self.config, decoder).validate(payload)?;
            log::debug!(
                "structure ok: {} entries, {} bytes extracted",
                structure.entry_count,
                structure.extracted_bytes
            );
        }

        progress.report(
            ProgressStage::Extracting,
            30,
            format!("Extracting {} archive", format.name()),
        );
        let scratch = ScratchArea::create(&self.config)?;
        let entries = SecureExtractor::new(limits, decoder).extract(payload, &scratch)?;
        let bytes_extracted = total_size(&entries);
        progress.report(
            ProgressStage::Extracting,
            55,
            format!("Extracted {} entries", entries.len()),
        );

        layout.ensure_dirs()?;
        let relocation = FileRelocator::new(&self.config).relocate(
            &scratch.contents_dir(),
            &entries,
            layout,
            progress,
        )?;

        progress.report(ProgressStage::Finalizing, 95, "Cleaning up");
        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            log::warn!(
                "failed to remove scratch area {}: {e}",
                scratch_path.display()
            );
        }

        progress.report(ProgressStage::Completed, 100, "Import complete");
        log::info!(
            "ingested {} entries; marker at {}",
            entries.len(),
            relocation.marker_path.display()
        );

        Ok(IngestReport {
            relocation,
            entry_count: entries.len(),
            bytes_extracted,
            upload_bytes,
            duration: progress.elapsed(),
        })
    }
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("config", &self.config)
            .field(
                "decoder",
                &self.decoder.as_ref().map(|d| d.format_name().to_string()),
            )
            .finish()
    }
}

/// Ingests an uploaded archive with the built-in decoders.
///
/// # Errors
///
/// Returns an error if:
/// - the upload is too large or not a recognized archive
/// - the archive has too many entries, a suspicious compression ratio, or
///   an unsafe entry path
/// - extraction fails, yields nothing, or exceeds the size ceiling
/// - no marker file is found
/// - scratch or layout directories cannot be created
///
/// # Examples
///
/// ```no_run
/// use ingot_core::ExportLayout;
/// use ingot_core::IngestConfig;
/// use ingot_core::NoopProgress;
/// use ingot_core::UploadPayload;
/// use ingot_core::ingest_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = ingest_archive(
///     &UploadPayload::from_file("chatgpt-export.zip"),
///     &ExportLayout::new("/srv/exports/7", "/srv/media/7"),
///     &IngestConfig::default(),
///     &mut NoopProgress,
/// )?;
/// println!("{} files relocated", report.relocation.files_moved);
/// # Ok(())
/// # }
/// ```
pub fn ingest_archive(
    payload: &UploadPayload,
    layout: &ExportLayout,
    config: &IngestConfig,
    sink: &mut dyn ProgressSink,
) -> Result<IngestReport> {
    Ingestor::new(config.clone()).ingest(payload, layout, sink)
}
