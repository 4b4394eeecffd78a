//! Command implementations.

pub mod check;
pub mod ingest;

use crate::cli::LimitArgs;
use anyhow::Context;
use anyhow::Result;
use ingot_core::IngestConfig;
use ingot_core::UploadPayload;
use std::path::Path;

/// Builds the core configuration: defaults, then `--config`, then flags.
pub fn build_config(args: &LimitArgs) -> Result<IngestConfig> {
    let mut config = match &args.config {
        Some(path) => IngestConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration from '{}'", path.display()))?,
        None => IngestConfig::default(),
    };

    if let Some(max) = args.max_upload_size {
        config.limits.max_upload_bytes = max;
    }
    if let Some(max) = args.max_extracted_size {
        config.limits.max_extracted_bytes = max;
    }
    if let Some(ratio) = args.max_ratio {
        config.limits.max_compression_ratio = ratio;
    }
    if let Some(max) = args.max_entries {
        config.limits.max_entry_count = max;
    }
    if let Some(marker) = &args.marker {
        config.marker_file_name.clone_from(marker);
    }
    if let Some(dir) = &args.scratch_dir {
        config.scratch_root = Some(dir.clone());
    }

    log::debug!("effective configuration: {config:?}");
    Ok(config)
}

/// Opens the archive as a file-backed payload.
pub fn open_payload(archive: &Path) -> Result<UploadPayload> {
    if !archive.is_file() {
        anyhow::bail!(
            "Archive '{}' not found or not a regular file",
            archive.display()
        );
    }
    Ok(UploadPayload::from_file(archive))
}
