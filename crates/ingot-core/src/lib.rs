//! Secure ingestion of untrusted conversation-export archives.
//!
//! `ingot-core` takes an uploaded archive of unknown provenance and turns it
//! into a trusted directory layout. Along the way it rejects oversized
//! uploads, unrecognized formats, decompression bombs, and path-traversal
//! entries, and it always reclaims its scratch space.
//!
//! # Examples
//!
//! ```no_run
//! use ingot_core::ExportLayout;
//! use ingot_core::IngestConfig;
//! use ingot_core::NoopProgress;
//! use ingot_core::UploadPayload;
//! use ingot_core::ingest_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let payload = UploadPayload::from_file("export.zip");
//! let layout = ExportLayout::new("/srv/exports/42", "/srv/media/42");
//! let config = IngestConfig::default();
//!
//! let report = ingest_archive(&payload, &layout, &config, &mut NoopProgress)?;
//! println!("marker placed at {}", report.marker_path().display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod classify;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod payload;
pub mod progress;
pub mod relocate;
pub mod report;
pub mod scratch;
pub mod security;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::CheckReport;
pub use api::Ingestor;
pub use api::ingest_archive;
pub use classify::AssetClass;
pub use classify::MediaKind;
pub use classify::classify;
pub use config::IngestConfig;
pub use config::ValidationLimits;
pub use error::IngestError;
pub use error::Result;
pub use extraction::SecureExtractor;
pub use payload::UploadPayload;
pub use progress::CollectingProgress;
pub use progress::NoopProgress;
pub use progress::ProgressEvent;
pub use progress::ProgressReporter;
pub use progress::ProgressSink;
pub use progress::ProgressStage;
pub use relocate::FileRelocator;
pub use report::IngestReport;
pub use report::RelocationReport;
pub use scratch::ScratchArea;
pub use security::StructureReport;
pub use security::StructureValidator;

// Re-export types module for easier access
pub use types::ExportLayout;
pub use types::ExtractedEntry;
pub use types::SafePath;
pub use types::is_safe_path;
