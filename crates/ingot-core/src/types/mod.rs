//! Core data types for archive ingestion.
//!
//! `SafePath` enforces path validation at the type level: it can only be
//! obtained by going through validation, so any destination built from one
//! stays beneath its base directory.

pub mod entry;
pub mod layout;
pub mod safe_path;

pub use entry::ExtractedEntry;
pub use layout::ExportLayout;
pub use safe_path::SafePath;
pub use safe_path::is_safe_path;
