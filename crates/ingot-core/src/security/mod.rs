//! Security validation stages.

pub mod structure;
pub mod upload;
pub mod zipbomb;

// Re-export public types and functions
pub use structure::StructureReport;
pub use structure::StructureValidator;
pub use upload::validate_upload;
pub use zipbomb::compression_ratio;
pub use zipbomb::validate_compression_ratio;
