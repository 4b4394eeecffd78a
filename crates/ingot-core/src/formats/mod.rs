//! Decompression capability: format detection and archive decoders.

pub mod common;
pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ArchiveType;
pub use detect::detect_signature;
pub use tar::TarGzDecoder;
pub use traits::ArchiveDecoder;
pub use traits::DecodeError;
pub use zip::ZipDecoder;

use crate::ValidationLimits;

/// Returns the built-in decoder for `format`.
///
/// Decoders stop materializing content once the extracted-size ceiling is
/// passed, so an archive lying about its sizes cannot fill the disk before
/// the extractor's own ceiling check runs.
#[must_use]
pub fn decoder_for(format: ArchiveType, limits: &ValidationLimits) -> Box<dyn ArchiveDecoder> {
    match format {
        ArchiveType::Zip => {
            Box::new(ZipDecoder::new().with_byte_budget(limits.max_extracted_bytes))
        }
        ArchiveType::TarGz => {
            Box::new(TarGzDecoder::new().with_byte_budget(limits.max_extracted_bytes))
        }
    }
}
