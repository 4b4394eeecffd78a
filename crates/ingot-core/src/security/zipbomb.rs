//! Decompression bomb detection.

use crate::IngestError;
use crate::Result;

/// Computes extracted/compressed, or `None` when nothing was compressed.
#[must_use]
pub fn compression_ratio(compressed_size: u64, extracted_size: u64) -> Option<f64> {
    if compressed_size == 0 {
        return None;
    }
    Some(extracted_size as f64 / compressed_size as f64)
}

/// Validates the archive-wide compression ratio.
///
/// A zero-length payload has no meaningful ratio and passes; it cannot
/// carry a decodable archive anyway.
///
/// # Errors
///
/// Returns `CompressionBomb` if the ratio exceeds `max_ratio`.
pub fn validate_compression_ratio(
    compressed_size: u64,
    extracted_size: u64,
    max_ratio: f64,
) -> Result<()> {
    let Some(ratio) = compression_ratio(compressed_size, extracted_size) else {
        return Ok(());
    };

    if ratio > max_ratio {
        return Err(IngestError::CompressionBomb {
            compressed: compressed_size,
            extracted: extracted_size,
            ratio,
        });
    }

    Ok(())
}
