//! Upload size and signature validation.

use crate::IngestError;
use crate::Result;
use crate::UploadPayload;
use crate::formats::ArchiveType;
use crate::formats::detect::MAX_SIGNATURE_LEN;
use crate::formats::detect_signature;

/// Validates an upload before anything is extracted.
///
/// The size check runs first and never touches the payload contents. The
/// signature check reads only the leading header bytes.
///
/// # Errors
///
/// - `TooLarge` if the payload exceeds `max_bytes`
/// - `InvalidFormat` if no recognized signature prefixes the payload
///
/// # Examples
///
/// ```
/// use ingot_core::IngestError;
/// use ingot_core::UploadPayload;
/// use ingot_core::security::validate_upload;
///
/// let zeros = UploadPayload::from_bytes(vec![0u8; 10]);
/// assert!(matches!(
///     validate_upload(&zeros, 1024),
///     Err(IngestError::InvalidFormat { .. })
/// ));
/// ```
pub fn validate_upload(payload: &UploadPayload, max_bytes: u64) -> Result<ArchiveType> {
    let size = payload.len()?;
    if size > max_bytes {
        return Err(IngestError::TooLarge {
            size,
            max: max_bytes,
        });
    }

    let header = payload.header(MAX_SIGNATURE_LEN)?;
    detect_signature(&header).ok_or_else(|| IngestError::InvalidFormat {
        header: hex_preview(&header),
    })
}

fn hex_preview(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "(empty)".to_string();
    }
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
