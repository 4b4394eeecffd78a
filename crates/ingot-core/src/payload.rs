//! Uploaded archive payloads.

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::IngestError;
use crate::Result;

/// Bytes of an uploaded archive, either in memory or already on disk.
///
/// Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPayload {
    /// In-memory buffer.
    Bytes(Vec<u8>),
    /// Existing file on disk.
    File(PathBuf),
}

impl UploadPayload {
    /// Creates a payload from an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates a payload referring to a file on disk.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Payload length in bytes.
    pub fn len(&self) -> Result<u64> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.len() as u64),
            Self::File(path) => fs::metadata(path)
                .map(|m| m.len())
                .map_err(|e| IngestError::io(path, e)),
        }
    }

    /// Returns `true` if the payload holds no bytes.
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Reads at most `max` leading bytes.
    pub fn header(&self, max: usize) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes[..bytes.len().min(max)].to_vec()),
            Self::File(path) => {
                let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
                let mut header = Vec::with_capacity(max);
                file.take(max as u64)
                    .read_to_end(&mut header)
                    .map_err(|e| IngestError::io(path, e))?;
                Ok(header)
            }
        }
    }

    /// Writes the payload to `dest`, returning the number of bytes written.
    pub fn persist_to(&self, dest: &Path) -> Result<u64> {
        match self {
            Self::Bytes(bytes) => {
                fs::write(dest, bytes).map_err(|e| IngestError::io(dest, e))?;
                Ok(bytes.len() as u64)
            }
            Self::File(path) => fs::copy(path, dest).map_err(|e| IngestError::io(path, e)),
        }
    }
}
