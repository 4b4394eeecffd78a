//! Entries produced by an archive decoder.

use serde::Deserialize;
use serde::Serialize;

/// One entry reported by the decompression capability.
///
/// `relative_path` is copied verbatim from the archive (minus a trailing
/// `/` on directories) and is untrusted until it passes through
/// [`SafePath`](crate::SafePath).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntry {
    /// Archive-relative path as stored in the archive.
    pub relative_path: String,

    /// Size in bytes (0 for directories).
    pub size_bytes: u64,

    /// Whether the entry is a directory.
    pub is_directory: bool,
}

impl ExtractedEntry {
    /// Creates a regular file entry.
    pub fn file(relative_path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size_bytes,
            is_directory: false,
        }
    }

    /// Creates a directory entry.
    pub fn directory(relative_path: impl Into<String>) -> Self {
        let mut relative_path = relative_path.into();
        while relative_path.len() > 1 && relative_path.ends_with('/') {
            relative_path.pop();
        }
        Self {
            relative_path,
            size_bytes: 0,
            is_directory: true,
        }
    }
}

/// Sums entry sizes, saturating instead of overflowing.
///
/// Hostile archives can declare sizes close to `u64::MAX`.
#[must_use]
pub fn total_size(entries: &[ExtractedEntry]) -> u64 {
    entries
        .iter()
        .fold(0u64, |acc, entry| acc.saturating_add(entry.size_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_trims_trailing_slash() {
        let entry = ExtractedEntry::directory("export/audio/");
        assert_eq!(entry.relative_path, "export/audio");
        assert!(entry.is_directory);
        assert_eq!(entry.size_bytes, 0);
    }

    #[test]
    fn test_total_size_saturates() {
        let entries = vec![
            ExtractedEntry::file("a", u64::MAX),
            ExtractedEntry::file("b", 10),
        ];
        assert_eq!(total_size(&entries), u64::MAX);
    }

    #[test]
    fn test_total_size() {
        let entries = vec![
            ExtractedEntry::file("a", 3),
            ExtractedEntry::directory("d/"),
            ExtractedEntry::file("d/b", 4),
        ];
        assert_eq!(total_size(&entries), 7);
    }
}
