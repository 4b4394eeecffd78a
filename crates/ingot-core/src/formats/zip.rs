//! ZIP archive decoder.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::common::ByteBudget;
use super::common::is_root_entry;
use super::common::materialize_dir;
use super::common::materialize_file;
use super::traits::ArchiveDecoder;
use super::traits::DecodeError;
use crate::ExtractedEntry;
use crate::copy::CopyBuffer;
use crate::types::SafePath;

/// ZIP decoder backed by the `zip` crate.
///
/// Symlink entries are never materialized. Entries with unsafe names are
/// reported with their declared size but not written.
#[derive(Debug, Clone, Default)]
pub struct ZipDecoder {
    byte_budget: Option<u64>,
}

impl ZipDecoder {
    /// Creates a decoder without a byte budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops writing content once `bytes` have been produced.
    #[must_use]
    pub fn with_byte_budget(mut self, bytes: u64) -> Self {
        self.byte_budget = Some(bytes);
        self
    }
}

impl ArchiveDecoder for ZipDecoder {
    fn decode(
        &self,
        archive: &Path,
        target_dir: &Path,
    ) -> Result<Vec<ExtractedEntry>, DecodeError> {
        let file = File::open(archive)?;
        let mut zip = ::zip::ZipArchive::new(BufReader::new(file))?;
        fs::create_dir_all(target_dir)?;

        let mut entries = Vec::with_capacity(zip.len());
        let mut buffer = CopyBuffer::new();
        let mut budget = ByteBudget::new(self.byte_budget);

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            let raw = entry.name().to_string();

            if entry.is_dir() {
                if is_root_entry(&raw) {
                    continue;
                }
                if let Some(safe) = SafePath::parse(&raw) {
                    materialize_dir(target_dir, &safe)?;
                }
                entries.push(ExtractedEntry::directory(raw));
                continue;
            }

            if entry.is_symlink() {
                log::warn!("skipping symlink entry {raw}");
                continue;
            }

            let Some(safe) = SafePath::parse(&raw) else {
                log::warn!("not materializing unsafe entry {raw}");
                entries.push(ExtractedEntry::file(raw, entry.size()));
                continue;
            };

            if budget.is_exhausted() {
                entries.push(ExtractedEntry::file(raw, entry.size()));
                continue;
            }

            let written = materialize_file(&mut entry, target_dir, &safe, &mut buffer, &mut budget)?;
            if budget.is_exhausted() {
                log::warn!("byte budget exhausted at {raw}; remaining entries are not written");
            }
            entries.push(ExtractedEntry::file(raw, written));
        }

        Ok(entries)
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;
    use tempfile::TempDir;

    fn write_archive(temp: &TempDir, data: &[u8]) -> std::path::PathBuf {
        let path = temp.path().join("upload.zip");
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_decode_files_and_dirs_in_order() {
        let temp = TempDir::new().unwrap();
        let data = ZipTestBuilder::new()
            .add_directory("export/")
            .add_file("export/conversations.json", b"[]")
            .add_file("export/audio/x.wav", b"RIFF")
            .build();
        let archive = write_archive(&temp, &data);
        let out = temp.path().join("out");

        let entries = ZipDecoder::new().decode(&archive, &out).unwrap();

        assert_eq!(
            entries,
            vec![
                ExtractedEntry::directory("export"),
                ExtractedEntry::file("export/conversations.json", 2),
                ExtractedEntry::file("export/audio/x.wav", 4),
            ]
        );
        assert_eq!(
            fs::read_to_string(out.join("export/conversations.json")).unwrap(),
            "[]"
        );
        assert!(out.join("export/audio/x.wav").is_file());
    }

    #[test]
    fn test_unsafe_entry_reported_but_not_written() {
        let temp = TempDir::new().unwrap();
        let data = ZipTestBuilder::new()
            .add_file("../escape.txt", b"evil")
            .add_file("ok.txt", b"fine")
            .build();
        let archive = write_archive(&temp, &data);
        let out = temp.path().join("out");

        let entries = ZipDecoder::new().decode(&archive, &out).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].relative_path, "../escape.txt");
        assert!(!temp.path().join("escape.txt").exists());
        assert!(out.join("ok.txt").is_file());
    }

    #[test]
    fn test_byte_budget_stops_writing() {
        let temp = TempDir::new().unwrap();
        let data = ZipTestBuilder::new()
            .add_file("a.bin", &[1u8; 64])
            .add_file("b.bin", &[2u8; 64])
            .build();
        let archive = write_archive(&temp, &data);
        let out = temp.path().join("out");

        let entries = ZipDecoder::new()
            .with_byte_budget(32)
            .decode(&archive, &out)
            .unwrap();

        assert_eq!(entries[0].size_bytes, 33);
        assert_eq!(entries[1].size_bytes, 64);
        assert!(!out.join("b.bin").exists());
        assert!(crate::types::entry::total_size(&entries) > 32);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let archive = write_archive(&temp, b"PK\x03\x04 definitely not a zip");
        let result = ZipDecoder::new().decode(&archive, &temp.path().join("out"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_zip_has_no_entries() {
        let temp = TempDir::new().unwrap();
        let archive = write_archive(&temp, &ZipTestBuilder::new().build());
        let entries = ZipDecoder::new()
            .decode(&archive, &temp.path().join("out"))
            .unwrap();
        assert!(entries.is_empty());
    }
}
