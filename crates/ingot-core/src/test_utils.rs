//! Test utilities for building archives and scripting decoder output.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::ExtractedEntry;
use crate::formats::ArchiveDecoder;
use crate::formats::DecodeError;
use crate::types::SafePath;

/// Builder for ZIP test archives.
///
/// # Examples
///
/// ```
/// use ingot_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_directory("export/")
///     .add_file("export/conversations.json", b"[]")
///     .build();
/// assert!(zip_data.starts_with(b"PK\x03\x04"));
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored (uncompressed) file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a deflate-compressed file.
    #[must_use]
    pub fn add_deflated_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        use zip::write::SimpleFileOptions;

        self.zip
            .add_symlink(path, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for gzip-compressed TAR test archives.
///
/// # Examples
///
/// ```
/// use ingot_core::test_utils::TarGzTestBuilder;
///
/// let data = TarGzTestBuilder::new()
///     .add_file("root/conversations.json", b"[]")
///     .build();
/// assert!(data.starts_with(b"\x1f\x8b"));
/// ```
pub struct TarGzTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarGzTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a regular file whose name is written verbatim.
    ///
    /// Bypasses the `tar` crate's own path checks so hostile names such as
    /// `../escape` can be produced. Names must fit in 100 bytes.
    #[must_use]
    pub fn add_raw_file(mut self, name: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_old();
        let slot = &mut header.as_old_mut().name;
        slot[..name.len()].copy_from_slice(name.as_bytes());
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Builds and gzips the archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let tar_data = self.builder.into_inner().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_data).unwrap();
        encoder.finish().unwrap()
    }
}

impl Default for TarGzTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct ScriptedEntry {
    path: String,
    contents: Option<Vec<u8>>,
    reported_size: Option<u64>,
}

/// Decoder that replays a fixed entry list instead of parsing an archive.
///
/// Safe file entries are written beneath the target directory; every entry
/// is reported in insertion order.
///
/// # Examples
///
/// ```
/// use ingot_core::formats::ArchiveDecoder;
/// use ingot_core::test_utils::ScriptedDecoder;
///
/// let decoder = ScriptedDecoder::new()
///     .file("export/conversations.json", b"[]")
///     .directory("export/audio");
/// assert_eq!(decoder.format_name(), "scripted");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecoder {
    entries: Vec<ScriptedEntry>,
    failure: Option<String>,
}

impl ScriptedDecoder {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file entry.
    #[must_use]
    pub fn file(mut self, path: &str, data: &[u8]) -> Self {
        self.entries.push(ScriptedEntry {
            path: path.to_string(),
            contents: Some(data.to_vec()),
            reported_size: None,
        });
        self
    }

    /// Adds a file entry that reports `size` regardless of its contents.
    #[must_use]
    pub fn file_with_reported_size(mut self, path: &str, data: &[u8], size: u64) -> Self {
        self.entries.push(ScriptedEntry {
            path: path.to_string(),
            contents: Some(data.to_vec()),
            reported_size: Some(size),
        });
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn directory(mut self, path: &str) -> Self {
        self.entries.push(ScriptedEntry {
            path: path.to_string(),
            contents: None,
            reported_size: None,
        });
        self
    }

    /// Makes every decode fail with `reason`.
    #[must_use]
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }
}

impl ArchiveDecoder for ScriptedDecoder {
    fn decode(
        &self,
        _archive: &Path,
        target_dir: &Path,
    ) -> Result<Vec<ExtractedEntry>, DecodeError> {
        if let Some(reason) = &self.failure {
            return Err(DecodeError::Malformed(reason.clone()));
        }

        fs::create_dir_all(target_dir)?;
        let mut entries = Vec::with_capacity(self.entries.len());

        for scripted in &self.entries {
            let safe = SafePath::parse(&scripted.path);
            match &scripted.contents {
                None => {
                    if let Some(safe) = safe {
                        fs::create_dir_all(target_dir.join(safe.as_path()))?;
                    }
                    entries.push(ExtractedEntry::directory(scripted.path.clone()));
                }
                Some(data) => {
                    if let Some(safe) = safe {
                        let dest = target_dir.join(safe.as_path());
                        if let Some(parent) = dest.parent() {
                            fs::create_dir_all(parent)?;
                        }
                        fs::write(dest, data)?;
                    }
                    let size = scripted.reported_size.unwrap_or(data.len() as u64);
                    entries.push(ExtractedEntry::file(scripted.path.clone(), size));
                }
            }
        }

        Ok(entries)
    }

    fn format_name(&self) -> &str {
        "scripted"
    }
}
