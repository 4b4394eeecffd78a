//! TAR (gzip-compressed) archive decoder.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;

use super::common::ByteBudget;
use super::common::is_root_entry;
use super::common::materialize_dir;
use super::common::materialize_file;
use super::traits::ArchiveDecoder;
use super::traits::DecodeError;
use crate::ExtractedEntry;
use crate::copy::CopyBuffer;
use crate::types::SafePath;

/// tar.gz decoder backed by the `tar` and `flate2` crates.
///
/// Only regular files and directories are materialized. Links, devices,
/// and FIFOs are skipped and logged.
#[derive(Debug, Clone, Default)]
pub struct TarGzDecoder {
    byte_budget: Option<u64>,
}

impl TarGzDecoder {
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

impl ArchiveDecoder for TarGzDecoder {
    fn decode(
        &self,
        archive: &Path,
        target_dir: &Path,
    ) -> Result<Vec<ExtractedEntry>, DecodeError> {
        let file = File::open(archive)?;
        let mut tar = ::tar::Archive::new(GzDecoder::new(BufReader::new(file)));
        fs::create_dir_all(target_dir)?;

        let mut entries = Vec::new();
        let mut buffer = CopyBuffer::new();
        let mut budget = ByteBudget::new(self.byte_budget);

        for entry in tar.entries()? {
            let mut entry = entry?;
            let raw = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let kind = entry.header().entry_type();

            if kind.is_dir() {
                if is_root_entry(&raw) {
                    continue;
                }
                if let Some(safe) = SafePath::parse(&raw) {
                    materialize_dir(target_dir, &safe)?;
                }
                entries.push(ExtractedEntry::directory(raw));
                continue;
            }

            if !kind.is_file() {
                log::warn!("skipping non-regular entry {raw} ({kind:?})");
                continue;
            }

            let declared = entry.size();
            let Some(safe) = SafePath::parse(&raw) else {
                log::warn!("not materializing unsafe entry {raw}");
                entries.push(ExtractedEntry::file(raw, declared));
                continue;
            };

            if budget.is_exhausted() {
                entries.push(ExtractedEntry::file(raw, declared));
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
        "tar.gz"
    }
}
