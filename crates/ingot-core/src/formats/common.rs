//! Shared helpers for the ZIP and TAR decoders.
//!
//! # Functions
//!
//! - [`materialize_file`]: writes one entry beneath the target directory
//! - [`materialize_dir`]: creates one directory entry (idempotent)
//! - [`is_root_entry`]: recognizes `.`/`./` self-references

use std::fs::File;
use std::fs::create_dir_all;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::path::Path;

use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::types::SafePath;

/// Running allowance of bytes a decoder may still write.
///
/// Once exhausted, decoders stop writing content and report remaining
/// entries with their declared sizes, so the reported total still exceeds
/// the ceiling.
#[derive(Debug, Clone, Copy)]
pub struct ByteBudget {
    remaining: Option<u64>,
    exhausted: bool,
}

impl ByteBudget {
    /// Creates a budget; `None` means unlimited.
    #[must_use]
    pub fn new(limit: Option<u64>) -> Self {
        Self {
            remaining: limit,
            exhausted: false,
        }
    }

    /// Maximum bytes the next entry may produce.
    ///
    /// One byte over the remaining allowance so overruns are observable.
    #[must_use]
    pub fn next_limit(&self) -> u64 {
        self.remaining.map_or(u64::MAX, |r| r.saturating_add(1))
    }

    /// Records `bytes` written.
    pub fn consume(&mut self, bytes: u64) {
        if let Some(remaining) = self.remaining {
            if bytes > remaining {
                self.exhausted = true;
            }
            self.remaining = Some(remaining.saturating_sub(bytes));
        }
    }

    /// Returns `true` once an entry overran the allowance.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Writes `reader` to `target_dir/path`, bounded by `budget`.
///
/// Returns the number of bytes written.
pub fn materialize_file<R: Read>(
    reader: &mut R,
    target_dir: &Path,
    path: &SafePath,
    buffer: &mut CopyBuffer,
    budget: &mut ByteBudget,
) -> io::Result<u64> {
    let output_path = target_dir.join(path.as_path());

    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }

    let output_file = File::create(&output_path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, output_file);
    let mut limited = reader.by_ref().take(budget.next_limit());
    let written = copy_with_buffer(&mut limited, &mut writer, buffer)?;

    budget.consume(written);
    Ok(written)
}

/// Creates `target_dir/path` as a directory.
pub fn materialize_dir(target_dir: &Path, path: &SafePath) -> io::Result<()> {
    create_dir_all(target_dir.join(path.as_path()))
}

/// Returns `true` for entries naming the archive root itself (`.`, `./`).
///
/// Such entries carry no content and are dropped instead of being
/// reported as unsafe.
#[must_use]
pub fn is_root_entry(raw: &str) -> bool {
    raw.split(['/', '\\'])
        .all(|segment| segment.is_empty() || segment == ".")
}
