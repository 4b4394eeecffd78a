//! Relocation of extracted entries into the export layout.
//!
//! Entries are routed by three rules, checked in order:
//!
//! 1. the marker file is moved to `export_root/<marker>`
//! 2. media (see [`classify`]) is copied to `media_root/<path>`
//! 3. everything else is moved to `export_root/<path>`
//!
//! A single top-level wrapper folder, if present, is stripped from every
//! destination path first.

use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::ExportLayout;
use crate::ExtractedEntry;
use crate::IngestConfig;
use crate::IngestError;
use crate::ProgressReporter;
use crate::ProgressStage;
use crate::RelocationReport;
use crate::Result;
use crate::classify;
use crate::copy::CopyBuffer;
use crate::copy::contains_nul_byte;
use crate::types::SafePath;

/// Percent reported when relocation starts.
pub const ORGANIZING_START_PERCENT: u32 = 60;

/// Percent reported when relocation ends.
pub const ORGANIZING_END_PERCENT: u32 = 90;

/// Where one entry is headed.
enum Route {
    Marker(PathBuf),
    Media(PathBuf),
    Export(PathBuf),
}

/// Moves extracted entries from a scratch tree into an [`ExportLayout`].
#[derive(Debug, Clone)]
pub struct FileRelocator<'a> {
    marker_file_name: &'a str,
}

impl<'a> FileRelocator<'a> {
    /// Creates a relocator using the configured marker file name.
    #[must_use]
    pub fn new(config: &'a IngestConfig) -> Self {
        Self {
            marker_file_name: &config.marker_file_name,
        }
    }

    /// Relocates `entries` found under `source_root`.
    ///
    /// Entries with unsafe paths and entries whose I/O fails are logged,
    /// counted in [`RelocationReport::entries_skipped`], and otherwise
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `MarkerNotFound` if no entry was accepted as the marker.
    pub fn relocate(
        &self,
        source_root: &Path,
        entries: &[ExtractedEntry],
        layout: &ExportLayout,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<RelocationReport> {
        let wrapper = detect_wrapper(entries);
        if let Some(wrapper) = &wrapper {
            log::debug!("stripping wrapper folder {wrapper}");
        }

        let mut report = RelocationReport {
            wrapper_folder: wrapper.clone(),
            ..RelocationReport::default()
        };
        let mut buffer = CopyBuffer::new();
        let mut last_percent = None;

        for (index, entry) in entries.iter().enumerate() {
            let percent = organizing_percent(index, entries.len());
            if last_percent != Some(percent) {
                progress.report(
                    ProgressStage::Organizing,
                    percent,
                    format!("Organizing files ({}/{})", index + 1, entries.len()),
                );
                last_percent = Some(percent);
            }

            if let Err(reason) = self.relocate_entry(
                source_root,
                entry,
                wrapper.as_deref(),
                layout,
                &mut buffer,
                &mut report,
            ) {
                log::warn!("skipping {}: {reason}", entry.relative_path);
                report.add_warning(format!("skipped {}: {reason}", entry.relative_path));
                report.entries_skipped += 1;
            }
        }

        if let Some(wrapper) = &wrapper {
            remove_wrapper(&source_root.join(wrapper));
        }

        if report.markers_seen == 0 {
            return Err(IngestError::MarkerNotFound {
                marker: self.marker_file_name.to_string(),
            });
        }

        log::info!(
            "relocated {} files and {} media files ({} skipped)",
            report.files_moved + report.markers_seen,
            report.media_copied,
            report.entries_skipped
        );
        Ok(report)
    }

    fn relocate_entry(
        &self,
        source_root: &Path,
        entry: &ExtractedEntry,
        wrapper: Option<&str>,
        layout: &ExportLayout,
        buffer: &mut CopyBuffer,
        report: &mut RelocationReport,
    ) -> std::result::Result<(), String> {
        let safe = SafePath::parse(&entry.relative_path)
            .ok_or_else(|| "unsafe archive path".to_string())?;

        let stripped = match wrapper {
            Some(wrapper) => safe.strip_prefix_segment(wrapper),
            None => Some(safe.clone()),
        };

        if entry.is_directory {
            return Ok(());
        }

        let stripped = stripped.ok_or_else(|| "path collapses onto the wrapper".to_string())?;
        let source = source_root.join(safe.as_path());

        match self.route(&stripped, layout) {
            Route::Marker(dest) => {
                match is_plain_text_file(&source, buffer) {
                    Ok(true) => {}
                    Ok(false) => return Err("marker candidate is not a plain text file".into()),
                    Err(e) => return Err(format!("cannot inspect marker candidate: {e}")),
                }
                move_file(&source, &dest).map_err(|e| e.to_string())?;

                if report.markers_seen > 0 {
                    log::warn!(
                        "marker {} replaced by {}",
                        report.marker_path.display(),
                        entry.relative_path
                    );
                    report.add_warning(format!(
                        "multiple {} files found; kept {}",
                        self.marker_file_name, entry.relative_path
                    ));
                }
                report.markers_seen += 1;
                report.marker_path = dest;
            }
            Route::Media(dest) => {
                copy_file(&source, &dest).map_err(|e| e.to_string())?;
                report.media_copied += 1;
            }
            Route::Export(dest) => {
                move_file(&source, &dest).map_err(|e| e.to_string())?;
                report.files_moved += 1;
            }
        }

        Ok(())
    }

    fn route(&self, stripped: &SafePath, layout: &ExportLayout) -> Route {
        if stripped.file_name() == self.marker_file_name {
            return Route::Marker(layout.export_root().join(self.marker_file_name));
        }
        if classify(stripped.as_str()).is_media {
            return Route::Media(layout.media_root().join(stripped.as_path()));
        }
        Route::Export(layout.export_root().join(stripped.as_path()))
    }
}

/// Returns the single top-level folder shared by every entry, if any.
///
/// Only safe paths take part. The shared segment must be a folder: some
/// entry has to lie beneath it.
///
/// # Examples
///
/// ```
/// use ingot_core::ExtractedEntry;
/// use ingot_core::relocate::detect_wrapper;
///
/// let entries = [
///     ExtractedEntry::directory("root/"),
///     ExtractedEntry::file("root/conversations.json", 2),
/// ];
/// assert_eq!(detect_wrapper(&entries).as_deref(), Some("root"));
///
/// let single = [ExtractedEntry::file("conversations.json", 2)];
/// assert_eq!(detect_wrapper(&single), None);
/// ```
#[must_use]
pub fn detect_wrapper(entries: &[ExtractedEntry]) -> Option<String> {
    let mut firsts = BTreeSet::new();
    let mut nested = false;

    for entry in entries {
        let Some(safe) = SafePath::parse(&entry.relative_path) else {
            continue;
        };
        firsts.insert(safe.first_segment().to_string());
        nested |= safe.depth() > 1;
    }

    if firsts.len() != 1 || !nested {
        return None;
    }
    firsts.into_iter().next()
}

fn organizing_percent(index: usize, total: usize) -> u32 {
    let span = u64::from(ORGANIZING_END_PERCENT - ORGANIZING_START_PERCENT);
    let done = u64::try_from(index).unwrap_or(u64::MAX);
    let total = u64::try_from(total.max(1)).unwrap_or(u64::MAX);
    let offset = u32::try_from(span.saturating_mul(done) / total).unwrap_or(0);
    ORGANIZING_START_PERCENT + offset
}

/// Returns `true` if `path` is a regular file (not a link) without NUL bytes.
fn is_plain_text_file(path: &Path, buffer: &mut CopyBuffer) -> io::Result<bool> {
    if !fs::symlink_metadata(path)?.is_file() {
        return Ok(false);
    }
    let mut file = File::open(path)?;
    Ok(!contains_nul_byte(&mut file, buffer)?)
}

fn ensure_parent(dest: &Path) -> io::Result<()> {
    match dest.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

/// Moves `src` to `dest`, replacing `dest`.
///
/// Falls back to copy and remove when `rename` fails, which happens when
/// the two paths live on different filesystems.
pub fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    ensure_parent(dest)?;
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(e),
        Err(e) => {
            log::debug!(
                "rename {} -> {} failed ({e}), copying instead",
                src.display(),
                dest.display()
            );
            fs::copy(src, dest)?;
            fs::remove_file(src)
        }
    }
}

fn copy_file(src: &Path, dest: &Path) -> io::Result<u64> {
    ensure_parent(dest)?;
    fs::copy(src, dest)
}

fn remove_wrapper(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => log::debug!("removed wrapper directory {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!(
            "failed to remove wrapper directory {}: {e}",
            path.display()
        ),
    }
}
