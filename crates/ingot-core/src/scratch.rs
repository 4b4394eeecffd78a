//! Exclusively owned scratch directories.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::IngestConfig;
use crate::IngestError;
use crate::Result;

/// Fixed name of the staged upload inside a scratch area.
pub const STAGING_FILE_NAME: &str = "upload.archive";

/// Subdirectory receiving decoder output.
pub const CONTENTS_DIR_NAME: &str = "contents";

/// Number of random characters in scratch directory names.
const RANDOM_NAME_LEN: usize = 16;

/// A uniquely named temporary directory owned by one pipeline invocation.
///
/// The directory is created by [`ScratchArea::create`] and removed
/// recursively on drop. Removal is best-effort: a failure (e.g. a file held
/// open by another process) is logged and otherwise ignored. Call
/// [`ScratchArea::close`] to observe the removal result instead.
///
/// # Examples
///
/// ```
/// use ingot_core::IngestConfig;
/// use ingot_core::ScratchArea;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scratch = ScratchArea::create(&IngestConfig::default())?;
/// let path = scratch.path().to_path_buf();
/// assert!(path.is_dir());
///
/// drop(scratch);
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ScratchArea {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchArea {
    /// Creates a scratch area as configured (prefix and optional root).
    pub fn create(config: &IngestConfig) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder
            .prefix(&config.scratch_prefix)
            .rand_bytes(RANDOM_NAME_LEN);

        let dir = match &config.scratch_root {
            Some(root) => builder
                .tempdir_in(root)
                .map_err(|e| IngestError::io(root, e))?,
            None => builder
                .tempdir()
                .map_err(|e| IngestError::io(std::env::temp_dir(), e))?,
        };

        let path = dir.path().to_path_buf();
        log::debug!("created scratch area {}", path.display());

        Ok(Self {
            path,
            dir: Some(dir),
        })
    }

    /// Root of the scratch area.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location where the upload is staged before decoding.
    #[must_use]
    pub fn staging_path(&self) -> PathBuf {
        self.path.join(STAGING_FILE_NAME)
    }

    /// Directory receiving the decoder output.
    #[must_use]
    pub fn contents_dir(&self) -> PathBuf {
        self.path.join(CONTENTS_DIR_NAME)
    }

    /// Removes the scratch area now, reporting failure.
    pub fn close(mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => log::debug!("removed scratch area {}", self.path.display()),
                Err(e) => log::warn!(
                    "failed to remove scratch area {}: {e}",
                    self.path.display()
                ),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    fn config_in(root: &Path) -> IngestConfig {
        IngestConfig::default().with_scratch_root(root)
    }

    #[test]
    fn test_create_uses_prefix_and_root() {
        let root = tempfile::TempDir::new().unwrap();
        let scratch = ScratchArea::create(&config_in(root.path())).unwrap();

        assert!(scratch.path().starts_with(root.path()));
        let name = scratch.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("ingot-upload-"));
        assert_eq!(name.len(), "ingot-upload-".len() + RANDOM_NAME_LEN);
    }

    #[test]
    fn test_names_are_unique() {
        let root = tempfile::TempDir::new().unwrap();
        let a = ScratchArea::create(&config_in(root.path())).unwrap();
        let b = ScratchArea::create(&config_in(root.path())).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_drop_removes_contents_recursively() {
        let root = tempfile::TempDir::new().unwrap();
        let scratch = ScratchArea::create(&config_in(root.path())).unwrap();
        let path = scratch.path().to_path_buf();

        fs::create_dir_all(scratch.contents_dir().join("a/b")).unwrap();
        fs::write(scratch.contents_dir().join("a/b/c.txt"), "x").unwrap();
        fs::write(scratch.staging_path(), "archive").unwrap();

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_reports_success() {
        let root = tempfile::TempDir::new().unwrap();
        let scratch = ScratchArea::create(&config_in(root.path())).unwrap();
        let path = scratch.path().to_path_buf();

        scratch.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_root_fails() {
        let config = config_in(Path::new("/nonexistent/scratch/root"));
        assert!(matches!(
            ScratchArea::create(&config),
            Err(IngestError::Io { .. })
        ));
    }

    #[test]
    fn test_layout_paths() {
        let root = tempfile::TempDir::new().unwrap();
        let scratch = ScratchArea::create(&config_in(root.path())).unwrap();
        assert_eq!(scratch.staging_path(), scratch.path().join(STAGING_FILE_NAME));
        assert_eq!(scratch.contents_dir(), scratch.path().join(CONTENTS_DIR_NAME));
    }
}
