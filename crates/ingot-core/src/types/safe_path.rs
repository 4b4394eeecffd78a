//! Validated relative path type for archive entries.

use std::fmt;
use std::path::Component;
use std::path::Path;

use crate::IngestError;
use crate::Result;

/// A normalized archive-relative path that cannot escape its base directory.
///
/// `SafePath` represents a path that has been validated to not contain:
/// - Parent directory traversal (`..`)
/// - Null bytes
/// - Absolute roots (`/etc`, `\\server`)
/// - Windows drive prefixes (`C:`)
///
/// Backslashes are treated as separators, `.` and empty segments are
/// dropped, and the stored form always uses `/`.
///
/// # Security Properties
///
/// - Can ONLY be constructed through validation
/// - NO `From<String>` implementation
/// - Joining onto any base directory stays beneath that directory
///
/// # Examples
///
/// ```
/// use ingot_core::SafePath;
///
/// let safe = SafePath::parse("./export//audio/a.wav").unwrap();
/// assert_eq!(safe.as_str(), "export/audio/a.wav");
///
/// assert!(SafePath::parse("../etc/passwd").is_none());
/// assert!(SafePath::parse("/etc/passwd").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(String);

impl SafePath {
    /// Normalizes and validates a raw archive path.
    ///
    /// Returns `None` when the path is unsafe or normalizes to nothing.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.contains('\0') {
            return None;
        }

        let unified = raw.replace('\\', "/");
        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return None;
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => return None,
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            return None;
        }

        let normalized = segments.join("/");

        // Platform check catches prefixes the string scan cannot see
        // (e.g. verbatim prefixes on Windows).
        if !Path::new(&normalized)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }

        Some(Self(normalized))
    }

    /// Validates a raw archive path, failing with `UnsafePath`.
    pub fn validate(raw: &str) -> Result<Self> {
        Self::parse(raw).ok_or_else(|| IngestError::UnsafePath {
            path: raw.to_string(),
        })
    }

    /// Removes a leading wrapper segment and re-validates the remainder.
    ///
    /// Returns `None` when the path IS the wrapper (nothing remains) or the
    /// remainder fails validation. Paths that do not start with `segment`
    /// are returned unchanged.
    #[must_use]
    pub fn strip_prefix_segment(&self, segment: &str) -> Option<Self> {
        match self.0.split_once('/') {
            Some((first, rest)) if first == segment => Self::parse(rest),
            None if self.0 == segment => None,
            _ => Some(self.clone()),
        }
    }

    /// First path segment.
    #[must_use]
    pub fn first_segment(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Last path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.split('/').count()
    }

    /// Returns the normalized `/`-separated form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for SafePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for SafePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Returns `true` if `raw` is a relative path that stays within its base.
///
/// Pure and deterministic; performs no I/O.
///
/// # Examples
///
/// ```
/// use ingot_core::is_safe_path;
///
/// assert!(is_safe_path("export/notes.txt"));
/// assert!(!is_safe_path("a/../../etc/passwd"));
/// assert!(!is_safe_path("C:\\Windows\\system32"));
/// ```
#[must_use]
pub fn is_safe_path(raw: &str) -> bool {
    SafePath::parse(raw).is_some()
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
