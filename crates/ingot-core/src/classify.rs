//! Media classification of export paths.
//!
//! Classification is a pure function of the path string. Rules live in a
//! single ordered table and the first matching rule wins.

use serde::Serialize;

/// Kind of asset an export path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Audio recording.
    Audio,
    /// Video recording.
    Video,
    /// Conventional attachment (`file-…`).
    File,
    /// Anything else.
    Other,
}

impl MediaKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::File => "file",
            Self::Other => "other",
        }
    }
}

/// Classification result for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AssetClass {
    /// Whether the path is routed to the media root.
    pub is_media: bool,
    /// Kind of media, `Other` when `is_media` is false.
    pub media_kind: MediaKind,
}

impl AssetClass {
    const OTHER: Self = Self {
        is_media: false,
        media_kind: MediaKind::Other,
    };

    const fn media(kind: MediaKind) -> Self {
        Self {
            is_media: true,
            media_kind: kind,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Matcher {
    Prefix(&'static str),
    Extension(&'static [&'static str]),
}

impl Matcher {
    fn matches(self, path: &str, extension: Option<&str>) -> bool {
        match self {
            Self::Prefix(prefix) => path.starts_with(prefix),
            Self::Extension(known) => {
                extension.is_some_and(|ext| known.iter().any(|k| k.eq_ignore_ascii_case(ext)))
            }
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "heic", "heif", "tiff",
];
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "oga", "flac", "aac", "opus"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

const RULES: &[(Matcher, MediaKind)] = &[
    (Matcher::Prefix("file-"), MediaKind::File),
    (Matcher::Prefix("audio/"), MediaKind::Audio),
    (Matcher::Prefix("dalle-generations/"), MediaKind::Image),
    (Matcher::Extension(IMAGE_EXTENSIONS), MediaKind::Image),
    (Matcher::Extension(AUDIO_EXTENSIONS), MediaKind::Audio),
    (Matcher::Extension(VIDEO_EXTENSIONS), MediaKind::Video),
];

/// Extension of the last path segment, without the dot.
fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

/// Classifies an export path (normally already wrapper-stripped).
///
/// # Examples
///
/// ```
/// use ingot_core::MediaKind;
/// use ingot_core::classify;
///
/// assert_eq!(classify("audio/a.wav").media_kind, MediaKind::Audio);
/// assert_eq!(classify("file-abc123-notes.pdf").media_kind, MediaKind::File);
/// assert_eq!(classify("photos/cat.JPG").media_kind, MediaKind::Image);
/// assert!(!classify("conversations.json").is_media);
/// ```
#[must_use]
pub fn classify(path: &str) -> AssetClass {
    let ext = extension(path);
    RULES
        .iter()
        .find(|(matcher, _)| matcher.matches(path, ext))
        .map_or(AssetClass::OTHER, |&(_, kind)| AssetClass::media(kind))
}
