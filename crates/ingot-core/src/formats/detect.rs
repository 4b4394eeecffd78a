//! Archive format detection from magic numbers.

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// ZIP archive.
    Zip,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ArchiveType {
    /// Short format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

/// A recognized leading byte sequence.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    /// Exact byte prefix.
    pub magic: &'static [u8],
    /// Format the prefix identifies.
    pub format: ArchiveType,
}

/// Recognized archive signatures.
///
/// - `50 4B 03 04`: ZIP local file header
/// - `50 4B 05 06`: ZIP end of central directory (empty archive)
/// - `50 4B 07 08`: ZIP spanned archive marker
/// - `1F 8B`: gzip stream (tar.gz)
pub const SIGNATURES: &[Signature] = &[
    Signature {
        magic: b"PK\x03\x04",
        format: ArchiveType::Zip,
    },
    Signature {
        magic: b"PK\x05\x06",
        format: ArchiveType::Zip,
    },
    Signature {
        magic: b"PK\x07\x08",
        format: ArchiveType::Zip,
    },
    Signature {
        magic: b"\x1F\x8B",
        format: ArchiveType::TarGz,
    },
];

/// Length of the longest signature; the most header bytes detection needs.
pub const MAX_SIGNATURE_LEN: usize = 4;

/// Matches `header` against [`SIGNATURES`] as an exact byte prefix.
#[must_use]
pub fn detect_signature(header: &[u8]) -> Option<ArchiveType> {
    SIGNATURES
        .iter()
        .find(|sig| header.starts_with(sig.magic))
        .map(|sig| sig.format)
}
