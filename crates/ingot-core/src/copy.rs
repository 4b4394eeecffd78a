//! Buffered copy helpers shared by decoders and the relocator.
//!
//! A single `CopyBuffer` is reused for every entry of one decode or
//! relocation pass so large exports do not allocate per file.

use std::io;
use std::io::Read;
use std::io::Write;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable heap buffer for copying entry contents.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Vec<u8>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies data from reader to writer using the provided reusable buffer.
///
/// Returns the total number of bytes copied. The running total uses
/// checked arithmetic so a hostile stream cannot wrap the counter.
///
/// # Examples
///
/// ```
/// use ingot_core::copy::CopyBuffer;
/// use ingot_core::copy::copy_with_buffer;
///
/// let mut buffer = CopyBuffer::new();
/// let mut input: &[u8] = b"hello";
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer)?;
/// assert_eq!(copied, 5);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn copy_with_buffer<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        total = total
            .checked_add(bytes_read as u64)
            .ok_or_else(|| io::Error::other("copied byte count overflowed u64"))?;
    }

    writer.flush()?;
    Ok(total)
}

/// Returns `true` if the stream contains a NUL byte.
///
/// Stops reading at the first NUL.
pub fn contains_nul_byte<R: Read>(reader: &mut R, buffer: &mut CopyBuffer) -> io::Result<bool> {
    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => return Ok(false),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if buffer.buf[..bytes_read].contains(&0) {
            return Ok(true);
        }
    }
}
