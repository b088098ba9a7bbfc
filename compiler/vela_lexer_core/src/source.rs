//! Byte sources: the "next block of bytes or end of stream" capability.
//!
//! A chunk may arrive fully in memory (`&[u8]`) or incrementally from a
//! file or network source ([`ReadSource`]). The cursor never sees the
//! difference: it pulls blocks through [`ByteSource::read`] and treats a
//! zero-length read as end of stream.

use std::io;

/// A source of raw source-text bytes.
///
/// # Contract
///
/// `read` fills `buf` with up to `buf.len()` bytes and returns how many
/// were written. A return of `0` means end of stream and must be sticky:
/// once a source reports `0` it keeps reporting `0`.
///
/// Read *failures* are reported as end of stream. The scanner then raises
/// an "unexpected end of input" error for whatever sub-scan was in
/// progress, which is the policy the lexer wants for a mid-chunk I/O
/// failure.
pub trait ByteSource {
    /// Read the next block of bytes into `buf`, returning the count (0 = end).
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

/// In-memory chunk: the whole source is already a byte slice.
impl ByteSource for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = self.len().min(buf.len());
        buf[..n].copy_from_slice(&self[..n]);
        *self = &self[n..];
        n
    }
}

/// Incremental source wrapping any [`io::Read`] implementor.
///
/// I/O errors are folded into end of stream per the [`ByteSource`]
/// contract; after the first error or zero-length read the source stays
/// exhausted.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    exhausted: bool,
}

impl<R: io::Read> ReadSource<R> {
    /// Wrap a reader as a byte source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            exhausted: false,
        }
    }
}

impl<R: io::Read> ByteSource for ReadSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        if self.exhausted {
            return 0;
        }
        match self.inner.read(buf) {
            Ok(0) | Err(_) => {
                self.exhausted = true;
                0
            }
            Ok(n) => n,
        }
    }
}
