//! Buffered character cursor over a [`ByteSource`].
//!
//! The cursor owns the current unconsumed character and the input line
//! counter. The scanner drives it strictly forward, one character at a
//! time; end of stream is the distinguished sentinel `None`, distinct
//! from every valid byte.
//!
//! # Line terminators
//!
//! Any of `\n`, `\r`, `\n\r`, `\r\n` counts as exactly one line boundary.
//! The scanner decides *when* a terminator has been crossed and calls
//! [`Cursor::inc_line`], which folds a two-character terminator pair into
//! a single increment by conditionally consuming the paired character.

use crate::source::ByteSource;

/// Refill window size. One block is pulled from the source at a time,
/// so incremental (file/network) sources are never read past need.
const WINDOW: usize = 1024;

/// Returns `true` for the two line-terminator bytes.
#[inline]
pub fn is_line_terminator(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Forward-only character cursor with line tracking.
///
/// # Invariant
///
/// `current` holds the one unconsumed character (or `None` at end of
/// stream); `window[pos..filled]` holds the bytes that follow it. Once the
/// source reports end of stream the cursor stays exhausted.
#[derive(Debug)]
pub struct Cursor<S> {
    source: S,
    window: Box<[u8]>,
    /// Valid bytes in `window`.
    filled: usize,
    /// Next unread index into `window` (`<= filled`).
    pos: usize,
    current: Option<u8>,
    eos: bool,
    line: u32,
}

impl<S: ByteSource> Cursor<S> {
    /// Create a cursor primed with the first character of the stream.
    pub fn new(source: S) -> Self {
        Self::with_first(source, None)
    }

    /// Create a cursor whose first character was pre-read by the caller.
    ///
    /// The compilation driver may have consumed the first byte of the
    /// stream (e.g. while sniffing for a shebang line); passing it here
    /// lets the cursor start from that byte instead of re-reading.
    pub fn with_first(source: S, first: Option<u8>) -> Self {
        let mut cursor = Self {
            source,
            window: vec![0; WINDOW].into_boxed_slice(),
            filled: 0,
            pos: 0,
            current: None,
            eos: false,
            line: 1,
        };
        match first {
            Some(b) => cursor.current = Some(b),
            None => cursor.advance(),
        }
        cursor
    }

    /// The current unconsumed character, or `None` at end of stream.
    #[inline]
    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// `true` when the current character is a line terminator.
    #[inline]
    pub fn at_newline(&self) -> bool {
        matches!(self.current, Some(b) if is_line_terminator(b))
    }

    /// Current line number (1-based).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Consume the current character and fetch the next one.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.filled {
            self.current = Some(self.window[self.pos]);
            self.pos += 1;
        } else {
            self.refill();
        }
    }

    fn refill(&mut self) {
        if self.eos {
            self.current = None;
            return;
        }
        let n = self.source.read(&mut self.window);
        self.filled = n;
        if n == 0 {
            self.eos = true;
            self.current = None;
            self.pos = 0;
        } else {
            self.current = Some(self.window[0]);
            self.pos = 1;
        }
    }

    /// Cross a line terminator: consume it (folding `\r\n`/`\n\r` pairs
    /// into one boundary) and bump the line counter.
    ///
    /// Must be called exactly when `current` is `\n` or `\r`. The counter
    /// saturates; the scanner raises "too many lines" before saturation
    /// can be observed.
    pub fn inc_line(&mut self) {
        let first = self.current;
        debug_assert!(self.at_newline(), "inc_line called outside a terminator");
        self.advance(); // skip '\n' or '\r'
        if self.at_newline() && self.current != first {
            self.advance(); // skip the paired terminator
        }
        self.line = self.line.saturating_add(1);
    }

    /// Skip forward to the next line terminator or end of stream, leaving
    /// the terminator unconsumed. Used for short comments and shebang
    /// lines; accelerated with `memchr` over the buffered window.
    pub fn skip_to_line_end(&mut self) {
        loop {
            match self.current {
                None => return,
                Some(b) if is_line_terminator(b) => return,
                Some(_) => {}
            }
            if let Some(off) = memchr::memchr2(b'\n', b'\r', &self.window[self.pos..self.filled]) {
                self.current = Some(self.window[self.pos + off]);
                self.pos += off + 1;
                return;
            }
            // Window exhausted without a terminator: discard it and pull
            // the next block.
            self.pos = self.filled;
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests;
