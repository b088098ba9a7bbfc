//! Low-level input layer for the Vela lexer.
//!
//! Provides the [`ByteSource`] abstraction over raw input streams and the
//! buffered [`Cursor`] the scanner pulls characters through. This crate is
//! deliberately standalone: it knows nothing about tokens, keywords, or
//! diagnostics, so external tools can reuse it without pulling in the
//! compiler.

mod cursor;
mod source;

pub use cursor::{is_line_terminator, Cursor};
pub use source::{ByteSource, ReadSource};
