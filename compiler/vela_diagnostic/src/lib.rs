//! Diagnostics for the Vela lexical front end.
//!
//! A lexical error is never partially ignorable (token boundaries after
//! a malformed lexeme are undefined), so every error here is fatal to the
//! chunk being compiled. Raising is modeled as returning
//! `Err(SyntaxError)`, which unwinds by `?` out of the whole lex/parse
//! call chain to whatever boundary the compilation driver establishes.
//! Nothing downgrades or retries a [`SyntaxError`].

use thiserror::Error;

/// What went wrong, with the message text a diagnostic renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// Missing closing quote, or a bare newline inside a short string.
    #[error("unfinished string")]
    UnterminatedString,

    /// A long string ran to end of stream without a closer of its level.
    #[error("unfinished long string (starting at line {opening_line})")]
    UnterminatedLongString { opening_line: u32 },

    /// A long comment ran to end of stream without a closer of its level.
    #[error("unfinished long comment (starting at line {opening_line})")]
    UnterminatedLongComment { opening_line: u32 },

    /// Invalid digit sequence, missing exponent digits, or malformed
    /// hex-float in a numeric literal.
    #[error("malformed number")]
    MalformedNumber,

    /// `[=` (one or more `=`) not followed by a second `[`.
    #[error("invalid long string delimiter")]
    InvalidLongBracketDelimiter,

    /// Unknown character after `\` in a short string.
    #[error("invalid escape sequence")]
    InvalidEscape,

    /// `\x` not followed by two hex digits, or a non-hex digit in `\u{..}`.
    #[error("hexadecimal digit expected")]
    HexDigitExpected,

    /// `\ddd` escape above 255.
    #[error("decimal escape too large")]
    DecimalEscapeTooLarge,

    /// `\u` not followed by `{`.
    #[error("missing '{{' in \\u{{xxxx}}")]
    MissingOpenBrace,

    /// `\u{..` without a closing `}`.
    #[error("missing '}}' in \\u{{xxxx}}")]
    MissingCloseBrace,

    /// `\u{..}` code point above 0x7FFFFFFF.
    #[error("UTF-8 value too large")]
    Utf8ValueTooLarge,

    /// Line counter about to overflow.
    #[error("chunk has too many lines")]
    TooManyLines,

    /// Grammar-level error raised by the parser through the lexer.
    #[error("{0}")]
    Syntax(String),
}

/// Fatal compilation error: source name, line, message, and the spelling
/// of the token nearest the failure.
///
/// Rendered as `chunk:line: message near spelling`. The `near` field
/// carries the display form of the token: literal spellings arrive
/// already quoted (`'3x'`) and class sentinels unquoted (`<eof>`), so
/// no quoting is added here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Source name the failing chunk was bound with.
    pub chunk: String,
    /// Line the scanner had reached when the error was raised.
    pub line: u32,
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Display spelling of the nearest token, when one is available.
    pub near: Option<String>,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.chunk, self.line, self.kind)?;
        if let Some(near) = &self.near {
            write!(f, " near {near}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_chunk_line_message_and_near() {
        let err = SyntaxError {
            chunk: "demo.vl".to_string(),
            line: 7,
            kind: LexErrorKind::MalformedNumber,
            near: Some("'3x'".to_string()),
        };
        assert_eq!(err.to_string(), "demo.vl:7: malformed number near '3x'");
    }

    #[test]
    fn near_is_optional() {
        let err = SyntaxError {
            chunk: "demo.vl".to_string(),
            line: 2_147_483_647,
            kind: LexErrorKind::TooManyLines,
            near: None,
        };
        assert_eq!(err.to_string(), "demo.vl:2147483647: chunk has too many lines");
    }

    #[test]
    fn unicode_escape_messages_keep_braces() {
        assert_eq!(
            LexErrorKind::MissingOpenBrace.to_string(),
            "missing '{' in \\u{xxxx}"
        );
        assert_eq!(
            LexErrorKind::MissingCloseBrace.to_string(),
            "missing '}' in \\u{xxxx}"
        );
    }

    #[test]
    fn long_string_error_cites_opening_line() {
        assert_eq!(
            LexErrorKind::UnterminatedLongString { opening_line: 3 }.to_string(),
            "unfinished long string (starting at line 3)"
        );
    }
}
