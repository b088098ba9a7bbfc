//! Lexer state and the scanning state machine.

use smallvec::SmallVec;
use vela_diagnostic::{LexErrorKind, SyntaxError};
use vela_ir::{Name, Token};
use vela_lexer_core::{is_line_terminator, ByteSource, Cursor};

use crate::escape::{control_escape, utf8_escape, MAX_UTF8_CODE};
use crate::numeral::{self, Numeral};
use crate::runtime::Runtime;

/// Most lexemes fit inline; longer ones spill to the heap.
const BUF_INLINE: usize = 32;

type ScanResult<T> = Result<T, SyntaxError>;

/// Outcome of probing a long-bracket delimiter (`[`/`]` possibly
/// followed by `=` signs).
enum Sep {
    /// Proper half of a level-`n` delimiter: the probed bracket, `n`
    /// `=` signs, and a matching second bracket (still unconsumed).
    Level(u32),
    /// A lone bracket with no `=` signs.
    Plain,
    /// `=` signs not closed by a second bracket.
    Malformed,
}

/// The whitespace set the scanner and the `\z` escape skip.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_ident_continue(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Pull-based lexer over one chunk of source.
///
/// The parser drives it: [`Lexer::next`] advances to the next token,
/// [`Lexer::lookahead`] peeks one token ahead without consuming it.
/// Every lexical error is fatal to the chunk and surfaces as a
/// [`SyntaxError`].
pub struct Lexer<S> {
    cursor: Cursor<S>,
    /// Accumulates the spelling of the lexeme in progress. Also the
    /// source of "near '...'" text in diagnostics, so escape handling
    /// keeps raw spellings buffered until a sequence is known good.
    buf: SmallVec<[u8; BUF_INLINE]>,
    /// Current (last consumed) token.
    t: Token,
    /// Buffered lookahead token, if [`Lexer::lookahead`] ran.
    ahead: Option<Token>,
    /// Line of the previous token, for end-of-statement diagnostics.
    last_line: u32,
    runtime: Runtime,
    /// Source name used in diagnostics.
    chunk: String,
}

impl<S: ByteSource> Lexer<S> {
    /// Bind a lexer to `source`.
    ///
    /// `first` is a byte the compilation driver already pulled off the
    /// stream, if any. When it is `#` the whole first line is treated
    /// as a shebang and skipped.
    pub fn new(runtime: Runtime, source: S, chunk: impl Into<String>, first: Option<u8>) -> Self {
        let chunk = chunk.into();
        tracing::trace!(chunk = %chunk, "binding chunk input");
        let mut cursor = Cursor::with_first(source, first);
        if first == Some(b'#') {
            cursor.skip_to_line_end();
        }
        Lexer {
            cursor,
            buf: SmallVec::new(),
            t: Token::Eos,
            ahead: None,
            last_line: 1,
            runtime,
            chunk,
        }
    }

    /// Advance to the next token, consuming the buffered lookahead if
    /// one is pending.
    pub fn next(&mut self) -> ScanResult<()> {
        self.last_line = self.cursor.line();
        self.t = match self.ahead.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        Ok(())
    }

    /// Scan one token ahead of the current one and buffer it; the next
    /// [`Lexer::next`] returns it without rescanning.
    pub fn lookahead(&mut self) -> ScanResult<Token> {
        debug_assert!(self.ahead.is_none(), "lookahead already buffered");
        let token = self.scan()?;
        self.ahead = Some(token);
        Ok(token)
    }

    /// The current token.
    #[inline]
    pub fn current(&self) -> Token {
        self.t
    }

    /// Line the scanner has reached.
    #[inline]
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Line of the previous token.
    #[inline]
    pub fn last_line(&self) -> u32 {
        self.last_line
    }

    /// Source name this lexer was bound with.
    pub fn chunk_name(&self) -> &str {
        &self.chunk
    }

    /// The shared per-program state.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Intern `bytes` through the program interner. The parser uses
    /// this for names it synthesizes itself.
    pub fn new_string(&self, bytes: &[u8]) -> Name {
        self.runtime.interner().intern(bytes)
    }

    /// Raise a grammar-level error at the current token. The parser
    /// calls this; the "near" text is the current token's spelling.
    pub fn syntax_error(&self, message: impl Into<String>) -> SyntaxError {
        let near = self.near_text(self.t);
        self.raise(LexErrorKind::Syntax(message.into()), Some(near))
    }

    /// Display spelling of `token` for diagnostics: the buffered lexeme
    /// for literal kinds, the fixed spelling otherwise.
    pub fn near_text(&self, token: Token) -> String {
        if token.has_payload() {
            format!("'{}'", String::from_utf8_lossy(&self.buf))
        } else {
            token.to_string()
        }
    }

    fn raise(&self, kind: LexErrorKind, near: Option<String>) -> SyntaxError {
        tracing::debug!(
            chunk = %self.chunk,
            line = self.cursor.line(),
            error = %kind,
            "lexical error"
        );
        SyntaxError {
            chunk: self.chunk.clone(),
            line: self.cursor.line(),
            kind,
            near,
        }
    }

    /// Scan error whose "near" text is the partial lexeme in the buffer.
    fn error(&self, kind: LexErrorKind) -> SyntaxError {
        let near = format!("'{}'", String::from_utf8_lossy(&self.buf));
        self.raise(kind, Some(near))
    }

    /// Scan error raised at end of stream.
    fn error_at_eos(&self, kind: LexErrorKind) -> SyntaxError {
        self.raise(kind, Some(Token::Eos.to_string()))
    }

    /// Scan error with no meaningful nearby text.
    fn error_plain(&self, kind: LexErrorKind) -> SyntaxError {
        self.raise(kind, None)
    }

    /// Escape-sequence failure: include the offending character in the
    /// buffered lexeme so the "near" text shows it.
    fn esc_fail<T>(&mut self, kind: LexErrorKind) -> ScanResult<T> {
        if self.cursor.current().is_some() {
            self.save_and_advance();
        }
        Err(self.error(kind))
    }

    #[inline]
    fn save_and_advance(&mut self) {
        debug_assert!(self.cursor.current().is_some());
        if let Some(b) = self.cursor.current() {
            self.buf.push(b);
        }
        self.cursor.advance();
    }

    /// Drop the last `n` buffered bytes.
    #[inline]
    fn buf_remove(&mut self, n: usize) {
        let len = self.buf.len() - n;
        self.buf.truncate(len);
    }

    /// Consume the current character if it equals `c`.
    fn check_next(&mut self, c: u8) -> bool {
        if self.cursor.current() == Some(c) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    /// Save and consume the current character if it is one of the two
    /// bytes in `set`.
    fn check_next_save(&mut self, set: &[u8; 2]) -> bool {
        if matches!(self.cursor.current(), Some(c) if c == set[0] || c == set[1]) {
            self.save_and_advance();
            true
        } else {
            false
        }
    }

    /// Cross a line terminator, guarding the line counter.
    fn inc_line(&mut self) -> ScanResult<()> {
        if self.cursor.line() >= u32::MAX - 1 {
            return Err(self.error_plain(LexErrorKind::TooManyLines));
        }
        self.cursor.inc_line();
        Ok(())
    }

    /// The scanning state machine: skip whitespace and comments, then
    /// classify one token.
    fn scan(&mut self) -> ScanResult<Token> {
        self.buf.clear();
        loop {
            let Some(c) = self.cursor.current() else {
                return Ok(Token::Eos);
            };
            match c {
                b'\n' | b'\r' => self.inc_line()?,
                b' ' | b'\t' | 0x0b | 0x0c => self.cursor.advance(),
                b'-' => {
                    self.cursor.advance();
                    if !self.check_next(b'-') {
                        return Ok(Token::Byte(b'-'));
                    }
                    if self.cursor.current() == Some(b'[') {
                        let sep = self.skip_sep();
                        self.buf.clear();
                        if let Sep::Level(level) = sep {
                            self.read_long_bracket(level, false)?;
                            self.buf.clear();
                            continue;
                        }
                    }
                    // Short comment: everything up to the line end.
                    self.cursor.skip_to_line_end();
                }
                b'[' => match self.skip_sep() {
                    Sep::Level(level) => return self.read_long_string(level),
                    Sep::Plain => return Ok(Token::Byte(b'[')),
                    Sep::Malformed => {
                        return Err(self.error(LexErrorKind::InvalidLongBracketDelimiter))
                    }
                },
                b'=' => {
                    self.cursor.advance();
                    let token = if self.check_next(b'=') {
                        Token::Eq
                    } else {
                        Token::Byte(b'=')
                    };
                    return Ok(token);
                }
                b'<' => {
                    self.cursor.advance();
                    let token = if self.check_next(b'=') {
                        Token::Le
                    } else if self.check_next(b'<') {
                        Token::Shl
                    } else {
                        Token::Byte(b'<')
                    };
                    return Ok(token);
                }
                b'>' => {
                    self.cursor.advance();
                    let token = if self.check_next(b'=') {
                        Token::Ge
                    } else if self.check_next(b'>') {
                        Token::Shr
                    } else {
                        Token::Byte(b'>')
                    };
                    return Ok(token);
                }
                b'/' => {
                    self.cursor.advance();
                    let token = if self.check_next(b'/') {
                        Token::Idiv
                    } else {
                        Token::Byte(b'/')
                    };
                    return Ok(token);
                }
                b'~' => {
                    self.cursor.advance();
                    let token = if self.check_next(b'=') {
                        Token::Ne
                    } else {
                        Token::Byte(b'~')
                    };
                    return Ok(token);
                }
                b':' => {
                    self.cursor.advance();
                    let token = if self.check_next(b':') {
                        Token::DbColon
                    } else {
                        Token::Byte(b':')
                    };
                    return Ok(token);
                }
                b'"' | b'\'' => return self.read_string(c),
                b'.' => {
                    self.save_and_advance();
                    if self.check_next(b'.') {
                        if self.check_next(b'.') {
                            return Ok(Token::Dots);
                        }
                        return Ok(Token::Concat);
                    }
                    if !matches!(self.cursor.current(), Some(d) if d.is_ascii_digit()) {
                        return Ok(Token::Byte(b'.'));
                    }
                    return self.read_numeral();
                }
                b'0'..=b'9' => return self.read_numeral(),
                c if is_ident_start(c) => {
                    loop {
                        self.save_and_advance();
                        match self.cursor.current() {
                            Some(n) if is_ident_continue(n) => {}
                            _ => break,
                        }
                    }
                    let name = self.runtime.interner().intern(&self.buf);
                    let token = self.runtime.reserved().get(name).unwrap_or(Token::Name(name));
                    return Ok(token);
                }
                // Any other byte is a single-character token; the
                // parser rejects the ones the grammar has no use for.
                other => {
                    self.cursor.advance();
                    return Ok(Token::Byte(other));
                }
            }
        }
    }

    /// Probe a long-bracket delimiter starting at the current `[` or
    /// `]`. The bracket and any `=` signs are saved and consumed; a
    /// matching second bracket is left as the current character.
    fn skip_sep(&mut self) -> Sep {
        let bracket = self.cursor.current();
        debug_assert!(matches!(bracket, Some(b'[' | b']')));
        self.save_and_advance();
        let mut count: u32 = 0;
        while self.cursor.current() == Some(b'=') {
            self.save_and_advance();
            count += 1;
        }
        if self.cursor.current() == bracket {
            Sep::Level(count)
        } else if count == 0 {
            Sep::Plain
        } else {
            Sep::Malformed
        }
    }

    fn read_long_string(&mut self, level: u32) -> ScanResult<Token> {
        self.read_long_bracket(level, true)?;
        // The buffer holds the full bracketed lexeme; trim a delimiter's
        // worth of bytes from each end.
        let trim = level as usize + 2;
        let content = &self.buf[trim..self.buf.len() - trim];
        Ok(Token::Str(self.runtime.interner().intern(content)))
    }

    /// Consume a long string (`keep`) or long comment (`!keep`) body
    /// through its closing delimiter. On entry the buffer holds the
    /// opening `[` and `=` signs and the current character is the
    /// second `[`.
    fn read_long_bracket(&mut self, level: u32, keep: bool) -> ScanResult<()> {
        let opening_line = self.cursor.line();
        self.save_and_advance(); // second '[' of the opener
        if self.cursor.at_newline() {
            // A newline right after the opener is not part of the content.
            self.inc_line()?;
        }
        loop {
            match self.cursor.current() {
                None => {
                    let kind = if keep {
                        LexErrorKind::UnterminatedLongString { opening_line }
                    } else {
                        LexErrorKind::UnterminatedLongComment { opening_line }
                    };
                    return Err(self.error_at_eos(kind));
                }
                Some(b']') => {
                    if matches!(self.skip_sep(), Sep::Level(l) if l == level) {
                        self.save_and_advance(); // second ']' of the closer
                        break;
                    }
                    // A closer of a different level is ordinary content;
                    // skip_sep already saved it.
                }
                Some(b'\n' | b'\r') => {
                    self.buf.push(b'\n'); // terminators normalize to '\n'
                    self.inc_line()?;
                    if !keep {
                        self.buf.clear();
                    }
                }
                Some(_) => {
                    if keep {
                        self.save_and_advance();
                    } else {
                        self.cursor.advance();
                    }
                }
            }
        }
        Ok(())
    }

    fn read_string(&mut self, quote: u8) -> ScanResult<Token> {
        self.save_and_advance(); // keep the delimiter for error messages
        while self.cursor.current() != Some(quote) {
            match self.cursor.current() {
                None => return Err(self.error_at_eos(LexErrorKind::UnterminatedString)),
                Some(b'\n' | b'\r') => return Err(self.error(LexErrorKind::UnterminatedString)),
                Some(b'\\') => self.read_escape()?,
                Some(_) => self.save_and_advance(),
            }
        }
        self.save_and_advance(); // closing delimiter
        let content = &self.buf[1..self.buf.len() - 1];
        Ok(Token::Str(self.runtime.interner().intern(content)))
    }

    /// Handle one `\` escape inside a short string. Raw characters stay
    /// buffered until the sequence is validated, then the spelling is
    /// replaced by the escaped value.
    fn read_escape(&mut self) -> ScanResult<()> {
        self.save_and_advance(); // keep '\' for error messages
        match self.cursor.current() {
            // Unfinished string; the caller's loop reports it.
            None => Ok(()),
            Some(b'\n' | b'\r') => {
                self.inc_line()?;
                self.buf_remove(1);
                self.buf.push(b'\n');
                Ok(())
            }
            Some(b'x') => {
                let value = self.read_hex_escape()?;
                self.cursor.advance(); // consume the second digit
                self.buf_remove(1);
                self.buf.push(value);
                Ok(())
            }
            Some(b'u') => self.read_utf8_escape(),
            Some(b'z') => {
                self.buf_remove(1); // drop '\'
                self.cursor.advance(); // skip 'z'
                while let Some(c) = self.cursor.current() {
                    if !is_space(c) {
                        break;
                    }
                    if is_line_terminator(c) {
                        self.inc_line()?;
                    } else {
                        self.cursor.advance();
                    }
                }
                Ok(())
            }
            Some(c @ (b'\\' | b'"' | b'\'')) => {
                self.cursor.advance();
                self.buf_remove(1);
                self.buf.push(c);
                Ok(())
            }
            Some(c) => {
                if let Some(value) = control_escape(c) {
                    self.cursor.advance();
                    self.buf_remove(1);
                    self.buf.push(value);
                    Ok(())
                } else if c.is_ascii_digit() {
                    let value = self.read_dec_escape()?;
                    self.buf_remove(1);
                    self.buf.push(value);
                    Ok(())
                } else {
                    self.esc_fail(LexErrorKind::InvalidEscape)
                }
            }
        }
    }

    /// Save and consume the current character, then require the next to
    /// be a hex digit. The digit is left unconsumed.
    fn get_hex_digit(&mut self) -> ScanResult<u32> {
        self.save_and_advance();
        match self.cursor.current().and_then(numeral::hex_value) {
            Some(d) => Ok(d),
            None => self.esc_fail(LexErrorKind::HexDigitExpected),
        }
    }

    /// `\xXX`: exactly two hex digits. On return the second digit is
    /// still the current character.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "two hex digits fit in a byte"
    )]
    fn read_hex_escape(&mut self) -> ScanResult<u8> {
        let hi = self.get_hex_digit()?; // saves 'x'
        let lo = self.get_hex_digit()?; // saves the first digit
        self.buf_remove(2); // drop the saved 'x' and first digit
        Ok(((hi << 4) | lo) as u8)
    }

    /// `\ddd`: up to three decimal digits, value at most 255. Consumes
    /// the digits.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value checked against 255 above"
    )]
    fn read_dec_escape(&mut self) -> ScanResult<u8> {
        let mut value: u32 = 0;
        let mut digits = 0usize;
        while digits < 3 {
            match self.cursor.current() {
                Some(d) if d.is_ascii_digit() => {
                    value = 10 * value + u32::from(d - b'0');
                    self.save_and_advance();
                    digits += 1;
                }
                _ => break,
            }
        }
        if value > 255 {
            return self.esc_fail(LexErrorKind::DecimalEscapeTooLarge);
        }
        self.buf_remove(digits);
        Ok(value as u8)
    }

    /// `\u{XXX}`: one or more hex digits in braces, value at most
    /// [`MAX_UTF8_CODE`], emitted in the extended UTF-8 encoding.
    fn read_utf8_escape(&mut self) -> ScanResult<()> {
        // '\', 'u', '{' and the first digit get removed on success.
        let mut saved = 4usize;
        self.save_and_advance(); // save 'u'
        if self.cursor.current() != Some(b'{') {
            return self.esc_fail(LexErrorKind::MissingOpenBrace);
        }
        let first = self.get_hex_digit()?; // saves '{'
        let mut code: u32 = first;
        loop {
            self.save_and_advance(); // save the digit just read
            match self.cursor.current().and_then(numeral::hex_value) {
                Some(d) => {
                    saved += 1;
                    if code > MAX_UTF8_CODE >> 4 {
                        return self.esc_fail(LexErrorKind::Utf8ValueTooLarge);
                    }
                    code = (code << 4) | d;
                }
                None => break,
            }
        }
        if self.cursor.current() != Some(b'}') {
            return self.esc_fail(LexErrorKind::MissingCloseBrace);
        }
        self.cursor.advance(); // skip '}'
        self.buf_remove(saved);
        let (bytes, n) = utf8_escape(code);
        self.buf.extend_from_slice(&bytes[6 - n..]);
        Ok(())
    }

    fn read_numeral(&mut self) -> ScanResult<Token> {
        let first = self.cursor.current();
        self.save_and_advance();
        let expo: &[u8; 2] = if first == Some(b'0') && self.check_next_save(b"xX") {
            b"pP"
        } else {
            b"eE"
        };
        loop {
            if self.check_next_save(expo) {
                self.check_next_save(b"+-"); // optional exponent sign
            } else if matches!(self.cursor.current(), Some(c) if c.is_ascii_hexdigit() || c == b'.')
            {
                self.save_and_advance();
            } else {
                break;
            }
        }
        // A numeral touching a letter is always malformed; buffer the
        // letter so the error message shows it.
        if matches!(self.cursor.current(), Some(c) if is_ident_start(c)) {
            self.save_and_advance();
        }
        match numeral::parse(&self.buf) {
            Some(Numeral::Int(i)) => Ok(Token::Int(i)),
            Some(Numeral::Float(f)) => Ok(Token::Float(f)),
            None => Err(self.error(LexErrorKind::MalformedNumber)),
        }
    }
}
