//! Token values for the Vela lexer.
//!
//! A token is a plain `Copy` value: the discriminant is the token kind
//! and the literal kinds carry their payload directly, so the
//! kind-to-payload mapping is exhaustive by construction. Reserved words
//! and multi-character operators carry no payload; their spelling is
//! recovered from a static table. Single-character punctuation is
//! represented by its own character code in [`Token::Byte`].

use super::Name;
use std::fmt;

/// One classified unit of source text.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Token {
    // Literals (payload kinds, mutually exclusive by construction)
    /// Integer literal: `42`, `0x1A`.
    Int(i64),
    /// Float literal: `10.0`, `1e2`, `0x1p4`.
    Float(f64),
    /// Identifier (interned).
    Name(Name),
    /// String literal (interned byte content).
    Str(Name),

    // Reserved words
    And,
    Break,
    Do,
    Else,
    Elseif,
    End,
    False,
    For,
    Function,
    Goto,
    If,
    In,
    Local,
    Nil,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    True,
    Until,
    While,

    // Multi-character operators
    Idiv,    // //
    Concat,  // ..
    Dots,    // ...
    Eq,      // ==
    Ge,      // >=
    Le,      // <=
    Ne,      // ~=
    Shl,     // <<
    Shr,     // >>
    DbColon, // ::

    /// Single-character punctuation, carrying the character code itself.
    Byte(u8),

    /// End of stream (idempotent: re-requested indefinitely).
    Eos,
}

impl Token {
    /// Fixed spelling for reserved words and multi-character operators.
    pub fn fixed_str(self) -> Option<&'static str> {
        let s = match self {
            Token::And => "and",
            Token::Break => "break",
            Token::Do => "do",
            Token::Else => "else",
            Token::Elseif => "elseif",
            Token::End => "end",
            Token::False => "false",
            Token::For => "for",
            Token::Function => "function",
            Token::Goto => "goto",
            Token::If => "if",
            Token::In => "in",
            Token::Local => "local",
            Token::Nil => "nil",
            Token::Not => "not",
            Token::Or => "or",
            Token::Repeat => "repeat",
            Token::Return => "return",
            Token::Then => "then",
            Token::True => "true",
            Token::Until => "until",
            Token::While => "while",
            Token::Idiv => "//",
            Token::Concat => "..",
            Token::Dots => "...",
            Token::Eq => "==",
            Token::Ge => ">=",
            Token::Le => "<=",
            Token::Ne => "~=",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::DbColon => "::",
            _ => return None,
        };
        Some(s)
    }

    /// `true` for the literal kinds whose spelling lives in the lexer's
    /// token buffer rather than a static table.
    pub fn has_payload(self) -> bool {
        matches!(
            self,
            Token::Int(_) | Token::Float(_) | Token::Name(_) | Token::Str(_)
        )
    }
}

/// Display renders the spelling a diagnostic would show: quoted literal
/// text for fixed tokens, `'c'` (or `'<\ddd>'` for non-printable codes)
/// for punctuation, `<eof>` for end of stream, and a class name for the
/// payload kinds (the lexer substitutes the actual buffered spelling when
/// it has it).
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.fixed_str() {
            return write!(f, "'{s}'");
        }
        match *self {
            Token::Byte(c) if c.is_ascii_graphic() || c == b' ' => {
                write!(f, "'{}'", char::from(c))
            }
            Token::Byte(c) => write!(f, "'<\\{c}>'"),
            Token::Eos => write!(f, "<eof>"),
            Token::Float(_) => write!(f, "<number>"),
            Token::Int(_) => write!(f, "<integer>"),
            Token::Name(_) => write!(f, "<name>"),
            Token::Str(_) => write!(f, "<string>"),
            _ => unreachable!("fixed tokens handled above"),
        }
    }
}
