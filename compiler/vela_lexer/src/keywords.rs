//! Reserved words.
//!
//! Keyword recognition is a lookup by interned [`Name`], not by text:
//! the runtime interns every reserved spelling once at startup, so after
//! an identifier is interned, deciding whether it is a keyword is a
//! single hash-map probe on a 4-byte handle.

use rustc_hash::FxHashMap;
use vela_ir::{Name, StringInterner, Token};

/// Every reserved word with its token, in source-order spelling.
pub(crate) const KEYWORDS: &[(&str, Token)] = &[
    ("and", Token::And),
    ("break", Token::Break),
    ("do", Token::Do),
    ("else", Token::Else),
    ("elseif", Token::Elseif),
    ("end", Token::End),
    ("false", Token::False),
    ("for", Token::For),
    ("function", Token::Function),
    ("goto", Token::Goto),
    ("if", Token::If),
    ("in", Token::In),
    ("local", Token::Local),
    ("nil", Token::Nil),
    ("not", Token::Not),
    ("or", Token::Or),
    ("repeat", Token::Repeat),
    ("return", Token::Return),
    ("then", Token::Then),
    ("true", Token::True),
    ("until", Token::Until),
    ("while", Token::While),
];

/// Interned-name to keyword-token table.
///
/// Built once per [`crate::Runtime`]; interning the keyword spellings up
/// front also anchors them for the lifetime of the program.
pub struct ReservedTable {
    map: FxHashMap<Name, Token>,
}

impl ReservedTable {
    /// Intern every reserved word into `interner` and build the table.
    pub(crate) fn register(interner: &StringInterner) -> Self {
        let mut map =
            FxHashMap::with_capacity_and_hasher(KEYWORDS.len(), rustc_hash::FxBuildHasher);
        for &(spelling, token) in KEYWORDS {
            map.insert(interner.intern(spelling.as_bytes()), token);
        }
        ReservedTable { map }
    }

    /// The keyword token for `name`, if its spelling is reserved.
    #[inline]
    pub fn get(&self, name: Name) -> Option<Token> {
        self.map.get(&name).copied()
    }

    /// Number of reserved words.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
