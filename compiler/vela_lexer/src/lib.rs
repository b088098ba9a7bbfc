//! Lexical analysis for the Vela compiler.
//!
//! The lexer turns a byte stream into [`Token`]s on demand: the parser
//! pulls one token at a time through [`Lexer::next`], with at most one
//! token of buffered lookahead. Identifier and string payloads are
//! interned through the [`Runtime`] shared by every lexer of a program,
//! which also owns the reserved-word table.
//!
//! Input is consumed strictly forward in single bytes, so sources need
//! not be fully resident; any [`vela_lexer_core::ByteSource`] works,
//! including incremental readers.

mod escape;
mod keywords;
mod lexer;
mod numeral;
mod runtime;

pub use keywords::ReservedTable;
pub use lexer::Lexer;
pub use runtime::{Runtime, ENV_NAME};

pub use vela_diagnostic::{LexErrorKind, SyntaxError};
pub use vela_ir::{Name, Token};
