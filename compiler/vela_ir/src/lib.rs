//! Shared compiler types for the Vela front end.
//!
//! Holds the pieces that outlive any single compilation: the interned
//! string handle [`Name`], the process-wide [`StringInterner`] (and its
//! [`SharedInterner`] handle), and the [`Token`] value type the lexer
//! hands to the parser.

mod interner;
mod name;
mod token;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use token::Token;
