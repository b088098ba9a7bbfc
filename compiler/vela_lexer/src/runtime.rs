//! Shared per-program lexer state.

use std::sync::Arc;

use vela_ir::{Name, SharedInterner, StringInterner};

use crate::keywords::ReservedTable;

/// Default spelling of the implicit environment upvalue. Interned at
/// startup so the parser can compare against it by handle.
pub const ENV_NAME: &str = "_ENV";

/// State shared by every lexer compiling chunks of one program: the
/// string interner, the reserved-word table, and the pre-interned
/// environment name.
///
/// Cloning is cheap; clones observe the same interner, so names agree
/// across lexers (compiling a nested chunk constructs a second lexer
/// over a clone of the same runtime).
#[derive(Clone)]
pub struct Runtime {
    interner: SharedInterner,
    reserved: Arc<ReservedTable>,
    env_name: Name,
}

impl Runtime {
    /// Build a runtime with the default environment name.
    pub fn new() -> Self {
        Self::with_env_name(ENV_NAME)
    }

    /// Build a runtime whose environment upvalue has a custom spelling.
    pub fn with_env_name(env: &str) -> Self {
        let interner = SharedInterner::new();
        let reserved = Arc::new(ReservedTable::register(&interner));
        let env_name = interner.intern(env.as_bytes());
        tracing::trace!(
            env,
            keywords = reserved.len(),
            "lexer runtime initialized"
        );
        Runtime {
            interner,
            reserved,
            env_name,
        }
    }

    /// The program-wide string interner.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub(crate) fn reserved(&self) -> &ReservedTable {
        &self.reserved
    }

    /// Interned handle of the environment upvalue's spelling.
    pub fn env_name(&self) -> Name {
        self.env_name
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
