//! End-to-end scanning over incremental sources.

use std::io;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use vela_lexer::{Lexer, Runtime, Token};
use vela_lexer_core::{ByteSource, ReadSource};

/// Reader that hands out one byte per call, forcing a cursor refill at
/// every character.
struct Trickle {
    data: Vec<u8>,
    pos: usize,
}

impl io::Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.data[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

fn trickle_lexer(data: &[u8]) -> Lexer<ReadSource<Trickle>> {
    let source = ReadSource::new(Trickle {
        data: data.to_vec(),
        pos: 0,
    });
    Lexer::new(Runtime::new(), source, "chunk", None)
}

fn slice_lexer(data: &[u8]) -> Lexer<&[u8]> {
    Lexer::new(Runtime::new(), data, "chunk", None)
}

/// Drain a lexer into a comparable rendering: one entry per token (with
/// interned payloads resolved and the line attached), ending with either
/// `eos` or the error text.
fn drain<S: ByteSource>(lx: &mut Lexer<S>) -> Vec<String> {
    let mut out = Vec::new();
    loop {
        match lx.next() {
            Err(e) => {
                out.push(format!("error: {e}"));
                return out;
            }
            Ok(()) => {
                let token = lx.current();
                let rendered = match token {
                    Token::Eos => {
                        out.push(format!("eos @{}", lx.line()));
                        return out;
                    }
                    Token::Name(n) => {
                        format!("name({})", lx.runtime().interner().lookup(n).escape_ascii())
                    }
                    Token::Str(n) => {
                        format!("str({})", lx.runtime().interner().lookup(n).escape_ascii())
                    }
                    Token::Int(i) => format!("int({i})"),
                    Token::Float(f) => format!("float({f})"),
                    other => other.to_string(),
                };
                out.push(format!("{rendered} @{}", lx.line()));
            }
        }
    }
}

#[test]
fn a_realistic_chunk() {
    let source = br#"
-- a tiny program
local function fact(n)
    if n <= 1 then
        return 1 --[[ base case ]]
    end
    return n * fact(n - 1)
end

local msg = "fact(5) = \u{2192} "
print(msg .. fact(0x5), [[done
here]])
"#;
    let mut lx = slice_lexer(source);
    let got = drain(&mut lx);
    let want = vec![
        "'local' @3".to_string(),
        "'function' @3".to_string(),
        "name(fact) @3".to_string(),
        "'(' @3".to_string(),
        "name(n) @3".to_string(),
        "')' @3".to_string(),
        "'if' @4".to_string(),
        "name(n) @4".to_string(),
        "'<=' @4".to_string(),
        "int(1) @4".to_string(),
        "'then' @4".to_string(),
        "'return' @5".to_string(),
        "int(1) @5".to_string(),
        "'end' @6".to_string(),
        "'return' @7".to_string(),
        "name(n) @7".to_string(),
        "'*' @7".to_string(),
        "name(fact) @7".to_string(),
        "'(' @7".to_string(),
        "name(n) @7".to_string(),
        "'-' @7".to_string(),
        "int(1) @7".to_string(),
        "')' @7".to_string(),
        "'end' @8".to_string(),
        "'local' @10".to_string(),
        "name(msg) @10".to_string(),
        "'=' @10".to_string(),
        "str(fact(5) = \\xe2\\x86\\x92 ) @10".to_string(),
        "name(print) @11".to_string(),
        "'(' @11".to_string(),
        "name(msg) @11".to_string(),
        "'..' @11".to_string(),
        "name(fact) @11".to_string(),
        "'(' @11".to_string(),
        "int(5) @11".to_string(),
        "')' @11".to_string(),
        "',' @11".to_string(),
        "str(done\\nhere) @12".to_string(),
        "')' @12".to_string(),
        "eos @13".to_string(),
    ];
    assert_eq!(got, want);
}

#[test]
fn trickled_input_matches_resident_input() {
    let source = b"local s = \"a\\tb\" .. [[long\nstring]] -- note\nreturn #s // 2";
    let mut a = trickle_lexer(source);
    let mut b = slice_lexer(source);
    assert_eq!(drain(&mut a), drain(&mut b));
}

#[test]
fn lexical_errors_agree_across_sources() {
    for source in [&b"x = 3y"[..], b"s = \"open", b"t = [==[never"] {
        let mut a = trickle_lexer(source);
        let mut b = slice_lexer(source);
        assert_eq!(drain(&mut a), drain(&mut b), "source {source:?}");
    }
}

proptest! {
    /// The refill boundary never changes the token stream: a source
    /// delivered one byte at a time scans identically to one fully
    /// resident.
    #[test]
    fn refill_boundaries_are_invisible(data: Vec<u8>) {
        let mut a = trickle_lexer(&data);
        let mut b = slice_lexer(&data);
        prop_assert_eq!(drain(&mut a), drain(&mut b));
    }

    /// Comment-heavy inputs exercise the line skipper's window jumps.
    #[test]
    // The pad alphabet stops short of '[' so the comment cannot turn
    // into a long bracket.
    fn comments_of_any_length_are_skipped(pad in "[ -Z]{0,3000}") {
        let source = format!("a --{pad}\nb");
        let mut lx = slice_lexer(source.as_bytes());
        let got = drain(&mut lx);
        prop_assert_eq!(
            got,
            vec![
                "name(a) @1".to_string(),
                "name(b) @2".to_string(),
                "eos @2".to_string(),
            ]
        );
    }
}
