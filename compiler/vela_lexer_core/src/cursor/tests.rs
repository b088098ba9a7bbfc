use super::*;
use crate::source::ReadSource;
use pretty_assertions::assert_eq;
use std::io;

/// Reader that hands out one byte per `read` call, forcing a window
/// refill on every advance.
struct Trickle {
    data: Vec<u8>,
    pos: usize,
}

impl Trickle {
    fn new(data: &[u8]) -> ReadSource<Self> {
        ReadSource::new(Self {
            data: data.to_vec(),
            pos: 0,
        })
    }
}

impl io::Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.data[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

/// Drain a cursor into the raw byte sequence it yields.
fn drain<S: crate::ByteSource>(mut cursor: Cursor<S>) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(b) = cursor.current() {
        out.push(b);
        cursor.advance();
    }
    out
}

// === Basic navigation ===

#[test]
fn current_returns_first_byte() {
    let cursor = Cursor::new(b"abc".as_slice());
    assert_eq!(cursor.current(), Some(b'a'));
}

#[test]
fn advance_moves_forward_to_end_of_stream() {
    let mut cursor = Cursor::new(b"hi".as_slice());
    assert_eq!(cursor.current(), Some(b'h'));
    cursor.advance();
    assert_eq!(cursor.current(), Some(b'i'));
    cursor.advance();
    assert_eq!(cursor.current(), None);
    cursor.advance(); // end of stream is sticky
    assert_eq!(cursor.current(), None);
}

#[test]
fn empty_source_starts_exhausted() {
    let cursor = Cursor::new(b"".as_slice());
    assert_eq!(cursor.current(), None);
}

#[test]
fn with_first_primes_without_reading() {
    let mut cursor = Cursor::with_first(b"bc".as_slice(), Some(b'a'));
    assert_eq!(cursor.current(), Some(b'a'));
    cursor.advance();
    assert_eq!(cursor.current(), Some(b'b'));
}

#[test]
fn trickle_reader_yields_same_bytes_as_slice() {
    let data = b"local x = 1 -- with a tail";
    assert_eq!(drain(Cursor::new(Trickle::new(data))), data.to_vec());
    assert_eq!(drain(Cursor::new(data.as_slice())), data.to_vec());
}

// === Line counting ===

fn count_lines(data: &[u8]) -> u32 {
    let mut cursor = Cursor::new(data);
    loop {
        match cursor.current() {
            None => return cursor.line(),
            Some(b) if is_line_terminator(b) => cursor.inc_line(),
            Some(_) => cursor.advance(),
        }
    }
}

#[test]
fn all_four_terminators_count_one_line() {
    assert_eq!(count_lines(b"a\nb"), 2);
    assert_eq!(count_lines(b"a\rb"), 2);
    assert_eq!(count_lines(b"a\r\nb"), 2);
    assert_eq!(count_lines(b"a\n\rb"), 2);
}

#[test]
fn doubled_same_terminator_counts_two_lines() {
    assert_eq!(count_lines(b"a\n\nb"), 3);
    assert_eq!(count_lines(b"a\r\rb"), 3);
}

#[test]
fn crlf_pair_split_across_refills_still_folds() {
    let mut cursor = Cursor::new(Trickle::new(b"a\r\nb"));
    cursor.advance(); // past 'a'
    cursor.inc_line();
    assert_eq!(cursor.line(), 2);
    assert_eq!(cursor.current(), Some(b'b'));
}

#[test]
fn inc_line_consumes_terminator_at_end_of_stream() {
    let mut cursor = Cursor::new(b"\n".as_slice());
    cursor.inc_line();
    assert_eq!(cursor.line(), 2);
    assert_eq!(cursor.current(), None);
}

// === skip_to_line_end ===

#[test]
fn skip_to_line_end_stops_at_terminator() {
    let mut cursor = Cursor::new(b"# shebang\nrest".as_slice());
    cursor.skip_to_line_end();
    assert_eq!(cursor.current(), Some(b'\n'));
}

#[test]
fn skip_to_line_end_runs_to_end_of_stream() {
    let mut cursor = Cursor::new(b"no newline here".as_slice());
    cursor.skip_to_line_end();
    assert_eq!(cursor.current(), None);
}

#[test]
fn skip_to_line_end_is_noop_on_terminator() {
    let mut cursor = Cursor::new(b"\rx".as_slice());
    cursor.skip_to_line_end();
    assert_eq!(cursor.current(), Some(b'\r'));
}

#[test]
fn skip_to_line_end_crosses_refill_boundaries() {
    let mut long_line = vec![b'-'; 3000];
    long_line.extend_from_slice(b"\nnext");
    let mut cursor = Cursor::new(Trickle::new(&long_line));
    cursor.skip_to_line_end();
    assert_eq!(cursor.current(), Some(b'\n'));
    cursor.inc_line();
    assert_eq!(cursor.current(), Some(b'n'));
    assert_eq!(cursor.line(), 2);
}

// === Properties ===

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Reference: fold terminator pairs the way the cursor does.
    fn reference_line_count(data: &[u8]) -> u32 {
        let mut line: u32 = 1;
        let mut i = 0;
        while i < data.len() {
            let b = data[i];
            if is_line_terminator(b) {
                line += 1;
                i += 1;
                if i < data.len() && is_line_terminator(data[i]) && data[i] != b {
                    i += 1;
                }
            } else {
                i += 1;
            }
        }
        line
    }

    proptest! {
        #[test]
        fn trickle_matches_slice_byte_stream(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let via_slice = drain(Cursor::new(bytes.as_slice()));
            let via_trickle = drain(Cursor::new(Trickle::new(&bytes)));
            prop_assert_eq!(via_slice, via_trickle);
        }

        #[test]
        fn line_count_matches_reference(
            bytes in proptest::collection::vec(
                prop_oneof![Just(b'\n'), Just(b'\r'), Just(b'a'), Just(b' ')],
                0..256,
            )
        ) {
            prop_assert_eq!(count_lines(&bytes), reference_line_count(&bytes));
        }
    }
}
