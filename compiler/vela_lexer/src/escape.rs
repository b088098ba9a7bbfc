//! Escape-sequence helpers for short string literals.

/// Maximum code point a `\u{..}` escape accepts.
pub(crate) const MAX_UTF8_CODE: u32 = 0x7FFF_FFFF;

/// Byte value of a single-letter control escape, if `b` names one.
pub(crate) fn control_escape(b: u8) -> Option<u8> {
    match b {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'v' => Some(0x0b),
        _ => None,
    }
}

/// Encode `code` with the extended UTF-8 scheme: the standard encoding
/// generalized to sequences of up to six bytes, accepting every value up
/// to [`MAX_UTF8_CODE`] (surrogates and values beyond the Unicode range
/// included).
///
/// Returns the scratch array and the byte count; the encoding occupies
/// the *last* `n` bytes of the array.
#[allow(
    clippy::cast_possible_truncation,
    reason = "each cast keeps at most 7 low bits plus a fixed tag"
)]
pub(crate) fn utf8_escape(code: u32) -> ([u8; 6], usize) {
    debug_assert!(code <= MAX_UTF8_CODE);
    let mut buf = [0u8; 6];
    let mut n = 1;
    if code < 0x80 {
        buf[5] = code as u8;
    } else {
        let mut x = code;
        // Maximum value that still fits in the first byte for the
        // current sequence length.
        let mut first_max: u32 = 0x3f;
        loop {
            buf[6 - n] = 0x80 | (x & 0x3f) as u8;
            n += 1;
            x >>= 6;
            first_max >>= 1;
            if x <= first_max {
                break;
            }
        }
        buf[6 - n] = ((!first_max << 1) | x) as u8;
    }
    (buf, n)
}
