//! Numeric literal conversion.
//!
//! The scanner hands over the complete saved lexeme; conversion decides
//! integer versus float. A literal is an integer only when it is a bare
//! digit run: decimal runs that overflow `i64` fall back to the float
//! reading, while hexadecimal integer literals wrap modulo 2^64. Any
//! reading that leaves part of the lexeme unconsumed is malformed.

/// A converted numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeral {
    Int(i64),
    Float(f64),
}

/// Convert a saved lexeme, or `None` when it is malformed.
pub(crate) fn parse(lexeme: &[u8]) -> Option<Numeral> {
    if let Some(i) = int_value(lexeme) {
        return Some(Numeral::Int(i));
    }
    float_value(lexeme).map(Numeral::Float)
}

/// Value of an ASCII hex digit.
pub(crate) fn hex_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some(u32::from(b - b'0')),
        b'a'..=b'f' => Some(u32::from(b - b'a') + 10),
        b'A'..=b'F' => Some(u32::from(b - b'A') + 10),
        _ => None,
    }
}

/// Strip a `0x`/`0X` prefix.
fn hex_prefix(lexeme: &[u8]) -> Option<&[u8]> {
    match lexeme {
        [b'0', b'x' | b'X', rest @ ..] => Some(rest),
        _ => None,
    }
}

fn int_value(lexeme: &[u8]) -> Option<i64> {
    if let Some(digits) = hex_prefix(lexeme) {
        if digits.is_empty() {
            return None;
        }
        // Hex integers wrap on overflow instead of promoting to float.
        let mut acc: u64 = 0;
        for &b in digits {
            let d = hex_value(b)?;
            acc = acc.wrapping_mul(16).wrapping_add(u64::from(d));
        }
        #[allow(
            clippy::cast_possible_wrap,
            reason = "two's-complement reinterpretation is the wrap-around reading"
        )]
        Some(acc as i64)
    } else {
        if lexeme.is_empty() {
            return None;
        }
        let mut acc: i64 = 0;
        for &b in lexeme {
            if !b.is_ascii_digit() {
                return None;
            }
            // Overflow falls through to the float reading.
            acc = acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
        }
        Some(acc)
    }
}

fn float_value(lexeme: &[u8]) -> Option<f64> {
    if let Some(rest) = hex_prefix(lexeme) {
        hex_float_value(rest)
    } else {
        // The scanner only saves [0-9a-zA-Z.+-]; within that, the
        // standard library float grammar matches ours.
        std::str::from_utf8(lexeme).ok()?.parse::<f64>().ok()
    }
}

/// Significand digits read before further ones only adjust the exponent.
const MAX_SIG_DIGITS: u32 = 30;

/// Hex float conversion: mantissa digits accumulate in base 16, a `p`
/// exponent is a power of two. `digits` is the lexeme after the `0x`
/// prefix; the whole slice must be consumed.
fn hex_float_value(digits: &[u8]) -> Option<f64> {
    let mut mantissa: f64 = 0.0;
    let mut exp: i32 = 0;
    let mut sig_digits: u32 = 0;
    let mut leading_zeros: u32 = 0;
    let mut seen_dot = false;
    let mut i = 0;

    while i < digits.len() {
        let b = digits[i];
        if b == b'.' {
            if seen_dot {
                return None;
            }
            seen_dot = true;
        } else if let Some(d) = hex_value(b) {
            if sig_digits == 0 && d == 0 {
                leading_zeros += 1;
            } else {
                sig_digits += 1;
                if sig_digits <= MAX_SIG_DIGITS {
                    mantissa = mantissa.mul_add(16.0, f64::from(d));
                } else {
                    exp = exp.saturating_add(1);
                }
            }
            if seen_dot {
                exp = exp.saturating_sub(1);
            }
        } else {
            break;
        }
        i += 1;
    }
    if sig_digits + leading_zeros == 0 {
        return None;
    }
    // Each mantissa digit is 4 bits.
    exp = exp.saturating_mul(4);

    if i < digits.len() && (digits[i] == b'p' || digits[i] == b'P') {
        i += 1;
        let mut negative = false;
        if i < digits.len() && (digits[i] == b'+' || digits[i] == b'-') {
            negative = digits[i] == b'-';
            i += 1;
        }
        let mut exp1: i32 = 0;
        let mut any = false;
        while i < digits.len() && digits[i].is_ascii_digit() {
            exp1 = exp1
                .saturating_mul(10)
                .saturating_add(i32::from(digits[i] - b'0'));
            any = true;
            i += 1;
        }
        if !any {
            return None;
        }
        if negative {
            exp1 = -exp1;
        }
        exp = exp.saturating_add(exp1);
    }
    if i != digits.len() {
        return None;
    }
    Some(scale_pow2(mantissa, exp))
}

/// `value * 2^exp`, scaling in two steps when the factor alone would
/// overflow or underflow the double range.
fn scale_pow2(value: f64, exp: i32) -> f64 {
    if (-1021..=1021).contains(&exp) {
        value * 2f64.powi(exp)
    } else {
        let half = exp / 2;
        value * 2f64.powi(half) * 2f64.powi(exp - half)
    }
}
