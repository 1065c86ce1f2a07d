//! Decimal conversion: shortest round-trip float formatting and partial
//! double parsing with consumed-count reporting.
//!
//! Formatting takes the shortest digit run for the value (computed by
//! `ryu` at the value's own width) and lays it out with a fixed policy:
//! plain decimal notation while the decimal exponent stays in (-6, 21],
//! scientific notation otherwise with an explicit sign on the exponent.
//! Zero is unique (`-0.0` prints `0`), infinite magnitudes print the
//! sentinel `1e5000`, and NaN prints `null`.

/// Decimal exponents above this render in scientific notation.
const DECIMAL_HIGH: i32 = 21;
/// Decimal exponents at or below this render in scientific notation.
const DECIMAL_LOW: i32 = -6;

pub(crate) fn write_long(out: &mut String, value: i64) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(value));
}

pub(crate) fn write_double(out: &mut String, value: f64) {
    if value.is_nan() {
        out.push_str("null");
    } else if value.is_infinite() {
        out.push_str(if value < 0.0 { "-1e5000" } else { "1e5000" });
    } else {
        let mut buf = ryu::Buffer::new();
        write_shortest(out, buf.format_finite(value));
    }
}

pub(crate) fn write_float(out: &mut String, value: f32) {
    if value.is_nan() {
        out.push_str("null");
    } else if value.is_infinite() {
        out.push_str(if value < 0.0 { "-1e5000" } else { "1e5000" });
    } else {
        let mut buf = ryu::Buffer::new();
        write_shortest(out, buf.format_finite(value));
    }
}

/// Re-lays a `ryu` rendering (`-12.5`, `3e17`, `1.5e-9`, ...) under the
/// notation policy above. The digit run is shortest already; only the
/// placement of the decimal point changes.
fn write_shortest(out: &mut String, formatted: &str) {
    let (negative, rest) = match formatted.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, formatted),
    };
    let (mantissa, exp) = match rest.split_once(['e', 'E']) {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (rest, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };

    let mut digits: Vec<u8> = Vec::with_capacity(int_part.len() + frac_part.len());
    digits.extend_from_slice(int_part.as_bytes());
    digits.extend_from_slice(frac_part.as_bytes());
    let mut point = int_part.len() as i32 + exp;

    let mut start = 0;
    while start < digits.len() && digits[start] == b'0' {
        start += 1;
        point -= 1;
    }
    digits.drain(..start);
    while digits.last() == Some(&b'0') {
        digits.pop();
    }

    if digits.is_empty() {
        out.push('0');
        return;
    }
    if negative {
        out.push('-');
    }
    let n = digits.len() as i32;
    if point > DECIMAL_LOW && point <= DECIMAL_HIGH {
        if point <= 0 {
            out.push_str("0.");
            for _ in point..0 {
                out.push('0');
            }
            push_digits(out, &digits);
        } else if point >= n {
            push_digits(out, &digits);
            for _ in n..point {
                out.push('0');
            }
        } else {
            push_digits(out, &digits[..point as usize]);
            out.push('.');
            push_digits(out, &digits[point as usize..]);
        }
    } else {
        push_digits(out, &digits[..1]);
        if n > 1 {
            out.push('.');
            push_digits(out, &digits[1..]);
        }
        let exponent = point - 1;
        if exponent < 0 {
            out.push_str("e-");
            write_long(out, i64::from(-exponent));
        } else {
            out.push_str("e+");
            write_long(out, i64::from(exponent));
        }
    }
}

fn push_digits(out: &mut String, digits: &[u8]) {
    for &d in digits {
        out.push(d as char);
    }
}

/// Parses a leading double out of `bytes`, tolerating leading ASCII
/// whitespace, case-insensitive `Infinity`/`NaN`, and arbitrary trailing
/// junk. Returns the value and how many bytes were consumed; junk input
/// consumes zero. Underflow gives 0 and overflow gives an infinity.
pub(crate) fn parse_partial_double(bytes: &[u8]) -> (f64, usize) {
    let mut i = 0;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C) {
        i += 1;
    }
    let mut negative = false;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        negative = bytes[i] == b'-';
        i += 1;
    }
    if matches_ignore_case(&bytes[i..], b"infinity") {
        let value = if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return (value, i + 8);
    }
    if matches_ignore_case(&bytes[i..], b"nan") {
        return (f64::NAN, i + 3);
    }

    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digit_seen = i > digits_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            digit_seen = true;
            i += 1;
        }
    }
    if !digit_seen {
        return (0.0, 0);
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_digits = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        // an exponent marker without digits is trailing junk, not ours
        if j > exp_digits {
            i = j;
        }
    }

    let span = &bytes[digits_start..i];
    let mut text = String::with_capacity(span.len() + 1);
    if negative {
        text.push('-');
    }
    for &b in span {
        text.push(b as char);
    }
    match text.parse::<f64>() {
        Ok(value) => (value, i),
        Err(_) => (0.0, 0),
    }
}

fn matches_ignore_case(bytes: &[u8], word: &[u8]) -> bool {
    bytes.len() >= word.len()
        && bytes
            .iter()
            .zip(word)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

#[cfg(test)]
mod tests {
    use super::{parse_partial_double, write_double, write_float, write_long};
    use test_case::test_case;

    fn double(value: f64) -> String {
        let mut out = String::new();
        write_double(&mut out, value);
        out
    }

    #[test_case(0.0, "0")]
    #[test_case(-0.0, "0"; "negative zero is unique")]
    #[test_case(0.1, "0.1")]
    #[test_case(3.14, "3.14")]
    #[test_case(-9876.54321, "-9876.54321")]
    #[test_case(10.0, "10")]
    #[test_case(1e20, "100000000000000000000")]
    #[test_case(1e21, "1e+21")]
    #[test_case(0.000001, "0.000001")]
    #[test_case(0.0000001, "1e-7")]
    #[test_case(-1.2312312312312312e29, "-1.2312312312312312e+29")]
    #[test_case(9.223372036854776e18, "9223372036854776000")]
    #[test_case(f64::INFINITY, "1e5000")]
    #[test_case(f64::NEG_INFINITY, "-1e5000")]
    #[test_case(f64::NAN, "null")]
    fn double_layout(value: f64, expected: &str) {
        assert_eq!(double(value), expected);
    }

    #[test]
    fn doubles_round_trip() {
        for value in [
            1.0 / 3.0,
            f64::MAX,
            f64::MIN_POSITIVE,
            2.2250738585072014e-308,
            123456789.123456789,
        ] {
            let text = double(value);
            assert_eq!(text.parse::<f64>().unwrap(), value, "{text}");
        }
    }

    #[test]
    fn float_stays_single_precision() {
        let mut out = String::new();
        write_float(&mut out, 0.1f32);
        assert_eq!(out, "0.1");
        out.clear();
        write_float(&mut out, 16777217.0f32);
        assert_eq!(out.parse::<f32>().unwrap(), 16777217.0f32);
    }

    #[test]
    fn long_formatting() {
        let mut out = String::new();
        write_long(&mut out, i64::MIN);
        assert_eq!(out, "-9223372036854775808");
    }

    #[test_case(b"123.456]", 123.456, 7)]
    #[test_case(b"-123.123foo", -123.123, 8)]
    #[test_case(b"0e]", 0.0, 1; "bare exponent marker is junk")]
    #[test_case(b"1e0e", 1.0, 3)]
    #[test_case(b"1eE2", 1.0, 1)]
    #[test_case(b"1.0e-", 1.0, 3)]
    #[test_case(b"  42", 42.0, 4; "leading spaces count as consumed")]
    #[test_case(b"junk", 0.0, 0)]
    #[test_case(b"", 0.0, 0)]
    #[test_case(b".5", 0.5, 2)]
    #[test_case(b"1.", 1.0, 2)]
    fn partial_parse(input: &[u8], value: f64, consumed: usize) {
        let (got, used) = parse_partial_double(input);
        assert_eq!(used, consumed);
        if consumed > 0 {
            assert_eq!(got, value);
        }
    }

    #[test]
    fn partial_parse_special_words() {
        let (v, n) = parse_partial_double(b"-Infinity tail");
        assert_eq!(v, f64::NEG_INFINITY);
        assert_eq!(n, 9);
        let (v, n) = parse_partial_double(b"NAN");
        assert!(v.is_nan());
        assert_eq!(n, 3);
    }

    #[test]
    fn partial_parse_overflow_underflow() {
        let (v, n) = parse_partial_double(b"1.5e+9999");
        assert_eq!(v, f64::INFINITY);
        assert_eq!(n, 9);
        let (v, _) = parse_partial_double(b"123.456e-789");
        assert_eq!(v, 0.0);
    }
}
