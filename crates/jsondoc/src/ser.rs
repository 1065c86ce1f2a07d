//! Canonical serialization of values to JSON text.
//!
//! Output is pure ASCII: every non-ASCII scalar is written as a `\uHHHH`
//! escape (a surrogate pair above U+FFFF), so the result is trivially
//! valid UTF-8 in any downstream context. Object members appear in the
//! map's sorted iteration order, making the rendering canonical for
//! structurally equal documents.

use crate::classify::{
    ESCAPE, ESC_BACKSLASH, ESC_CR, ESC_FF, ESC_LF, ESC_QUOTE, ESC_SLASH, ESC_TAB, ESC_UNICODE,
    ESC_VERBATIM,
};
use crate::num;
use crate::value::Value;

pub(crate) fn write_value(out: &mut String, value: &Value, pretty: bool, indent: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Long(x) => num::write_long(out, *x),
        Value::Float(x) => num::write_float(out, *x),
        Value::Double(x) => num::write_double(out, *x),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                    if pretty {
                        out.push(' ');
                    }
                }
                write_value(out, item, pretty, indent);
            }
            out.push(']');
        }
        Value::Object(map) => {
            // single-member objects stay on one line even when pretty
            let multiline = pretty && map.len() > 1;
            out.push('{');
            for (i, (key, member)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if multiline {
                    out.push('\n');
                    push_indent(out, indent + 1);
                }
                write_string(out, key);
                out.push(':');
                if pretty {
                    out.push(' ');
                }
                write_value(out, member, pretty, indent + 1);
            }
            if multiline {
                out.push('\n');
                push_indent(out, indent);
            }
            out.push('}');
        }
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

pub(crate) fn write_string(out: &mut String, s: &str) {
    out.push('"');
    escape_into(out, s.as_bytes());
    out.push('"');
}

/// Walks raw bytes, decoding multibyte sequences so they can be written
/// as `\uHHHH` escapes. A truncated continuation run falls back to
/// escaping the lead byte alone, so arbitrary bytes round-trip without
/// ever producing invalid output.
fn escape_into(out: &mut String, bytes: &[u8]) {
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        let mut x = u32::from(lead);
        i += 1;
        if lead >= 0xC0 {
            let ones = lead.leading_ones() as usize;
            let want = ones.saturating_sub(1);
            if i + want <= bytes.len() {
                let mut acc = x & (0x7F >> ones);
                let mut taken = 0;
                while taken < want {
                    let b = bytes[i + taken];
                    if b & 0xC0 != 0x80 {
                        break;
                    }
                    acc = acc << 6 | u32::from(b & 0x3F);
                    taken += 1;
                }
                if taken == want {
                    x = acc;
                    i += want;
                }
            }
        }
        let action = if x < 0x80 {
            ESCAPE[x as usize]
        } else {
            ESC_UNICODE
        };
        match action {
            ESC_VERBATIM => out.push(x as u8 as char),
            ESC_TAB => out.push_str("\\t"),
            ESC_LF => out.push_str("\\n"),
            ESC_CR => out.push_str("\\r"),
            ESC_FF => out.push_str("\\f"),
            ESC_BACKSLASH => out.push_str("\\\\"),
            ESC_SLASH => out.push_str("\\/"),
            ESC_QUOTE => out.push_str("\\\""),
            ESC_UNICODE => write_unicode_escape(out, x),
            _ => unreachable!("unhandled escape action"),
        }
    }
}

fn write_unicode_escape(out: &mut String, cp: u32) {
    if (0x10000..=0x10FFFF).contains(&cp) {
        let offset = cp - 0x10000;
        push_unit(out, 0xD800 + (offset >> 10));
        push_unit(out, 0xDC00 + (offset & 0x3FF));
    } else if cp <= 0xFFFF {
        push_unit(out, cp);
    } else {
        push_unit(out, 0xFFFD);
    }
}

fn push_unit(out: &mut String, unit: u32) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    out.push_str("\\u");
    out.push(DIGITS[(unit as usize >> 12) & 0xF] as char);
    out.push(DIGITS[(unit as usize >> 8) & 0xF] as char);
    out.push(DIGITS[(unit as usize >> 4) & 0xF] as char);
    out.push(DIGITS[unit as usize & 0xF] as char);
}
