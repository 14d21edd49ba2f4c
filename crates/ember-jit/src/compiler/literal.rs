//! Constant payload decoding
//!
//! Integer tags take the leading decimal prefix of the payload (`"12abc"`
//! is 12, anything without digits is 0). Doubles take the leading float
//! prefix the same way. Strings are standard-alphabet base64.

use base64::Engine;

use crate::error::{JitError, JitResult};
use crate::graph::ConstantType;

/// A decoded constant, ready for a target to render
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Decode an encoded constant payload according to its type tag
pub fn decode(ty: ConstantType, encoded: &str) -> JitResult<Literal> {
    match ty {
        ConstantType::Bool => Ok(Literal::Int(match encoded.trim() {
            "true" => 1,
            "false" => 0,
            other => parse_int_prefix(other),
        })),
        ConstantType::Long | ConstantType::Numeric => Ok(Literal::Int(parse_int_prefix(encoded))),
        ConstantType::Double => Ok(Literal::Float(parse_float_prefix(encoded))),
        ConstantType::String => decode_string(encoded).map(Literal::Str),
    }
}

/// Base64-decode a string payload into UTF-8 text
pub fn decode_string(encoded: &str) -> JitResult<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| JitError::InvalidEncoding { tag: "string".to_string(), reason: e.to_string() })?;
    String::from_utf8(bytes)
        .map_err(|e| JitError::InvalidEncoding { tag: "string".to_string(), reason: e.to_string() })
}

/// Backslash-escape quotes, backslashes and NUL bytes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn parse_int_prefix(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(v) => v,
            // saturate
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }
    if negative {
        -value
    } else {
        value
    }
}

fn parse_float_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_tags() {
        assert_eq!(decode(ConstantType::Long, "42").unwrap(), Literal::Int(42));
        assert_eq!(decode(ConstantType::Numeric, " -17xyz").unwrap(), Literal::Int(-17));
        assert_eq!(decode(ConstantType::Long, "abc").unwrap(), Literal::Int(0));
        assert_eq!(decode(ConstantType::Bool, "1").unwrap(), Literal::Int(1));
        assert_eq!(decode(ConstantType::Bool, "").unwrap(), Literal::Int(0));
        assert_eq!(decode(ConstantType::Bool, "true").unwrap(), Literal::Int(1));
        assert_eq!(
            decode(ConstantType::Long, "99999999999999999999").unwrap(),
            Literal::Int(i64::MAX)
        );
    }

    #[test]
    fn test_double_tag() {
        assert_eq!(decode(ConstantType::Double, "1.5").unwrap(), Literal::Float(1.5));
        assert_eq!(decode(ConstantType::Double, "2.5e2kg").unwrap(), Literal::Float(250.0));
        assert_eq!(decode(ConstantType::Double, "3e").unwrap(), Literal::Float(3.0));
        assert_eq!(decode(ConstantType::Double, ".").unwrap(), Literal::Float(0.0));
        assert_eq!(decode(ConstantType::Double, "-.25").unwrap(), Literal::Float(-0.25));
    }

    #[test]
    fn test_string_tag() {
        assert_eq!(
            decode(ConstantType::String, "aXQncw==").unwrap(),
            Literal::Str("it's".to_string())
        );
        let err = decode(ConstantType::String, "not base64!").unwrap_err();
        assert!(matches!(err, JitError::InvalidEncoding { .. }));
        // 0xFF 0xFE is not UTF-8
        let err = decode(ConstantType::String, "//4=").unwrap_err();
        assert!(matches!(err, JitError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("it's"), "it\\'s");
        assert_eq!(escape(r#"say "hi" \o/"#), r#"say \"hi\" \\o/"#);
        assert_eq!(escape("a\0b"), "a\\0b");
        assert_eq!(escape("plain"), "plain");
    }
}
