//! Decoding of Go literal tokens into exact values.

use num_bigint::BigInt;
use num_rational::BigRational;
use thiserror::Error;

/// Largest decimal or binary exponent accepted in a float literal.
const MAX_EXPONENT: i64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("invalid integer literal {0}")]
    InvalidInt(String),

    #[error("invalid floating-point literal {0}")]
    InvalidFloat(String),

    #[error("exponent too large in {0}")]
    ExponentTooLarge(String),

    #[error("unknown escape sequence \\{0}")]
    UnknownEscape(char),

    #[error("invalid escape sequence: {0}")]
    InvalidEscape(String),

    #[error("rune literal must contain exactly one character")]
    RuneLength,

    #[error("unterminated literal")]
    Unterminated,
}

type Result<T> = std::result::Result<T, LiteralError>;

/// Parse an integer literal: decimal, `0x`, `0o`, legacy `0` octal or `0b`.
pub fn parse_int(text: &str) -> Result<BigInt> {
    let cleaned = text.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();

    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };

    BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| LiteralError::InvalidInt(text.to_string()))
}

/// Parse a float literal exactly, without going through `f64`.
pub fn parse_float(text: &str) -> Result<BigRational> {
    let cleaned = text.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();

    if let Some(rest) = lower.strip_prefix("0x") {
        parse_hex_float(rest, text)
    } else {
        parse_decimal_float(&lower, text)
    }
}

fn parse_decimal_float(s: &str, original: &str) -> Result<BigRational> {
    let invalid = || LiteralError::InvalidFloat(original.to_string());

    let (mantissa, exp) = match s.split_once('e') {
        Some((m, e)) => (m, parse_exponent(e, original)?),
        None => (s, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let digits = format!("{int_part}{frac_part}");
    let numer = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
    let scale = exp - frac_part.len() as i64;
    Ok(scale_by(numer, 10, scale))
}

fn parse_hex_float(s: &str, original: &str) -> Result<BigRational> {
    let invalid = || LiteralError::InvalidFloat(original.to_string());

    // Hexadecimal floats always carry a binary exponent.
    let (mantissa, exp) = s.split_once('p').ok_or_else(invalid)?;
    let exp = parse_exponent(exp, original)?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let digits = format!("{int_part}{frac_part}");
    let numer = BigInt::parse_bytes(digits.as_bytes(), 16).ok_or_else(invalid)?;
    let scale = exp - 4 * frac_part.len() as i64;
    Ok(scale_by(numer, 2, scale))
}

fn parse_exponent(e: &str, original: &str) -> Result<i64> {
    let exp: i64 = e
        .parse()
        .map_err(|_| LiteralError::InvalidFloat(original.to_string()))?;
    if exp.abs() > MAX_EXPONENT {
        return Err(LiteralError::ExponentTooLarge(original.to_string()));
    }
    Ok(exp)
}

/// `numer * base^scale` as an exact rational.
fn scale_by(numer: BigInt, base: u32, scale: i64) -> BigRational {
    let factor = BigInt::from(base).pow(scale.unsigned_abs() as u32);
    if scale >= 0 {
        BigRational::from_integer(numer * factor)
    } else {
        BigRational::new(numer, factor)
    }
}

/// Decode an interpreted string literal including its quotes.
pub fn unquote_string(text: &str) -> Result<String> {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or(LiteralError::Unterminated)?;
    let bytes = unescape(inner, '"')?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode a raw (backquoted) string literal; carriage returns are dropped.
pub fn unquote_raw(text: &str) -> Result<String> {
    let inner = text
        .strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .ok_or(LiteralError::Unterminated)?;
    Ok(inner.replace('\r', ""))
}

/// Decode a rune literal including its quotes.
pub fn unquote_rune(text: &str) -> Result<char> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .ok_or(LiteralError::Unterminated)?;

    let decoded = if inner.starts_with('\\') {
        let bytes = unescape(inner, '\'')?;
        match std::str::from_utf8(&bytes) {
            Ok(s) => s.to_string(),
            // A lone \xNN or \NNN byte is the code point of that value.
            Err(_) if bytes.len() == 1 => char::from(bytes[0]).to_string(),
            Err(_) => return Err(LiteralError::RuneLength),
        }
    } else {
        inner.to_string()
    };

    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(LiteralError::RuneLength),
    }
}

fn unescape(s: &str, quote: char) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let esc = chars.next().ok_or(LiteralError::Unterminated)?;
        match esc {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            '\\' => out.push(b'\\'),
            c if c == quote => out.push(c as u8),
            'x' => {
                let value = take_digits(&mut chars, 2, 16)?;
                out.push(value as u8);
            }
            '0'..='7' => {
                let rest = take_digits(&mut chars, 2, 8)?;
                let value = (esc as u32 - '0' as u32) * 64 + rest;
                if value > 255 {
                    return Err(LiteralError::InvalidEscape(format!("octal value {value} > 255")));
                }
                out.push(value as u8);
            }
            'u' | 'U' => {
                let len = if esc == 'u' { 4 } else { 8 };
                let value = take_digits(&mut chars, len, 16)?;
                let c = char::from_u32(value).ok_or_else(|| {
                    LiteralError::InvalidEscape(format!("invalid Unicode code point U+{value:04X}"))
                })?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            other => return Err(LiteralError::UnknownEscape(other)),
        }
    }

    Ok(out)
}

fn take_digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Result<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        let d = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or_else(|| LiteralError::InvalidEscape(format!("expected {count} base-{radix} digits")))?;
        value = value * radix + d;
    }
    Ok(value)
}
