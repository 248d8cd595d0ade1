//! Text rendering of constant values.

use crate::value::{ConstType, ConstValue, Constant};
use gofold_hir::BasicType;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

/// Fractional digits used when a value appears inside an error message.
const MESSAGE_DIGITS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Fractional digits kept for non-terminating or very long decimals.
    pub float_digits: usize,
    /// Typed floats print as the shortest text that round-trips through
    /// their machine type.
    pub machine_floats: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            float_digits: 30,
            machine_floats: false,
        }
    }
}

pub fn format_constant(c: &Constant, opts: &FormatOptions) -> String {
    match (&c.value, c.ty) {
        (ConstValue::Float(r), ConstType::Typed(ty)) if opts.machine_floats => {
            format_machine_float(r, ty).unwrap_or_else(|| format_rational(r, opts.float_digits))
        }
        (value, _) => format_value(value, opts.float_digits),
    }
}

pub fn format_value(value: &ConstValue, float_digits: usize) -> String {
    match value {
        ConstValue::Bool(b) => b.to_string(),
        ConstValue::String(s) => quote(s),
        ConstValue::Int(i) => i.to_string(),
        ConstValue::Float(r) => format_rational(r, float_digits),
    }
}

/// Short rendering for diagnostics.
pub(crate) fn describe(value: &ConstValue) -> String {
    format_value(value, MESSAGE_DIGITS)
}

fn format_machine_float(r: &BigRational, ty: BasicType) -> Option<String> {
    let f = r.to_f64()?;
    let (plain, scientific) = match ty {
        BasicType::Float32 => {
            let f = f as f32;
            (f.to_string(), format!("{f:e}"))
        }
        BasicType::Float64 => (f.to_string(), format!("{f:e}")),
        _ => return None,
    };
    let (mantissa, exp) = scientific.split_once('e')?;
    let exp: i32 = exp.parse().ok()?;
    if f != 0.0 && !(-4..21).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return Some(format!("{mantissa}e{sign}{:02}", exp.abs()));
    }
    if plain.contains('.') {
        Some(plain)
    } else {
        Some(format!("{plain}.0"))
    }
}

/// Decimal text of an exact rational. Terminating expansions that fit in
/// `digits` fractional digits print exactly; others are rounded. Integral
/// values keep a `.0` suffix so they still read as floats.
pub fn format_rational(r: &BigRational, digits: usize) -> String {
    if r.is_integer() {
        return format!("{}.0", r.to_integer());
    }

    let negative = r.is_negative();
    let abs = r.abs();
    let frac_len = terminating_digits(abs.denom())
        .filter(|&n| n <= digits)
        .unwrap_or(digits);

    let scale = BigInt::from(10u32).pow(frac_len as u32);
    let scaled = (abs * BigRational::from_integer(scale)).round().to_integer();

    let mut text = scaled.to_string();
    if text.len() <= frac_len {
        text = format!("{}{text}", "0".repeat(frac_len + 1 - text.len()));
    }
    let (int_part, frac_part) = text.split_at(text.len() - frac_len);
    let frac_part = frac_part.trim_end_matches('0');
    let frac_part = if frac_part.is_empty() { "0" } else { frac_part };

    let sign = if negative && !(scaled.is_zero() && frac_part == "0") {
        "-"
    } else {
        ""
    };
    format!("{sign}{int_part}.{frac_part}")
}

/// Number of fractional digits of `1/denom` if its decimal expansion
/// terminates, i.e. `denom` has no prime factors besides 2 and 5.
fn terminating_digits(denom: &BigInt) -> Option<usize> {
    let two = BigInt::from(2u32);
    let five = BigInt::from(5u32);
    let mut d = denom.clone();
    let mut twos = 0usize;
    let mut fives = 0usize;

    while (&d % &two).is_zero() {
        d /= &two;
        twos += 1;
    }
    while (&d % &five).is_zero() {
        d /= &five;
        fives += 1;
    }

    (d == BigInt::from(1u32)).then_some(twos.max(fives))
}

/// Double-quoted Go string literal for `s`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        push_escaped(&mut out, c, '"');
    }
    out.push('"');
    out
}

/// Single-quoted Go rune literal for `c`.
pub fn quote_rune(c: char) -> String {
    let mut out = String::from('\'');
    push_escaped(&mut out, c, '\'');
    out.push('\'');
    out
}

fn push_escaped(out: &mut String, c: char, delimiter: char) {
    match c {
        '\u{07}' => out.push_str("\\a"),
        '\u{08}' => out.push_str("\\b"),
        '\u{0c}' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{0b}' => out.push_str("\\v"),
        '\\' => out.push_str("\\\\"),
        c if c == delimiter => {
            out.push('\\');
            out.push(c);
        }
        c if (c as u32) < 0x20 || c as u32 == 0x7f => {
            out.push_str(&format!("\\x{:02x}", c as u32));
        }
        c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
        c => out.push(c),
    }
}
