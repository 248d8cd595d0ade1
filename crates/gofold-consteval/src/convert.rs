//! Representability checks and conversions between constant types.

use crate::error::ConstErrorKind;
use crate::format::describe;
use crate::options::{EvalOptions, Mode};
use crate::value::{ConstType, ConstValue, Constant, UntypedKind};
use gofold_hir::BasicType;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Inclusive value range of an integer type.
pub fn int_range(ty: BasicType, int_size: u32) -> Option<(BigInt, BigInt)> {
    let bits = ty.bit_size(int_size)? as usize;
    if ty.is_signed() {
        let half = BigInt::one() << (bits - 1);
        Some((-half.clone(), half - BigInt::one()))
    } else if ty.is_unsigned() {
        Some((BigInt::from(0), (BigInt::one() << bits) - BigInt::one()))
    } else {
        None
    }
}

/// Check that a numeric value fits `ty` and return it in `ty`'s
/// representation. In Go mode floats are rounded to the type's precision.
pub fn represent(
    value: &ConstValue,
    from: ConstType,
    ty: BasicType,
    opts: &EvalOptions,
) -> Result<ConstValue, ConstErrorKind> {
    if ty.is_integer() {
        let int = value.to_integer().ok_or_else(|| ConstErrorKind::Truncated {
            value: describe(value),
            from: from.to_string(),
            to: ty.to_string(),
        })?;
        let (min, max) = int_range(ty, opts.int_size).ok_or_else(|| cannot_convert(value, from, ty))?;
        if int < min || int > max {
            return Err(ConstErrorKind::Overflows {
                value: int.to_string(),
                ty: ty.to_string(),
            });
        }
        return Ok(ConstValue::Int(int));
    }

    if ty.is_float() {
        let exact = value.to_rational().ok_or_else(|| cannot_convert(value, from, ty))?;
        let overflows = || ConstErrorKind::Overflows {
            value: describe(value),
            ty: ty.to_string(),
        };
        let rounded = round_float(&exact, ty).ok_or_else(overflows)?;
        let folded = if opts.rounds_floats() { rounded } else { exact };
        return Ok(ConstValue::Float(folded));
    }

    Err(cannot_convert(value, from, ty))
}

/// Round `r` to the nearest value of float type `ty`, ties to even, with
/// gradual underflow. `None` when the result is beyond the largest finite
/// value of `ty`.
pub(crate) fn round_float(r: &BigRational, ty: BasicType) -> Option<BigRational> {
    if r.is_zero() {
        return Some(BigRational::zero());
    }
    let (precision, min_exp, max_exp): (i64, i64, i64) = match ty {
        BasicType::Float32 => (24, -149, 127),
        _ => (53, -1074, 1023),
    };
    let num = r.numer().abs();
    let den = r.denom().abs();

    // Pick exp so that num / (den * 2^exp) has exactly `precision` integer bits.
    let mut exp = num.bits() as i64 - den.bits() as i64 - precision;
    if quotient(&num, &den, exp).bits() as i64 > precision {
        exp += 1;
    }
    let exp = exp.max(min_exp);

    let (n, d) = scaled(&num, &den, exp);
    let mut q = &n / &d;
    let twice_rem = (&n - &q * &d) << 1usize;
    if twice_rem > d || (twice_rem == d && (&q & BigInt::one()).is_one()) {
        q += 1u32;
    }

    let max_finite = ((BigInt::one() << precision as usize) - 1u32) << (max_exp + 1 - precision) as usize;
    let magnitude = if exp >= 0 {
        BigRational::from_integer(q << exp as usize)
    } else {
        BigRational::new(q, BigInt::one() << (-exp) as usize)
    };
    if magnitude > BigRational::from_integer(max_finite) {
        return None;
    }
    Some(if r.is_negative() { -magnitude } else { magnitude })
}

fn scaled(num: &BigInt, den: &BigInt, exp: i64) -> (BigInt, BigInt) {
    if exp >= 0 {
        (num.clone(), den << exp as usize)
    } else {
        (num << (-exp) as usize, den.clone())
    }
}

fn quotient(num: &BigInt, den: &BigInt, exp: i64) -> BigInt {
    let (n, d) = scaled(num, den, exp);
    n / d
}

fn cannot_convert(value: &ConstValue, from: ConstType, to: BasicType) -> ConstErrorKind {
    ConstErrorKind::CannotConvert {
        value: describe(value),
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// Implicit conversion, as when a constant initializes a typed declaration
/// or meets a typed operand.
pub fn convert_implicit(
    c: &Constant,
    target: BasicType,
    opts: &EvalOptions,
) -> Result<Constant, ConstErrorKind> {
    if c.ty == ConstType::Typed(target) {
        return Ok(c.clone());
    }

    let compatible = match target {
        BasicType::Bool => c.ty == ConstType::Untyped(UntypedKind::Bool),
        BasicType::String => c.ty == ConstType::Untyped(UntypedKind::String),
        _ => c.ty.is_numeric() && (c.ty.is_untyped() || opts.mode == Mode::Lenient),
    };
    if !compatible {
        return Err(cannot_convert(&c.value, c.ty, target));
    }

    let value = if target.is_numeric() {
        represent(&c.value, c.ty, target, opts)?
    } else {
        c.value.clone()
    };
    Ok(Constant::new(value, ConstType::Typed(target)))
}

/// Explicit conversion `T(x)`.
pub fn convert_explicit(
    c: &Constant,
    target: BasicType,
    opts: &EvalOptions,
) -> Result<Constant, ConstErrorKind> {
    let value = match target {
        BasicType::Bool if c.ty.is_bool() => c.value.clone(),
        BasicType::String if c.ty.is_string() => c.value.clone(),
        // string(65) is "A"; out-of-range code points become U+FFFD.
        BasicType::String if c.ty.is_integer() => {
            let c = c
                .value
                .to_integer()
                .and_then(|i| i.to_u32())
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            ConstValue::String(c.to_string())
        }
        t if t.is_numeric() && c.ty.is_numeric() => represent(&c.value, c.ty, t, opts)?,
        _ => return Err(cannot_convert(&c.value, c.ty, target)),
    };
    Ok(Constant::new(value, ConstType::Typed(target)))
}

/// Move an untyped numeric value to a larger untyped kind.
pub(crate) fn widen_untyped(value: ConstValue, kind: UntypedKind) -> ConstValue {
    match (kind, value) {
        (UntypedKind::Float, ConstValue::Int(i)) => ConstValue::Float(BigRational::from_integer(i)),
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_int_ranges() {
        let (min, max) = int_range(BasicType::Int8, 64).unwrap();
        assert_eq!((min, max), (BigInt::from(-128), BigInt::from(127)));
        let (_, max) = int_range(BasicType::Uint, 32).unwrap();
        assert_eq!(max, BigInt::from(u32::MAX));
        assert!(int_range(BasicType::Float64, 64).is_none());
    }

    #[test]
    fn test_untyped_int_to_float64() {
        let opts = EvalOptions::default();
        let c = convert_implicit(&Constant::untyped_int(3), BasicType::Float64, &opts).unwrap();
        assert_eq!(c.value, ConstValue::Float(ratio(3, 1)));
        assert_eq!(c.ty, ConstType::Typed(BasicType::Float64));
    }

    #[test]
    fn test_integral_float_to_int() {
        let opts = EvalOptions::default();
        let c = convert_implicit(&Constant::untyped_float(ratio(4, 2)), BasicType::Int, &opts).unwrap();
        assert_eq!(c.value, ConstValue::Int(BigInt::from(2)));

        let err = convert_implicit(&Constant::untyped_float(ratio(3, 2)), BasicType::Int, &opts)
            .unwrap_err();
        assert!(matches!(err, ConstErrorKind::Truncated { .. }));
    }

    #[test]
    fn test_overflow() {
        let opts = EvalOptions::default();
        let err = convert_implicit(&Constant::untyped_int(300), BasicType::Int8, &opts).unwrap_err();
        assert_eq!(err.to_string(), "constant 300 overflows int8");

        let err = convert_implicit(&Constant::untyped_int(-1), BasicType::Uint, &opts).unwrap_err();
        assert_eq!(err.to_string(), "constant -1 overflows uint");
    }

    #[test]
    fn test_float_rounding_depends_on_mode() {
        let tenth = Constant::untyped_float(ratio(1, 10));

        let lenient = convert_implicit(&tenth, BasicType::Float64, &EvalOptions::default()).unwrap();
        assert_eq!(lenient.value, ConstValue::Float(ratio(1, 10)));

        let go = convert_implicit(&tenth, BasicType::Float64, &EvalOptions::go()).unwrap();
        assert_eq!(go.value, ConstValue::Float(BigRational::from_float(0.1f64).unwrap()));
        assert_ne!(go.value, lenient.value);
    }

    fn pow2(e: i64) -> BigRational {
        if e >= 0 {
            BigRational::from_integer(BigInt::one() << e as usize)
        } else {
            BigRational::new(BigInt::one(), BigInt::one() << (-e) as usize)
        }
    }

    #[test]
    fn test_float32_rounds_once_from_exact_value() {
        // Rounding through float64 first lands on a tie and goes down to 1.
        let r = BigRational::one() + pow2(-24) + pow2(-60);
        assert_eq!(round_float(&r, BasicType::Float32), Some(BigRational::one() + pow2(-23)));

        let tie = BigRational::one() + pow2(-24);
        assert_eq!(round_float(&tie, BasicType::Float32), Some(BigRational::one()));
        let odd_tie = BigRational::one() + pow2(-23) + pow2(-24);
        assert_eq!(round_float(&odd_tie, BasicType::Float32), Some(BigRational::one() + pow2(-22)));
    }

    #[test]
    fn test_round_float_matches_machine_values() {
        let tenth = ratio(1, 10);
        assert_eq!(
            round_float(&tenth, BasicType::Float64),
            BigRational::from_float(0.1f64)
        );
        assert_eq!(
            round_float(&tenth, BasicType::Float32),
            BigRational::from_float(0.1f32 as f64)
        );
        assert_eq!(
            round_float(&-ratio(1, 3), BasicType::Float64),
            BigRational::from_float(-1.0f64 / 3.0)
        );
    }

    #[test]
    fn test_round_float_limits() {
        let max32 = BigRational::from_float(f32::MAX as f64).unwrap();
        assert_eq!(round_float(&max32, BasicType::Float32), Some(max32.clone()));
        assert_eq!(round_float(&(max32 * ratio(2, 1)), BasicType::Float32), None);

        let smallest = BigRational::from_float(f64::from_bits(1)).unwrap();
        assert_eq!(round_float(&smallest, BasicType::Float64), Some(smallest.clone()));
        assert_eq!(
            round_float(&(smallest / BigRational::from_integer(BigInt::from(4))), BasicType::Float64),
            Some(BigRational::zero())
        );
    }

    #[test]
    fn test_float_overflow() {
        let huge = Constant::untyped_float(BigRational::from_integer(BigInt::one() << 200usize));
        let opts = EvalOptions::default();
        assert!(convert_implicit(&huge, BasicType::Float64, &opts).is_ok());
        assert!(matches!(
            convert_implicit(&huge, BasicType::Float32, &opts),
            Err(ConstErrorKind::Overflows { .. })
        ));
    }

    #[test]
    fn test_string_and_bool_need_matching_kinds() {
        let opts = EvalOptions::default();
        assert!(convert_implicit(&Constant::untyped_int(1), BasicType::String, &opts).is_err());
        assert!(convert_implicit(&Constant::untyped_string("x"), BasicType::Int, &opts).is_err());
        assert!(convert_implicit(&Constant::untyped_bool(true), BasicType::Bool, &opts).is_ok());
    }

    #[test]
    fn test_typed_to_other_type_depends_on_mode() {
        let size = Constant::new(ConstValue::Int(BigInt::from(1024)), ConstType::Typed(BasicType::Int));
        assert!(convert_implicit(&size, BasicType::Float64, &EvalOptions::default()).is_ok());
        assert!(matches!(
            convert_implicit(&size, BasicType::Float64, &EvalOptions::go()),
            Err(ConstErrorKind::CannotConvert { .. })
        ));
        assert!(convert_explicit(&size, BasicType::Float64, &EvalOptions::go()).is_ok());
    }

    #[test]
    fn test_explicit_string_of_rune() {
        let opts = EvalOptions::default();
        let a = convert_explicit(&Constant::untyped_int(65), BasicType::String, &opts).unwrap();
        assert_eq!(a.value, ConstValue::String("A".to_string()));
        let bad = convert_explicit(&Constant::untyped_int(-1), BasicType::String, &opts).unwrap();
        assert_eq!(bad.value, ConstValue::String("\u{FFFD}".to_string()));
    }
}
