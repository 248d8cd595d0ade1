//! Constant operators over exact values.

use crate::convert::{convert_implicit, represent, widen_untyped};
use crate::error::ConstErrorKind;
use crate::format::describe;
use crate::options::{EvalOptions, Mode};
use crate::value::{ConstType, ConstValue, Constant, UntypedKind};
use gofold_hir::{BinOp, UnaryOp};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

type OpResult = Result<Constant, ConstErrorKind>;

pub fn binary(op: BinOp, lhs: &Constant, rhs: &Constant, opts: &EvalOptions) -> OpResult {
    if op.is_logical() {
        return logical(op, lhs, rhs);
    }
    if op.is_shift() {
        return shift(op, lhs, rhs, opts);
    }

    let (ty, l, r) = unify(lhs, rhs, opts)?;

    if op.is_comparison() {
        return compare(op, ty, &l, &r).map(Constant::untyped_bool);
    }

    let value = arith(op, ty, l, r)?;
    finish(value, ty, opts)
}

pub fn unary(op: UnaryOp, operand: &Constant, opts: &EvalOptions) -> OpResult {
    let ty = operand.ty;
    let invalid = || ConstErrorKind::InvalidOperation {
        op: op.token().to_string(),
        ty: ty.to_string(),
    };

    let value = match (op, &operand.value) {
        (UnaryOp::Pos, ConstValue::Int(_) | ConstValue::Float(_)) => operand.value.clone(),
        (UnaryOp::Neg, ConstValue::Int(i)) => ConstValue::Int(-i),
        (UnaryOp::Neg, ConstValue::Float(r)) => ConstValue::Float(-r),
        (UnaryOp::Not, ConstValue::Bool(b)) => ConstValue::Bool(!b),
        (UnaryOp::BitNot, ConstValue::Int(i)) if ty.is_integer() => match ty {
            ConstType::Typed(t) if t.is_unsigned() => {
                let bits = t.bit_size(opts.int_size).ok_or_else(invalid)? as usize;
                let mask = (BigInt::one() << bits) - BigInt::one();
                ConstValue::Int(i ^ mask)
            }
            _ => ConstValue::Int(!i),
        },
        _ => return Err(invalid()),
    };

    finish(value, ty, opts)
}

/// Re-check a typed result against its type.
fn finish(value: ConstValue, ty: ConstType, opts: &EvalOptions) -> OpResult {
    match ty {
        ConstType::Typed(t) if t.is_numeric() => {
            let value = represent(&value, ty, t, opts)?;
            Ok(Constant::new(value, ty))
        }
        _ => Ok(Constant::new(value, ty)),
    }
}

fn mismatched(lhs: ConstType, rhs: ConstType) -> ConstErrorKind {
    ConstErrorKind::MismatchedTypes {
        lhs: lhs.to_string(),
        rhs: rhs.to_string(),
    }
}

/// Keep errors about the value itself; anything else is a type mismatch.
fn value_error_or(err: ConstErrorKind, lhs: ConstType, rhs: ConstType) -> ConstErrorKind {
    match err {
        ConstErrorKind::Overflows { .. } | ConstErrorKind::Truncated { .. } => err,
        _ => mismatched(lhs, rhs),
    }
}

/// Bring both operands to one type.
fn unify(
    lhs: &Constant,
    rhs: &Constant,
    opts: &EvalOptions,
) -> Result<(ConstType, ConstValue, ConstValue), ConstErrorKind> {
    match (lhs.ty, rhs.ty) {
        (ConstType::Untyped(a), ConstType::Untyped(b)) => {
            if a == b {
                return Ok((lhs.ty, lhs.value.clone(), rhs.value.clone()));
            }
            match (a.numeric_order(), b.numeric_order()) {
                (Some(x), Some(y)) => {
                    let kind = if x >= y { a } else { b };
                    Ok((
                        ConstType::Untyped(kind),
                        widen_untyped(lhs.value.clone(), kind),
                        widen_untyped(rhs.value.clone(), kind),
                    ))
                }
                _ => Err(mismatched(lhs.ty, rhs.ty)),
            }
        }
        (ConstType::Typed(t), ConstType::Untyped(_)) => {
            let r = convert_implicit(rhs, t, opts).map_err(|e| value_error_or(e, lhs.ty, rhs.ty))?;
            Ok((lhs.ty, lhs.value.clone(), r.value))
        }
        (ConstType::Untyped(_), ConstType::Typed(t)) => {
            let l = convert_implicit(lhs, t, opts).map_err(|e| value_error_or(e, lhs.ty, rhs.ty))?;
            Ok((rhs.ty, l.value, rhs.value.clone()))
        }
        (ConstType::Typed(a), ConstType::Typed(b)) => {
            if a == b {
                return Ok((lhs.ty, lhs.value.clone(), rhs.value.clone()));
            }
            if opts.mode == Mode::Go {
                return Err(mismatched(lhs.ty, rhs.ty));
            }
            let (rank_a, rank_b) = match (a.numeric_rank(opts.int_size), b.numeric_rank(opts.int_size)) {
                (Some(ra), Some(rb)) => (ra, rb),
                _ => return Err(mismatched(lhs.ty, rhs.ty)),
            };
            let target = if rank_a >= rank_b { a } else { b };
            let l = convert_implicit(lhs, target, opts)?;
            let r = convert_implicit(rhs, target, opts)?;
            Ok((ConstType::Typed(target), l.value, r.value))
        }
    }
}

fn arith(op: BinOp, ty: ConstType, l: ConstValue, r: ConstValue) -> Result<ConstValue, ConstErrorKind> {
    let invalid = || ConstErrorKind::InvalidOperation {
        op: op.token().to_string(),
        ty: ty.to_string(),
    };

    let value = match (l, r) {
        (ConstValue::String(a), ConstValue::String(b)) => match op {
            BinOp::Add => ConstValue::String(a + &b),
            _ => return Err(invalid()),
        },
        (ConstValue::Int(a), ConstValue::Int(b)) => ConstValue::Int(match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div | BinOp::Rem if b.is_zero() => return Err(ConstErrorKind::DivisionByZero),
            // BigInt division truncates toward zero, as Go does.
            BinOp::Div => a / b,
            BinOp::Rem => a % b,
            BinOp::BitAnd => a & b,
            BinOp::BitOr => a | b,
            BinOp::BitXor => a ^ b,
            BinOp::AndNot => a & !b,
            _ => return Err(invalid()),
        }),
        (ConstValue::Float(a), ConstValue::Float(b)) => ConstValue::Float(match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div if b.is_zero() => return Err(ConstErrorKind::DivisionByZero),
            BinOp::Div => a / b,
            _ => return Err(invalid()),
        }),
        _ => return Err(invalid()),
    };
    Ok(value)
}

fn compare(op: BinOp, ty: ConstType, l: &ConstValue, r: &ConstValue) -> Result<bool, ConstErrorKind> {
    let invalid = || ConstErrorKind::InvalidOperation {
        op: op.token().to_string(),
        ty: ty.to_string(),
    };

    let ordering = match (l, r) {
        (ConstValue::Bool(a), ConstValue::Bool(b)) => {
            return match op {
                BinOp::Eq => Ok(a == b),
                BinOp::Ne => Ok(a != b),
                _ => Err(invalid()),
            };
        }
        (ConstValue::String(a), ConstValue::String(b)) => a.cmp(b),
        (ConstValue::Int(a), ConstValue::Int(b)) => a.cmp(b),
        (ConstValue::Float(a), ConstValue::Float(b)) => a.cmp(b),
        _ => return Err(invalid()),
    };

    Ok(match op {
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::Ne => ordering != Ordering::Equal,
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Ge => ordering != Ordering::Less,
        _ => return Err(invalid()),
    })
}

fn logical(op: BinOp, lhs: &Constant, rhs: &Constant) -> OpResult {
    let (ConstValue::Bool(a), ConstValue::Bool(b)) = (&lhs.value, &rhs.value) else {
        let culprit = if lhs.ty.is_bool() { rhs.ty } else { lhs.ty };
        return Err(ConstErrorKind::InvalidOperation {
            op: op.token().to_string(),
            ty: culprit.to_string(),
        });
    };

    let ty = match (lhs.ty, rhs.ty) {
        (ConstType::Untyped(_), ConstType::Untyped(_)) => lhs.ty,
        (ConstType::Typed(_), _) => lhs.ty,
        (_, ConstType::Typed(_)) => rhs.ty,
    };
    let value = match op {
        BinOp::And => *a && *b,
        _ => *a || *b,
    };
    Ok(Constant::new(ConstValue::Bool(value), ty))
}

fn shift(op: BinOp, lhs: &Constant, rhs: &Constant, opts: &EvalOptions) -> OpResult {
    let count = match (&rhs.value, rhs.ty) {
        (_, ConstType::Typed(t)) if !t.is_integer() => None,
        (value, _) => value.to_integer(),
    }
    .ok_or_else(|| ConstErrorKind::InvalidShiftCount(describe(&rhs.value)))?;

    if count.is_negative() {
        return Err(ConstErrorKind::InvalidShiftCount(count.to_string()));
    }
    let count = count
        .to_u32()
        .filter(|&c| c <= opts.max_shift)
        .ok_or_else(|| ConstErrorKind::ShiftTooLarge {
            count: count.to_string(),
            limit: opts.max_shift,
        })? as usize;

    // An untyped float operand with an integral value shifts as an int.
    let (ty, value) = match lhs.ty {
        ConstType::Untyped(UntypedKind::Float) => match lhs.value.to_integer() {
            Some(i) => (ConstType::Untyped(UntypedKind::Int), i),
            None => return Err(shift_operand_error(op, lhs)),
        },
        ty if ty.is_integer() => match &lhs.value {
            ConstValue::Int(i) => (ty, i.clone()),
            _ => return Err(shift_operand_error(op, lhs)),
        },
        _ => return Err(shift_operand_error(op, lhs)),
    };

    let shifted = match op {
        BinOp::Shl => value << count,
        _ => value >> count,
    };
    finish(ConstValue::Int(shifted), ty, opts)
}

fn shift_operand_error(op: BinOp, lhs: &Constant) -> ConstErrorKind {
    ConstErrorKind::InvalidOperation {
        op: op.token().to_string(),
        ty: lhs.ty.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gofold_hir::BasicType;
    use num_rational::BigRational;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    fn typed_int(v: i64, ty: BasicType) -> Constant {
        Constant::new(ConstValue::Int(BigInt::from(v)), ConstType::Typed(ty))
    }

    fn typed_float(r: BigRational, ty: BasicType) -> Constant {
        Constant::new(ConstValue::Float(r), ConstType::Typed(ty))
    }

    #[test]
    fn test_untyped_int_times_int() {
        let opts = EvalOptions::default();
        let c = binary(BinOp::Mul, &Constant::untyped_int(5), &Constant::untyped_int(3), &opts).unwrap();
        assert_eq!(c, Constant::untyped_int(15));
    }

    #[test]
    fn test_untyped_float_minus_int_is_float() {
        let opts = EvalOptions::default();
        let five = Constant::untyped_float(ratio(5, 1));
        let c = binary(BinOp::Sub, &five, &Constant::untyped_int(5), &opts).unwrap();
        assert_eq!(c, Constant::untyped_float(ratio(0, 1)));
    }

    #[test]
    fn test_rune_plus_int_is_rune() {
        let opts = EvalOptions::default();
        let c = binary(BinOp::Add, &Constant::untyped_rune('a'), &Constant::untyped_int(1), &opts).unwrap();
        assert_eq!(c, Constant::untyped_rune('b'));
    }

    #[test]
    fn test_untyped_integer_division_truncates() {
        let opts = EvalOptions::default();
        let c = binary(BinOp::Div, &Constant::untyped_int(-7), &Constant::untyped_int(2), &opts).unwrap();
        assert_eq!(c, Constant::untyped_int(-3));
        let c = binary(BinOp::Rem, &Constant::untyped_int(-7), &Constant::untyped_int(2), &opts).unwrap();
        assert_eq!(c, Constant::untyped_int(-1));
    }

    #[test]
    fn test_float_division_is_exact() {
        let opts = EvalOptions::default();
        let one = Constant::untyped_float(ratio(1, 1));
        let c = binary(BinOp::Div, &one, &Constant::untyped_int(3), &opts).unwrap();
        assert_eq!(c, Constant::untyped_float(ratio(1, 3)));
    }

    #[test]
    fn test_division_by_zero() {
        let opts = EvalOptions::default();
        let err = binary(BinOp::Div, &Constant::untyped_int(1), &Constant::untyped_int(0), &opts).unwrap_err();
        assert_eq!(err, ConstErrorKind::DivisionByZero);
        let zero = Constant::untyped_float(ratio(0, 1));
        assert!(binary(BinOp::Div, &Constant::untyped_int(1), &zero, &opts).is_err());
    }

    #[test]
    fn test_typed_pi_plus_typed_size() {
        let pi = typed_float(
            BigRational::new(
                BigInt::parse_bytes(b"314159265358979323846", 10).unwrap(),
                BigInt::from(10).pow(20),
            ),
            BasicType::Float64,
        );
        let size = typed_int(1024, BasicType::Int);

        let sum = binary(BinOp::Add, &pi, &size, &EvalOptions::default()).unwrap();
        assert_eq!(sum.ty, ConstType::Typed(BasicType::Float64));
        let expected = BigRational::new(
            BigInt::parse_bytes(b"102714159265358979323846", 10).unwrap(),
            BigInt::from(10).pow(20),
        );
        assert_eq!(sum.value, ConstValue::Float(expected));

        let err = binary(BinOp::Add, &pi, &size, &EvalOptions::go()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid operation: mismatched types float64 and int"
        );
    }

    #[test]
    fn test_typed_overflow() {
        let opts = EvalOptions::default();
        let c = typed_int(100, BasicType::Int8);
        let err = binary(BinOp::Mul, &c, &Constant::untyped_int(2), &opts).unwrap_err();
        assert_eq!(err.to_string(), "constant 200 overflows int8");
    }

    #[test]
    fn test_untyped_operand_must_fit_typed_side() {
        let opts = EvalOptions::default();
        let c = typed_int(100, BasicType::Int8);
        let err = binary(BinOp::Add, &c, &Constant::untyped_int(300), &opts).unwrap_err();
        assert_eq!(err.to_string(), "constant 300 overflows int8");

        let half = Constant::untyped_float(ratio(1, 2));
        let err = binary(BinOp::Add, &half, &typed_int(1, BasicType::Int), &opts).unwrap_err();
        assert!(matches!(err, ConstErrorKind::Truncated { .. }));

        let err = binary(BinOp::Add, &c, &Constant::untyped_string("x"), &opts).unwrap_err();
        assert!(matches!(err, ConstErrorKind::MismatchedTypes { .. }));
    }

    #[test]
    fn test_string_concat_and_compare() {
        let opts = EvalOptions::default();
        let foo = Constant::untyped_string("foo");
        let bar = Constant::untyped_string("bar");
        let c = binary(BinOp::Add, &foo, &bar, &opts).unwrap();
        assert_eq!(c, Constant::untyped_string("foobar"));
        let lt = binary(BinOp::Lt, &bar, &foo, &opts).unwrap();
        assert_eq!(lt, Constant::untyped_bool(true));
        assert!(binary(BinOp::Sub, &foo, &bar, &opts).is_err());
    }

    #[test]
    fn test_string_plus_int_mismatch() {
        let opts = EvalOptions::default();
        let err = binary(BinOp::Add, &Constant::untyped_string("a"), &Constant::untyped_int(1), &opts)
            .unwrap_err();
        assert!(matches!(err, ConstErrorKind::MismatchedTypes { .. }));
    }

    #[test]
    fn test_comparison_of_mixed_numbers() {
        let opts = EvalOptions::default();
        let half = Constant::untyped_float(ratio(1, 2));
        let c = binary(BinOp::Ge, &half, &Constant::untyped_int(0), &opts).unwrap();
        assert_eq!(c, Constant::untyped_bool(true));
    }

    #[test]
    fn test_bitwise_ops() {
        let opts = EvalOptions::default();
        let a = Constant::untyped_int(0b1100);
        let b = Constant::untyped_int(0b1010);
        let and_not = binary(BinOp::AndNot, &a, &b, &opts).unwrap();
        assert_eq!(and_not, Constant::untyped_int(0b0100));
        let xor = binary(BinOp::BitXor, &a, &b, &opts).unwrap();
        assert_eq!(xor, Constant::untyped_int(0b0110));
        let half = Constant::untyped_float(ratio(1, 2));
        assert!(binary(BinOp::BitOr, &half, &b, &opts).is_err());
    }

    #[test]
    fn test_shifts() {
        let opts = EvalOptions::default();
        let c = binary(BinOp::Shl, &Constant::untyped_int(1), &Constant::untyped_int(100), &opts).unwrap();
        assert_eq!(c, Constant::untyped_int(BigInt::one() << 100usize));

        let one_point_oh = Constant::untyped_float(ratio(1, 1));
        let c = binary(BinOp::Shl, &one_point_oh, &Constant::untyped_int(3), &opts).unwrap();
        assert_eq!(c, Constant::untyped_int(8));

        let c = binary(BinOp::Shr, &Constant::untyped_int(-8), &Constant::untyped_int(1), &opts).unwrap();
        assert_eq!(c, Constant::untyped_int(-4));

        let err = binary(BinOp::Shl, &Constant::untyped_int(1), &Constant::untyped_int(-1), &opts)
            .unwrap_err();
        assert!(matches!(err, ConstErrorKind::InvalidShiftCount(_)));

        let err = binary(BinOp::Shl, &Constant::untyped_int(1), &Constant::untyped_int(20_000), &opts)
            .unwrap_err();
        assert!(matches!(err, ConstErrorKind::ShiftTooLarge { .. }));

        let err = binary(BinOp::Shl, &typed_int(1, BasicType::Int8), &Constant::untyped_int(7), &opts)
            .unwrap_err();
        assert_eq!(err.to_string(), "constant 128 overflows int8");
    }

    #[test]
    fn test_logical() {
        let opts = EvalOptions::default();
        let t = Constant::untyped_bool(true);
        let f = Constant::untyped_bool(false);
        assert_eq!(binary(BinOp::And, &t, &f, &opts).unwrap(), f);
        assert_eq!(binary(BinOp::Or, &t, &f, &opts).unwrap(), t);
        assert!(binary(BinOp::And, &t, &Constant::untyped_int(1), &opts).is_err());
    }

    #[test]
    fn test_unary() {
        let opts = EvalOptions::default();
        assert_eq!(unary(UnaryOp::Neg, &Constant::untyped_int(1), &opts).unwrap(), Constant::untyped_int(-1));
        assert_eq!(unary(UnaryOp::BitNot, &Constant::untyped_int(0), &opts).unwrap(), Constant::untyped_int(-1));
        assert_eq!(
            unary(UnaryOp::BitNot, &typed_int(1, BasicType::Uint8), &opts).unwrap(),
            typed_int(254, BasicType::Uint8)
        );
        assert_eq!(
            unary(UnaryOp::Not, &Constant::untyped_bool(true), &opts).unwrap(),
            Constant::untyped_bool(false)
        );
        let err = unary(UnaryOp::Neg, &typed_int(1, BasicType::Uint), &opts).unwrap_err();
        assert_eq!(err.to_string(), "constant -1 overflows uint");
        assert!(unary(UnaryOp::Neg, &Constant::untyped_string("x"), &opts).is_err());
    }
}
