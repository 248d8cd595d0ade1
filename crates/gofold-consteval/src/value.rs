use gofold_hir::BasicType;
use num_bigint::BigInt;
use num_rational::BigRational;
use std::fmt;

/// The kind of an untyped constant. Numeric kinds are ordered
/// int < rune < float when mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UntypedKind {
    Bool,
    Rune,
    Int,
    Float,
    String,
}

impl UntypedKind {
    pub fn name(self) -> &'static str {
        match self {
            UntypedKind::Bool => "untyped bool",
            UntypedKind::Rune => "untyped rune",
            UntypedKind::Int => "untyped int",
            UntypedKind::Float => "untyped float",
            UntypedKind::String => "untyped string",
        }
    }

    pub fn default_type(self) -> BasicType {
        match self {
            UntypedKind::Bool => BasicType::Bool,
            UntypedKind::Rune => BasicType::Int32,
            UntypedKind::Int => BasicType::Int,
            UntypedKind::Float => BasicType::Float64,
            UntypedKind::String => BasicType::String,
        }
    }

    pub(crate) fn numeric_order(self) -> Option<u8> {
        match self {
            UntypedKind::Int => Some(0),
            UntypedKind::Rune => Some(1),
            UntypedKind::Float => Some(2),
            UntypedKind::Bool | UntypedKind::String => None,
        }
    }
}

/// The type of a constant: an untyped kind or a basic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstType {
    Untyped(UntypedKind),
    Typed(BasicType),
}

impl ConstType {
    pub fn is_untyped(self) -> bool {
        matches!(self, ConstType::Untyped(_))
    }

    /// The type an untyped constant takes when nothing else decides it.
    pub fn default_type(self) -> BasicType {
        match self {
            ConstType::Untyped(kind) => kind.default_type(),
            ConstType::Typed(ty) => ty,
        }
    }

    pub fn is_bool(self) -> bool {
        matches!(
            self,
            ConstType::Untyped(UntypedKind::Bool) | ConstType::Typed(BasicType::Bool)
        )
    }

    pub fn is_string(self) -> bool {
        matches!(
            self,
            ConstType::Untyped(UntypedKind::String) | ConstType::Typed(BasicType::String)
        )
    }

    pub fn is_integer(self) -> bool {
        match self {
            ConstType::Untyped(kind) => matches!(kind, UntypedKind::Int | UntypedKind::Rune),
            ConstType::Typed(ty) => ty.is_integer(),
        }
    }

    pub fn is_float(self) -> bool {
        match self {
            ConstType::Untyped(kind) => kind == UntypedKind::Float,
            ConstType::Typed(ty) => ty.is_float(),
        }
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }
}

impl fmt::Display for ConstType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstType::Untyped(kind) => f.write_str(kind.name()),
            ConstType::Typed(ty) => f.write_str(ty.name()),
        }
    }
}

/// An exact constant value. Integer and rune kinds share `Int`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    String(String),
    Int(BigInt),
    Float(BigRational),
}

impl ConstValue {
    /// The value as an exact rational, for numeric values.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            ConstValue::Int(i) => Some(BigRational::from_integer(i.clone())),
            ConstValue::Float(r) => Some(r.clone()),
            ConstValue::Bool(_) | ConstValue::String(_) => None,
        }
    }

    /// The value as an integer if it is numeric and integral.
    pub fn to_integer(&self) -> Option<BigInt> {
        match self {
            ConstValue::Int(i) => Some(i.clone()),
            ConstValue::Float(r) if r.is_integer() => Some(r.to_integer()),
            _ => None,
        }
    }
}

/// A resolved constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub value: ConstValue,
    pub ty: ConstType,
}

impl Constant {
    pub fn new(value: ConstValue, ty: ConstType) -> Self {
        Self { value, ty }
    }

    pub fn untyped_int(value: impl Into<BigInt>) -> Self {
        Self::new(ConstValue::Int(value.into()), ConstType::Untyped(UntypedKind::Int))
    }

    pub fn untyped_float(value: BigRational) -> Self {
        Self::new(ConstValue::Float(value), ConstType::Untyped(UntypedKind::Float))
    }

    pub fn untyped_bool(value: bool) -> Self {
        Self::new(ConstValue::Bool(value), ConstType::Untyped(UntypedKind::Bool))
    }

    pub fn untyped_string(value: impl Into<String>) -> Self {
        Self::new(
            ConstValue::String(value.into()),
            ConstType::Untyped(UntypedKind::String),
        )
    }

    pub fn untyped_rune(c: char) -> Self {
        Self::new(
            ConstValue::Int(BigInt::from(c as u32)),
            ConstType::Untyped(UntypedKind::Rune),
        )
    }

    pub fn default_type(&self) -> BasicType {
        self.ty.default_type()
    }
}
