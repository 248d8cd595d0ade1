//! Errors raised while folding constants.

use gofold_common::{Diagnostic, Span};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstErrorKind {
    #[error("undefined: {0}")]
    Undefined(String),

    #[error("initialization cycle: {0} refers to itself")]
    Cycle(String),

    #[error("missing init expr for const declaration")]
    MissingInit,

    #[error("extra init expr")]
    ExtraInit,

    #[error("{0} redeclared in this block")]
    Redeclared(String),

    #[error("invalid operation: mismatched types {lhs} and {rhs}")]
    MismatchedTypes { lhs: String, rhs: String },

    #[error("invalid operation: operator {op} not defined on {ty}")]
    InvalidOperation { op: String, ty: String },

    #[error("invalid operation: division by zero")]
    DivisionByZero,

    #[error("constant {value} overflows {ty}")]
    Overflows { value: String, ty: String },

    #[error("cannot use {value} ({from}) as {to} value (truncated)")]
    Truncated { value: String, from: String, to: String },

    #[error("cannot convert {value} ({from}) to type {to}")]
    CannotConvert { value: String, from: String, to: String },

    #[error("invalid shift count {0}")]
    InvalidShiftCount(String),

    #[error("shift count {count} too large (limit {limit})")]
    ShiftTooLarge { count: String, limit: u32 },

    #[error("invalid constant type {0}")]
    InvalidConstType(String),

    #[error("{0} is not a constant")]
    NotConstant(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unsupported(String),
}

impl ConstErrorKind {
    fn help(&self) -> Option<&'static str> {
        match self {
            ConstErrorKind::MismatchedTypes { .. } => {
                Some("convert one operand explicitly, or use lenient mode to promote numeric types")
            }
            ConstErrorKind::Overflows { .. } => Some("use a wider type or leave the constant untyped"),
            ConstErrorKind::Cycle(_) => Some("constants may not depend on themselves"),
            ConstErrorKind::Redeclared(_) => {
                Some("the later declaration shadows the earlier one for constants that follow it")
            }
            _ => None,
        }
    }
}

/// A folding error located in source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ConstError {
    pub kind: ConstErrorKind,
    pub span: Span,
}

impl ConstError {
    pub fn new(kind: ConstErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl From<ConstError> for Diagnostic {
    fn from(err: ConstError) -> Self {
        let mut diag = Diagnostic::error(err.kind.to_string()).with_span(err.span);
        if let Some(help) = err.kind.help() {
            diag = diag.with_help(help);
        }
        diag
    }
}
