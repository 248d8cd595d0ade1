use crate::types::Type;
use gofold_common::{Span, Symbol};
use num_bigint::BigInt;
use num_rational::BigRational;
use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    AndNot,
    Shl,
    Shr,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn from_token(op: &str) -> Option<Self> {
        let op = match op {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            "&" => BinOp::BitAnd,
            "|" => BinOp::BitOr,
            "^" => BinOp::BitXor,
            "&^" => BinOp::AndNot,
            "<<" => BinOp::Shl,
            ">>" => BinOp::Shr,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            "<" => BinOp::Lt,
            "<=" => BinOp::Le,
            ">" => BinOp::Gt,
            ">=" => BinOp::Ge,
            "&&" => BinOp::And,
            "||" => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn token(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::AndNot => "&^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinOp::Shl | BinOp::Shr)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,    // +x
    Neg,    // -x
    Not,    // !x
    BitNot, // ^x
}

impl UnaryOp {
    pub fn from_token(op: &str) -> Option<Self> {
        let op = match op {
            "+" => UnaryOp::Pos,
            "-" => UnaryOp::Neg,
            "!" => UnaryOp::Not,
            "^" => UnaryOp::BitNot,
            _ => return None,
        };
        Some(op)
    }

    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "^",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A literal, already decoded to its exact value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(BigInt),
    Float(BigRational),
    Rune(char),
    String(String),
    Bool(bool),
}

/// An expression in a constant initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal value
    Literal(Literal),

    /// A reference to another constant
    Ident(Symbol),

    /// `iota`: position of the const spec within its block
    Iota,

    /// Binary operation: a + b
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// Unary operation: -x, ^x, !x
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Conversion to a type: float64(x)
    Conversion {
        ty: Type,
        operand: Box<Expr>,
    },

    /// Builtin call: len("abc")
    Call {
        callee: Symbol,
        args: Vec<Expr>,
    },

    /// Anything a constant initializer cannot contain
    Error(String),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binop_tokens_round_trip() {
        for tok in ["+", "&^", "<<", ">=", "||"] {
            assert_eq!(BinOp::from_token(tok).unwrap().token(), tok);
        }
        assert!(BinOp::from_token("<-").is_none());
        assert!(BinOp::Shl.is_shift());
        assert!(BinOp::Le.is_comparison());
    }

    #[test]
    fn test_unary_bitnot_is_caret() {
        assert_eq!(UnaryOp::from_token("^"), Some(UnaryOp::BitNot));
        assert_eq!(UnaryOp::from_token("&"), None);
    }
}
