use gofold_hir::{BasicType, BinOp, UnaryOp};
use smol_str::SmolStr;
use std::fmt;

/// Something a quad reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Literal text, already formatted.
    Const(String),
    /// A declared constant.
    Name(SmolStr),
    /// Compiler temporary `tN`.
    Temp(u32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Const(text) => f.write_str(text),
            Operand::Name(name) => f.write_str(name),
            Operand::Temp(n) => write!(f, "t{n}"),
        }
    }
}

/// One three-address instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quad {
    Assign {
        dest: Operand,
        src: Operand,
    },
    Binary {
        dest: Operand,
        op: BinOp,
        lhs: Operand,
        rhs: Operand,
    },
    Unary {
        dest: Operand,
        op: UnaryOp,
        operand: Operand,
    },
    Convert {
        dest: Operand,
        ty: BasicType,
        operand: Operand,
    },
    Call {
        dest: Operand,
        callee: SmolStr,
        args: Vec<Operand>,
    },
}

impl Quad {
    pub fn dest(&self) -> &Operand {
        match self {
            Quad::Assign { dest, .. }
            | Quad::Binary { dest, .. }
            | Quad::Unary { dest, .. }
            | Quad::Convert { dest, .. }
            | Quad::Call { dest, .. } => dest,
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quad::Assign { dest, src } => write!(f, "{dest} = {src}"),
            Quad::Binary { dest, op, lhs, rhs } => write!(f, "{dest} = {lhs} {op} {rhs}"),
            Quad::Unary { dest, op, operand } => write!(f, "{dest} = {op} {operand}"),
            Quad::Convert { dest, ty, operand } => write!(f, "{dest} = {ty} {operand}"),
            Quad::Call { dest, callee, args } => {
                write!(f, "{dest} = call {callee}")?;
                for (i, arg) in args.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{arg}")?;
                }
                Ok(())
            }
        }
    }
}

/// A straight-line quad listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TacProgram {
    pub quads: Vec<Quad>,
}

impl TacProgram {
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }
}

impl fmt::Display for TacProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for quad in &self.quads {
            writeln!(f, "{quad}")?;
        }
        Ok(())
    }
}
