//! Lowering of constant declarations to quads.

use crate::quad::{Operand, Quad, TacProgram};
use gofold_common::SymbolInterner;
use gofold_consteval::format::{format_constant, format_rational, quote, quote_rune, FormatOptions};
use gofold_consteval::ConstTable;
use gofold_hir::{ConstSpec, Expr, ExprKind, Literal, Module, Program, Type};
use miette::Result;

/// Fractional digits for float literals in unfolded listings.
const LITERAL_DIGITS: usize = 30;

pub struct TacBuilder<'a> {
    interner: &'a SymbolInterner,
    quads: Vec<Quad>,
    next_temp: u32,
}

impl<'a> TacBuilder<'a> {
    pub fn new(interner: &'a SymbolInterner) -> Self {
        Self {
            interner,
            quads: Vec::new(),
            next_temp: 1,
        }
    }

    pub fn finish(self) -> TacProgram {
        TacProgram { quads: self.quads }
    }

    pub fn lower_module(&mut self, module: &Module) -> Result<()> {
        for spec in module.const_specs() {
            self.lower_spec(spec)?;
        }
        Ok(())
    }

    /// Names without a matching initializer produce nothing.
    pub fn lower_spec(&mut self, spec: &ConstSpec) -> Result<()> {
        for (name, value) in spec.names.iter().zip(&spec.values) {
            let src = self.lower_expr(value, spec.iota)?;
            let dest = Operand::Name(self.interner.resolve(name.name));
            self.quads.push(Quad::Assign { dest, src });
        }
        Ok(())
    }

    fn temp(&mut self) -> Operand {
        let t = Operand::Temp(self.next_temp);
        self.next_temp += 1;
        t
    }

    /// Lower `expr` and return the operand holding its value.
    fn lower_expr(&mut self, expr: &Expr, iota: u64) -> Result<Operand> {
        let operand = match &expr.kind {
            ExprKind::Literal(lit) => Operand::Const(literal_text(lit)),
            ExprKind::Iota => Operand::Const(iota.to_string()),
            ExprKind::Ident(sym) => Operand::Name(self.interner.resolve(*sym)),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.lower_expr(lhs, iota)?;
                let rhs = self.lower_expr(rhs, iota)?;
                let dest = self.temp();
                self.quads.push(Quad::Binary {
                    dest: dest.clone(),
                    op: *op,
                    lhs,
                    rhs,
                });
                dest
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.lower_expr(operand, iota)?;
                let dest = self.temp();
                self.quads.push(Quad::Unary {
                    dest: dest.clone(),
                    op: *op,
                    operand,
                });
                dest
            }
            ExprKind::Conversion { ty, operand } => {
                let Type::Basic(ty) = *ty else {
                    return Err(miette::miette!("Conversion to a non-basic type"));
                };
                let operand = self.lower_expr(operand, iota)?;
                let dest = self.temp();
                self.quads.push(Quad::Convert {
                    dest: dest.clone(),
                    ty,
                    operand,
                });
                dest
            }
            ExprKind::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|a| self.lower_expr(a, iota))
                    .collect::<Result<Vec<_>>>()?;
                let dest = self.temp();
                self.quads.push(Quad::Call {
                    dest: dest.clone(),
                    callee: self.interner.resolve(*callee),
                    args,
                });
                dest
            }
            ExprKind::Error(message) => {
                return Err(miette::miette!("Cannot lower expression: {}", message));
            }
        };
        Ok(operand)
    }
}

fn literal_text(lit: &Literal) -> String {
    match lit {
        Literal::Int(i) => i.to_string(),
        Literal::Float(r) => format_rational(r, LITERAL_DIGITS),
        Literal::Rune(c) => quote_rune(*c),
        Literal::String(s) => quote(s),
        Literal::Bool(b) => b.to_string(),
    }
}

/// Unfolded listing of every module in `program`. Temporaries are numbered
/// across the whole program.
pub fn lower_program(program: &Program, interner: &SymbolInterner) -> Result<TacProgram> {
    let mut builder = TacBuilder::new(interner);
    for module in &program.modules {
        builder.lower_module(module)?;
    }
    Ok(builder.finish())
}

pub fn lower_module(module: &Module, interner: &SymbolInterner) -> Result<TacProgram> {
    let mut builder = TacBuilder::new(interner);
    builder.lower_module(module)?;
    Ok(builder.finish())
}

/// Folded listing: one `name = value` per constant that evaluated.
pub fn fold_table(table: &ConstTable, opts: &FormatOptions) -> TacProgram {
    let quads = table
        .iter()
        .filter_map(|entry| {
            let Some(constant) = &entry.constant else {
                tracing::debug!(name = %entry.name, "no folded value");
                return None;
            };
            Some(Quad::Assign {
                dest: Operand::Name(entry.name.clone()),
                src: Operand::Const(format_constant(constant, opts)),
            })
        })
        .collect();
    TacProgram { quads }
}
