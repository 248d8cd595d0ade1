//! Package-scope constant resolution.
//!
//! Every name of every const spec becomes one declaration slot. Slots are
//! resolved on demand so initializers may refer to constants declared later
//! in the file, and a slot found in progress while resolving a reference is
//! an initialization cycle. Errors are collected as diagnostics; a failed
//! slot resolves to `None` and poisons only the constants that use it.

use crate::convert::{convert_explicit, convert_implicit};
use crate::error::{ConstError, ConstErrorKind};
use crate::ops;
use crate::options::EvalOptions;
use crate::table::{ConstEntry, ConstTable};
use crate::value::{ConstType, ConstValue, Constant};
use gofold_common::{Diagnostic, Span, Spanned, Symbol, SymbolInterner};
use gofold_hir::{BasicType, ConstSpec, Expr, ExprKind, Literal, Program, Type, Visibility};
use num_bigint::BigInt;
use rustc_hash::FxHashMap;

/// Result of evaluating a program.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub table: ConstTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

pub struct Evaluator<'a> {
    interner: &'a SymbolInterner,
    options: EvalOptions,
}

impl<'a> Evaluator<'a> {
    pub fn new(interner: &'a SymbolInterner, options: EvalOptions) -> Self {
        Self { interner, options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    pub fn evaluate(&self, program: &Program) -> Evaluation {
        let mut run = Run::new(self.interner, self.options);
        for spec in program.const_specs() {
            run.declare(spec);
        }
        run.check_redeclarations();

        for idx in 0..run.decls.len() {
            run.resolve(idx);
        }
        run.finish()
    }
}

struct Decl<'p> {
    name: Symbol,
    name_span: Span,
    spec: &'p ConstSpec,
    expr: Option<&'p Expr>,
}

#[derive(Debug, Clone)]
enum Slot {
    Pending,
    InProgress,
    Done(Option<Constant>),
}

struct Run<'p, 'a> {
    interner: &'a SymbolInterner,
    options: EvalOptions,
    decls: Vec<Decl<'p>>,
    by_name: FxHashMap<Symbol, Vec<usize>>,
    slots: Vec<Slot>,
    diagnostics: Vec<Diagnostic>,
}

impl<'p, 'a> Run<'p, 'a> {
    fn new(interner: &'a SymbolInterner, options: EvalOptions) -> Self {
        Self {
            interner,
            options,
            decls: Vec::new(),
            by_name: FxHashMap::default(),
            slots: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn name(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }

    fn report(&mut self, kind: ConstErrorKind, span: Span) {
        let diag: Diagnostic = ConstError::new(kind, span).into();
        let duplicate = self
            .diagnostics
            .iter()
            .any(|d| d.span == diag.span && d.message == diag.message);
        if !duplicate {
            self.diagnostics.push(diag);
        }
    }

    fn declare(&mut self, spec: &'p ConstSpec) {
        let (names, values) = (spec.names.len(), spec.values.len());
        if values == 0 || values < names {
            self.report(ConstErrorKind::MissingInit, spec.span);
        } else if values > names {
            self.report(ConstErrorKind::ExtraInit, spec.values[names].span);
        }

        for (i, name) in spec.names.iter().enumerate() {
            let idx = self.decls.len();
            self.decls.push(Decl {
                name: name.name,
                name_span: name.span,
                spec,
                expr: spec.values.get(i),
            });
            self.slots.push(Slot::Pending);
            if !name.name.is_blank() {
                self.by_name.entry(name.name).or_default().push(idx);
            }
        }
    }

    fn check_redeclarations(&mut self) {
        let mut redeclared: Vec<(Symbol, Span)> = self
            .by_name
            .iter()
            .filter(|(_, idxs)| idxs.len() > 1)
            .flat_map(|(&sym, idxs)| idxs[1..].iter().map(move |&i| (sym, i)))
            .map(|(sym, i)| (sym, self.decls[i].name_span))
            .collect();
        redeclared.sort_by_key(|&(_, span)| span);

        for (sym, span) in redeclared {
            let name = self.name(sym);
            if self.options.redeclaration_is_error() {
                self.report(ConstErrorKind::Redeclared(name), span);
            } else {
                tracing::debug!(name = %name, "constant redeclared; later declaration shadows");
                self.diagnostics.push(
                    Diagnostic::warning(ConstErrorKind::Redeclared(name).to_string())
                        .with_span(span)
                        .with_label("shadows an earlier declaration")
                        .with_help("constants that follow use this declaration"),
                );
            }
        }
    }

    /// The declaration a reference from `from` binds to: the latest one
    /// declared before `from`, else the first other declaration after it.
    fn lookup(&self, sym: Symbol, from: usize) -> Option<usize> {
        let candidates = self.by_name.get(&sym)?;
        let here = self.decls[from].name_span;
        candidates
            .iter()
            .rev()
            .find(|&&c| self.decls[c].name_span < here)
            .or_else(|| candidates.iter().find(|&&c| c != from))
            .or_else(|| candidates.first())
            .copied()
    }

    fn resolve(&mut self, idx: usize) -> Option<Constant> {
        match &self.slots[idx] {
            Slot::Done(c) => return c.clone(),
            Slot::InProgress => return None,
            Slot::Pending => {}
        }

        self.slots[idx] = Slot::InProgress;
        let result = self.compute(idx);
        if let Some(c) = &result {
            tracing::debug!(name = %self.name(self.decls[idx].name), ty = %c.ty, "resolved constant");
        }
        self.slots[idx] = Slot::Done(result.clone());
        result
    }

    fn compute(&mut self, idx: usize) -> Option<Constant> {
        let decl = &self.decls[idx];
        let expr = decl.expr?;
        let declared = decl.spec.ty;
        let iota = decl.spec.iota;

        let value = self.eval_expr(expr, iota, idx)?;
        let Some(ty) = declared else {
            return Some(value);
        };

        let target = self.resolve_type(ty)?;
        match convert_implicit(&value, target, &self.options) {
            Ok(c) => Some(c),
            Err(kind) => {
                self.report(kind, expr.span);
                None
            }
        }
    }

    fn resolve_type(&mut self, ty: Spanned<Type>) -> Option<BasicType> {
        match ty.node {
            Type::Basic(basic) => Some(basic),
            Type::Named(sym) => {
                let name = self.name(sym);
                self.report(ConstErrorKind::InvalidConstType(name), ty.span);
                None
            }
        }
    }

    fn eval_expr(&mut self, expr: &Expr, iota: u64, from: usize) -> Option<Constant> {
        let result = match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_constant(lit)),

            ExprKind::Iota => Ok(Constant::untyped_int(iota)),

            ExprKind::Ident(sym) => return self.eval_ident(*sym, expr.span, from),

            ExprKind::Binary { op, lhs, rhs } => {
                let l = self.eval_expr(lhs, iota, from);
                let r = self.eval_expr(rhs, iota, from);
                ops::binary(*op, &l?, &r?, &self.options)
            }

            ExprKind::Unary { op, operand } => {
                let c = self.eval_expr(operand, iota, from)?;
                ops::unary(*op, &c, &self.options)
            }

            ExprKind::Conversion { ty, operand } => {
                let c = self.eval_expr(operand, iota, from)?;
                let target = self.resolve_type(Spanned::new(*ty, expr.span))?;
                convert_explicit(&c, target, &self.options)
            }

            ExprKind::Call { callee, args } => self.eval_call(*callee, args, iota, from)?,

            ExprKind::Error(message) => Err(ConstErrorKind::Unsupported(message.clone())),
        };

        match result {
            Ok(c) => Some(c),
            Err(kind) => {
                self.report(kind, expr.span);
                None
            }
        }
    }

    fn eval_ident(&mut self, sym: Symbol, span: Span, from: usize) -> Option<Constant> {
        if sym.is_blank() {
            self.report(ConstErrorKind::NotConstant("_".to_string()), span);
            return None;
        }

        let Some(target) = self.lookup(sym, from) else {
            let name = self.name(sym);
            self.report(ConstErrorKind::Undefined(name), span);
            return None;
        };

        if matches!(self.slots[target], Slot::InProgress) {
            let name = self.name(sym);
            self.report(ConstErrorKind::Cycle(name), span);
            return None;
        }

        self.resolve(target)
    }

    /// Builtins usable in constant expressions. Returns `None` when an
    /// argument already failed.
    fn eval_call(
        &mut self,
        callee: Symbol,
        args: &[Expr],
        iota: u64,
        from: usize,
    ) -> Option<Result<Constant, ConstErrorKind>> {
        let name = self.name(callee);
        if name != "len" {
            return Some(Err(ConstErrorKind::NotConstant(format!("{name}(...)"))));
        }
        let [arg] = args else {
            return Some(Err(ConstErrorKind::InvalidArgument(format!(
                "len expects 1 argument, got {}",
                args.len()
            ))));
        };

        let c = self.eval_expr(arg, iota, from)?;
        Some(match &c.value {
            ConstValue::String(s) => Ok(Constant::new(
                ConstValue::Int(BigInt::from(s.len())),
                ConstType::Typed(BasicType::Int),
            )),
            _ => Err(ConstErrorKind::InvalidArgument(format!(
                "len of {} constant",
                c.ty
            ))),
        })
    }

    fn finish(mut self) -> Evaluation {
        let mut table = ConstTable::new();
        for (decl, slot) in self.decls.iter().zip(&self.slots) {
            let constant = match slot {
                Slot::Done(c) => c.clone(),
                Slot::Pending | Slot::InProgress => None,
            };
            let spec = decl.spec;
            table.push(ConstEntry {
                name: self.interner.resolve(decl.name),
                symbol: decl.name,
                span: decl.name_span,
                constant,
                iota: spec.iota,
                implicit: spec.implicit,
                exported: spec
                    .names
                    .iter()
                    .find(|n| n.span == decl.name_span)
                    .is_some_and(|n| n.vis == Visibility::Public),
            });
        }

        self.diagnostics.sort_by_key(|d| d.span);
        Evaluation {
            table,
            diagnostics: self.diagnostics,
        }
    }
}

fn literal_constant(lit: &Literal) -> Constant {
    match lit {
        Literal::Int(i) => Constant::untyped_int(i.clone()),
        Literal::Float(r) => Constant::untyped_float(r.clone()),
        Literal::Rune(c) => Constant::untyped_rune(*c),
        Literal::String(s) => Constant::untyped_string(s.clone()),
        Literal::Bool(b) => Constant::untyped_bool(*b),
    }
}
