use crate::literal;
use gofold_common::{SourceFile, Span, Spanned, Symbol, SymbolInterner};
use gofold_hir::{
    BasicType, BinOp, ConstDecl, ConstName, ConstSpec, Expr, ExprKind, Item, ItemKind, Literal,
    Module, Type, UnaryOp, Visibility,
};
use miette::Result;
use tree_sitter::{Node, Tree};

/// Lower the const declarations of a tree-sitter Tree to a HIR Module.
pub fn lower(tree: &Tree, source: &SourceFile, interner: &SymbolInterner) -> Result<Module> {
    let ctx = LoweringContext::new(source, interner);
    ctx.lower_module(tree.root_node())
}

struct LoweringContext<'a> {
    source: &'a SourceFile,
    interner: &'a SymbolInterner,
}

impl<'a> LoweringContext<'a> {
    fn new(source: &'a SourceFile, interner: &'a SymbolInterner) -> Self {
        Self { source, interner }
    }

    fn span(&self, node: Node) -> Span {
        Span::new(
            self.source.id,
            node.start_byte() as u32,
            node.end_byte() as u32,
        )
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.content.as_bytes()).unwrap_or("")
    }

    fn intern(&self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    fn lower_module(&self, node: Node) -> Result<Module> {
        let name = node
            .children(&mut node.walk())
            .find(|n| n.kind() == "package_clause")
            .and_then(|pkg| {
                pkg.children(&mut pkg.walk())
                    .find(|n| n.kind() == "package_identifier")
            })
            .map(|n| self.intern(self.text(n)))
            .unwrap_or_else(|| self.intern("main"));

        let mut module = Module::new(name, self.source.id);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(item) = self.lower_item(child)? {
                module.add_item(item);
            }
        }

        Ok(module)
    }

    fn lower_item(&self, node: Node) -> Result<Option<Item>> {
        let span = self.span(node);

        match node.kind() {
            "const_declaration" => {
                let decl = self.lower_const_decl(node)?;
                Ok(Some(Item::new(ItemKind::Const(decl), span)))
            }
            "package_clause" | "comment" => Ok(None),
            other => {
                tracing::debug!(kind = other, line = self.source.line_number(span.start), "skipping non-constant item");
                Ok(None)
            }
        }
    }

    fn lower_const_decl(&self, node: Node) -> Result<ConstDecl> {
        let span = self.span(node);
        let grouped = node.children(&mut node.walk()).any(|n| n.kind() == "(");

        let spec_nodes: Vec<Node> = node
            .children(&mut node.walk())
            .filter(|n| n.kind() == "const_spec")
            .collect();

        let mut specs: Vec<ConstSpec> = Vec::with_capacity(spec_nodes.len());
        for (iota, spec_node) in spec_nodes.into_iter().enumerate() {
            let spec = self.lower_const_spec(spec_node, iota as u64, specs.last())?;
            specs.push(spec);
        }

        Ok(ConstDecl { specs, grouped, span })
    }

    fn lower_const_spec(
        &self,
        node: Node,
        iota: u64,
        previous: Option<&ConstSpec>,
    ) -> Result<ConstSpec> {
        let span = self.span(node);

        let names: Vec<ConstName> = node
            .children_by_field_name("name", &mut node.walk())
            .map(|n| {
                let text = self.text(n);
                ConstName {
                    name: self.intern(text),
                    vis: Visibility::of_name(text),
                    span: self.span(n),
                }
            })
            .collect();
        if names.is_empty() {
            return Err(miette::miette!("Constant spec missing names"));
        }

        let ty = node
            .child_by_field_name("type")
            .map(|n| Spanned::new(self.lower_type(n), self.span(n)));

        let values = match node.child_by_field_name("value") {
            Some(list) => self.lower_expression_list(list)?,
            None => vec![],
        };

        // `const ( A = iota; B; C )`: a bare spec repeats the previous one.
        if ty.is_none() && values.is_empty() {
            if let Some(prev) = previous.filter(|p| !p.values.is_empty()) {
                return Ok(ConstSpec {
                    names,
                    ty: prev.ty,
                    values: prev.values.clone(),
                    iota,
                    implicit: true,
                    span,
                });
            }
        }

        Ok(ConstSpec {
            names,
            ty,
            values,
            iota,
            implicit: false,
            span,
        })
    }

    fn lower_expression_list(&self, node: Node) -> Result<Vec<Expr>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .map(|n| self.lower_expr(n))
            .collect()
    }

    fn lower_type(&self, node: Node) -> Type {
        let text = self.text(node);
        match BasicType::from_name(text) {
            Some(basic) => Type::Basic(basic),
            None => Type::Named(self.intern(text)),
        }
    }

    fn lower_expr(&self, node: Node) -> Result<Expr> {
        let span = self.span(node);

        let kind = match node.kind() {
            "int_literal" => match literal::parse_int(self.text(node)) {
                Ok(value) => ExprKind::Literal(Literal::Int(value)),
                Err(e) => ExprKind::Error(e.to_string()),
            },

            "float_literal" => match literal::parse_float(self.text(node)) {
                Ok(value) => ExprKind::Literal(Literal::Float(value)),
                Err(e) => ExprKind::Error(e.to_string()),
            },

            "imaginary_literal" => {
                ExprKind::Error("complex constants are not supported".to_string())
            }

            "rune_literal" => match literal::unquote_rune(self.text(node)) {
                Ok(c) => ExprKind::Literal(Literal::Rune(c)),
                Err(e) => ExprKind::Error(e.to_string()),
            },

            "interpreted_string_literal" => match literal::unquote_string(self.text(node)) {
                Ok(s) => ExprKind::Literal(Literal::String(s)),
                Err(e) => ExprKind::Error(e.to_string()),
            },

            "raw_string_literal" => match literal::unquote_raw(self.text(node)) {
                Ok(s) => ExprKind::Literal(Literal::String(s)),
                Err(e) => ExprKind::Error(e.to_string()),
            },

            "true" => ExprKind::Literal(Literal::Bool(true)),
            "false" => ExprKind::Literal(Literal::Bool(false)),
            "iota" => ExprKind::Iota,
            "nil" => ExprKind::Error("nil is not a constant".to_string()),

            "identifier" => ExprKind::Ident(self.intern(self.text(node))),

            "binary_expression" => {
                let lhs = node
                    .child_by_field_name("left")
                    .map(|n| self.lower_expr(n))
                    .transpose()?
                    .ok_or_else(|| miette::miette!("Binary expr missing lhs"))?;
                let rhs = node
                    .child_by_field_name("right")
                    .map(|n| self.lower_expr(n))
                    .transpose()?
                    .ok_or_else(|| miette::miette!("Binary expr missing rhs"))?;
                let op_node = node
                    .child_by_field_name("operator")
                    .ok_or_else(|| miette::miette!("Binary expr missing operator"))?;

                match BinOp::from_token(self.text(op_node)) {
                    Some(op) => ExprKind::Binary {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    None => ExprKind::Error(format!(
                        "operator {} is not defined on constants",
                        self.text(op_node)
                    )),
                }
            }

            "unary_expression" => {
                let operand = node
                    .child_by_field_name("operand")
                    .map(|n| self.lower_expr(n))
                    .transpose()?
                    .ok_or_else(|| miette::miette!("Unary expr missing operand"))?;
                let op_text = node
                    .child_by_field_name("operator")
                    .map(|n| self.text(n))
                    .unwrap_or("");

                match UnaryOp::from_token(op_text) {
                    Some(op) => ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    None => ExprKind::Error(format!(
                        "operator {op_text} is not defined on constants"
                    )),
                }
            }

            "parenthesized_expression" => {
                let inner = node
                    .named_children(&mut node.walk())
                    .find(|n| n.kind() != "comment");
                match inner {
                    Some(inner) => return self.lower_expr(inner),
                    None => ExprKind::Error("empty parentheses".to_string()),
                }
            }

            "call_expression" => self.lower_call(node)?,

            "type_conversion_expression" => {
                let ty = node
                    .child_by_field_name("type")
                    .map(|n| self.lower_type(n))
                    .ok_or_else(|| miette::miette!("Conversion missing type"))?;
                let operand = node
                    .child_by_field_name("operand")
                    .map(|n| self.lower_expr(n))
                    .transpose()?
                    .ok_or_else(|| miette::miette!("Conversion missing operand"))?;
                ExprKind::Conversion {
                    ty,
                    operand: Box::new(operand),
                }
            }

            other => ExprKind::Error(format!("{} is not a constant expression", other.replace('_', " "))),
        };

        Ok(Expr::new(kind, span))
    }

    /// `T(x)` with a basic type name is a conversion; anything else is a call.
    fn lower_call(&self, node: Node) -> Result<ExprKind> {
        let callee = node
            .child_by_field_name("function")
            .ok_or_else(|| miette::miette!("Call missing function"))?;

        let mut args = vec![];
        if let Some(args_node) = node.child_by_field_name("arguments") {
            let mut cursor = args_node.walk();
            for child in args_node.named_children(&mut cursor) {
                if child.kind() != "comment" {
                    args.push(self.lower_expr(child)?);
                }
            }
        }

        if callee.kind() != "identifier" {
            return Ok(ExprKind::Error(format!(
                "{} is not a constant expression",
                self.text(node)
            )));
        }

        let name = self.text(callee);
        if let Some(basic) = BasicType::from_name(name) {
            if args.len() != 1 {
                return Ok(ExprKind::Error(format!(
                    "conversion to {name} takes exactly one argument"
                )));
            }
            let operand = args.remove(0);
            return Ok(ExprKind::Conversion {
                ty: Type::Basic(basic),
                operand: Box::new(operand),
            });
        }

        Ok(ExprKind::Call {
            callee: self.intern(name),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use gofold_common::SourceMap;
    use num_bigint::BigInt;

    fn lower_source(src: &str) -> (Module, SymbolInterner) {
        let map = SourceMap::new();
        let id = map.add_file("test.go", src.to_string()).unwrap();
        let file = map.get(id).unwrap();
        let interner = SymbolInterner::new();
        let tree = parse(src).unwrap();
        let module = lower(&tree, &file, &interner).unwrap();
        (module, interner)
    }

    #[test]
    fn test_package_name() {
        let (module, interner) = lower_source("package consts\n");
        assert_eq!(interner.resolve(module.name), "consts");
        assert!(module.items.is_empty());
    }

    #[test]
    fn test_multiple_names_and_type() {
        let (module, interner) = lower_source("package main\nconst u, v float64 = 0, 3\n");
        let spec = module.const_specs().next().unwrap();
        let names: Vec<_> = spec.names.iter().map(|n| interner.resolve(n.name)).collect();
        assert_eq!(names, ["u", "v"]);
        assert_eq!(spec.ty.map(|t| t.node), Some(Type::Basic(BasicType::Float64)));
        assert_eq!(spec.values.len(), 2);
        assert_eq!(
            spec.values[1].kind,
            ExprKind::Literal(Literal::Int(BigInt::from(3)))
        );
    }

    #[test]
    fn test_group_iota_and_repetition() {
        let src = "package main\nconst (\n\tA = iota * 10\n\tB\n\tC\n)\n";
        let (module, _) = lower_source(src);
        let decl = module.const_decls().next().unwrap();
        assert!(decl.grouped);
        assert_eq!(decl.specs.len(), 3);
        assert_eq!(decl.specs[2].iota, 2);
        assert!(decl.specs[1].implicit);
        assert_eq!(decl.specs[2].values, decl.specs[0].values);
    }

    #[test]
    fn test_comment_in_group_is_skipped() {
        let src = "package main\nconst (\n\tsize int = 1024\n\teof = -1 // untyped\n)\n";
        let (module, _) = lower_source(src);
        let specs: Vec<_> = module.const_specs().collect();
        assert_eq!(specs.len(), 2);
        assert!(matches!(
            specs[1].values[0].kind,
            ExprKind::Unary { op: UnaryOp::Neg, .. }
        ));
    }

    #[test]
    fn test_conversion_call() {
        let (module, _) = lower_source("package main\nconst f = float32(1) + len(\"ab\")\n");
        let spec = module.const_specs().next().unwrap();
        let ExprKind::Binary { lhs, rhs, .. } = &spec.values[0].kind else {
            panic!("expected binary expression");
        };
        assert!(matches!(lhs.kind, ExprKind::Conversion { ty: Type::Basic(BasicType::Float32), .. }));
        assert!(matches!(rhs.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn test_functions_are_skipped() {
        let src = "package main\nfunc main() {}\nvar x = 1\nconst y = 2\n";
        let (module, _) = lower_source(src);
        assert_eq!(module.items.len(), 1);
    }

    #[test]
    fn test_imaginary_literal_is_error_expr() {
        let (module, _) = lower_source("package main\nconst z = 2i\n");
        let spec = module.const_specs().next().unwrap();
        assert!(matches!(spec.values[0].kind, ExprKind::Error(_)));
    }
}
