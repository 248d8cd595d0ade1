//! Go frontend: tree-sitter parsing and lowering of `const` declarations.

mod parser;
mod lower;
pub mod literal;

pub use parser::{first_syntax_error, parse};
pub use lower::lower;

use gofold_common::{Diagnostic, SourceFile, Span, SymbolInterner};
use gofold_hir::Module;
use miette::{NamedSource, Result};

/// Parse a Go source file into HIR.
pub fn parse_file(source: &SourceFile, interner: &SymbolInterner) -> Result<Module> {
    let tree = parser::parse(&source.content)?;

    if let Some(node) = parser::first_syntax_error(&tree) {
        let span = Span::new(source.id, node.start_byte() as u32, node.end_byte() as u32);
        let message = if node.is_missing() {
            format!("syntax error: missing {}", node.kind())
        } else {
            "syntax error: unexpected input".to_string()
        };
        let diag = Diagnostic::error(message)
            .with_span(span)
            .with_label("here");
        return Err(miette::Report::new(diag)
            .with_source_code(NamedSource::new(source.name(), source.content.clone())));
    }

    let module = lower::lower(&tree, source, interner)?;
    tracing::debug!(
        file = %source.path.display(),
        items = module.items.len(),
        "lowered const declarations"
    );
    Ok(module)
}
