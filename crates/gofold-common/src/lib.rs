mod span;
mod symbol;
mod source;
mod diagnostic;

pub use span::{Span, Spanned};
pub use symbol::{Symbol, SymbolInterner};
pub use source::{SourceFile, SourceId, SourceMap};
pub use diagnostic::{Diagnostic, DiagnosticLevel};
