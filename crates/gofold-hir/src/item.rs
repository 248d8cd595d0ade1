use crate::expr::Expr;
use crate::types::Type;
use gofold_common::{Span, Spanned, Symbol};

/// Visibility of a package-level name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Private,
    /// Capitalized names are exported.
    Public,
}

impl Visibility {
    pub fn of_name(name: &str) -> Self {
        if name.chars().next().is_some_and(char::is_uppercase) {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// One name on the left of a constant spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstName {
    pub name: Symbol,
    pub vis: Visibility,
    pub span: Span,
}

/// One `a, b T = x, y` line of a const declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstSpec {
    pub names: Vec<ConstName>,
    pub ty: Option<Spanned<Type>>,
    pub values: Vec<Expr>,
    /// Index of this spec inside its declaration.
    pub iota: u64,
    /// The type and values were repeated from the previous spec.
    pub implicit: bool,
    pub span: Span,
}

/// A `const` declaration, either a single spec or a parenthesized group.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub specs: Vec<ConstSpec>,
    pub grouped: bool,
    pub span: Span,
}

/// A top-level item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Const(ConstDecl),
}

impl Item {
    pub fn new(kind: ItemKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_follows_capitalization() {
        assert_eq!(Visibility::of_name("Pi"), Visibility::Public);
        assert_eq!(Visibility::of_name("size"), Visibility::Private);
        assert_eq!(Visibility::of_name("_"), Visibility::Private);
    }
}
