use crate::value::Constant;
use gofold_common::{Span, Symbol};
use smol_str::SmolStr;

/// One declared constant name and what it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstEntry {
    pub name: SmolStr,
    pub symbol: Symbol,
    pub span: Span,
    /// `None` when evaluation failed; the error is in the diagnostics.
    pub constant: Option<Constant>,
    pub iota: u64,
    /// The initializer was repeated from the previous spec of its block.
    pub implicit: bool,
    pub exported: bool,
}

/// Every declared constant in source order, redeclarations included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstTable {
    entries: Vec<ConstEntry>,
}

impl ConstTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: ConstEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConstEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last declaration of `name`, which shadows any earlier one.
    pub fn get(&self, name: &str) -> Option<&ConstEntry> {
        self.entries.iter().rev().find(|e| e.name == name)
    }

    /// Every declaration of `name` in source order.
    pub fn all(&self, name: &str) -> Vec<&ConstEntry> {
        self.entries.iter().filter(|e| e.name == name).collect()
    }

    pub fn value_of(&self, name: &str) -> Option<&Constant> {
        self.get(name)?.constant.as_ref()
    }
}
