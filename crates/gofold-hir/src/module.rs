use crate::item::{ConstDecl, ConstSpec, Item, ItemKind};
use gofold_common::{SourceId, Symbol};

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct Module {
    /// Package name from the package clause.
    pub name: Symbol,
    pub source: SourceId,
    pub items: Vec<Item>,
}

impl Module {
    pub fn new(name: Symbol, source: SourceId) -> Self {
        Self {
            name,
            source,
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn const_decls(&self) -> impl Iterator<Item = &ConstDecl> {
        self.items.iter().map(|item| match &item.kind {
            ItemKind::Const(decl) => decl,
        })
    }

    /// Every constant spec in source order.
    pub fn const_specs(&self) -> impl Iterator<Item = &ConstSpec> {
        self.const_decls().flat_map(|decl| decl.specs.iter())
    }
}

/// All files of one package, evaluated in a shared scope.
#[derive(Debug, Default)]
pub struct Program {
    pub modules: Vec<Module>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    pub fn const_specs(&self) -> impl Iterator<Item = &ConstSpec> {
        self.modules.iter().flat_map(Module::const_specs)
    }
}
