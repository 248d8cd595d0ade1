use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::sync::RwLock;

/// An interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// The blank identifier `_`, interned first by every interner.
    pub const BLANK: Symbol = Symbol(0);

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_blank(self) -> bool {
        self == Self::BLANK
    }
}

/// Thread-safe string interner for identifiers.
#[derive(Debug)]
pub struct SymbolInterner {
    map: RwLock<FxHashMap<SmolStr, Symbol>>,
    strings: RwLock<Vec<SmolStr>>,
}

impl SymbolInterner {
    pub fn new() -> Self {
        let interner = Self {
            map: RwLock::new(FxHashMap::default()),
            strings: RwLock::new(Vec::new()),
        };
        let blank = interner.intern("_");
        debug_assert_eq!(blank, Symbol::BLANK);
        interner
    }

    pub fn intern(&self, s: &str) -> Symbol {
        if let Some(sym) = self.lookup(s) {
            return sym;
        }

        let mut map = self.map.write().unwrap_or_else(|e| e.into_inner());
        let mut strings = self.strings.write().unwrap_or_else(|e| e.into_inner());

        // Another writer may have won the race.
        if let Some(&sym) = map.get(s) {
            return sym;
        }

        let sym = Symbol(strings.len() as u32);
        let smol = SmolStr::new(s);
        strings.push(smol.clone());
        map.insert(smol, sym);
        sym
    }

    /// Find an already interned string without inserting it.
    pub fn lookup(&self, s: &str) -> Option<Symbol> {
        let map = self.map.read().unwrap_or_else(|e| e.into_inner());
        map.get(s).copied()
    }

    pub fn resolve(&self, sym: Symbol) -> SmolStr {
        let strings = self.strings.read().unwrap_or_else(|e| e.into_inner());
        strings[sym.0 as usize].clone()
    }

    pub fn len(&self) -> usize {
        self.strings.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SymbolInterner {
    fn default() -> Self {
        Self::new()
    }
}
