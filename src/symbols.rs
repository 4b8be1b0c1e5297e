use std::collections::HashMap;

use crate::{
    builtins::Builtins,
    types::ValueType,
    util::intern::{Interned, Interner},
};

/// Identifies one declaration. Redeclaring a name creates a new symbol, so
/// references resolved before the redeclaration keep their meaning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

#[derive(Debug)]
pub struct Symbol {
    pub name: Interned,
    pub ty: ValueType,
    /// Value of an `int` binding whose initializer folds to a constant.
    pub constant: Option<i64>,
    /// How many earlier declarations share this name.
    pub shadowed: u32,
}

/// The single global scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scope: HashMap<Interned, SymbolId>,
}

impl SymbolTable {
    /// Declares a new symbol. The name now resolves to it (last write wins).
    pub fn declare(&mut self, name: Interned, ty: ValueType, constant: Option<i64>) -> SymbolId {
        let shadowed = self
            .scope
            .get(&name)
            .map_or(0, |previous| self.get(*previous).shadowed + 1);
        let id = SymbolId(u32::try_from(self.symbols.len()).expect("too many symbols"));
        self.symbols.push(Symbol {
            name,
            ty,
            constant,
            shadowed,
        });
        self.scope.insert(name, id);
        id
    }

    pub fn lookup(&self, name: Interned) -> Option<SymbolId> {
        self.scope.get(&name).copied()
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// State shared by the compiler phases. The parser fills it in; the code
/// generator only reads it.
#[derive(Debug)]
pub struct Env<'b> {
    pub idents: Interner,
    pub symbols: SymbolTable,
    pub builtins: &'b Builtins,
}

impl Env<'_> {
    pub fn new(builtins: &Builtins) -> Env<'_> {
        Env {
            idents: Interner::with_capacity(128),
            symbols: SymbolTable::default(),
            builtins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaration_shadows() {
        let mut idents = Interner::with_capacity(2);
        let mut table = SymbolTable::default();
        let x = idents.intern("x");

        assert_eq!(table.lookup(x), None);
        let first = table.declare(x, ValueType::Int, Some(3));
        assert_eq!(table.lookup(x), Some(first));

        let second = table.declare(x, ValueType::Line, None);
        assert_ne!(first, second);
        assert_eq!(table.lookup(x), Some(second));
        assert_eq!(table.len(), 2);

        assert_eq!(table.get(first).ty, ValueType::Int);
        assert_eq!(table.get(first).constant, Some(3));
        assert_eq!(table.get(first).shadowed, 0);
        assert_eq!(table.get(second).ty, ValueType::Line);
        assert_eq!(table.get(second).shadowed, 1);
    }
}
