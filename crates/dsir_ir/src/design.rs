//! Top-level design container.
//!
//! A [`Design`] holds the successfully elaborated modules of a translation
//! unit in declaration order, with a name index for lookup.

use crate::arena::Arena;
use crate::error::IrError;
use crate::ids::ModuleId;
use crate::module::Module;
use dsir_common::Ident;
use std::collections::HashMap;

/// The modules of an elaborated translation unit.
#[derive(Debug, Clone, Default)]
pub struct Design {
    modules: Arena<ModuleId, Module>,
    by_name: HashMap<Ident, ModuleId>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. Fails if a module with the same name is present.
    pub fn insert(&mut self, module: Module) -> Result<ModuleId, IrError> {
        if let Some(&existing) = self.by_name.get(&module.name) {
            return Err(IrError::DuplicateModule(existing));
        }
        let name = module.name;
        let id = self.modules.alloc(module);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Returns the module with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds.
    pub fn get(&self, id: ModuleId) -> &Module {
        &self.modules[id]
    }

    /// Finds a module by name.
    pub fn find(&self, name: Ident) -> Option<&Module> {
        self.by_name.get(&name).map(|&id| &self.modules[id])
    }

    /// Returns the id of a module by name.
    pub fn id_of(&self, name: Ident) -> Option<ModuleId> {
        self.by_name.get(&name).copied()
    }

    /// Iterates over modules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter()
    }

    /// Returns the number of modules in the design.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if the design has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsir_common::{Arithmetic, ContentHash, Interner};

    fn module(names: &Interner, name: &str) -> Module {
        Module::new(
            names.get_or_intern(name),
            Arithmetic::Wrapping,
            ContentHash::from_bytes(name.as_bytes()),
        )
    }

    #[test]
    fn insert_and_find() {
        let names = Interner::new();
        let mut design = Design::new();
        let a = design.insert(module(&names, "a")).unwrap();
        let b = design.insert(module(&names, "b")).unwrap();
        assert_ne!(a, b);
        assert_eq!(design.module_count(), 2);
        assert_eq!(design.id_of(names.get_or_intern("b")), Some(b));
        assert!(design.find(names.get_or_intern("a")).is_some());
        assert!(design.find(names.get_or_intern("c")).is_none());
    }

    #[test]
    fn duplicate_rejected() {
        let names = Interner::new();
        let mut design = Design::new();
        let first = design.insert(module(&names, "a")).unwrap();
        let err = design.insert(module(&names, "a")).unwrap_err();
        assert_eq!(err, IrError::DuplicateModule(first));
        assert_eq!(design.module_count(), 1);
    }

    #[test]
    fn iteration_order() {
        let names = Interner::new();
        let mut design = Design::new();
        for n in ["z", "a", "m"] {
            design.insert(module(&names, n)).unwrap();
        }
        let order: Vec<_> = design
            .iter()
            .map(|(_, m)| names.resolve(m.name).to_string())
            .collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }
}
