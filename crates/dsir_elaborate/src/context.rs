//! Per-module elaboration state.
//!
//! [`ElaborationContext`] owns the [`Module`] under construction and the
//! genvar environment, and is threaded by `&mut` through every elaboration
//! call. It is created fresh for each module and consumed by
//! [`finish`](ElaborationContext::finish), so a failed elaboration leaves
//! nothing behind.

use crate::errors::{ElabError, ElabErrorKind};
use dsir_common::{Ident, Interner};
use dsir_ir::{ExprId, Module, ParamExpr};
use dsir_source::{FileId, Location, NodePath};
use indexmap::IndexMap;

/// What a name refers to in the genvar environment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GenvarState {
    /// Not a genvar.
    Undeclared,
    /// Declared, but not the variable of a loop being elaborated.
    Unresolved,
    /// The variable of an enclosing loop, standing for its start value.
    Resolved(ExprId),
}

/// Declared genvars and the loops that bind them.
///
/// A genvar only has a value inside the header and body of a loop over it.
/// Outside that scope it is declared but unresolved, so a port width that
/// names it is rejected rather than silently taking a loop value.
#[derive(Debug, Default)]
pub struct GenvarEnv {
    /// Declared genvars with the start of the most recent loop over each.
    vars: IndexMap<Ident, Option<ExprId>>,
    /// Genvars bound by the loops being elaborated, innermost last.
    scopes: Vec<(Ident, ExprId)>,
}

impl GenvarEnv {
    /// Declares a genvar with no value. Returns `false` if already declared.
    pub fn declare(&mut self, name: Ident) -> bool {
        if self.vars.contains_key(&name) {
            return false;
        }
        self.vars.insert(name, None);
        true
    }

    /// Returns `true` if `name` was declared as a genvar.
    pub fn is_declared(&self, name: Ident) -> bool {
        self.vars.contains_key(&name)
    }

    /// Looks up a name as seen by an expression at the current point.
    pub fn state(&self, name: Ident) -> GenvarState {
        if let Some((_, value)) = self.scopes.iter().rev().find(|(n, _)| *n == name) {
            return GenvarState::Resolved(*value);
        }
        if self.vars.contains_key(&name) {
            GenvarState::Unresolved
        } else {
            GenvarState::Undeclared
        }
    }

    /// Binds `name` to `value` until the matching [`exit`](Self::exit).
    pub fn enter(&mut self, name: Ident, value: ExprId) {
        self.scopes.push((name, value));
    }

    /// Ends the innermost binding of `name`.
    pub fn exit(&mut self, name: Ident) {
        if let Some(pos) = self.scopes.iter().rposition(|(n, _)| *n == name) {
            self.scopes.remove(pos);
        }
    }

    /// The start of the most recent loop over `name`, if any.
    pub fn last_start(&self, name: Ident) -> Option<ExprId> {
        self.vars.get(&name).copied().flatten()
    }

    /// Records the start of a finished loop over a declared genvar.
    pub fn record_start(&mut self, name: Ident, start: ExprId) {
        if let Some(slot) = self.vars.get_mut(&name) {
            *slot = Some(start);
        }
    }

    /// Consumes the environment, returning declaration-ordered entries.
    pub fn into_map(self) -> IndexMap<Ident, Option<ExprId>> {
        self.vars
    }
}

/// Mutable state for elaborating one module.
pub struct ElaborationContext<'a> {
    /// The module being built.
    pub module: Module,
    /// Genvar declarations and values.
    pub genvars: GenvarEnv,
    /// The session interner.
    pub interner: &'a Interner,
    file: FileId,
}

impl<'a> ElaborationContext<'a> {
    /// Creates a context for a fresh module from the document `file`.
    pub fn new(module: Module, interner: &'a Interner, file: FileId) -> Self {
        Self {
            module,
            genvars: GenvarEnv::default(),
            interner,
            file,
        }
    }

    /// Interns a name.
    pub fn ident(&self, name: &str) -> Ident {
        self.interner.get_or_intern(name)
    }

    /// Resolves an interned name.
    pub fn name(&self, ident: Ident) -> &'a str {
        self.interner.resolve(ident)
    }

    /// The document location of `path`.
    pub fn location(&self, path: &NodePath) -> Location {
        Location::new(self.file, path.clone())
    }

    /// Builds an error at `path`.
    pub fn error(&self, kind: ElabErrorKind, path: &NodePath) -> ElabError {
        ElabError::new(kind, self.location(path))
    }

    /// Interns `expr` into the module's store, attributing failures to `path`.
    pub fn intern(&mut self, expr: ParamExpr, path: &NodePath) -> Result<ExprId, ElabError> {
        self.module
            .exprs
            .intern(expr)
            .map_err(|e| ElabError::from_ir(e, Location::new(self.file, path.clone())))
    }

    /// Completes elaboration, moving the genvar environment into the module.
    pub fn finish(self) -> Module {
        let mut module = self.module;
        module.genvars = self.genvars.into_map();
        module
    }
}
