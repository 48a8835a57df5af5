//! Elaborated modules.

use crate::ids::ExprId;
use crate::store::ExprStore;
use crate::tensor::BitTensor;
use dsir_common::{Arithmetic, ContentHash, Ident};
use indexmap::IndexMap;
use serde::Serialize;

/// A module after elaboration.
///
/// Every [`ExprId`] held anywhere in the module (port shapes, parameters,
/// genvar values, loop bounds) names a node in [`exprs`](Self::exprs).
/// A module is built by a single elaboration pass and not modified after.
#[derive(Debug, Clone)]
pub struct Module {
    /// The module name.
    pub name: Ident,
    /// Declared parameters, in declaration order.
    pub params: Vec<ModuleParam>,
    /// Input ports, including `inout` ports.
    pub inputs: IndexMap<Ident, BitTensor>,
    /// Output ports.
    pub outputs: IndexMap<Ident, BitTensor>,
    /// Declared genvars, each with the start of the last loop over it.
    pub genvars: IndexMap<Ident, Option<ExprId>>,
    /// Generate loops, in source order.
    pub loops: Vec<GenerateLoop>,
    /// The module's expression store.
    pub exprs: ExprStore,
    /// Hash of the AST the module was elaborated from.
    pub content_hash: ContentHash,
}

/// A declared module parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct ModuleParam {
    /// The parameter name.
    pub name: Ident,
    /// The `Parameter(name)` node.
    pub expr: ExprId,
    /// The lowered default value, if one was declared.
    pub default: Option<ExprId>,
}

/// The header of a generate `for` loop: `for (genvar = start; genvar < end; genvar += step)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct GenerateLoop {
    /// The generate-block label.
    pub label: Option<Ident>,
    /// The loop variable.
    pub genvar: Ident,
    /// First value of the genvar.
    pub start: ExprId,
    /// Exclusive upper bound.
    pub end: ExprId,
    /// Increment per iteration.
    pub step: ExprId,
}

/// Which port map a port lives in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum PortDirection {
    /// In [`Module::inputs`].
    Input,
    /// In [`Module::outputs`].
    Output,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: Ident, arithmetic: Arithmetic, content_hash: ContentHash) -> Self {
        Self {
            name,
            params: Vec::new(),
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            genvars: IndexMap::new(),
            loops: Vec::new(),
            exprs: ExprStore::with_arithmetic(arithmetic),
            content_hash,
        }
    }

    /// Looks up a port in either map.
    pub fn port(&self, name: Ident) -> Option<(PortDirection, &BitTensor)> {
        self.inputs
            .get(&name)
            .map(|t| (PortDirection::Input, t))
            .or_else(|| self.outputs.get(&name).map(|t| (PortDirection::Output, t)))
    }

    /// Returns `true` if `name` is an input or output.
    pub fn has_port(&self, name: Ident) -> bool {
        self.inputs.contains_key(&name) || self.outputs.contains_key(&name)
    }

    /// Iterates over all ports, inputs first, each in declaration order.
    pub fn ports(&self) -> impl Iterator<Item = (Ident, PortDirection, &BitTensor)> {
        let inputs = self.inputs.iter().map(|(n, t)| (*n, PortDirection::Input, t));
        let outputs = self.outputs.iter().map(|(n, t)| (*n, PortDirection::Output, t));
        inputs.chain(outputs)
    }

    /// Looks up a declared parameter.
    pub fn param(&self, name: Ident) -> Option<&ModuleParam> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Iterates over every expression id the module refers to outside its store.
    pub fn roots(&self) -> impl Iterator<Item = ExprId> + '_ {
        let ports = self.ports().flat_map(|(_, _, t)| t.shape().iter().copied());
        let params = self
            .params
            .iter()
            .flat_map(|p| std::iter::once(p.expr).chain(p.default));
        let genvars = self.genvars.values().filter_map(|v| *v);
        let loops = self.loops.iter().flat_map(|l| [l.start, l.end, l.step]);
        ports.chain(params).chain(genvars).chain(loops)
    }
}
