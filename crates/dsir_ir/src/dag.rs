//! Graph view of an expression store, and module verification.

use crate::ids::ExprId;
use crate::module::Module;
use crate::store::ExprStore;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::BTreeSet;

/// A problem found by [`verify_module`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The module refers to an id its store does not contain.
    #[error("{owner} refers to {id}, which is not in the module's store")]
    DanglingReference {
        /// What holds the reference, e.g. `port` or `%4`.
        owner: String,
        /// The missing id.
        id: ExprId,
    },
    /// A node is its own ancestor.
    #[error("expression graph has a cycle through {0}")]
    Cycle(ExprId),
}

/// A directed graph with an edge from each node to each of its children.
pub struct ExprGraph {
    graph: DiGraph<ExprId, ()>,
}

impl ExprGraph {
    /// Builds the graph for every node of `store`.
    ///
    /// Node `i` of the graph is `ExprId` `i`. Edges to children missing from
    /// the store are dropped; [`verify_module`] reports those separately.
    pub fn build(store: &ExprStore) -> Self {
        let mut graph = DiGraph::with_capacity(store.len(), store.len());
        for (id, _) in store.iter() {
            graph.add_node(id);
        }
        for (id, node) in store.iter() {
            for child in node.children().filter(|c| store.contains(*c)) {
                graph.add_edge(index(id), index(child), ());
            }
        }
        Self { graph }
    }

    /// Returns every node reachable from `roots`, roots included.
    pub fn reachable(&self, roots: impl IntoIterator<Item = ExprId>) -> BTreeSet<ExprId> {
        let mut seen = BTreeSet::new();
        for root in roots {
            if root.as_raw() as usize >= self.graph.node_count() || seen.contains(&root) {
                continue;
            }
            let mut dfs = Dfs::new(&self.graph, index(root));
            while let Some(n) = dfs.next(&self.graph) {
                seen.insert(self.graph[n]);
            }
        }
        seen
    }

    /// Returns all nodes ordered so that every child precedes its parents.
    pub fn topo_order(&self) -> Result<Vec<ExprId>, VerifyError> {
        let mut order = petgraph::algo::toposort(&self.graph, None)
            .map_err(|cycle| VerifyError::Cycle(self.graph[cycle.node_id()]))?;
        order.reverse();
        Ok(order.into_iter().map(|n| self.graph[n]).collect())
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

fn index(id: ExprId) -> NodeIndex {
    NodeIndex::new(id.as_raw() as usize)
}

/// Checks that a module's expression references are well formed.
///
/// Every id held by a port, parameter, genvar or loop must be in the
/// module's store, every child of a stored node must be in the store, and the
/// graph must be acyclic.
pub fn verify_module(module: &Module) -> Result<(), VerifyError> {
    let store = &module.exprs;
    for id in module.roots() {
        if !store.contains(id) {
            return Err(VerifyError::DanglingReference {
                owner: "module".to_string(),
                id,
            });
        }
    }
    for (id, node) in store.iter() {
        if let Some(child) = node.children().find(|c| !store.contains(*c)) {
            return Err(VerifyError::DanglingReference {
                owner: id.to_string(),
                id: child,
            });
        }
    }
    ExprGraph::build(store).topo_order()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::BitTensor;
    use dsir_common::{Arithmetic, ContentHash, Interner};

    fn sample(names: &Interner) -> (ExprStore, [ExprId; 5]) {
        let mut store = ExprStore::new();
        let n = store.parameter(names.get_or_intern("N"));
        let one = store.constant(1);
        let n1 = store.sub(n, one).unwrap();
        let w = store.parameter(names.get_or_intern("W"));
        let prod = store.mul(n1, w).unwrap();
        (store, [n, one, n1, w, prod])
    }

    #[test]
    fn reachable_from_root() {
        let names = Interner::new();
        let (store, [n, one, n1, w, prod]) = sample(&names);
        let graph = ExprGraph::build(&store);
        let from_n1 = graph.reachable([n1]);
        assert_eq!(from_n1, BTreeSet::from([n, one, n1]));
        let from_prod = graph.reachable([prod]);
        assert!(from_prod.contains(&w));
        assert_eq!(from_prod.len(), 5);
    }

    #[test]
    fn reachable_ignores_foreign_ids() {
        let names = Interner::new();
        let (store, _) = sample(&names);
        let graph = ExprGraph::build(&store);
        assert!(graph.reachable([ExprId::from_raw(100)]).is_empty());
    }

    #[test]
    fn topo_order_children_first() {
        let names = Interner::new();
        let (store, _) = sample(&names);
        let order = ExprGraph::build(&store).topo_order().unwrap();
        assert_eq!(order.len(), store.len());
        let pos = |id: ExprId| order.iter().position(|x| *x == id).unwrap();
        for (id, node) in store.iter() {
            for child in node.children() {
                assert!(pos(child) < pos(id));
            }
        }
    }

    #[test]
    fn verify_accepts_consistent_module() {
        let names = Interner::new();
        let mut module = Module::new(
            names.get_or_intern("m"),
            Arithmetic::Wrapping,
            ContentHash::from_bytes(b"m"),
        );
        let one = module.exprs.constant(1);
        module.inputs.insert(names.get_or_intern("a"), BitTensor::vector(one));
        assert_eq!(verify_module(&module), Ok(()));
    }

    #[test]
    fn verify_rejects_dangling_port() {
        let names = Interner::new();
        let mut module = Module::new(
            names.get_or_intern("m"),
            Arithmetic::Wrapping,
            ContentHash::from_bytes(b"m"),
        );
        let foreign = ExprId::from_raw(7);
        module.outputs.insert(names.get_or_intern("y"), BitTensor::vector(foreign));
        assert!(matches!(
            verify_module(&module),
            Err(VerifyError::DanglingReference { id, .. }) if id == foreign
        ));
    }
}
