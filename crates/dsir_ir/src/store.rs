//! The per-module expression store: interning with constant folding.

use crate::arena::Arena;
use crate::error::IrError;
use crate::expr::{BinOp, ParamExpr};
use crate::ids::ExprId;
use dsir_common::{Arithmetic, Ident};
use std::collections::HashMap;

/// Interns [`ParamExpr`] nodes for one module.
///
/// Every node is stored once. Interning a node that is structurally equal to
/// one already stored (after folding) returns the existing id, so id equality
/// is expression equality. The store only grows: ids are never reused and a
/// stored node is never modified.
///
/// Folding is a single local rule: a binary node whose two children are both
/// `Constant` becomes the `Constant` of the result. No other algebra is
/// applied, so `x + 1` and `1 + x` are different expressions.
///
/// ```
/// use dsir_common::Interner;
/// use dsir_ir::{ExprStore, ParamExpr};
///
/// let names = Interner::new();
/// let mut store = ExprStore::new();
/// let n = store.parameter(names.get_or_intern("N"));
/// let one = store.constant(1);
/// let n_minus_1 = store.sub(n, one).unwrap();
///
/// let two = store.constant(2);
/// let three = store.constant(3);
/// assert_eq!(store.add(one, two).unwrap(), three);
/// assert_eq!(store.get(n_minus_1), &ParamExpr::Sub(n, one));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExprStore {
    nodes: Arena<ExprId, ParamExpr>,
    dedup: HashMap<ParamExpr, ExprId>,
    arithmetic: Arithmetic,
}

impl ExprStore {
    /// Creates an empty store with wrapping arithmetic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given overflow policy.
    pub fn with_arithmetic(arithmetic: Arithmetic) -> Self {
        Self {
            arithmetic,
            ..Self::default()
        }
    }

    /// The overflow policy used for folding.
    pub fn arithmetic(&self) -> Arithmetic {
        self.arithmetic
    }

    /// Interns a node whose children are ids from this store.
    ///
    /// Returns the id of the stored (possibly folded) node. Fails if a child
    /// id is not in this store, or if folding overflows under checked
    /// arithmetic. A failed call leaves the store unchanged.
    pub fn intern(&mut self, expr: ParamExpr) -> Result<ExprId, IrError> {
        let canonical = self.fold(expr)?;
        Ok(self.insert_canonical(canonical))
    }

    /// Interns `Constant(value)`.
    pub fn constant(&mut self, value: i64) -> ExprId {
        self.insert_canonical(ParamExpr::Constant(value))
    }

    /// Interns `Parameter(name)`.
    pub fn parameter(&mut self, name: Ident) -> ExprId {
        self.insert_canonical(ParamExpr::Parameter(name))
    }

    /// Interns `lhs + rhs`.
    pub fn add(&mut self, lhs: ExprId, rhs: ExprId) -> Result<ExprId, IrError> {
        self.intern(ParamExpr::Add(lhs, rhs))
    }

    /// Interns `lhs - rhs`.
    pub fn sub(&mut self, lhs: ExprId, rhs: ExprId) -> Result<ExprId, IrError> {
        self.intern(ParamExpr::Sub(lhs, rhs))
    }

    /// Interns `lhs * rhs`.
    pub fn mul(&mut self, lhs: ExprId, rhs: ExprId) -> Result<ExprId, IrError> {
        self.intern(ParamExpr::Mul(lhs, rhs))
    }

    /// Interns `lhs op rhs`.
    pub fn binary(&mut self, op: BinOp, lhs: ExprId, rhs: ExprId) -> Result<ExprId, IrError> {
        self.intern(ParamExpr::binary(op, lhs, rhs))
    }

    /// Finds the id of a node without inserting it.
    ///
    /// The node is folded first, so looking up `Add(c2, c3)` finds the id of
    /// `Constant(5)` when that is stored.
    pub fn lookup(&self, expr: &ParamExpr) -> Option<ExprId> {
        let canonical = self.fold(*expr).ok()?;
        self.dedup.get(&canonical).copied()
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    pub fn get(&self, id: ExprId) -> &ParamExpr {
        &self.nodes[id]
    }

    /// Returns the node for `id`, or `None` if it was not issued by this store.
    pub fn try_get(&self, id: ExprId) -> Option<&ParamExpr> {
        self.nodes.try_get(id)
    }

    /// Returns `true` if `id` was issued by this store.
    pub fn contains(&self, id: ExprId) -> bool {
        self.nodes.contains(id)
    }

    /// Returns the value of `id` if it is a `Constant`.
    pub fn constant_value(&self, id: ExprId) -> Option<i64> {
        self.try_get(id).and_then(ParamExpr::as_constant)
    }

    /// Returns the number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over `(id, node)` pairs in allocation order.
    ///
    /// Children always precede their parents in this order.
    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &ParamExpr)> {
        self.nodes.iter()
    }

    fn fold(&self, expr: ParamExpr) -> Result<ParamExpr, IrError> {
        let Some((op, lhs, rhs)) = expr.as_binary() else {
            return Ok(expr);
        };
        let l = self.try_get(lhs).ok_or(IrError::UnknownExpression(lhs))?;
        let r = self.try_get(rhs).ok_or(IrError::UnknownExpression(rhs))?;
        match (l.as_constant(), r.as_constant()) {
            (Some(a), Some(b)) => op
                .apply(self.arithmetic, a, b)
                .map(ParamExpr::Constant)
                .ok_or(IrError::ArithmeticOverflow { op, lhs: a, rhs: b }),
            _ => Ok(expr),
        }
    }

    fn insert_canonical(&mut self, expr: ParamExpr) -> ExprId {
        if let Some(&id) = self.dedup.get(&expr) {
            return id;
        }
        let id = self.nodes.alloc(expr);
        self.dedup.insert(expr, id);
        tracing::trace!(%id, node = ?expr, "interned expression");
        id
    }
}
