//! Compile-time integer expressions over module parameters.

use crate::ids::ExprId;
use dsir_common::{Arithmetic, Ident};
use serde::Serialize;
use std::fmt;

/// A parameter expression node.
///
/// Children are referenced by [`ExprId`] into the owning store, so equality
/// and hashing are structural one level deep. Because the store deduplicates,
/// that is the same as full structural equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum ParamExpr {
    /// An integer literal.
    Constant(i64),
    /// A free module parameter, unknown until instantiation.
    Parameter(Ident),
    /// `lhs + rhs`
    Add(ExprId, ExprId),
    /// `lhs - rhs`
    Sub(ExprId, ExprId),
    /// `lhs * rhs`
    Mul(ExprId, ExprId),
}

impl ParamExpr {
    /// Builds the binary node for `op`.
    pub fn binary(op: BinOp, lhs: ExprId, rhs: ExprId) -> Self {
        match op {
            BinOp::Add => ParamExpr::Add(lhs, rhs),
            BinOp::Sub => ParamExpr::Sub(lhs, rhs),
            BinOp::Mul => ParamExpr::Mul(lhs, rhs),
        }
    }

    /// Splits a binary node into its operator and operands.
    pub fn as_binary(&self) -> Option<(BinOp, ExprId, ExprId)> {
        match *self {
            ParamExpr::Add(l, r) => Some((BinOp::Add, l, r)),
            ParamExpr::Sub(l, r) => Some((BinOp::Sub, l, r)),
            ParamExpr::Mul(l, r) => Some((BinOp::Mul, l, r)),
            ParamExpr::Constant(_) | ParamExpr::Parameter(_) => None,
        }
    }

    /// Returns the value of a `Constant` node.
    pub fn as_constant(&self) -> Option<i64> {
        match *self {
            ParamExpr::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the child ids, left to right.
    pub fn children(&self) -> impl Iterator<Item = ExprId> {
        let pair = self.as_binary().map(|(_, l, r)| [l, r]);
        pair.into_iter().flatten()
    }

    /// The variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            ParamExpr::Constant(_) => "Constant",
            ParamExpr::Parameter(_) => "Parameter",
            ParamExpr::Add(..) => "Add",
            ParamExpr::Sub(..) => "Sub",
            ParamExpr::Mul(..) => "Mul",
        }
    }
}

/// The binary operators a [`ParamExpr`] can hold.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
}

impl BinOp {
    /// Evaluates `lhs op rhs`. `None` means overflow under [`Arithmetic::Checked`].
    pub fn apply(self, arithmetic: Arithmetic, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            BinOp::Add => arithmetic.add(lhs, rhs),
            BinOp::Sub => arithmetic.sub(lhs, rhs),
            BinOp::Mul => arithmetic.mul(lhs, rhs),
        }
    }

    /// The infix symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
