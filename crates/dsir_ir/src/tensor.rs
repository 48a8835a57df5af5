//! Multi-dimensional bit shapes with symbolic dimension sizes.

use crate::ids::ExprId;
use serde::Serialize;

/// The shape of a port: one expression id per dimension.
///
/// A 1-bit wire is rank 1 with a single `Constant(1)` dimension. Dimension
/// ids belong to the store of the module that owns the port.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct BitTensor {
    shape: Vec<ExprId>,
}

impl BitTensor {
    /// Creates a tensor from its dimension sizes.
    pub fn new(shape: Vec<ExprId>) -> Self {
        Self { shape }
    }

    /// Creates a rank-1 tensor.
    pub fn vector(size: ExprId) -> Self {
        Self { shape: vec![size] }
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the dimension sizes, outermost first.
    pub fn shape(&self) -> &[ExprId] {
        &self.shape
    }
}
