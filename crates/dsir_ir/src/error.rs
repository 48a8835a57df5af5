//! Errors raised by the expression store and design container.

use crate::expr::BinOp;
use crate::ids::{ExprId, ModuleId};

/// An IR construction error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// A node referenced a child id that this store never issued.
    #[error("expression {0} is not in this store")]
    UnknownExpression(ExprId),

    /// Constant folding overflowed `i64` under checked arithmetic.
    #[error("constant folding overflowed: {lhs} {op} {rhs}")]
    ArithmeticOverflow {
        /// The folded operator.
        op: BinOp,
        /// Left operand.
        lhs: i64,
        /// Right operand.
        rhs: i64,
    },

    /// A module with the same name is already in the design.
    #[error("a module with this name already exists as {0}")]
    DuplicateModule(ModuleId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            IrError::UnknownExpression(ExprId::from_raw(9)).to_string(),
            "expression %9 is not in this store"
        );
        let overflow = IrError::ArithmeticOverflow {
            op: BinOp::Mul,
            lhs: i64::MAX,
            rhs: 2,
        };
        assert_eq!(
            overflow.to_string(),
            format!("constant folding overflowed: {} * 2", i64::MAX)
        );
    }
}
