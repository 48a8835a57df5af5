//! Lowering AST expressions to parameter expressions.

use crate::context::{ElaborationContext, GenvarState};
use crate::errors::{ElabError, ElabErrorKind};
use dsir_ast::{BinArithOp, Expr};
use dsir_ir::{BinOp, ExprId, ParamExpr};
use dsir_source::NodePath;

/// Lowers a compile-time integer expression into the module's store.
///
/// Identifiers naming the genvar of an enclosing loop resolve to that loop's
/// start. Other declared genvars are unresolved and rejected. Any remaining
/// identifier becomes a free `Parameter`. Only
/// integer literals and `+ - *` are accepted; anything else fails with
/// [`ElabErrorKind::UnknownExpressionNode`].
pub fn lower_expr(
    ctx: &mut ElaborationContext<'_>,
    expr: &Expr,
    path: &NodePath,
) -> Result<ExprId, ElabError> {
    match expr {
        Expr::ConstantInt(value) => Ok(ctx.module.exprs.constant(*value)),
        Expr::Identifier(name) => lower_identifier(ctx, name, path),
        Expr::BinaryArithmeticOperation(lhs, op, rhs) => {
            let op = match op {
                BinArithOp::Add => BinOp::Add,
                BinArithOp::Sub => BinOp::Sub,
                BinArithOp::Mul => BinOp::Mul,
                BinArithOp::Div | BinArithOp::Mod => {
                    return Err(ctx.error(
                        ElabErrorKind::UnknownExpressionNode(format!("{op:?}")),
                        path,
                    ))
                }
            };
            let base = path.field("BinaryArithmeticOperation");
            let l = lower_expr(ctx, lhs, &base.index(0))?;
            let r = lower_expr(ctx, rhs, &base.index(2))?;
            ctx.intern(ParamExpr::binary(op, l, r), path)
        }
        other => Err(ctx.error(
            ElabErrorKind::UnknownExpressionNode(other.kind().to_string()),
            path,
        )),
    }
}

fn lower_identifier(
    ctx: &mut ElaborationContext<'_>,
    name: &str,
    path: &NodePath,
) -> Result<ExprId, ElabError> {
    let ident = ctx.ident(name);
    match ctx.genvars.state(ident) {
        GenvarState::Resolved(id) => Ok(id),
        GenvarState::Unresolved => Err(ctx.error(
            ElabErrorKind::UninitializedGenvar(name.to_string()),
            path,
        )),
        GenvarState::Undeclared => Ok(ctx.module.exprs.parameter(ident)),
    }
}

/// Checks that `expr` is a well-formed hardware expression.
///
/// Hardware expressions may use identifiers, integer literals, and bitwise,
/// arithmetic and relational operators. Nothing is interned.
pub fn check_hardware_expr(
    ctx: &ElaborationContext<'_>,
    expr: &Expr,
    path: &NodePath,
) -> Result<(), ElabError> {
    match expr {
        Expr::Identifier(_) | Expr::ConstantInt(_) => Ok(()),
        Expr::String(_) => Err(ctx.error(
            ElabErrorKind::UnknownExpressionNode(expr.kind().to_string()),
            path,
        )),
        Expr::UnaryBitOperation(_, operand) | Expr::UnaryArithmeticOperation(_, operand) => {
            check_hardware_expr(ctx, operand, &path.field(expr.kind()).index(1))
        }
        Expr::BinaryBitOperation(lhs, _, rhs)
        | Expr::BinaryArithmeticOperation(lhs, _, rhs)
        | Expr::RelationalOperation(lhs, _, rhs) => {
            let base = path.field(expr.kind());
            check_hardware_expr(ctx, lhs, &base.index(0))?;
            check_hardware_expr(ctx, rhs, &base.index(2))
        }
    }
}
