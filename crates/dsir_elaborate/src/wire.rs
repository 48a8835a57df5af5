//! Port registration and bit-shape derivation.

use crate::context::ElaborationContext;
use crate::errors::{ElabError, ElabErrorKind};
use crate::expr::lower_expr;
use dsir_ast::{Direction, Expr, Range, WireDecl};
use dsir_ir::BitTensor;
use dsir_source::NodePath;
use tracing::debug;

/// Elaborates a `Wire` statement.
///
/// Internal wires (no direction) are skipped. `Input` and `InOut` ports go
/// to the module's inputs and `Output` ports to its outputs. A port name may
/// be registered only once across both maps.
pub fn elaborate_wire(
    ctx: &mut ElaborationContext<'_>,
    wire: &WireDecl,
    path: &NodePath,
) -> Result<(), ElabError> {
    let Some(io) = &wire.io else {
        debug!(wire = %wire.name, "skipping internal wire");
        return Ok(());
    };
    let to_inputs = match io {
        Direction::Input | Direction::InOut => true,
        Direction::Output => false,
        Direction::Other(kind) => {
            return Err(ctx.error(
                ElabErrorKind::UnknownIoKind(kind.clone()),
                &path.field("io"),
            ))
        }
    };

    let name = ctx.ident(&wire.name);
    if ctx.module.has_port(name) {
        return Err(ctx.error(ElabErrorKind::DuplicatePort(wire.name.clone()), path));
    }

    let shape = width_to_shape(ctx, wire.width.as_ref(), &path.field("width"))?;
    debug!(port = %wire.name, ?io, rank = shape.rank(), "registered port");
    if to_inputs {
        ctx.module.inputs.insert(name, shape);
    } else {
        ctx.module.outputs.insert(name, shape);
    }
    Ok(())
}

/// Derives the shape of a wire from its bit range.
///
/// No range is a single bit, `[Constant(1)]`. A range `[start:0]` becomes
/// `[start]`: the upper index is recorded as written, not as a bit count.
/// The low index must be the literal `0`.
pub fn width_to_shape(
    ctx: &mut ElaborationContext<'_>,
    width: Option<&Range>,
    path: &NodePath,
) -> Result<BitTensor, ElabError> {
    let Some(range) = width else {
        return Ok(BitTensor::vector(ctx.module.exprs.constant(1)));
    };
    match &range.end {
        Some(Expr::ConstantInt(0)) => {}
        Some(other) => {
            return Err(ctx.error(
                ElabErrorKind::InvalidWidth(format!(
                    "low index must be the literal 0, found {}",
                    describe_bound(other)
                )),
                &path.field("end"),
            ))
        }
        None => {
            return Err(ctx.error(
                ElabErrorKind::InvalidWidth("range has no low index".to_string()),
                path,
            ))
        }
    }
    let size = lower_expr(ctx, &range.start, &path.field("start"))?;
    Ok(BitTensor::vector(size))
}

fn describe_bound(expr: &Expr) -> String {
    match expr {
        Expr::ConstantInt(v) => v.to_string(),
        Expr::Identifier(name) => format!("`{name}`"),
        other => format!("a {} expression", other.kind()),
    }
}
