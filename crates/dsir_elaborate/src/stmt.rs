//! Module body statement dispatch.

use crate::context::ElaborationContext;
use crate::errors::{ElabError, ElabErrorKind};
use crate::generate::{elaborate_for, elaborate_generate};
use crate::wire::elaborate_wire;
use dsir_ast::Statement;
use dsir_source::NodePath;
use tracing::debug;

/// Elaborates one statement of a module body.
pub fn elaborate_statement(
    ctx: &mut ElaborationContext<'_>,
    stmt: &Statement,
    path: &NodePath,
) -> Result<(), ElabError> {
    debug!(kind = stmt.kind(), at = %path, "elaborating statement");
    match stmt {
        Statement::Wire(wire) => elaborate_wire(ctx, wire, &path.field("Wire")),
        Statement::Genvar(name) => {
            let ident = ctx.ident(name);
            if !ctx.genvars.declare(ident) {
                return Err(ctx.error(ElabErrorKind::DuplicateGenvar(name.clone()), path));
            }
            Ok(())
        }
        Statement::Generate(items) => elaborate_generate(ctx, items, &path.field("Generate")),
        Statement::For(block) => {
            let lp = elaborate_for(ctx, block, &path.field("For"))?;
            ctx.module.loops.push(lp);
            Ok(())
        }
        Statement::Assign(_) | Statement::Instance(_) => {
            debug!(kind = stmt.kind(), at = %path, "skipping module-level statement");
            Ok(())
        }
    }
}
