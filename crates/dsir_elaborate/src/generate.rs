//! Generate regions and restricted generate `for` loops.
//!
//! Only loop headers are elaborated: a loop yields its `(start, end, step)`
//! bounds as expression ids. The body is checked but not unrolled.

use crate::context::ElaborationContext;
use crate::errors::{ElabError, ElabErrorKind};
use crate::expr::{check_hardware_expr, lower_expr};
use dsir_ast::{BinArithOp, Expr, ForBlock, RelOp, Statement};
use dsir_ir::{ExprId, GenerateLoop};
use dsir_source::NodePath;
use tracing::debug;

/// Elaborates the statements of a `generate` region.
///
/// Every statement must be a `for` loop.
pub fn elaborate_generate(
    ctx: &mut ElaborationContext<'_>,
    items: &[Statement],
    path: &NodePath,
) -> Result<(), ElabError> {
    for (i, item) in items.iter().enumerate() {
        let item_path = path.index(i);
        match item {
            Statement::For(block) => {
                let lp = elaborate_for(ctx, block, &item_path.field("For"))?;
                ctx.module.loops.push(lp);
            }
            other => {
                return Err(ctx.error(
                    ElabErrorKind::UnsupportedGenerateStatement(other.kind()),
                    &item_path,
                ))
            }
        }
    }
    Ok(())
}

/// Elaborates the header of a generate `for` loop.
///
/// The loop must read `for (g = init; g < end; g = g + step)` where `g` is a
/// declared genvar. Inside the header and body `g` stands for the start
/// value; after the loop it is unresolved again. Without an initializer the
/// start of the previous loop over `g` is reused.
pub fn elaborate_for(
    ctx: &mut ElaborationContext<'_>,
    block: &ForBlock,
    path: &NodePath,
) -> Result<GenerateLoop, ElabError> {
    let genvar = ctx.ident(&block.genvar);
    if !ctx.genvars.is_declared(genvar) {
        return Err(ctx.error(
            ElabErrorKind::UnknownGenvar(block.genvar.clone()),
            &path.field("genvar"),
        ));
    }

    let start = match &block.init {
        Some(init) => lower_expr(ctx, init, &path.field("init"))?,
        // Provisional until loop assignments are committed by unrolling: an
        // init-less loop resumes from the previous loop's start.
        None => match ctx.genvars.last_start(genvar) {
            Some(value) => value,
            None => {
                return Err(ctx.error(
                    ElabErrorKind::UninitializedGenvar(block.genvar.clone()),
                    &path.field("init"),
                ))
            }
        },
    };

    ctx.genvars.enter(genvar, start);
    let header = loop_header(ctx, block, path);
    ctx.genvars.exit(genvar);
    let (end, step) = header?;
    ctx.genvars.record_start(genvar, start);

    let label = block.name.as_deref().map(|n| ctx.ident(n));
    debug!(
        genvar = %block.genvar,
        label = block.name.as_deref().unwrap_or("<anon>"),
        %start,
        %end,
        %step,
        "elaborated generate loop"
    );
    Ok(GenerateLoop {
        label,
        genvar,
        start,
        end,
        step,
    })
}

/// Condition, step and body of a loop whose genvar is bound.
fn loop_header(
    ctx: &mut ElaborationContext<'_>,
    block: &ForBlock,
    path: &NodePath,
) -> Result<(ExprId, ExprId), ElabError> {
    let end = loop_bound(ctx, block, &path.field("cond"))?;
    let step = loop_step(ctx, block, &path.field("step"))?;
    check_body(ctx, &block.body, &path.field("body"))?;
    Ok((end, step))
}

/// `genvar < end`, returning the lowered `end`.
fn loop_bound(
    ctx: &mut ElaborationContext<'_>,
    block: &ForBlock,
    path: &NodePath,
) -> Result<ExprId, ElabError> {
    let unsupported = ElabErrorKind::UnsupportedCondition;
    let Expr::RelationalOperation(lhs, op, rhs) = &block.cond else {
        let why = format!("expected a comparison, found {}", block.cond.kind());
        return Err(ctx.error(unsupported(why), path));
    };
    if !is_identifier(lhs, &block.genvar) {
        let why = format!("the left operand must be the genvar `{}`", block.genvar);
        return Err(ctx.error(unsupported(why), path));
    }
    if *op != RelOp::Lt {
        let why = format!("expected `<`, found {op:?}");
        return Err(ctx.error(unsupported(why), path));
    }
    lower_expr(ctx, rhs, &path.field("RelationalOperation").index(2))
}

/// `genvar = genvar + step`, returning the lowered `step`.
fn loop_step(
    ctx: &mut ElaborationContext<'_>,
    block: &ForBlock,
    path: &NodePath,
) -> Result<ExprId, ElabError> {
    let unsupported = ElabErrorKind::UnsupportedStep;
    if block.step.target != block.genvar {
        let why = format!(
            "assigns `{}` instead of the genvar `{}`",
            block.step.target, block.genvar
        );
        return Err(ctx.error(unsupported(why), path));
    }
    let Expr::BinaryArithmeticOperation(lhs, op, rhs) = &block.step.value else {
        let why = format!("expected an addition, found {}", block.step.value.kind());
        return Err(ctx.error(unsupported(why), path));
    };
    if *op != BinArithOp::Add {
        let why = format!("expected `+`, found {op:?}");
        return Err(ctx.error(unsupported(why), path));
    }
    if !is_identifier(lhs, &block.genvar) {
        let why = format!("the left operand must be the genvar `{}`", block.genvar);
        return Err(ctx.error(unsupported(why), path));
    }
    let value_path = path.field("value").field("BinaryArithmeticOperation").index(2);
    lower_expr(ctx, rhs, &value_path)
}

/// Checks the loop body without emitting anything.
fn check_body(
    ctx: &mut ElaborationContext<'_>,
    body: &[Statement],
    path: &NodePath,
) -> Result<(), ElabError> {
    match body {
        [] => Ok(()),
        [Statement::Assign(assign)] => {
            // TODO: commit per-iteration assignments once loop unrolling exists.
            check_hardware_expr(ctx, &assign.rhs, &path.index(0).field("Assign").field("rhs"))
        }
        [Statement::Instance(inst)] => Err(ctx.error(
            ElabErrorKind::NotImplemented(format!(
                "instantiating `{}` inside a generate loop",
                inst.module
            )),
            &path.index(0),
        )),
        [other] => Err(ctx.error(
            ElabErrorKind::UnknownBodyStatement(other.kind()),
            &path.index(0),
        )),
        [_, _, ..] => Err(ctx.error(
            ElabErrorKind::NotImplemented(format!(
                "a generate loop body with {} statements",
                body.len()
            )),
            &path.index(1),
        )),
    }
}

fn is_identifier(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Identifier(n) if n == name)
}
