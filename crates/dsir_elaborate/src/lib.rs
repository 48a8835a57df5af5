//! AST-to-DynStruct-IR elaboration engine.
//!
//! Turns a [`ModuleDecl`] into a [`Module`]: ports become [`BitTensor`]s
//! whose dimensions are symbolic expressions over the module's parameters,
//! and generate `for` loops become [`GenerateLoop`] descriptors. Loop bodies
//! are checked but not unrolled.
//!
//! Elaboration of a module is all-or-nothing: it either returns a complete
//! module or the first [`ElabError`], never a partially populated module.
//!
//! # Usage
//!
//! ```
//! use dsir_ast::parse_document;
//! use dsir_common::Interner;
//! use dsir_elaborate::{elaborate, ElabOptions};
//!
//! let doc = parse_document(r#"{"name": "inv", "params": [], "body": [
//!     {"Wire": {"name": "a", "io": "Input", "width": null, "init": null}}
//! ]}"#).unwrap();
//! let names = Interner::new();
//! let module = elaborate(&doc.modules()[0], &names, &ElabOptions::default()).unwrap();
//! assert_eq!(module.inputs.len(), 1);
//! ```
//!
//! [`BitTensor`]: dsir_ir::BitTensor
//! [`GenerateLoop`]: dsir_ir::GenerateLoop

#![warn(missing_docs)]

pub mod context;
pub mod errors;
pub mod expr;
pub mod generate;
pub mod stmt;
pub mod unit;
pub mod wire;

pub use errors::{ElabError, ElabErrorKind};
pub use unit::{elaborate_unit, verify_design, UnitEntry};

use context::ElaborationContext;
use dsir_ast::{Expr, ModuleDecl};
use dsir_common::{Arithmetic, Interner};
use dsir_ir::{ExprId, Module, ModuleParam};
use dsir_source::{Location, NodePath};
use tracing::{debug, info};

/// Options that apply to every module of a run.
#[derive(Clone, Copy, Debug)]
pub struct ElabOptions {
    /// Overflow policy for constant folding.
    pub arithmetic: Arithmetic,
    /// Elaborate the modules of a translation unit on the rayon pool.
    pub parallel: bool,
}

impl Default for ElabOptions {
    fn default() -> Self {
        Self {
            arithmetic: Arithmetic::default(),
            parallel: true,
        }
    }
}

/// Elaborates a module that is not tied to a loaded document.
///
/// Error locations carry only the node path.
pub fn elaborate(
    decl: &ModuleDecl,
    interner: &Interner,
    options: &ElabOptions,
) -> Result<Module, ElabError> {
    elaborate_in(decl, interner, options, Location::detached(NodePath::root()))
}

/// Lowers a parameter's default value for the record.
///
/// Defaults are informational and never substituted, so one outside the
/// `+ - *` subset is dropped instead of failing the module.
fn lower_default(
    ctx: &mut ElaborationContext<'_>,
    name: &str,
    value: &Expr,
    path: &NodePath,
) -> Option<ExprId> {
    match expr::lower_expr(ctx, value, &path.field("value")) {
        Ok(id) => Some(id),
        Err(err) => {
            debug!(param = name, error = %err, "parameter default not recorded");
            None
        }
    }
}

/// Elaborates a module whose declaration lives at `origin`.
///
/// `origin.path` is the module's own node, e.g. `modules[2]` inside a
/// translation unit; error paths extend it.
pub fn elaborate_in(
    decl: &ModuleDecl,
    interner: &Interner,
    options: &ElabOptions,
    origin: Location,
) -> Result<Module, ElabError> {
    let module = Module::new(
        interner.get_or_intern(&decl.name),
        options.arithmetic,
        decl.content_hash(),
    );
    let mut ctx = ElaborationContext::new(module, interner, origin.file);
    let root = origin.path;

    let params_path = root.field("params");
    for (i, param) in decl.params.iter().enumerate() {
        let name = ctx.ident(&param.name);
        let expr = ctx.module.exprs.parameter(name);
        let default = param
            .value
            .as_ref()
            .and_then(|value| lower_default(&mut ctx, &param.name, value, &params_path.index(i)));
        ctx.module.params.push(ModuleParam {
            name,
            expr,
            default,
        });
    }

    let body_path = root.field("body");
    for (i, stmt) in decl.body.iter().enumerate() {
        stmt::elaborate_statement(&mut ctx, stmt, &body_path.index(i))?;
    }

    let module = ctx.finish();
    info!(
        module = %decl.name,
        inputs = module.inputs.len(),
        outputs = module.outputs.len(),
        loops = module.loops.len(),
        exprs = module.exprs.len(),
        "elaborated module"
    );
    Ok(module)
}
