//! DynStruct IR: the parameterized intermediate representation built by elaboration.
//!
//! Sizes that depend on module parameters or generate-loop variables stay
//! symbolic: they are [`ParamExpr`] nodes held in a per-module [`ExprStore`],
//! which interns and constant-folds them so structurally equal expressions
//! share one [`ExprId`]. Ports are [`BitTensor`]s whose dimensions are such
//! ids. A [`Module`] owns its store; a [`Design`] collects the modules of a
//! translation unit.

#![warn(missing_docs)]

pub mod arena;
pub mod dag;
pub mod design;
pub mod display;
pub mod error;
pub mod expr;
pub mod ids;
pub mod module;
pub mod store;
pub mod tensor;

pub use arena::{Arena, ArenaId};
pub use dag::{verify_module, ExprGraph, VerifyError};
pub use design::Design;
pub use display::{render_expr, render_module, DesignDump, ModuleDump};
pub use error::IrError;
pub use expr::{BinOp, ParamExpr};
pub use ids::{ExprId, ModuleId};
pub use module::{GenerateLoop, Module, ModuleParam, PortDirection};
pub use store::ExprStore;
pub use tensor::BitTensor;
