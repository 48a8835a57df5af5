//! Shared foundational types used across the DynStruct IR workspace.
//!
//! This crate provides interned identifiers for module, port, parameter and
//! genvar names, content hashing used to fingerprint AST documents and
//! elaborated modules, and the integer overflow policy used by constant folding.

#![warn(missing_docs)]

pub mod arithmetic;
pub mod hash;
pub mod ident;

pub use arithmetic::Arithmetic;
pub use hash::ContentHash;
pub use ident::{Ident, Interner};
