//! The input AST consumed by the elaborator.
//!
//! A front-end hands the elaborator one JSON document per module (or a
//! translation unit holding several). This crate is the serde model of that
//! document plus [`parse_document`], which accepts either shape.

#![warn(missing_docs)]

pub mod ast;
pub mod error;

pub use ast::*;
pub use error::AstError;

/// The parsed contents of one AST document.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDocument {
    /// A document holding a single module.
    Module(ModuleDecl),
    /// A document holding `{ "modules": [...] }`.
    Unit(TranslationUnit),
}

impl SourceDocument {
    /// Returns `true` if this document is a translation unit.
    pub fn is_unit(&self) -> bool {
        matches!(self, SourceDocument::Unit(_))
    }

    /// Returns the modules of this document in declaration order.
    pub fn modules(&self) -> &[ModuleDecl] {
        match self {
            SourceDocument::Module(module) => std::slice::from_ref(module),
            SourceDocument::Unit(unit) => &unit.modules,
        }
    }

    /// Consumes the document, returning its modules in declaration order.
    pub fn into_modules(self) -> Vec<ModuleDecl> {
        match self {
            SourceDocument::Module(module) => vec![module],
            SourceDocument::Unit(unit) => unit.modules,
        }
    }
}

/// Parses an AST document.
///
/// A top-level object with a `modules` key is a translation unit; anything
/// else is parsed as a single module.
pub fn parse_document(text: &str) -> Result<SourceDocument, AstError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.get("modules").is_some() {
        Ok(SourceDocument::Unit(serde_json::from_value(value)?))
    } else {
        Ok(SourceDocument::Module(serde_json::from_value(value)?))
    }
}
