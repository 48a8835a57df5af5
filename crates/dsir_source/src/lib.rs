//! AST document management and node locations for diagnostics.
//!
//! The front-end hands this layer JSON documents rather than HDL text, so a
//! source location is a [`FileId`] plus a [`NodePath`] naming the offending
//! node inside the document (for example `body[3].Generate[0].For.cond`).
//! The [`SourceDb`] owns every loaded document for a session.

#![warn(missing_docs)]

pub mod file_id;
pub mod location;
pub mod node_path;
pub mod source_db;
pub mod source_file;

pub use file_id::FileId;
pub use location::{Location, ResolvedLocation};
pub use node_path::{NodePath, PathSegment};
pub use source_db::SourceDb;
pub use source_file::SourceFile;
