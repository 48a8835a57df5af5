//! A loaded AST document.

use crate::file_id::FileId;
use dsir_common::ContentHash;
use std::path::PathBuf;

/// An AST document loaded into the session.
pub struct SourceFile {
    /// The unique identifier for this document within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// The filesystem path of this document (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The raw JSON text.
    pub content: String,
    /// Hash of the raw text.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile`, hashing its content.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        Self {
            id,
            path,
            content,
            content_hash,
        }
    }

    /// Returns the file name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
