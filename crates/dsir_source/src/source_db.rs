//! Central database of all AST documents in a session.

use crate::file_id::FileId;
use crate::location::{Location, ResolvedLocation};
use crate::source_file::SourceFile;
use std::io;
use std::path::{Path, PathBuf};

/// Owns every loaded document and resolves [`Location`]s for diagnostics.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Loads a document from the filesystem and returns its [`FileId`].
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path, content))
    }

    /// Adds a document from an in-memory string.
    ///
    /// `name` is used as the file path in diagnostics.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name.into(), content));
        id
    }

    /// Returns the [`SourceFile`] for the given [`FileId`].
    ///
    /// # Panics
    ///
    /// Panics if the `FileId` is invalid.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Returns the [`SourceFile`] for `id`, or `None` for unknown or dummy ids.
    pub fn try_get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.as_raw() as usize)
    }

    /// Resolves a [`Location`] to a displayable form.
    ///
    /// Returns `None` when the location's document is not in this database.
    pub fn resolve(&self, location: &Location) -> Option<ResolvedLocation> {
        self.try_get_file(location.file).map(|file| ResolvedLocation {
            file_path: file.path.clone(),
            node: location.path.clone(),
        })
    }

    /// Returns the number of loaded documents.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no documents are loaded.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over loaded documents in load order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
