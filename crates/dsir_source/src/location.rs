//! Document-qualified node locations.

use crate::file_id::FileId;
use crate::node_path::NodePath;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A node inside a specific document.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Location {
    /// The document containing the node.
    pub file: FileId,
    /// The node's path inside that document.
    pub path: NodePath,
}

impl Location {
    /// Creates a location.
    pub fn new(file: FileId, path: NodePath) -> Self {
        Self { file, path }
    }

    /// A location inside a document that is not registered with a
    /// [`SourceDb`](crate::SourceDb).
    pub fn detached(path: NodePath) -> Self {
        Self {
            file: FileId::DUMMY,
            path,
        }
    }
}

/// A [`Location`] with its file id resolved to a path, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// The filesystem path (or synthetic name) of the document.
    pub file_path: PathBuf,
    /// The node path inside the document.
    pub node: NodePath,
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_path.display(), self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_uses_dummy_file() {
        let loc = Location::detached(NodePath::root().field("body"));
        assert!(loc.file.is_dummy());
    }

    #[test]
    fn resolved_display() {
        let rl = ResolvedLocation {
            file_path: PathBuf::from("ast/simple_and.json"),
            node: NodePath::root().field("body").index(4),
        };
        assert_eq!(format!("{rl}"), "ast/simple_and.json: body[4]");
    }
}
