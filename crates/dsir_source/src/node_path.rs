//! Paths that locate a node inside an AST document.

use serde::{Serialize, Serializer};
use std::fmt;

/// One step of a [`NodePath`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PathSegment {
    /// A named field or enum variant, e.g. `body`, `Generate`, `cond`.
    Field(&'static str),
    /// A position inside a list, e.g. the `3` in `body[3]`.
    Index(usize),
}

/// The location of an AST node, relative to the module document root.
///
/// Paths are built incrementally while the elaborator descends: every nested
/// call receives the path of the node it is looking at, so an error can name
/// exactly which statement or operand it rejected.
///
/// ```
/// use dsir_source::NodePath;
///
/// let path = NodePath::root().field("body").index(3).field("Wire").field("width");
/// assert_eq!(path.to_string(), "body[3].Wire.width");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path extended by a named field.
    pub fn field(&self, name: &'static str) -> Self {
        self.with(PathSegment::Field(name))
    }

    /// Returns a new path extended by a list index.
    pub fn index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Returns `true` if this is the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
