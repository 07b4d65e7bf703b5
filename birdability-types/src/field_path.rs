use std::fmt;

use serde::{Deserialize, Serialize};

/// A path to a leaf of an `AnswerTree`, e.g., `"accessibilityDetailed.parking.curbCuts"`.
///
/// The dotted string is also the name of the form control that edits the leaf,
/// so paths travel unchanged between the form, the tree and stored JSON.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    /// Dot-separated path string, e.g. "generalInformation.locationName"
    path: String,
}

impl FieldPath {
    /// Create a new path from a dot-separated string.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Create an empty path (the tree root).
    pub fn empty() -> Self {
        Self {
            path: String::new(),
        }
    }

    /// Append a child segment to this path, returning a new path.
    pub fn child(&self, name: &str) -> Self {
        if name.is_empty() {
            self.clone()
        } else if self.path.is_empty() {
            Self::new(name)
        } else {
            Self::new(format!("{}.{}", self.path, name))
        }
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// A path is well-formed when it is non-empty and has no empty segment.
    ///
    /// `"a..b"`, `".a"` and `"a."` are all malformed.
    pub fn is_well_formed(&self) -> bool {
        !self.path.is_empty() && self.path.split('.').all(|s| !s.is_empty())
    }

    /// Get the segments of this path as an iterator.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
