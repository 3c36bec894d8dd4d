//! Paths into nested values
//!
//! A [`ValuePath`] locates one element inside a (possibly deeply) nested
//! container value. The evaluator attaches a path to every container-element
//! mismatch so a failure inside `[[[1]], [[2, "a"]]]` reads as
//! `value[1][0][1]` rather than a bare "no match".

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step into a container value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Zero-based index into an array
    Index(usize),
    /// Key into an object
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Key(k) => write!(f, "[{k:?}]"),
        }
    }
}

/// Ordered segments from the checked root value down to a failing element.
///
/// Empty for a failure of the root value itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    /// The empty path (the root value itself).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// True if this path points at the root value.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Prepend a segment, moving the path one container level outward.
    ///
    /// The evaluator builds paths inside-out while unwinding from a nested
    /// failure, so extension happens at the front.
    pub fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }

    /// The segments from root to failing element.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value")?;
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<PathSegment>> for ValuePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}
