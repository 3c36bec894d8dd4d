//! Core types for Conforma
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / ValueKind: the dynamic value universe and its native-kind tags
//! - Spec: the immutable, composable type-specification tree
//! - ValuePath: element paths for container failure diagnostics
//! - Error hierarchy: MatchError, SpecError, BindError, EnforceError,
//!   ConstructError
//!
//! The evaluator, binder, and enforcement wrapper that operate on these
//! types live in `conforma-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod path;
pub mod spec;
pub mod value;

// Re-export commonly used types at the crate root
pub use error::{
    BindError, ConstructError, EnforceError, MatchError, MatchResult, Mismatch, SpecError,
};
pub use path::{PathSegment, ValuePath};
pub use spec::{ContainerKind, Predicate, PredicateFn, Spec};
pub use value::{Value, ValueKind};
