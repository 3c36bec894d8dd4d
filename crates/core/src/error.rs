//! Error types for the contract engine
//!
//! All failure shapes live here so every crate in the workspace reports
//! mismatches the same way. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.
//!
//! The taxonomy follows the enforcement pipeline: construction-time
//! [`SpecError`], binding-time [`BindError`], evaluation-time [`MatchError`],
//! and the caller-facing [`EnforceError`] / [`ConstructError`] that wrap them
//! with the callable or spec context.

use crate::path::ValuePath;
use crate::spec::ContainerKind;
use crate::value::{Value, ValueKind};
use std::fmt;
use thiserror::Error;

/// Outcome of checking one value against one spec.
pub type MatchResult = Result<(), MatchError>;

/// The diagnostic payload of a failed conformance check.
///
/// `expected` is the description of the narrowest failing sub-spec, `found`
/// a clone of the offending value, `kind` its observed native kind, and
/// `path` the location of the offending element inside nested containers.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Description of the narrowest failing sub-spec
    pub expected: String,
    /// The offending value (the failing element for container checks)
    pub found: Value,
    /// Observed native kind of the offending value
    pub kind: ValueKind,
    /// Location of the offending element; root for non-container failures
    pub path: ValuePath,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(
                f,
                "expected {}, found {} {}",
                self.expected, self.kind, self.found
            )
        } else {
            write!(
                f,
                "expected {} at {}, found {} {}",
                self.expected, self.path, self.kind, self.found
            )
        }
    }
}

/// Why a conformance check did not pass.
///
/// An ordinary type mismatch and a broken user predicate are deliberately
/// distinct: the latter means the spec itself is unreliable and must never
/// be read as "the value did not match".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    /// The value does not satisfy the spec
    #[error("{0}")]
    Mismatch(Mismatch),

    /// A user-supplied predicate panicked while evaluating
    #[error("predicate `{name}` panicked during evaluation: {message}")]
    Predicate {
        /// Name of the predicate that panicked
        name: String,
        /// Panic payload, when it was a string
        message: String,
    },
}

impl MatchError {
    /// Build a root-level mismatch against `value`.
    pub fn mismatch(expected: impl Into<String>, value: &Value) -> Self {
        MatchError::Mismatch(Mismatch {
            expected: expected.into(),
            found: value.clone(),
            kind: value.kind(),
            path: ValuePath::root(),
        })
    }

    /// True for the ordinary-mismatch case.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, MatchError::Mismatch(_))
    }
}

/// Structural errors raised while building a spec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpecError {
    /// A container spec was given no element specs
    #[error("{kind} container spec needs at least one element spec")]
    EmptyContainer {
        /// The container shape being built
        kind: ContainerKind,
    },

    /// Object containers are homogeneous; positional element specs were given
    #[error("Object container specs take exactly one element spec, got {count}")]
    PositionalObject {
        /// Number of element specs supplied
        count: usize,
    },
}

/// Binding failed before any conformance check ran.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindError {
    /// The actual argument count cannot be reconciled with the contract
    #[error(
        "expected {} {expected} argument(s), got {actual}",
        if *.at_least { "at least" } else { "exactly" }
    )]
    Arity {
        /// Number of fixed argument specs in the contract
        expected: usize,
        /// True when a trailing variadic makes `expected` a minimum
        at_least: bool,
        /// Number of arguments actually supplied
        actual: usize,
    },
}

/// Errors raised by an enforced callable.
///
/// `Arity` and `Argument` are raised before the wrapped body runs; `Return`
/// strictly after it has completed, carrying the value it produced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnforceError {
    /// Arity mismatch; no single argument index applies
    #[error("`{callable}`: {cause}")]
    Arity {
        /// Name of the enforced callable
        callable: String,
        /// The underlying binding failure
        cause: BindError,
    },

    /// A bound argument failed its conformance check
    #[error("`{callable}` argument {index}: {cause}")]
    Argument {
        /// Name of the enforced callable
        callable: String,
        /// 1-based position of the failing argument
        index: usize,
        /// The underlying conformance failure
        cause: MatchError,
    },

    /// The produced return value failed its conformance check
    #[error("`{callable}` return value: {cause}")]
    Return {
        /// Name of the enforced callable
        callable: String,
        /// The value the wrapped body already produced
        value: Value,
        /// The underlying conformance failure
        cause: MatchError,
    },
}

/// A standalone value-constructor check failed.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("value does not conform to `{spec}`: {cause}")]
pub struct ConstructError {
    /// Description of the spec the value was checked against
    pub spec: String,
    /// The underlying conformance failure
    pub cause: MatchError,
}
