//! Contract engine for Conforma
//!
//! This crate holds the logic that operates over the core data model:
//! - eval: the recursive conformance evaluator
//! - contract: contracts and the argument binder
//! - enforce: the enforcement wrapper and the value-constructor check
//! - registry: the populate-then-seal alias registry
//!
//! Everything here is a pure, synchronous, in-process computation over
//! immutable spec trees; there is no state carried between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod enforce;
pub mod eval;
pub mod registry;

pub use contract::{Contract, ContractBuilder};
pub use enforce::{construct, wrap, Enforced};
pub use eval::check;
pub use registry::{AliasRegistry, RegistryError};
