//! Conforma - runtime type contracts for dynamic values
//!
//! Conforma lets a caller attach structural type constraints to function
//! boundaries and individual values without touching the callable's own
//! signature. Constraints are composable specs: atomic kind tests, named
//! predicates, unions, intersections, inversions, and nested containers,
//! plus a trailing variadic marker for argument lists.
//!
//! # Quick Start
//!
//! ```
//! use conforma::{install_builtins, parse_contract, AliasRegistry, Enforced, Value};
//!
//! let registry = AliasRegistry::new();
//! install_builtins(&registry)?;
//! registry.seal();
//!
//! let contract = parse_contract("(Int, Int) -> Int", &registry)?;
//! let add = Enforced::new("add", contract, |args: &[Value]| {
//!     Value::Int(args[0].as_int().unwrap() + args[1].as_int().unwrap())
//! });
//!
//! assert_eq!(add.call(&[Value::Int(2), Value::Int(3)])?, Value::Int(5));
//! assert!(add.call(&[Value::Float(2.0), Value::Int(3)]).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! Specs and contracts are immutable trees built once at definition time;
//! every call then flows wrapper -> binder -> evaluator -> body -> evaluator
//! with no shared mutable state, so enforced callables are freely shared
//! across threads.

// Re-export the public API from conforma-api
pub use conforma_api::*;
