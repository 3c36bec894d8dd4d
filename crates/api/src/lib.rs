//! Public API layer for Conforma
//!
//! This crate is the surface callers are expected to use:
//! - the spec expression parser ([`build_spec`], [`parse_contract`])
//! - built-in alias installation ([`install_builtins`], [`init_global`])
//! - re-exports of the core data model and the engine entry points
//!
//! ## Quick start
//!
//! ```
//! use conforma_api::{build_spec, parse_contract, install_builtins};
//! use conforma_api::{AliasRegistry, Enforced, Value};
//!
//! let registry = AliasRegistry::new();
//! install_builtins(&registry)?;
//! registry.seal();
//!
//! let contract = parse_contract("(Number, Number) -> Float", &registry)?;
//! let avg = Enforced::new("avg", contract, |args: &[Value]| {
//!     let a = args[0].as_int().map(|i| i as f64).or(args[0].as_float()).unwrap();
//!     let b = args[1].as_int().map(|i| i as f64).or(args[1].as_float()).unwrap();
//!     Value::Float((a + b) / 2.0)
//! });
//!
//! assert_eq!(avg.call(&[Value::Int(1), Value::Int(2)])?, Value::Float(1.5));
//! assert!(avg.call(&[Value::Bool(true), Value::Int(2)]).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtins;
pub mod parse;

pub use builtins::install_builtins;
pub use parse::{build_spec, parse_contract, ParseError};

// Re-export the data model and engine entry points at the crate root
pub use conforma_core::{
    BindError, ConstructError, ContainerKind, EnforceError, MatchError, MatchResult, Mismatch,
    PathSegment, Predicate, Spec, SpecError, Value, ValueKind, ValuePath,
};
pub use conforma_engine::registry::{self, AliasRegistry, RegistryError};
pub use conforma_engine::{check, construct, wrap, Contract, ContractBuilder, Enforced};

/// Populate and seal the process-wide registry with the built-in aliases.
///
/// Call once during startup, before building contracts that use aliases.
/// Calling again after the registry is sealed with the builtins in place is
/// a no-op.
///
/// # Errors
/// [`RegistryError`] if the registry was partially populated by other means
/// and a builtin name collides before sealing.
pub fn init_global() -> Result<&'static AliasRegistry, RegistryError> {
    let registry = registry::global();
    if registry.is_sealed() {
        return Ok(registry);
    }
    install_builtins(registry)?;
    registry.seal();
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_global_is_idempotent_once_sealed() {
        let first = init_global().unwrap();
        assert!(first.is_sealed());
        let second = init_global().unwrap();
        assert!(second.resolve("Number").is_some());
    }
}
