//! Built-in spec aliases
//!
//! The stock vocabulary most callers start from. Kind names are also
//! understood directly by the expression parser; registering them here keeps
//! the registry usable as a complete lookup surface on its own.

use conforma_core::{Spec, ValueKind};
use conforma_engine::registry::{AliasRegistry, RegistryError};

/// Populate `registry` with the built-in aliases.
///
/// Registers every native kind name (`Int`, `Float`, `Bool`, `Str`, `Bytes`,
/// `Null`), `Any`, and the composite `Number` (`Int | Float`). Call during
/// startup, before sealing the registry.
///
/// # Errors
/// [`RegistryError`] if the registry is sealed or a name collides with an
/// existing alias.
pub fn install_builtins(registry: &AliasRegistry) -> Result<(), RegistryError> {
    for kind in [
        ValueKind::Null,
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::String,
        ValueKind::Bytes,
    ] {
        registry.register(kind.name(), Spec::atomic(kind))?;
    }
    registry.register("Any", Spec::any())?;
    registry.register(
        "Number",
        Spec::atomic(ValueKind::Int).or(Spec::atomic(ValueKind::Float)),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_install_and_resolve() {
        let registry = AliasRegistry::new();
        install_builtins(&registry).unwrap();
        assert_eq!(registry.resolve("Int").unwrap().to_string(), "Int");
        assert_eq!(registry.resolve("Number").unwrap().to_string(), "Int | Float");
        assert_eq!(registry.resolve("Any").unwrap().to_string(), "Any");
        assert!(registry.resolve("Object").is_none());
    }

    #[test]
    fn installing_twice_reports_the_duplicate() {
        let registry = AliasRegistry::new();
        install_builtins(&registry).unwrap();
        let err = install_builtins(&registry).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));
    }
}
