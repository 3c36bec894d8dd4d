//! Alias registry
//!
//! Named shortcuts for specs ("Number", "Str", ...). The registry has a
//! two-phase lifecycle: populate during startup, then seal it. After sealing,
//! registration fails and the map is read-only; resolution takes a shared
//! lock and the returned `Arc<Spec>` snapshots are immune to anything that
//! happens to the registry afterwards.

use conforma_core::Spec;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::debug;

/// Errors raised while populating the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Registration attempted after the registry was sealed
    #[error("registry is sealed; cannot register `{name}`")]
    Sealed {
        /// The alias that was being registered
        name: String,
    },

    /// The alias is already registered
    #[error("alias `{name}` is already registered")]
    Duplicate {
        /// The conflicting alias
        name: String,
    },
}

#[derive(Default)]
struct Inner {
    specs: HashMap<String, Arc<Spec>>,
    sealed: bool,
}

/// Name-to-spec alias map with a populate-then-seal lifecycle.
#[derive(Default)]
pub struct AliasRegistry {
    inner: RwLock<Inner>,
}

impl AliasRegistry {
    /// An empty, unsealed registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under `name`.
    ///
    /// # Errors
    /// [`RegistryError::Sealed`] after [`seal`](Self::seal) was called;
    /// [`RegistryError::Duplicate`] if the name is taken.
    pub fn register(
        &self,
        name: impl Into<String>,
        spec: impl Into<Arc<Spec>>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut inner = self.inner.write();
        if inner.sealed {
            return Err(RegistryError::Sealed { name });
        }
        match inner.specs.entry(name) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!(alias = %entry.key(), "registered spec alias");
                entry.insert(spec.into());
                Ok(())
            }
        }
    }

    /// End the population phase; the registry is read-only from here on.
    /// Sealing twice is a no-op.
    pub fn seal(&self) {
        let mut inner = self.inner.write();
        if !inner.sealed {
            debug!(aliases = inner.specs.len(), "alias registry sealed");
            inner.sealed = true;
        }
    }

    /// Whether the population phase has ended.
    pub fn is_sealed(&self) -> bool {
        self.inner.read().sealed
    }

    /// Look up an alias.
    pub fn resolve(&self, name: &str) -> Option<Arc<Spec>> {
        self.inner.read().specs.get(name).cloned()
    }

    /// Registered alias names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().specs.keys().cloned().collect();
        names.sort();
        names
    }
}

/// The process-wide registry instance.
///
/// Populate and seal it during startup, before any contract that uses
/// aliases is built.
pub fn global() -> &'static AliasRegistry {
    static GLOBAL: OnceLock<AliasRegistry> = OnceLock::new();
    GLOBAL.get_or_init(AliasRegistry::new)
}
