//! Enforcement wrapper and value-constructor check
//!
//! [`Enforced`] intercepts calls to a wrapped callable: it binds and checks
//! the arguments (the body never runs if anything fails), invokes the body
//! with the original arguments untouched, then checks the produced value
//! against the return spec if one was declared. Validation only - nothing is
//! ever coerced, and nothing the body raises is suppressed.
//!
//! [`construct`] is the standalone single-value gate: the evaluator applied
//! to one value, passing it through unchanged on success.

use crate::contract::Contract;
use crate::eval::check;
use conforma_core::{ConstructError, EnforceError, Spec, Value};
use tracing::debug;

/// A callable with a contract enforced around it.
///
/// Contracts are immutable and the evaluator is pure, so an `Enforced` can be
/// shared across threads and called concurrently without locking.
pub struct Enforced<F> {
    name: String,
    contract: Contract,
    inner: F,
}

impl<F> Enforced<F>
where
    F: Fn(&[Value]) -> Value,
{
    /// Wrap `inner` with `contract`. `name` appears in every error raised on
    /// this callable's behalf.
    pub fn new(name: impl Into<String>, contract: Contract, inner: F) -> Self {
        Self {
            name: name.into(),
            contract,
            inner,
        }
    }

    /// The callable name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enforced contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Invoke the wrapped callable with enforcement.
    ///
    /// # Errors
    /// - [`EnforceError::Arity`] / [`EnforceError::Argument`] before the body
    ///   runs: no partial side effects occur
    /// - [`EnforceError::Return`] strictly after the body has completed,
    ///   carrying the value it produced
    pub fn call(&self, args: &[Value]) -> Result<Value, EnforceError> {
        let pairs = self.contract.bind(args).map_err(|cause| {
            debug!(callable = %self.name, %cause, "arity check failed");
            EnforceError::Arity {
                callable: self.name.clone(),
                cause,
            }
        })?;

        for (position, (spec, value)) in pairs.iter().enumerate() {
            if let Err(cause) = check(spec, value) {
                let index = position + 1;
                debug!(callable = %self.name, index, %cause, "argument check failed");
                return Err(EnforceError::Argument {
                    callable: self.name.clone(),
                    index,
                    cause,
                });
            }
        }

        let result = (self.inner)(args);

        if let Some(ret) = self.contract.return_spec() {
            if let Err(cause) = check(ret, &result) {
                debug!(callable = %self.name, %cause, "return check failed");
                return Err(EnforceError::Return {
                    callable: self.name.clone(),
                    value: result,
                    cause,
                });
            }
        }

        Ok(result)
    }
}

/// Wrap a callable and get back a plain closure.
///
/// Convenience adapter over [`Enforced`] for call sites that want a function
/// value rather than a struct.
pub fn wrap<F>(
    name: impl Into<String>,
    contract: Contract,
    inner: F,
) -> impl Fn(&[Value]) -> Result<Value, EnforceError>
where
    F: Fn(&[Value]) -> Value,
{
    let enforced = Enforced::new(name, contract, inner);
    move |args| enforced.call(args)
}

/// Gate a single value through a spec.
///
/// Returns the value unchanged when it conforms - an identity cast, never a
/// transformation.
///
/// # Errors
/// [`ConstructError`] carrying the spec description and the conformance
/// failure.
pub fn construct(spec: &Spec, value: Value) -> Result<Value, ConstructError> {
    match check(spec, &value) {
        Ok(()) => Ok(value),
        Err(cause) => {
            debug!(spec = %spec, %cause, "value constructor check failed");
            Err(ConstructError {
                spec: spec.to_string(),
                cause,
            })
        }
    }
}
