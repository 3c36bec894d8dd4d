//! Contracts and argument binding
//!
//! A [`Contract`] is the immutable record attached to a callable: ordered
//! fixed argument specs, an optional trailing variadic spec, and an optional
//! return spec. The builder makes the structural invariant unrepresentable -
//! the variadic lives in its own slot, so there is never more than one and it
//! is always last.
//!
//! Binding pairs specs with arguments and nothing more; conformance checking
//! is the evaluator's job and runs afterwards, pair by pair.

use conforma_core::{BindError, Spec, Value};
use std::fmt;
use std::sync::Arc;

/// Argument and return specification for one callable.
#[derive(Debug, Clone)]
pub struct Contract {
    args: Vec<Arc<Spec>>,
    variadic: Option<Arc<Spec>>,
    ret: Option<Arc<Spec>>,
}

/// Builder for [`Contract`].
#[derive(Debug, Clone, Default)]
pub struct ContractBuilder {
    args: Vec<Arc<Spec>>,
    variadic: Option<Arc<Spec>>,
    ret: Option<Arc<Spec>>,
}

impl ContractBuilder {
    /// Start an empty contract.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fixed positional argument spec.
    pub fn arg(mut self, spec: impl Into<Arc<Spec>>) -> Self {
        self.args.push(spec.into());
        self
    }

    /// Set the trailing variadic spec: the remaining zero-or-more arguments
    /// each bind against it. Replaces any previously set variadic.
    pub fn variadic(mut self, spec: impl Into<Arc<Spec>>) -> Self {
        self.variadic = Some(spec.into());
        self
    }

    /// Set the return spec. Omitting it leaves the return value unchecked;
    /// `Spec::nothing()` demands the callable produce no meaningful value.
    pub fn returns(mut self, spec: impl Into<Arc<Spec>>) -> Self {
        self.ret = Some(spec.into());
        self
    }

    /// Finish the contract.
    pub fn build(self) -> Contract {
        Contract {
            args: self.args,
            variadic: self.variadic,
            ret: self.ret,
        }
    }
}

impl Contract {
    /// Start building a contract.
    pub fn builder() -> ContractBuilder {
        ContractBuilder::new()
    }

    /// Number of fixed (non-variadic) argument specs.
    pub fn fixed_len(&self) -> usize {
        self.args.len()
    }

    /// The fixed argument specs, in order.
    pub fn args(&self) -> &[Arc<Spec>] {
        &self.args
    }

    /// The trailing variadic spec, if any.
    pub fn variadic(&self) -> Option<&Arc<Spec>> {
        self.variadic.as_ref()
    }

    /// The return spec, if any.
    pub fn return_spec(&self) -> Option<&Arc<Spec>> {
        self.ret.as_ref()
    }

    /// Reconcile `actual` against this contract's argument specs.
    ///
    /// Produces one (spec, value) pair per argument in call order. Without a
    /// variadic the count must match exactly; with one, every argument past
    /// the fixed prefix pairs with the variadic's inner spec.
    ///
    /// # Errors
    /// [`BindError::Arity`] when the count cannot be reconciled.
    pub fn bind<'a>(
        &'a self,
        actual: &'a [Value],
    ) -> Result<Vec<(&'a Arc<Spec>, &'a Value)>, BindError> {
        let fixed = self.args.len();
        match &self.variadic {
            None => {
                if actual.len() != fixed {
                    return Err(BindError::Arity {
                        expected: fixed,
                        at_least: false,
                        actual: actual.len(),
                    });
                }
                Ok(self.args.iter().zip(actual).collect())
            }
            Some(rest) => {
                if actual.len() < fixed {
                    return Err(BindError::Arity {
                        expected: fixed,
                        at_least: true,
                        actual: actual.len(),
                    });
                }
                let mut pairs: Vec<(&Arc<Spec>, &Value)> =
                    self.args.iter().zip(&actual[..fixed]).collect();
                pairs.extend(actual[fixed..].iter().map(|value| (rest, value)));
                Ok(pairs)
            }
        }
    }
}

// Canonical contract syntax: "(Int, Str, *(Int | Str)) -> Int"
impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, spec) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{spec}")?;
        }
        if let Some(rest) = &self.variadic {
            if !self.args.is_empty() {
                f.write_str(", ")?;
            }
            match **rest {
                Spec::Union(..) | Spec::Intersection(..) => write!(f, "*({rest})")?,
                _ => write!(f, "*{rest}")?,
            }
        }
        f.write_str(")")?;
        if let Some(ret) = &self.ret {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}
