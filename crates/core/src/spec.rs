//! The spec tree
//!
//! A [`Spec`] is one immutable node in a type-specification tree: an atomic
//! kind test, an opaque boolean predicate, an algebraic combinator over other
//! specs, or a parametrized container. Combinators always allocate a new node
//! and share children behind `Arc`, so a spec built once can sit inside any
//! number of contracts and be checked from any number of threads without
//! synchronization.
//!
//! Construction is the only place structural rules are enforced (containers
//! need at least one element spec, objects are homogeneous-only); evaluation
//! itself lives in the engine crate.

use crate::error::SpecError;
use crate::value::{Value, ValueKind};
use std::fmt;
use std::sync::Arc;

/// Signature of a user-supplied predicate.
///
/// The engine treats predicates as opaque capabilities: called with the value
/// under check, expected to return a boolean, and never trusted to be total.
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A named, user-supplied boolean test over values.
///
/// The name is what failure diagnostics print; pick something that reads as
/// a type ("positive", "non_empty").
#[derive(Clone)]
pub struct Predicate {
    name: String,
    test: Arc<PredicateFn>,
}

impl Predicate {
    /// Wrap a closure as a named predicate.
    pub fn new(name: impl Into<String>, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// The diagnostic name of this predicate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying closure.
    ///
    /// Exposed for the evaluator, which runs it under a panic guard; callers
    /// should not assume the closure is total.
    pub fn as_fn(&self) -> &PredicateFn {
        &*self.test
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

/// Outer kind of a container spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered sequence; supports homogeneous and positional element specs
    Array,
    /// String-keyed map; supports homogeneous element specs only
    Object,
}

impl ContainerKind {
    /// The value kind a container of this shape must have.
    pub fn value_kind(self) -> ValueKind {
        match self {
            ContainerKind::Array => ValueKind::Array,
            ContainerKind::Object => ValueKind::Object,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_kind().name())
    }
}

/// One immutable node of a type-specification tree.
#[derive(Debug, Clone)]
pub enum Spec {
    /// Matches every value
    Any,
    /// Matches only the null / no-value sentinel
    Nothing,
    /// Matches values of exactly this native kind, no widening
    Atomic(ValueKind),
    /// Matches values for which the predicate returns true
    Predicate(Predicate),
    /// Matches if either side matches; left side is tried first
    Union(Arc<Spec>, Arc<Spec>),
    /// Matches if both sides match; left side is checked first
    Intersection(Arc<Spec>, Arc<Spec>),
    /// Matches if the inner spec does not
    Inversion(Arc<Spec>),
    /// Matches a container value whose elements match the element specs:
    /// one element spec means homogeneous, several mean positional
    Container(ContainerKind, Vec<Arc<Spec>>),
}

impl Spec {
    /// Spec matching every value.
    pub fn any() -> Spec {
        Spec::Any
    }

    /// Spec matching only the null sentinel; the return-position vocabulary
    /// for "produces no meaningful value".
    pub fn nothing() -> Spec {
        Spec::Nothing
    }

    /// Spec matching values of exactly `kind`.
    pub fn atomic(kind: ValueKind) -> Spec {
        Spec::Atomic(kind)
    }

    /// Spec matching values that satisfy a named predicate.
    pub fn predicate(
        name: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Spec {
        Spec::Predicate(Predicate::new(name, test))
    }

    /// Union of two specs.
    pub fn union(left: impl Into<Arc<Spec>>, right: impl Into<Arc<Spec>>) -> Spec {
        Spec::Union(left.into(), right.into())
    }

    /// Intersection of two specs.
    pub fn intersection(left: impl Into<Arc<Spec>>, right: impl Into<Arc<Spec>>) -> Spec {
        Spec::Intersection(left.into(), right.into())
    }

    /// Logical inversion of a spec.
    pub fn inversion(inner: impl Into<Arc<Spec>>) -> Spec {
        Spec::Inversion(inner.into())
    }

    /// `self | other`, returning a new node.
    pub fn or(self, other: impl Into<Arc<Spec>>) -> Spec {
        Spec::union(self, other)
    }

    /// `self & other`, returning a new node.
    pub fn and(self, other: impl Into<Arc<Spec>>) -> Spec {
        Spec::intersection(self, other)
    }

    /// `!self`, returning a new node.
    pub fn negate(self) -> Spec {
        Spec::inversion(self)
    }

    /// Homogeneous array spec: every element must match `element`.
    pub fn array_of(element: impl Into<Arc<Spec>>) -> Spec {
        Spec::Container(ContainerKind::Array, vec![element.into()])
    }

    /// Positional array spec: element count must equal the spec count and
    /// each element must match its positional spec.
    ///
    /// A single element spec is indistinguishable from a homogeneous
    /// container, so it matches arrays of any length the way
    /// [`array_of`](Self::array_of) does; exact-arity matching needs at
    /// least two element specs.
    ///
    /// # Errors
    /// [`SpecError::EmptyContainer`] when no element specs are given.
    pub fn tuple_of(elements: Vec<Arc<Spec>>) -> Result<Spec, SpecError> {
        Spec::container(ContainerKind::Array, elements)
    }

    /// Homogeneous object spec: every entry value must match `element`.
    pub fn map_of(element: impl Into<Arc<Spec>>) -> Spec {
        Spec::Container(ContainerKind::Object, vec![element.into()])
    }

    /// General container constructor enforcing the structural rules.
    ///
    /// # Errors
    /// [`SpecError::EmptyContainer`] for an empty element list, and
    /// [`SpecError::PositionalObject`] for an object with more than one
    /// element spec (object entries have no defensible positional order).
    pub fn container(kind: ContainerKind, elements: Vec<Arc<Spec>>) -> Result<Spec, SpecError> {
        if elements.is_empty() {
            return Err(SpecError::EmptyContainer { kind });
        }
        if kind == ContainerKind::Object && elements.len() > 1 {
            return Err(SpecError::PositionalObject {
                count: elements.len(),
            });
        }
        Ok(Spec::Container(kind, elements))
    }

    fn precedence(&self) -> u8 {
        match self {
            Spec::Union(..) => 0,
            Spec::Intersection(..) => 1,
            Spec::Inversion(..) => 2,
            _ => 3,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        let parens = self.precedence() < min;
        if parens {
            f.write_str("(")?;
        }
        match self {
            Spec::Any => f.write_str("Any")?,
            Spec::Nothing => f.write_str("Nothing")?,
            Spec::Atomic(kind) => write!(f, "{kind}")?,
            Spec::Predicate(p) => f.write_str(p.name())?,
            Spec::Union(a, b) => {
                a.fmt_prec(f, 0)?;
                f.write_str(" | ")?;
                b.fmt_prec(f, 0)?;
            }
            Spec::Intersection(a, b) => {
                a.fmt_prec(f, 1)?;
                f.write_str(" & ")?;
                b.fmt_prec(f, 1)?;
            }
            Spec::Inversion(inner) => {
                f.write_str("!")?;
                inner.fmt_prec(f, 2)?;
            }
            Spec::Container(kind, elements) => {
                write!(f, "{kind}[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    element.fmt_prec(f, 0)?;
                }
                f.write_str("]")?;
            }
        }
        if parens {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Spec {
        Spec::atomic(ValueKind::Int)
    }

    fn float() -> Spec {
        Spec::atomic(ValueKind::Float)
    }

    #[test]
    fn display_atoms() {
        assert_eq!(Spec::any().to_string(), "Any");
        assert_eq!(Spec::nothing().to_string(), "Nothing");
        assert_eq!(int().to_string(), "Int");
        assert_eq!(
            Spec::predicate("positive", |v| v.as_int().is_some_and(|i| i > 0)).to_string(),
            "positive"
        );
    }

    #[test]
    fn display_union_and_intersection() {
        assert_eq!(int().or(float()).to_string(), "Int | Float");
        assert_eq!(
            int().and(Spec::predicate("positive", |_| true)).to_string(),
            "Int & positive"
        );
    }

    #[test]
    fn display_parenthesizes_by_precedence() {
        // union inside intersection needs parens
        let spec = int().or(float()).and(Spec::predicate("positive", |_| true));
        assert_eq!(spec.to_string(), "(Int | Float) & positive");

        // intersection inside union does not
        let spec = int().and(Spec::predicate("p", |_| true)).or(float());
        assert_eq!(spec.to_string(), "Int & p | Float");

        // inversion binds tightest
        let spec = int().or(float()).negate();
        assert_eq!(spec.to_string(), "!(Int | Float)");
        assert_eq!(int().negate().to_string(), "!Int");
    }

    #[test]
    fn display_containers() {
        assert_eq!(Spec::array_of(int()).to_string(), "Array[Int]");
        assert_eq!(
            Spec::tuple_of(vec![Arc::new(int()), Arc::new(float())])
                .unwrap()
                .to_string(),
            "Array[Int, Float]"
        );
        assert_eq!(Spec::map_of(int()).to_string(), "Object[Int]");
        assert_eq!(
            Spec::array_of(Spec::array_of(int())).to_string(),
            "Array[Array[Int]]"
        );
    }

    #[test]
    fn empty_container_is_rejected() {
        let err = Spec::container(ContainerKind::Array, vec![]).unwrap_err();
        assert!(matches!(err, SpecError::EmptyContainer { .. }));
    }

    #[test]
    fn positional_object_is_rejected() {
        let err =
            Spec::container(ContainerKind::Object, vec![Arc::new(int()), Arc::new(float())])
                .unwrap_err();
        assert!(matches!(err, SpecError::PositionalObject { count: 2 }));
    }

    #[test]
    fn combinators_share_operands_without_mutation() {
        let base: Arc<Spec> = Arc::new(int());
        let a = Spec::union(base.clone(), float());
        let b = Spec::intersection(base.clone(), Spec::predicate("p", |_| true));
        // the shared node is unchanged and referenced by both trees
        assert_eq!(base.to_string(), "Int");
        assert_eq!(a.to_string(), "Int | Float");
        assert_eq!(b.to_string(), "Int & p");
    }

    #[test]
    fn spec_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Spec>();
    }
}
