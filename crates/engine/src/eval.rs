//! Conformance evaluator
//!
//! [`check`] recursively tests a concrete value against a spec tree. It is a
//! pure function over immutable inputs: no shared state, no side effects,
//! same inputs always produce the same result, including failure paths and
//! descriptions.
//!
//! Failure reporting rules:
//! - intersections report the failing side's own description (the narrowest
//!   failing sub-spec); unions where both sides mismatch report the union
//!   itself, since neither branch is narrower when both failed
//! - container checks report the leftmost failing element and extend the
//!   child's error with that element's index or key
//! - a panicking predicate is an evaluator error, never a mismatch, and it
//!   propagates unchanged through every combinator - inversion does not
//!   negate it and a union does not swallow it by trying the other branch

use conforma_core::spec::Predicate;
use conforma_core::{
    ContainerKind, MatchError, MatchResult, PathSegment, Spec, Value,
};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Test `value` against `spec`.
pub fn check(spec: &Spec, value: &Value) -> MatchResult {
    match spec {
        Spec::Any => Ok(()),
        Spec::Nothing => {
            if value.is_null() {
                Ok(())
            } else {
                Err(MatchError::mismatch("Nothing", value))
            }
        }
        Spec::Atomic(kind) => {
            // exact kind equality: Int never satisfies Float and vice versa
            if value.kind() == *kind {
                Ok(())
            } else {
                Err(MatchError::mismatch(kind.name(), value))
            }
        }
        Spec::Predicate(p) => run_predicate(p, value),
        Spec::Union(a, b) => match check(a, value) {
            Ok(()) => Ok(()),
            Err(err) if !err.is_mismatch() => Err(err),
            Err(_) => match check(b, value) {
                Ok(()) => Ok(()),
                Err(err) if !err.is_mismatch() => Err(err),
                Err(_) => Err(MatchError::mismatch(spec.to_string(), value)),
            },
        },
        Spec::Intersection(a, b) => {
            check(a, value)?;
            check(b, value)
        }
        Spec::Inversion(inner) => match check(inner, value) {
            Ok(()) => Err(MatchError::mismatch(spec.to_string(), value)),
            Err(err) if !err.is_mismatch() => Err(err),
            Err(_) => Ok(()),
        },
        Spec::Container(kind, elements) => check_container(spec, *kind, elements, value),
    }
}

fn check_container(
    whole: &Spec,
    kind: ContainerKind,
    elements: &[Arc<Spec>],
    value: &Value,
) -> MatchResult {
    // the constructors reject these shapes, but the variant fields are
    // public; a malformed element list matches nothing instead of panicking
    let Some((first, rest)) = elements.split_first() else {
        return Err(MatchError::mismatch(whole.to_string(), value));
    };
    match value {
        Value::Array(items) if kind == ContainerKind::Array => {
            if rest.is_empty() {
                // homogeneous: every element against the single spec
                for (i, item) in items.iter().enumerate() {
                    at_segment(check(first, item), PathSegment::Index(i))?;
                }
                Ok(())
            } else {
                // positional: exact arity, element i against spec i
                if items.len() != elements.len() {
                    return Err(MatchError::mismatch(whole.to_string(), value));
                }
                for (i, (element, item)) in elements.iter().zip(items).enumerate() {
                    at_segment(check(element, item), PathSegment::Index(i))?;
                }
                Ok(())
            }
        }
        Value::Object(map) if kind == ContainerKind::Object => {
            // object containers are homogeneous; a bypassed positional list
            // matches nothing
            if !rest.is_empty() {
                return Err(MatchError::mismatch(whole.to_string(), value));
            }
            // keys sorted so the leftmost-failure tie-break is deterministic
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                at_segment(check(first, &map[key]), PathSegment::Key(key.clone()))?;
            }
            Ok(())
        }
        _ => Err(MatchError::mismatch(whole.to_string(), value)),
    }
}

// Extend a child failure with the container segment it occurred under.
// Evaluator errors carry no path and pass through untouched.
fn at_segment(result: MatchResult, segment: PathSegment) -> MatchResult {
    result.map_err(|err| match err {
        MatchError::Mismatch(mut mismatch) => {
            mismatch.path.prepend(segment);
            MatchError::Mismatch(mismatch)
        }
        other => other,
    })
}

fn run_predicate(predicate: &Predicate, value: &Value) -> MatchResult {
    match catch_unwind(AssertUnwindSafe(|| (predicate.as_fn())(value))) {
        Ok(true) => Ok(()),
        Ok(false) => Err(MatchError::mismatch(predicate.name(), value)),
        Err(payload) => Err(MatchError::Predicate {
            name: predicate.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conforma_core::{Mismatch, ValueKind};
    use std::collections::HashMap;

    fn int() -> Spec {
        Spec::atomic(ValueKind::Int)
    }

    fn float() -> Spec {
        Spec::atomic(ValueKind::Float)
    }

    fn string() -> Spec {
        Spec::atomic(ValueKind::String)
    }

    fn mismatch_of(result: MatchResult) -> Mismatch {
        match result.unwrap_err() {
            MatchError::Mismatch(m) => m,
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn atomic_matches_exact_kind_only() {
        assert!(check(&int(), &Value::Int(1)).is_ok());
        assert!(check(&int(), &Value::Float(1.0)).is_err());
        assert!(check(&float(), &Value::Int(1)).is_err());
        assert!(check(&float(), &Value::Float(1.0)).is_ok());
    }

    #[test]
    fn any_matches_everything_including_null() {
        for value in [Value::Null, Value::Int(0), Value::Array(vec![])] {
            assert!(check(&Spec::any(), &value).is_ok());
        }
    }

    #[test]
    fn nothing_matches_only_the_null_sentinel() {
        assert!(check(&Spec::nothing(), &Value::Null).is_ok());
        let m = mismatch_of(check(&Spec::nothing(), &Value::Int(0)));
        assert_eq!(m.expected, "Nothing");
        assert_eq!(m.kind, ValueKind::Int);
    }

    #[test]
    fn predicate_false_reports_its_name() {
        let positive = Spec::predicate("positive", |v| v.as_int().is_some_and(|i| i > 0));
        assert!(check(&positive, &Value::Int(3)).is_ok());
        let m = mismatch_of(check(&positive, &Value::Int(-3)));
        assert_eq!(m.expected, "positive");
        assert_eq!(m.found, Value::Int(-3));
    }

    #[test]
    fn panicking_predicate_is_an_evaluator_error() {
        let broken = Spec::predicate("broken", |_| panic!("predicate blew up"));
        let err = check(&broken, &Value::Int(1)).unwrap_err();
        match err {
            MatchError::Predicate { name, message } => {
                assert_eq!(name, "broken");
                assert_eq!(message, "predicate blew up");
            }
            other => panic!("expected evaluator error, got {other:?}"),
        }
    }

    #[test]
    fn union_short_circuits_on_left() {
        // a panicking right side would surface as an evaluator error, so a
        // clean pass proves the right side never ran
        let spec = int().or(Spec::predicate("never", |_| panic!("right side ran")));
        assert!(check(&spec, &Value::Int(1)).is_ok());
    }

    #[test]
    fn union_reports_itself_when_both_sides_mismatch() {
        let spec = int().or(float());
        let m = mismatch_of(check(&spec, &Value::String("x".into())));
        assert_eq!(m.expected, "Int | Float");
        assert_eq!(m.kind, ValueKind::String);
    }

    #[test]
    fn union_propagates_left_evaluator_error_before_trying_right() {
        let spec = Spec::predicate("broken", |_| panic!("boom")).or(int());
        let err = check(&spec, &Value::Int(1)).unwrap_err();
        assert!(!err.is_mismatch());
    }

    #[test]
    fn intersection_reports_the_failing_side() {
        let positive = Spec::predicate("positive", |v| v.as_int().is_some_and(|i| i > 0));
        let spec = int().and(positive);

        // left side fails: reported as Int
        let m = mismatch_of(check(&spec, &Value::Float(2.0)));
        assert_eq!(m.expected, "Int");

        // right side fails: reported as positive
        let m = mismatch_of(check(&spec, &Value::Int(-2)));
        assert_eq!(m.expected, "positive");

        assert!(check(&spec, &Value::Int(2)).is_ok());
    }

    #[test]
    fn inversion_is_total_negation() {
        let spec = int().negate();
        assert!(check(&spec, &Value::Float(1.0)).is_ok());
        let m = mismatch_of(check(&spec, &Value::Int(1)));
        assert_eq!(m.expected, "!Int");
    }

    #[test]
    fn inversion_of_union_is_plain_not() {
        // no De Morgan rewriting: the whole subtree's outcome is negated
        let spec = int().or(float()).negate();
        assert!(check(&spec, &Value::String("x".into())).is_ok());
        assert!(check(&spec, &Value::Int(1)).is_err());
        assert!(check(&spec, &Value::Float(1.0)).is_err());
    }

    #[test]
    fn inversion_does_not_negate_evaluator_errors() {
        let spec = Spec::predicate("broken", |_| panic!("boom")).negate();
        let err = check(&spec, &Value::Int(1)).unwrap_err();
        assert!(!err.is_mismatch());
    }

    #[test]
    fn homogeneous_array_reports_leftmost_failure() {
        let spec = Spec::array_of(int());
        let value: Value = serde_json::json!([1, "x", "y", 3]).into();
        let m = mismatch_of(check(&spec, &value));
        assert_eq!(m.expected, "Int");
        assert_eq!(m.path.to_string(), "value[1]");
        assert_eq!(m.found, Value::String("x".into()));
    }

    #[test]
    fn empty_array_satisfies_homogeneous_spec() {
        assert!(check(&Spec::array_of(int()), &Value::Array(vec![])).is_ok());
    }

    #[test]
    fn positional_array_requires_exact_arity() {
        let spec = Spec::tuple_of(vec![Arc::new(int()), Arc::new(string())]).unwrap();
        let ok: Value = serde_json::json!([1, "x"]).into();
        assert!(check(&spec, &ok).is_ok());

        let short: Value = serde_json::json!([1]).into();
        let m = mismatch_of(check(&spec, &short));
        assert_eq!(m.expected, "Array[Int, Str]");

        let swapped: Value = serde_json::json!(["x", 1]).into();
        let m = mismatch_of(check(&spec, &swapped));
        assert_eq!(m.path.to_string(), "value[0]");
    }

    #[test]
    fn bypassed_empty_container_matches_nothing() {
        // the enum fields are public, so an empty element list is
        // constructible without going through the validated constructors
        let spec = Spec::Container(ContainerKind::Object, vec![]);
        let value = Value::Object(HashMap::from([("a".to_string(), Value::Int(1))]));
        let m = mismatch_of(check(&spec, &value));
        assert_eq!(m.kind, ValueKind::Object);

        let spec = Spec::Container(ContainerKind::Array, vec![]);
        assert!(check(&spec, &Value::Array(vec![])).is_err());
        assert!(check(&spec, &Value::Int(1)).is_err());
    }

    #[test]
    fn bypassed_positional_object_matches_nothing() {
        let spec = Spec::Container(
            ContainerKind::Object,
            vec![Arc::new(int()), Arc::new(string())],
        );
        // even an object whose every value satisfies the first element spec
        // is rejected, not silently checked against elements[0] alone
        let value = Value::Object(HashMap::from([("a".to_string(), Value::Int(1))]));
        assert!(check(&spec, &value).is_err());
    }

    #[test]
    fn single_element_tuple_checks_homogeneously() {
        // one element spec always means homogeneous matching, so the
        // array length is unconstrained
        let spec = Spec::tuple_of(vec![Arc::new(int())]).unwrap();
        assert!(check(&spec, &Value::Array(vec![])).is_ok());
        let three: Value = serde_json::json!([1, 2, 3]).into();
        assert!(check(&spec, &three).is_ok());
    }

    #[test]
    fn container_rejects_wrong_outer_kind() {
        let m = mismatch_of(check(&Spec::array_of(int()), &Value::Int(1)));
        assert_eq!(m.expected, "Array[Int]");
        assert_eq!(m.kind, ValueKind::Int);
    }

    #[test]
    fn nested_containers_report_full_path() {
        let spec = Spec::array_of(Spec::array_of(Spec::array_of(int())));
        let ok: Value = serde_json::json!([[[1]], [[2, 3]]]).into();
        assert!(check(&spec, &ok).is_ok());

        let bad: Value = serde_json::json!([[[1]], [[2, "a"]]]).into();
        let m = mismatch_of(check(&spec, &bad));
        assert_eq!(m.path.to_string(), "value[1][0][1]");
        assert_eq!(m.found, Value::String("a".into()));
    }

    #[test]
    fn deep_nesting_is_recursion_safe() {
        // tens of levels, per the realistic-nesting requirement
        let mut spec = int();
        let mut value = Value::Int(7);
        for _ in 0..64 {
            spec = Spec::array_of(spec);
            value = Value::Array(vec![value]);
        }
        assert!(check(&spec, &value).is_ok());
    }

    #[test]
    fn object_container_checks_values_homogeneously() {
        let spec = Spec::map_of(int());
        let ok = Value::Object(HashMap::from([
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::Int(2)),
        ]));
        assert!(check(&spec, &ok).is_ok());

        let bad = Value::Object(HashMap::from([
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::String("x".into())),
        ]));
        let m = mismatch_of(check(&spec, &bad));
        assert_eq!(m.path.to_string(), "value[\"b\"]");
    }

    #[test]
    fn object_failure_order_is_deterministic() {
        // two failing keys: the smaller key wins every time
        let bad = Value::Object(HashMap::from([
            ("z".to_string(), Value::Null),
            ("a".to_string(), Value::Null),
        ]));
        let spec = Spec::map_of(int());
        for _ in 0..16 {
            let m = mismatch_of(check(&spec, &bad));
            assert_eq!(m.path.to_string(), "value[\"a\"]");
        }
    }

    #[test]
    fn repeated_checks_are_identical() {
        let spec = Spec::array_of(int().or(float()));
        let value: Value = serde_json::json!([1, 2.0, "x"]).into();
        let first = check(&spec, &value);
        for _ in 0..8 {
            assert_eq!(check(&spec, &value), first);
        }
    }
}
