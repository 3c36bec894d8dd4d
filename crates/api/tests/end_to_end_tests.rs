//! Full-pipeline tests: textual contracts through binding, checking, and
//! enforcement, the way library consumers put the pieces together.

use conforma_api::{
    build_spec, construct, install_builtins, parse_contract, AliasRegistry, EnforceError,
    Enforced, Value,
};

fn ready_registry() -> AliasRegistry {
    let registry = AliasRegistry::new();
    install_builtins(&registry).unwrap();
    registry.seal();
    registry
}

#[test]
fn textual_contract_enforces_a_join_like_callable() {
    let registry = ready_registry();
    let contract = parse_contract("(Str, *(Int | Str)) -> Str", &registry).unwrap();
    let join = Enforced::new("join", contract, |args: &[Value]| {
        let sep = args[0].as_str().unwrap();
        let parts: Vec<String> = args[1..]
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        Value::String(parts.join(sep))
    });

    let result = join
        .call(&[
            Value::String("-".into()),
            Value::Int(1),
            Value::String("b".into()),
            Value::Int(2),
        ])
        .unwrap();
    assert_eq!(result, Value::String("1-b-2".into()));

    // a float in the variadic tail fails at its position
    let err = join
        .call(&[
            Value::String("-".into()),
            Value::Int(1),
            Value::Float(2.5),
        ])
        .unwrap_err();
    assert!(matches!(err, EnforceError::Argument { index: 3, .. }));
}

#[test]
fn aliases_flow_from_registry_into_checks() {
    let registry = ready_registry();
    let number = build_spec("Number", &registry).unwrap();
    assert!(construct(&number, Value::Int(3)).is_ok());
    assert!(construct(&number, Value::Float(3.5)).is_ok());
    assert!(construct(&number, Value::Bool(true)).is_err());
}

#[test]
fn nested_container_expression_checks_deeply() {
    let registry = ready_registry();
    let spec = build_spec("Array[Array[Array[Int]]]", &registry).unwrap();
    let ok: Value = serde_json::json!([[[1]], [[2, 3]]]).into();
    assert!(construct(&spec, ok).is_ok());

    let bad: Value = serde_json::json!([[[1]], [[2, "a"]]]).into();
    let err = construct(&spec, bad).unwrap_err();
    assert!(err.cause.to_string().contains("value[1][0][1]"));
}

#[test]
fn sealed_registry_still_serves_existing_contracts() {
    let registry = ready_registry();
    // snapshot taken at definition time keeps working after sealing
    let contract = parse_contract("(Number) -> Number", &registry).unwrap();
    let id = Enforced::new("id", contract, |args: &[Value]| args[0].clone());
    assert_eq!(id.call(&[Value::Int(7)]).unwrap(), Value::Int(7));
}

#[test]
fn return_nothing_contract_via_text() {
    let registry = ready_registry();
    let contract = parse_contract("(Any) -> Nothing", &registry).unwrap();
    let log = Enforced::new("log", contract, |_: &[Value]| Value::Null);
    assert_eq!(log.call(&[Value::Int(1)]).unwrap(), Value::Null);

    let contract = parse_contract("(Any) -> Nothing", &registry).unwrap();
    let leaky = Enforced::new("leaky", contract, |args: &[Value]| args[0].clone());
    assert!(matches!(
        leaky.call(&[Value::Int(1)]).unwrap_err(),
        EnforceError::Return { .. }
    ));
}
