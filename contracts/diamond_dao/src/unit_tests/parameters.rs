use library::error::CodecError;
use library::fraction::U256;
use library::types::{Parameter, ParameterType, ParameterValue};

use crate::error::GovernanceError;

use super::*;

fn names(contract: &Contract) -> Vec<String> {
    contract
        .get_all_parameters()
        .into_iter()
        .map(|p| p.name)
        .collect()
}

#[test]
fn set_preserves_insertion_order() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    contract
        .internal_set_parameters(
            &owner,
            vec![
                Parameter::new("quorum", ParameterValue::Uint256(10u64.into())),
                Parameter::new("treasury", ParameterValue::Address(acc(USER_1))),
                Parameter::new("name", ParameterValue::String("panel".into())),
            ],
        )
        .unwrap();
    contract
        .internal_set_parameters(
            &owner,
            vec![Parameter::new("quorum", ParameterValue::Uint256(20u64.into()))],
        )
        .unwrap();

    assert_eq!(names(&contract), vec!["quorum", "treasury", "name"]);
    assert_eq!(contract.get_parameter("quorum".into()).as_uint256(), Ok(U256::from(20u64)));
    assert_eq!(
        contract.get_parameter("treasury".into()).as_string(),
        Err(CodecError::InvalidParameterType {
            name: "treasury".into(),
            expected: ParameterType::String,
            actual: ParameterType::Address,
        })
    );
}

#[test]
fn remove_is_all_or_nothing() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    contract
        .internal_set_parameters(
            &owner,
            vec![
                Parameter::new("a", ParameterValue::Bool(true)),
                Parameter::new("b", ParameterValue::None),
            ],
        )
        .unwrap();
    assert!(matches!(
        contract.internal_remove_parameters(&owner, vec!["a".into(), "missing".into()]),
        Err(GovernanceError::NotFound(_))
    ));
    assert_eq!(names(&contract), vec!["a", "b"]);

    contract
        .internal_remove_parameters(&owner, vec!["a".into()])
        .unwrap();
    assert_eq!(names(&contract), vec!["b"]);
    assert!(matches!(
        contract.require_parameter("a"),
        Err(GovernanceError::NotFound(_))
    ));
}

#[test]
fn malformed_values_are_rejected() {
    let mut contract = get_contract();
    let mut flag = Parameter::new("flag", ParameterValue::Bool(true));
    flag.value = vec![7, 7].into();
    assert!(matches!(
        contract.internal_set_parameters(&acc(OWNER_ACC), vec![flag]),
        Err(GovernanceError::InvalidInput(_))
    ));
    assert!(contract.get_all_parameters().is_empty());
}

#[test]
#[should_panic(expected = "not found: parameter does not exist")]
fn get_missing_parameter_panics() {
    let contract = get_contract();
    contract.get_parameter("missing".into());
}

#[test]
fn parameter_changes_need_permissions() {
    let mut contract = get_contract();
    assert!(matches!(
        contract.internal_set_parameters(
            &acc(USER_1),
            vec![Parameter::new("a", ParameterValue::Bool(true))]
        ),
        Err(GovernanceError::AccessDenied(_))
    ));
}
