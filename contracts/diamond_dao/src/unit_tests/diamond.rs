use library::types::{Parameter, ParameterValue};
use near_sdk::serde_json::json;

use crate::diamond::{FacetCut, FacetCutAction, FacetKind};
use crate::dispatch::FacetCall;
use crate::error::GovernanceError;

use super::*;

fn vault_v2() -> AccountId {
    acc(&format!("vault-v2.{}", KERNEL_ACC))
}

fn cut(facet: Option<AccountId>, action: FacetCutAction, selectors: &[&str]) -> FacetCut {
    FacetCut {
        facet_address: facet,
        action,
        selectors: selectors.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn init_registers_builtin_facets() {
    let contract = get_contract();
    let addresses = contract.facet_addresses();
    assert_eq!(addresses.len(), FacetKind::all().len());
    assert_eq!(addresses[0], acc(KERNEL_ACC));
    assert_eq!(
        contract.facet_address("lock".into()),
        Some(acc(&format!("vault.{}", KERNEL_ACC)))
    );
    assert_eq!(
        contract.facet_address("register".into()),
        Some(acc(KERNEL_ACC))
    );
    assert!(contract
        .facet_selectors(acc(&format!("voting.{}", KERNEL_ACC)))
        .contains(&"execute_proposal".to_string()));
    assert_eq!(contract.facet_address("unknown".into()), None);
}

#[test]
fn cut_failures() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let vault = acc(&format!("vault.{}", KERNEL_ACC));

    let cases = vec![
        (cut(Some(vault.clone()), FacetCutAction::Add, &[]), "invalid input: no selectors"),
        (
            cut(Some(acc("random.testnet")), FacetCutAction::Add, &["foo"]),
            "invalid input: not a contract",
        ),
        (
            cut(Some(vault.clone()), FacetCutAction::Add, &["lock"]),
            "already exists: selector already added: lock",
        ),
        (
            cut(Some(vault.clone()), FacetCutAction::Add, &["foo", "foo"]),
            "already exists: selector already added: foo",
        ),
        (
            cut(Some(vault.clone()), FacetCutAction::Replace, &["register"]),
            "invalid state: immutable: register",
        ),
        (
            cut(Some(vault.clone()), FacetCutAction::Replace, &["foo"]),
            "not found: selector not registered: foo",
        ),
        (
            cut(Some(vault.clone()), FacetCutAction::Replace, &["lock"]),
            "already exists: selector already added to facet: lock",
        ),
        (
            cut(None, FacetCutAction::Remove, &["foo"]),
            "not found: selector not registered: foo",
        ),
        (
            cut(None, FacetCutAction::Remove, &["facets"]),
            "invalid state: immutable: facets",
        ),
        (
            cut(Some(vault), FacetCutAction::Remove, &["vote_for"]),
            "invalid input: selector from another facet: vote_for",
        ),
    ];
    for (cut, message) in cases {
        let err = contract
            .internal_register(&owner, vec![cut], None)
            .unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn only_owner_cuts() {
    let mut contract = get_contract();
    let err = contract
        .internal_register(
            &acc(USER_1),
            vec![cut(None, FacetCutAction::Remove, &["lock"])],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, GovernanceError::AccessDenied(_)));
    assert!(contract.facet_address("lock".into()).is_some());
}

#[test]
fn replace_moves_selector_to_new_facet() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let vault = acc(&format!("vault.{}", KERNEL_ACC));
    contract
        .internal_deploy_facet(&owner, vault_v2(), FacetKind::Vault)
        .unwrap();
    assert_eq!(
        contract.internal_deploy_facet(&owner, vault_v2(), FacetKind::Vault),
        Err(GovernanceError::AlreadyExists(
            "facet already deployed".into()
        ))
    );

    contract
        .internal_register(
            &owner,
            vec![cut(Some(vault_v2()), FacetCutAction::Replace, &["lock", "lock_nft"])],
            None,
        )
        .unwrap();
    assert_eq!(contract.facet_address("lock".into()), Some(vault_v2()));
    assert_eq!(
        contract.facet_selectors(vault_v2()),
        vec!["lock".to_string(), "lock_nft".to_string()]
    );
    assert!(!contract
        .facet_selectors(vault.clone())
        .contains(&"lock".to_string()));
    assert!(contract.facet_addresses().contains(&vault_v2()));

    // Removing the last selectors of a facet drops it from the facet list.
    contract
        .internal_register(
            &owner,
            vec![cut(Some(vault_v2()), FacetCutAction::Remove, &["lock", "lock_nft"])],
            None,
        )
        .unwrap();
    assert!(!contract.facet_addresses().contains(&vault_v2()));
    assert_eq!(contract.facet_address("lock".into()), None);
}

#[test]
#[should_panic(expected = "not found: selector not registered")]
fn removed_selector_is_not_callable() {
    let mut contract = get_contract();
    contract
        .internal_register(
            &acc(OWNER_ACC),
            vec![cut(None, FacetCutAction::Remove, &["set_parameter"])],
            None,
        )
        .unwrap();
    contract.set_parameter(Parameter::new("flag", ParameterValue::Bool(true)));
}

#[test]
fn register_runs_init_call() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let init = FacetCall::new(
        "set_parameter",
        json!({ "parameter": Parameter::new("flag", ParameterValue::Bool(true)) }),
    );
    contract.internal_register(&owner, vec![], Some(init)).unwrap();
    assert_eq!(
        contract.get_parameter("flag".into()).as_bool(),
        Ok(true)
    );

    let failing = FacetCall::new("remove_parameter", json!({ "name": "missing" }));
    assert!(matches!(
        contract.internal_register(&owner, vec![], Some(failing)),
        Err(GovernanceError::ExternalCallFailure(_))
    ));
    let empty = FacetCall::new("", json!({}));
    assert!(matches!(
        contract.internal_register(&owner, vec![], Some(empty)),
        Err(GovernanceError::InvalidInput(_))
    ));
}

#[test]
fn dispatch_rejects_calls_outside_target() {
    let mut contract = get_contract();
    let kernel = acc(KERNEL_ACC);
    let call = FacetCall::new(
        "grant_roles",
        json!({ "account_id": USER_1, "roles": ["*"] }),
    );
    let target = contract.parameter_storage_resource();
    assert_eq!(
        contract.dispatch(&kernel, Some(&target), &call),
        Err(GovernanceError::ExternalCallFailure(
            "call does not belong to the target".into()
        ))
    );
    assert!(contract.get_user_roles(acc(USER_1)).is_empty());

    let unknown = FacetCall::new("delete_everything", json!({}));
    assert!(matches!(
        contract.dispatch(&kernel, None, &unknown),
        Err(GovernanceError::NotFound(_))
    ));
    let view = FacetCall::new("get_members", json!({ "storage": "x" }));
    assert!(matches!(
        contract.dispatch(&kernel, None, &view),
        Err(GovernanceError::ExternalCallFailure(_))
    ));
}

#[test]
fn ownership_transfer() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    assert_eq!(
        contract.internal_transfer_ownership(&owner, None),
        Err(GovernanceError::InvalidInput("zero address".into()))
    );
    contract
        .internal_transfer_ownership(&owner, Some(acc(USER_1)))
        .unwrap();
    assert_eq!(contract.owner(), acc(USER_1));
    assert!(matches!(
        contract.internal_transfer_ownership(&owner, Some(owner.clone())),
        Err(GovernanceError::AccessDenied(_))
    ));
}
