use library::naming::{expert_group, veto_role};
use library::rbac::{ResourcePermissions, PERMISSION_VETO};

use crate::error::GovernanceError;
use crate::veto::VetoGroupInput;
use crate::view::VetoGroupInfo;

use super::*;

/// Creates a storage with the three experts and returns its resource.
fn council(contract: &mut Contract, name: &str) -> Resource {
    let owner = acc(OWNER_ACC);
    let storage = contract.internal_create_member_storage(&owner, name).unwrap();
    contract
        .internal_add_members(
            &owner,
            &storage,
            vec![acc(EXPERT_1), acc(EXPERT_2), acc(EXPERT_3)],
        )
        .unwrap();
    storage
}

fn input(target: &Resource, linked_storage: Option<Resource>) -> VetoGroupInput {
    VetoGroupInput {
        target: target.clone(),
        name: "guardians".into(),
        linked_storage,
    }
}

#[test]
fn add_and_remove_veto_groups() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let target = contract.voting_resource();
    let storage = council(&mut contract, "council");

    contract
        .internal_add_veto_groups(&owner, vec![input(&target, Some(storage.clone()))])
        .unwrap();
    assert!(contract.is_veto_group_exists(target.clone()));
    assert_eq!(contract.get_existing_veto_group_targets(), vec![target.clone()]);
    assert_eq!(
        contract.get_veto_group_info(target.clone()),
        Some(VetoGroupInfo {
            target: target.clone(),
            name: "guardians".into(),
            linked_storage: Some(storage.clone()),
            members_count: 3,
        })
    );
    assert!(contract.is_vetoer(&target, &acc(EXPERT_1)));
    assert!(!contract.is_vetoer(&target, &acc(USER_1)));

    assert!(matches!(
        contract.internal_add_veto_groups(&owner, vec![input(&target, None)]),
        Err(GovernanceError::AlreadyExists(_))
    ));

    contract.internal_remove_veto_group(&owner, &target).unwrap();
    assert!(!contract.is_veto_group_exists(target.clone()));
    assert!(!contract.is_vetoer(&target, &acc(EXPERT_1)));
    assert!(contract
        .get_group_roles(expert_group(&storage))
        .iter()
        .all(|role| *role != veto_role(&target)));
    assert!(matches!(
        contract.internal_remove_veto_group(&owner, &target),
        Err(GovernanceError::NotFound(_))
    ));
}

#[test]
fn batch_add_is_all_or_nothing() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let voting = contract.voting_resource();
    let vault = contract.vault_resource();

    assert!(matches!(
        contract.internal_add_veto_groups(&owner, vec![input(&vault, None), input(&vault, None)]),
        Err(GovernanceError::AlreadyExists(_))
    ));
    assert!(matches!(
        contract.internal_add_veto_groups(
            &owner,
            vec![
                input(&voting, None),
                input(&vault, Some("DAO_MEMBER_STORAGE:nope".into()))
            ]
        ),
        Err(GovernanceError::NotFound(_))
    ));
    assert!(contract.get_existing_veto_group_targets().is_empty());

    // An empty storage name means no link.
    contract
        .internal_add_veto_groups(&owner, vec![input(&voting, Some("".into()))])
        .unwrap();
    assert_eq!(
        contract
            .get_veto_group_info(voting.clone())
            .map(|info| info.linked_storage),
        Some(None)
    );
    assert!(contract.get_veto_group_members(voting).is_empty());
}

#[test]
fn relinking_moves_the_veto_role() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let target = contract.voting_resource();
    let first = council(&mut contract, "first");
    let second = contract.internal_create_member_storage(&owner, "second").unwrap();
    contract
        .internal_add_members(&owner, &second, vec![acc(USER_1)])
        .unwrap();

    contract
        .internal_add_veto_groups(&owner, vec![input(&target, Some(first.clone()))])
        .unwrap();
    contract
        .internal_link_storage_to_veto_group(&owner, &target, Some(second.clone()))
        .unwrap();
    assert!(!contract.is_vetoer(&target, &acc(EXPERT_1)));
    assert!(contract.is_vetoer(&target, &acc(USER_1)));
    assert_eq!(contract.get_veto_group_members(target.clone()), vec![acc(USER_1)]);
    assert_eq!(contract.get_veto_members_count(target.clone()), 1);

    contract
        .internal_link_storage_to_veto_group(&owner, &target, None)
        .unwrap();
    assert!(!contract.is_vetoer(&target, &acc(USER_1)));
    assert_eq!(contract.get_veto_members_count(target.clone()), 0);

    assert!(matches!(
        contract.internal_link_storage_to_veto_group(&acc(USER_1), &target, Some(first)),
        Err(GovernanceError::AccessDenied(_))
    ));
}

#[test]
fn denied_veto_permission_blocks_member() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let target = contract.voting_resource();
    let storage = council(&mut contract, "council");
    contract
        .internal_add_veto_groups(&owner, vec![input(&target, Some(storage))])
        .unwrap();

    contract
        .internal_add_permissions_to_role(
            &owner,
            &"no_veto".into(),
            vec![ResourcePermissions {
                resource: target.clone(),
                permissions: vec![PERMISSION_VETO.into()],
            }],
            false,
        )
        .unwrap();
    contract
        .internal_grant_roles(&owner, &acc(EXPERT_2), vec!["no_veto".into()])
        .unwrap();

    assert!(contract.is_vetoer(&target, &acc(EXPERT_1)));
    assert!(!contract.is_vetoer(&target, &acc(EXPERT_2)));
    assert_eq!(contract.get_veto_members_count(target), 3);
}

#[test]
#[should_panic(expected = "not found: veto group does not exist")]
fn members_of_missing_group_panics() {
    let contract = get_contract();
    contract.get_veto_group_members("DAO_VAULT:nope".into());
}
