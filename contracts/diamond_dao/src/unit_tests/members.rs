use library::naming::{expert_group, expert_role};
use library::rbac::PERMISSION_VOTE;

use crate::error::GovernanceError;

use super::*;

#[test]
fn default_storage_exists_after_init() {
    let mut contract = get_contract();
    let storage = contract.default_member_storage();
    assert_eq!(storage, format!("DAO_MEMBER_STORAGE:{}", PANEL));
    assert_eq!(contract.get_members_count(storage.clone()), 0);
    assert_eq!(
        contract.get_group_roles(expert_group(&storage)),
        vec![expert_role(&storage)]
    );
    assert!(matches!(
        contract.internal_create_member_storage(&acc(OWNER_ACC), PANEL),
        Err(GovernanceError::AlreadyExists(_))
    ));
}

#[test]
fn members_mirror_into_expert_group() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let storage = contract
        .internal_create_member_storage(&owner, "council")
        .unwrap();
    assert_eq!(storage, "DAO_MEMBER_STORAGE:council");

    contract
        .internal_add_members(&owner, &storage, vec![acc(EXPERT_1), acc(EXPERT_2)])
        .unwrap();
    assert!(contract.is_member(storage.clone(), acc(EXPERT_1)));
    assert_eq!(contract.get_members_count(storage.clone()), 2);
    assert_eq!(
        contract.get_user_groups(acc(EXPERT_1)),
        vec![expert_group(&storage)]
    );
    let voting = contract.voting_resource();
    assert!(contract.has_permission(acc(EXPERT_1), voting.clone(), PERMISSION_VOTE.into()));

    contract
        .internal_remove_members(&owner, &storage, vec![acc(EXPERT_1)])
        .unwrap();
    assert!(!contract.is_member(storage.clone(), acc(EXPERT_1)));
    assert!(contract.get_user_groups(acc(EXPERT_1)).is_empty());
    assert!(!contract.has_permission(acc(EXPERT_1), voting, PERMISSION_VOTE.into()));
}

#[test]
fn member_batches_are_all_or_nothing() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let storage = contract.default_member_storage();
    contract
        .internal_add_members(&owner, &storage, vec![acc(EXPERT_1)])
        .unwrap();

    assert!(matches!(
        contract.internal_add_members(&owner, &storage, vec![acc(EXPERT_2), acc(EXPERT_1)]),
        Err(GovernanceError::AlreadyExists(_))
    ));
    assert!(!contract.is_member(storage.clone(), acc(EXPERT_2)));

    assert!(matches!(
        contract.internal_remove_members(&owner, &storage, vec![acc(EXPERT_1), acc(EXPERT_3)]),
        Err(GovernanceError::NotFound(_))
    ));
    assert!(contract.is_member(storage.clone(), acc(EXPERT_1)));

    assert!(matches!(
        contract.internal_add_members(
            &owner,
            &"DAO_MEMBER_STORAGE:nope".into(),
            vec![acc(EXPERT_2)]
        ),
        Err(GovernanceError::NotFound(_))
    ));
}

#[test]
fn member_changes_need_storage_permissions() {
    let mut contract = get_contract();
    let storage = contract.default_member_storage();
    assert!(matches!(
        contract.internal_add_members(&acc(USER_1), &storage, vec![acc(USER_1)]),
        Err(GovernanceError::AccessDenied(_))
    ));
    assert!(matches!(
        contract.internal_create_member_storage(&acc(USER_1), "mine"),
        Err(GovernanceError::AccessDenied(_))
    ));
}

#[test]
fn empty_inputs_are_rejected() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let storage = contract.default_member_storage();
    assert_eq!(
        contract.internal_add_members(&owner, &storage, vec![]),
        Err(GovernanceError::InvalidInput("empty members".into()))
    );
    assert_eq!(
        contract.internal_create_member_storage(&owner, ""),
        Err(GovernanceError::InvalidInput("empty name".into()))
    );
}
