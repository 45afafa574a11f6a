use library::naming::{token_holder_group, token_holder_role};
use library::rbac::{ResourcePermissions, PERMISSION_CREATE, PERMISSION_DELETE, PERMISSION_UPDATE};

use crate::error::GovernanceError;

use super::*;

const RESOURCE: &str = "DAO_VAULT:treasury";

fn entries(permission: &str) -> Vec<ResourcePermissions> {
    vec![ResourcePermissions {
        resource: RESOURCE.into(),
        permissions: vec![permission.into()],
    }]
}

#[test]
fn deny_overrides_allow_in_any_order() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    let user = acc(USER_1);

    contract
        .internal_add_permissions_to_role(
            &owner,
            &"denier".into(),
            entries(PERMISSION_UPDATE),
            false,
        )
        .unwrap();
    contract
        .internal_add_permissions_to_role(
            &owner,
            &"updater".into(),
            entries(PERMISSION_UPDATE),
            true,
        )
        .unwrap();
    contract
        .internal_grant_roles(&owner, &user, vec!["updater".into()])
        .unwrap();
    assert!(contract.has_permission(user.clone(), RESOURCE.into(), PERMISSION_UPDATE.into()));

    contract
        .internal_grant_roles(&owner, &user, vec!["denier".into()])
        .unwrap();
    assert!(!contract.has_permission(user.clone(), RESOURCE.into(), PERMISSION_UPDATE.into()));

    // Granted in the opposite order through a group.
    let other = acc(USER_2);
    contract
        .internal_grant_group_roles(&owner, &"auditors".into(), vec!["denier".into()])
        .unwrap();
    contract
        .internal_add_user_to_groups(&owner, &other, vec!["auditors".into()])
        .unwrap();
    contract
        .internal_grant_roles(&owner, &other, vec!["updater".into()])
        .unwrap();
    assert!(!contract.has_permission(other.clone(), RESOURCE.into(), PERMISSION_UPDATE.into()));

    contract
        .internal_remove_user_from_groups(&owner, &other, vec!["auditors".into()])
        .unwrap();
    assert!(contract.has_permission(other, RESOURCE.into(), PERMISSION_UPDATE.into()));
}

#[test]
fn master_role_bypasses_deny() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    contract
        .internal_add_permissions_to_role(
            &owner,
            &"denier".into(),
            entries(PERMISSION_DELETE),
            false,
        )
        .unwrap();
    contract
        .internal_grant_roles(&owner, &owner, vec!["denier".into()])
        .unwrap();
    assert!(contract.has_permission(owner.clone(), RESOURCE.into(), PERMISSION_DELETE.into()));
    assert!(contract.has_permission(acc(KERNEL_ACC), "anything".into(), "ANY".into()));
    assert!(!contract.has_permission(acc(USER_1), RESOURCE.into(), PERMISSION_DELETE.into()));
}

#[test]
fn mutations_require_manager_permissions() {
    let mut contract = get_contract();
    let user = acc(USER_1);
    let err = contract
        .internal_grant_roles(&user, &user, vec!["*".into()])
        .unwrap_err();
    assert!(matches!(err, GovernanceError::AccessDenied(_)));
    assert!(contract.get_user_roles(user.clone()).is_empty());

    // CREATE alone does not allow revoking.
    let owner = acc(OWNER_ACC);
    let manager = contract.permission_manager_resource();
    contract
        .internal_add_permissions_to_role(
            &owner,
            &"granter".into(),
            vec![ResourcePermissions {
                resource: manager,
                permissions: vec![PERMISSION_CREATE.into()],
            }],
            true,
        )
        .unwrap();
    contract
        .internal_grant_roles(&owner, &user, vec!["granter".into()])
        .unwrap();
    contract
        .internal_grant_roles(&user, &acc(USER_2), vec!["granter".into()])
        .unwrap();
    assert!(matches!(
        contract.internal_revoke_roles(&user, &acc(USER_2), vec!["granter".into()]),
        Err(GovernanceError::AccessDenied(_))
    ));
}

#[test]
fn empty_group_lists_fail() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    assert_eq!(
        contract.internal_grant_group_roles(&owner, &"g".into(), vec![]),
        Err(GovernanceError::InvalidInput("empty roles".into()))
    );
    assert_eq!(
        contract.internal_revoke_group_roles(&owner, &"g".into(), vec![]),
        Err(GovernanceError::InvalidInput("empty roles".into()))
    );
    assert_eq!(
        contract.internal_add_user_to_groups(&owner, &acc(USER_1), vec![]),
        Err(GovernanceError::InvalidInput("empty groups".into()))
    );
    assert_eq!(
        contract.internal_remove_user_from_groups(&owner, &acc(USER_1), vec![]),
        Err(GovernanceError::InvalidInput("empty groups".into()))
    );
}

#[test]
fn role_views() {
    let mut contract = get_contract();
    let owner = acc(OWNER_ACC);
    contract
        .internal_add_permissions_to_role(
            &owner,
            &"updater".into(),
            entries(PERMISSION_UPDATE),
            true,
        )
        .unwrap();
    contract
        .internal_add_permissions_to_role(
            &owner,
            &"updater".into(),
            entries(PERMISSION_DELETE),
            false,
        )
        .unwrap();
    let permissions = contract.get_role_permissions("updater".into());
    assert_eq!(permissions.allowed.len(), 1);
    assert_eq!(permissions.denied.len(), 1);

    contract
        .internal_remove_permissions_from_role(
            &owner,
            &"updater".into(),
            entries(PERMISSION_DELETE),
            false,
        )
        .unwrap();
    assert!(contract.get_role_permissions("updater".into()).denied.is_empty());

    assert_eq!(contract.get_user_roles(owner), vec!["*".to_string()]);
    assert_eq!(
        contract.get_group_roles(token_holder_group(PANEL)),
        vec![token_holder_role(PANEL)]
    );
}
