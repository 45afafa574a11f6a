//! Role based access control with groups.
//! A user holds roles directly and through every group they belong to.

use std::collections::BTreeSet;

use library::rbac::{
    evaluate, ResourcePermissions, RolePermissions, PERMISSION_CREATE, PERMISSION_DELETE,
};
use near_sdk::{env, near_bindgen, AccountId};

use crate::core::*;
use crate::error::*;
use crate::event::Event;
use crate::{GroupName, Resource, RoleName};

#[near_bindgen]
impl Contract {
    pub fn grant_roles(&mut self, account_id: AccountId, roles: Vec<RoleName>) {
        self.assert_routed("grant_roles");
        let caller = env::predecessor_account_id();
        self.internal_grant_roles(&caller, &account_id, roles)
            .unwrap_or_panic()
    }

    pub fn revoke_roles(&mut self, account_id: AccountId, roles: Vec<RoleName>) {
        self.assert_routed("revoke_roles");
        let caller = env::predecessor_account_id();
        self.internal_revoke_roles(&caller, &account_id, roles)
            .unwrap_or_panic()
    }

    /// Adds `permissions` to the allow set of `role` if `allowed`, otherwise to its deny set.
    pub fn add_permissions_to_role(
        &mut self,
        role: RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    ) {
        self.assert_routed("add_permissions_to_role");
        let caller = env::predecessor_account_id();
        self.internal_add_permissions_to_role(&caller, &role, permissions, allowed)
            .unwrap_or_panic()
    }

    pub fn remove_permissions_from_role(
        &mut self,
        role: RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    ) {
        self.assert_routed("remove_permissions_from_role");
        let caller = env::predecessor_account_id();
        self.internal_remove_permissions_from_role(&caller, &role, permissions, allowed)
            .unwrap_or_panic()
    }

    pub fn grant_group_roles(&mut self, group: GroupName, roles: Vec<RoleName>) {
        self.assert_routed("grant_group_roles");
        let caller = env::predecessor_account_id();
        self.internal_grant_group_roles(&caller, &group, roles)
            .unwrap_or_panic()
    }

    pub fn revoke_group_roles(&mut self, group: GroupName, roles: Vec<RoleName>) {
        self.assert_routed("revoke_group_roles");
        let caller = env::predecessor_account_id();
        self.internal_revoke_group_roles(&caller, &group, roles)
            .unwrap_or_panic()
    }

    pub fn add_user_to_groups(&mut self, account_id: AccountId, groups: Vec<GroupName>) {
        self.assert_routed("add_user_to_groups");
        let caller = env::predecessor_account_id();
        self.internal_add_user_to_groups(&caller, &account_id, groups)
            .unwrap_or_panic()
    }

    pub fn remove_user_from_groups(&mut self, account_id: AccountId, groups: Vec<GroupName>) {
        self.assert_routed("remove_user_from_groups");
        let caller = env::predecessor_account_id();
        self.internal_remove_user_from_groups(&caller, &account_id, groups)
            .unwrap_or_panic()
    }
}

impl Contract {
    /// Roles held directly and through groups.
    pub fn held_roles(&self, account_id: &AccountId) -> BTreeSet<RoleName> {
        let mut roles = self.user_roles.get(account_id).unwrap_or_default();
        for group in self.user_groups.get(account_id).unwrap_or_default() {
            roles.extend(self.group_roles.get(&group).unwrap_or_default());
        }
        roles
    }

    pub fn user_has_permission(
        &self,
        account_id: &AccountId,
        resource: &str,
        permission: &str,
    ) -> bool {
        let permissions: Vec<RolePermissions> = self
            .held_roles(account_id)
            .iter()
            .filter_map(|role| self.roles.get(role))
            .collect();
        evaluate(permissions.iter(), resource, permission)
    }

    pub(crate) fn require_permission(
        &self,
        caller: &AccountId,
        resource: &str,
        permission: &str,
    ) -> GovernanceResult<()> {
        if !self.user_has_permission(caller, resource, permission) {
            return Err(GovernanceError::access_denied(format!(
                "{} has no {} permission on {}",
                caller, permission, resource
            )));
        }
        Ok(())
    }

    fn require_manager_permission(
        &self,
        caller: &AccountId,
        permission: &str,
    ) -> GovernanceResult<()> {
        let resource: Resource = self.permission_manager_resource();
        self.require_permission(caller, &resource, permission)
    }

    pub fn internal_grant_roles(
        &mut self,
        caller: &AccountId,
        account_id: &AccountId,
        roles: Vec<RoleName>,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_CREATE)?;
        self.grant_roles_unchecked(account_id, &roles);
        Ok(())
    }

    pub fn internal_revoke_roles(
        &mut self,
        caller: &AccountId,
        account_id: &AccountId,
        roles: Vec<RoleName>,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_DELETE)?;
        let mut held = self.user_roles.get(account_id).unwrap_or_default();
        for role in roles.iter() {
            held.remove(role);
        }
        if held.is_empty() {
            self.user_roles.remove(account_id);
        } else {
            self.user_roles.insert(account_id, &held);
        }
        Event::RolesRevoked {
            account_id: account_id.clone(),
            roles,
        }
        .emit();
        Ok(())
    }

    pub fn internal_add_permissions_to_role(
        &mut self,
        caller: &AccountId,
        role: &RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_CREATE)?;
        self.add_role_permissions_unchecked(role, permissions, allowed);
        Ok(())
    }

    pub fn internal_remove_permissions_from_role(
        &mut self,
        caller: &AccountId,
        role: &RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_DELETE)?;
        let mut role_permissions = self.roles.get(role).unwrap_or_default();
        role_permissions.remove(&permissions, allowed);
        if role_permissions.is_empty() {
            self.roles.remove(role);
        } else {
            self.roles.insert(role, &role_permissions);
        }
        Event::PermissionsRemoved {
            role: role.clone(),
            permissions,
            allowed,
        }
        .emit();
        Ok(())
    }

    pub fn internal_grant_group_roles(
        &mut self,
        caller: &AccountId,
        group: &GroupName,
        roles: Vec<RoleName>,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_CREATE)?;
        if roles.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_ROLES));
        }
        self.grant_group_roles_unchecked(group, &roles);
        Ok(())
    }

    pub fn internal_revoke_group_roles(
        &mut self,
        caller: &AccountId,
        group: &GroupName,
        roles: Vec<RoleName>,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_DELETE)?;
        if roles.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_ROLES));
        }
        self.revoke_group_roles_unchecked(group, &roles);
        Ok(())
    }

    pub fn internal_add_user_to_groups(
        &mut self,
        caller: &AccountId,
        account_id: &AccountId,
        groups: Vec<GroupName>,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_CREATE)?;
        if groups.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_GROUPS));
        }
        self.add_user_to_groups_unchecked(account_id, &groups);
        Ok(())
    }

    pub fn internal_remove_user_from_groups(
        &mut self,
        caller: &AccountId,
        account_id: &AccountId,
        groups: Vec<GroupName>,
    ) -> GovernanceResult<()> {
        self.require_manager_permission(caller, PERMISSION_DELETE)?;
        if groups.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_GROUPS));
        }
        self.remove_user_from_groups_unchecked(account_id, &groups);
        Ok(())
    }

    pub(crate) fn grant_roles_unchecked(&mut self, account_id: &AccountId, roles: &[RoleName]) {
        let mut held = self.user_roles.get(account_id).unwrap_or_default();
        held.extend(roles.iter().cloned());
        self.user_roles.insert(account_id, &held);
        Event::RolesGranted {
            account_id: account_id.clone(),
            roles: roles.to_vec(),
        }
        .emit();
    }

    pub(crate) fn add_role_permissions_unchecked(
        &mut self,
        role: &RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    ) {
        let mut role_permissions = self.roles.get(role).unwrap_or_default();
        role_permissions.add(&permissions, allowed);
        self.roles.insert(role, &role_permissions);
        Event::PermissionsAdded {
            role: role.clone(),
            permissions,
            allowed,
        }
        .emit();
    }

    pub(crate) fn grant_group_roles_unchecked(&mut self, group: &GroupName, roles: &[RoleName]) {
        let mut group_roles = self.group_roles.get(group).unwrap_or_default();
        group_roles.extend(roles.iter().cloned());
        self.group_roles.insert(group, &group_roles);
        Event::GroupRolesGranted {
            group: group.clone(),
            roles: roles.to_vec(),
        }
        .emit();
    }

    pub(crate) fn revoke_group_roles_unchecked(&mut self, group: &GroupName, roles: &[RoleName]) {
        let mut group_roles = self.group_roles.get(group).unwrap_or_default();
        for role in roles {
            group_roles.remove(role);
        }
        if group_roles.is_empty() {
            self.group_roles.remove(group);
        } else {
            self.group_roles.insert(group, &group_roles);
        }
        Event::GroupRolesRevoked {
            group: group.clone(),
            roles: roles.to_vec(),
        }
        .emit();
    }

    pub(crate) fn add_user_to_groups_unchecked(
        &mut self,
        account_id: &AccountId,
        groups: &[GroupName],
    ) {
        let mut user_groups = self.user_groups.get(account_id).unwrap_or_default();
        user_groups.extend(groups.iter().cloned());
        self.user_groups.insert(account_id, &user_groups);
        Event::UserAddedToGroups {
            account_id: account_id.clone(),
            groups: groups.to_vec(),
        }
        .emit();
    }

    pub(crate) fn remove_user_from_groups_unchecked(
        &mut self,
        account_id: &AccountId,
        groups: &[GroupName],
    ) {
        let mut user_groups = self.user_groups.get(account_id).unwrap_or_default();
        for group in groups {
            user_groups.remove(group);
        }
        if user_groups.is_empty() {
            self.user_groups.remove(account_id);
        } else {
            self.user_groups.insert(account_id, &user_groups);
        }
        Event::UserRemovedFromGroups {
            account_id: account_id.clone(),
            groups: groups.to_vec(),
        }
        .emit();
    }

    pub fn is_in_group(&self, account_id: &AccountId, group: &str) -> bool {
        self.user_groups
            .get(account_id)
            .map(|groups| groups.contains(group))
            .unwrap_or(false)
    }
}
