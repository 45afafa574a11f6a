//! Veto groups. At most one per target resource.
//! A linked member storage makes its members vetoers of the target through an implicit role.

use std::collections::HashSet;

use library::naming::{expert_group, veto_role};
use library::rbac::{
    ResourcePermissions, PERMISSION_CREATE, PERMISSION_DELETE, PERMISSION_UPDATE, PERMISSION_VETO,
};
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{env, near_bindgen, AccountId};

use crate::core::*;
use crate::error::*;
use crate::event::Event;
use crate::Resource;

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct VetoGroup {
    pub name: String,
    pub linked_storage: Option<Resource>,
}

#[derive(Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct VetoGroupInput {
    pub target: Resource,
    pub name: String,
    pub linked_storage: Option<Resource>,
}

#[near_bindgen]
impl Contract {
    pub fn add_veto_group(
        &mut self,
        target: Resource,
        name: String,
        linked_storage: Option<Resource>,
    ) {
        self.assert_routed("add_veto_group");
        let caller = env::predecessor_account_id();
        self.internal_add_veto_groups(
            &caller,
            vec![VetoGroupInput {
                target,
                name,
                linked_storage,
            }],
        )
        .unwrap_or_panic()
    }

    pub fn add_veto_groups(&mut self, veto_groups: Vec<VetoGroupInput>) {
        self.assert_routed("add_veto_groups");
        let caller = env::predecessor_account_id();
        self.internal_add_veto_groups(&caller, veto_groups)
            .unwrap_or_panic()
    }

    pub fn remove_veto_group(&mut self, target: Resource) {
        self.assert_routed("remove_veto_group");
        let caller = env::predecessor_account_id();
        self.internal_remove_veto_group(&caller, &target)
            .unwrap_or_panic()
    }

    /// Moves the implicit veto role from the current storage to `storage`. `None` unlinks.
    pub fn link_storage_to_veto_group(&mut self, target: Resource, storage: Option<Resource>) {
        self.assert_routed("link_storage_to_veto_group");
        let caller = env::predecessor_account_id();
        self.internal_link_storage_to_veto_group(&caller, &target, storage)
            .unwrap_or_panic()
    }
}

impl Contract {
    pub fn internal_add_veto_groups(
        &mut self,
        caller: &AccountId,
        veto_groups: Vec<VetoGroupInput>,
    ) -> GovernanceResult<()> {
        let manager = self.permission_manager_resource();
        self.require_permission(caller, &manager, PERMISSION_CREATE)?;

        let mut targets = HashSet::new();
        for input in veto_groups.iter() {
            if self.veto_groups.get(&input.target).is_some() || !targets.insert(&input.target) {
                return Err(GovernanceError::already_exists(format!(
                    "{}: {}",
                    ERR_VETO_GROUP_EXISTS, input.target
                )));
            }
            if let Some(storage) = normalize(&input.linked_storage) {
                self.require_member_storage(&storage)?;
            }
        }

        for input in veto_groups {
            let linked_storage = normalize(&input.linked_storage);
            self.veto_groups.insert(
                &input.target,
                &VetoGroup {
                    name: input.name.clone(),
                    linked_storage: linked_storage.clone(),
                },
            );
            if let Some(storage) = linked_storage.as_ref() {
                self.grant_veto_role(&input.target, storage);
            }
            Event::VetoGroupAdded {
                target: input.target,
                name: input.name,
                linked_storage,
            }
            .emit();
        }
        Ok(())
    }

    pub fn internal_remove_veto_group(
        &mut self,
        caller: &AccountId,
        target: &Resource,
    ) -> GovernanceResult<()> {
        let manager = self.permission_manager_resource();
        self.require_permission(caller, &manager, PERMISSION_DELETE)?;
        let veto_group = self.require_veto_group(target)?;
        if let Some(storage) = veto_group.linked_storage.as_ref() {
            self.revoke_veto_role(target, storage);
        }
        self.roles.remove(&veto_role(target));
        self.veto_groups.remove(target);
        Event::VetoGroupRemoved {
            target: target.clone(),
        }
        .emit();
        Ok(())
    }

    pub fn internal_link_storage_to_veto_group(
        &mut self,
        caller: &AccountId,
        target: &Resource,
        storage: Option<Resource>,
    ) -> GovernanceResult<()> {
        let manager = self.permission_manager_resource();
        self.require_permission(caller, &manager, PERMISSION_UPDATE)?;
        let mut veto_group = self.require_veto_group(target)?;
        let storage = normalize(&storage);
        if let Some(storage) = storage.as_ref() {
            self.require_member_storage(storage)?;
        }

        let previous_storage = veto_group.linked_storage.take();
        if let Some(previous) = previous_storage.as_ref() {
            self.revoke_veto_role(target, previous);
        }
        if let Some(storage) = storage.as_ref() {
            self.grant_veto_role(target, storage);
        }
        veto_group.linked_storage = storage.clone();
        self.veto_groups.insert(target, &veto_group);
        Event::VetoGroupLinked {
            target: target.clone(),
            previous_storage,
            linked_storage: storage,
        }
        .emit();
        Ok(())
    }

    pub(crate) fn require_veto_group(&self, target: &Resource) -> GovernanceResult<VetoGroup> {
        self.veto_groups.get(target).ok_or_else(|| {
            GovernanceError::not_found(format!("{}: {}", ERR_VETO_GROUP_NOT_FOUND, target))
        })
    }

    /// Members of the storage linked to the veto group of `target`, read at call time.
    pub(crate) fn veto_members(&self, target: &Resource) -> Vec<AccountId> {
        self.linked_storage(target)
            .and_then(|storage| self.member_storages.get(&storage))
            .map(|storage| storage.members.to_vec())
            .unwrap_or_default()
    }

    pub(crate) fn veto_members_count(&self, target: &Resource) -> u64 {
        self.linked_storage(target)
            .and_then(|storage| self.member_storages.get(&storage))
            .map(|storage| storage.members.len())
            .unwrap_or(0)
    }

    /// Membership in the linked storage alone is not enough, the implicit role must not be denied.
    pub(crate) fn is_vetoer(&self, target: &Resource, account_id: &AccountId) -> bool {
        let is_member = self
            .linked_storage(target)
            .and_then(|storage| self.member_storages.get(&storage))
            .map(|storage| storage.members.contains(account_id))
            .unwrap_or(false);
        is_member && self.user_has_permission(account_id, target, PERMISSION_VETO)
    }

    fn linked_storage(&self, target: &Resource) -> Option<Resource> {
        self.veto_groups
            .get(target)
            .and_then(|veto_group| veto_group.linked_storage)
    }

    fn grant_veto_role(&mut self, target: &Resource, storage: &Resource) {
        let role = veto_role(target);
        if self.roles.get(&role).is_none() {
            self.add_role_permissions_unchecked(
                &role,
                vec![ResourcePermissions {
                    resource: target.clone(),
                    permissions: vec![PERMISSION_VETO.into()],
                }],
                true,
            );
        }
        self.grant_group_roles_unchecked(&expert_group(storage), &[role]);
    }

    fn revoke_veto_role(&mut self, target: &Resource, storage: &Resource) {
        self.revoke_group_roles_unchecked(&expert_group(storage), &[veto_role(target)]);
    }
}

/// An empty storage name means no link.
fn normalize(storage: &Option<Resource>) -> Option<Resource> {
    storage.clone().filter(|storage| !storage.is_empty())
}
