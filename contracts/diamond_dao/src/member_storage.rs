//! Named member storages. Each storage mirrors its members into an expert group,
//! so roles granted to that group follow membership changes.

use std::collections::HashSet;

use library::naming::{expert_group, expert_role, panel_resource, MODULE_MEMBER_STORAGE};
use library::rbac::{PERMISSION_CREATE, PERMISSION_DELETE, PERMISSION_UPDATE};
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::UnorderedSet;
use near_sdk::{env, near_bindgen, AccountId};

use crate::append;
use crate::constants::MEMBER_STORAGE_PREFIX;
use crate::core::*;
use crate::error::*;
use crate::event::Event;
use crate::Resource;

#[derive(BorshDeserialize, BorshSerialize)]
pub struct MemberStorage {
    pub members: UnorderedSet<AccountId>,
}

impl MemberStorage {
    pub fn new(resource: &Resource) -> Self {
        Self {
            members: UnorderedSet::new(append(
                MEMBER_STORAGE_PREFIX,
                &env::sha256(resource.as_bytes()),
            )),
        }
    }
}

#[near_bindgen]
impl Contract {
    /// Returns the resource of the new storage.
    pub fn create_member_storage(&mut self, name: String) -> Resource {
        self.assert_routed("create_member_storage");
        let caller = env::predecessor_account_id();
        self.internal_create_member_storage(&caller, &name)
            .unwrap_or_panic()
    }

    pub fn add_member(&mut self, storage: Resource, account_id: AccountId) {
        self.assert_routed("add_member");
        let caller = env::predecessor_account_id();
        self.internal_add_members(&caller, &storage, vec![account_id])
            .unwrap_or_panic()
    }

    pub fn add_members(&mut self, storage: Resource, account_ids: Vec<AccountId>) {
        self.assert_routed("add_members");
        let caller = env::predecessor_account_id();
        self.internal_add_members(&caller, &storage, account_ids)
            .unwrap_or_panic()
    }

    pub fn remove_member(&mut self, storage: Resource, account_id: AccountId) {
        self.assert_routed("remove_member");
        let caller = env::predecessor_account_id();
        self.internal_remove_members(&caller, &storage, vec![account_id])
            .unwrap_or_panic()
    }

    pub fn remove_members(&mut self, storage: Resource, account_ids: Vec<AccountId>) {
        self.assert_routed("remove_members");
        let caller = env::predecessor_account_id();
        self.internal_remove_members(&caller, &storage, account_ids)
            .unwrap_or_panic()
    }
}

impl Contract {
    pub fn internal_create_member_storage(
        &mut self,
        caller: &AccountId,
        name: &str,
    ) -> GovernanceResult<Resource> {
        let manager = self.permission_manager_resource();
        self.require_permission(caller, &manager, PERMISSION_CREATE)?;
        if name.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_NAME));
        }
        let resource = panel_resource(MODULE_MEMBER_STORAGE, name);
        self.create_member_storage_unchecked(&resource)?;
        Ok(resource)
    }

    /// Creates the storage together with its expert group and role.
    pub(crate) fn create_member_storage_unchecked(
        &mut self,
        resource: &Resource,
    ) -> GovernanceResult<()> {
        if self.member_storages.get(resource).is_some() {
            return Err(GovernanceError::already_exists(format!(
                "{}: {}",
                ERR_MEMBER_STORAGE_EXISTS, resource
            )));
        }
        self.member_storages
            .insert(resource, &MemberStorage::new(resource));

        let role = expert_role(resource);
        let permissions = self.participant_permissions();
        self.roles.insert(&role, &permissions);
        self.grant_group_roles_unchecked(&expert_group(resource), &[role]);

        Event::MemberStorageCreated {
            storage: resource.clone(),
        }
        .emit();
        Ok(())
    }

    pub fn internal_add_members(
        &mut self,
        caller: &AccountId,
        storage: &Resource,
        account_ids: Vec<AccountId>,
    ) -> GovernanceResult<()> {
        self.require_permission(caller, storage, PERMISSION_UPDATE)?;
        let mut member_storage = self.require_member_storage(storage)?;
        if account_ids.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_MEMBERS));
        }
        let mut batch = HashSet::new();
        for account_id in account_ids.iter() {
            if member_storage.members.contains(account_id) || !batch.insert(account_id) {
                return Err(GovernanceError::already_exists(format!(
                    "{}: {}",
                    ERR_MEMBER_EXISTS, account_id
                )));
            }
        }

        let group = expert_group(storage);
        for account_id in account_ids.iter() {
            member_storage.members.insert(account_id);
            self.add_user_to_groups_unchecked(account_id, &[group.clone()]);
        }
        self.member_storages.insert(storage, &member_storage);
        Event::MembersAdded {
            storage: storage.clone(),
            members: account_ids,
        }
        .emit();
        Ok(())
    }

    pub fn internal_remove_members(
        &mut self,
        caller: &AccountId,
        storage: &Resource,
        account_ids: Vec<AccountId>,
    ) -> GovernanceResult<()> {
        self.require_permission(caller, storage, PERMISSION_DELETE)?;
        let mut member_storage = self.require_member_storage(storage)?;
        if account_ids.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_MEMBERS));
        }
        let mut batch = HashSet::new();
        for account_id in account_ids.iter() {
            if !member_storage.members.contains(account_id) || !batch.insert(account_id) {
                return Err(GovernanceError::not_found(format!(
                    "{}: {}",
                    ERR_MEMBER_NOT_FOUND, account_id
                )));
            }
        }

        let group = expert_group(storage);
        for account_id in account_ids.iter() {
            member_storage.members.remove(account_id);
            self.remove_user_from_groups_unchecked(account_id, &[group.clone()]);
        }
        self.member_storages.insert(storage, &member_storage);
        Event::MembersRemoved {
            storage: storage.clone(),
            members: account_ids,
        }
        .emit();
        Ok(())
    }

    pub(crate) fn require_member_storage(
        &self,
        storage: &Resource,
    ) -> GovernanceResult<MemberStorage> {
        self.member_storages.get(storage).ok_or_else(|| {
            GovernanceError::not_found(format!("{}: {}", ERR_MEMBER_STORAGE_NOT_FOUND, storage))
        })
    }

    pub(crate) fn is_member_of(&self, storage: &Resource, account_id: &AccountId) -> bool {
        self.member_storages
            .get(storage)
            .map(|storage| storage.members.contains(account_id))
            .unwrap_or(false)
    }

    /// Experts of restricted votings come from the default member storage.
    pub(crate) fn is_expert(&self, account_id: &AccountId) -> bool {
        self.is_member_of(&self.default_member_storage(), account_id)
    }

    pub(crate) fn experts_count(&self) -> u64 {
        self.member_storages
            .get(&self.default_member_storage())
            .map(|storage| storage.members.len())
            .unwrap_or(0)
    }
}
