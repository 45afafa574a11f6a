//! Explicit selector -> handler table used for routed calls whose arguments arrive as JSON:
//! `register` init calls, the generic `call` entry point and proposal execution.

use library::naming::resource_module;
use library::rbac::ResourcePermissions;
use library::types::Parameter;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::serde_json::{self, json, Map, Value};
use near_sdk::{env, near_bindgen, AccountId};

use crate::core::*;
use crate::diamond::{FacetCut, FacetKind};
use crate::error::*;
use crate::vault::Asset;
use crate::veto::VetoGroupInput;
use crate::voting::VotingValues;
use crate::{GroupName, Resource, RoleName, Selector, TimestampSec, TokenId};

/// Selector with its JSON encoded named arguments.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct FacetCall {
    pub selector: Selector,
    pub args: String,
}

impl FacetCall {
    pub fn new(selector: &str, args: Value) -> Self {
        Self {
            selector: selector.to_string(),
            args: args.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(crate = "near_sdk::serde")]
#[serde(rename_all = "snake_case")]
enum Operation {
    Register {
        cuts: Vec<FacetCut>,
        init: Option<FacetCall>,
    },
    DeployFacet {
        facet: AccountId,
        kind: FacetKind,
    },
    TransferOwnership {
        new_owner: Option<AccountId>,
    },
    GrantRoles {
        account_id: AccountId,
        roles: Vec<RoleName>,
    },
    RevokeRoles {
        account_id: AccountId,
        roles: Vec<RoleName>,
    },
    AddPermissionsToRole {
        role: RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    },
    RemovePermissionsFromRole {
        role: RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    },
    GrantGroupRoles {
        group: GroupName,
        roles: Vec<RoleName>,
    },
    RevokeGroupRoles {
        group: GroupName,
        roles: Vec<RoleName>,
    },
    AddUserToGroups {
        account_id: AccountId,
        groups: Vec<GroupName>,
    },
    RemoveUserFromGroups {
        account_id: AccountId,
        groups: Vec<GroupName>,
    },
    AddVetoGroup {
        target: Resource,
        name: String,
        linked_storage: Option<Resource>,
    },
    AddVetoGroups {
        veto_groups: Vec<VetoGroupInput>,
    },
    RemoveVetoGroup {
        target: Resource,
    },
    LinkStorageToVetoGroup {
        target: Resource,
        storage: Option<Resource>,
    },
    CreateMemberStorage {
        name: String,
    },
    AddMember {
        storage: Resource,
        account_id: AccountId,
    },
    AddMembers {
        storage: Resource,
        account_ids: Vec<AccountId>,
    },
    RemoveMember {
        storage: Resource,
        account_id: AccountId,
    },
    RemoveMembers {
        storage: Resource,
        account_ids: Vec<AccountId>,
    },
    SetParameter {
        parameter: Parameter,
    },
    SetParameters {
        parameters: Vec<Parameter>,
    },
    RemoveParameter {
        name: String,
    },
    RemoveParameters {
        names: Vec<String>,
    },
    Lock {
        account_id: AccountId,
        asset: Asset,
        amount: U128,
        unlock_time: TimestampSec,
    },
    LockNft {
        account_id: AccountId,
        collection: AccountId,
        token_id: TokenId,
        unlock_time: TimestampSec,
    },
    CreateVotingSituation {
        name: String,
        values: VotingValues,
    },
    RemoveVotingSituation {
        name: String,
    },
    ChangeVotingToken {
        token: Asset,
    },
}

impl Operation {
    fn parse(call: &FacetCall) -> GovernanceResult<Self> {
        let args: Value = if call.args.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&call.args)
                .map_err(|e| GovernanceError::external(format!("invalid arguments: {}", e)))?
        };
        let mut tagged = Map::new();
        tagged.insert(call.selector.clone(), args);
        serde_json::from_value(Value::Object(tagged)).map_err(|_| {
            GovernanceError::external(format!("{}: {}", ERR_NOT_DISPATCHABLE, call.selector))
        })
    }

    /// Resource the operation acts on when it is addressed by an argument.
    fn resource(&self) -> Option<&Resource> {
        match self {
            Operation::AddMember { storage, .. }
            | Operation::AddMembers { storage, .. }
            | Operation::RemoveMember { storage, .. }
            | Operation::RemoveMembers { storage, .. } => Some(storage),
            _ => None,
        }
    }
}

#[near_bindgen]
impl Contract {
    /// Routes `selector` with JSON `args` on behalf of the caller.
    pub fn call(&mut self, selector: Selector, args: String) {
        self.assert_routed("call");
        let caller = env::predecessor_account_id();
        self.dispatch(&caller, None, &FacetCall { selector, args })
            .unwrap_or_panic()
    }
}

impl Contract {
    /// Resolves `call` through the router and runs its handler as `caller`.
    /// With a `scope`, the call must belong to the facet serving that resource.
    pub fn dispatch(
        &mut self,
        caller: &AccountId,
        scope: Option<&Resource>,
        call: &FacetCall,
    ) -> GovernanceResult<()> {
        let operation = self.resolve(scope, call)?;
        self.execute_operation(caller, operation)
    }

    /// Checks that `call` could be dispatched within `scope` without running it.
    pub(crate) fn validate_call(&self, scope: &Resource, call: &FacetCall) -> GovernanceResult<()> {
        self.resolve(Some(scope), call).map(|_| ())
    }

    fn resolve(&self, scope: Option<&Resource>, call: &FacetCall) -> GovernanceResult<Operation> {
        let kind = self.route(&call.selector)?;
        let operation = Operation::parse(call)?;

        if let Some(target) = scope {
            let target_kind = resource_module(target).and_then(FacetKind::from_module);
            if target_kind != Some(kind) {
                return Err(GovernanceError::external(ERR_CALL_OUTSIDE_TARGET));
            }
            if matches!(operation.resource(), Some(resource) if resource != target) {
                return Err(GovernanceError::external(ERR_CALL_OUTSIDE_TARGET));
            }
        }
        Ok(operation)
    }

    fn execute_operation(
        &mut self,
        caller: &AccountId,
        operation: Operation,
    ) -> GovernanceResult<()> {
        match operation {
            Operation::Register { cuts, init } => self.internal_register(caller, cuts, init),
            Operation::DeployFacet { facet, kind } => {
                self.internal_deploy_facet(caller, facet, kind)
            }
            Operation::TransferOwnership { new_owner } => {
                self.internal_transfer_ownership(caller, new_owner)
            }
            Operation::GrantRoles { account_id, roles } => {
                self.internal_grant_roles(caller, &account_id, roles)
            }
            Operation::RevokeRoles { account_id, roles } => {
                self.internal_revoke_roles(caller, &account_id, roles)
            }
            Operation::AddPermissionsToRole {
                role,
                permissions,
                allowed,
            } => self.internal_add_permissions_to_role(caller, &role, permissions, allowed),
            Operation::RemovePermissionsFromRole {
                role,
                permissions,
                allowed,
            } => self.internal_remove_permissions_from_role(caller, &role, permissions, allowed),
            Operation::GrantGroupRoles { group, roles } => {
                self.internal_grant_group_roles(caller, &group, roles)
            }
            Operation::RevokeGroupRoles { group, roles } => {
                self.internal_revoke_group_roles(caller, &group, roles)
            }
            Operation::AddUserToGroups { account_id, groups } => {
                self.internal_add_user_to_groups(caller, &account_id, groups)
            }
            Operation::RemoveUserFromGroups { account_id, groups } => {
                self.internal_remove_user_from_groups(caller, &account_id, groups)
            }
            Operation::AddVetoGroup {
                target,
                name,
                linked_storage,
            } => self.internal_add_veto_groups(
                caller,
                vec![VetoGroupInput {
                    target,
                    name,
                    linked_storage,
                }],
            ),
            Operation::AddVetoGroups { veto_groups } => {
                self.internal_add_veto_groups(caller, veto_groups)
            }
            Operation::RemoveVetoGroup { target } => {
                self.internal_remove_veto_group(caller, &target)
            }
            Operation::LinkStorageToVetoGroup { target, storage } => {
                self.internal_link_storage_to_veto_group(caller, &target, storage)
            }
            Operation::CreateMemberStorage { name } => self
                .internal_create_member_storage(caller, &name)
                .map(|_| ()),
            Operation::AddMember {
                storage,
                account_id,
            } => self.internal_add_members(caller, &storage, vec![account_id]),
            Operation::AddMembers {
                storage,
                account_ids,
            } => self.internal_add_members(caller, &storage, account_ids),
            Operation::RemoveMember {
                storage,
                account_id,
            } => self.internal_remove_members(caller, &storage, vec![account_id]),
            Operation::RemoveMembers {
                storage,
                account_ids,
            } => self.internal_remove_members(caller, &storage, account_ids),
            Operation::SetParameter { parameter } => {
                self.internal_set_parameters(caller, vec![parameter])
            }
            Operation::SetParameters { parameters } => {
                self.internal_set_parameters(caller, parameters)
            }
            Operation::RemoveParameter { name } => {
                self.internal_remove_parameters(caller, vec![name])
            }
            Operation::RemoveParameters { names } => {
                self.internal_remove_parameters(caller, names)
            }
            Operation::Lock {
                account_id,
                asset,
                amount,
                unlock_time,
            } => self.internal_lock(caller, &account_id, &asset, amount.0, unlock_time),
            Operation::LockNft {
                account_id,
                collection,
                token_id,
                unlock_time,
            } => self.internal_lock_nft(caller, &account_id, &collection, &token_id, unlock_time),
            Operation::CreateVotingSituation { name, values } => {
                self.internal_create_voting_situation(caller, name, values)
            }
            Operation::RemoveVotingSituation { name } => {
                self.internal_remove_voting_situation(caller, &name)
            }
            Operation::ChangeVotingToken { token } => {
                self.internal_change_voting_token(caller, token)
            }
        }
    }
}
