use library::rbac::RolePermissions;
use library::types::Parameter;
use library::voting::ProposalStatus;
use near_sdk::json_types::U128;
use near_sdk::serde::Serialize;
use near_sdk::{near_bindgen, AccountId};

use crate::core::*;
use crate::error::*;
use crate::proposal::{ProposalView, VotingStats};
use crate::vault::{Asset, LockInfo};
use crate::veto::VetoGroup;
use crate::voting::VotingValues;
use crate::{current_timestamp_sec, GroupName, ProposalId, Resource, RoleName, TokenId};

#[derive(Serialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct VetoGroupInfo {
    pub target: Resource,
    pub name: String,
    pub linked_storage: Option<Resource>,
    pub members_count: u64,
}

#[derive(Serialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct VotingSituationInfo {
    pub name: String,
    pub values: VotingValues,
}

#[near_bindgen]
impl Contract {
    // Permissions

    /// True if a held role allows `permission` on `resource` and none denies it.
    pub fn has_permission(
        &self,
        account_id: AccountId,
        resource: Resource,
        permission: String,
    ) -> bool {
        self.assert_routed("has_permission");
        self.user_has_permission(&account_id, &resource, &permission)
    }

    /// Directly granted roles. Roles held through groups are not included.
    pub fn get_user_roles(&self, account_id: AccountId) -> Vec<RoleName> {
        self.assert_routed("get_user_roles");
        self.user_roles
            .get(&account_id)
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    pub fn get_user_groups(&self, account_id: AccountId) -> Vec<GroupName> {
        self.assert_routed("get_user_groups");
        self.user_groups
            .get(&account_id)
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    pub fn get_group_roles(&self, group: GroupName) -> Vec<RoleName> {
        self.assert_routed("get_group_roles");
        self.group_roles
            .get(&group)
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    pub fn get_role_permissions(&self, role: RoleName) -> RolePermissions {
        self.assert_routed("get_role_permissions");
        self.roles.get(&role).unwrap_or_default()
    }

    // Veto groups

    pub fn get_veto_group_members(&self, target: Resource) -> Vec<AccountId> {
        self.assert_routed("get_veto_group_members");
        self.require_veto_group(&target).unwrap_or_panic();
        self.veto_members(&target)
    }

    pub fn get_veto_members_count(&self, target: Resource) -> u64 {
        self.assert_routed("get_veto_members_count");
        self.veto_members_count(&target)
    }

    pub fn get_veto_group_info(&self, target: Resource) -> Option<VetoGroupInfo> {
        self.assert_routed("get_veto_group_info");
        self.veto_groups
            .get(&target)
            .map(|VetoGroup { name, linked_storage }| VetoGroupInfo {
                members_count: self.veto_members_count(&target),
                target,
                name,
                linked_storage,
            })
    }

    pub fn is_veto_group_exists(&self, target: Resource) -> bool {
        self.assert_routed("is_veto_group_exists");
        self.veto_groups.get(&target).is_some()
    }

    pub fn get_existing_veto_group_targets(&self) -> Vec<Resource> {
        self.assert_routed("get_existing_veto_group_targets");
        self.veto_groups.keys().collect()
    }

    // Member storages

    pub fn is_member(&self, storage: Resource, account_id: AccountId) -> bool {
        self.assert_routed("is_member");
        self.is_member_of(&storage, &account_id)
    }

    pub fn get_members(&self, storage: Resource) -> Vec<AccountId> {
        self.assert_routed("get_members");
        self.require_member_storage(&storage)
            .unwrap_or_panic()
            .members
            .to_vec()
    }

    pub fn get_members_count(&self, storage: Resource) -> u64 {
        self.assert_routed("get_members_count");
        self.require_member_storage(&storage)
            .unwrap_or_panic()
            .members
            .len()
    }

    // Parameters

    pub fn get_parameter(&self, name: String) -> Parameter {
        self.assert_routed("get_parameter");
        self.require_parameter(&name).unwrap_or_panic()
    }

    /// All parameters in insertion order.
    pub fn get_all_parameters(&self) -> Vec<Parameter> {
        self.assert_routed("get_all_parameters");
        self.parameter_set().values().to_vec()
    }

    // Vault

    pub fn balance_of(&self, account_id: AccountId, asset: Asset) -> U128 {
        self.assert_routed("balance_of");
        self.vault_account(&account_id).balance(&asset).into()
    }

    pub fn voting_power_of(&self, account_id: AccountId, asset: Asset) -> U128 {
        self.assert_routed("voting_power_of");
        self.voting_power(&account_id, &asset).into()
    }

    pub fn lock_info_of(&self, account_id: AccountId, asset: Asset) -> LockInfo {
        self.assert_routed("lock_info_of");
        self.vault_account(&account_id)
            .lock_info(&asset, current_timestamp_sec())
    }

    pub fn owned_nfts_of(&self, account_id: AccountId, collection: AccountId) -> Vec<TokenId> {
        self.assert_routed("owned_nfts_of");
        self.vault_account(&account_id).owned_nfts(&collection)
    }

    pub fn held_tokens_of(&self, account_id: AccountId) -> Vec<Asset> {
        self.assert_routed("held_tokens_of");
        self.vault_account(&account_id).held_tokens()
    }

    /// Sum of the voting power of all accounts for `asset`.
    pub fn supply_of(&self, asset: Asset) -> U128 {
        self.assert_routed("supply_of");
        self.supply(&asset).into()
    }

    // Voting

    pub fn get_voting_token(&self) -> Asset {
        self.assert_routed("get_voting_token");
        self.voting_token.clone()
    }

    pub fn get_proposal(&self, id: ProposalId) -> Option<ProposalView> {
        self.assert_routed("get_proposal");
        self.proposal_view(id)
    }

    /// `None` for unknown proposals.
    pub fn get_proposal_status(&self, id: ProposalId) -> ProposalStatus {
        self.assert_routed("get_proposal_status");
        self.require_proposal(id)
            .map(|proposal| self.proposal_status(&proposal, current_timestamp_sec()))
            .unwrap_or(ProposalStatus::None)
    }

    pub fn get_proposal_voting_stats(&self, id: ProposalId) -> VotingStats {
        self.assert_routed("get_proposal_voting_stats");
        let proposal = self.require_proposal(id).unwrap_or_panic();
        let tally = self.tally(&proposal);
        VotingStats {
            required_quorum: proposal.thresholds.quorum.into(),
            current_quorum: tally.quorum().into(),
            required_majority: proposal.thresholds.majority.into(),
            current_majority: tally.majority().into(),
            required_veto_quorum: proposal.thresholds.veto_quorum.into(),
            current_veto_quorum: tally.veto_quorum().into(),
        }
    }

    /// Newest proposals first, skipping `offset` of them.
    pub fn get_proposal_list(&self, offset: u32, count: u32) -> Vec<ProposalView> {
        self.assert_routed("get_proposal_list");
        (0..self.proposal_count)
            .rev()
            .skip(offset as usize)
            .take(count as usize)
            .filter_map(|id| self.proposal_view(id))
            .collect()
    }

    pub fn get_proposal_count(&self) -> ProposalId {
        self.assert_routed("get_proposal_count");
        self.proposal_count
    }

    /// Situation names in creation order.
    pub fn get_voting_situations(&self) -> Vec<String> {
        self.assert_routed("get_voting_situations");
        self.situation_names.clone()
    }

    pub fn get_voting_situation_info(&self, name: String) -> Option<VotingSituationInfo> {
        self.assert_routed("get_voting_situation_info");
        self.situations
            .get(&name)
            .map(|situation| VotingSituationInfo {
                values: situation.to_values(),
                name,
            })
    }
}

impl Contract {
    fn proposal_view(&self, id: ProposalId) -> Option<ProposalView> {
        self.require_proposal(id).ok().map(|proposal| {
            let status = self.proposal_status(&proposal, current_timestamp_sec());
            ProposalView::new(proposal, status)
        })
    }
}
