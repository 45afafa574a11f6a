use std::collections::BTreeSet;

use library::naming::{
    panel_resource, token_holder_group, token_holder_role, MODULE_DIAMOND,
    MODULE_MEMBER_STORAGE, MODULE_PARAMETER_STORAGE, MODULE_PERMISSION_MANAGER, MODULE_VAULT,
    MODULE_VOTING,
};
use library::rbac::{
    ResourcePermissions, RolePermissions, PERMISSION_CREATE_VOTING, PERMISSION_VOTE,
};
use library::storage::ParameterSet;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::{LazyOption, LookupMap, LookupSet, UnorderedMap};
use near_sdk::{env, near_bindgen, AccountId, BorshStorageKey, PanicOnDefault};

use crate::constants::MASTER_ROLE;
use crate::diamond::{FacetCut, FacetCutAction, FacetKind};
use crate::error::{GovernanceResult, UnwrapOrPanic};
use crate::member_storage::MemberStorage;
use crate::proposal::VersionedProposal;
use crate::vault::{Asset, AssetKind, VersionedVaultAccount};
use crate::veto::VetoGroup;
use crate::voting::VotingSituation;
use crate::{GroupName, ProposalId, Resource, RoleName, Selector};

#[derive(BorshStorageKey, BorshSerialize)]
pub enum StorageKeys {
    FacetKinds,
    SelectorFacets,
    FacetSelectors,
    Roles,
    UserRoles,
    UserGroups,
    GroupRoles,
    VetoGroups,
    MemberStorages,
    Parameters,
    AssetKinds,
    VaultAccounts,
    Supply,
    Situations,
    Proposals,
    Voters,
    Vetoers,
}

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Contract {
    /// Name of the governance panel all resources are scoped to.
    pub panel_name: String,
    /// Only account allowed to cut facets.
    pub owner: AccountId,
    /// Deployed facet implementations by address.
    pub facet_kinds: UnorderedMap<AccountId, FacetKind>,
    pub selector_facets: LookupMap<Selector, AccountId>,
    pub facet_selectors: LookupMap<AccountId, Vec<Selector>>,
    /// Facets with at least one selector, in registration order.
    pub facet_order: Vec<AccountId>,
    pub roles: LookupMap<RoleName, RolePermissions>,
    pub user_roles: LookupMap<AccountId, BTreeSet<RoleName>>,
    pub user_groups: LookupMap<AccountId, BTreeSet<GroupName>>,
    pub group_roles: LookupMap<GroupName, BTreeSet<RoleName>>,
    pub veto_groups: UnorderedMap<Resource, VetoGroup>,
    pub member_storages: UnorderedMap<Resource, MemberStorage>,
    pub parameters: LazyOption<ParameterSet>,
    /// Kind each token contract was first seen as.
    pub asset_kinds: LookupMap<AccountId, AssetKind>,
    pub vault_accounts: LookupMap<AccountId, VersionedVaultAccount>,
    /// Sum of voting power per asset.
    pub supply: LookupMap<Asset, u128>,
    pub voting_token: Asset,
    pub situations: LookupMap<String, VotingSituation>,
    /// Situation names in creation order.
    pub situation_names: Vec<String>,
    pub proposal_count: ProposalId,
    pub proposals: LookupMap<ProposalId, VersionedProposal>,
    pub voters: LookupSet<(ProposalId, AccountId)>,
    pub vetoers: LookupSet<(ProposalId, AccountId)>,
}

#[near_bindgen]
impl Contract {
    /// Deploys the built-in facets, registers their selectors and configures the default panel roles.
    /// `owner` receives the master role together with the kernel account itself.
    #[init]
    pub fn new(owner: AccountId, panel_name: String, voting_token: Asset) -> Self {
        let mut contract = Self {
            panel_name,
            owner: owner.clone(),
            facet_kinds: UnorderedMap::new(StorageKeys::FacetKinds),
            selector_facets: LookupMap::new(StorageKeys::SelectorFacets),
            facet_selectors: LookupMap::new(StorageKeys::FacetSelectors),
            facet_order: vec![],
            roles: LookupMap::new(StorageKeys::Roles),
            user_roles: LookupMap::new(StorageKeys::UserRoles),
            user_groups: LookupMap::new(StorageKeys::UserGroups),
            group_roles: LookupMap::new(StorageKeys::GroupRoles),
            veto_groups: UnorderedMap::new(StorageKeys::VetoGroups),
            member_storages: UnorderedMap::new(StorageKeys::MemberStorages),
            parameters: LazyOption::new(StorageKeys::Parameters, Some(&ParameterSet::default())),
            asset_kinds: LookupMap::new(StorageKeys::AssetKinds),
            vault_accounts: LookupMap::new(StorageKeys::VaultAccounts),
            supply: LookupMap::new(StorageKeys::Supply),
            voting_token: voting_token.clone(),
            situations: LookupMap::new(StorageKeys::Situations),
            situation_names: vec![],
            proposal_count: 0,
            proposals: LookupMap::new(StorageKeys::Proposals),
            voters: LookupSet::new(StorageKeys::Voters),
            vetoers: LookupSet::new(StorageKeys::Vetoers),
        };
        contract.init_facets().unwrap_or_panic();
        contract.init_roles(&owner).unwrap_or_panic();
        if let Some(account_id) = voting_token.account_id() {
            contract
                .bind_asset_kind(account_id, voting_token.kind())
                .unwrap_or_panic();
        }
        contract
    }

    /// For dev/testing purposes only
    #[cfg(feature = "testnet")]
    #[private]
    pub fn delete_self(&mut self) -> near_sdk::Promise {
        near_sdk::Promise::new(env::current_account_id()).delete_account(self.owner.clone())
    }
}

impl Contract {
    fn init_facets(&mut self) -> GovernanceResult<()> {
        let kernel = env::current_account_id();
        for kind in FacetKind::all() {
            let address = kind.default_address(&kernel)?;
            self.facet_kinds.insert(&address, &kind);
            self.apply_cut(&FacetCut {
                facet_address: Some(address),
                action: FacetCutAction::Add,
                selectors: kind.selectors().iter().map(|s| s.to_string()).collect(),
            })?;
        }
        Ok(())
    }

    fn init_roles(&mut self, owner: &AccountId) -> GovernanceResult<()> {
        let master = MASTER_ROLE.to_string();
        self.roles.insert(&master, &RolePermissions::master());
        self.grant_roles_unchecked(owner, &[master.clone()]);
        self.grant_roles_unchecked(&env::current_account_id(), &[master]);

        let holder_role = token_holder_role(&self.panel_name);
        let holder_permissions = self.participant_permissions();
        self.roles.insert(&holder_role, &holder_permissions);
        self.grant_group_roles_unchecked(&token_holder_group(&self.panel_name), &[holder_role]);

        let default_storage = self.default_member_storage();
        self.create_member_storage_unchecked(&default_storage)
    }

    /// Allows proposing and voting on every panel resource.
    pub(crate) fn participant_permissions(&self) -> RolePermissions {
        let mut permissions = RolePermissions::default();
        let entries: Vec<ResourcePermissions> = self
            .panel_resources()
            .into_iter()
            .map(|resource| ResourcePermissions {
                resource,
                permissions: vec![PERMISSION_CREATE_VOTING.into(), PERMISSION_VOTE.into()],
            })
            .collect();
        permissions.add(&entries, true);
        permissions
    }

    pub(crate) fn panel_resources(&self) -> Vec<Resource> {
        [
            MODULE_DIAMOND,
            MODULE_PERMISSION_MANAGER,
            MODULE_MEMBER_STORAGE,
            MODULE_PARAMETER_STORAGE,
            MODULE_VAULT,
            MODULE_VOTING,
        ]
        .iter()
        .map(|module| panel_resource(module, &self.panel_name))
        .collect()
    }

    pub fn diamond_resource(&self) -> Resource {
        panel_resource(MODULE_DIAMOND, &self.panel_name)
    }
    pub fn permission_manager_resource(&self) -> Resource {
        panel_resource(MODULE_PERMISSION_MANAGER, &self.panel_name)
    }
    /// Member storage created together with the panel. Experts of restricted votings come from here.
    pub fn default_member_storage(&self) -> Resource {
        panel_resource(MODULE_MEMBER_STORAGE, &self.panel_name)
    }
    pub fn parameter_storage_resource(&self) -> Resource {
        panel_resource(MODULE_PARAMETER_STORAGE, &self.panel_name)
    }
    pub fn vault_resource(&self) -> Resource {
        panel_resource(MODULE_VAULT, &self.panel_name)
    }
    pub fn voting_resource(&self) -> Resource {
        panel_resource(MODULE_VOTING, &self.panel_name)
    }
}
