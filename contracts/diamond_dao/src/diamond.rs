//! Facet router. Maps selectors to deployed facet implementations sharing the kernel storage.

use std::collections::HashSet;

use library::naming::{
    MODULE_DIAMOND, MODULE_MEMBER_STORAGE, MODULE_PARAMETER_STORAGE, MODULE_PERMISSION_MANAGER,
    MODULE_VAULT, MODULE_VOTING,
};
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{env, near_bindgen, AccountId};

use crate::core::*;
use crate::dispatch::FacetCall;
use crate::error::*;
use crate::event::Event;
use crate::Selector;

const DIAMOND_SELECTORS: &[&str] = &[
    "register",
    "deploy_facet",
    "transfer_ownership",
    "owner",
    "facets",
    "facet_addresses",
    "facet_selectors",
    "facet_address",
    "call",
];

const PERMISSION_MANAGER_SELECTORS: &[&str] = &[
    "grant_roles",
    "revoke_roles",
    "add_permissions_to_role",
    "remove_permissions_from_role",
    "grant_group_roles",
    "revoke_group_roles",
    "add_user_to_groups",
    "remove_user_from_groups",
    "has_permission",
    "get_user_roles",
    "get_user_groups",
    "get_group_roles",
    "get_role_permissions",
    "add_veto_group",
    "add_veto_groups",
    "remove_veto_group",
    "link_storage_to_veto_group",
    "get_veto_group_members",
    "get_veto_members_count",
    "get_veto_group_info",
    "is_veto_group_exists",
    "get_existing_veto_group_targets",
];

const MEMBER_STORAGE_SELECTORS: &[&str] = &[
    "create_member_storage",
    "add_member",
    "add_members",
    "remove_member",
    "remove_members",
    "is_member",
    "get_members",
    "get_members_count",
];

const PARAMETER_STORAGE_SELECTORS: &[&str] = &[
    "set_parameter",
    "set_parameters",
    "remove_parameter",
    "remove_parameters",
    "get_parameter",
    "get_all_parameters",
];

const VAULT_SELECTORS: &[&str] = &[
    "deposit_native",
    "ft_on_transfer",
    "nft_on_transfer",
    "authorize_by_sbt",
    "revoke_sbt_authorization",
    "lock",
    "lock_nft",
    "withdraw_fungible",
    "withdraw_native",
    "withdraw_nft",
    "balance_of",
    "voting_power_of",
    "lock_info_of",
    "owned_nfts_of",
    "held_tokens_of",
    "supply_of",
];

const VOTING_SELECTORS: &[&str] = &[
    "create_voting_situation",
    "remove_voting_situation",
    "create_proposal",
    "vote_for",
    "vote_against",
    "veto",
    "execute_proposal",
    "change_voting_token",
    "get_voting_token",
    "get_proposal",
    "get_proposal_status",
    "get_proposal_voting_stats",
    "get_proposal_list",
    "get_proposal_count",
    "get_voting_situations",
    "get_voting_situation_info",
];

/// Facet implementations compiled into the kernel.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Diamond,
    PermissionManager,
    MemberStorage,
    ParameterStorage,
    Vault,
    Voting,
}

impl FacetKind {
    pub fn all() -> [FacetKind; 6] {
        [
            FacetKind::Diamond,
            FacetKind::PermissionManager,
            FacetKind::MemberStorage,
            FacetKind::ParameterStorage,
            FacetKind::Vault,
            FacetKind::Voting,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FacetKind::Diamond => "diamond",
            FacetKind::PermissionManager => "permission-manager",
            FacetKind::MemberStorage => "member-storage",
            FacetKind::ParameterStorage => "parameter-storage",
            FacetKind::Vault => "vault",
            FacetKind::Voting => "voting",
        }
    }

    /// Module prefix of the resources this facet manages.
    pub fn module(&self) -> &'static str {
        match self {
            FacetKind::Diamond => MODULE_DIAMOND,
            FacetKind::PermissionManager => MODULE_PERMISSION_MANAGER,
            FacetKind::MemberStorage => MODULE_MEMBER_STORAGE,
            FacetKind::ParameterStorage => MODULE_PARAMETER_STORAGE,
            FacetKind::Vault => MODULE_VAULT,
            FacetKind::Voting => MODULE_VOTING,
        }
    }

    pub fn from_module(module: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.module() == module)
    }

    pub fn selectors(&self) -> &'static [&'static str] {
        match self {
            FacetKind::Diamond => DIAMOND_SELECTORS,
            FacetKind::PermissionManager => PERMISSION_MANAGER_SELECTORS,
            FacetKind::MemberStorage => MEMBER_STORAGE_SELECTORS,
            FacetKind::ParameterStorage => PARAMETER_STORAGE_SELECTORS,
            FacetKind::Vault => VAULT_SELECTORS,
            FacetKind::Voting => VOTING_SELECTORS,
        }
    }

    pub fn implements(&self, selector: &str) -> bool {
        self.selectors().contains(&selector)
    }

    /// The router lives at the kernel account. Other facets get a sub-account of it.
    pub fn default_address(&self, kernel: &AccountId) -> GovernanceResult<AccountId> {
        if *self == FacetKind::Diamond {
            return Ok(kernel.clone());
        }
        format!("{}.{}", self.name(), kernel)
            .parse()
            .map_err(|_| GovernanceError::invalid_input(ERR_NOT_A_CONTRACT))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
pub enum FacetCutAction {
    Add,
    Replace,
    Remove,
}

/// `facet_address: None` stands for the zero address.
#[derive(Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct FacetCut {
    pub facet_address: Option<AccountId>,
    pub action: FacetCutAction,
    pub selectors: Vec<Selector>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct Facet {
    pub facet_address: AccountId,
    pub selectors: Vec<Selector>,
}

#[near_bindgen]
impl Contract {
    /// Applies `cuts` in order, then runs the optional `init` call through the router.
    pub fn register(&mut self, cuts: Vec<FacetCut>, init: Option<FacetCall>) {
        let caller = env::predecessor_account_id();
        self.internal_register(&caller, cuts, init).unwrap_or_panic()
    }

    pub fn deploy_facet(&mut self, facet: AccountId, kind: FacetKind) {
        let caller = env::predecessor_account_id();
        self.internal_deploy_facet(&caller, facet, kind)
            .unwrap_or_panic()
    }

    /// `new_owner: None` is the zero address and is rejected.
    pub fn transfer_ownership(&mut self, new_owner: Option<AccountId>) {
        let caller = env::predecessor_account_id();
        self.internal_transfer_ownership(&caller, new_owner)
            .unwrap_or_panic()
    }

    pub fn owner(&self) -> AccountId {
        self.owner.clone()
    }

    pub fn facets(&self) -> Vec<Facet> {
        self.facet_order
            .iter()
            .map(|facet| Facet {
                facet_address: facet.clone(),
                selectors: self.facet_selectors.get(facet).unwrap_or_default(),
            })
            .collect()
    }

    pub fn facet_addresses(&self) -> Vec<AccountId> {
        self.facet_order.clone()
    }

    pub fn facet_selectors(&self, facet: AccountId) -> Vec<Selector> {
        self.facet_selectors.get(&facet).unwrap_or_default()
    }

    pub fn facet_address(&self, selector: Selector) -> Option<AccountId> {
        self.selector_facets.get(&selector)
    }
}

impl Contract {
    pub fn internal_register(
        &mut self,
        caller: &AccountId,
        cuts: Vec<FacetCut>,
        init: Option<FacetCall>,
    ) -> GovernanceResult<()> {
        self.require_owner(caller)?;
        for cut in cuts.iter() {
            self.apply_cut(cut)?;
        }
        Event::DiamondCut { cuts }.emit();

        if let Some(init) = init {
            if init.selector.is_empty() {
                return Err(GovernanceError::invalid_input(ERR_INIT_WITHOUT_CALL));
            }
            self.dispatch(caller, None, &init).map_err(|e| match e {
                GovernanceError::ExternalCallFailure(_) => e,
                _ => GovernanceError::external(e.to_string()),
            })?;
        }
        Ok(())
    }

    pub fn internal_deploy_facet(
        &mut self,
        caller: &AccountId,
        facet: AccountId,
        kind: FacetKind,
    ) -> GovernanceResult<()> {
        self.require_owner(caller)?;
        if self.facet_kinds.get(&facet).is_some() {
            return Err(GovernanceError::already_exists(ERR_FACET_DEPLOYED));
        }
        self.facet_kinds.insert(&facet, &kind);
        Event::FacetDeployed {
            facet,
            kind: kind.name().to_string(),
        }
        .emit();
        Ok(())
    }

    pub fn internal_transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: Option<AccountId>,
    ) -> GovernanceResult<()> {
        self.require_owner(caller)?;
        let new_owner = new_owner.ok_or_else(|| GovernanceError::invalid_input(ERR_ZERO_ADDRESS))?;
        let previous_owner = std::mem::replace(&mut self.owner, new_owner.clone());
        Event::OwnershipTransferred {
            previous_owner,
            new_owner,
        }
        .emit();
        Ok(())
    }

    /// Resolves the facet that serves `selector`.
    pub fn route(&self, selector: &str) -> GovernanceResult<FacetKind> {
        let facet = self
            .selector_facets
            .get(&selector.to_string())
            .ok_or_else(|| GovernanceError::not_found(ERR_SELECTOR_NOT_REGISTERED))?;
        let kind = self
            .facet_kinds
            .get(&facet)
            .ok_or_else(|| GovernanceError::external(ERR_NOT_A_CONTRACT))?;
        if !kind.implements(selector) {
            return Err(GovernanceError::external(ERR_SELECTOR_NOT_IMPLEMENTED));
        }
        Ok(kind)
    }

    pub(crate) fn assert_routed(&self, selector: &str) {
        self.route(selector).unwrap_or_panic();
    }

    /// Validates a whole cut before touching the selector table.
    pub(crate) fn apply_cut(&mut self, cut: &FacetCut) -> GovernanceResult<()> {
        if cut.selectors.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_NO_SELECTORS));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = cut.selectors.iter().find(|s| !seen.insert(*s)) {
            return Err(GovernanceError::already_exists(format!(
                "{}: {}",
                ERR_SELECTOR_EXISTS, duplicate
            )));
        }

        match cut.action {
            FacetCutAction::Add => {
                let facet = self.require_contract(&cut.facet_address)?;
                for selector in cut.selectors.iter() {
                    if self.selector_facets.contains_key(selector) {
                        return Err(GovernanceError::already_exists(format!(
                            "{}: {}",
                            ERR_SELECTOR_EXISTS, selector
                        )));
                    }
                }
                for selector in cut.selectors.iter() {
                    self.attach_selector(&facet, selector);
                }
            }
            FacetCutAction::Replace => {
                let facet = self.require_contract(&cut.facet_address)?;
                let mut owners = Vec::with_capacity(cut.selectors.len());
                for selector in cut.selectors.iter() {
                    let current = self.require_mutable_selector(selector)?;
                    if current == facet {
                        return Err(GovernanceError::already_exists(format!(
                            "{}: {}",
                            ERR_SELECTOR_SAME_FACET, selector
                        )));
                    }
                    owners.push(current);
                }
                for (selector, current) in cut.selectors.iter().zip(owners) {
                    self.detach_selector(&current, selector);
                    self.attach_selector(&facet, selector);
                }
            }
            FacetCutAction::Remove => {
                let mut owners = Vec::with_capacity(cut.selectors.len());
                for selector in cut.selectors.iter() {
                    let current = self.require_mutable_selector(selector)?;
                    if matches!(&cut.facet_address, Some(facet) if *facet != current) {
                        return Err(GovernanceError::invalid_input(format!(
                            "{}: {}",
                            ERR_SELECTOR_OTHER_FACET, selector
                        )));
                    }
                    owners.push(current);
                }
                for (selector, current) in cut.selectors.iter().zip(owners) {
                    self.detach_selector(&current, selector);
                }
            }
        }
        Ok(())
    }

    fn require_owner(&self, caller: &AccountId) -> GovernanceResult<()> {
        if *caller != self.owner {
            return Err(GovernanceError::access_denied(ERR_NOT_OWNER));
        }
        Ok(())
    }

    fn require_contract(&self, facet: &Option<AccountId>) -> GovernanceResult<AccountId> {
        match facet {
            Some(facet) if self.facet_kinds.get(facet).is_some() => Ok(facet.clone()),
            _ => Err(GovernanceError::invalid_input(ERR_NOT_A_CONTRACT)),
        }
    }

    /// Returns the current owner of `selector` unless it is missing or belongs to the router.
    fn require_mutable_selector(&self, selector: &Selector) -> GovernanceResult<AccountId> {
        let current = self.selector_facets.get(selector).ok_or_else(|| {
            GovernanceError::not_found(format!("{}: {}", ERR_SELECTOR_NOT_REGISTERED, selector))
        })?;
        if current == env::current_account_id() {
            return Err(GovernanceError::invalid_state(format!(
                "{}: {}",
                ERR_IMMUTABLE, selector
            )));
        }
        Ok(current)
    }

    fn attach_selector(&mut self, facet: &AccountId, selector: &Selector) {
        self.selector_facets.insert(selector, facet);
        let mut selectors = self.facet_selectors.get(facet).unwrap_or_default();
        selectors.push(selector.clone());
        self.facet_selectors.insert(facet, &selectors);
        if !self.facet_order.contains(facet) {
            self.facet_order.push(facet.clone());
        }
    }

    fn detach_selector(&mut self, facet: &AccountId, selector: &Selector) {
        self.selector_facets.remove(selector);
        let mut selectors = self.facet_selectors.get(facet).unwrap_or_default();
        selectors.retain(|s| s != selector);
        if selectors.is_empty() {
            self.facet_selectors.remove(facet);
            self.facet_order.retain(|f| f != facet);
        } else {
            self.facet_selectors.insert(facet, &selectors);
        }
    }
}
