//! Voting engine. Situations configure how proposals on a target are decided,
//! proposals collect token weighted votes and vetoes and run their call once passed.

use library::fraction::{fraction, PERCENTAGE_100};
use library::rbac::{
    PERMISSION_CREATE, PERMISSION_CREATE_VOTING, PERMISSION_DELETE, PERMISSION_UPDATE,
    PERMISSION_VOTE,
};
use library::voting::{
    derive_status, veto_succeeded, ProposalStatus, Tally, Thresholds, Timing, VotingType,
};
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{env, near_bindgen, AccountId};

use crate::core::*;
use crate::dispatch::FacetCall;
use crate::error::*;
use crate::event::Event;
use crate::proposal::Proposal;
use crate::vault::Asset;
use crate::{current_timestamp_sec, ProposalId, Resource, TimestampSec};

/// Situation configuration as passed in and returned by views.
/// Ratios are fractions of 10^27.
#[derive(Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct VotingValues {
    pub voting_period: TimestampSec,
    pub veto_period: TimestampSec,
    pub proposal_execution_period: TimestampSec,
    pub required_quorum: U128,
    pub required_majority: U128,
    pub required_veto_quorum: U128,
    pub voting_type: VotingType,
    pub voting_target: Resource,
    pub voting_min_amount: U128,
}

#[derive(BorshDeserialize, BorshSerialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct VotingSituation {
    pub voting_period: TimestampSec,
    pub veto_period: TimestampSec,
    pub proposal_execution_period: TimestampSec,
    pub thresholds: Thresholds,
    pub voting_type: VotingType,
    pub voting_target: Resource,
    pub voting_min_amount: u128,
}

impl VotingSituation {
    pub fn from_values(values: VotingValues) -> GovernanceResult<Self> {
        let thresholds = Thresholds {
            quorum: values.required_quorum.0,
            majority: values.required_majority.0,
            veto_quorum: values.required_veto_quorum.0,
        };
        if [thresholds.quorum, thresholds.majority, thresholds.veto_quorum]
            .iter()
            .any(|t| *t > PERCENTAGE_100)
        {
            return Err(GovernanceError::invalid_input(ERR_INVALID_THRESHOLD));
        }
        if values.voting_target.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_TARGET_NOT_PANEL));
        }
        Ok(Self {
            voting_period: values.voting_period,
            veto_period: values.veto_period,
            proposal_execution_period: values.proposal_execution_period,
            thresholds,
            voting_type: values.voting_type,
            voting_target: values.voting_target,
            voting_min_amount: values.voting_min_amount.0,
        })
    }

    pub fn to_values(&self) -> VotingValues {
        VotingValues {
            voting_period: self.voting_period,
            veto_period: self.veto_period,
            proposal_execution_period: self.proposal_execution_period,
            required_quorum: self.thresholds.quorum.into(),
            required_majority: self.thresholds.majority.into(),
            required_veto_quorum: self.thresholds.veto_quorum.into(),
            voting_type: self.voting_type,
            voting_target: self.voting_target.clone(),
            voting_min_amount: self.voting_min_amount.into(),
        }
    }
}

#[near_bindgen]
impl Contract {
    pub fn create_voting_situation(&mut self, name: String, values: VotingValues) {
        self.assert_routed("create_voting_situation");
        let caller = env::predecessor_account_id();
        self.internal_create_voting_situation(&caller, name, values)
            .unwrap_or_panic()
    }

    pub fn remove_voting_situation(&mut self, name: String) {
        self.assert_routed("remove_voting_situation");
        let caller = env::predecessor_account_id();
        self.internal_remove_voting_situation(&caller, &name)
            .unwrap_or_panic()
    }

    /// Opens a proposal in `situation`. Without a `call` it is a general proposal.
    pub fn create_proposal(
        &mut self,
        situation: String,
        remark: String,
        call: Option<FacetCall>,
    ) -> ProposalId {
        self.assert_routed("create_proposal");
        let caller = env::predecessor_account_id();
        self.internal_create_proposal(&caller, &situation, remark, call, current_timestamp_sec())
            .unwrap_or_panic()
    }

    pub fn vote_for(&mut self, id: ProposalId) {
        self.assert_routed("vote_for");
        let caller = env::predecessor_account_id();
        self.internal_vote(&caller, id, true, current_timestamp_sec())
            .unwrap_or_panic()
    }

    pub fn vote_against(&mut self, id: ProposalId) {
        self.assert_routed("vote_against");
        let caller = env::predecessor_account_id();
        self.internal_vote(&caller, id, false, current_timestamp_sec())
            .unwrap_or_panic()
    }

    pub fn veto(&mut self, id: ProposalId) {
        self.assert_routed("veto");
        let caller = env::predecessor_account_id();
        self.internal_veto(&caller, id, current_timestamp_sec())
            .unwrap_or_panic()
    }

    /// Runs the call of a passed proposal as the kernel itself.
    /// A failing call aborts the whole transaction and leaves the proposal passed.
    pub fn execute_proposal(&mut self, id: ProposalId) {
        self.assert_routed("execute_proposal");
        self.internal_execute_proposal(id, current_timestamp_sec())
            .unwrap_or_panic()
    }

    pub fn change_voting_token(&mut self, token: Asset) {
        self.assert_routed("change_voting_token");
        let caller = env::predecessor_account_id();
        self.internal_change_voting_token(&caller, token)
            .unwrap_or_panic()
    }
}

impl Contract {
    pub fn internal_create_voting_situation(
        &mut self,
        caller: &AccountId,
        name: String,
        values: VotingValues,
    ) -> GovernanceResult<()> {
        let resource = self.voting_resource();
        self.require_permission(caller, &resource, PERMISSION_CREATE)?;
        if name.is_empty() {
            return Err(GovernanceError::invalid_input(ERR_EMPTY_NAME));
        }
        if self.situations.get(&name).is_some() {
            return Err(GovernanceError::already_exists(format!(
                "{}: {}",
                ERR_SITUATION_EXISTS, name
            )));
        }
        let situation = VotingSituation::from_values(values)?;
        self.situations.insert(&name, &situation);
        self.situation_names.push(name.clone());
        Event::VotingSituationCreated { name }.emit();
        Ok(())
    }

    pub fn internal_remove_voting_situation(
        &mut self,
        caller: &AccountId,
        name: &String,
    ) -> GovernanceResult<()> {
        let resource = self.voting_resource();
        self.require_permission(caller, &resource, PERMISSION_DELETE)?;
        self.require_situation(name)?;
        self.situations.remove(name);
        self.situation_names.retain(|n| n != name);
        Event::VotingSituationRemoved { name: name.clone() }.emit();
        Ok(())
    }

    pub fn internal_change_voting_token(
        &mut self,
        caller: &AccountId,
        token: Asset,
    ) -> GovernanceResult<()> {
        let resource = self.voting_resource();
        self.require_permission(caller, &resource, PERMISSION_UPDATE)?;
        if let Some(account_id) = token.account_id() {
            self.bind_asset_kind(account_id, token.kind())?;
        }
        self.voting_token = token.clone();
        Event::VotingTokenChanged { token }.emit();
        Ok(())
    }

    pub fn internal_create_proposal(
        &mut self,
        caller: &AccountId,
        situation_name: &String,
        remark: String,
        call: Option<FacetCall>,
        now: TimestampSec,
    ) -> GovernanceResult<ProposalId> {
        let situation = self.require_situation(situation_name)?;
        let target = situation.voting_target.clone();
        self.require_permission(caller, &target, PERMISSION_CREATE_VOTING)?;
        if situation.voting_type.restricts_proposing() && !self.is_expert(caller) {
            return Err(GovernanceError::access_denied(ERR_ONLY_EXPERTS));
        }
        let power = self.vote_weight(caller, situation.voting_type);
        if power < situation.voting_min_amount {
            return Err(GovernanceError::access_denied(ERR_LOW_VOTING_POWER));
        }
        match call.as_ref() {
            None if target != self.voting_resource() => {
                return Err(GovernanceError::invalid_state(ERR_GENERAL_VOTING_TARGET));
            }
            Some(call) => self
                .validate_call(&target, call)
                .map_err(|e| GovernanceError::invalid_input(e.to_string()))?,
            None => {}
        }

        let id = self.proposal_count;
        self.proposal_count += 1;
        let has_veto_members = self.veto_members_count(&target) > 0;
        let proposal = Proposal {
            id,
            situation: situation_name.clone(),
            remark,
            call,
            target: target.clone(),
            proposer: caller.clone(),
            voting_type: situation.voting_type,
            thresholds: situation.thresholds,
            timing: Timing::new(
                now,
                situation.voting_period,
                situation.veto_period,
                situation.proposal_execution_period,
                has_veto_members,
            ),
            voted_for: 0,
            voted_against: 0,
            vetoes_count: 0,
            vetoed: false,
            executed: false,
        };
        self.proposals.insert(&id, &proposal.into());
        Event::ProposalCreated {
            id,
            situation: situation_name.clone(),
            proposer: caller.clone(),
            target,
        }
        .emit();
        Ok(id)
    }

    pub fn internal_vote(
        &mut self,
        caller: &AccountId,
        id: ProposalId,
        approve: bool,
        now: TimestampSec,
    ) -> GovernanceResult<()> {
        let mut proposal = self.require_proposal(id)?;
        self.require_permission(caller, &proposal.target, PERMISSION_VOTE)?;
        if proposal.voting_type.restricts_voting() && !self.is_expert(caller) {
            return Err(GovernanceError::access_denied(ERR_ONLY_EXPERTS));
        }
        if self.proposal_status(&proposal, now) != ProposalStatus::Pending {
            return Err(GovernanceError::invalid_state(ERR_NOT_PENDING));
        }
        let voter = (id, caller.clone());
        if self.voters.contains(&voter) {
            return Err(GovernanceError::access_denied(ERR_ALREADY_VOTED));
        }
        let weight = self.vote_weight(caller, proposal.voting_type);
        if weight == 0 {
            return Err(GovernanceError::access_denied(ERR_LOW_VOTING_POWER));
        }

        if approve {
            proposal.voted_for += weight;
        } else {
            proposal.voted_against += weight;
        }
        self.voters.insert(&voter);
        self.proposals.insert(&id, &proposal.into());
        Event::Voted {
            id,
            account_id: caller.clone(),
            approve,
            weight: weight.into(),
        }
        .emit();
        Ok(())
    }

    pub fn internal_veto(
        &mut self,
        caller: &AccountId,
        id: ProposalId,
        now: TimestampSec,
    ) -> GovernanceResult<()> {
        let mut proposal = self.require_proposal(id)?;
        let vetoer = (id, caller.clone());
        if self.vetoers.contains(&vetoer) {
            return Err(GovernanceError::access_denied(ERR_ALREADY_VETOED));
        }
        if !self.is_vetoer(&proposal.target, caller) {
            return Err(GovernanceError::access_denied(format!(
                "{} is not in the veto group of {}",
                caller, proposal.target
            )));
        }
        if self.proposal_status(&proposal, now) != ProposalStatus::Accepted {
            return Err(GovernanceError::invalid_state(ERR_NOT_ACCEPTED));
        }

        proposal.vetoes_count += 1;
        let veto_quorum = fraction(
            proposal.vetoes_count as u128,
            self.veto_members_count(&proposal.target) as u128,
        );
        if veto_succeeded(veto_quorum, proposal.thresholds.veto_quorum) {
            proposal.vetoed = true;
        }
        self.vetoers.insert(&vetoer);
        self.proposals.insert(&id, &proposal.into());
        Event::Vetoed {
            id,
            account_id: caller.clone(),
        }
        .emit();
        Ok(())
    }

    pub fn internal_execute_proposal(
        &mut self,
        id: ProposalId,
        now: TimestampSec,
    ) -> GovernanceResult<()> {
        let mut proposal = self.require_proposal(id)?;
        if self.proposal_status(&proposal, now) != ProposalStatus::Passed {
            return Err(GovernanceError::invalid_state(ERR_NOT_PASSED));
        }
        if let Some(call) = proposal.call.as_ref() {
            let kernel = env::current_account_id();
            self.dispatch(&kernel, Some(&proposal.target), call)
                .map_err(|e| match e {
                    GovernanceError::ExternalCallFailure(_) => e,
                    _ => GovernanceError::external(e.to_string()),
                })?;
        }
        proposal.executed = true;
        self.proposals.insert(&id, &proposal.into());
        Event::ProposalExecuted { id }.emit();
        Ok(())
    }

    pub(crate) fn require_situation(&self, name: &String) -> GovernanceResult<VotingSituation> {
        self.situations.get(name).ok_or_else(|| {
            GovernanceError::not_found(format!("{}: {}", ERR_SITUATION_NOT_FOUND, name))
        })
    }

    pub(crate) fn require_proposal(&self, id: ProposalId) -> GovernanceResult<Proposal> {
        self.proposals
            .get(&id)
            .map(|proposal| proposal.into())
            .ok_or_else(|| {
                GovernanceError::not_found(format!("{}: {}", ERR_PROPOSAL_NOT_FOUND, id))
            })
    }

    /// Experts of restricted votings weigh one each. Everybody else votes with the
    /// current voting token.
    fn vote_weight(&self, account_id: &AccountId, voting_type: VotingType) -> u128 {
        if voting_type.restricts_voting() {
            self.is_expert(account_id) as u128
        } else {
            self.voting_power(account_id, &self.voting_token)
        }
    }

    pub(crate) fn tally(&self, proposal: &Proposal) -> Tally {
        let restricted = proposal.voting_type.restricts_voting();
        let total_power = if restricted {
            self.experts_count() as u128
        } else {
            self.supply(&self.voting_token)
        };
        Tally {
            voted_for: proposal.voted_for,
            voted_against: proposal.voted_against,
            total_power,
            vetoes: proposal.vetoes_count as u128,
            veto_members: self.veto_members_count(&proposal.target) as u128,
            ends_when_complete: restricted,
        }
    }

    pub(crate) fn proposal_status(&self, proposal: &Proposal, now: TimestampSec) -> ProposalStatus {
        derive_status(
            &self.tally(proposal),
            &proposal.thresholds,
            &proposal.timing,
            proposal.executed,
            proposal.vetoed,
            now,
        )
    }
}
