use library::voting::{ProposalStatus, Thresholds, Timing, VotingType};
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::Serialize;
use near_sdk::AccountId;

use crate::dispatch::FacetCall;
use crate::{derive_from_versioned, derive_into_versioned, ProposalId, Resource, TimestampSec};

derive_into_versioned!(Proposal, VersionedProposal);
derive_from_versioned!(VersionedProposal, Proposal);

#[derive(BorshDeserialize, BorshSerialize)]
pub enum VersionedProposal {
    Current(Proposal),
}

#[derive(BorshDeserialize, BorshSerialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct Proposal {
    pub id: ProposalId,
    /// Name of the voting situation the proposal was created in.
    pub situation: String,
    pub remark: String,
    /// Executed through the router on success. `None` for general proposals.
    pub call: Option<FacetCall>,
    pub target: Resource,
    pub proposer: AccountId,
    pub voting_type: VotingType,
    pub thresholds: Thresholds,
    pub timing: Timing,
    pub voted_for: u128,
    pub voted_against: u128,
    pub vetoes_count: u64,
    /// Set once the veto quorum was exceeded.
    pub vetoed: bool,
    pub executed: bool,
}

#[derive(Serialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct ProposalView {
    pub id: ProposalId,
    pub situation: String,
    pub remark: String,
    pub call: Option<FacetCall>,
    pub target: Resource,
    pub proposer: AccountId,
    pub voting_type: VotingType,
    pub voting_start_time: TimestampSec,
    pub voting_end_time: TimestampSec,
    pub veto_end_time: TimestampSec,
    pub expiration_time: TimestampSec,
    pub voted_for: U128,
    pub voted_against: U128,
    pub vetoes_count: u64,
    pub vetoed: bool,
    pub executed: bool,
    pub status: ProposalStatus,
}

impl ProposalView {
    pub fn new(proposal: Proposal, status: ProposalStatus) -> Self {
        Self {
            id: proposal.id,
            situation: proposal.situation,
            remark: proposal.remark,
            call: proposal.call,
            target: proposal.target,
            proposer: proposal.proposer,
            voting_type: proposal.voting_type,
            voting_start_time: proposal.timing.voting_start_time,
            voting_end_time: proposal.timing.voting_end_time,
            veto_end_time: proposal.timing.veto_end_time,
            expiration_time: proposal.timing.expiration_time(),
            voted_for: proposal.voted_for.into(),
            voted_against: proposal.voted_against.into(),
            vetoes_count: proposal.vetoes_count,
            vetoed: proposal.vetoed,
            executed: proposal.executed,
            status,
        }
    }
}

/// Required and current ratios of a proposal as fractions of 10^27.
#[derive(Serialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct VotingStats {
    pub required_quorum: U128,
    pub current_quorum: U128,
    pub required_majority: U128,
    pub current_majority: U128,
    pub required_veto_quorum: U128,
    pub current_veto_quorum: U128,
}
