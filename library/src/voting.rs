//! Proposal status derivation.
//! Status is never stored. It is recomputed from counters, timing and the current time.

use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

use crate::fraction::{fraction, Fraction, PERCENTAGE_100};
use crate::TimestampSec;

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
pub enum VotingType {
    /// Anyone with voting power may propose and vote.
    General,
    /// Only experts propose and vote, one vote each.
    Restricted,
    /// Only experts propose, anyone votes with voting power.
    PartiallyRestricted,
}

impl VotingType {
    pub fn restricts_proposing(&self) -> bool {
        !matches!(self, VotingType::General)
    }

    pub fn restricts_voting(&self) -> bool {
        matches!(self, VotingType::Restricted)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
#[repr(u8)]
pub enum ProposalStatus {
    None = 0,
    Pending = 1,
    Rejected = 2,
    Accepted = 3,
    Passed = 4,
    Executed = 5,
    Expired = 6,
}

/// Required thresholds copied from a situation into each proposal.
#[derive(BorshDeserialize, BorshSerialize, Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct Thresholds {
    pub quorum: Fraction,
    pub majority: Fraction,
    pub veto_quorum: Fraction,
}

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct Timing {
    pub voting_start_time: TimestampSec,
    pub voting_end_time: TimestampSec,
    pub veto_end_time: TimestampSec,
    pub execution_period: TimestampSec,
}

impl Timing {
    /// The veto window only exists when somebody is able to veto.
    pub fn new(
        now: TimestampSec,
        voting_period: TimestampSec,
        veto_period: TimestampSec,
        execution_period: TimestampSec,
        has_veto_members: bool,
    ) -> Self {
        let voting_end_time = now + voting_period;
        let veto_end_time = if has_veto_members {
            voting_end_time + veto_period
        } else {
            voting_end_time
        };
        Self {
            voting_start_time: now,
            voting_end_time,
            veto_end_time,
            execution_period,
        }
    }

    pub fn expiration_time(&self) -> TimestampSec {
        self.veto_end_time + self.execution_period
    }

    pub fn has_veto_window(&self) -> bool {
        self.veto_end_time > self.voting_end_time
    }
}

/// Participation and veto counters with the denominators they are measured against.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct Tally {
    pub voted_for: u128,
    pub voted_against: u128,
    pub total_power: u128,
    pub vetoes: u128,
    pub veto_members: u128,
    /// Voting ends as soon as the whole `total_power` has voted.
    pub ends_when_complete: bool,
}

impl Tally {
    pub fn quorum(&self) -> Fraction {
        fraction(self.voted_for + self.voted_against, self.total_power)
    }

    pub fn majority(&self) -> Fraction {
        match (self.voted_for, self.voted_against) {
            (0, _) => 0,
            (_, 0) => PERCENTAGE_100,
            (voted_for, voted_against) => fraction(voted_for, voted_for + voted_against),
        }
    }

    pub fn veto_quorum(&self) -> Fraction {
        fraction(self.vetoes, self.veto_members)
    }

    pub fn is_complete(&self) -> bool {
        self.total_power > 0 && self.voted_for + self.voted_against >= self.total_power
    }

    fn voting_open(&self, timing: &Timing, now: TimestampSec) -> bool {
        now < timing.voting_end_time && !(self.ends_when_complete && self.is_complete())
    }
}

pub fn meets_quorum(current: Fraction, required: Fraction) -> bool {
    current >= required
}

/// Majority must be strictly above the requirement. Unanimity always meets it.
pub fn meets_majority(current: Fraction, required: Fraction) -> bool {
    current > required || current == PERCENTAGE_100
}

pub fn veto_succeeded(current: Fraction, required: Fraction) -> bool {
    current > required
}

/// `vetoed` is set once, when a veto pushed the veto quorum over its threshold.
/// Later changes of the veto group do not undo it.
pub fn derive_status(
    tally: &Tally,
    thresholds: &Thresholds,
    timing: &Timing,
    executed: bool,
    vetoed: bool,
    now: TimestampSec,
) -> ProposalStatus {
    if executed {
        return ProposalStatus::Executed;
    }
    if tally.voting_open(timing, now) {
        return ProposalStatus::Pending;
    }
    if !meets_quorum(tally.quorum(), thresholds.quorum)
        || !meets_majority(tally.majority(), thresholds.majority)
    {
        return ProposalStatus::Rejected;
    }
    if vetoed {
        return ProposalStatus::Rejected;
    }
    if timing.has_veto_window() && now < timing.veto_end_time {
        return ProposalStatus::Accepted;
    }
    if now > timing.expiration_time() {
        return ProposalStatus::Expired;
    }
    ProposalStatus::Passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fraction::{PERCENTAGE_10, PERCENTAGE_50};

    const T0: TimestampSec = 10_000;

    fn thresholds() -> Thresholds {
        Thresholds {
            quorum: PERCENTAGE_10,
            majority: PERCENTAGE_50,
            veto_quorum: PERCENTAGE_50,
        }
    }

    fn tally(voted_for: u128, voted_against: u128) -> Tally {
        Tally {
            voted_for,
            voted_against,
            total_power: 2000,
            ..Default::default()
        }
    }

    #[test]
    fn timing_without_veto_members_has_no_veto_window() {
        let timing = Timing::new(T0, 60, 60, 60, false);
        assert_eq!(timing.voting_end_time, timing.veto_end_time);
        let timing = Timing::new(T0, 60, 60, 60, true);
        assert_eq!(timing.veto_end_time, T0 + 120);
        assert_eq!(timing.expiration_time(), T0 + 180);
    }

    #[test]
    fn lifecycle_without_veto() {
        let timing = Timing::new(T0, 60, 60, 60, false);
        let votes = tally(1000, 0);
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0),
            ProposalStatus::Pending
        );
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 70),
            ProposalStatus::Passed
        );
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, true, false, T0 + 70),
            ProposalStatus::Executed
        );
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 121),
            ProposalStatus::Expired
        );
    }

    #[test]
    fn veto_window_accepts_then_passes() {
        let timing = Timing::new(T0, 60, 60, 60, true);
        let votes = tally(1000, 0);
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 70),
            ProposalStatus::Accepted
        );
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 120),
            ProposalStatus::Passed
        );
    }

    #[test]
    fn tie_at_required_majority_is_rejected() {
        let timing = Timing::new(T0, 60, 0, 60, false);
        let votes = tally(1000, 1000);
        assert_eq!(votes.majority(), PERCENTAGE_50);
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 60),
            ProposalStatus::Rejected
        );
    }

    #[test]
    fn quorum_boundary_is_inclusive() {
        let timing = Timing::new(T0, 60, 0, 60, false);
        assert_eq!(
            derive_status(&tally(200, 0), &thresholds(), &timing, false, false, T0 + 60),
            ProposalStatus::Passed
        );
        assert_eq!(
            derive_status(&tally(199, 0), &thresholds(), &timing, false, false, T0 + 60),
            ProposalStatus::Rejected
        );
    }

    #[test]
    fn no_votes_is_rejected() {
        let timing = Timing::new(T0, 60, 0, 60, false);
        let votes = tally(0, 0);
        assert_eq!(votes.majority(), 0);
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 60),
            ProposalStatus::Rejected
        );
    }

    #[test]
    fn veto_flag_rejects_for_good() {
        let timing = Timing::new(T0, 60, 60, 60, true);
        let votes = tally(1000, 0);
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 70),
            ProposalStatus::Accepted
        );
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, true, T0 + 70),
            ProposalStatus::Rejected
        );
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, true, T0 + 500),
            ProposalStatus::Rejected
        );
    }

    #[test]
    fn veto_quorum_is_strict() {
        let votes = Tally {
            vetoes: 1,
            veto_members: 2,
            ..Default::default()
        };
        assert!(!veto_succeeded(votes.veto_quorum(), PERCENTAGE_50));
        let votes = Tally {
            vetoes: 2,
            veto_members: 3,
            ..Default::default()
        };
        assert!(veto_succeeded(votes.veto_quorum(), PERCENTAGE_50));
    }

    #[test]
    fn complete_vote_ends_voting_early() {
        let mut votes = Tally {
            voted_for: 2,
            voted_against: 0,
            total_power: 3,
            ends_when_complete: true,
            ..Default::default()
        };
        let timing = Timing::new(T0, 60, 60, 60, false);
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 1),
            ProposalStatus::Pending
        );
        votes.voted_for = 3;
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 1),
            ProposalStatus::Passed
        );

        // A veto window still runs its full length.
        let timing = Timing::new(T0, 60, 60, 60, true);
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 1),
            ProposalStatus::Accepted
        );

        votes.ends_when_complete = false;
        assert_eq!(
            derive_status(&votes, &thresholds(), &timing, false, false, T0 + 1),
            ProposalStatus::Pending
        );
    }

    #[test]
    fn unanimity_meets_full_majority() {
        assert!(meets_majority(PERCENTAGE_100, PERCENTAGE_100));
        assert!(!meets_majority(PERCENTAGE_50, PERCENTAGE_50));
    }
}
