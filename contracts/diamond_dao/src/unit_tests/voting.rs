use library::fraction::{PERCENTAGE_10, PERCENTAGE_100, PERCENTAGE_50};
use library::fraction::U256;
use library::types::{Parameter, ParameterValue};
use library::voting::{ProposalStatus, VotingType};
use near_sdk::serde_json::json;

use crate::dispatch::FacetCall;
use crate::error::GovernanceError;
use crate::veto::VetoGroupInput;
use crate::ProposalId;

use super::*;

const PARAMS: &str = "params";
const GENERAL: &str = "general";

fn set_quorum_call(value: u128) -> FacetCall {
    FacetCall::new(
        "set_parameter",
        json!({ "parameter": Parameter::new("quorum", ParameterValue::Uint256(value.into())) }),
    )
}

/// Two holders of 1000 tokens each and a general situation on the parameter storage.
fn setup() -> Contract {
    let mut contract = get_contract();
    deposit_all(&mut contract, &[USER_1, USER_2], 1000);
    let target = contract.parameter_storage_resource();
    contract
        .internal_create_voting_situation(
            &acc(OWNER_ACC),
            PARAMS.into(),
            voting_values(target, VotingType::General),
        )
        .unwrap();
    contract
}

fn propose(contract: &mut Contract, call: FacetCall) -> ProposalId {
    contract
        .internal_create_proposal(&acc(USER_1), &PARAMS.into(), "".into(), Some(call), T0)
        .unwrap()
}

fn status(contract: &Contract, id: ProposalId, now: TimestampSec) -> ProposalStatus {
    let proposal = contract.require_proposal(id).unwrap();
    contract.proposal_status(&proposal, now)
}

#[test]
fn passed_proposal_is_executed() {
    let mut contract = setup();
    let id = propose(&mut contract, set_quorum_call(42));
    assert_eq!(id, 0);

    contract.internal_vote(&acc(USER_1), id, true, T0 + 10).unwrap();
    assert_eq!(status(&contract, id, T0 + 59), ProposalStatus::Pending);
    assert_eq!(status(&contract, id, T0 + 70), ProposalStatus::Passed);

    set_context(USER_2, T0 + 70);
    let stats = contract.get_proposal_voting_stats(id);
    assert_eq!(stats.current_quorum, U128(PERCENTAGE_50));
    assert_eq!(stats.current_majority, U128(PERCENTAGE_100));

    contract.internal_execute_proposal(id, T0 + 70).unwrap();
    assert_eq!(contract.get_proposal_status(id), ProposalStatus::Executed);
    assert_eq!(
        contract.get_parameter("quorum".into()).as_uint256(),
        Ok(U256::from(42u64))
    );
    assert!(matches!(
        contract.internal_execute_proposal(id, T0 + 71),
        Err(GovernanceError::InvalidState(_))
    ));
}

#[test]
fn tie_is_rejected() {
    let mut contract = setup();
    let id = propose(&mut contract, set_quorum_call(1));
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();
    contract.internal_vote(&acc(USER_2), id, false, T0 + 2).unwrap();
    assert_eq!(status(&contract, id, T0 + 60), ProposalStatus::Rejected);
    assert!(matches!(
        contract.internal_execute_proposal(id, T0 + 60),
        Err(GovernanceError::InvalidState(_))
    ));
}

#[test]
fn vote_checks() {
    let mut contract = setup();
    let id = propose(&mut contract, set_quorum_call(1));
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();

    let cases = vec![
        (USER_1, id, T0 + 2, "access denied: already voted"),
        (USER_2, id, T0 + 60, "invalid state: voting is not pending"),
        (USER_2, 7, T0 + 2, "not found: proposal does not exist: 7"),
    ];
    for (voter, id, now, message) in cases {
        let err = contract
            .internal_vote(&acc(voter), id, false, now)
            .unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    // Experts may vote on every panel resource but hold no tokens here.
    let owner = acc(OWNER_ACC);
    let storage = contract.default_member_storage();
    contract
        .internal_add_members(&owner, &storage, vec![acc(EXPERT_1)])
        .unwrap();
    assert_eq!(
        contract.internal_vote(&acc(EXPERT_1), id, true, T0 + 2),
        Err(GovernanceError::AccessDenied("voting power too low".into()))
    );
    assert!(matches!(
        contract.internal_vote(&acc(USER_3), id, true, T0 + 2),
        Err(GovernanceError::AccessDenied(_))
    ));
}

#[test]
fn vetoes_reject_accepted_proposal() {
    let mut contract = setup();
    let owner = acc(OWNER_ACC);
    let target = contract.parameter_storage_resource();
    let storage = contract.default_member_storage();
    contract
        .internal_add_members(&owner, &storage, vec![acc(EXPERT_1), acc(EXPERT_2), acc(EXPERT_3)])
        .unwrap();
    contract
        .internal_add_veto_groups(
            &owner,
            vec![VetoGroupInput {
                target: target.clone(),
                name: "guardians".into(),
                linked_storage: Some(storage.clone()),
            }],
        )
        .unwrap();

    let id = propose(&mut contract, set_quorum_call(1));
    let proposal = contract.require_proposal(id).unwrap();
    assert_eq!(proposal.timing.veto_end_time, T0 + 120);

    assert!(matches!(
        contract.internal_veto(&acc(EXPERT_1), id, T0 + 1),
        Err(GovernanceError::InvalidState(_))
    ));
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();
    assert_eq!(status(&contract, id, T0 + 70), ProposalStatus::Accepted);

    contract.internal_veto(&acc(EXPERT_1), id, T0 + 70).unwrap();
    assert_eq!(status(&contract, id, T0 + 70), ProposalStatus::Accepted);
    assert_eq!(
        contract.internal_veto(&acc(EXPERT_1), id, T0 + 71),
        Err(GovernanceError::AccessDenied("already vetoed".into()))
    );
    assert!(matches!(
        contract.internal_veto(&acc(USER_1), id, T0 + 71),
        Err(GovernanceError::AccessDenied(_))
    ));

    contract.internal_veto(&acc(EXPERT_2), id, T0 + 72).unwrap();
    assert!(contract.require_proposal(id).unwrap().vetoed);
    assert_eq!(status(&contract, id, T0 + 72), ProposalStatus::Rejected);
    assert_eq!(status(&contract, id, T0 + 200), ProposalStatus::Rejected);
    assert!(matches!(
        contract.internal_veto(&acc(EXPERT_3), id, T0 + 73),
        Err(GovernanceError::InvalidState(_))
    ));

    // Two of five would no longer reach the veto quorum.
    contract
        .internal_add_members(&owner, &storage, vec![acc(USER_2), acc(USER_3)])
        .unwrap();
    assert_eq!(contract.veto_members_count(&target), 5);
    assert_eq!(status(&contract, id, T0 + 74), ProposalStatus::Rejected);
    assert_eq!(status(&contract, id, T0 + 125), ProposalStatus::Rejected);
    assert!(matches!(
        contract.internal_execute_proposal(id, T0 + 125),
        Err(GovernanceError::InvalidState(_))
    ));
}

#[test]
fn single_veto_below_quorum_is_not_sticky() {
    let mut contract = setup();
    let owner = acc(OWNER_ACC);
    let target = contract.parameter_storage_resource();
    let storage = contract.default_member_storage();
    contract
        .internal_add_members(&owner, &storage, vec![acc(EXPERT_1), acc(EXPERT_2), acc(EXPERT_3)])
        .unwrap();
    contract
        .internal_add_veto_groups(
            &owner,
            vec![VetoGroupInput {
                target,
                name: "guardians".into(),
                linked_storage: Some(storage),
            }],
        )
        .unwrap();

    let id = propose(&mut contract, set_quorum_call(7));
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();
    contract.internal_veto(&acc(EXPERT_1), id, T0 + 70).unwrap();
    assert!(!contract.require_proposal(id).unwrap().vetoed);

    assert_eq!(status(&contract, id, T0 + 120), ProposalStatus::Passed);
    contract.internal_execute_proposal(id, T0 + 120).unwrap();
    assert_eq!(contract.get_parameter("quorum".into()).as_uint256(), Ok(U256::from(7u64)));
}

#[test]
fn passed_proposal_expires() {
    let mut contract = setup();
    let id = propose(&mut contract, set_quorum_call(1));
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();

    assert_eq!(status(&contract, id, T0 + 120), ProposalStatus::Passed);
    assert_eq!(status(&contract, id, T0 + 121), ProposalStatus::Expired);
    assert!(matches!(
        contract.internal_execute_proposal(id, T0 + 121),
        Err(GovernanceError::InvalidState(_))
    ));
}

#[test]
fn failed_execution_keeps_proposal_passed() {
    let mut contract = setup();
    let call = FacetCall::new("remove_parameter", json!({ "name": "missing" }));
    let id = propose(&mut contract, call);
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();

    assert!(matches!(
        contract.internal_execute_proposal(id, T0 + 60),
        Err(GovernanceError::ExternalCallFailure(_))
    ));
    let proposal = contract.require_proposal(id).unwrap();
    assert!(!proposal.executed);
    assert_eq!(status(&contract, id, T0 + 60), ProposalStatus::Passed);
}

#[test]
fn proposal_creation_checks() {
    let mut contract = setup();
    let user = acc(USER_1);

    assert_eq!(
        contract.internal_create_proposal(&user, &PARAMS.into(), "".into(), None, T0),
        Err(GovernanceError::InvalidState(
            "general voting must be called on the voting contract".into()
        ))
    );
    let grant = FacetCall::new("grant_roles", json!({ "account_id": USER_1, "roles": ["*"] }));
    assert!(matches!(
        contract.internal_create_proposal(&user, &PARAMS.into(), "".into(), Some(grant), T0),
        Err(GovernanceError::InvalidInput(_))
    ));
    assert!(matches!(
        contract.internal_create_proposal(&user, &"nope".into(), "".into(), None, T0),
        Err(GovernanceError::NotFound(_))
    ));
    // No tokens, so not in the holder group.
    assert!(matches!(
        contract.internal_create_proposal(
            &acc(USER_3),
            &PARAMS.into(),
            "".into(),
            Some(set_quorum_call(1)),
            T0
        ),
        Err(GovernanceError::AccessDenied(_))
    ));
    assert_eq!(contract.get_proposal_count(), 0);
}

#[test]
fn minimum_amount_to_propose() {
    let mut contract = setup();
    deposit_all(&mut contract, &[USER_3], 100);
    let mut values = voting_values(contract.voting_resource(), VotingType::General);
    values.voting_min_amount = U128(500);
    contract
        .internal_create_voting_situation(&acc(OWNER_ACC), "rich".into(), values)
        .unwrap();

    assert_eq!(
        contract.internal_create_proposal(&acc(USER_3), &"rich".into(), "".into(), None, T0),
        Err(GovernanceError::AccessDenied("voting power too low".into()))
    );
    contract
        .internal_create_proposal(&acc(USER_1), &"rich".into(), "".into(), None, T0)
        .unwrap();
}

#[test]
fn restricted_voting_counts_experts() {
    let mut contract = setup();
    let owner = acc(OWNER_ACC);
    let storage = contract.default_member_storage();
    contract
        .internal_add_members(&owner, &storage, vec![acc(EXPERT_1), acc(EXPERT_2), acc(EXPERT_3)])
        .unwrap();
    let target = contract.voting_resource();
    contract
        .internal_create_voting_situation(
            &owner,
            "experts".into(),
            voting_values(target, VotingType::Restricted),
        )
        .unwrap();

    assert_eq!(
        contract.internal_create_proposal(&acc(USER_1), &"experts".into(), "".into(), None, T0),
        Err(GovernanceError::AccessDenied("only experts have access on target".into()))
    );
    let id = contract
        .internal_create_proposal(&acc(EXPERT_1), &"experts".into(), "".into(), None, T0)
        .unwrap();

    assert!(matches!(
        contract.internal_vote(&acc(USER_1), id, true, T0 + 1),
        Err(GovernanceError::AccessDenied(_))
    ));
    contract.internal_vote(&acc(EXPERT_1), id, true, T0 + 1).unwrap();
    contract.internal_vote(&acc(EXPERT_2), id, true, T0 + 2).unwrap();

    let proposal = contract.require_proposal(id).unwrap();
    assert_eq!(proposal.voted_for, 2);
    assert_eq!(status(&contract, id, T0 + 2), ProposalStatus::Pending);
    assert_eq!(status(&contract, id, T0 + 60), ProposalStatus::Passed);
    contract.internal_execute_proposal(id, T0 + 60).unwrap();
}

#[test]
fn restricted_voting_ends_when_all_experts_voted() {
    let mut contract = setup();
    let owner = acc(OWNER_ACC);
    let storage = contract.default_member_storage();
    contract
        .internal_add_members(&owner, &storage, vec![acc(EXPERT_1), acc(EXPERT_2), acc(EXPERT_3)])
        .unwrap();
    let target = contract.voting_resource();
    contract
        .internal_create_voting_situation(
            &owner,
            "experts".into(),
            voting_values(target, VotingType::Restricted),
        )
        .unwrap();
    let id = contract
        .internal_create_proposal(&acc(EXPERT_1), &"experts".into(), "".into(), None, T0)
        .unwrap();

    contract.internal_vote(&acc(EXPERT_1), id, true, T0 + 1).unwrap();
    contract.internal_vote(&acc(EXPERT_2), id, false, T0 + 2).unwrap();
    assert_eq!(status(&contract, id, T0 + 2), ProposalStatus::Pending);
    assert!(matches!(
        contract.internal_execute_proposal(id, T0 + 2),
        Err(GovernanceError::InvalidState(_))
    ));

    contract.internal_vote(&acc(EXPERT_3), id, true, T0 + 3).unwrap();
    assert_eq!(status(&contract, id, T0 + 3), ProposalStatus::Passed);
    contract.internal_execute_proposal(id, T0 + 3).unwrap();
    assert_eq!(contract.get_proposal_status(id), ProposalStatus::Executed);
}

#[test]
fn general_voting_runs_full_period() {
    let mut contract = setup();
    let id = propose(&mut contract, set_quorum_call(1));
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();
    contract.internal_vote(&acc(USER_2), id, true, T0 + 2).unwrap();
    assert_eq!(status(&contract, id, T0 + 3), ProposalStatus::Pending);
    assert_eq!(status(&contract, id, T0 + 60), ProposalStatus::Passed);
}

#[test]
fn situations_lifecycle() {
    let mut contract = setup();
    let owner = acc(OWNER_ACC);
    let target = contract.voting_resource();

    assert!(matches!(
        contract.internal_create_voting_situation(
            &owner,
            PARAMS.into(),
            voting_values(target.clone(), VotingType::General)
        ),
        Err(GovernanceError::AlreadyExists(_))
    ));
    let mut values = voting_values(target.clone(), VotingType::General);
    values.required_quorum = U128(PERCENTAGE_100 + 1);
    assert!(matches!(
        contract.internal_create_voting_situation(&owner, GENERAL.into(), values),
        Err(GovernanceError::InvalidInput(_))
    ));
    assert!(matches!(
        contract.internal_create_voting_situation(
            &acc(USER_1),
            GENERAL.into(),
            voting_values(target.clone(), VotingType::General)
        ),
        Err(GovernanceError::AccessDenied(_))
    ));

    contract
        .internal_create_voting_situation(
            &owner,
            GENERAL.into(),
            voting_values(target.clone(), VotingType::General),
        )
        .unwrap();
    assert_eq!(contract.get_voting_situations(), vec![PARAMS, GENERAL]);
    assert_eq!(
        contract
            .get_voting_situation_info(GENERAL.into())
            .map(|info| info.values),
        Some(voting_values(target, VotingType::General))
    );

    contract
        .internal_remove_voting_situation(&owner, &PARAMS.into())
        .unwrap();
    assert_eq!(contract.get_voting_situations(), vec![GENERAL]);
    assert!(matches!(
        contract.internal_remove_voting_situation(&owner, &PARAMS.into()),
        Err(GovernanceError::NotFound(_))
    ));
}

#[test]
fn proposal_list_is_newest_first() {
    let mut contract = setup();
    let target = contract.voting_resource();
    contract
        .internal_create_voting_situation(
            &acc(OWNER_ACC),
            GENERAL.into(),
            voting_values(target, VotingType::General),
        )
        .unwrap();
    for i in 0..3 {
        contract
            .internal_create_proposal(&acc(USER_1), &GENERAL.into(), format!("#{}", i), None, T0)
            .unwrap();
    }

    let ids = |list: Vec<crate::proposal::ProposalView>| -> Vec<ProposalId> {
        list.into_iter().map(|view| view.id).collect()
    };
    assert_eq!(ids(contract.get_proposal_list(0, 2)), vec![2, 1]);
    assert_eq!(ids(contract.get_proposal_list(2, 5)), vec![0]);
    assert!(contract.get_proposal_list(3, 1).is_empty());
    assert_eq!(contract.get_proposal_count(), 3);
    assert_eq!(contract.get_proposal_status(9), ProposalStatus::None);

    let view = contract.get_proposal(1).unwrap();
    assert_eq!(view.remark, "#1");
    assert_eq!(view.status, ProposalStatus::Pending);
    assert_eq!(view.expiration_time, T0 + 120);
}

#[test]
fn voting_token_change_applies_to_open_proposals() {
    let mut contract = setup();
    let owner = acc(OWNER_ACC);
    let id = propose(&mut contract, set_quorum_call(1));

    let other = Asset::Ft(acc("other.testnet"));
    contract
        .internal_change_voting_token(&owner, other.clone())
        .unwrap();
    assert_eq!(contract.get_voting_token(), other);
    assert!(matches!(
        contract.internal_change_voting_token(&owner, Asset::Nft(acc(TOKEN_ACC))),
        Err(GovernanceError::InvalidInput(_))
    ));

    // Old token balances no longer weigh.
    assert_eq!(
        contract.internal_vote(&acc(USER_1), id, true, T0 + 1),
        Err(GovernanceError::AccessDenied("voting power too low".into()))
    );

    contract.internal_deposit(&acc(USER_1), &other, 500).unwrap();
    contract.internal_deposit(&acc(USER_3), &other, 4500).unwrap();
    contract.internal_vote(&acc(USER_1), id, true, T0 + 1).unwrap();
    assert_eq!(contract.require_proposal(id).unwrap().voted_for, 500);

    set_context(USER_1, T0 + 60);
    let stats = contract.get_proposal_voting_stats(id);
    assert_eq!(stats.current_quorum, U128(PERCENTAGE_10));
    assert_eq!(status(&contract, id, T0 + 60), ProposalStatus::Passed);
}
