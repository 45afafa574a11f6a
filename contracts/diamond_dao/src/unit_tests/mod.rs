#![allow(unused, dead_code)]
#![cfg(test)]

use library::fraction::{PERCENTAGE_10, PERCENTAGE_50};
use library::voting::VotingType;
use near_sdk::json_types::U128;
use near_sdk::test_utils::VMContextBuilder;
use near_sdk::{testing_env, AccountId};

use crate::core::Contract;
use crate::vault::Asset;
use crate::voting::VotingValues;
use crate::{Resource, TimestampSec};

mod diamond;
mod members;
mod parameters;
mod permissions;
mod vault;
mod veto;
mod voting;

const KERNEL_ACC: &str = "dao.testnet";
const OWNER_ACC: &str = "owner.testnet";
const TOKEN_ACC: &str = "token.testnet";
const NFT_ACC: &str = "nft.testnet";
const SBT_ACC: &str = "sbt.testnet";
const PANEL: &str = "panel";

const USER_1: &str = "user_1.testnet";
const USER_2: &str = "user_2.testnet";
const USER_3: &str = "user_3.testnet";
const EXPERT_1: &str = "expert_1.testnet";
const EXPERT_2: &str = "expert_2.testnet";
const EXPERT_3: &str = "expert_3.testnet";

/// Seconds since epoch every test starts at.
const T0: TimestampSec = 1_000_000;
const DURATION_1Y_S: TimestampSec = 31_536_000;

pub(crate) fn acc(name: &str) -> AccountId {
    name.parse().unwrap()
}

pub(crate) fn get_context_builder() -> VMContextBuilder {
    let mut builder = VMContextBuilder::new();
    builder
        .block_timestamp(T0 * 10u64.pow(9))
        .signer_account_id(acc(OWNER_ACC))
        .predecessor_account_id(acc(OWNER_ACC))
        .current_account_id(acc(KERNEL_ACC))
        .account_balance(10u128.pow(24));
    builder
}

/// Switches the caller and the clock. Storage is kept.
pub(crate) fn set_context(predecessor: &str, now: TimestampSec) {
    testing_env!(get_context_builder()
        .predecessor_account_id(acc(predecessor))
        .signer_account_id(acc(predecessor))
        .block_timestamp(now * 10u64.pow(9))
        .build());
}

pub(crate) fn get_contract() -> Contract {
    testing_env!(get_context_builder().build());
    Contract::new(acc(OWNER_ACC), PANEL.into(), Asset::Ft(acc(TOKEN_ACC)))
}

pub(crate) fn token() -> Asset {
    Asset::Ft(acc(TOKEN_ACC))
}

/// Deposits `amount` of the voting token for every account.
pub(crate) fn deposit_all(contract: &mut Contract, accounts: &[&str], amount: u128) {
    for account in accounts {
        contract
            .internal_deposit(&acc(account), &token(), amount)
            .unwrap();
    }
}

/// One minute voting and veto windows, 10 % quorum, strictly more than 50 % majority.
pub(crate) fn voting_values(target: Resource, voting_type: VotingType) -> VotingValues {
    VotingValues {
        voting_period: 60,
        veto_period: 60,
        proposal_execution_period: 60,
        required_quorum: U128(PERCENTAGE_10),
        required_majority: U128(PERCENTAGE_50),
        required_veto_quorum: U128(PERCENTAGE_50),
        voting_type,
        voting_target: target,
        voting_min_amount: U128(0),
    }
}
