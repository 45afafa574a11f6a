use near_sdk::json_types::U128;
use near_sdk::{env, ext_contract, near_bindgen, serde_json, AccountId, PromiseResult};

use crate::core::*;
use crate::error::*;
use crate::vault::Asset;
use crate::TokenId;

#[ext_contract(ext_self)]
trait ExtSelf {
    fn on_withdraw(account_id: AccountId, asset: Asset, amount: U128, token_id: Option<TokenId>);
    fn on_sbt_supply(account_id: AccountId, sbt: AccountId);
}

/// Soulbound token contracts expose the NEP-181 enumeration view.
#[ext_contract(ext_sbt)]
trait ExtSbt {
    fn nft_supply_for_owner(account_id: AccountId) -> U128;
}

#[near_bindgen]
impl Contract {
    /// Private callback of a withdrawal transfer.
    /// The vault was debited before the transfer, so a failed transfer is credited back.
    #[private]
    pub fn on_withdraw(
        &mut self,
        account_id: AccountId,
        asset: Asset,
        amount: U128,
        token_id: Option<TokenId>,
    ) {
        assert_eq!(
            env::promise_results_count(),
            1,
            "{}",
            ERR_PROMISE_INVALID_RESULTS_COUNT
        );
        match env::promise_result(0) {
            PromiseResult::NotReady => unreachable!(),
            PromiseResult::Successful(_) => {}
            PromiseResult::Failed => self.revert_withdraw(&account_id, &asset, amount.0, token_id),
        }
    }

    /// Private callback of `authorize_by_sbt`.
    #[private]
    pub fn on_sbt_supply(&mut self, account_id: AccountId, sbt: AccountId) {
        assert_eq!(
            env::promise_results_count(),
            1,
            "{}",
            ERR_PROMISE_INVALID_RESULTS_COUNT
        );
        let held = match env::promise_result(0) {
            PromiseResult::NotReady => unreachable!(),
            PromiseResult::Successful(value) => serde_json::from_slice::<U128>(&value)
                .map(|supply| supply.0)
                .map_err(|_| GovernanceError::external(ERR_SBT_NOT_HELD)),
            PromiseResult::Failed => Err(GovernanceError::external(ERR_SBT_NOT_HELD)),
        };
        held.and_then(|held| self.internal_authorize_sbt(&account_id, &sbt, held))
            .unwrap_or_panic()
    }
}
