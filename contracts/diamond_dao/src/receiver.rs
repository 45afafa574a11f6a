use near_contract_standards::fungible_token::receiver::FungibleTokenReceiver;
use near_contract_standards::non_fungible_token::core::NonFungibleTokenReceiver;
use near_sdk::json_types::U128;
use near_sdk::{env, near_bindgen, AccountId, PromiseOrValue};

use crate::core::*;
use crate::error::*;
use crate::vault::Asset;

#[near_bindgen]
impl FungibleTokenReceiver for Contract {
    /// Credits the whole transfer to `sender_id`. A failing deposit is refunded by the token contract.
    fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> PromiseOrValue<U128> {
        self.assert_routed("ft_on_transfer");
        if !msg.is_empty() {
            env::panic_str(&GovernanceError::invalid_input(ERR_UNSUPPORTED_MSG).to_string());
        }
        let asset = Asset::Ft(env::predecessor_account_id());
        self.internal_deposit(&sender_id, &asset, amount.0)
            .unwrap_or_panic();
        PromiseOrValue::Value(U128(0))
    }
}

#[near_bindgen]
impl NonFungibleTokenReceiver for Contract {
    /// Keeps the token on behalf of its previous owner.
    #[allow(unused_variables)]
    fn nft_on_transfer(
        &mut self,
        sender_id: AccountId,
        previous_owner_id: AccountId,
        token_id: near_contract_standards::non_fungible_token::TokenId,
        msg: String,
    ) -> PromiseOrValue<bool> {
        self.assert_routed("nft_on_transfer");
        if !msg.is_empty() {
            env::panic_str(&GovernanceError::invalid_input(ERR_UNSUPPORTED_MSG).to_string());
        }
        let collection = env::predecessor_account_id();
        self.internal_deposit_nft(&previous_owner_id, &collection, &token_id)
            .unwrap_or_panic();
        PromiseOrValue::Value(false)
    }
}
