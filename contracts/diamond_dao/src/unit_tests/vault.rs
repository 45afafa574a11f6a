use library::naming::token_holder_group;

use crate::error::GovernanceError;
use crate::vault::LockInfo;

use super::*;

fn nft() -> Asset {
    Asset::Nft(acc(NFT_ACC))
}

fn lock_info(contract: &Contract, account: &str) -> LockInfo {
    contract.lock_info_of(acc(account), token())
}

#[test]
fn deposits_sum_up_and_join_holder_group() {
    let mut contract = get_contract();
    deposit_all(&mut contract, &[USER_1, USER_2], 500);
    deposit_all(&mut contract, &[USER_1], 250);

    assert_eq!(contract.balance_of(acc(USER_1), token()), U128(750));
    assert_eq!(contract.supply_of(token()), U128(1250));
    assert_eq!(contract.held_tokens_of(acc(USER_1)), vec![token()]);
    assert_eq!(
        contract.get_user_groups(acc(USER_1)),
        vec![token_holder_group(PANEL)]
    );
    assert!(matches!(
        contract.internal_deposit(&acc(USER_1), &token(), 0),
        Err(GovernanceError::InvalidInput(_))
    ));
}

#[test]
fn holder_group_is_left_with_the_last_asset() {
    let mut contract = get_contract();
    let user = acc(USER_1);
    deposit_all(&mut contract, &[USER_1], 300);
    contract.internal_deposit(&user, &Asset::Near, 50).unwrap();
    assert_eq!(contract.held_tokens_of(user.clone()), vec![token(), Asset::Near]);

    set_context(USER_1, T0);
    contract.internal_withdraw(&user, &Asset::Near, 50).unwrap();
    assert_eq!(contract.held_tokens_of(user.clone()), vec![token()]);
    assert_eq!(
        contract.get_user_groups(user.clone()),
        vec![token_holder_group(PANEL)]
    );
    assert_eq!(contract.supply_of(Asset::Near), U128(0));

    contract.internal_withdraw(&user, &token(), 300).unwrap();
    assert!(contract.held_tokens_of(user.clone()).is_empty());
    assert!(contract.get_user_groups(user).is_empty());
}

#[test]
fn locks_merge_and_bound_withdrawals() {
    let mut contract = get_contract();
    let user = acc(USER_1);
    deposit_all(&mut contract, &[USER_1], 1100);

    set_context(USER_1, T0);
    contract
        .internal_lock(&user, &user, &token(), 200, T0 + 100)
        .unwrap();
    set_context(USER_1, T0 + 10);
    contract
        .internal_lock(&user, &user, &token(), 800, T0 + 110)
        .unwrap();
    assert_eq!(
        lock_info(&contract, USER_1),
        LockInfo {
            withdrawable: U128(100),
            locked: U128(1000),
            unlock_time: T0 + 110,
        }
    );

    assert_eq!(
        contract.internal_withdraw(&user, &token(), 101),
        Err(GovernanceError::InvalidState(
            "trying to withdraw more than locked: requested 101, available 100".into()
        ))
    );
    contract.internal_withdraw(&user, &token(), 100).unwrap();
    assert_eq!(contract.balance_of(user.clone(), token()), U128(1000));
    assert_eq!(contract.supply_of(token()), U128(1000));

    // Lock expires exactly at its unlock time.
    set_context(USER_1, T0 + 110);
    assert_eq!(lock_info(&contract, USER_1).withdrawable, U128(1000));
    contract.internal_withdraw(&user, &token(), 1000).unwrap();
    assert!(contract.held_tokens_of(user.clone()).is_empty());
    assert!(contract.get_user_groups(user).is_empty());
    assert_eq!(contract.supply_of(token()), U128(0));
}

#[test]
fn lock_errors() {
    let mut contract = get_contract();
    let user = acc(USER_1);
    deposit_all(&mut contract, &[USER_1], 100);
    set_context(USER_1, T0);

    let cases = vec![
        (token(), 0, T0 + 10, "invalid input: lock amount must be positive"),
        (token(), 10, T0 + DURATION_1Y_S + 1, "invalid input: lock time too big"),
        (token(), 10, T0, "invalid input: unlock time must be in the future"),
        (token(), 101, T0 + 10, "invalid state: not enough tokens to lock"),
        (Asset::Near, 10, T0 + 10, "invalid state: not enough tokens to lock"),
        (Asset::Sbt(acc(SBT_ACC)), 1, T0 + 10, "invalid input: SBT cannot be locked"),
    ];
    for (asset, amount, unlock_time, message) in cases {
        let err = contract
            .internal_lock(&user, &user, &asset, amount, unlock_time)
            .unwrap_err();
        assert_eq!(err.to_string(), message);
    }
    assert_eq!(lock_info(&contract, USER_1).locked, U128(0));
}

#[test]
fn locking_for_others_needs_vault_update() {
    let mut contract = get_contract();
    deposit_all(&mut contract, &[USER_1], 100);
    assert!(matches!(
        contract.internal_lock(&acc(USER_2), &acc(USER_1), &token(), 10, T0 + 10),
        Err(GovernanceError::AccessDenied(_))
    ));
    contract
        .internal_lock(&acc(OWNER_ACC), &acc(USER_1), &token(), 10, T0 + 10)
        .unwrap();
    assert_eq!(lock_info(&contract, USER_1).locked, U128(10));
}

#[test]
fn nft_holdings() {
    let mut contract = get_contract();
    let user = acc(USER_1);
    let collection = acc(NFT_ACC);
    for token_id in ["1", "2"] {
        contract
            .internal_deposit_nft(&user, &collection, &token_id.to_string())
            .unwrap();
    }
    contract
        .internal_deposit_nft(&acc(USER_2), &collection, &"3".to_string())
        .unwrap();
    assert!(matches!(
        contract.internal_deposit_nft(&user, &collection, &"1".to_string()),
        Err(GovernanceError::AlreadyExists(_))
    ));

    assert_eq!(contract.balance_of(user.clone(), nft()), U128(2));
    assert_eq!(contract.voting_power_of(user.clone(), nft()), U128(1));
    assert_eq!(contract.supply_of(nft()), U128(2));
    assert_eq!(contract.owned_nfts_of(user.clone(), collection.clone()), vec!["1", "2"]);

    set_context(USER_1, T0);
    contract
        .internal_lock_nft(&user, &user, &collection, &"1".to_string(), T0 + 100)
        .unwrap();
    assert_eq!(
        contract
            .internal_lock_nft(&user, &user, &collection, &"2".to_string(), T0 + 100)
            .unwrap_err()
            .to_string(),
        "invalid state: another token of the collection is locked"
    );
    assert_eq!(
        contract
            .internal_withdraw_nft(&user, &collection, &"1".to_string())
            .unwrap_err()
            .to_string(),
        "invalid state: trying to withdraw locked NFT"
    );
    assert!(matches!(
        contract.internal_lock(&user, &user, &nft(), 1, T0 + 100),
        Err(GovernanceError::InvalidInput(_))
    ));

    contract
        .internal_withdraw_nft(&user, &collection, &"2".to_string())
        .unwrap();
    assert_eq!(contract.supply_of(nft()), U128(2));

    set_context(USER_1, T0 + 100);
    contract
        .internal_withdraw_nft(&user, &collection, &"1".to_string())
        .unwrap();
    assert_eq!(contract.supply_of(nft()), U128(1));
    assert!(contract.get_user_groups(user).is_empty());
}

#[test]
fn sbt_authorization() {
    let mut contract = get_contract();
    let user = acc(USER_1);
    let sbt = acc(SBT_ACC);
    let asset = Asset::Sbt(sbt.clone());

    assert!(matches!(
        contract.internal_authorize_sbt(&user, &sbt, 2),
        Err(GovernanceError::AccessDenied(_))
    ));
    assert!(matches!(
        contract.internal_authorize_sbt(&user, &sbt, 0),
        Err(GovernanceError::AccessDenied(_))
    ));

    contract.internal_authorize_sbt(&user, &sbt, 1).unwrap();
    contract.internal_authorize_sbt(&user, &sbt, 1).unwrap();
    assert_eq!(contract.supply_of(asset.clone()), U128(1));
    assert_eq!(contract.voting_power_of(user.clone(), asset.clone()), U128(1));
    assert_eq!(
        contract.get_user_groups(user.clone()),
        vec![token_holder_group(PANEL)]
    );

    contract.internal_revoke_sbt(&user, &sbt).unwrap();
    assert_eq!(contract.supply_of(asset), U128(0));
    assert!(matches!(
        contract.internal_revoke_sbt(&user, &sbt),
        Err(GovernanceError::NotFound(_))
    ));
}

#[test]
fn token_contract_keeps_its_first_kind() {
    let mut contract = get_contract();
    assert_eq!(
        contract
            .internal_deposit_nft(&acc(USER_1), &acc(TOKEN_ACC), &"1".to_string())
            .unwrap_err()
            .to_string(),
        format!("invalid input: token not supported: {}", TOKEN_ACC)
    );
    contract
        .internal_deposit_nft(&acc(USER_1), &acc(NFT_ACC), &"1".to_string())
        .unwrap();
    assert!(matches!(
        contract.internal_deposit(&acc(USER_1), &Asset::Ft(acc(NFT_ACC)), 10),
        Err(GovernanceError::InvalidInput(_))
    ));
}

#[test]
fn failed_transfers_are_credited_back() {
    let mut contract = get_contract();
    let user = acc(USER_1);
    deposit_all(&mut contract, &[USER_1], 100);
    contract.internal_withdraw(&user, &token(), 100).unwrap();
    assert!(contract.get_user_groups(user.clone()).is_empty());

    contract.revert_withdraw(&user, &token(), 100, None);
    assert_eq!(contract.balance_of(user.clone(), token()), U128(100));
    assert_eq!(contract.supply_of(token()), U128(100));
    assert_eq!(
        contract.get_user_groups(user.clone()),
        vec![token_holder_group(PANEL)]
    );

    let collection = acc(NFT_ACC);
    contract
        .internal_deposit_nft(&user, &collection, &"7".to_string())
        .unwrap();
    contract
        .internal_withdraw_nft(&user, &collection, &"7".to_string())
        .unwrap();
    contract.revert_withdraw(&user, &nft(), 1, Some("7".to_string()));
    assert_eq!(contract.owned_nfts_of(user, collection), vec!["7"]);
    assert_eq!(contract.supply_of(nft()), U128(1));
}

#[test]
#[should_panic(expected = "transfer message must be empty")]
fn transfer_with_message_is_refused() {
    use near_contract_standards::fungible_token::receiver::FungibleTokenReceiver;

    let mut contract = get_contract();
    set_context(TOKEN_ACC, T0);
    contract.ft_on_transfer(acc(USER_1), U128(10), "stake".into());
}
