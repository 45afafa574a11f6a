//! Multi-asset vault. Holds deposited NEAR, fungible tokens and NFTs per account,
//! tracks SBT authorizations and keeps the panel's token-holder group in sync.

use library::error::LockError;
use library::locking::{NftLock, TimeLock};
use library::naming::token_holder_group;
use library::rbac::PERMISSION_UPDATE;
use library::TimestampSec;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::serde_json::json;
use near_sdk::{env, near_bindgen, AccountId, Promise};

use crate::callbacks::{ext_sbt, ext_self};
use crate::constants::{GAS_CALLBACK, GAS_SBT_SUPPLY, GAS_TRANSFER, ONE_YOCTO};
use crate::core::*;
use crate::error::*;
use crate::event::Event;
use crate::{current_timestamp_sec, derive_from_versioned, derive_into_versioned, TokenId};

#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord,
)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Near,
    Ft(AccountId),
    Nft(AccountId),
    Sbt(AccountId),
}

impl Asset {
    pub fn account_id(&self) -> Option<&AccountId> {
        match self {
            Asset::Near => None,
            Asset::Ft(account_id) | Asset::Nft(account_id) | Asset::Sbt(account_id) => {
                Some(account_id)
            }
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Near => AssetKind::Near,
            Asset::Ft(_) => AssetKind::Ft,
            Asset::Nft(_) => AssetKind::Nft,
            Asset::Sbt(_) => AssetKind::Sbt,
        }
    }

    pub fn is_fungible(&self) -> bool {
        matches!(self, Asset::Near | Asset::Ft(_))
    }
}

#[derive(BorshDeserialize, BorshSerialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Near,
    Ft,
    Nft,
    Sbt,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct LockInfo {
    pub withdrawable: U128,
    pub locked: U128,
    pub unlock_time: TimestampSec,
}

#[derive(BorshDeserialize, BorshSerialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct FungibleHolding {
    pub asset: Asset,
    pub balance: u128,
    pub lock: TimeLock,
}

#[derive(BorshDeserialize, BorshSerialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct NftHolding {
    pub collection: AccountId,
    pub token_ids: Vec<TokenId>,
    pub lock: Option<NftLock>,
}

derive_into_versioned!(VaultAccount, VersionedVaultAccount);
derive_from_versioned!(VersionedVaultAccount, VaultAccount);

#[derive(BorshDeserialize, BorshSerialize)]
pub enum VersionedVaultAccount {
    Current(VaultAccount),
}

/// Everything one account keeps in the vault.
#[derive(BorshDeserialize, BorshSerialize, Clone, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct VaultAccount {
    fungibles: Vec<FungibleHolding>,
    nfts: Vec<NftHolding>,
    sbts: Vec<AccountId>,
}

impl VaultAccount {
    pub fn is_empty(&self) -> bool {
        self.fungibles.is_empty() && self.nfts.is_empty() && self.sbts.is_empty()
    }

    pub fn balance(&self, asset: &Asset) -> u128 {
        match asset {
            Asset::Near | Asset::Ft(_) => self.fungible(asset).map(|h| h.balance).unwrap_or(0),
            Asset::Nft(collection) => self
                .nft(collection)
                .map(|h| h.token_ids.len() as u128)
                .unwrap_or(0),
            Asset::Sbt(sbt) => self.is_authorized(sbt) as u128,
        }
    }

    /// NFTs count once per collection regardless of how many are held.
    pub fn voting_power(&self, asset: &Asset) -> u128 {
        match asset {
            Asset::Nft(_) => self.balance(asset).min(1),
            _ => self.balance(asset),
        }
    }

    pub fn lock_info(&self, asset: &Asset, now: TimestampSec) -> LockInfo {
        let balance = self.balance(asset);
        let (locked, unlock_time) = match asset {
            Asset::Near | Asset::Ft(_) => self
                .fungible(asset)
                .filter(|h| h.lock.is_active(now))
                .map(|h| (h.lock.amount, h.lock.unlock_time))
                .unwrap_or_default(),
            Asset::Nft(collection) => self
                .nft(collection)
                .and_then(|h| h.lock.as_ref())
                .filter(|lock| lock.is_active(now))
                .map(|lock| (1, lock.unlock_time))
                .unwrap_or_default(),
            Asset::Sbt(_) => (0, 0),
        };
        LockInfo {
            withdrawable: U128(balance.saturating_sub(locked)),
            locked: U128(locked),
            unlock_time,
        }
    }

    pub fn owned_nfts(&self, collection: &AccountId) -> Vec<TokenId> {
        self.nft(collection)
            .map(|h| h.token_ids.clone())
            .unwrap_or_default()
    }

    pub fn held_tokens(&self) -> Vec<Asset> {
        self.fungibles
            .iter()
            .map(|h| h.asset.clone())
            .chain(self.nfts.iter().map(|h| Asset::Nft(h.collection.clone())))
            .chain(self.sbts.iter().map(|sbt| Asset::Sbt(sbt.clone())))
            .collect()
    }

    pub fn is_authorized(&self, sbt: &AccountId) -> bool {
        self.sbts.contains(sbt)
    }

    pub fn deposit(&mut self, asset: &Asset, amount: u128) {
        match self.fungibles.iter_mut().find(|h| h.asset == *asset) {
            Some(holding) => holding.balance += amount,
            None => self.fungibles.push(FungibleHolding {
                asset: asset.clone(),
                balance: amount,
                lock: TimeLock::default(),
            }),
        }
    }

    /// Returns false if the token was already held.
    pub fn deposit_nft(&mut self, collection: &AccountId, token_id: &str) -> bool {
        match self.nfts.iter_mut().find(|h| h.collection == *collection) {
            Some(holding) if holding.token_ids.iter().any(|t| t == token_id) => false,
            Some(holding) => {
                holding.token_ids.push(token_id.to_string());
                true
            }
            None => {
                self.nfts.push(NftHolding {
                    collection: collection.clone(),
                    token_ids: vec![token_id.to_string()],
                    lock: None,
                });
                true
            }
        }
    }

    /// Merges a new lock over `amount` of `asset`. Returns the merged lock.
    pub fn lock(
        &mut self,
        asset: &Asset,
        amount: u128,
        unlock_time: TimestampSec,
        now: TimestampSec,
    ) -> GovernanceResult<TimeLock> {
        match self.fungibles.iter_mut().find(|h| h.asset == *asset) {
            Some(holding) => {
                holding
                    .lock
                    .merge(holding.balance, amount, unlock_time, now)?;
                Ok(holding.lock.clone())
            }
            None => {
                // Validated like an empty holding so the merge reports the failure.
                TimeLock::default().merge(0, amount, unlock_time, now)?;
                Err(LockError::NotEnoughTokens.into())
            }
        }
    }

    pub fn lock_nft(
        &mut self,
        collection: &AccountId,
        token_id: &str,
        unlock_time: TimestampSec,
        now: TimestampSec,
    ) -> GovernanceResult<NftLock> {
        let holding = self
            .nfts
            .iter_mut()
            .find(|h| h.collection == *collection && h.token_ids.iter().any(|t| t == token_id))
            .ok_or_else(|| GovernanceError::not_found(ERR_NFT_NOT_OWNED))?;
        let lock = NftLock::merge(holding.lock.as_ref(), token_id, unlock_time, now)?;
        holding.lock = Some(lock.clone());
        Ok(lock)
    }

    /// Debits `amount` if it does not touch the locked part. Empty holdings are dropped.
    pub fn withdraw(
        &mut self,
        asset: &Asset,
        amount: u128,
        now: TimestampSec,
    ) -> GovernanceResult<()> {
        if amount == 0 {
            return Err(GovernanceError::invalid_input(ERR_ZERO_AMOUNT));
        }
        let pos = self
            .fungibles
            .iter()
            .position(|h| h.asset == *asset)
            .ok_or_else(|| GovernanceError::invalid_state(ERR_NOT_ENOUGH_BALANCE))?;
        let holding = &mut self.fungibles[pos];
        holding.lock.check_withdraw(holding.balance, amount, now)?;
        holding.lock.release_expired(now);
        holding.balance -= amount;
        if holding.balance == 0 {
            self.fungibles.remove(pos);
        }
        Ok(())
    }

    pub fn withdraw_nft(
        &mut self,
        collection: &AccountId,
        token_id: &str,
        now: TimestampSec,
    ) -> GovernanceResult<()> {
        let pos = self
            .nfts
            .iter()
            .position(|h| h.collection == *collection && h.token_ids.iter().any(|t| t == token_id))
            .ok_or_else(|| GovernanceError::not_found(ERR_NFT_NOT_OWNED))?;
        let holding = &mut self.nfts[pos];
        if matches!(&holding.lock, Some(lock) if lock.locks(token_id, now)) {
            return Err(GovernanceError::invalid_state(ERR_NFT_LOCKED));
        }
        holding.token_ids.retain(|t| t != token_id);
        if holding.token_ids.is_empty() {
            self.nfts.remove(pos);
        }
        Ok(())
    }

    pub fn authorize(&mut self, sbt: &AccountId) -> bool {
        if self.is_authorized(sbt) {
            return false;
        }
        self.sbts.push(sbt.clone());
        true
    }

    pub fn revoke(&mut self, sbt: &AccountId) -> bool {
        let len = self.sbts.len();
        self.sbts.retain(|s| s != sbt);
        self.sbts.len() != len
    }

    fn fungible(&self, asset: &Asset) -> Option<&FungibleHolding> {
        self.fungibles.iter().find(|h| h.asset == *asset)
    }

    fn nft(&self, collection: &AccountId) -> Option<&NftHolding> {
        self.nfts.iter().find(|h| h.collection == *collection)
    }
}

#[near_bindgen]
impl Contract {
    #[payable]
    pub fn deposit_native(&mut self) {
        self.assert_routed("deposit_native");
        let account_id = env::predecessor_account_id();
        self.internal_deposit(&account_id, &Asset::Near, env::attached_deposit())
            .unwrap_or_panic()
    }

    /// Requests the SBT supply of the caller. Authorization completes in `on_sbt_supply`.
    pub fn authorize_by_sbt(&mut self, sbt: AccountId) -> Promise {
        self.assert_routed("authorize_by_sbt");
        let account_id = env::predecessor_account_id();
        self.bind_asset_kind(&sbt, AssetKind::Sbt).unwrap_or_panic();
        ext_sbt::ext(sbt.clone())
            .with_static_gas(GAS_SBT_SUPPLY)
            .nft_supply_for_owner(account_id.clone())
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(GAS_CALLBACK)
                    .on_sbt_supply(account_id, sbt),
            )
    }

    pub fn revoke_sbt_authorization(&mut self, sbt: AccountId) {
        self.assert_routed("revoke_sbt_authorization");
        let account_id = env::predecessor_account_id();
        self.internal_revoke_sbt(&account_id, &sbt).unwrap_or_panic()
    }

    /// Locks part of a NEAR or fungible token balance until `unlock_time`.
    pub fn lock(
        &mut self,
        account_id: AccountId,
        asset: Asset,
        amount: U128,
        unlock_time: TimestampSec,
    ) {
        self.assert_routed("lock");
        let caller = env::predecessor_account_id();
        self.internal_lock(&caller, &account_id, &asset, amount.0, unlock_time)
            .unwrap_or_panic()
    }

    pub fn lock_nft(
        &mut self,
        account_id: AccountId,
        collection: AccountId,
        token_id: TokenId,
        unlock_time: TimestampSec,
    ) {
        self.assert_routed("lock_nft");
        let caller = env::predecessor_account_id();
        self.internal_lock_nft(&caller, &account_id, &collection, &token_id, unlock_time)
            .unwrap_or_panic()
    }

    pub fn withdraw_fungible(&mut self, token: AccountId, amount: U128) -> Promise {
        self.assert_routed("withdraw_fungible");
        let account_id = env::predecessor_account_id();
        let asset = Asset::Ft(token);
        self.internal_withdraw(&account_id, &asset, amount.0)
            .unwrap_or_panic();
        self.transfer_promise(account_id, asset, amount.0, None)
    }

    pub fn withdraw_native(&mut self, amount: U128) -> Promise {
        self.assert_routed("withdraw_native");
        let account_id = env::predecessor_account_id();
        self.internal_withdraw(&account_id, &Asset::Near, amount.0)
            .unwrap_or_panic();
        self.transfer_promise(account_id, Asset::Near, amount.0, None)
    }

    pub fn withdraw_nft(&mut self, collection: AccountId, token_id: TokenId) -> Promise {
        self.assert_routed("withdraw_nft");
        let account_id = env::predecessor_account_id();
        self.internal_withdraw_nft(&account_id, &collection, &token_id)
            .unwrap_or_panic();
        self.transfer_promise(account_id, Asset::Nft(collection), 1, Some(token_id))
    }
}

impl Contract {
    pub fn vault_account(&self, account_id: &AccountId) -> VaultAccount {
        self.vault_accounts
            .get(account_id)
            .map(|account| account.into())
            .unwrap_or_default()
    }

    /// Stores the account and moves the owner in or out of the token-holder group.
    fn save_vault_account(&mut self, account_id: &AccountId, account: VaultAccount) {
        let group = token_holder_group(&self.panel_name);
        let holds = !account.is_empty();
        let in_group = self.is_in_group(account_id, &group);
        if holds {
            self.vault_accounts.insert(account_id, &account.into());
        } else {
            self.vault_accounts.remove(account_id);
        }
        match (holds, in_group) {
            (true, false) => self.add_user_to_groups_unchecked(account_id, &[group]),
            (false, true) => self.remove_user_from_groups_unchecked(account_id, &[group]),
            _ => {}
        }
    }

    /// Binds a token contract to one asset kind on first use.
    pub(crate) fn bind_asset_kind(
        &mut self,
        account_id: &AccountId,
        kind: AssetKind,
    ) -> GovernanceResult<()> {
        match self.asset_kinds.get(account_id) {
            Some(bound) if bound != kind => Err(GovernanceError::invalid_input(format!(
                "{}: {}",
                ERR_TOKEN_NOT_SUPPORTED, account_id
            ))),
            Some(_) => Ok(()),
            None => {
                self.asset_kinds.insert(account_id, &kind);
                Ok(())
            }
        }
    }

    fn bind_asset(&mut self, asset: &Asset) -> GovernanceResult<()> {
        match asset.account_id() {
            Some(account_id) => self.bind_asset_kind(account_id, asset.kind()),
            None => Ok(()),
        }
    }

    pub fn supply(&self, asset: &Asset) -> u128 {
        self.supply.get(asset).unwrap_or(0)
    }

    fn increase_supply(&mut self, asset: &Asset, amount: u128) {
        let supply = self.supply(asset).saturating_add(amount);
        self.supply.insert(asset, &supply);
    }

    fn decrease_supply(&mut self, asset: &Asset, amount: u128) {
        let supply = self.supply(asset).saturating_sub(amount);
        self.supply.insert(asset, &supply);
    }

    pub fn voting_power(&self, account_id: &AccountId, asset: &Asset) -> u128 {
        self.vault_account(account_id).voting_power(asset)
    }

    pub fn internal_deposit(
        &mut self,
        account_id: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> GovernanceResult<()> {
        if !asset.is_fungible() {
            return Err(GovernanceError::invalid_input(ERR_TOKEN_NOT_SUPPORTED));
        }
        if amount == 0 {
            return Err(GovernanceError::invalid_input(ERR_ZERO_AMOUNT));
        }
        self.bind_asset(asset)?;
        let mut account = self.vault_account(account_id);
        account.deposit(asset, amount);
        self.save_vault_account(account_id, account);
        self.increase_supply(asset, amount);
        Event::Deposited {
            account_id: account_id.clone(),
            asset: asset.clone(),
            amount: U128(amount),
        }
        .emit();
        Ok(())
    }

    pub fn internal_deposit_nft(
        &mut self,
        account_id: &AccountId,
        collection: &AccountId,
        token_id: &TokenId,
    ) -> GovernanceResult<()> {
        self.bind_asset_kind(collection, AssetKind::Nft)?;
        let asset = Asset::Nft(collection.clone());
        let mut account = self.vault_account(account_id);
        let was_holder = account.balance(&asset) > 0;
        if !account.deposit_nft(collection, token_id) {
            return Err(GovernanceError::already_exists(ERR_NFT_DEPOSITED));
        }
        self.save_vault_account(account_id, account);
        if !was_holder {
            self.increase_supply(&asset, 1);
        }
        Event::NftDeposited {
            account_id: account_id.clone(),
            collection: collection.clone(),
            token_id: token_id.clone(),
        }
        .emit();
        Ok(())
    }

    pub fn internal_withdraw(
        &mut self,
        account_id: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> GovernanceResult<()> {
        if !asset.is_fungible() {
            return Err(GovernanceError::invalid_input(ERR_TOKEN_NOT_SUPPORTED));
        }
        let mut account = self.vault_account(account_id);
        account.withdraw(asset, amount, current_timestamp_sec())?;
        self.save_vault_account(account_id, account);
        self.decrease_supply(asset, amount);
        Event::Withdrawn {
            account_id: account_id.clone(),
            asset: asset.clone(),
            amount: U128(amount),
        }
        .emit();
        Ok(())
    }

    pub fn internal_withdraw_nft(
        &mut self,
        account_id: &AccountId,
        collection: &AccountId,
        token_id: &TokenId,
    ) -> GovernanceResult<()> {
        let asset = Asset::Nft(collection.clone());
        let mut account = self.vault_account(account_id);
        account.withdraw_nft(collection, token_id, current_timestamp_sec())?;
        let still_holder = account.balance(&asset) > 0;
        self.save_vault_account(account_id, account);
        if !still_holder {
            self.decrease_supply(&asset, 1);
        }
        Event::NftWithdrawn {
            account_id: account_id.clone(),
            collection: collection.clone(),
            token_id: token_id.clone(),
        }
        .emit();
        Ok(())
    }

    /// Credits back a withdrawal whose transfer failed.
    pub(crate) fn revert_withdraw(
        &mut self,
        account_id: &AccountId,
        asset: &Asset,
        amount: u128,
        token_id: Option<TokenId>,
    ) {
        let mut account = self.vault_account(account_id);
        let was_holder = account.balance(asset) > 0;
        match (asset, token_id.as_ref()) {
            (Asset::Nft(collection), Some(token_id)) => {
                account.deposit_nft(collection, token_id);
                if !was_holder {
                    self.increase_supply(asset, 1);
                }
            }
            _ => {
                account.deposit(asset, amount);
                self.increase_supply(asset, amount);
            }
        }
        self.save_vault_account(account_id, account);
        Event::WithdrawReverted {
            account_id: account_id.clone(),
            asset: asset.clone(),
            amount: U128(amount),
            token_id,
        }
        .emit();
    }

    /// Self locks are always allowed. Locking someone else's balance needs UPDATE on the vault.
    fn require_lock_permission(
        &self,
        caller: &AccountId,
        account_id: &AccountId,
    ) -> GovernanceResult<()> {
        if caller == account_id {
            return Ok(());
        }
        let resource = self.vault_resource();
        self.require_permission(caller, &resource, PERMISSION_UPDATE)
    }

    pub fn internal_lock(
        &mut self,
        caller: &AccountId,
        account_id: &AccountId,
        asset: &Asset,
        amount: u128,
        unlock_time: TimestampSec,
    ) -> GovernanceResult<()> {
        self.require_lock_permission(caller, account_id)?;
        match asset {
            Asset::Sbt(_) => return Err(GovernanceError::invalid_input(ERR_SBT_NOT_LOCKABLE)),
            Asset::Nft(_) => return Err(GovernanceError::invalid_input(ERR_TOKEN_NOT_SUPPORTED)),
            _ => {}
        }
        let mut account = self.vault_account(account_id);
        let lock = account.lock(asset, amount, unlock_time, current_timestamp_sec())?;
        self.save_vault_account(account_id, account);
        Event::Locked {
            account_id: account_id.clone(),
            asset: asset.clone(),
            locked_amount: U128(lock.amount),
            unlock_time: lock.unlock_time,
        }
        .emit();
        Ok(())
    }

    pub fn internal_lock_nft(
        &mut self,
        caller: &AccountId,
        account_id: &AccountId,
        collection: &AccountId,
        token_id: &TokenId,
        unlock_time: TimestampSec,
    ) -> GovernanceResult<()> {
        self.require_lock_permission(caller, account_id)?;
        let mut account = self.vault_account(account_id);
        let lock = account.lock_nft(collection, token_id, unlock_time, current_timestamp_sec())?;
        self.save_vault_account(account_id, account);
        Event::NftLocked {
            account_id: account_id.clone(),
            collection: collection.clone(),
            token_id: lock.token_id,
            unlock_time: lock.unlock_time,
        }
        .emit();
        Ok(())
    }

    /// Authorizes `account_id` when it holds exactly one token of `sbt`.
    pub fn internal_authorize_sbt(
        &mut self,
        account_id: &AccountId,
        sbt: &AccountId,
        held: u128,
    ) -> GovernanceResult<()> {
        if held != 1 {
            return Err(GovernanceError::access_denied(ERR_SBT_NOT_HELD));
        }
        self.bind_asset_kind(sbt, AssetKind::Sbt)?;
        let mut account = self.vault_account(account_id);
        if !account.authorize(sbt) {
            return Ok(());
        }
        self.save_vault_account(account_id, account);
        self.increase_supply(&Asset::Sbt(sbt.clone()), 1);
        Event::SbtAuthorized {
            account_id: account_id.clone(),
            sbt: sbt.clone(),
        }
        .emit();
        Ok(())
    }

    pub fn internal_revoke_sbt(
        &mut self,
        account_id: &AccountId,
        sbt: &AccountId,
    ) -> GovernanceResult<()> {
        let mut account = self.vault_account(account_id);
        if !account.revoke(sbt) {
            return Err(GovernanceError::not_found(ERR_SBT_NOT_AUTHORIZED));
        }
        self.save_vault_account(account_id, account);
        self.decrease_supply(&Asset::Sbt(sbt.clone()), 1);
        Event::SbtRevoked {
            account_id: account_id.clone(),
            sbt: sbt.clone(),
        }
        .emit();
        Ok(())
    }

    /// Sends the withdrawn asset and re-credits it in `on_withdraw` if the transfer fails.
    fn transfer_promise(
        &self,
        account_id: AccountId,
        asset: Asset,
        amount: u128,
        token_id: Option<TokenId>,
    ) -> Promise {
        let transfer = match (&asset, token_id.as_ref()) {
            (Asset::Ft(token), _) => Promise::new(token.clone()).function_call(
                "ft_transfer".into(),
                json!({
                    "receiver_id": account_id,
                    "amount": U128(amount),
                    "memo": null,
                })
                .to_string()
                .into_bytes(),
                ONE_YOCTO,
                GAS_TRANSFER,
            ),
            (Asset::Nft(collection), Some(token_id)) => Promise::new(collection.clone())
                .function_call(
                    "nft_transfer".into(),
                    json!({
                        "receiver_id": account_id,
                        "token_id": token_id,
                        "approval_id": null,
                        "memo": null,
                    })
                    .to_string()
                    .into_bytes(),
                    ONE_YOCTO,
                    GAS_TRANSFER,
                ),
            _ => Promise::new(account_id.clone()).transfer(amount),
        };
        transfer.then(
            ext_self::ext(env::current_account_id())
                .with_static_gas(GAS_CALLBACK)
                .on_withdraw(account_id, asset, U128(amount), token_id),
        )
    }
}
