use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

use crate::{error::LockError, TimestampSec};

/// Longest allowed distance between now and an unlock time.
pub const MAX_LOCK_DURATION: TimestampSec = 365 * 24 * 60 * 60;

/// Single merged lock over a fungible balance.
/// Consecutive locks are folded into this record instead of being kept as a list.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct TimeLock {
    pub amount: u128,
    pub unlock_time: TimestampSec,
}

impl TimeLock {
    pub fn is_active(&self, now: TimestampSec) -> bool {
        self.amount > 0 && self.unlock_time > now
    }

    /// Amount still locked at `now`.
    pub fn locked(&self, now: TimestampSec) -> u128 {
        if self.is_active(now) {
            self.amount
        } else {
            0
        }
    }

    /// Part of `balance` that may leave the vault at `now`.
    pub fn withdrawable(&self, balance: u128, now: TimestampSec) -> u128 {
        balance.saturating_sub(self.locked(now))
    }

    /// Drops an expired lock so its amount counts as withdrawable.
    pub fn release_expired(&mut self, now: TimestampSec) {
        if !self.is_active(now) {
            *self = Self::default();
        }
    }

    /// Merges a new lock into the record.
    /// The locked amount accumulates while unexpired and the unlock time never moves backwards.
    pub fn merge(
        &mut self,
        balance: u128,
        amount: u128,
        unlock_time: TimestampSec,
        now: TimestampSec,
    ) -> Result<(), LockError> {
        if amount == 0 {
            return Err(LockError::ZeroAmount);
        }
        if unlock_time <= now {
            return Err(LockError::UnlockInPast);
        }
        if unlock_time - now > MAX_LOCK_DURATION {
            return Err(LockError::HorizonExceeded);
        }

        self.release_expired(now);
        let new_amount = self
            .amount
            .checked_add(amount)
            .ok_or(LockError::NotEnoughTokens)?;
        if new_amount > balance {
            return Err(LockError::NotEnoughTokens);
        }
        self.amount = new_amount;
        self.unlock_time = self.unlock_time.max(unlock_time);
        Ok(())
    }

    pub fn check_withdraw(
        &self,
        balance: u128,
        amount: u128,
        now: TimestampSec,
    ) -> Result<(), LockError> {
        let available = self.withdrawable(balance, now);
        if amount > available {
            return Err(LockError::WithdrawLocked {
                requested: amount,
                available,
            });
        }
        Ok(())
    }
}

/// Lock of a single NFT inside a collection.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct NftLock {
    pub token_id: String,
    pub unlock_time: TimestampSec,
}

impl NftLock {
    pub fn is_active(&self, now: TimestampSec) -> bool {
        self.unlock_time > now
    }

    pub fn locks(&self, token_id: &str, now: TimestampSec) -> bool {
        self.token_id == token_id && self.is_active(now)
    }

    /// Locks `token_id` until `unlock_time`, merging with a `current` lock on the same id.
    /// Only one token of a collection may be locked at a time.
    pub fn merge(
        current: Option<&NftLock>,
        token_id: &str,
        unlock_time: TimestampSec,
        now: TimestampSec,
    ) -> Result<NftLock, LockError> {
        if unlock_time <= now {
            return Err(LockError::UnlockInPast);
        }
        if unlock_time - now > MAX_LOCK_DURATION {
            return Err(LockError::HorizonExceeded);
        }
        match current {
            Some(lock) if lock.is_active(now) && lock.token_id != token_id => {
                Err(LockError::CollectionLocked)
            }
            Some(lock) if lock.is_active(now) => Ok(NftLock {
                token_id: token_id.to_string(),
                unlock_time: lock.unlock_time.max(unlock_time),
            }),
            _ => Ok(NftLock {
                token_id: token_id.to_string(),
                unlock_time,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: TimestampSec = 1_000;

    fn lock(amount: u128, unlock_time: TimestampSec) -> TimeLock {
        TimeLock {
            amount,
            unlock_time,
        }
    }

    #[test]
    fn merge_accumulates_unexpired_amounts() {
        let mut record = TimeLock::default();
        record.merge(1100, 200, NOW + 100, NOW).unwrap();
        record.merge(1100, 800, NOW + 110, NOW + 10).unwrap();
        assert_eq!(record, lock(1000, NOW + 110));
        assert_eq!(record.withdrawable(1100, NOW + 20), 100);
    }

    #[test]
    fn merge_keeps_later_unlock_time() {
        let mut record = lock(100, NOW + 500);
        record.merge(1000, 50, NOW + 200, NOW).unwrap();
        assert_eq!(record, lock(150, NOW + 500));
    }

    #[test]
    fn expired_lock_is_folded_before_merge() {
        let mut record = lock(600, NOW - 1);
        assert_eq!(record.withdrawable(1000, NOW), 1000);
        record.merge(1000, 300, NOW + 60, NOW).unwrap();
        assert_eq!(record, lock(300, NOW + 60));
    }

    #[test]
    fn unlock_time_equal_to_now_is_expired() {
        let record = lock(500, NOW);
        assert!(!record.is_active(NOW));
        assert_eq!(record.locked(NOW), 0);
        assert_eq!(record.locked(NOW - 1), 500);
    }

    #[test]
    fn merge_rejects_invalid_requests() {
        let mut record = TimeLock::default();
        assert_eq!(record.merge(100, 0, NOW + 1, NOW), Err(LockError::ZeroAmount));
        assert_eq!(
            record.merge(100, 10, NOW + MAX_LOCK_DURATION + 1, NOW),
            Err(LockError::HorizonExceeded)
        );
        assert_eq!(record.merge(100, 10, NOW, NOW), Err(LockError::UnlockInPast));
        assert_eq!(
            record.merge(100, 101, NOW + 1, NOW),
            Err(LockError::NotEnoughTokens)
        );
        record.merge(100, 10, NOW + MAX_LOCK_DURATION, NOW).unwrap();
        assert_eq!(record, lock(10, NOW + MAX_LOCK_DURATION));
    }

    #[test]
    fn withdraw_bound_follows_lock() {
        let record = lock(700, NOW + 50);
        assert!(record.check_withdraw(1000, 300, NOW).is_ok());
        assert_eq!(
            record.check_withdraw(1000, 301, NOW),
            Err(LockError::WithdrawLocked {
                requested: 301,
                available: 300
            })
        );
        assert!(record.check_withdraw(1000, 1000, NOW + 50).is_ok());
    }

    #[test]
    fn nft_lock_merges_same_id_only() {
        let first = NftLock::merge(None, "0", NOW + 1000, NOW).unwrap();
        let second = NftLock::merge(Some(&first), "0", NOW + 300, NOW).unwrap();
        assert_eq!(second.unlock_time, NOW + 1000);
        let third = NftLock::merge(Some(&second), "0", NOW + 2000, NOW).unwrap();
        assert_eq!(third.unlock_time, NOW + 2000);

        assert_eq!(
            NftLock::merge(Some(&third), "1", NOW + 10, NOW),
            Err(LockError::CollectionLocked)
        );
        let other = NftLock::merge(Some(&third), "1", NOW + 2010, NOW + 2000).unwrap();
        assert!(other.locks("1", NOW + 2000));
        assert!(!other.locks("0", NOW + 2000));
    }
}
