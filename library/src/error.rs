use thiserror::Error;

use crate::types::ParameterType;

#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("invalid parameter type for {name}: expected {expected}, got {actual}")]
    InvalidParameterType {
        name: String,
        expected: ParameterType,
        actual: ParameterType,
    },
    #[error("malformed value of parameter {0}")]
    MalformedValue(String),
}

impl CodecError {
    pub fn invalid_type(name: &str, expected: ParameterType, actual: ParameterType) -> Self {
        Self::InvalidParameterType {
            name: name.into(),
            expected,
            actual,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum LockError {
    #[error("lock amount must be positive")]
    ZeroAmount,
    #[error("lock time too big")]
    HorizonExceeded,
    #[error("unlock time must be in the future")]
    UnlockInPast,
    #[error("not enough tokens to lock")]
    NotEnoughTokens,
    #[error("trying to withdraw more than locked: requested {requested}, available {available}")]
    WithdrawLocked { requested: u128, available: u128 },
    #[error("another token of the collection is locked")]
    CollectionLocked,
}
