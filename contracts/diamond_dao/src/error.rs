use library::error::{CodecError, LockError};
use near_sdk::env;
use thiserror::Error;

pub const ERR_NOT_OWNER: &str = "caller is not the owner";
pub const ERR_NO_SELECTORS: &str = "no selectors";
pub const ERR_NOT_A_CONTRACT: &str = "not a contract";
pub const ERR_IMMUTABLE: &str = "immutable";
pub const ERR_SELECTOR_NOT_REGISTERED: &str = "selector not registered";
pub const ERR_SELECTOR_EXISTS: &str = "selector already added";
pub const ERR_SELECTOR_SAME_FACET: &str = "selector already added to facet";
pub const ERR_SELECTOR_OTHER_FACET: &str = "selector from another facet";
pub const ERR_SELECTOR_NOT_IMPLEMENTED: &str = "facet does not implement selector";
pub const ERR_NOT_DISPATCHABLE: &str = "selector is not dispatchable";
pub const ERR_ZERO_ADDRESS: &str = "zero address";
pub const ERR_FACET_DEPLOYED: &str = "facet already deployed";
pub const ERR_INIT_WITHOUT_CALL: &str = "init call is empty";

pub const ERR_EMPTY_ROLES: &str = "empty roles";
pub const ERR_EMPTY_GROUPS: &str = "empty groups";
pub const ERR_VETO_GROUP_EXISTS: &str = "veto group already exists";
pub const ERR_VETO_GROUP_NOT_FOUND: &str = "veto group does not exist";

pub const ERR_MEMBER_STORAGE_EXISTS: &str = "member storage already exists";
pub const ERR_MEMBER_STORAGE_NOT_FOUND: &str = "member storage does not exist";
pub const ERR_MEMBER_EXISTS: &str = "already a member";
pub const ERR_MEMBER_NOT_FOUND: &str = "not a member";
pub const ERR_EMPTY_MEMBERS: &str = "empty members";
pub const ERR_EMPTY_NAME: &str = "empty name";

pub const ERR_PARAMETER_NOT_FOUND: &str = "parameter does not exist";

pub const ERR_TOKEN_NOT_SUPPORTED: &str = "token not supported";
pub const ERR_ZERO_AMOUNT: &str = "amount must be positive";
pub const ERR_NOT_ENOUGH_BALANCE: &str = "not enough balance";
pub const ERR_NFT_NOT_OWNED: &str = "NFT is not in the vault";
pub const ERR_NFT_LOCKED: &str = "trying to withdraw locked NFT";
pub const ERR_NFT_DEPOSITED: &str = "NFT already deposited";
pub const ERR_UNSUPPORTED_MSG: &str = "transfer message must be empty";
pub const ERR_SBT_NOT_HELD: &str = "account does not hold exactly one SBT";
pub const ERR_SBT_NOT_AUTHORIZED: &str = "account is not authorized by SBT";
pub const ERR_SBT_NOT_LOCKABLE: &str = "SBT cannot be locked";

pub const ERR_SITUATION_EXISTS: &str = "voting situation already exists";
pub const ERR_SITUATION_NOT_FOUND: &str = "voting situation does not exist";
pub const ERR_PROPOSAL_NOT_FOUND: &str = "proposal does not exist";
pub const ERR_ONLY_EXPERTS: &str = "only experts have access on target";
pub const ERR_LOW_VOTING_POWER: &str = "voting power too low";
pub const ERR_NOT_PENDING: &str = "voting is not pending";
pub const ERR_ALREADY_VOTED: &str = "already voted";
pub const ERR_NOT_ACCEPTED: &str = "proposal must be accepted to be vetoed";
pub const ERR_ALREADY_VETOED: &str = "already vetoed";
pub const ERR_NOT_PASSED: &str = "proposal must be passed to be executed";
pub const ERR_GENERAL_VOTING_TARGET: &str = "general voting must be called on the voting contract";
pub const ERR_CALL_OUTSIDE_TARGET: &str = "call does not belong to the target";
pub const ERR_TARGET_NOT_PANEL: &str = "target is not a panel resource";
pub const ERR_INVALID_THRESHOLD: &str = "threshold above 100%";

pub const ERR_PROMISE_INVALID_RESULTS_COUNT: &str = "invalid promise result count";

#[derive(Error, Debug, PartialEq)]
pub enum GovernanceError {
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("external call failed: {0}")]
    ExternalCallFailure(String),
}

impl GovernanceError {
    pub fn access_denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied(reason.into())
    }
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }
    pub fn already_exists(reason: impl Into<String>) -> Self {
        Self::AlreadyExists(reason.into())
    }
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
    pub fn external(reason: impl Into<String>) -> Self {
        Self::ExternalCallFailure(reason.into())
    }
}

impl From<CodecError> for GovernanceError {
    fn from(error: CodecError) -> Self {
        GovernanceError::InvalidInput(error.to_string())
    }
}

impl From<LockError> for GovernanceError {
    fn from(error: LockError) -> Self {
        match error {
            LockError::NotEnoughTokens
            | LockError::WithdrawLocked { .. }
            | LockError::CollectionLocked => GovernanceError::InvalidState(error.to_string()),
            _ => GovernanceError::InvalidInput(error.to_string()),
        }
    }
}

pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Aborts the receipt with the error message, reverting every state change of the call.
pub trait UnwrapOrPanic<T> {
    fn unwrap_or_panic(self) -> T;
}

impl<T> UnwrapOrPanic<T> for GovernanceResult<T> {
    fn unwrap_or_panic(self) -> T {
        self.unwrap_or_else(|e| env::panic_str(&e.to_string()))
    }
}
