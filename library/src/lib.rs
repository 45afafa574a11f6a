pub mod error;
pub mod fraction;
pub mod locking;
pub mod naming;
pub mod rbac;
pub mod storage;
pub mod types;
pub mod voting;

/// Timestamp in seconds.
pub type TimestampSec = u64;
