#![allow(clippy::new_without_default)]

use near_sdk::env;

mod unit_tests;

pub mod callbacks;
pub mod constants;
pub mod core;
pub mod diamond;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod member_storage;
pub mod parameter_storage;
pub mod permissions;
pub mod proposal;
pub mod receiver;
pub mod vault;
pub mod veto;
pub mod view;
pub mod voting;

pub use library::TimestampSec;

pub type ProposalId = u32;
/// Function selector, equal to the method name it routes.
pub type Selector = String;
/// Name of a protected capability surface.
pub type Resource = String;
pub type RoleName = String;
pub type GroupName = String;
pub type TokenId = String;

pub(crate) fn current_timestamp_sec() -> TimestampSec {
    env::block_timestamp() / 10u64.pow(9)
}

pub(crate) fn append(key: &[u8], suffix: &[u8]) -> Vec<u8> {
    [key, suffix].concat()
}

#[macro_export]
macro_rules! derive_into_versioned {
    ($from:ident, $for:ident) => {
        impl From<$from> for $for {
            fn from(input: $from) -> Self {
                $for::Current(input)
            }
        }
    };
}

#[macro_export]
macro_rules! derive_from_versioned {
    ($from:ident, $for:ident) => {
        impl From<$from> for $for {
            fn from(input: $from) -> Self {
                match input {
                    $from::Current(v) => v,
                }
            }
        }
    };
}
