//! NEP-297 events. Every state change logs exactly one event so an indexer can rebuild the state.

use library::rbac::ResourcePermissions;
use near_sdk::json_types::U128;
use near_sdk::serde::Serialize;
use near_sdk::{log, serde_json, AccountId};

use crate::constants::{EVENT_STANDARD, EVENT_VERSION};
use crate::diamond::FacetCut;
use crate::vault::Asset;
use crate::{GroupName, ProposalId, Resource, RoleName, TimestampSec, TokenId};

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct EventLog<'a> {
    standard: &'static str,
    version: &'static str,
    #[serde(flatten)]
    event: &'a Event,
}

#[derive(Serialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    DiamondCut {
        cuts: Vec<FacetCut>,
    },
    FacetDeployed {
        facet: AccountId,
        kind: String,
    },
    OwnershipTransferred {
        previous_owner: AccountId,
        new_owner: AccountId,
    },
    RolesGranted {
        account_id: AccountId,
        roles: Vec<RoleName>,
    },
    RolesRevoked {
        account_id: AccountId,
        roles: Vec<RoleName>,
    },
    PermissionsAdded {
        role: RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    },
    PermissionsRemoved {
        role: RoleName,
        permissions: Vec<ResourcePermissions>,
        allowed: bool,
    },
    GroupRolesGranted {
        group: GroupName,
        roles: Vec<RoleName>,
    },
    GroupRolesRevoked {
        group: GroupName,
        roles: Vec<RoleName>,
    },
    UserAddedToGroups {
        account_id: AccountId,
        groups: Vec<GroupName>,
    },
    UserRemovedFromGroups {
        account_id: AccountId,
        groups: Vec<GroupName>,
    },
    VetoGroupAdded {
        target: Resource,
        name: String,
        linked_storage: Option<Resource>,
    },
    VetoGroupRemoved {
        target: Resource,
    },
    VetoGroupLinked {
        target: Resource,
        previous_storage: Option<Resource>,
        linked_storage: Option<Resource>,
    },
    MemberStorageCreated {
        storage: Resource,
    },
    MembersAdded {
        storage: Resource,
        members: Vec<AccountId>,
    },
    MembersRemoved {
        storage: Resource,
        members: Vec<AccountId>,
    },
    ParametersSet {
        names: Vec<String>,
    },
    ParametersRemoved {
        names: Vec<String>,
    },
    Deposited {
        account_id: AccountId,
        asset: Asset,
        amount: U128,
    },
    NftDeposited {
        account_id: AccountId,
        collection: AccountId,
        token_id: TokenId,
    },
    Withdrawn {
        account_id: AccountId,
        asset: Asset,
        amount: U128,
    },
    NftWithdrawn {
        account_id: AccountId,
        collection: AccountId,
        token_id: TokenId,
    },
    WithdrawReverted {
        account_id: AccountId,
        asset: Asset,
        amount: U128,
        token_id: Option<TokenId>,
    },
    Locked {
        account_id: AccountId,
        asset: Asset,
        locked_amount: U128,
        unlock_time: TimestampSec,
    },
    NftLocked {
        account_id: AccountId,
        collection: AccountId,
        token_id: TokenId,
        unlock_time: TimestampSec,
    },
    SbtAuthorized {
        account_id: AccountId,
        sbt: AccountId,
    },
    SbtRevoked {
        account_id: AccountId,
        sbt: AccountId,
    },
    VotingSituationCreated {
        name: String,
    },
    VotingSituationRemoved {
        name: String,
    },
    VotingTokenChanged {
        token: Asset,
    },
    ProposalCreated {
        id: ProposalId,
        situation: String,
        proposer: AccountId,
        target: Resource,
    },
    Voted {
        id: ProposalId,
        account_id: AccountId,
        approve: bool,
        weight: U128,
    },
    Vetoed {
        id: ProposalId,
        account_id: AccountId,
    },
    ProposalExecuted {
        id: ProposalId,
    },
}

impl Event {
    pub fn emit(&self) {
        let log = EventLog {
            standard: EVENT_STANDARD,
            version: EVENT_VERSION,
            event: self,
        };
        if let Ok(json) = serde_json::to_string(&log) {
            log!("EVENT_JSON:{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use near_sdk::test_utils::get_logs;
    use near_sdk::{testing_env, test_utils::VMContextBuilder};

    use super::*;

    #[test]
    fn event_follows_nep297_layout() {
        testing_env!(VMContextBuilder::new().build());
        Event::VotingSituationCreated {
            name: "general".into(),
        }
        .emit();
        assert_eq!(
            get_logs(),
            vec![r#"EVENT_JSON:{"standard":"diamond_dao","version":"1.0.0","event":"voting_situation_created","data":{"name":"general"}}"#]
        );
    }
}
