//! Role permission sets and their evaluation.

use std::collections::BTreeSet;

use near_sdk::{
    borsh::{self, BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

pub const WILDCARD: &str = "*";

pub const PERMISSION_CREATE: &str = "CREATE";
pub const PERMISSION_UPDATE: &str = "UPDATE";
pub const PERMISSION_DELETE: &str = "DELETE";
pub const PERMISSION_EXECUTE: &str = "EXECUTE";
pub const PERMISSION_CREATE_VOTING: &str = "CREATE_VOTING";
pub const PERMISSION_VOTE: &str = "VOTE";
pub const PERMISSION_VETO: &str = "VETO";

#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord,
)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
#[serde(crate = "near_sdk::serde")]
pub struct ResourcePermission {
    pub resource: String,
    pub permission: String,
}

impl ResourcePermission {
    pub fn new(resource: &str, permission: &str) -> Self {
        Self {
            resource: resource.to_string(),
            permission: permission.to_string(),
        }
    }

    pub fn master() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }
}

/// Input entry for permission mutations: one resource with several permissions.
#[derive(Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct ResourcePermissions {
    pub resource: String,
    pub permissions: Vec<String>,
}

impl ResourcePermissions {
    fn entries(&self) -> impl Iterator<Item = ResourcePermission> + '_ {
        self.permissions
            .iter()
            .map(move |p| ResourcePermission::new(&self.resource, p))
    }
}

/// Allow and deny sets of a single role.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct RolePermissions {
    pub allowed: BTreeSet<ResourcePermission>,
    pub denied: BTreeSet<ResourcePermission>,
}

impl RolePermissions {
    pub fn master() -> Self {
        let mut permissions = Self::default();
        permissions.allowed.insert(ResourcePermission::master());
        permissions
    }

    pub fn add(&mut self, entries: &[ResourcePermissions], allowed: bool) {
        let set = self.set_mut(allowed);
        for entry in entries {
            set.extend(entry.entries());
        }
    }

    pub fn remove(&mut self, entries: &[ResourcePermissions], allowed: bool) {
        let set = self.set_mut(allowed);
        for entry in entries {
            for permission in entry.entries() {
                set.remove(&permission);
            }
        }
    }

    pub fn is_master(&self) -> bool {
        self.allowed.contains(&ResourcePermission::master())
    }

    pub fn allows(&self, resource: &str, permission: &str) -> bool {
        self.allowed
            .contains(&ResourcePermission::new(resource, permission))
    }

    pub fn denies(&self, resource: &str, permission: &str) -> bool {
        self.denied
            .contains(&ResourcePermission::new(resource, permission))
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.denied.is_empty()
    }

    fn set_mut(&mut self, allowed: bool) -> &mut BTreeSet<ResourcePermission> {
        if allowed {
            &mut self.allowed
        } else {
            &mut self.denied
        }
    }
}

/// Evaluates `permission` on `resource` over every role a user holds.
/// A master role grants everything. Otherwise some role must allow it and no role may deny it.
pub fn evaluate<'a, I>(roles: I, resource: &str, permission: &str) -> bool
where
    I: IntoIterator<Item = &'a RolePermissions>,
{
    let mut allowed = false;
    let mut denied = false;
    for role in roles {
        if role.is_master() {
            return true;
        }
        allowed |= role.allows(resource, permission);
        denied |= role.denies(resource, permission);
    }
    allowed && !denied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(resource: &str, permissions: &[&str]) -> ResourcePermissions {
        ResourcePermissions {
            resource: resource.into(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn deny_wins_over_allow_in_any_order() {
        let mut reader = RolePermissions::default();
        reader.add(&[entry("vault", &[PERMISSION_UPDATE])], true);
        let mut blocker = RolePermissions::default();
        blocker.add(&[entry("vault", &[PERMISSION_UPDATE])], false);

        assert!(evaluate([&reader], "vault", PERMISSION_UPDATE));
        assert!(!evaluate([&reader, &blocker], "vault", PERMISSION_UPDATE));
        assert!(!evaluate([&blocker, &reader], "vault", PERMISSION_UPDATE));

        let mut both = RolePermissions::default();
        both.add(&[entry("vault", &[PERMISSION_UPDATE])], false);
        both.add(&[entry("vault", &[PERMISSION_UPDATE])], true);
        assert!(!evaluate([&both], "vault", PERMISSION_UPDATE));
    }

    #[test]
    fn unknown_permission_is_denied() {
        let mut role = RolePermissions::default();
        role.add(&[entry("vault", &[PERMISSION_CREATE])], true);
        assert!(!evaluate([&role], "vault", PERMISSION_DELETE));
        assert!(!evaluate([&role], "storage", PERMISSION_CREATE));
        assert!(!evaluate(std::iter::empty(), "vault", PERMISSION_CREATE));
    }

    #[test]
    fn master_bypasses_deny() {
        let master = RolePermissions::master();
        let mut blocker = RolePermissions::default();
        blocker.add(&[entry("vault", &[PERMISSION_DELETE])], false);
        assert!(evaluate([&blocker, &master], "vault", PERMISSION_DELETE));
        assert!(evaluate([&master], "anything", "ANY"));
    }

    #[test]
    fn remove_only_touches_selected_set() {
        let mut role = RolePermissions::default();
        role.add(&[entry("vault", &[PERMISSION_CREATE, PERMISSION_DELETE])], true);
        role.add(&[entry("vault", &[PERMISSION_DELETE])], false);
        role.remove(&[entry("vault", &[PERMISSION_DELETE])], false);
        assert!(role.allows("vault", PERMISSION_DELETE));
        role.remove(&[entry("vault", &[PERMISSION_DELETE])], true);
        assert!(!role.allows("vault", PERMISSION_DELETE));
        assert!(role.allows("vault", PERMISSION_CREATE));
    }
}
