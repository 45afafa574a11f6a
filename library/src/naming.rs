//! Naming rules for panel resources and the groups and roles derived from them.
//! Every implicit name is built here so mutation paths never concatenate strings themselves.

pub const MODULE_DIAMOND: &str = "DIAMOND";
pub const MODULE_PERMISSION_MANAGER: &str = "DAO_PERMISSION_MANAGER";
pub const MODULE_MEMBER_STORAGE: &str = "DAO_MEMBER_STORAGE";
pub const MODULE_PARAMETER_STORAGE: &str = "DAO_PARAMETER_STORAGE";
pub const MODULE_VAULT: &str = "DAO_VAULT";
pub const MODULE_VOTING: &str = "DAO_VOTING";

const SEPARATOR: char = ':';

const VETO_GROUP_ROLE: &str = "VetoGroupRoleFor";
const TOKEN_HOLDER_GROUP: &str = "DAOGroup";
const TOKEN_HOLDER_ROLE: &str = "DAOMemberRole";
const EXPERT_GROUP: &str = "DAOExpertVotingGroup";
const EXPERT_ROLE: &str = "DAOExpertRole";

/// `<MODULE>:<panel>`
pub fn panel_resource(module: &str, panel: &str) -> String {
    format!("{}{}{}", module, SEPARATOR, panel)
}

/// Module part of a panel resource, if it has one.
pub fn resource_module(resource: &str) -> Option<&str> {
    resource
        .split_once(SEPARATOR)
        .map(|(module, _)| module)
        .filter(|module| !module.is_empty())
}

/// Role granted to the members of a storage linked to the veto group of `target`.
pub fn veto_role(target: &str) -> String {
    format!("{}{}{}", VETO_GROUP_ROLE, SEPARATOR, target)
}

pub fn token_holder_group(panel: &str) -> String {
    format!("{}{}{}", TOKEN_HOLDER_GROUP, SEPARATOR, panel)
}

pub fn token_holder_role(panel: &str) -> String {
    format!("{}{}{}", TOKEN_HOLDER_ROLE, SEPARATOR, panel)
}

pub fn expert_group(storage: &str) -> String {
    format!("{}{}{}", EXPERT_GROUP, SEPARATOR, storage)
}

pub fn expert_role(storage: &str) -> String {
    format!("{}{}{}", EXPERT_ROLE, SEPARATOR, storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names() {
        let storage = panel_resource(MODULE_MEMBER_STORAGE, "DAO Token Holder");
        assert_eq!(storage, "DAO_MEMBER_STORAGE:DAO Token Holder");
        assert_eq!(
            veto_role(&storage),
            "VetoGroupRoleFor:DAO_MEMBER_STORAGE:DAO Token Holder"
        );
        assert_eq!(token_holder_group("DAO Token Holder"), "DAOGroup:DAO Token Holder");
        assert_eq!(
            expert_group(&storage),
            "DAOExpertVotingGroup:DAO_MEMBER_STORAGE:DAO Token Holder"
        );
    }

    #[test]
    fn module_of_resource() {
        assert_eq!(resource_module("DAO_VAULT:panel"), Some(MODULE_VAULT));
        assert_eq!(resource_module("DAO_VAULT:a:b"), Some(MODULE_VAULT));
        assert_eq!(resource_module("plain"), None);
        assert_eq!(resource_module(":panel"), None);
    }
}
