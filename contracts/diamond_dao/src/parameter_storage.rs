use std::collections::HashSet;

use library::rbac::{PERMISSION_DELETE, PERMISSION_UPDATE};
use library::storage::ParameterSet;
use library::types::Parameter;
use near_sdk::{env, near_bindgen, AccountId};

use crate::core::*;
use crate::error::*;
use crate::event::Event;

#[near_bindgen]
impl Contract {
    /// Inserts or replaces the parameter. A replaced parameter keeps its position.
    pub fn set_parameter(&mut self, parameter: Parameter) {
        self.assert_routed("set_parameter");
        let caller = env::predecessor_account_id();
        self.internal_set_parameters(&caller, vec![parameter])
            .unwrap_or_panic()
    }

    pub fn set_parameters(&mut self, parameters: Vec<Parameter>) {
        self.assert_routed("set_parameters");
        let caller = env::predecessor_account_id();
        self.internal_set_parameters(&caller, parameters)
            .unwrap_or_panic()
    }

    pub fn remove_parameter(&mut self, name: String) {
        self.assert_routed("remove_parameter");
        let caller = env::predecessor_account_id();
        self.internal_remove_parameters(&caller, vec![name])
            .unwrap_or_panic()
    }

    pub fn remove_parameters(&mut self, names: Vec<String>) {
        self.assert_routed("remove_parameters");
        let caller = env::predecessor_account_id();
        self.internal_remove_parameters(&caller, names)
            .unwrap_or_panic()
    }
}

impl Contract {
    pub fn internal_set_parameters(
        &mut self,
        caller: &AccountId,
        parameters: Vec<Parameter>,
    ) -> GovernanceResult<()> {
        let resource = self.parameter_storage_resource();
        self.require_permission(caller, &resource, PERMISSION_UPDATE)?;
        for parameter in parameters.iter() {
            if parameter.name.is_empty() {
                return Err(GovernanceError::invalid_input(ERR_EMPTY_NAME));
            }
            parameter.decode()?;
        }

        let mut parameter_set = self.parameter_set();
        let names = parameters.iter().map(|p| p.name.clone()).collect();
        for parameter in parameters {
            parameter_set.set(parameter);
        }
        self.parameters.set(&parameter_set);
        Event::ParametersSet { names }.emit();
        Ok(())
    }

    pub fn internal_remove_parameters(
        &mut self,
        caller: &AccountId,
        names: Vec<String>,
    ) -> GovernanceResult<()> {
        let resource = self.parameter_storage_resource();
        self.require_permission(caller, &resource, PERMISSION_DELETE)?;
        let mut parameter_set = self.parameter_set();
        let mut batch = HashSet::new();
        for name in names.iter() {
            if !parameter_set.contains(name) || !batch.insert(name) {
                return Err(GovernanceError::not_found(format!(
                    "{}: {}",
                    ERR_PARAMETER_NOT_FOUND, name
                )));
            }
        }

        for name in names.iter() {
            parameter_set.remove(name);
        }
        self.parameters.set(&parameter_set);
        Event::ParametersRemoved { names }.emit();
        Ok(())
    }

    pub fn parameter_set(&self) -> ParameterSet {
        self.parameters.get().unwrap_or_default()
    }

    pub(crate) fn require_parameter(&self, name: &str) -> GovernanceResult<Parameter> {
        self.parameter_set().get(name).cloned().ok_or_else(|| {
            GovernanceError::not_found(format!("{}: {}", ERR_PARAMETER_NOT_FOUND, name))
        })
    }
}
