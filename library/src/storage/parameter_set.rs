use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};

use crate::types::Parameter;

/// Parameters keyed by unique name, enumerated in insertion order.
#[derive(BorshDeserialize, BorshSerialize, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    /// Inserts or replaces `parameter`. Returns true if the name was new.
    /// Replacing keeps the original position.
    pub fn set(&mut self, parameter: Parameter) -> bool {
        match self.position(&parameter.name) {
            Some(pos) => {
                self.parameters[pos] = parameter;
                false
            }
            None => {
                self.parameters.push(parameter);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.position(name).map(|pos| &self.parameters[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.position(name).map(|pos| self.parameters.remove(pos))
    }

    pub fn values(&self) -> &[Parameter] {
        self.parameters.as_slice()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterValue;

    fn names(set: &ParameterSet) -> Vec<&str> {
        set.values().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn upsert_keeps_insertion_order() {
        let mut set = ParameterSet::default();
        assert!(set.set(Parameter::new("a", ParameterValue::Bool(true))));
        assert!(set.set(Parameter::new("b", ParameterValue::Uint256(1u128.into()))));
        assert!(set.set(Parameter::new("c", ParameterValue::None)));
        assert!(!set.set(Parameter::new("a", ParameterValue::Bool(false))));

        assert_eq!(names(&set), vec!["a", "b", "c"]);
        assert_eq!(set.get("a").unwrap().as_bool(), Ok(false));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let mut set = ParameterSet::default();
        for name in ["a", "b", "c", "d"] {
            set.set(Parameter::new(name, ParameterValue::None));
        }
        assert!(set.remove("b").is_some());
        assert!(set.remove("b").is_none());
        assert_eq!(names(&set), vec!["a", "c", "d"]);
        assert!(!set.contains("b"));
    }
}
