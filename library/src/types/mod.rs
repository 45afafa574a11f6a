mod parameter;

pub use parameter::{Parameter, ParameterType, ParameterValue};
