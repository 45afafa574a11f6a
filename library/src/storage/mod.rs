mod parameter_set;

pub use parameter_set::ParameterSet;
