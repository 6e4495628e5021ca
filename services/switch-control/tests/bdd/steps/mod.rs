//! BDD step definitions for switch-control

pub mod configuration_steps;
pub mod deployment_steps;
pub mod tree_steps;
