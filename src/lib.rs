//! Hierarchical containers for scientific-dataset variables.
//!
//! A [`GroupVariable`](domain::GroupVariable) composes named child variables
//! (leaves or nested groups) and flattens their payload into a single
//! position-addressed sequence that can be rewritten in place.

pub mod config;
pub mod domain;
pub mod tree_traits;
pub mod util;

pub use domain::{
    DataHandle, GroupVariable, LeafVariable, SetDataPolicy, Variable, VariableError,
    VariableResult,
};
