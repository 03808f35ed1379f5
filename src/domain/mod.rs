//! Domain layer: the variable tree and its payload
//!
//! This layer has no I/O beyond writing to a caller-supplied sink.

pub mod error;
pub mod group;
pub mod handle;
pub mod leaf;
pub mod variable;

pub use error::{VariableError, VariableResult};
pub use group::{GroupVariable, SetDataPolicy, SharedChildren};
pub use handle::DataHandle;
pub use leaf::LeafVariable;
pub use variable::Variable;
