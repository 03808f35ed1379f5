//! The capability every node of a variable tree implements

use std::fmt;
use std::io::Write;

use crate::domain::error::VariableResult;
use crate::domain::group::GroupVariable;
use crate::domain::handle::DataHandle;

/// A node in a variable tree: either a leaf owning payload or a group of
/// named children.
///
/// `data` and `set_data` form the flatten-then-rewrite contract: the
/// sequence returned by `data` is flat, and each position identifies one
/// payload slot. `set_data` must accept any sequence with the same layout.
pub trait Variable: fmt::Debug {
    fn name(&self) -> &str;

    fn comment(&self) -> Option<&str>;

    /// True if this variable does not own independent storage.
    fn is_reference(&self) -> bool;

    fn is_group(&self) -> bool;

    /// Flattened payload of this node in canonical order.
    fn data(&self) -> Vec<DataHandle>;

    /// Overwrites the payload slots with `data`.
    fn set_data(&mut self, data: Vec<DataHandle>) -> VariableResult<()>;

    fn print_standard(&self, out: &mut dyn Write) -> VariableResult<()>;

    fn print_verbose(&self, out: &mut dyn Write) -> VariableResult<()>;

    /// New variable named `name` sharing this one's metadata.
    fn copy_named(&self, name: &str) -> Box<dyn Variable>;

    /// New variable named `name` with the same layout as this one.
    fn shape_named(&self, name: &str) -> Box<dyn Variable>;

    fn as_group(&self) -> Option<&GroupVariable> {
        None
    }

    /// Number of payload slots `data` would return.
    fn flattened_len(&self) -> usize {
        self.data().len()
    }
}
