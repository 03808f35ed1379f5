use termtree::Tree;
use tracing::instrument;

use crate::domain::{GroupVariable, Variable};

/// Renders a variable tree for structural inspection.
pub trait VariableTreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<'a> VariableTreeConvert for dyn Variable + 'a {
    fn to_tree_string(&self) -> Tree<String> {
        match self.as_group() {
            Some(group) => group.to_tree_string(),
            None => Tree::new(format!("{} ({} handles)", self.name(), self.flattened_len())),
        }
    }
}

impl VariableTreeConvert for GroupVariable {
    #[instrument(level = "debug", skip(self), fields(group = %self.name()))]
    fn to_tree_string(&self) -> Tree<String> {
        let mut leaves = Vec::with_capacity(self.len());
        self.visit_children(|child| leaves.push(child.to_tree_string()));
        Tree::new(self.name().to_string()).with_leaves(leaves)
    }
}
