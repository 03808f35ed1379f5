//! Group variable: a named composite of child variables
//!
//! Children are kept in a name-ordered map. That order is the canonical
//! order for printing, flattening and rewriting, so the flat sequence
//! returned by [`Variable::data`] can be fed back into
//! [`Variable::set_data`] slot for slot.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::error::{VariableError, VariableResult};
use crate::domain::handle::DataHandle;
use crate::domain::variable::Variable;

/// Child mapping that may be shared between several groups.
///
/// Groups created with [`GroupVariable::shape_group`] hold a clone of the
/// same `Rc`: adding a child through one of them is visible through all.
pub type SharedChildren = Rc<RefCell<BTreeMap<String, Box<dyn Variable>>>>;

/// How [`GroupVariable`] treats a data sequence whose length differs from
/// its flattened length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetDataPolicy {
    /// Reject any length mismatch before touching a child.
    #[default]
    Strict,
    /// Ignore surplus trailing handles; a short sequence fails once the
    /// first child that does not fit is reached, earlier children keep the
    /// new data.
    Lenient,
}

#[derive(Debug)]
pub struct GroupVariable {
    name: String,
    comment: Option<String>,
    /// Region this group addresses
    region: Option<String>,
    children: SharedChildren,
    reference: bool,
    /// Region made of subregions
    region_group: bool,
    /// Single region and field sampled over time
    time_group: bool,
    policy: SetDataPolicy,
}

impl Default for GroupVariable {
    fn default() -> Self {
        Self::new("")
    }
}

impl GroupVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            region: None,
            children: Rc::new(RefCell::new(BTreeMap::new())),
            reference: true,
            region_group: false,
            time_group: false,
            policy: SetDataPolicy::default(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn region_group(mut self, yes: bool) -> Self {
        self.region_group = yes;
        self
    }

    pub fn time_group(mut self, yes: bool) -> Self {
        self.time_group = yes;
        self
    }

    pub fn with_policy(mut self, policy: SetDataPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn is_region_group(&self) -> bool {
        self.region_group
    }

    pub fn is_time_group(&self) -> bool {
        self.time_group
    }

    pub fn policy(&self) -> SetDataPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.borrow().contains_key(name)
    }

    /// Child names in canonical order.
    pub fn child_names(&self) -> Vec<String> {
        self.children.borrow().keys().cloned().collect()
    }

    /// Calls `f` on every child in canonical order.
    pub fn visit_children(&self, mut f: impl FnMut(&dyn Variable)) {
        for child in self.children.borrow().values() {
            f(child.as_ref());
        }
    }

    /// True if both groups see the same child mapping.
    pub fn shares_children_with(&self, other: &GroupVariable) -> bool {
        Rc::ptr_eq(&self.children, &other.children)
    }

    /// Inserts `variable` under its own name, replacing any child of that name.
    ///
    /// Adding a non-reference variable clears this group's reference flag for
    /// good. A variable whose subtree already owns this group's children is
    /// rejected, since the tree would then contain itself.
    #[instrument(level = "debug", skip(self, variable), fields(group = %self.name, child = %variable.name()))]
    pub fn add_data(&mut self, variable: Box<dyn Variable>) -> VariableResult<()> {
        if self.is_reachable_from(variable.as_ref()) {
            warn!("rejecting {}: would create a cycle", variable.name());
            return Err(VariableError::CycleDetected(variable.name().to_string()));
        }
        if !variable.is_reference() {
            self.reference = false;
        }
        let name = variable.name().to_string();
        if self
            .children
            .borrow_mut()
            .insert(name.clone(), variable)
            .is_some()
        {
            debug!("replaced existing child {}", name);
        }
        Ok(())
    }

    fn is_reachable_from(&self, candidate: &dyn Variable) -> bool {
        let mut visited = HashSet::new();
        self.reaches(candidate, &mut visited)
    }

    /// Walks each child map at most once; shapes make the tree a DAG.
    fn reaches(
        &self,
        candidate: &dyn Variable,
        visited: &mut HashSet<*const RefCell<BTreeMap<String, Box<dyn Variable>>>>,
    ) -> bool {
        let Some(group) = candidate.as_group() else {
            return false;
        };
        if self.shares_children_with(group) {
            return true;
        }
        if !visited.insert(Rc::as_ptr(&group.children)) {
            return false;
        }
        group
            .children
            .borrow()
            .values()
            .any(|child| self.reaches(child.as_ref(), visited))
    }

    fn with_children(&self, name: &str, children: SharedChildren) -> Self {
        Self {
            name: name.to_string(),
            comment: self.comment.clone(),
            region: self.region.clone(),
            children,
            reference: self.reference,
            region_group: self.region_group,
            time_group: self.time_group,
            policy: self.policy,
        }
    }

    /// Same metadata under a new name, with no children.
    pub fn copy_group(&self, name: &str) -> Self {
        self.with_children(name, Rc::new(RefCell::new(BTreeMap::new())))
    }

    /// Same metadata under a new name, aliasing this group's children.
    pub fn shape_group(&self, name: &str) -> Self {
        self.with_children(name, Rc::clone(&self.children))
    }
}

impl Variable for GroupVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn is_reference(&self) -> bool {
        self.reference
    }

    fn is_group(&self) -> bool {
        true
    }

    #[instrument(level = "trace", skip(self), fields(group = %self.name))]
    fn data(&self) -> Vec<DataHandle> {
        self.children
            .borrow()
            .values()
            .flat_map(|child| child.data())
            .collect()
    }

    #[instrument(level = "debug", skip(self, data), fields(group = %self.name, len = data.len()))]
    fn set_data(&mut self, data: Vec<DataHandle>) -> VariableResult<()> {
        if self.policy == SetDataPolicy::Strict {
            let expected = self.flattened_len();
            if data.len() != expected {
                return Err(VariableError::LengthMismatch {
                    name: self.name.clone(),
                    expected,
                    actual: data.len(),
                });
            }
        }

        let mut offset = 0;
        for child in self.children.borrow_mut().values_mut() {
            let end = offset + child.flattened_len();
            let Some(slice) = data.get(offset..end) else {
                warn!(
                    "data exhausted at {}: needed {}, got {}",
                    child.name(),
                    end,
                    data.len()
                );
                return Err(VariableError::OutOfBounds {
                    needed: end,
                    available: data.len(),
                });
            };
            child.set_data(slice.to_vec())?;
            offset = end;
        }

        if offset < data.len() {
            debug!("ignoring {} trailing handles", data.len() - offset);
        }
        Ok(())
    }

    fn print_standard(&self, out: &mut dyn Write) -> VariableResult<()> {
        for child in self.children.borrow().values() {
            child.print_standard(out)?;
        }
        Ok(())
    }

    fn print_verbose(&self, out: &mut dyn Write) -> VariableResult<()> {
        writeln!(out, "Group: {}", self.name)?;
        if let Some(comment) = &self.comment {
            writeln!(out, "\tDescription: {}", comment)?;
        }
        for child in self.children.borrow().values() {
            child.print_verbose(out)?;
        }
        writeln!(out, "End of Group: {}", self.name)?;
        Ok(())
    }

    fn copy_named(&self, name: &str) -> Box<dyn Variable> {
        Box::new(self.copy_group(name))
    }

    fn shape_named(&self, name: &str) -> Box<dyn Variable> {
        Box::new(self.shape_group(name))
    }

    fn as_group(&self) -> Option<&GroupVariable> {
        Some(self)
    }

    fn flattened_len(&self) -> usize {
        self.children
            .borrow()
            .values()
            .map(|child| child.flattened_len())
            .sum()
    }
}
