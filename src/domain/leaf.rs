//! Leaf variable holding payload handles directly

use std::io::Write;

use tracing::{debug, instrument};

use crate::domain::error::{VariableError, VariableResult};
use crate::domain::handle::DataHandle;
use crate::domain::variable::Variable;

/// Variable that owns its payload handles.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafVariable {
    name: String,
    comment: Option<String>,
    reference: bool,
    data: Vec<DataHandle>,
}

impl LeafVariable {
    pub fn new(name: impl Into<String>, data: Vec<DataHandle>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            reference: false,
            data,
        }
    }

    /// Leaf flagged as a reference variable.
    pub fn reference(name: impl Into<String>, data: Vec<DataHandle>) -> Self {
        Self {
            reference: true,
            ..Self::new(name, data)
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn handles(&self) -> &[DataHandle] {
        &self.data
    }

    fn metadata_copy(&self, name: &str, data: Vec<DataHandle>) -> Self {
        Self {
            name: name.to_string(),
            comment: self.comment.clone(),
            reference: self.reference,
            data,
        }
    }
}

impl Variable for LeafVariable {
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
        false
    }

    fn data(&self) -> Vec<DataHandle> {
        self.data.clone()
    }

    #[instrument(level = "trace", skip(self, data), fields(leaf = %self.name))]
    fn set_data(&mut self, data: Vec<DataHandle>) -> VariableResult<()> {
        if data.len() != self.data.len() {
            return Err(VariableError::LengthMismatch {
                name: self.name.clone(),
                expected: self.data.len(),
                actual: data.len(),
            });
        }
        debug!("replacing {} handles", data.len());
        self.data = data;
        Ok(())
    }

    fn print_standard(&self, out: &mut dyn Write) -> VariableResult<()> {
        for handle in &self.data {
            writeln!(out, "{}.{}", self.name, handle)?;
        }
        Ok(())
    }

    fn print_verbose(&self, out: &mut dyn Write) -> VariableResult<()> {
        writeln!(out, "Variable: {}", self.name)?;
        if let Some(comment) = &self.comment {
            writeln!(out, "\tDescription: {}", comment)?;
        }
        if self.reference {
            writeln!(out, "\tReference: yes")?;
        }
        for handle in &self.data {
            writeln!(out, "\t{}", handle)?;
        }
        Ok(())
    }

    fn copy_named(&self, name: &str) -> Box<dyn Variable> {
        Box::new(self.metadata_copy(name, self.data.clone()))
    }

    fn shape_named(&self, name: &str) -> Box<dyn Variable> {
        let zeroed = self.data.iter().map(DataHandle::zeroed).collect();
        Box::new(self.metadata_copy(name, zeroed))
    }

    fn flattened_len(&self) -> usize {
        self.data.len()
    }
}
