//! Opaque payload unit exchanged between groups and leaves

use std::fmt;
use std::rc::Rc;

/// One unit of leaf payload, e.g. the values of a single field.
///
/// Cloning is cheap: the value buffer is reference counted, so a clone
/// refers to the same values as the original.
#[derive(Debug, Clone, PartialEq)]
pub struct DataHandle {
    field: String,
    values: Rc<[f64]>,
}

impl DataHandle {
    pub fn new(field: impl Into<String>, values: impl Into<Rc<[f64]>>) -> Self {
        Self {
            field: field.into(),
            values: values.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if both handles point at the same value buffer.
    pub fn same_buffer(&self, other: &DataHandle) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }

    /// Same field and layout with every value set to zero.
    pub fn zeroed(&self) -> Self {
        Self {
            field: self.field.clone(),
            values: vec![0.0; self.values.len()].into(),
        }
    }
}

impl fmt::Display for DataHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.field)?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}
