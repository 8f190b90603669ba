//! Dataset shape contracts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FieldValidationError;

/// Ordered dimension sizes; `None` accepts any size along that axis.
///
/// An empty shape declares a scalar dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(pub Vec<Option<usize>>);

impl Shape {
    pub fn new(dims: Vec<Option<usize>>) -> Self {
        Self(dims)
    }

    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    /// Shape with `rank` unconstrained dimensions.
    pub fn any_of_rank(rank: usize) -> Self {
        Self(vec![None; rank])
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Check fully known dimension sizes.
    pub fn check(&self, field: &str, dims: &[usize]) -> Result<(), FieldValidationError> {
        let known: Vec<Option<usize>> = dims.iter().copied().map(Some).collect();
        self.check_partial(field, &known)
    }

    /// Check dimensions of which some sizes may not be known yet.
    pub fn check_partial(
        &self,
        field: &str,
        dims: &[Option<usize>],
    ) -> Result<(), FieldValidationError> {
        if dims.len() != self.rank() {
            return Err(FieldValidationError::RankMismatch {
                field: field.to_string(),
                expected: self.rank(),
                found: dims.len(),
            });
        }
        for (axis, (declared, actual)) in self.0.iter().zip(dims).enumerate() {
            if let (Some(expected), Some(found)) = (declared, actual) {
                if expected != found {
                    return Err(FieldValidationError::ShapeMismatch {
                        field: field.to_string(),
                        axis,
                        expected: *expected,
                        found: *found,
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether this shape is at least as strict as `parent`.
    pub fn refines(&self, parent: &Shape) -> bool {
        self.rank() == parent.rank()
            && self.0.iter().zip(&parent.0).all(|(mine, theirs)| match theirs {
                Some(size) => *mine == Some(*size),
                None => true,
            })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self
            .0
            .iter()
            .map(|d| d.map(|n| n.to_string()).unwrap_or_else(|| "*".to_string()))
            .collect();
        write!(f, "({})", dims.join(", "))
    }
}
