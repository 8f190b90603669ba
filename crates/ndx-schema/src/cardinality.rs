//! Multiplicity contracts for fields, links and child slots.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCardinality {
    /// Exactly one value.
    #[default]
    Required,
    /// Zero or one value.
    Optional,
    /// Any number of values, insertion order preserved.
    ZeroOrMore,
    /// At least one value, insertion order preserved.
    OneOrMore,
}

impl FieldCardinality {
    pub fn is_required(&self) -> bool {
        matches!(self, FieldCardinality::Required | FieldCardinality::OneOrMore)
    }

    pub fn allows_many(&self) -> bool {
        matches!(self, FieldCardinality::ZeroOrMore | FieldCardinality::OneOrMore)
    }

    /// Whether `count` values satisfy this cardinality.
    pub fn accepts_count(&self, count: usize) -> bool {
        match self {
            FieldCardinality::Required => count == 1,
            FieldCardinality::Optional => count <= 1,
            FieldCardinality::ZeroOrMore => true,
            FieldCardinality::OneOrMore => count >= 1,
        }
    }

    /// Ordering used to detect an override that weakens a requirement.
    pub fn weakens(&self, parent: &FieldCardinality) -> bool {
        parent.is_required() && !self.is_required()
    }
}

impl fmt::Display for FieldCardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldCardinality::Required => "exactly-one",
            FieldCardinality::Optional => "optional",
            FieldCardinality::ZeroOrMore => "zero-or-more",
            FieldCardinality::OneOrMore => "one-or-more",
        };
        f.write_str(s)
    }
}
