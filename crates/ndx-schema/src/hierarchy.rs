//! Type inheritance graph.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::SchemaDefinitionError;

/// Inheritance edges between type names: child `extends` parent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeHierarchy {
    parent_map: IndexMap<String, String>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `child extends parent`.
    pub fn add_subtype(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        self.parent_map.insert(child.into(), parent.into());
    }

    /// Reflexive, transitive subtype check.
    pub fn is_subtype(&self, child: &str, ancestor: &str) -> bool {
        if child == ancestor {
            return true;
        }

        let mut current = child;
        let mut seen = HashSet::new();
        while let Some(p) = self.parent_map.get(current) {
            if p == ancestor {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            current = p;
        }

        false
    }

    pub fn parent(&self, type_name: &str) -> Option<&str> {
        self.parent_map.get(type_name).map(|s| s.as_str())
    }

    /// Ancestors nearest first: parent, grandparent, ...
    pub fn ancestors(&self, type_name: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut current = type_name;

        while let Some(parent) = self.parent_map.get(current) {
            if parent == type_name || ancestors.contains(parent) {
                break;
            }
            ancestors.push(parent.clone());
            current = parent;
        }

        ancestors
    }

    /// Types that extend `type_name` directly or transitively.
    pub fn descendants(&self, type_name: &str) -> Vec<String> {
        self.parent_map
            .keys()
            .filter(|child| child.as_str() != type_name && self.is_subtype(child, type_name))
            .cloned()
            .collect()
    }

    /// Fails with the offending path if any chain of `extends` loops.
    pub fn validate_acyclic(&self) -> Result<(), SchemaDefinitionError> {
        for start in self.parent_map.keys() {
            let mut path = vec![start.clone()];
            let mut visited = HashSet::new();
            visited.insert(start.as_str());
            let mut current = start.as_str();

            while let Some(parent) = self.parent_map.get(current) {
                path.push(parent.clone());
                if !visited.insert(parent.as_str()) {
                    let loop_start = path.iter().position(|t| t == parent).unwrap_or(0);
                    return Err(SchemaDefinitionError::InheritanceCycle {
                        path: path[loop_start..].to_vec(),
                    });
                }
                current = parent;
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.parent_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_map.is_empty()
    }
}
