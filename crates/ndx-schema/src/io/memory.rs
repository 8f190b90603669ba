//! In-memory store, persisted as a JSON document.

use indexmap::IndexMap;
use std::fs;
use std::path::Path;

use super::store::{split_path, HierarchicalStore, RawNode, StoredData, StoredValue};
use crate::SerializationError;

/// A [`HierarchicalStore`] holding the whole tree in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryStore {
    root: RawNode,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: RawNode::empty_group(),
        }
    }

    pub fn from_root(root: RawNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &RawNode {
        &self.root
    }

    /// Node at `path`, if any.
    pub fn node(&self, path: &str) -> Option<&RawNode> {
        let mut current = &self.root;
        for segment in split_path(path) {
            match current {
                RawNode::Group { children, .. } => current = children.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        let root: RawNode = serde_json::from_str(json).map_err(|e| SerializationError::Corrupt {
            path: "/".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(root, RawNode::Group { .. }) {
            return Err(SerializationError::Corrupt {
                path: "/".to_string(),
                message: format!("root is a {}, expected a group", root.kind_name()),
            });
        }
        Ok(Self { root })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SerializationError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, SerializationError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn storage_error(path: &str, message: impl Into<String>) -> SerializationError {
        SerializationError::Storage {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Children of the group that will hold `path`, and the last segment.
    fn parent_children<'a>(
        &mut self,
        path: &'a str,
    ) -> Result<(&mut IndexMap<String, RawNode>, &'a str), SerializationError> {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(Self::storage_error(path, "the root cannot be replaced"));
        };

        let mut current = &mut self.root;
        for segment in parents {
            current = match current {
                RawNode::Group { children, .. } => children
                    .get_mut(*segment)
                    .ok_or_else(|| Self::storage_error(path, format!("missing parent '{}'", segment)))?,
                other => {
                    return Err(Self::storage_error(
                        path,
                        format!("'{}' is a {}, not a group", segment, other.kind_name()),
                    ))
                }
            };
        }
        match current {
            RawNode::Group { children, .. } => Ok((children, last)),
            other => Err(Self::storage_error(
                path,
                format!("parent is a {}, not a group", other.kind_name()),
            )),
        }
    }

    fn insert_new(&mut self, path: &str, node: RawNode) -> Result<(), SerializationError> {
        let (children, name) = self.parent_children(path)?;
        if children.contains_key(name) {
            return Err(Self::storage_error(path, "node already exists"));
        }
        children.insert(name.to_string(), node);
        Ok(())
    }
}

impl HierarchicalStore for MemoryStore {
    fn create_group(&mut self, path: &str) -> Result<(), SerializationError> {
        if split_path(path).is_empty() {
            return Ok(());
        }
        let (children, name) = self.parent_children(path)?;
        match children.get(name) {
            Some(RawNode::Group { .. }) => Ok(()),
            Some(other) => Err(Self::storage_error(
                path,
                format!("a {} already exists here", other.kind_name()),
            )),
            None => {
                children.insert(name.to_string(), RawNode::empty_group());
                Ok(())
            }
        }
    }

    fn create_dataset(&mut self, path: &str, data: StoredData) -> Result<(), SerializationError> {
        self.insert_new(
            path,
            RawNode::Dataset {
                attributes: IndexMap::new(),
                data,
            },
        )
    }

    fn set_attribute(
        &mut self,
        path: &str,
        name: &str,
        value: StoredValue,
    ) -> Result<(), SerializationError> {
        let node = if split_path(path).is_empty() {
            &mut self.root
        } else {
            let (children, last) = self.parent_children(path)?;
            children
                .get_mut(last)
                .ok_or_else(|| Self::storage_error(path, "no such node"))?
        };
        match node {
            RawNode::Group { attributes, .. } | RawNode::Dataset { attributes, .. } => {
                attributes.insert(name.to_string(), value);
                Ok(())
            }
            RawNode::SoftLink { .. } => Err(Self::storage_error(path, "soft links carry no attributes")),
        }
    }

    fn create_soft_link(&mut self, path: &str, target: &str) -> Result<(), SerializationError> {
        self.insert_new(
            path,
            RawNode::SoftLink {
                target: target.to_string(),
            },
        )
    }

    fn read_root(&self) -> Result<RawNode, SerializationError> {
        Ok(self.root.clone())
    }
}
