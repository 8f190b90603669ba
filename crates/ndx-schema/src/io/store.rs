//! Storage collaborator interface.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dtype::Value;
use crate::value::ArrayData;
use crate::SerializationError;

/// Attribute value as persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    Scalar(Value),
    /// Absolute path of a referenced node.
    Reference(String),
    ReferenceList(Vec<String>),
}

impl StoredValue {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            StoredValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }
}

/// Dataset payload as persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredData {
    Scalar(Value),
    Array(ArrayData),
}

/// A node of the persisted tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum RawNode {
    Group {
        #[serde(default)]
        attributes: IndexMap<String, StoredValue>,
        #[serde(default)]
        children: IndexMap<String, RawNode>,
    },
    Dataset {
        #[serde(default)]
        attributes: IndexMap<String, StoredValue>,
        data: StoredData,
    },
    SoftLink {
        target: String,
    },
}

impl RawNode {
    pub fn empty_group() -> Self {
        RawNode::Group {
            attributes: IndexMap::new(),
            children: IndexMap::new(),
        }
    }

    pub fn attributes(&self) -> Option<&IndexMap<String, StoredValue>> {
        match self {
            RawNode::Group { attributes, .. } | RawNode::Dataset { attributes, .. } => Some(attributes),
            RawNode::SoftLink { .. } => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            RawNode::Group { .. } => "group",
            RawNode::Dataset { .. } => "dataset",
            RawNode::SoftLink { .. } => "soft link",
        }
    }
}

/// Hierarchical storage: groups, datasets, attributes and soft links
/// addressed by absolute `/`-separated paths.
pub trait HierarchicalStore {
    /// Create a group; the parent must exist. Creating an existing group is a no-op.
    fn create_group(&mut self, path: &str) -> Result<(), SerializationError>;

    fn create_dataset(&mut self, path: &str, data: StoredData) -> Result<(), SerializationError>;

    fn set_attribute(
        &mut self,
        path: &str,
        name: &str,
        value: StoredValue,
    ) -> Result<(), SerializationError>;

    fn create_soft_link(&mut self, path: &str, target: &str) -> Result<(), SerializationError>;

    /// The whole persisted tree, rooted at `/`.
    fn read_root(&self) -> Result<RawNode, SerializationError>;
}

/// Join a child name onto an absolute path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Split an absolute path into its segments; `/` has none.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
