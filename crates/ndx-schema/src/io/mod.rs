//! Serialization boundary between container trees and hierarchical storage.
//!
//! Storage layout for a container at path `P`:
//!
//! - type tag attributes `namespace`, `namespace_version`, `neurodata_type` on `P`
//! - scalar attributes on `P`
//! - untyped datasets at `P/<field>`, nested attributes on the dataset
//! - child slots as a plain group `P/<slot>` holding each child by name
//! - single links as a soft link `P/<field>`; link collections as a plain
//!   group `P/<field>` of soft links named `0`, `1`, ... in order
//! - on dataset-like types, links become reference attributes
//!
//! The root container is stored at `/` and reads back with the name `root`.

mod memory;
mod reader;
mod store;
mod writer;

pub use memory::MemoryStore;
pub use reader::{read, read_with, ReadOptions, UnknownNodePolicy};
pub use store::{join_path, split_path, HierarchicalStore, RawNode, StoredData, StoredValue};
pub use writer::write;

pub const ATTR_NAMESPACE: &str = "namespace";
pub const ATTR_NAMESPACE_VERSION: &str = "namespace_version";
pub const ATTR_NEURODATA_TYPE: &str = "neurodata_type";

/// Attribute names reserved for the type tag.
pub const TAG_ATTRIBUTES: [&str; 3] = [ATTR_NAMESPACE, ATTR_NAMESPACE_VERSION, ATTR_NEURODATA_TYPE];

pub const ROOT_NAME: &str = "root";
