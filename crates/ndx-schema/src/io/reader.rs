//! Storage to tree.
//!
//! Reading happens in three passes over the raw node tree: containers are
//! built bottom-up without their links, links are then resolved by path, and
//! finally every container is checked for required links. Any failure drops
//! the partially built tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::{join_path, HierarchicalStore, RawNode, StoredData, StoredValue};
use super::{ATTR_NAMESPACE, ATTR_NAMESPACE_VERSION, ATTR_NEURODATA_TYPE, ROOT_NAME, TAG_ATTRIBUTES};
use crate::container::{ContainerId, ContainerTree, FieldValue, FieldValues};
use crate::registry::{ResolvedType, TypeRegistry};
use crate::spec::{FieldSpec, SpecKind};
use crate::value::{DatasetData, DatasetValue};
use crate::{FieldValidationError, SerializationError};
use std::sync::Arc;

/// What to do with stored nodes and attributes the schema does not declare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownNodePolicy {
    #[default]
    Error,
    /// Skip them and log a warning.
    Warn,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub unknown_nodes: UnknownNodePolicy,
}

impl ReadOptions {
    pub fn lenient() -> Self {
        Self {
            unknown_nodes: UnknownNodePolicy::Warn,
        }
    }
}

/// Read the whole store with default options.
pub fn read<S: HierarchicalStore + ?Sized>(
    store: &S,
    registry: &TypeRegistry,
) -> Result<(ContainerTree, ContainerId), SerializationError> {
    read_with(store, registry, ReadOptions::default())
}

/// Read the whole store; the root container is named `root`.
pub fn read_with<S: HierarchicalStore + ?Sized>(
    store: &S,
    registry: &TypeRegistry,
    options: ReadOptions,
) -> Result<(ContainerTree, ContainerId), SerializationError> {
    let raw = store.read_root()?;
    let mut reader = Reader {
        registry,
        options,
        tree: ContainerTree::new(),
        paths: IndexMap::new(),
        pending: Vec::new(),
    };

    let root = reader.build(&raw, "/", ROOT_NAME)?;
    reader.resolve_links()?;
    for (path, id) in &reader.paths {
        reader
            .tree
            .check_required_links(*id)
            .map_err(|source| validation(path, source))?;
    }
    debug!(containers = reader.tree.len(), "Read container tree");
    Ok((reader.tree, root))
}

struct PendingLink {
    holder: ContainerId,
    holder_path: String,
    field: String,
    targets: Vec<String>,
    many: bool,
}

struct Reader<'a> {
    registry: &'a TypeRegistry,
    options: ReadOptions,
    tree: ContainerTree,
    paths: IndexMap<String, ContainerId>,
    pending: Vec<PendingLink>,
}

fn validation(path: &str, source: FieldValidationError) -> SerializationError {
    SerializationError::Validation {
        path: path.to_string(),
        source,
    }
}

fn corrupt(path: &str, message: impl Into<String>) -> SerializationError {
    SerializationError::Corrupt {
        path: path.to_string(),
        message: message.into(),
    }
}

fn stored_to_data(data: &StoredData) -> DatasetData {
    match data {
        StoredData::Scalar(v) => DatasetData::Scalar(v.clone()),
        StoredData::Array(a) => DatasetData::Array(a.clone()),
    }
}

impl<'a> Reader<'a> {
    fn unknown(&self, path: &str, what: &str) -> Result<(), SerializationError> {
        match self.options.unknown_nodes {
            UnknownNodePolicy::Error => Err(corrupt(path, format!("undeclared {}", what))),
            UnknownNodePolicy::Warn => {
                warn!(path, what, "Skipping undeclared node");
                Ok(())
            }
        }
    }

    /// Resolve the type tag stored on a typed node.
    fn resolve_tag(
        &self,
        path: &str,
        attributes: &IndexMap<String, StoredValue>,
    ) -> Result<Arc<ResolvedType>, SerializationError> {
        let tag = |name: &str| {
            attributes
                .get(name)
                .and_then(StoredValue::as_text)
                .ok_or_else(|| corrupt(path, format!("missing '{}' tag", name)))
        };
        let namespace = tag(ATTR_NAMESPACE)?;
        let stored_version = tag(ATTR_NAMESPACE_VERSION)?;
        let type_name = tag(ATTR_NEURODATA_TYPE)?;

        let installed = self
            .registry
            .namespace(namespace)
            .ok_or_else(|| SerializationError::UnknownNamespace(namespace.to_string()))?;
        if installed.version != stored_version {
            return Err(SerializationError::NamespaceVersionMismatch {
                namespace: namespace.to_string(),
                stored: stored_version.to_string(),
                installed: installed.version.clone(),
            });
        }
        self.registry
            .resolve_qualified(namespace, type_name)
            .map_err(|_| SerializationError::UnknownType {
                namespace: namespace.to_string(),
                type_name: type_name.to_string(),
            })
    }

    fn build(&mut self, node: &RawNode, path: &str, name: &str) -> Result<ContainerId, SerializationError> {
        let attributes = node
            .attributes()
            .ok_or_else(|| corrupt(path, "expected a typed group or dataset, found a soft link"))?;
        let resolved = self.resolve_tag(path, attributes)?;

        let mut values = FieldValues::new();
        let mut links = Vec::new();

        match (resolved.kind, node) {
            (SpecKind::Group, RawNode::Group { children, .. }) => {
                for (child_name, child) in children {
                    let child_path = join_path(path, child_name);
                    self.read_member(&resolved, child_name, child, &child_path, &mut values, &mut links)?;
                }
            }
            (SpecKind::Dataset, RawNode::Dataset { data, .. }) => {
                values.insert(
                    crate::DATA_FIELD,
                    FieldValue::Data(DatasetValue::new(stored_to_data(data))),
                );
            }
            (kind, other) => {
                return Err(corrupt(
                    path,
                    format!(
                        "{} is a {:?} type but is stored as a {}",
                        resolved.name,
                        kind,
                        other.kind_name()
                    ),
                ))
            }
        }

        for (attr_name, value) in attributes {
            if TAG_ATTRIBUTES.contains(&attr_name.as_str()) {
                continue;
            }
            match (resolved.field(attr_name), value) {
                (Some(FieldSpec::Attribute(_)), StoredValue::Scalar(v)) => {
                    values.insert(attr_name.clone(), FieldValue::Scalar(v.clone()));
                }
                (Some(FieldSpec::Link(_)), StoredValue::Reference(t)) => {
                    links.push((attr_name.clone(), vec![t.clone()], false));
                }
                (Some(FieldSpec::Link(_)), StoredValue::ReferenceList(ts)) => {
                    links.push((attr_name.clone(), ts.clone(), true));
                }
                (Some(_), _) => {
                    return Err(corrupt(path, format!("attribute '{}' has the wrong form", attr_name)))
                }
                (None, _) => self.unknown(path, &format!("attribute '{}'", attr_name))?,
            }
        }

        let id = self
            .tree
            .construct_unlinked(Arc::clone(&resolved), name, values)
            .map_err(|source| validation(path, source))?;
        self.paths.insert(path.to_string(), id);
        for (field, targets, many) in links {
            self.pending.push(PendingLink {
                holder: id,
                holder_path: path.to_string(),
                field,
                targets,
                many,
            });
        }
        Ok(id)
    }

    /// One child node of a typed group: a dataset, a child slot or a link.
    fn read_member(
        &mut self,
        resolved: &ResolvedType,
        member: &str,
        node: &RawNode,
        path: &str,
        values: &mut FieldValues,
        links: &mut Vec<(String, Vec<String>, bool)>,
    ) -> Result<(), SerializationError> {
        match (resolved.field(member), node) {
            (Some(FieldSpec::Dataset(_)), RawNode::Dataset { attributes, data }) => {
                let mut value = DatasetValue::new(stored_to_data(data));
                for (name, attr) in attributes {
                    let v = attr
                        .as_scalar()
                        .ok_or_else(|| corrupt(path, format!("attribute '{}' is not a scalar", name)))?;
                    value.attributes.insert(name.clone(), v.clone());
                }
                values.insert(member, FieldValue::Data(value));
            }
            (Some(FieldSpec::Group(slot)), RawNode::Group { attributes, children }) => {
                if !attributes.is_empty() {
                    return Err(corrupt(path, "child slot groups carry no attributes"));
                }
                let mut ids = Vec::new();
                for (child_name, child) in children {
                    ids.push(self.build(child, &join_path(path, child_name), child_name)?);
                }
                let value = match (slot.quantity.allows_many(), ids.as_slice()) {
                    (false, [single]) => FieldValue::Child(*single),
                    _ => FieldValue::Children(ids),
                };
                values.insert(member, value);
            }
            (Some(FieldSpec::Link(_)), RawNode::SoftLink { target }) => {
                links.push((member.to_string(), vec![target.clone()], false));
            }
            (Some(FieldSpec::Link(_)), RawNode::Group { children, .. }) => {
                let mut ordered = Vec::new();
                for (index, child) in children {
                    let position = index
                        .parse::<usize>()
                        .ok()
                        .filter(|p| p.to_string() == *index)
                        .ok_or_else(|| corrupt(path, format!("link entry '{}' is not an index", index)))?;
                    match child {
                        RawNode::SoftLink { target } => ordered.push((position, target.clone())),
                        other => {
                            return Err(corrupt(
                                path,
                                format!("link entry '{}' is a {}", index, other.kind_name()),
                            ))
                        }
                    }
                }
                ordered.sort_by_key(|(position, _)| *position);
                if ordered.iter().enumerate().any(|(i, (position, _))| i != *position) {
                    return Err(corrupt(
                        path,
                        format!("entries of link '{}' are not numbered 0..{}", member, ordered.len()),
                    ));
                }
                links.push((member.to_string(), ordered.into_iter().map(|(_, t)| t).collect(), true));
            }
            (Some(spec), other) => {
                return Err(corrupt(
                    path,
                    format!("{} '{}' is stored as a {}", spec.category(), member, other.kind_name()),
                ))
            }
            (None, _) => self.unknown(path, &format!("{} '{}'", node.kind_name(), member))?,
        }
        Ok(())
    }

    fn resolve_links(&mut self) -> Result<(), SerializationError> {
        for link in std::mem::take(&mut self.pending) {
            let mut ids = Vec::with_capacity(link.targets.len());
            for target in &link.targets {
                let id = self.paths.get(target).ok_or_else(|| SerializationError::DanglingLink {
                    path: link.holder_path.clone(),
                    field: link.field.clone(),
                })?;
                ids.push(*id);
            }

            let result = match (link.many, ids.as_slice()) {
                (false, [single]) => self.tree.set_link(link.holder, &link.field, *single),
                _ => self.tree.set_links(link.holder, &link.field, ids),
            };
            result.map_err(|source| validation(&link.holder_path, source))?;
        }
        Ok(())
    }
}
