//! Tree to storage.

use indexmap::IndexMap;
use tracing::debug;

use super::store::{join_path, HierarchicalStore, StoredData, StoredValue};
use super::{ATTR_NAMESPACE, ATTR_NAMESPACE_VERSION, ATTR_NEURODATA_TYPE};
use crate::container::{ContainerId, ContainerTree, LinkTarget, TypedContainer};
use crate::spec::{FieldSpec, SpecKind};
use crate::value::{ArrayData, DatasetData};
use crate::{SerializationError, DATA_FIELD};

/// Write `root` and everything it owns.
///
/// Deferred arrays are assembled and every link target is located before
/// anything is handed to the store.
pub fn write<S: HierarchicalStore + ?Sized>(
    tree: &ContainerTree,
    root: ContainerId,
    store: &mut S,
) -> Result<(), SerializationError> {
    let root_node = tree.get(root).ok_or_else(|| SerializationError::Storage {
        path: "/".to_string(),
        message: format!("container {} is not in this tree", root),
    })?;
    if root_node.resolved().kind == SpecKind::Dataset {
        return Err(SerializationError::Storage {
            path: "/".to_string(),
            message: format!("root '{}' must be a group type", root_node.type_name()),
        });
    }

    let paths = storage_paths(tree, root);
    let materialized = materialize(tree, &paths)?;
    check_links(tree, &paths)?;

    for (id, path) in &paths {
        if let Some(container) = tree.get(*id) {
            write_container(*id, container, path, &paths, &materialized, store)?;
        }
    }
    debug!(containers = paths.len(), "Wrote container tree");
    Ok(())
}

/// Storage path of every container owned by `root`, pre-order.
fn storage_paths(tree: &ContainerTree, root: ContainerId) -> IndexMap<ContainerId, String> {
    let mut paths = IndexMap::new();
    let mut stack = vec![(root, "/".to_string())];
    while let Some((id, path)) = stack.pop() {
        let Some(container) = tree.get(id) else {
            continue;
        };
        let mut owned = Vec::new();
        for (relation, children) in container.relations() {
            let slot_path = join_path(&path, relation);
            for (name, child) in children {
                owned.push((*child, join_path(&slot_path, name)));
            }
        }
        paths.insert(id, path);
        owned.reverse();
        stack.extend(owned);
    }
    paths
}

type Materialized = IndexMap<(ContainerId, String), ArrayData>;

fn materialize(
    tree: &ContainerTree,
    paths: &IndexMap<ContainerId, String>,
) -> Result<Materialized, SerializationError> {
    let mut out = IndexMap::new();
    for (id, path) in paths {
        let Some(container) = tree.get(*id) else {
            continue;
        };
        for (field, value) in container.datasets() {
            let DatasetData::Deferred(deferred) = &value.data else {
                continue;
            };
            let validation = |source| SerializationError::Validation {
                path: join_path(path, field),
                source,
            };
            let array = deferred.materialize(field).map_err(validation)?;
            if let Some(FieldSpec::Dataset(spec)) = container.resolved().field(field) {
                spec.validate_materialized(&array).map_err(validation)?;
            }
            out.insert((*id, field.to_string()), array);
        }
    }
    Ok(out)
}

fn check_links(
    tree: &ContainerTree,
    paths: &IndexMap<ContainerId, String>,
) -> Result<(), SerializationError> {
    for (id, path) in paths {
        let Some(container) = tree.get(*id) else {
            continue;
        };
        for (field, target) in container.links() {
            if target.ids().iter().any(|t| !paths.contains_key(t)) {
                return Err(SerializationError::DanglingLink {
                    path: path.clone(),
                    field: field.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn stored_data(
    id: ContainerId,
    field: &str,
    data: &DatasetData,
    materialized: &Materialized,
) -> Result<StoredData, SerializationError> {
    match data {
        DatasetData::Scalar(v) => Ok(StoredData::Scalar(v.clone())),
        DatasetData::Array(a) => Ok(StoredData::Array(a.clone())),
        DatasetData::Deferred(_) => materialized
            .get(&(id, field.to_string()))
            .map(|a| StoredData::Array(a.clone()))
            .ok_or_else(|| SerializationError::Storage {
                path: field.to_string(),
                message: "deferred array was not materialized".to_string(),
            }),
    }
}

fn target_paths(target: &LinkTarget, paths: &IndexMap<ContainerId, String>) -> Vec<String> {
    target
        .ids()
        .iter()
        .filter_map(|t| paths.get(t).cloned())
        .collect()
}

fn write_container<S: HierarchicalStore + ?Sized>(
    id: ContainerId,
    container: &TypedContainer,
    path: &str,
    paths: &IndexMap<ContainerId, String>,
    materialized: &Materialized,
    store: &mut S,
) -> Result<(), SerializationError> {
    let resolved = container.resolved();

    match resolved.kind {
        SpecKind::Group => {
            store.create_group(path)?;
            for (field, value) in container.datasets() {
                let dataset_path = join_path(path, field);
                store.create_dataset(&dataset_path, stored_data(id, field, &value.data, materialized)?)?;
                for (name, attr) in &value.attributes {
                    store.set_attribute(&dataset_path, name, StoredValue::Scalar(attr.clone()))?;
                }
            }
            for (relation, _) in container.relations() {
                store.create_group(&join_path(path, relation))?;
            }
            for (field, target) in container.links() {
                let link_path = join_path(path, field);
                let targets = target_paths(target, paths);
                match target {
                    LinkTarget::One(_) => {
                        if let Some(t) = targets.first() {
                            store.create_soft_link(&link_path, t)?;
                        }
                    }
                    LinkTarget::Many(_) => {
                        store.create_group(&link_path)?;
                        for (i, t) in targets.iter().enumerate() {
                            store.create_soft_link(&join_path(&link_path, &i.to_string()), t)?;
                        }
                    }
                }
            }
        }
        SpecKind::Dataset => {
            let data = container
                .dataset(DATA_FIELD)
                .ok_or_else(|| SerializationError::Storage {
                    path: path.to_string(),
                    message: format!("{} has no data", container.type_name()),
                })?;
            store.create_dataset(path, stored_data(id, DATA_FIELD, &data.data, materialized)?)?;
            for (field, target) in container.links() {
                let targets = target_paths(target, paths);
                let value = match target {
                    LinkTarget::One(_) => match targets.into_iter().next() {
                        Some(t) => StoredValue::Reference(t),
                        None => continue,
                    },
                    LinkTarget::Many(_) => StoredValue::ReferenceList(targets),
                };
                store.set_attribute(path, field, value)?;
            }
        }
    }

    for (name, value) in container.attributes() {
        store.set_attribute(path, name, StoredValue::Scalar(value.clone()))?;
    }
    let tag = resolved.tag();
    store.set_attribute(path, ATTR_NAMESPACE, StoredValue::Scalar(tag.namespace.into()))?;
    store.set_attribute(
        path,
        ATTR_NAMESPACE_VERSION,
        StoredValue::Scalar(tag.namespace_version.into()),
    )?;
    store.set_attribute(
        path,
        ATTR_NEURODATA_TYPE,
        StoredValue::Scalar(tag.neurodata_type.into()),
    )?;
    Ok(())
}
