//! Typed containers and the tree that owns them.
//!
//! Containers live in an arena and refer to each other by [`ContainerId`].
//! Ownership edges (child slots) form a forest; links are plain ids and may
//! point anywhere in the arena. Every mutation re-validates the field it
//! touches against the container's resolved type.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::dtype::Value;
use crate::registry::{ResolvedType, TypeRegistry};
use crate::spec::{FieldSpec, GroupSpec, LinkSpec};
use crate::value::{DatasetData, DatasetValue};
use crate::{AttachmentConflictError, Error, FieldValidationError};

/// Handle of a container inside one [`ContainerTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub(crate) usize);

impl ContainerId {
    /// Position in the owning arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A value supplied for one field at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    Data(DatasetValue),
    Link(ContainerId),
    Links(Vec<ContainerId>),
    Child(ContainerId),
    Children(Vec<ContainerId>),
}

impl FieldValue {
    fn describe(&self) -> &'static str {
        match self {
            FieldValue::Scalar(_) => "a scalar",
            FieldValue::Data(_) => "a dataset",
            FieldValue::Link(_) => "a link",
            FieldValue::Links(_) => "a link collection",
            FieldValue::Child(_) => "a child",
            FieldValue::Children(_) => "a child collection",
        }
    }
}

/// Stored link targets, single or ordered collection.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkTarget {
    One(ContainerId),
    Many(Vec<ContainerId>),
}

impl LinkTarget {
    /// Targets in order; a single link yields one id.
    pub fn ids(&self) -> &[ContainerId] {
        match self {
            LinkTarget::One(id) => std::slice::from_ref(id),
            LinkTarget::Many(ids) => ids,
        }
    }

    /// Whether the targets were given as a collection.
    pub fn is_many(&self) -> bool {
        matches!(self, LinkTarget::Many(_))
    }
}

/// Field values handed to [`ContainerTree::construct`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldValues {
    values: IndexMap<String, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of one field, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    /// Scalar attribute value.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, FieldValue::Scalar(value.into()));
        self
    }

    /// Scalar attribute value when present.
    pub fn maybe_attribute<V: Into<Value>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.attribute(name, v),
            None => self,
        }
    }

    /// Dataset value with its nested attributes.
    pub fn dataset(mut self, name: impl Into<String>, value: DatasetValue) -> Self {
        self.insert(name, FieldValue::Data(value));
        self
    }

    /// Dataset without nested attributes.
    pub fn data(self, name: impl Into<String>, data: impl Into<DatasetData>) -> Self {
        self.dataset(name, DatasetValue::new(data))
    }

    /// Single link target.
    pub fn link(mut self, name: impl Into<String>, target: ContainerId) -> Self {
        self.insert(name, FieldValue::Link(target));
        self
    }

    /// Single link target when present.
    pub fn maybe_link(self, name: impl Into<String>, target: Option<ContainerId>) -> Self {
        match target {
            Some(t) => self.link(name, t),
            None => self,
        }
    }

    /// Ordered link targets.
    pub fn links(mut self, name: impl Into<String>, targets: Vec<ContainerId>) -> Self {
        self.insert(name, FieldValue::Links(targets));
        self
    }

    /// Single child for a slot.
    pub fn child(mut self, slot: impl Into<String>, child: ContainerId) -> Self {
        self.insert(slot, FieldValue::Child(child));
        self
    }

    /// Single child for a slot when present.
    pub fn maybe_child(self, slot: impl Into<String>, child: Option<ContainerId>) -> Self {
        match child {
            Some(c) => self.child(slot, c),
            None => self,
        }
    }

    /// Children for a slot, kept in the given order.
    pub fn children(mut self, slot: impl Into<String>, children: Vec<ContainerId>) -> Self {
        self.insert(slot, FieldValue::Children(children));
        self
    }

    /// Value supplied for `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Runtime instance of a resolved type.
#[derive(Clone, Debug)]
pub struct TypedContainer {
    name: String,
    resolved: Arc<ResolvedType>,
    attributes: IndexMap<String, Value>,
    datasets: IndexMap<String, DatasetValue>,
    links: IndexMap<String, LinkTarget>,
    children: IndexMap<String, IndexMap<String, ContainerId>>,
    parent: Option<(ContainerId, String)>,
}

impl TypedContainer {
    fn new(name: &str, resolved: Arc<ResolvedType>) -> Self {
        Self {
            name: name.to_string(),
            resolved,
            attributes: IndexMap::new(),
            datasets: IndexMap::new(),
            links: IndexMap::new(),
            children: IndexMap::new(),
            parent: None,
        }
    }

    /// Name, unique among the siblings under the same relation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the resolved type.
    pub fn type_name(&self) -> &str {
        &self.resolved.name
    }

    /// Effective spec this container was validated against.
    pub fn resolved(&self) -> &Arc<ResolvedType> {
        &self.resolved
    }

    /// Whether the container's type is `ancestor` or extends it.
    pub fn is_a(&self, ancestor: &str) -> bool {
        self.resolved.is_a(ancestor)
    }

    /// Stored attribute value, including filled-in defaults.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Attributes in the order they were stored.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text attribute value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Value::as_str)
    }

    /// Stored dataset value.
    pub fn dataset(&self, name: &str) -> Option<&DatasetValue> {
        self.datasets.get(name)
    }

    /// Datasets in the order they were stored.
    pub fn datasets(&self) -> impl Iterator<Item = (&str, &DatasetValue)> {
        self.datasets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First target of a link field.
    pub fn link(&self, name: &str) -> Option<ContainerId> {
        self.links.get(name).and_then(|t| t.ids().first().copied())
    }

    /// All targets of a link field in insertion order.
    pub fn link_targets(&self, name: &str) -> &[ContainerId] {
        self.links.get(name).map(LinkTarget::ids).unwrap_or(&[])
    }

    /// Link fields with their targets.
    pub fn links(&self) -> impl Iterator<Item = (&str, &LinkTarget)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Children under one relation, in insertion order.
    pub fn children(&self, relation: &str) -> impl Iterator<Item = (&str, ContainerId)> {
        self.children
            .get(relation)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), *v)))
    }

    /// Child named `name` under `relation`.
    pub fn child(&self, relation: &str, name: &str) -> Option<ContainerId> {
        self.children.get(relation).and_then(|m| m.get(name)).copied()
    }

    /// Non-empty child relations in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &IndexMap<String, ContainerId>)> {
        self.children
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Owning container and the relation this container sits under.
    pub fn parent(&self) -> Option<(ContainerId, &str)> {
        self.parent.as_ref().map(|(id, rel)| (*id, rel.as_str()))
    }
}

/// Arena of containers.
#[derive(Clone, Debug, Default)]
pub struct ContainerTree {
    nodes: Vec<TypedContainer>,
}

impl ContainerTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Container behind `id`, if it belongs to this tree.
    pub fn get(&self, id: ContainerId) -> Option<&TypedContainer> {
        self.nodes.get(id.0)
    }

    fn node(&self, id: ContainerId) -> Result<&TypedContainer, FieldValidationError> {
        self.get(id)
            .ok_or(FieldValidationError::UnknownContainer(id.0))
    }

    /// Every container with its id, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ContainerId, &TypedContainer)> {
        self.nodes.iter().enumerate().map(|(i, c)| (ContainerId(i), c))
    }

    /// Containers that are not owned by any other container.
    pub fn roots(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.iter().filter(|(_, c)| c.parent.is_none()).map(|(id, _)| id)
    }

    /// Owning container of `id`.
    pub fn parent_of(&self, id: ContainerId) -> Option<ContainerId> {
        self.get(id).and_then(|c| c.parent.as_ref().map(|(p, _)| *p))
    }

    /// Whether `ancestor` owns `id` directly or transitively.
    pub fn is_ancestor(&self, ancestor: ContainerId, id: ContainerId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// `id` and everything it owns, pre-order.
    pub fn descendants(&self, id: ContainerId) -> Vec<ContainerId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            let mut owned: Vec<ContainerId> = node
                .children
                .values()
                .flat_map(|m| m.values().copied())
                .collect();
            owned.reverse();
            stack.extend(owned);
        }
        out
    }

    /// Path from the topmost owner: `/` for a root, `/<relation>/<name>/...` below it.
    pub fn path(&self, id: ContainerId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some((parent, relation)) = self.get(current).and_then(|c| c.parent.as_ref()) {
            if let Some(node) = self.get(current) {
                segments.push(node.name.clone());
            }
            segments.push(relation.clone());
            current = *parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Validate `values` against `type_name` and add the container.
    ///
    /// On failure the tree is left unchanged.
    pub fn construct(
        &mut self,
        registry: &TypeRegistry,
        type_name: &str,
        name: &str,
        values: FieldValues,
    ) -> Result<ContainerId, FieldValidationError> {
        let resolved = registry.resolve(type_name)?;
        self.construct_resolved(resolved, name, values)
    }

    pub(crate) fn construct_resolved(
        &mut self,
        resolved: Arc<ResolvedType>,
        name: &str,
        values: FieldValues,
    ) -> Result<ContainerId, FieldValidationError> {
        self.construct_inner(resolved, name, values, false)
    }

    /// Like [`ContainerTree::construct_resolved`] but tolerates missing links,
    /// which the caller assigns afterwards and checks with
    /// [`ContainerTree::check_required_links`].
    pub(crate) fn construct_unlinked(
        &mut self,
        resolved: Arc<ResolvedType>,
        name: &str,
        values: FieldValues,
    ) -> Result<ContainerId, FieldValidationError> {
        self.construct_inner(resolved, name, values, true)
    }

    fn construct_inner(
        &mut self,
        resolved: Arc<ResolvedType>,
        name: &str,
        values: FieldValues,
        defer_links: bool,
    ) -> Result<ContainerId, FieldValidationError> {
        check_name(name)?;
        let mut values = values.values;
        if let Some(unknown) = values.keys().find(|k| resolved.field(k).is_none()) {
            return Err(FieldValidationError::UnknownField {
                type_name: resolved.name.clone(),
                field: unknown.clone(),
            });
        }

        let mut container = TypedContainer::new(name, Arc::clone(&resolved));
        let mut adopted: IndexMap<ContainerId, String> = IndexMap::new();
        let missing = |field: &str| FieldValidationError::MissingField {
            type_name: resolved.name.clone(),
            field: field.to_string(),
        };

        for (field, spec) in &resolved.fields {
            let provided = values.shift_remove(field);
            match spec {
                FieldSpec::Attribute(a) => match provided {
                    Some(FieldValue::Scalar(v)) => {
                        a.validate(&v)?;
                        container.attributes.insert(field.clone(), v);
                    }
                    Some(other) => return Err(wrong_value(field, "a scalar", &other)),
                    None => {
                        if let Some(v) = a.fill_missing(&resolved.name)? {
                            container.attributes.insert(field.clone(), v);
                        }
                    }
                },
                FieldSpec::Dataset(d) => {
                    let value = match provided {
                        Some(FieldValue::Data(v)) => v,
                        Some(FieldValue::Scalar(v)) => DatasetValue::new(v),
                        Some(other) => return Err(wrong_value(field, "a dataset", &other)),
                        None if d.is_required() => return Err(missing(field)),
                        None => continue,
                    };
                    container.datasets.insert(field.clone(), d.validate(value)?);
                }
                FieldSpec::Link(l) => {
                    let target = match provided {
                        Some(FieldValue::Link(id)) => LinkTarget::One(id),
                        Some(FieldValue::Links(ids)) => LinkTarget::Many(ids),
                        Some(other) => return Err(wrong_value(field, "a link", &other)),
                        None if l.quantity.is_required() && !defer_links => {
                            return Err(missing(field))
                        }
                        None => continue,
                    };
                    self.check_link(l, &target)?;
                    container.links.insert(field.clone(), target);
                }
                FieldSpec::Group(g) => {
                    let (ids, many) = match provided {
                        Some(FieldValue::Child(id)) => (vec![id], false),
                        Some(FieldValue::Children(ids)) => (ids, true),
                        Some(other) => return Err(wrong_value(field, "a child", &other)),
                        None if g.quantity.is_required() => return Err(missing(field)),
                        None => continue,
                    };
                    let slot = self.check_children(g, &ids, many)?;
                    for (child_name, id) in &slot {
                        if adopted.insert(*id, field.clone()).is_some() {
                            return Err(FieldValidationError::ChildNotDetached {
                                field: field.clone(),
                                child: child_name.clone(),
                            });
                        }
                    }
                    container.children.insert(field.clone(), slot);
                }
            }
        }

        let id = ContainerId(self.nodes.len());
        self.nodes.push(container);
        for (child, relation) in adopted {
            self.nodes[child.0].parent = Some((id, relation));
        }
        debug!(type_name = %resolved.name, name, id = id.0, "Constructed container");
        Ok(id)
    }

    pub(crate) fn check_required_links(&self, id: ContainerId) -> Result<(), FieldValidationError> {
        let container = self.node(id)?;
        for spec in container.resolved.links() {
            let count = container.link_targets(&spec.name).len();
            if spec.quantity.is_required() && count == 0 {
                return Err(FieldValidationError::MissingField {
                    type_name: container.type_name().to_string(),
                    field: spec.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_link(&self, spec: &LinkSpec, target: &LinkTarget) -> Result<(), FieldValidationError> {
        spec.validate(Some((target.ids(), target.is_many())), |id: ContainerId| {
            self.get(id).map(|c| c.resolved.ancestry.as_slice())
        })
    }

    fn check_children(
        &self,
        spec: &GroupSpec,
        ids: &[ContainerId],
        many: bool,
    ) -> Result<IndexMap<String, ContainerId>, FieldValidationError> {
        if (many && !spec.quantity.allows_many()) || !spec.quantity.accepts_count(ids.len()) {
            let found = if many {
                format!("{} children", ids.len())
            } else {
                "a single child".to_string()
            };
            return Err(FieldValidationError::Cardinality {
                field: spec.name.clone(),
                cardinality: spec.quantity.to_string(),
                found,
            });
        }

        let mut slot = IndexMap::new();
        for id in ids {
            let child = self.node(*id)?;
            if child.parent.is_some() {
                return Err(FieldValidationError::ChildNotDetached {
                    field: spec.name.clone(),
                    child: child.name.clone(),
                });
            }
            if !spec.accepts(&child.resolved.ancestry) {
                return Err(FieldValidationError::LinkTargetType {
                    field: spec.name.clone(),
                    expected: spec.target_type.clone(),
                    found: child.type_name().to_string(),
                });
            }
            if slot.insert(child.name.clone(), *id).is_some() {
                return Err(FieldValidationError::DuplicateChild {
                    field: spec.name.clone(),
                    child: child.name.clone(),
                });
            }
        }
        Ok(slot)
    }

    /// Place a detached `child` under `relation` of `parent`.
    pub fn attach(
        &mut self,
        parent: ContainerId,
        relation: &str,
        child: ContainerId,
    ) -> Result<(), AttachmentConflictError> {
        let parent_node = self
            .get(parent)
            .ok_or(AttachmentConflictError::UnknownContainer(parent.0))?;
        let child_node = self
            .get(child)
            .ok_or(AttachmentConflictError::UnknownContainer(child.0))?;

        let slot = parent_node.resolved.child_slot(relation).ok_or_else(|| {
            AttachmentConflictError::UndeclaredRelation {
                type_name: parent_node.type_name().to_string(),
                relation: relation.to_string(),
            }
        })?;
        if let Some((holder, _)) = &child_node.parent {
            return Err(AttachmentConflictError::AlreadyAttached {
                name: child_node.name.clone(),
                parent: self.nodes[holder.0].name.clone(),
            });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(AttachmentConflictError::ContainmentCycle {
                name: child_node.name.clone(),
                parent: parent_node.name.clone(),
            });
        }
        if !slot.accepts(&child_node.resolved.ancestry) {
            return Err(AttachmentConflictError::IncompatibleChild {
                relation: relation.to_string(),
                expected: slot.target_type.clone(),
                found: child_node.type_name().to_string(),
            });
        }

        let existing = parent_node.children.get(relation);
        if !slot.quantity.allows_many() && existing.is_some_and(|m| !m.is_empty()) {
            return Err(AttachmentConflictError::SlotOccupied {
                parent: parent_node.name.clone(),
                relation: relation.to_string(),
            });
        }
        if existing.is_some_and(|m| m.contains_key(&child_node.name)) {
            return Err(AttachmentConflictError::DuplicateName {
                parent: parent_node.name.clone(),
                relation: relation.to_string(),
                name: child_node.name.clone(),
            });
        }

        let child_name = child_node.name.clone();
        self.nodes[parent.0]
            .children
            .entry(relation.to_string())
            .or_default()
            .insert(child_name, child);
        self.nodes[child.0].parent = Some((parent, relation.to_string()));
        debug!(parent = parent.0, relation, child = child.0, "Attached container");
        Ok(())
    }

    /// Remove the child `name` from `relation` of `parent`; it stays in the arena.
    pub fn detach(
        &mut self,
        parent: ContainerId,
        relation: &str,
        name: &str,
    ) -> Result<ContainerId, AttachmentConflictError> {
        let parent_node = self
            .get(parent)
            .ok_or(AttachmentConflictError::UnknownContainer(parent.0))?;
        let slot = parent_node.resolved.child_slot(relation).ok_or_else(|| {
            AttachmentConflictError::UndeclaredRelation {
                type_name: parent_node.type_name().to_string(),
                relation: relation.to_string(),
            }
        })?;
        let no_such_child = || AttachmentConflictError::NoSuchChild {
            parent: parent_node.name.clone(),
            relation: relation.to_string(),
            name: name.to_string(),
        };
        let held = parent_node.children.get(relation).ok_or_else(no_such_child)?;
        let child = *held.get(name).ok_or_else(no_such_child)?;
        if !slot.quantity.accepts_count(held.len() - 1) {
            return Err(AttachmentConflictError::RequiredSlot {
                parent: parent_node.name.clone(),
                relation: relation.to_string(),
            });
        }

        if let Some(held) = self.nodes[parent.0].children.get_mut(relation) {
            held.shift_remove(name);
        }
        self.nodes[child.0].parent = None;
        Ok(child)
    }

    /// Rename a container, keeping its position under its parent.
    pub fn rename(&mut self, id: ContainerId, new_name: &str) -> Result<(), Error> {
        check_name(new_name)?;
        let node = self.node(id)?;
        if node.name == new_name {
            return Ok(());
        }

        if let Some((parent, relation)) = node.parent.clone() {
            let parent_node = &self.nodes[parent.0];
            if parent_node.child(&relation, new_name).is_some() {
                return Err(AttachmentConflictError::DuplicateName {
                    parent: parent_node.name.clone(),
                    relation,
                    name: new_name.to_string(),
                }
                .into());
            }
            if let Some(held) = self.nodes[parent.0].children.get_mut(&relation) {
                let renamed: IndexMap<String, ContainerId> = held
                    .drain(..)
                    .map(|(k, v)| if v == id { (new_name.to_string(), v) } else { (k, v) })
                    .collect();
                *held = renamed;
            }
        }
        self.nodes[id.0].name = new_name.to_string();
        Ok(())
    }

    /// Validate and replace one attribute value.
    pub fn set_attribute(
        &mut self,
        id: ContainerId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), FieldValidationError> {
        let value = value.into();
        let resolved = Arc::clone(&self.node(id)?.resolved);
        match resolved.field(name) {
            Some(FieldSpec::Attribute(a)) => a.validate(&value)?,
            other => return Err(not_a(&resolved, name, "attribute", other)),
        }
        self.nodes[id.0].attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// Validate and replace one dataset value.
    pub fn set_dataset(
        &mut self,
        id: ContainerId,
        name: &str,
        value: DatasetValue,
    ) -> Result<(), FieldValidationError> {
        let resolved = Arc::clone(&self.node(id)?.resolved);
        let value = match resolved.field(name) {
            Some(FieldSpec::Dataset(d)) => d.validate(value)?,
            other => return Err(not_a(&resolved, name, "dataset", other)),
        };
        self.nodes[id.0].datasets.insert(name.to_string(), value);
        Ok(())
    }

    /// Validate and replace a single link target.
    pub fn set_link(
        &mut self,
        id: ContainerId,
        name: &str,
        target: ContainerId,
    ) -> Result<(), FieldValidationError> {
        self.assign_link(id, name, LinkTarget::One(target))
    }

    /// Replace an ordered link collection.
    pub fn set_links(
        &mut self,
        id: ContainerId,
        name: &str,
        targets: Vec<ContainerId>,
    ) -> Result<(), FieldValidationError> {
        self.assign_link(id, name, LinkTarget::Many(targets))
    }

    /// Remove a link that is not required.
    pub fn clear_link(&mut self, id: ContainerId, name: &str) -> Result<(), FieldValidationError> {
        let resolved = Arc::clone(&self.node(id)?.resolved);
        match resolved.field(name) {
            Some(FieldSpec::Link(l)) if l.quantity.is_required() => {
                return Err(FieldValidationError::MissingField {
                    type_name: resolved.name.clone(),
                    field: name.to_string(),
                })
            }
            Some(FieldSpec::Link(_)) => {}
            other => return Err(not_a(&resolved, name, "link", other)),
        }
        self.nodes[id.0].links.shift_remove(name);
        Ok(())
    }

    fn assign_link(
        &mut self,
        id: ContainerId,
        name: &str,
        target: LinkTarget,
    ) -> Result<(), FieldValidationError> {
        let resolved = Arc::clone(&self.node(id)?.resolved);
        match resolved.field(name) {
            Some(FieldSpec::Link(l)) => self.check_link(l, &target)?,
            other => return Err(not_a(&resolved, name, "link", other)),
        }
        self.nodes[id.0].links.insert(name.to_string(), target);
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), FieldValidationError> {
    if name.is_empty() || name.contains('/') {
        return Err(FieldValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn wrong_value(field: &str, expected: &str, found: &FieldValue) -> FieldValidationError {
    FieldValidationError::WrongKind {
        field: field.to_string(),
        expected: expected.to_string(),
        found: found.describe().to_string(),
    }
}

fn not_a(
    resolved: &ResolvedType,
    name: &str,
    expected: &str,
    found: Option<&FieldSpec>,
) -> FieldValidationError {
    match found {
        None => FieldValidationError::UnknownField {
            type_name: resolved.name.clone(),
            field: name.to_string(),
        },
        Some(spec) => FieldValidationError::WrongKind {
            field: name.to_string(),
            expected: expected.to_string(),
            found: spec.category().to_string(),
        },
    }
}
