//! Type registry: loaded namespaces and flattened effective type specs.
//!
//! Registration is atomic. A namespace is validated, its inheritance graph is
//! checked for cycles and every new type is flattened against its ancestors
//! on a scratch copy; the registry is only updated when all of that succeeds.

use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::hierarchy::TypeHierarchy;
use crate::namespace::Namespace;
use crate::spec::{AttributeSpec, DatasetSpec, FieldSpec, GroupSpec, LinkSpec, SpecKind, TypeSpec};
use crate::{FieldValidationError, SchemaDefinitionError};

/// Type tag stored alongside every persisted container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub namespace: String,
    pub namespace_version: String,
    pub neurodata_type: String,
}

/// Effective spec of a type after inheritance has been applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedType {
    pub name: String,
    pub namespace: String,
    pub namespace_version: String,
    pub kind: SpecKind,
    pub doc: String,
    /// Root-first, ending with this type.
    pub ancestry: Vec<String>,
    pub fields: IndexMap<String, FieldSpec>,
}

impl ResolvedType {
    /// Effective field named `name`, own or inherited.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Whether `ancestor` is this type or one of its ancestors.
    pub fn is_a(&self, ancestor: &str) -> bool {
        self.ancestry.iter().any(|t| t == ancestor)
    }

    /// Tag persisted with every instance of this type.
    pub fn tag(&self) -> TypeTag {
        TypeTag {
            namespace: self.namespace.clone(),
            namespace_version: self.namespace_version.clone(),
            neurodata_type: self.name.clone(),
        }
    }

    /// Attribute fields in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.fields.values().filter_map(|f| match f {
            FieldSpec::Attribute(a) => Some(a),
            _ => None,
        })
    }

    /// Dataset fields in declaration order.
    pub fn datasets(&self) -> impl Iterator<Item = &DatasetSpec> {
        self.fields.values().filter_map(|f| match f {
            FieldSpec::Dataset(d) => Some(d),
            _ => None,
        })
    }

    /// Link fields in declaration order.
    pub fn links(&self) -> impl Iterator<Item = &LinkSpec> {
        self.fields.values().filter_map(|f| match f {
            FieldSpec::Link(l) => Some(l),
            _ => None,
        })
    }

    /// Child slots in declaration order.
    pub fn child_slots(&self) -> impl Iterator<Item = &GroupSpec> {
        self.fields.values().filter_map(|f| match f {
            FieldSpec::Group(g) => Some(g),
            _ => None,
        })
    }

    /// Child slot named `relation`, if that field is one.
    pub fn child_slot(&self, relation: &str) -> Option<&GroupSpec> {
        match self.fields.get(relation) {
            Some(FieldSpec::Group(g)) => Some(g),
            _ => None,
        }
    }
}

/// Result of [`TypeRegistry::load`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The identical namespace was already loaded; nothing changed.
    AlreadyLoaded,
}

/// Loaded namespaces and the effective spec of every type they define.
///
/// Type names are owned by exactly one loaded namespace.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    namespaces: IndexMap<String, Namespace>,
    owners: IndexMap<String, String>,
    hierarchy: TypeHierarchy,
    resolved: IndexMap<String, Arc<ResolvedType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a namespace, treating an identical reload as a no-op.
    pub fn load(&mut self, namespace: Namespace) -> Result<LoadOutcome, SchemaDefinitionError> {
        if let Some(existing) = self.namespaces.get(&namespace.name) {
            if existing.version != namespace.version {
                return Err(SchemaDefinitionError::VersionConflict {
                    namespace: namespace.name.clone(),
                    loaded: existing.version.clone(),
                    requested: namespace.version.clone(),
                });
            }
            if *existing != namespace {
                return Err(SchemaDefinitionError::ConflictingDefinition {
                    namespace: namespace.name.clone(),
                    version: namespace.version.clone(),
                });
            }
            debug!(namespace = %namespace.name, version = %namespace.version, "Namespace already loaded");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        self.register(namespace)?;
        Ok(LoadOutcome::Loaded)
    }

    /// Insert every type of `namespace` atomically.
    pub fn register(&mut self, namespace: Namespace) -> Result<(), SchemaDefinitionError> {
        namespace.validate()?;

        if let Some(existing) = self.namespaces.get(&namespace.name) {
            if existing.version != namespace.version {
                return Err(SchemaDefinitionError::VersionConflict {
                    namespace: namespace.name.clone(),
                    loaded: existing.version.clone(),
                    requested: namespace.version.clone(),
                });
            }
            let type_name = namespace
                .types
                .first()
                .map(|t| t.name.clone())
                .unwrap_or_default();
            return Err(SchemaDefinitionError::DuplicateType {
                namespace: namespace.name.clone(),
                type_name,
            });
        }

        for include in &namespace.includes {
            if self.owners.get(&include.type_name) != Some(&include.namespace) {
                return Err(SchemaDefinitionError::UnresolvedInclude {
                    type_name: include.type_name.clone(),
                    namespace: include.namespace.clone(),
                });
            }
        }

        let mut hierarchy = self.hierarchy.clone();
        for spec in &namespace.types {
            if let Some(owner) = self.owners.get(&spec.name) {
                return Err(SchemaDefinitionError::TypeOwnedElsewhere {
                    type_name: spec.name.clone(),
                    owner: owner.clone(),
                });
            }
            if let Some(parent) = &spec.extends {
                if namespace.get_type(parent).is_none() && namespace.includes_type(parent).is_none() {
                    return Err(SchemaDefinitionError::UnknownParent {
                        type_name: spec.name.clone(),
                        parent: parent.clone(),
                    });
                }
                hierarchy.add_subtype(spec.name.clone(), parent.clone());
            }
        }
        hierarchy.validate_acyclic()?;

        for spec in &namespace.types {
            for field in &spec.fields {
                let Some(target) = field.target_type() else {
                    continue;
                };
                let known = namespace.get_type(target).is_some()
                    || namespace.includes_type(target).is_some()
                    || self.owners.contains_key(target);
                if !known {
                    return Err(SchemaDefinitionError::UnresolvedTarget {
                        type_name: spec.name.clone(),
                        field: field.name().to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }

        let mut resolved = self.resolved.clone();
        let mut pending: Vec<&TypeSpec> = namespace.types.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut remaining = Vec::new();
            for spec in pending {
                let parent = match &spec.extends {
                    None => None,
                    Some(p) => match resolved.get(p) {
                        Some(r) => Some(Arc::clone(r)),
                        None => {
                            remaining.push(spec);
                            continue;
                        }
                    },
                };
                let flat = flatten(&namespace, spec, parent.as_deref())?;
                debug!(type_name = %flat.name, fields = flat.fields.len(), "Resolved type");
                resolved.insert(spec.name.clone(), Arc::new(flat));
            }
            if remaining.len() == before {
                // Acyclic and all parents known, so every pass makes progress.
                let path = remaining.iter().map(|s| s.name.clone()).collect();
                return Err(SchemaDefinitionError::InheritanceCycle { path });
            }
            pending = remaining;
        }

        for spec in &namespace.types {
            self.owners.insert(spec.name.clone(), namespace.name.clone());
        }
        info!(
            namespace = %namespace.name,
            version = %namespace.version,
            types = namespace.types.len(),
            "Loaded namespace"
        );
        self.hierarchy = hierarchy;
        self.resolved = resolved;
        self.namespaces.insert(namespace.name.clone(), namespace);
        Ok(())
    }

    /// Effective spec of `type_name`.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<ResolvedType>, FieldValidationError> {
        self.resolved
            .get(type_name)
            .cloned()
            .ok_or_else(|| FieldValidationError::UnknownType(type_name.to_string()))
    }

    /// Effective spec of `type_name`, which must be owned by `namespace`.
    pub fn resolve_qualified(
        &self,
        namespace: &str,
        type_name: &str,
    ) -> Result<Arc<ResolvedType>, FieldValidationError> {
        match self.owners.get(type_name) {
            Some(owner) if owner == namespace => self.resolve(type_name),
            _ => Err(FieldValidationError::UnknownType(format!(
                "{}:{}",
                namespace, type_name
            ))),
        }
    }

    /// Whether `child` is a registered type extending `ancestor`, or `ancestor` itself.
    pub fn is_subtype(&self, child: &str, ancestor: &str) -> bool {
        self.resolved.contains_key(child) && self.hierarchy.is_subtype(child, ancestor)
    }

    /// Registered types extending `type_name`.
    pub fn subtypes_of(&self, type_name: &str) -> Vec<String> {
        self.hierarchy.descendants(type_name)
    }

    /// Loaded namespace by name.
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Namespaces in load order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    /// Every resolved type in load order.
    pub fn types(&self) -> impl Iterator<Item = &Arc<ResolvedType>> {
        self.resolved.values()
    }

    /// Name of the namespace that defines `type_name`.
    pub fn owner_of(&self, type_name: &str) -> Option<&str> {
        self.owners.get(type_name).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// Overlay `spec`'s own fields on its parent's effective fields.
fn flatten(
    namespace: &Namespace,
    spec: &TypeSpec,
    parent: Option<&ResolvedType>,
) -> Result<ResolvedType, SchemaDefinitionError> {
    let (mut ancestry, mut fields) = match parent {
        Some(p) => {
            if p.kind != spec.kind {
                return Err(SchemaDefinitionError::Malformed(format!(
                    "{:?} type '{}' cannot extend {:?} type '{}'",
                    spec.kind, spec.name, p.kind, p.name
                )));
            }
            (p.ancestry.clone(), p.fields.clone())
        }
        None => (Vec::new(), IndexMap::new()),
    };
    ancestry.push(spec.name.clone());

    for own in spec.own_fields() {
        let name = own.name().to_string();
        let merged = match fields.get(&name) {
            None => own,
            Some(inherited) => {
                let ancestor = parent.map(|p| p.name.as_str()).unwrap_or_default();
                overlay(&spec.name, ancestor, inherited, own)?
            }
        };
        fields.insert(name, merged);
    }

    Ok(ResolvedType {
        name: spec.name.clone(),
        namespace: namespace.name.clone(),
        namespace_version: namespace.version.clone(),
        kind: spec.kind,
        doc: spec.doc.clone(),
        ancestry,
        fields,
    })
}

fn overlay(
    type_name: &str,
    ancestor: &str,
    inherited: &FieldSpec,
    own: FieldSpec,
) -> Result<FieldSpec, SchemaDefinitionError> {
    let field = own.name().to_string();
    let dropped = || SchemaDefinitionError::DroppedRequiredField {
        type_name: type_name.to_string(),
        field: field.clone(),
        ancestor: ancestor.to_string(),
    };
    if inherited.is_required() && !own.is_required() {
        return Err(dropped());
    }

    match (inherited, own) {
        (FieldSpec::Attribute(_), own @ FieldSpec::Attribute(_)) => Ok(own),
        (FieldSpec::Link(p), FieldSpec::Link(c)) => {
            if c.quantity.weakens(&p.quantity) {
                return Err(dropped());
            }
            Ok(FieldSpec::Link(c))
        }
        (FieldSpec::Group(p), FieldSpec::Group(c)) => {
            if c.quantity.weakens(&p.quantity) {
                return Err(dropped());
            }
            Ok(FieldSpec::Group(c))
        }
        (FieldSpec::Dataset(p), FieldSpec::Dataset(c)) => {
            overlay_dataset(type_name, ancestor, p, c).map(FieldSpec::Dataset)
        }
        (inherited, own) => Err(SchemaDefinitionError::FieldCategoryChanged {
            type_name: type_name.to_string(),
            field,
            expected: inherited.category(),
            found: own.category(),
        }),
    }
}

fn overlay_dataset(
    type_name: &str,
    ancestor: &str,
    parent: &DatasetSpec,
    mut child: DatasetSpec,
) -> Result<DatasetSpec, SchemaDefinitionError> {
    match (&parent.shape, &child.shape) {
        (Some(p), Some(c)) if !c.refines(p) => {
            return Err(SchemaDefinitionError::IncompatibleShape {
                type_name: type_name.to_string(),
                field: child.name.clone(),
            });
        }
        (Some(p), None) => child.shape = Some(p.clone()),
        _ => {}
    }
    if child.dims.is_empty() {
        child.dims = parent.dims.clone();
    }
    if child.doc.is_empty() {
        child.doc = parent.doc.clone();
    }

    let mut attributes: IndexMap<String, AttributeSpec> = parent
        .attributes
        .iter()
        .map(|a| (a.name.clone(), a.clone()))
        .collect();
    for attr in child.attributes.drain(..) {
        if let Some(inherited) = attributes.get(&attr.name) {
            if inherited.required && !attr.required {
                return Err(SchemaDefinitionError::DroppedRequiredField {
                    type_name: type_name.to_string(),
                    field: format!("{}.{}", child.name, attr.name),
                    ancestor: ancestor.to_string(),
                });
            }
        }
        attributes.insert(attr.name.clone(), attr);
    }
    child.attributes = attributes.into_values().collect();
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::DataSpec;
    use crate::{DataKind, FieldCardinality, NamespaceBuilder, Shape};

    fn base() -> Namespace {
        NamespaceBuilder::new("base", "1.0.0")
            .type_spec(
                TypeSpec::group("Series")
                    .attribute(AttributeSpec::new("description", DataKind::Text).with_default("no description"))
                    .dataset_field(
                        DatasetSpec::new("data", DataKind::Numeric)
                            .with_attribute(AttributeSpec::new("unit", DataKind::Text))
                            .with_attribute(AttributeSpec::new("conversion", DataKind::Float32).with_default(1.0)),
                    ),
            )
            .type_spec(TypeSpec::group("Device"))
            .build()
            .unwrap()
    }

    fn loaded() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register(base()).unwrap();
        registry
    }

    #[test]
    fn test_flatten_overlays_root_first() {
        let mut registry = loaded();
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .include_type("Series", "base")
            .type_spec(
                TypeSpec::group("PowerSeries")
                    .extends("Series")
                    .dataset_field(
                        DatasetSpec::new("data", DataKind::Numeric)
                            .with_shape(Shape::any_of_rank(2))
                            .with_attribute(AttributeSpec::new("unit", DataKind::Text).with_default("watts")),
                    )
                    .attribute(AttributeSpec::new("wavelength", DataKind::Float32).optional()),
            )
            .build()
            .unwrap();
        registry.register(ext).unwrap();

        let resolved = registry.resolve("PowerSeries").unwrap();
        assert_eq!(resolved.ancestry, vec!["Series", "PowerSeries"]);
        let names: Vec<&str> = resolved.fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["description", "data", "wavelength"]);

        let data = resolved.datasets().next().unwrap();
        assert_eq!(data.shape, Some(Shape::any_of_rank(2)));
        assert_eq!(data.attributes.len(), 2);
        assert_eq!(
            data.attribute("unit").unwrap().default_value,
            Some(crate::Value::from("watts"))
        );
        assert!(data.attribute("conversion").is_some());
        assert!(registry.is_subtype("PowerSeries", "Series"));
        assert!(!registry.is_subtype("Series", "PowerSeries"));
    }

    #[test]
    fn test_dropping_required_field_fails() {
        let mut registry = loaded();
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .include_type("Series", "base")
            .type_spec(
                TypeSpec::group("Weak")
                    .extends("Series")
                    .dataset_field(DatasetSpec::new("data", DataKind::Numeric).optional()),
            )
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ext),
            Err(SchemaDefinitionError::DroppedRequiredField { .. })
        ));
        assert!(registry.namespace("ext").is_none());
        assert!(registry.resolve("Weak").is_err());
    }

    #[test]
    fn test_changing_category_fails() {
        let mut registry = loaded();
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .include_type("Series", "base")
            .include_type("Device", "base")
            .type_spec(
                TypeSpec::group("Odd")
                    .extends("Series")
                    .link(LinkSpec::new("data", "Device")),
            )
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ext),
            Err(SchemaDefinitionError::FieldCategoryChanged { .. })
        ));
    }

    #[test]
    fn test_unresolved_include() {
        let mut registry = TypeRegistry::new();
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .include_type("Series", "base")
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ext),
            Err(SchemaDefinitionError::UnresolvedInclude { .. })
        ));
    }

    #[test]
    fn test_unknown_link_target_fails() {
        let mut registry = loaded();
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .include_type("Device", "base")
            .type_spec(
                TypeSpec::group("Holder")
                    .extends("Device")
                    .link(LinkSpec::new("target", "NoSuchType")),
            )
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ext),
            Err(SchemaDefinitionError::UnresolvedTarget { ref field, ref target, .. })
                if field == "target" && target == "NoSuchType"
        ));
        assert!(registry.namespace("ext").is_none());
        assert!(registry.owner_of("Holder").is_none());
    }

    #[test]
    fn test_unknown_child_slot_target_fails() {
        let mut registry = loaded();
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .type_spec(TypeSpec::group("Bag").child(GroupSpec::new("items", "Item")))
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ext),
            Err(SchemaDefinitionError::UnresolvedTarget { ref target, .. }) if target == "Item"
        ));

        // Types loaded by earlier namespaces resolve without an include.
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .type_spec(TypeSpec::group("Rack").child(GroupSpec::new("devices", "Device")))
            .build()
            .unwrap();
        assert!(registry.register(ext).is_ok());
    }

    #[test]
    fn test_type_owned_elsewhere() {
        let mut registry = loaded();
        let ext = NamespaceBuilder::new("ext", "0.1.0")
            .type_spec(TypeSpec::group("Device"))
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ext),
            Err(SchemaDefinitionError::TypeOwnedElsewhere { .. })
        ));
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.load(base()).unwrap(), LoadOutcome::Loaded);
        assert_eq!(registry.load(base()).unwrap(), LoadOutcome::AlreadyLoaded);
        assert_eq!(registry.namespaces().count(), 1);

        let mut newer = base();
        newer.version = "1.1.0".to_string();
        assert!(matches!(
            registry.load(newer),
            Err(SchemaDefinitionError::VersionConflict { .. })
        ));

        let mut altered = base();
        altered.doc = "changed".to_string();
        assert!(matches!(
            registry.load(altered),
            Err(SchemaDefinitionError::ConflictingDefinition { .. })
        ));
    }

    #[test]
    fn test_register_twice_fails() {
        let mut registry = loaded();
        assert!(registry.register(base()).is_err());
    }

    #[test]
    fn test_resolve_qualified() {
        let registry = loaded();
        assert!(registry.resolve_qualified("base", "Device").is_ok());
        assert!(matches!(
            registry.resolve_qualified("other", "Device"),
            Err(FieldValidationError::UnknownType(_))
        ));
        assert!(registry.resolve("Missing").is_err());
    }

    #[test]
    fn test_dataset_type_data_field() {
        let mut registry = TypeRegistry::new();
        let ns = NamespaceBuilder::new("tables", "1.0.0")
            .type_spec(TypeSpec::dataset("VectorData").with_data(DataSpec::new(DataKind::Numeric)))
            .type_spec(
                TypeSpec::dataset("Region")
                    .extends("VectorData")
                    .with_data(DataSpec::new(DataKind::Int32).with_shape(Shape::any_of_rank(1))),
            )
            .build()
            .unwrap();
        registry.register(ns).unwrap();

        let region = registry.resolve("Region").unwrap();
        match region.field("data") {
            Some(FieldSpec::Dataset(d)) => assert_eq!(d.dtype, DataKind::Int32),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_group_cannot_extend_dataset() {
        let mut registry = TypeRegistry::new();
        let ns = NamespaceBuilder::new("tables", "1.0.0")
            .type_spec(TypeSpec::dataset("VectorData").with_data(DataSpec::new(DataKind::Numeric)))
            .type_spec(TypeSpec::group("Table").extends("VectorData"))
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ns),
            Err(SchemaDefinitionError::Malformed(_))
        ));
    }

    #[test]
    fn test_link_weakening_fails() {
        let mut registry = TypeRegistry::new();
        let ns = NamespaceBuilder::new("links", "1.0.0")
            .type_spec(TypeSpec::group("Device"))
            .type_spec(TypeSpec::group("Site").link(LinkSpec::new("device", "Device")))
            .type_spec(
                TypeSpec::group("LooseSite").extends("Site").link(
                    LinkSpec::new("device", "Device").with_quantity(FieldCardinality::Optional),
                ),
            )
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(ns),
            Err(SchemaDefinitionError::DroppedRequiredField { .. })
        ));
    }
}
