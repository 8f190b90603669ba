//! Fluent construction of namespaces.

use crate::hierarchy::TypeHierarchy;
use crate::namespace::{Namespace, TypeInclude};
use crate::spec::TypeSpec;
use crate::SchemaDefinitionError;

/// Builder for [`Namespace`] values.
///
/// # Example
///
/// ```rust
/// use ndx_schema::{AttributeSpec, DataKind, NamespaceBuilder, TypeSpec};
///
/// let ns = NamespaceBuilder::new("ndx-example", "0.1.0")
///     .doc("Example extension")
///     .include_type("LabMetaData", "core")
///     .type_spec(
///         TypeSpec::group("Pattern")
///             .extends("LabMetaData")
///             .attribute(AttributeSpec::new("description", DataKind::Text).optional()),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(ns.types.len(), 1);
/// assert_eq!(ns.includes.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct NamespaceBuilder {
    namespace: Namespace,
}

impl NamespaceBuilder {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::new(name, version),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.namespace.doc = doc.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.namespace.authors.push(author.into());
        self
    }

    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.namespace.contacts.push(contact.into());
        self
    }

    /// Use `type_name` from `namespace` by reference.
    ///
    /// The foreign namespace must be loaded when this namespace is registered.
    pub fn include_type(mut self, type_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let include = TypeInclude::new(type_name, namespace);
        if !self.namespace.includes.contains(&include) {
            self.namespace.includes.push(include);
        }
        self
    }

    pub fn type_spec(mut self, spec: TypeSpec) -> Self {
        self.namespace.types.push(spec);
        self
    }

    /// Build the namespace.
    ///
    /// # Errors
    ///
    /// - the version is not `MAJOR.MINOR.PATCH`
    /// - a type or a field is declared twice
    /// - a parent is neither declared here nor included
    /// - the local `extends` chains form a cycle
    pub fn build(self) -> Result<Namespace, SchemaDefinitionError> {
        let ns = self.namespace;
        ns.validate()?;

        let mut hierarchy = TypeHierarchy::new();
        for spec in &ns.types {
            let Some(parent) = &spec.extends else {
                continue;
            };
            if ns.get_type(parent).is_none() && ns.includes_type(parent).is_none() {
                return Err(SchemaDefinitionError::UnknownParent {
                    type_name: spec.name.clone(),
                    parent: parent.clone(),
                });
            }
            hierarchy.add_subtype(spec.name.clone(), parent.clone());
        }
        hierarchy.validate_acyclic()?;

        Ok(ns)
    }
}
