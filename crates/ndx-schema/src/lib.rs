//! Schema-driven typed containers.
//!
//! This crate provides the type system that data-format extensions are built
//! on: versioned namespaces of type specs, inheritance resolution, typed
//! containers validated at construction, and a serialization boundary to
//! hierarchical storage.
//!
//! # Overview
//!
//! - **Field specs** - attribute, dataset, link and child-slot contracts
//! - **Namespaces** - versioned collections of type specs, persisted as YAML or JSON
//! - **Type registry** - flattens inheritance into effective field tables
//! - **Container trees** - typed instances, attachment and links by identity
//! - **Storage** - write and read trees through a [`HierarchicalStore`]
//!
//! # Quick Start
//!
//! ```rust
//! use ndx_schema::{
//!     AttributeSpec, ContainerTree, DataKind, FieldValues, LinkSpec, NamespaceBuilder,
//!     TypeRegistry, TypeSpec,
//! };
//!
//! let ns = NamespaceBuilder::new("ndx-lab", "0.1.0")
//!     .type_spec(TypeSpec::group("Device"))
//!     .type_spec(
//!         TypeSpec::group("Site")
//!             .attribute(AttributeSpec::new("location", DataKind::Text))
//!             .link(LinkSpec::new("device", "Device")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(ns).unwrap();
//!
//! let mut tree = ContainerTree::new();
//! let laser = tree.construct(&registry, "Device", "laser", FieldValues::new()).unwrap();
//! let site = tree
//!     .construct(
//!         &registry,
//!         "Site",
//!         "site",
//!         FieldValues::new().attribute("location", "V1").link("device", laser),
//!     )
//!     .unwrap();
//!
//! assert_eq!(tree.get(site).unwrap().link("device"), Some(laser));
//! ```
//!
//! # Storage
//!
//! ```rust
//! use ndx_schema::io::{read, write, MemoryStore};
//! use ndx_schema::{ContainerTree, FieldValues, GroupSpec, FieldCardinality, NamespaceBuilder, TypeRegistry, TypeSpec};
//!
//! let ns = NamespaceBuilder::new("ndx-lab", "0.1.0")
//!     .type_spec(TypeSpec::group("Device"))
//!     .type_spec(TypeSpec::group("Lab").child(
//!         GroupSpec::new("devices", "Device").with_quantity(FieldCardinality::ZeroOrMore),
//!     ))
//!     .build()
//!     .unwrap();
//! let mut registry = TypeRegistry::new();
//! registry.register(ns).unwrap();
//!
//! let mut tree = ContainerTree::new();
//! let laser = tree.construct(&registry, "Device", "laser", FieldValues::new()).unwrap();
//! let lab = tree
//!     .construct(&registry, "Lab", "root", FieldValues::new().children("devices", vec![laser]))
//!     .unwrap();
//!
//! let mut store = MemoryStore::new();
//! write(&tree, lab, &mut store).unwrap();
//! let (copy, root) = read(&store, &registry).unwrap();
//! assert!(copy.get(root).unwrap().child("devices", "laser").is_some());
//! ```

mod builder;
mod cardinality;
mod container;
mod dtype;
mod error;
mod hierarchy;
mod namespace;
mod neurodata;
mod registry;
mod shape;
mod spec;
mod validation;
mod value;

pub mod global;
pub mod io;


pub use builder::NamespaceBuilder;
pub use cardinality::FieldCardinality;
pub use container::{ContainerId, ContainerTree, FieldValue, FieldValues, LinkTarget, TypedContainer};
pub use dtype::{DataKind, ElementKind, Value};
pub use error::{
    AttachmentConflictError, Error, FieldValidationError, Result, SchemaDefinitionError,
    SerializationError,
};
pub use hierarchy::TypeHierarchy;
pub use namespace::{validate_version, Namespace, TypeInclude};
pub use neurodata::{required_f64, required_i64, required_text, NeurodataType};
pub use registry::{LoadOutcome, ResolvedType, TypeRegistry, TypeTag};
pub use shape::Shape;
pub use spec::{
    AttributeSpec, DataSpec, DatasetSpec, FieldSpec, GroupSpec, LinkSpec, SpecKind, TypeSpec,
};
pub use validation::{TreeValidator, ValidationReport};
pub use value::{ArrayData, DatasetData, DatasetValue, DeferredArray};

/// Field name under which a dataset-like type exposes its own payload.
pub const DATA_FIELD: &str = "data";
