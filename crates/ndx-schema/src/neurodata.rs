//! Typed views over containers.
//!
//! A concrete Rust type implements [`NeurodataType`] to describe how it maps
//! onto the fields of one registered type. The tree still performs all
//! validation; the trait only converts.

use crate::container::{ContainerId, ContainerTree, FieldValues, TypedContainer};
use crate::registry::TypeRegistry;
use crate::FieldValidationError;

/// A Rust value that corresponds to one registered container type.
pub trait NeurodataType: Sized {
    /// Registered type name.
    const TYPE_NAME: &'static str;
    /// Namespace that owns [`Self::TYPE_NAME`].
    const NAMESPACE: &'static str;

    /// Container name.
    fn name(&self) -> &str;

    /// Field values used to construct the container.
    fn to_fields(&self) -> FieldValues;

    /// Rebuild from a container already known to be of this type or a subtype.
    fn from_container(
        tree: &ContainerTree,
        id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError>;
}

impl ContainerTree {
    /// Construct a container from a typed value.
    pub fn insert_typed<T: NeurodataType>(
        &mut self,
        registry: &TypeRegistry,
        value: &T,
    ) -> Result<ContainerId, FieldValidationError> {
        let resolved = registry.resolve_qualified(T::NAMESPACE, T::TYPE_NAME)?;
        self.construct_resolved(resolved, value.name(), value.to_fields())
    }

    /// Read a container back as `T`.
    pub fn get_typed<T: NeurodataType>(&self, id: ContainerId) -> Result<T, FieldValidationError> {
        let container = self
            .get(id)
            .ok_or(FieldValidationError::UnknownContainer(id.index()))?;
        if !container.is_a(T::TYPE_NAME) {
            return Err(FieldValidationError::WrongKind {
                field: container.name().to_string(),
                expected: T::TYPE_NAME.to_string(),
                found: container.type_name().to_string(),
            });
        }
        T::from_container(self, id, container)
    }
}

/// Required text attribute, for [`NeurodataType::from_container`] impls.
pub fn required_text(container: &TypedContainer, field: &str) -> Result<String, FieldValidationError> {
    container
        .text(field)
        .map(str::to_string)
        .ok_or_else(|| FieldValidationError::MissingField {
            type_name: container.type_name().to_string(),
            field: field.to_string(),
        })
}

/// Required numeric attribute as `f64`.
pub fn required_f64(container: &TypedContainer, field: &str) -> Result<f64, FieldValidationError> {
    container
        .attribute(field)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| FieldValidationError::MissingField {
            type_name: container.type_name().to_string(),
            field: field.to_string(),
        })
}

/// Required integer attribute.
pub fn required_i64(container: &TypedContainer, field: &str) -> Result<i64, FieldValidationError> {
    container
        .attribute(field)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| FieldValidationError::MissingField {
            type_name: container.type_name().to_string(),
            field: field.to_string(),
        })
}
