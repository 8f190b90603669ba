//! Field and type specifications.
//!
//! A [`TypeSpec`] declares its own fields and optionally the type it extends.
//! Field contracts come in four categories:
//!
//! - [`AttributeSpec`] - scalar metadata stored on the container itself
//! - [`DatasetSpec`] - array or scalar data with nested attributes
//! - [`LinkSpec`] - references to containers owned elsewhere in the tree
//! - [`GroupSpec`] - typed child slots owned by the container
//!
//! Every spec validates candidate values on its own; presence and unknown
//! field checks happen when a container is constructed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cardinality::FieldCardinality;
use crate::dtype::{DataKind, Value};
use crate::shape::Shape;
use crate::value::{ArrayData, DatasetData, DatasetValue};
use crate::FieldValidationError;

fn default_true() -> bool {
    true
}

fn is_required_quantity(q: &FieldCardinality) -> bool {
    *q == FieldCardinality::Required
}

/// Scalar attribute contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    pub dtype: DataKind,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl AttributeSpec {
    /// Required attribute of kind `dtype`.
    pub fn new(name: impl Into<String>, dtype: DataKind) -> Self {
        Self {
            name: name.into(),
            dtype,
            required: true,
            default_value: None,
            doc: String::new(),
        }
    }

    /// Allow the attribute to be absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used when none is provided.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Check a provided value against the declared kind.
    pub fn validate(&self, value: &Value) -> Result<(), FieldValidationError> {
        value.check_kind(&self.name, self.dtype)
    }

    /// Value to use when none was provided, or an error if one is needed.
    pub fn fill_missing(&self, owner: &str) -> Result<Option<Value>, FieldValidationError> {
        match (&self.default_value, self.required) {
            (Some(default), _) => Ok(Some(default.clone())),
            (None, true) => Err(FieldValidationError::MissingField {
                type_name: owner.to_string(),
                field: self.name.clone(),
            }),
            (None, false) => Ok(None),
        }
    }
}

/// Own payload contract of a dataset-like type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataSpec {
    pub dtype: DataKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<String>,
}

impl DataSpec {
    /// Payload of kind `dtype` with any shape.
    pub fn new(dtype: DataKind) -> Self {
        Self {
            dtype,
            shape: None,
            dims: Vec::new(),
        }
    }

    /// Restrict the payload to `shape`.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Name each dimension of the payload.
    pub fn with_dims<S: Into<String>>(mut self, dims: Vec<S>) -> Self {
        self.dims = dims.into_iter().map(Into::into).collect();
        self
    }
}

/// Untyped dataset contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub name: String,
    pub dtype: DataKind,
    /// `None` accepts any rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
    #[serde(default, skip_serializing_if = "is_required_quantity")]
    pub quantity: FieldCardinality,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl DatasetSpec {
    /// Required dataset of kind `dtype` with any shape.
    pub fn new(name: impl Into<String>, dtype: DataKind) -> Self {
        Self {
            name: name.into(),
            dtype,
            shape: None,
            dims: Vec::new(),
            attributes: Vec::new(),
            quantity: FieldCardinality::Required,
            doc: String::new(),
        }
    }

    /// Dataset field exposing the payload of a dataset-like type.
    pub fn from_data_spec(name: impl Into<String>, data: &DataSpec) -> Self {
        Self {
            shape: data.shape.clone(),
            dims: data.dims.clone(),
            ..Self::new(name, data.dtype)
        }
    }

    /// Restrict the dataset to `shape`.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Name each dimension of the dataset.
    pub fn with_dims<S: Into<String>>(mut self, dims: Vec<S>) -> Self {
        self.dims = dims.into_iter().map(Into::into).collect();
        self
    }

    /// Declare an attribute nested under the dataset.
    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Allow the dataset to be absent.
    pub fn optional(mut self) -> Self {
        self.quantity = FieldCardinality::Optional;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn is_required(&self) -> bool {
        self.quantity.is_required()
    }

    /// Nested attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Validate a dataset value and return it with attribute defaults filled in.
    ///
    /// Deferred arrays are checked for rank and already known dimensions only;
    /// [`DatasetSpec::validate_materialized`] completes the check.
    pub fn validate(&self, value: DatasetValue) -> Result<DatasetValue, FieldValidationError> {
        let DatasetValue { data, attributes } = value;

        match &data {
            DatasetData::Scalar(v) => v.check_kind(&self.name, self.dtype)?,
            DatasetData::Array(a) => a.check_kind(&self.name, self.dtype)?,
            DatasetData::Deferred(d) => {
                if !self.dtype.accepts_element(d.element_kind()) {
                    return Err(FieldValidationError::WrongKind {
                        field: self.name.clone(),
                        expected: self.dtype.to_string(),
                        found: format!("{} array", d.element_kind()),
                    });
                }
            }
        }
        if let Some(shape) = &self.shape {
            shape.check_partial(&self.name, &data.known_dims())?;
        }

        let attributes = self.validate_attributes(attributes)?;
        Ok(DatasetValue { data, attributes })
    }

    /// Full check of an array that has just been assembled for storage.
    pub fn validate_materialized(&self, array: &ArrayData) -> Result<(), FieldValidationError> {
        array.check_kind(&self.name, self.dtype)?;
        if let Some(shape) = &self.shape {
            shape.check(&self.name, array.shape())?;
        }
        Ok(())
    }

    fn validate_attributes(
        &self,
        mut provided: IndexMap<String, Value>,
    ) -> Result<IndexMap<String, Value>, FieldValidationError> {
        if let Some(unknown) = provided.keys().find(|k| self.attribute(k).is_none()) {
            return Err(FieldValidationError::UnknownField {
                type_name: self.name.clone(),
                field: unknown.clone(),
            });
        }

        let mut out = IndexMap::new();
        for spec in &self.attributes {
            let qualified = format!("{}.{}", self.name, spec.name);
            match provided.shift_remove(&spec.name) {
                Some(v) => {
                    v.check_kind(&qualified, spec.dtype)?;
                    out.insert(spec.name.clone(), v);
                }
                None => {
                    if let Some(v) = spec.fill_missing(&self.name)? {
                        out.insert(spec.name.clone(), v);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Reference to a container held elsewhere in the tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub name: String,
    pub target_type: String,
    #[serde(default)]
    pub quantity: FieldCardinality,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl LinkSpec {
    /// Required link to exactly one `target_type` container.
    pub fn new(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            quantity: FieldCardinality::Required,
            doc: String::new(),
        }
    }

    /// Number of targets the link accepts.
    pub fn with_quantity(mut self, quantity: FieldCardinality) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Validate provided link targets.
    ///
    /// `targets` is `None` when the field was not provided; `Some(ids, many)`
    /// carries the ids and whether they were given as a collection.
    /// `ancestry_of` returns the type ancestry of a target, or `None` if the
    /// target does not exist.
    pub fn validate<'a, Id: Copy>(
        &self,
        targets: Option<(&[Id], bool)>,
        ancestry_of: impl Fn(Id) -> Option<&'a [String]>,
    ) -> Result<(), FieldValidationError> {
        let cardinality_error = |found: &str| FieldValidationError::Cardinality {
            field: self.name.clone(),
            cardinality: self.quantity.to_string(),
            found: found.to_string(),
        };

        let ids: &[Id] = match (targets, self.quantity) {
            (None, q) if q.is_required() => return Err(cardinality_error("no target")),
            (None, _) => return Ok(()),
            (Some((_, true)), FieldCardinality::Required | FieldCardinality::Optional) => {
                return Err(cardinality_error("a collection"))
            }
            (Some((ids, _)), q) => {
                if !q.accepts_count(ids.len()) {
                    return Err(cardinality_error(&format!("{} targets", ids.len())));
                }
                ids
            }
        };

        for id in ids {
            let ancestry = ancestry_of(*id).ok_or_else(|| FieldValidationError::UnresolvedLink {
                field: self.name.clone(),
            })?;
            if !ancestry.iter().any(|t| *t == self.target_type) {
                return Err(FieldValidationError::LinkTargetType {
                    field: self.name.clone(),
                    expected: self.target_type.clone(),
                    found: ancestry.last().cloned().unwrap_or_default(),
                });
            }
        }
        Ok(())
    }
}

/// Typed child slot: sub-groups or typed sub-datasets owned by the container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub target_type: String,
    #[serde(default)]
    pub quantity: FieldCardinality,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl GroupSpec {
    /// Slot holding exactly one `target_type` child.
    pub fn new(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            quantity: FieldCardinality::Required,
            doc: String::new(),
        }
    }

    /// Number of children the slot accepts.
    pub fn with_quantity(mut self, quantity: FieldCardinality) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Whether a child with this type ancestry may live in the slot.
    pub fn accepts(&self, ancestry: &[String]) -> bool {
        ancestry.iter().any(|t| *t == self.target_type)
    }
}

/// One field of a type, tagged by category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum FieldSpec {
    Attribute(AttributeSpec),
    Dataset(DatasetSpec),
    Link(LinkSpec),
    Group(GroupSpec),
}

impl FieldSpec {
    /// Field name, unique within its type.
    pub fn name(&self) -> &str {
        match self {
            FieldSpec::Attribute(s) => &s.name,
            FieldSpec::Dataset(s) => &s.name,
            FieldSpec::Link(s) => &s.name,
            FieldSpec::Group(s) => &s.name,
        }
    }

    /// Category name used in error messages and listings.
    pub fn category(&self) -> &'static str {
        match self {
            FieldSpec::Attribute(_) => "attribute",
            FieldSpec::Dataset(_) => "dataset",
            FieldSpec::Link(_) => "link",
            FieldSpec::Group(_) => "group",
        }
    }

    /// Whether a value must be supplied or defaulted.
    pub fn is_required(&self) -> bool {
        match self {
            FieldSpec::Attribute(s) => s.required,
            FieldSpec::Dataset(s) => s.is_required(),
            FieldSpec::Link(s) => s.quantity.is_required(),
            FieldSpec::Group(s) => s.quantity.is_required(),
        }
    }

    /// Type a link or child slot refers to; `None` for attributes and datasets.
    pub fn target_type(&self) -> Option<&str> {
        match self {
            FieldSpec::Link(s) => Some(&s.target_type),
            FieldSpec::Group(s) => Some(&s.target_type),
            FieldSpec::Attribute(_) | FieldSpec::Dataset(_) => None,
        }
    }

    pub fn doc(&self) -> &str {
        match self {
            FieldSpec::Attribute(s) => &s.doc,
            FieldSpec::Dataset(s) => &s.doc,
            FieldSpec::Link(s) => &s.doc,
            FieldSpec::Group(s) => &s.doc,
        }
    }
}

/// Whether instances are stored as groups or as datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKind {
    #[default]
    Group,
    Dataset,
}

/// Schema definition of one container type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub kind: SpecKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
    /// Payload contract of a dataset-like type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

impl TypeSpec {
    /// Group-like type with no fields.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SpecKind::Group,
            extends: None,
            doc: String::new(),
            data: None,
            fields: Vec::new(),
        }
    }

    /// Dataset-like type; its payload is declared with [`TypeSpec::with_data`].
    pub fn dataset(name: impl Into<String>) -> Self {
        Self {
            kind: SpecKind::Dataset,
            ..Self::group(name)
        }
    }

    /// Inherit the fields of `parent`.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Payload contract of a dataset-like type.
    pub fn with_data(mut self, data: DataSpec) -> Self {
        self.data = Some(data);
        self
    }

    /// Declare an attribute.
    pub fn attribute(mut self, spec: AttributeSpec) -> Self {
        self.fields.push(FieldSpec::Attribute(spec));
        self
    }

    /// Declare an untyped dataset.
    pub fn dataset_field(mut self, spec: DatasetSpec) -> Self {
        self.fields.push(FieldSpec::Dataset(spec));
        self
    }

    /// Declare a link to a container held elsewhere.
    pub fn link(mut self, spec: LinkSpec) -> Self {
        self.fields.push(FieldSpec::Link(spec));
        self
    }

    /// Declare a child slot.
    pub fn child(mut self, spec: GroupSpec) -> Self {
        self.fields.push(FieldSpec::Group(spec));
        self
    }

    /// Own fields in declaration order, with the payload of a dataset-like
    /// type exposed as a `data` dataset field.
    pub fn own_fields(&self) -> Vec<FieldSpec> {
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        if let Some(data) = &self.data {
            fields.push(FieldSpec::Dataset(DatasetSpec::from_data_spec(
                crate::DATA_FIELD,
                data,
            )));
        }
        fields.extend(self.fields.iter().cloned());
        fields
    }
}
