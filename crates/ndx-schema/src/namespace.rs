//! Versioned namespaces and their persisted descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::spec::{FieldSpec, SpecKind, TypeSpec};
use crate::SchemaDefinitionError;

/// An external type used by reference: `(type name, foreign namespace)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeInclude {
    pub type_name: String,
    pub namespace: String,
}

impl TypeInclude {
    pub fn new(type_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: namespace.into(),
        }
    }
}

/// A named, versioned collection of type specs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<TypeInclude>,
    #[serde(default)]
    pub types: Vec<TypeSpec>,
}

impl Namespace {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            doc: String::new(),
            authors: Vec::new(),
            contacts: Vec::new(),
            includes: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn includes_type(&self, name: &str) -> Option<&TypeInclude> {
        self.includes.iter().find(|i| i.type_name == name)
    }

    /// Checks that need nothing outside this namespace.
    pub fn validate(&self) -> Result<(), SchemaDefinitionError> {
        validate_version(&self.version)?;
        if self.name.trim().is_empty() {
            return Err(SchemaDefinitionError::Malformed(
                "namespace name is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.types {
            if !seen.insert(spec.name.as_str()) || self.includes_type(&spec.name).is_some() {
                return Err(SchemaDefinitionError::DuplicateType {
                    namespace: self.name.clone(),
                    type_name: spec.name.clone(),
                });
            }
            validate_type_spec(spec)?;
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, SchemaDefinitionError> {
        serde_yaml::to_string(self).map_err(|e| SchemaDefinitionError::Malformed(e.to_string()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaDefinitionError> {
        let ns: Namespace = serde_yaml::from_str(yaml)
            .map_err(|e| SchemaDefinitionError::Malformed(e.to_string()))?;
        ns.validate()?;
        Ok(ns)
    }

    pub fn to_json(&self) -> Result<String, SchemaDefinitionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SchemaDefinitionError::Malformed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaDefinitionError> {
        let ns: Namespace = serde_json::from_str(json)
            .map_err(|e| SchemaDefinitionError::Malformed(e.to_string()))?;
        ns.validate()?;
        Ok(ns)
    }
}

/// `MAJOR.MINOR.PATCH`, each a decimal number.
pub fn validate_version(version: &str) -> Result<(), SchemaDefinitionError> {
    let parts: Vec<&str> = version.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if well_formed {
        Ok(())
    } else {
        Err(SchemaDefinitionError::InvalidVersion(version.to_string()))
    }
}

fn validate_type_spec(spec: &TypeSpec) -> Result<(), SchemaDefinitionError> {
    if spec.kind == SpecKind::Dataset
        && spec
            .fields
            .iter()
            .any(|f| matches!(f, FieldSpec::Group(_) | FieldSpec::Dataset(_)))
    {
        return Err(SchemaDefinitionError::GroupInDatasetType(spec.name.clone()));
    }
    if spec.kind == SpecKind::Group && spec.data.is_some() {
        return Err(SchemaDefinitionError::Malformed(format!(
            "group type '{}' declares a data contract",
            spec.name
        )));
    }

    let mut names = HashSet::new();
    for field in spec.own_fields() {
        if crate::io::TAG_ATTRIBUTES.contains(&field.name()) {
            return Err(SchemaDefinitionError::Malformed(format!(
                "{}: '{}' is reserved for type tags",
                spec.name,
                field.name()
            )));
        }
        if !names.insert(field.name().to_string()) {
            return Err(SchemaDefinitionError::DuplicateField {
                type_name: spec.name.clone(),
                field: field.name().to_string(),
            });
        }
        check_defaults(&spec.name, &field)?;
    }
    Ok(())
}

fn check_defaults(type_name: &str, field: &FieldSpec) -> Result<(), SchemaDefinitionError> {
    let attributes = match field {
        FieldSpec::Attribute(a) => std::slice::from_ref(a),
        FieldSpec::Dataset(d) => d.attributes.as_slice(),
        _ => return Ok(()),
    };
    for attr in attributes {
        if let Some(default) = &attr.default_value {
            default.check_kind(&attr.name, attr.dtype).map_err(|e| {
                SchemaDefinitionError::Malformed(format!("{}: bad default: {}", type_name, e))
            })?;
        }
    }
    Ok(())
}
