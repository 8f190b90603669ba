//! Error types for schema loading, container validation and I/O.

use thiserror::Error;

/// Raised while declaring or loading namespaces. Never recovered from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaDefinitionError {
    #[error("Type '{type_name}' is defined more than once in namespace '{namespace}'")]
    DuplicateType { namespace: String, type_name: String },
    #[error("Type '{type_name}' is already defined by namespace '{owner}'")]
    TypeOwnedElsewhere { type_name: String, owner: String },
    #[error("Type '{type_name}' extends unknown type '{parent}'")]
    UnknownParent { type_name: String, parent: String },
    #[error("Inheritance cycle detected: {}", .path.join(" -> "))]
    InheritanceCycle { path: Vec<String> },
    #[error("Included type '{type_name}' not found in namespace '{namespace}'")]
    UnresolvedInclude { type_name: String, namespace: String },
    #[error("Field '{field}' of type '{type_name}' refers to unknown type '{target}'")]
    UnresolvedTarget {
        type_name: String,
        field: String,
        target: String,
    },
    #[error("Field '{field}' is declared more than once in type '{type_name}'")]
    DuplicateField { type_name: String, field: String },
    #[error("Type '{type_name}' drops field '{field}' which its ancestor '{ancestor}' marks required")]
    DroppedRequiredField {
        type_name: String,
        field: String,
        ancestor: String,
    },
    #[error("Type '{type_name}' redeclares field '{field}' as a {found} (inherited as a {expected})")]
    FieldCategoryChanged {
        type_name: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Type '{type_name}' narrows the shape of '{field}' incompatibly with its ancestor")]
    IncompatibleShape { type_name: String, field: String },
    #[error("Namespace '{namespace}' version {requested} conflicts with loaded version {loaded}")]
    VersionConflict {
        namespace: String,
        loaded: String,
        requested: String,
    },
    #[error("Namespace '{namespace}' {version} was already loaded with a different definition")]
    ConflictingDefinition { namespace: String, version: String },
    #[error("Invalid version '{0}': expected MAJOR.MINOR.PATCH")]
    InvalidVersion(String),
    #[error("Dataset-like type '{0}' cannot declare child groups or datasets")]
    GroupInDatasetType(String),
    #[error("Malformed namespace descriptor: {0}")]
    Malformed(String),
}

/// Raised when a container's field values do not satisfy its resolved spec.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldValidationError {
    #[error("Unknown type '{0}'")]
    UnknownType(String),
    #[error("{type_name}: required field '{field}' is missing")]
    MissingField { type_name: String, field: String },
    #[error("{type_name}: '{field}' is not a field of this type")]
    UnknownField { type_name: String, field: String },
    #[error("{field}: expected {expected}, found {found}")]
    WrongKind {
        field: String,
        expected: String,
        found: String,
    },
    #[error("{field}: value {value} does not fit in {kind}")]
    OutOfRange {
        field: String,
        kind: String,
        value: String,
    },
    #[error("{field}: expected rank {expected}, found rank {found}")]
    RankMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    #[error("{field}: dimension {axis} must have size {expected}, found {found}")]
    ShapeMismatch {
        field: String,
        axis: usize,
        expected: usize,
        found: usize,
    },
    #[error("{field}: link target does not exist in this tree")]
    UnresolvedLink { field: String },
    #[error("{field}: expected a {expected}, found a {found}")]
    LinkTargetType {
        field: String,
        expected: String,
        found: String,
    },
    #[error("{field}: cardinality {cardinality} does not accept {found}")]
    Cardinality {
        field: String,
        cardinality: String,
        found: String,
    },
    #[error("{field}: child '{child}' is already attached elsewhere")]
    ChildNotDetached { field: String, child: String },
    #[error("{field}: child names must be unique, '{child}' appears twice")]
    DuplicateChild { field: String, child: String },
    #[error("{field}: inconsistent chunks: {message}")]
    InconsistentChunks { field: String, message: String },
    #[error("Invalid container name '{0}': must be non-empty and must not contain '/'")]
    InvalidName(String),
    #[error("No container with id {0} in this tree")]
    UnknownContainer(usize),
}

/// Raised when a child cannot be placed under a parent relation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttachmentConflictError {
    #[error("'{parent}' already holds a child named '{name}' under '{relation}'")]
    DuplicateName {
        parent: String,
        relation: String,
        name: String,
    },
    #[error("'{relation}' is not a child relation of {type_name}")]
    UndeclaredRelation { type_name: String, relation: String },
    #[error("'{relation}' holds {expected}, cannot take a {found}")]
    IncompatibleChild {
        relation: String,
        expected: String,
        found: String,
    },
    #[error("'{relation}' on '{parent}' holds a single child and is already occupied")]
    SlotOccupied { parent: String, relation: String },
    #[error("'{name}' is already attached under '{parent}'")]
    AlreadyAttached { name: String, parent: String },
    #[error("Attaching '{name}' under '{parent}' would create a containment cycle")]
    ContainmentCycle { name: String, parent: String },
    #[error("'{relation}' on '{parent}' is required and cannot be emptied")]
    RequiredSlot { parent: String, relation: String },
    #[error("'{parent}' has no child named '{name}' under '{relation}'")]
    NoSuchChild {
        parent: String,
        relation: String,
        name: String,
    },
    #[error("No container with id {0} in this tree")]
    UnknownContainer(usize),
}

/// Raised at the storage boundary.
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("Storage failure at '{path}': {message}")]
    Storage { path: String, message: String },
    #[error("Corrupt source at '{path}': {message}")]
    Corrupt { path: String, message: String },
    #[error("Stored data uses {namespace} {stored}, installed schema is {installed}")]
    NamespaceVersionMismatch {
        namespace: String,
        stored: String,
        installed: String,
    },
    #[error("Stored data references namespace '{0}' which is not loaded")]
    UnknownNamespace(String),
    #[error("Stored data references unknown type '{type_name}' in namespace '{namespace}'")]
    UnknownType { namespace: String, type_name: String },
    #[error("Link '{field}' on '{path}' points outside the written tree")]
    DanglingLink { path: String, field: String },
    #[error("Invalid data at '{path}': {source}")]
    Validation {
        path: String,
        #[source]
        source: FieldValidationError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Any error produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaDefinitionError),
    #[error(transparent)]
    Field(#[from] FieldValidationError),
    #[error(transparent)]
    Attachment(#[from] AttachmentConflictError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
