//! Dataset payloads: scalars, n-dimensional arrays and deferred arrays.

use indexmap::IndexMap;
use ndarray::{concatenate, Array1, ArrayD, ArrayViewD, Axis, IxDyn};
use serde::{Deserialize, Serialize};

use crate::dtype::{DataKind, ElementKind, Value};
use crate::FieldValidationError;

/// An in-memory n-dimensional array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "array", rename_all = "lowercase")]
pub enum ArrayData {
    #[serde(with = "portable_array")]
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
    Bool(ArrayD<bool>),
    Text(ArrayD<String>),
}

impl ArrayData {
    pub fn shape(&self) -> &[usize] {
        match self {
            ArrayData::Float(a) => a.shape(),
            ArrayData::Int(a) => a.shape(),
            ArrayData::Bool(a) => a.shape(),
            ArrayData::Text(a) => a.shape(),
        }
    }

    pub fn element_kind(&self) -> ElementKind {
        match self {
            ArrayData::Float(_) => ElementKind::Float,
            ArrayData::Int(_) => ElementKind::Int,
            ArrayData::Bool(_) => ElementKind::Bool,
            ArrayData::Text(_) => ElementKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_float(&self) -> Option<&ArrayD<f64>> {
        match self {
            ArrayData::Float(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&ArrayD<i64>> {
        match self {
            ArrayData::Int(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&ArrayD<String>> {
        match self {
            ArrayData::Text(a) => Some(a),
            _ => None,
        }
    }

    /// Check the element type against a declared kind, including integer widths.
    pub fn check_kind(&self, field: &str, kind: DataKind) -> Result<(), FieldValidationError> {
        if !kind.accepts_element(self.element_kind()) {
            return Err(FieldValidationError::WrongKind {
                field: field.to_string(),
                expected: kind.to_string(),
                found: format!("{} array", self.element_kind()),
            });
        }
        let bad = match self {
            ArrayData::Int(a) => a.iter().find(|v| !kind.fits_int(**v)).map(|v| v.to_string()),
            ArrayData::Float(a) => a.iter().find(|v| !kind.fits_float(**v)).map(|v| v.to_string()),
            _ => None,
        };
        if let Some(value) = bad {
            return Err(FieldValidationError::OutOfRange {
                field: field.to_string(),
                kind: kind.to_string(),
                value,
            });
        }
        Ok(())
    }
}

/// Float arrays as `{"dim": [..], "data": [..]}` in logical order, with
/// non-finite elements written as strings.
mod portable_array {
    use ndarray::{ArrayD, IxDyn};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::dtype::PortableF64;

    #[derive(Serialize)]
    struct Out<'a> {
        dim: &'a [usize],
        data: Vec<PortableF64>,
    }

    #[derive(Deserialize)]
    struct In {
        dim: Vec<usize>,
        data: Vec<PortableF64>,
    }

    pub fn serialize<S: Serializer>(array: &ArrayD<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        Out {
            dim: array.shape(),
            data: array.iter().map(|v| PortableF64(*v)).collect(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ArrayD<f64>, D::Error> {
        let raw = In::deserialize(deserializer)?;
        let data = raw.data.into_iter().map(|v| v.0).collect();
        ArrayD::from_shape_vec(IxDyn(&raw.dim), data).map_err(D::Error::custom)
    }
}

impl From<ArrayD<f64>> for ArrayData {
    fn from(a: ArrayD<f64>) -> Self {
        ArrayData::Float(a)
    }
}

impl From<ArrayD<i64>> for ArrayData {
    fn from(a: ArrayD<i64>) -> Self {
        ArrayData::Int(a)
    }
}

impl From<ArrayD<bool>> for ArrayData {
    fn from(a: ArrayD<bool>) -> Self {
        ArrayData::Bool(a)
    }
}

impl From<ArrayD<String>> for ArrayData {
    fn from(a: ArrayD<String>) -> Self {
        ArrayData::Text(a)
    }
}

impl From<Vec<f64>> for ArrayData {
    fn from(v: Vec<f64>) -> Self {
        ArrayData::Float(Array1::from(v).into_dyn())
    }
}

impl From<Vec<i64>> for ArrayData {
    fn from(v: Vec<i64>) -> Self {
        ArrayData::Int(Array1::from(v).into_dyn())
    }
}

/// Array written in chunks along the first axis, materialized at write time.
///
/// Only the rank and the sizes given in `dims` are checked at construction;
/// the assembled array is checked against the dataset spec when it is written.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredArray {
    kind: ElementKind,
    dims: Vec<Option<usize>>,
    chunks: Vec<ArrayData>,
}

impl DeferredArray {
    pub fn new(kind: ElementKind, dims: Vec<Option<usize>>) -> Self {
        Self {
            kind,
            dims,
            chunks: Vec::new(),
        }
    }

    pub fn element_kind(&self) -> ElementKind {
        self.kind
    }

    /// Expected dimensions; `None` where the size is not known yet.
    pub fn dims(&self) -> &[Option<usize>] {
        &self.dims
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn push_chunk(&mut self, chunk: impl Into<ArrayData>) {
        self.chunks.push(chunk.into());
    }

    pub fn with_chunk(mut self, chunk: impl Into<ArrayData>) -> Self {
        self.push_chunk(chunk);
        self
    }

    /// Concatenate all chunks along axis 0 and check them against `dims`.
    pub fn materialize(&self, field: &str) -> Result<ArrayData, FieldValidationError> {
        let inconsistent = |message: String| FieldValidationError::InconsistentChunks {
            field: field.to_string(),
            message,
        };

        if self.dims.is_empty() {
            return Err(inconsistent("deferred arrays need rank >= 1".to_string()));
        }
        for (i, chunk) in self.chunks.iter().enumerate() {
            if chunk.element_kind() != self.kind {
                return Err(inconsistent(format!(
                    "chunk {} holds {} values, expected {}",
                    i,
                    chunk.element_kind(),
                    self.kind
                )));
            }
            if chunk.shape().len() != self.dims.len() {
                return Err(FieldValidationError::RankMismatch {
                    field: field.to_string(),
                    expected: self.dims.len(),
                    found: chunk.shape().len(),
                });
            }
            if let Some(first) = self.chunks.first() {
                if chunk.shape()[1..] != first.shape()[1..] {
                    return Err(inconsistent(format!(
                        "chunk {} has trailing dims {:?}, expected {:?}",
                        i,
                        &chunk.shape()[1..],
                        &first.shape()[1..]
                    )));
                }
            }
        }

        let assembled = match self.kind {
            ElementKind::Float => ArrayData::Float(self.concat(field, |c| c.as_float())?),
            ElementKind::Int => ArrayData::Int(self.concat(field, |c| c.as_int())?),
            ElementKind::Bool => ArrayData::Bool(self.concat(field, |c| match c {
                ArrayData::Bool(a) => Some(a),
                _ => None,
            })?),
            ElementKind::Text => ArrayData::Text(self.concat(field, |c| c.as_text())?),
        };

        let expected = crate::Shape::new(self.dims.clone());
        expected.check(field, assembled.shape())?;
        Ok(assembled)
    }

    fn concat<T: Clone + Default>(
        &self,
        field: &str,
        view: impl Fn(&ArrayData) -> Option<&ArrayD<T>>,
    ) -> Result<ArrayD<T>, FieldValidationError> {
        let views: Vec<ArrayViewD<'_, T>> =
            self.chunks.iter().filter_map(|c| view(c)).map(|a| a.view()).collect();
        if views.is_empty() {
            let mut empty_dims: Vec<usize> = self.dims.iter().map(|d| d.unwrap_or(0)).collect();
            empty_dims[0] = 0;
            return Ok(ArrayD::default(IxDyn(&empty_dims)));
        }
        concatenate(Axis(0), &views).map_err(|e| FieldValidationError::InconsistentChunks {
            field: field.to_string(),
            message: e.to_string(),
        })
    }
}

/// Payload of a dataset field.
#[derive(Clone, Debug, PartialEq)]
pub enum DatasetData {
    Scalar(Value),
    Array(ArrayData),
    Deferred(DeferredArray),
}

impl DatasetData {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            DatasetData::Scalar(v) => v.element_kind(),
            DatasetData::Array(a) => a.element_kind(),
            DatasetData::Deferred(d) => d.element_kind(),
        }
    }

    /// Dimensions as far as they are known; scalars have rank 0.
    pub fn known_dims(&self) -> Vec<Option<usize>> {
        match self {
            DatasetData::Scalar(_) => Vec::new(),
            DatasetData::Array(a) => a.shape().iter().copied().map(Some).collect(),
            DatasetData::Deferred(d) => d.dims().to_vec(),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayData> {
        match self {
            DatasetData::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            DatasetData::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for DatasetData {
    fn from(v: Value) -> Self {
        DatasetData::Scalar(v)
    }
}

impl From<ArrayData> for DatasetData {
    fn from(a: ArrayData) -> Self {
        DatasetData::Array(a)
    }
}

impl From<ArrayD<f64>> for DatasetData {
    fn from(a: ArrayD<f64>) -> Self {
        DatasetData::Array(ArrayData::Float(a))
    }
}

impl From<ArrayD<i64>> for DatasetData {
    fn from(a: ArrayD<i64>) -> Self {
        DatasetData::Array(ArrayData::Int(a))
    }
}

impl From<DeferredArray> for DatasetData {
    fn from(d: DeferredArray) -> Self {
        DatasetData::Deferred(d)
    }
}

/// A dataset field value with its nested attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetValue {
    pub data: DatasetData,
    pub attributes: IndexMap<String, Value>,
}

impl DatasetValue {
    pub fn new(data: impl Into<DatasetData>) -> Self {
        Self {
            data: data.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
