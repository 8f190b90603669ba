//! Data kinds and scalar values.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Element type of an attribute or dataset.
///
/// Schema documents may use the shorthand spellings `float`, `int`,
/// `double` and `utf8`; they decode to the canonical sized kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    #[serde(alias = "utf8", alias = "ascii", alias = "str")]
    Text,
    Bool,
    Int8,
    Int16,
    #[serde(alias = "int")]
    Int32,
    #[serde(alias = "long")]
    Int64,
    Uint8,
    Uint16,
    #[serde(alias = "uint")]
    Uint32,
    Uint64,
    #[serde(alias = "float")]
    Float32,
    #[serde(alias = "double")]
    Float64,
    Numeric,
}

impl DataKind {
    pub fn name(&self) -> &'static str {
        match self {
            DataKind::Text => "text",
            DataKind::Bool => "bool",
            DataKind::Int8 => "int8",
            DataKind::Int16 => "int16",
            DataKind::Int32 => "int32",
            DataKind::Int64 => "int64",
            DataKind::Uint8 => "uint8",
            DataKind::Uint16 => "uint16",
            DataKind::Uint32 => "uint32",
            DataKind::Uint64 => "uint64",
            DataKind::Float32 => "float32",
            DataKind::Float64 => "float64",
            DataKind::Numeric => "numeric",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataKind::Int8
                | DataKind::Int16
                | DataKind::Int32
                | DataKind::Int64
                | DataKind::Uint8
                | DataKind::Uint16
                | DataKind::Uint32
                | DataKind::Uint64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataKind::Float32 | DataKind::Float64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float() || *self == DataKind::Numeric
    }

    /// Inclusive integer range for sized integer kinds.
    fn int_range(&self) -> Option<(i128, i128)> {
        match self {
            DataKind::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            DataKind::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            DataKind::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            DataKind::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            DataKind::Uint8 => Some((0, u8::MAX as i128)),
            DataKind::Uint16 => Some((0, u16::MAX as i128)),
            DataKind::Uint32 => Some((0, u32::MAX as i128)),
            DataKind::Uint64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// Check whether an integer fits this kind.
    pub fn fits_int(&self, value: i64) -> bool {
        match self.int_range() {
            Some((lo, hi)) => (lo..=hi).contains(&(value as i128)),
            None => self.is_float() || *self == DataKind::Numeric,
        }
    }

    /// Check whether a float fits this kind. Non-finite values always fit a
    /// float kind; finite ones must not overflow `float32`.
    pub fn fits_float(&self, value: f64) -> bool {
        match self {
            DataKind::Float32 => !(value.is_finite() && (value as f32).is_infinite()),
            _ => true,
        }
    }

    /// Whether values of `element` can be stored under this kind.
    pub fn accepts_element(&self, element: ElementKind) -> bool {
        match element {
            ElementKind::Text => *self == DataKind::Text,
            ElementKind::Bool => *self == DataKind::Bool,
            ElementKind::Int => self.is_numeric(),
            ElementKind::Float => self.is_float() || *self == DataKind::Numeric,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime category of a value, independent of declared width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Bool,
    Int,
    Float,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Text => "text",
            ElementKind::Bool => "bool",
            ElementKind::Int => "int",
            ElementKind::Float => "float",
        };
        f.write_str(s)
    }
}

/// A float that survives JSON: finite values are numbers, the others are
/// the strings `"NaN"`, `"inf"` and `"-inf"`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PortableF64(pub f64);

impl PortableF64 {
    fn parse_non_finite(s: &str) -> Option<f64> {
        match s {
            "NaN" => Some(f64::NAN),
            "inf" => Some(f64::INFINITY),
            "-inf" => Some(f64::NEG_INFINITY),
            _ => None,
        }
    }
}

impl Serialize for PortableF64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() {
            serializer.serialize_f64(v)
        } else if v.is_nan() {
            serializer.serialize_str("NaN")
        } else if v > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

impl<'de> Deserialize<'de> for PortableF64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(PortableF64(v)),
            Repr::Text(s) => PortableF64::parse_non_finite(&s).map(PortableF64).ok_or_else(|| {
                D::Error::custom(format!("expected a number, \"NaN\", \"inf\" or \"-inf\", found \"{}\"", s))
            }),
        }
    }
}

/// A scalar attribute or dataset value.
///
/// Serialized untagged. A non-finite float is written as
/// `{"float": "NaN"}` (or `"inf"`, `"-inf"`) so it is not read back as text.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            Value::Bool(_) => ElementKind::Bool,
            Value::Int(_) => ElementKind::Int,
            Value::Float(_) => ElementKind::Float,
            Value::Text(_) => ElementKind::Text,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Check this value against a declared kind.
    pub fn check_kind(&self, field: &str, kind: DataKind) -> Result<(), crate::FieldValidationError> {
        if !kind.accepts_element(self.element_kind()) {
            return Err(crate::FieldValidationError::WrongKind {
                field: field.to_string(),
                expected: kind.to_string(),
                found: self.element_kind().to_string(),
            });
        }
        let fits = match self {
            Value::Int(v) => kind.fits_int(*v),
            Value::Float(v) => kind.fits_float(*v),
            _ => true,
        };
        if !fits {
            return Err(crate::FieldValidationError::OutOfRange {
                field: field.to_string(),
                kind: kind.to_string(),
                value: self.to_string(),
            });
        }
        Ok(())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct NonFinite {
            float: PortableF64,
        }

        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Float(v) => NonFinite { float: PortableF64(*v) }.serialize(serializer),
            Value::Text(v) => serializer.serialize_str(v),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Int(i64),
            Float(f64),
            Text(String),
            NonFinite { float: PortableF64 },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bool(v) => Value::Bool(v),
            Repr::Int(v) => Value::Int(v),
            Repr::Float(v) => Value::Float(v),
            Repr::Text(v) => Value::Text(v),
            Repr::NonFinite { float } => Value::Float(float.0),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
