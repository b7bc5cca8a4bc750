//! Dynamic parameter values and their expected types

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A caller-supplied parameter value
///
/// Deserializes untagged, so the JSON object `{"p": 2, "delta": 0.5}` yields
/// `Int(2)` and `Real(0.5)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Numeric view of the value, `None` for non-numeric values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
            Self::Bool(_) | Self::Text(_) | Self::List(_) => None,
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Equality used for enumerated constraints: numbers compare by value
    pub fn loosely_eq(&self, other: &Self) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Real(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{:?}", value),
            Self::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            },
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl TryFrom<usize> for ParamValue {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self> {
        i64::try_from(value).map(Self::Int).map_err(|_| {
            ValidationError::type_mismatch(format!(
                "Value {} does not fit in a 64-bit signed integer",
                value
            ))
        })
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Expected type of a declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Bool,
    /// Whole numbers only; booleans are not accepted
    Integer,
    /// Any real number, integers included
    Real,
    Text,
    /// Ordered sequence whose every element has the inner type
    List(Box<ParamType>),
}

impl ParamType {
    /// Sequence of `element`
    pub fn list_of(element: ParamType) -> Self {
        Self::List(Box::new(element))
    }

    /// Whether `value` is an instance of this type
    pub fn matches(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::Bool, ParamValue::Bool(_))
            | (Self::Integer, ParamValue::Int(_))
            | (Self::Real, ParamValue::Int(_) | ParamValue::Real(_))
            | (Self::Text, ParamValue::Text(_)) => true,
            (Self::List(element), ParamValue::List(values)) => {
                values.iter().all(|value| element.matches(value))
            },
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "int"),
            Self::Real => write!(f, "real"),
            Self::Text => write!(f, "text"),
            Self::List(element) => write!(f, "list of {}", element),
        }
    }
}

/// Caller-supplied mapping from parameter name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParamSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value, returning the one it replaced
    pub fn insert<K: Into<String>, V: Into<ParamValue>>(
        &mut self,
        name: K,
        value: V,
    ) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}
