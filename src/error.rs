//! Error types for validation operations

use std::fmt::Display;
use thiserror::Error;

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Coarse classification of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong dimensionality or axis size
    Shape,
    /// Wrong value type, or non-square per-sample matrices
    Type,
    /// Range violation, semantic invariant violation or unknown name
    Value,
}

/// Error types raised by the diagram, graph and parameter validators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Array has the wrong number of dimensions or the wrong axis size
    #[error("Shape error: {0}")]
    Shape(String),

    /// Value has the wrong type, or a graph batch is not square
    #[error("Type error: {0}")]
    Type(String),

    /// Value is out of range or breaks a semantic invariant
    #[error("Value error: {0}")]
    Value(String),

    /// A declared parameter was not supplied
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Invalid validator configuration or schema declaration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ValidationError {
    /// Create a new shape error
    pub fn shape<S: Into<String>>(msg: S) -> Self {
        Self::Shape(msg.into())
    }

    /// Create a new type error
    pub fn type_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::Type(msg.into())
    }

    /// Create a new value error
    pub fn value<S: Into<String>>(msg: S) -> Self {
        Self::Value(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Error classification, independent of the message
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Shape(_) => ErrorKind::Shape,
            Self::Type(_) => ErrorKind::Type,
            Self::Value(_) | Self::MissingParameter(_) | Self::InvalidConfig(_) => {
                ErrorKind::Value
            },
        }
    }

    // Contextual error creators

    /// Create a range violation error for a named parameter
    pub fn out_of_range<V: Display, R: Display>(parameter: &str, value: V, range: R) -> Self {
        Self::Value(format!(
            "Parameter {} is {}, while it should be in the range {}",
            parameter, value, range
        ))
    }

    /// Create an unknown metric error listing the registered names
    pub fn unknown_metric(metric: &str, available: &[&str]) -> Self {
        Self::Value(format!(
            "No metric called {}. Available metrics are [{}]",
            metric,
            available.join(", ")
        ))
    }

    /// Create an unknown parameter error listing the recognized names
    pub fn unknown_parameter(parameter: &str, available: &[&str]) -> Self {
        Self::Value(format!(
            "{} is not an available metric parameter. Available parameters are [{}]",
            parameter,
            available.join(", ")
        ))
    }
}
