//! Configuration types for validation operations

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// How the graph validator checks for self-loops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagonalCheck {
    /// Every diagonal entry must be exactly zero
    #[default]
    Strict,
    /// Only the sum of all diagonal entries must be zero, so entries of
    /// opposite sign can cancel out
    Sum,
}

impl std::fmt::Display for DiagonalCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Sum => write!(f, "sum"),
        }
    }
}

/// Absolute and relative tolerance for approximate equality
///
/// `a` is close to `b` when `|a - b| <= atol + rtol * |b|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Exact equality
    pub fn exact() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Whether `a` is within tolerance of `b`. NaN is never close to anything.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [("rtol", self.rtol), ("atol", self.atol)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::invalid_config(format!(
                    "Symmetry tolerance {} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for the array validators
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Self-loop check used by the graph validator
    pub diagonal_check: DiagonalCheck,

    /// Tolerance of the graph symmetry check
    pub symmetry: Tolerance,
}

impl ValidationConfig {
    /// Create a new configuration builder
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.symmetry.validate()
    }

    fn warn_if_lenient(&self) {
        if self.diagonal_check == DiagonalCheck::Sum {
            log::warn!(
                "Sum-based diagonal check accepts diagonals whose non-zero entries cancel out"
            );
        }
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ValidationError::invalid_config(format!("Failed to parse validation config: {}", e))
        })?;
        config.validate()?;
        config.warn_if_lenient();
        Ok(config)
    }
}

/// Builder for [`ValidationConfig`]
#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    config: ValidationConfig,
}

impl ValidationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn diagonal_check(mut self, check: DiagonalCheck) -> Self {
        self.config.diagonal_check = check;
        self
    }

    #[must_use]
    pub fn symmetry_tolerance(mut self, rtol: f64, atol: f64) -> Self {
        self.config.symmetry = Tolerance::new(rtol, atol);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ValidationConfig> {
        self.config.validate()?;
        self.config.warn_if_lenient();
        Ok(self.config)
    }
}
