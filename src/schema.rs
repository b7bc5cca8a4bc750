//! Parameter declarations and the metric schema registry
//!
//! A [`ParamDecl`] names a parameter, its expected [`ParamType`] and an optional
//! [`Constraint`]. A [`MetricRegistry`] maps metric names to ordered lists of
//! declarations. The built-in registry returned by [`MetricRegistry::global`] is
//! constructed once on first use and never mutated afterwards; additional
//! registries can be assembled in code or loaded from JSON.

use crate::error::{Result, ValidationError};
use crate::types::{ParamSet, ParamType, ParamValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;
use std::sync::OnceLock;

/// Numeric interval a parameter value must lie in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
}

impl ParamRange {
    /// `[min, max]`
    pub fn closed(min: f64, max: f64) -> Self {
        Self {
            lower: Bound::Included(min),
            upper: Bound::Included(max),
        }
    }

    /// `[min, inf)`
    pub fn at_least(min: f64) -> Self {
        Self {
            lower: Bound::Included(min),
            upper: Bound::Unbounded,
        }
    }

    /// `(min, inf)`
    pub fn greater_than(min: f64) -> Self {
        Self {
            lower: Bound::Excluded(min),
            upper: Bound::Unbounded,
        }
    }

    /// Whether `value` lies in the interval. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above = match self.lower {
            Bound::Included(min) => value >= min,
            Bound::Excluded(min) => value > min,
            Bound::Unbounded => true,
        };
        let below = match self.upper {
            Bound::Included(max) => value <= max,
            Bound::Excluded(max) => value < max,
            Bound::Unbounded => true,
        };
        above && below
    }

    fn validate(&self) -> Result<()> {
        let endpoint = |bound: Bound<f64>| match bound {
            Bound::Included(x) | Bound::Excluded(x) => Some(x),
            Bound::Unbounded => None,
        };
        let lower = endpoint(self.lower);
        let upper = endpoint(self.upper);

        if lower.is_some_and(f64::is_nan) || upper.is_some_and(f64::is_nan) {
            return Err(ValidationError::invalid_config(format!(
                "Range {} has a NaN endpoint",
                self
            )));
        }
        if let (Some(min), Some(max)) = (lower, upper) {
            if min > max {
                return Err(ValidationError::invalid_config(format!(
                    "Range {} is empty: lower endpoint exceeds upper endpoint",
                    self
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Bound::Included(min) => write!(f, "[{}", min)?,
            Bound::Excluded(min) => write!(f, "({}", min)?,
            Bound::Unbounded => write!(f, "(-inf")?,
        }
        match self.upper {
            Bound::Included(max) => write!(f, ", {}]", max),
            Bound::Excluded(max) => write!(f, ", {})", max),
            Bound::Unbounded => write!(f, ", inf)"),
        }
    }
}

/// Constraint applied to a value once its type has been checked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Numeric value within an interval
    Range(ParamRange),
    /// Value equal to one of the listed literals
    OneOf(Vec<ParamValue>),
    /// Inner constraint applied to every element of a list
    Each(Box<Constraint>),
}

/// Declaration of a single parameter: name, expected type and optional constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub expected: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl ParamDecl {
    /// Declaration with a type check only
    pub fn new<S: Into<String>>(name: S, expected: ParamType) -> Self {
        Self {
            name: name.into(),
            expected,
            constraint: None,
        }
    }

    #[must_use]
    pub fn in_range(mut self, range: ParamRange) -> Self {
        self.constraint = Some(Constraint::Range(range));
        self
    }

    #[must_use]
    pub fn one_of<I, V>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.constraint = Some(Constraint::OneOf(
            allowed.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Apply `constraint` to every element of a list-typed parameter
    #[must_use]
    pub fn each(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(Constraint::Each(Box::new(constraint)));
        self
    }

    /// Check that the constraint can apply to the declared type
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ValidationError::invalid_config(
                "Parameter declaration has an empty name",
            ));
        }
        match &self.constraint {
            None => Ok(()),
            Some(constraint) => validate_constraint(&self.name, &self.expected, constraint),
        }
    }
}

fn validate_constraint(name: &str, expected: &ParamType, constraint: &Constraint) -> Result<()> {
    match (expected, constraint) {
        (ParamType::Integer | ParamType::Real, Constraint::Range(range)) => range.validate(),
        (_, Constraint::Range(_)) => Err(ValidationError::invalid_config(format!(
            "Parameter {} declares a numeric range but has type {}",
            name, expected
        ))),
        (ParamType::List(element), Constraint::Each(inner)) => {
            validate_constraint(name, element, inner)
        },
        (_, Constraint::Each(_)) => Err(ValidationError::invalid_config(format!(
            "Parameter {} declares a per-element constraint but has type {}",
            name, expected
        ))),
        (_, Constraint::OneOf(allowed)) => {
            if allowed.is_empty() {
                return Err(ValidationError::invalid_config(format!(
                    "Parameter {} declares an empty set of allowed values",
                    name
                )));
            }
            Ok(())
        },
    }
}

/// Metrics with a built-in parameter schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Bottleneck,
    Wasserstein,
    Betti,
    Landscape,
    Heat,
}

impl Metric {
    /// All built-in metrics, in registry order
    pub const ALL: [Metric; 5] = [
        Self::Bottleneck,
        Self::Wasserstein,
        Self::Betti,
        Self::Landscape,
        Self::Heat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bottleneck => "bottleneck",
            Self::Wasserstein => "wasserstein",
            Self::Betti => "betti",
            Self::Landscape => "landscape",
            Self::Heat => "heat",
        }
    }

    /// Built-in parameter declarations for this metric
    pub fn schema(self) -> Vec<ParamDecl> {
        let real = |name: &str| ParamDecl::new(name, ParamType::Real);
        let int = |name: &str| ParamDecl::new(name, ParamType::Integer);

        match self {
            Self::Bottleneck => vec![real("delta").in_range(ParamRange::closed(0.0, 1.0))],
            Self::Wasserstein => vec![
                int("p").in_range(ParamRange::at_least(1.0)),
                real("delta").in_range(ParamRange::closed(1e-16, 1.0)),
            ],
            Self::Betti => vec![
                real("p").in_range(ParamRange::at_least(1.0)),
                int("n_values").in_range(ParamRange::at_least(1.0)),
            ],
            Self::Landscape => vec![
                real("p").in_range(ParamRange::at_least(1.0)),
                int("n_values").in_range(ParamRange::at_least(1.0)),
                int("n_layers").in_range(ParamRange::at_least(1.0)),
            ],
            Self::Heat => vec![
                real("order").in_range(ParamRange::at_least(1.0)),
                int("n_values").in_range(ParamRange::at_least(1.0)),
                real("sigma").in_range(ParamRange::at_least(0.0)),
            ],
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| {
                let available: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                ValidationError::unknown_metric(s, &available)
            })
    }
}

/// Named metric with its ordered parameter declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSchema {
    pub name: String,
    pub parameters: Vec<ParamDecl>,
}

/// Immutable table of metric schemas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricRegistry {
    entries: Vec<MetricSchema>,
}

static GLOBAL_REGISTRY: OnceLock<MetricRegistry> = OnceLock::new();

impl MetricRegistry {
    /// Build a registry, rejecting duplicate names and malformed declarations
    pub fn new(entries: Vec<MetricSchema>) -> Result<Self> {
        let mut metric_names = HashSet::new();
        for entry in &entries {
            if !metric_names.insert(entry.name.as_str()) {
                return Err(ValidationError::invalid_config(format!(
                    "Metric {} is declared more than once",
                    entry.name
                )));
            }
            let mut param_names = HashSet::new();
            for decl in &entry.parameters {
                decl.validate()?;
                if !param_names.insert(decl.name.as_str()) {
                    return Err(ValidationError::invalid_config(format!(
                        "Parameter {} is declared more than once for metric {}",
                        decl.name, entry.name
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    /// Registry holding the built-in metric schemas
    pub fn builtin() -> Self {
        Self {
            entries: Metric::ALL
                .into_iter()
                .map(|metric| MetricSchema {
                    name: metric.as_str().to_string(),
                    parameters: metric.schema(),
                })
                .collect(),
        }
    }

    /// Process-wide built-in registry, constructed on first use
    pub fn global() -> &'static Self {
        GLOBAL_REGISTRY.get_or_init(Self::builtin)
    }

    /// Load a registry from a JSON array of metric schemas
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<MetricSchema> = serde_json::from_str(json).map_err(|e| {
            ValidationError::invalid_config(format!("Failed to parse metric schemas: {}", e))
        })?;
        Self::new(entries)
    }

    /// Registered metric names, in declaration order
    pub fn metrics(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.schema(metric).is_some()
    }

    /// Parameter declarations registered under `metric`
    pub fn schema(&self, metric: &str) -> Option<&[ParamDecl]> {
        self.entries
            .iter()
            .find(|entry| entry.name == metric)
            .map(|entry| entry.parameters.as_slice())
    }

    /// Every parameter name declared by any metric
    pub fn parameter_names(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.parameters.iter())
            .map(|decl| decl.name.as_str())
            .collect()
    }

    /// Validate `params` for `metric` against this registry
    pub fn validate(&self, metric: &str, params: &ParamSet) -> Result<()> {
        crate::utils::validation::params::validate_metric_params_in(self, metric, params)
    }
}
