#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # TDA Input Validation
//!
//! Validation gate for the inputs of a topological data analysis pipeline.
//! Every validator either hands the input back unchanged or fails with a
//! descriptive [`ValidationError`]; nothing is computed, cached or written.
//!
//! ## Features
//!
//! - **Persistence diagrams**: shape `(n_samples, n_points, 3)`, integer
//!   homology dimensions (or a single stacked `inf` dimension), no point below
//!   the diagonal
//! - **Graph adjacency batches**: square, zero-diagonal, symmetric within
//!   tolerance, non-negative
//! - **Hyperparameters**: type, range and enumerated-set checks against
//!   [`ParamDecl`] declarations, including per-element checks for lists
//! - **Metric parameters**: built-in schemas for the `bottleneck`,
//!   `wasserstein`, `betti`, `landscape` and `heat` metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use tda_validate::{check_diagram, validate_metric_params, ErrorKind, ParamSet};
//!
//! # fn main() -> tda_validate::Result<()> {
//! let diagrams = array![[[0.0, 1.0, 0.0], [0.2, 0.9, 1.0]]];
//! let checked = check_diagram(&diagrams)?;
//! assert_eq!(checked, diagrams.view());
//!
//! validate_metric_params("wasserstein", &ParamSet::new().with("p", 2).with("delta", 0.5))?;
//!
//! let err = validate_metric_params("wasserstein", &ParamSet::new().with("p", 0)).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Value);
//! # Ok(())
//! # }
//! ```
//!
//! ## Declaring hyperparameters
//!
//! ```rust
//! use tda_validate::{validate_params, Constraint, ParamDecl, ParamRange, ParamSet, ParamType};
//!
//! let references = vec![
//!     ParamDecl::new("n_values", ParamType::Integer).in_range(ParamRange::at_least(1.0)),
//!     ParamDecl::new("homology_dimensions", ParamType::list_of(ParamType::Integer))
//!         .each(Constraint::Range(ParamRange::at_least(0.0))),
//! ];
//! let params = ParamSet::new()
//!     .with("n_values", 100)
//!     .with("homology_dimensions", vec![0, 1]);
//! assert!(validate_params(&params, &references).is_ok());
//! ```
//!
//! ### Feature Flags
//!
//! - `subscriber` (default): [`TracingConfig`] and subscriber initialization helpers
//! - `tracing-json`: JSON structured log output
//! - `tracing-files`: daily rolling log files

pub mod config;
pub mod error;
pub mod schema;
pub mod tracing_config;
pub mod types;
pub mod utils;

// Public API exports
pub use config::{DiagonalCheck, Tolerance, ValidationConfig, ValidationConfigBuilder};
pub use error::{ErrorKind, Result, ValidationError};
pub use schema::{Constraint, Metric, MetricRegistry, MetricSchema, ParamDecl, ParamRange};
pub use tracing_config::{events, spans, TracingConfig, TracingFormat, TracingOutput};
pub use types::{ParamSet, ParamType, ParamValue};
pub use utils::validation::STACKED_DIMENSION;
pub use utils::{
    check_diagram, check_graph, check_graph_with, validate_metric_params, validate_params,
    DiagramValidator, GraphValidator, ParamValidator,
};

#[cfg(feature = "subscriber")]
pub use tracing_config::{init_library_tracing, init_tracing};
