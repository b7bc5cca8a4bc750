//! Consolidated validation utilities
//!
//! Array validators for persistence diagrams and graph adjacency batches, and
//! parameter validators for declared hyperparameters and metric parameters.

pub mod diagram;
pub mod graph;
pub mod params;

pub use diagram::{check_diagram, DiagramValidator, STACKED_DIMENSION};
pub use graph::{check_graph, check_graph_with, GraphValidator};
pub use params::{validate_metric_params, validate_params, ParamValidator};
