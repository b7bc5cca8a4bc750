//! Utility modules for input validation

pub mod validation;

// Re-export commonly used items for convenience
pub use validation::{
    check_diagram, check_graph, check_graph_with, validate_metric_params, validate_params,
    DiagramValidator, GraphValidator, ParamValidator,
};
