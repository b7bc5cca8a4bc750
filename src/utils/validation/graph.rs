//! Graph adjacency matrix validation
//!
//! A batch of graphs is a 3D array of shape `(n_samples, n_nodes, n_nodes)`.
//! Each matrix must be square, free of self-loops, symmetric and non-negative.

use crate::config::{DiagonalCheck, Tolerance, ValidationConfig};
use crate::error::{Result, ValidationError};
use crate::tracing_config::{events, spans};
use ndarray::{ArrayBase, ArrayView3, Axis, Data, Dimension, Ix3, Zip};
use tracing::debug;

/// Validator for graph adjacency batches
pub struct GraphValidator;

impl GraphValidator {
    /// Validate the batch is 3D with square per-sample matrices
    pub fn validate_shape<S, D>(x: &ArrayBase<S, D>) -> Result<ArrayView3<'_, f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if x.ndim() != 3 {
            return Err(ValidationError::shape(format!(
                "Graph structure dimension error: {}. Graph structure dimension must be equal to 3",
                x.ndim()
            )));
        }

        let graphs = x
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|e| ValidationError::shape(e.to_string()))?;

        let (rows, cols) = (graphs.len_of(Axis(1)), graphs.len_of(Axis(2)));
        if rows != cols {
            return Err(ValidationError::type_mismatch(format!(
                "Matrix is not square: {}x{}",
                rows, cols
            )));
        }

        Ok(graphs)
    }

    /// Validate that no graph has a self-loop
    pub fn validate_diagonal(graphs: &ArrayView3<'_, f64>, check: DiagonalCheck) -> Result<()> {
        match check {
            DiagonalCheck::Strict => {
                let non_zero: usize = graphs
                    .outer_iter()
                    .map(|matrix| matrix.diag().iter().filter(|&&entry| entry != 0.0).count())
                    .sum();
                if non_zero > 0 {
                    return Err(ValidationError::value(format!(
                        "At least one matrix diagonal element is not 0: {} non-zero diagonal \
                         elements",
                        non_zero
                    )));
                }
            },
            DiagonalCheck::Sum => {
                let total: f64 = graphs.outer_iter().map(|matrix| matrix.diag().sum()).sum();
                if total != 0.0 {
                    return Err(ValidationError::value(format!(
                        "At least one matrix diagonal element is not 0: diagonal elements sum \
                         to {}",
                        total
                    )));
                }
            },
        }
        Ok(())
    }

    /// Validate every matrix equals its transpose within `tolerance`
    pub fn validate_symmetry(graphs: &ArrayView3<'_, f64>, tolerance: Tolerance) -> Result<()> {
        let transposed = graphs.view().permuted_axes([0, 2, 1]);
        let symmetric = Zip::from(graphs)
            .and(&transposed)
            .all(|&entry, &mirrored| tolerance.is_close(entry, mirrored));

        if !symmetric {
            return Err(ValidationError::value("Matrix is not symmetric"));
        }
        Ok(())
    }

    /// Validate that no entry is negative
    pub fn validate_non_negative(graphs: &ArrayView3<'_, f64>) -> Result<()> {
        let negative = graphs.iter().filter(|&&entry| entry < 0.0).count();
        if negative > 0 {
            return Err(ValidationError::value(format!(
                "At least one matrix element is smaller than 0: {} negative elements",
                negative
            )));
        }
        Ok(())
    }

    /// Run every graph check, stopping at the first violation
    pub fn validate<'a, S, D>(
        x: &'a ArrayBase<S, D>,
        config: &ValidationConfig,
    ) -> Result<ArrayView3<'a, f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let graphs = Self::validate_shape(x)?;
        Self::validate_diagonal(&graphs, config.diagonal_check)?;
        Self::validate_symmetry(&graphs, config.symmetry)?;
        Self::validate_non_negative(&graphs)?;
        Ok(graphs)
    }
}

/// Validate a batch of graph adjacency matrices with the default configuration
///
/// # Errors
/// * [`ValidationError::Shape`] if `x` is not 3D
/// * [`ValidationError::Type`] if the per-sample matrices are not square
/// * [`ValidationError::Value`] if a diagonal entry is non-zero, a matrix is not
///   symmetric or an entry is negative
pub fn check_graph<S, D>(x: &ArrayBase<S, D>) -> Result<ArrayView3<'_, f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    check_graph_with(x, &ValidationConfig::default())
}

/// Validate a batch of graph adjacency matrices with an explicit configuration
pub fn check_graph_with<'a, S, D>(
    x: &'a ArrayBase<S, D>,
    config: &ValidationConfig,
) -> Result<ArrayView3<'a, f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let _span = spans::graph_check(x.shape(), config.diagonal_check).entered();

    // Fields are public, so a config may never have gone through the builder
    config.validate().map_err(|e| events::rejected("graph", e))?;

    let graphs =
        GraphValidator::validate(x, config).map_err(|e| events::rejected("graph", e))?;
    debug!(
        n_samples = graphs.len_of(Axis(0)),
        n_nodes = graphs.len_of(Axis(1)),
        "Graph batch accepted"
    );
    Ok(graphs)
}
