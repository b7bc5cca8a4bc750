//! Persistence diagram validation
//!
//! A batch of persistence diagrams is a 3D array of shape
//! `(n_samples, n_points, 3)` whose last axis holds
//! `(birth, death, homology_dimension)` triples.

use crate::error::{Result, ValidationError};
use crate::tracing_config::{events, spans};
use ndarray::{ArrayBase, ArrayView3, Axis, Data, Dimension, Ix3, Zip};
use tracing::debug;

/// Homology dimension marking a stacked diagram with no dimension partitioning
pub const STACKED_DIMENSION: f64 = f64::INFINITY;

const BIRTH: usize = 0;
const DEATH: usize = 1;
const DIMENSION: usize = 2;

/// Validator for persistence diagram batches
pub struct DiagramValidator;

impl DiagramValidator {
    /// Validate the batch has shape `(n_samples, n_points, 3)`
    pub fn validate_shape<S, D>(x: &ArrayBase<S, D>) -> Result<ArrayView3<'_, f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if x.ndim() != 3 {
            return Err(ValidationError::shape(format!(
                "X should be a 3d array: X.shape = {:?}",
                x.shape()
            )));
        }

        let diagrams = x
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|e| ValidationError::shape(e.to_string()))?;

        let components = diagrams.len_of(Axis(2));
        if components != 3 {
            return Err(ValidationError::shape(format!(
                "X should be a 3d array with a 3rd dimension of 3 components: X.shape[2] = {}",
                components
            )));
        }

        Ok(diagrams)
    }

    /// Sorted distinct homology dimensions of the first sample
    ///
    /// Labels are assumed identical across samples, so later samples are not
    /// inspected. An empty batch has no labels.
    pub fn homology_dimensions(diagrams: &ArrayView3<'_, f64>) -> Vec<f64> {
        if diagrams.len_of(Axis(0)) == 0 {
            return Vec::new();
        }

        let first = diagrams.index_axis(Axis(0), 0);
        let mut dimensions: Vec<f64> = first.index_axis(Axis(1), DIMENSION).to_vec();
        dimensions.sort_by(f64::total_cmp);
        dimensions.dedup_by(|a, b| *a == *b);
        dimensions
    }

    /// Validate homology dimension labels
    ///
    /// Every label must be a non-negative integer, except that
    /// [`STACKED_DIMENSION`] is accepted when it is the only label.
    pub fn validate_homology_dimensions(dimensions: &[f64]) -> Result<()> {
        for &dim in dimensions {
            if dim == STACKED_DIMENSION {
                if dimensions.len() != 1 {
                    return Err(ValidationError::value(format!(
                        "inf is a valid homology dimension for a stacked diagram but it \
                         should be the only one: homology_dimensions = {:?}",
                        dimensions
                    )));
                }
                continue;
            }

            if !dim.is_finite() || dim != dim.round() {
                return Err(ValidationError::value(format!(
                    "All homology dimensions should be integer valued: {} can't be cast \
                     to an int of the same value",
                    dim
                )));
            }

            if dim < 0.0 {
                return Err(ValidationError::value(format!(
                    "All homology dimensions should be non-negative: got {}",
                    dim
                )));
            }
        }
        Ok(())
    }

    /// Number of points, across all samples, with `death < birth`
    ///
    /// Points with a NaN coordinate are counted as well.
    pub fn count_points_below_diagonal(diagrams: &ArrayView3<'_, f64>) -> usize {
        let births = diagrams.index_axis(Axis(2), BIRTH);
        let deaths = diagrams.index_axis(Axis(2), DEATH);

        let above = Zip::from(&births)
            .and(&deaths)
            .fold(0usize, |count, birth, death| {
                if death >= birth {
                    count + 1
                } else {
                    count
                }
            });

        births.len() - above
    }

    /// Run every diagram check, stopping at the first violation
    pub fn validate<S, D>(x: &ArrayBase<S, D>) -> Result<ArrayView3<'_, f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let diagrams = Self::validate_shape(x)?;

        let dimensions = Self::homology_dimensions(&diagrams);
        Self::validate_homology_dimensions(&dimensions)?;

        let below = Self::count_points_below_diagonal(&diagrams);
        if below > 0 {
            return Err(ValidationError::value(format!(
                "All points of all n_samples persistence diagrams should be above the \
                 diagonal, X[:, :, 1] >= X[:, :, 0]. {} points in all n_samples diagrams \
                 are under the diagonal",
                below
            )));
        }

        Ok(diagrams)
    }
}

/// Validate a batch of persistence diagrams
///
/// Returns a 3D view of the unchanged input on success.
///
/// # Errors
/// * [`ValidationError::Shape`] if `x` is not 3D or its last axis is not of length 3
/// * [`ValidationError::Value`] if a homology dimension is invalid or a point lies
///   below the diagonal
pub fn check_diagram<S, D>(x: &ArrayBase<S, D>) -> Result<ArrayView3<'_, f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let _span = spans::diagram_check(x.shape()).entered();

    let diagrams = DiagramValidator::validate(x).map_err(|e| events::rejected("diagram", e))?;
    debug!(
        n_samples = diagrams.len_of(Axis(0)),
        n_points = diagrams.len_of(Axis(1)),
        "Diagram batch accepted"
    );
    Ok(diagrams)
}
