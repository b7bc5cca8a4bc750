//! Persistence diagram validation tests
//!
//! Covers the pass-through contract, the homology dimension rules and the
//! diagonal check over whole batches.

use ndarray::{array, Array3, Axis};
use tda_validate::{check_diagram, DiagramValidator, ErrorKind, Result, STACKED_DIMENSION};

/// Build a batch where every sample holds the same dimension labels
fn batch_with_dimensions(n_samples: usize, dims: &[f64]) -> Array3<f64> {
    let mut batch = Array3::<f64>::zeros((n_samples, dims.len(), 3));
    for mut sample in batch.outer_iter_mut() {
        for (i, mut point) in sample.outer_iter_mut().enumerate() {
            let birth = i as f64 * 0.25;
            point[0] = birth;
            point[1] = birth + 1.0;
            point[2] = dims[i];
        }
    }
    batch
}

#[test]
fn test_valid_batches_are_returned_unchanged() -> Result<()> {
    let cases: [&[f64]; 4] = [
        &[0.0],
        &[0.0, 1.0, 2.0],
        &[2.0, 0.0, 2.0, 1.0],
        &[STACKED_DIMENSION],
    ];
    for dims in cases {
        let batch = batch_with_dimensions(4, dims);
        let checked = check_diagram(&batch)?;
        assert_eq!(checked, batch.view());
    }
    Ok(())
}

#[test]
fn test_points_on_the_diagonal_are_accepted() -> Result<()> {
    let batch = array![[[1.0, 1.0, 0.0], [2.0, 2.0, 1.0]]];
    check_diagram(&batch)?;
    Ok(())
}

#[test]
fn test_any_point_below_the_diagonal_is_rejected() {
    let batch = batch_with_dimensions(3, &[0.0, 1.0, 1.0]);

    for sample in 0..3 {
        for point in 0..3 {
            let mut broken = batch.clone();
            broken[[sample, point, 1]] = broken[[sample, point, 0]] - 0.01;
            let err = check_diagram(&broken).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value);
            assert!(err.to_string().contains("1 points"));
        }
    }
}

#[test]
fn test_stacked_dimension_must_be_the_only_label() {
    let batch = batch_with_dimensions(2, &[0.0, STACKED_DIMENSION]);
    let err = check_diagram(&batch).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert!(err.to_string().contains("should be the only one"));
}

#[test]
fn test_non_integer_and_negative_dimensions_are_rejected() {
    let fractional = batch_with_dimensions(1, &[0.0, 1.5]);
    assert_eq!(check_diagram(&fractional).unwrap_err().kind(), ErrorKind::Value);

    let negative = batch_with_dimensions(1, &[-1.0, 0.0]);
    assert_eq!(check_diagram(&negative).unwrap_err().kind(), ErrorKind::Value);
}

#[test]
fn test_only_the_first_sample_provides_labels() {
    let mut batch = batch_with_dimensions(2, &[0.0, 1.0]);
    batch[[1, 0, 2]] = 0.5;

    let view = batch.view();
    assert_eq!(DiagramValidator::homology_dimensions(&view), vec![0.0, 1.0]);
    assert!(check_diagram(&batch).is_ok());
}

#[test]
fn test_shape_errors() {
    let two_d = batch_with_dimensions(1, &[0.0]).index_axis(Axis(0), 0).to_owned();
    assert_eq!(check_diagram(&two_d).unwrap_err().kind(), ErrorKind::Shape);

    let four_components = Array3::<f64>::zeros((2, 2, 4));
    assert_eq!(check_diagram(&four_components).unwrap_err().kind(), ErrorKind::Shape);
}

#[test]
fn test_empty_batches() -> Result<()> {
    check_diagram(&Array3::<f64>::zeros((0, 5, 3)))?;
    check_diagram(&Array3::<f64>::zeros((3, 0, 3)))?;
    Ok(())
}

#[test]
fn test_views_are_accepted() -> Result<()> {
    let batch = batch_with_dimensions(4, &[0.0, 1.0]);
    let every_other = batch.slice(ndarray::s![..;2, .., ..]);
    let checked = check_diagram(&every_other)?;
    assert_eq!(checked.len_of(Axis(0)), 2);
    Ok(())
}
