//! Euclidean norm along one axis.

use ndarray::{ArrayD, ArrayViewD, Axis};
use tracing::trace;

use crate::error::{Result, TransformError};
use crate::shape::Shape;

/// Axis reduced when none is given.
///
/// Rank 1 and 2 reduce axis 0 (a vector, or the components of a column
/// batch); rank 3 reduces axis 1, the component axis of
/// `(batch, components, time)`.
fn infer_axis(arr: &ArrayViewD<'_, f64>) -> Result<usize> {
    match arr.ndim() {
        0..=2 => Ok(0),
        3 => Ok(1),
        _ => Err(TransformError::AxisNotInferable {
            shape: Shape::from(arr.shape()),
        }),
    }
}

/// Euclidean norm of `arr` along `axis`, which is dropped from the output.
///
/// # Arguments
///
/// * `arr` - Input array
/// * `axis` - Axis to reduce; inferred for arrays of up to 3 dimensions when `None`
///
/// A rank-0 array has no axis to reduce and yields its absolute value.
///
/// # Errors
///
/// Returns an error if `axis` is `None` and `arr` has more than 3 dimensions,
/// or if `axis` is out of bounds.
///
/// # Example
///
/// ```
/// use gaze_transforms::norm;
/// use ndarray::Array2;
///
/// let arr = Array2::<f64>::ones((2, 5));
/// let n = norm(arr.view().into_dyn(), None)?;
/// assert_eq!(n.shape(), &[5]);
/// assert!((n[[0]] - 2f64.sqrt()).abs() < 1e-12);
/// # Ok::<(), gaze_transforms::TransformError>(())
/// ```
pub fn norm(arr: ArrayViewD<'_, f64>, axis: Option<usize>) -> Result<ArrayD<f64>> {
    let axis = match axis {
        Some(axis) => axis,
        None => infer_axis(&arr)?,
    };

    if arr.ndim() == 0 && axis == 0 {
        return Ok(arr.mapv(f64::abs));
    }
    if axis >= arr.ndim() {
        return Err(TransformError::AxisOutOfBounds {
            axis,
            ndim: arr.ndim(),
        });
    }

    trace!(axis, shape = ?arr.shape(), "reducing euclidean norm");
    Ok(arr.map_axis(Axis(axis), |lane| {
        lane.fold(0.0, |acc, v| acc + v * v).sqrt()
    }))
}
