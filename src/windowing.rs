//! Splitting time series into fixed-length subsequences.

use ndarray::{s, Array3, ArrayView3, Axis};
use tracing::debug;

use crate::error::{Result, TransformError};

/// Split each instance into consecutive windows of `window_size` timesteps.
///
/// # Arguments
///
/// * `arr` - Time series, shape `(instances, timesteps, channels)`
/// * `window_size` - Timesteps per window
/// * `keep_padded` - Keep a trailing partial window, padded with NaN
///
/// # Returns
///
/// Array of shape `(instances * windows, window_size, channels)`, ordered by
/// instance then window. Without `keep_padded` a trailing remainder shorter
/// than `window_size` is dropped.
///
/// # Errors
///
/// Returns an error if `window_size` is zero.
///
/// # Example
///
/// ```
/// use gaze_transforms::split;
/// use ndarray::Array3;
///
/// let arr = Array3::<f64>::ones((2, 5, 3));
/// assert_eq!(split(arr.view(), 2, true)?.shape(), &[6, 2, 3]);
/// assert_eq!(split(arr.view(), 2, false)?.shape(), &[4, 2, 3]);
/// # Ok::<(), gaze_transforms::TransformError>(())
/// ```
pub fn split(arr: ArrayView3<'_, f64>, window_size: usize, keep_padded: bool) -> Result<Array3<f64>> {
    if window_size == 0 {
        return Err(TransformError::InvalidWindowSize);
    }

    let (n_instances, n_timesteps, n_channels) = arr.dim();
    let windows_per_instance = if keep_padded {
        n_timesteps.div_ceil(window_size)
    } else {
        n_timesteps / window_size
    };
    debug!(
        n_instances,
        n_timesteps,
        window_size,
        windows_per_instance,
        keep_padded,
        "splitting into subsequences"
    );

    let mut out = Array3::from_elem(
        (n_instances * windows_per_instance, window_size, n_channels),
        f64::NAN,
    );
    for (i, instance) in arr.axis_iter(Axis(0)).enumerate() {
        for w in 0..windows_per_instance {
            let start = w * window_size;
            let end = (start + window_size).min(n_timesteps);
            out.slice_mut(s![i * windows_per_instance + w, ..end - start, ..])
                .assign(&instance.slice(s![start..end, ..]));
        }
    }
    Ok(out)
}
