//! Velocity estimation from position samples.
//!
//! [`pos2vel`] differentiates each spatial channel of a position signal along
//! the time axis (axis 0) with one of four kernels:
//!
//! | Method | Min samples | Kwargs |
//! |--------|-------------|--------|
//! | `smooth` | 6 | none |
//! | `neighbors` | 3 | none |
//! | `preceding` | 2 | none |
//! | `savitzky_golay` | `window_length` (interp edges) | `window_length`, `polyorder`, `mode`, `cval` |

use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, ArrayViewD, ArrayViewMut1, Axis, Ix2};
use tracing::debug;

use crate::config::{VelocityConfig, VelocityMethod};
use crate::error::{Result, TransformError};
use crate::math::differences;
use crate::math::SavgolFilter;

/// Kernel resolved from a validated configuration.
enum Kernel {
    Difference(fn(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>, f64)),
    SavitzkyGolay(SavgolFilter),
}

impl Kernel {
    fn resolve(config: &VelocityConfig, n_samples: usize) -> Result<Self> {
        let method = config.method;
        if let Some(min) = method.min_samples() {
            if n_samples < min {
                return Err(TransformError::too_few_samples(min, method.name()));
            }
        }

        Ok(match method {
            VelocityMethod::Smooth => Self::Difference(differences::smooth),
            VelocityMethod::Neighbors => Self::Difference(differences::neighbors),
            VelocityMethod::Preceding => Self::Difference(differences::preceding),
            VelocityMethod::SavitzkyGolay => Self::SavitzkyGolay(SavgolFilter::from_kwargs(
                &config.kwargs,
                1,
                1.0 / config.sampling_rate,
            )?),
        })
    }

    fn apply(
        &self,
        x: ArrayView1<'_, f64>,
        v: ArrayViewMut1<'_, f64>,
        sampling_rate: f64,
    ) -> Result<()> {
        match self {
            Self::Difference(kernel) => {
                kernel(x, v, sampling_rate);
                Ok(())
            }
            Self::SavitzkyGolay(filter) => filter.apply(x, v),
        }
    }
}

/// Estimate per-sample velocity from positions.
///
/// # Arguments
///
/// * `arr` - Positions, shape `(n,)` or `(n, channels)` with time along axis 0
/// * `config` - Sampling rate, method and method kwargs
///
/// # Returns
///
/// Velocities in position units per second, same shape as `arr`.
///
/// # Errors
///
/// Returns an error if:
/// - the sampling rate is not strictly positive
/// - `arr` is not 1- or 2-dimensional
/// - kwargs are given for a method other than `savitzky_golay`
/// - there are fewer samples than the method needs
/// - the Savitzky-Golay parameters are missing or invalid
///
/// # Example
///
/// ```
/// use gaze_transforms::{pos2vel, VelocityConfig, VelocityMethod};
/// use ndarray::Array1;
///
/// let x = Array1::from_iter((0..10).map(f64::from));
/// let config = VelocityConfig::default()
///     .with_sampling_rate(1.0)
///     .with_method(VelocityMethod::Neighbors);
///
/// let v = pos2vel(x.view().into_dyn(), &config)?;
/// assert_eq!(v[[4]], 1.0);
/// # Ok::<(), gaze_transforms::TransformError>(())
/// ```
pub fn pos2vel(arr: ArrayViewD<'_, f64>, config: &VelocityConfig) -> Result<ArrayD<f64>> {
    config.check_sampling_rate()?;

    let shape = arr.raw_dim();
    let positions = as_columns(arr)?;

    config.check_kwargs()?;

    let (n_samples, n_channels) = positions.dim();
    let kernel = Kernel::resolve(config, n_samples)?;
    debug!(
        method = %config.method,
        n_samples,
        n_channels,
        sampling_rate = config.sampling_rate,
        "estimating velocity"
    );

    let mut velocities = Array2::zeros((n_samples, n_channels));
    for (x, v) in positions
        .axis_iter(Axis(1))
        .zip(velocities.axis_iter_mut(Axis(1)))
    {
        kernel.apply(x, v, config.sampling_rate)?;
    }

    Ok(velocities.into_dyn().into_shape_with_order(shape)?)
}

/// View positions as `(samples, channels)`.
fn as_columns(arr: ArrayViewD<'_, f64>) -> Result<ArrayView2<'_, f64>> {
    let ndim = arr.ndim();
    let arr = if ndim == 1 {
        arr.insert_axis(Axis(1))
    } else {
        arr
    };
    arr.into_dimensionality::<Ix2>()
        .map_err(|_| TransformError::InvalidVelocityRank { ndim })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MethodKwargs, SavgolMode};
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array3};

    fn ramp(n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|i| i as f64))
    }

    #[test]
    fn test_default_rate_scales_velocity() {
        let x = ramp(20) * 0.001;
        let v = pos2vel(x.view().into_dyn(), &VelocityConfig::default()).unwrap();
        for vi in v.iter() {
            assert_relative_eq!(*vi, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_output_shape_matches_input() {
        let x = Array2::from_shape_fn((30, 4), |(i, j)| (i * (j + 1)) as f64);
        let config = VelocityConfig::default().with_sampling_rate(1.0);
        let v = pos2vel(x.view().into_dyn(), &config).unwrap();
        assert_eq!(v.shape(), &[30, 4]);
        for j in 0..4 {
            assert_eq!(v[[10, j]], (j + 1) as f64);
        }
    }

    #[test]
    fn test_columns_are_independent() {
        let mut x = Array2::zeros((12, 2));
        x.column_mut(0).assign(&ramp(12));
        let config = VelocityConfig::default()
            .with_sampling_rate(2.0)
            .with_method(VelocityMethod::Neighbors);
        let v = pos2vel(x.view().into_dyn(), &config).unwrap();
        assert!(v.index_axis(Axis(1), 0).iter().all(|&vi| vi == 2.0));
        assert!(v.index_axis(Axis(1), 1).iter().all(|&vi| vi == 0.0));
    }

    #[test]
    fn test_check_order() {
        let bad_rate = VelocityConfig::default().with_sampling_rate(0.0);
        let cube = Array3::<f64>::ones((3, 3, 3));
        assert!(matches!(
            pos2vel(cube.view().into_dyn(), &bad_rate),
            Err(TransformError::NonPositiveSamplingRate)
        ));

        let kwargs = VelocityConfig::default().with_kwargs(MethodKwargs::new().with_cval(0.0));
        assert!(matches!(
            pos2vel(cube.view().into_dyn(), &kwargs),
            Err(TransformError::InvalidVelocityRank { ndim: 3 })
        ));

        let short = ramp(4);
        assert!(matches!(
            pos2vel(short.view().into_dyn(), &kwargs),
            Err(TransformError::UnexpectedKwargs)
        ));
    }

    #[test]
    fn test_scalar_rejected() {
        let scalar = ndarray::arr0(1.0);
        assert_eq!(
            pos2vel(scalar.view().into_dyn(), &VelocityConfig::default())
                .unwrap_err()
                .to_string(),
            "arr needs to have 1 or 2 dimensions (arr dimensions are: 0)"
        );
    }

    #[test]
    fn test_savitzky_golay_uses_sampling_rate() {
        let x = ramp(20);
        let config = VelocityConfig::savitzky_golay(5, 2).with_sampling_rate(60.0);
        let v = pos2vel(x.view().into_dyn(), &config).unwrap();
        for vi in v.iter() {
            assert_relative_eq!(*vi, 60.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_savitzky_golay_mode_passthrough() {
        let x = ramp(10);
        let config = VelocityConfig::savitzky_golay(5, 2).with_sampling_rate(1.0);
        let mirror = config.with_kwargs(config.kwargs.with_mode(SavgolMode::Mirror));
        let v = pos2vel(x.view().into_dyn(), &mirror).unwrap();
        assert_relative_eq!(v[[0]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(v[[5]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_savitzky_golay_window_longer_than_signal() {
        let x = ramp(5);
        let config = VelocityConfig::savitzky_golay(7, 2);
        assert!(matches!(
            pos2vel(x.view().into_dyn(), &config),
            Err(TransformError::InvalidSavgolParameter(_))
        ));
    }

    #[test]
    fn test_repeated_calls_identical() {
        let x = Array1::from_iter((0..50).map(|i| (f64::from(i) * 0.3).sin()));
        for method in VelocityMethod::ALL {
            let config = match method {
                VelocityMethod::SavitzkyGolay => VelocityConfig::savitzky_golay(9, 3),
                other => VelocityConfig::default().with_method(other),
            };
            let a = pos2vel(x.view().into_dyn(), &config).unwrap();
            let b = pos2vel(x.view().into_dyn(), &config).unwrap();
            assert!(a.iter().zip(b.iter()).all(|(p, q)| p.to_bits() == q.to_bits()));
        }
    }
}
