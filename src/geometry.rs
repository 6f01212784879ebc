//! Pixel to visual angle conversion.
//!
//! A pixel offset from the screen centre is scaled to centimeters and turned
//! into the angle it subtends at the eye:
//!
//! ```text
//! px_per_cm   = screen_px / screen_cm
//! distance_px = distance_cm * px_per_cm
//! degrees     = atan2(arr - centre, distance_px) * 180 / pi
//! ```
//!
//! With the `lower left` origin the centre is pixel `(screen_px - 1) / 2` on
//! each axis; with `center` it is 0.

use ndarray::{ArrayD, ArrayViewD, Axis};
use tracing::debug;

use crate::config::{Origin, ScreenDim, ScreenGeometry};
use crate::error::{OperandKind, Result, TransformError};
use crate::shape::CoordLayout;

/// Convert pixel coordinates to degrees of visual angle.
///
/// # Arguments
///
/// * `arr` - Pixel coordinates, shape `()`, `(n,)`, `(n, 1)`, `(n, 2)` or `(n, 4)`
/// * `screen_px` - Screen resolution, scalar or `[x, y]`
/// * `screen_cm` - Screen size in cm, scalar or `[x, y]`
/// * `distance_cm` - Eye to screen distance in cm
/// * `origin` - `"center"` or `"lower left"`
///
/// Rank-2 inputs with two columns take `[x, y]` screen parameters; with four
/// columns the same pair is applied to columns `(0, 1)` and `(2, 3)`. All other
/// layouts take scalar parameters.
///
/// # Returns
///
/// Visual angle in degrees, same shape as `arr`.
///
/// # Errors
///
/// Returns an error if `arr` is missing, a screen parameter is zero, the
/// array layout is unsupported or does not match the screen parameters, the
/// origin is unknown, or a screen parameter is missing.
///
/// # Example
///
/// ```
/// use gaze_transforms::{pix2deg, ScreenDim};
/// use ndarray::arr0;
///
/// let px = ScreenDim::Uniform(100.0);
/// let cm = ScreenDim::Uniform(100.0);
/// let deg = pix2deg(Some(arr0(50.0).view().into_dyn()), Some(px), Some(cm), Some(50.0), "center")?;
/// assert_eq!(deg.ndim(), 0);
/// assert!((deg.sum() - 45.0).abs() < 1e-9);
/// # Ok::<(), gaze_transforms::TransformError>(())
/// ```
pub fn pix2deg(
    arr: Option<ArrayViewD<'_, f64>>,
    screen_px: Option<ScreenDim>,
    screen_cm: Option<ScreenDim>,
    distance_cm: Option<f64>,
    origin: &str,
) -> Result<ArrayD<f64>> {
    let arr = arr.ok_or(TransformError::missing_argument("arr"))?;

    if screen_px.is_some_and(|d| d.has_zero()) {
        return Err(TransformError::zero_parameter("screen_px"));
    }
    if screen_cm.is_some_and(|d| d.has_zero()) {
        return Err(TransformError::zero_parameter("screen_cm"));
    }
    if distance_cm == Some(0.0) {
        return Err(TransformError::zero_parameter("distance_cm"));
    }

    let layout = CoordLayout::classify(arr.shape())?;
    check_layout(layout, screen_px, "screen_px")?;
    check_layout(layout, screen_cm, "screen_cm")?;

    let origin: Origin = origin.parse()?;

    let (screen_px, screen_cm) = match (screen_px, screen_cm) {
        (Some(px), Some(cm)) => (px, cm),
        (px, cm) => {
            return Err(TransformError::unsupported_operand(
                '/',
                operand_kind(px.as_ref()),
                operand_kind(cm.as_ref()),
            ))
        }
    };
    let distance_cm = distance_cm.ok_or(TransformError::unsupported_operand(
        '*',
        OperandKind::Missing,
        OperandKind::Float,
    ))?;

    debug!(?layout, %origin, shape = ?arr.shape(), "converting pixels to degrees");

    let axes =
        [0, 1].map(|axis| AxisProjection::new(axis, screen_px, screen_cm, distance_cm, origin));

    let mut degrees = arr.to_owned();
    match layout {
        CoordLayout::Scalar | CoordLayout::Sequence | CoordLayout::Single => {
            degrees.mapv_inplace(|p| axes[0].degrees(p));
        }
        CoordLayout::Pair | CoordLayout::TwoPairs => {
            for (column, mut values) in degrees.axis_iter_mut(Axis(1)).enumerate() {
                let projection = &axes[column % 2];
                values.mapv_inplace(|p| projection.degrees(p));
            }
        }
    }
    Ok(degrees)
}

/// Check a screen parameter against the coordinate layout.
///
/// A missing parameter counts as scalar.
fn check_layout(layout: CoordLayout, dim: Option<ScreenDim>, param: &'static str) -> Result<()> {
    let per_axis = dim.is_some_and(|d| d.is_per_axis());
    match layout {
        CoordLayout::TwoPairs if !per_axis => Err(TransformError::PairedDimensionMismatch { param }),
        _ if layout.needs_per_axis() != per_axis => Err(TransformError::DimensionMismatch {
            arr_dims: layout.reported_dims(),
            param,
        }),
        _ => Ok(()),
    }
}

fn operand_kind(dim: Option<&ScreenDim>) -> OperandKind {
    dim.map_or(OperandKind::Missing, ScreenDim::operand_kind)
}

/// Projection constants for one spatial axis.
#[derive(Debug, Clone, Copy)]
struct AxisProjection {
    centre_px: f64,
    distance_px: f64,
}

impl AxisProjection {
    fn new(axis: usize, screen_px: ScreenDim, screen_cm: ScreenDim, distance_cm: f64, origin: Origin) -> Self {
        let px = screen_px.axis(axis);
        let px_per_cm = px / screen_cm.axis(axis);
        let centre_px = match origin {
            Origin::Center => 0.0,
            Origin::LowerLeft => (px - 1.0) / 2.0,
        };
        Self {
            centre_px,
            distance_px: distance_cm * px_per_cm,
        }
    }

    fn degrees(&self, p: f64) -> f64 {
        (p - self.centre_px).atan2(self.distance_px).to_degrees()
    }
}

impl ScreenGeometry {
    /// Convert pixel coordinates to degrees of visual angle with this setup.
    ///
    /// # Errors
    ///
    /// See [`pix2deg`].
    pub fn pix2deg(&self, arr: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>> {
        pix2deg(
            Some(arr),
            self.screen_px,
            self.screen_cm,
            self.distance_cm,
            self.origin.name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr0, Array2};

    fn uniform(v: f64) -> Option<ScreenDim> {
        Some(ScreenDim::Uniform(v))
    }

    #[test]
    fn test_per_axis_scaling() {
        // 45 degrees on x, atan(0.5) on y
        let arr = Array2::from_shape_vec((1, 2), vec![50.0, 50.0]).unwrap();
        let deg = pix2deg(
            Some(arr.view().into_dyn()),
            Some(ScreenDim::PerAxis([100.0, 200.0])),
            Some(ScreenDim::PerAxis([100.0, 100.0])),
            Some(50.0),
            "center",
        )
        .unwrap();
        assert_relative_eq!(deg[[0, 0]], 45.0, epsilon = 1e-9);
        assert_relative_eq!(deg[[0, 1]], 0.5f64.atan().to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn test_two_pairs_share_axes() {
        let arr = Array2::from_shape_vec((1, 4), vec![99.5, 49.5, 49.5, -0.5]).unwrap();
        let deg = pix2deg(
            Some(arr.view().into_dyn()),
            Some(ScreenDim::PerAxis([100.0, 100.0])),
            Some(ScreenDim::PerAxis([100.0, 100.0])),
            Some(50.0),
            "lower left",
        )
        .unwrap();
        assert_relative_eq!(deg[[0, 0]], 45.0, epsilon = 1e-9);
        assert_relative_eq!(deg[[0, 1]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(deg[[0, 2]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(deg[[0, 3]], -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_operands() {
        let arr = arr0(0.0);
        let err = pix2deg(Some(arr.view().into_dyn()), None, None, Some(1.0), "center")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported operand type(s) for /: 'NoneType' and 'NoneType'"
        );

        let err = pix2deg(
            Some(arr.view().into_dyn()),
            Some(ScreenDim::PerAxis([1.0, 1.0])),
            None,
            Some(1.0),
            "center",
        )
        .unwrap_err();
        // a pair against a scalar array is a layout error first
        assert_eq!(err.to_string(), "arr is 0-dimensional, but screen_px is not");

        let err = pix2deg(Some(arr.view().into_dyn()), uniform(2.5), None, Some(1.0), "center")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported operand type(s) for /: 'float' and 'NoneType'"
        );
    }

    #[test]
    fn test_single_column_takes_scalar() {
        let arr = Array2::from_elem((3, 1), 50.0);
        let deg = pix2deg(
            Some(arr.view().into_dyn()),
            uniform(100.0),
            uniform(100.0),
            Some(50.0),
            "center",
        )
        .unwrap();
        assert_eq!(deg.shape(), &[3, 1]);
        for d in deg.iter() {
            assert_relative_eq!(*d, 45.0, epsilon = 1e-9);
        }

        let err = pix2deg(
            Some(arr.view().into_dyn()),
            Some(ScreenDim::PerAxis([100.0, 100.0])),
            uniform(100.0),
            Some(50.0),
            "center",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "arr is 1-dimensional, but screen_px is not");
    }

    #[test]
    fn test_geometry_wrapper() {
        let geometry = ScreenGeometry::new(100.0, 100.0, 50.0, Origin::LowerLeft);
        let deg = geometry.pix2deg(arr0(99.5).view().into_dyn()).unwrap();
        assert_relative_eq!(deg.sum(), 45.0, epsilon = 1e-9);

        let centred = geometry.with_origin(Origin::Center);
        let deg = centred.pix2deg(arr0(0.0).view().into_dyn()).unwrap();
        assert_eq!(deg.sum(), 0.0);
    }
}
