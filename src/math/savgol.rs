//! Savitzky-Golay differentiation.
//!
//! A polynomial of degree `polyorder` is fitted by least squares to every
//! window of `window_length` samples; the filter output is a derivative of
//! that polynomial at the window centre. Fitting uses the pseudo-inverse of
//! the window's Vandermonde matrix (nalgebra SVD), so the same matrix yields
//! the interior correlation weights and the edge fits of `SavgolMode::Interp`.

use nalgebra::{DMatrix, DVector};
use ndarray::{ArrayView1, ArrayViewMut1};
use tracing::trace;

use crate::config::{MethodKwargs, SavgolMode};
use crate::error::{Result, TransformError};

/// Singular values below this are treated as zero in the pseudo-inverse.
const PINV_EPS: f64 = 1e-12;

/// Compute Savitzky-Golay correlation weights.
///
/// The filtered value at sample `i` is `sum_j w[j] * x[i + j - window_length / 2]`.
///
/// # Arguments
///
/// * `window_length` - Odd window length
/// * `polyorder` - Polynomial order, less than `window_length`
/// * `deriv` - Derivative order (0 = smoothing)
/// * `delta` - Sample spacing
///
/// # Errors
///
/// Returns an error for an invalid window or a failed least-squares solve.
///
/// # Example
///
/// ```
/// use gaze_transforms::math::savgol_coeffs;
///
/// let w = savgol_coeffs(5, 2, 1, 1.0)?;
/// assert!((w[4] - 0.2).abs() < 1e-12);
/// # Ok::<(), gaze_transforms::TransformError>(())
/// ```
pub fn savgol_coeffs(
    window_length: usize,
    polyorder: usize,
    deriv: usize,
    delta: f64,
) -> Result<Vec<f64>> {
    validate_window(window_length, polyorder)?;
    let pinv = fit_matrix(window_length, polyorder)?;
    Ok(correlation_weights(&pinv, polyorder, deriv, delta))
}

fn validate_window(window_length: usize, polyorder: usize) -> Result<()> {
    if polyorder >= window_length {
        return Err(TransformError::invalid_savgol(
            "polyorder must be less than window_length.",
        ));
    }
    if window_length % 2 == 0 {
        return Err(TransformError::invalid_savgol("window_length must be odd."));
    }
    Ok(())
}

/// Pseudo-inverse of the Vandermonde matrix over centred window offsets.
///
/// Row `m` maps a window of samples to the coefficient of `t^m`.
fn fit_matrix(window_length: usize, polyorder: usize) -> Result<DMatrix<f64>> {
    let half = (window_length / 2) as f64;
    let vandermonde = DMatrix::from_fn(window_length, polyorder + 1, |j, m| {
        (j as f64 - half).powi(m as i32)
    });
    vandermonde
        .pseudo_inverse(PINV_EPS)
        .map_err(TransformError::linalg)
}

/// `m! / (m - d)!`
fn falling_factorial(m: usize, d: usize) -> f64 {
    ((m - d + 1)..=m).map(|k| k as f64).product()
}

fn correlation_weights(pinv: &DMatrix<f64>, polyorder: usize, deriv: usize, delta: f64) -> Vec<f64> {
    if deriv > polyorder {
        return vec![0.0; pinv.ncols()];
    }
    let scale = falling_factorial(deriv, deriv) / delta.powi(deriv as i32);
    pinv.row(deriv).iter().map(|&c| c * scale).collect()
}

/// Evaluate the `deriv`-th derivative of `sum_m coeffs[m] t^m` at `t`.
fn polyval_deriv(coeffs: &DVector<f64>, deriv: usize, t: f64) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .skip(deriv)
        .map(|(m, &c)| c * falling_factorial(m, deriv) * t.powi((m - deriv) as i32))
        .sum()
}

/// Out-of-range sample policy for the non-fitting modes.
#[derive(Debug, Clone, Copy)]
enum Padding {
    Mirror,
    Nearest,
    Constant(f64),
    Wrap,
}

impl Padding {
    fn from_mode(mode: SavgolMode, cval: f64) -> Option<Self> {
        match mode {
            SavgolMode::Interp => None,
            SavgolMode::Mirror => Some(Self::Mirror),
            SavgolMode::Nearest => Some(Self::Nearest),
            SavgolMode::Constant => Some(Self::Constant(cval)),
            SavgolMode::Wrap => Some(Self::Wrap),
        }
    }

    /// Sample at a possibly out-of-range index.
    fn sample(self, x: &ArrayView1<'_, f64>, k: isize) -> f64 {
        let n = x.len() as isize;
        if (0..n).contains(&k) {
            return x[k as usize];
        }
        match self {
            Self::Constant(cval) => cval,
            Self::Nearest => x[k.clamp(0, n - 1) as usize],
            Self::Wrap => x[k.rem_euclid(n) as usize],
            Self::Mirror if n == 1 => x[0],
            Self::Mirror => {
                let period = 2 * (n - 1);
                let m = k.rem_euclid(period);
                x[(if m < n { m } else { period - m }) as usize]
            }
        }
    }
}

/// Savitzky-Golay derivative filter for one channel.
#[derive(Debug, Clone)]
pub struct SavgolFilter {
    window_length: usize,
    deriv: usize,
    delta: f64,
    mode: SavgolMode,
    cval: f64,
    pinv: DMatrix<f64>,
    weights: Vec<f64>,
}

impl SavgolFilter {
    /// Build a filter from keyword arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if `window_length` or `polyorder` is missing or invalid.
    pub fn from_kwargs(kwargs: &MethodKwargs, deriv: usize, delta: f64) -> Result<Self> {
        let window_length = kwargs
            .window_length
            .ok_or(TransformError::MissingKwarg {
                name: "window_length",
            })?;
        let polyorder = kwargs
            .polyorder
            .ok_or(TransformError::MissingKwarg { name: "polyorder" })?;
        Self::new(window_length, polyorder, deriv, delta)
            .map(|f| f.with_mode(kwargs.mode.unwrap_or_default(), kwargs.cval.unwrap_or(0.0)))
    }

    /// Build a filter with `Interp` edges.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid window or a failed least-squares solve.
    pub fn new(window_length: usize, polyorder: usize, deriv: usize, delta: f64) -> Result<Self> {
        validate_window(window_length, polyorder)?;
        let pinv = fit_matrix(window_length, polyorder)?;
        let weights = correlation_weights(&pinv, polyorder, deriv, delta);
        trace!(window_length, polyorder, deriv, "built savitzky-golay filter");
        Ok(Self {
            window_length,
            deriv,
            delta,
            mode: SavgolMode::Interp,
            cval: 0.0,
            pinv,
            weights,
        })
    }

    /// Set the boundary mode and constant fill value.
    #[must_use]
    pub fn with_mode(mut self, mode: SavgolMode, cval: f64) -> Self {
        self.mode = mode;
        self.cval = cval;
        self
    }

    /// Correlation weights of the interior.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Filter `x` into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error in `Interp` mode when the window is longer than `x`.
    pub fn apply(&self, x: ArrayView1<'_, f64>, mut out: ArrayViewMut1<'_, f64>) -> Result<()> {
        let n = x.len();
        let half = self.window_length / 2;

        match Padding::from_mode(self.mode, self.cval) {
            None => {
                if self.window_length > n {
                    return Err(TransformError::invalid_savgol(
                        "If mode is 'interp', window_length must be less than or equal to the size of x.",
                    ));
                }
                for i in half..n - half {
                    let window = x.slice(ndarray::s![i - half..=i + half]);
                    out[i] = dot(&self.weights, window.iter().copied());
                }
                self.fit_edge(&x, &mut out, 0, 0..half);
                self.fit_edge(&x, &mut out, n - self.window_length, n - half..n);
            }
            Some(padding) => {
                for i in 0..n {
                    let start = i as isize - half as isize;
                    let window = (0..self.window_length as isize).map(|j| padding.sample(&x, start + j));
                    out[i] = dot(&self.weights, window);
                }
            }
        }
        Ok(())
    }

    /// Fit the window starting at `window_start` and evaluate the derivative
    /// at the samples in `targets`.
    fn fit_edge(
        &self,
        x: &ArrayView1<'_, f64>,
        out: &mut ArrayViewMut1<'_, f64>,
        window_start: usize,
        targets: std::ops::Range<usize>,
    ) {
        let window = DVector::from_iterator(
            self.window_length,
            x.slice(ndarray::s![window_start..window_start + self.window_length])
                .iter()
                .copied(),
        );
        let coeffs = &self.pinv * window;
        let centre = window_start + self.window_length / 2;
        let scale = self.delta.powi(self.deriv as i32);
        for i in targets {
            let t = i as f64 - centre as f64;
            out[i] = polyval_deriv(&coeffs, self.deriv, t) / scale;
        }
    }
}

fn dot(weights: &[f64], window: impl Iterator<Item = f64>) -> f64 {
    weights.iter().zip(window).map(|(w, s)| w * s).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn stepped_ramp(n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|i| (i - i % 2) as f64))
    }

    fn filter(f: &SavgolFilter, x: &Array1<f64>) -> Array1<f64> {
        let mut out = Array1::zeros(x.len());
        f.apply(x.view(), out.view_mut()).unwrap();
        out
    }

    #[test]
    fn test_derivative_coeffs_literature() {
        let w = savgol_coeffs(7, 2, 1, 1.0).unwrap();
        let expected = [-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        for (wi, e) in w.iter().zip(expected) {
            assert_relative_eq!(*wi, e / 28.0, epsilon = 1e-12);
        }

        let filter = SavgolFilter::new(7, 2, 1, 1.0).unwrap();
        assert_eq!(filter.weights().len(), 7);
        for (fw, wi) in filter.weights().iter().zip(&w) {
            assert_eq!(fw.to_bits(), wi.to_bits());
        }
    }

    #[test]
    fn test_smoothing_coeffs_literature() {
        let w = savgol_coeffs(5, 2, 0, 1.0).unwrap();
        let expected = [-3.0, 12.0, 17.0, 12.0, -3.0];
        for (wi, e) in w.iter().zip(expected) {
            assert_relative_eq!(*wi, e / 35.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_delta_scales_weights() {
        let unit = savgol_coeffs(5, 2, 1, 1.0).unwrap();
        let fast = savgol_coeffs(5, 2, 1, 0.01).unwrap();
        for (u, f) in unit.iter().zip(fast.iter()) {
            assert_relative_eq!(u * 100.0, *f, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_deriv_above_order_is_zero() {
        let w = savgol_coeffs(5, 0, 1, 1.0).unwrap();
        assert!(w.iter().all(|&wi| wi == 0.0));
    }

    #[test]
    fn test_interp_edges_stepped_ramp() {
        let f = SavgolFilter::new(7, 2, 1, 1.0).unwrap();
        let v = filter(&f, &stepped_ramp(100));

        let edge = [0.71428571, 0.80952381, 0.9047619];
        for (k, e) in edge.iter().enumerate() {
            assert_relative_eq!(v[k], *e, epsilon = 1e-7);
            assert_relative_eq!(v[99 - k], *e, epsilon = 1e-7);
        }
        for vi in v.slice(ndarray::s![3..97]) {
            assert_relative_eq!(*vi, 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_interp_reproduces_quadratic_slope() {
        let x = Array1::from_iter((0..15).map(|i| {
            let t = f64::from(i);
            0.5 * t * t - 2.0 * t + 1.0
        }));
        let f = SavgolFilter::new(5, 2, 1, 1.0).unwrap();
        let v = filter(&f, &x);
        for (i, vi) in v.iter().enumerate() {
            assert_relative_eq!(*vi, i as f64 - 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_padding_modes_linear_ramp() {
        let x = Array1::from_iter((0..10).map(f64::from));
        let base = SavgolFilter::new(5, 2, 1, 1.0).unwrap();

        let mirror = filter(&base.clone().with_mode(SavgolMode::Mirror, 0.0), &x);
        assert_relative_eq!(mirror[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(mirror[5], 1.0, epsilon = 1e-12);

        let nearest = filter(&base.clone().with_mode(SavgolMode::Nearest, 0.0), &x);
        assert_relative_eq!(nearest[0], 0.5, epsilon = 1e-12);

        let constant = filter(&base.clone().with_mode(SavgolMode::Constant, -1.0), &x);
        assert_relative_eq!(constant[0], 0.8, epsilon = 1e-12);

        let wrap = filter(&base.with_mode(SavgolMode::Wrap, 0.0), &x);
        assert_relative_eq!(wrap[0], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_windows() {
        assert_eq!(
            savgol_coeffs(3, 3, 1, 1.0).unwrap_err().to_string(),
            "polyorder must be less than window_length."
        );
        assert_eq!(
            savgol_coeffs(6, 2, 1, 1.0).unwrap_err().to_string(),
            "window_length must be odd."
        );

        let f = SavgolFilter::new(7, 2, 1, 1.0).unwrap();
        let x = Array1::<f64>::zeros(5);
        let mut out = Array1::zeros(5);
        assert_eq!(
            f.apply(x.view(), out.view_mut()).unwrap_err().to_string(),
            "If mode is 'interp', window_length must be less than or equal to the size of x."
        );
    }

    #[test]
    fn test_missing_kwargs() {
        let only_order = MethodKwargs::new().with_polyorder(2);
        assert!(matches!(
            SavgolFilter::from_kwargs(&only_order, 1, 1.0),
            Err(TransformError::MissingKwarg {
                name: "window_length"
            })
        ));

        let only_window = MethodKwargs::new().with_window_length(7);
        assert!(matches!(
            SavgolFilter::from_kwargs(&only_window, 1, 1.0),
            Err(TransformError::MissingKwarg { name: "polyorder" })
        ));
    }
}
