//! Finite-difference velocity kernels.
//!
//! Each kernel reads one position channel `x` and writes the velocity into
//! `v` (same length). Callers guarantee the per-kernel minimum length.
//!
//! | Kernel | Interior | Edges |
//! |--------|----------|-------|
//! | `preceding` | `(x[i] - x[i-1]) * fs` | `v[0] = v[1]` |
//! | `neighbors` | `(x[i+1] - x[i-1]) / 2 * fs` | one-sided |
//! | `smooth` | `(x[i+2] + x[i+1] - x[i-1] - x[i-2]) / 6 * fs` | central, then one-sided |

use ndarray::{ArrayView1, ArrayViewMut1};

/// Backward difference to the preceding sample. Needs `n >= 2`.
pub fn preceding(x: ArrayView1<'_, f64>, mut v: ArrayViewMut1<'_, f64>, sampling_rate: f64) {
    let n = x.len();
    debug_assert!(n >= 2);
    for i in 1..n {
        v[i] = (x[i] - x[i - 1]) * sampling_rate;
    }
    v[0] = v[1];
}

/// Central difference over the two neighbouring samples. Needs `n >= 3`.
pub fn neighbors(x: ArrayView1<'_, f64>, mut v: ArrayViewMut1<'_, f64>, sampling_rate: f64) {
    let n = x.len();
    debug_assert!(n >= 3);
    for i in 1..n - 1 {
        v[i] = (x[i + 1] - x[i - 1]) / 2.0 * sampling_rate;
    }
    v[0] = (x[1] - x[0]) * sampling_rate;
    v[n - 1] = (x[n - 1] - x[n - 2]) * sampling_rate;
}

/// Five-point stencil, the mean of the lag-1 and lag-2 central differences
/// weighted by their spans. Needs `n >= 6`.
pub fn smooth(x: ArrayView1<'_, f64>, mut v: ArrayViewMut1<'_, f64>, sampling_rate: f64) {
    let n = x.len();
    debug_assert!(n >= 6);
    for i in 2..n - 2 {
        v[i] = (x[i + 2] + x[i + 1] - x[i - 1] - x[i - 2]) / 6.0 * sampling_rate;
    }

    // second and second to last sample
    v[1] = (x[2] - x[0]) / 2.0 * sampling_rate;
    v[n - 2] = (x[n - 1] - x[n - 3]) / 2.0 * sampling_rate;

    v[0] = (x[1] - x[0]) * sampling_rate;
    v[n - 1] = (x[n - 1] - x[n - 2]) * sampling_rate;
}
