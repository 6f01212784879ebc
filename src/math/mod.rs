//! Numerical kernels behind velocity estimation.
//!
//! This module provides:
//! - [`differences`]: `preceding`, `neighbors` and `smooth` finite differences
//! - [`savgol`]: Savitzky-Golay derivative filtering (nalgebra least squares)

pub mod differences;
pub mod savgol;

pub use savgol::{savgol_coeffs, SavgolFilter};
