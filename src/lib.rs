//! Gaze Transforms Library
//!
//! Array transforms for eye-tracking data.
//!
//! This library converts raw gaze samples into quantities used for event
//! detection and model training, on top of [`ndarray`] arrays.
//!
//! # Transforms
//!
//! | Function | Input | Output |
//! |----------|-------|--------|
//! | [`pix2deg`] | pixel coordinates `(n, 2)` | degrees of visual angle, same shape |
//! | [`pos2vel`] | positions `(n,)` or `(n, channels)` | velocities per second, same shape |
//! | [`norm`] | any array | euclidean norm along one axis |
//! | [`split`] | `(instances, timesteps, channels)` | fixed-length windows |
//!
//! # Quick Start
//!
//! ```
//! use gaze_transforms::{norm, pix2deg, pos2vel, ScreenDim, VelocityConfig};
//! use ndarray::Array2;
//!
//! // 100 samples of (x, y) pixels at 1000 Hz
//! let pixels = Array2::from_shape_fn((100, 2), |(i, j)| (i * (j + 1)) as f64);
//!
//! let degrees = pix2deg(
//!     Some(pixels.view().into_dyn()),
//!     Some(ScreenDim::PerAxis([1280.0, 1024.0])),
//!     Some(ScreenDim::PerAxis([38.0, 30.0])),
//!     Some(68.0),
//!     "center",
//! )?;
//! let velocity = pos2vel(degrees.view(), &VelocityConfig::default())?;
//!
//! // per-sample speed over both axes
//! let speed = norm(velocity.t(), None)?;
//! assert_eq!(speed.shape(), &[100]);
//! # Ok::<(), gaze_transforms::TransformError>(())
//! ```
//!
//! # Velocity Methods
//!
//! ```
//! use gaze_transforms::{VelocityConfig, VelocityMethod};
//!
//! let smooth = VelocityConfig::default();
//! let neighbors = VelocityConfig::default().with_method(VelocityMethod::Neighbors);
//! let preceding = VelocityConfig::default().with_method(VelocityMethod::Preceding);
//! let savgol = VelocityConfig::savitzky_golay(7, 2);
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod magnitude;
pub mod math;
pub mod shape;
pub mod velocity;
pub mod windowing;

// Re-exports for convenient access
pub use config::{
    MethodKwargs, Origin, SavgolMode, ScreenDim, ScreenGeometry, VelocityConfig, VelocityMethod,
    DEFAULT_SAMPLING_RATE,
};
pub use error::{OperandKind, Result, TransformError};
pub use geometry::pix2deg;
pub use magnitude::norm;
pub use math::{savgol_coeffs, SavgolFilter};
pub use shape::{CoordLayout, Shape};
pub use velocity::pos2vel;
pub use windowing::split;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
