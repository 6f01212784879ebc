//! Typed parameters for the gaze transforms.
//!
//! This module gathers the parameter objects that callers hand to the
//! transforms: [`VelocityConfig`] for velocity estimation and
//! [`ScreenGeometry`] for the pixel to visual angle conversion, plus the
//! enumerations they are built from.
//!
//! # Example
//!
//! ```
//! use gaze_transforms::{VelocityConfig, VelocityMethod};
//!
//! // Defaults: 1000 Hz, smooth stencil
//! let config = VelocityConfig::default();
//! assert_eq!(config.method, VelocityMethod::Smooth);
//!
//! // Savitzky-Golay derivative at 500 Hz
//! let sg = VelocityConfig::savitzky_golay(7, 2).with_sampling_rate(500.0);
//! assert!(sg.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{OperandKind, Result, TransformError};

/// Default sampling rate in Hz.
pub const DEFAULT_SAMPLING_RATE: f64 = 1000.0;

/// Velocity estimation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VelocityMethod {
    /// Five-point stencil averaging two central differences.
    #[default]
    Smooth,
    /// Central difference of the two neighbouring samples.
    Neighbors,
    /// Backward difference to the preceding sample.
    Preceding,
    /// First derivative of a sliding least-squares polynomial fit.
    SavitzkyGolay,
}

impl VelocityMethod {
    /// All methods in their canonical order.
    pub const ALL: [Self; 4] = [
        Self::Smooth,
        Self::Neighbors,
        Self::Preceding,
        Self::SavitzkyGolay,
    ];

    /// Wire name of the method.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Neighbors => "neighbors",
            Self::Preceding => "preceding",
            Self::SavitzkyGolay => "savitzky_golay",
        }
    }

    /// Minimum number of samples along the time axis.
    ///
    /// `None` for Savitzky-Golay, whose limit depends on its window.
    #[must_use]
    pub const fn min_samples(self) -> Option<usize> {
        match self {
            Self::Smooth => Some(6),
            Self::Neighbors => Some(3),
            Self::Preceding => Some(2),
            Self::SavitzkyGolay => None,
        }
    }

    /// Whether the method takes keyword arguments.
    #[must_use]
    pub const fn accepts_kwargs(self) -> bool {
        matches!(self, Self::SavitzkyGolay)
    }
}

impl fmt::Display for VelocityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VelocityMethod {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| TransformError::UnknownMethod(s.to_string()))
    }
}

/// Boundary handling of the Savitzky-Golay filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SavgolMode {
    /// Fit a polynomial to the first and last window and evaluate it at the edges.
    #[default]
    Interp,
    /// Reflect about the edge sample: `d c b | a b c d | c b a`.
    Mirror,
    /// Repeat the edge sample: `a a a | a b c d | d d d`.
    Nearest,
    /// Pad with `cval`.
    Constant,
    /// Wrap around: `b c d | a b c d | a b c`.
    Wrap,
}

/// Extra keyword arguments for a velocity method.
///
/// Only [`VelocityMethod::SavitzkyGolay`] takes any. Setting a field counts as
/// passing that argument.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodKwargs {
    /// Window length in samples. Required, odd.
    pub window_length: Option<usize>,
    /// Polynomial order. Required, less than `window_length`.
    pub polyorder: Option<usize>,
    /// Boundary mode, `Interp` when unset.
    pub mode: Option<SavgolMode>,
    /// Fill value for `SavgolMode::Constant`, 0 when unset.
    pub cval: Option<f64>,
}

impl MethodKwargs {
    /// Empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no argument is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.window_length.is_none()
            && self.polyorder.is_none()
            && self.mode.is_none()
            && self.cval.is_none()
    }

    /// Set the window length.
    #[must_use]
    pub const fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = Some(window_length);
        self
    }

    /// Set the polynomial order.
    #[must_use]
    pub const fn with_polyorder(mut self, polyorder: usize) -> Self {
        self.polyorder = Some(polyorder);
        self
    }

    /// Set the boundary mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: SavgolMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the constant fill value.
    #[must_use]
    pub const fn with_cval(mut self, cval: f64) -> Self {
        self.cval = Some(cval);
        self
    }
}

/// Parameters for velocity estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VelocityConfig {
    /// Samples per second. Must be strictly positive.
    pub sampling_rate: f64,

    /// Differentiation kernel.
    pub method: VelocityMethod,

    /// Method-specific keyword arguments.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kwargs: MethodKwargs,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            sampling_rate: DEFAULT_SAMPLING_RATE,
            method: VelocityMethod::Smooth,
            kwargs: MethodKwargs::default(),
        }
    }
}

impl VelocityConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for the Savitzky-Golay derivative.
    #[must_use]
    pub fn savitzky_golay(window_length: usize, polyorder: usize) -> Self {
        Self {
            method: VelocityMethod::SavitzkyGolay,
            kwargs: MethodKwargs::new()
                .with_window_length(window_length)
                .with_polyorder(polyorder),
            ..Self::default()
        }
    }

    /// Set the sampling rate.
    #[must_use]
    pub const fn with_sampling_rate(mut self, sampling_rate: f64) -> Self {
        self.sampling_rate = sampling_rate;
        self
    }

    /// Set the method.
    #[must_use]
    pub const fn with_method(mut self, method: VelocityMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the method from its wire name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known method.
    pub fn with_method_name(self, name: &str) -> Result<Self> {
        Ok(self.with_method(name.parse()?))
    }

    /// Set the method keyword arguments.
    #[must_use]
    pub const fn with_kwargs(mut self, kwargs: MethodKwargs) -> Self {
        self.kwargs = kwargs;
        self
    }

    /// Check the sampling rate.
    ///
    /// # Errors
    ///
    /// Returns an error unless the sampling rate is strictly positive.
    pub fn check_sampling_rate(&self) -> Result<()> {
        if self.sampling_rate > 0.0 {
            Ok(())
        } else {
            Err(TransformError::NonPositiveSamplingRate)
        }
    }

    /// Check that keyword arguments are only passed to a method that takes them.
    ///
    /// # Errors
    ///
    /// Returns an error if kwargs are set for a method without kwargs.
    pub fn check_kwargs(&self) -> Result<()> {
        if !self.method.accepts_kwargs() && !self.kwargs.is_empty() {
            return Err(TransformError::UnexpectedKwargs);
        }
        Ok(())
    }

    /// Validate the configuration independent of any input array.
    ///
    /// # Errors
    ///
    /// Returns an error if the sampling rate is not positive or kwargs are
    /// passed to a method that takes none.
    pub fn validate(&self) -> Result<()> {
        self.check_sampling_rate()?;
        self.check_kwargs()
    }
}

/// Origin convention of pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Origin {
    /// `(0, 0)` is the screen centre.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "center"))]
    Center,
    /// `(0, 0)` is the lower left pixel.
    #[cfg_attr(feature = "serde", serde(rename = "lower left"))]
    LowerLeft,
}

impl Origin {
    /// Wire name of the origin.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::LowerLeft => "lower left",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Origin {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "center" => Ok(Self::Center),
            "lower left" => Ok(Self::LowerLeft),
            other => Err(TransformError::UnsupportedOrigin(other.to_string())),
        }
    }
}

/// Screen extent, either shared by both axes or given per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ScreenDim {
    /// One value for every coordinate axis.
    Uniform(f64),
    /// `[x, y]`.
    PerAxis([f64; 2]),
}

impl ScreenDim {
    /// Value for the given spatial axis (0 = x, 1 = y).
    #[must_use]
    pub fn axis(&self, axis: usize) -> f64 {
        match self {
            Self::Uniform(v) => *v,
            Self::PerAxis(v) => v[axis % 2],
        }
    }

    /// Whether one value per axis is given.
    #[must_use]
    pub const fn is_per_axis(&self) -> bool {
        matches!(self, Self::PerAxis(_))
    }

    /// Whether any component is zero.
    #[must_use]
    pub fn has_zero(&self) -> bool {
        match self {
            Self::Uniform(v) => *v == 0.0,
            Self::PerAxis(v) => v.iter().any(|&c| c == 0.0),
        }
    }

    pub(crate) fn operand_kind(&self) -> OperandKind {
        match self {
            Self::Uniform(v) => OperandKind::of_scalar(*v),
            Self::PerAxis(_) => OperandKind::Sequence,
        }
    }
}

impl From<f64> for ScreenDim {
    fn from(value: f64) -> Self {
        Self::Uniform(value)
    }
}

impl From<[f64; 2]> for ScreenDim {
    fn from(value: [f64; 2]) -> Self {
        Self::PerAxis(value)
    }
}

/// Physical screen setup used to convert pixels to visual angle.
///
/// Fields are optional so a partially filled setup can be carried around and
/// rejected at conversion time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScreenGeometry {
    /// Screen resolution in pixels.
    pub screen_px: Option<ScreenDim>,

    /// Screen size in centimeters.
    pub screen_cm: Option<ScreenDim>,

    /// Eye to screen distance in centimeters.
    pub distance_cm: Option<f64>,

    /// Pixel origin convention.
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Origin,
}

impl ScreenGeometry {
    /// Create a fully specified screen setup.
    #[must_use]
    pub fn new(
        screen_px: impl Into<ScreenDim>,
        screen_cm: impl Into<ScreenDim>,
        distance_cm: f64,
        origin: Origin,
    ) -> Self {
        Self {
            screen_px: Some(screen_px.into()),
            screen_cm: Some(screen_cm.into()),
            distance_cm: Some(distance_cm),
            origin,
        }
    }

    /// Set the origin convention.
    #[must_use]
    pub const fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}
