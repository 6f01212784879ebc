//! Error types for gaze transform operations.
//!
//! Every precondition violation maps to exactly one variant, and the
//! `Display` text of each variant is stable: callers and tests match on the
//! rendered message, not only on the variant.

use thiserror::Error;

use crate::shape::Shape;

/// Main error type for gaze transform operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// A required input was not supplied.
    #[error("{param} must not be None")]
    MissingArgument { param: &'static str },

    /// A missing parameter reached the arithmetic stage.
    #[error("unsupported operand type(s) for {op}: '{lhs}' and '{rhs}'")]
    UnsupportedOperand {
        op: char,
        lhs: OperandKind,
        rhs: OperandKind,
    },

    /// A divisor-like parameter is zero.
    #[error("{param} must not be zero")]
    ZeroParameter { param: &'static str },

    /// Coordinate array has an unsupported number of dimensions.
    #[error("Number of dimensions of arr must be either 0, 1 or 2 (arr.ndim: {ndim})")]
    InvalidCoordinateRank { ndim: usize },

    /// Last axis of a 2-D coordinate array is not 1, 2 or 4 wide.
    #[error("Last coord dimension must have length 1, 2 or 4. (arr.shape: {shape})")]
    InvalidCoordinateDimension { shape: Shape },

    /// Screen parameter rank does not match the coordinate layout.
    #[error("arr is {arr_dims}-dimensional, but {param} is not")]
    DimensionMismatch {
        arr_dims: usize,
        param: &'static str,
    },

    /// Two-pair coordinates need a per-axis screen parameter.
    #[error("arr is 4-dimensional, but {param} is not 2-dimensional")]
    PairedDimensionMismatch { param: &'static str },

    /// Unknown origin convention.
    #[error("origin {0} is not supported.")]
    UnsupportedOrigin(String),

    /// Sampling rate is zero or negative.
    #[error("sampling_rate needs to be above zero")]
    NonPositiveSamplingRate,

    /// Position array handed to the velocity estimator has the wrong rank.
    #[error("arr needs to have 1 or 2 dimensions (arr dimensions are: {ndim})")]
    InvalidVelocityRank { ndim: usize },

    /// Unknown velocity method name.
    #[error(
        "Method needs to be in ['smooth', 'neighbors', 'preceding', 'savitzky_golay'] (is: {0})"
    )]
    UnknownMethod(String),

    /// Extra keyword arguments passed to a method that takes none.
    #[error("selected method doesn't support any additional kwargs")]
    UnexpectedKwargs,

    /// Not enough samples along the time axis for the selected method.
    #[error("arr has to have at least {min} elements for method \"{method}\"")]
    TooFewSamples { min: usize, method: &'static str },

    /// A keyword argument required by the selected method is missing.
    #[error("savitzky_golay requires keyword argument '{name}'")]
    MissingKwarg { name: &'static str },

    /// Savitzky-Golay window or order is invalid.
    #[error("{0}")]
    InvalidSavgolParameter(String),

    /// No explicit axis and the array rank is too high to guess one.
    #[error(
        "Axis can not be inferred in case of more than 3 input array dimensions \
         (arr.shape={shape}). Either reduce the number of input array dimensions \
         or specify `axis` explicitly."
    )]
    AxisNotInferable { shape: Shape },

    /// Explicit axis does not exist in the array.
    #[error("axis {axis} is out of bounds for array of dimension {ndim}")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    /// Subsequence window of length zero.
    #[error("window_size must be greater than zero")]
    InvalidWindowSize,

    /// Array could not be reshaped.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    /// Least-squares fitting failed.
    #[error("Linear algebra error: {0}")]
    Linalg(String),
}

/// Kind of an operand as reported by [`TransformError::UnsupportedOperand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Parameter was not supplied.
    Missing,
    /// Integral scalar.
    Integer,
    /// Non-integral scalar, or the result of a division.
    Float,
    /// Per-axis pair.
    Sequence,
}

impl OperandKind {
    /// Classify a scalar by whether it holds an integral value.
    #[must_use]
    pub fn of_scalar(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 {
            Self::Integer
        } else {
            Self::Float
        }
    }
}

impl std::fmt::Display for OperandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Missing => "NoneType",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Sequence => "list",
        })
    }
}

/// Result type alias for gaze transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

impl TransformError {
    /// Create a missing argument error.
    #[must_use]
    pub const fn missing_argument(param: &'static str) -> Self {
        Self::MissingArgument { param }
    }

    /// Create an unsupported operand error.
    #[must_use]
    pub const fn unsupported_operand(op: char, lhs: OperandKind, rhs: OperandKind) -> Self {
        Self::UnsupportedOperand { op, lhs, rhs }
    }

    /// Create a zero parameter error.
    #[must_use]
    pub const fn zero_parameter(param: &'static str) -> Self {
        Self::ZeroParameter { param }
    }

    /// Create a too-few-samples error.
    #[must_use]
    pub const fn too_few_samples(min: usize, method: &'static str) -> Self {
        Self::TooFewSamples { min, method }
    }

    /// Create an invalid Savitzky-Golay parameter error.
    #[must_use]
    pub fn invalid_savgol(msg: impl Into<String>) -> Self {
        Self::InvalidSavgolParameter(msg.into())
    }

    /// Create a linear algebra error.
    #[must_use]
    pub fn linalg(msg: impl Into<String>) -> Self {
        Self::Linalg(msg.into())
    }
}
