//! Array shape helpers.
//!
//! [`Shape`] renders array shapes the way they appear in error messages,
//! and [`CoordLayout`] classifies a coordinate array once so that the
//! pixel-to-degree conversion can branch exhaustively on it.

use std::fmt;

use crate::error::{Result, TransformError};

/// Owned array shape with tuple-style formatting: `()`, `(5,)`, `(100, 3)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Dimensions as a slice.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("()"),
            [only] => write!(f, "({only},)"),
            [first, rest @ ..] => {
                write!(f, "({first}")?;
                for d in rest {
                    write!(f, ", {d}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Layout of a coordinate array.
///
/// | Variant | Shape | Screen parameters |
/// |---------|-------|-------------------|
/// | `Scalar` | `()` | scalar |
/// | `Sequence` | `(n,)` | scalar |
/// | `Single` | `(n, 1)` | scalar |
/// | `Pair` | `(n, 2)` | per-axis |
/// | `TwoPairs` | `(n, 4)` | per-axis, applied to columns (0, 1) and (2, 3) |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordLayout {
    /// Single coordinate value.
    Scalar,
    /// One coordinate axis sampled over time.
    Sequence,
    /// Rank-2 array with a single column.
    Single,
    /// Rank-2 array of (x, y) rows.
    Pair,
    /// Rank-2 array of two packed (x, y) pairs, e.g. left and right eye.
    TwoPairs,
}

impl CoordLayout {
    /// Classify a coordinate array by its shape.
    ///
    /// # Errors
    ///
    /// Returns an error for rank 3 and above, or for a rank-2 array whose last
    /// axis is not 1, 2 or 4 wide.
    pub fn classify(dims: &[usize]) -> Result<Self> {
        match dims {
            [] => Ok(Self::Scalar),
            [_] => Ok(Self::Sequence),
            [_, 1] => Ok(Self::Single),
            [_, 2] => Ok(Self::Pair),
            [_, 4] => Ok(Self::TwoPairs),
            [_, _] => Err(TransformError::InvalidCoordinateDimension {
                shape: Shape::from(dims),
            }),
            _ => Err(TransformError::InvalidCoordinateRank { ndim: dims.len() }),
        }
    }

    /// Number of dimensions reported for this layout in mismatch messages.
    #[must_use]
    pub const fn reported_dims(self) -> usize {
        match self {
            Self::Scalar => 0,
            Self::Sequence | Self::Single => 1,
            Self::Pair => 2,
            Self::TwoPairs => 4,
        }
    }

    /// Whether screen parameters must carry one value per spatial axis.
    #[must_use]
    pub const fn needs_per_axis(self) -> bool {
        matches!(self, Self::Pair | Self::TwoPairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_display() {
        assert_eq!(Shape(vec![]).to_string(), "()");
        assert_eq!(Shape(vec![5]).to_string(), "(5,)");
        assert_eq!(Shape(vec![100, 3]).to_string(), "(100, 3)");
        assert_eq!(Shape(vec![2, 2, 5, 5]).to_string(), "(2, 2, 5, 5)");

        let shape = Shape::from(&[100, 3][..]);
        assert_eq!(shape.ndim(), 2);
        assert_eq!(shape.dims(), &[100, 3]);
        assert_eq!(Shape::default().ndim(), 0);
    }

    #[test]
    fn test_classify() {
        assert_eq!(CoordLayout::classify(&[]).unwrap(), CoordLayout::Scalar);
        assert_eq!(CoordLayout::classify(&[10]).unwrap(), CoordLayout::Sequence);
        assert_eq!(CoordLayout::classify(&[10, 1]).unwrap(), CoordLayout::Single);
        assert_eq!(CoordLayout::classify(&[10, 2]).unwrap(), CoordLayout::Pair);
        assert_eq!(CoordLayout::classify(&[10, 4]).unwrap(), CoordLayout::TwoPairs);
    }

    #[test]
    fn test_classify_rejects() {
        assert_eq!(
            CoordLayout::classify(&[100, 3]).unwrap_err().to_string(),
            "Last coord dimension must have length 1, 2 or 4. (arr.shape: (100, 3))"
        );
        assert_eq!(
            CoordLayout::classify(&[10, 2, 2]).unwrap_err().to_string(),
            "Number of dimensions of arr must be either 0, 1 or 2 (arr.ndim: 3)"
        );
    }

    #[test]
    fn test_reported_dims() {
        assert_eq!(CoordLayout::Single.reported_dims(), 1);
        assert_eq!(CoordLayout::TwoPairs.reported_dims(), 4);
        assert!(CoordLayout::Pair.needs_per_axis());
        assert!(!CoordLayout::Sequence.needs_per_axis());
    }
}
