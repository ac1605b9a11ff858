//! Error types for the percolate core library.
//!
//! Defines the error enum exposed by the public API, its stable
//! machine-readable codes, and a convenient result alias.

use thiserror::Error;

/// An error produced while configuring or running a percolation computation.
///
/// Degenerate samples (zero occupied sites) are a defined state, not an
/// error; they yield an all-`-1` labelling with both observables at zero.
/// Out-of-range union-find indices are programmer errors and panic rather
/// than surfacing here.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PercolationError {
    /// Occupation probability was outside `[0, 1]` or non-finite.
    #[error("occupation probability must lie in [0, 1], got {p}")]
    InvalidProbability {
        /// The rejected probability value.
        p: f64,
    },
    /// A caller-supplied occupancy mask did not cover the whole lattice.
    #[error("occupancy mask has length {got} but the lattice has {expected} sites")]
    MaskLength {
        /// Length of the supplied mask.
        got: usize,
        /// Number of sites the lattice requires.
        expected: usize,
    },
    /// A sweep was configured without any values for a required axis.
    #[error("scaling sweep requires at least one {axis} value")]
    EmptySweep {
        /// Name of the empty sweep axis (`"p"` or `"L"`).
        axis: &'static str,
    },
    /// A sample count of zero was supplied.
    #[error("n_samples must be at least 1 (got {got})")]
    InvalidSampleCount {
        /// The rejected sample count.
        got: usize,
    },
}

impl PercolationError {
    /// Returns a stable, machine-readable code for the variant.
    #[must_use]
    pub const fn code(&self) -> PercolationErrorCode {
        match self {
            Self::InvalidProbability { .. } => PercolationErrorCode::InvalidProbability,
            Self::MaskLength { .. } => PercolationErrorCode::MaskLength,
            Self::EmptySweep { .. } => PercolationErrorCode::EmptySweep,
            Self::InvalidSampleCount { .. } => PercolationErrorCode::InvalidSampleCount,
        }
    }
}

/// Machine-readable error codes for [`PercolationError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum PercolationErrorCode {
    /// Occupation probability was outside `[0, 1]` or non-finite.
    InvalidProbability,
    /// A caller-supplied occupancy mask did not cover the whole lattice.
    MaskLength,
    /// A sweep was configured without any values for a required axis.
    EmptySweep,
    /// A sample count of zero was supplied.
    InvalidSampleCount,
}

impl PercolationErrorCode {
    /// Returns the stable string representation of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidProbability => "PERCOLATION_INVALID_PROBABILITY",
            Self::MaskLength => "PERCOLATION_MASK_LENGTH",
            Self::EmptySweep => "PERCOLATION_EMPTY_SWEEP",
            Self::InvalidSampleCount => "PERCOLATION_INVALID_SAMPLE_COUNT",
        }
    }
}

impl std::fmt::Display for PercolationErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, PercolationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let err = PercolationError::InvalidProbability { p: 1.5 };
        assert_eq!(err.code().as_str(), "PERCOLATION_INVALID_PROBABILITY");
        let err = PercolationError::EmptySweep { axis: "p" };
        assert_eq!(err.code(), PercolationErrorCode::EmptySweep);
    }

    #[test]
    fn messages_carry_context() {
        let err = PercolationError::MaskLength {
            got: 9,
            expected: 27,
        };
        assert_eq!(
            err.to_string(),
            "occupancy mask has length 9 but the lattice has 27 sites"
        );
    }
}
