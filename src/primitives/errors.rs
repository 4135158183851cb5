//! Error types for density estimation configuration and input validation.
//!
//! ## Purpose
//!
//! This module defines the single public error enum returned by every
//! fallible operation in the crate. All variants carry enough data to
//! explain what was wrong and what the caller should change.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Errors are raised at configuration or fit time, before
//!   any traversal work starts. The traversal itself is infallible.
//! * **no_std**: `Display` is implemented over `core::fmt`;
//!   `std::error::Error` is provided only with the `std` feature.
//!
//! ## Non-goals
//!
//! * This module does not perform validation; see `engine::validator`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::fmt;

// ============================================================================
// Error Enum
// ============================================================================

/// Errors reported by density estimation configuration and input handling.
#[derive(Debug, Clone, PartialEq)]
pub enum KdeError {
    /// The reference set contains no points.
    EmptyReferenceSet,

    /// The query set contains no points.
    EmptyQuerySet,

    /// A required bandwidth was never configured.
    MissingBandwidth,

    /// Bandwidth is not finite or not strictly positive.
    InvalidBandwidth(f64),

    /// Relative-error tolerance is not finite or is negative.
    InvalidTolerance(f64),

    /// Leaf-size threshold is zero.
    InvalidLeafSize(usize),

    /// Dimensionality is zero.
    InvalidDimensions(usize),

    /// Maximum expansion order exceeds what the coefficient storage supports.
    InvalidExpansionOrder {
        /// Requested maximum order.
        got: usize,
        /// Largest supported maximum order.
        max: usize,
    },

    /// A flattened point buffer's length is not a multiple of the dimension.
    RaggedPointBuffer {
        /// Buffer length.
        len: usize,
        /// Configured dimensionality.
        dimensions: usize,
    },

    /// The weight vector's length does not match the reference point count.
    MismatchedWeights {
        /// Number of reference points.
        points: usize,
        /// Number of weights supplied.
        weights: usize,
    },

    /// A reference weight is not finite or is negative.
    InvalidWeight(f64),

    /// A coordinate is NaN or infinite.
    InvalidNumericValue(String),

    /// A builder parameter was configured more than once.
    DuplicateParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
    },
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for KdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdeError::EmptyReferenceSet => write!(f, "Reference set is empty"),
            KdeError::EmptyQuerySet => write!(f, "Query set is empty"),
            KdeError::MissingBandwidth => {
                write!(f, "Bandwidth is required but was never set")
            }
            KdeError::InvalidBandwidth(h) => {
                write!(f, "Invalid bandwidth: {} (must be > 0 and finite)", h)
            }
            KdeError::InvalidTolerance(tau) => {
                write!(f, "Invalid tolerance: {} (must be >= 0 and finite)", tau)
            }
            KdeError::InvalidLeafSize(n) => {
                write!(f, "Invalid leaf_size: {} (must be at least 1)", n)
            }
            KdeError::InvalidDimensions(d) => {
                write!(f, "Invalid dimensions: {} (must be at least 1)", d)
            }
            KdeError::InvalidExpansionOrder { got, max } => {
                write!(
                    f,
                    "Invalid expansion_order: {} (must be at most {})",
                    got, max
                )
            }
            KdeError::RaggedPointBuffer { len, dimensions } => {
                write!(
                    f,
                    "Point buffer length {} is not a multiple of dimensions {}",
                    len, dimensions
                )
            }
            KdeError::MismatchedWeights { points, weights } => {
                write!(
                    f,
                    "Length mismatch: {} reference points, {} weights",
                    points, weights
                )
            }
            KdeError::InvalidWeight(w) => {
                write!(f, "Invalid weight: {} (must be >= 0 and finite)", w)
            }
            KdeError::InvalidNumericValue(what) => {
                write!(f, "Invalid numeric value: {}", what)
            }
            KdeError::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{}' was set multiple times. Each parameter can only be configured once.",
                    parameter
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KdeError {}
