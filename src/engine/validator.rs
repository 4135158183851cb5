//! Input validation for density configuration and data.
//!
//! ## Purpose
//!
//! This module provides validation functions for estimator configuration
//! parameters and input data. It checks requirements such as buffer lengths,
//! finite values, and parameter bounds before any computation starts.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Parameter Bounds**: Enforces constraints like bandwidth > 0.
//! * **Finite Checks**: Ensures all inputs are finite (no NaN/Inf).
//! * **Buffer Shape**: Flat point buffers must divide evenly into points.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective mathematical constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform or filter input data.
//! * This module does not provide automatic correction of invalid inputs.
//! * This module does not perform the density computation itself.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::expansion::hermite::MAX_SUPPORTED_ORDER;
use crate::primitives::errors::KdeError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for estimator configuration and input data.
///
/// Provides static methods for validating parameters and input data. All
/// methods return `Result<(), KdeError>` and fail fast upon identifying the
/// first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate a flat reference point buffer.
    pub fn validate_reference_set<T: Float>(
        points: &[T],
        dimensions: usize,
    ) -> Result<(), KdeError> {
        // Check 1: Non-empty buffer
        if points.is_empty() {
            return Err(KdeError::EmptyReferenceSet);
        }
        Self::validate_point_buffer(points, dimensions, "references")
    }

    /// Validate a flat query point buffer.
    pub fn validate_query_set<T: Float>(points: &[T], dimensions: usize) -> Result<(), KdeError> {
        // Check 1: Non-empty buffer
        if points.is_empty() {
            return Err(KdeError::EmptyQuerySet);
        }
        Self::validate_point_buffer(points, dimensions, "queries")
    }

    /// Validate per-point reference weights.
    pub fn validate_weights<T: Float>(weights: &[T], n_points: usize) -> Result<(), KdeError> {
        // Check 1: One weight per point
        if weights.len() != n_points {
            return Err(KdeError::MismatchedWeights {
                points: n_points,
                weights: weights.len(),
            });
        }

        // Check 2: Each weight finite and non-negative
        for &w in weights.iter() {
            if !w.is_finite() || w < T::zero() {
                return Err(KdeError::InvalidWeight(w.to_f64().unwrap_or(f64::NAN)));
            }
        }

        // Check 3: Positive total mass, or normalization is undefined
        let total = weights.iter().fold(T::zero(), |acc, &w| acc + w);
        if total <= T::zero() {
            return Err(KdeError::InvalidNumericValue(format!(
                "weights sum to {} (must be > 0)",
                total.to_f64().unwrap_or(f64::NAN)
            )));
        }

        Ok(())
    }

    /// Shape and finiteness checks shared by both point buffers.
    fn validate_point_buffer<T: Float>(
        points: &[T],
        dimensions: usize,
        name: &str,
    ) -> Result<(), KdeError> {
        // Check 2: Whole number of points
        if points.len() % dimensions != 0 {
            return Err(KdeError::RaggedPointBuffer {
                len: points.len(),
                dimensions,
            });
        }

        // Check 3: All coordinates finite
        for (i, &val) in points.iter().enumerate() {
            if !val.is_finite() {
                return Err(KdeError::InvalidNumericValue(format!(
                    "{}[{}]={}",
                    name,
                    i,
                    val.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the kernel bandwidth.
    pub fn validate_bandwidth<T: Float>(bandwidth: T) -> Result<(), KdeError> {
        if !bandwidth.is_finite() || bandwidth <= T::zero() {
            return Err(KdeError::InvalidBandwidth(
                bandwidth.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the relative error tolerance.
    ///
    /// # Notes
    ///
    /// * Zero is allowed and requests an exact computation.
    pub fn validate_tolerance<T: Float>(tolerance: T) -> Result<(), KdeError> {
        if !tolerance.is_finite() || tolerance < T::zero() {
            return Err(KdeError::InvalidTolerance(
                tolerance.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the tree leaf size.
    pub fn validate_leaf_size(leaf_size: usize) -> Result<(), KdeError> {
        if leaf_size == 0 {
            return Err(KdeError::InvalidLeafSize(leaf_size));
        }
        Ok(())
    }

    /// Validate the point dimensionality.
    pub fn validate_dimensions(dimensions: usize) -> Result<(), KdeError> {
        if dimensions == 0 {
            return Err(KdeError::InvalidDimensions(dimensions));
        }
        Ok(())
    }

    /// Validate a user-supplied series truncation order.
    ///
    /// The per-dimension order is capped, and the resulting coefficient grid
    /// of `(order + 1)^dimensions` entries must stay addressable.
    pub fn validate_expansion_order(order: usize, dimensions: usize) -> Result<(), KdeError> {
        if order > MAX_SUPPORTED_ORDER {
            return Err(KdeError::InvalidExpansionOrder {
                got: order,
                max: MAX_SUPPORTED_ORDER,
            });
        }
        if u32::try_from(dimensions)
            .ok()
            .and_then(|d| (order + 1).checked_pow(d))
            .is_none()
        {
            return Err(KdeError::InvalidNumericValue(format!(
                "expansion order {} in {} dimensions overflows the coefficient grid",
                order, dimensions
            )));
        }
        Ok(())
    }

    /// Reject configurations where a parameter was set more than once.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), KdeError> {
        if let Some(param) = duplicate_param {
            return Err(KdeError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
