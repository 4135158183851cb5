//! Exhaustive reference implementation for verification.
//!
//! ## Purpose
//!
//! This module computes densities by the direct double loop over all
//! query/reference pairs. It exists to verify the dual-tree engine: the
//! exhaustive sums are the ground truth that approximate results are
//! measured against, both in tests and when tuning the error tolerance.
//!
//! ## Design notes
//!
//! * Same kernel, weighting, and normalization as the engine, so the two
//!   agree exactly when the engine runs with a zero tolerance.
//! * O(queries × references); intended for small inputs only.
//!
//! ## Non-goals
//!
//! * This module does not prune, bound, or approximate anything.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::distance::DistanceLinalg;
use crate::math::kernel::RadialKernel;
use crate::primitives::dataset::PointSet;

// ============================================================================
// NaiveKde
// ============================================================================

/// Direct-summation density evaluator over a fixed reference side.
#[derive(Debug)]
pub struct NaiveKde<'a, T: DistanceLinalg, K: RadialKernel<T>> {
    kernel: &'a K,
    rset: &'a PointSet<T>,
    rweights: &'a [T],
}

impl<'a, T, K> NaiveKde<'a, T, K>
where
    T: DistanceLinalg,
    K: RadialKernel<T>,
{
    /// Wrap a kernel and reference side for exhaustive evaluation.
    pub fn new(kernel: &'a K, rset: &'a PointSet<T>, rweights: &'a [T]) -> Self {
        debug_assert_eq!(rset.n_points(), rweights.len());
        Self {
            kernel,
            rset,
            rweights,
        }
    }

    /// Compute the normalized density at every query point.
    pub fn estimate(&self, qset: &PointSet<T>) -> Vec<T> {
        let total_mass = self.rweights.iter().fold(T::zero(), |acc, &w| acc + w);
        let norm = self.kernel.norm_constant(qset.dimensions()) * total_mass;
        let inv = T::one() / norm;

        let mut densities = Vec::with_capacity(qset.n_points());
        for q in 0..qset.n_points() {
            let qp = qset.point(q);
            let mut sum = T::zero();
            for r in 0..self.rset.n_points() {
                let dsq = T::squared_euclidean(qp, self.rset.point(r));
                sum = sum + self.kernel.eval_unnorm_on_sq(dsq) * self.rweights[r];
            }
            densities.push(sum * inv);
        }
        densities
    }
}

// ============================================================================
// Error measurement
// ============================================================================

/// Largest relative deviation of `approx` from `exact` across all entries.
///
/// The denominator is floored at machine epsilon so that entries with an
/// exactly zero true density (possible with compact-support kernels) compare
/// by absolute deviation instead of dividing by zero.
pub fn max_relative_error<T: Float>(approx: &[T], exact: &[T]) -> T {
    debug_assert_eq!(approx.len(), exact.len());
    approx
        .iter()
        .zip(exact.iter())
        .fold(T::zero(), |acc, (&a, &e)| {
            let rel = (a - e).abs() / e.max(T::epsilon());
            acc.max(rel)
        })
}
