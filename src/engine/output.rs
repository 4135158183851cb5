//! Result container for density computations.
//!
//! ## Purpose
//!
//! This module defines [`DensityResult`], the value returned to callers. It
//! carries three normalized density vectors per query point (a hard lower
//! bound, the estimate, and a hard upper bound), in the caller's original
//! query order, together with the traversal counters of the run that
//! produced them.
//!
//! ## Design notes
//!
//! * Plain owned vectors; the caller may move them out freely.
//! * The bounds are certified by the traversal, so `lower[i] <= upper[i]`
//!   always, and the true density lies inside the interval up to
//!   floating-point rounding.
//!
//! ## Non-goals
//!
//! * This module does not compute anything; it only packages results.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt;
use num_traits::Float;

// Internal dependencies
use crate::engine::telemetry::TraversalTelemetry;

// ============================================================================
// DensityResult
// ============================================================================

/// Densities and certified bounds for one batch of query points.
///
/// All three vectors are indexed by the caller's original query order and
/// normalized by the kernel constant and the total reference mass, so each
/// entry is a proper density value.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityResult<T> {
    /// Hard lower bound on each query point's density.
    pub lower: Vec<T>,
    /// Density estimate for each query point.
    pub estimate: Vec<T>,
    /// Hard upper bound on each query point's density.
    pub upper: Vec<T>,
    /// Counters from the traversal that produced this result.
    pub telemetry: TraversalTelemetry,
}

impl<T: Float> DensityResult<T> {
    /// Number of query points covered.
    pub fn n_points(&self) -> usize {
        self.estimate.len()
    }

    /// Widest certified interval across all query points.
    ///
    /// A small value means the run resolved every density tightly; a value
    /// near the maximum density means heavy pruning left loose intervals.
    pub fn max_interval_width(&self) -> T {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .fold(T::zero(), |acc, (&l, &u)| acc.max(u - l))
    }
}

impl<T: Float + fmt::LowerExp> fmt::Display for DensityResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min_e, max_e) = self.estimate.iter().fold(
            (T::infinity(), T::neg_infinity()),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        );
        writeln!(f, "Density estimates for {} query points", self.n_points())?;
        writeln!(f, "  estimate range: [{:.6e}, {:.6e}]", min_e, max_e)?;
        writeln!(
            f,
            "  max certified interval width: {:.6e}",
            self.max_interval_width()
        )?;
        write!(
            f,
            "  pairs visited: {}, prunes: {}, base cases: {}",
            self.telemetry.pairs_visited,
            self.telemetry.total_prunes(),
            self.telemetry.base_cases
        )
    }
}
