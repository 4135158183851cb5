//! # dualtree-kde — Fast Kernel Density Estimation for Rust
//!
//! A dual-tree kernel density estimator with certified per-point error
//! bounds, supporting exact and approximate evaluation over weighted
//! multidimensional reference sets.
//!
//! ## What is dual-tree density estimation?
//!
//! Kernel density estimation places a smooth bump (the kernel) on every
//! reference point and reads the density at a query point as the normalized
//! sum of all bumps. Evaluating that sum directly costs O(queries ×
//! references), which stops scaling long before real datasets do.
//!
//! This crate indexes both point sets in spatial trees and walks the two
//! trees together. Pairs of faraway boxes contribute nearly identical kernel
//! values for all their points, so the walk replaces whole blocks of the sum
//! with cheap approximations whose error is bounded, and only descends where
//! the bound is too loose. Each query point comes back with a hard lower and
//! upper bound bracketing its true density, so the approximation is
//! certified rather than hoped for.
//!
//! **Key properties:**
//! - Guaranteed relative error: every estimate is within the configured
//!   tolerance of the exact sum
//! - Certified intervals: per-point lower/upper bounds are returned
//!   alongside the estimates
//! - Weighted reference points with no extra cost
//! - Gaussian kernel accelerated further by Hermite/Taylor series
//!   expansions in low dimensions
//! - Zero tolerance degenerates to an exact (but still tree-accelerated)
//!   computation
//!
//! **Common applications:**
//! - Density estimation over large point clouds
//! - Outlier and anomaly scoring
//! - Nonparametric classification and regression building blocks
//! - Bandwidth selection sweeps, where many evaluations must be cheap
//!
//! ## Quick Start
//!
//! ### Typical Use
//!
//! ```rust
//! use dualtree_kde::prelude::*;
//!
//! let references = vec![0.10_f64, 0.25, 0.40, 0.90, 1.30, 1.35, 2.10];
//!
//! // Build the model
//! let model = Kde::new()
//!     .bandwidth(0.25)        // kernel bandwidth (required)
//!     .relative_error(0.05)   // 5% guaranteed relative error
//!     .build()?;
//!
//! // Fit the reference set, then query anywhere
//! let fitted = model.fit(&references)?;
//! let result = fitted.estimate(&[0.3, 1.0, 5.0])?;
//!
//! assert_eq!(result.estimate.len(), 3);
//! for i in 0..result.n_points() {
//!     assert!(result.lower[i] <= result.upper[i]);
//! }
//! # Result::<(), KdeError>::Ok(())
//! ```
//!
//! ### Full Features
//!
//! ```rust
//! use dualtree_kde::prelude::*;
//!
//! // Two-dimensional points, flattened row-major
//! let points = vec![
//!     0.0_f64, 0.0,
//!     1.0, 0.2,
//!     0.3, 1.1,
//!     4.0, 4.2,
//!     4.1, 3.9,
//! ];
//! let weights = vec![1.0, 2.0, 1.0, 0.5, 1.5];
//!
//! let model = Kde::new()
//!     .dimensions(2)          // point dimensionality (default: 1)
//!     .bandwidth(0.5)         // kernel bandwidth (required)
//!     .relative_error(0.01)   // error tolerance (default: 0.1)
//!     .kernel(Gaussian)       // kernel profile (default: Gaussian)
//!     .leaf_size(16)          // tree leaf capacity (default: 20)
//!     .expansion_order(5)     // series order cap (default: by dimension)
//!     .build()?;
//!
//! // Weighted fit, then evaluate the density at the references themselves
//! let fitted = model.fit_weighted(&points, &weights)?;
//! let result = fitted.estimate_self()?;
//!
//! println!("{}", result);
//! # Result::<(), KdeError>::Ok(())
//! ```
//!
//! ### Exact Evaluation
//!
//! ```rust
//! use dualtree_kde::prelude::*;
//!
//! let references = vec![0.0_f64, 1.0, 2.0, 3.0];
//!
//! // Zero tolerance: the tree walk still prunes what it can prove exact,
//! // and the result equals the direct sum to within rounding.
//! let fitted = Kde::new()
//!     .bandwidth(0.7)
//!     .relative_error(0.0)
//!     .build()?
//!     .fit(&references)?;
//!
//! let result = fitted.estimate(&[1.5])?;
//! assert!((result.upper[0] - result.lower[0]).abs() < 1e-12);
//! # Result::<(), KdeError>::Ok(())
//! ```
//!
//! ## Parameters
//!
//! | Parameter | Default | Meaning |
//! |-----------|---------|---------|
//! | `bandwidth` | required | Kernel length scale; larger values smooth more |
//! | `relative_error` | `0.1` | Guaranteed relative error bound; `0` is exact |
//! | `dimensions` | `1` | Coordinates per point in the flat buffers |
//! | `kernel` | `Gaussian` | `Gaussian` or `Epanechnikov` profile |
//! | `leaf_size` | `20` | Tree leaf capacity; smaller leaves prune more, cost more to build |
//! | `expansion_order` | by dimension | Cap on series truncation order (Gaussian only) |
//!
//! ## Kernels
//!
//! * **Gaussian**: `exp(-d² / 2h²)`, infinite support. Distant box pairs are
//!   settled by truncated Hermite and Taylor expansions of the kernel sum,
//!   with truncation orders chosen per pair from rigorous error bounds.
//! * **Epanechnikov**: `1 - d²/h²` clamped at zero, compact support. Box
//!   pairs beyond the support prune exactly; no series machinery applies.
//!
//! Estimates are normalized by the kernel's integral and the total reference
//! mass, so outputs are proper densities comparable across kernels and
//! weightings.
//!
//! ## Error guarantee
//!
//! For tolerance `tau`, every returned estimate satisfies
//! `|estimate - exact| <= tau * exact`, and the returned interval
//! `[lower, upper]` brackets the exact density. The traversal enforces this
//! globally by granting each pruned block an error allowance proportional to
//! the reference mass it settles, so accuracy cannot concentrate its failures
//! on any single query point.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | yes | Standard library support; disable for `no_std` + `alloc` |
//! | `dev` | no | Expose internal modules for testing and benchmarking |
//!
//! ## References
//!
//! * Gray, A. G. and Moore, A. W. (2001). *N-Body Problems in Statistical
//!   Learning*. Advances in Neural Information Processing Systems 13.
//! * Gray, A. G. and Moore, A. W. (2003). *Nonparametric Density Estimation:
//!   Toward Computational Tractability*. SIAM International Conference on
//!   Data Mining.
//! * Greengard, L. and Strain, J. (1991). *The Fast Gauss Transform*. SIAM
//!   Journal on Scientific and Statistical Computing, 12(1).

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the crate-wide error enum and the flattened point-matrix type.
mod primitives;

// Layer 2: Math - geometry, distances, and kernels.
//
// Contains interval and bounding-box types, squared Euclidean distance
// (SIMD-accelerated for f64), and the kernel profiles.
mod math;

// Layer 3: Tree - spatial indexing.
//
// Contains the arena-allocated midpoint-split tree both point sets are
// indexed by.
mod tree;

// Layer 4: Expansion - series machinery.
//
// Contains the expansion scheme abstraction, the Gaussian Hermite/Taylor
// implementation, and the order-selection error bounds.
mod expansion;

// Layer 5: Evaluation - verification tooling.
//
// Contains the exhaustive reference evaluator and relative-error
// measurement.
mod evaluation;

// Layer 6: Engine - the dual-tree computation.
//
// Contains per-node state, prune checks, the recursive traversal, the
// executor, validation, and telemetry.
mod engine;

// Layer 7: API - the public surface.
//
// Provides the `Kde` builder for configuring and running density
// estimation.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard density-estimation prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use dualtree_kde::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        DensityResult, FittedKde, KdeBuilder as Kde, KdeConfig, KdeError, KdeModel,
        KernelType::{Epanechnikov, Gaussian},
        TraversalTelemetry,
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal spatial tree.
    pub mod tree {
        pub use crate::tree::*;
    }
    /// Internal series expansions.
    pub mod expansion {
        pub use crate::expansion::*;
    }
    /// Internal evaluation and diagnostics.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
