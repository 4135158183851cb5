//! Squared Euclidean distance with a SIMD fast path.
//!
//! ## Purpose
//!
//! Every kernel evaluation in the exhaustive base case, and every naive
//! oracle comparison, starts from a squared Euclidean distance between two
//! coordinate slices. This module provides that one operation, bridged so
//! `f64` uses a two-lane SIMD accumulator while other float types fall back
//! to a scalar loop.
//!
//! ## Design notes
//!
//! * **Squared form**: the engine never needs the root; kernels are defined
//!   on squared distances, and comparisons against box bounds stay in
//!   squared space.
//! * **Bridging**: generic code takes `T: DistanceLinalg`; the two impls
//!   delegate to the backend submodule, so the traversal stays fully generic.
//!
//! ## Invariants
//!
//! * The SIMD and scalar paths agree to floating-point round-off.

// External dependencies
use num_traits::Float;

// ============================================================================
// DistanceLinalg Trait
// ============================================================================

/// Helper trait to bridge generic `Float` types to the SIMD distance backend.
pub trait DistanceLinalg: Float + 'static {
    /// Squared Euclidean distance between two equal-length coordinate slices.
    fn squared_euclidean(a: &[Self], b: &[Self]) -> Self;
}

impl DistanceLinalg for f64 {
    #[inline]
    fn squared_euclidean(a: &[Self], b: &[Self]) -> Self {
        simd_backend::squared_euclidean_f64(a, b)
    }
}

impl DistanceLinalg for f32 {
    #[inline]
    fn squared_euclidean(a: &[Self], b: &[Self]) -> Self {
        scalar_squared_euclidean(a, b)
    }
}

/// Scalar fallback shared by non-`f64` precisions.
#[inline]
pub fn scalar_squared_euclidean<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| {
            let diff = ai - bi;
            diff * diff
        })
        .fold(T::zero(), |acc, x| acc + x)
}

// ============================================================================
// SIMD Backend Implementation
// ============================================================================

/// Two-lane SIMD distance kernels for `f64`.
pub mod simd_backend {
    use wide::f64x2;

    /// Squared Euclidean distance, two dimensions per step.
    #[inline]
    pub fn squared_euclidean_f64(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
        let len = a.len();
        let pairs = len / 2;

        let mut acc = f64x2::splat(0.0);
        let mut i = 0;
        while i < pairs * 2 {
            let av = f64x2::new([a[i], a[i + 1]]);
            let bv = f64x2::new([b[i], b[i + 1]]);
            let d = av - bv;
            acc += d * d;
            i += 2;
        }

        let mut sum = acc.reduce_add();
        if len % 2 == 1 {
            let d = a[len - 1] - b[len - 1];
            sum += d * d;
        }
        sum
    }
}
