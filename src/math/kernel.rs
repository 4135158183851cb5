//! Radial kernels over squared distances.
//!
//! ## Purpose
//!
//! This module provides the kernel functions the summation engine weights
//! reference points with. Kernels are evaluated on *squared* distances and
//! keep their bandwidth pre-squared, so the hot path never takes a root.
//!
//! ## Key concepts
//!
//! * **Unnormalized evaluation**: the traversal accumulates raw kernel
//!   values; the shared normalization constant divides the totals once at
//!   the end.
//! * **Value range over an interval**: all kernels here are monotone
//!   non-increasing in squared distance, so the kernel range over a
//!   squared-distance interval `[lo, hi]` is `[k(hi), k(lo)]`. Prune
//!   decisions depend on this.
//!
//! ## Kernel properties
//!
//! | Kernel        | Unnormalized form            | Support  | Normalization               |
//! |---------------|------------------------------|----------|------------------------------|
//! | Gaussian      | exp(-d² / (2h²))             | infinite | (2π h²)^(d/2)               |
//! | Epanechnikov  | max(0, 1 - d²/h²)            | d ≤ h    | 2 π^(d/2) h^d / ((d+2) Γ(d/2+1)) |
//!
//! ## Invariants
//!
//! * `0 <= eval(dsq) <= 1` for every kernel and every `dsq >= 0`.
//! * `eval` is non-increasing in `dsq`.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::bounds::DRange;

/// π as f64, for normalization constants.
const PI: f64 = core::f64::consts::PI;

/// √π = Γ(1/2), seed for half-integer gamma values.
const SQRT_PI: f64 = 1.772_453_850_905_516;

// ============================================================================
// RadialKernel Trait
// ============================================================================

/// A radial kernel with a fixed bandwidth, evaluated on squared distances.
pub trait RadialKernel<T: Float> {
    /// The squared bandwidth `h²`.
    fn bandwidth_sq(&self) -> T;

    /// Unnormalized kernel value at squared distance `dsq`.
    fn eval_unnorm_on_sq(&self, dsq: T) -> T;

    /// Kernel value range over a squared-distance interval.
    ///
    /// Monotonicity makes this exact: the maximum sits at the interval's
    /// near end and the minimum at its far end.
    #[inline]
    fn range_unnorm_on_sq(&self, dsq: &DRange<T>) -> DRange<T> {
        DRange::new(
            self.eval_unnorm_on_sq(dsq.hi),
            self.eval_unnorm_on_sq(dsq.lo),
        )
    }

    /// Normalization constant for `dimensions`-dimensional densities.
    fn norm_constant(&self, dimensions: usize) -> T;
}

// ============================================================================
// Gaussian Kernel
// ============================================================================

/// The Gaussian kernel `exp(-d² / (2h²))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel<T> {
    bandwidth_sq: T,
}

impl<T: Float> GaussianKernel<T> {
    /// Create a Gaussian kernel from its bandwidth `h`.
    #[inline]
    pub fn new(bandwidth: T) -> Self {
        Self {
            bandwidth_sq: bandwidth * bandwidth,
        }
    }
}

impl<T: Float> RadialKernel<T> for GaussianKernel<T> {
    #[inline]
    fn bandwidth_sq(&self) -> T {
        self.bandwidth_sq
    }

    #[inline]
    fn eval_unnorm_on_sq(&self, dsq: T) -> T {
        let two = T::from(2.0).unwrap();
        (-dsq / (two * self.bandwidth_sq)).exp()
    }

    fn norm_constant(&self, dimensions: usize) -> T {
        let two_pi_hsq = T::from(2.0 * PI).unwrap() * self.bandwidth_sq;
        two_pi_hsq.powf(T::from(dimensions).unwrap() / T::from(2.0).unwrap())
    }
}

// ============================================================================
// Epanechnikov Kernel
// ============================================================================

/// The Epanechnikov kernel `max(0, 1 - d²/h²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpanechnikovKernel<T> {
    bandwidth_sq: T,
}

impl<T: Float> EpanechnikovKernel<T> {
    /// Create an Epanechnikov kernel from its bandwidth `h`.
    #[inline]
    pub fn new(bandwidth: T) -> Self {
        Self {
            bandwidth_sq: bandwidth * bandwidth,
        }
    }
}

impl<T: Float> RadialKernel<T> for EpanechnikovKernel<T> {
    #[inline]
    fn bandwidth_sq(&self) -> T {
        self.bandwidth_sq
    }

    #[inline]
    fn eval_unnorm_on_sq(&self, dsq: T) -> T {
        (T::one() - dsq / self.bandwidth_sq).max(T::zero())
    }

    fn norm_constant(&self, dimensions: usize) -> T {
        // Integral of the unnormalized kernel over the support ball:
        // 2 π^(d/2) h^d / ((d + 2) Γ(d/2 + 1)).
        let d = dimensions;
        let h_pow_d = self
            .bandwidth_sq
            .powf(T::from(d).unwrap() / T::from(2.0).unwrap());
        let pi_pow = T::from(PI).unwrap().powf(T::from(d).unwrap() / T::from(2.0).unwrap());
        let two = T::from(2.0).unwrap();
        two * pi_pow * h_pow_d / (T::from(d + 2).unwrap() * gamma_half_plus_one::<T>(d))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Γ(d/2 + 1) for integer `d`, by the recurrence Γ(x + 1) = x Γ(x).
///
/// Even `d` gives (d/2)!; odd `d` walks half-integers down to Γ(1/2) = √π.
fn gamma_half_plus_one<T: Float>(d: usize) -> T {
    let mut g = if d % 2 == 0 {
        T::one()
    } else {
        T::from(SQRT_PI).unwrap()
    };
    let mut x = T::from(d).unwrap() / T::from(2.0).unwrap();
    let floor = T::from(0.4).unwrap();
    while x > floor {
        g = g * x;
        x = x - T::one();
    }
    g
}
