//! Hermite recurrences, Cramér tails, and multi-index bookkeeping.
//!
//! ## Purpose
//!
//! The Gaussian scheme's coefficient and error mathematics reduce to a
//! small set of scalar helpers collected here: Hermite function tables,
//! numerically evaluated Cramér tail sums for truncation-error bounds, and
//! the odometer arithmetic that walks tensor grids of multi-indices.
//!
//! ## Key concepts
//!
//! * **Hermite functions**: `h_n(t) = (-1)^n d^n/dt^n exp(-t²)`, generated
//!   by `h_{n+1}(t) = 2t·h_n(t) - 2n·h_{n-1}(t)` from `h_0(t) = exp(-t²)`.
//! * **Cramér's inequality**: `|h_n(t)| ≤ K·2^(n/2)·√(n!)·exp(-t²/2)` with
//!   `K ≈ 1.086435`; it turns truncation tails into sums of
//!   `z^n / √(n!)`, which converge for every `z`.
//! * **Mixed-radix multi-indices**: coefficient grids are flattened with a
//!   fixed radix of `max_order + 1`, so partial-order accumulations share
//!   one index space.
//!
//! ## Invariants
//!
//! * `cramer_tail(p, z)` is a sound upper bound on `Σ_{n>p} z^n / √(n!)`
//!   and is non-increasing in `p`.

// External dependencies
use num_traits::Float;

/// Cramér's constant `K` bounding `|h_n(t)| / (2^(n/2) √(n!) e^(-t²/2))`.
pub const CRAMER_K: f64 = 1.086_435;

/// Largest truncation order the coefficient storage supports.
pub const MAX_SUPPORTED_ORDER: usize = 12;

// ============================================================================
// Order defaults
// ============================================================================

/// Default maximum expansion order by dimensionality.
///
/// Tensor-grid sizes grow as `(order + 1)^d`, so the affordable order drops
/// quickly with dimension; past six dimensions series pruning is disabled
/// by default.
pub fn default_max_order(dimensions: usize) -> usize {
    match dimensions {
        0..=2 => 7,
        3 => 5,
        4 | 5 => 3,
        6 => 1,
        _ => 0,
    }
}

// ============================================================================
// Hermite tables
// ============================================================================

/// Fill `out` with `h_0(t) ..= h_{out.len()-1}(t)`.
pub fn hermite_values<T: Float>(t: T, out: &mut [T]) {
    if out.is_empty() {
        return;
    }
    let gauss = (-t * t).exp();
    out[0] = gauss;
    if out.len() == 1 {
        return;
    }
    let two = T::from(2.0).unwrap();
    out[1] = two * t * gauss;
    for n in 1..out.len() - 1 {
        out[n + 1] = two * t * out[n] - two * T::from(n).unwrap() * out[n - 1];
    }
}

// ============================================================================
// Cramér tail sums
// ============================================================================

/// Sound upper bound on the tail `Σ_{n>p} z^n / √(n!)`.
///
/// Terms are summed explicitly while the term ratio `z/√(n)` stays large;
/// once it falls below 1/2 the remainder is closed with a geometric bound.
/// Pathologically large `z` returns infinity, which declines the order
/// upstream.
pub fn cramer_tail<T: Float>(p: usize, z: T) -> T {
    if z <= T::zero() {
        return T::zero();
    }

    // First tail term z^(p+1) / √((p+1)!), built as a running product to
    // avoid overflowing intermediate factorials.
    let mut term = T::one();
    for k in 1..=(p + 1) {
        term = term * z / T::from(k).unwrap().sqrt();
    }

    let half = T::from(0.5).unwrap();
    let mut sum = T::zero();
    let mut n = p + 1;
    loop {
        sum = sum + term;
        n += 1;
        let ratio = z / T::from(n).unwrap().sqrt();
        if ratio < half {
            return sum + term * ratio / (T::one() - ratio);
        }
        term = term * ratio;
        if n > p + 256 {
            return T::infinity();
        }
    }
}

/// Sound upper bound on the full series `Σ_{n≥0} z^n / √(n!)`.
#[inline]
pub fn hermite_series_sum<T: Float>(z: T) -> T {
    T::one() + cramer_tail(0, z)
}

// ============================================================================
// Multi-index odometer
// ============================================================================

/// Advance a multi-index through the tensor grid `{0..=limit}^d` in
/// little-endian order. Returns `false` once the grid is exhausted (the
/// index wraps back to all zeros).
#[inline]
pub fn next_multi_index(index: &mut [usize], limit: usize) -> bool {
    for v in index.iter_mut() {
        if *v < limit {
            *v += 1;
            return true;
        }
        *v = 0;
    }
    false
}

/// Flatten a multi-index with the given radix (`max_order + 1`).
#[inline]
pub fn flat_index(index: &[usize], radix: usize) -> usize {
    index.iter().fold(0, |acc, &a| acc * radix + a)
}
