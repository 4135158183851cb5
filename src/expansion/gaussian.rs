//! Gaussian far-field and local expansions.
//!
//! ## Purpose
//!
//! Implements the three series translations the traversal can prune with
//! when the kernel is Gaussian:
//! - far-field coefficients summarizing a reference node around its center,
//! - translation of a far field into a query node's local expansion,
//! - direct accumulation of reference points into a local expansion,
//!
//! plus evaluation and the order-selection error analysis for all three.
//!
//! ## Design notes
//!
//! * **Scaled coordinates**: all series work in `u = (x - center) / (√2 h)`,
//!   which turns the kernel into `Π_d exp(-(u_d - v_d)²)` and makes the
//!   per-dimension Hermite algebra exact.
//! * **Fixed storage**: coefficient grids are allocated once at
//!   `(maxOrder + 1)^d` and indexed with that fixed radix, so expansions
//!   accumulated at different orders share one index space. An object's
//!   `order` records the highest order contributed so far.
//! * **Refinement**: far-field refinement recomputes the grid from the
//!   node's owned range when the request exceeds the stored order and is a
//!   no-op otherwise; a node's range never changes, so recomputation is
//!   equivalent to incremental refinement.
//! * **Error bounds**: per-dimension Cramér tails with per-axis separation
//!   front factors, combined across dimensions in product form. The bounds
//!   are conservative; looseness only delays pruning and never violates the
//!   caller's tolerance.
//!
//! ## Invariants
//!
//! * A zero-width source region yields a zero error bound at order 0: the
//!   expansion is exact, and order selection may fire even with a zero
//!   allowance.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;
use num_traits::Float;

// Internal dependencies
use crate::expansion::hermite::{
    cramer_tail, flat_index, hermite_series_sum, hermite_values, next_multi_index, CRAMER_K,
};
use crate::expansion::{ExpansionScheme, OrderChoice};
use crate::math::bounds::{DRange, HRect};
use crate::primitives::dataset::PointSet;

// ============================================================================
// Coefficient holders
// ============================================================================

/// Far-field (Hermite) coefficients of one reference node.
#[derive(Debug, Clone)]
pub struct FarFieldCoeffs<T> {
    center: Vec<T>,
    coeffs: Vec<T>,
    order: Option<usize>,
}

impl<T> Default for FarFieldCoeffs<T> {
    fn default() -> Self {
        Self {
            center: Vec::new(),
            coeffs: Vec::new(),
            order: None,
        }
    }
}

impl<T> FarFieldCoeffs<T> {
    /// Highest order the coefficients have been computed to.
    #[inline]
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Expansion center.
    #[inline]
    pub fn center(&self) -> &[T] {
        &self.center
    }
}

/// Local (Taylor) coefficients of one query node.
#[derive(Debug, Clone)]
pub struct LocalCoeffs<T> {
    center: Vec<T>,
    coeffs: Vec<T>,
    order: Option<usize>,
}

impl<T> Default for LocalCoeffs<T> {
    fn default() -> Self {
        Self {
            center: Vec::new(),
            coeffs: Vec::new(),
            order: None,
        }
    }
}

impl<T> LocalCoeffs<T> {
    /// Highest order contributed so far.
    #[inline]
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Expansion center.
    #[inline]
    pub fn center(&self) -> &[T] {
        &self.center
    }
}

// ============================================================================
// GaussianScheme
// ============================================================================

/// The Gaussian expansion scheme: configuration shared by all expansions of
/// one estimation run.
#[derive(Debug, Clone)]
pub struct GaussianScheme<T> {
    dimensions: usize,
    max_order: usize,
    scale: T,
}

impl<T: Float> GaussianScheme<T> {
    /// Create a scheme for the given bandwidth, dimensionality, and maximum
    /// truncation order.
    pub fn new(bandwidth: T, dimensions: usize, max_order: usize) -> Self {
        let two = T::from(2.0).unwrap();
        Self {
            dimensions,
            max_order,
            scale: (two * bandwidth * bandwidth).sqrt(),
        }
    }

    /// Maximum truncation order.
    #[inline]
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    #[inline]
    fn radix(&self) -> usize {
        self.max_order + 1
    }

    fn grid_len(&self) -> usize {
        self.radix().pow(self.dimensions as u32)
    }

    /// Table of `1 / k!` for `k in 0..=up_to`.
    fn inv_factorials(&self, up_to: usize) -> Vec<T> {
        let mut table = vec![T::one(); up_to + 1];
        for k in 1..=up_to {
            table[k] = table[k - 1] / T::from(k).unwrap();
        }
        table
    }
}

impl<T: Float + Debug> ExpansionScheme<T> for GaussianScheme<T> {
    type FarField = FarFieldCoeffs<T>;
    type Local = LocalCoeffs<T>;

    fn new_farfield(&self, center: Vec<T>) -> FarFieldCoeffs<T> {
        FarFieldCoeffs {
            center,
            coeffs: vec![T::zero(); self.grid_len()],
            order: None,
        }
    }

    fn new_local(&self, center: Vec<T>) -> LocalCoeffs<T> {
        LocalCoeffs {
            center,
            coeffs: vec![T::zero(); self.grid_len()],
            order: None,
        }
    }

    fn refine_farfield(
        &self,
        farfield: &mut FarFieldCoeffs<T>,
        points: &PointSet<T>,
        weights: &[T],
        begin: usize,
        end: usize,
        order: usize,
    ) {
        debug_assert!(order <= self.max_order);
        if let Some(current) = farfield.order {
            if current >= order {
                return;
            }
        }
        for c in farfield.coeffs.iter_mut() {
            *c = T::zero();
        }

        let dims = self.dimensions;
        let radix = self.radix();
        let stride = order + 1;
        // pow[d * stride + k] = u_d^k / k!
        let mut pow = vec![T::zero(); dims * stride];
        let mut alpha = vec![0usize; dims];

        for j in begin..end {
            let point = points.point(j);
            for d in 0..dims {
                let u = (point[d] - farfield.center[d]) / self.scale;
                pow[d * stride] = T::one();
                for k in 1..=order {
                    pow[d * stride + k] = pow[d * stride + k - 1] * u / T::from(k).unwrap();
                }
            }
            for a in alpha.iter_mut() {
                *a = 0;
            }
            loop {
                let mut term = weights[j];
                for d in 0..dims {
                    term = term * pow[d * stride + alpha[d]];
                }
                let idx = flat_index(&alpha, radix);
                farfield.coeffs[idx] = farfield.coeffs[idx] + term;
                if !next_multi_index(&mut alpha, order) {
                    break;
                }
            }
        }
        farfield.order = Some(order);
    }

    fn translate_to_local(&self, farfield: &FarFieldCoeffs<T>, local: &mut LocalCoeffs<T>) {
        let order = match farfield.order {
            Some(o) => o,
            None => return,
        };
        let dims = self.dimensions;
        let radix = self.radix();
        // h_{α_d + β_d}(δ_d) needs values up to 2 * order.
        let hstride = 2 * order + 1;
        let mut herm = vec![T::zero(); dims * hstride];
        for d in 0..dims {
            let delta = (local.center[d] - farfield.center[d]) / self.scale;
            hermite_values(delta, &mut herm[d * hstride..(d + 1) * hstride]);
        }
        let inv_fact = self.inv_factorials(order);

        let mut beta = vec![0usize; dims];
        let mut alpha = vec![0usize; dims];
        loop {
            let mut inner = T::zero();
            for a in alpha.iter_mut() {
                *a = 0;
            }
            loop {
                let mut term = farfield.coeffs[flat_index(&alpha, radix)];
                if term != T::zero() {
                    for d in 0..dims {
                        term = term * herm[d * hstride + alpha[d] + beta[d]];
                    }
                    inner = inner + term;
                }
                if !next_multi_index(&mut alpha, order) {
                    break;
                }
            }

            let parity: usize = beta.iter().sum();
            let mut factor = if parity % 2 == 0 { T::one() } else { -T::one() };
            for d in 0..dims {
                factor = factor * inv_fact[beta[d]];
            }
            let idx = flat_index(&beta, radix);
            local.coeffs[idx] = local.coeffs[idx] + factor * inner;
            if !next_multi_index(&mut beta, order) {
                break;
            }
        }
        local.order = Some(local.order.map_or(order, |cur| cur.max(order)));
    }

    fn eval_farfield(&self, farfield: &FarFieldCoeffs<T>, point: &[T]) -> T {
        let order = match farfield.order {
            Some(o) => o,
            None => return T::zero(),
        };
        let dims = self.dimensions;
        let radix = self.radix();
        let stride = order + 1;
        let mut herm = vec![T::zero(); dims * stride];
        for d in 0..dims {
            let v = (point[d] - farfield.center[d]) / self.scale;
            hermite_values(v, &mut herm[d * stride..(d + 1) * stride]);
        }

        let mut alpha = vec![0usize; dims];
        let mut sum = T::zero();
        loop {
            let mut term = farfield.coeffs[flat_index(&alpha, radix)];
            if term != T::zero() {
                for d in 0..dims {
                    term = term * herm[d * stride + alpha[d]];
                }
                sum = sum + term;
            }
            if !next_multi_index(&mut alpha, order) {
                break;
            }
        }
        sum
    }

    fn accumulate_local(
        &self,
        local: &mut LocalCoeffs<T>,
        points: &PointSet<T>,
        weights: &[T],
        begin: usize,
        end: usize,
        order: usize,
    ) {
        debug_assert!(order <= self.max_order);
        let dims = self.dimensions;
        let radix = self.radix();
        let stride = order + 1;
        let inv_fact = self.inv_factorials(order);
        let mut herm = vec![T::zero(); dims * stride];
        let mut beta = vec![0usize; dims];

        for j in begin..end {
            let point = points.point(j);
            for d in 0..dims {
                let u = (point[d] - local.center[d]) / self.scale;
                hermite_values(u, &mut herm[d * stride..(d + 1) * stride]);
            }
            for b in beta.iter_mut() {
                *b = 0;
            }
            loop {
                let mut term = weights[j];
                for d in 0..dims {
                    term = term * herm[d * stride + beta[d]] * inv_fact[beta[d]];
                }
                let idx = flat_index(&beta, radix);
                local.coeffs[idx] = local.coeffs[idx] + term;
                if !next_multi_index(&mut beta, order) {
                    break;
                }
            }
        }
        local.order = Some(local.order.map_or(order, |cur| cur.max(order)));
    }

    fn translate_local(&self, parent: &LocalCoeffs<T>, child: &mut LocalCoeffs<T>) {
        let order = match parent.order {
            Some(o) => o,
            None => return,
        };
        let dims = self.dimensions;
        let radix = self.radix();
        let stride = order + 1;

        // δ_d^k tables for the shift from parent to child center.
        let mut dpow = vec![T::zero(); dims * stride];
        for d in 0..dims {
            let delta = (child.center[d] - parent.center[d]) / self.scale;
            dpow[d * stride] = T::one();
            for k in 1..=order {
                dpow[d * stride + k] = dpow[d * stride + k - 1] * delta;
            }
        }
        let binom = pascal_triangle::<T>(order);

        let mut gamma = vec![0usize; dims];
        let mut beta = vec![0usize; dims];
        loop {
            let mut sum = T::zero();
            for b in beta.iter_mut() {
                *b = 0;
            }
            loop {
                if beta.iter().zip(gamma.iter()).all(|(b, g)| b >= g) {
                    let mut term = parent.coeffs[flat_index(&beta, radix)];
                    if term != T::zero() {
                        for d in 0..dims {
                            term = term
                                * binom[beta[d]][gamma[d]]
                                * dpow[d * stride + beta[d] - gamma[d]];
                        }
                        sum = sum + term;
                    }
                }
                if !next_multi_index(&mut beta, order) {
                    break;
                }
            }
            let idx = flat_index(&gamma, radix);
            child.coeffs[idx] = child.coeffs[idx] + sum;
            if !next_multi_index(&mut gamma, order) {
                break;
            }
        }
        child.order = Some(child.order.map_or(order, |cur| cur.max(order)));
    }

    fn eval_local(&self, local: &LocalCoeffs<T>, point: &[T]) -> T {
        let order = match local.order {
            Some(o) => o,
            None => return T::zero(),
        };
        let dims = self.dimensions;
        let radix = self.radix();
        let stride = order + 1;
        let mut tpow = vec![T::zero(); dims * stride];
        for d in 0..dims {
            let t = (point[d] - local.center[d]) / self.scale;
            tpow[d * stride] = T::one();
            for k in 1..=order {
                tpow[d * stride + k] = tpow[d * stride + k - 1] * t;
            }
        }

        let mut beta = vec![0usize; dims];
        let mut sum = T::zero();
        loop {
            let mut term = local.coeffs[flat_index(&beta, radix)];
            if term != T::zero() {
                for d in 0..dims {
                    term = term * tpow[d * stride + beta[d]];
                }
                sum = sum + term;
            }
            if !next_multi_index(&mut beta, order) {
                break;
            }
        }
        sum
    }

    fn order_for_converting_to_local(
        &self,
        ref_bound: &HRect<T>,
        query_bound: &HRect<T>,
        _dsq: &DRange<T>,
        allowed_err: T,
    ) -> Option<OrderChoice<T>> {
        let k = T::from(CRAMER_K).unwrap();
        let two = T::from(2.0).unwrap();
        let sqrt2 = two.sqrt();
        let r_far = ref_bound.widest_width() / (two * self.scale);
        let r_loc = query_bound.widest_width() / (two * self.scale);
        let far_center = ref_bound.midpoint();
        let loc_center = query_bound.midpoint();

        // Per-axis separation front factors: from the query box to the
        // far-field center (truncation part) and between the two centers
        // (translation part).
        let mut front_far = T::zero();
        let mut front_trans = T::zero();
        for d in 0..self.dimensions {
            let g = query_bound.range(d).gap(far_center[d]) / self.scale;
            front_far = front_far + (-(g * g) / two).exp();
            let delta = (loc_center[d] - far_center[d]) / self.scale;
            front_trans = front_trans + (-(delta * delta) / two).exp();
        }
        let series_far = hermite_series_sum(two * r_far);

        for p in 0..=self.max_order {
            let tail_far = cramer_tail(p, sqrt2 * r_far);
            let tail_loc = cramer_tail(p, two * r_loc);
            let unit = k * (tail_far + series_far * tail_loc);
            let err = (front_far * k * tail_far + front_trans * k * series_far * tail_loc)
                * (T::one() + unit).powi(self.dimensions as i32 - 1);
            if err <= allowed_err {
                return Some(OrderChoice { order: p, error: err });
            }
        }
        None
    }

    fn order_for_far_eval(
        &self,
        ref_bound: &HRect<T>,
        query_bound: &HRect<T>,
        _dsq: &DRange<T>,
        allowed_err: T,
    ) -> Option<OrderChoice<T>> {
        let k = T::from(CRAMER_K).unwrap();
        let two = T::from(2.0).unwrap();
        let sqrt2 = two.sqrt();
        let r_far = ref_bound.widest_width() / (two * self.scale);
        let z = sqrt2 * r_far;
        let center = ref_bound.midpoint();

        let mut front = T::zero();
        for d in 0..self.dimensions {
            let g = query_bound.range(d).gap(center[d]) / self.scale;
            front = front + (-(g * g) / two).exp();
        }

        for p in 0..=self.max_order {
            let tail = k * cramer_tail(p, z);
            let err = front * tail * (T::one() + tail).powi(self.dimensions as i32 - 1);
            if err <= allowed_err {
                return Some(OrderChoice { order: p, error: err });
            }
        }
        None
    }

    fn order_for_local_accum(
        &self,
        ref_bound: &HRect<T>,
        query_bound: &HRect<T>,
        _dsq: &DRange<T>,
        allowed_err: T,
    ) -> Option<OrderChoice<T>> {
        let k = T::from(CRAMER_K).unwrap();
        let two = T::from(2.0).unwrap();
        let sqrt2 = two.sqrt();
        let r_loc = query_bound.widest_width() / (two * self.scale);
        let z = sqrt2 * r_loc;
        let center = query_bound.midpoint();

        let mut front = T::zero();
        for d in 0..self.dimensions {
            let g = ref_bound.range(d).gap(center[d]) / self.scale;
            front = front + (-(g * g) / two).exp();
        }

        for p in 0..=self.max_order {
            let tail = k * cramer_tail(p, z);
            let err = front * tail * (T::one() + tail).powi(self.dimensions as i32 - 1);
            if err <= allowed_err {
                return Some(OrderChoice { order: p, error: err });
            }
        }
        None
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Binomial coefficients as a Pascal triangle with `n + 1` rows.
fn pascal_triangle<T: Float>(n: usize) -> Vec<Vec<T>> {
    let mut rows: Vec<Vec<T>> = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let mut row = vec![T::one(); i + 1];
        for j in 1..i {
            row[j] = rows[i - 1][j - 1] + rows[i - 1][j];
        }
        rows.push(row);
    }
    rows
}
