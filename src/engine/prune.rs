//! Prune decisions for node pairs.
//!
//! ## Purpose
//!
//! This module decides whether a (query node, reference node) pair can be
//! finished without recursing further, and if so, how. A finite-difference
//! prune replaces the reference node's contribution with the midpoint of the
//! kernel range over the pair's distance interval. A series prune replaces it
//! with a truncated Hermite or Taylor expansion whose order is chosen so the
//! truncation error fits the available budget.
//!
//! ## Design notes
//!
//! * Both checks follow the same global guarantee: a prune may spend at most
//!   a `tau` fraction of the relative error budget, scaled by the share of
//!   reference mass it settles and by any tokens the query node has banked.
//! * The budget test uses the query node's current lower bound, which only
//!   grows, so a prune that is admissible now would also be admissible later.
//! * Series pruning tries the cheapest adequate mechanism first:
//!   far-field-to-local conversion, then direct far-field evaluation (only
//!   when the query side is smaller), then direct local accumulation.
//! * Unspent budget is returned as tokens (`dt`), computed from the actual
//!   error of the chosen mechanism rather than the worst admissible one.
//!
//! ## Key concepts
//!
//! * **Kernel range**: the interval of kernel values attainable over all
//!   point pairs in the two boxes, from the distance interval of the boxes.
//! * **Bound deltas**: `dl`/`du` adjust the query subtree's lower/upper
//!   bounds; `de` adds the midpoint estimate; `dt` banks leftover budget.
//!
//! ## Invariants
//!
//! * `dl` ≥ 0 and `du` ≤ 0 for any kernel bounded by 1 at distance zero.
//! * A returned prune satisfies `error ≤ tau · mass_l' · (n + tokens) / N`
//!   (per unit of reference mass for series prunes).
//! * `dt` never exceeds the reference node's mass.
//!
//! ## Non-goals
//!
//! * This module does not mutate any traversal state; it only reports what
//!   an admissible prune would do.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::expansion::ExpansionScheme;
use crate::math::bounds::{DRange, HRect};

// ============================================================================
// Prune descriptions
// ============================================================================

/// Which series mechanism a series prune uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Convert the reference node's far-field expansion into the query
    /// node's local expansion.
    FarFieldToLocal,
    /// Evaluate the reference node's far-field expansion directly at each
    /// query point.
    FarFieldEvaluation,
    /// Accumulate the reference points directly into the query node's local
    /// expansion.
    LocalAccumulation,
}

/// An admissible way to finish a node pair without recursing.
///
/// The deltas are applied to the query node by the traversal; the prune
/// check itself has no side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PruneOp<T> {
    /// Approximate the pair with the midpoint of the kernel range.
    FiniteDifference {
        /// Lower-bound increment for the query subtree.
        dl: T,
        /// Estimate increment (kernel range midpoint times reference mass).
        de: T,
        /// Upper-bound increment (non-positive) for the query subtree.
        du: T,
        /// Error tokens banked for the query subtree.
        dt: T,
    },
    /// Approximate the pair with a truncated series of the given order.
    Series {
        /// Mechanism used to transfer the reference contribution.
        kind: SeriesKind,
        /// Truncation order certified by the error bound.
        order: usize,
        /// Lower-bound increment for the query subtree.
        dl: T,
        /// Upper-bound increment (non-positive) for the query subtree.
        du: T,
        /// Error tokens banked for the query subtree.
        dt: T,
    },
}

// ============================================================================
// Finite-difference check
// ============================================================================

/// Try to settle a node pair with the kernel range midpoint.
///
/// `kernel_range` is the kernel value interval over the pair's distance
/// interval, `node_mass` the reference node's weight sum, `total_mass` the
/// whole reference set's weight sum, and `mass_l`/`mass_t` the query node's
/// current lower bound and banked tokens.
pub fn try_finite_difference<T: Float>(
    kernel_range: &DRange<T>,
    node_mass: T,
    total_mass: T,
    mass_l: T,
    mass_t: T,
    tau: T,
) -> Option<PruneOp<T>> {
    let half = T::from(0.5).unwrap();

    let dl = kernel_range.lo * node_mass;
    let de = half * node_mass * (kernel_range.lo + kernel_range.hi);
    let du = (kernel_range.hi - T::one()) * node_mass;

    // Budget check against the lower bound as it will stand after this
    // prune is applied.
    let new_mass_l = mass_l + dl;
    let allowed = tau * new_mass_l * (node_mass + mass_t) / total_mass;
    let midpoint_error = half * kernel_range.width();
    let error = midpoint_error * node_mass;
    if error > allowed {
        return None;
    }

    // Refund the budget this prune did not spend. A zero-error prune
    // refunds the node's full mass. Testing the total error rather than the
    // midpoint error keeps zero-mass nodes off the division below.
    let dt = if error <= T::zero() {
        node_mass
    } else {
        node_mass * (T::one() - total_mass * midpoint_error / (new_mass_l * tau))
    };
    debug_assert!(dt.is_finite(), "token refund must stay finite");

    Some(PruneOp::FiniteDifference { dl, de, du, dt })
}

// ============================================================================
// Series check
// ============================================================================

/// Try to settle a node pair with a truncated series expansion.
///
/// The per-unit-mass budget is offered to each mechanism in turn; direct
/// far-field evaluation is only considered when the query node holds fewer
/// points than the reference node, since its cost scales with the query
/// side.
#[allow(clippy::too_many_arguments)]
pub fn try_series<T: Float, E: ExpansionScheme<T>>(
    scheme: &E,
    ref_bound: &HRect<T>,
    query_bound: &HRect<T>,
    dsq: &DRange<T>,
    kernel_range: &DRange<T>,
    node_mass: T,
    total_mass: T,
    mass_l: T,
    mass_t: T,
    tau: T,
    query_points: usize,
    ref_points: usize,
) -> Option<PruneOp<T>> {
    let dl = kernel_range.lo * node_mass;
    let du = (kernel_range.hi - T::one()) * node_mass;

    let new_mass_l = mass_l + dl;
    // Series error bounds are per kernel evaluation, so the budget is
    // divided by the reference mass being settled.
    let allowed = tau * new_mass_l * (node_mass + mass_t) / (total_mass * node_mass);

    let chosen = scheme
        .order_for_converting_to_local(ref_bound, query_bound, dsq, allowed)
        .map(|choice| (SeriesKind::FarFieldToLocal, choice))
        .or_else(|| {
            if query_points < ref_points {
                scheme
                    .order_for_far_eval(ref_bound, query_bound, dsq, allowed)
                    .map(|choice| (SeriesKind::FarFieldEvaluation, choice))
            } else {
                None
            }
        })
        .or_else(|| {
            scheme
                .order_for_local_accum(ref_bound, query_bound, dsq, allowed)
                .map(|choice| (SeriesKind::LocalAccumulation, choice))
        });

    let (kind, choice) = chosen?;

    let dt = if choice.error <= T::zero() {
        node_mass
    } else {
        node_mass * (T::one() - total_mass * choice.error / (new_mass_l * tau))
    };
    debug_assert!(dt.is_finite(), "token refund must stay finite");

    Some(PruneOp::Series {
        kind,
        order: choice.order,
        dl,
        du,
        dt,
    })
}
