//! Per-node accumulator state for the dual-tree traversal.
//!
//! ## Purpose
//!
//! This module defines the bookkeeping attached to every tree node during a
//! density computation. Query-side fields track running lower/upper bounds on
//! the unnormalized kernel sum of the points below a node, postponed
//! corrections inherited from ancestors, and the pruning allowance available
//! to descendants. Reference-side fields hold the far-field expansion formed
//! from the points below a node.
//!
//! ## Design notes
//!
//! * One flat arena of `NodeStat` entries mirrors the node arena of each
//!   tree, so parent/child stat access is plain indexing.
//! * When queries and references are the same tree, both roles share one
//!   arena entry per node. All field updates are role-disjoint, so sharing
//!   is safe.
//! * Bounds are merged upward with `merge_child_bounds` so that a parent
//!   benefits from whatever tightening its children accumulated.
//!
//! ## Key concepts
//!
//! * **Running bounds**: `mass_l` and `mass_u` bound the unnormalized kernel
//!   sum of every query point below the node.
//! * **Postponed corrections**: `owed_l`/`owed_u` are pending bound updates
//!   recorded at a parent and applied lazily on the next visit.
//! * **Error tokens**: `mass_t` is slack reclaimed from finished or pruned
//!   work, spent to justify further pruning.
//!
//! ## Invariants
//!
//! * After every traversal step, `mass_l` ≤ true kernel sum ≤ `mass_u` holds
//!   for every query point below the node (with pending `owed_*` still to be
//!   folded in).
//! * `owed_l` and `owed_u` are zeroed each time a node is visited.
//! * Token reclamation never increases the sum of tokens along a
//!   root-to-leaf path.
//!
//! ## Non-goals
//!
//! * This module does not decide when to prune (see `engine::prune`).
//! * This module does not walk the trees (see `engine::traversal`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::expansion::ExpansionScheme;

// ============================================================================
// NodeStat
// ============================================================================

/// Traversal state attached to a single tree node.
///
/// Reference nodes use only `farfield`; query nodes use the bound fields and
/// `local`. When one tree plays both roles, a single entry serves both, which
/// is what makes self-evaluation share work between the two sides.
#[derive(Debug, Clone)]
pub struct NodeStat<T: Float, E: ExpansionScheme<T>> {
    /// Running lower bound on the kernel sum of every point below this node.
    pub mass_l: T,
    /// Lower-bound mass granted to this leaf's points, folded in after the
    /// traversal finishes.
    pub more_l: T,
    /// Pending lower-bound correction inherited from the parent.
    pub owed_l: T,
    /// Pruned mass estimate, pushed to the per-point estimates at the end.
    pub mass_e: T,
    /// Running upper bound on the kernel sum of every point below this node.
    pub mass_u: T,
    /// Upper-bound mass granted to this leaf's points, folded in after the
    /// traversal finishes.
    pub more_u: T,
    /// Pending upper-bound correction inherited from the parent.
    pub owed_u: T,
    /// Error tokens: reference mass already accounted for below this node,
    /// available to relax future prune checks.
    pub mass_t: T,
    /// Far-field expansion of the reference points below this node.
    pub farfield: E::FarField,
    /// Local expansion accumulating pruned contributions for the query
    /// points below this node.
    pub local: E::Local,
}

impl<T: Float, E: ExpansionScheme<T>> NodeStat<T, E> {
    /// Create a fresh stat for one node.
    ///
    /// Both expansions are centered at `center` (the midpoint of the node's
    /// bounding box). The upper bound starts at the total reference mass
    /// `total_mass`, the trivial bound before any work has happened.
    pub fn new(scheme: &E, center: Vec<T>, total_mass: T) -> Self {
        Self {
            mass_l: T::zero(),
            more_l: T::zero(),
            owed_l: T::zero(),
            mass_e: T::zero(),
            mass_u: total_mass,
            more_u: T::zero(),
            owed_u: T::zero(),
            mass_t: T::zero(),
            farfield: scheme.new_farfield(center.clone()),
            local: scheme.new_local(center),
        }
    }
}

// ============================================================================
// Upward bound merging
// ============================================================================

/// Tighten a parent's bounds from its children and reclaim shared tokens.
///
/// The worst child lower bound is still a valid lower bound for every point
/// below the parent, and likewise for the upper bound, so the parent keeps
/// whichever is tighter. Tokens held by both children are moved up to the
/// parent exactly once, where they relax prune checks covering the whole
/// subtree instead of one half.
pub fn merge_child_bounds<T: Float, E: ExpansionScheme<T>>(
    stats: &mut [NodeStat<T, E>],
    parent: usize,
    left: usize,
    right: usize,
) {
    let (left_l, left_u, left_t) = {
        let s = &stats[left];
        (s.mass_l, s.mass_u, s.mass_t)
    };
    let (right_l, right_u, right_t) = {
        let s = &stats[right];
        (s.mass_l, s.mass_u, s.mass_t)
    };

    let tightened_l = left_l.min(right_l);
    let tightened_u = left_u.max(right_u);
    let reclaimed = left_t.min(right_t);

    {
        let p = &mut stats[parent];
        p.mass_l = p.mass_l.max(tightened_l);
        p.mass_u = p.mass_u.min(tightened_u);
        p.mass_t = p.mass_t + reclaimed;
        debug_assert!(
            p.mass_l.is_finite() && p.mass_u.is_finite(),
            "merged bounds must stay finite"
        );
    }
    stats[left].mass_t = stats[left].mass_t - reclaimed;
    stats[right].mass_t = stats[right].mass_t - reclaimed;
}
