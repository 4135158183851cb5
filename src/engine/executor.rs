//! Orchestration of a full density computation.
//!
//! ## Purpose
//!
//! This module runs one batch of queries end to end: it builds the weight
//! prefix table, initializes the per-node stat arena, seeds the per-point
//! output vectors, drives the dual-tree recursion from the two roots,
//! delivers pending node state to the points, and normalizes the result.
//!
//! ## Design notes
//!
//! * The executor borrows the fitted reference side (points, tree, weights)
//!   and owns only the prefix table derived from the weights, so one fit can
//!   serve many query batches.
//! * Every run builds a fresh stat arena. Runs are therefore independent:
//!   repeating the same batch yields identical output.
//! * Node weight sums come from the prefix table in O(1), which is what
//!   makes prune bookkeeping cheap for weighted reference sets.
//! * Self-evaluation (queries alias references) shares one arena entry per
//!   node between the two roles instead of duplicating the arena.
//!
//! ## Key concepts
//!
//! * **Stat arena**: reference-tree entries first, query-tree entries after,
//!   unless aliased.
//! * **Normalization**: raw kernel sums become densities by dividing by the
//!   kernel normalization constant times the total reference mass.
//!
//! ## Invariants
//!
//! * Output vectors are in tree (permuted) query order; the caller undoes
//!   the permutation.
//! * `lower[i]` and `upper[i]` bracket the exact density; `estimate[i]`
//!   deviates from it by at most the spent error allowance.
//!
//! ## Non-goals
//!
//! * This module does not validate inputs (handled by `validator`).
//! * This module does not build trees or permute results (caller's
//!   responsibility).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::engine::stats::NodeStat;
use crate::engine::telemetry::TraversalTelemetry;
use crate::engine::traversal::DualTreeContext;
use crate::expansion::ExpansionScheme;
use crate::math::distance::DistanceLinalg;
use crate::math::kernel::RadialKernel;
use crate::primitives::dataset::PointSet;
use crate::tree::build::SpatialTree;

// ============================================================================
// EngineOutput
// ============================================================================

/// Raw output of one run, in tree (permuted) query order.
#[derive(Debug, Clone)]
pub struct EngineOutput<T> {
    /// Normalized lower bound per query point, tree order.
    pub lower: Vec<T>,
    /// Normalized density estimate per query point, tree order.
    pub estimate: Vec<T>,
    /// Normalized upper bound per query point, tree order.
    pub upper: Vec<T>,
    /// Counters from the traversal.
    pub telemetry: TraversalTelemetry,
}

// ============================================================================
// DualTreeExecutor
// ============================================================================

/// Runs dual-tree density computations against one fitted reference side.
#[derive(Debug)]
pub struct DualTreeExecutor<'a, T: DistanceLinalg, K: RadialKernel<T>, E: ExpansionScheme<T>> {
    kernel: &'a K,
    scheme: &'a E,
    rset: &'a PointSet<T>,
    rtree: &'a SpatialTree<T>,
    rweights: &'a [T],
    weight_prefix: Vec<T>,
    total_mass: T,
    tau: T,
}

impl<'a, T, K, E> DualTreeExecutor<'a, T, K, E>
where
    T: DistanceLinalg,
    K: RadialKernel<T>,
    E: ExpansionScheme<T>,
{
    /// Prepare an executor for the given reference side and error budget.
    ///
    /// `rweights` must be in the same (tree) order as the points of `rset`,
    /// and `tau` is the relative error tolerance spent by prunes.
    pub fn new(
        kernel: &'a K,
        scheme: &'a E,
        rset: &'a PointSet<T>,
        rtree: &'a SpatialTree<T>,
        rweights: &'a [T],
        tau: T,
    ) -> Self {
        debug_assert_eq!(rset.n_points(), rweights.len());
        let mut weight_prefix = Vec::with_capacity(rweights.len() + 1);
        let mut running = T::zero();
        weight_prefix.push(running);
        for &w in rweights {
            running = running + w;
            weight_prefix.push(running);
        }
        Self {
            kernel,
            scheme,
            rset,
            rtree,
            rweights,
            weight_prefix,
            total_mass: running,
            tau,
        }
    }

    /// Total reference mass (sum of weights).
    pub fn total_mass(&self) -> T {
        self.total_mass
    }

    /// Compute densities for one query batch.
    ///
    /// Pass `aliased = true` when `qset`/`qtree` are the fitted reference
    /// side itself; the run then shares node state between the two roles.
    pub fn run(
        &self,
        qset: &PointSet<T>,
        qtree: &SpatialTree<T>,
        aliased: bool,
    ) -> EngineOutput<T> {
        let n_queries = qset.n_points();
        let mut stats = self.pre_process(qtree, aliased);
        let query_offset = if aliased { 0 } else { self.rtree.len() };

        let mut lower = vec![T::zero(); n_queries];
        let mut estimate = vec![T::zero(); n_queries];
        let mut upper = vec![self.total_mass; n_queries];
        let mut telemetry = TraversalTelemetry::default();

        {
            let mut ctx = DualTreeContext {
                kernel: self.kernel,
                scheme: self.scheme,
                qset,
                rset: self.rset,
                rweights: self.rweights,
                weight_prefix: &self.weight_prefix,
                qnodes: qtree.nodes(),
                rnodes: self.rtree.nodes(),
                stats: &mut stats,
                query_offset,
                lower: &mut lower,
                estimate: &mut estimate,
                upper: &mut upper,
                tau: self.tau,
                total_mass: self.total_mass,
                telemetry: &mut telemetry,
            };
            ctx.recurse(qtree.root(), self.rtree.root());
            ctx.post_process(qtree.root());
        }

        self.normalize(qset.dimensions(), &mut lower, &mut estimate, &mut upper);
        EngineOutput {
            lower,
            estimate,
            upper,
            telemetry,
        }
    }

    /// Build a fresh stat arena with every accumulator at its starting
    /// value and both expansions centered at the node box midpoints.
    fn pre_process(&self, qtree: &SpatialTree<T>, aliased: bool) -> Vec<NodeStat<T, E>> {
        let arena_len = if aliased {
            self.rtree.len()
        } else {
            self.rtree.len() + qtree.len()
        };
        let mut stats = Vec::with_capacity(arena_len);
        for node in self.rtree.nodes() {
            stats.push(NodeStat::new(
                self.scheme,
                node.bound.midpoint(),
                self.total_mass,
            ));
        }
        if !aliased {
            for node in qtree.nodes() {
                stats.push(NodeStat::new(
                    self.scheme,
                    node.bound.midpoint(),
                    self.total_mass,
                ));
            }
        }
        stats
    }

    /// Turn raw kernel sums into densities.
    fn normalize(&self, dimensions: usize, lower: &mut [T], estimate: &mut [T], upper: &mut [T]) {
        let norm = self.kernel.norm_constant(dimensions) * self.total_mass;
        let inv = T::one() / norm;
        for v in lower.iter_mut() {
            *v = *v * inv;
        }
        for v in estimate.iter_mut() {
            *v = *v * inv;
        }
        for v in upper.iter_mut() {
            *v = *v * inv;
        }
    }
}
