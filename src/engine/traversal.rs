//! Dual-tree recursion over query and reference nodes.
//!
//! ## Purpose
//!
//! This module walks pairs of tree nodes, settling each pair as cheaply as
//! the error budget permits. Distant pairs are finished by a
//! finite-difference or series prune; close pairs recurse; leaf-leaf pairs
//! fall back to exhaustive kernel sums. The walk maintains, for every query
//! node, running lower/upper bounds on the kernel sum of its points, which
//! is what later prune checks spend.
//!
//! ## Design notes
//!
//! * Nodes are arena indices; the stat arena covers the reference tree
//!   first, then the query tree. Self-evaluation passes an offset of zero so
//!   both roles index the same entries.
//! * Bound corrections for a whole subtree are recorded at its root as
//!   `owed` values and applied lazily on the next visit, so a prune costs
//!   O(1) regardless of subtree size.
//! * Error tokens flow down before recursing into query children and are
//!   reclaimed upward by `merge_child_bounds`, letting budget unused in one
//!   subtree pay for pruning in another.
//! * Children are visited nearest-first so bounds tighten early and later
//!   pairs prune more often.
//!
//! ## Key concepts
//!
//! * **Pair settlement**: every (query node, reference node) pair is settled
//!   exactly once, by prune, by recursion into children, or exhaustively.
//! * **Postponed corrections**: `owed_l`/`owed_u` carried downward lazily.
//! * **Base case**: exact kernel sums over two leaves, followed by a bound
//!   rebuild from the per-point values.
//!
//! ## Invariants
//!
//! * For every query point, lower ≤ true unnormalized kernel sum ≤ upper at
//!   every step, with pending owed/more corrections folded in where they
//!   apply.
//! * Owed corrections are zeroed when applied.
//! * Each prune adds the reference node's kernel-range mass exactly once to
//!   the affected query subtree.
//!
//! ## Non-goals
//!
//! * This module does not choose prune admissibility thresholds (see
//!   `engine::prune`).
//! * This module does not normalize densities (see `engine::executor`).

// External dependencies
use core::mem;

// Internal dependencies
use crate::engine::prune::{self, PruneOp, SeriesKind};
use crate::engine::stats::{merge_child_bounds, NodeStat};
use crate::engine::telemetry::TraversalTelemetry;
use crate::expansion::ExpansionScheme;
use crate::math::bounds::HRect;
use crate::math::distance::DistanceLinalg;
use crate::math::kernel::RadialKernel;
use crate::primitives::dataset::PointSet;
use crate::tree::node::TreeNode;

// ============================================================================
// Traversal context
// ============================================================================

/// Borrowed state for one dual-tree walk.
///
/// Built by the executor for a single run and discarded afterwards. When
/// queries alias references, `qnodes` and `rnodes` are the same slice and
/// `query_offset` is zero, so both roles share stat entries.
pub struct DualTreeContext<'a, T: DistanceLinalg, K: RadialKernel<T>, E: ExpansionScheme<T>> {
    pub(crate) kernel: &'a K,
    pub(crate) scheme: &'a E,
    pub(crate) qset: &'a PointSet<T>,
    pub(crate) rset: &'a PointSet<T>,
    pub(crate) rweights: &'a [T],
    pub(crate) weight_prefix: &'a [T],
    pub(crate) qnodes: &'a [TreeNode<T>],
    pub(crate) rnodes: &'a [TreeNode<T>],
    pub(crate) stats: &'a mut [NodeStat<T, E>],
    pub(crate) query_offset: usize,
    pub(crate) lower: &'a mut [T],
    pub(crate) estimate: &'a mut [T],
    pub(crate) upper: &'a mut [T],
    pub(crate) tau: T,
    pub(crate) total_mass: T,
    pub(crate) telemetry: &'a mut TraversalTelemetry,
}

impl<'a, T, K, E> DualTreeContext<'a, T, K, E>
where
    T: DistanceLinalg,
    K: RadialKernel<T>,
    E: ExpansionScheme<T>,
{
    /// Weight sum of the reference node's owned point range.
    #[inline]
    fn node_mass(&self, rnode: &TreeNode<T>) -> T {
        self.weight_prefix[rnode.end()] - self.weight_prefix[rnode.begin]
    }

    /// Settle the pair (`q`, `r`) and everything below it.
    pub(crate) fn recurse(&mut self, q: usize, r: usize) {
        self.telemetry.pairs_visited += 1;
        let qi = self.query_offset + q;

        // Fold in corrections posted by ancestor prunes, then clear them.
        let (owed_l, owed_u) = {
            let qs = &mut self.stats[qi];
            (
                mem::replace(&mut qs.owed_l, T::zero()),
                mem::replace(&mut qs.owed_u, T::zero()),
            )
        };
        if owed_l != T::zero() || owed_u != T::zero() {
            self.propagate_bound_deltas(q, owed_l, owed_u);
        }

        // A non-leaf query node can inherit whatever tightening its
        // children accumulated on earlier visits.
        if let Some((ql, qr)) = self.qnodes[q].children {
            merge_child_bounds(
                self.stats,
                qi,
                self.query_offset + ql,
                self.query_offset + qr,
            );
        }

        let dsq = self.qnodes[q].bound.distance_sq_range(&self.rnodes[r].bound);
        let kernel_range = self.kernel.range_unnorm_on_sq(&dsq);
        let node_mass = self.node_mass(&self.rnodes[r]);
        let (mass_l, mass_t) = {
            let qs = &self.stats[qi];
            (qs.mass_l, qs.mass_t)
        };

        if let Some(op) = prune::try_finite_difference(
            &kernel_range,
            node_mass,
            self.total_mass,
            mass_l,
            mass_t,
            self.tau,
        ) {
            self.update_bounds(q, r, op);
            return;
        }

        if let Some(op) = prune::try_series(
            self.scheme,
            &self.rnodes[r].bound,
            &self.qnodes[q].bound,
            &dsq,
            &kernel_range,
            node_mass,
            self.total_mass,
            mass_l,
            mass_t,
            self.tau,
            self.qnodes[q].count,
            self.rnodes[r].count,
        ) {
            self.update_bounds(q, r, op);
            return;
        }

        match (self.qnodes[q].children, self.rnodes[r].children) {
            (None, None) => self.base_case(q, r),
            (None, Some((rl, rr))) => {
                let (first, second) =
                    nearest_first(&self.qnodes[q].bound, self.rnodes, rl, rr);
                self.recurse(q, first);
                self.recurse(q, second);
            }
            (Some((ql, qr)), None) => {
                self.push_down_tokens(q, ql, qr);
                let (first, second) =
                    nearest_first(&self.rnodes[r].bound, self.qnodes, ql, qr);
                self.recurse(first, r);
                self.recurse(second, r);
            }
            (Some((ql, qr)), Some((rl, rr))) => {
                self.push_down_tokens(q, ql, qr);
                for qc in [ql, qr] {
                    let (first, second) =
                        nearest_first(&self.qnodes[qc].bound, self.rnodes, rl, rr);
                    self.recurse(qc, first);
                    self.recurse(qc, second);
                }
            }
        }
    }

    /// Apply a prune to the query node: record the estimate or series
    /// contribution, bank the token refund, and propagate the bound deltas
    /// into the subtree.
    fn update_bounds(&mut self, q: usize, r: usize, op: PruneOp<T>) {
        let qi = self.query_offset + q;
        match op {
            PruneOp::FiniteDifference { dl, de, du, dt } => {
                self.telemetry.finite_difference_prunes += 1;
                {
                    let qs = &mut self.stats[qi];
                    qs.mass_e = qs.mass_e + de;
                    qs.mass_t = qs.mass_t + dt;
                }
                self.propagate_bound_deltas(q, dl, du);
            }
            PruneOp::Series {
                kind,
                order,
                dl,
                du,
                dt,
            } => {
                self.telemetry.record_series(kind);
                {
                    let qs = &mut self.stats[qi];
                    qs.mass_t = qs.mass_t + dt;
                }
                let (rbegin, rend) = {
                    let rn = &self.rnodes[r];
                    (rn.begin, rn.end())
                };
                match kind {
                    SeriesKind::FarFieldToLocal => {
                        self.scheme.refine_farfield(
                            &mut self.stats[r].farfield,
                            self.rset,
                            self.rweights,
                            rbegin,
                            rend,
                            order,
                        );
                        // Move the local out so the translation can read the
                        // far field even when both roles share this entry.
                        let mut local = mem::take(&mut self.stats[qi].local);
                        self.scheme
                            .translate_to_local(&self.stats[r].farfield, &mut local);
                        self.stats[qi].local = local;
                    }
                    SeriesKind::FarFieldEvaluation => {
                        self.scheme.refine_farfield(
                            &mut self.stats[r].farfield,
                            self.rset,
                            self.rweights,
                            rbegin,
                            rend,
                            order,
                        );
                        let (qbegin, qend) = {
                            let qn = &self.qnodes[q];
                            (qn.begin, qn.end())
                        };
                        for point in qbegin..qend {
                            let v = self
                                .scheme
                                .eval_farfield(&self.stats[r].farfield, self.qset.point(point));
                            self.estimate[point] = self.estimate[point] + v;
                        }
                    }
                    SeriesKind::LocalAccumulation => {
                        let mut local = mem::take(&mut self.stats[qi].local);
                        self.scheme.accumulate_local(
                            &mut local,
                            self.rset,
                            self.rweights,
                            rbegin,
                            rend,
                            order,
                        );
                        self.stats[qi].local = local;
                    }
                }
                self.propagate_bound_deltas(q, dl, du);
            }
        }
    }

    /// Adjust the query node's bounds and hand the same deltas to its
    /// points (via `more` at a leaf) or its children (via `owed`).
    fn propagate_bound_deltas(&mut self, q: usize, dl: T, du: T) {
        let children = self.qnodes[q].children;
        let qi = self.query_offset + q;
        {
            let qs = &mut self.stats[qi];
            qs.mass_l = qs.mass_l + dl;
            qs.mass_u = qs.mass_u + du;
            debug_assert!(
                qs.mass_l.is_finite() && qs.mass_u.is_finite(),
                "running bounds must stay finite"
            );
        }
        match children {
            None => {
                let qs = &mut self.stats[qi];
                qs.more_l = qs.more_l + dl;
                qs.more_u = qs.more_u + du;
            }
            Some((left, right)) => {
                for child in [left, right] {
                    let cs = &mut self.stats[self.query_offset + child];
                    cs.owed_l = cs.owed_l + dl;
                    cs.owed_u = cs.owed_u + du;
                }
            }
        }
    }

    /// Hand the query node's banked tokens to both children before
    /// recursing below it. Each child may spend the full amount; double
    /// counting is impossible because the two children settle disjoint
    /// query points.
    fn push_down_tokens(&mut self, q: usize, left: usize, right: usize) {
        let dt = mem::replace(
            &mut self.stats[self.query_offset + q].mass_t,
            T::zero(),
        );
        if dt != T::zero() {
            for child in [left, right] {
                let cs = &mut self.stats[self.query_offset + child];
                cs.mass_t = cs.mass_t + dt;
            }
        }
    }

    /// Exhaustive leaf-leaf evaluation, then rebuild the leaf's bounds from
    /// its per-point values.
    fn base_case(&mut self, q: usize, r: usize) {
        self.telemetry.base_cases += 1;
        let (qbegin, qend) = {
            let qn = &self.qnodes[q];
            (qn.begin, qn.end())
        };
        let (rbegin, rend) = {
            let rn = &self.rnodes[r];
            (rn.begin, rn.end())
        };

        for point in qbegin..qend {
            let qp = self.qset.point(point);
            let mut sum = T::zero();
            for rp in rbegin..rend {
                let dsq = T::squared_euclidean(qp, self.rset.point(rp));
                sum = sum + self.kernel.eval_unnorm_on_sq(dsq) * self.rweights[rp];
            }
            self.lower[point] = self.lower[point] + sum;
            self.estimate[point] = self.estimate[point] + sum;
            self.upper[point] = self.upper[point] + sum;
        }
        self.telemetry.distance_evals += (qend - qbegin) * (rend - rbegin);

        // The reference mass is now exact for these points: bank it as
        // tokens and retire the matching slice of the a-priori upper bound.
        let node_mass = self.node_mass(&self.rnodes[r]);
        let mut min_l = T::infinity();
        let mut max_u = T::neg_infinity();
        for point in qbegin..qend {
            min_l = min_l.min(self.lower[point]);
            max_u = max_u.max(self.upper[point]);
        }
        let qs = &mut self.stats[self.query_offset + q];
        qs.mass_t = qs.mass_t + node_mass;
        qs.more_u = qs.more_u - node_mass;
        qs.mass_l = min_l + qs.more_l;
        qs.mass_u = max_u + qs.more_u;
    }

    /// Deliver everything still pending at the nodes to the per-point
    /// output vectors: estimates from local expansions and `mass_e`, bound
    /// corrections from `owed` and `more`.
    pub(crate) fn post_process(&mut self, q: usize) {
        let qi = self.query_offset + q;
        match self.qnodes[q].children {
            Some((left, right)) => {
                let (owed_l, owed_u, mass_e) = {
                    let qs = &mut self.stats[qi];
                    (
                        mem::replace(&mut qs.owed_l, T::zero()),
                        mem::replace(&mut qs.owed_u, T::zero()),
                        mem::replace(&mut qs.mass_e, T::zero()),
                    )
                };
                let parent_local = mem::take(&mut self.stats[qi].local);
                for child in [left, right] {
                    let ci = self.query_offset + child;
                    {
                        let cs = &mut self.stats[ci];
                        cs.owed_l = cs.owed_l + owed_l;
                        cs.owed_u = cs.owed_u + owed_u;
                        cs.mass_e = cs.mass_e + mass_e;
                    }
                    let mut child_local = mem::take(&mut self.stats[ci].local);
                    self.scheme.translate_local(&parent_local, &mut child_local);
                    self.stats[ci].local = child_local;
                }
                self.post_process(left);
                self.post_process(right);
            }
            None => {
                let (more_l, more_u, mass_e) = {
                    let qs = &mut self.stats[qi];
                    qs.more_l = qs.more_l + mem::replace(&mut qs.owed_l, T::zero());
                    qs.more_u = qs.more_u + mem::replace(&mut qs.owed_u, T::zero());
                    (qs.more_l, qs.more_u, qs.mass_e)
                };
                let (qbegin, qend) = {
                    let qn = &self.qnodes[q];
                    (qn.begin, qn.end())
                };
                for point in qbegin..qend {
                    let v = self
                        .scheme
                        .eval_local(&self.stats[qi].local, self.qset.point(point));
                    self.estimate[point] = self.estimate[point] + v + mass_e;
                    self.lower[point] = self.lower[point] + more_l;
                    self.upper[point] = self.upper[point] + more_u;
                }
            }
        }
    }
}

// ============================================================================
// Child ordering
// ============================================================================

/// Order two sibling nodes by box distance from `pivot`, closest first.
fn nearest_first<T: DistanceLinalg>(
    pivot: &HRect<T>,
    nodes: &[TreeNode<T>],
    a: usize,
    b: usize,
) -> (usize, usize) {
    if pivot.min_distance_sq(&nodes[a].bound) <= pivot.min_distance_sq(&nodes[b].bound) {
        (a, b)
    } else {
        (b, a)
    }
}
