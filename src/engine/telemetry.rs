//! Traversal counters for diagnostics and tuning.
//!
//! ## Purpose
//!
//! This module collects cheap counters during a dual-tree run: how many node
//! pairs were visited, how often each prune mechanism fired, and how many
//! exact distance evaluations the base cases performed. The counters explain
//! where a run spent its budget and make pruning behavior observable in
//! tests without exposing internal node state.
//!
//! ## Design notes
//!
//! * Counters only; no timing, no allocation beyond the struct itself.
//! * `add_from` folds one run's counters into another, for callers that
//!   aggregate over several query batches.
//!
//! ## Non-goals
//!
//! * This module does not log or print anything on its own.

// Internal dependencies
use crate::engine::prune::SeriesKind;

// ============================================================================
// TraversalTelemetry
// ============================================================================

/// Counters recorded during one dual-tree density computation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TraversalTelemetry {
    /// Node pairs considered by the traversal.
    pub pairs_visited: usize,
    /// Pairs settled by a finite-difference prune.
    pub finite_difference_prunes: usize,
    /// Pairs settled by far-field-to-local conversion.
    pub far_to_local_prunes: usize,
    /// Pairs settled by direct far-field evaluation.
    pub far_field_prunes: usize,
    /// Pairs settled by direct local accumulation.
    pub local_accumulation_prunes: usize,
    /// Leaf-leaf pairs evaluated exhaustively.
    pub base_cases: usize,
    /// Exact point-point kernel evaluations performed in base cases.
    pub distance_evals: usize,
}

impl TraversalTelemetry {
    /// Record one series prune of the given kind.
    pub fn record_series(&mut self, kind: SeriesKind) {
        match kind {
            SeriesKind::FarFieldToLocal => self.far_to_local_prunes += 1,
            SeriesKind::FarFieldEvaluation => self.far_field_prunes += 1,
            SeriesKind::LocalAccumulation => self.local_accumulation_prunes += 1,
        }
    }

    /// Total pairs settled without recursion, across all mechanisms.
    pub fn total_prunes(&self) -> usize {
        self.finite_difference_prunes
            + self.far_to_local_prunes
            + self.far_field_prunes
            + self.local_accumulation_prunes
    }

    /// Fold another run's counters into this one.
    pub fn add_from(&mut self, other: &TraversalTelemetry) {
        self.pairs_visited += other.pairs_visited;
        self.finite_difference_prunes += other.finite_difference_prunes;
        self.far_to_local_prunes += other.far_to_local_prunes;
        self.far_field_prunes += other.far_field_prunes;
        self.local_accumulation_prunes += other.local_accumulation_prunes;
        self.base_cases += other.base_cases;
        self.distance_evals += other.distance_evals;
    }
}
