//! Layer 4: Expansion
//!
//! # Purpose
//!
//! This layer provides the series-expansion machinery the traversal uses to
//! summarize whole node pairs without touching individual points:
//! - A scheme trait the engine consumes expansions through
//! - The Gaussian (Hermite far-field / Taylor local) implementation
//! - A null scheme for kernels without series support
//!
//! The engine only ever asks three questions: "what order makes this
//! translation cheap enough and accurate enough?", "apply it", and
//! "evaluate what has accumulated". Everything else is internal.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Engine
//!   ↓
//! Layer 5: Evaluation
//!   ↓
//! Layer 4: Expansion ← You are here
//!   ↓
//! Layer 3: Tree
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;
use num_traits::Float;

// Internal dependencies
use crate::math::bounds::{DRange, HRect};
use crate::primitives::dataset::PointSet;

/// Hermite recurrences, Cramér tail sums, and multi-index helpers.
pub mod hermite;

/// The Gaussian far-field/local expansion scheme.
pub mod gaussian;

// ============================================================================
// Order selection result
// ============================================================================

/// A chosen truncation order together with a sound bound on the error a
/// single kernel evaluation incurs at that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderChoice<T> {
    /// Truncation order (per dimension).
    pub order: usize,
    /// Upper bound on the absolute per-kernel-evaluation error.
    pub error: T,
}

// ============================================================================
// ExpansionScheme Trait
// ============================================================================

/// A family of far-field and local expansions for one kernel.
///
/// The scheme object owns the shared configuration (bandwidth, dimensions,
/// maximum order); the per-node expansion objects are plain coefficient
/// holders. Every order query either returns an order whose error bound
/// fits the allowance, or declines, in which case the traversal falls back
/// to finite-difference pruning or recursion.
pub trait ExpansionScheme<T: Float> {
    /// Per-node far-field coefficient storage (reference side).
    type FarField: Clone + Debug + Default;
    /// Per-node local coefficient storage (query side).
    type Local: Clone + Debug + Default;

    /// Create an empty far-field expansion centered at `center`.
    fn new_farfield(&self, center: Vec<T>) -> Self::FarField;

    /// Create an empty local expansion centered at `center`.
    fn new_local(&self, center: Vec<T>) -> Self::Local;

    /// Bring the far-field coefficients up to `order` from the owned point
    /// range `[begin, end)`. A no-op when the stored order already covers
    /// the request.
    fn refine_farfield(
        &self,
        farfield: &mut Self::FarField,
        points: &PointSet<T>,
        weights: &[T],
        begin: usize,
        end: usize,
        order: usize,
    );

    /// Translate a far-field expansion into a local expansion (additive).
    fn translate_to_local(&self, farfield: &Self::FarField, local: &mut Self::Local);

    /// Evaluate the far-field expansion at a point.
    fn eval_farfield(&self, farfield: &Self::FarField, point: &[T]) -> T;

    /// Accumulate the point range `[begin, end)` directly into a local
    /// expansion at `order` (additive).
    fn accumulate_local(
        &self,
        local: &mut Self::Local,
        points: &PointSet<T>,
        weights: &[T],
        begin: usize,
        end: usize,
        order: usize,
    );

    /// Re-center a parent's local expansion into a child's (additive,
    /// exact).
    fn translate_local(&self, parent: &Self::Local, child: &mut Self::Local);

    /// Evaluate the local expansion at a point.
    fn eval_local(&self, local: &Self::Local, point: &[T]) -> T;

    /// Cheapest order at which far-field-to-local translation meets
    /// `allowed_err` per kernel evaluation, if any.
    fn order_for_converting_to_local(
        &self,
        ref_bound: &HRect<T>,
        query_bound: &HRect<T>,
        dsq: &DRange<T>,
        allowed_err: T,
    ) -> Option<OrderChoice<T>>;

    /// Cheapest order at which direct far-field evaluation meets
    /// `allowed_err` per kernel evaluation, if any.
    fn order_for_far_eval(
        &self,
        ref_bound: &HRect<T>,
        query_bound: &HRect<T>,
        dsq: &DRange<T>,
        allowed_err: T,
    ) -> Option<OrderChoice<T>>;

    /// Cheapest order at which direct local accumulation meets
    /// `allowed_err` per kernel evaluation, if any.
    fn order_for_local_accum(
        &self,
        ref_bound: &HRect<T>,
        query_bound: &HRect<T>,
        dsq: &DRange<T>,
        allowed_err: T,
    ) -> Option<OrderChoice<T>>;
}

// ============================================================================
// NullScheme
// ============================================================================

/// The expansion scheme for kernels without series support.
///
/// Every order query declines, so node pairs are handled by the
/// finite-difference prune or recursion alone. Coefficient operations are
/// inert and evaluation contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScheme;

/// Zero-sized coefficient holder for [`NullScheme`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExpansion;

impl<T: Float> ExpansionScheme<T> for NullScheme {
    type FarField = NullExpansion;
    type Local = NullExpansion;

    #[inline]
    fn new_farfield(&self, _center: Vec<T>) -> NullExpansion {
        NullExpansion
    }

    #[inline]
    fn new_local(&self, _center: Vec<T>) -> NullExpansion {
        NullExpansion
    }

    #[inline]
    fn refine_farfield(
        &self,
        _farfield: &mut NullExpansion,
        _points: &PointSet<T>,
        _weights: &[T],
        _begin: usize,
        _end: usize,
        _order: usize,
    ) {
    }

    #[inline]
    fn translate_to_local(&self, _farfield: &NullExpansion, _local: &mut NullExpansion) {}

    #[inline]
    fn eval_farfield(&self, _farfield: &NullExpansion, _point: &[T]) -> T {
        T::zero()
    }

    #[inline]
    fn accumulate_local(
        &self,
        _local: &mut NullExpansion,
        _points: &PointSet<T>,
        _weights: &[T],
        _begin: usize,
        _end: usize,
        _order: usize,
    ) {
    }

    #[inline]
    fn translate_local(&self, _parent: &NullExpansion, _child: &mut NullExpansion) {}

    #[inline]
    fn eval_local(&self, _local: &NullExpansion, _point: &[T]) -> T {
        T::zero()
    }

    #[inline]
    fn order_for_converting_to_local(
        &self,
        _ref_bound: &HRect<T>,
        _query_bound: &HRect<T>,
        _dsq: &DRange<T>,
        _allowed_err: T,
    ) -> Option<OrderChoice<T>> {
        None
    }

    #[inline]
    fn order_for_far_eval(
        &self,
        _ref_bound: &HRect<T>,
        _query_bound: &HRect<T>,
        _dsq: &DRange<T>,
        _allowed_err: T,
    ) -> Option<OrderChoice<T>> {
        None
    }

    #[inline]
    fn order_for_local_accum(
        &self,
        _ref_bound: &HRect<T>,
        _query_bound: &HRect<T>,
        _dsq: &DRange<T>,
        _allowed_err: T,
    ) -> Option<OrderChoice<T>> {
        None
    }
}
