//! Interval and bounding-box geometry.
//!
//! ## Purpose
//!
//! This module provides the two geometric primitives the dual-tree engine
//! reasons with: closed numeric intervals (`DRange`) and axis-aligned
//! bounding boxes (`HRect`). Every prune decision starts from the squared
//! distance interval between two boxes, and every expansion is centered at a
//! box midpoint.
//!
//! ## Key concepts
//!
//! * **Squared-distance interval**: for two boxes, the tightest `[lo, hi]`
//!   containing the squared Euclidean distance of any point pair drawn from
//!   them. Monotone kernels turn this into a kernel value range by
//!   evaluating the endpoints.
//! * **Per-dimension gap**: the 1-D distance from a coordinate to an
//!   interval, used by expansion order selection.
//!
//! ## Invariants
//!
//! * `min_distance_sq <= max_distance_sq` for every box pair.
//! * A box built from a point range contains every point in the range.
//!
//! ## Non-goals
//!
//! * No kernel logic here; see `math::kernel`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::dataset::PointSet;

// ============================================================================
// DRange
// ============================================================================

/// A closed numeric interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DRange<T> {
    /// Lower endpoint.
    pub lo: T,
    /// Upper endpoint.
    pub hi: T,
}

impl<T: Float> DRange<T> {
    /// Create an interval from its endpoints.
    #[inline]
    pub fn new(lo: T, hi: T) -> Self {
        Self { lo, hi }
    }

    /// The empty starting interval `[+inf, -inf]` for running min/max.
    #[inline]
    pub fn reversed_infinite() -> Self {
        Self {
            lo: T::infinity(),
            hi: T::neg_infinity(),
        }
    }

    /// Interval width `hi - lo`.
    #[inline]
    pub fn width(&self) -> T {
        self.hi - self.lo
    }

    /// Interval midpoint.
    #[inline]
    pub fn mid(&self) -> T {
        (self.lo + self.hi) / (T::one() + T::one())
    }

    /// Whether `v` lies inside the interval.
    #[inline]
    pub fn contains(&self, v: T) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// Grow the interval to contain `v`.
    #[inline]
    pub fn extend(&mut self, v: T) {
        if v < self.lo {
            self.lo = v;
        }
        if v > self.hi {
            self.hi = v;
        }
    }

    /// Distance from `v` to the interval (zero when `v` is inside).
    #[inline]
    pub fn gap(&self, v: T) -> T {
        (self.lo - v).max(v - self.hi).max(T::zero())
    }
}

// ============================================================================
// HRect
// ============================================================================

/// An axis-aligned bounding box: one interval per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct HRect<T> {
    ranges: Vec<DRange<T>>,
}

impl<T: Float> HRect<T> {
    /// The tight bounding box of a contiguous point range `[begin, end)`.
    pub fn from_points(points: &PointSet<T>, begin: usize, end: usize) -> Self {
        debug_assert!(begin < end, "bounding an empty point range");
        let dimensions = points.dimensions();
        let mut ranges = vec![DRange::reversed_infinite(); dimensions];
        for i in begin..end {
            let p = points.point(i);
            for d in 0..dimensions {
                ranges[d].extend(p[d]);
            }
        }
        Self { ranges }
    }

    /// Dimensionality of the box.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.ranges.len()
    }

    /// The interval covered in dimension `d`.
    #[inline]
    pub fn range(&self, d: usize) -> &DRange<T> {
        &self.ranges[d]
    }

    /// Whether the box contains `point`.
    pub fn contains(&self, point: &[T]) -> bool {
        self.ranges
            .iter()
            .zip(point.iter())
            .all(|(r, &v)| r.contains(v))
    }

    /// Minimum squared Euclidean distance between any two points of the
    /// boxes. Zero when the boxes overlap.
    pub fn min_distance_sq(&self, other: &Self) -> T {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        let mut sum = T::zero();
        for (a, b) in self.ranges.iter().zip(other.ranges.iter()) {
            let gap = (b.lo - a.hi).max(a.lo - b.hi).max(T::zero());
            sum = sum + gap * gap;
        }
        sum
    }

    /// Maximum squared Euclidean distance between any two points of the
    /// boxes (attained at a corner pair).
    pub fn max_distance_sq(&self, other: &Self) -> T {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        let mut sum = T::zero();
        for (a, b) in self.ranges.iter().zip(other.ranges.iter()) {
            let spread = (a.hi - b.lo).max(b.hi - a.lo);
            sum = sum + spread * spread;
        }
        sum
    }

    /// The squared-distance interval `[min, max]` for the box pair.
    #[inline]
    pub fn distance_sq_range(&self, other: &Self) -> DRange<T> {
        DRange::new(self.min_distance_sq(other), self.max_distance_sq(other))
    }

    /// Box center, used as the expansion center of the owning node.
    pub fn midpoint(&self) -> Vec<T> {
        self.ranges.iter().map(|r| r.mid()).collect()
    }

    /// Width of the widest dimension.
    pub fn widest_width(&self) -> T {
        self.ranges
            .iter()
            .map(|r| r.width())
            .fold(T::zero(), T::max)
    }

    /// Index of the widest dimension.
    pub fn widest_dimension(&self) -> usize {
        let mut best = 0;
        let mut best_width = T::neg_infinity();
        for (d, r) in self.ranges.iter().enumerate() {
            let w = r.width();
            if w > best_width {
                best_width = w;
                best = d;
            }
        }
        best
    }
}
