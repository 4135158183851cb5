//! Flattened point matrices.
//!
//! ## Purpose
//!
//! This module provides the owned point-matrix type shared by the tree
//! builder, the traversal, and the expansions. Points are stored flattened
//! in row-major order (`n_points * dimensions` scalars), matching the slice
//! convention used throughout the crate.
//!
//! ## Design notes
//!
//! * **Ownership**: The matrix is owned because tree construction permutes
//!   points in place; callers keep their input buffers untouched.
//! * **Stride access**: `point(i)` returns a `&[T]` slice of length
//!   `dimensions`, so distance and expansion code never indexes raw offsets.
//!
//! ## Invariants
//!
//! * `data.len() == n_points() * dimensions()` at all times.
//! * `swap_points` preserves the multiset of points.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// ============================================================================
// PointSet
// ============================================================================

/// An owned set of d-dimensional points stored as one flattened buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet<T> {
    data: Vec<T>,
    dimensions: usize,
}

impl<T: Copy> PointSet<T> {
    /// Build a point set from a flattened row-major buffer.
    ///
    /// The buffer length must be a multiple of `dimensions`; callers are
    /// expected to have validated this already.
    pub fn from_flat(data: Vec<T>, dimensions: usize) -> Self {
        debug_assert!(dimensions > 0, "dimensions must be at least 1");
        debug_assert_eq!(
            data.len() % dimensions,
            0,
            "Points buffer length must be divisible by dimensions"
        );
        Self { data, dimensions }
    }

    /// Number of points.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.data.len() / self.dimensions
    }

    /// Dimensionality of each point.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Whether the set holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The `i`-th point as a coordinate slice.
    #[inline]
    pub fn point(&self, i: usize) -> &[T] {
        let offset = i * self.dimensions;
        &self.data[offset..offset + self.dimensions]
    }

    /// A single coordinate of the `i`-th point.
    #[inline]
    pub fn coord(&self, i: usize, d: usize) -> T {
        self.data[i * self.dimensions + d]
    }

    /// The whole flattened buffer.
    #[inline]
    pub fn as_flat(&self) -> &[T] {
        &self.data
    }

    /// Swap two points in place (used by tree construction).
    #[inline]
    pub fn swap_points(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (a, b) = (i * self.dimensions, j * self.dimensions);
        for d in 0..self.dimensions {
            self.data.swap(a + d, b + d);
        }
    }
}
