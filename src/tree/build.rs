//! Midpoint-split tree construction.
//!
//! ## Purpose
//!
//! Builds the spatial partitioning tree the dual-tree traversal descends:
//! repeated midpoint splits on the widest dimension of each node's tight
//! bounding box, stopping at the leaf-size threshold. Construction permutes
//! the point matrix in place so every node owns a contiguous range, and
//! reports the permutation so callers can map results back to input order.
//!
//! ## Design notes
//!
//! * **Midpoint over median**: the split coordinate is the middle of the
//!   widest side, not the median point. Splits adapt to the data's spatial
//!   extent and both sides are guaranteed non-empty because tight bounds
//!   place at least one point on each side of the middle.
//! * **Degenerate ranges**: a node whose bounding box has zero width (all
//!   owned points identical) becomes a leaf regardless of count, so
//!   duplicate-heavy data cannot recurse unboundedly.
//!
//! ## Invariants
//!
//! * `old_from_new[i]` is the caller-order index of the point stored at
//!   permuted position `i`; it is a permutation of `0..n`.
//! * Node indices are in pre-order: a parent's index is smaller than both
//!   children's.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::bounds::HRect;
use crate::primitives::dataset::PointSet;
use crate::tree::node::TreeNode;

// ============================================================================
// SpatialTree
// ============================================================================

/// A partitioning tree over one point set, stored as a node arena.
#[derive(Debug, Clone)]
pub struct SpatialTree<T> {
    nodes: Vec<TreeNode<T>>,
}

impl<T: Float> SpatialTree<T> {
    /// Build a tree over `points`, permuting them in place.
    ///
    /// Returns the tree and the permutation (`old_from_new[i]` = original
    /// index of the point now at position `i`). The root is always node 0.
    pub fn build(points: &mut PointSet<T>, leaf_size: usize) -> (Self, Vec<usize>) {
        debug_assert!(leaf_size >= 1, "leaf_size must be at least 1");
        debug_assert!(!points.is_empty(), "cannot build a tree over no points");

        let n = points.n_points();
        let mut old_from_new: Vec<usize> = (0..n).collect();
        let mut nodes = Vec::new();
        build_node(points, &mut old_from_new, 0, n, leaf_size, &mut nodes);
        (Self { nodes }, old_from_new)
    }

    /// The arena index of the root node.
    #[inline]
    pub fn root(&self) -> usize {
        0
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true for a built tree).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at arena index `i`.
    #[inline]
    pub fn node(&self, i: usize) -> &TreeNode<T> {
        &self.nodes[i]
    }

    /// The whole arena as a slice.
    #[inline]
    pub fn nodes(&self) -> &[TreeNode<T>] {
        &self.nodes
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Recursively build the subtree over `[begin, begin + count)`.
///
/// Returns the arena index of the created node.
fn build_node<T: Float>(
    points: &mut PointSet<T>,
    old_from_new: &mut [usize],
    begin: usize,
    count: usize,
    leaf_size: usize,
    nodes: &mut Vec<TreeNode<T>>,
) -> usize {
    let bound = HRect::from_points(points, begin, begin + count);
    let index = nodes.len();
    nodes.push(TreeNode {
        bound,
        begin,
        count,
        children: None,
    });

    if count <= leaf_size || nodes[index].bound.widest_width() <= T::zero() {
        return index;
    }

    let split_dim = nodes[index].bound.widest_dimension();
    let split_val = nodes[index].bound.range(split_dim).mid();
    let mid = partition(points, old_from_new, begin, begin + count, split_dim, split_val);
    if mid == begin || mid == begin + count {
        // The midpoint of two adjacent floats can round onto an endpoint,
        // leaving one side empty. Keep such a node as an oversized leaf.
        return index;
    }

    let left = build_node(points, old_from_new, begin, mid - begin, leaf_size, nodes);
    let right = build_node(
        points,
        old_from_new,
        mid,
        begin + count - mid,
        leaf_size,
        nodes,
    );
    nodes[index].children = Some((left, right));
    index
}

/// Partition `[begin, end)` in place so coordinates below `split_val` on
/// `split_dim` come first. Returns the first index of the upper part.
fn partition<T: Float>(
    points: &mut PointSet<T>,
    old_from_new: &mut [usize],
    begin: usize,
    end: usize,
    split_dim: usize,
    split_val: T,
) -> usize {
    let mut i = begin;
    let mut j = end;
    loop {
        while i < j && points.coord(i, split_dim) < split_val {
            i += 1;
        }
        while i < j && points.coord(j - 1, split_dim) >= split_val {
            j -= 1;
        }
        if i >= j {
            return i;
        }
        points.swap_points(i, j - 1);
        old_from_new.swap(i, j - 1);
        i += 1;
        j -= 1;
    }
}
