//! Arena nodes for the spatial partitioning tree.
//!
//! ## Purpose
//!
//! Nodes live in a flat arena (`Vec<TreeNode<T>>`) and refer to each other
//! by index. Each node owns a contiguous range `[begin, begin + count)` of
//! the permuted point matrix together with the tight bounding box of those
//! points.
//!
//! ## Invariants
//!
//! * Children partition the parent's range exactly.
//! * A child's bound is contained in its parent's bound (both are tight
//!   boxes over their own points).
//! * Leaves have `children == None`; internal nodes always have two.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::bounds::HRect;

// ============================================================================
// TreeNode
// ============================================================================

/// One node of the partitioning tree.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Tight bounding box of the owned points.
    pub bound: HRect<T>,
    /// First owned point index (into the permuted matrix).
    pub begin: usize,
    /// Number of owned points.
    pub count: usize,
    /// Arena indices of the two children, or `None` for a leaf.
    pub children: Option<(usize, usize)>,
}

impl<T: Float> TreeNode<T> {
    /// One past the last owned point index.
    #[inline]
    pub fn end(&self) -> usize {
        self.begin + self.count
    }

    /// Whether this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
