//! Layer 3: Tree
//!
//! # Purpose
//!
//! This layer provides the spatial partitioning tree both point sets are
//! indexed by:
//! - Arena-allocated nodes with tight bounds and contiguous point ranges
//! - Midpoint-split construction with in-place permutation
//!
//! The traversal engine treats trees as read-only once built; all mutable
//! per-node state lives in the engine's statistics arena, keyed by the same
//! indices.
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
//! Layer 4: Expansion
//!   ↓
//! Layer 3: Tree ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Arena node type.
pub mod node;

/// Midpoint-split construction.
pub mod build;
