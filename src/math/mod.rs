//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical building blocks used throughout the
//! engine:
//! - Interval and bounding-box geometry
//! - Squared Euclidean distance (SIMD-bridged)
//! - Radial kernel functions and normalization constants
//!
//! Nothing here knows about trees, expansions, or the traversal.
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
//! Layer 3: Tree
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Interval (`DRange`) and bounding-box (`HRect`) geometry.
pub mod bounds;

/// Squared Euclidean distance with a SIMD fast path.
pub mod distance;

/// Radial kernel functions over squared distances.
pub mod kernel;
