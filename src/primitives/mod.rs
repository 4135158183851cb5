//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the fundamental data structures shared by every other
//! layer:
//! - The crate-wide error enum
//! - The flattened point-matrix type
//!
//! These carry no algorithmic logic of their own.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types for configuration and input validation.
pub mod errors;

/// Flattened point matrices.
pub mod dataset;
