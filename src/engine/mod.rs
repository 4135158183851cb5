//! Layer 6: Engine
//!
//! # Purpose
//!
//! This layer drives the dual-tree density computation:
//! - Per-node accumulator state and upward bound merging
//! - Prune admissibility checks (finite-difference and series)
//! - The recursive pair traversal with lazy bound propagation
//! - The executor that runs a batch end to end and normalizes output
//! - Input validation and traversal counters
//!
//! Everything below this layer is policy-free machinery; this layer is where
//! the error budget is spent.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Engine ← You are here
//!   ↓
//! Layer 5: Evaluation
//!   ↓
//! Layer 4: Expansion
//!   ↓
//! Layer 3: Tree
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Per-node accumulator state.
pub mod stats;

/// Prune admissibility checks.
pub mod prune;

/// Traversal counters.
pub mod telemetry;

/// Dual-tree recursion.
pub mod traversal;

/// End-to-end run orchestration.
pub mod executor;

/// Result container.
pub mod output;

/// Configuration and data validation.
pub mod validator;
