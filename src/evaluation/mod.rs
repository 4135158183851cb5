//! Layer 5: Evaluation
//!
//! # Purpose
//!
//! This layer provides verification tooling for the engine:
//! - An exhaustive direct-summation evaluator sharing the engine's kernel
//!   and normalization
//! - A relative-error measurement between approximate and exact densities
//!
//! Nothing here participates in the fast path; it is the yardstick the fast
//! path is measured with.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Engine
//!   ↓
//! Layer 5: Evaluation ← You are here
//!   ↓
//! Layer 4: Expansion
//!   ↓
//! Layer 3: Tree
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Exhaustive reference evaluator and error measurement.
pub mod naive;
