//! High-level API for kernel density estimation.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point for density
//! estimation. It implements a fluent builder for configuring estimator
//! parameters, a model that fits reference data, and a fitted handle that
//! answers query batches.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for everything
//!   except the bandwidth, which has no sensible default.
//! * **Validated**: All parameters and data are checked before computation.
//! * **Reusable**: One fit serves any number of query batches.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! * **Configuration Flow**: `Kde::new()` → chain setters → `.build()` →
//!   `.fit(..)` → `.estimate(..)`.
//! * **Kernel choice**: the Gaussian kernel prunes with series expansions;
//!   the Epanechnikov kernel prunes by finite differences and its compact
//!   support alone.
//! * **Query order**: results come back in the caller's original order even
//!   though trees permute points internally.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use core::fmt::Debug;

// Internal dependencies
use crate::engine::executor::{DualTreeExecutor, EngineOutput};
use crate::engine::validator::Validator;
use crate::expansion::gaussian::GaussianScheme;
use crate::expansion::hermite::default_max_order;
use crate::expansion::{ExpansionScheme, NullScheme};
use crate::math::distance::DistanceLinalg;
use crate::math::kernel::{EpanechnikovKernel, GaussianKernel, RadialKernel};
use crate::primitives::dataset::PointSet;
use crate::tree::build::SpatialTree;

// Publicly re-exported types
pub use crate::engine::output::DensityResult;
pub use crate::engine::telemetry::TraversalTelemetry;
pub use crate::primitives::errors::KdeError;

// ============================================================================
// Kernel selection
// ============================================================================

/// Kernel profile used for density estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelType {
    /// Gaussian profile. Infinite support; prunes via Hermite/Taylor series
    /// in addition to finite differences.
    #[default]
    Gaussian,
    /// Epanechnikov profile. Compact support; distant boxes prune exactly.
    Epanechnikov,
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring a density estimator.
#[derive(Debug, Clone)]
pub struct KdeBuilder<T: DistanceLinalg + Debug> {
    /// Point dimensionality (default: 1).
    pub dimensions: Option<usize>,

    /// Kernel bandwidth (required).
    pub bandwidth: Option<T>,

    /// Relative error tolerance (default: 0.1; 0 means exact).
    pub relative_error: Option<T>,

    /// Tree leaf capacity (default: 20).
    pub leaf_size: Option<usize>,

    /// Kernel profile (default: Gaussian).
    pub kernel: Option<KernelType>,

    /// Series truncation order override (default: chosen from the
    /// dimensionality).
    pub expansion_order: Option<usize>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: DistanceLinalg + Debug> Default for KdeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DistanceLinalg + Debug> KdeBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            dimensions: None,
            bandwidth: None,
            relative_error: None,
            leaf_size: None,
            kernel: None,
            expansion_order: None,
            duplicate_param: None,
        }
    }

    /// Set the point dimensionality.
    pub fn dimensions(mut self, dims: usize) -> Self {
        if self.dimensions.is_some() {
            self.duplicate_param = Some("dimensions");
        }
        self.dimensions = Some(dims);
        self
    }

    /// Set the kernel bandwidth.
    pub fn bandwidth(mut self, bandwidth: T) -> Self {
        if self.bandwidth.is_some() {
            self.duplicate_param = Some("bandwidth");
        }
        self.bandwidth = Some(bandwidth);
        self
    }

    /// Set the relative error tolerance. Zero requests an exact result.
    pub fn relative_error(mut self, tau: T) -> Self {
        if self.relative_error.is_some() {
            self.duplicate_param = Some("relative_error");
        }
        self.relative_error = Some(tau);
        self
    }

    /// Set the tree leaf capacity.
    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        if self.leaf_size.is_some() {
            self.duplicate_param = Some("leaf_size");
        }
        self.leaf_size = Some(leaf_size);
        self
    }

    /// Set the kernel profile.
    pub fn kernel(mut self, kernel: KernelType) -> Self {
        if self.kernel.is_some() {
            self.duplicate_param = Some("kernel");
        }
        self.kernel = Some(kernel);
        self
    }

    /// Override the series truncation order (Gaussian kernel only).
    pub fn expansion_order(mut self, order: usize) -> Self {
        if self.expansion_order.is_some() {
            self.duplicate_param = Some("expansion_order");
        }
        self.expansion_order = Some(order);
        self
    }

    /// Validate the configuration and produce a model ready to fit data.
    pub fn build(self) -> Result<KdeModel<T>, KdeError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let dimensions = self.dimensions.unwrap_or(1);
        Validator::validate_dimensions(dimensions)?;

        let bandwidth = self.bandwidth.ok_or(KdeError::MissingBandwidth)?;
        Validator::validate_bandwidth(bandwidth)?;

        let relative_error = self
            .relative_error
            .unwrap_or_else(|| T::from(0.1).unwrap());
        Validator::validate_tolerance(relative_error)?;

        let leaf_size = self.leaf_size.unwrap_or(DEFAULT_LEAF_SIZE);
        Validator::validate_leaf_size(leaf_size)?;

        let kernel = self.kernel.unwrap_or_default();

        let expansion_order = match self.expansion_order {
            Some(order) => {
                Validator::validate_expansion_order(order, dimensions)?;
                order
            }
            None => default_max_order(dimensions),
        };

        Ok(KdeModel {
            config: KdeConfig {
                dimensions,
                bandwidth,
                relative_error,
                leaf_size,
                kernel,
                expansion_order,
            },
        })
    }
}

/// Default tree leaf capacity.
const DEFAULT_LEAF_SIZE: usize = 20;

// ============================================================================
// Configuration
// ============================================================================

/// Validated estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdeConfig<T> {
    /// Point dimensionality.
    pub dimensions: usize,
    /// Kernel bandwidth.
    pub bandwidth: T,
    /// Relative error tolerance.
    pub relative_error: T,
    /// Tree leaf capacity.
    pub leaf_size: usize,
    /// Kernel profile.
    pub kernel: KernelType,
    /// Series truncation order cap.
    pub expansion_order: usize,
}

// ============================================================================
// Model
// ============================================================================

/// A validated estimator configuration, ready to fit reference data.
#[derive(Debug, Clone)]
pub struct KdeModel<T: DistanceLinalg + Debug> {
    config: KdeConfig<T>,
}

impl<T: DistanceLinalg + Debug> KdeModel<T> {
    /// The validated configuration.
    pub fn config(&self) -> &KdeConfig<T> {
        &self.config
    }

    /// Fit the model to reference points with unit weights.
    ///
    /// `references` is a flat row-major buffer of
    /// `n_points * dimensions` coordinates.
    pub fn fit(&self, references: &[T]) -> Result<FittedKde<T>, KdeError> {
        Validator::validate_reference_set(references, self.config.dimensions)?;
        let n_points = references.len() / self.config.dimensions;
        self.fit_prepared(references, vec![T::one(); n_points])
    }

    /// Fit the model to reference points with per-point weights.
    ///
    /// Weights must be finite and non-negative with a positive sum; they
    /// scale each point's contribution to every density.
    pub fn fit_weighted(&self, references: &[T], weights: &[T]) -> Result<FittedKde<T>, KdeError> {
        Validator::validate_reference_set(references, self.config.dimensions)?;
        let n_points = references.len() / self.config.dimensions;
        Validator::validate_weights(weights, n_points)?;
        self.fit_prepared(references, weights.to_vec())
    }

    /// Build the reference tree and permute weights alongside the points.
    fn fit_prepared(&self, references: &[T], weights: Vec<T>) -> Result<FittedKde<T>, KdeError> {
        let mut rset = PointSet::from_flat(references.to_vec(), self.config.dimensions);
        let (rtree, old_from_new) = SpatialTree::build(&mut rset, self.config.leaf_size);
        let rweights: Vec<T> = old_from_new.iter().map(|&old| weights[old]).collect();
        Ok(FittedKde {
            config: self.config,
            rset,
            rweights,
            rtree,
            r_old_from_new: old_from_new,
        })
    }
}

// ============================================================================
// Fitted estimator
// ============================================================================

/// A fitted density estimator holding the indexed reference side.
#[derive(Debug, Clone)]
pub struct FittedKde<T: DistanceLinalg + Debug> {
    config: KdeConfig<T>,
    rset: PointSet<T>,
    rweights: Vec<T>,
    rtree: SpatialTree<T>,
    r_old_from_new: Vec<usize>,
}

impl<T: DistanceLinalg + Debug> FittedKde<T> {
    /// Number of reference points.
    pub fn n_references(&self) -> usize {
        self.rset.n_points()
    }

    /// Point dimensionality.
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// The configuration this estimator was built with.
    pub fn config(&self) -> &KdeConfig<T> {
        &self.config
    }

    /// Estimate densities at the given query points.
    ///
    /// `queries` is a flat row-major buffer of `n_points * dimensions`
    /// coordinates. Returns per-point estimates with certified lower and
    /// upper bounds, in the order of `queries`.
    pub fn estimate(&self, queries: &[T]) -> Result<DensityResult<T>, KdeError> {
        Validator::validate_query_set(queries, self.config.dimensions)?;
        let mut qset = PointSet::from_flat(queries.to_vec(), self.config.dimensions);
        let (qtree, q_old_from_new) = SpatialTree::build(&mut qset, self.config.leaf_size);
        let out = self.dispatch(&qset, &qtree, false);
        Ok(Self::into_result(out, &q_old_from_new))
    }

    /// Estimate the density at every reference point from the full
    /// reference set, sharing tree state between the two roles.
    pub fn estimate_self(&self) -> Result<DensityResult<T>, KdeError> {
        let out = self.dispatch(&self.rset, &self.rtree, true);
        Ok(Self::into_result(out, &self.r_old_from_new))
    }

    /// Construct the kernel and expansion scheme for the configured profile
    /// and run one batch.
    fn dispatch(&self, qset: &PointSet<T>, qtree: &SpatialTree<T>, aliased: bool) -> EngineOutput<T> {
        match self.config.kernel {
            KernelType::Gaussian => {
                let kernel = GaussianKernel::new(self.config.bandwidth);
                let scheme = GaussianScheme::new(
                    self.config.bandwidth,
                    self.config.dimensions,
                    self.config.expansion_order,
                );
                self.run_with(&kernel, &scheme, qset, qtree, aliased)
            }
            KernelType::Epanechnikov => {
                let kernel = EpanechnikovKernel::new(self.config.bandwidth);
                self.run_with(&kernel, &NullScheme, qset, qtree, aliased)
            }
        }
    }

    fn run_with<K, E>(
        &self,
        kernel: &K,
        scheme: &E,
        qset: &PointSet<T>,
        qtree: &SpatialTree<T>,
        aliased: bool,
    ) -> EngineOutput<T>
    where
        K: RadialKernel<T>,
        E: ExpansionScheme<T>,
    {
        let executor = DualTreeExecutor::new(
            kernel,
            scheme,
            &self.rset,
            &self.rtree,
            &self.rweights,
            self.config.relative_error,
        );
        executor.run(qset, qtree, aliased)
    }

    /// Undo the tree permutation so results match the caller's order.
    fn into_result(out: EngineOutput<T>, old_from_new: &[usize]) -> DensityResult<T> {
        DensityResult {
            lower: reorder(out.lower, old_from_new),
            estimate: reorder(out.estimate, old_from_new),
            upper: reorder(out.upper, old_from_new),
            telemetry: out.telemetry,
        }
    }
}

fn reorder<T: DistanceLinalg>(values: Vec<T>, old_from_new: &[usize]) -> Vec<T> {
    debug_assert_eq!(values.len(), old_from_new.len());
    let mut out = vec![T::zero(); values.len()];
    for (new_idx, value) in values.into_iter().enumerate() {
        out[old_from_new[new_idx]] = value;
    }
    out
}
