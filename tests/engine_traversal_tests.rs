#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use dualtree_kde::internals::evaluation::naive::{max_relative_error, NaiveKde};
use dualtree_kde::internals::math::kernel::{EpanechnikovKernel, GaussianKernel};
use dualtree_kde::internals::primitives::dataset::PointSet;
use dualtree_kde::prelude::*;

/// Deterministic 2-D cloud, roughly an annulus in [-1.1, 1.1]².
fn clustered_2d(n: usize) -> Vec<f64> {
    let mut pts = Vec::with_capacity(n * 2);
    for i in 0..n {
        let t = i as f64;
        pts.push((t * 0.37).sin() + 0.1 * (t * 1.91).cos());
        pts.push((t * 0.73).cos() + 0.1 * (t * 1.13).sin());
    }
    pts
}

/// Two tight 1-D clusters of `half` points each, `separation` apart.
fn two_clusters_1d(half: usize, separation: f64) -> Vec<f64> {
    let mut pts = Vec::with_capacity(half * 2);
    let step = 0.5 / (half - 1) as f64;
    for i in 0..half {
        pts.push(i as f64 * step);
    }
    for i in 0..half {
        pts.push(separation + i as f64 * step);
    }
    pts
}

fn naive_gaussian(refs: &[f64], weights: &[f64], queries: &[f64], dims: usize, h: f64) -> Vec<f64> {
    let rset = PointSet::from_flat(refs.to_vec(), dims);
    let qset = PointSet::from_flat(queries.to_vec(), dims);
    let kernel = GaussianKernel::new(h);
    NaiveKde::new(&kernel, &rset, weights).estimate(&qset)
}

fn naive_epanechnikov(refs: &[f64], weights: &[f64], queries: &[f64], dims: usize, h: f64) -> Vec<f64> {
    let rset = PointSet::from_flat(refs.to_vec(), dims);
    let qset = PointSet::from_flat(queries.to_vec(), dims);
    let kernel = EpanechnikovKernel::new(h);
    NaiveKde::new(&kernel, &rset, weights).estimate(&qset)
}

// ============================================================================
// Exactness Tests
// ============================================================================

#[test]
fn test_single_leaf_pair_matches_exhaustive() {
    // Five points fit one leaf on both sides: the whole run is one base
    // case, with no pruning and no tree descent.
    let refs = vec![0.0, 0.0, 1.0, 0.5, -0.5, 1.0, 0.3, -0.7, 0.9, 0.2];
    let weights = vec![1.0; 5];
    let fitted = Kde::new()
        .dimensions(2)
        .bandwidth(0.8)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 2, 0.8);

    assert_eq!(result.telemetry.pairs_visited, 1);
    assert_eq!(result.telemetry.base_cases, 1);
    assert_eq!(result.telemetry.distance_evals, 25);
    assert_eq!(result.telemetry.total_prunes(), 0);

    for i in 0..5 {
        assert_relative_eq!(result.estimate[i], exact[i], epsilon = 1e-12);
        assert_relative_eq!(result.lower[i], exact[i], epsilon = 1e-9);
        assert_relative_eq!(result.upper[i], exact[i], epsilon = 1e-9);
    }
}

#[test]
fn test_zero_tolerance_is_exact() {
    // tau = 0 admits only zero-error prunes, so the result must agree with
    // the exhaustive sum to rounding.
    let refs: Vec<f64> = (0..30).map(|i| (i as f64 * 0.37).sin() * 3.0).collect();
    let weights = vec![1.0; 30];
    let fitted = Kde::new()
        .bandwidth(0.6)
        .relative_error(0.0)
        .leaf_size(1)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 1, 0.6);

    for i in 0..30 {
        assert_relative_eq!(result.estimate[i], exact[i], epsilon = 1e-12);
    }
    assert!(result.max_interval_width() <= 1e-9);
}

// ============================================================================
// Certified Bound Tests
// ============================================================================

#[test]
fn test_bounds_bracket_the_truth() {
    let refs = clustered_2d(200);
    let weights = vec![1.0; 200];
    let fitted = Kde::new()
        .dimensions(2)
        .bandwidth(0.5)
        .relative_error(0.2)
        .leaf_size(8)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 2, 0.5);

    for i in 0..200 {
        assert!(result.lower[i] <= result.upper[i] + 1e-12);
        assert!(result.lower[i] - 1e-9 <= exact[i]);
        assert!(exact[i] <= result.upper[i] + 1e-9);
    }
}

#[test]
fn test_estimate_within_tolerance() {
    let refs = clustered_2d(200);
    let weights = vec![1.0; 200];
    let fitted = Kde::new()
        .dimensions(2)
        .bandwidth(0.5)
        .relative_error(0.2)
        .leaf_size(8)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 2, 0.5);

    assert!(max_relative_error(&result.estimate, &exact) <= 0.2 + 1e-9);
}

#[test]
fn test_loose_tolerance_still_brackets_truth() {
    // Heavy pruning under a 90% tolerance must not break the certificates.
    let refs = two_clusters_1d(64, 3.0);
    let weights = vec![1.0; 128];
    let fitted = Kde::new()
        .bandwidth(1.0)
        .relative_error(0.9)
        .leaf_size(8)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 1, 1.0);

    for i in 0..128 {
        assert!(result.lower[i] - 1e-9 <= exact[i]);
        assert!(exact[i] <= result.upper[i] + 1e-9);
    }
    assert!(max_relative_error(&result.estimate, &exact) <= 0.9 + 1e-9);
}

// ============================================================================
// Determinism Tests
// ============================================================================

#[test]
fn test_repeated_estimates_are_identical() {
    let refs = clustered_2d(100);
    let fitted = Kde::new()
        .dimensions(2)
        .bandwidth(0.5)
        .leaf_size(8)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let first = fitted.estimate(&refs).unwrap();
    let second = fitted.estimate(&refs).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Weighted Estimation Tests
// ============================================================================

#[test]
fn test_weighted_fit_matches_weighted_exhaustive() {
    let refs = clustered_2d(150);
    let weights: Vec<f64> = (0..150).map(|i| 0.5 + (i % 4) as f64 * 0.25).collect();
    let fitted = Kde::new()
        .dimensions(2)
        .bandwidth(0.5)
        .relative_error(0.1)
        .leaf_size(8)
        .build()
        .unwrap()
        .fit_weighted(&refs, &weights)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 2, 0.5);

    for i in 0..150 {
        assert!(result.lower[i] - 1e-9 <= exact[i]);
        assert!(exact[i] <= result.upper[i] + 1e-9);
    }
    assert!(max_relative_error(&result.estimate, &exact) <= 0.1 + 1e-9);
}

// ============================================================================
// Self-Evaluation Tests
// ============================================================================

#[test]
fn test_estimate_self_matches_exhaustive() {
    let refs = clustered_2d(150);
    let weights = vec![1.0; 150];
    let fitted = Kde::new()
        .dimensions(2)
        .bandwidth(0.5)
        .relative_error(0.15)
        .leaf_size(8)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate_self().unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 2, 0.5);

    assert_eq!(result.n_points(), 150);
    for i in 0..150 {
        assert!(result.lower[i] - 1e-9 <= exact[i]);
        assert!(exact[i] <= result.upper[i] + 1e-9);
    }
    assert!(max_relative_error(&result.estimate, &exact) <= 0.15 + 1e-9);
}

// ============================================================================
// Pruning Behavior Tests
// ============================================================================

#[test]
fn test_compact_support_prunes_distant_clusters_exactly() {
    // Epanechnikov support is one bandwidth; clusters 100 apart contribute
    // exactly zero to each other, so the cross pairs prune with zero error
    // even at zero tolerance.
    let mut refs: Vec<f64> = (0..40).map(|i| i as f64 * 0.01).collect();
    refs.extend((0..40).map(|i| 100.0 + i as f64 * 0.01));
    let weights = vec![1.0; 80];
    let fitted = Kde::new()
        .bandwidth(1.0)
        .relative_error(0.0)
        .leaf_size(4)
        .kernel(Epanechnikov)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_epanechnikov(&refs, &weights, &refs, 1, 1.0);

    assert!(result.telemetry.finite_difference_prunes >= 1);
    assert!(result.telemetry.distance_evals < 80 * 80);
    for i in 0..80 {
        assert_relative_eq!(result.estimate[i], exact[i], epsilon = 1e-12);
    }
}

#[test]
fn test_gaussian_series_prunes_between_clusters() {
    // Two tight clusters three bandwidths apart: the midpoint rule cannot
    // afford the cross pairs at a 1% tolerance, but a low-order expansion
    // can.
    let refs = two_clusters_1d(64, 3.0);
    let weights = vec![1.0; 128];
    let fitted = Kde::new()
        .bandwidth(1.0)
        .relative_error(0.01)
        .leaf_size(8)
        .build()
        .unwrap()
        .fit(&refs)
        .unwrap();

    let result = fitted.estimate(&refs).unwrap();
    let exact = naive_gaussian(&refs, &weights, &refs, 1, 1.0);

    let series_prunes = result.telemetry.far_to_local_prunes
        + result.telemetry.far_field_prunes
        + result.telemetry.local_accumulation_prunes;
    assert!(series_prunes >= 1);
    assert!(result.telemetry.distance_evals < 128 * 128);

    assert!(max_relative_error(&result.estimate, &exact) <= 0.01 + 1e-9);
    for i in 0..128 {
        assert!(result.lower[i] - 1e-9 <= exact[i]);
        assert!(exact[i] <= result.upper[i] + 1e-9);
    }
}
