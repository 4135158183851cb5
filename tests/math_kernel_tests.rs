#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use dualtree_kde::internals::math::bounds::DRange;
use dualtree_kde::internals::math::kernel::{EpanechnikovKernel, GaussianKernel, RadialKernel};

// ============================================================================
// Gaussian Kernel Tests
// ============================================================================

#[test]
fn test_gaussian_eval_at_zero() {
    let kernel = GaussianKernel::new(1.0f64);
    assert_relative_eq!(kernel.eval_unnorm_on_sq(0.0), 1.0);
}

#[test]
fn test_gaussian_eval_at_bandwidth() {
    // dsq = h^2 -> exp(-1/2)
    let kernel = GaussianKernel::new(2.0f64);
    assert_relative_eq!(kernel.eval_unnorm_on_sq(4.0), (-0.5f64).exp());
}

#[test]
fn test_gaussian_is_non_increasing() {
    let kernel = GaussianKernel::new(0.7f64);
    let mut prev = kernel.eval_unnorm_on_sq(0.0);
    for i in 1..50 {
        let v = kernel.eval_unnorm_on_sq(i as f64 * 0.25);
        assert!(v <= prev);
        prev = v;
    }
}

#[test]
fn test_gaussian_range_over_interval() {
    // h = 1, interval [1, 4]: min at the far end, max at the near end.
    let kernel = GaussianKernel::new(1.0f64);
    let range = kernel.range_unnorm_on_sq(&DRange::new(1.0, 4.0));
    assert_relative_eq!(range.lo, (-2.0f64).exp());
    assert_relative_eq!(range.hi, (-0.5f64).exp());
    assert!(range.lo <= range.hi);
}

#[test]
fn test_gaussian_norm_constant_1d() {
    // sqrt(2 pi) * h
    let kernel = GaussianKernel::new(0.5f64);
    let expected = (2.0 * std::f64::consts::PI).sqrt() * 0.5;
    assert_relative_eq!(kernel.norm_constant(1), expected, epsilon = 1e-12);
}

#[test]
fn test_gaussian_norm_constant_2d() {
    // 2 pi h^2
    let kernel = GaussianKernel::new(1.5f64);
    let expected = 2.0 * std::f64::consts::PI * 2.25;
    assert_relative_eq!(kernel.norm_constant(2), expected, epsilon = 1e-12);
}

// ============================================================================
// Epanechnikov Kernel Tests
// ============================================================================

#[test]
fn test_epanechnikov_eval_inside_support() {
    // h = 2, dsq = 1 -> 1 - 1/4 = 0.75
    let kernel = EpanechnikovKernel::new(2.0f64);
    assert_relative_eq!(kernel.eval_unnorm_on_sq(1.0), 0.75);
}

#[test]
fn test_epanechnikov_vanishes_outside_support() {
    let kernel = EpanechnikovKernel::new(2.0f64);
    assert_relative_eq!(kernel.eval_unnorm_on_sq(4.0), 0.0);
    assert_relative_eq!(kernel.eval_unnorm_on_sq(9.0), 0.0);
}

#[test]
fn test_epanechnikov_range_straddling_support_edge() {
    // h = 2, interval [1, 9]: far end past the support, near end inside.
    let kernel = EpanechnikovKernel::new(2.0f64);
    let range = kernel.range_unnorm_on_sq(&DRange::new(1.0, 9.0));
    assert_relative_eq!(range.lo, 0.0);
    assert_relative_eq!(range.hi, 0.75);
}

#[test]
fn test_epanechnikov_norm_constant_1d() {
    // Integral of (1 - x^2/h^2) over [-h, h] is 4h/3.
    let kernel = EpanechnikovKernel::new(1.5f64);
    assert_relative_eq!(kernel.norm_constant(1), 2.0, epsilon = 1e-12);
}

#[test]
fn test_epanechnikov_norm_constant_2d() {
    // pi h^2 / 2
    let kernel = EpanechnikovKernel::new(2.0f64);
    let expected = std::f64::consts::PI * 4.0 / 2.0;
    assert_relative_eq!(kernel.norm_constant(2), expected, epsilon = 1e-12);
}

#[test]
fn test_epanechnikov_norm_constant_3d() {
    // 8 pi h^3 / 15
    let kernel = EpanechnikovKernel::new(1.0f64);
    let expected = 8.0 * std::f64::consts::PI / 15.0;
    assert_relative_eq!(kernel.norm_constant(3), expected, epsilon = 1e-12);
}

// ============================================================================
// Shared Invariants
// ============================================================================

#[test]
fn test_kernel_values_within_unit_interval() {
    let gaussian = GaussianKernel::new(0.3f64);
    let epanechnikov = EpanechnikovKernel::new(0.3f64);
    for i in 0..40 {
        let dsq = i as f64 * 0.05;
        for v in [
            gaussian.eval_unnorm_on_sq(dsq),
            epanechnikov.eval_unnorm_on_sq(dsq),
        ] {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
