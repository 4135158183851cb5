#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use dualtree_kde::internals::evaluation::naive::{max_relative_error, NaiveKde};
use dualtree_kde::internals::math::kernel::{EpanechnikovKernel, GaussianKernel};
use dualtree_kde::internals::primitives::dataset::PointSet;

// ============================================================================
// Direct Summation Tests
// ============================================================================

#[test]
fn test_two_point_gaussian_density() {
    // refs {0, 1}, h = 1, query 0:
    //   unnormalized sum = e^0 + e^(-1/2)
    //   density = sum / (sqrt(2 pi) * 2)
    let rset = PointSet::from_flat(vec![0.0, 1.0], 1);
    let weights = [1.0, 1.0];
    let kernel = GaussianKernel::new(1.0);
    let naive = NaiveKde::new(&kernel, &rset, &weights);

    let qset = PointSet::from_flat(vec![0.0], 1);
    let densities = naive.estimate(&qset);

    let expected = (1.0 + (-0.5f64).exp()) / ((2.0 * std::f64::consts::PI).sqrt() * 2.0);
    assert_eq!(densities.len(), 1);
    assert_relative_eq!(densities[0], expected, epsilon = 1e-12);
}

#[test]
fn test_weights_scale_contributions() {
    // Same points, weights {2, 1}: the total mass in the normalization
    // grows to 3 and the near point counts double.
    let rset = PointSet::from_flat(vec![0.0, 1.0], 1);
    let weights = [2.0, 1.0];
    let kernel = GaussianKernel::new(1.0);
    let naive = NaiveKde::new(&kernel, &rset, &weights);

    let qset = PointSet::from_flat(vec![0.0], 1);
    let densities = naive.estimate(&qset);

    let expected = (2.0 + (-0.5f64).exp()) / ((2.0 * std::f64::consts::PI).sqrt() * 3.0);
    assert_relative_eq!(densities[0], expected, epsilon = 1e-12);
}

#[test]
fn test_density_integrates_to_mass_scale() {
    // A symmetric pair gives identical densities at mirrored queries.
    let rset = PointSet::from_flat(vec![-1.0, 1.0], 1);
    let weights = [1.0, 1.0];
    let kernel = GaussianKernel::new(0.7);
    let naive = NaiveKde::new(&kernel, &rset, &weights);

    let qset = PointSet::from_flat(vec![-0.5, 0.5], 1);
    let densities = naive.estimate(&qset);
    assert_relative_eq!(densities[0], densities[1], epsilon = 1e-12);
}

#[test]
fn test_compact_kernel_gives_zero_far_away() {
    let rset = PointSet::from_flat(vec![0.0, 0.2, 0.4], 1);
    let weights = [1.0, 1.0, 1.0];
    let kernel = EpanechnikovKernel::new(1.0);
    let naive = NaiveKde::new(&kernel, &rset, &weights);

    let qset = PointSet::from_flat(vec![10.0], 1);
    let densities = naive.estimate(&qset);
    assert_relative_eq!(densities[0], 0.0);
}

// ============================================================================
// Error Measurement Tests
// ============================================================================

#[test]
fn test_max_relative_error_picks_worst_entry() {
    let approx = [1.1, 2.0, 2.9];
    let exact = [1.0, 2.0, 3.0];
    // Deviations: 0.1, 0, 1/30.
    assert_relative_eq!(max_relative_error(&approx, &exact), 0.1, epsilon = 1e-12);
}

#[test]
fn test_max_relative_error_of_identical_vectors() {
    let values = [0.3, 1.7, 0.0];
    assert_relative_eq!(max_relative_error(&values, &values), 0.0);
}

#[test]
fn test_max_relative_error_with_zero_truth() {
    // The denominator floor keeps an exactly-zero truth from dividing by
    // zero: a tiny absolute deviation stays tiny, a large one blows up.
    let tiny: f64 = max_relative_error(&[1e-20], &[0.0]);
    assert!(tiny < 1e-3);

    let large: f64 = max_relative_error(&[0.5], &[0.0]);
    assert!(large > 1.0);
}
