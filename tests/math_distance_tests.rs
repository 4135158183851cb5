#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use dualtree_kde::internals::math::distance::{
    scalar_squared_euclidean, simd_backend, DistanceLinalg,
};

// ============================================================================
// Squared Euclidean Tests
// ============================================================================

#[test]
fn test_squared_euclidean_1d() {
    let a = [1.0f64];
    let b = [4.0f64];
    assert_relative_eq!(f64::squared_euclidean(&a, &b), 9.0);
}

#[test]
fn test_squared_euclidean_2d() {
    let a = [0.0f64, 0.0];
    let b = [3.0f64, 4.0];
    assert_relative_eq!(f64::squared_euclidean(&a, &b), 25.0);
}

#[test]
fn test_squared_euclidean_3d_odd_tail() {
    // Odd length exercises the scalar tail after the two-lane pairs.
    let a = [1.0f64, 2.0, 3.0];
    let b = [4.0f64, 6.0, 8.0];
    // diffs: 3, 4, 5 -> 9 + 16 + 25 = 50
    assert_relative_eq!(f64::squared_euclidean(&a, &b), 50.0);
}

#[test]
fn test_squared_euclidean_f32() {
    let a = [1.0f32, 1.0];
    let b = [2.0f32, 3.0];
    assert_relative_eq!(f32::squared_euclidean(&a, &b), 5.0);
}

#[test]
fn test_squared_euclidean_identical_points() {
    let a = [0.3f64, -1.7, 2.9, 0.0, 5.5];
    assert_relative_eq!(f64::squared_euclidean(&a, &a), 0.0);
}

// ============================================================================
// Backend Agreement Tests
// ============================================================================

#[test]
fn test_simd_matches_scalar() {
    let a: Vec<f64> = (0..17).map(|i| (i as f64) * 0.37 - 2.0).collect();
    let b: Vec<f64> = (0..17).map(|i| (i as f64) * -0.11 + 1.5).collect();

    let fast = simd_backend::squared_euclidean_f64(&a, &b);
    let scalar = scalar_squared_euclidean(&a, &b);
    assert_relative_eq!(fast, scalar, epsilon = 1e-12);
}

#[test]
fn test_simd_even_length() {
    let a = [1.0f64, 2.0, 3.0, 4.0];
    let b = [0.0f64, 0.0, 0.0, 0.0];
    assert_relative_eq!(simd_backend::squared_euclidean_f64(&a, &b), 30.0);
}
