#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use dualtree_kde::internals::engine::prune::{
    try_finite_difference, try_series, PruneOp, SeriesKind,
};
use dualtree_kde::internals::expansion::gaussian::GaussianScheme;
use dualtree_kde::internals::expansion::NullScheme;
use dualtree_kde::internals::math::bounds::{DRange, HRect};
use dualtree_kde::internals::primitives::dataset::PointSet;

fn bound_of(points: &PointSet<f64>) -> HRect<f64> {
    HRect::from_points(points, 0, points.n_points())
}

// ============================================================================
// Finite-Difference Tests
// ============================================================================

#[test]
fn test_zero_kernel_range_prunes_exactly() {
    // Boxes beyond a compact kernel's support: the range is [0, 0], the
    // midpoint is exact, and the prune fires even at zero tolerance with no
    // lower bound accumulated yet.
    let range = DRange::new(0.0, 0.0);
    let op = try_finite_difference(&range, 4.0, 100.0, 0.0, 0.0, 0.0).unwrap();

    match op {
        PruneOp::FiniteDifference { dl, de, du, dt } => {
            assert_relative_eq!(dl, 0.0);
            assert_relative_eq!(de, 0.0);
            assert_relative_eq!(du, -4.0);
            // Exact prunes refund the node's full mass as tokens.
            assert_relative_eq!(dt, 4.0);
        }
        other => panic!("expected a finite-difference prune, got {:?}", other),
    }
}

#[test]
fn test_admissible_midpoint_prune_deltas() {
    // range [0.2, 0.4], node mass 10, total 100, lower bound 30, tau 0.5:
    //   dl = 0.2 * 10 = 2, de = 0.5 * 10 * 0.6 = 3, du = -0.6 * 10 = -6
    //   allowed = 0.5 * 32 * 10 / 100 = 1.6, error = 0.1 * 10 = 1.0
    //   dt = 10 * (1 - 100 * 0.1 / (32 * 0.5)) = 3.75
    let range = DRange::new(0.2, 0.4);
    let op = try_finite_difference(&range, 10.0, 100.0, 30.0, 0.0, 0.5).unwrap();

    match op {
        PruneOp::FiniteDifference { dl, de, du, dt } => {
            assert_relative_eq!(dl, 2.0, epsilon = 1e-12);
            assert_relative_eq!(de, 3.0, epsilon = 1e-12);
            assert_relative_eq!(du, -6.0, epsilon = 1e-12);
            assert_relative_eq!(dt, 3.75, epsilon = 1e-12);
        }
        other => panic!("expected a finite-difference prune, got {:?}", other),
    }
}

#[test]
fn test_zero_tolerance_rejects_inexact_prune() {
    let range = DRange::new(0.2, 0.4);
    assert!(try_finite_difference(&range, 10.0, 100.0, 30.0, 0.0, 0.0).is_none());
}

#[test]
fn test_tight_budget_rejects_prune() {
    // Same geometry as the admissible case but tau 0.05:
    //   allowed = 0.05 * 32 * 10 / 100 = 0.16 < error 1.0
    let range = DRange::new(0.2, 0.4);
    assert!(try_finite_difference(&range, 10.0, 100.0, 30.0, 0.0, 0.05).is_none());
}

#[test]
fn test_banked_tokens_relax_the_budget() {
    // With 200 banked tokens the same tight budget admits the prune:
    //   allowed = 0.05 * 32 * 210 / 100 = 3.36 >= 1.0
    let range = DRange::new(0.2, 0.4);
    let op = try_finite_difference(&range, 10.0, 100.0, 30.0, 200.0, 0.05);
    assert!(op.is_some());
}

#[test]
fn test_prune_delta_signs() {
    // Kernel values never exceed 1, so dl >= 0 and du <= 0 always.
    let range = DRange::new(0.1, 0.9);
    if let Some(PruneOp::FiniteDifference { dl, du, dt, .. }) =
        try_finite_difference(&range, 5.0, 10.0, 8.0, 0.0, 0.9)
    {
        assert!(dl >= 0.0);
        assert!(du <= 0.0);
        assert!(dt <= 5.0);
    } else {
        panic!("loose tolerance should admit the prune");
    }
}

// ============================================================================
// Series Tests
// ============================================================================

#[test]
fn test_null_scheme_never_series_prunes() {
    let rpts = PointSet::from_flat(vec![0.0, 0.5], 1);
    let qpts = PointSet::from_flat(vec![4.0, 4.5], 1);
    let rbound = bound_of(&rpts);
    let qbound = bound_of(&qpts);
    let dsq = qbound.distance_sq_range(&rbound);
    let range = DRange::new(0.0, 0.01);

    let op = try_series(
        &NullScheme,
        &rbound,
        &qbound,
        &dsq,
        &range,
        2.0,
        100.0,
        50.0,
        0.0,
        0.5,
        2,
        2,
    );
    assert!(op.is_none());
}

#[test]
fn test_separated_clusters_convert_far_field_to_local() {
    // Small boxes several bandwidths apart with a generous budget: the
    // cheapest mechanism in the chain is tried first.
    let rpts = PointSet::from_flat(vec![-0.25, 0.0, 0.25], 1);
    let qpts = PointSet::from_flat(vec![3.8, 4.0, 4.2], 1);
    let rbound = bound_of(&rpts);
    let qbound = bound_of(&qpts);
    let dsq = qbound.distance_sq_range(&rbound);
    let kernel_range = DRange::new((-dsq.hi / 2.0).exp(), (-dsq.lo / 2.0).exp());
    let scheme = GaussianScheme::new(1.0, 1, 7);

    let op = try_series(
        &scheme,
        &rbound,
        &qbound,
        &dsq,
        &kernel_range,
        3.0,
        100.0,
        40.0,
        0.0,
        0.1,
        3,
        3,
    )
    .unwrap();

    match op {
        PruneOp::Series {
            kind,
            order,
            dl,
            du,
            dt,
        } => {
            assert_eq!(kind, SeriesKind::FarFieldToLocal);
            assert!(order <= scheme.max_order());
            assert!(dl >= 0.0);
            assert!(du <= 0.0);
            assert!(dt <= 3.0);
        }
        other => panic!("expected a series prune, got {:?}", other),
    }
}

#[test]
fn test_wide_query_side_falls_back_to_far_field_evaluation() {
    // A point-sized reference box next to a very wide query box: local
    // expansions cannot converge, but the far field is exact. The fallback
    // is only allowed when the query side is the smaller one.
    let rpts = PointSet::from_flat(vec![0.0, 0.0, 0.0], 1);
    let qpts = PointSet::from_flat(vec![2.0, 8.0], 1);
    let rbound = bound_of(&rpts);
    let qbound = bound_of(&qpts);
    let dsq = qbound.distance_sq_range(&rbound);
    let kernel_range = DRange::new((-dsq.hi / 2.0).exp(), (-dsq.lo / 2.0).exp());
    let scheme = GaussianScheme::new(1.0, 1, 7);

    let op = try_series(
        &scheme,
        &rbound,
        &qbound,
        &dsq,
        &kernel_range,
        3.0,
        100.0,
        10.0,
        0.0,
        0.01,
        2,
        3,
    )
    .unwrap();

    match op {
        PruneOp::Series { kind, order, dt, .. } => {
            assert_eq!(kind, SeriesKind::FarFieldEvaluation);
            // A zero-width reference box is summarized exactly at order 0.
            assert_eq!(order, 0);
            assert_relative_eq!(dt, 3.0);
        }
        other => panic!("expected a series prune, got {:?}", other),
    }
}

#[test]
fn test_far_field_evaluation_gated_on_query_count() {
    // Identical geometry, but the query side is no smaller than the
    // reference side: the far-field fallback is skipped and no mechanism
    // fits the budget.
    let rpts = PointSet::from_flat(vec![0.0, 0.0, 0.0], 1);
    let qpts = PointSet::from_flat(vec![2.0, 8.0], 1);
    let rbound = bound_of(&rpts);
    let qbound = bound_of(&qpts);
    let dsq = qbound.distance_sq_range(&rbound);
    let kernel_range = DRange::new((-dsq.hi / 2.0).exp(), (-dsq.lo / 2.0).exp());
    let scheme = GaussianScheme::new(1.0, 1, 7);

    let op = try_series(
        &scheme,
        &rbound,
        &qbound,
        &dsq,
        &kernel_range,
        3.0,
        100.0,
        10.0,
        0.0,
        0.01,
        5,
        3,
    );
    assert!(op.is_none());
}
