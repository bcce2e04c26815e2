use sociogram_layout::bundle::{BundleConfig, bundle};
use sociogram_layout::geom::point;

#[test]
fn endpoints_never_move() {
    let segments = vec![
        (point(0.0, 0.0), point(100.0, 0.0)),
        (point(0.0, 10.0), point(100.0, 10.0)),
    ];
    let paths = bundle(&segments, &BundleConfig::default());
    assert_eq!(paths[0].first().copied(), Some(point(0.0, 0.0)));
    assert_eq!(paths[0].last().copied(), Some(point(100.0, 0.0)));
    assert_eq!(paths[1].first().copied(), Some(point(0.0, 10.0)));
    assert_eq!(paths[1].last().copied(), Some(point(100.0, 10.0)));
}

#[test]
fn parallel_close_edges_bundle_toward_each_other() {
    let segments = vec![
        (point(0.0, 0.0), point(200.0, 0.0)),
        (point(0.0, 30.0), point(200.0, 30.0)),
    ];
    let cfg = BundleConfig::default();
    let paths = bundle(&segments, &cfg);

    let mid = cfg.subdivisions / 2 + 1;
    let gap_before = 30.0;
    let gap_after = (paths[1][mid] - paths[0][mid]).length();
    assert!(
        gap_after < gap_before,
        "midpoints did not approach: {gap_after} vs {gap_before}"
    );
}

#[test]
fn perpendicular_edges_stay_straight() {
    let segments = vec![
        (point(0.0, 0.0), point(200.0, 0.0)),
        (point(100.0, -100.0), point(100.0, 100.0)),
    ];
    let paths = bundle(&segments, &BundleConfig::default());

    // Incompatible pair: only the smoothing spring applies, which keeps an
    // already straight path straight.
    for p in &paths[0] {
        assert!(p.y.abs() < 1e-6, "straight edge bowed to y={}", p.y);
    }
}

#[test]
fn single_edge_subdivides_without_deforming() {
    let segments = vec![(point(0.0, 0.0), point(50.0, 50.0))];
    let cfg = BundleConfig::default();
    let paths = bundle(&segments, &cfg);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), cfg.subdivisions + 2);
    for p in &paths[0] {
        assert!((p.x - p.y).abs() < 1e-9, "point off the diagonal: {p:?}");
    }
}
