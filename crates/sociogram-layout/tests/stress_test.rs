use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sociogram_graph::{DistanceMatrix, Edge, EdgeType, Graph, Node};
use sociogram_layout::seed::seed;
use sociogram_layout::stress::{majorize, stress_value};
use sociogram_layout::{CancelToken, Constraints, LayoutConfig};

fn random_graph(rng: &mut ChaCha8Rng, n: usize) -> Graph {
    let mut g = Graph::new();
    for i in 0..n {
        g.add_node(Node::new(format!("n{i}")));
    }
    // Spanning path keeps most of the graph connected, then extra edges.
    for i in 1..n {
        g.add_edge(Edge::new(
            format!("n{}", i - 1),
            format!("n{i}"),
            EdgeType::Communication,
        ))
        .unwrap();
    }
    let extra = rng.gen_range(0..n * 2);
    for _ in 0..extra {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            let _ = g.add_edge(Edge::new(
                format!("n{a}"),
                format!("n{b}"),
                EdgeType::Business,
            ));
        }
    }
    g
}

#[test]
fn stress_is_monotonically_non_increasing_on_random_graphs() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for trial in 0..20 {
        let n = rng.gen_range(5..=50);
        let g = random_graph(&mut rng, n);
        let cfg = LayoutConfig {
            stress_sweeps: 30,
            // No early stop: we want the full history.
            stress_tolerance: 0.0,
            ..Default::default()
        };
        let cons = Constraints::default();
        let mut positions = seed(&g, &cfg, &cons);
        let report = majorize(
            &g,
            &DistanceMatrix::build(&g),
            &mut positions,
            &cfg,
            &cons,
            &CancelToken::new(),
        )
        .unwrap();

        for pair in report.history.windows(2) {
            assert!(
                pair[1] <= pair[0] + 1e-9,
                "stress regressed on trial {trial} (n={n}): {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn majorization_reduces_stress_from_the_seeded_start() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let g = random_graph(&mut rng, 25);
    let cfg = LayoutConfig::default();
    let cons = Constraints::default();
    let dist = DistanceMatrix::build(&g);

    let mut positions = seed(&g, &cfg, &cons);
    let ids: Vec<_> = dist.ids().to_vec();
    let before: Vec<_> = ids.iter().map(|id| positions[id]).collect();
    let initial = stress_value(&dist, &before, &cfg);

    let report = majorize(&g, &dist, &mut positions, &cfg, &cons, &CancelToken::new()).unwrap();
    assert!(report.final_stress < initial);
    assert!(report.sweeps > 0);
}

#[test]
fn early_stop_reports_convergence() {
    let mut g = Graph::new();
    for id in ["a", "b", "c"] {
        g.add_node(Node::new(id));
    }
    g.add_edge(Edge::new("a", "b", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("b", "c", EdgeType::Family)).unwrap();

    let cfg = LayoutConfig::default();
    let cons = Constraints::default();
    let mut positions = seed(&g, &cfg, &cons);
    let report = majorize(
        &g,
        &DistanceMatrix::build(&g),
        &mut positions,
        &cfg,
        &cons,
        &CancelToken::new(),
    )
    .unwrap();
    assert!(report.converged);
    assert!(report.sweeps < cfg.stress_sweeps);
}

#[test]
fn pinned_nodes_do_not_move_during_majorization() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let g = random_graph(&mut rng, 12);
    let cfg = LayoutConfig::default();
    let mut cons = Constraints::default();
    cons.pinned
        .insert("n3".to_string(), sociogram_layout::geom::point(77.0, 88.0));

    let mut positions = seed(&g, &cfg, &cons);
    majorize(
        &g,
        &DistanceMatrix::build(&g),
        &mut positions,
        &cfg,
        &cons,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(positions["n3"], sociogram_layout::geom::point(77.0, 88.0));
}

#[test]
fn cancelled_majorization_returns_none() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let g = random_graph(&mut rng, 10);
    let cfg = LayoutConfig::default();
    let cons = Constraints::default();
    let mut positions = seed(&g, &cfg, &cons);

    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(
        majorize(
            &g,
            &DistanceMatrix::build(&g),
            &mut positions,
            &cfg,
            &cons,
            &cancel
        )
        .is_none()
    );
}
