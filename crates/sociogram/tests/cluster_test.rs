use sociogram::{Engine, EngineConfig, WeightMergePolicy};
use sociogram_graph::{Edge, EdgeType, Node};

/// Family triangle {a, b, c} with external ties into x and y.
fn ingest(engine: &mut Engine) {
    engine
        .set_graph(
            vec![
                Node::new("a"),
                Node::new("b"),
                Node::new("c"),
                Node::new("x"),
                Node::new("y"),
            ],
            vec![
                Edge::new("a", "b", EdgeType::Family),
                Edge::new("b", "c", EdgeType::Family),
                Edge::new("a", "x", EdgeType::Business).with_weight(2.0),
                Edge::new("b", "x", EdgeType::Business).with_weight(5.0),
                Edge::new("c", "y", EdgeType::Referral).with_weight(1.0),
            ],
        )
        .unwrap();
}

fn edge_set(engine: &Engine) -> Vec<(String, String, EdgeType, u64)> {
    let mut out: Vec<_> = engine
        .graph()
        .edges()
        .map(|e| {
            let (a, b) = if e.a <= e.b {
                (e.a.clone(), e.b.clone())
            } else {
                (e.b.clone(), e.a.clone())
            };
            (a, b, e.ty, e.weight.to_bits())
        })
        .collect();
    out.sort();
    out
}

#[test]
fn clusters_derive_from_family_components() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    let clusters = engine.clusters();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].key, "a");
    assert_eq!(clusters[0].members, ["a", "b", "c"]);
}

#[test]
fn collapse_folds_external_edges_with_max_weight() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    engine.collapse_cluster("a");

    let g = engine.graph();
    assert!(!g.has_node("a") && !g.has_node("b") && !g.has_node("c"));
    let composite = g.node("family:a").expect("composite node");
    assert!(composite.kind.is_composite());

    // Two Business edges into x fold to one with the stronger weight.
    let to_x: Vec<_> = g
        .edges_of("family:a")
        .filter(|e| e.touches("x"))
        .collect();
    assert_eq!(to_x.len(), 1);
    assert_eq!(to_x[0].weight, 5.0);
    assert_eq!(g.edge_count(), 2); // x and y, no internal family edges

    // The composite has a position; members are no longer placed.
    assert!(engine.positions().contains_key("family:a"));
    assert!(!engine.positions().contains_key("a"));
}

#[test]
fn sum_policy_accumulates_folded_weights() {
    let mut engine = Engine::new(EngineConfig {
        weight_merge: WeightMergePolicy::Sum,
        ..EngineConfig::default()
    });
    ingest(&mut engine);
    engine.collapse_cluster("a");

    let g = engine.graph();
    let to_x: Vec<_> = g
        .edges_of("family:a")
        .filter(|e| e.touches("x"))
        .collect();
    assert_eq!(to_x[0].weight, 7.0);
}

#[test]
fn expand_restores_the_exact_node_and_edge_set() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    let before = edge_set(&engine);

    engine.collapse_cluster("a");
    engine.expand_cluster("a");

    let g = engine.graph();
    for id in ["a", "b", "c", "x", "y"] {
        assert!(g.has_node(id), "missing {id} after expand");
    }
    assert!(!g.has_node("family:a"));
    assert_eq!(edge_set(&engine), before);
    assert!(engine.positions().contains_key("a"));
}

#[test]
fn collapse_is_idempotent_and_unknown_keys_are_noops() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);

    engine.collapse_cluster("a");
    let after_first = edge_set(&engine);
    engine.collapse_cluster("a"); // already collapsed
    engine.collapse_cluster("b"); // not a cluster key
    engine.collapse_cluster("nope");
    assert_eq!(edge_set(&engine), after_first);

    engine.expand_cluster("nope");
    assert_eq!(edge_set(&engine), after_first);
}

#[test]
fn toggling_clustering_flips_the_flag_and_keeps_nodes_placed() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    assert!(!engine.clustering_enabled());

    engine.toggle_clustering();
    assert!(engine.clustering_enabled());
    for id in ["a", "b", "c", "x", "y"] {
        let p = engine.positions()[id];
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    engine.toggle_clustering();
    assert!(!engine.clustering_enabled());
}

#[test]
fn detached_members_rejoin_on_reattach() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    engine.detach_from_cluster("c");
    engine.toggle_clustering();
    // Containment is a soft force; the observable contract is that the
    // command pair round-trips without disturbing derived clusters.
    engine.reattach_to_cluster("c");
    assert_eq!(engine.clusters().len(), 1);
}
