use sociogram::{Engine, EngineConfig};
use sociogram_graph::{Edge, EdgeType, Node};

/// Ghost "gh" shares one Business neighbor with its merge target "t".
fn ingest(engine: &mut Engine) {
    engine
        .set_graph(
            vec![
                Node::new("t"),
                Node::new("n1"),
                Node::new("n2"),
                Node::new("n3"),
                Node::ghost("gh"),
            ],
            vec![
                Edge::new("t", "n1", EdgeType::Business).with_weight(5.0),
                Edge::new("t", "n3", EdgeType::Referral),
                Edge::new("gh", "n1", EdgeType::Business).with_weight(2.0),
                Edge::new("gh", "n2", EdgeType::Referral).with_weight(1.0),
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
fn propose_then_cancel_leaves_the_graph_untouched() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    let nodes_before = engine.graph().node_count();
    let edges_before = edge_set(&engine);

    engine.propose_merge("gh", "t");
    assert!(engine.merge_proposal().is_some());
    engine.cancel_merge();

    assert!(engine.merge_proposal().is_none());
    assert_eq!(engine.graph().node_count(), nodes_before);
    assert_eq!(edge_set(&engine), edges_before);
}

#[test]
fn confirm_removes_the_ghost_and_rewires_with_max_weight_dedupe() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    engine.propose_merge("gh", "t");
    engine.confirm_merge();

    let g = engine.graph();
    assert!(!g.has_node("gh"));
    assert!(engine.merge_proposal().is_none());
    assert!(!engine.positions().contains_key("gh"));

    // The shared Business edge deduplicates at the stronger weight; the
    // ghost's Referral tie transfers intact.
    let to_n1: Vec<_> = g.edges_of("t").filter(|e| e.touches("n1")).collect();
    assert_eq!(to_n1.len(), 1);
    assert_eq!(to_n1[0].weight, 5.0);
    assert!(
        g.edges_of("t")
            .any(|e| e.touches("n2") && e.ty == EdgeType::Referral)
    );
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn merge_commands_without_a_valid_flow_are_noops() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);

    engine.confirm_merge(); // nothing pending
    assert!(engine.graph().has_node("gh"));

    engine.propose_merge("t", "n1"); // proposer must be a ghost
    assert!(engine.merge_proposal().is_none());
    engine.propose_merge("gh", "missing");
    assert!(engine.merge_proposal().is_none());
    engine.propose_merge("gh", "gh");
    assert!(engine.merge_proposal().is_none());

    engine.propose_merge("gh", "t");
    engine.propose_merge("gh", "n1"); // second proposal while pending
    assert_eq!(engine.merge_proposal().unwrap().target, "t");
}

#[test]
fn scorer_output_is_captured_on_the_proposal() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    engine.set_merge_scorer(Box::new(|g, ghost, target| {
        assert!(g.has_node(ghost) && g.has_node(target));
        Some(0.87)
    }));

    engine.propose_merge("gh", "t");
    assert_eq!(engine.merge_proposal().unwrap().score, Some(0.87));
}

#[test]
fn dismissing_a_ghost_removes_it_and_its_edges() {
    let mut engine = Engine::new(EngineConfig::default());
    ingest(&mut engine);
    engine.propose_merge("gh", "t");

    engine.dismiss_ghost("gh");
    assert!(!engine.graph().has_node("gh"));
    assert!(engine.merge_proposal().is_none());
    assert_eq!(engine.graph().edge_count(), 2);

    // Real nodes cannot be dismissed.
    engine.dismiss_ghost("t");
    assert!(engine.graph().has_node("t"));
}
