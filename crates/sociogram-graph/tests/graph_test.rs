use sociogram_graph::{Edge, EdgeType, Graph, GraphError, Node};

fn graph_with_nodes(ids: &[&str]) -> Graph {
    let mut g = Graph::new();
    for id in ids {
        g.add_node(Node::new(*id));
    }
    g
}

#[test]
fn add_edge_rejects_missing_endpoints() {
    let mut g = graph_with_nodes(&["a"]);
    let err = g
        .add_edge(Edge::new("a", "b", EdgeType::Family))
        .unwrap_err();
    match err {
        GraphError::MissingEndpoint { missing, .. } => assert_eq!(missing, "b"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn add_edge_rejects_self_edges() {
    let mut g = graph_with_nodes(&["a"]);
    let err = g
        .add_edge(Edge::new("a", "a", EdgeType::Business))
        .unwrap_err();
    assert!(matches!(err, GraphError::SelfEdge { .. }));
}

#[test]
fn parallel_edges_of_different_types_are_kept_distinct() {
    let mut g = graph_with_nodes(&["a", "b"]);
    g.add_edge(Edge::new("a", "b", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("a", "b", EdgeType::Referral)).unwrap();
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.neighbors("a"), vec!["b"]);
}

#[test]
fn neighbors_follow_edge_insertion_order() {
    let mut g = graph_with_nodes(&["a", "b", "c", "d"]);
    g.add_edge(Edge::new("a", "c", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("a", "b", EdgeType::Business)).unwrap();
    g.add_edge(Edge::new("d", "a", EdgeType::Referral)).unwrap();
    assert_eq!(g.neighbors("a"), vec!["c", "b", "d"]);
}

#[test]
fn remove_node_drops_incident_edges() {
    let mut g = graph_with_nodes(&["a", "b", "c"]);
    g.add_edge(Edge::new("a", "b", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("b", "c", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("a", "c", EdgeType::Referral)).unwrap();

    assert!(g.remove_node("b"));
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.neighbors("a"), vec!["c"]);
    assert!(!g.remove_node("b"));
}

#[test]
fn components_by_type_only_follow_the_requested_type() {
    let mut g = graph_with_nodes(&["a", "b", "c", "d", "e"]);
    g.add_edge(Edge::new("a", "b", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("b", "c", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("c", "d", EdgeType::Business)).unwrap();
    g.add_edge(Edge::new("d", "e", EdgeType::Family)).unwrap();

    let comps = g.components_by_type(EdgeType::Family, 2);
    assert_eq!(comps, vec![
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        vec!["d".to_string(), "e".to_string()],
    ]);
}

#[test]
fn components_by_type_skip_singletons_below_min_size() {
    let mut g = graph_with_nodes(&["a", "b", "c"]);
    g.add_edge(Edge::new("a", "b", EdgeType::Family)).unwrap();
    let comps = g.components_by_type(EdgeType::Family, 2);
    assert_eq!(comps.len(), 1);
    assert!(!comps[0].contains(&"c".to_string()));
}

#[test]
fn rewire_moves_edges_onto_the_target() {
    let mut g = graph_with_nodes(&["ghost", "real", "x", "y"]);
    g.add_edge(Edge::new("ghost", "x", EdgeType::MentionTogether).with_weight(2.0))
        .unwrap();
    g.add_edge(Edge::new("ghost", "y", EdgeType::Communication))
        .unwrap();

    assert!(g.rewire("ghost", "real"));
    assert!(!g.has_node("ghost"));
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.neighbors("real"), vec!["x", "y"]);
}

#[test]
fn rewire_deduplicates_same_type_edges_with_max_weight() {
    let mut g = graph_with_nodes(&["ghost", "real", "x"]);
    g.add_edge(Edge::new("real", "x", EdgeType::Communication).with_weight(1.5))
        .unwrap();
    g.add_edge(Edge::new("ghost", "x", EdgeType::Communication).with_weight(4.0))
        .unwrap();
    g.add_edge(Edge::new("ghost", "x", EdgeType::Referral).with_weight(0.5))
        .unwrap();

    assert!(g.rewire("ghost", "real"));
    assert_eq!(g.edge_count(), 2);

    let comm: Vec<_> = g
        .edges()
        .filter(|e| e.ty == EdgeType::Communication)
        .collect();
    assert_eq!(comm.len(), 1);
    assert_eq!(comm[0].weight, 4.0);
    assert!(g.edges().any(|e| e.ty == EdgeType::Referral));
}

#[test]
fn rewire_drops_edges_that_would_become_self_edges() {
    let mut g = graph_with_nodes(&["ghost", "real"]);
    g.add_edge(Edge::new("ghost", "real", EdgeType::MentionTogether))
        .unwrap();
    assert!(g.rewire("ghost", "real"));
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn rewire_is_a_no_op_for_unknown_nodes() {
    let mut g = graph_with_nodes(&["a"]);
    assert!(!g.rewire("missing", "a"));
    assert!(!g.rewire("a", "a"));
    assert_eq!(g.node_count(), 1);
}
