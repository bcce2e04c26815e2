use sociogram_graph::{Edge, EdgeType, Graph, Node};
use sociogram_layout::geom::point;
use sociogram_layout::seed::seed;
use sociogram_layout::{Constraints, LayoutConfig};

fn sample_graph() -> Graph {
    let mut g = Graph::new();
    for id in ["me", "ana", "ben", "cat", "dan", "eve", "solo"] {
        g.add_node(Node::new(id));
    }
    g.add_edge(Edge::new("ana", "ben", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("ben", "cat", EdgeType::Family)).unwrap();
    g.add_edge(Edge::new("me", "dan", EdgeType::RecruitingTree))
        .unwrap();
    g.add_edge(Edge::new("dan", "eve", EdgeType::Referral)).unwrap();
    g
}

#[test]
fn seeding_is_byte_identical_across_runs() {
    let g = sample_graph();
    let cfg = LayoutConfig {
        root: Some("me".to_string()),
        ..Default::default()
    };
    let cons = Constraints::default();

    let a = seed(&g, &cfg, &cons);
    let b = seed(&g, &cfg, &cons);
    assert_eq!(a.len(), b.len());
    for (id, p) in &a {
        let q = b[id];
        assert_eq!(p.x.to_bits(), q.x.to_bits(), "x differs for {id}");
        assert_eq!(p.y.to_bits(), q.y.to_bits(), "y differs for {id}");
    }
}

#[test]
fn every_node_gets_a_position() {
    let g = sample_graph();
    let positions = seed(&g, &LayoutConfig::default(), &Constraints::default());
    assert_eq!(positions.len(), g.node_count());
}

#[test]
fn family_members_sit_on_a_shared_ring() {
    let g = sample_graph();
    let positions = seed(&g, &LayoutConfig::default(), &Constraints::default());

    let members = ["ana", "ben", "cat"];
    let cx = members.iter().map(|id| positions[*id].x).sum::<f64>() / 3.0;
    let cy = members.iter().map(|id| positions[*id].y).sum::<f64>() / 3.0;
    let radii: Vec<f64> = members
        .iter()
        .map(|id| ((positions[*id].x - cx).powi(2) + (positions[*id].y - cy).powi(2)).sqrt())
        .collect();
    for r in &radii {
        assert!((r - radii[0]).abs() < 1e-6, "ring radii differ: {radii:?}");
    }
}

#[test]
fn recruiting_generations_offset_downward_from_the_root() {
    let g = sample_graph();
    let cfg = LayoutConfig {
        root: Some("me".to_string()),
        ..Default::default()
    };
    let positions = seed(&g, &cfg, &Constraints::default());
    assert!(positions["dan"].y > positions["me"].y);
}

#[test]
fn referral_nodes_land_near_their_referrer() {
    let g = sample_graph();
    let cfg = LayoutConfig {
        root: Some("me".to_string()),
        ..Default::default()
    };
    let positions = seed(&g, &cfg, &Constraints::default());
    let d = (positions["eve"] - positions["dan"]).length();
    assert!(d > 0.0, "jitter must prevent exact overlap");
    assert!(d < cfg.ideal_edge_length, "referral seed strayed too far: {d}");
}

#[test]
fn unconnected_nodes_go_to_the_periphery() {
    let g = sample_graph();
    let positions = seed(&g, &LayoutConfig::default(), &Constraints::default());

    let connected: Vec<_> = ["me", "ana", "ben", "cat", "dan", "eve"]
        .iter()
        .map(|id| positions[*id])
        .collect();

    // The loner sits outside the bounding box of everything placed before it.
    let rect = sociogram_layout::geom::bounding_rect(connected.iter().copied()).unwrap();
    let solo = positions["solo"];
    assert!(!rect.contains(solo), "solo node seeded inside the cluster region");
}

#[test]
fn pinned_positions_override_seeding() {
    let g = sample_graph();
    let mut cons = Constraints::default();
    cons.pinned.insert("ben".to_string(), point(9999.0, -4242.0));
    let positions = seed(&g, &LayoutConfig::default(), &cons);
    assert_eq!(positions["ben"], point(9999.0, -4242.0));
}
