use kg_layout::explorer::EdgeDirection;
use kg_layout::graph::{EdgeIssueKind, demo_graph, load_graph_json};
use kg_layout::interaction::Emphasis;
use kg_layout::{Category, Filter, GraphExplorer, PointerTarget, SimulationConfig, Viewport};

fn demo_explorer() -> GraphExplorer {
    GraphExplorer::new(
        demo_graph().unwrap(),
        SimulationConfig::default(),
        Viewport::new(680.0, 500.0),
    )
}

#[test]
fn area_filter_yields_areas_without_edges() {
    let mut explorer = demo_explorer();
    explorer.set_filter(Filter::Only(Category::Area));

    let ids = explorer
        .frame()
        .vertices
        .into_iter()
        .map(|vertex| vertex.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["ILD", "ONCO", "CARDIO"]);
    assert!(explorer.frame().edges.is_empty());
}

#[test]
fn vertex_hover_emphasizes_exactly_its_incident_edges() {
    let mut explorer = demo_explorer();
    explorer.on_hover(PointerTarget::Vertex("NINT"));

    let frame = explorer.frame();
    let nint = frame
        .vertices
        .iter()
        .position(|vertex| vertex.id == "NINT")
        .unwrap();
    let emphasized = frame
        .edges
        .iter()
        .filter(|edge| edge.emphasis == Emphasis::Emphasized)
        .collect::<Vec<_>>();

    assert_eq!(emphasized.len(), 7);
    assert!(
        emphasized
            .iter()
            .all(|edge| edge.source == nint || edge.target == nint)
    );
    assert!(
        frame
            .edges
            .iter()
            .filter(|edge| edge.emphasis != Emphasis::Emphasized)
            .all(|edge| edge.emphasis == Emphasis::DeEmphasized)
    );

    explorer.on_hover(PointerTarget::None);
    assert!(
        explorer
            .frame()
            .edges
            .iter()
            .all(|edge| edge.emphasis == Emphasis::Neutral)
    );
}

#[test]
fn hover_does_not_touch_kinematic_state() {
    let mut explorer = demo_explorer();
    for _ in 0..10 {
        explorer.tick();
    }
    let nodes = explorer.simulation().nodes().to_vec();
    let alpha = explorer.simulation().alpha();

    explorer.on_hover(PointerTarget::Vertex("ILD"));
    explorer.on_hover(PointerTarget::Edge(3));
    explorer.on_select(Some("ONCO"));

    assert_eq!(explorer.simulation().nodes(), nodes.as_slice());
    assert_eq!(explorer.simulation().alpha(), alpha);
}

#[test]
fn selection_survives_a_filter_only_while_visible() {
    let mut explorer = demo_explorer();
    explorer.on_select(Some("P3"));

    explorer.set_filter(Filter::Only(Category::Paper));
    assert_eq!(explorer.selected_id(), Some("P3"));

    explorer.set_filter(Filter::Only(Category::Model));
    assert_eq!(explorer.selected_id(), None);

    explorer.set_filter(Filter::All);
    assert_eq!(explorer.selected_id(), None);
}

#[test]
fn selection_exposes_attributes_and_incident_edges() {
    let mut explorer = demo_explorer();
    explorer.on_select(Some("P3"));

    let details = explorer.frame().selection.unwrap();
    assert_eq!(details.vertex.category(), Category::Paper);
    assert!(
        details
            .vertex
            .attributes
            .fields()
            .iter()
            .any(|(name, _)| *name == "journal")
    );

    let mut relations = details
        .incident
        .iter()
        .map(|edge| (edge.relation.as_str(), edge.other_id.as_str(), edge.direction))
        .collect::<Vec<_>>();
    relations.sort_by_key(|(relation, _, _)| *relation);
    assert_eq!(
        relations,
        vec![
            ("IN_AREA", "ILD", EdgeDirection::Outgoing),
            ("VALIDATES", "M1", EdgeDirection::Outgoing),
        ]
    );

    explorer.on_select(None);
    assert!(explorer.frame().selection.is_none());
}

#[test]
fn unknown_ids_are_no_ops() {
    let mut explorer = demo_explorer();
    explorer.on_select(Some("ILD"));
    explorer.on_hover(PointerTarget::Vertex("ILD"));
    let before = explorer.frame();

    explorer.on_drag_start("nope");
    explorer.on_drag_move("nope", 1.0, 1.0);
    explorer.on_drag_end("nope");
    explorer.on_hover(PointerTarget::Vertex("nope"));
    explorer.on_hover(PointerTarget::Edge(10_000));
    explorer.on_select(Some("nope"));

    assert_eq!(explorer.frame(), before);
    assert_eq!(explorer.simulation().pinned().count(), 0);
}

#[test]
fn malformed_edges_are_reported_and_skipped() {
    let payload = r#"{
        "nodes": [
            {"id": "A", "label": "Alpha", "type": "area"},
            {"id": "T", "label": "Tee", "type": "target", "pathway": "JAK/STAT"},
            {"id": "C", "label": "Cee", "type": "compound", "approved": ["FDA"]}
        ],
        "edges": [
            {"source": "A", "target": "T", "rel": "KEY_TARGET", "weight": 5},
            {"source": "C", "target": "GHOST", "rel": "INHIBITS", "weight": 4},
            {"source": "T", "target": "T", "rel": "SELF", "weight": 1},
            {"source": "C", "target": "T", "rel": "INHIBITS", "weight": -2}
        ]
    }"#;
    let store = load_graph_json(payload).unwrap();
    let mut explorer = GraphExplorer::new(
        store,
        SimulationConfig::default(),
        Viewport::new(400.0, 300.0),
    );

    let kinds = explorer
        .issues()
        .iter()
        .map(|issue| issue.kind)
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            EdgeIssueKind::MissingTarget,
            EdgeIssueKind::SelfLoop,
            EdgeIssueKind::InvalidWeight,
        ]
    );
    assert_eq!(explorer.frame().edges.len(), 1);
    assert_eq!(explorer.simulation().links().len(), 1);

    explorer.settle();
    assert!(explorer.simulation().is_settled());
    assert!(
        explorer
            .simulation()
            .nodes()
            .iter()
            .all(|node| node.position.x.is_finite() && node.position.y.is_finite())
    );
}

#[test]
fn restart_reheats_a_settled_layout() {
    let mut explorer = demo_explorer();
    explorer.settle();
    explorer.restart(0.8);

    assert_eq!(explorer.simulation().alpha(), 0.8);
    assert!(explorer.settle() > 0);
}
