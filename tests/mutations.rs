use std::error::Error;

use fielddag::dag::{Field, GraphModel};
use fielddag::errors::{EntityKind, GraphKind, ValidationError};
use fielddag_test_utils::builders::{DocumentBuilder, FieldBuilder, NodeBuilder, chain, logic};
use fielddag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn abc() -> GraphModel {
    chain(&["A", "B", "C"]).load()
}

fn with_fields() -> GraphModel {
    DocumentBuilder::new()
        .with_node(NodeBuilder::new("src").output("a").output("b").build())
        .with_node(NodeBuilder::new("calc").input("a").input("b").output("c").build())
        .with_edge("src", "calc")
        .with_field(FieldBuilder::new("a").build())
        .with_field(FieldBuilder::new("b").build())
        .with_field(FieldBuilder::new("c").logic("a + b").build())
        .load()
}

fn ids(fields: Vec<&Field>) -> Vec<&str> {
    fields.into_iter().map(|f| f.id.as_str()).collect()
}

#[test]
fn closing_a_chain_into_a_loop_is_rejected() {
    init_tracing();
    let mut model = abc();
    let before = model.clone();

    let err = model.connect("C", "A").unwrap_err();

    assert_eq!(
        err,
        ValidationError::CycleDetected {
            graph: GraphKind::Node,
            path: vec!["A".into(), "B".into(), "C".into()],
        }
    );
    assert_eq!(model, before);
    assert_eq!(model.topological_order().collect::<Vec<_>>(), vec!["A", "B", "C"]);
}

#[test]
fn connect_adds_edge_once() -> TestResult {
    let mut model = abc();

    assert!(model.connect("A", "C")?);
    assert!(!model.connect("A", "C")?);
    assert_eq!(model.edge_count(), 3);

    let c = model.node("C").unwrap();
    assert_eq!(c.pre_node_ids, vec!["A".to_string(), "B".to_string()]);

    Ok(())
}

#[test]
fn connect_to_unknown_node_is_dangling() {
    let mut model = abc();

    let err = model.connect("A", "Z").unwrap_err();
    assert_eq!(
        err,
        ValidationError::DanglingReference {
            kind: EntityKind::Node,
            id: "Z".into(),
            referenced_by: "A".into(),
        }
    );
}

#[test]
fn disconnect_with_unknown_endpoint_is_dangling() {
    let mut model = abc();
    let before = model.clone();

    let err = model.disconnect("A", "Z").unwrap_err();
    assert_eq!(
        err,
        ValidationError::DanglingReference {
            kind: EntityKind::Node,
            id: "Z".into(),
            referenced_by: "A".into(),
        }
    );

    let err = model.disconnect("Z", "A").unwrap_err();
    assert!(matches!(err, ValidationError::DanglingReference { ref id, .. } if id == "Z"));
    assert_eq!(model, before);
}

#[test]
fn disconnect_removes_both_views_of_an_edge() -> TestResult {
    let mut model = abc();

    assert!(model.disconnect("A", "B")?);
    assert!(!model.disconnect("A", "B")?);

    assert!(model.successors_of("A")?.is_empty());
    assert!(model.predecessors_of("B")?.is_empty());
    assert_eq!(model.roots(), vec!["A", "B"]);

    Ok(())
}

#[test]
fn add_node_links_neighbours_from_either_side() -> TestResult {
    let mut model = abc();

    model.add_node(NodeBuilder::new("D").pre("C").build())?;
    model.add_node(NodeBuilder::new("root").next("A").build())?;

    assert_eq!(
        model.topological_order().collect::<Vec<_>>(),
        vec!["root", "A", "B", "C", "D"]
    );
    assert!(model.successors_of("C")?.contains("D"));
    assert!(model.predecessors_of("A")?.contains("root"));

    Ok(())
}

#[test]
fn add_node_closing_a_cycle_leaves_graph_untouched() {
    let mut model = abc();
    let before = model.clone();

    let err = model
        .add_node(NodeBuilder::new("X").pre("B").next("A").build())
        .unwrap_err();

    assert_eq!(err.cycle_path(), Some(&["A".to_string(), "B".to_string(), "X".to_string()][..]));
    assert_eq!(model, before);
    assert!(model.node("X").is_none());
}

#[test]
fn add_node_rejects_duplicates_and_unknown_ids() {
    let mut model = with_fields();
    let before = model.clone();

    assert!(matches!(
        model.add_node(NodeBuilder::new("src").build()),
        Err(ValidationError::DuplicateId { kind: EntityKind::Node, .. })
    ));
    assert!(matches!(
        model.add_node(NodeBuilder::new("n").pre("nowhere").build()),
        Err(ValidationError::DanglingReference { ref id, .. }) if id == "nowhere"
    ));
    assert!(matches!(
        model.add_node(NodeBuilder::new("n").input("zzz").build()),
        Err(ValidationError::DanglingReference { ref id, .. }) if id == "zzz"
    ));
    assert!(matches!(
        model.add_node(NodeBuilder::new("n").output("c").build()),
        Err(ValidationError::InconsistentEdges(_))
    ));

    assert_eq!(model, before);
}

#[test]
fn remove_node_drops_edges_but_keeps_fields() -> TestResult {
    let mut model = with_fields();

    let removed = model.remove_node("src")?;
    assert_eq!(removed.next_node_ids, vec!["calc".to_string()]);
    assert_eq!(removed.output_fields_ids, vec!["a".to_string(), "b".to_string()]);

    assert!(model.node("src").is_none());
    assert!(model.predecessors_of("calc")?.is_empty());
    assert_eq!(model.edge_count(), 0);
    assert_eq!(model.field_count(), 3);
    assert_eq!(model.producer_of("a"), None);

    Ok(())
}

#[test]
fn remove_unknown_node_is_not_found() {
    let mut model = abc();

    assert_eq!(
        model.remove_node("nope").unwrap_err(),
        ValidationError::NotFound {
            kind: EntityKind::Node,
            id: "nope".into()
        }
    );
    assert_eq!(model.node_count(), 3);
}

#[test]
fn set_field_logic_binds_and_syncs_dependencies() -> TestResult {
    let mut model = with_fields();

    let previous = model.set_field_logic("c", logic("c", &["b", "a", "b"]))?;
    assert!(previous.is_none());

    let c = model.field("c").unwrap();
    assert_eq!(c.depends_on, vec!["b".to_string(), "a".to_string()]);
    assert_eq!(c.logic, "a + b");
    assert_eq!(model.field_evaluation_order().collect::<Vec<_>>(), vec!["a", "b", "c"]);

    let previous = model.set_field_logic("c", logic("c", &["a"]))?;
    assert_eq!(previous.unwrap().input_field_ids.len(), 3);
    assert_eq!(model.field("c").unwrap().depends_on, vec!["a".to_string()]);

    Ok(())
}

#[test]
fn set_field_logic_rejections_leave_model_untouched() {
    let mut model = with_fields();
    model
        .add_field(FieldBuilder::new("d").depends_on("c").build())
        .unwrap();
    let before = model.clone();

    assert_eq!(
        model.set_field_logic("missing", logic("missing", &[])).unwrap_err(),
        ValidationError::NotFound {
            kind: EntityKind::Field,
            id: "missing".into()
        }
    );
    assert!(matches!(
        model.set_field_logic("c", logic("b", &["a"])),
        Err(ValidationError::InconsistentEdges(_))
    ));
    assert!(matches!(
        model.set_field_logic("c", logic("c", &["ghost"])),
        Err(ValidationError::DanglingReference { kind: EntityKind::Logic, ref id, .. }) if id == "ghost"
    ));
    assert_eq!(
        model.set_field_logic("c", logic("c", &["d"])).unwrap_err(),
        ValidationError::CycleDetected {
            graph: GraphKind::Field,
            path: vec!["c".into(), "d".into()],
        }
    );

    assert_eq!(model, before);
}

#[test]
fn add_field_checks_ids_and_cycles() -> TestResult {
    let mut model = with_fields();

    model.add_field(FieldBuilder::new("e").depends_on("c").build())?;
    assert_eq!(model.field_count(), 4);

    assert!(matches!(
        model.add_field(FieldBuilder::new("a").build()),
        Err(ValidationError::DuplicateId { kind: EntityKind::Field, .. })
    ));
    assert!(matches!(
        model.add_field(FieldBuilder::new("f").depends_on("nope").build()),
        Err(ValidationError::DanglingReference { .. })
    ));
    assert_eq!(
        model
            .add_field(FieldBuilder::new("g").depends_on("g").build())
            .unwrap_err()
            .cycle_path(),
        Some(&["g".to_string()][..])
    );
    assert_eq!(model.field_count(), 4);

    Ok(())
}

#[test]
fn node_field_lookups() -> TestResult {
    let model = with_fields();

    assert_eq!(ids(model.fields_produced_by("src")?), vec!["a", "b"]);
    assert_eq!(ids(model.fields_consumed_by("calc")?), vec!["a", "b"]);
    assert_eq!(ids(model.fields_produced_by("calc")?), vec!["c"]);
    assert!(model.fields_consumed_by("src")?.is_empty());

    assert_eq!(
        model.fields_produced_by("nope").unwrap_err(),
        ValidationError::NotFound {
            kind: EntityKind::Node,
            id: "nope".into()
        }
    );
    assert!(matches!(
        model.fields_consumed_by("nope"),
        Err(ValidationError::NotFound { .. })
    ));

    Ok(())
}
