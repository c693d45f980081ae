use std::error::Error;
use std::path::Path;

use clap::Parser;
use fielddag::cli::{CliArgs, Command};
use fielddag::dag::DagDocument;
use fielddag::document::read_document;
use fielddag::errors::{EntityKind, FieldDagError, ValidationError};
use fielddag::run;
use fielddag_test_utils::builders::{DocumentBuilder, FieldBuilder, NodeBuilder, logic};
use fielddag_test_utils::{init_tracing, write_json};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

/// Two nodes feeding a computed field; written out of id order on purpose.
fn pricing() -> DagDocument {
    DocumentBuilder::new()
        .named("g-1", "pricing")
        .with_node(NodeBuilder::new("calc").input("price").input("qty").output("sum").build())
        .with_node(NodeBuilder::new("load").output("qty").output("price").build())
        .with_edge("load", "calc")
        .with_field(FieldBuilder::new("sum").depends_on("qty").depends_on("price").build())
        .with_field(FieldBuilder::new("qty").build())
        .with_field(FieldBuilder::new("price").build())
        .with_logic(logic("sum", &["price", "qty"]))
        .build()
}

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["fielddag"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn subcommands_parse_with_document_and_flags() {
    let parsed = args(&["order", "g.json", "--fields", "--logic-inputs", "superset"]);
    assert!(matches!(parsed.command, Command::Order { fields: true, .. }));
    assert_eq!(parsed.command.document().unwrap(), Path::new("g.json"));
    assert!(parsed.logic_inputs.is_some());

    let parsed = args(&["fields", "--node", "calc"]);
    assert!(matches!(parsed.command, Command::Fields { ref node, .. } if node == "calc"));
    assert!(parsed.command.document().is_none());

    assert!(CliArgs::try_parse_from(["fielddag", "fields", "g.json"]).is_err());
    assert!(CliArgs::try_parse_from(["fielddag", "validate", "--logic-inputs", "loose"]).is_err());
}

#[test]
fn validate_and_order_succeed_on_a_valid_document() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let doc_path = dir.path().join("pricing.json");
    write_json(&doc_path, &pricing())?;

    run(args(&["validate", path_str(&doc_path)]))?;
    run(args(&["order", path_str(&doc_path)]))?;
    run(args(&["order", path_str(&doc_path), "--fields"]))?;
    run(args(&["fields", path_str(&doc_path), "--node", "calc"]))?;

    Ok(())
}

#[test]
fn normalize_writes_a_sorted_symmetric_document() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let doc_path = dir.path().join("pricing.json");
    let out_path = dir.path().join("normalized.json");
    write_json(&doc_path, &pricing())?;

    run(args(&[
        "normalize",
        path_str(&doc_path),
        "--output",
        path_str(&out_path),
    ]))?;

    let out = read_document(&out_path)?;
    let node_ids: Vec<&str> = out.nodes.iter().map(|n| n.id.as_str()).collect();
    let field_ids: Vec<&str> = out.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(node_ids, vec!["calc", "load"]);
    assert_eq!(field_ids, vec!["price", "qty", "sum"]);
    assert_eq!(out.nodes[0].pre_node_ids, vec!["load".to_string()]);
    assert_eq!(out.nodes[1].next_node_ids, vec!["calc".to_string()]);
    assert_eq!(out.id.as_deref(), Some("g-1"));
    assert_eq!(out.name.as_deref(), Some("pricing"));

    Ok(())
}

#[test]
fn fields_for_unknown_node_is_not_found() -> TestResult {
    let dir = tempdir()?;
    let doc_path = dir.path().join("pricing.json");
    write_json(&doc_path, &pricing())?;

    let err = run(args(&["fields", path_str(&doc_path), "--node", "nope"])).unwrap_err();

    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::NotFound {
            kind: EntityKind::Node,
            id: "nope".into(),
        })
    );
    Ok(())
}

#[test]
fn invalid_document_fails_with_context() -> TestResult {
    let dir = tempdir()?;
    let doc_path = dir.path().join("loop.json");
    let looped = DocumentBuilder::new()
        .with_plain_node("A")
        .with_plain_node("B")
        .with_edge("A", "B")
        .with_edge("B", "A")
        .build();
    write_json(&doc_path, &looped)?;

    let err = run(args(&["validate", path_str(&doc_path)])).unwrap_err();

    assert!(format!("{err:#}").contains("failed to load graph from"));
    match err.downcast_ref::<FieldDagError>() {
        Some(FieldDagError::Validation(inner)) => {
            assert_eq!(inner.cycle_path(), Some(&["A".to_string(), "B".to_string()][..]));
        }
        other => panic!("Expected Validation error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn logic_inputs_flag_overrides_config() -> TestResult {
    let dir = tempdir()?;
    let doc_path = dir.path().join("wide.json");
    // The binding reads `b` although the field only declares `a`.
    let wide = DocumentBuilder::new()
        .with_node(NodeBuilder::new("n").input("a").input("b").output("c").build())
        .with_field(FieldBuilder::new("a").build())
        .with_field(FieldBuilder::new("b").build())
        .with_field(FieldBuilder::new("c").depends_on("a").build())
        .with_logic(logic("c", &["a", "b"]))
        .build();
    write_json(&doc_path, &wide)?;

    assert!(run(args(&["validate", path_str(&doc_path)])).is_err());
    run(args(&[
        "validate",
        path_str(&doc_path),
        "--logic-inputs",
        "superset",
    ]))?;

    Ok(())
}

#[test]
fn document_path_falls_back_to_config() -> TestResult {
    let dir = tempdir()?;
    let doc_path = dir.path().join("from-config.json");
    let cfg_path = dir.path().join("FieldDag.toml");
    write_json(&doc_path, &pricing())?;
    std::fs::write(
        &cfg_path,
        format!("[document]\npath = {:?}\n", path_str(&doc_path)),
    )?;

    run(args(&["--config", path_str(&cfg_path), "validate"]))?;

    std::fs::remove_file(&doc_path)?;
    let err = run(args(&["--config", path_str(&cfg_path), "validate"])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FieldDagError>(),
        Some(FieldDagError::IoError(_))
    ));

    Ok(())
}
