// src/dag/validate.rs

//! Structural checks over raw records.
//!
//! [`validate_document`] runs the load-time checks in a fixed order:
//! duplicate ids, dangling references, inconsistent edges. Cycle detection
//! needs the assembled adjacency and is run by the model afterwards. The
//! smaller helpers are reused by the mutating operations.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graphmap::DiGraphMap;

use crate::dag::records::{DagDocument, Field, Logic, Node};
use crate::dag::traversal::find_cycle;
use crate::errors::{EntityKind, GraphKind, ValidationError};
use crate::types::{LogicInputsPolicy, ModelOptions};

type Result<T> = std::result::Result<T, ValidationError>;

pub fn validate_document(doc: &DagDocument, options: &ModelOptions) -> Result<()> {
    ensure_unique_ids(doc)?;
    ensure_references_exist(doc)?;
    ensure_symmetric_edges(&doc.nodes)?;
    ensure_single_producer(&doc.nodes, options)?;
    ensure_logic_consistency(doc, options.logic_inputs)?;
    Ok(())
}

fn ensure_unique<'a>(kind: EntityKind, ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn ensure_unique_ids(doc: &DagDocument) -> Result<()> {
    ensure_unique(EntityKind::Node, doc.nodes.iter().map(|n| n.id.as_str()))?;
    ensure_unique(EntityKind::Field, doc.fields.iter().map(|f| f.id.as_str()))?;
    // One logic binding per output field.
    ensure_unique(
        EntityKind::Logic,
        doc.logics.iter().map(|l| l.output_field_id.as_str()),
    )?;
    Ok(())
}

/// Fail with `DanglingReference` for the first id in `refs` that `known`
/// rejects.
pub fn ensure_known<'a>(
    kind: EntityKind,
    referenced_by: &str,
    refs: impl IntoIterator<Item = &'a String>,
    known: impl Fn(&str) -> bool,
) -> Result<()> {
    for id in refs {
        if !known(id) {
            return Err(ValidationError::DanglingReference {
                kind,
                id: id.clone(),
                referenced_by: referenced_by.to_string(),
            });
        }
    }
    Ok(())
}

fn ensure_references_exist(doc: &DagDocument) -> Result<()> {
    let node_ids: HashSet<&str> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
    let field_ids: HashSet<&str> = doc.fields.iter().map(|f| f.id.as_str()).collect();
    let is_node = |id: &str| node_ids.contains(id);
    let is_field = |id: &str| field_ids.contains(id);

    for node in doc.nodes.iter() {
        ensure_known(EntityKind::Node, &node.id, &node.pre_node_ids, is_node)?;
        ensure_known(EntityKind::Node, &node.id, &node.next_node_ids, is_node)?;
        ensure_known(EntityKind::Node, &node.id, &node.input_fields_ids, is_field)?;
        ensure_known(EntityKind::Node, &node.id, &node.output_fields_ids, is_field)?;
    }

    for field in doc.fields.iter() {
        ensure_known(EntityKind::Field, &field.id, &field.depends_on, is_field)?;
    }

    for logic in doc.logics.iter() {
        ensure_known(
            EntityKind::Logic,
            &logic.output_field_id,
            std::iter::once(&logic.output_field_id),
            is_field,
        )?;
        ensure_known(
            EntityKind::Logic,
            &logic.output_field_id,
            &logic.input_field_ids,
            is_field,
        )?;
    }

    Ok(())
}

/// `preNodeIds` and `nextNodeIds` must describe the same edges.
fn ensure_symmetric_edges(nodes: &[Node]) -> Result<()> {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    for node in nodes.iter() {
        for next in node.next_node_ids.iter() {
            let listed = by_id
                .get(next.as_str())
                .map(|other| other.pre_node_ids.contains(&node.id))
                .unwrap_or(false);
            if !listed {
                return Err(ValidationError::InconsistentEdges(format!(
                    "node '{}' lists '{}' in nextNodeIds but '{}' does not list '{}' in preNodeIds",
                    node.id, next, next, node.id
                )));
            }
        }
        for pre in node.pre_node_ids.iter() {
            let listed = by_id
                .get(pre.as_str())
                .map(|other| other.next_node_ids.contains(&node.id))
                .unwrap_or(false);
            if !listed {
                return Err(ValidationError::InconsistentEdges(format!(
                    "node '{}' lists '{}' in preNodeIds but '{}' does not list '{}' in nextNodeIds",
                    node.id, pre, pre, node.id
                )));
            }
        }
    }

    Ok(())
}

fn ensure_single_producer(nodes: &[Node], options: &ModelOptions) -> Result<()> {
    if options.shared_outputs {
        return Ok(());
    }

    let mut producers: HashMap<&str, &str> = HashMap::new();
    for node in nodes.iter() {
        for field in node.output_fields_ids.iter() {
            if let Some(first) = producers.insert(field.as_str(), node.id.as_str()) {
                if first != node.id {
                    return Err(shared_output_error(field, first, &node.id));
                }
            }
        }
    }
    Ok(())
}

pub fn shared_output_error(field: &str, first: &str, second: &str) -> ValidationError {
    ValidationError::InconsistentEdges(format!(
        "field '{field}' is produced by both node '{first}' and node '{second}'"
    ))
}

fn ensure_logic_consistency(doc: &DagDocument, policy: LogicInputsPolicy) -> Result<()> {
    let logics: HashMap<&str, &Logic> = doc
        .logics
        .iter()
        .map(|l| (l.output_field_id.as_str(), l))
        .collect();

    for field in doc.fields.iter() {
        if let Some(logic) = logics.get(field.id.as_str()) {
            check_field_against_logic(field, logic, policy)?;
        }
    }
    Ok(())
}

/// A field's declared dependencies must agree with the inputs of the logic
/// binding that produces it.
pub fn check_field_against_logic(
    field: &Field,
    logic: &Logic,
    policy: LogicInputsPolicy,
) -> Result<()> {
    let declared: BTreeSet<&str> = field.depends_on.iter().map(|s| s.as_str()).collect();
    let inputs: BTreeSet<&str> = logic.input_field_ids.iter().map(|s| s.as_str()).collect();

    let consistent = match policy {
        LogicInputsPolicy::Exact => declared == inputs,
        LogicInputsPolicy::Superset => inputs.is_superset(&declared),
    };

    if consistent {
        Ok(())
    } else {
        Err(ValidationError::InconsistentEdges(format!(
            "field '{}' declares dependencies {:?} but its logic reads {:?}",
            field.id, declared, inputs
        )))
    }
}

/// Build the field dependency graph.
///
/// Edge direction: dependency -> dependent. Logic inputs count as
/// dependencies too, so a cycle through a logic binding is caught even when
/// the field's own list is a strict subset.
pub fn field_graph<'a>(
    fields: impl IntoIterator<Item = &'a Field>,
    logics: impl IntoIterator<Item = &'a Logic>,
) -> DiGraphMap<&'a str, ()> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for field in fields {
        graph.add_node(field.id.as_str());
        for dep in field.depends_on.iter() {
            graph.add_edge(dep.as_str(), field.id.as_str(), ());
        }
    }
    for logic in logics {
        for input in logic.input_field_ids.iter() {
            graph.add_edge(input.as_str(), logic.output_field_id.as_str(), ());
        }
    }

    graph
}

pub fn ensure_acyclic(kind: GraphKind, graph: &DiGraphMap<&str, ()>) -> Result<()> {
    match find_cycle(graph) {
        None => Ok(()),
        Some(path) => Err(ValidationError::CycleDetected { graph: kind, path }),
    }
}
