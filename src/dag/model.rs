// src/dag/model.rs

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::dag::edges::EdgeSet;
use crate::dag::records::{DagDocument, Field, FieldId, Logic, Node, NodeId};
use crate::dag::traversal::{TopologicalOrder, find_cycle};
use crate::dag::validate::{
    ensure_acyclic, ensure_known, field_graph, shared_output_error, validate_document,
};
use crate::errors::{EntityKind, GraphKind, ValidationError};
use crate::types::ModelOptions;

type Result<T> = std::result::Result<T, ValidationError>;

/// Node data that is not an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeEntry {
    label: String,
    inputs: BTreeSet<FieldId>,
    outputs: BTreeSet<FieldId>,
}

/// A validated node/field dependency graph.
///
/// The model is the sole owner of every node, field and logic binding.
/// It is only ever constructed from input that passed validation, and every
/// mutation validates a candidate before committing it: a rejected call
/// leaves the model exactly as it was.
///
/// Mutations take `&mut self` and queries take `&self`, so the usual borrow
/// rules give "one writer or many readers" without any internal locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphModel {
    options: ModelOptions,
    id: Option<String>,
    name: Option<String>,
    nodes: BTreeMap<NodeId, NodeEntry>,
    edges: EdgeSet,
    fields: BTreeMap<FieldId, Field>,
    /// Logic bindings keyed by their output field.
    logics: BTreeMap<FieldId, Logic>,
}

impl GraphModel {
    /// Build a model from a raw document using default options.
    pub fn load(doc: DagDocument) -> Result<Self> {
        Self::load_with(doc, &ModelOptions::default())
    }

    /// Build a model from a raw document.
    ///
    /// Checks, in order: duplicate ids, dangling references, inconsistent
    /// edges (asymmetric node links, field/logic disagreement, shared
    /// outputs), then cycles in the node graph and in the field graph.
    pub fn load_with(doc: DagDocument, options: &ModelOptions) -> Result<Self> {
        validate_document(&doc, options)?;

        let mut edges = EdgeSet::new();
        let mut nodes = BTreeMap::new();
        for node in doc.nodes {
            edges.add_vertex(&node.id);
            for next in node.next_node_ids.iter() {
                edges.insert(&node.id, next);
            }
            nodes.insert(
                node.id,
                NodeEntry {
                    label: node.label,
                    inputs: node.input_fields_ids.into_iter().collect(),
                    outputs: node.output_fields_ids.into_iter().collect(),
                },
            );
        }

        let model = Self {
            options: *options,
            id: doc.id,
            name: doc.name,
            nodes,
            edges,
            fields: doc.fields.into_iter().map(|f| (f.id.clone(), f)).collect(),
            logics: doc
                .logics
                .into_iter()
                .map(|l| (l.output_field_id.clone(), l))
                .collect(),
        };

        ensure_acyclic(GraphKind::Node, &model.edges.to_graph())?;
        ensure_acyclic(
            GraphKind::Field,
            &field_graph(model.fields.values(), model.logics.values()),
        )?;

        debug!(
            nodes = model.nodes.len(),
            edges = model.edges.edge_count(),
            fields = model.fields.len(),
            logics = model.logics.len(),
            "graph model loaded"
        );

        Ok(model)
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Id of the graph document this model was loaded from, if it had one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Node ids such that every node comes after all of its predecessors.
    ///
    /// Ties are broken by ascending id. The order is computed lazily and
    /// from scratch on every call.
    pub fn topological_order(&self) -> TopologicalOrder<'_> {
        TopologicalOrder::new(self.edges.to_graph())
    }

    /// Field ids such that every field comes after everything it depends on.
    ///
    /// Same tie-break as [`GraphModel::topological_order`].
    pub fn field_evaluation_order(&self) -> TopologicalOrder<'_> {
        TopologicalOrder::new(field_graph(self.fields.values(), self.logics.values()))
    }

    pub fn fields_produced_by(&self, node_id: &str) -> Result<Vec<&Field>> {
        let entry = self.node_entry(node_id)?;
        Ok(self.resolve_fields(&entry.outputs))
    }

    pub fn fields_consumed_by(&self, node_id: &str) -> Result<Vec<&Field>> {
        let entry = self.node_entry(node_id)?;
        Ok(self.resolve_fields(&entry.inputs))
    }

    /// The node as a record, with `preNodeIds` / `nextNodeIds` filled in
    /// from the edge set.
    pub fn node(&self, id: &str) -> Option<Node> {
        let entry = self.nodes.get(id)?;
        Some(Node {
            id: id.to_string(),
            label: entry.label.clone(),
            input_fields_ids: entry.inputs.iter().cloned().collect(),
            output_fields_ids: entry.outputs.iter().cloned().collect(),
            pre_node_ids: self.edges.predecessors_of(id).iter().cloned().collect(),
            next_node_ids: self.edges.successors_of(id).iter().cloned().collect(),
        })
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.get(id)
    }

    /// The logic binding producing `field_id`, if any.
    pub fn logic_for(&self, field_id: &str) -> Option<&Logic> {
        self.logics.get(field_id)
    }

    pub fn predecessors_of(&self, node_id: &str) -> Result<&BTreeSet<NodeId>> {
        self.node_entry(node_id)?;
        Ok(self.edges.predecessors_of(node_id))
    }

    pub fn successors_of(&self, node_id: &str) -> Result<&BTreeSet<NodeId>> {
        self.node_entry(node_id)?;
        Ok(self.edges.successors_of(node_id))
    }

    /// Nodes with no predecessors, in ascending id order.
    pub fn roots(&self) -> Vec<&str> {
        self.edges
            .vertices()
            .filter(|id| self.edges.predecessors_of(id).is_empty())
            .collect()
    }

    /// The first node (by id) listing `field_id` among its outputs.
    pub fn producer_of(&self, field_id: &str) -> Option<&str> {
        self.nodes
            .iter()
            .find(|(_, entry)| entry.outputs.contains(field_id))
            .map(|(id, _)| id.as_str())
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn logic_count(&self) -> usize {
        self.logics.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }

    /// Re-serialize the held graph. Every collection is sorted by id.
    pub fn to_document(&self) -> DagDocument {
        DagDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            nodes: self.nodes.keys().filter_map(|id| self.node(id)).collect(),
            fields: self.fields.values().cloned().collect(),
            logics: self.logics.values().cloned().collect(),
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a node together with the edges named by its `preNodeIds` and
    /// `nextNodeIds`. Neighbours do not need to list the new node back.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        let id = node.id.clone();
        self.try_add_node(node)
            .inspect_err(|e| warn!(node = %id, error = %e, "add_node rejected"))
    }

    fn try_add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(ValidationError::DuplicateId {
                kind: EntityKind::Node,
                id: node.id,
            });
        }

        // A self-reference is allowed through here so that it surfaces as a
        // cycle rather than a dangling id.
        let is_node = |id: &str| id == node.id || self.nodes.contains_key(id);
        let is_field = |id: &str| self.fields.contains_key(id);
        ensure_known(EntityKind::Node, &node.id, &node.pre_node_ids, is_node)?;
        ensure_known(EntityKind::Node, &node.id, &node.next_node_ids, is_node)?;
        ensure_known(EntityKind::Node, &node.id, &node.input_fields_ids, is_field)?;
        ensure_known(EntityKind::Node, &node.id, &node.output_fields_ids, is_field)?;

        if !self.options.shared_outputs {
            for field in node.output_fields_ids.iter() {
                if let Some(producer) = self.producer_of(field) {
                    return Err(shared_output_error(field, producer, &node.id));
                }
            }
        }

        let mut candidate = self.edges.clone();
        candidate.add_vertex(&node.id);
        for pre in node.pre_node_ids.iter() {
            candidate.insert(pre, &node.id);
        }
        for next in node.next_node_ids.iter() {
            candidate.insert(&node.id, next);
        }
        ensure_acyclic(GraphKind::Node, &candidate.to_graph())?;

        debug!(node = %node.id, "node added");
        self.edges = candidate;
        self.nodes.insert(
            node.id,
            NodeEntry {
                label: node.label,
                inputs: node.input_fields_ids.into_iter().collect(),
                outputs: node.output_fields_ids.into_iter().collect(),
            },
        );
        Ok(())
    }

    /// Remove a node and every edge touching it.
    ///
    /// Fields are owned by the graph, not by the node, and stay registered.
    /// Returns the removed node as it looked before removal.
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let removed = self.node(id).ok_or_else(|| {
            let err = not_found(EntityKind::Node, id);
            warn!(node = %id, error = %err, "remove_node rejected");
            err
        })?;

        self.edges.remove_vertex(id);
        self.nodes.remove(id);
        debug!(node = %id, "node removed");
        Ok(removed)
    }

    /// Add the edge `from -> to`.
    ///
    /// Returns `false` if the edge already existed (nothing changes).
    pub fn connect(&mut self, from: &str, to: &str) -> Result<bool> {
        self.try_connect(from, to)
            .inspect_err(|e| warn!(from = %from, to = %to, error = %e, "connect rejected"))
    }

    fn try_connect(&mut self, from: &str, to: &str) -> Result<bool> {
        self.ensure_edge_endpoints(from, to)?;

        if self.edges.contains(from, to) {
            return Ok(false);
        }

        let mut candidate = self.edges.clone();
        candidate.insert(from, to);
        ensure_acyclic(GraphKind::Node, &candidate.to_graph())?;

        debug!(from = %from, to = %to, "edge added");
        self.edges = candidate;
        Ok(true)
    }

    /// Remove the edge `from -> to`.
    ///
    /// Returns `false` if there was no such edge.
    pub fn disconnect(&mut self, from: &str, to: &str) -> Result<bool> {
        self.ensure_edge_endpoints(from, to)
            .inspect_err(|e| warn!(from = %from, to = %to, error = %e, "disconnect rejected"))?;

        let removed = self.edges.remove(from, to);
        if removed {
            debug!(from = %from, to = %to, "edge removed");
        }
        Ok(removed)
    }

    /// Register a new field.
    pub fn add_field(&mut self, field: Field) -> Result<()> {
        let id = field.id.clone();
        self.try_add_field(field)
            .inspect_err(|e| warn!(field = %id, error = %e, "add_field rejected"))
    }

    fn try_add_field(&mut self, field: Field) -> Result<()> {
        if self.fields.contains_key(&field.id) {
            return Err(ValidationError::DuplicateId {
                kind: EntityKind::Field,
                id: field.id,
            });
        }

        let is_field = |id: &str| id == field.id || self.fields.contains_key(id);
        ensure_known(EntityKind::Field, &field.id, &field.depends_on, is_field)?;

        let cycle = {
            let graph = field_graph(
                self.fields.values().chain(std::iter::once(&field)),
                self.logics.values(),
            );
            find_cycle(&graph)
        };
        if let Some(path) = cycle {
            return Err(ValidationError::CycleDetected {
                graph: GraphKind::Field,
                path,
            });
        }

        debug!(field = %field.id, "field added");
        self.fields.insert(field.id.clone(), field);
        Ok(())
    }

    /// Bind `logic` as the producer of `field_id`, replacing any previous
    /// binding.
    ///
    /// The field's `dependendFieldIds` are rewritten to the logic's inputs so
    /// the two stay in agreement. Returns the previous binding.
    pub fn set_field_logic(&mut self, field_id: &str, logic: Logic) -> Result<Option<Logic>> {
        self.try_set_field_logic(field_id, logic)
            .inspect_err(|e| warn!(field = %field_id, error = %e, "set_field_logic rejected"))
    }

    fn try_set_field_logic(&mut self, field_id: &str, logic: Logic) -> Result<Option<Logic>> {
        let current = self
            .fields
            .get(field_id)
            .ok_or_else(|| not_found(EntityKind::Field, field_id))?;

        if logic.output_field_id != field_id {
            return Err(ValidationError::InconsistentEdges(format!(
                "logic for field '{}' names '{}' as its output",
                field_id, logic.output_field_id
            )));
        }

        ensure_known(
            EntityKind::Logic,
            field_id,
            &logic.input_field_ids,
            |id| self.fields.contains_key(id),
        )?;

        let mut updated = current.clone();
        updated.depends_on = Vec::new();
        for input in logic.input_field_ids.iter() {
            if !updated.depends_on.contains(input) {
                updated.depends_on.push(input.clone());
            }
        }

        {
            let graph = field_graph(
                self.fields
                    .values()
                    .filter(|f| f.id != field_id)
                    .chain(std::iter::once(&updated)),
                self.logics
                    .values()
                    .filter(|l| l.output_field_id != field_id)
                    .chain(std::iter::once(&logic)),
            );
            ensure_acyclic(GraphKind::Field, &graph)?;
        }

        debug!(
            field = %field_id,
            inputs = logic.input_field_ids.len(),
            "field logic updated"
        );
        self.fields.insert(field_id.to_string(), updated);
        Ok(self.logics.insert(field_id.to_string(), logic))
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn node_entry(&self, id: &str) -> Result<&NodeEntry> {
        self.nodes
            .get(id)
            .ok_or_else(|| not_found(EntityKind::Node, id))
    }

    fn resolve_fields(&self, ids: &BTreeSet<FieldId>) -> Vec<&Field> {
        ids.iter().filter_map(|id| self.fields.get(id)).collect()
    }

    fn ensure_edge_endpoints(&self, from: &str, to: &str) -> Result<()> {
        if !self.nodes.contains_key(from) {
            return Err(ValidationError::DanglingReference {
                kind: EntityKind::Node,
                id: from.to_string(),
                referenced_by: to.to_string(),
            });
        }
        if !self.nodes.contains_key(to) {
            return Err(ValidationError::DanglingReference {
                kind: EntityKind::Node,
                id: to.to_string(),
                referenced_by: from.to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(kind: EntityKind, id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind,
        id: id.to_string(),
    }
}
