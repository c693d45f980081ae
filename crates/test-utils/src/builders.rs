#![allow(dead_code)]

use fielddag::dag::{DagDocument, Field, GraphModel, Logic, Node};

/// Builder for `DagDocument` to simplify test setup.
pub struct DocumentBuilder {
    doc: DagDocument,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            doc: DagDocument::default(),
        }
    }

    /// Set the document's stored identity.
    pub fn named(mut self, id: &str, name: &str) -> Self {
        self.doc.id = Some(id.to_string());
        self.doc.name = Some(name.to_string());
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.doc.nodes.push(node);
        self
    }

    /// Add a bare node with the given id and label = id.
    pub fn with_plain_node(self, id: &str) -> Self {
        self.with_node(NodeBuilder::new(id).build())
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.doc.fields.push(field);
        self
    }

    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.doc.logics.push(logic);
        self
    }

    /// Link two already-added nodes symmetrically (`from.next` and `to.pre`).
    pub fn with_edge(mut self, from: &str, to: &str) -> Self {
        for node in self.doc.nodes.iter_mut() {
            if node.id == from {
                node.next_node_ids.push(to.to_string());
            }
            if node.id == to {
                node.pre_node_ids.push(from.to_string());
            }
        }
        self
    }

    pub fn build(self) -> DagDocument {
        self.doc
    }

    pub fn load(self) -> GraphModel {
        GraphModel::load(self.doc).expect("Failed to load valid graph from builder")
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Node`.
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            node: Node::new(id, id),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.node.label = label.to_string();
        self
    }

    pub fn input(mut self, field: &str) -> Self {
        self.node.input_fields_ids.push(field.to_string());
        self
    }

    pub fn output(mut self, field: &str) -> Self {
        self.node.output_fields_ids.push(field.to_string());
        self
    }

    pub fn pre(mut self, node: &str) -> Self {
        self.node.pre_node_ids.push(node.to_string());
        self
    }

    pub fn next(mut self, node: &str) -> Self {
        self.node.next_node_ids.push(node.to_string());
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

/// Builder for `Field`.
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            field: Field::new(id, id),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.field.name = name.to_string();
        self
    }

    pub fn depends_on(mut self, field: &str) -> Self {
        self.field.depends_on.push(field.to_string());
        self
    }

    pub fn logic(mut self, text: &str) -> Self {
        self.field.logic = text.to_string();
        self
    }

    pub fn build(self) -> Field {
        self.field
    }
}

/// A logic binding producing `output` from `inputs`.
pub fn logic(output: &str, inputs: &[&str]) -> Logic {
    Logic {
        output_field_id: output.to_string(),
        input_field_ids: inputs.iter().map(|s| s.to_string()).collect(),
        description: format!("{output} from {inputs:?}"),
    }
}

/// Nodes linked in a straight line: `ids[0] -> ids[1] -> ...`.
pub fn chain(ids: &[&str]) -> DocumentBuilder {
    let mut builder = DocumentBuilder::new();
    for id in ids {
        builder = builder.with_plain_node(id);
    }
    for pair in ids.windows(2) {
        builder = builder.with_edge(pair[0], pair[1]);
    }
    builder
}
