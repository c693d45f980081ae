// src/dag/edges.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graphmap::DiGraphMap;

use crate::dag::records::NodeId;

static NO_NEIGHBOURS: BTreeSet<NodeId> = BTreeSet::new();

/// Per-node adjacency: both directions of every edge touching the node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Adjacency {
    /// Nodes with an edge into this one.
    pre: BTreeSet<NodeId>,
    /// Nodes this one has an edge into.
    next: BTreeSet<NodeId>,
}

/// The node-level edge set.
///
/// Each edge is recorded once through [`EdgeSet::insert`] / [`EdgeSet::remove`],
/// which update both index views together, so `pre` and `next` can never
/// disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    nodes: BTreeMap<NodeId, Adjacency>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, id: &str) {
        self.nodes.entry(id.to_string()).or_default();
    }

    /// Remove a vertex along with every incident edge.
    ///
    /// Returns `false` if the vertex was not present.
    pub fn remove_vertex(&mut self, id: &str) -> bool {
        let Some(adj) = self.nodes.remove(id) else {
            return false;
        };

        for pre in adj.pre.iter() {
            if let Some(other) = self.nodes.get_mut(pre) {
                other.next.remove(id);
            }
        }
        for next in adj.next.iter() {
            if let Some(other) = self.nodes.get_mut(next) {
                other.pre.remove(id);
            }
        }

        true
    }

    /// Insert the edge `from -> to`, registering missing endpoints.
    ///
    /// Returns `true` if the edge is new.
    pub fn insert(&mut self, from: &str, to: &str) -> bool {
        let added = self
            .nodes
            .entry(from.to_string())
            .or_default()
            .next
            .insert(to.to_string());
        self.nodes
            .entry(to.to_string())
            .or_default()
            .pre
            .insert(from.to_string());
        added
    }

    /// Remove the edge `from -> to`. Returns `true` if it existed.
    pub fn remove(&mut self, from: &str, to: &str) -> bool {
        let removed = match self.nodes.get_mut(from) {
            Some(adj) => adj.next.remove(to),
            None => false,
        };
        if let Some(adj) = self.nodes.get_mut(to) {
            adj.pre.remove(from);
        }
        removed
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.nodes
            .get(from)
            .map(|adj| adj.next.contains(to))
            .unwrap_or(false)
    }

    /// Immediate predecessors of a node (derived `preNodeIds`).
    pub fn predecessors_of(&self, id: &str) -> &BTreeSet<NodeId> {
        self.nodes
            .get(id)
            .map(|adj| &adj.pre)
            .unwrap_or(&NO_NEIGHBOURS)
    }

    /// Immediate successors of a node (derived `nextNodeIds`).
    pub fn successors_of(&self, id: &str) -> &BTreeSet<NodeId> {
        self.nodes
            .get(id)
            .map(|adj| &adj.next)
            .unwrap_or(&NO_NEIGHBOURS)
    }

    /// All vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// All edges as `(from, to)` pairs, ordered by `from` then `to`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(|(from, adj)| {
            adj.next
                .iter()
                .map(move |to| (from.as_str(), to.as_str()))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|adj| adj.next.len()).sum()
    }

    /// Build the shared adjacency abstraction used by cycle detection and
    /// ordering.
    ///
    /// Edge direction: predecessor -> successor.
    pub fn to_graph(&self) -> DiGraphMap<&str, ()> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for id in self.vertices() {
            graph.add_node(id);
        }
        for (from, to) in self.edges() {
            graph.add_edge(from, to, ());
        }

        graph
    }
}
