// src/dag/traversal.rs

//! Graph algorithms shared by the node graph and the field graph.
//!
//! Both operate on a `DiGraphMap<&str, ()>` with edges pointing from a
//! prerequisite to whatever depends on it. Vertices and successors are always
//! visited in ascending id order so results are reproducible.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;

fn sorted_successors<'a>(graph: &DiGraphMap<&'a str, ()>, vertex: &'a str) -> Vec<&'a str> {
    let mut next: Vec<&str> = graph
        .neighbors_directed(vertex, Direction::Outgoing)
        .collect();
    next.sort_unstable();
    next
}

/// Depth-first search for a cycle.
///
/// Returns the ids forming the first cycle found, starting at the vertex that
/// was revisited while still in progress and following the DFS path from
/// there. A self-loop yields a single-element path.
pub fn find_cycle(graph: &DiGraphMap<&str, ()>) -> Option<Vec<String>> {
    let mut roots: Vec<&str> = graph.nodes().collect();
    roots.sort_unstable();

    let mut done: HashSet<&str> = HashSet::new();

    for root in roots {
        if done.contains(root) {
            continue;
        }

        let mut path: Vec<&str> = vec![root];
        let mut in_progress: HashSet<&str> = HashSet::from([root]);
        let mut stack: Vec<(Vec<&str>, usize)> = vec![(sorted_successors(graph, root), 0)];

        while let Some((successors, cursor)) = stack.last_mut() {
            if let Some(&next) = successors.get(*cursor) {
                *cursor += 1;

                if in_progress.contains(next) {
                    let start = path.iter().position(|v| *v == next).unwrap_or(0);
                    return Some(path[start..].iter().map(|v| v.to_string()).collect());
                }
                if done.contains(next) {
                    continue;
                }

                in_progress.insert(next);
                path.push(next);
                stack.push((sorted_successors(graph, next), 0));
            } else {
                stack.pop();
                if let Some(finished) = path.pop() {
                    in_progress.remove(finished);
                    done.insert(finished);
                }
            }
        }
    }

    None
}

/// Lazy topological order (Kahn's algorithm).
///
/// Among vertices whose prerequisites have all been yielded, the smallest id
/// comes first. Cloning the iterator before consuming it gives an independent
/// restart point. On a cyclic graph the vertices on (or behind) a cycle are
/// never yielded.
#[derive(Debug, Clone)]
pub struct TopologicalOrder<'a> {
    graph: DiGraphMap<&'a str, ()>,
    remaining: HashMap<&'a str, usize>,
    ready: BTreeSet<&'a str>,
}

impl<'a> TopologicalOrder<'a> {
    pub fn new(graph: DiGraphMap<&'a str, ()>) -> Self {
        let mut remaining = HashMap::new();
        let mut ready = BTreeSet::new();

        for vertex in graph.nodes() {
            let in_degree = graph
                .neighbors_directed(vertex, Direction::Incoming)
                .count();
            if in_degree == 0 {
                ready.insert(vertex);
            } else {
                remaining.insert(vertex, in_degree);
            }
        }

        Self {
            graph,
            remaining,
            ready,
        }
    }
}

impl<'a> Iterator for TopologicalOrder<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let vertex = self.ready.pop_first()?;

        for successor in self.graph.neighbors_directed(vertex, Direction::Outgoing) {
            if let Some(count) = self.remaining.get_mut(successor) {
                *count -= 1;
                if *count == 0 {
                    self.remaining.remove(successor);
                    self.ready.insert(successor);
                }
            }
        }

        Some(vertex)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.ready.len(), Some(self.ready.len() + self.remaining.len()))
    }
}
