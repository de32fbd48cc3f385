//! Low-level graph storage.
//!
//! [`GraphInternal`] is a small directed multigraph keyed by [`Id`]. Nodes keep
//! their insertion order, and each node's outgoing and incoming edge lists
//! keep the order in which edges were added. Layout and traversal depend on
//! both orders, so nothing here sorts or hashes away ordering.
//!
//! This is an internal module; `Graph` wraps it with the domain-specific
//! special-node bookkeeping.

use std::collections::HashMap;

use indexmap::IndexMap;

use branchline_core::identifier::Id;

/// Index of an edge inside one [`GraphInternal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) struct EdgeIndex(usize);

/// A directed edge with its payload.
#[derive(Debug)]
struct Edge<E> {
    source: Id,
    target: Id,
    value: E,
}

/// Ordered directed multigraph.
///
/// Self-loops and parallel edges are allowed.
#[derive(Debug)]
pub(super) struct GraphInternal<N, E> {
    nodes: IndexMap<Id, N>,
    edges: Vec<Edge<E>>,
    income_edges: HashMap<Id, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex>>,
}

impl<N, E> GraphInternal<N, E> {
    pub(super) fn new() -> Self {
        GraphInternal {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            income_edges: HashMap::new(),
            outgoing_edges: HashMap::new(),
        }
    }

    /// Returns the node data for the given ID, if it exists.
    pub(super) fn node(&self, id: Id) -> Option<&N> {
        self.nodes.get(&id)
    }

    /// Node IDs and data in insertion order.
    pub(super) fn nodes(&self) -> impl Iterator<Item = (Id, &N)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Node IDs in insertion order.
    pub(super) fn node_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.keys().copied()
    }

    pub(super) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All edges as `(source, target, value)` in insertion order.
    pub(super) fn edges(&self) -> impl Iterator<Item = (Id, Id, &E)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target, &edge.value))
    }

    pub(super) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if some edge `source -> target` exists.
    pub(super) fn has_edge(&self, source: Id, target: Id) -> bool {
        self.outgoing_nodes(source).any(|id| id == target)
    }

    /// Returns `true` if the node has at least one incoming edge.
    pub(super) fn has_incoming(&self, id: Id) -> bool {
        self.income_edges.contains_key(&id)
    }

    /// Returns `true` if the node has at least one outgoing edge.
    pub(super) fn has_outgoing(&self, id: Id) -> bool {
        self.outgoing_edges.contains_key(&id)
    }

    /// Node IDs with no incoming edges, in insertion order.
    pub(super) fn roots(&self) -> impl Iterator<Item = Id> + '_ {
        self.node_ids().filter(|id| !self.has_incoming(*id))
    }

    /// Targets of the node's outgoing edges, in edge order.
    ///
    /// Parallel edges yield the target once per edge.
    pub(super) fn outgoing_nodes(&self, source_id: Id) -> impl Iterator<Item = Id> + '_ {
        self.outgoing_edges
            .get(&source_id)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[idx.0].target)
    }

    /// Sources of the node's incoming edges, in edge order.
    pub(super) fn incoming_nodes(&self, target_id: Id) -> impl Iterator<Item = Id> + '_ {
        self.income_edges
            .get(&target_id)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[idx.0].source)
    }

    /// Adds a node, replacing the data of an existing one in place.
    pub(super) fn add_node(&mut self, id: Id, node: N) {
        self.nodes.insert(id, node);
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// # Panics
    /// Panics in debug mode if either endpoint does not exist. Callers filter
    /// dangling references before adding edges.
    pub(super) fn add_edge(&mut self, source_id: Id, target_id: Id, edge: E) -> EdgeIndex {
        debug_assert!(
            self.nodes.contains_key(&source_id),
            "Adding edge: source node {source_id} does not exist",
        );
        debug_assert!(
            self.nodes.contains_key(&target_id),
            "Adding edge: target node {target_id} does not exist",
        );

        self.edges.push(Edge {
            source: source_id,
            target: target_id,
            value: edge,
        });

        let idx = EdgeIndex(self.edges.len() - 1);
        self.outgoing_edges.entry(source_id).or_default().push(idx);
        self.income_edges.entry(target_id).or_default().push(idx);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> GraphInternal<(), u32> {
        let mut graph = GraphInternal::new();
        for node in nodes {
            graph.add_node(Id::new(node), ());
        }
        for (weight, (source, target)) in edges.iter().enumerate() {
            graph.add_edge(Id::new(source), Id::new(target), weight as u32);
        }
        graph
    }

    fn ids(iter: impl Iterator<Item = Id>) -> Vec<String> {
        iter.map(|id| id.as_string()).collect()
    }

    #[test]
    fn test_graph_new() {
        let graph: GraphInternal<(), u32> = GraphInternal::new();

        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.edges_count(), 0);
        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_node_order_is_insertion_order() {
        let graph = graph(&["c", "a", "b"], &[]);

        assert_eq!(ids(graph.node_ids()), ["c", "a", "b"]);
        assert!(graph.contains_node(Id::new("a")));
        assert!(graph.node(Id::new("missing")).is_none());
    }

    #[test]
    fn test_outgoing_and_incoming_keep_edge_order() {
        let graph = graph(
            &["a", "b", "c", "d"],
            &[("a", "c"), ("a", "b"), ("d", "b"), ("a", "d")],
        );

        assert_eq!(ids(graph.outgoing_nodes(Id::new("a"))), ["c", "b", "d"]);
        assert_eq!(ids(graph.incoming_nodes(Id::new("b"))), ["a", "d"]);
        assert!(graph.has_edge(Id::new("d"), Id::new("b")));
        assert!(!graph.has_edge(Id::new("b"), Id::new("d")));
    }

    #[test]
    fn test_roots() {
        let graph = graph(&["root1", "root2", "child"], &[("root1", "child")]);

        assert_eq!(ids(graph.roots()), ["root1", "root2"]);
        assert!(!graph.has_outgoing(Id::new("child")));
    }

    #[test]
    fn test_self_loop_is_not_a_root() {
        let graph = graph(&["a"], &[("a", "a")]);

        assert_eq!(graph.roots().count(), 0);
        assert_eq!(ids(graph.outgoing_nodes(Id::new("a"))), ["a"]);
    }

    #[test]
    fn test_parallel_edges() {
        let graph = graph(&["a", "b"], &[("a", "b"), ("a", "b"), ("b", "a")]);

        assert_eq!(graph.edges_count(), 3);
        assert_eq!(graph.outgoing_nodes(Id::new("a")).count(), 2);
        let weights: Vec<u32> = graph.edges().map(|(_, _, w)| *w).collect();
        assert_eq!(weights, [0, 1, 2]);
    }

    #[test]
    fn test_missing_node_has_no_neighbours() {
        let graph = graph(&["a"], &[]);

        assert_eq!(graph.outgoing_nodes(Id::new("ghost")).count(), 0);
        assert_eq!(graph.incoming_nodes(Id::new("ghost")).count(), 0);
    }
}
