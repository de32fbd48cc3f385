//! Shortest-path spanning tree.
//!
//! A breadth-first traversal from the root assigns every reachable node its
//! depth and the predecessor that first discovered it. Only edges into
//! regular nodes are followed, and the prologue is never entered; cycles in
//! the graph therefore never become tree edges.

use std::collections::VecDeque;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use branchline_core::identifier::Id;

use crate::structure::Graph;

/// Depth and parent of every node reachable from the root.
///
/// Iteration order is BFS discovery order, which is also the sibling order
/// used by layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortestPathTree {
    root: Option<Id>,
    depth: IndexMap<Id, usize>,
    parent: IndexMap<Id, Option<Id>>,
}

impl ShortestPathTree {
    /// Runs the traversal from `root`.
    ///
    /// A `root` that is not a regular node of `graph` yields an empty tree.
    pub fn build(graph: &Graph, root: Id) -> Self {
        if !graph.is_regular(root) {
            return Self::default();
        }

        let mut depth = IndexMap::new();
        let mut parent = IndexMap::new();
        depth.insert(root, 0);
        parent.insert(root, None);

        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            let next_depth = depth[&id] + 1;
            for target in graph.successors(id) {
                if depth.contains_key(&target) || !Self::is_traversable(graph, target) {
                    continue;
                }
                depth.insert(target, next_depth);
                parent.insert(target, Some(id));
                queue.push_back(target);
            }
        }

        debug!(
            root:% = root,
            reached = depth.len(),
            max_depth = depth.values().max().copied().unwrap_or_default();
            "Shortest-path tree built"
        );
        trace!(depth:?; "Tree depths");

        Self {
            root: Some(root),
            depth,
            parent,
        }
    }

    /// Builds the tree from the graph's own root, if it has one.
    pub fn from_graph(graph: &Graph) -> Self {
        graph
            .root()
            .map(|root| Self::build(graph, root))
            .unwrap_or_default()
    }

    fn is_traversable(graph: &Graph, id: Id) -> bool {
        graph.is_regular(id) && Some(id) != graph.prologue()
    }

    pub fn root(&self) -> Option<Id> {
        self.root
    }

    /// Depth of a reached node.
    pub fn depth(&self, id: Id) -> Option<usize> {
        self.depth.get(&id).copied()
    }

    /// Parent of a reached node; `Some(None)` for the root.
    pub fn parent(&self, id: Id) -> Option<Option<Id>> {
        self.parent.get(&id).copied()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.depth.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Nodes with their depth, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, usize)> + '_ {
        self.depth.iter().map(|(id, depth)| (*id, *depth))
    }

    /// Children of a node in discovery order.
    pub fn children(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        self.parent
            .iter()
            .filter(move |(_, parent)| **parent == Some(id))
            .map(|(child, _)| *child)
    }

    /// The node and all of its tree descendants, in discovery order.
    pub fn descendants(&self, id: Id) -> Vec<Id> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut found = vec![id];
        let mut next = 0;
        while next < found.len() {
            let current = found[next];
            found.extend(self.children(current));
            next += 1;
        }
        found
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.depth.values().max().copied()
    }

    /// Materializes the tree as nested [`TreeNode`]s.
    pub fn to_tree_node(&self) -> Option<TreeNode> {
        self.root.map(|root| self.subtree(root))
    }

    fn subtree(&self, id: Id) -> TreeNode {
        TreeNode {
            id,
            children: self.children(id).map(|child| self.subtree(child)).collect(),
        }
    }
}

/// Immutable nested view of the spanning tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    id: Id,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Number of nodes in this subtree, itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}
