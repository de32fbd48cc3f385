//! Semantic node categories.

use branchline_core::{
    category::{CategorySet, NodeCategory},
    identifier::Id,
};

use crate::{structure::Graph, subtree::SubtreeInfo};

/// Computes the category set of any node of a graph.
///
/// Tags accumulate independently; a node with none of them is `default`.
/// `terminal` only applies to regular nodes without outgoing edges that are
/// not halted.
#[derive(Debug, Clone, Copy)]
pub struct NodeClassifier<'a> {
    graph: &'a Graph,
    subtree: &'a SubtreeInfo,
}

impl<'a> NodeClassifier<'a> {
    pub fn new(graph: &'a Graph, subtree: &'a SubtreeInfo) -> Self {
        Self { graph, subtree }
    }

    /// Ordered, non-empty categories of `id`.
    ///
    /// Unknown identifiers are `default`.
    pub fn categories_of(&self, id: Id) -> CategorySet {
        let graph = self.graph;
        if !graph.contains(id) {
            return CategorySet::from_tags([]);
        }

        let is_halt = graph.is_halt(id);
        let checks = [
            (NodeCategory::Detached, graph.is_detached(id)),
            (NodeCategory::Prologue, graph.prologue() == Some(id)),
            (NodeCategory::Root, graph.root() == Some(id)),
            (NodeCategory::SecondaryRoot, graph.secondary_root() == Some(id)),
            (NodeCategory::Halt, is_halt),
            (NodeCategory::SecondaryRootFeeder, self.subtree.is_feeder(id)),
            (NodeCategory::LoopBack, self.subtree.is_loop_back(id)),
            (
                NodeCategory::Terminal,
                graph.is_regular(id) && !graph.has_outgoing(id) && !is_halt,
            ),
        ];

        CategorySet::from_tags(
            checks
                .into_iter()
                .filter_map(|(category, applies)| applies.then_some(category)),
        )
    }
}
