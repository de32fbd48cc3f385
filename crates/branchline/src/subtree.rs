//! Secondary-root subtree and loop-back detection.

use indexmap::IndexSet;
use log::debug;

use branchline_core::identifier::Id;

use crate::{config::LoopBackTargets, structure::Graph, tree::ShortestPathTree};

/// Structural facts derived from the graph and its spanning tree.
///
/// - `subtree`: the secondary root and its tree descendants.
/// - `feeders`: regular nodes with an edge into the secondary root.
/// - `feeder_depth`: deepest tree depth among feeders outside the subtree,
///   `0` when there is none. The secondary-root section is laid out from
///   layer `feeder_depth + 1`.
/// - `loop_back`: regular nodes other than the root and the secondary root
///   with an edge back to one of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtreeInfo {
    secondary_root: Option<Id>,
    subtree: IndexSet<Id>,
    feeders: IndexSet<Id>,
    feeder_depth: usize,
    loop_back: IndexSet<Id>,
}

impl SubtreeInfo {
    pub fn classify(graph: &Graph, tree: &ShortestPathTree, targets: LoopBackTargets) -> Self {
        let secondary_root = graph.secondary_root();

        let subtree: IndexSet<Id> = secondary_root
            .map(|id| tree.descendants(id).into_iter().collect())
            .unwrap_or_default();

        let feeders: IndexSet<Id> = match secondary_root {
            Some(secondary) => graph
                .regular_ids()
                .filter(|id| graph.has_edge(*id, secondary))
                .collect(),
            None => IndexSet::new(),
        };

        let feeder_depth = feeders
            .iter()
            .filter(|id| !subtree.contains(*id))
            .filter_map(|id| tree.depth(*id))
            .max()
            .unwrap_or(0);

        let root = graph.root();
        let loop_targets: Vec<Id> = match targets {
            LoopBackTargets::RootAndSecondary => root.into_iter().chain(secondary_root).collect(),
            LoopBackTargets::RootOnly => root.into_iter().collect(),
        };
        let loop_back: IndexSet<Id> = graph
            .regular_ids()
            .filter(|id| Some(*id) != root && Some(*id) != secondary_root)
            .filter(|id| loop_targets.iter().any(|target| graph.has_edge(*id, *target)))
            .collect();

        debug!(
            subtree = subtree.len(),
            feeders = feeders.len(),
            feeder_depth,
            loop_back = loop_back.len();
            "Subtree classified"
        );

        Self {
            secondary_root,
            subtree,
            feeders,
            feeder_depth,
            loop_back,
        }
    }

    /// The secondary root, if the graph has one.
    pub fn secondary_root(&self) -> Option<Id> {
        self.secondary_root
    }

    /// Secondary root plus descendants, in discovery order.
    pub fn subtree_ids(&self) -> &IndexSet<Id> {
        &self.subtree
    }

    pub fn in_subtree(&self, id: Id) -> bool {
        self.subtree.contains(&id)
    }

    pub fn feeder_ids(&self) -> &IndexSet<Id> {
        &self.feeders
    }

    pub fn is_feeder(&self, id: Id) -> bool {
        self.feeders.contains(&id)
    }

    pub fn feeder_depth(&self) -> usize {
        self.feeder_depth
    }

    pub fn loop_back_ids(&self) -> &IndexSet<Id> {
        &self.loop_back
    }

    pub fn is_loop_back(&self, id: Id) -> bool {
        self.loop_back.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, structure::GraphModel};
    use branchline_document::{builder::GraphDocumentBuilder, record::GraphDocument};

    fn classify(doc: &GraphDocument, targets: LoopBackTargets) -> SubtreeInfo {
        let graph = GraphModel::new(&EngineConfig::default()).build_degraded(doc);
        let tree = ShortestPathTree::from_graph(&graph);
        SubtreeInfo::classify(&graph, &tree, targets)
    }

    fn names(ids: &IndexSet<Id>) -> Vec<String> {
        ids.iter().map(Id::as_string).collect()
    }

    /// r -> a -> b -> p2 -> c -> d, with a shortcut r -> p2.
    fn two_part_doc() -> GraphDocument {
        GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("a", "b", "")
            .edge("b", "p2", "")
            .edge("r", "p2", "")
            .edge("p2", "c", "")
            .edge("c", "d", "")
            .secondary_root("p2")
            .build()
    }

    #[test]
    fn test_subtree_and_feeder_depth() {
        let info = classify(&two_part_doc(), LoopBackTargets::default());

        assert_eq!(names(info.subtree_ids()), ["p2", "c", "d"]);
        assert_eq!(names(info.feeder_ids()), ["r", "b"]);
        assert_eq!(info.feeder_depth(), 2);
    }

    #[test]
    fn test_feeders_inside_subtree_are_ignored_for_depth() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "p2", "")
            .edge("p2", "c", "")
            .edge("c", "p2", "")
            .secondary_root("p2")
            .build();

        let info = classify(&doc, LoopBackTargets::default());
        assert!(info.is_feeder(Id::new("c")));
        assert_eq!(info.feeder_depth(), 0);
    }

    #[test]
    fn test_no_secondary_root() {
        let doc = GraphDocumentBuilder::new().edge("r", "a", "").build();

        let info = classify(&doc, LoopBackTargets::default());
        assert!(info.subtree_ids().is_empty());
        assert_eq!(info.feeder_depth(), 0);
        assert_eq!(info.secondary_root(), None);
    }

    #[test]
    fn test_loop_back_targets() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("a", "r", "restart")
            .edge("a", "p2", "")
            .edge("p2", "b", "")
            .edge("b", "p2", "again")
            .secondary_root("p2")
            .build();

        let both = classify(&doc, LoopBackTargets::RootAndSecondary);
        assert_eq!(names(both.loop_back_ids()), ["a", "b"]);

        let root_only = classify(&doc, LoopBackTargets::RootOnly);
        assert_eq!(names(root_only.loop_back_ids()), ["a"]);
    }

    #[test]
    fn test_root_self_loop_is_not_loop_back() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .outgoing_only("r", "r", "again")
            .incoming_only("r", "r", "again")
            .build();

        let info = classify(&doc, LoopBackTargets::default());
        assert!(info.loop_back_ids().is_empty());
    }
}
