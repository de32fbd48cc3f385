//! Highlight propagation and the interaction lock.
//!
//! [`HighlightEngine`] answers "what should light up around this node": its
//! direct successors, its direct predecessors and its transitive ancestry.
//! The ancestry walk starts from every non-detached direct predecessor and
//! never steps through loop-back or detached nodes after that, so an edge
//! returning to the root does not pull the whole graph in.
//!
//! [`InteractionSession`] is the only mutable state. A click locks the
//! current focus; while locked, hovers return the frozen focus unchanged.

use indexmap::IndexSet;
use log::{debug, trace};
use serde::Serialize;

use branchline_core::identifier::Id;

use crate::{config::HighlightConfig, structure::Graph, subtree::SubtreeInfo};

/// Highlight sets around a focal node.
///
/// `direct_incoming` and `indirect_incoming` are disjoint, and neither the
/// focal node nor any loop-back or detached node appears in
/// `indirect_incoming`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    outgoing: IndexSet<Id>,
    direct_incoming: IndexSet<Id>,
    indirect_incoming: IndexSet<Id>,
}

impl Highlight {
    pub fn outgoing(&self) -> &IndexSet<Id> {
        &self.outgoing
    }

    pub fn direct_incoming(&self) -> &IndexSet<Id> {
        &self.direct_incoming
    }

    pub fn indirect_incoming(&self) -> &IndexSet<Id> {
        &self.indirect_incoming
    }

    /// Returns `true` if nothing is highlighted.
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.direct_incoming.is_empty() && self.indirect_incoming.is_empty()
    }
}

/// What an interaction event focused on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Focus {
    /// Nothing is focused.
    #[default]
    None,
    /// A node and its highlight sets.
    Node {
        node: Id,
        #[serde(flatten)]
        highlight: Highlight,
    },
    /// A link; its endpoints are the related nodes.
    Link { source: Id, target: Id },
}

impl Focus {
    /// The highlight sets of a node focus.
    pub fn highlight(&self) -> Option<&Highlight> {
        match self {
            Focus::Node { highlight, .. } => Some(highlight),
            Focus::None | Focus::Link { .. } => None,
        }
    }

    /// Nodes related to a link focus: its two endpoints.
    pub fn related(&self) -> Vec<Id> {
        match self {
            Focus::Link { source, target } => vec![*source, *target],
            Focus::None | Focus::Node { .. } => Vec::new(),
        }
    }
}

/// Lock state of one interaction session.
///
/// Owned by the caller and reset by every new render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionSession {
    locked: bool,
    locked_node: Option<Id>,
    frozen: Focus,
}

impl InteractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The node of a node lock; `None` when unlocked or locked on a link.
    pub fn locked_node(&self) -> Option<Id> {
        self.locked_node
    }

    /// The focus frozen by the current lock.
    pub fn frozen(&self) -> &Focus {
        &self.frozen
    }

    /// Releases the lock.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn lock(&mut self, locked_node: Option<Id>, focus: Focus) {
        self.locked = true;
        self.locked_node = locked_node;
        self.frozen = focus;
    }
}

/// Computes highlight sets over one graph.
#[derive(Debug, Clone, Copy)]
pub struct HighlightEngine<'a> {
    graph: &'a Graph,
    subtree: &'a SubtreeInfo,
    max_hops: usize,
}

impl<'a> HighlightEngine<'a> {
    pub fn new(graph: &'a Graph, subtree: &'a SubtreeInfo, config: &HighlightConfig) -> Self {
        Self {
            graph,
            subtree,
            max_hops: config.max_hops(),
        }
    }

    /// Highlight sets of `focus`; empty when the node is unknown.
    pub fn compute(&self, focus: Id) -> Highlight {
        if !self.graph.contains(focus) {
            debug!(focus:%; "Highlight requested for unknown node");
            return Highlight::default();
        }

        let outgoing: IndexSet<Id> = self.graph.successors(focus).collect();
        let direct_incoming: IndexSet<Id> = self.graph.predecessors(focus).collect();

        let mut visited = IndexSet::new();
        let mut indirect_incoming = IndexSet::new();
        // Only detached incomers are skipped here; loop-back ones still seed the walk.
        for source in &direct_incoming {
            if !self.graph.is_detached(*source) {
                self.collect_ancestors(*source, 0, &mut visited, &mut indirect_incoming);
            }
        }
        indirect_incoming.retain(|id| *id != focus && !direct_incoming.contains(id));

        trace!(
            focus:%,
            outgoing = outgoing.len(),
            direct = direct_incoming.len(),
            indirect = indirect_incoming.len();
            "Highlight computed"
        );

        Highlight {
            outgoing,
            direct_incoming,
            indirect_incoming,
        }
    }

    /// Pointer entered a node.
    ///
    /// Returns the frozen focus while the session is locked, without
    /// touching it.
    pub fn hover(&self, session: &InteractionSession, node: Id) -> Focus {
        if session.is_locked() {
            return session.frozen().clone();
        }
        self.node_focus(node)
    }

    /// Pointer entered a link.
    pub fn hover_link(&self, session: &InteractionSession, source: Id, target: Id) -> Focus {
        if session.is_locked() {
            return session.frozen().clone();
        }
        Focus::Link { source, target }
    }

    /// Node clicked: compute its focus and lock on it.
    pub fn click(&self, session: &mut InteractionSession, node: Id) -> Focus {
        let focus = self.node_focus(node);
        session.lock(Some(node), focus.clone());
        debug!(node:%; "Highlight locked on node");
        focus
    }

    /// Link clicked: lock on the link, with no locked node.
    pub fn click_link(&self, session: &mut InteractionSession, source: Id, target: Id) -> Focus {
        let focus = Focus::Link { source, target };
        session.lock(None, focus.clone());
        debug!(source:%, target:%; "Highlight locked on link");
        focus
    }

    fn node_focus(&self, node: Id) -> Focus {
        Focus::Node {
            node,
            highlight: self.compute(node),
        }
    }

    fn is_barrier(&self, id: Id) -> bool {
        self.subtree.is_loop_back(id) || self.graph.is_detached(id)
    }

    fn collect_ancestors(
        &self,
        current: Id,
        depth: usize,
        visited: &mut IndexSet<Id>,
        found: &mut IndexSet<Id>,
    ) {
        if depth > self.max_hops || !visited.insert(current) {
            return;
        }
        for source in self.graph.predecessors(current) {
            if self.is_barrier(source) {
                continue;
            }
            found.insert(source);
            self.collect_ancestors(source, depth + 1, visited, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{EngineConfig, LoopBackTargets},
        structure::GraphModel,
        tree::ShortestPathTree,
    };
    use branchline_document::{builder::GraphDocumentBuilder, record::GraphDocument};

    struct Fixture {
        graph: Graph,
        subtree: SubtreeInfo,
    }

    impl Fixture {
        fn new(doc: &GraphDocument) -> Self {
            let graph = GraphModel::new(&EngineConfig::default()).build_degraded(doc);
            let tree = ShortestPathTree::from_graph(&graph);
            let subtree = SubtreeInfo::classify(&graph, &tree, LoopBackTargets::default());
            Self { graph, subtree }
        }

        fn engine(&self) -> HighlightEngine<'_> {
            HighlightEngine::new(&self.graph, &self.subtree, &HighlightConfig::default())
        }
    }

    fn ids(set: &IndexSet<Id>) -> Vec<String> {
        set.iter().map(Id::as_string).collect()
    }

    fn cycle_doc() -> GraphDocument {
        GraphDocumentBuilder::new()
            .edge("A", "B", "")
            .edge("B", "C", "")
            .edge("C", "A", "")
            .edge("A", "D", "")
            .build()
    }

    #[test]
    fn test_hover_in_cycle_scenario() {
        let fixture = Fixture::new(&cycle_doc());
        let highlight = fixture.engine().compute(Id::new("B"));

        assert_eq!(ids(highlight.outgoing()), ["C"]);
        assert_eq!(ids(highlight.direct_incoming()), ["A"]);
        // A's only predecessor is C, a loop-back node.
        assert!(highlight.indirect_incoming().is_empty());
    }

    #[test]
    fn test_loop_back_direct_incomer_seeds_walk() {
        let fixture = Fixture::new(&cycle_doc());
        let highlight = fixture.engine().compute(Id::new("A"));

        assert_eq!(ids(highlight.direct_incoming()), ["C"]);
        assert!(fixture.subtree.is_loop_back(Id::new("C")));
        assert_eq!(ids(highlight.indirect_incoming()), ["B"]);
    }

    #[test]
    fn test_indirect_chain() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("a", "b", "")
            .edge("b", "c", "")
            .edge("r", "c", "")
            .build();
        let fixture = Fixture::new(&doc);
        let highlight = fixture.engine().compute(Id::new("c"));

        assert_eq!(ids(highlight.direct_incoming()), ["r", "b"]);
        assert_eq!(ids(highlight.indirect_incoming()), ["a"]);
    }

    #[test]
    fn test_detached_sources_are_barriers() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("a", "b", "")
            .edge("z", "a", "")
            .detached("z")
            .build();
        let fixture = Fixture::new(&doc);
        let highlight = fixture.engine().compute(Id::new("b"));

        assert_eq!(ids(highlight.indirect_incoming()), ["r"]);
    }

    #[test]
    fn test_hop_cap() {
        let mut builder = GraphDocumentBuilder::new();
        for i in 0..20 {
            builder = builder.edge(&format!("n{i}"), &format!("n{}", i + 1), "");
        }
        let fixture = Fixture::new(&builder.build());
        let highlight = fixture.engine().compute(Id::new("n20"));

        assert_eq!(ids(highlight.direct_incoming()), ["n19"]);
        // Walk from n19 at depth 0 to depth 10 adds n18 down to n8.
        assert_eq!(highlight.indirect_incoming().len(), 11);
        assert!(highlight.indirect_incoming().contains(&Id::new("n8")));
        assert!(!highlight.indirect_incoming().contains(&Id::new("n7")));
    }

    #[test]
    fn test_unknown_focus_is_empty() {
        let fixture = Fixture::new(&cycle_doc());

        assert!(fixture.engine().compute(Id::new("ghost")).is_empty());
    }

    #[test]
    fn test_lock_freezes_hover_until_clear() {
        let fixture = Fixture::new(&cycle_doc());
        let engine = fixture.engine();
        let mut session = InteractionSession::new();

        let locked = engine.click(&mut session, Id::new("B"));
        assert!(session.is_locked());
        assert_eq!(session.locked_node(), Some(Id::new("B")));

        assert_eq!(engine.hover(&session, Id::new("D")), locked);

        session.clear();
        assert!(!session.is_locked());
        let hovered = engine.hover(&session, Id::new("D"));
        assert_eq!(ids(hovered.highlight().unwrap().direct_incoming()), ["A"]);
    }

    #[test]
    fn test_hover_does_not_touch_session() {
        let fixture = Fixture::new(&cycle_doc());
        let engine = fixture.engine();
        let session = InteractionSession::new();

        let first = engine.hover(&session, Id::new("C"));
        let second = engine.hover(&session, Id::new("C"));
        assert_eq!(first, second);
        assert_eq!(session, InteractionSession::new());
    }

    #[test]
    fn test_link_lock() {
        let fixture = Fixture::new(&cycle_doc());
        let engine = fixture.engine();
        let mut session = InteractionSession::new();

        let focus = engine.click_link(&mut session, Id::new("A"), Id::new("D"));
        assert!(session.is_locked());
        assert_eq!(session.locked_node(), None);
        assert_eq!(focus.related(), [Id::new("A"), Id::new("D")]);
        assert_eq!(engine.hover(&session, Id::new("B")), focus);
    }

    #[test]
    fn test_focus_json_shape() {
        let fixture = Fixture::new(&cycle_doc());
        let focus = fixture.engine().hover(&InteractionSession::new(), Id::new("B"));

        let json = serde_json::to_value(&focus).unwrap();
        assert_eq!(json["kind"], "node");
        assert_eq!(json["node"], "B");
        assert_eq!(json["outgoing"][0], "C");
        assert_eq!(json["directIncoming"][0], "A");
        assert!(json["indirectIncoming"].as_array().unwrap().is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        // =====================================================================
        // Strategies
        // =====================================================================

        fn arb_doc() -> impl Strategy<Value = GraphDocument> {
            (
                prop::collection::vec((0u8..10, 0u8..10), 1..30),
                prop::collection::vec(0u8..10, 0..3),
            )
                .prop_map(|(edges, detached)| {
                    let mut builder = GraphDocumentBuilder::new();
                    for (source, target) in edges {
                        builder = builder.edge(&format!("n{source}"), &format!("n{target}"), "e");
                    }
                    for id in detached {
                        builder = builder.detached(&format!("n{id}"));
                    }
                    builder.build()
                })
        }

        // =====================================================================
        // Property check functions
        // =====================================================================

        fn check_disjoint_and_exclusions(doc: &GraphDocument) -> Result<(), TestCaseError> {
            let fixture = Fixture::new(doc);
            let engine = fixture.engine();

            for focus in fixture.graph.node_ids() {
                let highlight = engine.compute(focus);
                for id in highlight.indirect_incoming() {
                    prop_assert!(!highlight.direct_incoming().contains(id));
                    prop_assert!(*id != focus);
                    prop_assert!(!fixture.subtree.is_loop_back(*id));
                    prop_assert!(!fixture.graph.is_detached(*id));
                }
            }
            Ok(())
        }

        fn check_hover_idempotent(doc: &GraphDocument) -> Result<(), TestCaseError> {
            let fixture = Fixture::new(doc);
            let engine = fixture.engine();
            let session = InteractionSession::new();

            for focus in fixture.graph.node_ids() {
                prop_assert_eq!(engine.hover(&session, focus), engine.hover(&session, focus));
            }
            Ok(())
        }

        // =====================================================================
        // Property test declarations
        // =====================================================================

        proptest! {
            #[test]
            fn indirect_is_disjoint_and_filtered(doc in arb_doc()) {
                check_disjoint_and_exclusions(&doc)?;
            }

            #[test]
            fn hover_is_idempotent(doc in arb_doc()) {
                check_hover_idempotent(&doc)?;
            }
        }
    }
}
