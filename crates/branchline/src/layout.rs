//! Layered layout.
//!
//! Coordinates are assigned per placement kind:
//!
//! ```text
//!                  prologue                      detached row ─►
//!                    root
//!          child   child   child                 (layer 1)
//!              ...
//!               secondary root                   (feeder layer + 1, gapped)
//!            sub     sub
//! ```
//!
//! Tree nodes are grouped by depth into layers and spread around the
//! centerline in discovery order. The secondary-root subtree forms its own
//! layers below the deepest feeder. The prologue and the standalone detached
//! nodes have fixed positions independent of depth.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, info, trace};
use serde::Serialize;

use branchline_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

use crate::{config::LayoutConfig, structure::Graph, subtree::SubtreeInfo, tree::ShortestPathTree};

/// How a node obtained its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementKind {
    /// Main tree node, positioned by depth and sibling index.
    Tree,
    /// The secondary root, forced onto the centerline.
    SecondaryRoot,
    /// Descendant of the secondary root.
    Subtree,
    /// The prologue node above the root.
    Prologue,
    /// Standalone detached node in the satellite row.
    Detached,
}

/// Position of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    #[serde(flatten)]
    point: Point,
    kind: PlacementKind,
}

impl Placement {
    pub fn point(&self) -> Point {
        self.point
    }

    pub fn kind(&self) -> PlacementKind {
        self.kind
    }
}

/// Coordinates of every positioned node, in placement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    placements: IndexMap<Id, Placement>,
}

impl Layout {
    pub fn get(&self, id: Id) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.get(id).map(Placement::point)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.placements.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &Placement)> {
        self.placements.iter().map(|(id, placement)| (*id, placement))
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Smallest box holding every node centre.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.placements.values().map(Placement::point))
    }

    /// Returns `false` when `id` already had a position.
    fn place(&mut self, id: Id, point: Point, kind: PlacementKind) -> bool {
        if self.placements.contains_key(&id) {
            return false;
        }
        self.placements.insert(id, Placement { point, kind });
        true
    }
}

/// Assigns coordinates to the nodes of one render pass.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Computes the layout.
    ///
    /// Every tree node, the prologue and every standalone detached node gets
    /// exactly one position. Identical input yields identical output.
    pub fn layout(&self, graph: &Graph, tree: &ShortestPathTree, subtree: &SubtreeInfo) -> Layout {
        let config = &self.config;
        let mut layout = Layout::default();

        let mut layers: BTreeMap<usize, Vec<Id>> = BTreeMap::new();
        let mut subtree_layers: BTreeMap<usize, Vec<Id>> = BTreeMap::new();
        for (id, depth) in tree.iter() {
            layers.entry(depth).or_default().push(id);
            if subtree.in_subtree(id) {
                subtree_layers.entry(depth).or_default().push(id);
            }
        }

        // Subtree nodes keep their slot in the global layer.
        for (depth, layer) in &layers {
            let y = *depth as f32 * config.layer_height() + config.base_y();
            for (index, id) in layer.iter().enumerate() {
                if !subtree.in_subtree(*id) {
                    let x = self.sibling_x(index, layer.len());
                    layout.place(*id, Point::new(x, y), PlacementKind::Tree);
                }
            }
        }

        let secondary = subtree
            .secondary_root()
            .and_then(|id| tree.depth(id).map(|depth| (id, depth)));
        if let Some((secondary_id, secondary_depth)) = secondary {
            let secondary_y = (subtree.feeder_depth() + 1) as f32 * config.layer_height()
                + config.secondary_root_gap()
                + config.secondary_root_offset();

            for (depth, layer) in &subtree_layers {
                let relative = depth.saturating_sub(secondary_depth) as f32;
                let y = secondary_y + relative * config.layer_height();
                for (index, id) in layer.iter().enumerate() {
                    if *id == secondary_id {
                        layout.place(
                            *id,
                            Point::new(config.center_x(), secondary_y),
                            PlacementKind::SecondaryRoot,
                        );
                    } else {
                        let x = self.sibling_x(index, layer.len());
                        layout.place(*id, Point::new(x, y), PlacementKind::Subtree);
                    }
                }
            }
            debug!(
                secondary_y,
                feeder_depth = subtree.feeder_depth(),
                nodes = subtree.subtree_ids().len();
                "Secondary-root section placed"
            );
        }

        if let Some(prologue) = graph.prologue() {
            layout.place(
                prologue,
                Point::new(config.center_x(), config.prologue_y()),
                PlacementKind::Prologue,
            );
        }

        let row_start = config.center_x() + config.detached_offset_x();
        let mut slot = 0;
        for id in graph.standalone_detached_ids() {
            let x = row_start + slot as f32 * config.detached_pitch();
            if layout.place(id, Point::new(x, config.detached_y()), PlacementKind::Detached) {
                slot += 1;
            }
        }

        info!(
            placed = layout.len(),
            layers = layers.len();
            "Layout computed"
        );
        trace!(layout:?; "Placements");

        layout
    }

    /// Siblings are centered around the centerline.
    ///
    /// A single node sits half a spacing left of the centerline; this keeps
    /// pixel-compatible output with existing renderings.
    fn sibling_x(&self, index: usize, count: usize) -> f32 {
        (index as f32 - count as f32 / 2.0) * self.config.sibling_spacing() + self.config.center_x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{EngineConfig, LoopBackTargets},
        structure::GraphModel,
    };
    use branchline_document::{builder::GraphDocumentBuilder, record::GraphDocument};
    use float_cmp::approx_eq;

    fn run(doc: &GraphDocument) -> Layout {
        let graph = GraphModel::new(&EngineConfig::default()).build_degraded(doc);
        let tree = ShortestPathTree::from_graph(&graph);
        let subtree = SubtreeInfo::classify(&graph, &tree, LoopBackTargets::default());
        LayoutEngine::default().layout(&graph, &tree, &subtree)
    }

    fn at(layout: &Layout, id: &str) -> (f32, f32) {
        let point = layout.position(Id::new(id)).unwrap();
        (point.x(), point.y())
    }

    #[test]
    fn test_layers_and_siblings() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("r", "b", "")
            .build();
        let layout = run(&doc);

        assert_eq!(at(&layout, "r"), (1400.0, 100.0));
        assert_eq!(at(&layout, "a"), (1300.0, 320.0));
        assert_eq!(at(&layout, "b"), (1500.0, 320.0));
        assert_eq!(layout.get(Id::new("a")).unwrap().kind(), PlacementKind::Tree);
    }

    #[test]
    fn test_secondary_root_section() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("a", "b", "")
            .edge("b", "p2", "")
            .edge("r", "p2", "")
            .edge("p2", "c", "")
            .edge("p2", "d", "")
            .secondary_root("p2")
            .build();
        let layout = run(&doc);

        // feeder depth 2 -> (2 + 1) * 220 + 100 + 100
        assert_eq!(at(&layout, "p2"), (1500.0, 860.0));
        assert_eq!(at(&layout, "c"), (1300.0, 1080.0));
        assert_eq!(at(&layout, "d"), (1500.0, 1080.0));
        // Depth 1 holds [a, p2] and depth 2 holds [b, c, d].
        assert_eq!(at(&layout, "a"), (1300.0, 320.0));
        assert_eq!(at(&layout, "b"), (1200.0, 540.0));
        assert_eq!(
            layout.get(Id::new("p2")).unwrap().kind(),
            PlacementKind::SecondaryRoot
        );
    }

    #[test]
    fn test_prologue_and_detached_row() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("y", "z", "")
            .prologue("t")
            .detached("y")
            .detached("z")
            .build();
        let layout = run(&doc);

        assert_eq!(at(&layout, "t"), (1500.0, -150.0));
        assert_eq!(at(&layout, "y"), (1780.0, 50.0));
        assert_eq!(at(&layout, "z"), (2000.0, 50.0));
        assert_eq!(layout.len(), 5);
    }

    #[test]
    fn test_main_node_shares_layer_with_secondary_root() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("r", "p2", "")
            .edge("p2", "c", "")
            .secondary_root("p2")
            .build();
        let layout = run(&doc);

        assert_eq!(at(&layout, "a"), (1300.0, 320.0));
        assert_eq!(layout.get(Id::new("a")).unwrap().kind(), PlacementKind::Tree);
        assert_eq!(
            layout.get(Id::new("c")).unwrap().kind(),
            PlacementKind::Subtree
        );
    }

    #[test]
    fn test_detached_row_skips_already_placed_nodes() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .prologue("y")
            .detached("y")
            .detached("z")
            .build();
        let layout = run(&doc);

        assert_eq!(layout.get(Id::new("y")).unwrap().kind(), PlacementKind::Prologue);
        assert_eq!(at(&layout, "z"), (1780.0, 50.0));
    }

    #[test]
    fn test_absorbed_detached_gets_tree_position() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("a", "z", "")
            .detached("z")
            .build();
        let layout = run(&doc);

        let placement = layout.get(Id::new("z")).unwrap();
        assert_eq!(placement.kind(), PlacementKind::Tree);
        assert!(approx_eq!(f32, placement.point().y(), 540.0, ulps = 2));
    }

    #[test]
    fn test_unreachable_nodes_are_not_placed() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .edge("i", "j", "")
            .edge("j", "i", "")
            .build();
        let layout = run(&doc);

        assert!(!layout.contains(Id::new("i")));
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn test_bounds() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "")
            .prologue("t")
            .build();
        let bounds = run(&doc).bounds().unwrap();

        assert!(approx_eq!(f32, bounds.min_y(), -150.0, ulps = 2));
        assert!(approx_eq!(f32, bounds.max_y(), 320.0, ulps = 2));
        assert!(approx_eq!(f32, bounds.width(), 100.0, ulps = 2));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        // =====================================================================
        // Strategies
        // =====================================================================

        /// Random graphs with optional secondary root, prologue and detached nodes.
        fn arb_doc() -> impl Strategy<Value = GraphDocument> {
            (
                prop::collection::vec((0u8..10, 0u8..10), 0..30),
                prop::option::of(1u8..10),
                prop::option::of(1u8..10),
                prop::collection::vec(1u8..10, 0..3),
            )
                .prop_map(|(edges, secondary, prologue, detached)| {
                    let mut builder = GraphDocumentBuilder::new().node("n0", "root");
                    for (source, target) in edges {
                        builder = builder.edge(&format!("n{source}"), &format!("n{target}"), "e");
                    }
                    if let Some(secondary) = secondary {
                        builder = builder.secondary_root(&format!("n{secondary}"));
                    }
                    if let Some(prologue) = prologue {
                        builder = builder.prologue(&format!("n{prologue}"));
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

        fn check_every_reachable_node_placed_once(doc: &GraphDocument) -> Result<(), TestCaseError> {
            let graph = GraphModel::new(&EngineConfig::default()).build_degraded(doc);
            let tree = ShortestPathTree::from_graph(&graph);
            let subtree = SubtreeInfo::classify(&graph, &tree, LoopBackTargets::default());
            let layout = LayoutEngine::default().layout(&graph, &tree, &subtree);

            let mut expected: Vec<Id> = tree.iter().map(|(id, _)| id).collect();
            expected.extend(graph.prologue());
            expected.extend(graph.standalone_detached_ids());
            expected.sort_by_key(|id| id.as_string());
            expected.dedup();

            let mut placed: Vec<Id> = layout.iter().map(|(id, _)| id).collect();
            placed.sort_by_key(|id| id.as_string());

            prop_assert_eq!(placed, expected);
            Ok(())
        }

        fn check_idempotent(doc: &GraphDocument) -> Result<(), TestCaseError> {
            prop_assert_eq!(run(doc), run(doc));
            Ok(())
        }

        fn check_subtree_below_feeder_layer(doc: &GraphDocument) -> Result<(), TestCaseError> {
            let graph = GraphModel::new(&EngineConfig::default()).build_degraded(doc);
            let tree = ShortestPathTree::from_graph(&graph);
            let subtree = SubtreeInfo::classify(&graph, &tree, LoopBackTargets::default());
            let layout = LayoutEngine::default().layout(&graph, &tree, &subtree);
            let floor = (subtree.feeder_depth() + 1) as f32 * LayoutConfig::default().layer_height();

            for id in subtree.subtree_ids() {
                if let Some(point) = layout.position(*id) {
                    prop_assert!(point.y() >= floor);
                }
            }
            Ok(())
        }

        // =====================================================================
        // Property test declarations
        // =====================================================================

        proptest! {
            #[test]
            fn every_reachable_node_placed_once(doc in arb_doc()) {
                check_every_reachable_node_placed_once(&doc)?;
            }

            #[test]
            fn layout_is_idempotent(doc in arb_doc()) {
                check_idempotent(&doc)?;
            }

            #[test]
            fn subtree_below_feeder_layer(doc in arb_doc()) {
                check_subtree_below_feeder_layer(&doc)?;
            }
        }
    }
}
