//! Serializable summary of a render pass.
//!
//! A [`RenderPlan`] is what an external renderer draws: positioned node
//! cards with their category tags, the two link groups and the extent of the
//! drawing.

use serde::Serialize;

use branchline_core::{category::NodeCategory, geometry::Bounds, identifier::Id};
use branchline_document::error::Diagnostic;

use crate::{
    classify::NodeClassifier,
    layout::{Layout, PlacementKind},
    present,
    structure::{Graph, GraphStats, Link},
};

/// Characters per title line on a node card.
pub const TITLE_WRAP_WIDTH: usize = 18;
/// Characters per description line on a node card.
pub const DESCRIPTION_WRAP_WIDTH: usize = 20;

/// One positioned node card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedNode<'a> {
    id: Id,
    title: &'a str,
    title_lines: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    description_lines: Vec<String>,
    x: f32,
    y: f32,
    kind: PlacementKind,
    categories: Vec<NodeCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary: Option<NodeCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    #[serde(skip_serializing_if = "str::is_empty")]
    thumbnail: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    url: &'a str,
}

impl PlannedNode<'_> {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn title_lines(&self) -> &[String] {
        &self.title_lines
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn kind(&self) -> PlacementKind {
        self.kind
    }

    pub fn categories(&self) -> &[NodeCategory] {
        &self.categories
    }

    /// Two-tone presentation hint.
    pub fn secondary(&self) -> Option<NodeCategory> {
        self.secondary
    }

    /// Formatted duration, if known.
    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }
}

/// Everything a renderer needs for one graph.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    root: Option<Id>,
    stats: GraphStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<Bounds>,
    hide_detached_button: bool,
    nodes: Vec<PlannedNode<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unplaced: Vec<Id>,
    tree_links: Vec<Link<'a>>,
    detached_links: Vec<Link<'a>>,
    diagnostics: &'a [Diagnostic],
}

impl<'a> RenderPlan<'a> {
    pub(crate) fn new(graph: &'a Graph, layout: &Layout, classifier: &NodeClassifier<'_>) -> Self {
        let nodes = layout
            .iter()
            .filter_map(|(id, placement)| {
                let node = graph.node(id)?;
                let categories = classifier.categories_of(id);
                Some(PlannedNode {
                    id,
                    title: node.title(),
                    title_lines: present::wrap_text(node.title(), TITLE_WRAP_WIDTH),
                    description_lines: node
                        .description()
                        .map(|text| present::wrap_text(text, DESCRIPTION_WRAP_WIDTH))
                        .unwrap_or_default(),
                    x: placement.point().x(),
                    y: placement.point().y(),
                    kind: placement.kind(),
                    secondary: categories.secondary(),
                    categories: categories.iter().collect(),
                    duration: node.duration().and_then(present::format_duration),
                    thumbnail: node.thumbnail(),
                    url: node.url(),
                })
            })
            .collect();

        let unplaced = graph.node_ids().filter(|id| !layout.contains(*id)).collect();

        let (detached_links, tree_links) = graph
            .links()
            .partition(|link| graph.is_standalone_detached(link.source()));

        Self {
            title: graph.title(),
            root: graph.root(),
            stats: graph.stats(),
            bounds: layout.bounds(),
            hide_detached_button: graph.hide_detached_button(),
            nodes,
            unplaced,
            tree_links,
            detached_links,
            diagnostics: graph.diagnostics(),
        }
    }

    pub fn root(&self) -> Option<Id> {
        self.root
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn nodes(&self) -> &[PlannedNode<'a>] {
        &self.nodes
    }

    /// Looks up a node card by id.
    pub fn node(&self, id: Id) -> Option<&PlannedNode<'a>> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes the tree never reached and that have no fixed position.
    pub fn unplaced(&self) -> &[Id] {
        &self.unplaced
    }

    pub fn tree_links(&self) -> &[Link<'a>] {
        &self.tree_links
    }

    pub fn detached_links(&self) -> &[Link<'a>] {
        &self.detached_links
    }

    /// Serializes the plan as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
