//! The graph model: one document normalized into an in-memory graph.
//!
//! [`GraphModel`] turns a [`GraphDocument`] into a [`Graph`]:
//!
//! - the edge set is the union of every node's `outgoing` list and every
//!   node's `incoming_from` list, with dangling references dropped
//! - special identifiers naming unknown nodes are ignored
//! - detached nodes receiving an edge from a non-detached node are absorbed
//! - the root is selected among the regular nodes
//!
//! Every repair is reported as a [`Diagnostic`] kept on the graph.

use indexmap::IndexSet;
use log::{debug, info, trace, warn};
use serde::Serialize;

use branchline_core::identifier::Id;
use branchline_document::{
    error::{Diagnostic, DocumentError, ErrorCode, Severity},
    record::{GraphDocument, NodeRecord},
    validate::check_integrity,
};

use super::graph_base::GraphInternal;
use crate::config::EngineConfig;

/// Display data of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    title: String,
    description: Option<String>,
    thumbnail: String,
    url: String,
    duration: Option<u64>,
}

impl Node {
    fn from_record(record: &NodeRecord) -> Self {
        Self {
            title: record.title().to_string(),
            description: record.clean_description().map(str::to_string),
            thumbnail: record.thumbnail().to_string(),
            url: record.url().to_string(),
            duration: record.duration(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The display (clean) description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Duration in seconds.
    pub fn duration(&self) -> Option<u64> {
        self.duration
    }
}

/// A directed, labelled edge of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link<'a> {
    source: Id,
    target: Id,
    label: &'a str,
}

impl<'a> Link<'a> {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> &'a str {
        self.label
    }
}

/// Size summary of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of edges.
    pub connections: usize,
}

/// A normalized graph with its special nodes resolved.
///
/// Immutable once built; every derived structure of a render pass borrows it.
#[derive(Debug)]
pub struct Graph {
    title: Option<String>,
    base: GraphInternal<Node, String>,
    root: Option<Id>,
    secondary_root: Option<Id>,
    prologue: Option<Id>,
    halt: IndexSet<Id>,
    detached: IndexSet<Id>,
    absorbed: IndexSet<Id>,
    hide_detached_button: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Graph {
    /// Title of the source document, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.base.node(id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.base.contains_node(id)
    }

    /// Node IDs in document order.
    pub fn node_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.base.node_ids()
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = (Id, &Node)> {
        self.base.nodes()
    }

    /// All edges in insertion order: outgoing lists first, repaired
    /// incoming-only edges after.
    pub fn links(&self) -> impl Iterator<Item = Link<'_>> {
        self.base.edges().map(|(source, target, label)| Link {
            source,
            target,
            label,
        })
    }

    /// Direct successors, in edge order.
    pub fn successors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        self.base.outgoing_nodes(id)
    }

    /// Direct predecessors, in edge order.
    pub fn predecessors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        self.base.incoming_nodes(id)
    }

    pub fn has_outgoing(&self, id: Id) -> bool {
        self.base.has_outgoing(id)
    }

    pub fn has_edge(&self, source: Id, target: Id) -> bool {
        self.base.has_edge(source, target)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.base.nodes_count(),
            connections: self.base.edges_count(),
        }
    }

    /// The selected root, `None` only when no node is eligible.
    pub fn root(&self) -> Option<Id> {
        self.root
    }

    pub fn secondary_root(&self) -> Option<Id> {
        self.secondary_root
    }

    pub fn prologue(&self) -> Option<Id> {
        self.prologue
    }

    pub fn halt_ids(&self) -> &IndexSet<Id> {
        &self.halt
    }

    /// Detached identifiers in document order, absorbed ones included.
    pub fn detached_ids(&self) -> &IndexSet<Id> {
        &self.detached
    }

    /// Detached nodes promoted into the main hierarchy.
    pub fn absorbed_ids(&self) -> &IndexSet<Id> {
        &self.absorbed
    }

    pub fn is_halt(&self, id: Id) -> bool {
        self.halt.contains(&id)
    }

    pub fn is_detached(&self, id: Id) -> bool {
        self.detached.contains(&id)
    }

    pub fn is_absorbed(&self, id: Id) -> bool {
        self.absorbed.contains(&id)
    }

    /// Detached and not absorbed: laid out in the satellite row.
    pub fn is_standalone_detached(&self, id: Id) -> bool {
        self.is_detached(id) && !self.is_absorbed(id)
    }

    /// Member of the regular set: every node except standalone detached ones.
    pub fn is_regular(&self, id: Id) -> bool {
        self.contains(id) && !self.is_standalone_detached(id)
    }

    /// Regular node IDs in document order.
    pub fn regular_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.node_ids().filter(|id| !self.is_standalone_detached(*id))
    }

    /// Standalone detached node IDs in detached-list order.
    pub fn standalone_detached_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.detached
            .iter()
            .copied()
            .filter(|id| !self.is_absorbed(*id))
    }

    pub fn hide_detached_button(&self) -> bool {
        self.hide_detached_button
    }

    /// Findings produced while building the graph.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if a diagnostic with the given code was produced.
    pub fn has_diagnostic(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|d| d.code() == Some(code))
    }
}

/// Builds [`Graph`]s from documents.
///
/// # Example
///
/// ```
/// # use branchline::{config::EngineConfig, structure::GraphModel};
/// # use branchline_document::builder::GraphDocumentBuilder;
/// let doc = GraphDocumentBuilder::new()
///     .edge("a", "b", "next")
///     .build();
///
/// let graph = GraphModel::new(&EngineConfig::default()).build(&doc).unwrap();
/// assert_eq!(graph.root().map(|id| id.as_string()).as_deref(), Some("a"));
/// ```
#[derive(Debug, Clone)]
pub struct GraphModel {
    absorb_detached: bool,
    strict_root: bool,
}

impl GraphModel {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            absorb_detached: config.absorb_detached(),
            strict_root: config.strict_root(),
        }
    }

    /// Builds a graph, failing on any error-level finding.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] holding every diagnostic (warnings
    /// included) when an edge is dangling or unmirrored, when no node can be
    /// the root, or when the root is degenerate under `strict_root`.
    pub fn build(&self, doc: &GraphDocument) -> Result<Graph, DocumentError> {
        let graph = self.build_degraded(doc);
        if graph.diagnostics.iter().any(|d| d.severity().is_error()) {
            return Err(DocumentError::new(graph.diagnostics));
        }
        Ok(graph)
    }

    /// Builds a graph, repairing what it can.
    ///
    /// Dangling edges are dropped and unmirrored edges are added from
    /// whichever side lists them. Findings are kept on the graph.
    pub fn build_degraded(&self, doc: &GraphDocument) -> Graph {
        let mut diagnostics = check_integrity(doc);

        let mut base = GraphInternal::new();
        for (&id, record) in doc.nodes() {
            base.add_node(id, Node::from_record(record));
        }

        for (&id, record) in doc.nodes() {
            for edge in record.outgoing() {
                if let Some(target) = edge.to().filter(|to| base.contains_node(*to)) {
                    base.add_edge(id, target, edge.label().unwrap_or_default().to_string());
                }
            }
        }

        let mut repaired = 0usize;
        for (&id, record) in doc.nodes() {
            for incoming in record.incoming_from() {
                let source = incoming.from();
                if base.contains_node(source) && !base.has_edge(source, id) {
                    base.add_edge(source, id, incoming.label().unwrap_or_default().to_string());
                    repaired += 1;
                }
            }
        }

        let dropped = diagnostics
            .iter()
            .filter(|d| matches!(d.code(), Some(ErrorCode::E200 | ErrorCode::E201)))
            .count();
        if dropped > 0 || repaired > 0 {
            warn!(dropped, repaired; "Edges dropped or repaired while building graph");
        }

        let known = |id: &Id| base.contains_node(*id);
        let secondary_root = doc.secondary_root_id().filter(known);
        let prologue = doc.prologue_id().filter(known);
        let halt: IndexSet<Id> = doc.halt_ids().iter().copied().filter(known).collect();
        let detached: IndexSet<Id> = doc.detached_ids().iter().copied().filter(known).collect();

        let absorbed: IndexSet<Id> = if self.absorb_detached {
            detached
                .iter()
                .copied()
                .filter(|id| base.incoming_nodes(*id).any(|source| !detached.contains(&source)))
                .collect()
        } else {
            IndexSet::new()
        };

        let mut graph = Graph {
            title: doc.title().map(str::to_string),
            base,
            root: None,
            secondary_root,
            prologue,
            halt,
            detached,
            absorbed,
            hide_detached_button: doc.hide_detached_button(),
            diagnostics: Vec::new(),
        };

        graph.root = self.select_root(&graph, &mut diagnostics);
        graph.diagnostics = diagnostics;

        info!(
            nodes = graph.base.nodes_count(),
            edges = graph.base.edges_count(),
            root:? = graph.root;
            "Graph built"
        );
        debug!(
            detached = graph.detached.len(),
            absorbed = graph.absorbed.len(),
            halt = graph.halt.len();
            "Special nodes resolved"
        );
        trace!(diagnostics:? = graph.diagnostics; "Graph diagnostics");

        graph
    }

    /// First regular node with no incoming edge, skipping the secondary
    /// root, the prologue and detached nodes. Falls back to the first such
    /// node regardless of incoming edges.
    fn select_root(&self, graph: &Graph, diagnostics: &mut Vec<Diagnostic>) -> Option<Id> {
        let eligible = |id: &Id| {
            graph.is_regular(*id)
                && Some(*id) != graph.secondary_root
                && Some(*id) != graph.prologue
                && !graph.is_detached(*id)
        };

        if let Some(root) = graph.base.roots().find(eligible) {
            return Some(root);
        }

        let Some(fallback) = graph.node_ids().find(eligible) else {
            warn!("No node is eligible as root");
            diagnostics.push(
                Diagnostic::error("graph has no node eligible as root")
                    .with_code(ErrorCode::E301)
                    .with_help("add a node that is neither detached, the prologue nor the secondary root"),
            );
            return None;
        };

        warn!(root:% = fallback; "No node without incoming edges, falling back to first node");
        let severity = if self.strict_root {
            Severity::Error
        } else {
            Severity::Warning
        };
        diagnostics.push(
            Diagnostic::warning(format!(
                "every node has an incoming edge; `{fallback}` is used as the root"
            ))
            .with_code(ErrorCode::E300)
            .with_subject(fallback)
            .with_severity(severity),
        );
        Some(fallback)
    }
}
