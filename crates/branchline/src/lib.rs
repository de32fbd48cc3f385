//! Branchline - layered layout and highlight propagation for branching
//! content graphs.
//!
//! A graph document describes nodes joined by labelled choices, with a few
//! special nodes: a secondary root that starts a second section, halt nodes,
//! a prologue drawn above the root and detached satellite nodes. This crate
//! turns such a document into:
//!
//! - a shortest-path spanning tree giving every reachable node its depth,
//! - deterministic 2D coordinates for every node, satellites included,
//! - an ordered set of semantic categories per node,
//! - on demand, the highlight sets around any node, with a click lock.
//!
//! Drawing is left to an external renderer that consumes a [`RenderPlan`].

pub mod classify;
pub mod config;
pub mod highlight;
pub mod layout;
pub mod plan;
pub mod present;
pub mod structure;
pub mod subtree;
pub mod tree;

mod error;

pub use branchline_core::{category, geometry, identifier};
pub use branchline_document::DocumentSet;

pub use error::BranchlineError;
pub use plan::RenderPlan;

use log::{debug, info, trace};

use branchline_core::{category::CategorySet, identifier::Id};
use branchline_document::{
    error::{DocumentError, ErrorCode},
    record::GraphDocument,
};

use classify::NodeClassifier;
use config::{AppConfig, IntegrityMode};
use highlight::{HighlightEngine, InteractionSession};
use layout::{Layout, LayoutEngine};
use structure::{Graph, GraphModel, Link};
use subtree::SubtreeInfo;
use tree::ShortestPathTree;

/// Entry point for reading documents and preparing render passes.
///
/// # Examples
///
/// ```rust
/// use branchline::{GraphEngine, config::AppConfig, identifier::Id};
///
/// let json = r#"{
///     "nodes": {
///         "intro": {"title": "Intro", "outgoing": [{"to": "left", "label": "go"}]},
///         "left": {"title": "Left", "incoming_from": [{"from": "intro", "label": "go"}]}
///     }
/// }"#;
///
/// let engine = GraphEngine::new(AppConfig::default());
/// let set = engine.parse(json).expect("Failed to parse");
/// let (_, doc) = set.first().expect("No graph");
///
/// let pass = engine.prepare(doc).expect("Failed to prepare");
/// assert_eq!(pass.graph().root(), Some(Id::new("intro")));
/// assert_eq!(pass.layout().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct GraphEngine {
    config: AppConfig,
}

impl GraphEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON document holding one graph or a keyed set of graphs.
    ///
    /// # Errors
    ///
    /// Returns [`BranchlineError::Document`] for malformed JSON or an
    /// unexpected document shape.
    pub fn parse(&self, json: &str) -> Result<DocumentSet, BranchlineError> {
        info!("Parsing graph document");

        let set = branchline_document::parse_documents(json)
            .map_err(|err| BranchlineError::new_document_error(err, json))?;

        info!(graphs = set.len(), nested = set.is_nested(); "Document parsed");
        Ok(set)
    }

    /// Build the graph, tree, subtree facts and layout for one document.
    ///
    /// # Errors
    ///
    /// Returns [`BranchlineError::Integrity`] when the document has
    /// error-level integrity findings under strict integrity, or when the
    /// root had to be guessed under `strict_root`.
    pub fn prepare(&self, doc: &GraphDocument) -> Result<RenderPass, BranchlineError> {
        let engine_config = self.config.engine();
        let model = GraphModel::new(engine_config);

        let graph = match engine_config.integrity() {
            IntegrityMode::Strict => model.build(doc).map_err(BranchlineError::Integrity)?,
            IntegrityMode::Degraded => {
                let graph = model.build_degraded(doc);
                if engine_config.strict_root() && graph.has_diagnostic(ErrorCode::E300) {
                    return Err(BranchlineError::Integrity(DocumentError::new(
                        graph.diagnostics().to_vec(),
                    )));
                }
                graph
            }
        };

        let tree = ShortestPathTree::from_graph(&graph);

        let subtree = SubtreeInfo::classify(&graph, &tree, engine_config.loop_back_targets());

        let layout = LayoutEngine::new(self.config.layout().clone()).layout(&graph, &tree, &subtree);
        debug!(max_depth:? = tree.max_depth(); "Render pass prepared");
        trace!(subtree:?; "Subtree facts");

        Ok(RenderPass {
            graph,
            tree,
            subtree,
            layout,
            config: self.config.clone(),
        })
    }

    /// Prepare the graph stored under `key`, or the first graph of the set.
    ///
    /// # Errors
    ///
    /// Returns [`BranchlineError::Graph`] when the set is empty or has no
    /// graph under `key`, plus any error of [`GraphEngine::prepare`].
    pub fn prepare_key(
        &self,
        set: &DocumentSet,
        key: Option<&str>,
    ) -> Result<RenderPass, BranchlineError> {
        let doc = match key {
            Some(key) => set
                .get(key)
                .ok_or_else(|| BranchlineError::Graph(format!("no graph named `{key}`")))?,
            None => {
                set.first()
                    .ok_or_else(|| BranchlineError::Graph("document has no graphs".to_string()))?
                    .1
            }
        };
        self.prepare(doc)
    }
}

/// Everything derived from one graph selection.
///
/// Layout is computed once; highlight queries borrow the pass and can be
/// issued per interaction event.
#[derive(Debug)]
pub struct RenderPass {
    graph: Graph,
    tree: ShortestPathTree,
    subtree: SubtreeInfo,
    layout: Layout,
    config: AppConfig,
}

impl RenderPass {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn tree(&self) -> &ShortestPathTree {
        &self.tree
    }

    pub fn subtree(&self) -> &SubtreeInfo {
        &self.subtree
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn classifier(&self) -> NodeClassifier<'_> {
        NodeClassifier::new(&self.graph, &self.subtree)
    }

    /// Categories of `id`; `default` for unknown ids.
    pub fn categories_of(&self, id: Id) -> CategorySet {
        self.classifier().categories_of(id)
    }

    pub fn highlight_engine(&self) -> HighlightEngine<'_> {
        HighlightEngine::new(&self.graph, &self.subtree, self.config.highlight())
    }

    /// A fresh, unlocked interaction session.
    pub fn new_session(&self) -> InteractionSession {
        InteractionSession::new()
    }

    /// Links drawn as part of the main drawing.
    pub fn tree_links(&self) -> impl Iterator<Item = Link<'_>> {
        self.graph
            .links()
            .filter(|link| !self.graph.is_standalone_detached(link.source()))
    }

    /// Links leaving standalone detached nodes.
    pub fn detached_links(&self) -> impl Iterator<Item = Link<'_>> {
        self.graph
            .links()
            .filter(|link| self.graph.is_standalone_detached(link.source()))
    }

    pub fn render_plan(&self) -> RenderPlan<'_> {
        RenderPlan::new(&self.graph, &self.layout, &self.classifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchline_core::category::NodeCategory;
    use branchline_document::builder::GraphDocumentBuilder;
    use config::{EngineConfig, HighlightConfig, LayoutConfig};

    fn engine_with(engine: EngineConfig) -> GraphEngine {
        GraphEngine::new(AppConfig::new(
            LayoutConfig::default(),
            engine,
            HighlightConfig::default(),
        ))
    }

    fn sample() -> GraphDocument {
        GraphDocumentBuilder::new()
            .edge("r", "a", "left")
            .edge("r", "b", "right")
            .edge("b", "r", "again")
            .detached("z")
            .edge("z", "a", "bonus")
            .build()
    }

    #[test]
    fn test_prepare_degraded_sample() {
        let pass = GraphEngine::default().prepare(&sample()).unwrap();

        assert_eq!(pass.graph().root(), Some(Id::new("r")));
        assert_eq!(pass.layout().len(), 4);
        assert_eq!(pass.tree_links().count(), 3);
        assert_eq!(pass.detached_links().count(), 1);
        assert!(pass.categories_of(Id::new("b")).contains(NodeCategory::LoopBack));
    }

    #[test]
    fn test_prepare_strict_rejects_unmirrored_edge() {
        let doc = GraphDocumentBuilder::new()
            .edge("r", "a", "go")
            .outgoing_only("a", "b", "next")
            .build();

        let strict = engine_with(EngineConfig::default().with_integrity(IntegrityMode::Strict));
        assert!(matches!(
            strict.prepare(&doc),
            Err(BranchlineError::Integrity(_))
        ));

        let degraded = GraphEngine::default().prepare(&doc).unwrap();
        assert!(degraded.graph().has_edge(Id::new("a"), Id::new("b")));
        assert!(degraded.graph().has_diagnostic(ErrorCode::E202));
    }

    #[test]
    fn test_strict_root_rejects_fallback() {
        let doc = GraphDocumentBuilder::new()
            .edge("a", "b", "go")
            .edge("b", "a", "back")
            .build();

        let lenient = GraphEngine::default().prepare(&doc).unwrap();
        assert_eq!(lenient.graph().root(), Some(Id::new("a")));

        let strict = engine_with(EngineConfig::default().with_strict_root(true));
        assert!(matches!(
            strict.prepare(&doc),
            Err(BranchlineError::Integrity(_))
        ));
    }

    #[test]
    fn test_prepare_key() {
        let engine = GraphEngine::default();
        let mut set = DocumentSet::single(sample());
        set.insert("other", GraphDocumentBuilder::new().node("x", "X").build());

        let pass = engine.prepare_key(&set, Some("other")).unwrap();
        assert_eq!(pass.graph().root(), Some(Id::new("x")));

        assert!(matches!(
            engine.prepare_key(&set, Some("missing")),
            Err(BranchlineError::Graph(_))
        ));
    }

    #[test]
    fn test_render_plan() {
        let doc = GraphDocumentBuilder::new()
            .node("r", "A rather long opening title for the story")
            .duration("r", 95)
            .edge("r", "a", "go")
            .detached("z")
            .edge("z", "a", "bonus")
            .build();
        let pass = GraphEngine::default().prepare(&doc).unwrap();
        let plan = pass.render_plan();

        assert_eq!(plan.root(), Some(Id::new("r")));
        assert_eq!(plan.nodes().len(), 3);
        assert_eq!(plan.tree_links().len(), 1);
        assert_eq!(plan.detached_links().len(), 1);

        let root = plan.node(Id::new("r")).unwrap();
        assert_eq!(root.categories(), [NodeCategory::Root]);
        assert_eq!(root.duration(), Some("1:35"));
        assert_eq!(root.title_lines().len(), 2);
        assert!(root.title_lines()[1].ends_with('…'));

        let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(json["root"], "r");
        assert_eq!(json["nodes"][0]["kind"], "tree");
        assert_eq!(json["stats"]["connections"], 2);
    }
}
