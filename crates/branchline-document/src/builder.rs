//! Programmatic construction of graph documents.
//!
//! Mostly used by tests and tooling that synthesise graphs instead of
//! reading them from JSON.

use indexmap::IndexMap;

use branchline_core::identifier::Id;

use crate::record::{CardData, GraphDocument, IncomingEdge, NodeRecord, OutgoingEdge, PrologueSlot};

/// Builder for [`GraphDocument`].
///
/// Nodes referenced by edges are created on demand, titled with their id.
///
/// # Example
///
/// ```
/// # use branchline_document::builder::GraphDocumentBuilder;
/// let doc = GraphDocumentBuilder::new()
///     .edge("intro", "left", "go left")
///     .edge("intro", "right", "go right")
///     .halt("right")
///     .build();
///
/// assert_eq!(doc.nodes().len(), 3);
/// assert_eq!(doc.halt_ids().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphDocumentBuilder {
    title: Option<String>,
    nodes: IndexMap<Id, NodeRecord>,
    secondary_root_id: Option<Id>,
    halt_ids: Vec<Id>,
    prologue: PrologueSlot,
    detached_ids: Vec<Id>,
}

impl GraphDocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the graph title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds a node with a title, or retitles an existing one.
    pub fn node(mut self, id: &str, title: &str) -> Self {
        let id = Id::new(id);
        match self.nodes.get_mut(&id) {
            Some(record) => record.set_title(title.to_string()),
            None => {
                self.nodes.insert(id, NodeRecord::new(title));
            }
        }
        self
    }

    /// Sets a node's duration in seconds.
    pub fn duration(mut self, id: &str, seconds: u64) -> Self {
        self.record(id).set_card_data(CardData::with_length(seconds));
        self
    }

    /// Sets a node's raw description and, optionally, its display description.
    pub fn description(mut self, id: &str, raw: &str, clean: Option<&str>) -> Self {
        let record = self.record(id);
        record.set_description(raw.to_string());
        if let Some(clean) = clean {
            record.set_clean_description(clean.to_string());
        }
        self
    }

    /// Sets a node's thumbnail and url.
    pub fn media(mut self, id: &str, thumbnail: &str, url: &str) -> Self {
        let record = self.record(id);
        record.set_thumbnail(thumbnail.to_string());
        record.set_url(url.to_string());
        self
    }

    /// Adds a mirrored edge: `from.outgoing` and `to.incoming_from`.
    pub fn edge(self, from: &str, to: &str, label: &str) -> Self {
        self.outgoing_only(from, to, label).incoming_only(from, to, label)
    }

    /// Adds an edge only to `from.outgoing`.
    pub fn outgoing_only(mut self, from: &str, to: &str, label: &str) -> Self {
        self.record(from);
        self.record(to);
        self.record(from)
            .push_outgoing(OutgoingEdge::new(Id::new(to), label));
        self
    }

    /// Adds an edge only to `to.incoming_from`.
    pub fn incoming_only(mut self, from: &str, to: &str, label: &str) -> Self {
        self.record(from);
        self.record(to)
            .push_incoming(IncomingEdge::new(Id::new(from), label));
        self
    }

    /// Marks the secondary root.
    pub fn secondary_root(mut self, id: &str) -> Self {
        self.secondary_root_id = Some(Id::new(id));
        self
    }

    /// Adds a halt identifier.
    pub fn halt(mut self, id: &str) -> Self {
        self.halt_ids.push(Id::new(id));
        self
    }

    /// Sets the prologue node, creating it if missing.
    pub fn prologue(mut self, id: &str) -> Self {
        self.record(id);
        self.prologue = PrologueSlot::Node(Id::new(id));
        self
    }

    /// Records the explicit "no prologue" sentinel.
    pub fn no_prologue(mut self) -> Self {
        self.prologue = PrologueSlot::Declined;
        self
    }

    /// Adds a detached identifier, creating the node if missing.
    pub fn detached(mut self, id: &str) -> Self {
        self.record(id);
        self.detached_ids.push(Id::new(id));
        self
    }

    /// Adds a special identifier without creating its node.
    pub fn detached_id_only(mut self, id: &str) -> Self {
        self.detached_ids.push(Id::new(id));
        self
    }

    pub fn build(self) -> GraphDocument {
        GraphDocument::from_parts(
            self.title,
            self.nodes,
            self.secondary_root_id,
            self.halt_ids,
            self.prologue,
            self.detached_ids,
        )
    }

    fn record(&mut self, id: &str) -> &mut NodeRecord {
        self.nodes
            .entry(Id::new(id))
            .or_insert_with(|| NodeRecord::new(id))
    }
}
