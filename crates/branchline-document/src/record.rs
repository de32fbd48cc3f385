//! Serde model of graph documents.
//!
//! A graph document is a JSON object holding a `nodes` table keyed by node
//! identifier plus the special identifiers that drive layout:
//!
//! ```json
//! {
//!   "title": "Season one",
//!   "nodes": {
//!     "intro": { "title": "Intro", "outgoing": [{ "to": "left", "label": "go left" }] },
//!     "left":  { "title": "Left",  "incoming_from": [{ "from": "intro", "label": "go left" }] }
//!   },
//!   "secondary_root_id": null,
//!   "halt_ids": [],
//!   "prologue_id": "none",
//!   "detached_ids": []
//! }
//! ```
//!
//! The field names of earlier exports (`part2_video_id`, `stop_video_ids`,
//! `trailer_video_id`, `bonus_video_ids`, `hide_bonus_button`) are accepted as
//! aliases.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use branchline_core::identifier::Id;

/// Sentinel value meaning "explicitly no prologue".
pub const NO_PROLOGUE: &str = "none";

/// One entry of a node's `outgoing` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingEdge {
    #[serde(default)]
    to: Option<Id>,
    #[serde(default)]
    label: Option<String>,
}

impl OutgoingEdge {
    /// Creates an edge to `to` with the given label.
    pub fn new(to: Id, label: impl Into<String>) -> Self {
        Self {
            to: Some(to),
            label: Some(label.into()),
        }
    }

    /// Target identifier; `None` when the record omits it.
    pub fn to(&self) -> Option<Id> {
        self.to
    }

    /// Edge label, if present.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// One entry of a node's `incoming_from` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingEdge {
    from: Id,
    #[serde(default)]
    label: Option<String>,
}

impl IncomingEdge {
    /// Creates an incoming edge from `from` with the given label.
    pub fn new(from: Id, label: impl Into<String>) -> Self {
        Self {
            from,
            label: Some(label.into()),
        }
    }

    /// Source identifier.
    pub fn from(&self) -> Id {
        self.from
    }

    /// Edge label, if present.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Extra metadata attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    #[serde(
        rename = "lengthSeconds",
        default,
        deserialize_with = "deserialize_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    length_seconds: Option<u64>,
}

impl CardData {
    /// Creates card data with a duration in seconds.
    pub fn with_length(length_seconds: u64) -> Self {
        Self {
            length_seconds: Some(length_seconds),
        }
    }

    /// Duration in seconds, if known.
    pub fn length_seconds(&self) -> Option<u64> {
        self.length_seconds
    }
}

/// Durations arrive either as numbers or as numeric strings.
fn deserialize_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(u64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Seconds>::deserialize(deserializer)? {
        Some(Seconds::Number(n)) => Some(n),
        Some(Seconds::Float(f)) if f.is_finite() && f >= 0.0 => Some(f as u64),
        Some(Seconds::Text(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

/// A node record as stored in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clean_description: Option<String>,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    card_data: Option<CardData>,
    #[serde(default)]
    outgoing: Vec<OutgoingEdge>,
    #[serde(default)]
    incoming_from: Vec<IncomingEdge>,
}

impl NodeRecord {
    /// Creates an empty record with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw description, as scraped.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Display description.
    pub fn clean_description(&self) -> Option<&str> {
        self.clean_description.as_deref()
    }

    /// Thumbnail reference.
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    /// Link to the content itself.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Duration in seconds, if known.
    pub fn duration(&self) -> Option<u64> {
        self.card_data.as_ref().and_then(CardData::length_seconds)
    }

    /// Outgoing edges in document order.
    pub fn outgoing(&self) -> &[OutgoingEdge] {
        &self.outgoing
    }

    /// Incoming edges in document order.
    pub fn incoming_from(&self) -> &[IncomingEdge] {
        &self.incoming_from
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_clean_description(&mut self, description: String) {
        self.clean_description = Some(description);
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn set_thumbnail(&mut self, thumbnail: String) {
        self.thumbnail = thumbnail;
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = url;
    }

    pub(crate) fn set_card_data(&mut self, card_data: CardData) {
        self.card_data = Some(card_data);
    }

    pub(crate) fn push_outgoing(&mut self, edge: OutgoingEdge) {
        self.outgoing.push(edge);
    }

    pub(crate) fn push_incoming(&mut self, edge: IncomingEdge) {
        self.incoming_from.push(edge);
    }
}

/// The prologue slot of a graph.
///
/// Earlier exports distinguish "never set" from "explicitly none" so that
/// tooling only offers to add a prologue when the slot was never filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrologueSlot {
    /// No prologue field in the document.
    #[default]
    Unset,
    /// The `"none"` sentinel.
    Declined,
    /// A prologue node.
    Node(Id),
}

impl PrologueSlot {
    /// The prologue node, if any.
    pub fn node(self) -> Option<Id> {
        match self {
            PrologueSlot::Node(id) => Some(id),
            PrologueSlot::Unset | PrologueSlot::Declined => None,
        }
    }
}

impl<'de> Deserialize<'de> for PrologueSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => PrologueSlot::Unset,
            Some(value) if value.is_empty() => PrologueSlot::Unset,
            Some(value) if value == NO_PROLOGUE => PrologueSlot::Declined,
            Some(value) => PrologueSlot::Node(Id::new(&value)),
        })
    }
}

impl Serialize for PrologueSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrologueSlot::Unset => serializer.serialize_none(),
            PrologueSlot::Declined => serializer.serialize_str(NO_PROLOGUE),
            PrologueSlot::Node(id) => id.serialize(serializer),
        }
    }
}

/// One graph: its node table plus the special identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default)]
    nodes: IndexMap<Id, NodeRecord>,
    #[serde(default, alias = "part2_video_id")]
    secondary_root_id: Option<Id>,
    #[serde(default, alias = "stop_video_ids")]
    halt_ids: Vec<Id>,
    #[serde(default, alias = "trailer_video_id")]
    prologue_id: PrologueSlot,
    #[serde(default, alias = "bonus_video_ids")]
    detached_ids: Vec<Id>,
    #[serde(default, alias = "hide_bonus_button")]
    hide_detached_button: bool,
}

impl GraphDocument {
    /// Display title, if set.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Node table in document order.
    pub fn nodes(&self) -> &IndexMap<Id, NodeRecord> {
        &self.nodes
    }

    /// Looks up one node record.
    pub fn node(&self, id: Id) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    /// Identifier of the secondary root, if any.
    pub fn secondary_root_id(&self) -> Option<Id> {
        self.secondary_root_id
    }

    /// Identifiers of halted nodes, in document order.
    pub fn halt_ids(&self) -> &[Id] {
        &self.halt_ids
    }

    /// Prologue slot, keeping the `"none"` sentinel distinct from unset.
    pub fn prologue(&self) -> PrologueSlot {
        self.prologue_id
    }

    /// Identifier of the prologue node, if any.
    pub fn prologue_id(&self) -> Option<Id> {
        self.prologue_id.node()
    }

    /// Identifiers of detached nodes, in document order.
    pub fn detached_ids(&self) -> &[Id] {
        &self.detached_ids
    }

    /// Whether tooling should hide the "add detached node" control.
    pub fn hide_detached_button(&self) -> bool {
        self.hide_detached_button
    }

    pub(crate) fn from_parts(
        title: Option<String>,
        nodes: IndexMap<Id, NodeRecord>,
        secondary_root_id: Option<Id>,
        halt_ids: Vec<Id>,
        prologue_id: PrologueSlot,
        detached_ids: Vec<Id>,
    ) -> Self {
        Self {
            title,
            nodes,
            secondary_root_id,
            halt_ids,
            prologue_id,
            detached_ids,
            hide_detached_button: false,
        }
    }
}
