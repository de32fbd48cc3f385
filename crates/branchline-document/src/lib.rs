//! Branchline graph documents.
//!
//! This crate reads the JSON documents the engine lays out:
//!
//! - [`record`]: serde model of a single graph and its node records
//! - [`builder`]: programmatic construction of graph documents
//! - [`validate`]: integrity checks and the aggregated validation report
//! - [`error`]: diagnostics and the [`error::DocumentError`] wrapper
//!
//! A document is either one graph or a set of graphs nested under a
//! `graphs` key. [`parse_documents`] accepts both and always returns a
//! [`DocumentSet`].

pub mod builder;
pub mod error;
pub mod record;
pub mod validate;

use indexmap::IndexMap;
use log::{debug, info};
use serde_json::{Map, Value};

use error::{Diagnostic, DiagnosticCollector, DocumentError, ErrorCode};
use record::GraphDocument;

/// Key under which a single-graph document is exposed.
pub const DEFAULT_GRAPH_KEY: &str = "default";

/// Label shown for a single-graph document without a title.
pub const DEFAULT_GRAPH_LABEL: &str = "Main Graph";

/// Ordered collection of graphs, keyed by selection key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    graphs: IndexMap<String, GraphDocument>,
    nested: bool,
}

impl DocumentSet {
    /// Wraps a single graph under [`DEFAULT_GRAPH_KEY`].
    pub fn single(doc: GraphDocument) -> Self {
        let mut graphs = IndexMap::new();
        graphs.insert(DEFAULT_GRAPH_KEY.to_string(), doc);
        Self {
            graphs,
            nested: false,
        }
    }

    /// Adds or replaces a graph. The set becomes a nested one.
    pub fn insert(&mut self, key: impl Into<String>, doc: GraphDocument) {
        self.nested = true;
        self.graphs.insert(key.into(), doc);
    }

    /// Looks up a graph by key.
    pub fn get(&self, key: &str) -> Option<&GraphDocument> {
        self.graphs.get(key)
    }

    /// The first graph in document order, used when no key is given.
    pub fn first(&self) -> Option<(&str, &GraphDocument)> {
        self.graphs
            .first()
            .map(|(key, doc)| (key.as_str(), doc))
    }

    /// Graph keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.graphs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GraphDocument)> {
        self.graphs.iter().map(|(key, doc)| (key.as_str(), doc))
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Returns `true` if the document was a keyed `graphs` object.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Display label of a graph: its title, else its key.
    ///
    /// Untitled single-graph documents are labelled [`DEFAULT_GRAPH_LABEL`].
    pub fn label<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        let doc = self.graphs.get(key)?;
        Some(match doc.title() {
            Some(title) if !title.is_empty() => title,
            _ if !self.nested => DEFAULT_GRAPH_LABEL,
            _ => key,
        })
    }
}

/// Parses a JSON document into a [`DocumentSet`].
///
/// Syntax errors are reported as `E001`; values that do not describe a graph
/// as `E002`. Every malformed graph of a set is reported, not just the first.
///
/// # Example
///
/// ```
/// # use branchline_document::parse_documents;
/// let set = parse_documents(r#"{"graphs": {"s1": {"nodes": {"a": {}}}}}"#).unwrap();
/// assert_eq!(set.keys().collect::<Vec<_>>(), ["s1"]);
/// ```
pub fn parse_documents(json: &str) -> Result<DocumentSet, DocumentError> {
    let value: Value = serde_json::from_str(json).map_err(|err| {
        Diagnostic::error(format!("invalid JSON: {err}")).with_code(ErrorCode::E001)
    })?;

    let Value::Object(mut root) = value else {
        return Err(Diagnostic::error("document must be a JSON object")
            .with_code(ErrorCode::E002)
            .into());
    };

    let set = match root.remove("graphs") {
        Some(Value::Object(graphs)) if !root.contains_key("nodes") => parse_nested(graphs)?,
        Some(graphs) => {
            root.insert("graphs".to_string(), graphs);
            DocumentSet::single(parse_graph(Value::Object(root), None)?)
        }
        None => DocumentSet::single(parse_graph(Value::Object(root), None)?),
    };

    info!(graphs = set.len(); "Document parsed");
    Ok(set)
}

fn parse_nested(graphs: Map<String, Value>) -> Result<DocumentSet, DocumentError> {
    let mut collector = DiagnosticCollector::new();
    let mut set = DocumentSet {
        graphs: IndexMap::with_capacity(graphs.len()),
        nested: true,
    };

    for (key, value) in graphs {
        match parse_graph(value, Some(&key)) {
            Ok(doc) => {
                debug!(graph = key.as_str(), nodes = doc.nodes().len(); "Graph decoded");
                set.graphs.insert(key, doc);
            }
            Err(err) => {
                for diagnostic in err.into_diagnostics() {
                    collector.emit(diagnostic);
                }
            }
        }
    }

    collector.finish()?;
    Ok(set)
}

fn parse_graph(value: Value, key: Option<&str>) -> Result<GraphDocument, DocumentError> {
    if !value.is_object() {
        let diagnostic = Diagnostic::error("graph must be a JSON object").with_code(ErrorCode::E002);
        return Err(with_key(diagnostic, key).into());
    }

    serde_json::from_value(value).map_err(|err| {
        let diagnostic =
            Diagnostic::error(format!("malformed graph: {err}")).with_code(ErrorCode::E002);
        with_key(diagnostic, key).into()
    })
}

fn with_key(diagnostic: Diagnostic, key: Option<&str>) -> Diagnostic {
    match key {
        Some(key) => diagnostic.with_graph(key),
        None => diagnostic,
    }
}
