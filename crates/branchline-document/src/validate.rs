//! Integrity checks over graph documents.
//!
//! [`check_integrity`] walks one graph and reports every inconsistency as a
//! [`Diagnostic`]. [`ValidationReport`] aggregates those findings across a
//! whole [`DocumentSet`] into the JSON shape consumed by tooling.
//!
//! Edge findings always use the edge source as the diagnostic subject and the
//! edge target as the related node, whichever list the finding came from.

use log::debug;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use branchline_core::identifier::Id;

use crate::{
    DocumentSet,
    error::{Diagnostic, ErrorCode},
    record::GraphDocument,
};

/// Checks one graph document and returns every finding in document order.
///
/// Dangling and unmirrored edges are errors; empty labels, missing clean
/// descriptions and unknown special identifiers are warnings.
pub fn check_integrity(doc: &GraphDocument) -> Vec<Diagnostic> {
    let mut findings = Vec::new();
    let nodes = doc.nodes();

    for (&node_id, record) in nodes {
        for edge in record.outgoing() {
            let Some(target) = edge.to() else {
                findings.push(
                    Diagnostic::error(format!("outgoing edge of `{node_id}` has no target"))
                        .with_code(ErrorCode::E200)
                        .with_subject(node_id),
                );
                continue;
            };

            match nodes.get(&target) {
                None => findings.push(
                    Diagnostic::error(format!(
                        "outgoing edge `{node_id}` -> `{target}` targets an unknown node"
                    ))
                    .with_code(ErrorCode::E200)
                    .with_subject(node_id)
                    .with_related(target),
                ),
                Some(target_record) => {
                    let mirrored = target_record
                        .incoming_from()
                        .iter()
                        .any(|incoming| incoming.from() == node_id);
                    if !mirrored {
                        findings.push(
                            Diagnostic::error(format!(
                                "outgoing edge `{node_id}` -> `{target}` is not mirrored in `{target}`'s incoming_from"
                            ))
                            .with_code(ErrorCode::E202)
                            .with_subject(node_id)
                            .with_related(target)
                            .with_help(format!("add {{\"from\": \"{node_id}\"}} to `{target}`'s incoming_from")),
                        );
                    }
                }
            }

            if is_blank(edge.label()) {
                findings.push(
                    Diagnostic::warning(format!("outgoing edge `{node_id}` -> `{target}` has an empty label"))
                        .with_code(ErrorCode::E205)
                        .with_subject(node_id)
                        .with_related(target),
                );
            }
        }

        for incoming in record.incoming_from() {
            let source = incoming.from();
            match nodes.get(&source) {
                None => findings.push(
                    Diagnostic::error(format!(
                        "incoming edge `{source}` -> `{node_id}` names an unknown source"
                    ))
                    .with_code(ErrorCode::E201)
                    .with_subject(source)
                    .with_related(node_id),
                ),
                Some(source_record) => {
                    let mirrored = source_record
                        .outgoing()
                        .iter()
                        .any(|outgoing| outgoing.to() == Some(node_id));
                    if !mirrored {
                        findings.push(
                            Diagnostic::error(format!(
                                "incoming edge `{source}` -> `{node_id}` is not mirrored in `{source}`'s outgoing"
                            ))
                            .with_code(ErrorCode::E203)
                            .with_subject(source)
                            .with_related(node_id),
                        );
                    }
                }
            }

            if is_blank(incoming.label()) {
                findings.push(
                    Diagnostic::warning(format!("incoming edge `{source}` -> `{node_id}` has an empty label"))
                        .with_code(ErrorCode::E206)
                        .with_subject(source)
                        .with_related(node_id),
                );
            }
        }

        let has_description = record.description().is_some_and(|d| !d.is_empty());
        let has_clean = record.clean_description().is_some_and(|d| !d.is_empty());
        if has_description && !has_clean {
            findings.push(
                Diagnostic::warning(format!("`{node_id}` has a description but no clean_description"))
                    .with_code(ErrorCode::E207)
                    .with_subject(node_id),
            );
        }
    }

    let specials = doc
        .secondary_root_id()
        .map(|id| ("secondary root", id))
        .into_iter()
        .chain(doc.prologue_id().map(|id| ("prologue", id)))
        .chain(doc.halt_ids().iter().map(|&id| ("halt", id)))
        .chain(doc.detached_ids().iter().map(|&id| ("detached", id)));
    for (role, id) in specials {
        if !nodes.contains_key(&id) {
            findings.push(
                Diagnostic::warning(format!("{role} identifier `{id}` does not name a node"))
                    .with_code(ErrorCode::E204)
                    .with_subject(id)
                    .with_help("the identifier is ignored"),
            );
        }
    }

    findings
}

fn is_blank(label: Option<&str>) -> bool {
    label.is_none_or(|label| label.trim().is_empty())
}

/// One entry of a [`ValidationReport`] list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    graph: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<Id>,
}

impl Finding {
    /// Key of the graph the finding belongs to.
    pub fn graph(&self) -> &str {
        &self.graph
    }

    /// Edge source, for edge findings.
    pub fn from(&self) -> Option<Id> {
        self.from
    }

    /// Edge target, for edge findings.
    pub fn to(&self) -> Option<Id> {
        self.to
    }

    /// The node concerned, for node findings.
    pub fn node(&self) -> Option<Id> {
        self.node
    }

    fn edge(graph: &str, diagnostic: &Diagnostic) -> Self {
        Self {
            graph: graph.to_string(),
            from: diagnostic.subject(),
            to: diagnostic.related(),
            node: None,
        }
    }

    fn node_finding(graph: &str, diagnostic: &Diagnostic) -> Self {
        Self {
            graph: graph.to_string(),
            from: None,
            to: None,
            node: diagnostic.subject(),
        }
    }
}

/// Integrity summary of a document set.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    graphs_examined: usize,
    missing_outgoing_targets: Vec<Finding>,
    outgoing_not_in_incoming: Vec<Finding>,
    incoming_not_in_outgoing: Vec<Finding>,
    incoming_from_missing: Vec<Finding>,
    empty_outgoing_labels: Vec<Finding>,
    empty_incoming_labels: Vec<Finding>,
    description_no_clean: Vec<Finding>,
    unknown_special_ids: Vec<Finding>,
}

impl ValidationReport {
    /// Runs [`check_integrity`] on every graph of the set.
    pub fn from_set(set: &DocumentSet) -> Self {
        let mut report = Self::default();
        for (key, doc) in set.iter() {
            report.graphs_examined += 1;
            for diagnostic in check_integrity(doc) {
                report.record(key, &diagnostic);
            }
        }
        debug!(
            graphs = report.graphs_examined,
            errors = report.error_count();
            "Validation finished"
        );
        report
    }

    /// Number of graphs checked.
    pub fn graphs_examined(&self) -> usize {
        self.graphs_examined
    }

    pub fn missing_outgoing_targets(&self) -> &[Finding] {
        &self.missing_outgoing_targets
    }

    pub fn outgoing_not_in_incoming(&self) -> &[Finding] {
        &self.outgoing_not_in_incoming
    }

    pub fn incoming_not_in_outgoing(&self) -> &[Finding] {
        &self.incoming_not_in_outgoing
    }

    pub fn incoming_from_missing(&self) -> &[Finding] {
        &self.incoming_from_missing
    }

    pub fn empty_outgoing_labels(&self) -> &[Finding] {
        &self.empty_outgoing_labels
    }

    pub fn empty_incoming_labels(&self) -> &[Finding] {
        &self.empty_incoming_labels
    }

    pub fn description_no_clean(&self) -> &[Finding] {
        &self.description_no_clean
    }

    pub fn unknown_special_ids(&self) -> &[Finding] {
        &self.unknown_special_ids
    }

    /// Number of error-level findings: dangling or unmirrored edges.
    pub fn error_count(&self) -> usize {
        self.missing_outgoing_targets.len()
            + self.outgoing_not_in_incoming.len()
            + self.incoming_not_in_outgoing.len()
            + self.incoming_from_missing.len()
    }

    /// Returns `true` if any error-level finding exists.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn record(&mut self, graph: &str, diagnostic: &Diagnostic) {
        let Some(code) = diagnostic.code() else {
            return;
        };
        let (list, finding) = match code {
            ErrorCode::E200 => (&mut self.missing_outgoing_targets, Finding::edge(graph, diagnostic)),
            ErrorCode::E201 => (&mut self.incoming_from_missing, Finding::edge(graph, diagnostic)),
            ErrorCode::E202 => (&mut self.outgoing_not_in_incoming, Finding::edge(graph, diagnostic)),
            ErrorCode::E203 => (&mut self.incoming_not_in_outgoing, Finding::edge(graph, diagnostic)),
            ErrorCode::E204 => (&mut self.unknown_special_ids, Finding::node_finding(graph, diagnostic)),
            ErrorCode::E205 => (&mut self.empty_outgoing_labels, Finding::edge(graph, diagnostic)),
            ErrorCode::E206 => (&mut self.empty_incoming_labels, Finding::edge(graph, diagnostic)),
            ErrorCode::E207 => (&mut self.description_no_clean, Finding::node_finding(graph, diagnostic)),
            ErrorCode::E001 | ErrorCode::E002 | ErrorCode::E300 | ErrorCode::E301 => return,
        };
        list.push(finding);
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let lists: [(&'static str, &'static str, &[Finding]); 8] = [
            ("missing_outgoing_targets", "missing_outgoing_targets_count", &self.missing_outgoing_targets),
            ("outgoing_not_in_incoming", "outgoing_not_in_incoming_count", &self.outgoing_not_in_incoming),
            ("incoming_not_in_outgoing", "incoming_not_in_outgoing_count", &self.incoming_not_in_outgoing),
            ("incoming_from_missing", "incoming_from_missing_count", &self.incoming_from_missing),
            ("empty_outgoing_labels", "empty_outgoing_labels_count", &self.empty_outgoing_labels),
            ("empty_incoming_labels", "empty_incoming_labels_count", &self.empty_incoming_labels),
            ("description_no_clean", "description_no_clean_count", &self.description_no_clean),
            ("unknown_special_ids", "unknown_special_ids_count", &self.unknown_special_ids),
        ];

        let mut state = serializer.serialize_struct("ValidationReport", 1 + lists.len() * 2)?;
        state.serialize_field("graphs_examined", &self.graphs_examined)?;
        for (name, _, findings) in &lists {
            state.serialize_field(name, findings)?;
        }
        for (_, count_name, findings) in &lists {
            state.serialize_field(count_name, &findings.len())?;
        }
        state.end()
    }
}
