//! The core diagnostic type for the Branchline error system.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! error code, the node it concerns, a related node, and help text.

use std::fmt;

use serde::Serialize;

use branchline_core::identifier::Id;

use crate::error::{Severity, error_code::ErrorCode};

/// A diagnostic message about a graph document.
///
/// # Example
///
/// ```text
/// error[E202]: outgoing edge `intro` -> `left` is not mirrored in `left`'s incoming_from
///   = subject: intro
///   = related: left
///   = help: add {"from": "intro"} to `left`'s incoming_from
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    graph: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    related: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use branchline_document::error::{Diagnostic, ErrorCode};
    /// let diag = Diagnostic::error("graph has no nodes").with_code(ErrorCode::E301);
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Key of the graph this diagnostic was raised for, inside a document set.
    pub fn graph(&self) -> Option<&str> {
        self.graph.as_deref()
    }

    /// The node the diagnostic is about.
    pub fn subject(&self) -> Option<Id> {
        self.subject
    }

    /// The other node involved, e.g. the missing edge target.
    pub fn related(&self) -> Option<Id> {
        self.related
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the graph key.
    pub fn with_graph(mut self, graph: impl Into<String>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    /// Set the subject node.
    pub fn with_subject(mut self, subject: Id) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Set the related node.
    pub fn with_related(mut self, related: Id) -> Self {
        self.related = Some(related);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Downgrade or upgrade the severity, keeping everything else.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            graph: None,
            subject: None,
            related: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
