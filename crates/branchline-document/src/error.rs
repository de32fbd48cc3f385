//! Error and diagnostic system for Branchline graph documents.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Severity levels
//! - A diagnostic collector for accumulating multiple findings
//!
//! # Overview
//!
//! Integrity problems in a graph document (dangling edges, unmirrored edge
//! lists, unknown special identifiers) are reported as [`Diagnostic`]s rather
//! than aborting on the first problem. A [`DocumentError`] wraps the
//! diagnostics of a failed phase.
//!
//! # Example
//!
//! ```
//! # use branchline_core::identifier::Id;
//! # use branchline_document::error::{Diagnostic, ErrorCode};
//!
//! let diag = Diagnostic::error("outgoing edge targets unknown node `ghost`")
//!     .with_code(ErrorCode::E200)
//!     .with_subject(Id::new("intro"))
//!     .with_related(Id::new("ghost"))
//!     .with_help("remove the edge or add the missing node");
//! ```

mod collector;
mod diagnostic;
mod document_error;
mod error_code;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use document_error::DocumentError;
pub use error_code::ErrorCode;
pub use severity::Severity;
