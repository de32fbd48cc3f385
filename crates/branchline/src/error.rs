//! Error types for Branchline operations.
//!
//! This module provides the main error type [`BranchlineError`] which wraps
//! the error conditions that can occur while reading a document and
//! preparing a render pass.

use std::io;

use thiserror::Error;

use branchline_document::error::DocumentError;

/// The main error type for Branchline operations.
///
/// # Diagnostic Variants
///
/// `Document` and `Integrity` carry structured [`DocumentError`]s whose
/// diagnostics name the offending nodes. `Document` additionally keeps the
/// JSON source it was decoded from.
#[derive(Debug, Error)]
pub enum BranchlineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Document { err: DocumentError, src: String },

    #[error("{0}")]
    Integrity(DocumentError),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BranchlineError {
    /// Create a new `Document` error with the associated source text.
    pub fn new_document_error(err: DocumentError, src: impl Into<String>) -> Self {
        Self::Document {
            err,
            src: src.into(),
        }
    }
}
