//! Error codes for the Branchline diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Document decoding errors
//! - `E2xx` - Integrity findings in node records
//! - `E3xx` - Graph structure findings raised while building the model

use std::fmt;

use serde::{Serialize, Serializer};

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Decoding Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The document is not syntactically valid JSON.
    E001,

    /// Unexpected document shape.
    ///
    /// The JSON is valid but does not describe a graph or a set of graphs,
    /// for example a node record that is not an object.
    E002,

    // =========================================================================
    // Integrity Findings (E2xx)
    // =========================================================================
    /// Dangling outgoing edge.
    ///
    /// An `outgoing` entry has no target or targets a node that does not exist.
    E200,

    /// Dangling incoming edge.
    ///
    /// An `incoming_from` entry names a source node that does not exist.
    E201,

    /// Outgoing edge not mirrored.
    ///
    /// `A` lists an outgoing edge to `B`, but `B`'s `incoming_from` does not
    /// list `A`.
    E202,

    /// Incoming edge not mirrored.
    ///
    /// `B` lists `A` in `incoming_from`, but `A` has no outgoing edge to `B`.
    E203,

    /// Unknown special identifier.
    ///
    /// The secondary root, prologue, a halt identifier or a detached
    /// identifier names a node that does not exist. The identifier is ignored.
    E204,

    /// Empty outgoing label.
    E205,

    /// Empty incoming label.
    E206,

    /// Description without a clean description.
    ///
    /// A node carries a raw `description` but no `clean_description`; the
    /// renderer will show nothing.
    E207,

    // =========================================================================
    // Structure Findings (E3xx)
    // =========================================================================
    /// Degenerate root.
    ///
    /// No node without incoming edges exists; the first eligible node is used
    /// as the root instead.
    E300,

    /// No root.
    ///
    /// The graph has no node eligible to be the root.
    E301,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E002 => "unexpected document shape",
            ErrorCode::E200 => "dangling outgoing edge",
            ErrorCode::E201 => "dangling incoming edge",
            ErrorCode::E202 => "outgoing edge not mirrored",
            ErrorCode::E203 => "incoming edge not mirrored",
            ErrorCode::E204 => "unknown special identifier",
            ErrorCode::E205 => "empty outgoing label",
            ErrorCode::E206 => "empty incoming label",
            ErrorCode::E207 => "description without clean description",
            ErrorCode::E300 => "degenerate root",
            ErrorCode::E301 => "no root",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
        assert_eq!(ErrorCode::E300.to_string(), "E300");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "invalid JSON");
        assert_eq!(ErrorCode::E202.description(), "outgoing edge not mirrored");
        assert_eq!(ErrorCode::E300.description(), "degenerate root");
    }
}
