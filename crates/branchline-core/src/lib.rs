//! Branchline Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Branchline
//! document, engine and CLI crates:
//!
//! - **Identifiers**: String-interned node identifiers ([`identifier::Id`])
//! - **Geometry**: Points and bounds in diagram space ([`geometry`] module)
//! - **Categories**: Semantic node tags ([`category`] module)

pub mod category;
pub mod geometry;
pub mod identifier;
