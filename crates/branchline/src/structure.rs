//! Graph structure: storage primitives and the normalized graph model.

mod graph_base;
mod model;

pub use model::{Graph, GraphModel, GraphStats, Link, Node};
