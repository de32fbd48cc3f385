//! Semantic node categories.
//!
//! Every node in a rendered graph carries an ordered, non-empty set of
//! [`NodeCategory`] tags. The renderer maps the first tag to the node's primary
//! presentation and, for two-tone nodes, the second tag to a secondary one.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A semantic category a node can belong to.
///
/// Variants are declared in priority order; [`CategorySet`] keeps its tags
/// sorted by this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeCategory {
    /// Satellite node kept outside the main tree unless absorbed.
    Detached,
    /// Node rendered above the root.
    Prologue,
    /// The node the main tree is grown from.
    Root,
    /// Start of the second logical section.
    SecondaryRoot,
    /// Node whose narrative deliberately stops.
    Halt,
    /// Node with an edge into the secondary root.
    SecondaryRootFeeder,
    /// Node with an edge back to the root or the secondary root.
    LoopBack,
    /// Node with no outgoing edges that is not halted.
    Terminal,
    /// Node with no other category.
    Default,
}

impl NodeCategory {
    /// All categories in priority order.
    pub const ALL: [NodeCategory; 9] = [
        NodeCategory::Detached,
        NodeCategory::Prologue,
        NodeCategory::Root,
        NodeCategory::SecondaryRoot,
        NodeCategory::Halt,
        NodeCategory::SecondaryRootFeeder,
        NodeCategory::LoopBack,
        NodeCategory::Terminal,
        NodeCategory::Default,
    ];

    /// Returns the kebab-case tag used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Detached => "detached",
            NodeCategory::Prologue => "prologue",
            NodeCategory::Root => "root",
            NodeCategory::SecondaryRoot => "secondary-root",
            NodeCategory::Halt => "halt",
            NodeCategory::SecondaryRootFeeder => "secondary-root-feeder",
            NodeCategory::LoopBack => "loop-back",
            NodeCategory::Terminal => "terminal",
            NodeCategory::Default => "default",
        }
    }

    /// Returns `true` for the satellite categories that never get a
    /// two-tone presentation.
    pub fn is_satellite(self) -> bool {
        matches!(self, NodeCategory::Detached | NodeCategory::Prologue)
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for NodeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Ordered, non-empty set of categories for one node.
///
/// Tags are accumulated in [`NodeCategory`] priority order. A set built from
/// no tags holds exactly [`NodeCategory::Default`], and `Default` never
/// appears next to another tag.
///
/// # Examples
///
/// ```
/// use branchline_core::category::{CategorySet, NodeCategory};
///
/// let set = CategorySet::from_tags([NodeCategory::LoopBack, NodeCategory::Halt]);
/// assert_eq!(set.primary(), NodeCategory::Halt);
/// assert_eq!(set.secondary(), Some(NodeCategory::LoopBack));
///
/// let plain = CategorySet::from_tags([]);
/// assert_eq!(plain.primary(), NodeCategory::Default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorySet(Vec<NodeCategory>);

impl CategorySet {
    /// Builds a set from tags in any order, deduplicating and sorting them
    /// by priority.
    pub fn from_tags(tags: impl IntoIterator<Item = NodeCategory>) -> Self {
        let mut tags: Vec<NodeCategory> = tags
            .into_iter()
            .filter(|tag| *tag != NodeCategory::Default)
            .collect();
        tags.sort();
        tags.dedup();
        if tags.is_empty() {
            tags.push(NodeCategory::Default);
        }
        Self(tags)
    }

    /// The first tag, which drives the primary presentation.
    pub fn primary(&self) -> NodeCategory {
        self.0[0]
    }

    /// The two-tone hint: the second tag when the node has at least two tags
    /// and none of them is a satellite category.
    pub fn secondary(&self) -> Option<NodeCategory> {
        if self.0.len() < 2 || self.0.iter().any(|tag| tag.is_satellite()) {
            return None;
        }
        Some(self.0[1])
    }

    /// Returns `true` if the set holds `category`.
    pub fn contains(&self, category: NodeCategory) -> bool {
        self.0.contains(&category)
    }

    /// Iterates over the tags in priority order.
    pub fn iter(&self) -> impl Iterator<Item = NodeCategory> + '_ {
        self.0.iter().copied()
    }

    /// Number of tags in the set; always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the tags as a slice.
    pub fn as_slice(&self) -> &[NodeCategory] {
        &self.0
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn tags_strategy() -> impl Strategy<Value = Vec<NodeCategory>> {
        prop::collection::vec(prop::sample::select(NodeCategory::ALL.to_vec()), 0..12)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A set is never empty, and holds `Default` exactly when nothing else applies.
    fn check_default_law(tags: Vec<NodeCategory>) -> Result<(), TestCaseError> {
        let set = CategorySet::from_tags(tags.iter().copied());
        let has_other = tags.iter().any(|tag| *tag != NodeCategory::Default);

        prop_assert!(!set.is_empty());
        prop_assert_eq!(set.contains(NodeCategory::Default), !has_other);
        Ok(())
    }

    /// Tags are strictly increasing in priority order.
    fn check_sorted_unique(tags: Vec<NodeCategory>) -> Result<(), TestCaseError> {
        let set = CategorySet::from_tags(tags);

        prop_assert!(set.as_slice().windows(2).all(|pair| pair[0] < pair[1]));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn default_law(tags in tags_strategy()) {
            check_default_law(tags)?;
        }

        #[test]
        fn sorted_unique(tags in tags_strategy()) {
            check_sorted_unique(tags)?;
        }
    }
}
