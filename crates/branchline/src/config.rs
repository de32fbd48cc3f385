//! Configuration types for Branchline layout and interaction.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! TOML or any other serde source. Every field has a default, so a partial
//! configuration file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the three sections.
//! - [`LayoutConfig`] - Layer geometry: spacings, offsets and the centerline.
//! - [`EngineConfig`] - Graph model behavior: absorption, loop-back targets, root policy.
//! - [`HighlightConfig`] - Bounds for highlight propagation.
//!
//! # Example
//!
//! ```
//! # use branchline::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().layer_height(), 220.0);
//! assert!(config.engine().absorb_detached());
//! assert_eq!(config.highlight().max_hops(), 10);
//! ```

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    engine: EngineConfig,

    #[serde(default)]
    highlight: HighlightConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, engine: EngineConfig, highlight: HighlightConfig) -> Self {
        Self {
            layout,
            engine,
            highlight,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the engine configuration.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns the highlight configuration.
    pub fn highlight(&self) -> &HighlightConfig {
        &self.highlight
    }
}

/// Geometry of the layered layout.
///
/// Positions are in diagram units; `y` grows downwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical distance between two depth layers.
    layer_height: f32,
    /// Horizontal distance between two siblings of a layer.
    sibling_spacing: f32,
    /// Extra gap above the secondary-root section.
    secondary_root_gap: f32,
    /// `y` of the root layer.
    base_y: f32,
    /// Additional offset applied to the secondary-root section.
    secondary_root_offset: f32,
    /// `x` of the vertical centerline.
    center_x: f32,
    /// `y` of the prologue node.
    prologue_y: f32,
    /// Distance from the centerline to the first detached node.
    detached_offset_x: f32,
    /// `y` of the detached row.
    detached_y: f32,
    /// Horizontal pitch of the detached row.
    detached_pitch: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_height: 220.0,
            sibling_spacing: 200.0,
            secondary_root_gap: 100.0,
            base_y: 100.0,
            secondary_root_offset: 100.0,
            center_x: 1500.0,
            prologue_y: -150.0,
            detached_offset_x: 280.0,
            detached_y: 50.0,
            detached_pitch: 220.0,
        }
    }
}

impl LayoutConfig {
    pub fn layer_height(&self) -> f32 {
        self.layer_height
    }

    pub fn sibling_spacing(&self) -> f32 {
        self.sibling_spacing
    }

    pub fn secondary_root_gap(&self) -> f32 {
        self.secondary_root_gap
    }

    pub fn base_y(&self) -> f32 {
        self.base_y
    }

    pub fn secondary_root_offset(&self) -> f32 {
        self.secondary_root_offset
    }

    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    pub fn prologue_y(&self) -> f32 {
        self.prologue_y
    }

    pub fn detached_offset_x(&self) -> f32 {
        self.detached_offset_x
    }

    pub fn detached_y(&self) -> f32 {
        self.detached_y
    }

    pub fn detached_pitch(&self) -> f32 {
        self.detached_pitch
    }

    /// Returns a copy with a different layer height.
    pub fn with_layer_height(mut self, layer_height: f32) -> Self {
        self.layer_height = layer_height;
        self
    }

    /// Returns a copy with a different centerline.
    pub fn with_center_x(mut self, center_x: f32) -> Self {
        self.center_x = center_x;
        self
    }
}

/// Which nodes an edge must point at to make its source a loop-back node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopBackTargets {
    /// Edges to the root or the secondary root.
    #[default]
    RootAndSecondary,
    /// Edges to the root only.
    RootOnly,
}

/// How integrity errors in a document are handled when building a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrityMode {
    /// Any error-level finding aborts the build.
    Strict,
    /// Offending edges are dropped or repaired and reported.
    #[default]
    Degraded,
}

/// Graph model behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Promote detached nodes that receive an edge from the main tree.
    absorb_detached: bool,
    loop_back_targets: LoopBackTargets,
    /// Treat a missing zero-incoming root as an error instead of a warning.
    strict_root: bool,
    integrity: IntegrityMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            absorb_detached: true,
            loop_back_targets: LoopBackTargets::default(),
            strict_root: false,
            integrity: IntegrityMode::default(),
        }
    }
}

impl EngineConfig {
    pub fn absorb_detached(&self) -> bool {
        self.absorb_detached
    }

    pub fn loop_back_targets(&self) -> LoopBackTargets {
        self.loop_back_targets
    }

    pub fn strict_root(&self) -> bool {
        self.strict_root
    }

    pub fn integrity(&self) -> IntegrityMode {
        self.integrity
    }

    pub fn with_absorb_detached(mut self, absorb_detached: bool) -> Self {
        self.absorb_detached = absorb_detached;
        self
    }

    pub fn with_loop_back_targets(mut self, loop_back_targets: LoopBackTargets) -> Self {
        self.loop_back_targets = loop_back_targets;
        self
    }

    pub fn with_strict_root(mut self, strict_root: bool) -> Self {
        self.strict_root = strict_root;
        self
    }

    pub fn with_integrity(mut self, integrity: IntegrityMode) -> Self {
        self.integrity = integrity;
        self
    }
}

/// Highlight propagation bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Maximum recursion depth of the indirect-incoming walk.
    max_hops: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { max_hops: 10 }
    }
}

impl HighlightConfig {
    pub fn new(max_hops: usize) -> Self {
        Self { max_hops }
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }
}
