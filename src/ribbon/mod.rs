//! The scroll ribbon: an endless leftward-flowing strip of gallery images.
//!
//! - `builder`  — how many copies of the source list fill the viewport
//! - `track`    — the rotating list of slides
//! - `animator` — per-tick offset advance, recycling, touch drag
//! - `gate`     — pause signals (visibility, window, hover, touch)
//! - `driver`   — frame loop with an explicit stop handle
//! - `registry` — one ribbon per gallery element, initialized once

pub mod animator;
pub mod builder;
pub mod driver;
pub mod gate;
pub mod registry;
pub mod track;

pub use animator::{Phase, Ribbon, TickReport};
pub use gate::{PauseGate, PausePolicy, Signal};
pub use registry::{InitOutcome, RibbonRegistry, Trigger};

/// Fixed behavior constants for one ribbon instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonConfig {
    /// Offset decrease per tick, in pixels.
    pub speed: f32,
    pub slot_width: f32,
    pub slot_height: f32,
    /// Space between neighbouring slides.
    pub gap: f32,
    /// Inner padding of the visual container.
    pub padding: f32,
    /// How many viewport widths of content to build.
    pub coverage: f32,
    pub corner_radius: f32,
    /// Visible-area ratio at or below which the ribbon counts as out of view.
    pub visibility_threshold: f32,
    /// Image fade-in duration once loaded, in seconds.
    pub fade_in_secs: f32,
    /// One sweep of the loading shimmer, in seconds.
    pub shimmer_period_secs: f32,
    /// Fraction of the width masked at each edge.
    pub edge_fade: f32,
    pub pause_policy: PausePolicy,
}

impl RibbonConfig {
    /// Horizontal space one slide occupies, gap included.
    pub fn slot_span(&self) -> f32 {
        self.slot_width + self.gap
    }

    /// Height of the visual container, padding included.
    pub fn container_height(&self) -> f32 {
        self.slot_height + self.padding * 2.0
    }
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            slot_width: 300.0,
            slot_height: 200.0,
            gap: 20.0,
            padding: 20.0,
            coverage: 3.0,
            corner_radius: 8.0,
            visibility_threshold: 0.1,
            fade_in_secs: 0.5,
            shimmer_period_secs: 2.0,
            edge_fade: 0.05,
            pause_policy: PausePolicy::default(),
        }
    }
}
