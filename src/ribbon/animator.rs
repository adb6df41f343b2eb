//! Ribbon animation state.
//!
//! Each tick moves the track left by `speed`. Once the head slide has fully
//! left the origin it is moved to the tail and its span is added back to the
//! offset, so the strip never runs out and never visibly jumps.
//!
//! Touch drag writes the same offset, so the drag and the animation cannot
//! disagree about where the strip is.

use crate::dom::{GalleryWidget, WidgetKey};
use crate::ribbon::builder::build_track;
use crate::ribbon::gate::{PauseGate, Signal};
use crate::ribbon::track::Track;
use crate::ribbon::RibbonConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub advanced: bool,
    /// Slides moved from head to tail during this tick.
    pub recycled: usize,
}

#[derive(Debug, Clone, Copy)]
struct TouchState {
    last_x: f32,
    /// Last frame-to-frame delta.
    velocity: f32,
}

/// One ribbon instance: its sources, track, offset and pause gate.
#[derive(Debug, Clone)]
pub struct Ribbon {
    key: WidgetKey,
    sources: Vec<String>,
    track: Track,
    offset: f32,
    gate: PauseGate,
    config: RibbonConfig,
    touch: Option<TouchState>,
    ticks: u64,
    recycles: u64,
}

impl Ribbon {
    /// Build a ribbon for a gallery. `None` if the gallery has no images.
    pub fn new(gallery: &GalleryWidget, viewport_width: f32, config: RibbonConfig) -> Option<Self> {
        let track = build_track(gallery.sources.len(), viewport_width, &config)?;
        Some(Self {
            key: gallery.key.clone(),
            sources: gallery.sources.clone(),
            track,
            offset: 0.0,
            gate: PauseGate::new(config.pause_policy),
            config,
            touch: None,
            ticks: 0,
            recycles: 0,
        })
    }

    pub fn key(&self) -> &WidgetKey {
        &self.key
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    /// Current horizontal translation of the track.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn gate(&self) -> &PauseGate {
        &self.gate
    }

    pub fn phase(&self) -> Phase {
        if self.gate.is_paused() {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn recycles(&self) -> u64 {
        self.recycles
    }

    /// Report a pause signal. Returns true if the signal changed.
    pub fn signal(&mut self, signal: Signal, active: bool) -> bool {
        self.gate.set(signal, active)
    }

    pub fn report_visibility(&mut self, ratio: f32) -> bool {
        self.gate
            .report_visibility(ratio, self.config.visibility_threshold)
    }

    /// Record the rendered width of a slide; the recycle threshold follows it.
    pub fn set_slide_width(&mut self, id: usize, width: f32) -> bool {
        self.track.set_width(id, width)
    }

    /// Advance one display frame.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        if self.phase() == Phase::Paused {
            return TickReport::default();
        }

        self.offset -= self.config.speed;
        let recycled = self.recycle_forward();
        TickReport {
            advanced: true,
            recycled,
        }
    }

    /// Begin a touch at pointer x. Pauses the ribbon.
    pub fn touch_start(&mut self, x: f32) {
        self.touch = Some(TouchState {
            last_x: x,
            velocity: 0.0,
        });
        self.gate.set(Signal::Touch, true);
    }

    /// Drag the strip by the pointer's movement since the last event.
    /// Ignored without an active touch.
    pub fn touch_move(&mut self, x: f32) -> bool {
        let Some(touch) = self.touch.as_mut() else {
            return false;
        };
        let delta = x - touch.last_x;
        touch.last_x = x;
        touch.velocity = delta;

        self.offset += delta;
        self.recycle_forward();
        self.recycle_backward();
        true
    }

    pub fn touch_end(&mut self) {
        if let Some(touch) = self.touch.take() {
            log::trace!("ribbon {}: touch released at velocity {}", self.key, touch.velocity);
        }
        self.gate.set(Signal::Touch, false);
    }

    /// Left edge of each slide relative to the container's content origin.
    pub fn slide_positions(&self) -> Vec<(usize, f32)> {
        self.track.positions(self.offset)
    }

    fn recycle_forward(&mut self) -> usize {
        let mut count = 0;
        // Bounded by track length so a degenerate span cannot spin forever.
        while count < self.track.len() {
            let Some(span) = self.track.head_span() else { break };
            if self.offset > -span {
                break;
            }
            self.track.rotate_forward();
            self.offset += span;
            count += 1;
        }
        self.recycles += count as u64;
        count
    }

    fn recycle_backward(&mut self) -> usize {
        let mut count = 0;
        while self.offset > 0.0 && count < self.track.len() {
            let Some(span) = self.track.rotate_backward() else { break };
            self.offset -= span;
            count += 1;
        }
        count
    }
}
