//! Frame loop for a ribbon, with an explicit stop signal.
//!
//! The loop keeps asking for the next frame while its ribbon is paused, so a
//! resume takes effect on the very next frame. Only `LoopHandle::stop` ends it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ribbon::animator::{Ribbon, TickReport};

/// Cloneable stop switch for an `AnimationLoop`.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Whether the caller should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    NextFrame(TickReport),
    Stopped,
}

#[derive(Debug, Default)]
pub struct AnimationLoop {
    handle: LoopHandle,
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_stopped()
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame: tick the ribbon unless the loop has been stopped.
    pub fn frame(&mut self, ribbon: &mut Ribbon) -> Schedule {
        if self.handle.is_stopped() {
            return Schedule::Stopped;
        }
        self.frames += 1;
        Schedule::NextFrame(ribbon.tick())
    }

    /// Run up to `frames` frames back to back, stopping early if signalled.
    /// Returns the accumulated report.
    pub fn run(&mut self, ribbon: &mut Ribbon, frames: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..frames {
            match self.frame(ribbon) {
                Schedule::NextFrame(report) => {
                    summary.frames += 1;
                    if report.advanced {
                        summary.advanced += 1;
                    }
                    summary.recycled += report.recycled as u64;
                }
                Schedule::Stopped => break,
            }
        }
        summary
    }
}

/// Totals over a run of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub advanced: u64,
    pub recycled: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{GalleryWidget, WidgetKey};
    use crate::ribbon::{RibbonConfig, Signal};

    fn ribbon() -> Ribbon {
        let gallery = GalleryWidget {
            key: WidgetKey::from_ordinal(0),
            sources: vec!["a.png".into(), "b.png".into()],
        };
        Ribbon::new(&gallery, 800.0, RibbonConfig::default()).unwrap()
    }

    #[test]
    fn keeps_scheduling_while_paused() {
        let mut r = ribbon();
        let mut anim = AnimationLoop::new();
        r.signal(Signal::Hover, true);
        for _ in 0..10 {
            assert!(matches!(anim.frame(&mut r), Schedule::NextFrame(_)));
        }
        r.signal(Signal::Hover, false);
        match anim.frame(&mut r) {
            Schedule::NextFrame(report) => assert!(report.advanced),
            Schedule::Stopped => panic!("loop stopped unexpectedly"),
        }
    }

    #[test]
    fn stop_ends_the_loop_for_good() {
        let mut r = ribbon();
        let mut anim = AnimationLoop::new();
        let handle = anim.handle();
        anim.frame(&mut r);
        handle.stop();
        let offset = r.offset();
        for _ in 0..5 {
            assert_eq!(anim.frame(&mut r), Schedule::Stopped);
        }
        assert_eq!(r.offset(), offset);
        assert_eq!(anim.frames(), 1);
        assert!(anim.is_stopped());
    }

    #[test]
    fn run_summarizes_frames() {
        let mut r = ribbon();
        let mut anim = AnimationLoop::new();
        let summary = anim.run(&mut r, 1000);
        assert_eq!(summary.frames, 1000);
        assert_eq!(summary.advanced, 1000);
        // 1500px travelled over 320px slots.
        assert_eq!(summary.recycled, 4);
    }
}
