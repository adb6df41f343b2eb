//! Interaction gate: decides whether the ribbon advances on a tick.
//!
//! Four producers report independently. Writes are edge-triggered: reporting
//! the value a signal already holds is not an event, so producers may report
//! every frame.

/// A pause producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Visible area ratio at or below the threshold.
    OutOfView,
    /// Window minimized or otherwise hidden.
    WindowHidden,
    /// Pointer over the ribbon.
    Hover,
    /// A touch is in progress on the ribbon.
    Touch,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::OutOfView,
        Signal::WindowHidden,
        Signal::Hover,
        Signal::Touch,
    ];

    fn index(self) -> usize {
        match self {
            Signal::OutOfView => 0,
            Signal::WindowHidden => 1,
            Signal::Hover => 2,
            Signal::Touch => 3,
        }
    }
}

/// How active signals combine into the paused state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PausePolicy {
    /// Paused while any signal is active.
    #[default]
    AnyActive,
    /// Paused state is whatever the most recent signal change said,
    /// regardless of the other signals. Ending a touch while off-screen
    /// resumes the ribbon under this policy.
    LastWriterWins,
}

impl PausePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "any-active" | "or" => Some(PausePolicy::AnyActive),
            "last" | "last-writer" | "last-writer-wins" => Some(PausePolicy::LastWriterWins),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PausePolicy::AnyActive => "any-active",
            PausePolicy::LastWriterWins => "last-writer-wins",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PauseGate {
    policy: PausePolicy,
    active: [bool; 4],
    last_write: bool,
}

impl PauseGate {
    pub fn new(policy: PausePolicy) -> Self {
        Self {
            policy,
            active: [false; 4],
            last_write: false,
        }
    }

    pub fn policy(&self) -> PausePolicy {
        self.policy
    }

    /// Report a signal's current value. Returns true if it changed.
    pub fn set(&mut self, signal: Signal, active: bool) -> bool {
        let slot = &mut self.active[signal.index()];
        if *slot == active {
            return false;
        }
        *slot = active;
        self.last_write = active;
        log::trace!("gate: {:?} -> {}", signal, active);
        true
    }

    /// Report the widget's visible-area ratio.
    pub fn report_visibility(&mut self, ratio: f32, threshold: f32) -> bool {
        self.set(Signal::OutOfView, ratio <= threshold)
    }

    pub fn is_active(&self, signal: Signal) -> bool {
        self.active[signal.index()]
    }

    pub fn is_paused(&self) -> bool {
        match self.policy {
            PausePolicy::AnyActive => self.active.iter().any(|&a| a),
            PausePolicy::LastWriterWins => self.last_write,
        }
    }

    /// Signals currently holding the ribbon, for display.
    pub fn active_signals(&self) -> Vec<Signal> {
        Signal::ALL
            .iter()
            .copied()
            .filter(|s| self.is_active(*s))
            .collect()
    }
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new(PausePolicy::default())
    }
}

/// Fraction of `widget` inside `viewport`. Rects are `[x, y, w, h]`.
pub fn intersection_ratio(widget: [f32; 4], viewport: [f32; 4]) -> f32 {
    let area = widget[2] * widget[3];
    if area <= 0.0 {
        return 0.0;
    }
    let x0 = widget[0].max(viewport[0]);
    let y0 = widget[1].max(viewport[1]);
    let x1 = (widget[0] + widget[2]).min(viewport[0] + viewport[2]);
    let y1 = (widget[1] + widget[3]).min(viewport[1] + viewport[3]);
    let overlap = (x1 - x0).max(0.0) * (y1 - y0).max(0.0);
    (overlap / area).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_active_holds_until_all_clear() {
        let mut gate = PauseGate::new(PausePolicy::AnyActive);
        gate.set(Signal::OutOfView, true);
        gate.set(Signal::Touch, true);
        gate.set(Signal::Touch, false);
        assert!(gate.is_paused());
        assert_eq!(gate.active_signals(), vec![Signal::OutOfView]);
        gate.set(Signal::OutOfView, false);
        assert!(!gate.is_paused());
    }

    #[test]
    fn last_writer_resumes_on_touch_end_off_screen() {
        let mut gate = PauseGate::new(PausePolicy::LastWriterWins);
        gate.set(Signal::OutOfView, true);
        gate.set(Signal::Touch, true);
        gate.set(Signal::Touch, false);
        assert!(!gate.is_paused());
        assert!(gate.is_active(Signal::OutOfView));
    }

    #[test]
    fn repeated_reports_are_not_events() {
        let mut gate = PauseGate::new(PausePolicy::LastWriterWins);
        assert!(gate.set(Signal::Hover, true));
        assert!(!gate.set(Signal::Hover, true));
        assert!(!gate.set(Signal::Hover, true));
        // An unchanged visibility report must not clobber the hover pause.
        assert!(!gate.report_visibility(1.0, 0.1));
        assert!(gate.is_paused());
        assert!(gate.set(Signal::Hover, false));
        assert!(!gate.is_paused());
    }

    #[test]
    fn visibility_threshold_is_inclusive() {
        let mut gate = PauseGate::default();
        gate.report_visibility(0.1, 0.1);
        assert!(gate.is_paused());
        gate.report_visibility(0.11, 0.1);
        assert!(!gate.is_paused());
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(PausePolicy::parse("any"), Some(PausePolicy::AnyActive));
        assert_eq!(PausePolicy::parse("Last-Writer"), Some(PausePolicy::LastWriterWins));
        assert_eq!(PausePolicy::parse("sometimes"), None);
    }

    #[test]
    fn intersection_ratios() {
        let view = [0.0, 0.0, 100.0, 100.0];
        assert_eq!(intersection_ratio([10.0, 10.0, 20.0, 20.0], view), 1.0);
        assert_eq!(intersection_ratio([0.0, 90.0, 100.0, 20.0], view), 0.5);
        assert_eq!(intersection_ratio([0.0, 200.0, 100.0, 20.0], view), 0.0);
        assert_eq!(intersection_ratio([0.0, 0.0, 0.0, 20.0], view), 0.0);
    }
}
