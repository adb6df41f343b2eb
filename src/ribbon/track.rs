//! The track: slides in display order, rotated in place by recycling.

use std::collections::VecDeque;

/// One wrapper box in the track.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// Stable identity, assigned at build time.
    pub id: usize,
    /// Index into the ribbon's source list.
    pub source: usize,
    /// Measured width. All slides start at the configured slot width.
    pub width: f32,
}

/// Ordered, circularly rotated sequence of slides.
#[derive(Debug, Clone)]
pub struct Track {
    slides: VecDeque<Slide>,
    gap: f32,
}

impl Track {
    pub fn new(slides: Vec<Slide>, gap: f32) -> Self {
        Self {
            slides: slides.into(),
            gap,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn head(&self) -> Option<&Slide> {
        self.slides.front()
    }

    pub fn tail(&self) -> Option<&Slide> {
        self.slides.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Width of the head slide plus the gap after it.
    pub fn head_span(&self) -> Option<f32> {
        self.head().map(|s| s.width + self.gap)
    }

    /// Move the head slide to the tail. Returns its span.
    pub fn rotate_forward(&mut self) -> Option<f32> {
        let slide = self.slides.pop_front()?;
        let span = slide.width + self.gap;
        self.slides.push_back(slide);
        Some(span)
    }

    /// Move the tail slide to the head. Returns its span.
    pub fn rotate_backward(&mut self) -> Option<f32> {
        let slide = self.slides.pop_back()?;
        let span = slide.width + self.gap;
        self.slides.push_front(slide);
        Some(span)
    }

    /// Record a newly measured width for a slide.
    pub fn set_width(&mut self, id: usize, width: f32) -> bool {
        match self.slides.iter_mut().find(|s| s.id == id) {
            Some(slide) if width.is_finite() && width > 0.0 => {
                slide.width = width;
                true
            }
            _ => false,
        }
    }

    /// Left edge of each slide relative to the track origin at `offset`.
    pub fn positions(&self, offset: f32) -> Vec<(usize, f32)> {
        let mut x = offset;
        self.slides
            .iter()
            .map(|s| {
                let pos = (s.id, x);
                x += s.width + self.gap;
                pos
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(n: usize) -> Track {
        let slides = (0..n)
            .map(|id| Slide {
                id,
                source: id % 2,
                width: 300.0,
            })
            .collect();
        Track::new(slides, 20.0)
    }

    #[test]
    fn rotation_preserves_length_and_cycles() {
        let mut t = track(4);
        for _ in 0..4 {
            assert_eq!(t.rotate_forward(), Some(320.0));
            assert_eq!(t.len(), 4);
        }
        assert_eq!(t.head().unwrap().id, 0);

        t.rotate_backward();
        assert_eq!(t.head().unwrap().id, 3);
        assert_eq!(t.tail().unwrap().id, 2);
    }

    #[test]
    fn empty_track_does_not_rotate() {
        let mut t = Track::new(Vec::new(), 20.0);
        assert_eq!(t.rotate_forward(), None);
        assert_eq!(t.head_span(), None);
        assert!(t.positions(0.0).is_empty());
    }

    #[test]
    fn positions_follow_widths() {
        let mut t = track(3);
        assert!(t.set_width(1, 100.0));
        assert!(!t.set_width(1, f32::NAN));
        assert!(!t.set_width(9, 100.0));
        let pos = t.positions(-10.0);
        assert_eq!(pos, vec![(0, -10.0), (1, 310.0), (2, 430.0)]);
    }
}
