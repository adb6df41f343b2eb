//! Content builder: repeats the source list until the strip spans
//! `coverage` viewport widths, so recycling the head never exposes a gap
//! at the trailing edge.

use crate::ribbon::track::{Slide, Track};
use crate::ribbon::RibbonConfig;

/// Upper bound on slides in one track.
pub const MAX_SLIDES: usize = 4096;

/// Number of full copies of the source list to lay out.
///
/// `ceil(W * coverage / (N * slot_span))`, clamped to at least one copy and
/// at most as many as fit in `MAX_SLIDES`. Zero sources means zero copies.
pub fn repeat_count(viewport_width: f32, source_count: usize, config: &RibbonConfig) -> usize {
    if source_count == 0 {
        return 0;
    }
    let set_width = source_count as f32 * config.slot_span();
    let needed = viewport_width * config.coverage / set_width;
    if needed.is_nan() || needed <= 1.0 {
        return 1;
    }
    let cap = (MAX_SLIDES / source_count).max(1);
    if needed >= cap as f32 {
        log::warn!("{} copies of {} source(s) needed, capping at {}", needed.ceil(), source_count, cap);
        return cap;
    }
    needed.ceil() as usize
}

/// Lay out `repeat_count` copies of the sources, in order, as a track.
/// Returns `None` for an empty source list.
pub fn build_track(source_count: usize, viewport_width: f32, config: &RibbonConfig) -> Option<Track> {
    let repeats = repeat_count(viewport_width, source_count, config);
    if repeats == 0 {
        return None;
    }

    let slides = (0..repeats)
        .flat_map(|_| 0..source_count)
        .enumerate()
        .map(|(id, source)| Slide {
            id,
            source,
            width: config.slot_width,
        })
        .collect::<Vec<_>>();

    log::debug!(
        "built track: {} source(s) x {} repeat(s) = {} slide(s) for viewport {}px",
        source_count,
        repeats,
        slides.len(),
        viewport_width
    );

    Some(Track::new(slides, config.gap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_images_wide_viewport() {
        let config = RibbonConfig::default();
        assert_eq!(repeat_count(1200.0, 5, &config), 3);
        let track = build_track(5, 1200.0, &config).unwrap();
        assert_eq!(track.len(), 15);
    }

    #[test]
    fn no_sources_no_track() {
        let config = RibbonConfig::default();
        assert_eq!(repeat_count(1920.0, 0, &config), 0);
        assert!(build_track(0, 1920.0, &config).is_none());
    }

    #[test]
    fn length_covers_three_viewports() {
        let config = RibbonConfig::default();
        for n in 1..=12 {
            for w in [1.0f32, 320.0, 375.0, 800.0, 1280.0, 1919.0, 2560.0, 3840.0] {
                let len = build_track(n, w, &config).unwrap().len();
                assert!(len > 0);
                assert_eq!(len % n, 0, "n={} w={}", n, w);
                assert!(len as f32 >= 3.0 * w / 320.0, "n={} w={} len={}", n, w, len);
            }
        }
    }

    #[test]
    fn degenerate_viewport_still_builds_one_copy() {
        let config = RibbonConfig::default();
        assert_eq!(repeat_count(0.0, 4, &config), 1);
        assert_eq!(repeat_count(f32::NAN, 4, &config), 1);
        assert_eq!(repeat_count(-50.0, 4, &config), 1);
    }

    #[test]
    fn huge_viewport_is_capped() {
        let config = RibbonConfig::default();
        assert_eq!(repeat_count(1e30, 5, &config), MAX_SLIDES / 5);
        assert_eq!(repeat_count(f32::INFINITY, 5, &config), MAX_SLIDES / 5);
        assert_eq!(build_track(5, 1e30, &config).unwrap().len(), MAX_SLIDES / 5 * 5);
        // More sources than the cap still get one full copy.
        assert_eq!(repeat_count(1e30, MAX_SLIDES + 1, &config), 1);
    }

    #[test]
    fn preserves_source_order() {
        let config = RibbonConfig::default();
        let track = build_track(3, 2000.0, &config).unwrap();
        let sources: Vec<usize> = track.iter().map(|s| s.source).collect();
        assert_eq!(&sources[..6], &[0, 1, 2, 0, 1, 2]);
        let ids: Vec<usize> = track.iter().map(|s| s.id).collect();
        assert_eq!(ids, (0..track.len()).collect::<Vec<_>>());
    }
}
