//! egui Painter routines for the ribbon.
//!
//! Slides are painted as rounded boxes: a sweeping shimmer while the image
//! is loading (or after it failed), then the image itself, cropped to cover
//! the box and faded in. Both ends of the strip fade into the background.

use egui::epaint::RectShape;
use egui::{Color32, Mesh, Pos2, Rect, Rounding, Shape, TextureId, Vec2};

/// Colors for ribbon painting.
pub struct Theme {
    pub background: Color32,
    pub placeholder: Color32,
    pub highlight: Color32,
    pub caption: Color32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(248, 248, 250),
            placeholder: Color32::from_rgb(226, 228, 232),
            highlight: Color32::from_rgba_unmultiplied(67, 140, 202, 77),
            caption: Color32::from_rgb(90, 90, 100),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(24, 24, 30),
            placeholder: Color32::from_rgb(16, 16, 16),
            highlight: Color32::from_rgba_unmultiplied(67, 140, 202, 77),
            caption: Color32::from_rgb(150, 150, 160),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Shimmer gradient stops over a band twice the box width:
/// (position, highlight strength).
const SHIMMER_STOPS: &[(f32, f32)] = &[
    (0.0, 0.0),
    (0.20, 0.0),
    (0.30, 1.0),
    (0.35, 0.67),
    (0.45, 0.0),
    (1.0, 0.0),
];

/// Sweep position in `0.0..1.0` for a shimmer of the given period.
pub fn shimmer_phase(time_secs: f64, period_secs: f32) -> f32 {
    if period_secs <= 0.0 {
        return 0.0;
    }
    (time_secs.rem_euclid(period_secs as f64) / period_secs as f64) as f32
}

/// Opacity of an image `elapsed_secs` after it finished loading.
pub fn fade_alpha(elapsed_secs: f32, duration_secs: f32) -> f32 {
    if duration_secs <= 0.0 {
        return 1.0;
    }
    (elapsed_secs / duration_secs).clamp(0.0, 1.0)
}

/// UV sub-rect that crops an image to fill `target` without distortion.
pub fn cover_uv(image_size: [f32; 2], target: Vec2) -> Rect {
    let full = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    let [iw, ih] = image_size;
    if iw <= 0.0 || ih <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }
    let image_aspect = iw / ih;
    let target_aspect = target.x / target.y;
    if image_aspect > target_aspect {
        // Wider than the box: crop left and right.
        let w = target_aspect / image_aspect;
        let x0 = (1.0 - w) * 0.5;
        Rect::from_min_max(Pos2::new(x0, 0.0), Pos2::new(x0 + w, 1.0))
    } else {
        let h = image_aspect / target_aspect;
        let y0 = (1.0 - h) * 0.5;
        Rect::from_min_max(Pos2::new(0.0, y0), Pos2::new(1.0, y0 + h))
    }
}

/// Loading placeholder: a dark rounded box with a highlight band sweeping
/// across it. `phase` comes from `shimmer_phase`.
pub fn paint_shimmer(painter: &egui::Painter, rect: Rect, radius: f32, phase: f32, theme: &Theme) {
    let columns = ((rect.width() / 4.0).ceil() as usize).clamp(8, 128);
    let step = rect.width() / columns as f32;
    let mut mesh = Mesh::default();

    for i in 0..=columns {
        let x = rect.min.x + step * i as f32;
        let inset = corner_inset(x - rect.min.x, rect.width(), radius);
        // The gradient band is twice the box wide and slides right to left.
        let u = ((x - rect.min.x) / (rect.width() * 2.0) + phase).rem_euclid(1.0);
        let color = blend(theme.placeholder, theme.highlight, shimmer_strength(u));
        mesh.colored_vertex(Pos2::new(x, rect.min.y + inset), color);
        mesh.colored_vertex(Pos2::new(x, rect.max.y - inset), color);
        if i > 0 {
            let base = (i as u32 - 1) * 2;
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base + 1, base + 3, base + 2);
        }
    }
    painter.add(Shape::mesh(mesh));
}

/// Loaded image cropped to cover `rect`, at `alpha` opacity.
pub fn paint_image(
    painter: &egui::Painter,
    rect: Rect,
    radius: f32,
    texture: TextureId,
    image_size: [f32; 2],
    alpha: f32,
) {
    painter.add(image_shape(rect, radius, texture, image_size, alpha));
}

fn image_shape(
    rect: Rect,
    radius: f32,
    texture: TextureId,
    image_size: [f32; 2],
    alpha: f32,
) -> RectShape {
    let tint = Color32::from_white_alpha((alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
    RectShape {
        fill_texture_id: texture,
        uv: cover_uv(image_size, rect.size()),
        ..RectShape::filled(rect, Rounding::same(radius), tint)
    }
}

/// Fade both ends of `rect` into `background` over `fraction` of its width.
pub fn paint_edge_fade(painter: &egui::Painter, rect: Rect, fraction: f32, background: Color32) {
    let band = rect.width() * fraction.clamp(0.0, 0.5);
    if band <= 0.0 {
        return;
    }
    let mut mesh = Mesh::default();
    horizontal_gradient(
        &mut mesh,
        Rect::from_min_max(rect.min, Pos2::new(rect.min.x + band, rect.max.y)),
        background,
        Color32::TRANSPARENT,
    );
    horizontal_gradient(
        &mut mesh,
        Rect::from_min_max(Pos2::new(rect.max.x - band, rect.min.y), rect.max),
        Color32::TRANSPARENT,
        background,
    );
    painter.add(Shape::mesh(mesh));
}

fn horizontal_gradient(mesh: &mut Mesh, rect: Rect, left: Color32, right: Color32) {
    let base = mesh.vertices.len() as u32;
    mesh.colored_vertex(rect.left_top(), left);
    mesh.colored_vertex(rect.right_top(), right);
    mesh.colored_vertex(rect.left_bottom(), left);
    mesh.colored_vertex(rect.right_bottom(), right);
    mesh.add_triangle(base, base + 1, base + 2);
    mesh.add_triangle(base + 1, base + 3, base + 2);
}

/// Vertical inset at horizontal position `x` that keeps a strip inside
/// rounded corners of `radius`.
fn corner_inset(x: f32, width: f32, radius: f32) -> f32 {
    let r = radius.min(width * 0.5).max(0.0);
    let d = if x < r {
        r - x
    } else if x > width - r {
        x - (width - r)
    } else {
        return 0.0;
    };
    r - (r * r - d * d).max(0.0).sqrt()
}

fn shimmer_strength(u: f32) -> f32 {
    for pair in SHIMMER_STOPS.windows(2) {
        let (p0, s0) = pair[0];
        let (p1, s1) = pair[1];
        if u >= p0 && u <= p1 {
            let t = if p1 > p0 { (u - p0) / (p1 - p0) } else { 0.0 };
            return s0 + (s1 - s0) * t;
        }
    }
    0.0
}

/// `base` with `overlay` composited on top at `strength` times its alpha.
fn blend(base: Color32, overlay: Color32, strength: f32) -> Color32 {
    let [or, og, ob, oa] = overlay.to_srgba_unmultiplied();
    let a = (oa as f32 / 255.0) * strength.clamp(0.0, 1.0);
    let mix = |b: u8, o: u8| (b as f32 + (o as f32 - b as f32) * a).round() as u8;
    Color32::from_rgb(mix(base.r(), or), mix(base.g(), og), mix(base.b(), ob))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_crops_wide_image_horizontally() {
        let uv = cover_uv([600.0, 200.0], Vec2::new(300.0, 200.0));
        assert!((uv.width() - 0.5).abs() < 1e-5);
        assert!((uv.min.x - 0.25).abs() < 1e-5);
        assert_eq!(uv.height(), 1.0);
    }

    #[test]
    fn cover_crops_tall_image_vertically() {
        let uv = cover_uv([300.0, 400.0], Vec2::new(300.0, 200.0));
        assert_eq!(uv.width(), 1.0);
        assert!((uv.height() - 0.5).abs() < 1e-5);
        assert!((uv.min.y - 0.25).abs() < 1e-5);
    }

    #[test]
    fn cover_degenerate_sizes_use_full_texture() {
        let uv = cover_uv([0.0, 10.0], Vec2::new(300.0, 200.0));
        assert_eq!(uv, Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)));
    }

    #[test]
    fn image_shape_samples_texture_with_cover_crop() {
        let rect = Rect::from_min_size(Pos2::new(20.0, 20.0), Vec2::new(300.0, 200.0));
        let shape = image_shape(rect, 8.0, TextureId::User(7), [600.0, 200.0], 0.5);
        assert_eq!(shape.fill_texture_id, TextureId::User(7));
        assert_eq!(shape.uv, cover_uv([600.0, 200.0], rect.size()));
        assert_eq!(shape.rect, rect);
        assert_eq!(shape.rounding, Rounding::same(8.0));
        assert_eq!(shape.fill, Color32::from_white_alpha(128));
    }

    #[test]
    fn fade_ramps_then_holds() {
        assert_eq!(fade_alpha(0.0, 0.5), 0.0);
        assert!((fade_alpha(0.25, 0.5) - 0.5).abs() < 1e-6);
        assert_eq!(fade_alpha(3.0, 0.5), 1.0);
        assert_eq!(fade_alpha(0.0, 0.0), 1.0);
    }

    #[test]
    fn shimmer_phase_wraps() {
        assert!((shimmer_phase(0.5, 2.0) - 0.25).abs() < 1e-6);
        assert!((shimmer_phase(2.5, 2.0) - 0.25).abs() < 1e-6);
        assert_eq!(shimmer_phase(1.0, 0.0), 0.0);
    }

    #[test]
    fn shimmer_band_peaks_at_thirty_percent() {
        assert_eq!(shimmer_strength(0.1), 0.0);
        assert!((shimmer_strength(0.3) - 1.0).abs() < 1e-6);
        assert_eq!(shimmer_strength(0.8), 0.0);
    }

    #[test]
    fn corner_inset_only_near_edges() {
        assert_eq!(corner_inset(150.0, 300.0, 8.0), 0.0);
        assert!((corner_inset(0.0, 300.0, 8.0) - 8.0).abs() < 1e-5);
        assert!((corner_inset(300.0, 300.0, 8.0) - 8.0).abs() < 1e-5);
    }

    #[test]
    fn blend_respects_strength() {
        let base = Color32::from_rgb(16, 16, 16);
        let over = Color32::from_rgb(116, 216, 16);
        assert_eq!(blend(base, over, 0.0), base);
        assert_eq!(blend(base, over, 1.0), over);
        assert_eq!(blend(base, over, 0.5), Color32::from_rgb(66, 116, 16));
    }
}
