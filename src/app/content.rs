//! Content-area rendering for `RibbonApp`.
//!
//! - `draw_content`     — spinner, error, or the page's galleries
//! - `draw_ribbon`      — one ribbon: pause signals, touch drag, painting
//! - `draw_stats_panel` — right-side statistics panel

use eframe::egui;
use egui::{Pos2, Rect, Rounding};

use scroll_ribbon::dom::WidgetKey;
use scroll_ribbon::render::paint::{
    fade_alpha, paint_edge_fade, paint_image, paint_shimmer, shimmer_phase, Theme,
};
use scroll_ribbon::ribbon::gate::intersection_ratio;
use scroll_ribbon::ribbon::{Phase, Signal};

use super::RibbonApp;

/// A touch event from this frame's input.
struct TouchInput {
    id: egui::TouchId,
    phase: egui::TouchPhase,
    pos: Pos2,
}

fn rect4(r: Rect) -> [f32; 4] {
    [r.min.x, r.min.y, r.width(), r.height()]
}

impl RibbonApp {
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.loading {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }

        if let Some(ref error) = self.error {
            ui.colored_label(egui::Color32::RED, error);
            return;
        }

        let Some(page) = &self.page else {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(100.0);
                    ui.heading("Scroll Ribbon");
                    ui.label("Open a page with an image gallery");
                });
            });
            return;
        };

        let title = if page.document.title.is_empty() {
            page.document.url.clone()
        } else {
            page.document.title.clone()
        };
        let galleries: Vec<(WidgetKey, usize)> = page
            .document
            .galleries
            .iter()
            .map(|g| (g.key.clone(), g.sources.len()))
            .collect();

        let (touches, hidden, time) = ctx.input(|i| {
            let touches: Vec<TouchInput> = i
                .events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Touch { id, phase, pos, .. } => Some(TouchInput {
                        id: *id,
                        phase: *phase,
                        pos: *pos,
                    }),
                    _ => None,
                })
                .collect();
            (touches, i.viewport().minimized.unwrap_or(false), i.time)
        });

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(title);
            ui.separator();

            if galleries.is_empty() {
                ui.colored_label(egui::Color32::GRAY, "No image gallery on this page");
            }

            for (key, source_count) in &galleries {
                ui.add_space(12.0);
                if *source_count == 0 {
                    ui.colored_label(
                        egui::Color32::GRAY,
                        format!("Gallery {}: no images", key),
                    );
                    continue;
                }
                if !self.draw_ribbon(ui, key, &touches, hidden, time) {
                    ui.colored_label(egui::Color32::GRAY, format!("Gallery {}: stopped", key));
                }
            }

            // Room to scroll the galleries out of view.
            ui.add_space(ui.clip_rect().height());
        });
    }

    /// Draw one ribbon. Returns false if the gallery has no live ribbon.
    fn draw_ribbon(
        &mut self,
        ui: &mut egui::Ui,
        key: &WidgetKey,
        touches: &[TouchInput],
        hidden: bool,
        time: f64,
    ) -> bool {
        let Some(instance) = self.registry.get_mut(key) else {
            return false;
        };
        let ribbon = &mut instance.ribbon;
        let config = ribbon.config().clone();
        let theme = Theme::for_mode(self.dark_mode);

        let state = match ribbon.phase() {
            Phase::Running => "running",
            Phase::Paused => "paused",
        };
        ui.colored_label(
            theme.caption,
            format!(
                "Gallery {} \u{00B7} {} images \u{00B7} {} slides \u{00B7} {}",
                key,
                ribbon.sources().len(),
                ribbon.track().len(),
                state
            ),
        );

        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), config.container_height()),
            egui::Sense::hover(),
        );

        // Pause producers
        ribbon.report_visibility(intersection_ratio(rect4(rect), rect4(ui.clip_rect())));
        ribbon.signal(Signal::WindowHidden, hidden);
        ribbon.signal(Signal::Hover, response.contains_pointer());

        // Touch drag
        for touch in touches {
            let active = self.touches.get(key) == Some(&touch.id);
            match touch.phase {
                egui::TouchPhase::Start => {
                    if !self.touches.contains_key(key) && rect.contains(touch.pos) {
                        ribbon.touch_start(touch.pos.x);
                        self.touches.insert(key.clone(), touch.id);
                    }
                }
                egui::TouchPhase::Move => {
                    if active {
                        ribbon.touch_move(touch.pos.x);
                    }
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    if active {
                        ribbon.touch_end();
                        self.touches.remove(key);
                    }
                }
            }
        }

        // Paint
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, Rounding::ZERO, theme.background);

        let origin = rect.min + egui::vec2(config.padding, config.padding);
        let phase = shimmer_phase(time, config.shimmer_period_secs);

        for (slide, (_, x)) in ribbon.track().iter().zip(ribbon.slide_positions()) {
            let slide_rect = Rect::from_min_size(
                origin + egui::vec2(x, 0.0),
                egui::vec2(slide.width, config.slot_height),
            );
            if slide_rect.max.x < rect.min.x {
                continue;
            }
            if slide_rect.min.x > rect.max.x {
                break;
            }

            let texture = ribbon
                .sources()
                .get(slide.source)
                .and_then(|src| self.image_textures.get(src));

            match texture {
                Some(tex) => {
                    let alpha = fade_alpha(tex.ready_at.elapsed().as_secs_f32(), config.fade_in_secs);
                    if alpha < 1.0 {
                        paint_shimmer(&painter, slide_rect, config.corner_radius, phase, &theme);
                    }
                    paint_image(
                        &painter,
                        slide_rect,
                        config.corner_radius,
                        tex.handle.id(),
                        tex.size,
                        alpha,
                    );
                }
                // Still loading, or failed: keep shimmering.
                None => paint_shimmer(&painter, slide_rect, config.corner_radius, phase, &theme),
            }
        }

        paint_edge_fade(&painter, rect, config.edge_fade, theme.background);
        true
    }

    pub fn draw_stats_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Ribbons");
        ui.separator();

        if self.registry.is_empty() {
            ui.colored_label(egui::Color32::GRAY, "No live ribbons");
        }

        for key in self.registry.keys() {
            let Some(instance) = self.registry.get(key) else { continue };
            let ribbon = &instance.ribbon;
            ui.strong(format!("Gallery {}", key));
            egui::Grid::new(format!("stats_{}", key))
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    ui.label("Phase:");
                    ui.label(format!("{:?}", ribbon.phase()));
                    ui.end_row();

                    ui.label("Offset:");
                    ui.label(format!("{:.1}px", ribbon.offset()));
                    ui.end_row();

                    ui.label("Frames:");
                    ui.label(format!("{}", instance.animation.frames()));
                    ui.end_row();

                    ui.label("Recycles:");
                    ui.label(format!("{}", ribbon.recycles()));
                    ui.end_row();

                    ui.label("Policy:");
                    ui.label(ribbon.gate().policy().name());
                    ui.end_row();

                    ui.label("Holding:");
                    let active = ribbon.gate().active_signals();
                    if active.is_empty() {
                        ui.label("-");
                    } else {
                        ui.label(
                            active
                                .iter()
                                .map(|s| format!("{:?}", s))
                                .collect::<Vec<_>>()
                                .join(", "),
                        );
                    }
                    ui.end_row();
                });
            ui.add_space(8.0);
        }

        ui.separator();
        ui.heading("Images");
        ui.label(format!("Loaded: {}", self.image_loader.loaded_count()));
        ui.label(format!("Pending: {}", self.image_loader.pending_count()));
        ui.label(format!("Failed: {}", self.image_loader.failed_count()));

        if let Some(ref page) = self.page {
            ui.separator();
            ui.label(format!("Load time: {:.0}ms", page.load_ms));
            ui.label(format!("HTTP {}", page.fetch_status));
        }
    }
}
