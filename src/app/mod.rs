//! `RibbonApp` — the top-level egui application state.
//!
//! This module declares the `RibbonApp` struct, its constructor and the
//! per-frame `update`. Drawing and loading are split across sub-modules:
//!
//! - `navigation` — page loading and ribbon (re)initialization
//! - `toolbar`    — page bar and controls
//! - `content`    — ribbons, input routing and the stats panel

pub mod content;
pub mod navigation;
pub mod toolbar;

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use scroll_ribbon::config::Config;
use scroll_ribbon::dom::WidgetKey;
use scroll_ribbon::engine::pipeline::PageResult;
use scroll_ribbon::error::LoadError;
use scroll_ribbon::net::image::ImageLoader;
use scroll_ribbon::ribbon::RibbonRegistry;

/// A decoded image uploaded to the GPU.
pub struct LoadedTexture {
    pub handle: egui::TextureHandle,
    pub size: [f32; 2],
    /// When the texture became available; drives the fade-in.
    pub ready_at: Instant,
}

// ─── Application state ───────────────────────────────────────────────────────

pub struct RibbonApp {
    pub page_input: String,
    pub page: Option<PageResult>,
    pub error: Option<String>,
    pub loading: bool,
    pub fetch_rx: Option<mpsc::Receiver<Result<PageResult, LoadError>>>,
    /// Navigate on the first frame (page given at startup).
    pub pending_navigation: bool,
    pub registry: RibbonRegistry,
    // Image loading
    pub image_loader: ImageLoader,
    pub image_textures: HashMap<String, LoadedTexture>,
    /// Touch currently dragging each ribbon.
    pub touches: HashMap<WidgetKey, egui::TouchId>,
    /// Fixed width for track sizing; the window width when `None`.
    pub viewport_width: Option<f32>,
    pub dark_mode: bool,
    pub show_stats: bool,
}

impl RibbonApp {
    pub fn new(config: Config) -> Self {
        let pending_navigation = config.page.is_some();
        Self {
            page_input: config.page.unwrap_or_default(),
            page: None,
            error: None,
            loading: false,
            fetch_rx: None,
            pending_navigation,
            registry: RibbonRegistry::new(config.ribbon),
            image_loader: ImageLoader::new(config.max_image_width),
            image_textures: HashMap::new(),
            touches: HashMap::new(),
            viewport_width: config.viewport_width,
            dark_mode: config.dark_mode,
            show_stats: false,
        }
    }

    /// Turn freshly decoded images into textures.
    fn upload_textures(&mut self, ctx: &egui::Context) {
        if self.image_loader.poll() == 0 && self.image_textures.len() == self.image_loader.loaded_count() {
            return;
        }
        for url in self.image_loader.loaded_urls() {
            if self.image_textures.contains_key(&url) {
                continue;
            }
            if let Some(data) = self.image_loader.get(&url) {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [data.width as usize, data.height as usize],
                    &data.rgba,
                );
                let handle = ctx.load_texture(format!("img_{}", url), image, egui::TextureOptions::LINEAR);
                self.image_textures.insert(
                    url,
                    LoadedTexture {
                        handle,
                        size: [data.width as f32, data.height as f32],
                        ready_at: Instant::now(),
                    },
                );
            }
        }
    }
}

impl eframe::App for RibbonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.pending_navigation {
            self.pending_navigation = false;
            self.navigate(ctx);
        }
        self.check_fetch(ctx);
        self.upload_textures(ctx);

        if self.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        // One tick per live ribbon per displayed frame. Paused ribbons still
        // ask for the next frame so they resume without a separate wake-up.
        if self.registry.frame_all() || self.image_loader.pending_count() > 0 {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        if self.show_stats {
            egui::SidePanel::right("stats")
                .default_width(240.0)
                .show(ctx, |ui| {
                    self.draw_stats_panel(ui);
                });
        }

        let ctx_clone = ctx.clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_content(ui, &ctx_clone);
        });
    }
}
