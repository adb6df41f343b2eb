//! Page loading for `RibbonApp`.
//!
//! A page load tears down the previous page's ribbons, fetches and scans the
//! new page on a background thread (`navigate`), and initializes ribbons for
//! its galleries once the result arrives (`check_fetch`).

use std::sync::mpsc;

use eframe::egui;

use scroll_ribbon::engine::pipeline::PageLoader;
use scroll_ribbon::ribbon::{InitOutcome, Trigger};

use super::RibbonApp;

impl RibbonApp {
    /// Start an async page load for the current input.
    pub fn navigate(&mut self, ctx: &egui::Context) {
        if self.loading || self.page_input.trim().is_empty() {
            return;
        }
        self.loading = true;
        self.error = None;
        self.page = None;
        self.registry.teardown_all();
        self.touches.clear();
        self.image_loader.clear();
        self.image_textures.clear();

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);

        let location = self.page_input.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let result = PageLoader::new().load_page(&location);
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Poll the async fetch channel; on success run the document-ready
    /// initialization for every gallery on the page.
    pub fn check_fetch(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.fetch_rx else { return };
        let Ok(result) = rx.try_recv() else { return };

        match result {
            Ok(page) => {
                log::info!(
                    "page ready in {:.0}ms: {} gallery widget(s)",
                    page.load_ms,
                    page.gallery_count()
                );
                self.page = Some(page);
                self.error = None;
                self.initialize_ribbons(ctx, Trigger::DocumentReady);
            }
            Err(e) => {
                log::warn!("page load failed: {}", e);
                self.error = Some(format!("[{}] {}", e.phase(), e));
                self.page = None;
            }
        }
        self.loading = false;
        self.fetch_rx = None;
    }

    /// Run the idempotent per-element initialization for every gallery.
    /// Already running ribbons are left untouched.
    pub fn initialize_ribbons(&mut self, ctx: &egui::Context, trigger: Trigger) {
        let Some(page) = &self.page else { return };
        let width = self
            .viewport_width
            .unwrap_or_else(|| ctx.screen_rect().width());

        let outcomes = self
            .registry
            .initialize_all(trigger, &page.document.galleries, width);

        for (gallery, outcome) in page.document.galleries.iter().zip(outcomes) {
            if outcome == InitOutcome::Created {
                for src in &gallery.sources {
                    self.image_loader.request(src);
                }
            }
        }
    }

    /// Stop every ribbon on the page without reloading it.
    pub fn stop_ribbons(&mut self) {
        self.registry.teardown_all();
        self.touches.clear();
    }
}
