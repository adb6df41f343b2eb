//! Toolbar rendering for `RibbonApp`.
//!
//! Draws the page bar, the re-init / stop controls, and the dark-mode and
//! stats toggles.

use eframe::egui;

use scroll_ribbon::ribbon::Trigger;

use super::RibbonApp;

impl RibbonApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            let response = ui.add_sized(
                [(ui.available_width() - 300.0).max(120.0), 24.0],
                egui::TextEdit::singleline(&mut self.page_input)
                    .hint_text("Page URL or HTML file...")
                    .font(egui::TextStyle::Monospace),
            );

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.navigate(ctx);
            }

            if ui.add_enabled(!self.loading, egui::Button::new("Open")).clicked() {
                self.navigate(ctx);
            }

            // Same entry point the page builder's widget-ready hook would use.
            let has_page = self.page.is_some();
            if ui
                .add_enabled(has_page, egui::Button::new("Re-init"))
                .on_hover_text("Initialize galleries that have no ribbon yet")
                .clicked()
            {
                self.initialize_ribbons(ctx, Trigger::ElementReady);
            }

            if ui
                .add_enabled(!self.registry.is_empty(), egui::Button::new("Stop"))
                .on_hover_text("Tear down all ribbons")
                .clicked()
            {
                self.stop_ribbons();
            }

            ui.separator();

            let theme_label = if self.dark_mode { "\u{2600}" } else { "\u{263E}" };
            if ui.button(theme_label).on_hover_text("Toggle dark mode").clicked() {
                self.dark_mode = !self.dark_mode;
            }

            ui.toggle_value(&mut self.show_stats, "Stats");
        });
    }
}
