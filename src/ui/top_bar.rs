//! Top bar UI: app title, search, and status.

use eframe::egui::{self, Color32, RichText};
use globe_explorer::GlobeContext;
use web_time::Instant;

pub fn render_top_bar(
    ctx: &egui::Context,
    search_term: &mut String,
    globe: &mut GlobeContext,
    now: Instant,
) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("Globe Explorer")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                ui.label(
                    RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS)
                        .size(14.0)
                        .color(Color32::GRAY),
                );
                let response = ui.add(
                    egui::TextEdit::singleline(search_term)
                        .hint_text("Location or country")
                        .desired_width(200.0)
                        .font(egui::FontId::proportional(13.0)),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if ui.button("Search").clicked() || submitted {
                    globe.handle_search(search_term, now);
                } else if response.changed() {
                    globe.handle_search_input(search_term, now);
                }

                ui.separator();

                ui.label(
                    RichText::new(globe.status())
                        .size(13.0)
                        .color(Color32::GRAY),
                );
            });
        });
}
