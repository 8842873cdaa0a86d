#![warn(clippy::all)]

//! Globe Explorer - An interactive 3D globe.
//!
//! Shows country borders and named locations on a rotating globe. Clicking a
//! marker or searching for a place flies the camera to it.

mod ui;

use eframe::egui;
use globe_explorer::{GlobeConfig, GlobeContext, GlobeError};
use web_time::Instant;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Globe Explorer",
        native_options,
        Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach to");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("globe_canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("Failed to find canvas element globe_canvas");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct GlobeApp {
    /// Globe state, or the error that prevented building it
    globe: Result<GlobeContext, GlobeError>,

    /// Current contents of the search box
    search_term: String,

    /// Time of the previous frame, for frame deltas
    last_frame: Instant,
}

impl GlobeApp {
    /// Creates a new app instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let globe = GlobeContext::with_bundled_data(GlobeConfig::default());
        match &globe {
            Ok(globe) => log::info!(
                "Globe ready: {} border lines, {} locations, {} countries",
                globe.scene().borders.len(),
                globe.markers().locations().len(),
                globe.countries().len()
            ),
            Err(e) => log::error!("Failed to build globe: {}", e),
        }

        Self {
            globe,
            search_term: String::new(),
            last_frame: Instant::now(),
        }
    }
}

impl eframe::App for GlobeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;

        let globe = match &mut self.globe {
            Ok(globe) => globe,
            Err(e) => {
                let message = format!("Failed to load globe data: {}", e);
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(egui::Color32::LIGHT_RED, message);
                    });
                });
                return;
            }
        };

        ui::render_top_bar(ctx, &mut self.search_term, globe, now);
        ui::render_canvas(ctx, globe, now);

        globe.advance(dt, now);

        // The globe is always moving (auto-rotate, moon), so keep painting.
        ctx.request_repaint();
    }
}
