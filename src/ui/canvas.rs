//! Central canvas UI: the globe view.
//!
//! Draws the scene exposed by [`GlobeContext`] with the egui painter and feeds
//! pointer input back into it.

use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, RichText, Sense, Stroke, Vec2,
};
use globe_explorer::geo::GeoProjector;
use globe_explorer::scene::{PerspectiveCamera, Viewport};
use globe_explorer::GlobeContext;
use glam::Vec3;
use web_time::Instant;

const BACKGROUND: Color32 = Color32::from_rgb(8, 10, 22);
const OCEAN: Color32 = Color32::from_rgb(22, 52, 96);
const GRATICULE: Color32 = Color32::from_rgba_premultiplied(60, 90, 130, 90);
const BORDER: Color32 = Color32::from_rgb(210, 220, 160);
const MARKER: Color32 = Color32::from_rgb(255, 120, 80);
const LABEL: Color32 = Color32::from_rgb(235, 235, 245);

/// Degrees between graticule lines.
const GRATICULE_STEP: i32 = 30;

pub fn render_canvas(ctx: &egui::Context, globe: &mut GlobeContext, now: Instant) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;

        globe.resize(rect.width(), rect.height());

        painter.rect_filled(rect, 0.0, BACKGROUND);

        let view = View {
            camera: globe.camera(),
            viewport: globe.viewport(),
            origin: rect.min,
        };

        draw_decorations(&painter, &view, globe, Depth::BehindGlobe);
        draw_globe(&painter, &view, globe.scene().globe_radius);
        draw_borders(&painter, &view, globe);
        draw_markers(&painter, &view, globe);
        draw_decorations(&painter, &view, globe, Depth::InFrontOfGlobe);
        draw_overlay(ui, &rect, globe);

        handle_canvas_interaction(&response, &rect, globe, now);
    });
}

/// Camera, viewport and canvas offset for one frame.
struct View<'a> {
    camera: &'a PerspectiveCamera,
    viewport: Viewport,
    origin: Pos2,
}

impl View<'_> {
    fn to_screen(&self, point: Vec3) -> Option<Pos2> {
        let p = self.camera.world_to_screen(point, self.viewport)?;
        Some(self.offset(p))
    }

    /// Viewport pixels to canvas pixels.
    fn offset(&self, p: glam::Vec2) -> Pos2 {
        self.origin + Vec2::new(p.x, p.y)
    }

    /// Whether a point on a sphere around the origin faces the camera.
    fn faces_camera(&self, point: Vec3) -> bool {
        (self.camera.position - point).dot(point) > 0.0
    }

    fn pixels_per_unit(&self, point: Vec3) -> f32 {
        let distance = (point - self.camera.position).length();
        self.camera.pixels_per_unit(distance, self.viewport)
    }

    /// Draws a polyline, dropping segments on the far side of the globe.
    fn polyline(&self, painter: &Painter, points: &[Vec3], stroke: Stroke) {
        for window in points.windows(2) {
            if let [a, b] = window {
                if !self.faces_camera(*a) || !self.faces_camera(*b) {
                    continue;
                }
                if let (Some(p1), Some(p2)) = (self.to_screen(*a), self.to_screen(*b)) {
                    painter.line_segment([p1, p2], stroke);
                }
            }
        }
    }
}

/// Base sphere: a filled silhouette plus a latitude/longitude graticule.
fn draw_globe(painter: &Painter, view: &View<'_>, radius: f32) {
    let Some(center) = view.to_screen(Vec3::ZERO) else {
        return;
    };

    let distance = view.camera.position.length();
    if distance <= radius {
        return;
    }
    let angular = (radius / distance).asin();
    let screen_radius = angular.tan() * view.camera.pixels_per_unit(1.0, view.viewport);
    painter.circle_filled(center, screen_radius, OCEAN);

    let stroke = Stroke::new(0.5, GRATICULE);
    let radius = radius as f64;

    for lat in (-90 + GRATICULE_STEP..90).step_by(GRATICULE_STEP as usize) {
        let ring: Vec<Vec3> = (-180..=180)
            .step_by(5)
            .map(|lon| GeoProjector::project(lat as f64, lon as f64, radius))
            .collect();
        view.polyline(painter, &ring, stroke);
    }

    for lon in (-180..180).step_by(GRATICULE_STEP as usize) {
        let meridian: Vec<Vec3> = (-90..=90)
            .step_by(5)
            .map(|lat| GeoProjector::project(lat as f64, lon as f64, radius))
            .collect();
        view.polyline(painter, &meridian, stroke);
    }
}

fn draw_borders(painter: &Painter, view: &View<'_>, globe: &GlobeContext) {
    let stroke = Stroke::new(1.0, BORDER);
    for line in &globe.scene().borders {
        view.polyline(painter, &line.points, stroke);
    }
}

/// Which side of the globe a decorative body is painted on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Depth {
    BehindGlobe,
    InFrontOfGlobe,
}

fn draw_decorations(painter: &Painter, view: &View<'_>, globe: &GlobeContext, depth: Depth) {
    for body in &globe.scene().decorations {
        if body.in_front_of_globe(view.camera.position) != (depth == Depth::InFrontOfGlobe) {
            continue;
        }

        let Some(center) = view.to_screen(body.center) else {
            continue;
        };
        let screen_radius = body.radius * view.pixels_per_unit(body.center);
        painter.circle_filled(center, screen_radius, Color32::from_gray(150));

        // A crater on the equator makes the spin visible.
        let (sin, cos) = body.rotation.sin_cos();
        let crater = body.center + Vec3::new(cos, 0.0, -sin) * body.radius;
        if (view.camera.position - crater).dot(crater - body.center) > 0.0 {
            if let Some(pos) = view.to_screen(crater) {
                painter.circle_filled(pos, screen_radius * 0.2, Color32::from_gray(100));
            }
        }
    }
}

/// Draws each marker glyph and label inside the footprint picking tests against.
fn draw_markers(painter: &Painter, view: &View<'_>, globe: &GlobeContext) {
    let layer = globe.markers();

    for (marker, label) in layer.markers().iter().zip(layer.labels()) {
        // Markers behind the globe stay pickable, so they are drawn faded
        // rather than hidden.
        let opacity = if view.faces_camera(marker.position) { 1.0 } else { 0.3 };

        if let Some(glyph) = marker.screen_footprint(view.camera, view.viewport) {
            painter.text(
                view.offset(glyph.center()),
                Align2::CENTER_CENTER,
                marker.icon,
                FontId::proportional(glyph.height()),
                MARKER.gamma_multiply(opacity),
            );
        }

        if let Some(text) = label.screen_footprint(view.camera, view.viewport) {
            painter.text(
                view.offset(text.center()),
                Align2::CENTER_CENTER,
                &label.text,
                FontId::proportional(text.height()),
                LABEL.gamma_multiply(opacity),
            );
        }
    }
}

fn draw_overlay(ui: &mut egui::Ui, rect: &Rect, globe: &GlobeContext) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(260.0, 72.0));

    let text = |s: String| {
        RichText::new(s)
            .monospace()
            .size(12.0)
            .color(Color32::from_rgb(200, 200, 220))
    };

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(text(globe.status().to_string()));

            if let Some(view) = GeoProjector::unproject(globe.camera().position) {
                ui.label(text(format!(
                    "View: {:7.2}°, {:8.2}°",
                    view.latitude, view.longitude
                )));
            }

            if let Some(pick) = globe.last_pick() {
                ui.label(text(format!(
                    "Pick: {} ({:.2}°, {:.2}°)",
                    pick.location.name, pick.location.latitude, pick.location.longitude
                )));
            }
        });
    });
}

fn handle_canvas_interaction(
    response: &egui::Response,
    rect: &Rect,
    globe: &mut GlobeContext,
    now: Instant,
) {
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let local = pos - rect.min;
            globe.handle_pointer_click(local.x, local.y, now);
        }
    }

    if response.dragged() {
        let delta = response.drag_delta();
        globe.handle_drag(delta.x, delta.y);
    }

    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            globe.handle_scroll(scroll_delta.y);
        }
    }
}
