//! Pointer picking of markers and labels.
//!
//! An object is hit when the pointer ray meets its world-space shape, or when
//! the pointer lies inside the area the canvas draws it in. The drawn glyph and
//! text are clamped to a readable pixel size, so at most zoom levels they cover
//! far more of the screen than the world-space shape does.
//!
//! Ordering contract:
//! - Markers are tested before labels. Any marker hit wins over every label hit.
//! - Within a group, the closest hit to the camera wins; equal distances go to
//!   the lower index.

use crate::config::Location;
use crate::markers::{MarkerLayer, PickTarget, ScreenRect};
use crate::scene::{PerspectiveCamera, Viewport};
use glam::{Vec2, Vec3};

/// Outcome of a successful pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    pub location: Location,
    pub target: PickTarget,
    /// Pixel position of the click.
    pub screen_point: Vec2,
    /// Distance from the camera to the hit.
    pub distance: f32,
}

/// Resolves screen positions to locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickingController;

impl PickingController {
    /// Picks the location under a pixel position, if any.
    pub fn pick(
        screen_x: f32,
        screen_y: f32,
        viewport: Viewport,
        camera: &PerspectiveCamera,
        layer: &MarkerLayer,
    ) -> Option<PickResult> {
        let screen_point = Vec2::new(screen_x, screen_y);
        let (target, distance) = Self::cast(screen_point, viewport, camera, layer)?;
        let location = layer.marker_for(target)?.clone();

        log::debug!(
            "Picked {:?} ({}) at ({:.0}, {:.0})",
            target,
            location.name,
            screen_x,
            screen_y
        );

        Some(PickResult {
            location,
            target,
            screen_point,
            distance,
        })
    }

    /// Tests markers, then labels, under a pixel position.
    pub fn cast(
        screen_point: Vec2,
        viewport: Viewport,
        camera: &PerspectiveCamera,
        layer: &MarkerLayer,
    ) -> Option<(PickTarget, f32)> {
        let ray = camera.ray_through_ndc(viewport.screen_to_ndc(screen_point.x, screen_point.y))?;

        let marker_hit = nearest(layer.markers().iter().enumerate().filter_map(|(idx, m)| {
            ray.intersect_sphere(m.position, m.pick_radius())
                .or_else(|| {
                    let footprint = m.screen_footprint(camera, viewport);
                    footprint_hit(footprint, screen_point, camera, m.position)
                })
                .map(|t| (PickTarget::Marker(idx), t))
        }));
        if marker_hit.is_some() {
            return marker_hit;
        }

        let (right, up) = camera.billboard_axes();
        nearest(layer.labels().iter().enumerate().filter_map(|(idx, l)| {
            ray.intersect_billboard(l.position, right, up, l.width * 0.5, l.height * 0.5)
                .or_else(|| {
                    let footprint = l.screen_footprint(camera, viewport);
                    footprint_hit(footprint, screen_point, camera, l.position)
                })
                .map(|t| (PickTarget::Label(idx), t))
        }))
    }
}

/// Camera distance to `position` if its drawn footprint covers the pointer.
fn footprint_hit(
    footprint: Option<ScreenRect>,
    screen_point: Vec2,
    camera: &PerspectiveCamera,
    position: Vec3,
) -> Option<f32> {
    footprint
        .filter(|rect| rect.contains(screen_point))
        .map(|_| camera.position.distance(position))
}

/// Closest hit; hits are produced in index order so `min_by` keeps the lower index on ties.
fn nearest(hits: impl Iterator<Item = (PickTarget, f32)>) -> Option<(PickTarget, f32)> {
    hits.min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobeConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 1000.0)
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn center() -> Vec2 {
        Vec2::new(400.0, 300.0)
    }

    /// One marker on +Z, facing the default camera.
    fn galapagos() -> MarkerLayer {
        MarkerLayer::build(
            vec![Location::new("Galapagos", 0.0, -90.0)],
            &GlobeConfig::default(),
        )
    }

    #[test]
    fn test_miss_returns_none() {
        let layer = MarkerLayer::build(
            vec![Location::new("Null Island", 0.0, 0.0)],
            &GlobeConfig::default(),
        );
        // Top-left corner looks past the globe.
        assert!(PickingController::pick(0.0, 0.0, viewport(), &camera(), &layer).is_none());
    }

    #[test]
    fn test_pick_single_marker() {
        let layer = galapagos();
        let cam = camera();
        let screen = cam
            .world_to_screen(layer.markers()[0].position, viewport())
            .unwrap();

        let result = PickingController::pick(screen.x, screen.y, viewport(), &cam, &layer).unwrap();
        assert_eq!(result.location.name, "Galapagos");
        assert_eq!(result.target, PickTarget::Marker(0));
        assert_eq!(result.screen_point, screen);
        assert!((result.distance - (5.0 - 1.05 - 0.01)).abs() < 1e-3);
    }

    #[test]
    fn test_click_anywhere_on_drawn_glyph() {
        let layer = galapagos();
        let cam = camera();
        let glyph = layer.markers()[0].screen_footprint(&cam, viewport()).unwrap();
        let anchor = cam
            .world_to_screen(layer.markers()[0].position, viewport())
            .unwrap();

        // The glyph is far larger than the marker's world-space sphere here.
        assert!(glyph.height() >= 12.0);

        for point in [glyph.center(), anchor + Vec2::new(2.0, 0.0), glyph.min + 1.0] {
            let result = PickingController::pick(point.x, point.y, viewport(), &cam, &layer)
                .unwrap_or_else(|| panic!("no hit at {:?}", point));
            assert_eq!(result.target, PickTarget::Marker(0));
            assert_eq!(result.location.name, "Galapagos");
        }

        // Below the pin there is nothing drawn.
        let below = anchor + Vec2::new(0.0, 12.0);
        assert!(PickingController::pick(below.x, below.y, viewport(), &cam, &layer).is_none());
    }

    #[test]
    fn test_click_on_drawn_label_text() {
        let layer = galapagos();
        let cam = camera();
        let glyph = layer.markers()[0].screen_footprint(&cam, viewport()).unwrap();
        let text = layer.labels()[0].screen_footprint(&cam, viewport()).unwrap();

        // Right end of the text, clear of the pin.
        let point = Vec2::new(text.max.x - 2.0, text.center().y);
        assert!(!glyph.contains(point));

        let (target, _) = PickingController::cast(point, viewport(), &cam, &layer).unwrap();
        assert_eq!(target, PickTarget::Label(0));
        assert_eq!(layer.marker_for(target).unwrap().name, "Galapagos");
    }

    #[test]
    fn test_nearest_marker_wins() {
        // Both markers sit on the Z axis; the far-side one comes first in the list.
        let layer = MarkerLayer::build(
            vec![
                Location::new("Far side", 0.0, 90.0),
                Location::new("Near side", 0.0, -90.0),
            ],
            &GlobeConfig::default(),
        );

        let (target, _) = PickingController::cast(center(), viewport(), &camera(), &layer).unwrap();
        assert_eq!(target, PickTarget::Marker(1));
        assert_eq!(layer.marker_for(target).unwrap().name, "Near side");
    }

    #[test]
    fn test_marker_beats_label() {
        let layer = MarkerLayer::build(
            vec![Location::new("Overlap", 0.0, -90.0)],
            &GlobeConfig {
                label_offset: 0.0,
                label_lift: 0.0,
                ..GlobeConfig::default()
            },
        );

        let (target, _) = PickingController::cast(center(), viewport(), &camera(), &layer).unwrap();
        assert_eq!(target, PickTarget::Marker(0));
    }

    #[test]
    fn test_label_billboard_hit_in_world_space() {
        let layer = galapagos();
        let label = &layer.labels()[0];
        let cam = camera();

        // Aim at the right half of the label billboard, well clear of the marker.
        let aim = label.position + Vec3::X * (label.width * 0.4);
        let point = cam.world_to_screen(aim, viewport()).unwrap();

        let (target, _) = PickingController::cast(point, viewport(), &cam, &layer).unwrap();
        assert_eq!(target, PickTarget::Label(0));
        assert_eq!(layer.marker_for(target).unwrap().name, "Galapagos");
    }
}
