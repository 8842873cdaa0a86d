//! Location markers and their text labels.
//!
//! Markers and labels are created once from the static location list and are
//! never removed. Both refer back to their location by index; the layer owns
//! the locations.

use crate::config::{GlobeConfig, Location};
use crate::geo::GeoProjector;
use crate::scene::{PerspectiveCamera, Viewport};
use glam::{Vec2, Vec3};

/// Approximate glyph width as a fraction of the label height.
const LABEL_CHAR_ASPECT: f32 = 0.6;

/// Smallest and largest drawn marker glyph, in pixels.
pub const MARKER_GLYPH_PX: (f32, f32) = (12.0, 28.0);

/// Smallest and largest drawn label text height, in pixels.
pub const LABEL_TEXT_PX: (f32, f32) = (9.0, 18.0);

/// Pixel rectangle on screen, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Pixels per world unit at `point`.
fn scale_at(point: Vec3, camera: &PerspectiveCamera, viewport: Viewport) -> f32 {
    camera.pixels_per_unit(camera.position.distance(point), viewport)
}

/// Glyph used to draw markers.
pub const MARKER_ICON: &str = egui_phosphor::regular::MAP_PIN;

/// A pickable object: a marker or a label, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickTarget {
    Marker(usize),
    Label(usize),
}

/// A marker placed on the marker shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    /// Diameter in world units.
    pub size: f32,
    pub icon: &'static str,
    location: usize,
}

impl Marker {
    /// Radius of the marker's pick sphere.
    pub fn pick_radius(&self) -> f32 {
        self.size * 0.5
    }

    /// Screen area of the drawn glyph: a square standing on the marker point.
    ///
    /// `None` if the marker is behind the camera.
    pub fn screen_footprint(
        &self,
        camera: &PerspectiveCamera,
        viewport: Viewport,
    ) -> Option<ScreenRect> {
        let anchor = camera.world_to_screen(self.position, viewport)?;
        let px = (self.size * 2.0 * scale_at(self.position, camera, viewport))
            .clamp(MARKER_GLYPH_PX.0, MARKER_GLYPH_PX.1);

        Some(ScreenRect {
            min: anchor - Vec2::new(px * 0.5, px),
            max: anchor + Vec2::new(px * 0.5, 0.0),
        })
    }
}

/// A camera-facing text label paired with a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Vec3,
    /// Billboard extent in world units.
    pub width: f32,
    pub height: f32,
    marker: usize,
}

impl Label {
    /// Screen area of the drawn text, centered on the label point.
    ///
    /// `None` if the label is behind the camera.
    pub fn screen_footprint(
        &self,
        camera: &PerspectiveCamera,
        viewport: Viewport,
    ) -> Option<ScreenRect> {
        let center = camera.world_to_screen(self.position, viewport)?;
        let px = (self.height * scale_at(self.position, camera, viewport))
            .clamp(LABEL_TEXT_PX.0, LABEL_TEXT_PX.1);
        let half = Vec2::new(px * self.width / self.height, px) * 0.5;

        Some(ScreenRect {
            min: center - half,
            max: center + half,
        })
    }
}

/// All markers and labels, plus the locations they point to.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    locations: Vec<Location>,
    markers: Vec<Marker>,
    labels: Vec<Label>,
}

impl MarkerLayer {
    /// Creates one marker and one label per location.
    pub fn build(locations: Vec<Location>, config: &GlobeConfig) -> Self {
        let size = config.marker_size() as f32;
        let label_height = config.label_height as f32;

        let mut markers = Vec::with_capacity(locations.len());
        let mut labels = Vec::with_capacity(locations.len());

        for (idx, location) in locations.iter().enumerate() {
            let position =
                GeoProjector::project_coordinate(location.coordinate(), config.marker_radius);

            let outward = position.try_normalize().unwrap_or(Vec3::Y);
            let label_position = position
                + outward * config.label_offset as f32
                + Vec3::Y * config.label_lift as f32;

            let chars = location.name.chars().count().max(1) as f32;

            markers.push(Marker {
                position,
                size,
                icon: MARKER_ICON,
                location: idx,
            });
            labels.push(Label {
                text: location.name.clone(),
                position: label_position,
                width: label_height * LABEL_CHAR_ASPECT * chars,
                height: label_height,
                marker: idx,
            });
        }

        log::info!("Placed {} markers", markers.len());

        Self {
            locations,
            markers,
            labels,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Resolves a pickable object to its location.
    pub fn marker_for(&self, target: PickTarget) -> Option<&Location> {
        let marker = match target {
            PickTarget::Marker(idx) => self.markers.get(idx)?,
            PickTarget::Label(idx) => self.markers.get(self.labels.get(idx)?.marker)?,
        };
        self.locations.get(marker.location)
    }

    /// Marker position of the location with the given name (case-insensitive).
    pub fn find_location(&self, name: &str) -> Option<(&Location, Vec3)> {
        let wanted = name.to_lowercase();
        self.markers.iter().find_map(|marker| {
            let location = &self.locations[marker.location];
            (location.name.to_lowercase() == wanted).then_some((location, marker.position))
        })
    }
}
