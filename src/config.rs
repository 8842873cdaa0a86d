//! Globe configuration and the static location list.

use crate::animation::Easing;
use crate::error::GlobeError;
use crate::geo::{GeoCoordinate, RingPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tunable parameters for building and viewing the globe.
///
/// Every field has a default, so a JSON override only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Radius of the base sphere.
    pub globe_radius: f64,
    /// Shell radius for border lines.
    pub border_radius: f64,
    /// Shell radius for markers.
    pub marker_radius: f64,
    /// Marker size as a fraction of the globe radius.
    pub marker_size_fraction: f64,
    /// Radial distance from a marker to its label.
    pub label_offset: f64,
    /// Upward lift of a label above its marker.
    pub label_lift: f64,
    /// Height of a label billboard in world units.
    pub label_height: f64,
    /// Which rings of nested border geometries are drawn.
    pub ring_policy: RingPolicy,

    /// Camera standoff along +Z from a fly-to target.
    pub forward_offset: f32,
    /// Fly-to animation length in milliseconds.
    pub animation_duration_ms: u64,
    /// Fly-to progress curve.
    pub easing: Easing,

    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera distance from the globe center along +Z.
    pub camera_distance: f32,

    /// Fraction of the pending orbit rotation applied per update.
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// Auto-rotate speed; 2.0 is one revolution every 30 seconds.
    pub auto_rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            globe_radius: 1.0,
            border_radius: 1.01,
            marker_radius: 1.05,
            marker_size_fraction: 0.02,
            label_offset: 0.04,
            label_lift: 0.03,
            label_height: 0.05,
            ring_policy: RingPolicy::AllRings,
            forward_offset: 2.0,
            animation_duration_ms: 1000,
            easing: Easing::QuadraticOut,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_distance: 5.0,
            damping_factor: 0.25,
            auto_rotate: true,
            auto_rotate_speed: 2.0,
            zoom_speed: 0.5,
            min_distance: 1.2,
            max_distance: 20.0,
        }
    }
}

impl GlobeConfig {
    /// Parses a (possibly partial) JSON override on top of the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, GlobeError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GlobeError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make the globe unusable.
    pub fn validate(&self) -> Result<(), GlobeError> {
        if self.globe_radius <= 0.0 {
            return Err(GlobeError::Config("globe_radius must be positive".into()));
        }
        if self.marker_radius < self.globe_radius {
            return Err(GlobeError::Config(
                "marker_radius must not be below globe_radius".into(),
            ));
        }
        if self.label_height <= 0.0 {
            return Err(GlobeError::Config("label_height must be positive".into()));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(GlobeError::Config(
                "fov_degrees must be within (0, 180)".into(),
            ));
        }
        if self.near <= 0.0 || self.far <= self.near {
            return Err(GlobeError::Config(
                "near must be positive and below far".into(),
            ));
        }
        if self.min_distance <= 0.0 {
            return Err(GlobeError::Config("min_distance must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(GlobeError::Config(
                "damping_factor must be within [0, 1]".into(),
            ));
        }
        if self.min_distance > self.max_distance {
            return Err(GlobeError::Config(
                "min_distance must not exceed max_distance".into(),
            ));
        }
        Ok(())
    }

    /// Fly-to duration.
    pub fn animation_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.animation_duration_ms)
    }

    /// Marker size in world units.
    pub fn marker_size(&self) -> f64 {
        self.globe_radius * self.marker_size_fraction
    }
}

/// A named place shown as a marker on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.latitude, self.longitude)
    }
}

/// Parses the location list.
///
/// Names are unique case-insensitively; later duplicates are dropped with a warning.
pub fn load_locations(json: &str) -> Result<Vec<Location>, GlobeError> {
    let parsed: Vec<Location> = serde_json::from_str(json)
        .map_err(|e| GlobeError::Config(format!("Failed to parse locations: {}", e)))?;

    let mut seen = HashSet::new();
    let locations: Vec<Location> = parsed
        .into_iter()
        .filter(|loc| {
            let fresh = seen.insert(loc.name.to_lowercase());
            if !fresh {
                log::warn!("Ignoring duplicate location name: {}", loc.name);
            }
            fresh
        })
        .collect();

    log::info!("Loaded {} locations", locations.len());
    Ok(locations)
}
