//! Latitude/longitude to globe-space projection.
//!
//! Every layer drawn on the globe (borders, markers, labels) goes through
//! [`GeoProjector::project`], so they all share the same convention:
//! +Y points at the north pole, longitude 0 lies on +X and east longitudes
//! swing towards -Z.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in degrees, +90 at the north pole.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Projects geographic coordinates onto spherical shells around the origin.
///
/// Out-of-range inputs are not validated; they still produce a point on the
/// requested shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoProjector;

impl GeoProjector {
    /// Converts (latitude, longitude) in degrees to a point at `radius` from the origin.
    pub fn project(lat: f64, lon: f64, radius: f64) -> Vec3 {
        // Polar angle measured from +Y, azimuth flipped so east is counter-clockwise
        // when looking down from the north pole.
        let phi = (90.0 - lat) * (PI / 180.0);
        let theta = lon * (-PI / 180.0);

        let x = radius * phi.sin() * theta.cos();
        let y = radius * phi.cos();
        let z = radius * phi.sin() * theta.sin();

        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Projects a [`GeoCoordinate`].
    pub fn project_coordinate(coord: GeoCoordinate, radius: f64) -> Vec3 {
        Self::project(coord.latitude, coord.longitude, radius)
    }

    /// Inverse of [`GeoProjector::project`], ignoring the radius.
    ///
    /// Returns `None` for the origin, which has no direction.
    pub fn unproject(point: Vec3) -> Option<GeoCoordinate> {
        let p = point.as_dvec3();
        let r = p.length();
        if r <= f64::EPSILON {
            return None;
        }

        let phi = (p.y / r).clamp(-1.0, 1.0).acos();
        let theta = p.z.atan2(p.x);

        Some(GeoCoordinate {
            latitude: 90.0 - phi.to_degrees(),
            longitude: -theta.to_degrees(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(
            (a - b).length() < EPS,
            "expected {:?} to be close to {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_north_pole_ignores_longitude() {
        for lon in [-180.0, -73.5, 0.0, 45.0, 180.0] {
            let p = GeoProjector::project(90.0, lon, 2.5);
            assert_close(p, Vec3::new(0.0, 2.5, 0.0));
        }
    }

    #[test]
    fn test_south_pole() {
        let p = GeoProjector::project(-90.0, 12.0, 1.0);
        assert_close(p, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_projection_preserves_radius() {
        for lat in [-89.0, -45.0, 0.0, 23.4, 60.0, 90.0] {
            for lon in [-179.0, -90.0, 0.0, 30.0, 139.65, 180.0] {
                for r in [0.5, 1.0, 1.05, 6.0] {
                    let p = GeoProjector::project(lat, lon, r);
                    assert!((p.length() - r as f32).abs() < EPS * 10.0);
                }
            }
        }
    }

    #[test]
    fn test_longitude_is_periodic() {
        for lat in [-60.0, 0.0, 35.6762] {
            for lon in [-120.0, 0.0, 139.6503] {
                let a = GeoProjector::project(lat, lon, 1.05);
                let b = GeoProjector::project(lat, lon + 360.0, 1.05);
                assert_close(a, b);
            }
        }
    }

    #[test]
    fn test_axis_convention() {
        // Prime meridian on the equator lies on +X.
        assert_close(GeoProjector::project(0.0, 0.0, 1.0), Vec3::X);
        // 90°E swings to -Z.
        assert_close(GeoProjector::project(0.0, 90.0, 1.0), Vec3::NEG_Z);
        // 90°W swings to +Z.
        assert_close(GeoProjector::project(0.0, -90.0, 1.0), Vec3::Z);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let p = GeoProjector::project(35.6762, 139.6503, 1.05);
        let coord = GeoProjector::unproject(p).unwrap();
        assert!((coord.latitude - 35.6762).abs() < 1e-4);
        assert!((coord.longitude - 139.6503).abs() < 1e-4);

        assert!(GeoProjector::unproject(Vec3::ZERO).is_none());
    }
}
