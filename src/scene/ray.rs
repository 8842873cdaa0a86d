//! Rays and the intersection tests used for picking.

use glam::Vec3;

/// A half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Creates a ray; `dir` is normalized. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Option<Self> {
        let dir = dir.try_normalize()?;
        Some(Self { origin, dir })
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance to the first intersection with a sphere, if any lies ahead.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }

        let sqrt_disc = disc.sqrt();
        let near = -b - sqrt_disc;
        let far = -b + sqrt_disc;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin is inside the sphere.
            Some(far)
        } else {
            None
        }
    }

    /// Distance to a camera-facing rectangle spanned by `right` and `up`.
    ///
    /// `right` and `up` must be orthonormal; the half extents are measured along them.
    pub fn intersect_billboard(
        &self,
        center: Vec3,
        right: Vec3,
        up: Vec3,
        half_width: f32,
        half_height: f32,
    ) -> Option<f32> {
        let normal = right.cross(up);
        let denom = self.dir.dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = (center - self.origin).dot(normal) / denom;
        if t < 0.0 {
            return None;
        }

        let local = self.at(t) - center;
        let inside = local.dot(right).abs() <= half_width && local.dot(up).abs() <= half_height;
        inside.then_some(t)
    }
}
