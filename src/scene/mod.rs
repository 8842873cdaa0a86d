//! Scene objects handed to the renderer.
//!
//! The scene owns everything that is built once at startup (base sphere,
//! border lines, decorative bodies). Markers and labels live in
//! [`crate::markers::MarkerLayer`] because they also take part in picking.

mod camera;
mod ray;

pub use camera::{PerspectiveCamera, Viewport};
pub use ray::Ray;

use crate::geo::BorderLine;
use glam::Vec3;

/// A decorative body that spins continuously, such as the moon.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorativeLayer {
    pub name: String,
    pub center: Vec3,
    pub radius: f32,
    /// Current spin around the body's vertical axis, in radians.
    pub rotation: f32,
    /// Spin rate in radians per second.
    pub angular_speed: f32,
}

impl DecorativeLayer {
    /// The moon as placed next to the globe.
    pub fn moon() -> Self {
        Self {
            name: "Moon".to_string(),
            center: Vec3::new(-2.0, 0.0, 0.0),
            radius: 0.2,
            rotation: 0.0,
            angular_speed: 0.6,
        }
    }

    /// Whether the body is nearer to `eye` than the globe centre, so it is
    /// painted over the globe rather than under it.
    pub fn in_front_of_globe(&self, eye: Vec3) -> bool {
        self.center.distance(eye) < eye.length()
    }

    /// Advances the spin by `dt` seconds, wrapping to one revolution.
    pub fn advance(&mut self, dt: f32) {
        self.rotation =
            (self.rotation + self.angular_speed * dt).rem_euclid(std::f32::consts::TAU);
    }
}

/// Static scene content.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Radius of the base sphere at the origin.
    pub globe_radius: f32,
    pub borders: Vec<BorderLine>,
    pub decorations: Vec<DecorativeLayer>,
}

impl Scene {
    pub fn new(
        globe_radius: f32,
        borders: Vec<BorderLine>,
        decorations: Vec<DecorativeLayer>,
    ) -> Self {
        Self {
            globe_radius,
            borders,
            decorations,
        }
    }

    /// Spins every decorative layer by `dt` seconds.
    pub fn advance_decorations(&mut self, dt: f32) {
        for layer in &mut self.decorations {
            layer.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorations_spin_and_wrap() {
        let mut scene = Scene::new(1.0, Vec::new(), vec![DecorativeLayer::moon()]);

        scene.advance_decorations(1.0);
        assert!((scene.decorations[0].rotation - 0.6).abs() < 1e-6);

        scene.advance_decorations(20.0);
        let rotation = scene.decorations[0].rotation;
        assert!((0.0..std::f32::consts::TAU).contains(&rotation));
    }

    #[test]
    fn test_moon_depth_follows_camera_side() {
        let moon = DecorativeLayer::moon();

        // Camera on the moon's side of the globe.
        assert!(moon.in_front_of_globe(Vec3::new(-3.0, 0.0, 0.0)));
        // Camera on the far side: the globe hides part of the moon.
        assert!(!moon.in_front_of_globe(Vec3::new(3.0, 0.0, 0.0)));
        // Side view: moon at distance sqrt(13) vs globe centre at 3.
        assert!(!moon.in_front_of_globe(Vec3::new(0.0, 0.0, 3.0)));
    }
}
