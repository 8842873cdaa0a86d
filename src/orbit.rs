//! Damped orbit controls around the globe center.
//!
//! Input handlers only accumulate rotation and zoom requests; [`OrbitControls::update`]
//! applies them once per frame. With damping enabled, each update applies a
//! fraction of the pending rotation and keeps the rest for later frames, which
//! gives the drag a short glide after release.

use crate::config::GlobeConfig;
use crate::scene::{PerspectiveCamera, Viewport};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Keeps the polar angle away from the poles, where the up vector degenerates.
const POLAR_EPSILON: f32 = 1e-3;

/// Orbit camera state.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// 2.0 is one revolution every 30 seconds.
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: config.damping_factor > 0.0,
            damping_factor: config.damping_factor,
            auto_rotate: config.auto_rotate,
            auto_rotate_speed: config.auto_rotate_speed,
            rotate_speed: 1.0,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
        }
    }

    /// Queues a rotation for a pointer drag of `(dx, dy)` pixels.
    ///
    /// Dragging across the full viewport height turns the globe once.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport: Viewport) {
        self.theta_delta -= TAU * dx / viewport.height * self.rotate_speed;
        self.phi_delta -= TAU * dy / viewport.height * self.rotate_speed;
    }

    /// Queues a zoom step. Positive `scroll` moves the camera closer.
    pub fn dolly(&mut self, scroll: f32) {
        let step = 0.95_f32.powf(self.zoom_speed);
        if scroll > 0.0 {
            self.scale *= step;
        } else if scroll < 0.0 {
            self.scale /= step;
        }
    }

    /// Azimuth added by auto-rotation over `dt` seconds.
    pub fn auto_rotation_angle(&self, dt: f32) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed * dt
    }

    /// Whether queued rotation is still being applied.
    pub fn is_settling(&self) -> bool {
        self.theta_delta.abs() > 1e-6 || self.phi_delta.abs() > 1e-6
    }

    /// Applies pending rotation, zoom and auto-rotation to the camera.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, dt: f32) {
        if self.auto_rotate {
            self.theta_delta -= self.auto_rotation_angle(dt);
        }

        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        if self.enable_damping {
            theta += self.theta_delta * self.damping_factor;
            phi += self.phi_delta * self.damping_factor;
        } else {
            theta += self.theta_delta;
            phi += self.phi_delta;
        }

        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        camera.target = self.target;

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
        }
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn setup(auto_rotate: bool) -> (OrbitControls, PerspectiveCamera) {
        let config = GlobeConfig {
            auto_rotate,
            ..GlobeConfig::default()
        };
        let controls = OrbitControls::from_config(&config);
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        (controls, camera)
    }

    fn azimuth(camera: &PerspectiveCamera) -> f32 {
        camera.position.x.atan2(camera.position.z)
    }

    #[test]
    fn test_auto_rotate_keeps_distance_and_height() {
        let (mut controls, mut camera) = setup(true);
        controls.enable_damping = false;

        controls.update(&mut camera, 1.0);

        assert!((camera.position.length() - 5.0).abs() < EPS);
        assert!(camera.position.y.abs() < EPS);
        // One second at speed 2 is 1/30 of a turn, clockwise seen from above.
        assert!((azimuth(&camera) + TAU / 30.0).abs() < EPS);
    }

    #[test]
    fn test_damping_spreads_rotation_over_frames() {
        let (mut controls, mut camera) = setup(false);
        let viewport = Viewport::new(600.0, 600.0);

        // A drag of -60 px queues +0.1 turn of azimuth.
        controls.rotate(-60.0, 0.0, viewport);
        let queued = TAU * 0.1;

        controls.update(&mut camera, 0.016);
        assert!((azimuth(&camera) - queued * 0.25).abs() < EPS);

        controls.update(&mut camera, 0.016);
        assert!((azimuth(&camera) - queued * (0.25 + 0.75 * 0.25)).abs() < EPS);
        assert!(controls.is_settling());

        for _ in 0..200 {
            controls.update(&mut camera, 0.016);
        }
        assert!(!controls.is_settling());
        assert!((azimuth(&camera) - queued).abs() < 1e-3);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let (mut controls, mut camera) = setup(false);
        controls.enable_damping = false;

        controls.rotate(0.0, 10_000.0, Viewport::new(600.0, 600.0));
        controls.update(&mut camera, 0.016);

        let phi = (camera.position.y / camera.position.length()).acos();
        assert!(phi > POLAR_EPSILON * 0.5);
        assert!(phi < PI - POLAR_EPSILON * 0.5);
        assert!(camera.position.x.is_finite() && camera.position.z.is_finite());
    }

    #[test]
    fn test_dolly_respects_limits() {
        let (mut controls, mut camera) = setup(false);

        controls.dolly(1.0);
        controls.update(&mut camera, 0.016);
        assert!(camera.position.length() < 5.0);

        for _ in 0..500 {
            controls.dolly(1.0);
            controls.update(&mut camera, 0.016);
        }
        assert!((camera.position.length() - controls.min_distance).abs() < EPS);

        for _ in 0..500 {
            controls.dolly(-1.0);
            controls.update(&mut camera, 0.016);
        }
        assert!((camera.position.length() - controls.max_distance).abs() < 1e-3);
    }
}
