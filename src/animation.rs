//! Camera fly-to animation.
//!
//! At most one animation is active. Starting a new one replaces whatever was
//! in flight; nothing is queued or blended. The animator is driven by
//! [`CameraAnimator::tick`] once per frame and never blocks.

use crate::scene::PerspectiveCamera;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use web_time::Instant;

/// Time remapping applied to linear animation progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Decelerating quadratic: `t * (2 - t)`.
    #[default]
    QuadraticOut,
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticOut => t * (2.0 - t),
        }
    }
}

/// A single camera move from `start` to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraAnimation {
    pub start: Vec3,
    /// Final camera position (fly-to point plus the forward offset).
    pub target: Vec3,
    pub start_time: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl CameraAnimation {
    /// Linear progress in `[0, 1]`. A zero duration completes immediately.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased camera position for linear progress `t`.
    pub fn position_at(&self, t: f32) -> Vec3 {
        self.start.lerp(self.target, self.easing.apply(t))
    }
}

/// Drives the camera towards a fly-to target.
#[derive(Debug, Clone, Default)]
pub struct CameraAnimator {
    active: Option<CameraAnimation>,
    easing: Easing,
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An animator whose flights use `easing`.
    pub fn with_easing(easing: Easing) -> Self {
        Self {
            active: None,
            easing,
        }
    }

    /// Starts flying from the camera's current position to `target + (0, 0, forward_offset)`.
    ///
    /// Replaces any animation already in flight.
    pub fn animate_to(
        &mut self,
        camera: &PerspectiveCamera,
        target: Vec3,
        forward_offset: f32,
        duration: Duration,
        now: Instant,
    ) {
        let animation = CameraAnimation {
            start: camera.position,
            target: target + Vec3::new(0.0, 0.0, forward_offset),
            start_time: now,
            duration,
            easing: self.easing,
        };

        if self.active.is_some() {
            log::debug!("Replacing in-flight camera animation");
        }
        log::debug!(
            "Camera animation {:?} -> {:?} over {:?}",
            animation.start,
            animation.target,
            duration
        );

        self.active = Some(animation);
    }

    /// Moves the camera for the current frame.
    ///
    /// Returns the linear progress if an animation ran this frame, `None` when idle.
    /// An animation that reaches progress 1 is dropped, so later ticks leave the
    /// camera alone.
    pub fn tick(&mut self, now: Instant, camera: &mut PerspectiveCamera) -> Option<f32> {
        let animation = self.active.as_ref()?;
        let t = animation.progress(now);
        camera.position = animation.position_at(t);

        if t >= 1.0 {
            self.active = None;
        }
        Some(t)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&CameraAnimation> {
        self.active.as_ref()
    }
}
