//! Explicit Euler integration shared by live projectiles and the aim preview
//!
//! Both paths must call the same functions so the preview traces the exact
//! path the shot will fly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Horizontal wind: level ambient plus the player's manual override
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub ambient: f32,
    pub manual: f32,
}

impl Wind {
    pub fn new(ambient: f32, manual: f32) -> Self {
        Self { ambient, manual }
    }

    /// Per-frame horizontal acceleration on projectiles
    #[inline]
    pub fn projectile_accel(&self) -> f32 {
        (self.ambient + self.manual) * PROJECTILE_WIND_FACTOR
    }

    /// Per-frame horizontal displacement of balloons
    #[inline]
    pub fn balloon_drift(&self) -> f32 {
        self.ambient + self.manual * BALLOON_WIND_FACTOR
    }

    /// Per-frame horizontal displacement of particles
    #[inline]
    pub fn particle_drift(&self) -> f32 {
        self.manual * PARTICLE_WIND_FACTOR
    }
}

/// One integration step: accelerate, then move
#[inline]
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, gravity: f32, wind_accel: f32) {
    vel.y += gravity;
    vel.x += wind_accel;
    *pos += *vel;
}

/// Launch velocity for a release at `drag` (pulling away from `anchor` fires the other way)
#[inline]
pub fn launch_velocity(anchor: Vec2, drag: Vec2, power: f32) -> Vec2 {
    (anchor - drag) * ELASTICITY * power
}

/// Sample the flight path for `steps` frames (origin excluded)
pub fn predict_path(origin: Vec2, vel: Vec2, wind: Wind, steps: usize) -> Vec<Vec2> {
    let mut pos = origin;
    let mut vel = vel;
    let accel = wind.projectile_accel();
    (0..steps)
        .map(|_| {
            integrate(&mut pos, &mut vel, GRAVITY, accel);
            pos
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_applies_gravity_before_move() {
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::new(2.0, 0.0);
        integrate(&mut pos, &mut vel, GRAVITY, 0.0);
        assert_eq!(vel, Vec2::new(2.0, GRAVITY));
        assert_eq!(pos, Vec2::new(2.0, GRAVITY));
    }

    #[test]
    fn test_launch_velocity_opposes_pull() {
        let anchor = Vec2::new(100.0, 500.0);
        let drag = Vec2::new(0.0, 500.0);
        let v = launch_velocity(anchor, drag, 1.0);
        assert!((v.x - 12.0).abs() < 1e-5);
        assert_eq!(v.y, 0.0);

        let doubled = launch_velocity(anchor, drag, 2.0);
        assert!((doubled.x - 24.0).abs() < 1e-5);
    }

    #[test]
    fn test_wind_factors() {
        let wind = Wind::new(1.0, 2.0);
        assert!((wind.projectile_accel() - 0.15).abs() < 1e-6);
        assert!((wind.balloon_drift() - 2.0).abs() < 1e-6);
        assert!((wind.particle_drift() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_predict_path_is_deterministic() {
        let wind = Wind::new(0.5, -1.0);
        let a = predict_path(Vec2::new(100.0, 500.0), Vec2::new(10.0, -8.0), wind, 30);
        let b = predict_path(Vec2::new(100.0, 500.0), Vec2::new(10.0, -8.0), wind, 30);
        assert_eq!(a.len(), 30);
        assert_eq!(a, b);
    }
}
