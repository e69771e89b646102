//! Sky Sling - A slingshot balloon-popping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, pools, collisions, session state)
//! - `oracle`: Optional advice / level-generation collaborator
//! - `persistence`: Key-value storage for profile and settings
//! - `highscores`: Top-5 leaderboard
//! - `audio`: Injected sound capability
//! - `snapshot`: Read-only per-frame view for the presentation layer

pub mod audio;
pub mod highscores;
pub mod oracle;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod snapshot;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{Leaderboard, LeaderboardEntry};
pub use settings::Settings;
pub use sim::{GameSession, GameStatus, LevelConfig, tick};

use glam::Vec2;

/// Game configuration constants
///
/// Units are pixels and frames (one step per display refresh).
pub mod consts {
    /// Downward acceleration applied to projectiles each frame
    pub const GRAVITY: f32 = 0.25;
    /// Stretch-to-velocity factor of the slingshot band
    pub const ELASTICITY: f32 = 0.12;
    /// Maximum distance the drag point may be pulled from the anchor
    pub const MAX_STRETCH: f32 = 120.0;
    /// Pointer-down must land within this distance of the anchor to grab
    pub const CAPTURE_RADIUS: f32 = 50.0;
    /// Anchor offset from the bottom-left corner of the viewport
    pub const ANCHOR_X: f32 = 100.0;
    pub const ANCHOR_FROM_BOTTOM: f32 = 200.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 8.0;
    /// Trail points kept per projectile
    pub const TRAIL_LENGTH: usize = 15;
    /// Frames sampled by the aiming preview
    pub const PREVIEW_STEPS: usize = 30;

    /// Balloon radius range
    pub const BALLOON_MIN_RADIUS: f32 = 18.0;
    pub const BALLOON_MAX_RADIUS: f32 = 40.0;
    /// Pop animation advance per frame (~10 frames)
    pub const POP_INCREMENT: f32 = 0.1;
    /// Wobble phase advance per frame (matches a 500 ms period divisor at 60 Hz)
    pub const WOBBLE_RATE: f32 = 1.0 / 30.0;
    /// Peak horizontal wobble drift per frame
    pub const WOBBLE_DRIFT: f32 = 0.5;
    pub const WOBBLE_MIN_AMPLITUDE: f32 = 10.0;
    pub const WOBBLE_MAX_AMPLITUDE: f32 = 40.0;

    /// How far outside the viewport entities may travel before wrap/cull
    pub const OFFSCREEN_MARGIN: f32 = 100.0;
    /// Balloons never spawn left of this x (keeps the slingshot lane clear)
    pub const SPAWN_MARGIN_LEFT: f32 = 300.0;
    pub const SPAWN_MARGIN_RIGHT: f32 = 100.0;

    /// Wind scaling: projectile acceleration, balloon drift, particle drift
    pub const PROJECTILE_WIND_FACTOR: f32 = 0.05;
    pub const BALLOON_WIND_FACTOR: f32 = 0.5;
    pub const PARTICLE_WIND_FACTOR: f32 = 0.2;

    /// Pop burst
    pub const BURST_PARTICLES: usize = 12;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_DECAY: f32 = 0.02;
    pub const PARTICLE_MIN_SPEED: f32 = 2.0;
    pub const PARTICLE_MAX_SPEED: f32 = 6.0;
    pub const PARTICLE_MIN_RADIUS: f32 = 2.0;
    pub const PARTICLE_MAX_RADIUS: f32 = 5.0;
    /// Particle pool cap (oldest dropped first)
    pub const MAX_PARTICLES: usize = 512;

    /// Frames a next-level fetch may stay pending before the fallback applies
    pub const LEVEL_FETCH_TIMEOUT_FRAMES: u32 = 300;
}

/// Clamp `point` to lie within `max_dist` of `anchor`, preserving direction
#[inline]
pub fn clamp_to_radius(anchor: Vec2, point: Vec2, max_dist: f32) -> Vec2 {
    let offset = point - anchor;
    let dist = offset.length();
    if dist > max_dist {
        anchor + offset * (max_dist / dist)
    } else {
        point
    }
}

/// Point value for a balloon of the given radius (smaller is worth more)
///
/// Evaluated in f64: the product is exact there, so values just under `.5`
/// are not rounded up.
#[inline]
pub fn points_for_radius(radius: f32) -> u32 {
    ((45.0 - radius as f64) * 7.5).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_points_endpoints() {
        assert_eq!(points_for_radius(18.0), 203);
        assert_eq!(points_for_radius(40.0), 38);
        assert_eq!(points_for_radius(25.0), 150);
    }

    #[test]
    fn test_points_just_below_half() {
        // 19.2f32 is slightly above 19.2, so the exact product is 193.4999...
        assert_eq!(points_for_radius(19.2), 193);
    }

    proptest! {
        #[test]
        fn prop_points_match_formula(r in 18.0f32..=40.0) {
            let exact = ((45.0 - f64::from(r)) * 7.5).round() as u32;
            prop_assert_eq!(points_for_radius(r), exact);
            prop_assert!((38..=203).contains(&points_for_radius(r)));
        }

        #[test]
        fn prop_points_never_increase_with_radius(a in 18.0f32..=40.0, b in 18.0f32..=40.0) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(points_for_radius(small) >= points_for_radius(large));
        }
    }
}
