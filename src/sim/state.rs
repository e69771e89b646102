//! Game state and core simulation types
//!
//! Entities are plain data; stepping lives in `pools`, scoring in `collision`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::points_for_radius;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, nothing simulated yet
    Start,
    /// Active gameplay
    Playing,
    /// Simulation suspended, state untouched
    Paused,
    /// Target score reached; waiting for the next level and "continue"
    LevelComplete,
    /// Shots exhausted without reaching the target
    GameOver,
}

/// Play-field size in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Slingshot anchor for this viewport
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(ANCHOR_X, self.height - ANCHOR_FROM_BOTTOM)
    }

    /// Horizontal spawn band for new balloons
    pub fn spawn_band(&self) -> (f32, f32) {
        let lo = SPAWN_MARGIN_LEFT.min(self.width * 0.5);
        let hi = (self.width - SPAWN_MARGIN_RIGHT).max(lo);
        (lo, hi)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Balloon colour tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalloonColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl BalloonColor {
    pub const ALL: [BalloonColor; 6] = [
        BalloonColor::Red,
        BalloonColor::Green,
        BalloonColor::Blue,
        BalloonColor::Yellow,
        BalloonColor::Purple,
        BalloonColor::Orange,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            BalloonColor::Red => "#FF5F5F",
            BalloonColor::Green => "#5FFF92",
            BalloonColor::Blue => "#5F9FFF",
            BalloonColor::Yellow => "#FFF25F",
            BalloonColor::Purple => "#CF5FFF",
            BalloonColor::Orange => "#FF9F5F",
        }
    }
}

/// A rising target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balloon {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: BalloonColor,
    /// Fixed at spawn, never recomputed
    points: u32,
    pub popping: bool,
    /// Death animation progress, 0..1
    pub pop_progress: f32,
    /// Upward speed in pixels per frame
    pub speed: f32,
    pub wobble_phase: f32,
    pub wobble_amplitude: f32,
}

impl Balloon {
    pub fn new(id: u32, pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            color: BalloonColor::Red,
            points: points_for_radius(radius),
            popping: false,
            pop_progress: 0.0,
            speed,
            wobble_phase: 0.0,
            wobble_amplitude: WOBBLE_MIN_AMPLITUDE,
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Mark as popped. Returns false if it was already popping.
    pub fn pop(&mut self) -> bool {
        if self.popping {
            return false;
        }
        self.popping = true;
        true
    }

    /// True once the pop animation has finished
    pub fn is_spent(&self) -> bool {
        self.pop_progress >= 1.0
    }
}

/// A slingshot shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
    /// Recent positions for rendering (newest first)
    pub trail: Vec<Vec2>,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
            active: true,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Record current position to trail (call before moving)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: BalloonColor,
    pub life: f32, // 0-1, decreases over time
    pub radius: f32,
}

/// Parameters for one level. Replaced wholesale on level transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub number: u32,
    pub balloon_count: u32,
    pub balloon_speed_range: (f32, f32),
    pub target_score: u64,
    pub shots_available: u32,
    pub wind: f32,
    pub theme_name: String,
}

impl LevelConfig {
    /// First level of every session
    pub fn initial() -> Self {
        Self {
            number: 1,
            balloon_count: 8,
            balloon_speed_range: (1.0, 2.0),
            target_score: 2000,
            shots_available: 20,
            wind: 0.0,
            theme_name: "Sunny Skies".to_string(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balloon_points_fixed_at_spawn() {
        let mut balloon = Balloon::new(1, Vec2::ZERO, 25.0, 1.0);
        assert_eq!(balloon.points(), 150);
        balloon.radius = 40.0;
        assert_eq!(balloon.points(), 150);
    }

    #[test]
    fn test_balloon_pop_once() {
        let mut balloon = Balloon::new(1, Vec2::ZERO, 30.0, 1.0);
        assert!(balloon.pop());
        assert!(!balloon.pop());
        assert!(balloon.popping);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::X);
        for i in 0..(TRAIL_LENGTH + 5) {
            p.pos = Vec2::new(i as f32, 0.0);
            p.record_trail();
        }
        assert_eq!(p.trail.len(), TRAIL_LENGTH);
        // Newest first, oldest discarded
        assert_eq!(p.trail[0].x, (TRAIL_LENGTH + 4) as f32);
        assert_eq!(p.trail[TRAIL_LENGTH - 1].x, 5.0);
    }

    #[test]
    fn test_viewport_anchor_and_band() {
        let vp = Viewport::new(1280.0, 720.0);
        assert_eq!(vp.anchor(), Vec2::new(100.0, 520.0));
        assert_eq!(vp.spawn_band(), (300.0, 1180.0));

        // Narrow screens keep a valid band
        let narrow = Viewport::new(320.0, 480.0);
        let (lo, hi) = narrow.spawn_band();
        assert!(lo <= hi);
    }
}
