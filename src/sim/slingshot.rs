//! Drag-to-launch slingshot controller

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kinematics::{Wind, launch_velocity, predict_path};
use super::state::Viewport;
use crate::clamp_to_radius;
use crate::consts::*;

/// Slingshot geometry and drag state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slingshot {
    pub anchor: Vec2,
    pub drag: Vec2,
    pub dragging: bool,
    /// Whether a new drag may begin (session playing and shots left)
    pub enabled: bool,
}

impl Slingshot {
    pub fn new(viewport: &Viewport) -> Self {
        let anchor = viewport.anchor();
        Self {
            anchor,
            drag: anchor,
            dragging: false,
            enabled: false,
        }
    }

    /// Recompute the anchor for a new viewport size
    pub fn resize(&mut self, viewport: &Viewport) {
        self.anchor = viewport.anchor();
        self.drag = self.anchor;
    }

    /// Begin a drag if enabled and `point` is within the capture radius
    pub fn grab(&mut self, point: Vec2) -> bool {
        if !self.enabled || self.dragging {
            return false;
        }
        if point.distance(self.anchor) < CAPTURE_RADIUS {
            self.dragging = true;
            true
        } else {
            false
        }
    }

    /// Follow the pointer, clamped radially to the maximum stretch
    pub fn drag_to(&mut self, point: Vec2) {
        if self.dragging {
            self.drag = clamp_to_radius(self.anchor, point, MAX_STRETCH);
        }
    }

    /// Let go. Returns the launch velocity, or None if no drag was active.
    pub fn release(&mut self, power: f32) -> Option<Vec2> {
        if !self.dragging {
            return None;
        }
        let vel = launch_velocity(self.anchor, self.drag, power);
        self.dragging = false;
        self.drag = self.anchor;
        Some(vel)
    }

    /// Abort a drag without firing
    pub fn cancel(&mut self) {
        self.dragging = false;
        self.drag = self.anchor;
    }

    /// Aim preview for the current drag (empty when idle)
    pub fn preview(&self, power: f32, wind: Wind) -> Vec<Vec2> {
        if !self.dragging {
            return Vec::new();
        }
        let vel = launch_velocity(self.anchor, self.drag, power);
        predict_path(self.anchor, vel, wind, PREVIEW_STEPS)
    }
}
