//! Entity pools: balloons, projectiles, particles for one session
//!
//! Pools are stepped only from the frame tick. Removal happens by `retain`
//! at the end of each stage; new entities are appended.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::kinematics::{Wind, integrate};
use super::state::{Balloon, BalloonColor, LevelConfig, Particle, Projectile, Viewport};
use crate::consts::*;

/// Owner of every simulated entity
#[derive(Debug, Clone)]
pub struct EntityPools {
    /// Active balloons (sorted by id for determinism)
    pub balloons: Vec<Balloon>,
    /// Projectiles in flight
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl EntityPools {
    pub fn new(seed: u64) -> Self {
        Self {
            balloons: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop every entity (level/session restart only)
    pub fn clear(&mut self) {
        self.balloons.clear();
        self.projectiles.clear();
        self.particles.clear();
    }

    pub fn any_projectile_active(&self) -> bool {
        self.projectiles.iter().any(|p| p.active)
    }

    /// Build a fresh balloon below the visible area
    pub fn spawn_balloon(&mut self, level: &LevelConfig, viewport: &Viewport) -> Balloon {
        let radius = self.rng.random_range(BALLOON_MIN_RADIUS..=BALLOON_MAX_RADIUS);
        let (min_speed, max_speed) = level.balloon_speed_range;
        let speed = if max_speed > min_speed {
            self.rng.random_range(min_speed..=max_speed)
        } else {
            min_speed
        };
        let pos = Vec2::new(self.random_spawn_x(viewport), viewport.height + OFFSCREEN_MARGIN);

        let id = self.next_entity_id();
        let mut balloon = Balloon::new(id, pos, radius, speed);
        balloon.color = BalloonColor::ALL[self.rng.random_range(0..BalloonColor::ALL.len())];
        balloon.wobble_phase = self.rng.random_range(0.0..TAU);
        balloon.wobble_amplitude =
            self.rng.random_range(WOBBLE_MIN_AMPLITUDE..=WOBBLE_MAX_AMPLITUDE);
        balloon
    }

    /// Top the balloon population back up to the level's target
    pub fn replenish(&mut self, level: &LevelConfig, viewport: &Viewport) {
        while self.balloons.len() < level.balloon_count as usize {
            let balloon = self.spawn_balloon(level, viewport);
            self.balloons.push(balloon);
        }
    }

    fn random_spawn_x(&mut self, viewport: &Viewport) -> f32 {
        let (lo, hi) = viewport.spawn_band();
        lo + self.rng.random::<f32>() * (hi - lo)
    }

    /// Rise, wobble, drift and wrap live balloons; animate and cull popped ones
    pub fn step_balloons(
        &mut self,
        frame: u64,
        speed_multiplier: f32,
        wind: Wind,
        viewport: &Viewport,
    ) {
        let t = frame as f32 * WOBBLE_RATE;
        let drift = wind.balloon_drift();
        let (lo, hi) = viewport.spawn_band();
        let right_edge = viewport.width + OFFSCREEN_MARGIN;

        for balloon in &mut self.balloons {
            if balloon.popping {
                balloon.pop_progress += POP_INCREMENT;
                continue;
            }

            balloon.pos.y -= balloon.speed * speed_multiplier;
            balloon.pos.x += (t + balloon.wobble_phase).sin() * WOBBLE_DRIFT + drift;

            // Escaped through the top: send back under the screen
            if balloon.pos.y < -OFFSCREEN_MARGIN {
                balloon.pos.y = viewport.height + OFFSCREEN_MARGIN;
                balloon.pos.x = lo + self.rng.random::<f32>() * (hi - lo);
            }
            if balloon.pos.x < -OFFSCREEN_MARGIN {
                balloon.pos.x = right_edge;
            } else if balloon.pos.x > right_edge {
                balloon.pos.x = -OFFSCREEN_MARGIN;
            }
        }

        self.balloons.retain(|b| !b.is_spent());
    }

    /// Integrate active projectiles and extend their trails
    pub fn advance_projectiles(&mut self, wind: Wind) {
        let accel = wind.projectile_accel();
        for projectile in self.projectiles.iter_mut().filter(|p| p.active) {
            projectile.record_trail();
            integrate(&mut projectile.pos, &mut projectile.vel, GRAVITY, accel);
        }
    }

    /// Deactivate projectiles that left the play bounds and drop them from the pool
    pub fn retire_projectiles(&mut self, viewport: &Viewport) {
        for projectile in &mut self.projectiles {
            let p = projectile.pos;
            if p.y > viewport.height + OFFSCREEN_MARGIN
                || p.x > viewport.width + OFFSCREEN_MARGIN
                || p.x < -OFFSCREEN_MARGIN
            {
                projectile.active = false;
            }
        }
        self.projectiles.retain(|p| p.active);
    }

    /// Move, fade and cull particles
    pub fn step_particles(&mut self, wind: Wind) {
        let drift = wind.particle_drift();
        for particle in &mut self.particles {
            integrate(&mut particle.pos, &mut particle.vel, PARTICLE_GRAVITY, 0.0);
            particle.pos.x += drift;
            particle.life -= PARTICLE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Radial burst of particles at a popped balloon
    pub fn spawn_burst(&mut self, center: Vec2, color: BalloonColor) {
        for i in 0..BURST_PARTICLES {
            let angle = TAU / BURST_PARTICLES as f32 * i as f32;
            let speed = self.rng.random_range(PARTICLE_MIN_SPEED..=PARTICLE_MAX_SPEED);
            let radius = self.rng.random_range(PARTICLE_MIN_RADIUS..=PARTICLE_MAX_RADIUS);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                radius,
            });
        }

        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }
}
