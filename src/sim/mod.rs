//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the pools)
//! - No rendering or platform dependencies; sound and storage are injected

pub mod collision;
pub mod kinematics;
pub mod level;
pub mod pools;
pub mod session;
pub mod slingshot;
pub mod state;
pub mod tick;

pub use collision::{PopEvent, circles_overlap, resolve_hits};
pub use kinematics::{Wind, integrate, launch_velocity, predict_path};
pub use level::{LevelGenerator, THEMES};
pub use pools::EntityPools;
pub use session::{GameSession, PendingLevel};
pub use slingshot::Slingshot;
pub use state::{Balloon, BalloonColor, GameStatus, LevelConfig, Particle, Projectile, Viewport};
pub use tick::tick;
