//! Per-frame simulation step
//!
//! Called once per display refresh by the host. The frame counter drives
//! balloon wobble so runs replay identically.

use super::collision::{resolve_hits, score_of};
use super::session::GameSession;
use super::state::GameStatus;
use crate::audio::SoundEffect;

/// Advance the session by one frame
pub fn tick(session: &mut GameSession, frame: u64) {
    session.pump_audio();

    match session.status {
        GameStatus::Playing => step_playing(session, frame),
        // Frames keep coming while the next level loads
        GameStatus::LevelComplete => session.wait_for_level(),
        // Paused: nothing moves, nothing is cleared
        GameStatus::Start | GameStatus::Paused | GameStatus::GameOver => {}
    }
}

fn step_playing(session: &mut GameSession, frame: u64) {
    session.drain_launches();

    let wind = session.wind();
    let viewport = session.viewport();
    let balloon_speed = session.settings.balloon_speed;

    session.pools.step_balloons(frame, balloon_speed, wind, &viewport);

    session.pools.advance_projectiles(wind);
    let pops = resolve_hits(&mut session.pools);
    session.pools.retire_projectiles(&viewport);

    session.pools.step_particles(wind);

    if !pops.is_empty() {
        session.score += score_of(&pops);
        for pop in &pops {
            log::debug!("Popped balloon {} for {} points", pop.balloon_id, pop.points);
            session.play(SoundEffect::Pop);
        }
    }

    session.evaluate_outcome();

    if session.status == GameStatus::Playing {
        session.pools.replenish(&session.level, &viewport);
    }
    session.sync_slingshot();
}
