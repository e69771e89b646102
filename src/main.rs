//! Sky Sling entry point
//!
//! The browser build is driven from JavaScript through `sky_sling::web`.
//! Natively this runs a headless session with a simple aiming bot, which is
//! handy for soak-testing the simulation and the persistence paths.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::Context;
    use glam::Vec2;

    use sky_sling::audio::NullAudio;
    use sky_sling::consts::MAX_STRETCH;
    use sky_sling::oracle::{OfflineOracle, Oracle};
    use sky_sling::persistence::MemoryStore;
    use sky_sling::sim::{GameSession, GameStatus, Viewport, tick};

    const DEFAULT_SEED: u64 = 12345;
    const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 5;
    /// Levels to play before stopping
    const MAX_LEVELS: u32 = 5;

    pub fn run() -> anyhow::Result<()> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed {raw:?}"))?,
            None => DEFAULT_SEED,
        };
        let max_frames = match args.next() {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid frame count {raw:?}"))?,
            None => DEFAULT_MAX_FRAMES,
        };

        log::info!("Sky Sling (headless) seed {seed}, up to {max_frames} frames");

        let mut oracle = OfflineOracle;
        let mut session = GameSession::new(
            seed,
            Viewport::default(),
            Box::new(MemoryStore::new()),
            Box::new(NullAudio),
        );
        session.set_player_name("Bot");
        session.start();

        for frame in 0..max_frames {
            if let Some(request) = session.take_advice_request() {
                let reply = oracle.advice(&request);
                session.set_advice(reply);
                log::info!("Advice: {}", session.advice);
            }

            match session.status {
                GameStatus::Playing => aim_and_fire(&mut session),
                GameStatus::LevelComplete => {
                    session.resolve_pending_with(&mut oracle);
                    if session.level.number >= MAX_LEVELS {
                        break;
                    }
                    session.continue_level();
                }
                GameStatus::GameOver => break,
                GameStatus::Start | GameStatus::Paused => {}
            }

            tick(&mut session, frame);
        }

        log::info!(
            "Finished at level {} with score {} ({:?})",
            session.level.number,
            session.score,
            session.status
        );
        for (i, entry) in session.profile.leaderboard.entries.iter().enumerate() {
            log::info!(
                "#{} {} {} (level {}, {})",
                i + 1,
                entry.name,
                entry.score,
                entry.level,
                entry.date
            );
        }
        Ok(())
    }

    /// Fire at the lowest balloon once the previous shot has left play
    fn aim_and_fire(session: &mut GameSession) {
        if session.pools.any_projectile_active() || !session.slingshot.enabled {
            return;
        }
        let anchor = session.slingshot.anchor;
        let Some(target) = session
            .pools
            .balloons
            .iter()
            .filter(|b| !b.popping)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        else {
            return;
        };

        // Aim a little above the target to allow for the drop
        let dir = (target.pos - anchor - Vec2::new(0.0, target.pos.distance(anchor) * 0.25))
            .normalize_or(Vec2::X);
        if !session.pointer_down(anchor) {
            return;
        }
        session.pointer_move(anchor - dir * MAX_STRETCH);
        session.pointer_up();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is sky_sling::web::init, this is just to satisfy the compiler
}
