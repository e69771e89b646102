//! End-to-end session scenarios driven through the public API

use std::collections::VecDeque;

use glam::Vec2;

use sky_sling::audio::NullAudio;
use sky_sling::oracle::{AdviceRequest, LevelDraft, Oracle};
use sky_sling::persistence::{MemoryStore, Profile};
use sky_sling::sim::{Balloon, GameSession, GameStatus, Viewport, tick};

/// Replays canned replies and remembers what it was asked
#[derive(Default)]
struct ScriptedOracle {
    levels: VecDeque<anyhow::Result<LevelDraft>>,
    asked_for: Vec<u32>,
}

impl Oracle for ScriptedOracle {
    fn advice(&mut self, request: &AdviceRequest) -> anyhow::Result<String> {
        Ok(format!("Level {} with {} shots left", request.level, request.shots_left))
    }

    fn next_level(&mut self, current_level: u32) -> anyhow::Result<LevelDraft> {
        self.asked_for.push(current_level);
        self.levels
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("service unavailable")))
    }
}

struct Harness {
    session: GameSession,
    frame: u64,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let session = GameSession::new(
            seed,
            Viewport::default(),
            Box::new(MemoryStore::new()),
            Box::new(NullAudio),
        );
        Self { session, frame: 0 }
    }

    fn step(&mut self) {
        tick(&mut self.session, self.frame);
        self.frame += 1;
    }

    fn fire(&mut self, pull: Vec2) -> bool {
        let anchor = self.session.slingshot.anchor;
        if !self.session.pointer_down(anchor) {
            return false;
        }
        self.session.pointer_move(anchor + pull);
        self.session.pointer_up()
    }

    /// Step until the last shot has left play (or the level ends)
    fn settle(&mut self) {
        self.step();
        while self.session.status == GameStatus::Playing
            && self.session.pools.any_projectile_active()
        {
            self.step();
        }
    }

    /// Replace the field with two stationary balloons right of the anchor
    fn stage_two_balloons(&mut self) {
        let anchor = self.session.slingshot.anchor;
        let pools = &mut self.session.pools;
        pools.balloons.clear();
        for dx in [12.0, 20.0] {
            let id = pools.next_entity_id();
            pools.balloons.push(Balloon::new(id, anchor + Vec2::new(dx, 0.0), 25.0, 0.0));
        }
    }

    /// 1800 points and 4 shots in, then one shot pops both staged balloons
    fn win_first_level(&mut self) {
        self.session.start();
        self.session.score = 1800;
        self.session.shots_used = 4;
        self.stage_two_balloons();
        assert!(self.fire(Vec2::new(-100.0, 0.0)));
        self.step();
    }
}

#[test]
fn all_shots_missed_ends_the_game() {
    let mut h = Harness::new(7);
    h.session.start();

    for shot in 1..=20 {
        // Pulling up fires straight down, away from every balloon
        assert!(h.fire(Vec2::new(0.0, -100.0)), "shot {shot} should fire");
        assert_eq!(h.session.shots_used, shot);
        if shot < 20 {
            h.settle();
            assert_eq!(h.session.status, GameStatus::Playing);
        }
    }

    // Out of shots but the last one is still flying
    h.step();
    assert_eq!(h.session.status, GameStatus::Playing);
    assert!(h.session.pools.any_projectile_active());
    assert!(!h.fire(Vec2::new(0.0, -100.0)));

    h.settle();
    assert_eq!(h.session.status, GameStatus::GameOver);
    assert_eq!(h.session.score, 0);

    let stored = Profile::load(h.session.store());
    assert_eq!(stored.leaderboard.len(), 1);
    assert_eq!(stored.leaderboard.entries[0].score, 0);
    assert_eq!(stored.leaderboard.entries[0].level, 1);
    assert_eq!(stored.leaderboard.entries[0].name, "Ace");
}

#[test]
fn double_pop_completes_the_level() {
    let mut h = Harness::new(21);
    h.win_first_level();

    assert_eq!(h.session.score, 2100);
    assert_eq!(h.session.status, GameStatus::LevelComplete);
    assert_eq!(h.session.shots_left(), 15);
    assert!(h.session.is_loading());
    assert_eq!(h.session.profile.personal_best, 2100);
    assert_eq!(h.session.last_record.and_then(|r| r.rank), Some(1));

    // Nothing moves while the level is being prepared
    let balloons = h.session.pools.balloons.len();
    h.step();
    assert_eq!(h.session.pools.balloons.len(), balloons);
    assert!(!h.fire(Vec2::new(-100.0, 0.0)));
}

#[test]
fn failed_level_fetch_uses_fallback() {
    let mut h = Harness::new(3);
    h.win_first_level();

    let mut oracle = ScriptedOracle::default();
    assert!(h.session.resolve_pending_with(&mut oracle));
    assert_eq!(oracle.asked_for, vec![1]);

    let next = h.session.next_level().cloned().unwrap();
    assert_eq!(next.number, 2);
    assert_eq!(next.balloon_count, 10);
    assert_eq!(next.target_score, 3500);
    assert_eq!(next.shots_available, 21);
    assert_eq!(next.theme_name, "Breezy Meadows");
    assert!((-1.0..=1.0).contains(&next.wind));

    assert!(h.session.continue_level());
    assert_eq!(h.session.status, GameStatus::Playing);
    assert_eq!(h.session.score, 2100);
    assert_eq!(h.session.shots_used, 0);
    assert_eq!(h.session.pools.balloons.len(), 10);
}

#[test]
fn remote_level_is_sanitized() {
    let mut h = Harness::new(4);
    h.win_first_level();

    let mut oracle = ScriptedOracle::default();
    oracle.levels.push_back(Ok(LevelDraft {
        balloon_count: 500.0,
        balloon_speed_range: vec![3.0, 1.5],
        target_score: 100.0,
        shots_available: 12.0,
        wind: -9.0,
        theme_name: "Gusty Gardens".into(),
    }));
    h.session.resolve_pending_with(&mut oracle);

    let next = h.session.next_level().cloned().unwrap();
    assert_eq!(next.number, 2);
    assert_eq!(next.balloon_count, 24);
    assert_eq!(next.balloon_speed_range, (1.5, 3.0));
    assert!(next.target_score > 2100);
    assert_eq!(next.shots_available, 12);
    assert_eq!(next.wind, -2.0);
    assert_eq!(next.theme_name, "Gusty Gardens");
}

#[test]
fn level_fetch_times_out_to_fallback() {
    let mut h = Harness::new(5);
    h.win_first_level();

    for _ in 0..sky_sling::consts::LEVEL_FETCH_TIMEOUT_FRAMES {
        assert_eq!(h.session.status, GameStatus::LevelComplete);
        h.step();
    }
    assert!(!h.session.is_loading());
    assert_eq!(h.session.next_level().map(|l| l.number), Some(2));
}

#[test]
fn stale_fetch_after_restart_is_discarded() {
    let mut h = Harness::new(9);
    h.win_first_level();
    let stale = h.session.pending_level().unwrap().ticket;

    // Finish level 2 the hard way: out of shots with nothing in flight
    h.session.resolve_pending_with(&mut ScriptedOracle::default());
    h.session.continue_level();
    h.session.shots_used = h.session.level.shots_available;
    h.step();
    assert_eq!(h.session.status, GameStatus::GameOver);

    assert!(h.session.retry());
    assert_eq!(h.session.level.number, 1);
    assert_eq!(h.session.score, 0);

    let late = Ok(LevelDraft {
        balloon_count: 3.0,
        balloon_speed_range: vec![1.0, 1.0],
        target_score: 10.0,
        shots_available: 1.0,
        wind: 0.0,
        theme_name: "Late".into(),
    });
    assert!(!h.session.resolve_next_level(stale, late));
    assert_eq!(h.session.status, GameStatus::Playing);
    assert_eq!(h.session.level.number, 1);
    assert!(h.session.next_level().is_none());
}

#[test]
fn pause_freezes_everything() {
    let mut h = Harness::new(13);
    h.session.start();
    h.fire(Vec2::new(-90.0, 50.0));
    for _ in 0..5 {
        h.step();
    }
    assert!(h.session.toggle_pause());

    let score = h.session.score;
    let shots = h.session.shots_used;
    let balloons: Vec<Vec2> = h.session.pools.balloons.iter().map(|b| b.pos).collect();
    let projectiles: Vec<Vec2> = h.session.pools.projectiles.iter().map(|p| p.pos).collect();

    for _ in 0..120 {
        h.step();
    }
    assert!(!h.fire(Vec2::new(-90.0, 50.0)));

    assert_eq!(h.session.status, GameStatus::Paused);
    assert_eq!(h.session.score, score);
    assert_eq!(h.session.shots_used, shots);
    assert_eq!(balloons, h.session.pools.balloons.iter().map(|b| b.pos).collect::<Vec<_>>());
    assert_eq!(projectiles, h.session.pools.projectiles.iter().map(|p| p.pos).collect::<Vec<_>>());
}

#[test]
fn preview_matches_flight() {
    let mut h = Harness::new(17);
    h.session.start();
    h.session.pools.balloons.clear();
    h.session.set_manual_wind(2.0);

    let anchor = h.session.slingshot.anchor;
    h.session.pointer_down(anchor);
    h.session.pointer_move(anchor + Vec2::new(-100.0, 60.0));
    let preview = h.session.slingshot.preview(h.session.settings.power, h.session.wind());
    assert!(h.session.pointer_up());

    for expected in preview.iter().take(10) {
        // Keep the field empty so nothing deflects the comparison
        h.session.pools.balloons.clear();
        h.step();
        let shot = &h.session.pools.projectiles[0];
        assert!(shot.pos.distance(*expected) < 1e-3, "{:?} vs {:?}", shot.pos, expected);
    }
}

#[test]
fn advice_follows_transitions() {
    let mut h = Harness::new(1);
    let mut oracle = ScriptedOracle::default();
    h.session.start();

    let request = h.session.take_advice_request().unwrap();
    h.session.set_advice(oracle.advice(&request));
    assert_eq!(h.session.advice, "Level 1 with 20 shots left");

    h.session.set_advice(Err(anyhow::anyhow!("network down")));
    assert_eq!(h.session.advice, sky_sling::oracle::FALLBACK_ADVICE);
}
