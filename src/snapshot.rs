//! Read-only per-frame view of a session
//!
//! The presentation layer never touches `GameSession` directly; it renders
//! whatever this struct serializes to.

use glam::Vec2;
use serde::Serialize;

use crate::highscores::LeaderboardEntry;
use crate::persistence::RecordOutcome;
use crate::sim::{Balloon, GameSession, GameStatus, LevelConfig, Particle, Projectile};

/// Slingshot as drawn: band endpoints plus the aiming preview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlingshotView {
    pub anchor: Vec2,
    pub drag: Vec2,
    pub dragging: bool,
    pub enabled: bool,
    pub preview: Vec<Vec2>,
}

/// Heads-up display values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hud<'a> {
    pub status: GameStatus,
    pub score: u64,
    pub level: u32,
    pub theme: &'a str,
    pub target_score: u64,
    pub shots_left: u32,
    pub wind: f32,
    pub player_name: &'a str,
    pub personal_best: u64,
    pub advice: &'a str,
    /// Waiting on the next level
    pub loading: bool,
    pub next_level: Option<&'a LevelConfig>,
    pub last_record: Option<RecordOutcome>,
    pub leaderboard: &'a [LeaderboardEntry],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub balloons: &'a [Balloon],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    pub slingshot: SlingshotView,
    pub hud: Hud<'a>,
}

impl<'a> Snapshot<'a> {
    pub fn of(session: &'a GameSession) -> Self {
        let wind = session.wind();
        let sling = &session.slingshot;
        Self {
            balloons: &session.pools.balloons,
            projectiles: &session.pools.projectiles,
            particles: &session.pools.particles,
            slingshot: SlingshotView {
                anchor: sling.anchor,
                drag: sling.drag,
                dragging: sling.dragging,
                enabled: sling.enabled,
                preview: sling.preview(session.settings.power, wind),
            },
            hud: Hud {
                status: session.status,
                score: session.score,
                level: session.level.number,
                theme: &session.level.theme_name,
                target_score: session.level.target_score,
                shots_left: session.shots_left(),
                wind: wind.ambient + wind.manual,
                player_name: &session.profile.player_name,
                personal_best: session.profile.personal_best,
                advice: &session.advice,
                loading: session.is_loading(),
                next_level: session.next_level(),
                last_record: session.last_record,
                leaderboard: &session.profile.leaderboard.entries,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::persistence::MemoryStore;
    use crate::sim::Viewport;

    fn session() -> GameSession {
        GameSession::new(8, Viewport::default(), Box::new(MemoryStore::new()), Box::new(NullAudio))
    }

    #[test]
    fn test_title_screen_snapshot() {
        let s = session();
        let snap = Snapshot::of(&s);
        assert_eq!(snap.hud.status, GameStatus::Start);
        assert!(snap.balloons.is_empty());
        assert!(snap.slingshot.preview.is_empty());
        assert_eq!(snap.hud.shots_left, 20);
        assert_eq!(snap.hud.theme, "Sunny Skies");
    }

    #[test]
    fn test_preview_only_while_dragging() {
        let mut s = session();
        s.start();
        let anchor = s.slingshot.anchor;
        s.pointer_down(anchor);
        s.pointer_move(anchor + Vec2::new(-80.0, 30.0));
        let snap = Snapshot::of(&s);
        assert!(snap.slingshot.dragging);
        assert_eq!(snap.slingshot.preview.len(), crate::consts::PREVIEW_STEPS);
        assert_eq!(snap.balloons.len(), 8);
    }

    #[test]
    fn test_json_shape() {
        let mut s = session();
        s.start();
        let json = Snapshot::of(&s).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["hud"]["shotsLeft"], 20);
        assert_eq!(value["hud"]["targetScore"], 2000);
        assert_eq!(value["hud"]["loading"], false);
        assert!(value["balloons"].as_array().unwrap().len() == 8);
        assert!(value["slingshot"]["anchor"].is_array());
    }
}
