//! Player profile: name, personal best, leaderboard

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, keys, load_json, save_json};
use crate::highscores::{Leaderboard, LeaderboardEntry};

pub const DEFAULT_PLAYER_NAME: &str = "Ace";
/// Name recorded when the player cleared the field
pub const ANONYMOUS_NAME: &str = "Player";
pub const MAX_NAME_CHARS: usize = 12;

/// Result of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    /// Leaderboard rank (1-indexed), None if it didn't make the board
    pub rank: Option<usize>,
    pub new_best: bool,
}

/// Everything persisted about the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub player_name: String,
    pub personal_best: u64,
    pub leaderboard: Leaderboard,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            personal_best: 0,
            leaderboard: Leaderboard::new(),
        }
    }
}

impl Profile {
    /// Load from storage; anything missing or malformed falls back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut leaderboard: Leaderboard = load_json(store, keys::LEADERBOARD);
        leaderboard.normalize();

        let personal_best = match store.get(keys::PERSONAL_BEST) {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Discarding malformed personal best {raw:?}");
                0
            }),
            None => 0,
        };

        let player_name = store
            .get(keys::PLAYER_NAME)
            .map(|name| cap_name(&name))
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());

        log::info!(
            "Loaded profile for {player_name}: best {personal_best}, {} leaderboard entries",
            leaderboard.len()
        );

        Self {
            player_name,
            personal_best,
            leaderboard,
        }
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = cap_name(name);
    }

    /// Persist the player name (done when a session starts)
    pub fn save_name(&self, store: &mut dyn KeyValueStore) {
        store.set(keys::PLAYER_NAME, &self.player_name);
    }

    /// Record a finished level or run and persist the result immediately
    pub fn record(
        &mut self,
        store: &mut dyn KeyValueStore,
        score: u64,
        level: u32,
        date: String,
    ) -> RecordOutcome {
        let new_best = score > self.personal_best;
        if new_best {
            self.personal_best = score;
            store.set(keys::PERSONAL_BEST, &score.to_string());
        }

        let name = if self.player_name.trim().is_empty() {
            ANONYMOUS_NAME.to_string()
        } else {
            self.player_name.clone()
        };
        let rank = self.leaderboard.add(LeaderboardEntry {
            name,
            score,
            level,
            date,
        });
        save_json(store, keys::LEADERBOARD, &self.leaderboard);

        log::info!("Recorded score {score} (level {level}), rank {rank:?}, new best: {new_best}");
        RecordOutcome { rank, new_best }
    }
}

fn cap_name(name: &str) -> String {
    name.chars().take(MAX_NAME_CHARS).collect()
}
