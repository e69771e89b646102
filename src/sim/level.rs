//! Level generation
//!
//! Deterministic fallback formula, plus validation of drafts coming from the
//! optional remote service.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::LevelConfig;
use crate::oracle::LevelDraft;

/// Theme names, cycled by level
pub const THEMES: [&str; 6] = [
    "Sunny Skies",
    "Breezy Meadows",
    "Sunset Drift",
    "Stormy Heights",
    "Starlit Night",
    "Aurora Peaks",
];

pub const MAX_BALLOONS: u32 = 24;
pub const MAX_SHOTS: u32 = 99;
/// Symmetric range of randomized ambient wind in fallback levels
pub const FALLBACK_WIND: f32 = 1.0;
/// Symmetric clamp on wind proposed by the remote service
pub const MAX_DRAFT_WIND: f32 = 2.0;
pub const MAX_BALLOON_SPEED: f32 = 12.0;

const BASE_TARGET: u64 = 2000;
const TARGET_PER_LEVEL: u64 = 1500;
const BASE_SHOTS: u32 = 20;

/// Produces the next `LevelConfig`
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    rng: Pcg32,
}

impl LevelGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Theme for a given level number (1-based)
    pub fn theme_for(level: u32) -> &'static str {
        THEMES[(level.saturating_sub(1) as usize) % THEMES.len()]
    }

    /// Level following `completed`, derived locally.
    ///
    /// The target never drops to or below the cumulative `score`.
    pub fn fallback(&mut self, completed: u32, score: u64) -> LevelConfig {
        let n = completed;
        let formula_target = BASE_TARGET + TARGET_PER_LEVEL * n as u64;
        let config = LevelConfig {
            number: n + 1,
            balloon_count: (8 + 2 * n).min(MAX_BALLOONS),
            balloon_speed_range: (1.0 + 0.2 * n as f32, 2.0 + 0.3 * n as f32),
            target_score: formula_target.max(score + 1),
            shots_available: (BASE_SHOTS + n).min(MAX_SHOTS),
            wind: self.rng.random_range(-FALLBACK_WIND..=FALLBACK_WIND),
            theme_name: Self::theme_for(n + 1).to_string(),
        };
        log::info!(
            "Fallback level {}: {} balloons, target {}, {} shots, wind {:.2}",
            config.number,
            config.balloon_count,
            config.target_score,
            config.shots_available,
            config.wind
        );
        config
    }

    /// Turn a remote draft into a playable level.
    ///
    /// Out-of-range values are clamped; the target is kept strictly above the
    /// cumulative `score` so the new level cannot clear on its first frame.
    pub fn from_draft(&mut self, completed: u32, draft: &LevelDraft, score: u64) -> LevelConfig {
        let finite = |v: f64, default: f64| if v.is_finite() { v } else { default };

        let balloon_count = finite(draft.balloon_count, 8.0)
            .round()
            .clamp(1.0, MAX_BALLOONS as f64) as u32;

        let a = finite(draft.balloon_speed_range.first().copied().unwrap_or(1.0), 1.0) as f32;
        let b = finite(draft.balloon_speed_range.get(1).copied().unwrap_or(2.0), 2.0) as f32;
        let lo = a.min(b).clamp(0.1, MAX_BALLOON_SPEED);
        let hi = a.max(b).clamp(lo, MAX_BALLOON_SPEED);

        let target = finite(draft.target_score, 0.0).max(0.0).round() as u64;
        let target_score = target.max(score + 1);

        let shots_available = finite(draft.shots_available, BASE_SHOTS as f64)
            .round()
            .clamp(1.0, MAX_SHOTS as f64) as u32;
        let wind = (finite(draft.wind, 0.0) as f32).clamp(-MAX_DRAFT_WIND, MAX_DRAFT_WIND);

        let theme = draft.theme_name.trim();
        let theme_name = if theme.is_empty() {
            Self::theme_for(completed + 1).to_string()
        } else {
            theme.to_string()
        };

        LevelConfig {
            number: completed + 1,
            balloon_count,
            balloon_speed_range: (lo, hi),
            target_score,
            shots_available,
            wind,
            theme_name,
        }
    }

    /// Resolve a collaborator reply, falling back on any error
    pub fn resolve(
        &mut self,
        completed: u32,
        reply: anyhow::Result<LevelDraft>,
        score: u64,
    ) -> LevelConfig {
        match reply {
            Ok(draft) => {
                let config = self.from_draft(completed, &draft, score);
                log::info!("Using remote level {} \"{}\"", config.number, config.theme_name);
                config
            }
            Err(e) => {
                log::warn!("Level generation failed, using fallback: {e:#}");
                self.fallback(completed, score)
            }
        }
    }
}
