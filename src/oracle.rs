//! Advice and level-generation collaborator
//!
//! The remote service is optional. Every failure degrades to a local value:
//! fallback advice text here, the deterministic level formula in
//! `sim::level`.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// Shown before the first reply arrives
pub const INITIAL_ADVICE: &str = "Pull back the string and let fate fly!";
/// Used when the collaborator answers with nothing
pub const EMPTY_ADVICE: &str = "May your aim be true and your balloons many.";
/// Used when the collaborator fails
pub const FALLBACK_ADVICE: &str = "The winds of fate are shifting. Aim high, young one!";
/// Longest advice string kept (in characters)
pub const MAX_ADVICE_CHARS: usize = 240;

/// Context sent with an advice request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    pub score: u64,
    pub shots_left: u32,
    pub level: u32,
}

/// Next-level record as produced by the collaborator (unvalidated)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDraft {
    pub balloon_count: f64,
    pub balloon_speed_range: Vec<f64>,
    pub target_score: f64,
    pub shots_available: f64,
    pub wind: f64,
    pub theme_name: String,
}

/// Parse a JSON level draft returned by the remote service
pub fn parse_level_draft(json: &str) -> anyhow::Result<LevelDraft> {
    let draft: LevelDraft = serde_json::from_str(json).context("malformed level draft")?;
    if draft.balloon_speed_range.len() < 2 {
        bail!(
            "balloonSpeedRange needs two values, got {}",
            draft.balloon_speed_range.len()
        );
    }
    Ok(draft)
}

/// Resolve an advice reply to display text
pub fn advice_or_fallback(reply: anyhow::Result<String>) -> String {
    match reply {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                EMPTY_ADVICE.to_string()
            } else {
                text.chars().take(MAX_ADVICE_CHARS).collect()
            }
        }
        Err(e) => {
            log::warn!("Advice request failed: {e:#}");
            FALLBACK_ADVICE.to_string()
        }
    }
}

/// The external advice / level-generation service
pub trait Oracle {
    /// A short comment on the player's performance
    fn advice(&mut self, request: &AdviceRequest) -> anyhow::Result<String>;

    /// A proposed configuration for the level after `current_level`
    fn next_level(&mut self, current_level: u32) -> anyhow::Result<LevelDraft>;
}

/// Stand-in used when no service is configured; always defers to fallbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineOracle;

impl Oracle for OfflineOracle {
    fn advice(&mut self, _request: &AdviceRequest) -> anyhow::Result<String> {
        bail!("no advice service configured")
    }

    fn next_level(&mut self, _current_level: u32) -> anyhow::Result<LevelDraft> {
        bail!("no level service configured")
    }
}
