//! Player settings and preferences
//!
//! Persisted separately from the profile under the `settings` key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, load_json, save_json};

pub const MIN_POWER: f32 = 0.5;
pub const MAX_POWER: f32 = 2.0;
pub const MAX_MANUAL_WIND: f32 = 3.0;
pub const MIN_BALLOON_SPEED: f32 = 0.25;
pub const MAX_BALLOON_SPEED: f32 = 3.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Launch power multiplier applied on top of elasticity
    pub power: f32,
    /// Player-controlled wind, added to the level's ambient wind
    pub manual_wind: f32,
    /// Balloon rise speed multiplier
    pub balloon_speed: f32,
    /// Background music while playing
    pub music: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            power: 1.0,
            manual_wind: 0.0,
            balloon_speed: 1.0,
            music: true,
        }
    }
}

impl Settings {
    pub fn set_power(&mut self, power: f32) {
        self.power = clamp_finite(power, MIN_POWER, MAX_POWER, 1.0);
    }

    pub fn set_manual_wind(&mut self, wind: f32) {
        self.manual_wind = clamp_finite(wind, -MAX_MANUAL_WIND, MAX_MANUAL_WIND, 0.0);
    }

    pub fn set_balloon_speed(&mut self, speed: f32) {
        self.balloon_speed = clamp_finite(speed, MIN_BALLOON_SPEED, MAX_BALLOON_SPEED, 1.0);
    }

    /// Re-apply limits (after loading untrusted data)
    pub fn sanitize(&mut self) {
        self.set_power(self.power);
        self.set_manual_wind(self.manual_wind);
        self.set_balloon_speed(self.balloon_speed);
    }

    /// Load settings from storage
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings: Settings = load_json(store, keys::SETTINGS);
        settings.sanitize();
        settings
    }

    /// Save settings to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        save_json(store, keys::SETTINGS, self);
        log::debug!("Settings saved");
    }
}

fn clamp_finite(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_setters_clamp() {
        let mut s = Settings::default();
        s.set_power(5.0);
        assert_eq!(s.power, MAX_POWER);
        s.set_manual_wind(-10.0);
        assert_eq!(s.manual_wind, -MAX_MANUAL_WIND);
        s.set_balloon_speed(f32::NAN);
        assert_eq!(s.balloon_speed, 1.0);
    }

    #[test]
    fn test_load_partial_and_malformed() {
        let store = MemoryStore::new().with(keys::SETTINGS, r#"{"power": 9.0}"#);
        let s = Settings::load(&store);
        assert_eq!(s.power, MAX_POWER);
        assert!(s.music);

        let broken = MemoryStore::new().with(keys::SETTINGS, "nope");
        assert_eq!(Settings::load(&broken), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.set_manual_wind(1.5);
        s.music = false;
        s.save(&mut store);
        assert_eq!(Settings::load(&store), s);
    }
}
