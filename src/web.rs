//! Browser bindings
//!
//! JavaScript owns the canvas, the `requestAnimationFrame` loop and the
//! network. It forwards pointer events, calls `frame` once per refresh and
//! draws from `snapshot_json`. Collaborator traffic is pull-based: JS polls
//! for pending requests and answers through the `supply_*` methods.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::oracle::parse_level_draft;
use crate::persistence::LocalStorage;
use crate::sim::{GameSession, Viewport, tick};
use crate::snapshot::Snapshot;

const STORAGE_PREFIX: &str = "sky_sling.";

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Sky Sling starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: u64) -> WebGame {
        let session = GameSession::new(
            seed,
            Viewport::new(width, height),
            Box::new(LocalStorage::new(STORAGE_PREFIX)),
            Box::new(WebAudio::new()),
        );
        WebGame { session }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(Viewport::new(width, height));
    }

    // === Input ===

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.session.pointer_down(Vec2::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.session.pointer_move(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) -> bool {
        self.session.pointer_up()
    }

    // === Actions ===

    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    pub fn retry(&mut self) -> bool {
        self.session.retry()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.session.toggle_pause()
    }

    pub fn continue_level(&mut self) -> bool {
        self.session.continue_level()
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.session.set_player_name(name);
    }

    pub fn set_power(&mut self, power: f32) {
        self.session.set_power(power);
    }

    pub fn set_wind(&mut self, wind: f32) {
        self.session.set_manual_wind(wind);
    }

    pub fn set_balloon_speed(&mut self, speed: f32) {
        self.session.set_balloon_speed(speed);
    }

    pub fn set_music(&mut self, enabled: bool) {
        self.session.set_music(enabled);
    }

    // === Frame ===

    /// Advance one step; `frame` is the host's monotonically increasing counter
    pub fn frame(&mut self, frame: u64) {
        tick(&mut self.session, frame);
    }

    pub fn snapshot_json(&self) -> String {
        match Snapshot::of(&self.session).to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {e}");
                String::from("{}")
            }
        }
    }

    // === Collaborator ===

    /// Ticket of the pending next-level fetch, if JS should start one
    pub fn pending_level_ticket(&self) -> Option<u64> {
        self.session.pending_level().map(|p| p.ticket)
    }

    /// Level that was just completed, for the fetch request body
    pub fn pending_level_number(&self) -> Option<u32> {
        self.session.pending_level().map(|p| p.completed)
    }

    /// Deliver the fetch result. `None` means the request failed.
    pub fn supply_level_config(&mut self, ticket: u64, json: Option<String>) -> bool {
        let reply = match json {
            Some(json) => parse_level_draft(&json),
            None => Err(anyhow::anyhow!("level request failed")),
        };
        self.session.resolve_next_level(ticket, reply)
    }

    /// JSON advice request if one is due (consumed on read)
    pub fn take_advice_request_json(&mut self) -> Option<String> {
        let request = self.session.take_advice_request()?;
        serde_json::to_string(&request).ok()
    }

    /// Deliver advice text. `None` means the request failed.
    pub fn supply_advice(&mut self, text: Option<String>) {
        let reply = text.ok_or_else(|| anyhow::anyhow!("advice request failed"));
        self.session.set_advice(reply);
    }
}
