//! Session state machine
//!
//! START → PLAYING ⇄ PAUSED → LEVEL_COMPLETE / GAME_OVER → PLAYING.
//!
//! Input handlers (`pointer_*`, actions) may run between frames. They only
//! touch the slingshot and append launches to a queue; pools are mutated
//! exclusively by `tick`.

use glam::Vec2;

use super::kinematics::Wind;
use super::level::LevelGenerator;
use super::pools::EntityPools;
use super::slingshot::Slingshot;
use super::state::{GameStatus, LevelConfig, Projectile, Viewport};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::LEVEL_FETCH_TIMEOUT_FRAMES;
use crate::highscores::today_label;
use crate::oracle::{self, AdviceRequest, LevelDraft, Oracle};
use crate::persistence::{KeyValueStore, Profile, RecordOutcome};
use crate::settings::Settings;

/// A next-level fetch in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLevel {
    /// Identifies this transition; stale results carry an older ticket
    pub ticket: u64,
    /// Level that was just completed
    pub completed: u32,
    /// Frames spent waiting so far
    pub waited_frames: u32,
}

/// One player's game, from title screen to game over
pub struct GameSession {
    pub status: GameStatus,
    /// Cumulative across levels
    pub score: u64,
    pub shots_used: u32,
    pub level: LevelConfig,
    pub pools: EntityPools,
    pub slingshot: Slingshot,
    pub settings: Settings,
    pub profile: Profile,
    pub advice: String,
    /// Outcome of the most recent leaderboard write
    pub last_record: Option<RecordOutcome>,
    /// Set on transitions that call for fresh advice
    advice_due: bool,
    viewport: Viewport,
    generator: LevelGenerator,
    pending: Option<PendingLevel>,
    next_level: Option<LevelConfig>,
    next_ticket: u64,
    launch_queue: Vec<Projectile>,
    store: Box<dyn KeyValueStore>,
    audio: Box<dyn AudioSink>,
}

impl GameSession {
    /// Create a session on the title screen, loading profile and settings from `store`
    pub fn new(
        seed: u64,
        viewport: Viewport,
        store: Box<dyn KeyValueStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let profile = Profile::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        Self {
            status: GameStatus::Start,
            score: 0,
            shots_used: 0,
            level: LevelConfig::initial(),
            pools: EntityPools::new(seed),
            slingshot: Slingshot::new(&viewport),
            settings,
            profile,
            advice: oracle::INITIAL_ADVICE.to_string(),
            last_record: None,
            advice_due: false,
            viewport,
            generator: LevelGenerator::new(seed ^ 0x9E37_79B9_7F4A_7C15),
            pending: None,
            next_level: None,
            next_ticket: 1,
            launch_queue: Vec::new(),
            store,
            audio,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn shots_left(&self) -> u32 {
        self.level.shots_available.saturating_sub(self.shots_used)
    }

    /// Level wind plus the player's manual override
    pub fn wind(&self) -> Wind {
        Wind::new(self.level.wind, self.settings.manual_wind)
    }

    /// Pending next-level fetch, if any
    pub fn pending_level(&self) -> Option<PendingLevel> {
        self.pending
    }

    /// Resolved next level waiting for "continue"
    pub fn next_level(&self) -> Option<&LevelConfig> {
        self.next_level.as_ref()
    }

    /// True while LEVEL_COMPLETE is still waiting on the next level
    pub fn is_loading(&self) -> bool {
        self.status == GameStatus::LevelComplete && self.pending.is_some()
    }

    fn can_fire(&self) -> bool {
        self.status == GameStatus::Playing && self.shots_used < self.level.shots_available
    }

    /// Keep the slingshot's enabled flag in line with session state
    pub(crate) fn sync_slingshot(&mut self) {
        self.slingshot.enabled = self.can_fire();
    }

    // === Viewport & settings ===

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.slingshot.resize(&viewport);
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.profile.set_player_name(name);
    }

    pub fn set_power(&mut self, power: f32) {
        self.settings.set_power(power);
        self.settings.save(self.store.as_mut());
    }

    pub fn set_manual_wind(&mut self, wind: f32) {
        self.settings.set_manual_wind(wind);
        self.settings.save(self.store.as_mut());
    }

    pub fn set_balloon_speed(&mut self, speed: f32) {
        self.settings.set_balloon_speed(speed);
        self.settings.save(self.store.as_mut());
    }

    pub fn set_music(&mut self, enabled: bool) {
        self.settings.music = enabled;
        self.settings.save(self.store.as_mut());
        if enabled && self.status == GameStatus::Playing {
            self.audio.start_music();
        } else if !enabled {
            self.audio.stop_music();
        }
    }

    // === Input handlers ===

    /// Pointer pressed at canvas-local `point`
    pub fn pointer_down(&mut self, point: Vec2) -> bool {
        self.sync_slingshot();
        if self.slingshot.grab(point) {
            self.audio.play(SoundEffect::Stretch);
            true
        } else {
            false
        }
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        self.slingshot.drag_to(point);
    }

    /// Pointer released. Returns true if a shot was fired.
    pub fn pointer_up(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            // Released over a pause or end screen: drop the drag
            self.slingshot.cancel();
            return false;
        }
        let Some(vel) = self.slingshot.release(self.settings.power) else {
            return false;
        };

        let id = self.pools.next_entity_id();
        self.launch_queue.push(Projectile::new(id, self.slingshot.anchor, vel));
        self.shots_used += 1;
        self.audio.play(SoundEffect::Shot);
        self.sync_slingshot();
        log::debug!("Shot {}/{} fired at {:?}", self.shots_used, self.level.shots_available, vel);
        true
    }

    /// Move queued launches into the projectile pool (start of each step)
    pub(crate) fn drain_launches(&mut self) {
        self.pools.projectiles.append(&mut self.launch_queue);
    }

    // === Actions ===

    /// START → PLAYING
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::Start {
            return false;
        }
        self.begin_run();
        true
    }

    /// GAME_OVER → PLAYING (full reset)
    pub fn retry(&mut self) -> bool {
        if self.status != GameStatus::GameOver {
            return false;
        }
        self.begin_run();
        true
    }

    fn begin_run(&mut self) {
        self.profile.save_name(self.store.as_mut());
        self.score = 0;
        self.shots_used = 0;
        self.level = LevelConfig::initial();
        // Any in-flight fetch now belongs to a dead run
        self.pending = None;
        self.next_level = None;
        self.last_record = None;
        self.enter_level();
        self.advice_due = true;
        log::info!("Run started for {}", self.profile.player_name);
    }

    /// Reset pools for the current level and resume play
    fn enter_level(&mut self) {
        self.pools.clear();
        self.launch_queue.clear();
        self.slingshot.cancel();
        self.pools.replenish(&self.level, &self.viewport);
        self.status = GameStatus::Playing;
        self.sync_slingshot();
        if self.settings.music {
            self.audio.start_music();
        }
        log::info!(
            "Level {} \"{}\": target {}, {} shots",
            self.level.number,
            self.level.theme_name,
            self.level.target_score,
            self.level.shots_available
        );
    }

    /// PLAYING ⇄ PAUSED
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                self.audio.stop_music();
            }
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                if self.settings.music {
                    self.audio.start_music();
                }
            }
            _ => return false,
        }
        self.sync_slingshot();
        log::info!("Pause toggled: {:?}", self.status);
        true
    }

    /// LEVEL_COMPLETE → PLAYING, once the next level has resolved
    pub fn continue_level(&mut self) -> bool {
        if self.status != GameStatus::LevelComplete {
            return false;
        }
        let Some(next) = self.next_level.take() else {
            log::debug!("Continue ignored: next level still loading");
            return false;
        };
        self.level = next;
        self.shots_used = 0;
        self.enter_level();
        self.advice_due = true;
        true
    }

    // === Win / loss ===

    /// Evaluate end conditions after a step. Win is checked first.
    pub(crate) fn evaluate_outcome(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        if self.score >= self.level.target_score {
            self.enter_level_complete();
        } else if self.shots_used >= self.level.shots_available
            && !self.pools.any_projectile_active()
        {
            self.enter_game_over();
        }
    }

    fn enter_level_complete(&mut self) {
        self.status = GameStatus::LevelComplete;
        self.slingshot.cancel();
        self.sync_slingshot();
        self.audio.stop_music();
        self.audio.play(SoundEffect::Win);
        self.record_result();

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(PendingLevel {
            ticket,
            completed: self.level.number,
            waited_frames: 0,
        });
        self.next_level = None;
        log::info!("Level {} complete with score {}", self.level.number, self.score);
    }

    fn enter_game_over(&mut self) {
        self.status = GameStatus::GameOver;
        self.slingshot.cancel();
        self.sync_slingshot();
        self.audio.stop_music();
        self.audio.play(SoundEffect::Lose);
        self.record_result();
        log::info!("Game over at level {} with score {}", self.level.number, self.score);
    }

    fn record_result(&mut self) {
        self.advice_due = true;
        let outcome = self.profile.record(
            self.store.as_mut(),
            self.score,
            self.level.number,
            today_label(),
        );
        self.last_record = Some(outcome);
    }

    // === Next-level resolution ===

    /// Apply the collaborator's answer for transition `ticket`.
    ///
    /// Returns false (and discards the result) when the ticket is stale,
    /// e.g. the session was reset while the fetch was in flight.
    pub fn resolve_next_level(&mut self, ticket: u64, reply: anyhow::Result<LevelDraft>) -> bool {
        let Some(pending) = self.pending else {
            log::debug!("Discarding level result for ticket {ticket}: nothing pending");
            return false;
        };
        if pending.ticket != ticket || self.status != GameStatus::LevelComplete {
            log::debug!("Discarding stale level result for ticket {ticket}");
            return false;
        }
        let config = self.generator.resolve(pending.completed, reply, self.score);
        self.pending = None;
        self.next_level = Some(config);
        true
    }

    /// Synchronously ask `oracle` for the pending level (native hosts)
    pub fn resolve_pending_with(&mut self, oracle: &mut dyn Oracle) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        let reply = oracle.next_level(pending.completed);
        self.resolve_next_level(pending.ticket, reply)
    }

    /// Per-frame bookkeeping for a pending fetch; gives up after the timeout
    pub(crate) fn wait_for_level(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        pending.waited_frames += 1;
        if pending.waited_frames >= LEVEL_FETCH_TIMEOUT_FRAMES {
            let ticket = pending.ticket;
            log::warn!("Level fetch timed out after {LEVEL_FETCH_TIMEOUT_FRAMES} frames");
            self.resolve_next_level(ticket, Err(anyhow::anyhow!("level fetch timed out")));
        }
    }

    // === Advice ===

    pub fn advice_request(&self) -> AdviceRequest {
        AdviceRequest {
            score: self.score,
            shots_left: self.shots_left(),
            level: self.level.number,
        }
    }

    /// Request to send if a transition asked for new advice since the last call
    pub fn take_advice_request(&mut self) -> Option<AdviceRequest> {
        if std::mem::take(&mut self.advice_due) {
            Some(self.advice_request())
        } else {
            None
        }
    }

    /// Store an advice reply, substituting fallback text on failure
    pub fn set_advice(&mut self, reply: anyhow::Result<String>) {
        self.advice = oracle::advice_or_fallback(reply);
    }

    pub fn refresh_advice(&mut self, oracle: &mut dyn Oracle) {
        let reply = oracle.advice(&self.advice_request());
        self.set_advice(reply);
    }

    // === Frame hooks ===

    pub(crate) fn play(&mut self, effect: SoundEffect) {
        self.audio.play(effect);
    }

    pub(crate) fn pump_audio(&mut self) {
        self.audio.pump();
    }
}
