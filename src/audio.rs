//! Sound as an injected capability
//!
//! The simulation holds a `Box<dyn AudioSink>` and fires cues at it. The
//! browser sink synthesizes everything with Web Audio oscillators.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Slingshot grabbed
    Stretch,
    /// Projectile released
    Shot,
    /// Balloon popped
    Pop,
    /// Level cleared
    Win,
    /// Out of shots
    Lose,
}

/// Anything that can play the game's sounds
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn start_music(&mut self);
    fn stop_music(&mut self);
    /// Called once per frame; sinks that schedule ahead top up here
    fn pump(&mut self) {}
}

/// Silent sink for native runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
    fn start_music(&mut self) {}
    fn stop_music(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Looping background melody (C4 E4 G4 C5 A4 F4 G4 E4)
    const MELODY: [f32; 8] = [261.63, 329.63, 392.0, 523.25, 440.0, 349.23, 392.0, 329.63];
    const NOTE_SECS: f64 = 0.45;
    const MUSIC_GAIN: f32 = 0.18 * VOLUME;
    /// Overall output level applied to every cue
    const VOLUME: f32 = 0.8;
    /// Schedule the next bar once playback is this close to its end
    const LOOKAHEAD_SECS: f64 = 0.5;

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music_bus: Option<GainNode>,
        music_on: bool,
        /// Context time at which the next melody bar starts
        next_bar_at: f64,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let music_bus = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.gain().set_value(0.0);
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            Self {
                ctx,
                music_bus,
                music_on: false,
                next_bar_at: 0.0,
            }
        }

        /// Resume context if suspended (browsers require user gesture)
        fn wake(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Create an oscillator routed through its own gain
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single tone with a frequency sweep and exponential fade
        fn sweep(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            peak: f32,
            secs: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            let now = ctx.current_time();
            let _ = osc.frequency().set_value_at_time(from, now);
            if (to - from).abs() > f32::EPSILON {
                let _ = osc.frequency().exponential_ramp_to_value_at_time(to, now + secs);
            }
            let _ = gain.gain().set_value_at_time(peak * VOLUME, now);
            let _ = gain.gain().exponential_ramp_to_value_at_time(0.01, now + secs);
            let _ = osc.start();
            let _ = osc.stop_with_when(now + secs);
        }

        /// Short arpeggio, one oscillator per note
        fn arpeggio(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            notes: &[f32],
            spacing: f64,
            length: f64,
        ) {
            let now = ctx.current_time();
            for (i, &freq) in notes.iter().enumerate() {
                let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                    continue;
                };
                let at = now + i as f64 * spacing;
                let _ = osc.frequency().set_value_at_time(freq, at);
                let _ = gain.gain().set_value_at_time(0.1 * VOLUME, at);
                let _ = gain.gain().exponential_ramp_to_value_at_time(0.01, at + length);
                let _ = osc.start_with_when(at);
                let _ = osc.stop_with_when(at + length);
            }
        }

        fn schedule_bar(&mut self, ctx: &AudioContext, bus: &GainNode) {
            let start = self.next_bar_at.max(ctx.current_time());
            for (i, &freq) in MELODY.iter().enumerate() {
                let Ok(osc) = ctx.create_oscillator() else { continue };
                let Ok(note) = ctx.create_gain() else { continue };
                osc.set_type(OscillatorType::Triangle);
                let at = start + i as f64 * NOTE_SECS;
                let _ = osc.frequency().set_value_at_time(freq, at);
                let _ = note.gain().set_value_at_time(0.0, at);
                let _ = note.gain().linear_ramp_to_value_at_time(0.08, at + 0.05);
                let _ = note.gain().linear_ramp_to_value_at_time(0.0, at + NOTE_SECS - 0.05);
                if osc.connect_with_audio_node(&note).is_err()
                    || note.connect_with_audio_node(bus).is_err()
                {
                    continue;
                }
                let _ = osc.start_with_when(at);
                let _ = osc.stop_with_when(at + NOTE_SECS);
            }
            self.next_bar_at = start + MELODY.len() as f64 * NOTE_SECS;
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let Some(ctx) = self.wake() else { return };
            match effect {
                SoundEffect::Stretch => {
                    self.sweep(ctx, OscillatorType::Sine, 100.0, 100.0, 0.05, 0.05)
                }
                SoundEffect::Shot => {
                    self.sweep(ctx, OscillatorType::Triangle, 150.0, 400.0, 0.2, 0.15)
                }
                SoundEffect::Pop => self.sweep(ctx, OscillatorType::Sine, 600.0, 100.0, 0.3, 0.1),
                SoundEffect::Win => {
                    let notes = [523.25, 659.25, 783.99, 1046.5];
                    self.arpeggio(ctx, OscillatorType::Square, &notes, 0.1, 0.3)
                }
                SoundEffect::Lose => {
                    let notes = [392.0, 349.23, 329.63, 261.63];
                    self.arpeggio(ctx, OscillatorType::Sawtooth, &notes, 0.15, 0.4)
                }
            }
        }

        fn start_music(&mut self) {
            if self.music_on {
                return;
            }
            let (Some(ctx), Some(bus)) = (self.wake().cloned(), self.music_bus.clone()) else {
                return;
            };
            self.music_on = true;
            let _ = bus.gain().set_target_at_time(MUSIC_GAIN, ctx.current_time(), 0.5);
            self.next_bar_at = ctx.current_time();
            self.schedule_bar(&ctx, &bus);
        }

        fn stop_music(&mut self) {
            self.music_on = false;
            if let (Some(ctx), Some(bus)) = (&self.ctx, &self.music_bus) {
                let _ = bus.gain().set_target_at_time(0.0, ctx.current_time(), 0.2);
            }
        }

        fn pump(&mut self) {
            if !self.music_on {
                return;
            }
            let (Some(ctx), Some(bus)) = (self.ctx.clone(), self.music_bus.clone()) else {
                return;
            };
            if ctx.current_time() + LOOKAHEAD_SECS >= self.next_bar_at {
                self.schedule_bar(&ctx, &bus);
            }
        }
    }
}
