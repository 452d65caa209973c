//! Audio system
//!
//! Four short procedurally generated beeps, no external files. Playback is
//! fire-and-forget: a missing or failing audio backend is silently ignored
//! and never touches simulation state.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a paddle
    PaddleHit,
    /// Ball hits a side wall
    WallBounce,
    /// A point was scored
    Score,
    /// Match finished
    GameOver,
}

impl SoundEffect {
    /// The effect that accompanies a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::PaddleHit(_) => SoundEffect::PaddleHit,
            GameEvent::WallBounce => SoundEffect::WallBounce,
            GameEvent::Scored(_) => SoundEffect::Score,
            GameEvent::GameOver(_) => SoundEffect::GameOver,
        }
    }
}

/// Anything that can play effects
pub trait SoundSink {
    fn play(&self, effect: SoundEffect);

    /// Play the effect for every event, in order
    fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            self.play(SoundEffect::for_event(event));
        }
    }
}

/// A sink that drops everything (native builds, audio unavailable)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&self, _effect: SoundEffect) {}
}

/// Waveform of a single beep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// One scheduled beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beep {
    pub freq: f32,
    /// Seconds
    pub duration: f64,
    /// Seconds after the effect is triggered
    pub delay: f64,
    pub wave: Waveform,
}

/// Peak gain of a beep
pub const BEEP_GAIN: f32 = 0.1;

/// The beep sequence for an effect
pub fn beeps(effect: SoundEffect) -> Vec<Beep> {
    let beep = |freq, duration, delay, wave| Beep {
        freq,
        duration,
        delay,
        wave,
    };
    match effect {
        SoundEffect::PaddleHit => vec![beep(440.0, 0.05, 0.0, Waveform::Square)],
        SoundEffect::WallBounce => vec![beep(880.0, 0.03, 0.0, Waveform::Square)],
        // C5 - E5 - G5 arpeggio
        SoundEffect::Score => [523.25, 659.25, 783.99]
            .iter()
            .enumerate()
            .map(|(i, &freq)| beep(freq, 0.1, i as f64 * 0.05, Waveform::Sine))
            .collect(),
        // Ten-step descent from A5
        SoundEffect::GameOver => (0..10)
            .map(|i| beep(880.0 * 0.9f32.powi(i), 0.05, i as f64 * 0.05, Waveform::Sine))
            .collect(),
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{BEEP_GAIN, Beep, SoundEffect, SoundSink, Waveform, beeps};

    /// Web Audio playback
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        muted: Cell<bool>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                muted: Cell::new(false),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&self, muted: bool) {
            self.muted.set(muted);
        }

        pub fn is_muted(&self) -> bool {
            self.muted.get()
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
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

        fn play_beep(&self, ctx: &AudioContext, beep: &Beep) {
            let osc_type = match beep.wave {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
            };
            let Some((osc, gain)) = self.create_osc(ctx, beep.freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + beep.delay;

            gain.gain().set_value_at_time(BEEP_GAIN, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + beep.duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + beep.duration).ok();
        }
    }

    impl SoundSink for AudioManager {
        fn play(&self, effect: SoundEffect) {
            if self.muted.get() {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for beep in beeps(effect) {
                self.play_beep(ctx, &beep);
            }
        }
    }
}
