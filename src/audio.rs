//! Audio cues
//!
//! The engine only triggers cues; hosts decide how they sound. On the web the
//! cues are synthesized with the Web Audio API, no sound files needed.

/// Fire-and-forget cue sink
pub trait AudioCues {
    /// Go target tapped
    fn play_success(&self, volume: f32);
    /// No-go target tapped
    fn play_miss(&self, volume: f32);
}

impl<T: AudioCues + ?Sized> AudioCues for &T {
    fn play_success(&self, volume: f32) {
        (**self).play_success(volume)
    }

    fn play_miss(&self, volume: f32) {
        (**self).play_miss(volume)
    }
}

/// Cue sink that plays nothing (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play_success(&self, _volume: f32) {}
    fn play_miss(&self, _volume: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudioCues;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::AudioCues;

    /// Procedural cues on a shared AudioContext
    pub struct WebAudioCues {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioCues {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioCues {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn context(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

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

        /// One enveloped tone starting `delay` seconds from now
        fn tone(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            duration: f64,
            vol: f32,
            delay: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + duration).ok();
        }
    }

    impl AudioCues for WebAudioCues {
        /// High "ding": A5 then A6
        fn play_success(&self, volume: f32) {
            let vol = volume.clamp(0.0, 1.0);
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };
            self.tone(ctx, 880.0, OscillatorType::Sine, 0.1, vol, 0.0);
            self.tone(ctx, 1760.0, OscillatorType::Sine, 0.3, vol * 0.8, 0.05);
        }

        /// Low dull thud
        fn play_miss(&self, volume: f32) {
            let vol = volume.clamp(0.0, 1.0);
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };
            self.tone(ctx, 150.0, OscillatorType::Triangle, 0.2, vol * 0.8, 0.0);
        }
    }
}
