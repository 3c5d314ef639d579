//! Web Audio backend
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use super::{AudioError, AudioSink, SoundEffect};
use crate::consts::SOUND_VOLUME;

/// Audio sink backed by an `AudioContext`
pub struct WebAudioSink {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
}

impl Default for WebAudioSink {
    fn default() -> Self {
        Self::new(SOUND_VOLUME, false)
    }
}

impl WebAudioSink {
    pub fn new(volume: f32, muted: bool) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
            muted,
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Create an oscillator with gain envelope
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

    /// Bean hit - short woody thump with a click on top
    fn play_hit(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
        let (osc, gain) =
            Self::create_osc(ctx, 220.0, OscillatorType::Triangle).ok_or(AudioError::Unavailable)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.7, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.09)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(90.0, t + 0.08)
            .ok();
        osc.start().map_err(|_| AudioError::Rejected)?;
        osc.stop_with_when(t + 0.1).ok();

        if let Some((click, click_gain)) = Self::create_osc(ctx, 1800.0, OscillatorType::Square) {
            click_gain.gain().set_value_at_time(vol * 0.15, t).ok();
            click_gain
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.02)
                .ok();
            click.start().ok();
            click.stop_with_when(t + 0.03).ok();
        }
        Ok(())
    }

    /// Counter maxed - rising fanfare
    fn play_celebrate(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            let delay = i as f64 * 0.12;
            let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Triangle) else {
                return Err(AudioError::Unavailable);
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.45)
                .ok();
            osc.start_with_when(t).map_err(|_| AudioError::Rejected)?;
            osc.stop_with_when(t + 0.5).ok();
        }
        Ok(())
    }
}

impl AudioSink for WebAudioSink {
    fn probe(&mut self) -> Result<(), AudioError> {
        let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

        // Resume must be called from the gesture; the promise is not awaited
        if ctx.state() != AudioContextState::Running {
            ctx.resume().map_err(|_| AudioError::Rejected)?;
        }

        // Start and stop a silent blip so iOS treats the context as user-activated
        let (osc, gain) =
            Self::create_osc(ctx, 440.0, OscillatorType::Sine).ok_or(AudioError::Unavailable)?;
        gain.gain().set_value(0.0);
        osc.start().map_err(|_| AudioError::Rejected)?;
        osc.stop().ok();
        Ok(())
    }

    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Ok(());
        }

        let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Hit => Self::play_hit(ctx, vol),
            SoundEffect::Celebrate => Self::play_celebrate(ctx, vol),
        }
    }
}
