//! Audio unlock gate
//!
//! Mobile browsers only honor programmatic playback after a sound has been
//! started inside a user gesture, and they can silently revoke that after the
//! page is backgrounded. The gate tracks that permission window:
//!
//! ```text
//! Locked --try_unlock--> Unlocking --probe launched--> Unlocked
//! Unlocked --hidden/pagehide/blur/focus--> Stale --try_unlock--> Unlocked
//! ```
//!
//! Every call into the [`AudioSink`] is fire-and-forget. Failures are logged
//! and dropped; gameplay never waits on or reacts to them.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

use std::fmt;

use crate::platform::LifecycleSignal;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bean hits the oni
    Hit,
    /// Counter reached the maximum
    Celebrate,
}

/// Why a sink could not start a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioError {
    /// No audio device/context available
    Unavailable,
    /// The platform refused to start playback
    Rejected,
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio output unavailable"),
            AudioError::Rejected => write!(f, "playback rejected by platform"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Audio backend
///
/// Both calls must return promptly; anything asynchronous is launched and
/// left to finish on its own.
pub trait AudioSink {
    /// Start and immediately stop a sound so the platform unlocks playback.
    /// Called from inside a user gesture.
    fn probe(&mut self) -> Result<(), AudioError>;

    /// Start a sound effect
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError>;
}

/// Sink that never makes a sound
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn probe(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, _effect: SoundEffect) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Playback permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioGateState {
    /// No gesture has unlocked audio yet
    #[default]
    Locked,
    /// Probe is being launched
    Unlocking,
    /// Playback should be audible
    Unlocked,
    /// Page was backgrounded; the next gesture must re-unlock
    Stale,
}

/// What happened to a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Gate unlocked, sound requested
    Audible,
    /// Gate stale, sound requested but may stay silent
    BestEffort,
    /// Gate locked or unlocking, nothing requested
    Suppressed,
}

/// Tracks whether playback is currently permitted
#[derive(Debug, Clone, Default)]
pub struct AudioUnlockGate {
    state: AudioGateState,
}

impl AudioUnlockGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AudioGateState {
        self.state
    }

    /// Re-arm playback from inside a user gesture
    ///
    /// No-op when already unlocked. Otherwise probes the sink once and counts
    /// as unlocked whatever the probe reports; a failed probe only means the
    /// next gesture gets another chance.
    pub fn try_unlock(&mut self, sink: &mut dyn AudioSink) {
        if self.state == AudioGateState::Unlocked {
            return;
        }
        self.state = AudioGateState::Unlocking;
        if let Err(e) = sink.probe() {
            log::debug!("Audio unlock probe failed: {e}");
        }
        self.state = AudioGateState::Unlocked;
    }

    /// The permission window may have closed
    pub fn mark_stale(&mut self) {
        match self.state {
            AudioGateState::Unlocked | AudioGateState::Unlocking => {
                self.state = AudioGateState::Stale;
            }
            AudioGateState::Locked | AudioGateState::Stale => {}
        }
    }

    /// Apply a page lifecycle signal
    pub fn on_lifecycle(&mut self, signal: LifecycleSignal) {
        if signal.invalidates_audio() {
            self.mark_stale();
        }
    }

    /// Request a sound. Never blocks, never fails.
    pub fn play(&mut self, sink: &mut dyn AudioSink, effect: SoundEffect) -> PlayOutcome {
        let outcome = match self.state {
            AudioGateState::Locked | AudioGateState::Unlocking => return PlayOutcome::Suppressed,
            AudioGateState::Unlocked => PlayOutcome::Audible,
            AudioGateState::Stale => PlayOutcome::BestEffort,
        };
        if let Err(e) = sink.play(effect) {
            log::debug!("Sound {effect:?} failed: {e}");
        }
        outcome
    }
}
