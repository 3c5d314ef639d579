//! Mamemaki - hold-to-fire bean throwing at an oni
//!
//! Core modules:
//! - `game`: Tick-driven interaction loop (fire control, bean pool, hits, feedback)
//! - `audio`: Audio unlock gate and sound backends
//! - `platform`: Input and lifecycle signal translation
//! - `settings`: Startup configuration and device presets

pub mod audio;
pub mod game;
pub mod platform;
pub mod settings;

pub use audio::{AudioGateState, AudioSink, AudioUnlockGate, NullSink, SoundEffect};
pub use game::{Contact, GameEvent, Session};
pub use settings::{DeviceClass, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Minimum time between shots while holding (ms)
    pub const FIRE_INTERVAL_MS: f64 = 130.0;
    /// Beans alive at once
    pub const POOL_CAPACITY: usize = 6;
    /// Upper bound accepted for a configured pool
    pub const MAX_POOL_CAPACITY: usize = 32;
    /// Bean flight animation length (ms)
    pub const FLIGHT_MS: f64 = 200.0;

    /// Counter saturates here and triggers the congratulations state
    pub const HIT_MAX: u64 = 9_999_999;

    /// Oni stays hurt this long after the last hit (ms)
    pub const HURT_DWELL_MS: f64 = 140.0;
    /// Hit exclamation lifetime (ms)
    pub const HIT_TEXT_MS: f64 = 500.0;
    /// Chance that a hit shows an exclamation
    pub const HIT_TEXT_PROBABILITY: f32 = 0.4;
    /// Exclamations shown on hit
    pub const HIT_WORDS: [&str; 3] = ["いてっ", "ぐぁっ", "くっ"];
    /// Exclamation anchor, fraction of the oni height from its top edge
    pub const HIT_TEXT_Y_FRAC: f32 = 0.22;

    /// Beans launch from here, as a fraction of the viewport
    pub const LAUNCH_X_FRAC: f32 = 0.5;
    pub const LAUNCH_Y_FRAC: f32 = 0.92;
    /// Rendered bean size (px)
    pub const BEAN_SIZE: f32 = 34.0;
    /// Bean scale at the end of its flight
    pub const BEAN_END_SCALE: f32 = 0.9;

    /// Oni footprint (px)
    pub const TARGET_WIDTH: f32 = 160.0;
    pub const TARGET_HEIGHT: f32 = 200.0;
    /// Fixed-mode oni center, as a fraction of the viewport
    pub const FIXED_TARGET_X_FRAC: f32 = 0.5;
    pub const FIXED_TARGET_Y_FRAC: f32 = 0.45;

    /// Hit sound volume (0.0 - 1.0)
    pub const SOUND_VOLUME: f32 = 0.55;
}

/// Point at a fraction of the viewport
#[inline]
pub fn viewport_point(viewport: Vec2, x_frac: f32, y_frac: f32) -> Vec2 {
    Vec2::new(viewport.x * x_frac, viewport.y * y_frac)
}

/// Where beans are thrown from for a given viewport
#[inline]
pub fn launch_point(viewport: Vec2) -> Vec2 {
    viewport_point(viewport, consts::LAUNCH_X_FRAC, consts::LAUNCH_Y_FRAC)
}

/// Cubic ease-out on [0, 1]
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
