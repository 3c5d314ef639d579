//! Game settings
//!
//! Read once at startup and never written back: the page may embed a JSON
//! block and the URL may override the main switches.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::game::{HitPolicy, PlacementMode};

/// Device class presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceClass {
    Low,
    #[default]
    Medium,
    High,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Low => "Low",
            DeviceClass::Medium => "Medium",
            DeviceClass::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(DeviceClass::Low),
            "medium" | "med" => Some(DeviceClass::Medium),
            "high" => Some(DeviceClass::High),
            _ => None,
        }
    }

    /// Beans alive at once
    pub fn pool_capacity(&self) -> usize {
        match self {
            DeviceClass::Low => 6,
            DeviceClass::Medium => POOL_CAPACITY,
            DeviceClass::High => 12,
        }
    }

    /// Time between shots while holding (ms)
    pub fn fire_interval_ms(&self) -> f64 {
        match self {
            DeviceClass::Low => 140.0,
            DeviceClass::Medium => FIRE_INTERVAL_MS,
            DeviceClass::High => 90.0,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Device class preset the rates below came from
    pub device: DeviceClass,

    // === Rules ===
    /// Fixed oni or tap-to-place
    pub placement: PlacementMode,
    /// When beans are checked against the oni
    pub hit_policy: HitPolicy,
    /// Counter maximum
    pub hit_max: u64,

    // === Firing ===
    pub fire_interval_ms: f64,
    pub pool_capacity: usize,
    pub flight_ms: f64,

    // === Feedback ===
    /// Chance (0.0 - 1.0) a hit shows an exclamation
    pub hit_text_probability: f32,
    /// Hit sound on every n-th hit
    pub sound_divider: u32,

    // === Audio ===
    /// Volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: DeviceClass::Medium,

            placement: PlacementMode::PlayerPlaced,
            hit_policy: HitPolicy::OnSpawn,
            hit_max: HIT_MAX,

            fire_interval_ms: FIRE_INTERVAL_MS,
            pool_capacity: POOL_CAPACITY,
            flight_ms: FLIGHT_MS,

            hit_text_probability: HIT_TEXT_PROBABILITY,
            sound_divider: 1,

            volume: SOUND_VOLUME,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings from a device preset
    pub fn from_preset(device: DeviceClass) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(device);
        settings
    }

    /// Apply a device preset (updates rate-dependent settings)
    pub fn apply_preset(&mut self, device: DeviceClass) {
        self.device = device;
        self.pool_capacity = device.pool_capacity();
        self.fire_interval_ms = device.fire_interval_ms();
    }

    /// Copy with every value pulled into a usable range
    pub fn validated(&self) -> Self {
        let mut s = self.clone();
        s.pool_capacity = s.pool_capacity.clamp(1, MAX_POOL_CAPACITY);
        if !s.fire_interval_ms.is_finite() || s.fire_interval_ms < 16.0 {
            s.fire_interval_ms = FIRE_INTERVAL_MS;
        }
        if !s.flight_ms.is_finite() || s.flight_ms < 0.0 {
            s.flight_ms = FLIGHT_MS;
        }
        s.hit_max = s.hit_max.max(1);
        s.hit_text_probability = if s.hit_text_probability.is_nan() {
            HIT_TEXT_PROBABILITY
        } else {
            s.hit_text_probability.clamp(0.0, 1.0)
        };
        s.sound_divider = s.sound_divider.max(1);
        s.volume = if s.volume.is_nan() { SOUND_VOLUME } else { s.volume.clamp(0.0, 1.0) };
        s
    }

    /// Parse a JSON settings block; missing fields take defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {e}");
                None
            }
        }
    }

    /// Apply `?device=high&mode=fixed&policy=landing&muted=1` style overrides
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "device" => {
                    if let Some(device) = DeviceClass::from_str(value) {
                        self.apply_preset(device);
                    }
                }
                "mode" => {
                    if let Some(mode) = PlacementMode::from_str(value) {
                        self.placement = mode;
                    }
                }
                "policy" => {
                    if let Some(policy) = HitPolicy::from_str(value) {
                        self.hit_policy = policy;
                    }
                }
                "muted" | "mute" => self.muted = !matches!(value, "0" | "false"),
                _ => log::debug!("Unknown settings key {key:?}"),
            }
        }
    }

    /// Element holding an optional JSON settings block
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "mamemaki-settings";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let document = window.as_ref().and_then(|w| w.document());

        let mut settings = document
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content())
            .and_then(|json| Self::from_json(&json))
            .unwrap_or_default();

        if let Some(search) = window.and_then(|w| w.location().search().ok()) {
            settings.apply_query(&search);
        }

        log::info!("Using {} device settings", settings.device.as_str());
        settings.validated()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
