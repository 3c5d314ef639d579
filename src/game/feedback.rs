//! Hit feedback: sound, exclamations, oni flinch, counter

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::event::GameEvent;
use super::target::{Target, TargetMood};
use crate::audio::{AudioSink, AudioUnlockGate, SoundEffect};
use crate::consts::*;

/// Saturating hit counter with a one-shot congratulations flag
#[derive(Debug, Clone)]
pub struct HitCounter {
    count: u64,
    max: u64,
    congratulated: bool,
}

/// Result of registering a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterChange {
    /// Counter went up; `reached_max` is true exactly once per session
    Incremented { value: u64, reached_max: bool },
    /// Already at the maximum
    Saturated,
}

impl HitCounter {
    pub fn new(max: u64) -> Self {
        Self {
            count: 0,
            max,
            congratulated: false,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn congratulated(&self) -> bool {
        self.congratulated
    }

    pub fn register(&mut self) -> CounterChange {
        if self.count >= self.max {
            return CounterChange::Saturated;
        }
        self.count += 1;
        let reached_max = self.count == self.max && !self.congratulated;
        if reached_max {
            self.congratulated = true;
        }
        CounterChange::Incremented {
            value: self.count,
            reached_max,
        }
    }
}

/// An exclamation currently on screen
#[derive(Debug, Clone, Copy)]
struct Popup {
    id: u32,
    expires_at: f64,
}

/// Tunables for [`FeedbackPresenter`]
#[derive(Debug, Clone, Copy)]
pub struct FeedbackConfig {
    pub hit_max: u64,
    pub hit_text_probability: f32,
    /// Play the hit sound on every n-th hit (1 = every hit)
    pub sound_divider: u32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            hit_max: HIT_MAX,
            hit_text_probability: HIT_TEXT_PROBABILITY,
            sound_divider: 1,
        }
    }
}

/// Turns confirmed hits into sound, text, flinch and counter events
#[derive(Debug, Clone)]
pub struct FeedbackPresenter {
    counter: HitCounter,
    config: FeedbackConfig,
    rng: Pcg32,
    hurt_until: Option<f64>,
    popups: Vec<Popup>,
    next_popup_id: u32,
    hits_seen: u64,
}

impl FeedbackPresenter {
    pub fn new(config: FeedbackConfig, seed: u64) -> Self {
        Self {
            counter: HitCounter::new(config.hit_max),
            config,
            rng: Pcg32::seed_from_u64(seed),
            hurt_until: None,
            // A popup lives 500 ms; this covers any sane fire rate
            popups: Vec::with_capacity(16),
            next_popup_id: 1,
            hits_seen: 0,
        }
    }

    pub fn counter(&self) -> &HitCounter {
        &self.counter
    }

    pub fn active_popups(&self) -> usize {
        self.popups.len()
    }

    /// React to one confirmed hit
    pub fn on_hit(
        &mut self,
        now: f64,
        target: &mut Target,
        gate: &mut AudioUnlockGate,
        sink: &mut dyn AudioSink,
        events: &mut Vec<GameEvent>,
    ) {
        let divider = u64::from(self.config.sound_divider.max(1));
        if self.hits_seen % divider == 0 {
            gate.play(sink, SoundEffect::Hit);
        }
        self.hits_seen += 1;

        self.maybe_show_text(now, target, events);

        if target.mood != TargetMood::Hurt {
            target.mood = TargetMood::Hurt;
            events.push(GameEvent::MoodChanged(TargetMood::Hurt));
        }
        self.hurt_until = Some(now + HURT_DWELL_MS);

        if let CounterChange::Incremented { value, reached_max } = self.counter.register() {
            events.push(GameEvent::CounterChanged { value });
            if reached_max {
                log::info!("Reached {value} hits!");
                events.push(GameEvent::ReachedMax);
                gate.play(sink, SoundEffect::Celebrate);
            }
        }
    }

    fn maybe_show_text(&mut self, now: f64, target: &Target, events: &mut Vec<GameEvent>) {
        if self.rng.random::<f32>() >= self.config.hit_text_probability {
            return;
        }
        let Some(rect) = target.rect() else { return };
        let text = HIT_WORDS[self.rng.random_range(0..HIT_WORDS.len())];
        let pos = Vec2::new(rect.x + rect.w / 2.0, rect.y + rect.h * HIT_TEXT_Y_FRAC);

        let id = self.next_popup_id;
        self.next_popup_id = self.next_popup_id.wrapping_add(1);
        self.popups.push(Popup {
            id,
            expires_at: now + HIT_TEXT_MS,
        });
        events.push(GameEvent::PopupShown { id, text, pos });
    }

    /// Expire the flinch and any exclamations that are done
    pub fn tick(&mut self, now: f64, target: &mut Target, events: &mut Vec<GameEvent>) {
        if let Some(until) = self.hurt_until {
            if now >= until {
                self.hurt_until = None;
                target.mood = TargetMood::Idle;
                events.push(GameEvent::MoodChanged(TargetMood::Idle));
            }
        }

        self.popups.retain(|p| {
            if now >= p.expires_at {
                events.push(GameEvent::PopupExpired { id: p.id });
                false
            } else {
                true
            }
        });
    }
}

/// Format the counter with `,` thousands grouping
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
