//! Session context
//!
//! One `Session` holds every piece of mutable game state for a page visit.
//! The platform layer feeds it contacts, lifecycle signals and frame ticks,
//! then drains the resulting events into the view.

use glam::Vec2;

use super::event::GameEvent;
use super::feedback::{FeedbackConfig, FeedbackPresenter, HitCounter};
use super::fire::{Contact, FireController, Shot};
use super::pool::{BeanPose, ProjectileHandle};
use super::target::Target;
use crate::audio::{AudioGateState, AudioSink, AudioUnlockGate};
use crate::launch_point;
use crate::platform::LifecycleSignal;
use crate::settings::Settings;

/// Events queued between two drains, sized for a frame with a burst of hits
const EVENT_QUEUE_CAPACITY: usize = 64;

pub struct Session<A: AudioSink> {
    viewport: Vec2,
    target: Target,
    fire: FireController,
    feedback: FeedbackPresenter,
    gate: AudioUnlockGate,
    audio: A,
    events: Vec<GameEvent>,
}

impl<A: AudioSink> Session<A> {
    pub fn new(settings: &Settings, viewport: Vec2, audio: A, seed: u64) -> Self {
        let settings = settings.validated();
        let target = Target::new(settings.placement, viewport);
        let fire = FireController::new(
            settings.fire_interval_ms,
            settings.flight_ms,
            settings.pool_capacity,
            settings.hit_policy,
        );
        let feedback = FeedbackPresenter::new(
            FeedbackConfig {
                hit_max: settings.hit_max,
                hit_text_probability: settings.hit_text_probability,
                sound_divider: settings.sound_divider,
            },
            seed,
        );

        let mut events = Vec::with_capacity(EVENT_QUEUE_CAPACITY);
        if let Some(rect) = target.rect() {
            events.push(GameEvent::TargetPlaced { rect });
        }

        log::info!(
            "Session started: {} mode, {} beans every {} ms, hits on {}",
            settings.placement.as_str(),
            settings.pool_capacity,
            settings.fire_interval_ms,
            settings.hit_policy.as_str(),
        );

        Self {
            viewport,
            target,
            fire,
            feedback,
            gate: AudioUnlockGate::new(),
            audio,
            events,
        }
    }

    /// Feed one contact from the input adapter
    pub fn handle_contact(&mut self, contact: Contact, now: f64) {
        if let Contact::Start(point) = contact {
            // Every gesture is a chance to re-arm audio
            self.gate.try_unlock(&mut self.audio);

            if !self.target.is_placed() {
                if self.target.place_at(point) {
                    log::info!("Oni placed at ({:.0}, {:.0})", point.x, point.y);
                    if let Some(rect) = self.target.rect() {
                        self.events.push(GameEvent::TargetPlaced { rect });
                    }
                }
                return;
            }
        }

        let launch = launch_point(self.viewport);
        if let Some(shot) = self.fire.on_contact(contact, now, &self.target, launch) {
            self.on_shot(shot, now);
        }
    }

    /// Page visibility/focus changed
    pub fn handle_lifecycle(&mut self, signal: LifecycleSignal) {
        self.gate.on_lifecycle(signal);
        // The release may never arrive once the page is gone
        if signal.interrupts_contact() {
            self.fire.stop();
        }
    }

    /// Advance one frame
    pub fn tick(&mut self, now: f64) {
        let launch = launch_point(self.viewport);
        if let Some(shot) = self.fire.tick(now, &self.target, launch) {
            self.on_shot(shot, now);
        }

        let events = &mut self.events;
        let mut landed_hits = 0;
        self.fire.land_due(now, &self.target, |landing| {
            events.push(GameEvent::Landed {
                handle: landing.handle,
            });
            if landing.hit {
                events.push(GameEvent::Hit {
                    handle: landing.handle,
                });
                landed_hits += 1;
            }
        });
        for _ in 0..landed_hits {
            self.present_hit(now);
        }

        self.feedback
            .tick(now, &mut self.target, &mut self.events);
    }

    fn on_shot(&mut self, shot: Shot, now: f64) {
        if let Some(handle) = shot.cancelled {
            self.events.push(GameEvent::Cancelled { handle });
        }
        self.events.push(GameEvent::Spawned {
            handle: shot.handle,
            origin: shot.origin,
            destination: shot.destination,
        });
        if shot.hit {
            self.events.push(GameEvent::Hit {
                handle: shot.handle,
            });
            self.present_hit(now);
        }
    }

    fn present_hit(&mut self, now: f64) {
        self.feedback.on_hit(
            now,
            &mut self.target,
            &mut self.gate,
            &mut self.audio,
            &mut self.events,
        );
    }

    /// Viewport changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.target.resize(self.viewport);
        if let Some(rect) = self.target.rect() {
            self.events.push(GameEvent::TargetPlaced { rect });
        }
    }

    /// Take everything queued since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Where to draw a bean this frame; `None` once it landed or was reclaimed
    pub fn bean_pose(&self, handle: ProjectileHandle, now: f64) -> Option<BeanPose> {
        self.fire.pool().pose_at(handle, now, self.fire.flight_ms())
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn fire(&self) -> &FireController {
        &self.fire
    }

    pub fn counter(&self) -> &HitCounter {
        self.feedback.counter()
    }

    pub fn gate_state(&self) -> AudioGateState {
        self.gate.state()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}
