//! Hold-to-fire control loop
//!
//! `Idle -> Firing -> Idle`. Pressing fires one bean at once; holding fires
//! another every `interval_ms`, always at the most recent aim point. The
//! per-frame tick re-checks the state before it spawns, so a release takes
//! effect no later than the next frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::hit_test;
use super::pool::{Acquired, ProjectileHandle, ProjectilePool};
use super::target::Target;

/// Contact stream produced by the input adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Start(Vec2),
    Move(Vec2),
    End,
    Cancel,
}

/// When a thrown bean is checked against the oni. Fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitPolicy {
    /// Test the aim point as the bean leaves (lowest perceived latency)
    #[default]
    OnSpawn,
    /// Test the aim point when the flight animation finishes
    OnLanding,
}

impl HitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitPolicy::OnSpawn => "spawn",
            HitPolicy::OnLanding => "landing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spawn" | "immediate" => Some(HitPolicy::OnSpawn),
            "landing" | "land" => Some(HitPolicy::OnLanding),
            _ => None,
        }
    }
}

/// Fire loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireState {
    Idle,
    Firing,
}

/// Bookkeeping for one press-and-hold
#[derive(Debug, Clone, Copy)]
pub struct FireSession {
    pub last_spawn_at: f64,
    pub aim: Vec2,
}

/// A bean that just left the launcher
#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub handle: ProjectileHandle,
    /// Earlier bean whose slot this shot took over mid-flight
    pub cancelled: Option<ProjectileHandle>,
    pub origin: Vec2,
    pub destination: Vec2,
    /// Always false under [`HitPolicy::OnLanding`]
    pub hit: bool,
}

/// A bean that finished its flight
#[derive(Debug, Clone, Copy)]
pub struct Landing {
    pub handle: ProjectileHandle,
    pub destination: Vec2,
    /// Always false under [`HitPolicy::OnSpawn`]
    pub hit: bool,
}

/// Continuous fire controller. Owns the bean pool.
#[derive(Debug, Clone)]
pub struct FireController {
    session: Option<FireSession>,
    interval_ms: f64,
    flight_ms: f64,
    policy: HitPolicy,
    pool: ProjectilePool,
}

impl FireController {
    pub fn new(interval_ms: f64, flight_ms: f64, pool_capacity: usize, policy: HitPolicy) -> Self {
        Self {
            session: None,
            interval_ms,
            flight_ms,
            policy,
            pool: ProjectilePool::new(pool_capacity),
        }
    }

    pub fn state(&self) -> FireState {
        if self.session.is_some() {
            FireState::Firing
        } else {
            FireState::Idle
        }
    }

    pub fn is_firing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&FireSession> {
        self.session.as_ref()
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn flight_ms(&self) -> f64 {
        self.flight_ms
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    /// Feed one contact event
    ///
    /// Returns the immediate shot when this contact starts a fire session.
    pub fn on_contact(
        &mut self,
        contact: Contact,
        now: f64,
        target: &Target,
        launch: Vec2,
    ) -> Option<Shot> {
        match contact {
            Contact::Start(point) => self.start(point, now, target, launch),
            Contact::Move(point) => {
                if let Some(session) = self.session.as_mut() {
                    session.aim = point;
                }
                None
            }
            Contact::End | Contact::Cancel => {
                self.stop();
                None
            }
        }
    }

    fn start(&mut self, point: Vec2, now: f64, target: &Target, launch: Vec2) -> Option<Shot> {
        if self.session.is_some() {
            return None;
        }
        if !target.is_placed() || !target.accepts_fire_at(point) {
            return None;
        }
        self.session = Some(FireSession {
            last_spawn_at: now,
            aim: point,
        });
        log::debug!("Firing started at ({:.0}, {:.0})", point.x, point.y);
        Some(self.spawn(point, now, target, launch))
    }

    /// Leave the firing state. Beans already thrown keep flying.
    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Firing stopped");
        }
    }

    /// Per-frame scheduling check; spawns at most one bean
    pub fn tick(&mut self, now: f64, target: &Target, launch: Vec2) -> Option<Shot> {
        let session = self.session.as_mut()?;
        if now - session.last_spawn_at < self.interval_ms {
            return None;
        }
        session.last_spawn_at = now;
        let aim = session.aim;
        Some(self.spawn(aim, now, target, launch))
    }

    fn spawn(&mut self, aim: Vec2, now: f64, target: &Target, launch: Vec2) -> Shot {
        let Acquired { handle, cancelled } = self.pool.acquire(launch, aim, now);
        let hit = self.policy == HitPolicy::OnSpawn
            && target.rect().is_some_and(|rect| hit_test(aim, &rect));
        Shot {
            handle,
            cancelled,
            origin: launch,
            destination: aim,
            hit,
        }
    }

    /// Complete due flights, oldest first, handing each landing to `on_land`
    ///
    /// Runs whether or not the controller is firing.
    pub fn land_due(&mut self, now: f64, target: &Target, mut on_land: impl FnMut(Landing)) {
        let rect = match self.policy {
            HitPolicy::OnLanding => target.rect(),
            HitPolicy::OnSpawn => None,
        };
        self.pool.land_due(now, self.flight_ms, |bean| {
            on_land(Landing {
                handle: bean.handle(),
                destination: bean.destination,
                hit: rect.is_some_and(|r| hit_test(bean.destination, &r)),
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::target::PlacementMode;

    const VIEWPORT: Vec2 = Vec2::new(400.0, 800.0);
    const LAUNCH: Vec2 = Vec2::new(200.0, 736.0);

    fn fixed_target() -> Target {
        Target::new(PlacementMode::Fixed, VIEWPORT)
    }

    fn controller(interval: f64) -> FireController {
        FireController::new(interval, 200.0, 6, HitPolicy::OnSpawn)
    }

    /// Run a press at t=0 and the given ticks; collect spawn times
    fn spawn_times(ctl: &mut FireController, target: &Target, ticks: &[f64]) -> Vec<f64> {
        let mut times = Vec::new();
        let aim = target.rect().unwrap().center();
        if ctl.on_contact(Contact::Start(aim), 0.0, target, LAUNCH).is_some() {
            times.push(0.0);
        }
        for &t in ticks {
            if ctl.tick(t, target, LAUNCH).is_some() {
                times.push(t);
            }
        }
        times
    }

    #[test]
    fn test_cadence_scenario() {
        let target = fixed_target();
        let mut ctl = controller(100.0);
        let times = spawn_times(&mut ctl, &target, &[40.0, 100.0, 145.0, 210.0]);
        assert_eq!(times, vec![0.0, 100.0, 210.0]);
    }

    #[test]
    fn test_double_start_is_noop() {
        let target = fixed_target();
        let aim = target.rect().unwrap().center();
        let ticks = [30.0, 100.0, 130.0, 200.0, 260.0, 333.0];

        let mut single = controller(100.0);
        let expected = spawn_times(&mut single, &target, &ticks);

        let mut double = controller(100.0);
        assert!(double.on_contact(Contact::Start(aim), 0.0, &target, LAUNCH).is_some());
        assert!(double.on_contact(Contact::Start(aim), 0.0, &target, LAUNCH).is_none());
        let mut times = vec![0.0];
        for &t in &ticks {
            if double.tick(t, &target, LAUNCH).is_some() {
                times.push(t);
            }
        }
        assert_eq!(times, expected);
        assert_eq!(single.pool().spawned(), double.pool().spawned());
    }

    #[test]
    fn test_second_start_later_does_not_reset_baseline() {
        let target = fixed_target();
        let aim = target.rect().unwrap().center();
        let mut ctl = controller(100.0);
        ctl.on_contact(Contact::Start(aim), 0.0, &target, LAUNCH);
        assert!(ctl.on_contact(Contact::Start(aim), 50.0, &target, LAUNCH).is_none());
        assert_eq!(ctl.session().unwrap().last_spawn_at, 0.0);
        assert!(ctl.tick(100.0, &target, LAUNCH).is_some());
    }

    #[test]
    fn test_stop_prevents_spawns() {
        let target = fixed_target();
        let mut ctl = controller(100.0);
        let aim = target.rect().unwrap().center();
        ctl.on_contact(Contact::Start(aim), 0.0, &target, LAUNCH);
        ctl.on_contact(Contact::End, 50.0, &target, LAUNCH);
        assert_eq!(ctl.state(), FireState::Idle);
        // A tick that was already scheduled still runs, but must not spawn
        assert!(ctl.tick(120.0, &target, LAUNCH).is_none());
        assert!(ctl.tick(1000.0, &target, LAUNCH).is_none());
        assert_eq!(ctl.pool().spawned(), 1);
        // The bean in the air is unaffected
        assert_eq!(ctl.pool().in_flight_count(), 1);
    }

    #[test]
    fn test_cancel_stops_like_end() {
        let target = fixed_target();
        let mut ctl = controller(100.0);
        ctl.on_contact(Contact::Start(Vec2::new(10.0, 10.0)), 0.0, &target, LAUNCH);
        ctl.on_contact(Contact::Cancel, 10.0, &target, LAUNCH);
        assert!(!ctl.is_firing());
    }

    #[test]
    fn test_move_updates_aim_for_next_spawn() {
        let target = fixed_target();
        let mut ctl = controller(100.0);
        let first = ctl
            .on_contact(Contact::Start(Vec2::new(10.0, 10.0)), 0.0, &target, LAUNCH)
            .unwrap();
        assert_eq!(first.destination, Vec2::new(10.0, 10.0));
        assert!(!first.hit);

        let center = target.rect().unwrap().center();
        ctl.on_contact(Contact::Move(Vec2::new(50.0, 50.0)), 20.0, &target, LAUNCH);
        ctl.on_contact(Contact::Move(center), 90.0, &target, LAUNCH);
        let second = ctl.tick(100.0, &target, LAUNCH).unwrap();
        assert_eq!(second.destination, center);
        assert!(second.hit);
        assert_eq!(second.origin, LAUNCH);
    }

    #[test]
    fn test_move_while_idle_ignored() {
        let target = fixed_target();
        let mut ctl = controller(100.0);
        ctl.on_contact(Contact::Move(Vec2::new(50.0, 50.0)), 0.0, &target, LAUNCH);
        assert!(ctl.session().is_none());
    }

    #[test]
    fn test_late_tick_spawns_once() {
        let target = fixed_target();
        let mut ctl = controller(100.0);
        spawn_times(&mut ctl, &target, &[]);
        // Frame stalled for several intervals: one catch-up shot, no burst
        assert!(ctl.tick(550.0, &target, LAUNCH).is_some());
        assert!(ctl.tick(560.0, &target, LAUNCH).is_none());
        assert_eq!(ctl.pool().spawned(), 2);
    }

    #[test]
    fn test_player_placed_requires_contact_on_target() {
        let mut target = Target::new(PlacementMode::PlayerPlaced, VIEWPORT);
        let mut ctl = controller(100.0);

        // Not placed yet
        assert!(ctl
            .on_contact(Contact::Start(Vec2::new(100.0, 300.0)), 0.0, &target, LAUNCH)
            .is_none());

        target.place_at(Vec2::new(100.0, 300.0));
        assert!(ctl
            .on_contact(Contact::Start(Vec2::new(390.0, 790.0)), 10.0, &target, LAUNCH)
            .is_none());
        assert!(!ctl.is_firing());

        assert!(ctl
            .on_contact(Contact::Start(Vec2::new(100.0, 300.0)), 20.0, &target, LAUNCH)
            .is_some());
        assert!(ctl.is_firing());
    }

    #[test]
    fn test_on_landing_policy_defers_hit() {
        let target = fixed_target();
        let mut ctl = FireController::new(100.0, 200.0, 6, HitPolicy::OnLanding);
        let aim = target.rect().unwrap().center();
        let shot = ctl
            .on_contact(Contact::Start(aim), 0.0, &target, LAUNCH)
            .unwrap();
        assert!(!shot.hit);
        ctl.on_contact(Contact::End, 10.0, &target, LAUNCH);

        let mut landings = Vec::new();
        ctl.land_due(150.0, &target, |l| landings.push(l));
        assert!(landings.is_empty());

        // Landing after the release still counts
        ctl.land_due(200.0, &target, |l| landings.push(l));
        assert_eq!(landings.len(), 1);
        assert!(landings[0].hit);
        assert_eq!(landings[0].handle, shot.handle);
    }

    #[test]
    fn test_on_spawn_policy_landings_never_hit() {
        let target = fixed_target();
        let mut ctl = controller(100.0);
        let aim = target.rect().unwrap().center();
        ctl.on_contact(Contact::Start(aim), 0.0, &target, LAUNCH);
        let mut landings = Vec::new();
        ctl.land_due(500.0, &target, |l| landings.push(l));
        assert_eq!(landings.len(), 1);
        assert!(!landings[0].hit);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(HitPolicy::from_str("Landing"), Some(HitPolicy::OnLanding));
        assert_eq!(HitPolicy::from_str("immediate"), Some(HitPolicy::OnSpawn));
        assert_eq!(HitPolicy::from_str("later"), None);
    }
}
