//! Bean pool
//!
//! A fixed ring of reusable projectile slots. Slots are handed out strictly
//! round-robin; when the ring wraps, the oldest bean is reclaimed even if it
//! is still flying and its animation is cancelled. Nothing is allocated after
//! construction.

use glam::Vec2;

use crate::consts::BEAN_END_SCALE;
use crate::ease_out;

/// Reference to one occupancy of a pool slot
///
/// Reacquiring the slot bumps its generation, which makes older handles stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileHandle {
    pub slot: usize,
    pub generation: u32,
}

/// A pooled bean
#[derive(Debug, Clone)]
pub struct Projectile {
    pub slot_index: usize,
    pub origin: Vec2,
    pub destination: Vec2,
    /// Spawn timestamp (ms)
    pub spawn_time: f64,
    pub in_flight: bool,
    generation: u32,
    /// Spawn sequence number, for landing in spawn order
    seq: u64,
}

impl Projectile {
    fn empty(slot_index: usize) -> Self {
        Self {
            slot_index,
            origin: Vec2::ZERO,
            destination: Vec2::ZERO,
            spawn_time: 0.0,
            in_flight: false,
            generation: 0,
            seq: 0,
        }
    }

    pub fn handle(&self) -> ProjectileHandle {
        ProjectileHandle {
            slot: self.slot_index,
            generation: self.generation,
        }
    }
}

/// Decorative bean placement for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeanPose {
    pub pos: Vec2,
    pub scale: f32,
}

/// Result of [`ProjectilePool::acquire`]
#[derive(Debug, Clone, Copy)]
pub struct Acquired {
    pub handle: ProjectileHandle,
    /// Previous occupant, if it was still in flight and got cut short
    pub cancelled: Option<ProjectileHandle>,
}

/// Fixed-capacity ring of projectiles
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
    next: usize,
    spawned: u64,
}

impl ProjectilePool {
    /// Create a pool. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: (0..capacity).map(Projectile::empty).collect(),
            next: 0,
            spawned: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total acquisitions so far
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Take the next slot and launch a bean from it
    pub fn acquire(&mut self, origin: Vec2, destination: Vec2, now: f64) -> Acquired {
        let slot = self.next;
        self.next = (self.next + 1) % self.slots.len();
        self.spawned += 1;

        let bean = &mut self.slots[slot];
        let cancelled = bean.in_flight.then(|| bean.handle());

        bean.generation = bean.generation.wrapping_add(1);
        bean.origin = origin;
        bean.destination = destination;
        bean.spawn_time = now;
        bean.in_flight = true;
        bean.seq = self.spawned;

        Acquired {
            handle: bean.handle(),
            cancelled,
        }
    }

    /// Look up a bean; `None` if the handle's slot has since been reacquired
    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.slots
            .get(handle.slot)
            .filter(|p| p.generation == handle.generation)
    }

    /// Beans currently flying
    pub fn in_flight(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|p| p.in_flight)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight().count()
    }

    /// Where a bean should be drawn at `now`
    pub fn pose_at(&self, handle: ProjectileHandle, now: f64, flight_ms: f64) -> Option<BeanPose> {
        let bean = self.get(handle).filter(|p| p.in_flight)?;
        let t = if flight_ms > 0.0 {
            ((now - bean.spawn_time) / flight_ms) as f32
        } else {
            1.0
        };
        let eased = ease_out(t);
        Some(BeanPose {
            pos: bean.origin.lerp(bean.destination, eased),
            scale: 1.0 + (BEAN_END_SCALE - 1.0) * eased,
        })
    }

    /// Finish every flight that is due, oldest first
    ///
    /// `on_land` sees each landed bean once, in spawn order.
    pub fn land_due(&mut self, now: f64, flight_ms: f64, mut on_land: impl FnMut(&Projectile)) {
        // Walk the ring starting at the oldest slot so landings keep spawn order
        let len = self.slots.len();
        for i in 0..len {
            let bean = &mut self.slots[(self.next + i) % len];
            if bean.in_flight && now - bean.spawn_time >= flight_ms {
                bean.in_flight = false;
                on_land(bean);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn launch(pool: &mut ProjectilePool, now: f64) -> Acquired {
        pool.acquire(Vec2::new(200.0, 700.0), Vec2::new(200.0, 300.0), now)
    }

    #[test]
    fn test_capacity_one_reuses_slot() {
        let mut pool = ProjectilePool::new(1);
        let first = launch(&mut pool, 0.0);
        let second = launch(&mut pool, 10.0);

        assert_eq!(first.handle.slot, 0);
        assert_eq!(second.handle.slot, 0);
        // The first bean was still flying and got cut short
        assert_eq!(second.cancelled, Some(first.handle));
        // Its handle no longer resolves
        assert!(pool.get(first.handle).is_none());
        assert!(pool.get(second.handle).is_some());
    }

    #[test]
    fn test_zero_capacity_bumped() {
        let pool = ProjectilePool::new(0);
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn test_landed_slot_not_reported_cancelled() {
        let mut pool = ProjectilePool::new(1);
        launch(&mut pool, 0.0);
        let mut landed = 0;
        pool.land_due(250.0, 200.0, |_| landed += 1);
        assert_eq!(landed, 1);

        let next = launch(&mut pool, 260.0);
        assert!(next.cancelled.is_none());
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut pool = ProjectilePool::new(6);
        for i in 0..20 {
            launch(&mut pool, i as f64);
        }
        assert_eq!(pool.in_flight_count(), 6);
        assert_eq!(pool.spawned(), 20);
    }

    #[test]
    fn test_land_due_in_spawn_order() {
        let mut pool = ProjectilePool::new(3);
        // Wrap once so the oldest bean sits in slot 1
        for t in [0.0, 10.0, 20.0, 30.0] {
            launch(&mut pool, t);
        }
        let mut order = Vec::new();
        pool.land_due(1000.0, 200.0, |p| order.push(p.spawn_time));
        assert_eq!(order, vec![10.0, 20.0, 30.0]);
        assert_eq!(pool.in_flight_count(), 0);
    }

    #[test]
    fn test_land_due_waits_for_flight() {
        let mut pool = ProjectilePool::new(4);
        launch(&mut pool, 0.0);
        launch(&mut pool, 100.0);
        let mut landed = Vec::new();
        pool.land_due(200.0, 200.0, |p| landed.push(p.handle()));
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].slot, 0);
        assert_eq!(pool.in_flight_count(), 1);
    }

    #[test]
    fn test_pose_interpolates() {
        let mut pool = ProjectilePool::new(2);
        let a = pool.acquire(Vec2::new(0.0, 100.0), Vec2::new(0.0, 0.0), 0.0);

        let start = pool.pose_at(a.handle, 0.0, 200.0).unwrap();
        assert_eq!(start.pos, Vec2::new(0.0, 100.0));
        assert_eq!(start.scale, 1.0);

        let mid = pool.pose_at(a.handle, 100.0, 200.0).unwrap();
        // Ease-out is past halfway at the halfway time
        assert!(mid.pos.y < 50.0 && mid.pos.y > 0.0);

        let end = pool.pose_at(a.handle, 200.0, 200.0).unwrap();
        assert!(end.pos.y.abs() < 1e-4);
        assert!((end.scale - BEAN_END_SCALE).abs() < 1e-6);

        pool.land_due(200.0, 200.0, |_| {});
        assert!(pool.pose_at(a.handle, 210.0, 200.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_round_robin(capacity in 1usize..16, n in 0usize..100) {
            let mut pool = ProjectilePool::new(capacity);
            for i in 0..n {
                let acquired = launch(&mut pool, i as f64 * 50.0);
                prop_assert_eq!(acquired.handle.slot, i % capacity);
                // Landing some beans early must not disturb the order
                if i % 3 == 0 {
                    pool.land_due(f64::MAX, 0.0, |_| {});
                }
            }
            prop_assert!(pool.in_flight_count() <= capacity);
        }
    }
}
