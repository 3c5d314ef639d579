//! Game module
//!
//! Everything that decides what happens on screen lives here. Like a
//! simulation module it is free of platform dependencies:
//! - Time is passed in (ms, same clock as `requestAnimationFrame`)
//! - Randomness comes from a seeded RNG
//! - Effects come out as a `GameEvent` queue

pub mod event;
pub mod feedback;
pub mod fire;
pub mod geom;
pub mod pool;
pub mod session;
pub mod target;

pub use event::GameEvent;
pub use feedback::{CounterChange, FeedbackConfig, FeedbackPresenter, HitCounter, format_count};
pub use fire::{Contact, FireController, FireSession, FireState, HitPolicy, Landing, Shot};
pub use geom::{Rect, hit_test};
pub use pool::{Acquired, BeanPose, Projectile, ProjectileHandle, ProjectilePool};
pub use session::Session;
pub use target::{PlacementMode, Target, TargetMood};
