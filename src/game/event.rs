//! Observable effects for the view layer

use glam::Vec2;

use super::geom::Rect;
use super::pool::ProjectileHandle;
use super::target::TargetMood;

/// Something the view should show
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Oni appeared (or was ready from the start)
    TargetPlaced { rect: Rect },
    /// Bean thrown; draw it via `Session::bean_pose` until it lands
    Spawned {
        handle: ProjectileHandle,
        origin: Vec2,
        destination: Vec2,
    },
    /// Bean animation cut short because its slot was reused
    Cancelled { handle: ProjectileHandle },
    /// Bean finished its flight; hide it
    Landed { handle: ProjectileHandle },
    /// Bean hit the oni
    Hit { handle: ProjectileHandle },
    /// New counter value, with a short emphasis pop
    CounterChanged { value: u64 },
    /// Counter hit the maximum. Emitted once per session.
    ReachedMax,
    /// Show an exclamation centered at `pos`
    PopupShown {
        id: u32,
        text: &'static str,
        pos: Vec2,
    },
    PopupExpired { id: u32 },
    MoodChanged(TargetMood),
}
