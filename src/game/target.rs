//! Oni placement and mood

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Rect, hit_test};
use crate::consts::*;
use crate::viewport_point;

/// How the oni gets onto the screen. Fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Pinned to a relative viewport position, ready immediately
    Fixed,
    /// Hidden until the first contact drops it there
    #[default]
    PlayerPlaced,
}

impl PlacementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementMode::Fixed => "fixed",
            PlacementMode::PlayerPlaced => "placed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Some(PlacementMode::Fixed),
            "placed" | "player" | "tap" => Some(PlacementMode::PlayerPlaced),
            _ => None,
        }
    }
}

/// Visual state of the oni
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetMood {
    #[default]
    Idle,
    Hurt,
}

impl TargetMood {
    /// CSS class used by the view
    pub fn as_class(&self) -> &'static str {
        match self {
            TargetMood::Idle => "idle",
            TargetMood::Hurt => "hurt",
        }
    }
}

/// The oni
#[derive(Debug, Clone)]
pub struct Target {
    mode: PlacementMode,
    /// Player-placed center (unused in fixed mode)
    center: Option<Vec2>,
    size: Vec2,
    viewport: Vec2,
    pub mood: TargetMood,
}

impl Target {
    pub fn new(mode: PlacementMode, viewport: Vec2) -> Self {
        Self {
            mode,
            center: None,
            size: Vec2::new(TARGET_WIDTH, TARGET_HEIGHT),
            viewport,
            mood: TargetMood::Idle,
        }
    }

    /// Whether the oni is on screen and can be fired at
    pub fn is_placed(&self) -> bool {
        match self.mode {
            PlacementMode::Fixed => true,
            PlacementMode::PlayerPlaced => self.center.is_some(),
        }
    }

    /// Drop the oni at a contact point
    ///
    /// Returns false (and changes nothing) if it is already placed or the
    /// mode is fixed.
    pub fn place_at(&mut self, point: Vec2) -> bool {
        if self.is_placed() {
            return false;
        }
        self.center = Some(point);
        true
    }

    /// Current screen rectangle, if placed
    pub fn rect(&self) -> Option<Rect> {
        let center = match self.mode {
            PlacementMode::Fixed => {
                viewport_point(self.viewport, FIXED_TARGET_X_FRAC, FIXED_TARGET_Y_FRAC)
            }
            PlacementMode::PlayerPlaced => self.center?,
        };
        Some(Rect::from_center(center, self.size))
    }

    /// Whether a contact at `point` should start firing
    ///
    /// Fixed mode fires from anywhere; player-placed mode only from on the oni.
    pub fn accepts_fire_at(&self, point: Vec2) -> bool {
        match self.mode {
            PlacementMode::Fixed => true,
            PlacementMode::PlayerPlaced => self.rect().is_some_and(|r| hit_test(point, &r)),
        }
    }

    /// Viewport changed (rotation, resize)
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(400.0, 800.0);

    #[test]
    fn test_fixed_is_ready_immediately() {
        let target = Target::new(PlacementMode::Fixed, VIEWPORT);
        assert!(target.is_placed());
        let rect = target.rect().unwrap();
        assert_eq!(rect.center(), Vec2::new(200.0, 360.0));
        // Any contact is a fire command
        assert!(target.accepts_fire_at(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_fixed_ignores_placement() {
        let mut target = Target::new(PlacementMode::Fixed, VIEWPORT);
        assert!(!target.place_at(Vec2::new(10.0, 10.0)));
        assert_eq!(target.rect().unwrap().center(), Vec2::new(200.0, 360.0));
    }

    #[test]
    fn test_player_placed_hidden_until_first_contact() {
        let mut target = Target::new(PlacementMode::PlayerPlaced, VIEWPORT);
        assert!(!target.is_placed());
        assert!(target.rect().is_none());
        assert!(!target.accepts_fire_at(Vec2::new(100.0, 100.0)));

        assert!(target.place_at(Vec2::new(100.0, 300.0)));
        assert!(target.is_placed());
        assert_eq!(target.rect().unwrap().center(), Vec2::new(100.0, 300.0));

        // Second placement is refused
        assert!(!target.place_at(Vec2::new(300.0, 300.0)));
        assert_eq!(target.rect().unwrap().center(), Vec2::new(100.0, 300.0));
    }

    #[test]
    fn test_player_placed_fires_only_on_target() {
        let mut target = Target::new(PlacementMode::PlayerPlaced, VIEWPORT);
        target.place_at(Vec2::new(100.0, 300.0));
        assert!(target.accepts_fire_at(Vec2::new(110.0, 320.0)));
        assert!(!target.accepts_fire_at(Vec2::new(350.0, 700.0)));
    }

    #[test]
    fn test_fixed_rect_follows_resize() {
        let mut target = Target::new(PlacementMode::Fixed, VIEWPORT);
        target.resize(Vec2::new(800.0, 400.0));
        assert_eq!(target.rect().unwrap().center(), Vec2::new(400.0, 180.0));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(PlacementMode::from_str("FIXED"), Some(PlacementMode::Fixed));
        assert_eq!(PlacementMode::from_str("tap"), Some(PlacementMode::PlayerPlaced));
        assert_eq!(PlacementMode::from_str("nope"), None);
    }
}
