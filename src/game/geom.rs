//! Screen-space rectangles and the hit test
//!
//! All coordinates are CSS pixels with the origin at the top-left of the
//! viewport and y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Strict containment test
///
/// A point exactly on any edge is a miss.
#[inline]
pub fn hit_test(point: Vec2, rect: &Rect) -> bool {
    rect.left() < point.x
        && point.x < rect.right()
        && rect.top() < point.y
        && point.y < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_center_is_inside() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(hit_test(rect.center(), &rect));
    }

    #[test]
    fn test_edges_miss() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(!hit_test(Vec2::new(10.0, 40.0), &rect));
        assert!(!hit_test(Vec2::new(110.0, 40.0), &rect));
        assert!(!hit_test(Vec2::new(50.0, 20.0), &rect));
        assert!(!hit_test(Vec2::new(50.0, 70.0), &rect));
        // Corners
        assert!(!hit_test(Vec2::new(10.0, 20.0), &rect));
        assert!(!hit_test(Vec2::new(110.0, 70.0), &rect));
    }

    #[test]
    fn test_from_center() {
        let rect = Rect::from_center(Vec2::new(100.0, 100.0), Vec2::new(40.0, 20.0));
        assert_eq!(rect, Rect::new(80.0, 90.0, 40.0, 20.0));
        assert_eq!(rect.center(), Vec2::new(100.0, 100.0));
    }

    proptest! {
        #[test]
        fn prop_hit_test_matches_strict_bounds(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 0.0f32..300.0,
            h in 0.0f32..300.0,
            px in -600.0f32..600.0,
            py in -600.0f32..600.0,
        ) {
            let rect = Rect::new(x, y, w, h);
            let p = Vec2::new(px, py);
            let expected = rect.left() < p.x && p.x < rect.right()
                && rect.top() < p.y && p.y < rect.bottom();
            prop_assert_eq!(hit_test(p, &rect), expected);
        }

        #[test]
        fn prop_boundary_points_miss(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 1.0f32..300.0,
            h in 1.0f32..300.0,
            t in 0.0f32..=1.0,
        ) {
            let rect = Rect::new(x, y, w, h);
            let along_x = rect.left() + w * t;
            let along_y = rect.top() + h * t;
            prop_assert!(!hit_test(Vec2::new(rect.left(), along_y), &rect));
            prop_assert!(!hit_test(Vec2::new(rect.right(), along_y), &rect));
            prop_assert!(!hit_test(Vec2::new(along_x, rect.top()), &rect));
            prop_assert!(!hit_test(Vec2::new(along_x, rect.bottom()), &rect));
        }
    }
}
