//! Shape primitives owned by entities
//!
//! Both shapes are plain mutable values: entities move them in place every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_RADIUS;

/// A circle in field space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius: radius.max(0.0),
        }
    }

    pub fn at(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    #[inline]
    pub fn set_position(&mut self, center: Vec2) {
        self.center = center;
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Grow (or shrink, for negative `delta`), never dropping below `MIN_RADIUS`
    pub fn grow(&mut self, delta: f32) {
        self.radius = clamp_radius(self.radius + delta);
    }

    #[inline]
    pub fn distance_to(&self, other: &Circle) -> f32 {
        self.center.distance(other.center)
    }

    /// True when the circle lies entirely outside the `width` x `height` field
    pub fn is_outside_field(&self, width: f32, height: f32) -> bool {
        self.center.x + self.radius < 0.0
            || self.center.x - self.radius > width
            || self.center.y + self.radius < 0.0
            || self.center.y - self.radius > height
    }
}

/// Clamp a driven radius so it never reaches zero
#[inline]
pub fn clamp_radius(radius: f32) -> f32 {
    if radius <= 0.0 { MIN_RADIUS } else { radius }
}

/// A line segment with mutable endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            start: Vec2::new(x1, y1),
            end: Vec2::new(x2, y2),
        }
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.end.x - self.start.x == 0.0
    }

    /// Slope and y-intercept of the infinite line through the segment
    ///
    /// `None` for vertical segments.
    pub fn slope_intercept(&self) -> Option<(f32, f32)> {
        if self.is_vertical() {
            return None;
        }
        let m = (self.end.y - self.start.y) / (self.end.x - self.start.x);
        Some((m, self.start.y - m * self.start.x))
    }
}
