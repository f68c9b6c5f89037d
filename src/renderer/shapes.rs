//! Triangle tessellation for 2D primitives
//!
//! Every function appends triangle-list vertices in field pixels.

use glam::Vec2;
use std::f32::consts::TAU;

use super::Color;
use super::vertex::Vertex;

/// Segment count that keeps edges smooth at `radius`
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.5) as u32).clamp(12, 128)
}

#[inline]
fn rim(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = i as f32 / segments as f32 * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

#[inline]
fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color) {
    // a-b-c and c-b-d
    for p in [a, b, c, c, b, d] {
        out.push(Vertex::new(p.x, p.y, color));
    }
}

/// Filled disk as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color) {
    let segments = segments_for(radius);
    out.reserve((segments * 3) as usize);
    for i in 0..segments {
        let p1 = rim(center, radius, i, segments);
        let p2 = rim(center, radius, i + 1, segments);
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(p1.x, p1.y, color));
        out.push(Vertex::new(p2.x, p2.y, color));
    }
}

/// Annulus between `inner` and `outer`
pub fn ring(out: &mut Vec<Vertex>, center: Vec2, inner: f32, outer: f32, color: Color) {
    let segments = segments_for(outer);
    out.reserve((segments * 6) as usize);
    for i in 0..segments {
        quad(
            out,
            rim(center, inner, i, segments),
            rim(center, outer, i, segments),
            rim(center, inner, i + 1, segments),
            rim(center, outer, i + 1, segments),
            color,
        );
    }
}

/// Outline of width `width` centred on the circle's edge
pub fn circle_outline(out: &mut Vec<Vertex>, center: Vec2, radius: f32, width: f32, color: Color) {
    let half = width * 0.5;
    ring(out, center, (radius - half).max(0.0), radius + half, color);
}

/// Thick line between two points
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: Color) {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    quad(out, a + perp, a - perp, b + perp, b - perp, color);
}

/// Axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: Color) {
    quad(
        out,
        min,
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        max,
        color,
    );
}

/// Everything outside the circle, out to `reach` from its centre
pub fn outside_circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, reach: f32, color: Color) {
    ring(out, center, radius, reach.max(radius), color);
}
