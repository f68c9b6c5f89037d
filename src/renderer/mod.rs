//! Rendering boundary
//!
//! The simulation emits draw calls through the `Renderer` trait. `VertexBatch`
//! tessellates them into a triangle list that `RenderState` uploads to the GPU.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Straight RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Fill or outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    Filled,
    /// Outline width in pixels
    Outline(f32),
}

/// Destination of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Drawn directly
    Field,
    /// Cleared each frame, composited translucently after the entity pass
    Overlay,
}

/// Draw-call sink consumed by the simulation
pub trait Renderer {
    /// Clear the frame and the overlay layer
    fn begin_frame(&mut self);
    fn draw_circle(&mut self, layer: Layer, center: Vec2, radius: f32, color: Color, stroke: Stroke);
    fn draw_line(&mut self, layer: Layer, from: Vec2, to: Vec2, color: Color, width: f32);
    /// Fill everything outside the circle
    fn fill_outside_circle(&mut self, layer: Layer, center: Vec2, radius: f32, color: Color);
    /// Blend the overlay layer onto the frame at `alpha`
    fn composite_overlay(&mut self, alpha: f32);
    /// Translucent full-field fill
    fn fill_overlay(&mut self, color: Color, alpha: f32);
    fn present_frame(&mut self);
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const AVATAR: Color = [1.0, 1.0, 1.0, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    /// Pending beams and zones (light slate grey)
    pub const TELEGRAPH: Color = [119.0 / 255.0, 136.0 / 255.0, 153.0 / 255.0, 1.0];
    pub const DEATH: Color = [1.0, 0.0, 0.0, 1.0];
    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
}

/// Tessellating renderer
///
/// Accumulates one frame of triangles; `present_frame` publishes it.
#[derive(Debug, Default)]
pub struct VertexBatch {
    field: Vec<Vertex>,
    overlay: Vec<Vertex>,
    presented: Vec<Vertex>,
    frames: u64,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangles of the last presented frame
    pub fn vertices(&self) -> &[Vertex] {
        &self.presented
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn layer(&mut self, layer: Layer) -> &mut Vec<Vertex> {
        match layer {
            Layer::Field => &mut self.field,
            Layer::Overlay => &mut self.overlay,
        }
    }
}

impl Renderer for VertexBatch {
    fn begin_frame(&mut self) {
        self.field.clear();
        self.overlay.clear();
    }

    fn draw_circle(&mut self, layer: Layer, center: Vec2, radius: f32, color: Color, stroke: Stroke) {
        let out = self.layer(layer);
        match stroke {
            Stroke::Filled => shapes::circle(out, center, radius, color),
            Stroke::Outline(width) => shapes::circle_outline(out, center, radius, width, color),
        }
    }

    fn draw_line(&mut self, layer: Layer, from: Vec2, to: Vec2, color: Color, width: f32) {
        shapes::line(self.layer(layer), from, to, width, color);
    }

    fn fill_outside_circle(&mut self, layer: Layer, center: Vec2, radius: f32, color: Color) {
        // Far enough to cover the field from any centre on it
        let reach = 2.0 * Vec2::new(FIELD_WIDTH, FIELD_HEIGHT).length();
        shapes::outside_circle(self.layer(layer), center, radius, reach, color);
    }

    fn composite_overlay(&mut self, alpha: f32) {
        self.field
            .extend(self.overlay.drain(..).map(|v| v.faded(alpha)));
    }

    fn fill_overlay(&mut self, color: Color, alpha: f32) {
        let mut color = color;
        color[3] *= alpha;
        shapes::rect(
            &mut self.field,
            Vec2::ZERO,
            Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            color,
        );
    }

    fn present_frame(&mut self) {
        std::mem::swap(&mut self.presented, &mut self.field);
        self.field.clear();
        self.frames += 1;
    }
}
