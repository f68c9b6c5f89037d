//! Entities in the live registry
//!
//! Every entity owns one body circle plus variant state. Being in the
//! registry is what makes an entity alive; there is no dead flag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::avatar::{Avatar, HitOutcome};
use super::geometry::Circle;
use super::hazard::{BurstPhase, Hazard, HazardShape};
use super::projectile::Projectile;
use crate::renderer::{Color, Layer, Renderer, Stroke, colors};

/// Stable entity identifier (allocation order)
pub type EntityId = u32;

/// Whether an entity stays in the registry after an update or hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Keep,
    Retire,
}

/// Per-tick read-only inputs shared by every entity update
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Field size (pixels)
    pub field: Vec2,
    /// Live avatar position, the target for homing behaviour
    pub target: Option<Vec2>,
}

/// Variant state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Avatar(Avatar),
    Projectile(Projectile),
    Hazard(Hazard),
}

/// A live entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub body: Circle,
    pub visible: bool,
    pub stroke_width: f32,
    /// Time spent in the registry (seconds)
    pub age: f32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, body: Circle, kind: EntityKind) -> Self {
        Self {
            id,
            body,
            visible: true,
            stroke_width: 0.0,
            age: 0.0,
            kind,
        }
    }

    pub fn as_avatar(&self) -> Option<&Avatar> {
        match &self.kind {
            EntityKind::Avatar(avatar) => Some(avatar),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hazard(&self) -> Option<&Hazard> {
        match &self.kind {
            EntityKind::Hazard(h) => Some(h),
            _ => None,
        }
    }

    /// Advance kinematics and timers; `Fate::Retire` when the entity expired
    pub fn update(&mut self, dt: f32, ctx: &TickContext) -> Fate {
        self.age += dt;
        match &mut self.kind {
            EntityKind::Avatar(avatar) => {
                avatar.update(dt, &mut self.body, &mut self.visible, ctx.field);
                Fate::Keep
            }
            EntityKind::Projectile(p) => p.update(dt, &mut self.body, ctx),
            EntityKind::Hazard(h) => h.update(dt, &mut self.body),
        }
    }

    /// React to being hit
    pub fn on_collision(&mut self) -> Fate {
        match &mut self.kind {
            EntityKind::Avatar(avatar) => match avatar.take_hit() {
                HitOutcome::Killed => {
                    log::info!("avatar destroyed");
                    Fate::Retire
                }
                HitOutcome::Wounded { health_left } => {
                    log::info!("avatar hit, {} health left", health_left);
                    Fate::Keep
                }
                HitOutcome::Ignored => Fate::Keep,
            },
            EntityKind::Projectile(_) => Fate::Retire,
            // Area hazards stay put
            EntityKind::Hazard(_) => Fate::Keep,
        }
    }

    /// Emit draw calls for the current state
    pub fn draw(&self, renderer: &mut dyn Renderer, hazard_color: Color) {
        let body = &self.body;
        match &self.kind {
            EntityKind::Avatar(_) => {
                renderer.draw_circle(Layer::Field, body.center, body.radius, colors::AVATAR, Stroke::Filled)
            }
            EntityKind::Projectile(_) => {
                renderer.draw_circle(Layer::Field, body.center, body.radius, hazard_color, Stroke::Filled)
            }
            EntityKind::Hazard(h) => {
                let color = match h.phase {
                    BurstPhase::Pending => colors::TELEGRAPH,
                    BurstPhase::Active => hazard_color,
                };
                match &h.shape {
                    HazardShape::Beam(seg) | HazardShape::MovingBeam { segment: seg, .. } => {
                        renderer.draw_line(Layer::Field, seg.start, seg.end, color, self.stroke_width)
                    }
                    HazardShape::Zone { damage_within: true, .. } => {
                        renderer.draw_circle(Layer::Overlay, body.center, body.radius, color, Stroke::Filled)
                    }
                    HazardShape::Zone { damage_within: false, .. } => renderer.draw_circle(
                        Layer::Field,
                        body.center,
                        body.radius,
                        color,
                        Stroke::Outline(self.stroke_width),
                    ),
                    HazardShape::InvertedZone { .. } => {
                        renderer.fill_outside_circle(Layer::Overlay, body.center, body.radius, color)
                    }
                }
            }
        }
    }
}
