//! Beams and zones: telegraphed area hazards
//!
//! Every hazard runs the same burst state machine:
//! `Pending` (telegraph, harmless) -> `Active` (hazardous) -> `Pending` again
//! while bursts remain, otherwise retired.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Fate;
use super::geometry::{Circle, Segment};

/// Burst phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstPhase {
    /// Waiting out the delay, drawn as a telegraph
    Pending,
    /// Holding, collides with the avatar
    Active,
}

/// Hazard geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardShape {
    /// Line hazard, evaluated as the infinite line through the segment
    Beam(Segment),
    /// Line hazard translating at a fixed velocity (pixels/sec)
    MovingBeam { segment: Segment, velocity: Vec2 },
    /// Disk (`damage_within`) or thin ring hazard on the entity's circle
    Zone { damage_within: bool, growth: f32 },
    /// Everything outside the entity's circle is hazardous
    InvertedZone { growth: f32 },
}

impl HazardShape {
    pub fn is_zone(&self) -> bool {
        matches!(self, Self::Zone { .. } | Self::InvertedZone { .. })
    }

    pub fn segment(&self) -> Option<&Segment> {
        match self {
            Self::Beam(segment) | Self::MovingBeam { segment, .. } => Some(segment),
            _ => None,
        }
    }
}

/// A telegraphed hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub shape: HazardShape,
    pub phase: BurstPhase,
    /// Telegraph duration before each burst (seconds)
    pub delay: f32,
    /// Active duration of each burst (seconds)
    pub lifespan: f32,
    pub bursts_remaining: u32,
    /// Time since creation or since the last burst ended
    pub elapsed: f32,
}

impl Hazard {
    pub fn new(shape: HazardShape, delay: f32, lifespan: f32) -> Self {
        Self {
            shape,
            phase: BurstPhase::Pending,
            delay,
            lifespan,
            bursts_remaining: 1,
            elapsed: 0.0,
        }
    }

    pub fn beam(segment: Segment, delay: f32, lifespan: f32) -> Self {
        Self::new(HazardShape::Beam(segment), delay, lifespan)
    }

    pub fn with_bursts(mut self, bursts: u32) -> Self {
        self.bursts_remaining = bursts.max(1);
        self
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == BurstPhase::Active
    }

    /// Advance the burst state machine and shape motion
    pub fn update(&mut self, dt: f32, body: &mut Circle) -> Fate {
        self.elapsed += dt;

        if self.phase == BurstPhase::Pending && self.elapsed >= self.delay {
            self.phase = BurstPhase::Active;
        }

        let mut fate = Fate::Keep;
        if self.phase == BurstPhase::Active && self.elapsed >= self.delay + self.lifespan {
            self.phase = BurstPhase::Pending;
            self.bursts_remaining = self.bursts_remaining.saturating_sub(1);
            if self.bursts_remaining == 0 {
                fate = Fate::Retire;
            } else {
                self.elapsed = 0.0;
            }
        }

        match &mut self.shape {
            HazardShape::Beam(_) => {}
            HazardShape::MovingBeam { segment, velocity } => segment.translate(*velocity * dt),
            HazardShape::Zone { growth, .. } | HazardShape::InvertedZone { growth } => {
                body.grow(*growth * dt)
            }
        }

        fate
    }

    /// Does this hazard hit `probe`? Always false while pending.
    pub fn intersects(&self, body: &Circle, probe: &Circle) -> bool {
        if !self.is_active() {
            return false;
        }
        match &self.shape {
            HazardShape::Beam(segment) | HazardShape::MovingBeam { segment, .. } => {
                super::collision::line_circle(segment, probe)
            }
            HazardShape::Zone { damage_within, .. } => {
                super::collision::zone_circle(body, *damage_within, probe)
            }
            HazardShape::InvertedZone { .. } => super::collision::inverted_zone_circle(body, probe),
        }
    }

    /// Stop any radius growth
    pub fn freeze_growth(&mut self) {
        if let HazardShape::Zone { growth, .. } | HazardShape::InvertedZone { growth } = &mut self.shape {
            *growth = 0.0;
        }
    }
}
