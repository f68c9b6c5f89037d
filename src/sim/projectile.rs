//! Projectile kinematics
//!
//! A projectile is a straight mover with optional behaviours attached:
//! - `Path`: replaces the straight heading every tick (orbiting, sinusoidal)
//! - `Homing`: steers toward the avatar before moving
//! - `Bounce`: reflects (or re-aims) on field-edge contact after moving
//!
//! Hooks run in that order every tick, so a homing bouncer is simply a
//! projectile with both behaviours attached.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Fate, TickContext};
use super::geometry::{Circle, clamp_radius};
use crate::consts::PROJECTILE_SPEED;
use crate::{aim, direction_from_angle};

/// Polar motion around a moving pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// Current polar angle (radians)
    pub theta: f32,
    /// Orbital radius (pixels)
    pub radius: f32,
    /// Orbital radius change (pixels/sec)
    pub growth: f32,
}

/// `y = amplitude * sin(frequency * (x - start_x))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sine {
    pub start_x: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

/// Heading source evaluated before homing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Path {
    Straight,
    Orbit(Orbit),
    Sine(Sine),
}

/// Steering toward the avatar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homing {
    /// < 0: track the target exactly; > 0: turn budget (1/sec); 0: straight
    pub rate: f32,
    /// Homing stops after this long; the projectile is kept alive until then
    pub duration: Option<f32>,
    pub elapsed: f32,
}

impl Homing {
    pub fn tracking() -> Self {
        Self {
            rate: -1.0,
            duration: None,
            elapsed: 0.0,
        }
    }

    pub fn turning(rate: f32) -> Self {
        Self {
            rate,
            duration: None,
            elapsed: 0.0,
        }
    }

    #[inline]
    fn active_window(&self) -> bool {
        matches!(self.duration, Some(d) if self.elapsed < d)
    }
}

/// Edge reflection budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounce {
    /// `None` bounces forever
    pub remaining: Option<u32>,
    /// Re-aim at the avatar instead of reflecting
    pub reaim: bool,
}

impl Bounce {
    pub fn times(n: u32) -> Self {
        Self {
            remaining: Some(n),
            reaim: false,
        }
    }

    pub fn forever() -> Self {
        Self {
            remaining: None,
            reaim: false,
        }
    }

    #[inline]
    fn can_bounce(&self) -> bool {
        self.remaining != Some(0)
    }

    fn spend(&mut self) {
        if let Some(n) = self.remaining.as_mut() {
            *n = n.saturating_sub(1);
        }
    }
}

/// A hazard bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Heading (unit length except on sinusoidal paths)
    pub dir: Vec2,
    /// Signed scalar speed (pixels/sec); negative flies backwards
    pub speed: f32,
    pub survives_offscreen: bool,
    pub path: Path,
    pub homing: Option<Homing>,
    pub bounce: Option<Bounce>,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            dir: Vec2::ZERO,
            speed: PROJECTILE_SPEED,
            survives_offscreen: false,
            path: Path::Straight,
            homing: None,
            bounce: None,
        }
    }
}

impl Projectile {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    pub fn with_homing(mut self, homing: Homing) -> Self {
        self.homing = Some(homing);
        self
    }

    pub fn with_bounce(mut self, bounce: Bounce) -> Self {
        self.bounce = Some(bounce);
        self
    }

    pub fn with_path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.dir * self.speed
    }

    pub fn set_angle(&mut self, theta: f32) {
        self.dir = direction_from_angle(theta);
    }

    /// Aim from `from` toward `target`
    pub fn set_target(&mut self, from: Vec2, target: Vec2) {
        self.dir = aim(from, target);
    }

    /// Drop an orbiting path, keeping the current heading
    pub fn stop_orbit(&mut self) {
        if matches!(self.path, Path::Orbit(_)) {
            self.path = Path::Straight;
        }
    }

    #[inline]
    pub fn is_orbiting(&self) -> bool {
        matches!(self.path, Path::Orbit(_))
    }

    /// Advance one tick; `Fate::Retire` once expired
    pub fn update(&mut self, dt: f32, body: &mut Circle, ctx: &TickContext) -> Fate {
        self.follow_path(dt, body);
        self.steer(dt, body, ctx);

        body.translate(self.velocity() * dt);

        if self.expired(body, ctx.field) {
            return Fate::Retire;
        }

        self.bounce(body, ctx);
        Fate::Keep
    }

    fn follow_path(&mut self, dt: f32, body: &Circle) {
        match &mut self.path {
            Path::Straight => {}
            Path::Orbit(orbit) => {
                orbit.radius = clamp_radius(orbit.radius + orbit.growth * dt);
                orbit.theta += self.speed / orbit.radius * dt;
                // Tangent to the polar path
                self.dir = Vec2::new(-orbit.theta.sin(), orbit.theta.cos());
            }
            Path::Sine(sine) => {
                // d/dx of A*sin(F*(x - x0))
                self.dir.y = sine.amplitude
                    * sine.frequency
                    * (sine.frequency * (body.center.x - sine.start_x)).cos();
            }
        }
    }

    fn steer(&mut self, dt: f32, body: &Circle, ctx: &TickContext) {
        let Some(homing) = self.homing.as_mut() else {
            return;
        };
        if let Some(duration) = homing.duration {
            homing.elapsed += dt;
            if homing.elapsed > duration {
                homing.rate = 0.0;
            }
        }
        let Some(target) = ctx.target else { return };

        if homing.rate < 0.0 {
            self.dir = aim(body.center, target);
        } else if homing.rate > 0.0 {
            let ahead = body.center + self.dir;
            let pull = aim(ahead, target) * homing.rate * dt;
            self.dir = aim(body.center, ahead + pull);
        }
    }

    fn expired(&self, body: &Circle, field: Vec2) -> bool {
        if let Path::Sine(_) = self.path {
            return body.center.x > field.x;
        }
        if self.homing.is_some_and(|h| h.active_window()) {
            return false;
        }
        !self.survives_offscreen && body.is_outside_field(field.x, field.y)
    }

    fn bounce(&mut self, body: &Circle, ctx: &TickContext) {
        let Some(mut bounce) = self.bounce else {
            return;
        };
        let (c, r, field) = (body.center, body.radius, ctx.field);

        let vel = self.velocity();
        if bounce.can_bounce() && ((c.x - r < 0.0 && vel.x < 0.0) || (c.x + r > field.x && vel.x > 0.0)) {
            bounce.spend();
            self.respond(true, bounce.reaim, body, ctx);
        }

        let vel = self.velocity();
        if bounce.can_bounce() && ((c.y - r < 0.0 && vel.y < 0.0) || (c.y + r > field.y && vel.y > 0.0)) {
            bounce.spend();
            self.respond(false, bounce.reaim, body, ctx);
        }

        self.bounce = Some(bounce);
    }

    fn respond(&mut self, horizontal: bool, reaim: bool, body: &Circle, ctx: &TickContext) {
        match ctx.target {
            Some(target) if reaim => self.set_target(body.center, target),
            _ if horizontal => self.dir.x = -self.dir.x,
            _ => self.dir.y = -self.dir.y,
        }
    }
}
