//! Aeternus - a scripted bullet-pattern dodging game
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, trigger scheduling, patterns)
//! - `renderer`: Draw-call boundary, vertex batching and the WebGPU presenter
//! - `audio`: Music playback boundary
//! - `input`: Discrete press/release actions
//! - `clock`: Fixed-rate frame pacing
//! - `settings`: Player configuration

pub mod audio;
pub mod clock;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (pixels, origin top-left, +y down)
    pub const FIELD_WIDTH: f32 = 1000.0;
    pub const FIELD_HEIGHT: f32 = 900.0;

    /// Target tick rate of the game loop
    pub const TARGET_TPS: u32 = 60;

    /// Speeds in the pattern script are authored as "pixels per tick at 60 Hz"
    pub const PX_PER_TICK: f32 = TARGET_TPS as f32;

    /// Avatar defaults
    pub const AVATAR_RADIUS: f32 = 6.0;
    pub const AVATAR_SPEED: f32 = 5.0 * PX_PER_TICK;
    /// Invincibility window after a hit (seconds)
    pub const INVINCIBILITY_TIME: f32 = 1.0;
    /// Visibility toggles once per blink period while invincible
    pub const BLINK_TIME: f32 = 0.1;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    pub const PROJECTILE_SPEED: f32 = 1.0 * PX_PER_TICK;

    /// Smallest radius a growing/shrinking shape may reach
    pub const MIN_RADIUS: f32 = 0.01;

    /// Default stroke width for beams and ring zones
    pub const BEAM_WIDTH: f32 = 2.0;

    /// Overlay translucency (death flash, filled zones)
    pub const OVERLAY_ALPHA: f32 = 100.0 / 255.0;
}

/// Field centre point
#[inline]
pub fn field_center() -> Vec2 {
    Vec2::new(consts::FIELD_WIDTH / 2.0, consts::FIELD_HEIGHT / 2.0)
}

/// Unit vector pointing along `theta` (radians, +y down)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Point at distance `r` from `center` along `theta`
#[inline]
pub fn polar_offset(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + direction_from_angle(theta) * r
}

/// Unit direction from `from` toward `to`, same as aiming with `atan2`
///
/// Coincident points aim along +x.
#[inline]
pub fn aim(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    direction_from_angle(d.y.atan2(d.x))
}
