//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - Rendering and audio only through the boundary traits

pub mod avatar;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod hazard;
pub mod palette;
pub mod patterns;
pub mod projectile;
pub mod scheduler;
pub mod tick;
pub mod world;

pub use avatar::{Avatar, HitOutcome, Intents};
pub use collision::{circles_overlap, find_collision, line_circle, resolve_collisions};
pub use entity::{Entity, EntityId, EntityKind, Fate, TickContext};
pub use geometry::{Circle, Segment};
pub use hazard::{BurstPhase, Hazard, HazardShape};
pub use palette::Palette;
pub use patterns::{Pattern, initial_schedule, schedule_from};
pub use projectile::{Bounce, Homing, Orbit, Path, Projectile, Sine};
pub use scheduler::{Scheduler, Trigger};
pub use tick::{Session, SessionPhase, TickOutcome};
pub use world::{PatternCounters, World};
