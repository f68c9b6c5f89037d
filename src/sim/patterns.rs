//! Pattern generators and the scripted schedule
//!
//! Each `Pattern` spawns one configuration of hazards into the world. Speeds
//! are authored in pixels per 60 Hz tick and scaled by `PX_PER_TICK`; all
//! timings are seconds.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Segment};
use super::hazard::{Hazard, HazardShape};
use super::projectile::{Bounce, Homing, Orbit, Path, Projectile, Sine};
use super::scheduler::Trigger;
use super::world::World;
use crate::consts::*;
use crate::{aim, field_center, polar_offset};

/// Every pattern generator the script can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// 20 bouncers bursting outward from field centre
    BulletRing,
    /// One sinusoidal projectile crossing left to right, row advancing each call
    SineStream,
    /// Step the hazard palette
    CyclePalette,
    /// Five random horizontal-ish beams
    RandomBeams,
    /// A slow-turning homing projectile dropped from the top edge
    HomingRain,
    /// Pentagram of beams inside a ring zone
    Pentagram,
    /// A bouncer closing in on the avatar from a random bearing
    InwardBouncers,
    /// A random-slope beam through the avatar
    BeamThroughAvatar,
    /// Sliding grid of horizontal and vertical beams
    BeamGrid,
    /// Ring of orbiters spiralling out from centre
    OrbitRing,
    /// Redirect every projectile at field centre
    Converge,
    /// Five filled zones at random points
    FallingBombs,
    /// Slow projectiles from all four edges
    SlowHell,
    /// Slow ring burst from a random point
    SlowBurst,
    /// Ten shrinking ring zones; every projectile reverses away from the avatar
    RingCollapse,
    /// Homing projectiles released on a spiral around the avatar
    SpiralHoming,
    /// Orbiter ring that widens with every call
    ExpandingOrbitRing,
    /// Pentagrams of increasing size and shrinking duration
    PentagramCascade,
    /// Fire every orbiter away from the avatar and remember its x
    PrecisionBlast,
    /// Falling projectiles and sliding beams flanking the remembered x
    PrecisionCorridor,
    /// Homing bouncers bursting from centre
    HomingBouncers,
}

impl Pattern {
    /// Spawn this pattern into `world`
    pub fn run(self, world: &mut World) {
        log::trace!("running pattern {:?}", self);
        match self {
            Self::BulletRing => bullet_ring(world),
            Self::SineStream => sine_stream(world),
            Self::CyclePalette => world.palette.step(),
            Self::RandomBeams => random_beams(world),
            Self::HomingRain => homing_rain(world),
            Self::Pentagram => {
                pentagram(world, Circle::at(field_center(), 450.0), 0.2);
            }
            Self::InwardBouncers => inward_bouncers(world),
            Self::BeamThroughAvatar => beam_through_avatar(world),
            Self::BeamGrid => beam_grid(world),
            Self::OrbitRing => orbit_ring(world),
            Self::Converge => converge(world),
            Self::FallingBombs => falling_bombs(world),
            Self::SlowHell => slow_hell(world),
            Self::SlowBurst => slow_burst(world),
            Self::RingCollapse => ring_collapse(world),
            Self::SpiralHoming => spiral_homing(world),
            Self::ExpandingOrbitRing => expanding_orbit_ring(world),
            Self::PentagramCascade => pentagram_cascade(world),
            Self::PrecisionBlast => precision_blast(world),
            Self::PrecisionCorridor => precision_corridor(world),
            Self::HomingBouncers => homing_bouncers(world),
        }
    }
}

fn ms(millis: f32) -> f32 {
    millis / 1000.0
}

/// The song's attack script, in registration order
pub fn initial_schedule() -> Vec<Trigger> {
    use Pattern::*;
    vec![
        Trigger::every(0.0, BulletRing).until(ms(1.0)),
        Trigger::every(ms(112.5), SineStream).until(ms(7425.0)),
        Trigger::every(ms(60.0), CyclePalette),
        Trigger::every(ms(900.0), RandomBeams).until(ms(8100.0)),
        Trigger::every(ms(200.0), HomingRain).starting_at(ms(4000.0)).until(ms(8000.0)),
        Trigger::every(ms(8600.0), Pentagram).until(ms(8600.0)),
        Trigger::every(ms(50.0), InwardBouncers).starting_at(ms(9050.0)).until(ms(12800.0)),
        Trigger::every(ms(9050.0), BulletRing).until(ms(9050.0)),
        Trigger::every(ms(100.0), BeamThroughAvatar).starting_at(ms(9050.0)).until(ms(12600.0)),
        Trigger::every(ms(475.0), BeamGrid).starting_at(ms(12600.0)).until(ms(18000.0)),
        Trigger::every(ms(200.0), OrbitRing).starting_at(ms(12500.0)).until(ms(18000.0)),
        Trigger::every(ms(18000.0), Converge).until(ms(18100.0)),
        Trigger::every(ms(2500.0), BulletRing).starting_at(ms(19000.0)).until(ms(26000.0)),
        Trigger::every(ms(500.0), FallingBombs).starting_at(ms(19000.0)).until(ms(26000.0)),
        Trigger::every(ms(25.0), SlowHell).starting_at(ms(26000.0)).until(ms(35000.0)),
        Trigger::every(ms(1000.0), SlowBurst).starting_at(ms(26000.0)).until(ms(35000.0)),
        Trigger::every(ms(36000.0), RingCollapse).until(ms(36100.0)),
        Trigger::every(ms(100.0), SpiralHoming).starting_at(ms(36000.0)).until(ms(40000.0)),
        Trigger::every(ms(125.0), ExpandingOrbitRing).starting_at(ms(40000.0)).until(ms(44000.0)),
        Trigger::every(ms(500.0), PentagramCascade).starting_at(ms(40000.0)).until(ms(44000.0)),
        Trigger::every(ms(44000.0), PrecisionBlast).until(ms(44100.0)),
        Trigger::every(ms(50.0), PrecisionCorridor).starting_at(ms(44000.0)).until(ms(50000.0)),
    ]
}

/// `initial_schedule` rebased to start `offset` seconds into the song
pub fn schedule_from(offset: f32) -> Vec<Trigger> {
    initial_schedule()
        .into_iter()
        .filter_map(|t| t.shifted(offset))
        .collect()
}

/// Evenly spaced points on `circle`, starting at angle 0
fn ring_points(circle: Circle, count: u32) -> impl Iterator<Item = (f32, Vec2)> {
    (0..count).map(move |i| {
        let theta = TAU / count as f32 * i as f32;
        (theta, polar_offset(circle.center, circle.radius, theta))
    })
}

fn random_unit(world: &mut World) -> f32 {
    world.rng.random::<f32>()
}

fn beam(world: &mut World, segment: Segment, delay: f32, lifespan: f32) {
    world.spawn_hazard(
        Hazard::beam(segment, delay, lifespan),
        Circle::at(segment.start, 0.0),
    );
}

fn bullet_ring(world: &mut World) {
    let center = field_center();
    for (_, at) in ring_points(Circle::at(center, 100.0), 20) {
        let mut p = Projectile::new(7.5 * PX_PER_TICK).with_bounce(Bounce::times(2));
        p.set_target(at, center);
        p.dir = -p.dir;
        world.spawn_projectile(p, at);
    }
}

fn sine_stream(world: &mut World) {
    let row = world.counters.sine_row % 11;
    world.counters.sine_row += 1;

    let at = Vec2::new(0.0, FIELD_HEIGHT / 10.0 * row as f32);
    let mut p = Projectile::new(10.0 * PX_PER_TICK).with_path(Path::Sine(Sine {
        start_x: at.x,
        amplitude: 50.0,
        frequency: 0.01,
    }));
    p.set_target(at, Vec2::new(FIELD_WIDTH, at.y));
    world.spawn_projectile(p, at);
}

fn random_beams(world: &mut World) {
    // Nothing but the avatar on the field yet
    if world.len() <= 1 {
        return;
    }
    for _ in 0..5 {
        let y1 = FIELD_HEIGHT * random_unit(world);
        let y2 = FIELD_HEIGHT * random_unit(world);
        beam(world, Segment::new(0.0, y1, FIELD_WIDTH, y2), 0.5, 0.075);
    }
}

fn homing_rain(world: &mut World) {
    let at = Vec2::new(random_unit(world) * FIELD_WIDTH, 0.0);
    let p = Projectile::new(7.5 * PX_PER_TICK).with_homing(Homing::turning(0.01 * PX_PER_TICK));
    world.spawn_projectile(p, at);
}

/// Five-pointed star of beams inscribed in a ring zone on `circle`
fn pentagram(world: &mut World, circle: Circle, lifespan: f32) {
    const DELAY: f32 = 0.45;
    const WIDTH: f32 = 10.0;
    let step = TAU / 5.0;
    let offset = -PI / 10.0;

    for i in 1..=5 {
        let from = polar_offset(circle.center, circle.radius, step * i as f32 + offset);
        let to = polar_offset(circle.center, circle.radius, step * (i + 2) as f32 + offset);
        let segment = Segment::new(from.x, from.y, to.x, to.y);
        world.spawn_hazard_stroked(
            Hazard::beam(segment, DELAY, lifespan),
            Circle::at(from, 0.0),
            WIDTH,
        );
    }

    let ring = Hazard::new(
        HazardShape::Zone {
            damage_within: false,
            growth: 0.0,
        },
        DELAY,
        lifespan,
    );
    world.spawn_hazard_stroked(ring, circle, WIDTH);
}

fn inward_bouncers(world: &mut World) {
    let target = world.target_or_center();
    let theta = random_unit(world) * TAU;
    let at = polar_offset(target, 600.0, theta);
    let mut p = Projectile::new(10.0 * PX_PER_TICK).with_bounce(Bounce::times(1));
    p.set_target(at, target);
    world.spawn_projectile(p, at);
}

fn beam_through_avatar(world: &mut World) {
    let target = world.target_or_center();
    let slope = random_unit(world) * 2.0 - 1.0;
    let intercept = target.y - slope * target.x;
    beam(
        world,
        Segment::new(0.0, intercept, FIELD_WIDTH, intercept + slope * FIELD_WIDTH),
        0.5,
        0.075,
    );
}

fn beam_grid(world: &mut World) {
    const LINES: u32 = 6;
    let offset = world.counters.offset;
    for i in 0..LINES {
        let x = (FIELD_WIDTH / LINES as f32 * i as f32 + offset) % FIELD_WIDTH;
        let y = (FIELD_HEIGHT / LINES as f32 * i as f32 + offset) % FIELD_HEIGHT;
        beam(world, Segment::new(0.0, y, FIELD_WIDTH, y), 0.4, 0.075);
        beam(world, Segment::new(x, 0.0, x, FIELD_HEIGHT), 0.4, 0.075);
    }
    world.counters.offset += 30.0;
}

fn orbit_ring(world: &mut World) {
    let center = field_center();
    let radius = 50.0;
    let phase = world.counters.offset;
    for (theta, _) in ring_points(Circle::at(center, radius), 20) {
        let theta = theta + phase;
        let p = Projectile::new(7.5 * PX_PER_TICK).with_path(Path::Orbit(Orbit {
            theta,
            radius,
            growth: 1000.0,
        }));
        world.spawn_projectile(p, polar_offset(center, radius, theta));
    }
}

fn converge(world: &mut World) {
    let center = field_center();
    for (at, p) in world.projectiles_mut() {
        p.stop_orbit();
        p.set_target(at, center);
        p.speed = 10.0 * PX_PER_TICK;
    }
    for hazard in world.hazards_mut() {
        hazard.freeze_growth();
    }
}

fn falling_bombs(world: &mut World) {
    for _ in 0..5 {
        let x = random_unit(world) * FIELD_WIDTH;
        let y = random_unit(world) * FIELD_HEIGHT;
        let zone = Hazard::new(
            HazardShape::Zone {
                damage_within: true,
                growth: 0.0,
            },
            1.0,
            0.2,
        );
        world.spawn_hazard(zone, Circle::new(x, y, 150.0));
    }
}

fn slow_hell(world: &mut World) {
    const STEPS: u32 = 40;
    let k = world.counters.slow_hell;
    let along_x = FIELD_WIDTH / STEPS as f32 * k as f32;
    let along_y = FIELD_HEIGHT / STEPS as f32 * k as f32;
    let edges = [
        Vec2::new(along_x, 0.0),
        Vec2::new(along_x, FIELD_HEIGHT - PROJECTILE_RADIUS),
        Vec2::new(0.0, along_y),
        Vec2::new(FIELD_WIDTH - PROJECTILE_RADIUS, along_y),
    ];
    let angle = k as f32 * (PI / STEPS as f32 + PI);
    for at in edges {
        let mut p = Projectile::new(2.0 * PX_PER_TICK);
        p.set_angle(angle);
        world.spawn_projectile(p, at);
    }
    world.counters.slow_hell = (k + 1) % STEPS;
}

fn slow_burst(world: &mut World) {
    let x = random_unit(world) * (FIELD_WIDTH - 10.0) + 10.0;
    let y = random_unit(world) * (FIELD_HEIGHT - 10.0) + 10.0;
    for (theta, at) in ring_points(Circle::new(x, y, 10.0), 20) {
        let mut p = Projectile::new(2.0 * PX_PER_TICK);
        p.set_angle(theta);
        p.dir = -p.dir;
        world.spawn_projectile(p, at);
    }
}

fn ring_collapse(world: &mut World) {
    let center = field_center();
    for i in 0..10 {
        let ring = Hazard::new(
            HazardShape::Zone {
                damage_within: false,
                growth: -500.0,
            },
            0.5,
            0.2,
        )
        .with_bursts(10);
        world.spawn_hazard_stroked(ring, Circle::at(center, 200.0 * (i + 1) as f32), 10.0);
    }

    let target = world.target_or_center();
    for (at, p) in world.projectiles_mut() {
        p.speed = -10.0 * PX_PER_TICK;
        p.set_target(at, target);
    }
}

fn spiral_homing(world: &mut World) {
    let target = world.target_or_center();
    let phase = world.counters.offset * PI / 6.0;
    let at = target + Vec2::new(phase.sin(), phase.cos()) * 200.0;

    let mut p = Projectile::new(6.0 * PX_PER_TICK).with_homing(Homing {
        duration: Some(2.0),
        ..Homing::turning(0.075 * PX_PER_TICK)
    });
    p.dir = -aim(at, target);
    world.spawn_projectile(p, at);
    world.counters.offset += 1.0;
}

fn expanding_orbit_ring(world: &mut World) {
    let k = world.counters.expanding_ring;
    world.counters.expanding_ring += 1;

    let center = field_center();
    let radius = 100.0 + 50.0 * k as f32;
    let phase = k as f32 * PI / 6.0;
    for (theta, _) in ring_points(Circle::at(center, radius), 20) {
        let theta = theta + phase;
        let mut p = Projectile::new(7.5 * PX_PER_TICK).with_path(Path::Orbit(Orbit {
            theta,
            radius,
            growth: 0.0,
        }));
        p.survives_offscreen = true;
        world.spawn_projectile(p, polar_offset(center, radius, theta));
    }
}

fn pentagram_cascade(world: &mut World) {
    let k = world.counters.pentagram_cascade;
    world.counters.pentagram_cascade += 1;

    let radius = 100.0 + 200.0 * k as f32;
    let lifespan = (4.0 - 0.4 * k as f32).max(0.0);
    pentagram(world, Circle::at(field_center(), radius), lifespan);
}

fn precision_blast(world: &mut World) {
    let target = world.target_or_center();
    for (at, p) in world.projectiles_mut().filter(|(_, p)| p.is_orbiting()) {
        p.stop_orbit();
        p.speed = -10.0 * PX_PER_TICK;
        p.set_target(at, target);
    }
    world.counters.precision_x = target.x;
}

fn precision_corridor(world: &mut World) {
    let sway = (world.counters.offset * 0.2).sin() * 50.0;
    let gap = AVATAR_RADIUS * 4.0;
    for side in [-1.0f32, 1.0] {
        let lane = world.counters.precision_x + side * gap;

        let mut p = Projectile::new(5.0 * PX_PER_TICK);
        p.dir = Vec2::Y;
        world.spawn_projectile(p, Vec2::new(lane + sway, PROJECTILE_RADIUS));

        // Beams slide out from the unswayed lane
        let beam_x = lane + side * 50.0;
        let sliding = Hazard::new(
            HazardShape::MovingBeam {
                segment: Segment::new(beam_x, 0.0, beam_x, FIELD_HEIGHT),
                velocity: Vec2::new(side * 10.0 * PX_PER_TICK, 0.0),
            },
            0.0,
            5.0,
        );
        world.spawn_hazard(sliding, Circle::new(beam_x, 0.0, 0.0));
    }
    world.counters.offset += 1.0;
}

fn homing_bouncers(world: &mut World) {
    for (theta, at) in ring_points(Circle::at(field_center(), 10.0), 20) {
        let mut p = Projectile::new(5.0 * PX_PER_TICK)
            .with_homing(Homing::turning(0.005 * PX_PER_TICK))
            .with_bounce(Bounce {
                reaim: true,
                ..Bounce::times(2)
            });
        p.set_angle(theta);
        p.dir = -p.dir;
        world.spawn_projectile(p, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;

    fn world_with_avatar() -> World {
        let mut world = World::new(1, 42);
        world.spawn_avatar();
        world
    }

    #[test]
    fn test_schedule_covers_the_song() {
        let schedule = initial_schedule();
        assert_eq!(schedule.len(), 22);
        let last = schedule
            .iter()
            .map(|t| t.lifespan)
            .fold(0.0f32, f32::max);
        assert_eq!(last, 50.0);
        // Palette cycling never expires
        assert!(
            schedule
                .iter()
                .any(|t| t.pattern == Pattern::CyclePalette && t.lifespan == 0.0)
        );
    }

    #[test]
    fn test_schedule_from_drops_finished_triggers() {
        let late = schedule_from(45.0);
        assert!(late.iter().all(|t| t.pattern != Pattern::SineStream));
        assert!(late.iter().any(|t| t.pattern == Pattern::PrecisionCorridor));
        assert!(late.iter().any(|t| t.pattern == Pattern::CyclePalette));
    }

    #[test]
    fn test_bullet_ring_flies_outward() {
        let mut world = world_with_avatar();
        Pattern::BulletRing.run(&mut world);
        assert_eq!(world.projectile_count(), 20);
        let center = field_center();
        for e in world.entities() {
            if let EntityKind::Projectile(p) = &e.kind {
                let outward = (e.body.center - center).normalize();
                assert!(p.dir.dot(outward) > 0.99);
                assert_eq!(p.bounce, Some(Bounce::times(2)));
            }
        }
    }

    #[test]
    fn test_random_beams_need_company() {
        let mut world = world_with_avatar();
        Pattern::RandomBeams.run(&mut world);
        assert_eq!(world.hazard_count(), 0);

        world.spawn_projectile(Projectile::default(), Vec2::new(10.0, 10.0));
        Pattern::RandomBeams.run(&mut world);
        assert_eq!(world.hazard_count(), 5);
    }

    #[test]
    fn test_pentagram_spawns_star_and_ring() {
        let mut world = world_with_avatar();
        Pattern::Pentagram.run(&mut world);
        let hazards: Vec<_> = world.entities().iter().filter_map(|e| e.as_hazard()).collect();
        assert_eq!(hazards.len(), 6);
        assert_eq!(hazards.iter().filter(|h| h.shape.is_zone()).count(), 1);
        assert!(world.entities().iter().skip(1).all(|e| e.stroke_width == 10.0));
    }

    #[test]
    fn test_sine_rows_wrap() {
        let mut world = world_with_avatar();
        for _ in 0..12 {
            Pattern::SineStream.run(&mut world);
        }
        let ys: Vec<f32> = world
            .entities()
            .iter()
            .filter(|e| e.as_projectile().is_some())
            .map(|e| e.body.center.y)
            .collect();
        assert_eq!(ys[0], 0.0);
        assert_eq!(ys[10], FIELD_HEIGHT);
        assert_eq!(ys[11], 0.0);
    }

    #[test]
    fn test_converge_redirects_projectiles_only() {
        let mut world = world_with_avatar();
        Pattern::OrbitRing.run(&mut world);
        Pattern::FallingBombs.run(&mut world);
        Pattern::Converge.run(&mut world);

        let center = field_center();
        for e in world.entities() {
            if let EntityKind::Projectile(p) = &e.kind {
                assert!(!p.is_orbiting());
                assert_eq!(p.speed, 10.0 * PX_PER_TICK);
                let inward = (center - e.body.center).normalize();
                assert!(p.dir.dot(inward) > 0.99);
            }
        }
        assert!(world.avatar_alive());
    }

    #[test]
    fn test_ring_collapse_reverses_projectiles() {
        let mut world = world_with_avatar();
        Pattern::SlowBurst.run(&mut world);
        Pattern::RingCollapse.run(&mut world);
        assert_eq!(world.hazard_count(), 10);
        let target = world.target_or_center();
        for e in world.entities() {
            if let EntityKind::Projectile(p) = &e.kind {
                assert!(p.speed < 0.0);
                // Moves away from the avatar
                let velocity = p.velocity();
                assert!(velocity.dot(target - e.body.center) <= 0.0);
            }
        }
    }

    #[test]
    fn test_precision_blast_only_touches_orbiters() {
        let mut world = world_with_avatar();
        Pattern::ExpandingOrbitRing.run(&mut world);
        let straight = world.spawn_projectile(Projectile::new(42.0), Vec2::new(10.0, 10.0));
        Pattern::PrecisionBlast.run(&mut world);

        assert_eq!(world.counters.precision_x, field_center().x);
        assert_eq!(world.get(straight).and_then(|e| e.as_projectile()).unwrap().speed, 42.0);
        let blasted = world
            .entities()
            .iter()
            .filter_map(|e| e.as_projectile())
            .filter(|p| p.speed == -10.0 * PX_PER_TICK)
            .count();
        assert_eq!(blasted, 20);
    }

    #[test]
    fn test_precision_corridor_flanks_remembered_x() {
        let mut world = world_with_avatar();
        world.counters.precision_x = 400.0;
        Pattern::PrecisionCorridor.run(&mut world);
        assert_eq!(world.projectile_count(), 2);
        assert_eq!(world.hazard_count(), 2);
        let xs: Vec<f32> = world
            .entities()
            .iter()
            .filter(|e| e.as_projectile().is_some())
            .map(|e| e.body.center.x)
            .collect();
        assert_eq!(xs, vec![376.0, 424.0]);
        assert_eq!(world.counters.offset, 1.0);
    }

    #[test]
    fn test_precision_corridor_sway_moves_only_projectiles() {
        let mut world = world_with_avatar();
        world.counters.precision_x = 400.0;
        world.counters.offset = 5.0;
        Pattern::PrecisionCorridor.run(&mut world);

        let sway = 1.0f32.sin() * 50.0;
        let xs: Vec<f32> = world
            .entities()
            .iter()
            .filter(|e| e.as_projectile().is_some())
            .map(|e| e.body.center.x)
            .collect();
        assert!((xs[0] - (376.0 + sway)).abs() < 1e-3);
        assert!((xs[1] - (424.0 + sway)).abs() < 1e-3);

        let beams: Vec<f32> = world
            .entities()
            .iter()
            .filter_map(|e| e.as_hazard())
            .filter_map(|h| h.shape.segment())
            .map(|s| s.start.x)
            .collect();
        assert_eq!(beams, vec![326.0, 474.0]);
    }

    #[test]
    fn test_same_seed_same_patterns() {
        let mut a = world_with_avatar();
        let mut b = world_with_avatar();
        for pattern in [Pattern::FallingBombs, Pattern::HomingRain, Pattern::InwardBouncers] {
            pattern.run(&mut a);
            pattern.run(&mut b);
        }
        let centers = |w: &World| w.entities().iter().map(|e| e.body.center).collect::<Vec<_>>();
        assert_eq!(centers(&a), centers(&b));
    }

    #[test]
    fn test_homing_bouncers_have_both_behaviours() {
        let mut world = world_with_avatar();
        Pattern::HomingBouncers.run(&mut world);
        assert_eq!(world.projectile_count(), 20);
        assert!(
            world
                .entities()
                .iter()
                .filter_map(|e| e.as_projectile())
                .all(|p| p.homing.is_some() && p.bounce.is_some_and(|b| b.reaim))
        );
    }
}
