//! Collision tests between the avatar and hazards
//!
//! Only the avatar is ever probed. Each tick the registry is scanned in
//! order and the first hit wins.

use super::entity::{EntityId, EntityKind};
use super::geometry::{Circle, Segment};
use super::world::World;

/// Circle/circle overlap, inclusive of touching
#[inline]
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    a.distance_to(b) <= a.radius + b.radius
}

/// Does the infinite line through `segment` touch `circle`?
///
/// Substitutes `y = m*x + c` into `(x - a)^2 + (y - b)^2 = r^2` and checks
/// that the resulting quadratic's discriminant is non-negative. Vertical
/// segments hit when their x lies strictly inside the circle's span.
///
/// `c` is the true intercept `y1 - m*x1`, not `y1`. The two only agree for
/// beams starting at `x = 0`; pentagram edges start elsewhere and are tested
/// along the line they are drawn on.
pub fn line_circle(segment: &Segment, circle: &Circle) -> bool {
    let (a, b, r) = (circle.center.x, circle.center.y, circle.radius);

    let Some((m, c)) = segment.slope_intercept() else {
        let x = segment.start.x;
        return a - r < x && x < a + r;
    };

    -a * a * m * m + 2.0 * a * b * m - 2.0 * a * c * m - b * b + 2.0 * b * c - c * c
        + r * r * m * m
        + r * r
        >= 0.0
}

/// Zone test: the whole disk, or only the ring at its edge
pub fn zone_circle(zone: &Circle, damage_within: bool, probe: &Circle) -> bool {
    let dist = zone.distance_to(probe);
    if damage_within {
        dist <= probe.radius + zone.radius
    } else {
        zone.radius - probe.radius <= dist && dist <= probe.radius + zone.radius
    }
}

/// Inverted zone: safe only well inside the disk
#[inline]
pub fn inverted_zone_circle(zone: &Circle, probe: &Circle) -> bool {
    zone.distance_to(probe) > zone.radius - probe.radius
}

/// Find the first registry entity colliding with `probe_id`
///
/// Hazards use their own shape test, projectiles use circle overlap and
/// anything else is skipped.
pub fn find_collision(world: &World, probe_id: EntityId) -> Option<EntityId> {
    let probe = world.get(probe_id)?.body;

    world
        .entities()
        .iter()
        .filter(|e| e.id != probe_id)
        .find(|e| match &e.kind {
            EntityKind::Hazard(hazard) => hazard.intersects(&e.body, &probe),
            EntityKind::Projectile(_) => circles_overlap(&probe, &e.body),
            EntityKind::Avatar(_) => false,
        })
        .map(|e| e.id)
}

/// Run the collision pass for `probe_id`; both parties react to a hit.
///
/// Returns the partner that was hit, if any.
pub fn resolve_collisions(world: &mut World, probe_id: EntityId) -> Option<EntityId> {
    let partner = find_collision(world, probe_id)?;
    log::trace!("entity {} collided with {}", probe_id, partner);
    world.on_collision(probe_id);
    world.on_collision(partner);
    Some(partner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hazard::{Hazard, HazardShape};
    use crate::sim::projectile::Projectile;
    use proptest::prelude::*;

    #[test]
    fn test_line_through_circle_center_hits() {
        let seg = Segment::new(0.0, 0.0, 10.0, 0.0);
        assert!(line_circle(&seg, &Circle::new(5.0, 0.0, 1.0)));
    }

    #[test]
    fn test_line_far_from_circle_misses() {
        let seg = Segment::new(0.0, 0.0, 10.0, 0.0);
        assert!(!line_circle(&seg, &Circle::new(5.0, 5.0, 1.0)));
    }

    #[test]
    fn test_line_is_infinite() {
        // Well past the segment's end, still on its line
        let seg = Segment::new(0.0, 0.0, 10.0, 0.0);
        assert!(line_circle(&seg, &Circle::new(500.0, 0.5, 1.0)));
    }

    #[test]
    fn test_sloped_line_with_offset_start() {
        // y = x - 100 written from x = 200
        let seg = Segment::new(200.0, 100.0, 300.0, 200.0);
        assert!(line_circle(&seg, &Circle::new(150.0, 50.0, 2.0)));
        // Perpendicular distance ~7.07 from the line
        assert!(!line_circle(&seg, &Circle::new(150.0, 60.0, 6.0)));
        assert!(line_circle(&seg, &Circle::new(150.0, 60.0, 7.5)));
        // On y = x + 100, which an intercept of y1 would describe
        assert!(!line_circle(&seg, &Circle::new(150.0, 250.0, 2.0)));
    }

    #[test]
    fn test_vertical_segment_strict_span() {
        let seg = Segment::new(100.0, 0.0, 100.0, 900.0);
        assert!(line_circle(&seg, &Circle::new(104.0, 300.0, 6.0)));
        // Touching exactly is not a hit
        assert!(!line_circle(&seg, &Circle::new(106.0, 300.0, 6.0)));
    }

    #[test]
    fn test_damage_within_zone() {
        let zone = Circle::new(500.0, 450.0, 100.0);
        assert!(zone_circle(&zone, true, &Circle::new(550.0, 450.0, 6.0)));
        assert!(!zone_circle(&zone, true, &Circle::new(700.0, 450.0, 6.0)));
    }

    #[test]
    fn test_ring_zone_only_hits_edge() {
        let zone = Circle::new(500.0, 450.0, 100.0);
        assert!(!zone_circle(&zone, false, &Circle::new(550.0, 450.0, 6.0)));
        assert!(zone_circle(&zone, false, &Circle::new(597.0, 450.0, 6.0)));
        assert!(!zone_circle(&zone, false, &Circle::new(620.0, 450.0, 6.0)));
    }

    #[test]
    fn test_inverted_zone_hits_outside() {
        let zone = Circle::new(500.0, 450.0, 100.0);
        assert!(!inverted_zone_circle(&zone, &Circle::new(550.0, 450.0, 6.0)));
        assert!(inverted_zone_circle(&zone, &Circle::new(597.0, 450.0, 6.0)));
        assert!(inverted_zone_circle(&zone, &Circle::new(900.0, 450.0, 6.0)));
    }

    #[test]
    fn test_first_hit_in_registry_order_wins() {
        let mut world = World::new(1, 7);
        let avatar = world.spawn_avatar();
        let center = world.get(avatar).unwrap().body.center;

        let far = world.spawn_projectile(Projectile::default(), center + glam::Vec2::new(300.0, 0.0));
        let first = world.spawn_projectile(Projectile::default(), center + glam::Vec2::new(8.0, 0.0));
        let second = world.spawn_projectile(Projectile::default(), center);

        assert_eq!(find_collision(&world, avatar), Some(first));
        assert_eq!(resolve_collisions(&mut world, avatar), Some(first));
        assert!(!world.contains(first));
        assert!(world.contains(second));
        assert!(world.contains(far));
        // Single life: the avatar is gone
        assert!(!world.contains(avatar));
    }

    #[test]
    fn test_pending_hazard_is_ignored() {
        let mut world = World::new(1, 7);
        let avatar = world.spawn_avatar();
        let center = world.get(avatar).unwrap().body.center;
        world.spawn_hazard(
            Hazard::new(
                HazardShape::Zone {
                    damage_within: true,
                    growth: 0.0,
                },
                1.0,
                0.2,
            ),
            Circle::at(center, 100.0),
        );
        assert_eq!(find_collision(&world, avatar), None);
    }

    #[test]
    fn test_hazard_survives_its_hit() {
        let mut world = World::new(3, 7);
        let avatar = world.spawn_avatar();
        let center = world.get(avatar).unwrap().body.center;
        let mut hazard = Hazard::beam(
            Segment::new(0.0, center.y, 1000.0, center.y),
            0.0,
            1.0,
        );
        hazard.phase = crate::sim::hazard::BurstPhase::Active;
        let beam = world.spawn_hazard(hazard, Circle::new(0.0, 0.0, 0.0));

        assert_eq!(resolve_collisions(&mut world, avatar), Some(beam));
        assert!(world.contains(beam));
        assert!(world.contains(avatar));
        assert_eq!(world.avatar().unwrap().health, 2);
    }

    proptest! {
        #[test]
        fn prop_circle_overlap_symmetric(
            ax in -2000.0f32..2000.0, ay in -2000.0f32..2000.0, ar in 0.0f32..300.0,
            bx in -2000.0f32..2000.0, by in -2000.0f32..2000.0, br in 0.0f32..300.0,
        ) {
            let a = Circle::new(ax, ay, ar);
            let b = Circle::new(bx, by, br);
            prop_assert_eq!(circles_overlap(&a, &b), circles_overlap(&b, &a));
        }
    }
}
