//! The player-controlled avatar
//!
//! Movement is driven by held intent flags; damage starts an invincibility
//! window during which the avatar blinks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Circle;
use crate::consts::*;

/// Held movement intents (set on key-down, cleared on key-up)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub slow: bool,
}

/// Result of the avatar being hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already invincible or already dead
    Ignored,
    /// Lost health, invincibility started
    Wounded { health_left: u32 },
    /// Health reached zero
    Killed,
}

/// Avatar state beyond its body circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub intents: Intents,
    /// Base speed (pixels/sec)
    pub speed: f32,
    /// Time since the last hit; invincible while below `INVINCIBILITY_TIME`
    pub since_hit: f32,
    pub health: u32,
}

impl Avatar {
    pub fn new(health: u32) -> Self {
        Self {
            intents: Intents::default(),
            speed: AVATAR_SPEED,
            since_hit: INVINCIBILITY_TIME,
            health,
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.since_hit < INVINCIBILITY_TIME
    }

    /// Advance the blink timer and move the body
    pub fn update(&mut self, dt: f32, body: &mut Circle, visible: &mut bool, field: Vec2) {
        let last = self.since_hit;
        self.since_hit += dt;
        if self.since_hit < INVINCIBILITY_TIME && self.since_hit % BLINK_TIME < last % BLINK_TIME {
            *visible = !*visible;
        }
        if self.since_hit > INVINCIBILITY_TIME && !*visible {
            *visible = true;
        }

        let delta = self.movement(dt);
        if delta != Vec2::ZERO {
            move_within(body, delta, field);
        }
    }

    /// Movement vector for this tick from the held intents
    pub fn movement(&self, dt: f32) -> Vec2 {
        let i = self.intents;
        let mut speed = self.speed;
        if (i.left || i.right) && (i.up || i.down) {
            speed /= std::f32::consts::SQRT_2;
        }
        if i.slow {
            speed /= 2.0;
        }
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(axis(i.left, i.right), axis(i.up, i.down)) * speed * dt
    }

    /// Apply a hit. Ignored while invincible or already dead.
    pub fn take_hit(&mut self) -> HitOutcome {
        if self.is_invincible() || self.health == 0 {
            return HitOutcome::Ignored;
        }
        self.since_hit = 0.0;
        self.health -= 1;
        if self.health == 0 {
            HitOutcome::Killed
        } else {
            HitOutcome::Wounded {
                health_left: self.health,
            }
        }
    }
}

/// Move `body` by `delta` unless that would leave the field.
///
/// When any edge would be crossed the whole movement is discarded and the
/// offending axis is pinned against that edge.
fn move_within(body: &mut Circle, delta: Vec2, field: Vec2) {
    let r = body.radius;
    let next = body.center + delta;
    let mut blocked = false;

    if next.x + r > field.x {
        body.center.x = field.x - r;
        blocked = true;
    } else if next.x - r < 0.0 {
        body.center.x = r;
        blocked = true;
    }
    if next.y + r > field.y {
        body.center.y = field.y - r;
        blocked = true;
    } else if next.y - r < 0.0 {
        body.center.y = r;
        blocked = true;
    }

    if !blocked {
        body.center = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }

    #[test]
    fn test_diagonal_speed_is_normalized() {
        let mut avatar = Avatar::new(1);
        avatar.intents.right = true;
        let straight = avatar.movement(1.0).length();
        avatar.intents.down = true;
        let diagonal = avatar.movement(1.0).length();
        assert!((straight - diagonal).abs() < 1e-3);
    }

    #[test]
    fn test_slow_halves_speed() {
        let mut avatar = Avatar::new(1);
        avatar.intents.left = true;
        let normal = avatar.movement(0.5).length();
        avatar.intents.slow = true;
        assert!((avatar.movement(0.5).length() - normal / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_opposite_intents_cancel() {
        let mut avatar = Avatar::new(1);
        avatar.intents.left = true;
        avatar.intents.right = true;
        assert_eq!(avatar.movement(1.0), Vec2::ZERO);
    }

    #[test]
    fn test_edge_discards_whole_vector() {
        let mut avatar = Avatar::new(1);
        avatar.intents.right = true;
        avatar.intents.up = true;
        let mut body = Circle::new(FIELD_WIDTH - AVATAR_RADIUS - 1.0, 450.0, AVATAR_RADIUS);
        let mut visible = true;
        avatar.update(0.1, &mut body, &mut visible, field());
        // x pinned to the edge, y untouched
        assert_eq!(body.center.x, FIELD_WIDTH - AVATAR_RADIUS);
        assert_eq!(body.center.y, 450.0);
    }

    #[test]
    fn test_second_hit_inside_window_is_ignored() {
        let mut avatar = Avatar::new(3);
        assert_eq!(avatar.take_hit(), HitOutcome::Wounded { health_left: 2 });
        let mut body = Circle::new(500.0, 450.0, AVATAR_RADIUS);
        let mut visible = true;
        avatar.update(INVINCIBILITY_TIME * 0.5, &mut body, &mut visible, field());
        assert_eq!(avatar.take_hit(), HitOutcome::Ignored);
        assert_eq!(avatar.health, 2);

        avatar.update(INVINCIBILITY_TIME, &mut body, &mut visible, field());
        assert_eq!(avatar.take_hit(), HitOutcome::Wounded { health_left: 1 });
    }

    #[test]
    fn test_single_life_dies_on_first_hit() {
        let mut avatar = Avatar::new(1);
        assert_eq!(avatar.take_hit(), HitOutcome::Killed);
        assert_eq!(avatar.take_hit(), HitOutcome::Ignored);
    }

    #[test]
    fn test_blinks_while_invincible_then_shows() {
        let mut avatar = Avatar::new(5);
        avatar.take_hit();
        let mut body = Circle::new(500.0, 450.0, AVATAR_RADIUS);
        let mut visible = true;
        let dt = 1.0 / 64.0;
        let mut toggles = 0;
        let mut last = visible;
        for _ in 0..70 {
            avatar.update(dt, &mut body, &mut visible, field());
            if visible != last {
                toggles += 1;
                last = visible;
            }
        }
        assert!(toggles >= 8);
        assert!(visible);
    }

    proptest! {
        #[test]
        fn prop_avatar_never_leaves_field(
            steps in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), 0.0f32..0.2), 1..200)
        ) {
            let mut avatar = Avatar::new(1);
            let mut body = Circle::at(crate::field_center(), AVATAR_RADIUS);
            let mut visible = true;
            for (up, down, left, right, dt) in steps {
                avatar.intents = Intents { up, down, left, right, slow: false };
                avatar.update(dt, &mut body, &mut visible, field());
                prop_assert!(body.center.x - body.radius >= -1e-3);
                prop_assert!(body.center.x + body.radius <= FIELD_WIDTH + 1e-3);
                prop_assert!(body.center.y - body.radius >= -1e-3);
                prop_assert!(body.center.y + body.radius <= FIELD_HEIGHT + 1e-3);
            }
        }
    }
}
