//! The simulation context: live-entity registry plus pattern state
//!
//! Owned by the session and lent to every component for one tick. Patterns
//! spawn into it, the collision pass removes from it, and a reset clears it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::avatar::Avatar;
use super::entity::{Entity, EntityId, EntityKind, Fate, TickContext};
use super::geometry::Circle;
use super::hazard::Hazard;
use super::palette::Palette;
use super::projectile::Projectile;
use crate::consts::*;
use crate::field_center;
use crate::renderer::Renderer;

/// Offsets advanced by repeating patterns
#[derive(Debug, Clone, Default)]
pub struct PatternCounters {
    /// Row index for the sine stream
    pub sine_row: u32,
    /// Shared phase for the beam grid, spiral homing, orbit ring and corridor
    pub offset: f32,
    pub pentagram_cascade: u32,
    pub expanding_ring: u32,
    pub slow_hell: u32,
    /// Avatar x captured by the precision blast
    pub precision_x: f32,
}

/// Live entities in insertion order plus the shared pattern state
#[derive(Debug, Clone)]
pub struct World {
    entities: Vec<Entity>,
    next_id: EntityId,
    avatar_id: Option<EntityId>,
    avatar_health: u32,
    pub field: Vec2,
    pub palette: Palette,
    pub counters: PatternCounters,
    pub rng: Pcg32,
}

impl World {
    /// Empty world; the avatar is spawned separately
    pub fn new(avatar_health: u32, seed: u64) -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
            avatar_id: None,
            avatar_health: avatar_health.max(1),
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            palette: Palette::default(),
            counters: PatternCounters::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a new entity at the end of the registry
    pub fn spawn(&mut self, body: Circle, kind: EntityKind) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity::new(id, body, kind));
        id
    }

    /// Spawn a fresh avatar at field centre
    pub fn spawn_avatar(&mut self) -> EntityId {
        let body = Circle::at(field_center(), AVATAR_RADIUS);
        let id = self.spawn(body, EntityKind::Avatar(Avatar::new(self.avatar_health)));
        self.avatar_id = Some(id);
        id
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile, at: Vec2) -> EntityId {
        let id = self.spawn(
            Circle::at(at, PROJECTILE_RADIUS),
            EntityKind::Projectile(projectile),
        );
        log::trace!("spawned projectile {} at {:?}", id, at);
        id
    }

    pub fn spawn_hazard(&mut self, hazard: Hazard, body: Circle) -> EntityId {
        self.spawn_hazard_stroked(hazard, body, BEAM_WIDTH)
    }

    pub fn spawn_hazard_stroked(&mut self, hazard: Hazard, body: Circle, width: f32) -> EntityId {
        let id = self.spawn(body, EntityKind::Hazard(hazard));
        if let Some(entity) = self.get_mut(id) {
            entity.stroke_width = width;
        }
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Drop every entity and reset pattern state
    pub fn clear(&mut self) {
        self.entities.clear();
        self.avatar_id = None;
        self.counters = PatternCounters::default();
    }

    /// Restart the pattern RNG so a replay spawns the same hazards
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    #[inline]
    pub fn avatar_id(&self) -> Option<EntityId> {
        self.avatar_id
    }

    /// The avatar entity, if still in the registry
    pub fn avatar_entity(&self) -> Option<&Entity> {
        self.avatar_id.and_then(|id| self.get(id))
    }

    pub fn avatar(&self) -> Option<&Avatar> {
        self.avatar_entity().and_then(Entity::as_avatar)
    }

    pub fn avatar_mut(&mut self) -> Option<&mut Avatar> {
        let id = self.avatar_id?;
        match &mut self.get_mut(id)?.kind {
            EntityKind::Avatar(avatar) => Some(avatar),
            _ => None,
        }
    }

    pub fn avatar_position(&self) -> Option<Vec2> {
        self.avatar_entity().map(|e| e.body.center)
    }

    /// Avatar position, or field centre when the avatar is gone
    pub fn target_or_center(&self) -> Vec2 {
        self.avatar_position().unwrap_or_else(field_center)
    }

    #[inline]
    pub fn avatar_alive(&self) -> bool {
        self.avatar_entity().is_some()
    }

    pub fn projectile_count(&self) -> usize {
        self.entities.iter().filter(|e| e.as_projectile().is_some()).count()
    }

    pub fn hazard_count(&self) -> usize {
        self.entities.iter().filter(|e| e.as_hazard().is_some()).count()
    }

    /// Every projectile with its current position
    pub fn projectiles_mut(&mut self) -> impl Iterator<Item = (Vec2, &mut Projectile)> {
        self.entities.iter_mut().filter_map(|e| match &mut e.kind {
            EntityKind::Projectile(p) => Some((e.body.center, p)),
            _ => None,
        })
    }

    pub fn hazards_mut(&mut self) -> impl Iterator<Item = &mut Hazard> {
        self.entities.iter_mut().filter_map(|e| match &mut e.kind {
            EntityKind::Hazard(h) => Some(h),
            _ => None,
        })
    }

    pub fn tick_context(&self) -> TickContext {
        TickContext {
            field: self.field,
            target: self.avatar_position(),
        }
    }

    /// Draw (if visible) then update every entity in registry order.
    ///
    /// Entities that expire are removed in place; the index only advances
    /// past survivors so removal never skips a neighbour.
    pub fn draw_and_update(&mut self, dt: f32, renderer: &mut dyn Renderer) {
        let hazard_color = self.palette.color();
        let mut i = 0;
        while i < self.entities.len() {
            let ctx = self.tick_context();
            let entity = &mut self.entities[i];
            if entity.visible {
                entity.draw(renderer, hazard_color);
            }
            match entity.update(dt, &ctx) {
                Fate::Keep => i += 1,
                Fate::Retire => {
                    let gone = self.entities.remove(i);
                    log::trace!("entity {} expired", gone.id);
                }
            }
        }
    }

    /// Deliver a hit to `id`, removing it if it does not survive
    pub fn on_collision(&mut self, id: EntityId) {
        let Some(entity) = self.get_mut(id) else {
            return;
        };
        if entity.on_collision() == Fate::Retire {
            self.remove(id);
        }
    }
}
