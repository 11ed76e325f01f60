//! Entity registry for one level
//!
//! The master list fixes update and render order (registration order). A
//! secondary index maps every [`Kind`] to the entities that are that kind or a
//! descendant of it, so `query(Kind::Enemy)` finds every enemy subtype.
//!
//! Deregistration is deferred: an entity deregistered during frame N is skipped
//! by the rest of that frame's update and purged from the master list and every
//! index bucket when the sweep completes. Purged entities are drawn by the
//! frame's render pass one last time, then dropped.

use std::any::Any;
use std::collections::{HashMap, HashSet};

use glam::Vec2;

use super::entity::{Body, DamageOutcome, Entity, EntityId, Hit, RenderView};
use super::error::{SimError, SimResult};
use super::kind::Kind;
use super::polygon::Polygon;
use super::tick::FrameContext;
use crate::consts::{PLAYER_TAG, WALL_TAG, WINDOW_SIZE};
use crate::renderer::Renderer;

/// A named-store value that points at an entity
pub trait EntityHandle: Any + Copy {
    fn id(&self) -> EntityId;
}

/// The level's player, stored under [`PLAYER_TAG`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHandle(pub EntityId);

impl EntityHandle for PlayerHandle {
    fn id(&self) -> EntityId {
        self.0
    }
}

/// The level's boundary wall, stored under [`WALL_TAG`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallHandle(pub EntityId);

impl EntityHandle for WallHandle {
    fn id(&self) -> EntityId {
        self.0
    }
}

#[derive(Default)]
pub struct Level {
    next_id: u32,
    /// Registration order
    order: Vec<EntityId>,
    /// Entity storage. The entity being updated is taken out for the duration
    /// of its own update.
    slots: HashMap<EntityId, Entity>,
    index: HashMap<Kind, Vec<EntityId>>,
    pending_removal: HashSet<EntityId>,
    /// Purged by the last update, still owed one render
    departed: Vec<Entity>,
    named: HashMap<String, Box<dyn Any>>,
    frame: u64,
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("entities", &self.order.len())
            .field("pending_removal", &self.pending_removal.len())
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .field("frame", &self.frame)
            .finish()
    }
}

impl Level {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Add an entity at the end of the master list and into the index bucket
    /// of its kind and every ancestor kind
    pub fn register(&mut self, shape: Polygon, body: Body) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let kind = body.kind();
        for k in kind.lineage() {
            self.index.entry(k).or_default().push(id);
        }
        self.order.push(id);
        self.slots.insert(id, Entity { id, shape, body });
        log::debug!("Registered {:?} as entity {}", kind, id.0);
        id
    }

    /// Mark an entity for removal at the end of the current update.
    /// Deregistering twice is a no-op.
    pub fn deregister(&mut self, id: EntityId) {
        if self.pending_removal.insert(id) {
            log::trace!("Entity {} pending removal", id.0);
        }
    }

    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Entities that are `kind` or a descendant of it, in registration order.
    /// Unknown kinds give an empty slice.
    pub fn query(&self, kind: Kind) -> &[EntityId] {
        self.index.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every registered entity in registration order
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of completed updates since construction or the last reset
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(&id)
    }

    /// Entity that is present and not about to be removed
    pub fn live(&self, id: EntityId) -> Option<&Entity> {
        if self.is_pending_removal(id) {
            return None;
        }
        self.slots.get(&id)
    }

    /// Live entities of `kind` (or a descendant) other than `except`
    pub fn live_of_kind(&self, kind: Kind, except: EntityId) -> Vec<EntityId> {
        self.query(kind)
            .iter()
            .copied()
            .filter(|&id| id != except && self.live(id).is_some())
            .collect()
    }

    /// Run one frame of updates, then purge everything deregistered
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> SimResult<()> {
        // Indexed walk: entities registered mid-update land past the cursor and
        // are updated this same frame
        self.departed.clear();

        let mut cursor = 0;
        while cursor < self.order.len() {
            let id = self.order[cursor];
            cursor += 1;

            if self.pending_removal.contains(&id) {
                continue;
            }
            let Some(mut entity) = self.slots.remove(&id) else {
                continue;
            };
            let result = entity.update(self, ctx);
            self.slots.insert(id, entity);
            result?;
        }

        self.purge();
        self.frame += 1;
        Ok(())
    }

    fn purge(&mut self) {
        if self.pending_removal.is_empty() {
            return;
        }

        let pending = std::mem::take(&mut self.pending_removal);
        for id in self.order.iter().filter(|id| pending.contains(id)) {
            let Some(entity) = self.slots.remove(id) else {
                continue;
            };
            for kind in entity.kind().lineage() {
                if let Some(bucket) = self.index.get_mut(&kind) {
                    bucket.retain(|other| other != id);
                }
            }
            self.departed.push(entity);
        }
        self.order.retain(|id| !pending.contains(id));
        log::debug!("Purged {} entities", pending.len());
    }

    /// Draw every entity in registration order, then the ones the last update
    /// purged
    pub fn render(&self, renderer: &mut dyn Renderer) {
        let view = RenderView {
            scroll_point: self.scroll_point(),
        };
        for id in &self.order {
            if let Some(entity) = self.slots.get(id) {
                entity.render(&view, renderer);
            }
        }
        for entity in &self.departed {
            entity.render(&view, renderer);
        }
    }

    /// Remove every entity and named value
    pub fn reset(&mut self) {
        log::debug!("Resetting level ({} entities)", self.order.len());
        *self = Self::new();
    }

    /// Apply a hit to another entity. Missing or pending-removal targets
    /// ignore it.
    pub fn damage(
        &mut self,
        target: EntityId,
        hit: &Hit,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<DamageOutcome> {
        if self.is_pending_removal(target) {
            return Ok(DamageOutcome::Ignored);
        }
        let Some(mut entity) = self.slots.remove(&target) else {
            log::warn!("Damage aimed at entity {} which is not in the level", target.0);
            return Ok(DamageOutcome::Ignored);
        };
        let result = entity.damage(hit, self, ctx);
        self.slots.insert(target, entity);
        result
    }

    /// Store a value under `tag`, replacing any previous value
    pub fn store<T: Any>(&mut self, tag: &str, value: T) {
        self.named.insert(tag.to_string(), Box::new(value));
    }

    /// Look up a stored value by tag and type
    pub fn retrieve<T: Any>(&self, tag: &str) -> SimResult<&T> {
        let value = self.named.get(tag).ok_or_else(|| SimError::MissingKey {
            tag: tag.to_string(),
        })?;
        value.downcast_ref::<T>().ok_or_else(|| SimError::TypeMismatch {
            tag: tag.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Resolve a stored handle to its entity. `Ok(None)` means the handle is
    /// valid but the entity has been removed (or is being removed).
    pub fn resolve<H: EntityHandle>(&self, tag: &str) -> SimResult<Option<&Entity>> {
        let handle = self.retrieve::<H>(tag)?;
        Ok(self.live(handle.id()))
    }

    /// The player, if still alive
    pub fn player(&self) -> SimResult<Option<&Entity>> {
        self.resolve::<PlayerHandle>(PLAYER_TAG)
    }

    /// Shape of the boundary wall
    pub fn wall_shape(&self) -> SimResult<&Polygon> {
        let handle = *self.retrieve::<WallHandle>(WALL_TAG)?;
        self.slots
            .get(&handle.0)
            .map(|wall| &wall.shape)
            .ok_or(SimError::StaleEntity {
                tag: WALL_TAG.to_string(),
                id: handle.0,
            })
    }

    /// Check the named singletons behaviours depend on are present
    pub fn require_wiring(&self) -> SimResult<()> {
        self.retrieve::<PlayerHandle>(PLAYER_TAG)?;
        self.wall_shape()?;
        Ok(())
    }

    /// World position at the centre of the view: the player, or the middle of
    /// the window once the player is gone
    pub fn scroll_point(&self) -> Vec2 {
        self.retrieve::<PlayerHandle>(PLAYER_TAG)
            .ok()
            .and_then(|handle| self.slots.get(&handle.0))
            .map(|player| player.shape.position)
            .unwrap_or(WINDOW_SIZE / 2.0)
    }
}
