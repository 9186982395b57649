#![forbid(unsafe_code)]

//! Entity storage in paint order.
//!
//! [`Scene`] owns every entity. Pointer records and hit results refer to
//! entities by [`EntityId`] only and resolve them through [`EntityStore`],
//! so removing an entity never leaves a dangling reference behind; a stale
//! id simply resolves to `None`.

use crate::entity::{AffineState, Entity, EntityId};
use crate::error::EntityError;
use crate::geometry::Rect;

/// Id-based entity lookup.
pub trait EntityStore {
    fn entity(&self, id: EntityId) -> Option<&Entity>;
    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity>;
}

impl EntityStore for [Entity] {
    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|e| e.id() == id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.iter_mut().find(|e| e.id() == id)
    }
}

/// Entities ordered back (index 0) to front (last).
#[derive(Debug, Clone)]
pub struct Scene {
    entities: Vec<Entity>,
    next_id: u32,
    min_scale: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_scale(crate::entity::DEFAULT_MIN_SCALE)
    }

    /// Scene whose new entities use `min_scale` as their scale floor.
    #[must_use]
    pub fn with_min_scale(min_scale: f64) -> Self {
        Self {
            entities: Vec::new(),
            next_id: 0,
            min_scale,
        }
    }

    /// Add an untransformed entity on top.
    pub fn add(&mut self, base: Rect) -> Result<EntityId, EntityError> {
        self.add_with(base, AffineState::default())
    }

    /// Add an entity with an initial transform on top.
    ///
    /// Ids are never reused, so a stale id cannot name a newer entity.
    pub fn add_with(&mut self, base: Rect, state: AffineState) -> Result<EntityId, EntityError> {
        let id = EntityId(self.next_id);
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or(EntityError::IdsExhausted)?;
        let entity = Entity::with_state(id, base, state, self.min_scale)?;
        self.next_id = next_id;
        self.entities.push(entity);
        Ok(id)
    }

    /// Remove and return an entity.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.position(id)?;
        Some(self.entities.remove(idx))
    }

    /// Move `id` to the top of the paint order. Returns false if absent.
    pub fn bring_to_front(&mut self, id: EntityId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        if idx + 1 != self.entities.len() {
            let entity = self.entities.remove(idx);
            self.entities.push(entity);
        }
        true
    }

    /// Topmost entity first; the order hit testing uses.
    pub fn front_to_back(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().rev()
    }

    /// Bottom entity first; the order painting uses.
    pub fn back_to_front(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }
}

impl EntityStore for Scene {
    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.entity(id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.entity_mut(id)
    }
}
