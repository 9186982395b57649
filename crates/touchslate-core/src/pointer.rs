#![forbid(unsafe_code)]

//! Pointer lifecycle tracking.
//!
//! [`PointerTracker`] binds each pointer id to the entity it went down on and
//! keeps that binding until the pointer's Up. Platforms report Move events as
//! a flat list of every touching pointer without saying which one moved, so
//! the tracker compares every pointer against its last stored position.
//!
//! # Invariants
//!
//! 1. A pointer id is bound to at most one entity, and that entity's contact
//!    set holds exactly one contact with that id.
//! 2. A Down always fully reinitialises the record for its id, releasing any
//!    binding a missed Up left behind.
//! 3. Within one Move event, pointers are processed in index order and each
//!    position is committed right after its own transform. Two-finger steps
//!    read the fixed pointer from a snapshot taken before the loop.
//!
//! # Failure Modes
//!
//! - Up for an unknown id, Down on a full entity and bindings to removed
//!   entities are ignored with a `warn` log; nothing propagates.

use ahash::AHashMap;

use crate::entity::{ContactRejection, EntityId};
use crate::error::ActionError;
use crate::event::{PointerId, PointerPosition, TouchKind, TouchPointer};
use crate::gesture::{GestureEngine, GestureOutcome};
use crate::hit::HitTarget;
use crate::scene::EntityStore;

/// Platform action-code layout.
pub mod raw {
    /// Bits holding the action kind.
    pub const ACTION_MASK: u32 = 0xff;
    /// Bits holding the index of the pointer a Down/Up refers to.
    pub const ACTION_POINTER_INDEX_MASK: u32 = 0xff00;
    pub const ACTION_POINTER_INDEX_SHIFT: u32 = 8;

    pub const ACTION_DOWN: u32 = 0;
    pub const ACTION_UP: u32 = 1;
    pub const ACTION_MOVE: u32 = 2;
    /// Gesture aborted by the platform. Not acted on: pointers stay bound
    /// until their own Up.
    pub const ACTION_CANCEL: u32 = 3;
    pub const ACTION_OUTSIDE: u32 = 4;
    /// Secondary pointer down; normalises to [`ACTION_DOWN`].
    pub const ACTION_POINTER_DOWN: u32 = 5;
    /// Secondary pointer up; normalises to [`ACTION_UP`].
    pub const ACTION_POINTER_UP: u32 = 6;
}

/// Kind and pointer index decoded from a raw action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAction {
    pub kind: TouchKind,
    /// Index of the addressed pointer. Always 0 for Move.
    pub pointer_index: usize,
}

/// Decode a platform action code for an event carrying `pointer_count`
/// pointers.
///
/// Secondary-pointer kinds are folded back onto Down/Up. The pointer index
/// is only read from the code when more than one pointer is present. Any
/// other kind, Cancel included, is [`ActionError::UnsupportedAction`].
pub fn resolve_action(code: u32, pointer_count: usize) -> Result<ResolvedAction, ActionError> {
    let mut masked = code & raw::ACTION_MASK;
    if masked > raw::ACTION_OUTSIDE && masked <= raw::ACTION_POINTER_UP {
        masked -= raw::ACTION_POINTER_DOWN;
    }
    let kind = match masked {
        raw::ACTION_DOWN => TouchKind::Down,
        raw::ACTION_UP => TouchKind::Up,
        raw::ACTION_MOVE => TouchKind::Move,
        _ => return Err(ActionError::UnsupportedAction { code }),
    };

    let pointer_index = match kind {
        TouchKind::Down | TouchKind::Up if pointer_count > 1 => {
            ((code & raw::ACTION_POINTER_INDEX_MASK) >> raw::ACTION_POINTER_INDEX_SHIFT) as usize
        }
        _ => 0,
    };
    if pointer_count > 0 && pointer_index >= pointer_count {
        return Err(ActionError::PointerIndexOutOfRange {
            index: pointer_index,
            count: pointer_count,
        });
    }
    Ok(ResolvedAction {
        kind,
        pointer_index,
    })
}

/// Entity a pointer record refers to. Never an owning reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerBinding {
    /// Touching empty space, overflowed, or released.
    #[default]
    Unbound,
    Entity(EntityId),
}

impl PointerBinding {
    #[inline]
    #[must_use]
    pub const fn entity(self) -> Option<EntityId> {
        match self {
            Self::Unbound => None,
            Self::Entity(id) => Some(id),
        }
    }
}

/// Last known state of one pointer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerRecord {
    pub position: PointerPosition,
    pub binding: PointerBinding,
    pub pressed: bool,
}

impl PointerRecord {
    /// Bound to an entity and still pressed.
    #[inline]
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.pressed && matches!(self.binding, PointerBinding::Entity(_))
    }
}

/// Marker data for drawing pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerMarker {
    pub id: PointerId,
    pub position: PointerPosition,
    pub pressed: bool,
}

/// Result of [`PointerTracker::on_down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownOutcome {
    pub pointer: PointerId,
    /// Entity the pointer is now bound to.
    pub bound: Option<EntityId>,
    /// Contact count of `bound` after the Down.
    pub contact_count: usize,
    /// Set when the hit entity refused the contact.
    pub rejected: Option<ContactRejection>,
    /// Entity the caller should raise to the top of the paint order.
    pub bring_to_front: Option<EntityId>,
    /// A stale binding for the same id that this Down released.
    pub released_stale: Option<EntityId>,
}

/// Result of [`PointerTracker::on_up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpOutcome {
    /// The pointer's contact was removed from this entity.
    Released { entity: EntityId, remaining: usize },
    /// The pointer was tracked but not bound to a live entity.
    Unbound,
    /// No record exists for this id.
    Unknown,
}

/// What a Move did for one pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No record for this id.
    Untracked,
    /// Tracked, but touching empty space.
    Unbound,
    /// Position unchanged since the last event.
    Stationary,
    /// Below the jitter threshold; position stored, no transform.
    Jitter,
    /// Bound entity no longer exists.
    DanglingEntity(EntityId),
    Gesture(GestureOutcome),
}

/// Per-pointer report from [`PointerTracker::on_move`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveReport {
    pub pointer: PointerId,
    pub entity: Option<EntityId>,
    pub dx: i32,
    pub dy: i32,
    pub outcome: MoveOutcome,
}

/// Table of pointer records for one interaction surface.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    records: AHashMap<PointerId, PointerRecord>,
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `id`, including released (stale) records.
    #[must_use]
    pub fn record(&self, id: PointerId) -> Option<&PointerRecord> {
        self.records.get(&id)
    }

    /// Entity `id` is currently bound to.
    #[must_use]
    pub fn binding_of(&self, id: PointerId) -> Option<EntityId> {
        self.records
            .get(&id)
            .filter(|r| r.is_bound())
            .and_then(|r| r.binding.entity())
    }

    /// Ids of every pressed pointer, ascending.
    #[must_use]
    pub fn pressed_ids(&self) -> Vec<PointerId> {
        let mut ids: Vec<_> = self
            .records
            .iter()
            .filter(|(_, r)| r.pressed)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every known pointer with its position and pressed flag, by id.
    #[must_use]
    pub fn current_positions(&self) -> Vec<PointerMarker> {
        let mut markers: Vec<_> = self
            .records
            .iter()
            .map(|(id, r)| PointerMarker {
                id: *id,
                position: r.position,
                pressed: r.pressed,
            })
            .collect();
        markers.sort_by_key(|m| m.id);
        markers
    }

    /// Handle a pointer going down on `hit`.
    pub fn on_down<S>(&mut self, pointer: TouchPointer, hit: HitTarget, store: &mut S) -> DownOutcome
    where
        S: EntityStore + ?Sized,
    {
        let released_stale = self.release_stale(pointer.id, store);

        let mut outcome = DownOutcome {
            pointer: pointer.id,
            bound: None,
            contact_count: 0,
            rejected: None,
            bring_to_front: None,
            released_stale,
        };
        let mut record = PointerRecord {
            position: pointer.position,
            binding: PointerBinding::Unbound,
            pressed: true,
        };

        if let HitTarget::Entity(entity_id) = hit {
            match store.entity_mut(entity_id) {
                Some(entity) => match entity.add_contact(pointer.id) {
                    Ok(count) => {
                        entity.set_high_quality(true);
                        record.binding = PointerBinding::Entity(entity_id);
                        outcome.bound = Some(entity_id);
                        outcome.contact_count = count;
                        outcome.bring_to_front = Some(entity_id);
                    }
                    Err(rejection) => {
                        tracing::warn!(
                            target: "touchslate.pointer",
                            pointer = pointer.id.0,
                            entity = entity_id.get(),
                            rejection = ?rejection,
                            "contact refused; pointer left unbound"
                        );
                        outcome.contact_count = entity.contact_count();
                        outcome.rejected = Some(rejection);
                    }
                },
                None => tracing::warn!(
                    target: "touchslate.pointer",
                    pointer = pointer.id.0,
                    entity = entity_id.get(),
                    "down hit a missing entity; treated as background"
                ),
            }
        }

        tracing::debug!(
            target: "touchslate.pointer",
            pointer = pointer.id.0,
            x = pointer.position.x,
            y = pointer.position.y,
            bound = ?outcome.bound,
            contacts = outcome.contact_count,
            "pointer down"
        );
        self.records.insert(pointer.id, record);
        outcome
    }

    /// Handle a pointer going up. Unknown ids are a silent no-op.
    pub fn on_up<S>(&mut self, id: PointerId, store: &mut S) -> UpOutcome
    where
        S: EntityStore + ?Sized,
    {
        let Some(record) = self.records.get_mut(&id) else {
            tracing::warn!(
                target: "touchslate.pointer",
                pointer = id.0,
                "up for unknown pointer ignored"
            );
            return UpOutcome::Unknown;
        };

        let bound = record.is_bound().then(|| record.binding.entity()).flatten();
        record.binding = PointerBinding::Unbound;
        record.pressed = false;

        let released = match bound {
            Some(entity_id) => store.entity_mut(entity_id).map(|entity| {
                entity.remove_contact(id);
                entity.set_high_quality(false);
                UpOutcome::Released {
                    entity: entity_id,
                    remaining: entity.contact_count(),
                }
            }),
            None => None,
        };
        let outcome = released.unwrap_or(UpOutcome::Unbound);
        tracing::debug!(
            target: "touchslate.pointer",
            pointer = id.0,
            outcome = ?outcome,
            "pointer up"
        );
        outcome
    }

    /// Resolve a Move event carrying every touching pointer.
    pub fn on_move<S>(
        &mut self,
        pointers: &[TouchPointer],
        store: &mut S,
        engine: &GestureEngine,
    ) -> Vec<MoveReport>
    where
        S: EntityStore + ?Sized,
    {
        let snapshot: Vec<(PointerId, PointerPosition)> = self
            .records
            .iter()
            .filter(|(_, r)| r.is_bound())
            .map(|(id, r)| (*id, r.position))
            .collect();
        let fixed_position = |id: PointerId| {
            snapshot
                .iter()
                .find(|(pid, _)| *pid == id)
                .map(|(_, pos)| *pos)
        };
        let threshold = engine.config().jitter_threshold.unsigned_abs();

        let mut reports = Vec::with_capacity(pointers.len());
        for pointer in pointers {
            let Some(record) = self.records.get_mut(&pointer.id) else {
                reports.push(MoveReport {
                    pointer: pointer.id,
                    entity: None,
                    dx: 0,
                    dy: 0,
                    outcome: MoveOutcome::Untracked,
                });
                continue;
            };

            let previous = record.position;
            let (dx, dy) = pointer.position.delta_from(previous);
            let entity_id = record.is_bound().then(|| record.binding.entity()).flatten();
            let mut report = MoveReport {
                pointer: pointer.id,
                entity: entity_id,
                dx,
                dy,
                outcome: MoveOutcome::Unbound,
            };

            if let Some(entity_id) = entity_id {
                if dx == 0 && dy == 0 {
                    report.outcome = MoveOutcome::Stationary;
                    reports.push(report);
                    continue;
                }
                report.outcome = if dx.unsigned_abs() < threshold && dy.unsigned_abs() < threshold {
                    tracing::trace!(
                        target: "touchslate.pointer",
                        pointer = pointer.id.0,
                        dx,
                        dy,
                        "jitter"
                    );
                    MoveOutcome::Jitter
                } else {
                    match store.entity_mut(entity_id) {
                        Some(entity) => MoveOutcome::Gesture(engine.apply(
                            entity,
                            pointer.id,
                            previous,
                            pointer.position,
                            fixed_position,
                        )),
                        None => {
                            tracing::warn!(
                                target: "touchslate.pointer",
                                pointer = pointer.id.0,
                                entity = entity_id.get(),
                                "bound entity no longer exists"
                            );
                            MoveOutcome::DanglingEntity(entity_id)
                        }
                    }
                };
            }

            record.position = pointer.position;
            reports.push(report);
        }
        reports
    }

    /// Drop a binding left behind by a Down without a matching Up.
    fn release_stale<S>(&mut self, id: PointerId, store: &mut S) -> Option<EntityId>
    where
        S: EntityStore + ?Sized,
    {
        let record = self.records.get(&id).filter(|r| r.is_bound())?;
        let entity_id = record.binding.entity()?;
        if let Some(entity) = store.entity_mut(entity_id) {
            entity.remove_contact(id);
        }
        tracing::warn!(
            target: "touchslate.pointer",
            pointer = id.0,
            entity = entity_id.get(),
            "down for a pointer that never went up; old contact released"
        );
        Some(entity_id)
    }
}
