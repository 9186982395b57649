#![forbid(unsafe_code)]

//! Transformable entities: affine state, contact bookkeeping and the
//! clamped mutations the gesture engine drives.
//!
//! # Invariants
//!
//! 1. `sx` and `sy` stay strictly above the entity's scale floor.
//! 2. A pointer id appears at most once in an entity's [`ContactSet`].
//! 3. A locked entity tracks contacts but ignores every transform.

use std::fmt;

use bitflags::bitflags;

use crate::error::EntityError;
use crate::event::PointerId;
use crate::geometry::{Point, Rect};
use crate::roi::Roi;

/// Scale factors may never reach this value.
pub const DEFAULT_MIN_SCALE: f64 = 0.5;

/// Number of simultaneous contacts one entity can hold.
pub const CONTACT_CAPACITY: usize = 3;

/// Stable handle naming an entity inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Raw numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Translation, rotation and non-uniform scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineState {
    /// Rotation in degrees. Unbounded; trigonometry wraps it.
    pub angle: f64,
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            sx: 1.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

impl AffineState {
    /// Angle and translation are finite and both scales are above `min_scale`.
    #[must_use]
    pub fn is_valid(&self, min_scale: f64) -> bool {
        self.angle.is_finite()
            && self.tx.is_finite()
            && self.ty.is_finite()
            && self.sx.is_finite()
            && self.sy.is_finite()
            && self.sx > min_scale
            && self.sy > min_scale
    }
}

bitflags! {
    /// Presentation and policy flags carried by an entity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntityFlags: u8 {
        /// Transforms are ignored; contacts are still tracked.
        const LOCKED       = 0b0000_0001;
        /// Selection marker toggled together with the lock.
        const MARKED       = 0b0000_0010;
        /// Renderer should use the full-resolution source.
        const HIGH_QUALITY = 0b0000_0100;
    }
}

/// A pointer bound to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub pointer_id: PointerId,
}

/// Why [`ContactSet::add`] refused a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRejection {
    /// All slots are taken.
    Full,
    /// The pointer is already in the set.
    AlreadyPresent,
}

/// Unordered, fixed-capacity set of contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSet {
    slots: [Option<Contact>; CONTACT_CAPACITY],
}

impl ContactSet {
    /// Place `contact` in the first free slot. Returns the new count.
    pub fn add(&mut self, contact: Contact) -> Result<usize, ContactRejection> {
        if self.contains(contact.pointer_id) {
            return Err(ContactRejection::AlreadyPresent);
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(ContactRejection::Full)?;
        *slot = Some(contact);
        Ok(self.len())
    }

    /// Clear the slot holding `pointer_id`. Returns the removed contact.
    pub fn remove(&mut self, pointer_id: PointerId) -> Option<Contact> {
        self.slots
            .iter_mut()
            .find(|slot| slot.is_some_and(|c| c.pointer_id == pointer_id))
            .and_then(Option::take)
    }

    #[must_use]
    pub fn contains(&self, pointer_id: PointerId) -> bool {
        self.iter().any(|c| c.pointer_id == pointer_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.slots.iter().flatten()
    }

    /// The single contact that is not `pointer_id`, if exactly two are bound.
    #[must_use]
    pub fn partner_of(&self, pointer_id: PointerId) -> Option<Contact> {
        if self.len() != 2 {
            return None;
        }
        self.iter().find(|c| c.pointer_id != pointer_id).copied()
    }
}

/// What an [`Entity::apply_rotate_scale`] call actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotateScaleOutcome {
    pub rotated: bool,
    pub sx_accepted: bool,
    pub sy_accepted: bool,
}

/// A manipulable rectangle with its own affine transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    base: Rect,
    state: AffineState,
    min_scale: f64,
    contacts: ContactSet,
    flags: EntityFlags,
}

impl Entity {
    /// Entity at `base` with the identity transform.
    #[must_use]
    pub fn new(id: EntityId, base: Rect) -> Self {
        Self {
            id,
            base,
            state: AffineState::default(),
            min_scale: DEFAULT_MIN_SCALE,
            contacts: ContactSet::default(),
            flags: EntityFlags::empty(),
        }
    }

    /// Entity with an initial transform and scale floor.
    pub fn with_state(
        id: EntityId,
        base: Rect,
        state: AffineState,
        min_scale: f64,
    ) -> Result<Self, EntityError> {
        if base.is_empty() {
            return Err(EntityError::EmptyBase { base });
        }
        if !state.is_valid(min_scale) {
            return Err(EntityError::InvalidState { state, min_scale });
        }
        Ok(Self {
            state,
            min_scale,
            ..Self::new(id, base)
        })
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Untransformed base rectangle.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> Rect {
        self.base
    }

    /// Current affine state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &AffineState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub const fn min_scale(&self) -> f64 {
        self.min_scale
    }

    #[inline]
    #[must_use]
    pub const fn flags(&self) -> EntityFlags {
        self.flags
    }

    #[inline]
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.flags.contains(EntityFlags::LOCKED)
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.flags.set(EntityFlags::LOCKED, locked);
    }

    #[inline]
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.flags.contains(EntityFlags::MARKED)
    }

    pub fn set_marked(&mut self, marked: bool) {
        self.flags.set(EntityFlags::MARKED, marked);
    }

    #[inline]
    #[must_use]
    pub const fn wants_high_quality(&self) -> bool {
        self.flags.contains(EntityFlags::HIGH_QUALITY)
    }

    pub fn set_high_quality(&mut self, high_quality: bool) {
        self.flags.set(EntityFlags::HIGH_QUALITY, high_quality);
    }

    /// At least one pointer is bound; renderers draw the touch highlight.
    #[must_use]
    pub fn is_touched(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// Flip both the lock and the selection marker.
    pub fn toggle_lock(&mut self) {
        self.flags.toggle(EntityFlags::LOCKED | EntityFlags::MARKED);
    }

    /// Bind `pointer_id`. Returns the new contact count.
    pub fn add_contact(&mut self, pointer_id: PointerId) -> Result<usize, ContactRejection> {
        self.contacts.add(Contact { pointer_id })
    }

    /// Release `pointer_id`. A miss is a no-op.
    pub fn remove_contact(&mut self, pointer_id: PointerId) -> Option<Contact> {
        self.contacts.remove(pointer_id)
    }

    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub const fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    /// Shift the translation. Returns `false` when locked.
    pub fn apply_translate(&mut self, dx: f64, dy: f64) -> bool {
        if self.is_locked() {
            return false;
        }
        self.state.tx += dx;
        self.state.ty += dy;
        self.set_high_quality(true);
        true
    }

    /// Add `theta` degrees of rotation and `scale_delta` to both scales.
    ///
    /// Each axis only accepts a new scale strictly above the floor; the other
    /// axis and the rotation are unaffected by a rejection.
    pub fn apply_rotate_scale(&mut self, theta: f64, scale_delta: f64) -> RotateScaleOutcome {
        if self.is_locked() {
            return RotateScaleOutcome::default();
        }
        let mut outcome = RotateScaleOutcome::default();
        if theta.is_finite() {
            self.state.angle += theta;
            outcome.rotated = theta != 0.0;
        }
        let sx = self.state.sx + scale_delta;
        if sx.is_finite() && sx > self.min_scale {
            self.state.sx = sx;
            outcome.sx_accepted = true;
        }
        let sy = self.state.sy + scale_delta;
        if sy.is_finite() && sy > self.min_scale {
            self.state.sy = sy;
            outcome.sy_accepted = true;
        }
        self.set_high_quality(true);
        outcome
    }

    /// Replace the angle outright, bypassing the gesture path.
    pub fn set_angle(&mut self, degrees: f64) -> bool {
        if self.is_locked() || !degrees.is_finite() {
            return false;
        }
        self.state.angle = degrees;
        true
    }

    /// Pivot for rotation and scaling: the translated base centre.
    #[must_use]
    pub fn center(&self) -> Point {
        let c = self.base.center();
        Point::new(c.x + self.state.tx, c.y + self.state.ty)
    }

    /// Region currently covered on screen.
    #[must_use]
    pub fn compute_roi(&self) -> Roi {
        Roi::from_transform(self.base, &self.state)
    }

    #[must_use]
    pub fn point_in_roi(&self, x: i32, y: i32) -> bool {
        self.compute_roi().contains(f64::from(x), f64::from(y))
    }

    /// Square a renderer must repaint to cover the entity at any rotation.
    #[must_use]
    pub fn invalidation_bounds(&self) -> Rect {
        self.compute_roi().invalidation_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Entity {
        Entity::new(EntityId(7), Rect::new(100, 100, 200, 200))
    }

    #[test]
    fn contacts_fill_first_free_slot() {
        let mut e = entity();
        assert_eq!(e.add_contact(PointerId(1)), Ok(1));
        assert_eq!(e.add_contact(PointerId(2)), Ok(2));
        assert!(e.remove_contact(PointerId(1)).is_some());
        assert_eq!(e.add_contact(PointerId(3)), Ok(2));
        let ids: Vec<_> = e.contacts().iter().map(|c| c.pointer_id).collect();
        assert_eq!(ids, vec![PointerId(3), PointerId(2)]);
    }

    #[test]
    fn contact_overflow_and_duplicates_are_rejected() {
        let mut e = entity();
        for id in 0..3 {
            assert!(e.add_contact(PointerId(id)).is_ok());
        }
        assert_eq!(
            e.add_contact(PointerId(9)),
            Err(ContactRejection::Full)
        );
        assert_eq!(
            e.add_contact(PointerId(1)),
            Err(ContactRejection::AlreadyPresent)
        );
        assert_eq!(e.contact_count(), 3);
    }

    #[test]
    fn remove_missing_contact_is_noop() {
        let mut e = entity();
        e.add_contact(PointerId(1)).unwrap();
        assert!(e.remove_contact(PointerId(42)).is_none());
        assert_eq!(e.contact_count(), 1);
    }

    #[test]
    fn partner_requires_exactly_two() {
        let mut e = entity();
        e.add_contact(PointerId(1)).unwrap();
        assert!(e.contacts().partner_of(PointerId(1)).is_none());
        e.add_contact(PointerId(2)).unwrap();
        let partner = e.contacts().partner_of(PointerId(2)).unwrap();
        assert_eq!(partner.pointer_id, PointerId(1));
    }

    #[test]
    fn translate_and_inverse() {
        let mut e = entity();
        assert!(e.apply_translate(10.0, -4.0));
        assert!(e.apply_translate(-10.0, 4.0));
        assert_eq!(e.state().tx, 0.0);
        assert_eq!(e.state().ty, 0.0);
        assert!(e.wants_high_quality());
    }

    #[test]
    fn scale_floor_rejects_shrink_past_half() {
        let mut e = entity();
        let outcome = e.apply_rotate_scale(0.0, -0.4);
        assert!(outcome.sx_accepted && outcome.sy_accepted);
        assert!((e.state().sx - 0.6).abs() < 1e-12);
        let outcome = e.apply_rotate_scale(0.0, -0.1);
        assert!(!outcome.sx_accepted && !outcome.sy_accepted);
        assert!((e.state().sx - 0.6).abs() < 1e-12);
    }

    #[test]
    fn locked_entity_ignores_transforms_but_tracks_contacts() {
        let mut e = entity();
        e.toggle_lock();
        assert!(e.is_locked() && e.is_marked());
        assert!(!e.apply_translate(5.0, 5.0));
        assert_eq!(e.apply_rotate_scale(30.0, 1.0), RotateScaleOutcome::default());
        assert!(!e.set_angle(12.0));
        assert_eq!(*e.state(), AffineState::default());
        assert_eq!(e.add_contact(PointerId(1)), Ok(1));
        assert!(e.is_touched());
    }

    #[test]
    fn with_state_validates_scale_floor() {
        let base = Rect::new(0, 0, 10, 10);
        let bad = AffineState {
            sx: 0.5,
            ..AffineState::default()
        };
        assert!(Entity::with_state(EntityId(1), base, bad, DEFAULT_MIN_SCALE).is_err());
        assert!(
            Entity::with_state(EntityId(1), Rect::new(0, 0, 0, 5), AffineState::default(), 0.5)
                .is_err()
        );
        let ok = AffineState {
            angle: 30.0,
            ..AffineState::default()
        };
        let e = Entity::with_state(EntityId(1), base, ok, DEFAULT_MIN_SCALE).unwrap();
        assert_eq!(e.state().angle, 30.0);
    }

    #[test]
    fn center_follows_translation() {
        let mut e = entity();
        e.apply_translate(10.0, 20.0);
        assert_eq!(e.center(), Point::new(210.0, 220.0));
        assert!(e.point_in_roi(305, 315));
        assert!(!e.point_in_roi(105, 105));
    }
}
