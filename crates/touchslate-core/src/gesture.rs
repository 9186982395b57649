#![forbid(unsafe_code)]

//! Gesture transforms: turns one pointer's movement into a pan, or a
//! rotate+scale step, on the entity that pointer is bound to.
//!
//! [`GestureEngine`] is stateless apart from its configuration. The pointer
//! tracker calls [`GestureEngine::apply`] once per pointer that moved past
//! the jitter threshold.
//!
//! # Contact count dispatch
//!
//! - **1 contact**: translate by the pointer's delta.
//! - **2 contacts**: the *other* contact is the fixed pointer. The change in
//!   distance from the fixed pointer drives scale; the change in inclination
//!   of the fixed→moving line drives rotation.
//! - **0 or 3 contacts**: nothing happens.
//!
//! # Invariants
//!
//! 1. The fixed pointer's position is read from the caller's pre-event
//!    snapshot, so the result does not depend on pointer iteration order.
//! 2. A rotation step whose magnitude exceeds `max_rotation_step` is treated
//!    as the 180° periodicity of [`inclination`] and replaced by zero.
//! 3. Scale changes never take an axis to or below `min_scale`.
//!
//! # Failure Modes
//!
//! - Degenerate two-finger configurations return
//!   [`GestureSkip::Degenerate`]; the entity is left exactly as it was.
//! - Locked entities return [`GestureSkip::Locked`] without computing
//!   anything.

use crate::config::GestureConfig;
use crate::entity::{Entity, RotateScaleOutcome};
use crate::error::DegenerateGeometry;
use crate::event::{PointerId, PointerPosition};
use crate::geometry::{Point, distance, inclination};

/// Positions involved in one two-finger step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoFingerStep {
    /// Fixed pointer, held still for this step.
    pub fixed: Point,
    /// Moving pointer before the event.
    pub previous: Point,
    /// Moving pointer after the event.
    pub current: Point,
}

/// Result of the pure rotate/scale computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateScale {
    pub old_distance: f64,
    pub new_distance: f64,
    /// Rotation step in degrees, after the wraparound guard.
    pub theta: f64,
    /// Amount added to each scale factor.
    pub scale_delta: f64,
}

/// Why a pointer's move produced no transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSkip {
    /// The entity is locked.
    Locked,
    /// The moving pointer is not one of the entity's contacts.
    NotAContact,
    /// Zero or more than two contacts are bound.
    UnsupportedContactCount { count: usize },
    /// Two-finger geometry could not be evaluated.
    Degenerate(DegenerateGeometry),
}

/// What a single gesture step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Translated {
        dx: i32,
        dy: i32,
    },
    RotatedScaled {
        step: RotateScale,
        applied: RotateScaleOutcome,
    },
    Skipped(GestureSkip),
}

impl GestureOutcome {
    /// The entity's affine state changed.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Converts pointer deltas into entity transforms.
#[derive(Debug, Clone, Default)]
pub struct GestureEngine {
    config: GestureConfig,
}

impl GestureEngine {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Compute the rotation and scale change for one two-finger step.
    pub fn rotate_scale(&self, step: TwoFingerStep) -> Result<RotateScale, DegenerateGeometry> {
        if !(step.fixed.is_finite() && step.previous.is_finite() && step.current.is_finite()) {
            return Err(DegenerateGeometry::NonFinite);
        }
        if step.fixed == step.previous {
            return Err(DegenerateGeometry::CoincidentPointers);
        }

        let old_distance = distance(step.fixed, step.previous);
        let new_distance = distance(step.fixed, step.current);
        let angle_old = inclination(step.fixed, step.previous);
        let angle_new = inclination(step.fixed, step.current);

        let mut theta = angle_new - angle_old;
        if theta.abs() > self.config.max_rotation_step {
            theta = 0.0;
        }
        let scale_delta = (new_distance - old_distance) * self.config.scale_granularity;

        if !(old_distance.is_finite()
            && new_distance.is_finite()
            && theta.is_finite()
            && scale_delta.is_finite())
        {
            return Err(DegenerateGeometry::NonFinite);
        }
        Ok(RotateScale {
            old_distance,
            new_distance,
            theta,
            scale_delta,
        })
    }

    /// Apply the movement of `moving` from `previous` to `current` to `entity`.
    ///
    /// `fixed_position` resolves a partner pointer id to its pre-event
    /// position; `None` means the partner has no live record.
    pub fn apply<F>(
        &self,
        entity: &mut Entity,
        moving: PointerId,
        previous: PointerPosition,
        current: PointerPosition,
        fixed_position: F,
    ) -> GestureOutcome
    where
        F: Fn(PointerId) -> Option<PointerPosition>,
    {
        let outcome = self.evaluate(entity, moving, previous, current, fixed_position);
        match outcome {
            GestureOutcome::Translated { dx, dy } => tracing::debug!(
                target: "touchslate.gesture",
                entity = entity.id().get(),
                pointer = moving.0,
                dx,
                dy,
                "pan applied"
            ),
            GestureOutcome::RotatedScaled { step, applied } => tracing::debug!(
                target: "touchslate.gesture",
                entity = entity.id().get(),
                pointer = moving.0,
                theta = step.theta,
                scale_delta = step.scale_delta,
                sx_accepted = applied.sx_accepted,
                sy_accepted = applied.sy_accepted,
                "rotate/scale applied"
            ),
            GestureOutcome::Skipped(reason) => tracing::debug!(
                target: "touchslate.gesture",
                entity = entity.id().get(),
                pointer = moving.0,
                reason = ?reason,
                "gesture skipped"
            ),
        }
        outcome
    }

    fn evaluate<F>(
        &self,
        entity: &mut Entity,
        moving: PointerId,
        previous: PointerPosition,
        current: PointerPosition,
        fixed_position: F,
    ) -> GestureOutcome
    where
        F: Fn(PointerId) -> Option<PointerPosition>,
    {
        if entity.is_locked() {
            return GestureOutcome::Skipped(GestureSkip::Locked);
        }
        if !entity.contacts().contains(moving) {
            return GestureOutcome::Skipped(GestureSkip::NotAContact);
        }

        match entity.contact_count() {
            1 => {
                let (dx, dy) = current.delta_from(previous);
                entity.apply_translate(f64::from(dx), f64::from(dy));
                GestureOutcome::Translated { dx, dy }
            }
            2 => {
                let Some(partner) = entity.contacts().partner_of(moving) else {
                    return GestureOutcome::Skipped(GestureSkip::UnsupportedContactCount {
                        count: 2,
                    });
                };
                let Some(fixed) = fixed_position(partner.pointer_id) else {
                    return GestureOutcome::Skipped(GestureSkip::Degenerate(
                        DegenerateGeometry::MissingFixedPointer,
                    ));
                };
                let step = TwoFingerStep {
                    fixed: fixed.into(),
                    previous: previous.into(),
                    current: current.into(),
                };
                match self.rotate_scale(step) {
                    Ok(step) => {
                        let applied = entity.apply_rotate_scale(step.theta, step.scale_delta);
                        GestureOutcome::RotatedScaled { step, applied }
                    }
                    Err(err) => GestureOutcome::Skipped(GestureSkip::Degenerate(err)),
                }
            }
            count => GestureOutcome::Skipped(GestureSkip::UnsupportedContactCount { count }),
        }
    }
}
