#![forbid(unsafe_code)]

//! Touch surface: one scene, one pointer table, one gesture engine.
//!
//! [`TouchSurface`] is what a host talks to. It takes normalized (or raw)
//! touch events, runs them through hit testing, pointer tracking and the
//! gesture engine, and reports what happened in a [`SurfaceDispatch`] so the
//! renderer knows what to raise and repaint.
//!
//! # Example
//!
//! ```
//! use touchslate_core::{Rect, TouchEvent, TouchPointer, TouchSurface};
//!
//! let mut surface = TouchSurface::default();
//! let id = surface.add_entity(Rect::new(100, 100, 200, 200)).unwrap();
//!
//! surface.dispatch(&TouchEvent::down(1, 150, 150));
//! surface.dispatch(&TouchEvent::moved(vec![TouchPointer::new(1, 160, 170)]));
//! surface.dispatch(&TouchEvent::up(1, 160, 170));
//!
//! let state = surface.entity(id).unwrap().state();
//! assert_eq!((state.tx, state.ty), (10.0, 20.0));
//! ```

use crate::config::GestureConfig;
use crate::entity::{AffineState, CONTACT_CAPACITY, Entity, EntityId};
use crate::error::{ActionError, ConfigError, EntityError};
use crate::event::{PointerId, TouchEvent, TouchKind, TouchPointer};
use crate::geometry::Rect;
use crate::gesture::GestureEngine;
use crate::hit::{HitTarget, hit_test};
use crate::pointer::{DownOutcome, MoveOutcome, MoveReport, PointerMarker, PointerTracker, UpOutcome};
use crate::scene::{EntityStore, Scene};

/// Everything one dispatched event changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDispatch {
    pub kind: TouchKind,
    /// Pointer a Down/Up addressed.
    pub pointer: Option<PointerId>,
    /// Hit result of a Down; `Background` otherwise.
    pub hit: HitTarget,
    pub down: Option<DownOutcome>,
    /// Pointers released by an Up.
    pub released: Vec<(PointerId, UpOutcome)>,
    /// Per-pointer results of a Move, in event order.
    pub moves: Vec<MoveReport>,
    /// Entity moved to the top of the paint order.
    pub raised: Option<EntityId>,
    /// Entity whose lock and marker flipped.
    pub lock_toggled: Option<EntityId>,
    /// Screen areas to redraw, before and after each change.
    pub repaint: Vec<Rect>,
}

impl SurfaceDispatch {
    fn empty(kind: TouchKind) -> Self {
        Self {
            kind,
            pointer: None,
            hit: HitTarget::Background,
            down: None,
            released: Vec::new(),
            moves: Vec::new(),
            raised: None,
            lock_toggled: None,
            repaint: Vec::new(),
        }
    }

    /// Number of pointers whose move changed an entity's transform.
    #[must_use]
    pub fn applied_gestures(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| matches!(m.outcome, MoveOutcome::Gesture(g) if g.is_applied()))
            .count()
    }
}

/// Multi-touch manipulation surface.
#[derive(Debug, Clone, Default)]
pub struct TouchSurface {
    scene: Scene,
    tracker: PointerTracker,
    engine: GestureEngine,
}

impl TouchSurface {
    /// Surface with validated tuning.
    pub fn new(config: GestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scene: Scene::with_min_scale(config.min_scale),
            tracker: PointerTracker::new(),
            engine: GestureEngine::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        self.engine.config()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    /// Add an untransformed entity on top of the paint order.
    pub fn add_entity(&mut self, base: Rect) -> Result<EntityId, EntityError> {
        self.scene.add(base)
    }

    /// Add an entity with an initial transform on top of the paint order.
    pub fn add_entity_with(
        &mut self,
        base: Rect,
        state: AffineState,
    ) -> Result<EntityId, EntityError> {
        self.scene.add_with(base, state)
    }

    /// Remove an entity. Pointers still bound to it become dangling and are
    /// ignored until their Up.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.scene.remove(id);
        if removed.is_some() {
            tracing::debug!(target: "touchslate.surface", entity = id.get(), "entity removed");
        }
        removed
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.entity(id)
    }

    /// Lock or unlock an entity directly. Returns false if absent.
    pub fn set_locked(&mut self, id: EntityId, locked: bool) -> bool {
        match self.scene.entity_mut(id) {
            Some(entity) => {
                entity.set_locked(locked);
                true
            }
            None => false,
        }
    }

    /// Topmost entity first.
    pub fn entities_front_to_back(&self) -> impl Iterator<Item = &Entity> {
        self.scene.front_to_back()
    }

    /// What is under a screen point right now.
    #[must_use]
    pub fn hit_test(&self, x: i32, y: i32) -> HitTarget {
        hit_test(x, y, self.scene.front_to_back())
    }

    /// Every known pointer for marker drawing.
    #[must_use]
    pub fn pointer_markers(&self) -> Vec<PointerMarker> {
        self.tracker.current_positions()
    }

    /// Decode a platform action code and dispatch it.
    pub fn dispatch_raw(
        &mut self,
        action_code: u32,
        pointers: &[TouchPointer],
    ) -> Result<SurfaceDispatch, ActionError> {
        let event = TouchEvent::from_raw(action_code, pointers)?;
        Ok(self.dispatch(&event))
    }

    /// Process one touch event.
    pub fn dispatch(&mut self, event: &TouchEvent) -> SurfaceDispatch {
        let span = tracing::debug_span!(
            target: "touchslate.surface",
            "touch.dispatch",
            kind = ?event.kind,
            pointers = event.pointers.len()
        );
        let _guard = span.enter();

        match event.kind {
            TouchKind::Down => self.dispatch_down(event),
            TouchKind::Up => self.dispatch_up(event),
            TouchKind::Move => self.dispatch_move(event),
        }
    }

    fn dispatch_down(&mut self, event: &TouchEvent) -> SurfaceDispatch {
        let mut out = SurfaceDispatch::empty(TouchKind::Down);
        let Some(pointer) = event.primary() else {
            tracing::warn!(
                target: "touchslate.surface",
                index = event.primary_index,
                "down without an addressed pointer ignored"
            );
            return out;
        };
        out.pointer = Some(pointer.id);
        out.hit = self.hit_test(pointer.position.x, pointer.position.y);

        let down = self.tracker.on_down(pointer, out.hit, &mut self.scene);
        if let Some(stale) = down.released_stale {
            self.push_bounds(&mut out.repaint, stale);
        }
        if let Some(id) = down.bring_to_front
            && self.scene.bring_to_front(id)
        {
            tracing::debug!(target: "touchslate.surface", entity = id.get(), "raised");
            out.raised = Some(id);
        }
        if let Some(id) = down.bound
            && down.contact_count == CONTACT_CAPACITY
            && self.engine.config().lock_on_full_contact
            && let Some(entity) = self.scene.entity_mut(id)
        {
            entity.toggle_lock();
            tracing::debug!(
                target: "touchslate.surface",
                entity = id.get(),
                locked = entity.is_locked(),
                "lock toggled"
            );
            out.lock_toggled = Some(id);
        }
        if let Some(id) = down.bound {
            self.push_bounds(&mut out.repaint, id);
        }
        out.down = Some(down);
        out
    }

    fn dispatch_up(&mut self, event: &TouchEvent) -> SurfaceDispatch {
        let mut out = SurfaceDispatch::empty(TouchKind::Up);
        let Some(pointer) = event.primary() else {
            tracing::warn!(
                target: "touchslate.surface",
                index = event.primary_index,
                "up without an addressed pointer ignored"
            );
            return out;
        };
        out.pointer = Some(pointer.id);
        let up = self.tracker.on_up(pointer.id, &mut self.scene);
        self.collect_released(&mut out, pointer.id, up);
        out
    }

    fn dispatch_move(&mut self, event: &TouchEvent) -> SurfaceDispatch {
        let mut out = SurfaceDispatch::empty(TouchKind::Move);

        let mut before: Vec<(EntityId, Rect)> = Vec::new();
        for pointer in &event.pointers {
            if let Some(id) = self.tracker.binding_of(pointer.id)
                && !before.iter().any(|(seen, _)| *seen == id)
                && let Some(entity) = self.scene.entity(id)
            {
                before.push((id, entity.invalidation_bounds()));
            }
        }

        out.moves = self
            .tracker
            .on_move(&event.pointers, &mut self.scene, &self.engine);

        for (id, bounds) in before {
            let changed = out.moves.iter().any(|m| {
                m.entity == Some(id)
                    && matches!(m.outcome, MoveOutcome::Gesture(g) if g.is_applied())
            });
            if changed {
                out.repaint.push(bounds);
                self.push_bounds(&mut out.repaint, id);
            }
        }
        out
    }

    fn collect_released(&self, out: &mut SurfaceDispatch, pointer: PointerId, up: UpOutcome) {
        if let UpOutcome::Released { entity, .. } = up {
            self.push_bounds(&mut out.repaint, entity);
        }
        out.released.push((pointer, up));
    }

    fn push_bounds(&self, repaint: &mut Vec<Rect>, id: EntityId) {
        if let Some(entity) = self.scene.entity(id) {
            let bounds = entity.invalidation_bounds();
            if !repaint.contains(&bounds) {
                repaint.push(bounds);
            }
        }
    }
}
