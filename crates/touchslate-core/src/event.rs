#![forbid(unsafe_code)]

//! Normalized touch events.
//!
//! Hosts translate their native touch input into [`TouchEvent`] values,
//! either directly or through [`TouchEvent::from_raw`] when they only have a
//! platform-encoded action code and a flat pointer list.
//!
//! # Design Notes
//!
//! - Positions are integer pixels, origin top-left, y down.
//! - A `Move` event carries every pointer currently touching; it does not say
//!   which one moved. The tracker works that out.
//! - `Down`/`Up` name their pointer through `primary_index`.

use std::fmt;

use crate::error::ActionError;
use crate::geometry::Point;
use crate::pointer::resolve_action;

/// Platform-assigned pointer identifier, stable from Down to Up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerId(pub i32);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer#{}", self.0)
    }
}

/// Integer screen position of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - earlier`, saturating.
    #[inline]
    #[must_use]
    pub const fn delta_from(self, earlier: Self) -> (i32, i32) {
        (
            self.x.saturating_sub(earlier.x),
            self.y.saturating_sub(earlier.y),
        )
    }
}

impl From<PointerPosition> for Point {
    fn from(p: PointerPosition) -> Self {
        Point::new(f64::from(p.x), f64::from(p.y))
    }
}

/// One pointer entry of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPointer {
    pub id: PointerId,
    pub position: PointerPosition,
}

impl TouchPointer {
    #[inline]
    #[must_use]
    pub const fn new(id: i32, x: i32, y: i32) -> Self {
        Self {
            id: PointerId(id),
            position: PointerPosition::new(x, y),
        }
    }
}

/// Resolved kind of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchKind {
    Down,
    Move,
    Up,
}

/// A touch event in the core's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    /// Every pointer currently touching, in platform index order.
    pub pointers: Vec<TouchPointer>,
    /// Index into `pointers` of the pointer a Down/Up refers to.
    pub primary_index: usize,
}

impl TouchEvent {
    /// A single-pointer Down.
    #[must_use]
    pub fn down(id: i32, x: i32, y: i32) -> Self {
        Self {
            kind: TouchKind::Down,
            pointers: vec![TouchPointer::new(id, x, y)],
            primary_index: 0,
        }
    }

    /// A single-pointer Up.
    #[must_use]
    pub fn up(id: i32, x: i32, y: i32) -> Self {
        Self {
            kind: TouchKind::Up,
            pointers: vec![TouchPointer::new(id, x, y)],
            primary_index: 0,
        }
    }

    /// A Move carrying every touching pointer.
    #[must_use]
    pub fn moved(pointers: Vec<TouchPointer>) -> Self {
        Self {
            kind: TouchKind::Move,
            pointers,
            primary_index: 0,
        }
    }

    /// Decode a platform action code against the event's pointer list.
    pub fn from_raw(action_code: u32, pointers: &[TouchPointer]) -> Result<Self, ActionError> {
        let resolved = resolve_action(action_code, pointers.len())?;
        if pointers.is_empty() {
            return Err(ActionError::EmptyPointerList);
        }
        Ok(Self {
            kind: resolved.kind,
            pointers: pointers.to_vec(),
            primary_index: resolved.pointer_index,
        })
    }

    /// Pointer addressed by `primary_index`.
    #[must_use]
    pub fn primary(&self) -> Option<TouchPointer> {
        self.pointers.get(self.primary_index).copied()
    }
}
