#![forbid(unsafe_code)]

//! Core: multi-touch attribution and gesture transforms for on-screen entities.
//!
//! # Role in Touchslate
//! `touchslate-core` sits between a platform's touch input and a renderer.
//! It owns the entities being manipulated, remembers which pointer went down
//! on which entity, and turns pointer movement into pan, rotate and scale.
//!
//! # Primary responsibilities
//! - **PointerTracker**: binds pointer ids to entities from Down to Up and
//!   works out which pointers actually moved in a Move event.
//! - **Hit testing**: point-in-quadrilateral tests against each entity's
//!   *transformed* corners, topmost entity first.
//! - **GestureEngine**: one-finger pan and two-finger rotate+scale with a
//!   jitter threshold, a scale floor and a rotation wraparound guard.
//! - **TouchSurface**: the driver that ties the above together and reports
//!   what to raise and repaint.
//!
//! # How it fits in the system
//! The host converts native events to [`TouchEvent`] (or hands raw action
//! codes to [`TouchSurface::dispatch_raw`]). After each dispatch it reads
//! entity transforms, [`Roi`] corners and pointer markers to draw a frame.
//! Nothing here draws, blocks or spawns threads.

pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod pointer;
pub mod roi;
pub mod scene;
pub mod surface;

pub use config::GestureConfig;
pub use entity::{
    AffineState, CONTACT_CAPACITY, Contact, ContactRejection, ContactSet, DEFAULT_MIN_SCALE,
    Entity, EntityFlags, EntityId,
};
pub use error::{ActionError, ConfigError, DegenerateGeometry, EntityError};
pub use event::{PointerId, PointerPosition, TouchEvent, TouchKind, TouchPointer};
pub use geometry::{Point, Rect};
pub use gesture::{GestureEngine, GestureOutcome, GestureSkip, RotateScale, TwoFingerStep};
pub use hit::{HitTarget, hit_test};
pub use pointer::{
    DownOutcome, MoveOutcome, MoveReport, PointerBinding, PointerMarker, PointerRecord,
    PointerTracker, UpOutcome, resolve_action,
};
pub use roi::Roi;
pub use scene::{EntityStore, Scene};
pub use surface::{SurfaceDispatch, TouchSurface};
