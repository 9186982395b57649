#![forbid(unsafe_code)]

//! Error types.
//!
//! The event path itself never fails: spurious Ups, contact overflow,
//! degenerate two-finger geometry and locked entities all surface as typed
//! "ignored"/"skipped" outcomes. The errors here cover decoding raw platform
//! codes, validating configuration and constructing entities.

use std::fmt;

use crate::entity::AffineState;
use crate::geometry::Rect;

/// Failure to decode a platform action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// The masked action has no Down/Move/Up meaning.
    UnsupportedAction { code: u32 },
    /// The encoded pointer index does not address a pointer in the event.
    PointerIndexOutOfRange { index: usize, count: usize },
    /// A Down/Move/Up arrived with no pointers at all.
    EmptyPointerList,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedAction { code } => {
                write!(f, "unsupported touch action code {code:#06x}")
            }
            Self::PointerIndexOutOfRange { index, count } => {
                write!(f, "pointer index {index} out of range for {count} pointers")
            }
            Self::EmptyPointerList => write!(f, "touch event carries no pointers"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Invalid gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The scale floor must be finite and strictly positive.
    InvalidMinScale { value: f64 },
    /// The jitter threshold must be non-negative.
    NegativeJitterThreshold { value: i32 },
    /// Scale granularity must be finite.
    InvalidScaleGranularity { value: f64 },
    /// The rotation step guard must be finite and non-negative.
    InvalidRotationGuard { value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMinScale { value } => {
                write!(f, "min_scale must be finite and > 0 (got {value})")
            }
            Self::NegativeJitterThreshold { value } => {
                write!(f, "jitter_threshold must be >= 0 (got {value})")
            }
            Self::InvalidScaleGranularity { value } => {
                write!(f, "scale_granularity must be finite (got {value})")
            }
            Self::InvalidRotationGuard { value } => {
                write!(f, "max_rotation_step must be finite and >= 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Rejected entity construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityError {
    /// Zero or negative width/height.
    EmptyBase { base: Rect },
    /// Non-finite fields, or a scale at or below the floor.
    InvalidState { state: AffineState, min_scale: f64 },
    /// Every entity id has been handed out.
    IdsExhausted,
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBase { base } => write!(
                f,
                "entity base rectangle {}x{} has no area",
                base.width, base.height
            ),
            Self::InvalidState { state, min_scale } => write!(
                f,
                "initial transform invalid (sx={}, sy={}, floor={min_scale})",
                state.sx, state.sy
            ),
            Self::IdsExhausted => write!(f, "entity ids exhausted"),
        }
    }
}

impl std::error::Error for EntityError {}

/// Why a two-finger rotate/scale computation was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateGeometry {
    /// The moving pointer's previous position coincides with the fixed one.
    CoincidentPointers,
    /// The partner contact has no pressed pointer record.
    MissingFixedPointer,
    /// An intermediate distance or angle was NaN or infinite.
    NonFinite,
}

impl fmt::Display for DegenerateGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoincidentPointers => write!(f, "fixed and moving pointers coincide"),
            Self::MissingFixedPointer => write!(f, "fixed pointer has no live record"),
            Self::NonFinite => write!(f, "non-finite intermediate value"),
        }
    }
}

impl std::error::Error for DegenerateGeometry {}
