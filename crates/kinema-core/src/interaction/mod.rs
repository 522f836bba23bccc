//! Drag-and-release interaction controller.
//!
//! [`Interactable`] wires gesture input, the physics behaviors and the snap
//! resolver into one [`AnimationGraph`](crate::graph::AnimationGraph). The host
//! feeds it [`GestureEvent`]s as they arrive and calls
//! [`advance()`](Interactable::advance) once per rendered frame.
//!
//! # Regimes
//!
//! Each axis runs a small state machine:
//!
//! ```text
//!            gesture Active
//! Released ─────────────────▶ Dragging
//!    ▲                           │
//!    └───────────────────────────┘
//!     gesture ends: resolve snap point
//! ```
//!
//! While dragging, the drag behaviors pull the target toward the finger
//! (kinematically, or through a spring when configured). After release, the
//! snap behaviors spring toward the selected snap point and the shared clock
//! stops once the object comes to rest.

#[cfg(not(feature = "std"))]
use alloc::string::String;

mod buckets;
mod config;
mod controller;

pub use buckets::{BehaviorBuckets, Bucket};
pub use config::{DragSpring, FrictionArea, GravityPoint, InteractableConfig, SpringPoint};
pub use controller::Interactable;

use crate::graph::EventFields;

/// Gesture recognizer state as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureState {
    /// No finger down (or gesture ended/cancelled).
    #[default]
    Inactive,
    /// Finger down and moving.
    Active,
}

impl GestureState {
    /// Cell encoding of the state.
    pub fn as_value(self) -> f64 {
        match self {
            Self::Inactive => 0.0,
            Self::Active => 1.0,
        }
    }

    /// Returns true for [`GestureState::Active`].
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// One gesture update from the host.
///
/// Translations are measured from where the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GestureEvent {
    /// Recognizer state.
    pub state: GestureState,
    /// Horizontal translation since the gesture began.
    pub translation_x: f64,
    /// Vertical translation since the gesture began.
    pub translation_y: f64,
}

impl GestureEvent {
    /// An active gesture at the given translation.
    pub fn active(translation_x: f64, translation_y: f64) -> Self {
        Self {
            state: GestureState::Active,
            translation_x,
            translation_y,
        }
    }

    /// An ended gesture at the given translation.
    pub fn ended(translation_x: f64, translation_y: f64) -> Self {
        Self {
            state: GestureState::Inactive,
            translation_x,
            translation_y,
        }
    }
}

impl EventFields for GestureEvent {
    fn field(&self, name: &str) -> Option<f64> {
        match name {
            "state" => Some(self.state.as_value()),
            "translation_x" => Some(self.translation_x),
            "translation_y" => Some(self.translation_y),
            _ => None,
        }
    }
}

/// Which behavior set a controller is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Regime {
    /// Following the finger.
    Dragging,
    /// Settling toward a snap point.
    #[default]
    Released,
}

impl core::fmt::Display for Regime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dragging => f.write_str("dragging"),
            Self::Released => f.write_str("released"),
        }
    }
}

/// Sampled target position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// Sampled target velocity, in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    /// Horizontal velocity.
    pub vx: f64,
    /// Vertical velocity.
    pub vy: f64,
}

impl Velocity {
    /// Euclidean speed.
    pub fn speed(&self) -> f64 {
        libm::sqrt(self.vx * self.vx + self.vy * self.vy)
    }
}

/// Errors raised when a controller configuration is unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionError {
    /// No snap points were configured.
    MissingSnapPoints,
    /// Both `horizontal_only` and `vertical_only` were set.
    ConflictingAxisLock,
    /// A numeric parameter is out of range.
    InvalidParameter {
        /// Dotted path of the parameter, e.g. `snap_points[1].tension`.
        parameter: String,
        /// Rejected value.
        value: f64,
    },
}

impl core::fmt::Display for InteractionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingSnapPoints => write!(f, "at least one snap point is required"),
            Self::ConflictingAxisLock => {
                write!(f, "horizontal_only and vertical_only are mutually exclusive")
            }
            Self::InvalidParameter { parameter, value } => {
                write!(f, "invalid value {value} for {parameter}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InteractionError {}
