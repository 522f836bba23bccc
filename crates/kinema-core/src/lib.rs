//! Kinema Core - declarative animation graph with gesture-driven physics
//!
//! This crate provides a frame-driven dataflow engine for interactive
//! animation: a graph of numeric nodes is built once and evaluated once per
//! rendered frame, moving an object under springs, friction and gravity and
//! snapping it into place after the user lets go.
//!
//! # Core Abstractions
//!
//! ## Node Graph
//!
//! - [`AnimationGraph`] - Arena of nodes with per-frame memoized evaluation
//! - [`NodeId`], [`CellId`], [`ClockId`] - Copyable node handles
//! - [`EventBinding`] - Maps input event fields onto cells
//!
//! ## Physics
//!
//! - [`physics::spring`], [`physics::friction`], [`physics::gravity`],
//!   [`physics::anchor_follow`] - Velocity update behaviors
//! - [`InfluenceArea`] - Rectangular gate for behaviors
//!
//! ## Interaction
//!
//! - [`Interactable`] - Drag/release controller with snapping
//! - [`InteractableConfig`] - Springs, gravity wells, friction areas, snap points
//! - [`SnapPoint`] - Rest positions chosen on release
//!
//! ## Time-based Animation
//!
//! - [`run_timing`] - Eased animation toward a destination, auto-stopping its clock
//! - [`Easing`] - Quad, cubic, sine, back, bounce, elastic, Bézier, ...
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! kinema-core = { version = "0.1", default-features = false }
//! ```
//!
//! Optional features:
//!
//! - `serde` - Serialize/Deserialize for configuration types
//! - `tracing` - Debug events for controller construction, regime changes,
//!   clock start/stop and `debug` nodes
//!
//! # Example
//!
//! ```rust
//! use kinema_core::{GestureEvent, Interactable, InteractableConfig, SnapPoint};
//!
//! let config = InteractableConfig::with_snap_points([
//!     SnapPoint::new(0.0, 0.0),
//!     SnapPoint::new(0.0, 300.0),
//! ]);
//! let mut drawer = Interactable::new(config).unwrap();
//!
//! // Host loop: forward gestures as they arrive, advance once per frame.
//! drawer.handle_gesture(&GestureEvent::active(0.0, 40.0));
//! let position = drawer.advance(0.0).unwrap();
//! assert_eq!(position.y, 0.0);
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: behaviors are graph nodes, not per-frame callbacks
//! - **Deterministic**: output depends only on events and frame timestamps
//! - **No dependencies on std**: `no_std` with `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod easing;
pub mod graph;
pub mod interaction;
pub mod physics;
pub mod snap;
pub mod timing;

// Re-export main types at crate root
pub use easing::{Curve, Easing, EasingMode, ParseEasingError, cubic_bezier};
pub use graph::{
    AnimationGraph, BinaryOp, CellId, ClockId, EventBinding, EventFields, GraphError, IntoNode,
    NodeId, UnaryOp,
};
pub use interaction::{
    DragSpring, FrictionArea, GestureEvent, GestureState, GravityPoint, Interactable,
    InteractableConfig, InteractionError, Position, Regime, SpringPoint, Velocity,
};
pub use physics::{Anchor, Behavior, Body, InfluenceArea, PhysicsObject, Target};
pub use snap::{SnapAnchor, SnapPoint, nearest_snap_point};
pub use timing::{Timing, TimingConfig, TimingState, run_timing};
