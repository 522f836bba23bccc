//! Physics behaviors expressed as graph nodes.
//!
//! A behavior is a pair of update nodes, one per axis, that mutate the
//! velocity cells of a [`PhysicsObject`] when evaluated. Behaviors never move
//! the target themselves; the controller integrates `position += velocity *
//! dt` after running them.
//!
//! All behaviors share a [`Body`]: the frame delta `dt` (seconds), the
//! animated [`Target`] and its [`PhysicsObject`].
//!
//! | behavior | update |
//! |----------|--------|
//! | [`spring`] | `v += -tension * (target - anchor) / mass * dt` |
//! | [`friction`] | `v *= damping^(60 * dt)` |
//! | [`anchor_follow`] | `v = (anchor - target) / dt` |
//! | [`gravity`] | `v += dt * delta / dr * a`, `a = -strength * dr * e^(-dr²/2falloff²) / mass` |
//!
//! [`with_influence`] gates a behavior to an [`InfluenceArea`].

mod behaviors;
mod influence;

pub use behaviors::{anchor_follow, friction, gravity, spring};
pub use influence::{InfluenceArea, with_influence};

use crate::graph::{AnimationGraph, CellId, IntoNode, NodeId};

/// Default spring and snap tension.
pub const DEFAULT_TENSION: f64 = 300.0;

/// Default friction and snap damping.
pub const DEFAULT_DAMPING: f64 = 0.7;

/// Default gravity strength.
pub const DEFAULT_GRAVITY_STRENGTH: f64 = 400.0;

/// Default gravity falloff distance.
pub const DEFAULT_GRAVITY_FALLOFF: f64 = 40.0;

/// Mass of every physics object.
pub const MASS: f64 = 1.0;

/// Frame rate that friction damping factors are expressed against.
pub const FRICTION_REFERENCE_FPS: f64 = 60.0;

/// Speed below which a released object counts as resting.
pub const REST_SPEED_THRESHOLD: f64 = 0.001;

/// Radius of the implicit damping region of a gravity point, in falloffs.
pub const GRAVITY_DAMPING_RADIUS: f64 = 1.4;

/// The animated value: position cells read by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Horizontal position.
    pub x: CellId,
    /// Vertical position.
    pub y: CellId,
}

impl Target {
    /// Allocates a target at `(x, y)`.
    pub fn new(graph: &mut AnimationGraph, x: f64, y: f64) -> Self {
        Self {
            x: graph.cell(x),
            y: graph.cell(y),
        }
    }
}

/// Velocity state of the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsObject {
    /// Horizontal velocity (units per second).
    pub vx: CellId,
    /// Vertical velocity (units per second).
    pub vy: CellId,
    /// Mass, always [`MASS`].
    pub mass: f64,
}

impl PhysicsObject {
    /// Allocates a resting object.
    pub fn new(graph: &mut AnimationGraph) -> Self {
        Self {
            vx: graph.cell(0.0),
            vy: graph.cell(0.0),
            mass: MASS,
        }
    }
}

/// Point a behavior pulls toward. Coordinates may be constants or cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Horizontal coordinate.
    pub x: NodeId,
    /// Vertical coordinate.
    pub y: NodeId,
}

impl Anchor {
    /// Creates an anchor from two nodes (or numbers).
    pub fn new(graph: &mut AnimationGraph, x: impl IntoNode, y: impl IntoNode) -> Self {
        Self {
            x: x.into_node(graph),
            y: y.into_node(graph),
        }
    }
}

/// State shared by every behavior of one controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Frame delta in seconds.
    pub dt: NodeId,
    /// Animated position.
    pub target: Target,
    /// Velocity state.
    pub object: PhysicsObject,
}

/// Per-axis update nodes produced by a behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    /// Horizontal update.
    pub x: NodeId,
    /// Vertical update.
    pub y: NodeId,
}

/// Axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// Both axes, x first.
    pub const BOTH: [Self; 2] = [Self::X, Self::Y];
}

impl Behavior {
    /// Returns the update node for `axis`.
    pub fn axis(&self, axis: Axis) -> NodeId {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}
