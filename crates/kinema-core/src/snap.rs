//! Snap point selection.
//!
//! When a drag ends, the controller picks the snap point nearest to the
//! current target and writes it into a shared [`SnapAnchor`]; the release
//! behaviors then spring toward that anchor.
//!
//! Selection writes the first candidate unconditionally and then walks every
//! candidate in order, replacing the best one only on a strictly smaller
//! squared distance. Ties therefore keep the earlier point.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::graph::{AnimationGraph, CellId, NodeId};
use crate::physics::{Anchor, DEFAULT_DAMPING, DEFAULT_TENSION, Target};

/// A point the target may come to rest on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapPoint {
    /// Horizontal coordinate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: f64,
    /// Vertical coordinate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: f64,
    /// Spring tension toward this point (default [`DEFAULT_TENSION`]).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub tension: Option<f64>,
    /// Friction damping near this point (default [`DEFAULT_DAMPING`]).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub damping: Option<f64>,
}

impl SnapPoint {
    /// Creates a snap point with default tension and damping.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            tension: None,
            damping: None,
        }
    }

    /// Sets the tension (builder style).
    #[must_use]
    pub const fn with_tension(mut self, tension: f64) -> Self {
        self.tension = Some(tension);
        self
    }

    /// Sets the damping (builder style).
    #[must_use]
    pub const fn with_damping(mut self, damping: f64) -> Self {
        self.damping = Some(damping);
        self
    }

    /// Tension with the default applied.
    pub fn effective_tension(&self) -> f64 {
        self.tension.unwrap_or(DEFAULT_TENSION)
    }

    /// Damping with the default applied.
    pub fn effective_damping(&self) -> f64 {
        self.damping.unwrap_or(DEFAULT_DAMPING)
    }

    /// Squared distance from `(x, y)`.
    pub fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy
    }
}

/// Cells holding the currently selected snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapAnchor {
    /// Selected x.
    pub x: CellId,
    /// Selected y.
    pub y: CellId,
    /// Selected tension.
    pub tension: CellId,
    /// Selected damping.
    pub damping: CellId,
}

impl SnapAnchor {
    /// Allocates an anchor at the origin with default tension and damping.
    pub fn new(graph: &mut AnimationGraph) -> Self {
        Self {
            x: graph.cell(0.0),
            y: graph.cell(0.0),
            tension: graph.cell(DEFAULT_TENSION),
            damping: graph.cell(DEFAULT_DAMPING),
        }
    }

    /// The anchor position as behavior input.
    pub fn anchor(&self) -> Anchor {
        Anchor {
            x: self.x.into(),
            y: self.y.into(),
        }
    }
}

/// Index of the point [`snap_to`] would select for a target at `(x, y)`.
///
/// Returns `None` for an empty slice.
pub fn nearest_snap_point(points: &[SnapPoint], x: f64, y: f64) -> Option<usize> {
    let first = points.first()?;
    let mut best = 0;
    let mut best_dist = first.distance_sq(x, y);
    for (i, point) in points.iter().enumerate() {
        let dist = point.distance_sq(x, y);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    Some(best)
}

fn snap_distance(graph: &mut AnimationGraph, target: &Target, point: &SnapPoint) -> NodeId {
    let dx = graph.sub(target.x, point.x);
    let dy = graph.sub(target.y, point.y);
    let dx2 = graph.square(dx);
    let dy2 = graph.square(dy);
    graph.add(dx2, dy2)
}

fn write_anchor(graph: &mut AnimationGraph, best: &SnapAnchor, point: &SnapPoint) -> [NodeId; 4] {
    [
        graph.set(best.tension, point.effective_tension()),
        graph.set(best.damping, point.effective_damping()),
        graph.set(best.x, point.x),
        graph.set(best.y, point.y),
    ]
}

/// Builds the snap resolution block for `points`.
///
/// Returns `None` when `points` is empty.
pub fn snap_to(
    graph: &mut AnimationGraph,
    target: &Target,
    points: &[SnapPoint],
    best: &SnapAnchor,
) -> Option<NodeId> {
    let first = points.first()?;
    let dist = graph.cell(0.0);

    let mut steps = Vec::with_capacity(points.len() + 5);
    let first_dist = snap_distance(graph, target, first);
    steps.push(graph.set(dist, first_dist));
    steps.extend(write_anchor(graph, best, first));

    for point in points {
        let candidate = snap_distance(graph, target, point);
        let closer = graph.less_than(candidate, dist);
        let record = graph.set(dist, candidate);
        let mut take = vec![record];
        take.extend(write_anchor(graph, best, point));
        let take = graph.block(take);
        steps.push(graph.cond(closer, take));
    }

    Some(graph.block(steps))
}
