//! Rectangular influence regions.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::{Behavior, Target};
use crate::graph::{AnimationGraph, NodeId};

/// Axis-aligned region restricting where a behavior applies.
///
/// Every bound is optional; an absent bound leaves that side open. Bounds are
/// inclusive. `top` is the smaller y value (screen coordinates).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InfluenceArea {
    /// Minimum x.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left: Option<f64>,
    /// Maximum x.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right: Option<f64>,
    /// Minimum y.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub top: Option<f64>,
    /// Maximum y.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bottom: Option<f64>,
}

impl InfluenceArea {
    /// Unbounded region.
    pub const UNBOUNDED: Self = Self {
        left: None,
        right: None,
        top: None,
        bottom: None,
    };

    /// Square region of half-width `radius` centered on `(x, y)`.
    pub fn with_radius(x: f64, y: f64, radius: f64) -> Self {
        Self {
            left: Some(x - radius),
            right: Some(x + radius),
            top: Some(y - radius),
            bottom: Some(y + radius),
        }
    }

    /// Returns true if no bound is set.
    pub fn is_unbounded(&self) -> bool {
        *self == Self::UNBOUNDED
    }

    /// Tests a point against the bounds that are present.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left.is_none_or(|l| l <= x)
            && self.right.is_none_or(|r| x <= r)
            && self.top.is_none_or(|t| t <= y)
            && self.bottom.is_none_or(|b| y <= b)
    }

    /// Builds the AND of the present bound tests against `target`, or `None`
    /// when the region is unbounded.
    pub fn test_node(&self, graph: &mut AnimationGraph, target: &Target) -> Option<NodeId> {
        let mut tests: Vec<NodeId> = Vec::with_capacity(4);
        if let Some(left) = self.left {
            tests.push(graph.less_or_eq(left, target.x));
        }
        if let Some(right) = self.right {
            tests.push(graph.less_or_eq(target.x, right));
        }
        if let Some(top) = self.top {
            tests.push(graph.less_or_eq(top, target.y));
        }
        if let Some(bottom) = self.bottom {
            tests.push(graph.less_or_eq(target.y, bottom));
        }
        if tests.is_empty() {
            None
        } else {
            Some(graph.and(tests))
        }
    }
}

/// Gates both update nodes of `behavior` on `area` containing `target`.
///
/// Returns `behavior` unchanged when `area` is absent or unbounded.
pub fn with_influence(
    graph: &mut AnimationGraph,
    area: Option<&InfluenceArea>,
    target: &Target,
    behavior: Behavior,
) -> Behavior {
    let Some(test) = area.and_then(|a| a.test_node(graph, target)) else {
        return behavior;
    };
    Behavior {
        x: graph.cond(test, behavior.x),
        y: graph.cond(test, behavior.y),
    }
}
