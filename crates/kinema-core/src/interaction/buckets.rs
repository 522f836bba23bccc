//! Priority buckets for behavior ordering.
//!
//! Behaviors run in bucket order: springs and gravity first, then friction,
//! then the reserved bucket. Within a bucket the permanent behaviors run
//! before the regime-specific ones, each group in insertion order.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::graph::{AnimationGraph, NodeId};
use crate::physics::{Axis, Behavior};

/// Behavior priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Springs, gravity and anchor-follow.
    Spring = 0,
    /// Friction.
    Friction = 1,
    /// Unused by the built-in behaviors.
    Reserved = 2,
}

impl Bucket {
    /// Buckets in evaluation order.
    pub const ALL: [Self; 3] = [Self::Spring, Self::Friction, Self::Reserved];
}

/// Behaviors grouped by [`Bucket`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorBuckets {
    buckets: [Vec<Behavior>; 3],
}

impl BehaviorBuckets {
    /// Creates empty buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a behavior to `bucket`.
    pub fn push(&mut self, bucket: Bucket, behavior: Behavior) {
        self.buckets[bucket as usize].push(behavior);
    }

    /// Behaviors in `bucket`, in insertion order.
    pub fn get(&self, bucket: Bucket) -> &[Behavior] {
        &self.buckets[bucket as usize]
    }

    /// Total number of behaviors.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Returns true if every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Update nodes of `axis` for `permanent` merged with `self`, in
    /// evaluation order.
    pub fn ordered(&self, permanent: &Self, axis: Axis) -> Vec<NodeId> {
        Bucket::ALL
            .iter()
            .flat_map(|&bucket| permanent.get(bucket).iter().chain(self.get(bucket)))
            .map(|behavior| behavior.axis(axis))
            .collect()
    }

    /// Builds one block node running [`ordered`](Self::ordered) for `axis`.
    pub fn sequence(&self, graph: &mut AnimationGraph, permanent: &Self, axis: Axis) -> NodeId {
        let nodes = self.ordered(permanent, axis);
        graph.block(nodes)
    }
}
