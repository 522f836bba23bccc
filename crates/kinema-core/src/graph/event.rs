//! Event bindings: mapping external input fields onto cells.
//!
//! The host receives input events (gestures, sensors, whatever it has) outside
//! of frame evaluation. An [`EventBinding`] names which field of an event goes
//! into which cell; [`AnimationGraph::dispatch`](super::AnimationGraph::dispatch)
//! performs the writes. The values are then consumed at the next frame.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use super::node::CellId;

/// An input event exposing named numeric fields.
pub trait EventFields {
    /// Returns the value of `name`, or `None` if the event does not carry it.
    fn field(&self, name: &str) -> Option<f64>;
}

impl EventFields for [(&str, f64)] {
    fn field(&self, name: &str) -> Option<f64> {
        self.iter().find(|(key, _)| *key == name).map(|&(_, v)| v)
    }
}

impl<const N: usize> EventFields for [(&str, f64); N] {
    fn field(&self, name: &str) -> Option<f64> {
        self.as_slice().field(name)
    }
}

/// Maps event field names onto cells.
///
/// ```rust
/// use kinema_core::graph::{AnimationGraph, EventBinding};
///
/// let mut graph = AnimationGraph::new();
/// let tx = graph.cell(0.0);
/// let binding = EventBinding::new().with_field("translation_x", tx);
///
/// graph.dispatch(&binding, &[("translation_x", 42.0)]);
/// assert_eq!(graph.read(tx), 42.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBinding {
    fields: Vec<(String, CellId)>,
}

impl EventBinding {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field mapping (builder style).
    pub fn with_field(mut self, name: impl Into<String>, cell: CellId) -> Self {
        self.bind(name, cell);
        self
    }

    /// Adds a field mapping.
    pub fn bind(&mut self, name: impl Into<String>, cell: CellId) {
        self.fields.push((name.into(), cell));
    }

    /// Returns the number of mapped fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are mapped.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(field name, cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CellId)> {
        self.fields.iter().map(|(name, cell)| (name.as_str(), *cell))
    }
}
