//! Declarative animation node graph.
//!
//! The graph module replaces imperative per-frame update code with a dataflow
//! graph of numeric nodes: build the graph once, then evaluate its output
//! nodes once per rendered frame.
//!
//! # Architecture
//!
//! - [`AnimationGraph`]: owns every node plus the side tables holding state
//!   (cells, clocks, `diff` history) and the per-node memo table.
//! - [`NodeId`] / [`CellId`] / [`ClockId`]: copyable handles. Cells and clocks
//!   are nodes too, so their handles convert into [`NodeId`] and can be used as
//!   operands anywhere.
//! - [`EventBinding`]: maps named fields of external input events onto cells.
//!
//! Nodes may only reference nodes created before them, so the graph is a DAG
//! by construction and evaluation is a plain recursive descent.
//!
//! # Frame Protocol
//!
//! The host calls [`begin_frame()`](AnimationGraph::begin_frame) once per
//! display refresh with a monotonic timestamp, then
//! [`evaluate()`](AnimationGraph::evaluate) for each output it samples.
//! Conditionals only evaluate the taken branch; side effects (cell writes,
//! clock start/stop) happen only on that path.
//!
//! # Example
//!
//! ```rust
//! use kinema_core::graph::AnimationGraph;
//!
//! let mut graph = AnimationGraph::new();
//! let position = graph.cell(0.0);
//! let step = graph.add(position, 2.0);
//! let update = graph.set(position, step);
//!
//! for frame in 0..3 {
//!     graph.begin_frame(f64::from(frame) * 16.0).unwrap();
//!     graph.evaluate(update).unwrap();
//! }
//! assert_eq!(graph.read(position), 6.0);
//! ```
//!
//! # Threading
//!
//! Evaluation is single-threaded and synchronous. A host that receives input
//! on another thread must serialize [`dispatch()`](AnimationGraph::dispatch)
//! and frame evaluation onto one thread.

mod builder;
pub mod clock;
pub mod event;
pub mod node;
mod processing;

pub use clock::ClockState;
pub use event::{EventBinding, EventFields};
pub use node::{BinaryOp, CellId, ClockId, IntoNode, NodeId, UnaryOp, from_bool, truthy};
pub use processing::{AnimationGraph, GraphError};
