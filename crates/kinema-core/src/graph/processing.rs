//! Animation graph: state tables, frame protocol, and evaluation.
//!
//! [`AnimationGraph`] owns every node, cell, clock and memo entry. The host
//! drives it with one [`begin_frame()`](AnimationGraph::begin_frame) per
//! rendered frame and then samples its output nodes with
//! [`evaluate()`](AnimationGraph::evaluate).
//!
//! # Memoization
//!
//! Each node carries one memo slot, and how long a cached value stays valid
//! depends on the node:
//!
//! - plain reads (constants, cells, clocks) are never cached
//! - pure operators are cached for the current frame *and* write epoch; every
//!   cell write or clock start/stop bumps the epoch, so a pure node sampled
//!   after a write sees the new state
//! - stateful and effectful nodes (`diff`, `cond`, `block`, `set`, clock
//!   control, `debug`) run at most once per frame
//!
//! The last rule is what guarantees that a side effect reachable from two
//! outputs (for example, a snap resolution shared by the x and y pipelines) is
//! applied once per frame, and that `diff` samples its input once per frame.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use core::sync::atomic::{AtomicU32, Ordering};

use super::clock::ClockState;
use super::event::{EventBinding, EventFields};
use super::node::{CellId, ClockCommand, ClockId, Memo, NodeId, NodeKind, Span, from_bool, truthy};

/// Errors that can occur while driving the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The node does not belong to this graph.
    NodeNotFound(NodeId),
    /// A frame timestamp was NaN or infinite.
    InvalidTimestamp(f64),
    /// A frame timestamp was earlier than the previous one.
    NonMonotonicTime {
        /// Timestamp of the previous frame.
        previous: f64,
        /// Rejected timestamp.
        current: f64,
    },
}

impl core::fmt::Display for GraphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id} not found"),
            Self::InvalidTimestamp(t) => write!(f, "invalid frame timestamp {t}"),
            Self::NonMonotonicTime { previous, current } => write!(
                f,
                "frame timestamp went backwards ({current} ms after {previous} ms)"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GraphError {}

/// Source of the per-graph tag stored in every handle.
static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(0);

/// Cached value of one node.
#[derive(Clone, Copy, Debug)]
struct MemoSlot {
    frame: u64,
    epoch: u64,
    value: f64,
}

impl MemoSlot {
    const EMPTY: Self = Self {
        frame: u64::MAX,
        epoch: 0,
        value: 0.0,
    };
}

/// A declarative graph of numeric animation nodes.
///
/// Nodes are created with the builder methods (`add`, `cond`, `set`, ...),
/// each of which returns a handle to a new node that only references existing
/// nodes. The graph is therefore always a DAG.
///
/// # Usage
///
/// 1. Build nodes: [`cell()`](Self::cell), [`clock()`](Self::clock),
///    operators, [`cond()`](Self::cond), [`block()`](Self::block)
/// 2. Per rendered frame: [`begin_frame()`](Self::begin_frame)
/// 3. Sample outputs: [`evaluate()`](Self::evaluate)
///
/// ```rust
/// use kinema_core::graph::AnimationGraph;
///
/// let mut graph = AnimationGraph::new();
/// let clock = graph.clock();
/// let dt = graph.diff(clock);
/// let start = graph.start_clock(clock);
/// let out = graph.block([start, dt]);
///
/// graph.begin_frame(0.0).unwrap();
/// assert_eq!(graph.evaluate(out).unwrap(), 0.0);
/// graph.begin_frame(16.0).unwrap();
/// assert_eq!(graph.evaluate(out).unwrap(), 16.0);
/// ```
///
/// Handles are tied to the graph that created them. A clone shares its
/// source's identity, so handles stay valid on the copy.
#[derive(Debug, Clone)]
pub struct AnimationGraph {
    id: u32,
    pub(crate) nodes: Vec<NodeKind>,
    memo: Vec<MemoSlot>,
    /// Child lists for N-ary nodes (blocks, AND, OR).
    pub(crate) lists: Vec<NodeId>,
    pub(crate) cells: Vec<f64>,
    pub(crate) cell_nodes: Vec<NodeId>,
    pub(crate) clocks: Vec<ClockState>,
    pub(crate) clock_nodes: Vec<NodeId>,
    /// Previous sample of each diff node.
    pub(crate) diffs: Vec<Option<f64>>,
    pub(crate) labels: Vec<String>,
    frame: u64,
    epoch: u64,
    now_ms: f64,
}

impl Default for AnimationGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationGraph {
    /// Creates an empty graph at frame 0, time 0.
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            memo: Vec::new(),
            lists: Vec::new(),
            cells: Vec::new(),
            cell_nodes: Vec::new(),
            clocks: Vec::new(),
            clock_nodes: Vec::new(),
            diffs: Vec::new(),
            labels: Vec::new(),
            frame: 0,
            epoch: 0,
            now_ms: 0.0,
        }
    }

    // --- Frame protocol ---

    /// Starts a new frame at host time `timestamp_ms`.
    ///
    /// Invalidates every per-frame memo entry. Timestamps must be finite and
    /// non-decreasing.
    pub fn begin_frame(&mut self, timestamp_ms: f64) -> Result<(), GraphError> {
        if !timestamp_ms.is_finite() {
            return Err(GraphError::InvalidTimestamp(timestamp_ms));
        }
        if timestamp_ms < self.now_ms {
            return Err(GraphError::NonMonotonicTime {
                previous: self.now_ms,
                current: timestamp_ms,
            });
        }
        self.frame += 1;
        self.now_ms = timestamp_ms;
        Ok(())
    }

    /// Returns the current frame number (0 before the first frame).
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the timestamp of the current frame in milliseconds.
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Evaluates a node in the current frame.
    pub fn evaluate(&mut self, node: impl Into<NodeId>) -> Result<f64, GraphError> {
        let node = node.into();
        if !self.owns(node) {
            return Err(GraphError::NodeNotFound(node));
        }
        Ok(self.eval(node))
    }

    /// Returns whether `node` was created by this graph.
    #[inline]
    pub fn owns(&self, node: impl Into<NodeId>) -> bool {
        let node = node.into();
        node.graph == self.id && (node.index as usize) < self.nodes.len()
    }

    // --- Host-side state access ---
    //
    // These take typed handles and panic on a handle from another graph,
    // like the builder methods do.

    /// Reads the current value of a cell.
    #[inline]
    pub fn read(&self, cell: CellId) -> f64 {
        self.check_cell(cell);
        self.cells[cell.slot as usize]
    }

    /// Writes a cell from outside of evaluation.
    pub fn write(&mut self, cell: CellId, value: f64) {
        self.check_cell(cell);
        self.store(cell.slot, value);
    }

    /// Returns whether a clock is running.
    #[inline]
    pub fn is_clock_running(&self, clock: ClockId) -> bool {
        self.check_clock(clock);
        self.clocks[clock.slot as usize].is_running()
    }

    /// Returns a clock's accumulated running time at the current frame.
    #[inline]
    pub fn clock_value(&self, clock: ClockId) -> f64 {
        self.check_clock(clock);
        self.clocks[clock.slot as usize].value(self.now_ms)
    }

    /// Starts a clock from the host at the current frame time.
    pub fn start_clock_now(&mut self, clock: ClockId) {
        self.check_clock(clock);
        self.control_clock(clock.slot, ClockCommand::Start);
    }

    /// Stops a clock from the host at the current frame time.
    pub fn stop_clock_now(&mut self, clock: ClockId) {
        self.check_clock(clock);
        self.control_clock(clock.slot, ClockCommand::Stop);
    }

    /// Writes every bound field present in `event` into its cell.
    ///
    /// Returns the number of cells written.
    ///
    /// # Panics
    ///
    /// Panics if `binding` holds a cell of another graph.
    pub fn dispatch<E: EventFields + ?Sized>(&mut self, binding: &EventBinding, event: &E) -> usize {
        let mut written = 0;
        for (name, cell) in binding.iter() {
            if let Some(value) = event.field(name) {
                self.check_cell(cell);
                self.store(cell.slot, value);
                written += 1;
            }
        }
        written
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of cells in the graph.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of clocks in the graph.
    pub fn clock_count(&self) -> usize {
        self.clocks.len()
    }

    // --- Internals shared with the builder ---

    /// Appends a node, checking that every input already exists.
    pub(crate) fn push(&mut self, kind: NodeKind) -> NodeId {
        let (graph, len) = (self.id, self.nodes.len());
        kind.for_each_input(|input| {
            assert!(
                input.graph == graph && (input.index as usize) < len,
                "{input} does not belong to this graph"
            );
        });
        let id = NodeId::new(
            graph,
            u32::try_from(len).expect("node count exceeds u32::MAX"),
        );
        self.nodes.push(kind);
        self.memo.push(MemoSlot::EMPTY);
        id
    }

    /// Stores a child list, checking that every entry already exists.
    pub(crate) fn push_list(&mut self, items: &[NodeId]) -> Span {
        for item in items {
            assert!(self.owns(*item), "{item} does not belong to this graph");
        }
        let span = Span {
            start: self.lists.len() as u32,
            len: items.len() as u32,
        };
        self.lists.extend_from_slice(items);
        span
    }

    pub(crate) fn check_cell(&self, cell: CellId) {
        assert!(
            self.cell_nodes.get(cell.slot as usize) == Some(&cell.node),
            "cell {} does not belong to this graph",
            cell.node
        );
    }

    pub(crate) fn check_clock(&self, clock: ClockId) {
        assert!(
            self.clock_nodes.get(clock.slot as usize) == Some(&clock.node),
            "clock {} does not belong to this graph",
            clock.node
        );
    }

    fn store(&mut self, slot: u32, value: f64) {
        self.cells[slot as usize] = value;
        self.epoch += 1;
    }

    fn control_clock(&mut self, slot: u32, command: ClockCommand) {
        let now = self.now_ms;
        let clock = &mut self.clocks[slot as usize];
        let changed = match command {
            ClockCommand::Start => clock.start(now),
            ClockCommand::Stop => clock.stop(now),
        };
        if changed {
            self.epoch += 1;
            #[cfg(feature = "tracing")]
            tracing::trace!(clock = slot, ?command, now_ms = now, "clock state changed");
        }
    }

    // --- Evaluation ---

    fn eval(&mut self, id: NodeId) -> f64 {
        let idx = id.index as usize;
        let kind = self.nodes[idx];
        let policy = kind.memo();
        let slot = self.memo[idx];
        let cached = match policy {
            Memo::Fresh => false,
            Memo::Epoch => slot.frame == self.frame && slot.epoch == self.epoch,
            Memo::Frame => slot.frame == self.frame,
        };
        if cached {
            return slot.value;
        }

        let value = self.compute(kind);

        if policy != Memo::Fresh {
            // Record the epoch after computing: the value already reflects
            // any writes made by its own subtree.
            self.memo[idx] = MemoSlot {
                frame: self.frame,
                epoch: self.epoch,
                value,
            };
        }
        value
    }

    fn compute(&mut self, kind: NodeKind) -> f64 {
        match kind {
            NodeKind::Constant(v) => v,
            NodeKind::Cell(slot) => self.cells[slot as usize],
            NodeKind::Clock(slot) => self.clocks[slot as usize].value(self.now_ms),
            NodeKind::Unary(op, a) => {
                let x = self.eval(a);
                op.apply(x)
            }
            NodeKind::Binary(op, a, b) => {
                let x = self.eval(a);
                let y = self.eval(b);
                op.apply(x, y)
            }
            NodeKind::All(span) => {
                for i in span.range() {
                    let child = self.lists[i];
                    if !truthy(self.eval(child)) {
                        return 0.0;
                    }
                }
                1.0
            }
            NodeKind::Any(span) => {
                for i in span.range() {
                    let child = self.lists[i];
                    if truthy(self.eval(child)) {
                        return 1.0;
                    }
                }
                0.0
            }
            NodeKind::Cond {
                test,
                then,
                otherwise,
            } => {
                let branch = if truthy(self.eval(test)) {
                    then
                } else {
                    otherwise
                };
                match branch {
                    Some(node) => self.eval(node),
                    None => 0.0,
                }
            }
            NodeKind::Block(span) => {
                let mut last = 0.0;
                for i in span.range() {
                    let child = self.lists[i];
                    last = self.eval(child);
                }
                last
            }
            NodeKind::Set { cell, value } => {
                let v = self.eval(value);
                self.store(cell, v);
                v
            }
            NodeKind::ClockControl { clock, command } => {
                self.control_clock(clock, command);
                0.0
            }
            NodeKind::ClockRunning(slot) => from_bool(self.clocks[slot as usize].is_running()),
            NodeKind::ClockElapsed(slot) => self.clocks[slot as usize].elapsed(self.now_ms),
            NodeKind::Diff { input, slot } => {
                let v = self.eval(input);
                match self.diffs[slot as usize].replace(v) {
                    Some(prev) => v - prev,
                    None => 0.0,
                }
            }
            NodeKind::Ease(easing, input) => {
                let t = self.eval(input);
                easing.apply(t)
            }
            NodeKind::Debug { label, input } => {
                let v = self.eval(input);
                #[cfg(feature = "tracing")]
                tracing::debug!(label = %self.labels[label as usize], value = v, frame = self.frame, "debug node");
                #[cfg(not(feature = "tracing"))]
                let _ = label;
                v
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_unknown_node() {
        let mut graph = AnimationGraph::new();
        let mut other = AnimationGraph::new();
        other.constant(1.0);
        let foreign = other.constant(2.0);
        assert_eq!(
            graph.evaluate(foreign),
            Err(GraphError::NodeNotFound(foreign))
        );
    }

    #[test]
    fn test_evaluate_rejects_node_of_same_shaped_graph() {
        let mut graph = AnimationGraph::new();
        graph.constant(1.0);
        graph.constant(2.0);
        let mut other = AnimationGraph::new();
        other.constant(1.0);
        let foreign = other.constant(2.0);

        assert!(!graph.owns(foreign));
        assert_eq!(
            graph.evaluate(foreign),
            Err(GraphError::NodeNotFound(foreign))
        );
        assert_eq!(other.evaluate(foreign), Ok(2.0));
    }

    #[test]
    fn test_clone_accepts_source_handles() {
        let mut graph = AnimationGraph::new();
        let x = graph.cell(4.0);
        let mut copy = graph.clone();
        copy.write(x, 5.0);
        assert_eq!(copy.evaluate(x), Ok(5.0));
        assert_eq!(graph.read(x), 4.0);
    }

    #[test]
    #[should_panic(expected = "does not belong to this graph")]
    fn test_read_rejects_foreign_cell() {
        let mut graph = AnimationGraph::new();
        graph.cell(0.0);
        let mut other = AnimationGraph::new();
        let foreign = other.cell(1.0);
        graph.read(foreign);
    }

    #[test]
    #[should_panic(expected = "does not belong to this graph")]
    fn test_write_rejects_foreign_cell() {
        let mut graph = AnimationGraph::new();
        graph.cell(0.0);
        let mut other = AnimationGraph::new();
        let foreign = other.cell(1.0);
        graph.write(foreign, 3.0);
    }

    #[test]
    fn test_begin_frame_rejects_backwards_time() {
        let mut graph = AnimationGraph::new();
        graph.begin_frame(100.0).unwrap();
        assert_eq!(
            graph.begin_frame(50.0),
            Err(GraphError::NonMonotonicTime {
                previous: 100.0,
                current: 50.0
            })
        );
        assert!(matches!(
            graph.begin_frame(f64::NAN),
            Err(GraphError::InvalidTimestamp(_))
        ));
        assert_eq!(graph.frame(), 1);
        graph.begin_frame(100.0).unwrap();
        assert_eq!(graph.frame(), 2);
    }

    #[test]
    fn test_cell_write_visible_to_pure_node_in_same_frame() {
        let mut graph = AnimationGraph::new();
        let cell = graph.cell(1.0);
        let doubled = graph.multiply(cell, 2.0);
        graph.begin_frame(0.0).unwrap();
        assert_eq!(graph.evaluate(doubled).unwrap(), 2.0);
        assert_eq!(graph.evaluate(doubled).unwrap(), 2.0);
        graph.write(cell, 5.0);
        assert_eq!(graph.evaluate(doubled).unwrap(), 10.0);
    }

    #[test]
    fn test_set_runs_once_per_frame() {
        let mut graph = AnimationGraph::new();
        let counter = graph.cell(0.0);
        let next = graph.add(counter, 1.0);
        let bump = graph.set(counter, next);

        graph.begin_frame(0.0).unwrap();
        graph.evaluate(bump).unwrap();
        graph.evaluate(bump).unwrap();
        assert_eq!(graph.read(counter), 1.0);

        graph.begin_frame(16.0).unwrap();
        graph.evaluate(bump).unwrap();
        assert_eq!(graph.read(counter), 2.0);
    }

    #[test]
    fn test_cond_skips_untaken_branch_side_effects() {
        let mut graph = AnimationGraph::new();
        let flag = graph.cell(0.0);
        let hit = graph.cell(0.0);
        let miss = graph.cell(0.0);
        let set_hit = graph.set(hit, 1.0);
        let set_miss = graph.set(miss, 1.0);
        let branch = graph.cond_else(flag, set_miss, set_hit);

        graph.begin_frame(0.0).unwrap();
        graph.evaluate(branch).unwrap();
        assert_eq!(graph.read(hit), 1.0);
        assert_eq!(graph.read(miss), 0.0);
    }

    #[test]
    fn test_cond_without_taken_branch_is_zero() {
        let mut graph = AnimationGraph::new();
        let then = graph.constant(7.0);
        let no = graph.cond(0.0, then);
        let yes = graph.cond(1.0, then);
        assert_eq!(graph.evaluate(no).unwrap(), 0.0);
        assert_eq!(graph.evaluate(yes).unwrap(), 7.0);
    }

    #[test]
    fn test_diff_first_sample_is_zero_and_memoized_per_frame() {
        let mut graph = AnimationGraph::new();
        let cell = graph.cell(10.0);
        let delta = graph.diff(cell);

        graph.begin_frame(0.0).unwrap();
        assert_eq!(graph.evaluate(delta).unwrap(), 0.0);

        graph.write(cell, 13.0);
        graph.begin_frame(16.0).unwrap();
        assert_eq!(graph.evaluate(delta).unwrap(), 3.0);
        assert_eq!(graph.evaluate(delta).unwrap(), 3.0, "sampled once per frame");

        graph.begin_frame(32.0).unwrap();
        assert_eq!(graph.evaluate(delta).unwrap(), 0.0);
    }

    #[test]
    fn test_clock_diff_is_zero_on_start_frame() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let dt = graph.diff(clock);
        let start = graph.start_clock(clock);
        let out = graph.block([start, dt]);

        graph.begin_frame(1000.0).unwrap();
        assert_eq!(graph.evaluate(out).unwrap(), 0.0);
        graph.begin_frame(1016.0).unwrap();
        assert_eq!(graph.evaluate(out).unwrap(), 16.0);

        graph.stop_clock_now(clock);
        graph.begin_frame(5000.0).unwrap();
        assert_eq!(graph.evaluate(out).unwrap(), 0.0, "restart does not jump");
        graph.begin_frame(5010.0).unwrap();
        assert_eq!(graph.evaluate(out).unwrap(), 10.0);
    }

    #[test]
    fn test_dispatch_writes_only_present_fields() {
        let mut graph = AnimationGraph::new();
        let a = graph.cell(0.0);
        let b = graph.cell(-1.0);
        let binding = EventBinding::new().with_field("a", a).with_field("b", b);
        let written = graph.dispatch(&binding, &[("a", 3.0)]);
        assert_eq!(written, 1);
        assert_eq!(graph.read(a), 3.0);
        assert_eq!(graph.read(b), -1.0);
    }

    #[test]
    #[should_panic]
    fn test_foreign_operand_panics() {
        let mut graph = AnimationGraph::new();
        let mut other = AnimationGraph::new();
        for _ in 0..4 {
            other.constant(0.0);
        }
        let foreign = other.constant(1.0);
        graph.add(foreign, 1.0);
    }

    #[test]
    #[should_panic(expected = "does not belong to this graph")]
    fn test_foreign_operand_panics_even_when_index_exists() {
        let mut graph = AnimationGraph::new();
        for _ in 0..4 {
            graph.constant(0.0);
        }
        let mut other = AnimationGraph::new();
        let foreign = other.constant(1.0);
        graph.add(foreign, 1.0);
    }
}
