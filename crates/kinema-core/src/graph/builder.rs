//! Node constructors.
//!
//! Every method here appends one node (plus constants for numeric operands)
//! and returns its handle. Operands accept anything implementing
//! [`IntoNode`], so `graph.add(x, 1.0)` works with node handles and numbers.
//!
//! # Panics
//!
//! Every constructor panics if an operand handle belongs to another graph.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::easing::Easing;

use super::AnimationGraph;
use super::clock::ClockState;
use super::node::{BinaryOp, CellId, ClockCommand, ClockId, IntoNode, NodeId, NodeKind, UnaryOp};

impl AnimationGraph {
    // --- Leaves ---

    /// Adds a constant node.
    pub fn constant(&mut self, value: f64) -> NodeId {
        self.push(NodeKind::Constant(value))
    }

    /// Adds a mutable cell with an initial value.
    pub fn cell(&mut self, initial: f64) -> CellId {
        let slot = self.cells.len() as u32;
        self.cells.push(initial);
        let node = self.push(NodeKind::Cell(slot));
        self.cell_nodes.push(node);
        CellId { node, slot }
    }

    /// Adds a stopped clock.
    pub fn clock(&mut self) -> ClockId {
        let slot = self.clocks.len() as u32;
        self.clocks.push(ClockState::new());
        let node = self.push(NodeKind::Clock(slot));
        self.clock_nodes.push(node);
        ClockId { node, slot }
    }

    // --- Generic operators ---

    /// Adds a single-input operator node.
    pub fn unary(&mut self, op: UnaryOp, input: impl IntoNode) -> NodeId {
        let input = input.into_node(self);
        self.push(NodeKind::Unary(op, input))
    }

    /// Adds a two-input operator node.
    pub fn binary(&mut self, op: BinaryOp, lhs: impl IntoNode, rhs: impl IntoNode) -> NodeId {
        let lhs = lhs.into_node(self);
        let rhs = rhs.into_node(self);
        self.push(NodeKind::Binary(op, lhs, rhs))
    }

    // --- Arithmetic ---

    /// `a + b`
    pub fn add(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Add, a, b)
    }

    /// `a - b`
    pub fn sub(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Sub, a, b)
    }

    /// `a * b`
    pub fn multiply(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Mul, a, b)
    }

    /// `a / b`; yields `0.0` when `b` is zero.
    pub fn divide(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Div, a, b)
    }

    /// `a^b`
    pub fn pow(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Pow, a, b)
    }

    /// Remainder of `a / b`; yields `0.0` when `b` is zero.
    pub fn modulo(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Mod, a, b)
    }

    /// Smaller of `a` and `b`.
    pub fn min(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Min, a, b)
    }

    /// Larger of `a` and `b`.
    pub fn max(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Max, a, b)
    }

    /// `x * x`
    pub fn square(&mut self, x: impl IntoNode) -> NodeId {
        let x = x.into_node(self);
        self.multiply(x, x)
    }

    /// `-x`
    pub fn neg(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Neg, x)
    }

    /// `|x|`
    pub fn abs(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Abs, x)
    }

    /// Square root.
    pub fn sqrt(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Sqrt, x)
    }

    /// `e^x`
    pub fn exp(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Exp, x)
    }

    /// Natural logarithm.
    pub fn log(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Log, x)
    }

    /// Sine of `x` radians.
    pub fn sin(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Sin, x)
    }

    /// Cosine of `x` radians.
    pub fn cos(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Cos, x)
    }

    /// Tangent of `x` radians.
    pub fn tan(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Tan, x)
    }

    /// Round half away from zero.
    pub fn round(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Round, x)
    }

    /// Round toward negative infinity.
    pub fn floor(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Floor, x)
    }

    /// Round toward positive infinity.
    pub fn ceil(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Ceil, x)
    }

    // --- Comparison and logic ---

    /// `a < b`
    pub fn less_than(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Less, a, b)
    }

    /// `a <= b`
    pub fn less_or_eq(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::LessOrEq, a, b)
    }

    /// `a > b`
    pub fn greater_than(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Greater, a, b)
    }

    /// `a >= b`
    pub fn greater_or_eq(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::GreaterOrEq, a, b)
    }

    /// `a == b`
    pub fn eq(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::Eq, a, b)
    }

    /// `a != b`
    pub fn neq(&mut self, a: impl IntoNode, b: impl IntoNode) -> NodeId {
        self.binary(BinaryOp::NotEq, a, b)
    }

    /// Logical negation.
    pub fn not(&mut self, x: impl IntoNode) -> NodeId {
        self.unary(UnaryOp::Not, x)
    }

    /// Logical AND over any number of predicates, short-circuiting on the
    /// first falsy one. An empty AND is true.
    pub fn and(&mut self, predicates: impl IntoIterator<Item = NodeId>) -> NodeId {
        let items: Vec<NodeId> = predicates.into_iter().collect();
        let span = self.push_list(&items);
        self.push(NodeKind::All(span))
    }

    /// Logical OR over any number of predicates, short-circuiting on the
    /// first truthy one. An empty OR is false.
    pub fn or(&mut self, predicates: impl IntoIterator<Item = NodeId>) -> NodeId {
        let items: Vec<NodeId> = predicates.into_iter().collect();
        let span = self.push_list(&items);
        self.push(NodeKind::Any(span))
    }

    // --- Control flow ---

    /// Evaluates `then` only when `test` is truthy; yields `0.0` otherwise.
    pub fn cond(&mut self, test: impl IntoNode, then: impl IntoNode) -> NodeId {
        let test = test.into_node(self);
        let then = then.into_node(self);
        self.push(NodeKind::Cond {
            test,
            then: Some(then),
            otherwise: None,
        })
    }

    /// Evaluates exactly one of `then` / `otherwise` depending on `test`.
    pub fn cond_else(
        &mut self,
        test: impl IntoNode,
        then: impl IntoNode,
        otherwise: impl IntoNode,
    ) -> NodeId {
        let test = test.into_node(self);
        let then = then.into_node(self);
        let otherwise = otherwise.into_node(self);
        self.push(NodeKind::Cond {
            test,
            then: Some(then),
            otherwise: Some(otherwise),
        })
    }

    /// Evaluates `nodes` in order and yields the last value (`0.0` if empty).
    pub fn block(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> NodeId {
        let items: Vec<NodeId> = nodes.into_iter().collect();
        let span = self.push_list(&items);
        self.push(NodeKind::Block(span))
    }

    // --- State ---

    /// Writes `value` into `cell` and yields the written value.
    pub fn set(&mut self, cell: CellId, value: impl IntoNode) -> NodeId {
        self.check_cell(cell);
        let value = value.into_node(self);
        self.push(NodeKind::Set {
            cell: cell.slot,
            value,
        })
    }

    /// Starts `clock` when evaluated (no-op if already running). Yields `0.0`.
    pub fn start_clock(&mut self, clock: ClockId) -> NodeId {
        self.check_clock(clock);
        self.push(NodeKind::ClockControl {
            clock: clock.slot,
            command: ClockCommand::Start,
        })
    }

    /// Stops `clock` when evaluated (no-op if already stopped). Yields `0.0`.
    pub fn stop_clock(&mut self, clock: ClockId) -> NodeId {
        self.check_clock(clock);
        self.push(NodeKind::ClockControl {
            clock: clock.slot,
            command: ClockCommand::Stop,
        })
    }

    /// `1.0` while `clock` is running, `0.0` otherwise.
    pub fn clock_running(&mut self, clock: ClockId) -> NodeId {
        self.check_clock(clock);
        self.push(NodeKind::ClockRunning(clock.slot))
    }

    /// Milliseconds since `clock` was last started.
    pub fn clock_elapsed(&mut self, clock: ClockId) -> NodeId {
        self.check_clock(clock);
        self.push(NodeKind::ClockElapsed(clock.slot))
    }

    /// Change of `input` since its previous sample; `0.0` on the first sample.
    pub fn diff(&mut self, input: impl IntoNode) -> NodeId {
        let input = input.into_node(self);
        let slot = self.diffs.len() as u32;
        self.diffs.push(None);
        self.push(NodeKind::Diff { input, slot })
    }

    // --- Misc ---

    /// Applies an easing curve to `input`.
    pub fn ease(&mut self, easing: Easing, input: impl IntoNode) -> NodeId {
        let input = input.into_node(self);
        self.push(NodeKind::Ease(easing, input))
    }

    /// Passes `input` through, logging its value under `label` when the
    /// `tracing` feature is enabled.
    pub fn debug(&mut self, label: impl Into<String>, input: impl IntoNode) -> NodeId {
        let input = input.into_node(self);
        let label_idx = self.labels.len() as u32;
        self.labels.push(label.into());
        self.push(NodeKind::Debug {
            label: label_idx,
            input,
        })
    }
}
