//! Graph node types for the animation node graph.
//!
//! Every node in an [`AnimationGraph`](super::AnimationGraph) has a [`NodeId`]
//! and an internal `NodeKind` describing what it computes. Cells and clocks
//! get dedicated handles ([`CellId`], [`ClockId`]) so that writes and clock
//! control are only expressible on nodes that actually carry state.
//!
//! Numeric conventions shared by all operators:
//!
//! - booleans are `1.0` (true) and `0.0` (false)
//! - a value is truthy when it is nonzero and not NaN
//! - division and modulo by zero yield `0.0` instead of infinity/NaN

use crate::easing::Easing;

use super::AnimationGraph;

/// Unique identifier for a node in the animation graph.
///
/// Node IDs are assigned sequentially and never reused within a graph instance.
/// A node may only reference nodes with smaller IDs, which keeps the graph
/// acyclic by construction. Each ID also records the graph that created it,
/// so a handle used on another graph is rejected instead of aliasing an
/// unrelated node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: u32,
    pub(crate) index: u32,
}

impl NodeId {
    #[inline]
    pub(crate) const fn new(graph: u32, index: u32) -> Self {
        Self { graph, index }
    }

    /// Returns the position of the node within its graph.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NodeId({})", self.index)
    }
}

/// Handle to a mutable cell: a node whose value persists across frames.
///
/// Cells are the only values that survive from one frame to the next (besides
/// clock and diff bookkeeping). They are written by `set` nodes during
/// evaluation or by the host through [`AnimationGraph::write`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId {
    pub(crate) node: NodeId,
    pub(crate) slot: u32,
}

impl CellId {
    /// Returns the node that reads this cell.
    #[inline]
    pub fn node(self) -> NodeId {
        self.node
    }
}

/// Handle to a clock node.
///
/// A clock evaluates to its accumulated running time in milliseconds. See
/// [`ClockState`](super::ClockState) for the exact semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClockId {
    pub(crate) node: NodeId,
    pub(crate) slot: u32,
}

impl ClockId {
    /// Returns the node that reads this clock.
    #[inline]
    pub fn node(self) -> NodeId {
        self.node
    }
}

impl From<CellId> for NodeId {
    fn from(cell: CellId) -> Self {
        cell.node
    }
}

impl From<ClockId> for NodeId {
    fn from(clock: ClockId) -> Self {
        clock.node
    }
}

/// Anything that can be used as an operand of a graph builder method.
///
/// Implemented for node handles (used as-is) and for plain numbers, which
/// become constant nodes. This lets builders read like the math they encode:
///
/// ```rust
/// use kinema_core::graph::AnimationGraph;
///
/// let mut graph = AnimationGraph::new();
/// let x = graph.cell(2.0);
/// let y = graph.multiply(x, 3.0);
/// let z = graph.add(y, 1.0);
/// assert_eq!(graph.evaluate(z).unwrap(), 7.0);
/// ```
pub trait IntoNode {
    /// Resolves the operand to a node of `graph`, creating it if needed.
    fn into_node(self, graph: &mut AnimationGraph) -> NodeId;
}

impl IntoNode for NodeId {
    #[inline]
    fn into_node(self, _graph: &mut AnimationGraph) -> NodeId {
        self
    }
}

impl IntoNode for CellId {
    #[inline]
    fn into_node(self, _graph: &mut AnimationGraph) -> NodeId {
        self.node
    }
}

impl IntoNode for ClockId {
    #[inline]
    fn into_node(self, _graph: &mut AnimationGraph) -> NodeId {
        self.node
    }
}

impl IntoNode for f64 {
    #[inline]
    fn into_node(self, graph: &mut AnimationGraph) -> NodeId {
        graph.constant(self)
    }
}

impl IntoNode for bool {
    #[inline]
    fn into_node(self, graph: &mut AnimationGraph) -> NodeId {
        graph.constant(from_bool(self))
    }
}

/// Returns whether a node value counts as true.
#[inline]
pub fn truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

/// Encodes a boolean as a node value.
#[inline]
pub fn from_bool(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Single-input operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `|x|`
    Abs,
    /// Square root.
    Sqrt,
    /// `e^x`
    Exp,
    /// Natural logarithm.
    Log,
    /// Sine (radians).
    Sin,
    /// Cosine (radians).
    Cos,
    /// Tangent (radians).
    Tan,
    /// Round half away from zero.
    Round,
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceil,
    /// Logical negation.
    Not,
}

impl UnaryOp {
    /// Applies the operator to a value.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Neg => -x,
            Self::Abs => libm::fabs(x),
            Self::Sqrt => libm::sqrt(x),
            Self::Exp => libm::exp(x),
            Self::Log => libm::log(x),
            Self::Sin => libm::sin(x),
            Self::Cos => libm::cos(x),
            Self::Tan => libm::tan(x),
            Self::Round => libm::round(x),
            Self::Floor => libm::floor(x),
            Self::Ceil => libm::ceil(x),
            Self::Not => from_bool(!truthy(x)),
        }
    }
}

/// Two-input operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`, `0.0` when `b == 0`.
    Div,
    /// `a^b`
    Pow,
    /// Remainder of `a / b` with the sign of `a`, `0.0` when `b == 0`.
    Mod,
    /// Smaller of the two.
    Min,
    /// Larger of the two.
    Max,
    /// `a < b`
    Less,
    /// `a <= b`
    LessOrEq,
    /// `a > b`
    Greater,
    /// `a >= b`
    GreaterOrEq,
    /// `a == b`
    Eq,
    /// `a != b`
    NotEq,
}

impl BinaryOp {
    /// Applies the operator to two values.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => {
                if b == 0.0 {
                    0.0
                } else {
                    a / b
                }
            }
            Self::Pow => libm::pow(a, b),
            Self::Mod => {
                if b == 0.0 {
                    0.0
                } else {
                    libm::fmod(a, b)
                }
            }
            Self::Min => a.min(b),
            Self::Max => a.max(b),
            Self::Less => from_bool(a < b),
            Self::LessOrEq => from_bool(a <= b),
            Self::Greater => from_bool(a > b),
            Self::GreaterOrEq => from_bool(a >= b),
            Self::Eq => from_bool(a == b),
            Self::NotEq => from_bool(a != b),
        }
    }
}

/// Clock control commands carried by clock-control nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClockCommand {
    Start,
    Stop,
}

/// A contiguous run of child node IDs stored in the graph's list arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn range(self) -> core::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

/// How long a computed node value stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Memo {
    /// Always recomputed (plain state reads).
    Fresh,
    /// Valid for the current frame until the next state write.
    Epoch,
    /// Computed at most once per frame.
    Frame,
}

/// What a node computes. Indices point into the graph's side tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum NodeKind {
    Constant(f64),
    Cell(u32),
    Clock(u32),
    Unary(UnaryOp, NodeId),
    Binary(BinaryOp, NodeId, NodeId),
    All(Span),
    Any(Span),
    Cond {
        test: NodeId,
        then: Option<NodeId>,
        otherwise: Option<NodeId>,
    },
    Block(Span),
    Set {
        cell: u32,
        value: NodeId,
    },
    ClockControl {
        clock: u32,
        command: ClockCommand,
    },
    ClockRunning(u32),
    ClockElapsed(u32),
    Diff {
        input: NodeId,
        slot: u32,
    },
    Ease(Easing, NodeId),
    Debug {
        label: u32,
        input: NodeId,
    },
}

impl NodeKind {
    pub fn memo(&self) -> Memo {
        match self {
            Self::Constant(_)
            | Self::Cell(_)
            | Self::Clock(_)
            | Self::ClockRunning(_)
            | Self::ClockElapsed(_) => Memo::Fresh,
            Self::Unary(..) | Self::Binary(..) | Self::All(_) | Self::Any(_) | Self::Ease(..) => {
                Memo::Epoch
            }
            Self::Cond { .. }
            | Self::Block(_)
            | Self::Set { .. }
            | Self::ClockControl { .. }
            | Self::Diff { .. }
            | Self::Debug { .. } => Memo::Frame,
        }
    }

    /// Calls `f` with every direct input that is not stored in a span.
    pub fn for_each_input(&self, mut f: impl FnMut(NodeId)) {
        match *self {
            Self::Unary(_, a) | Self::Ease(_, a) => f(a),
            Self::Binary(_, a, b) => {
                f(a);
                f(b);
            }
            Self::Cond {
                test,
                then,
                otherwise,
            } => {
                f(test);
                if let Some(n) = then {
                    f(n);
                }
                if let Some(n) = otherwise {
                    f(n);
                }
            }
            Self::Set { value, .. } => f(value),
            Self::Diff { input, .. } | Self::Debug { input, .. } => f(input),
            Self::Constant(_)
            | Self::Cell(_)
            | Self::Clock(_)
            | Self::All(_)
            | Self::Any(_)
            | Self::Block(_)
            | Self::ClockControl { .. }
            | Self::ClockRunning(_)
            | Self::ClockElapsed(_) => {}
        }
    }
}
