//! Time-based easing animation driven by a graph clock.
//!
//! [`run_timing`] builds the node that animates a value from its current
//! reading toward a destination over a fixed duration. The node is meant to
//! be evaluated once per frame:
//!
//! 1. if the clock is stopped and `finished` is clear, the state is reset from
//!    `value` and the clock is started
//! 2. `frame_time` advances by the clock delta and `position` moves along the
//!    eased path toward the destination
//! 3. once `frame_time` reaches the duration, `position` snaps to the
//!    destination, `finished` is set and the clock is stopped
//!
//! The node yields `position`. After a run finished it keeps yielding the
//! destination; writing `0.0` to [`TimingState::finished`] starts a new run
//! from `value` on the next evaluated frame.
//!
//! The position update is incremental: each frame derives the full travel
//! from the remaining distance and the current progress, so the animation
//! keeps tracking a destination that changes mid-flight.

use crate::easing::{Curve, Easing};
use crate::graph::{AnimationGraph, CellId, ClockId, IntoNode, NodeId};

/// Default animation length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 5000.0;

/// Timing animation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TimingConfig {
    /// Animation length in milliseconds. Zero jumps straight to the destination.
    pub duration_ms: f64,
    /// Progress curve.
    pub easing: Easing,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::in_out(Curve::Ease),
        }
    }
}

/// Cells holding the progress of one timing animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingState {
    /// `1.0` once the current run reached its destination.
    pub finished: CellId,
    /// Current animated value.
    pub position: CellId,
    /// Clock reading at the previous step.
    pub time: CellId,
    /// Milliseconds of the current run consumed so far.
    pub frame_time: CellId,
    /// Destination captured when the run started.
    pub to_value: CellId,
}

impl TimingState {
    /// Allocates zeroed state cells.
    pub fn new(graph: &mut AnimationGraph) -> Self {
        Self {
            finished: graph.cell(0.0),
            position: graph.cell(0.0),
            time: graph.cell(0.0),
            frame_time: graph.cell(0.0),
            to_value: graph.cell(0.0),
        }
    }
}

/// Handles returned by [`run_timing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Per-frame node; yields the animated position.
    pub node: NodeId,
    /// State cells, for inspection.
    pub state: TimingState,
}

/// One timing step: advances `frame_time`, moves `position`, sets `finished`.
fn timing_step(
    graph: &mut AnimationGraph,
    clock: ClockId,
    state: TimingState,
    config: &TimingConfig,
) -> NodeId {
    let duration = graph.constant(config.duration_ms);

    let elapsed = graph.sub(clock, state.time);
    let new_frame_time = graph.add(state.frame_time, elapsed);

    let ratio = graph.divide(state.frame_time, duration);
    let progress = graph.ease(config.easing, ratio);
    let next_ratio = graph.divide(new_frame_time, duration);
    let next_progress = graph.ease(config.easing, next_ratio);

    let remaining = graph.sub(state.to_value, state.position);
    let left = graph.sub(1.0, progress);
    let full_distance = graph.divide(remaining, left);
    let start = graph.sub(state.to_value, full_distance);
    let travelled = graph.multiply(full_distance, next_progress);
    let next = graph.add(start, travelled);

    let done = graph.greater_or_eq(new_frame_time, duration);
    let arrive = graph.set(state.position, state.to_value);
    let mark = graph.set(state.finished, 1.0);
    let finish = graph.block([arrive, mark]);
    let advance = graph.set(state.position, next);
    let move_position = graph.cond_else(done, finish, advance);

    let store_frame_time = graph.set(state.frame_time, new_frame_time);
    let store_time = graph.set(state.time, clock);
    graph.block([move_position, store_frame_time, store_time])
}

/// Builds a timing animation of `value` toward `destination`.
///
/// `value` is read when a run starts; `destination` is captured at the same
/// moment.
pub fn run_timing(
    graph: &mut AnimationGraph,
    clock: ClockId,
    value: impl IntoNode,
    destination: impl IntoNode,
    config: &TimingConfig,
) -> Timing {
    let value = value.into_node(graph);
    let destination = destination.into_node(graph);
    let state = TimingState::new(graph);

    let running = graph.clock_running(clock);
    let reset = {
        let finished = graph.set(state.finished, 0.0);
        let position = graph.set(state.position, value);
        let frame_time = graph.set(state.frame_time, 0.0);
        let to_value = graph.set(state.to_value, destination);
        let start = graph.start_clock(clock);
        // Recorded after the start so the first step sees a zero delta.
        let time = graph.set(state.time, clock);
        graph.block([finished, position, frame_time, to_value, start, time])
    };
    let idle = graph.or([running, state.finished.into()]);
    let setup = graph.cond_else(idle, 0.0, reset);

    let step = timing_step(graph, clock, state, config);
    let stop = graph.stop_clock(clock);
    let stop = graph.debug("timing finished", stop);
    let stop_when_finished = graph.cond(state.finished, stop);
    let advance = graph.block([step, stop_when_finished]);
    let advance = graph.cond_else(state.finished, 0.0, advance);

    let node = graph.block([setup, advance, state.position.into()]);
    Timing { node, state }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(graph: &mut AnimationGraph, node: NodeId, frames: u32, step_ms: f64) -> f64 {
        let mut out = 0.0;
        for frame in 0..frames {
            graph.begin_frame(f64::from(frame) * step_ms).unwrap();
            out = graph.evaluate(node).unwrap();
        }
        out
    }

    #[test]
    fn test_first_frame_holds_start_value() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let timing = run_timing(&mut graph, clock, 10.0, 20.0, &TimingConfig::default());
        graph.begin_frame(0.0).unwrap();
        assert_eq!(graph.evaluate(timing.node).unwrap(), 10.0);
        assert!(graph.is_clock_running(clock));
    }

    #[test]
    fn test_reaches_destination_and_stops_clock() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let timing = run_timing(&mut graph, clock, 0.0, 120.0, &TimingConfig::default());

        // 10 ms frames: frame 500 lands exactly on the 5000 ms duration.
        let out = drive(&mut graph, timing.node, 501, 10.0);
        assert_eq!(out, 120.0);
        assert_eq!(graph.read(timing.state.finished), 1.0);
        assert!(!graph.is_clock_running(clock));
    }

    #[test]
    fn test_midpoint_of_symmetric_easing() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let timing = run_timing(&mut graph, clock, 0.0, 120.0, &TimingConfig::default());
        let out = drive(&mut graph, timing.node, 251, 10.0);
        assert!((out - 60.0).abs() < 1e-6, "midpoint was {out}");
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let config = TimingConfig {
            duration_ms: 1000.0,
            ..TimingConfig::default()
        };
        let timing = run_timing(&mut graph, clock, 0.0, -50.0, &config);
        let mut prev = 0.0;
        for frame in 0..=59 {
            graph.begin_frame(f64::from(frame) * 17.0).unwrap();
            let v = graph.evaluate(timing.node).unwrap();
            assert!(v <= prev + 1e-9, "frame {frame}: {v} > {prev}");
            prev = v;
        }
        assert_eq!(prev, -50.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_destination() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let config = TimingConfig {
            duration_ms: 0.0,
            ..TimingConfig::default()
        };
        let timing = run_timing(&mut graph, clock, 3.0, 7.0, &config);
        graph.begin_frame(0.0).unwrap();
        assert_eq!(graph.evaluate(timing.node).unwrap(), 7.0);
        assert!(!graph.is_clock_running(clock));
    }

    #[test]
    fn test_holds_destination_after_finishing() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let timing = run_timing(&mut graph, clock, 0.0, 120.0, &TimingConfig::default());
        assert_eq!(drive(&mut graph, timing.node, 501, 10.0), 120.0);

        for t in [5010.0, 5020.0, 9000.0] {
            graph.begin_frame(t).unwrap();
            assert_eq!(graph.evaluate(timing.node).unwrap(), 120.0);
            assert_eq!(graph.read(timing.state.finished), 1.0);
            assert!(!graph.is_clock_running(clock));
        }
    }

    #[test]
    fn test_clearing_finished_starts_new_run() {
        let mut graph = AnimationGraph::new();
        let clock = graph.clock();
        let config = TimingConfig {
            duration_ms: 100.0,
            easing: Easing::LINEAR,
        };
        let timing = run_timing(&mut graph, clock, 0.0, 10.0, &config);
        assert_eq!(drive(&mut graph, timing.node, 11, 10.0), 10.0);

        graph.begin_frame(500.0).unwrap();
        assert_eq!(graph.evaluate(timing.node).unwrap(), 10.0);

        graph.write(timing.state.finished, 0.0);
        graph.begin_frame(510.0).unwrap();
        assert_eq!(graph.evaluate(timing.node).unwrap(), 0.0);
        assert!(graph.is_clock_running(clock));
        graph.begin_frame(560.0).unwrap();
        let v = graph.evaluate(timing.node).unwrap();
        assert!((v - 5.0).abs() < 1e-9, "halfway was {v}");
    }
}
