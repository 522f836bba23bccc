//! Frame clocks.
//!
//! A clock is the graph's only source of time. Its node value is the
//! accumulated *running* time in milliseconds: it advances with the host's
//! frame timestamps while running and is frozen while stopped. Restarting a
//! clock resumes accumulation from the frozen value, so `diff(clock)` never
//! jumps across a stopped interval and is exactly 0 on the frame the clock is
//! (re)started.
//!
//! Separately, [`ClockState::elapsed`] reports the time since the most recent
//! start, which resets on every stop + restart.

/// Run state of a single clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    running: bool,
    /// Running time accumulated over all completed runs.
    accumulated_ms: f64,
    /// Frame timestamp at which the current run started.
    started_at_ms: f64,
    /// Length of the last completed run.
    last_run_ms: f64,
}

impl ClockState {
    /// Creates a stopped clock with no accumulated time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while the clock is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accumulated running time at frame time `now_ms`.
    #[inline]
    pub fn value(&self, now_ms: f64) -> f64 {
        if self.running {
            self.accumulated_ms + (now_ms - self.started_at_ms)
        } else {
            self.accumulated_ms
        }
    }

    /// Time since the most recent start; frozen at the run length once stopped.
    #[inline]
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        if self.running {
            now_ms - self.started_at_ms
        } else {
            self.last_run_ms
        }
    }

    /// Starts the clock. Returns false if it was already running.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.started_at_ms = now_ms;
        true
    }

    /// Stops the clock, freezing its value. Returns false if it was not running.
    pub fn stop(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        let run = now_ms - self.started_at_ms;
        self.accumulated_ms += run;
        self.last_run_ms = run;
        self.running = false;
        true
    }
}
