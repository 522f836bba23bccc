//! Scripted drag simulation.
//!
//! The gesture moves linearly from the origin to `(drag_x, drag_y)` over
//! `drag_ms`, is released, and the interactable is then advanced until it
//! comes to rest or `settle_ms` elapses.

use super::common::{OutputFormat, Row, frame_interval, load_preset, num, write_rows};
use anyhow::Context;
use clap::Args;
use kinema_core::{GestureEvent, Interactable};
use serde::Serialize;

#[derive(Args)]
pub struct SimulateArgs {
    /// Preset name (factory or user) or path to a preset file
    preset: String,

    /// Frame rate of the simulated host
    #[arg(long, default_value = "60")]
    fps: f64,

    /// Horizontal finger travel
    #[arg(long, default_value = "120", allow_hyphen_values = true)]
    drag_x: f64,

    /// Vertical finger travel
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    drag_y: f64,

    /// Duration of the drag in milliseconds
    #[arg(long, default_value = "300")]
    drag_ms: f64,

    /// Maximum time to run after release, in milliseconds
    #[arg(long, default_value = "3000")]
    settle_ms: f64,

    /// Print every Nth frame (the final frame is always printed)
    #[arg(long, default_value = "1")]
    every: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// One simulated frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSample {
    frame: u64,
    time_ms: f64,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    regime: String,
}

impl Row for FrameSample {
    const HEADER: &'static [&'static str] = &["frame", "time_ms", "x", "y", "vx", "vy", "regime"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.frame.to_string(),
            num(self.time_ms),
            num(self.x),
            num(self.y),
            num(self.vx),
            num(self.vy),
            self.regime.clone(),
        ]
    }
}

/// Gesture script for the simulation.
#[derive(Debug, Clone, Copy)]
pub struct DragScript {
    /// Horizontal finger travel at release.
    pub dx: f64,
    /// Vertical finger travel at release.
    pub dy: f64,
    /// Drag duration.
    pub drag_ms: f64,
    /// Post-release time budget.
    pub settle_ms: f64,
    /// Frame interval.
    pub frame_ms: f64,
}

impl DragScript {
    fn gesture_at(&self, t: f64) -> GestureEvent {
        if t < self.drag_ms {
            let f = if self.drag_ms > 0.0 { t / self.drag_ms } else { 1.0 };
            GestureEvent::active(self.dx * f, self.dy * f)
        } else {
            GestureEvent::ended(self.dx, self.dy)
        }
    }
}

/// Runs `script` against `view`, returning every frame.
pub fn simulate(view: &mut Interactable, script: &DragScript) -> anyhow::Result<Vec<FrameSample>> {
    let mut samples = Vec::new();
    let mut released = false;
    let end = script.drag_ms + script.settle_ms;

    for frame in 0u64.. {
        let t = frame as f64 * script.frame_ms;
        if t > end {
            break;
        }

        if !released {
            let event = script.gesture_at(t);
            released = !event.state.is_active();
            if released {
                tracing::info!(time_ms = t, "released");
            }
            view.handle_gesture(&event);
        }

        let pos = view
            .advance(t)
            .with_context(|| format!("frame {frame} at {t} ms"))?;
        let vel = view.velocity();
        samples.push(FrameSample {
            frame,
            time_ms: t,
            x: pos.x,
            y: pos.y,
            vx: vel.vx,
            vy: vel.vy,
            regime: view.regime().to_string(),
        });

        if released && !view.is_clock_running() {
            tracing::info!(frame, time_ms = t, "came to rest");
            break;
        }
    }
    Ok(samples)
}

/// Keeps every `every`th sample plus the last one.
fn thin(samples: Vec<FrameSample>, every: usize) -> Vec<FrameSample> {
    let every = every.max(1);
    let last = samples.len().saturating_sub(1);
    samples
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % every == 0 || *i == last)
        .map(|(_, s)| s)
        .collect()
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let preset = load_preset(&args.preset)?;
    let mut view = preset.build()?;
    tracing::info!(preset = %preset.name, "simulating");

    if !(args.drag_ms >= 0.0 && args.settle_ms >= 0.0) {
        anyhow::bail!("--drag-ms and --settle-ms must not be negative");
    }
    let script = DragScript {
        dx: args.drag_x,
        dy: args.drag_y,
        drag_ms: args.drag_ms,
        settle_ms: args.settle_ms,
        frame_ms: frame_interval(args.fps)?,
    };

    let samples = thin(simulate(&mut view, &script)?, args.every);
    write_rows(&mut std::io::stdout().lock(), &samples, args.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_core::{InteractableConfig, SnapPoint};

    fn script() -> DragScript {
        DragScript {
            dx: 90.0,
            dy: 0.0,
            drag_ms: 200.0,
            settle_ms: 5000.0,
            frame_ms: 1000.0 / 60.0,
        }
    }

    #[test]
    fn test_gesture_script() {
        let s = script();
        let mid = s.gesture_at(100.0);
        assert!(mid.state.is_active());
        assert!((mid.translation_x - 45.0).abs() < 1e-9);
        assert!(!s.gesture_at(200.0).state.is_active());
    }

    #[test]
    fn test_simulation_settles_on_nearest_snap() {
        let config = InteractableConfig::with_snap_points([
            SnapPoint::new(0.0, 0.0),
            SnapPoint::new(100.0, 0.0),
        ]);
        let mut view = Interactable::new(config).unwrap();
        let samples = simulate(&mut view, &script()).unwrap();

        let first = &samples[0];
        assert_eq!(first.regime, "dragging");
        let last = samples.last().unwrap();
        assert_eq!(last.regime, "released");
        assert!((last.x - 100.0).abs() < 0.1, "x = {}", last.x);
        assert!(last.time_ms < 5200.0);
    }

    #[test]
    fn test_thin_keeps_last() {
        let config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
        let mut view = Interactable::new(config).unwrap();
        let samples = simulate(&mut view, &script()).unwrap();
        let n = samples.len();
        let thinned = thin(samples, 10);
        assert_eq!(thinned.len(), (n - 1) / 10 + 1 + usize::from((n - 1) % 10 != 0));
        assert_eq!(thinned.last().unwrap().frame, (n - 1) as u64);
    }
}
