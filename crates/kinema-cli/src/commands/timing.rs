//! Eased timing animation, printed frame by frame.

use super::common::{OutputFormat, Row, frame_interval, num, write_rows};
use clap::Args;
use kinema_core::timing::DEFAULT_DURATION_MS;
use kinema_core::{AnimationGraph, Easing, TimingConfig, run_timing};
use serde::Serialize;

#[derive(Args)]
pub struct TimingArgs {
    /// Start value
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    from: f64,

    /// Destination value
    #[arg(long, default_value = "120", allow_hyphen_values = true)]
    to: f64,

    /// Animation duration in milliseconds
    #[arg(long, default_value_t = DEFAULT_DURATION_MS)]
    duration_ms: f64,

    /// Easing, e.g. "linear", "quad-out", "ease-in-out", "bezier(0.25, 0.1, 0.25, 1)"
    #[arg(long, default_value = "ease-in-out")]
    easing: Easing,

    /// Frame rate of the simulated host
    #[arg(long, default_value = "60")]
    fps: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// One frame of the timing output.
#[derive(Debug, Clone, Serialize)]
pub struct TimingSample {
    frame: u64,
    time_ms: f64,
    value: f64,
}

impl Row for TimingSample {
    const HEADER: &'static [&'static str] = &["frame", "time_ms", "value"];

    fn cells(&self) -> Vec<String> {
        vec![self.frame.to_string(), num(self.time_ms), num(self.value)]
    }
}

/// Longest animation `timing` will sample, in frames.
const MAX_FRAMES: f64 = 1_000_000.0;

/// Runs the animation until it reports finished.
pub fn sample_timing(
    from: f64,
    to: f64,
    config: &TimingConfig,
    frame_ms: f64,
) -> anyhow::Result<Vec<TimingSample>> {
    if !(config.duration_ms.is_finite() && config.duration_ms >= 0.0) {
        anyhow::bail!("--duration-ms must be a non-negative number");
    }
    if config.duration_ms / frame_ms > MAX_FRAMES {
        anyhow::bail!("--duration-ms is too long: more than {MAX_FRAMES} frames at this fps");
    }

    let mut graph = AnimationGraph::new();
    let clock = graph.clock();
    let timing = run_timing(&mut graph, clock, from, to, config);

    let mut samples = Vec::new();
    for frame in 0u64.. {
        let t = frame as f64 * frame_ms;
        graph.begin_frame(t)?;
        let value = graph.evaluate(timing.node)?;
        samples.push(TimingSample {
            frame,
            time_ms: t,
            value,
        });
        if graph.read(timing.state.finished) != 0.0 {
            tracing::info!(frame, time_ms = t, "timing finished");
            break;
        }
    }
    Ok(samples)
}

pub fn run(args: TimingArgs) -> anyhow::Result<()> {
    let config = TimingConfig {
        duration_ms: args.duration_ms,
        easing: args.easing,
    };
    tracing::info!(easing = %config.easing, duration_ms = config.duration_ms, "timing");
    let samples = sample_timing(args.from, args.to, &config, frame_interval(args.fps)?)?;
    write_rows(&mut std::io::stdout().lock(), &samples, args.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_core::Curve;

    #[test]
    fn test_linear_samples() {
        let config = TimingConfig {
            duration_ms: 100.0,
            easing: Easing::LINEAR,
        };
        let samples = sample_timing(0.0, 10.0, &config, 25.0).unwrap();
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_ends_on_destination() {
        let config = TimingConfig {
            duration_ms: 300.0,
            easing: Easing::ease_out(Curve::Bounce),
        };
        let samples = sample_timing(-40.0, 40.0, &config, 1000.0 / 60.0).unwrap();
        assert_eq!(samples.last().unwrap().value, 40.0);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let config = TimingConfig {
            duration_ms: -1.0,
            easing: Easing::LINEAR,
        };
        assert!(sample_timing(0.0, 1.0, &config, 10.0).is_err());
    }

    #[test]
    fn test_huge_duration_rejected() {
        let config = TimingConfig {
            duration_ms: 1e300,
            easing: Easing::LINEAR,
        };
        let err = sample_timing(0.0, 1.0, &config, 1000.0 / 60.0).unwrap_err();
        assert!(err.to_string().contains("too long"), "{err}");
    }
}
