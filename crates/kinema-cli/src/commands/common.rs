//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::ValueEnum;
use kinema_config::{Preset, resolve_preset};
use serde::Serialize;
use std::io::Write;

/// How sampled frames are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading in a terminal
    #[default]
    Table,
    /// Comma-separated values with a header row
    Csv,
    /// A JSON array of objects
    Json,
}

/// One printed row of frame output.
pub trait Row: Serialize {
    /// Column names, in print order.
    const HEADER: &'static [&'static str];

    /// Cell text for each column.
    fn cells(&self) -> Vec<String>;
}

/// Load a preset by path, user preset name, or factory preset name.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    resolve_preset(name).with_context(|| {
        format!("cannot load preset '{name}' (see 'kinema presets list' for available presets)")
    })
}

/// Format a number with a fixed precision for table and CSV output.
pub fn num(value: f64) -> String {
    format!("{value:.3}")
}

/// Write rows in the requested format.
pub fn write_rows<R: Row>(out: &mut impl Write, rows: &[R], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "{}", R::HEADER.join(","))?;
            for row in rows {
                writeln!(out, "{}", row.cells().join(","))?;
            }
        }
        OutputFormat::Table => {
            let line: Vec<String> = R::HEADER.iter().map(|h| format!("{h:>10}")).collect();
            writeln!(out, "{}", line.join(" "))?;
            writeln!(out, "{}", "-".repeat(line.len() * 11 - 1))?;
            for row in rows {
                let line: Vec<String> = row.cells().iter().map(|c| format!("{c:>10}")).collect();
                writeln!(out, "{}", line.join(" "))?;
            }
        }
    }
    Ok(())
}

/// Frame timestamps for a given rate, starting at zero.
pub fn frame_interval(fps: f64) -> anyhow::Result<f64> {
    if !(fps.is_finite() && fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {fps}");
    }
    Ok(1000.0 / fps)
}
