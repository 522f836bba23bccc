//! Preset file validation.

use clap::Args;
use kinema_config::{Preset, ValidationError, validate_preset};
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a preset TOML file
    path: PathBuf,
}

/// Flattens nested `Multiple` errors into one list.
fn problems(err: ValidationError) -> Vec<ValidationError> {
    match err {
        ValidationError::Multiple(errors) => errors.into_iter().flat_map(problems).collect(),
        other => vec![other],
    }
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let preset = Preset::load(&args.path)?;

    if let Err(err) = validate_preset(&preset) {
        let problems = problems(err);
        for problem in &problems {
            println!("  error: {problem}");
        }
        anyhow::bail!(
            "{} has {} problem(s)",
            args.path.display(),
            problems.len()
        );
    }

    preset.build()?;
    let config = &preset.interactable;
    println!(
        "{}: ok ({} snap, {} spring, {} gravity, {} friction)",
        preset.name,
        config.snap_points.len(),
        config.spring_points.len(),
        config.gravity_points.len(),
        config.friction_areas.len()
    );
    Ok(())
}
