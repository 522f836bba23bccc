//! Preset management commands.
//!
//! Provides commands to list, show and copy interactable presets.

use super::common::load_preset;
use clap::{Args, Subcommand};
use kinema_config::{
    Preset, ensure_user_presets_dir, factory_presets, get_factory_preset, list_user_presets,
    preset_name_from_path, user_config_dir, user_presets_dir,
};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Print a preset as TOML
    Show {
        /// Preset name or path
        name: String,
    },

    /// Copy a factory preset to user presets for customization
    Copy {
        /// Factory preset name
        source: String,

        /// New preset name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing user preset
        #[arg(long)]
        force: bool,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Copy {
            source,
            name,
            force,
        } => copy_preset(&source, name.as_deref(), force),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    let show_factory = !user_only;
    let show_user = !factory_only;

    if show_factory {
        println!("Factory Presets:");
        println!("================");
        for (id, preset) in kinema_config::factory_preset_names()
            .into_iter()
            .zip(factory_presets())
        {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:14} - {}", id, desc);
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        println!("=============");
        let user_presets = list_user_presets();
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Start from a factory preset with: kinema presets copy <name>\n");
        } else {
            for path in user_presets {
                let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".into());
                match Preset::load(&path) {
                    Ok(preset) => {
                        let desc = preset.description.as_deref().unwrap_or("");
                        println!("  {:14} - {}", name, desc);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "unreadable preset");
                        println!("  {:14} - (error loading)", name);
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    print!("{}", preset.to_toml()?);
    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>, force: bool) -> anyhow::Result<()> {
    let preset = get_factory_preset(source)
        .ok_or_else(|| anyhow::anyhow!("Factory preset '{}' not found.", source))?;

    let target_name = new_name.unwrap_or(source);
    ensure_user_presets_dir()?;
    let preset_path = user_presets_dir().join(format!("{}.toml", target_name));

    if preset_path.exists() && !force {
        anyhow::bail!(
            "Preset '{}' already exists in user presets. Use --force or choose a different --name.",
            target_name
        );
    }

    let mut copy = Preset::new(target_name).with_interactable(preset.interactable);
    if let Some(desc) = &preset.description {
        copy = copy.with_description(format!("{} (copy)", desc));
    }
    copy.save(&preset_path)?;

    println!("Copied '{}' to {}", source, preset_path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("Config directory:  {}", user_config_dir().display());
    println!("User presets:      {}", user_presets_dir().display());
    Ok(())
}
