//! Configuration and preset management for kinema interactables.
//!
//! A preset is a named [`InteractableConfig`](kinema_core::InteractableConfig)
//! stored as TOML. This crate loads and saves presets, validates them with
//! accumulated diagnostics, locates them on disk and ships a set of factory
//! presets.
//!
//! # Features
//!
//! - **Preset System**: Load and save presets from TOML files
//! - **Validation**: Every out-of-range or contradictory field, reported at once
//! - **Paths**: Platform-specific preset directory
//! - **Factory Presets**: Built-in layouts (drawer, corners, swipe card, ...)
//!
//! # Example
//!
//! ```rust,no_run
//! use kinema_config::{Preset, user_presets_dir};
//! use kinema_core::{InteractableConfig, SnapPoint};
//!
//! let preset = Preset::new("Tall Drawer")
//!     .with_description("Drawer with a third stop")
//!     .with_interactable(InteractableConfig::with_snap_points([
//!         SnapPoint::new(0.0, 0.0),
//!         SnapPoint::new(0.0, 300.0),
//!         SnapPoint::new(0.0, 600.0).with_tension(450.0),
//!     ]));
//!
//! preset.validate().unwrap();
//! preset.save(user_presets_dir().join("tall_drawer.toml")).unwrap();
//!
//! let mut view = Preset::load(user_presets_dir().join("tall_drawer.toml"))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! view.advance(0.0).unwrap();
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets and configuration.
pub mod paths;

/// Preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, preset_name_from_path,
    user_config_dir, user_presets_dir,
};
pub use preset::Preset;
pub use validation::{ValidationError, ValidationResult, validate_interactable, validate_preset};

/// Resolve a preset argument: a file path, a user preset name, or a
/// factory preset name, in that order.
///
/// ```rust
/// let corners = kinema_config::resolve_preset("corners").unwrap();
/// assert_eq!(corners.name, "Corners");
/// ```
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    if let Some(path) = find_preset(name) {
        return Preset::load(path);
    }
    get_factory_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}
