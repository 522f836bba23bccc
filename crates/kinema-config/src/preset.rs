//! Preset file format and operations.

use kinema_core::{Interactable, InteractableConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// A named interactable configuration stored as TOML.
///
/// # TOML Format
///
/// ```toml
/// name = "Drawer"
/// description = "Bottom sheet with open and closed stops"
///
/// [interactable]
/// vertical_only = true
/// snap_points = [{ x = 0.0, y = 0.0 }, { x = 0.0, y = 300.0, tension = 500.0 }]
///
/// [[interactable.friction_areas]]
/// damping = 0.6
/// influence_area = { top = 300.0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Controller configuration.
    #[serde(default)]
    pub interactable: InteractableConfig,
}

impl Preset {
    /// Create a new preset with an empty configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interactable: InteractableConfig::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the interactable configuration.
    pub fn with_interactable(mut self, interactable: InteractableConfig) -> Self {
        self.interactable = interactable;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Run the full preset validation, reporting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::validation::validate_preset(self)?;
        Ok(())
    }

    /// Validate the preset and build a controller from it.
    pub fn build(&self) -> Result<Interactable, ConfigError> {
        self.validate()?;
        let view = Interactable::new(self.interactable.clone())?;
        tracing::debug!(name = %self.name, "built interactable from preset");
        Ok(view)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
