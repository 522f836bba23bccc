//! Factory presets bundled with kinema.
//!
//! These presets are always available without external files. They cover the
//! common interactable layouts and serve as starting points for custom
//! presets.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "drawer",
    "corners",
    "swipe_card",
    "gravity_well",
    "chat_head",
];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("drawer", DRAWER_PRESET),
    ("corners", CORNERS_PRESET),
    ("swipe_card", SWIPE_CARD_PRESET),
    ("gravity_well", GRAVITY_WELL_PRESET),
    ("chat_head", CHAT_HEAD_PRESET),
];

const DRAWER_PRESET: &str = r#"
name = "Drawer"
description = "Vertical sheet with closed and open stops, braked past the open stop"

[interactable]
vertical_only = true
snap_points = [
    { x = 0.0, y = 0.0 },
    { x = 0.0, y = 300.0 },
]

[[interactable.friction_areas]]
damping = 0.6
influence_area = { top = 300.0 }
"#;

const CORNERS_PRESET: &str = r#"
name = "Corners"
description = "Free drag that settles into the nearest of four corners"

[interactable]
snap_points = [
    { x = 0.0, y = 0.0 },
    { x = 200.0, y = 0.0, tension = 500.0 },
    { x = 0.0, y = 400.0 },
    { x = 200.0, y = 400.0, tension = 500.0 },
]
"#;

const SWIPE_CARD_PRESET: &str = r#"
name = "Swipe Card"
description = "Horizontal card that returns to center or flies off either side"

[interactable]
horizontal_only = true
snap_points = [
    { x = -360.0, y = 0.0, tension = 200.0 },
    { x = 0.0, y = 0.0 },
    { x = 360.0, y = 0.0, tension = 200.0 },
]
"#;

const GRAVITY_WELL_PRESET: &str = r#"
name = "Gravity Well"
description = "Centered snap with a damped gravity well pulling toward the middle"

[interactable]
snap_points = [
    { x = 0.0, y = 0.0 },
    { x = 0.0, y = 240.0 },
]

[[interactable.gravity_points]]
x = 0.0
y = 120.0
strength = 800.0
falloff = 60.0
damping = 0.7
"#;

const CHAT_HEAD_PRESET: &str = r#"
name = "Chat Head"
description = "Spring-dragged bubble that docks to the left or right edge"

[interactable]
drag_with_spring = { tension = 600.0, damping = 0.8 }
snap_points = [
    { x = 0.0, y = 0.0, damping = 0.5 },
    { x = 0.0, y = 200.0, damping = 0.5 },
    { x = 0.0, y = 400.0, damping = 0.5 },
    { x = 320.0, y = 0.0, damping = 0.5 },
    { x = 320.0, y = 200.0, damping = 0.5 },
    { x = 320.0, y = 400.0, damping = 0.5 },
]

[[interactable.spring_points]]
x = 160.0
y = 200.0
tension = 40.0
influence_area = { left = 60.0, right = 260.0 }
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use kinema_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("  - {}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Matches the internal identifier or the preset's display name,
/// case-insensitively.
///
/// ```rust
/// use kinema_config::get_factory_preset;
///
/// let drawer = get_factory_preset("drawer").unwrap();
/// assert_eq!(drawer.name, "Drawer");
/// assert!(get_factory_preset("Swipe Card").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return Preset::from_toml(toml).ok();
    }

    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Get the internal identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory preset (case-insensitive).
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_presets_load() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESET_NAMES.len());

        let names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Drawer"));
        assert!(names.contains(&"Corners"));
        assert!(names.contains(&"Chat Head"));
    }

    #[test]
    fn test_get_factory_preset() {
        let preset = get_factory_preset("corners").expect("corners should exist");
        assert_eq!(preset.name, "Corners");

        let preset = get_factory_preset("Gravity Well").expect("display name should match");
        assert_eq!(preset.name, "Gravity Well");

        let preset = get_factory_preset("DRAWER").expect("lookup is case-insensitive");
        assert_eq!(preset.name, "Drawer");

        assert!(get_factory_preset("nonexistent").is_none());
        assert!(!is_factory_preset("my_custom_preset"));
    }

    #[test]
    fn test_names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES);
    }

    #[test]
    fn test_all_factory_presets_valid() {
        for (name, toml) in FACTORY_PRESETS_TOML {
            let result = Preset::from_toml(toml);
            assert!(result.is_ok(), "factory preset '{}' should parse: {:?}", name, result);

            let preset = result.unwrap();
            assert!(preset.description.is_some(), "preset '{}' should have a description", name);
            assert_eq!(preset.validate().ok(), Some(()), "preset '{}' should validate", name);
            assert!(preset.build().is_ok(), "preset '{}' should build", name);
        }
    }

    #[test]
    fn test_drawer_structure() {
        let drawer = get_factory_preset("drawer").unwrap();
        let config = &drawer.interactable;
        assert!(config.vertical_only);
        assert_eq!(config.snap_points.len(), 2);
        assert_eq!(config.friction_areas[0].damping, 0.6);
        let area = config.friction_areas[0].influence_area.unwrap();
        assert_eq!(area.top, Some(300.0));
        assert_eq!(area.left, None);
    }

    #[test]
    fn test_chat_head_drags_with_spring() {
        let head = get_factory_preset("chat_head").unwrap();
        let drag = head.interactable.drag_with_spring.expect("drag spring");
        assert_eq!(drag.tension, 600.0);
        assert_eq!(drag.damping, 0.8);
    }
}
