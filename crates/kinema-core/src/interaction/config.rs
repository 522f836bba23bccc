//! Controller configuration.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};

use super::InteractionError;
use crate::physics::{
    DEFAULT_DAMPING, DEFAULT_GRAVITY_FALLOFF, DEFAULT_GRAVITY_STRENGTH, DEFAULT_TENSION,
    InfluenceArea,
};
use crate::snap::SnapPoint;

/// Spring used to follow the finger instead of kinematic tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DragSpring {
    /// Spring tension toward the finger.
    pub tension: f64,
    /// Friction damping applied while dragging.
    pub damping: f64,
}

impl Default for DragSpring {
    fn default() -> Self {
        Self {
            tension: DEFAULT_TENSION,
            damping: DEFAULT_DAMPING,
        }
    }
}

/// Permanent spring toward a fixed point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SpringPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Spring tension (default 300).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tension: Option<f64>,
    /// Adds a friction in the same influence area when set.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub damping: Option<f64>,
    /// Region where the spring (and its friction) applies.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub influence_area: Option<InfluenceArea>,
}

/// Permanent gravity well.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GravityPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Pull strength (default 400).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub strength: Option<f64>,
    /// Distance of peak pull (default 40).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub falloff: Option<f64>,
    /// Adds a friction around the well when set.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub damping: Option<f64>,
    /// Region where the well applies. The friction falls back to a square of
    /// radius `1.4 * falloff` around the point.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub influence_area: Option<InfluenceArea>,
}

impl GravityPoint {
    /// Strength with the default applied.
    pub fn effective_strength(&self) -> f64 {
        self.strength.unwrap_or(DEFAULT_GRAVITY_STRENGTH)
    }

    /// Falloff with the default applied.
    pub fn effective_falloff(&self) -> f64 {
        self.falloff.unwrap_or(DEFAULT_GRAVITY_FALLOFF)
    }
}

impl SpringPoint {
    /// Tension with the default applied.
    pub fn effective_tension(&self) -> f64 {
        self.tension.unwrap_or(DEFAULT_TENSION)
    }
}

/// Permanent friction, optionally restricted to a region.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FrictionArea {
    /// Velocity retained per 1/60 s.
    pub damping: f64,
    /// Region where the friction applies.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub influence_area: Option<InfluenceArea>,
}

impl Default for FrictionArea {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            influence_area: None,
        }
    }
}

/// Everything needed to build an [`Interactable`](super::Interactable).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InteractableConfig {
    /// Follow the finger through a spring instead of kinematically.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub drag_with_spring: Option<DragSpring>,
    /// Permanent springs.
    pub spring_points: Vec<SpringPoint>,
    /// Permanent gravity wells.
    pub gravity_points: Vec<GravityPoint>,
    /// Permanent friction regions.
    pub friction_areas: Vec<FrictionArea>,
    /// Rest positions chosen from on release. Must not be empty.
    pub snap_points: Vec<SnapPoint>,
    /// Only the x axis moves; y reads as 0.
    pub horizontal_only: bool,
    /// Only the y axis moves; x reads as 0.
    pub vertical_only: bool,
    /// Gesture events are ignored when false.
    pub drag_enabled: bool,
}

impl Default for InteractableConfig {
    fn default() -> Self {
        Self {
            drag_with_spring: None,
            spring_points: Vec::new(),
            gravity_points: Vec::new(),
            friction_areas: Vec::new(),
            snap_points: Vec::new(),
            horizontal_only: false,
            vertical_only: false,
            drag_enabled: true,
        }
    }
}

fn finite(parameter: impl FnOnce() -> String, value: f64) -> Result<(), InteractionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InteractionError::InvalidParameter {
            parameter: parameter(),
            value,
        })
    }
}

fn in_range(
    parameter: impl FnOnce() -> String,
    value: f64,
    ok: impl FnOnce(f64) -> bool,
) -> Result<(), InteractionError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(InteractionError::InvalidParameter {
            parameter: parameter(),
            value,
        })
    }
}

fn check_damping(parameter: impl FnOnce() -> String, value: f64) -> Result<(), InteractionError> {
    in_range(parameter, value, |d| (0.0..=1.0).contains(&d))
}

fn check_tension(parameter: impl FnOnce() -> String, value: f64) -> Result<(), InteractionError> {
    in_range(parameter, value, |t| t >= 0.0)
}

fn check_area(prefix: &str, area: Option<&InfluenceArea>) -> Result<(), InteractionError> {
    let Some(area) = area else {
        return Ok(());
    };
    let bounds = [
        ("left", area.left),
        ("right", area.right),
        ("top", area.top),
        ("bottom", area.bottom),
    ];
    for (side, bound) in bounds {
        if let Some(value) = bound {
            finite(|| format!("{prefix}.influence_area.{side}"), value)?;
        }
    }
    Ok(())
}

impl InteractableConfig {
    /// Creates a configuration with the given snap points and defaults
    /// everywhere else.
    pub fn with_snap_points(snap_points: impl Into<Vec<SnapPoint>>) -> Self {
        Self {
            snap_points: snap_points.into(),
            ..Self::default()
        }
    }

    /// Checks that the configuration can drive a controller.
    ///
    /// Rejects an empty snap list, conflicting axis locks, non-finite
    /// coordinates, negative tensions, damping outside `0..=1`, and
    /// non-positive gravity falloff.
    pub fn validate(&self) -> Result<(), InteractionError> {
        if self.snap_points.is_empty() {
            return Err(InteractionError::MissingSnapPoints);
        }
        if self.horizontal_only && self.vertical_only {
            return Err(InteractionError::ConflictingAxisLock);
        }

        if let Some(drag) = &self.drag_with_spring {
            check_tension(|| "drag_with_spring.tension".into(), drag.tension)?;
            check_damping(|| "drag_with_spring.damping".into(), drag.damping)?;
        }

        for (i, pt) in self.spring_points.iter().enumerate() {
            finite(|| format!("spring_points[{i}].x"), pt.x)?;
            finite(|| format!("spring_points[{i}].y"), pt.y)?;
            if let Some(t) = pt.tension {
                check_tension(|| format!("spring_points[{i}].tension"), t)?;
            }
            if let Some(d) = pt.damping {
                check_damping(|| format!("spring_points[{i}].damping"), d)?;
            }
            check_area(&format!("spring_points[{i}]"), pt.influence_area.as_ref())?;
        }

        for (i, pt) in self.gravity_points.iter().enumerate() {
            finite(|| format!("gravity_points[{i}].x"), pt.x)?;
            finite(|| format!("gravity_points[{i}].y"), pt.y)?;
            if let Some(s) = pt.strength {
                finite(|| format!("gravity_points[{i}].strength"), s)?;
            }
            if let Some(f) = pt.falloff {
                in_range(|| format!("gravity_points[{i}].falloff"), f, |f| f > 0.0)?;
            }
            if let Some(d) = pt.damping {
                check_damping(|| format!("gravity_points[{i}].damping"), d)?;
            }
            check_area(&format!("gravity_points[{i}]"), pt.influence_area.as_ref())?;
        }

        for (i, area) in self.friction_areas.iter().enumerate() {
            check_damping(|| format!("friction_areas[{i}].damping"), area.damping)?;
            check_area(&format!("friction_areas[{i}]"), area.influence_area.as_ref())?;
        }

        for (i, pt) in self.snap_points.iter().enumerate() {
            finite(|| format!("snap_points[{i}].x"), pt.x)?;
            finite(|| format!("snap_points[{i}].y"), pt.y)?;
            if let Some(t) = pt.tension {
                check_tension(|| format!("snap_points[{i}].tension"), t)?;
            }
            if let Some(d) = pt.damping {
                check_damping(|| format!("snap_points[{i}].damping"), d)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_drag_enabled_without_snap_points() {
        let config = InteractableConfig::default();
        assert!(config.drag_enabled);
        assert_eq!(config.validate(), Err(InteractionError::MissingSnapPoints));
    }

    #[test]
    fn test_valid_config() {
        let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
        config.drag_with_spring = Some(DragSpring::default());
        config.gravity_points.push(GravityPoint {
            x: 10.0,
            damping: Some(0.5),
            ..GravityPoint::default()
        });
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_conflicting_axis_lock() {
        let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
        config.horizontal_only = true;
        config.vertical_only = true;
        assert_eq!(config.validate(), Err(InteractionError::ConflictingAxisLock));
    }

    #[test]
    fn test_invalid_parameter_path() {
        let config = InteractableConfig::with_snap_points([
            SnapPoint::new(0.0, 0.0),
            SnapPoint::new(1.0, 0.0).with_damping(1.5),
        ]);
        assert_eq!(
            config.validate(),
            Err(InteractionError::InvalidParameter {
                parameter: "snap_points[1].damping".into(),
                value: 1.5,
            })
        );
    }

    #[test]
    fn test_rejects_non_finite_area_and_zero_falloff() {
        let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
        config.friction_areas.push(FrictionArea {
            damping: 0.8,
            influence_area: Some(InfluenceArea {
                left: Some(f64::NAN),
                ..InfluenceArea::default()
            }),
        });
        assert!(matches!(
            config.validate(),
            Err(InteractionError::InvalidParameter { ref parameter, .. })
                if parameter == "friction_areas[0].influence_area.left"
        ));

        let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
        config.gravity_points.push(GravityPoint {
            falloff: Some(0.0),
            ..GravityPoint::default()
        });
        assert!(config.validate().is_err());
    }
}
