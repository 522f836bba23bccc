//! Preset and interactable validation.
//!
//! [`InteractableConfig::validate`](kinema_core::InteractableConfig::validate)
//! stops at the first problem, which is what a controller needs. Preset files
//! are edited by hand, so this module walks the whole configuration and
//! reports every problem at once, against tighter editorial ranges.
//!
//! # Example
//!
//! ```rust
//! use kinema_config::{validate_interactable, ValidationError};
//! use kinema_core::{InteractableConfig, SnapPoint};
//!
//! let config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
//! assert!(validate_interactable(&config).is_ok());
//!
//! let empty = InteractableConfig::default();
//! assert_eq!(
//!     validate_interactable(&empty),
//!     Err(ValidationError::EmptyField("interactable.snap_points".into()))
//! );
//! ```

use kinema_core::{InfluenceArea, InteractableConfig};
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range (or not finite).
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// An influence area whose lower bound lies past its upper bound.
    #[error("'{field}' is inverted: {low} > {high}")]
    InvertedInfluenceArea {
        /// Dotted path of the bound pair, e.g. `friction_areas[0].influence_area.left/right`.
        field: String,
        /// Lower bound (left or top).
        low: f64,
        /// Upper bound (right or bottom).
        high: f64,
    },

    /// A required field is empty.
    #[error("'{0}' must not be empty")]
    EmptyField(String),

    /// Both axis locks are set.
    #[error("horizontal_only and vertical_only cannot both be set")]
    ConflictingAxisLock,

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Inclusive range accepted for a numeric preset field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl ParamRange {
    /// Returns true for finite values inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Point coordinates, in layout units.
pub const COORDINATE_RANGE: ParamRange = ParamRange {
    min: -1.0e6,
    max: 1.0e6,
};

/// Spring tension.
pub const TENSION_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: 10_000.0,
};

/// Velocity retained per 1/60 s.
pub const DAMPING_RANGE: ParamRange = ParamRange { min: 0.0, max: 1.0 };

/// Gravity strength. Negative values repel.
pub const STRENGTH_RANGE: ParamRange = ParamRange {
    min: -100_000.0,
    max: 100_000.0,
};

/// Gravity falloff distance.
pub const FALLOFF_RANGE: ParamRange = ParamRange {
    min: 0.001,
    max: 10_000.0,
};

/// Accumulates every problem found in a configuration.
#[derive(Debug, Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    fn check(&mut self, field: impl FnOnce() -> String, value: f64, range: ParamRange) {
        if !range.contains(value) {
            self.errors.push(ValidationError::OutOfRange {
                field: field(),
                value,
                min: range.min,
                max: range.max,
            });
        }
    }

    fn check_opt(&mut self, field: impl FnOnce() -> String, value: Option<f64>, range: ParamRange) {
        if let Some(value) = value {
            self.check(field, value, range);
        }
    }

    fn check_point(&mut self, prefix: &str, x: f64, y: f64) {
        self.check(|| format!("{prefix}.x"), x, COORDINATE_RANGE);
        self.check(|| format!("{prefix}.y"), y, COORDINATE_RANGE);
    }

    fn check_area(&mut self, prefix: &str, area: Option<&InfluenceArea>) {
        let Some(area) = area else {
            return;
        };
        let prefix = format!("{prefix}.influence_area");
        let bounds = [
            ("left", area.left),
            ("right", area.right),
            ("top", area.top),
            ("bottom", area.bottom),
        ];
        for (side, bound) in bounds {
            self.check_opt(|| format!("{prefix}.{side}"), bound, COORDINATE_RANGE);
        }
        for (pair, low, high) in [
            ("left/right", area.left, area.right),
            ("top/bottom", area.top, area.bottom),
        ] {
            if let (Some(low), Some(high)) = (low, high)
                && low > high
            {
                self.errors.push(ValidationError::InvertedInfluenceArea {
                    field: format!("{prefix}.{pair}"),
                    low,
                    high,
                });
            }
        }
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}

fn collect_interactable(c: &mut Collector, config: &InteractableConfig) {
    const ROOT: &str = "interactable";

    if config.snap_points.is_empty() {
        c.errors
            .push(ValidationError::EmptyField(format!("{ROOT}.snap_points")));
    }
    if config.horizontal_only && config.vertical_only {
        c.errors.push(ValidationError::ConflictingAxisLock);
    }

    if let Some(drag) = &config.drag_with_spring {
        c.check(
            || format!("{ROOT}.drag_with_spring.tension"),
            drag.tension,
            TENSION_RANGE,
        );
        c.check(
            || format!("{ROOT}.drag_with_spring.damping"),
            drag.damping,
            DAMPING_RANGE,
        );
    }

    for (i, pt) in config.spring_points.iter().enumerate() {
        let prefix = format!("{ROOT}.spring_points[{i}]");
        c.check_point(&prefix, pt.x, pt.y);
        c.check_opt(|| format!("{prefix}.tension"), pt.tension, TENSION_RANGE);
        c.check_opt(|| format!("{prefix}.damping"), pt.damping, DAMPING_RANGE);
        c.check_area(&prefix, pt.influence_area.as_ref());
    }

    for (i, pt) in config.gravity_points.iter().enumerate() {
        let prefix = format!("{ROOT}.gravity_points[{i}]");
        c.check_point(&prefix, pt.x, pt.y);
        c.check_opt(|| format!("{prefix}.strength"), pt.strength, STRENGTH_RANGE);
        c.check_opt(|| format!("{prefix}.falloff"), pt.falloff, FALLOFF_RANGE);
        c.check_opt(|| format!("{prefix}.damping"), pt.damping, DAMPING_RANGE);
        c.check_area(&prefix, pt.influence_area.as_ref());
    }

    for (i, area) in config.friction_areas.iter().enumerate() {
        let prefix = format!("{ROOT}.friction_areas[{i}]");
        c.check(|| format!("{prefix}.damping"), area.damping, DAMPING_RANGE);
        c.check_area(&prefix, area.influence_area.as_ref());
    }

    for (i, pt) in config.snap_points.iter().enumerate() {
        let prefix = format!("{ROOT}.snap_points[{i}]");
        c.check_point(&prefix, pt.x, pt.y);
        c.check_opt(|| format!("{prefix}.tension"), pt.tension, TENSION_RANGE);
        c.check_opt(|| format!("{prefix}.damping"), pt.damping, DAMPING_RANGE);
    }
}

/// Validate an interactable configuration, reporting every problem found.
pub fn validate_interactable(config: &InteractableConfig) -> ValidationResult<()> {
    let mut collector = Collector::default();
    collect_interactable(&mut collector, config);
    collector.finish()
}

/// Validate a preset: its name and its interactable configuration.
pub fn validate_preset(preset: &crate::Preset) -> ValidationResult<()> {
    let mut collector = Collector::default();
    if preset.name.trim().is_empty() {
        collector
            .errors
            .push(ValidationError::EmptyField("name".into()));
    }
    collect_interactable(&mut collector, &preset.interactable);
    collector.finish()
}
