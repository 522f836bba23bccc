//! Easing curves.
//!
//! An [`Easing`] pairs a base [`Curve`] with an [`EasingMode`]. The curves
//! are the usual animation set (quadratic, cubic, sine, circle, exponential,
//! back, bounce, elastic, plus arbitrary cubic Béziers), all defined as "ease
//! in" shapes; the mode derives the out and in-out variants:
//!
//! - `In`: `f(t)`
//! - `Out`: `1 - f(1 - t)`
//! - `InOut`: `f(2t) / 2` for the first half, `1 - f(2(1 - t)) / 2` after
//!
//! Easings have a textual form used by presets and the CLI, e.g. `"linear"`,
//! `"quad-out"`, `"ease-in-out"` or `"bezier(0.25, 0.1, 0.25, 1)-in"`.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

/// Default overshoot of [`Curve::Back`].
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;

/// Default bounciness of [`Curve::Elastic`].
pub const DEFAULT_ELASTIC_BOUNCINESS: f64 = 1.0;

/// Base easing shapes, expressed as "ease in" curves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Curve {
    /// `t`
    #[default]
    Linear,
    /// Standard CSS-like ease, `bezier(0.42, 0, 1, 1)`.
    Ease,
    /// `t²`
    Quad,
    /// `t³`
    Cubic,
    /// `1 - cos(tπ/2)`
    Sine,
    /// `1 - sqrt(1 - t²)`
    Circle,
    /// `2^(10(t - 1))`
    Exponential,
    /// Pulls back before moving forward.
    Back {
        /// Amount of overshoot.
        overshoot: f64,
    },
    /// Bouncing-ball curve.
    Bounce,
    /// Spring-like oscillation.
    Elastic {
        /// Number of oscillations scale.
        bounciness: f64,
    },
    /// Cubic Bézier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
    Bezier {
        /// First control point x.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

impl Curve {
    /// Evaluates the ease-in shape at `t`.
    pub fn sample(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::Quad => t * t,
            Self::Cubic => t * t * t,
            Self::Sine => 1.0 - libm::cos(t * PI / 2.0),
            Self::Circle => 1.0 - libm::sqrt(1.0 - t * t),
            Self::Exponential => libm::pow(2.0, 10.0 * (t - 1.0)),
            Self::Back { overshoot } => t * t * ((overshoot + 1.0) * t - overshoot),
            Self::Bounce => bounce(t),
            Self::Elastic { bounciness } => {
                let p = bounciness * PI;
                let c = libm::cos(t * PI / 2.0);
                1.0 - c * c * c * libm::cos(t * p)
            }
            Self::Bezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bounce(t: f64) -> f64 {
    const N: f64 = 7.5625;
    if t < 1.0 / 2.75 {
        N * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        N * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        N * t * t + 0.984_375
    }
}

/// Solves a CSS-style cubic Bézier timing curve for the y value at x = `t`.
///
/// Newton-Raphson on the x polynomial, falling back to bisection when the
/// derivative vanishes or Newton fails to converge.
pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f64, b: f64, c: f64, s: f64| ((a * s + b) * s + c) * s;
    let slope = |a: f64, b: f64, c: f64, s: f64| (3.0 * a * s + 2.0 * b) * s + c;

    let mut s = t;
    let mut solved = false;
    for _ in 0..8 {
        let err = sample(ax, bx, cx, s) - t;
        if err.abs() < 1e-9 {
            solved = true;
            break;
        }
        let d = slope(ax, bx, cx, s);
        if d.abs() < 1e-9 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    if !solved {
        let (mut lo, mut hi) = (0.0, 1.0);
        s = t;
        for _ in 0..64 {
            let x = sample(ax, bx, cx, s);
            if (x - t).abs() < 1e-9 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }
    }

    sample(ay, by, cy, s)
}

/// How a [`Curve`] is applied over the unit interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingMode {
    /// Curve as-is.
    #[default]
    In,
    /// Mirrored curve: fast start, slow end.
    Out,
    /// Ease in for the first half, ease out for the second.
    InOut,
}

/// A complete easing function: curve plus mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Easing {
    /// Base shape.
    pub curve: Curve,
    /// Application mode.
    pub mode: EasingMode,
}

impl Easing {
    /// Identity easing.
    pub const LINEAR: Self = Self::new(Curve::Linear, EasingMode::In);

    /// Creates an easing from a curve and mode.
    pub const fn new(curve: Curve, mode: EasingMode) -> Self {
        Self { curve, mode }
    }

    /// Applies `curve` as-is.
    pub const fn ease_in(curve: Curve) -> Self {
        Self::new(curve, EasingMode::In)
    }

    /// Applies `curve` mirrored.
    pub const fn ease_out(curve: Curve) -> Self {
        Self::new(curve, EasingMode::Out)
    }

    /// Applies `curve` symmetrically.
    pub const fn in_out(curve: Curve) -> Self {
        Self::new(curve, EasingMode::InOut)
    }

    /// Returns a copy with a different mode.
    #[must_use]
    pub const fn with_mode(self, mode: EasingMode) -> Self {
        Self::new(self.curve, mode)
    }

    /// Maps progress `t` (nominally `0..=1`) to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let f = self.curve;
        match self.mode {
            EasingMode::In => f.sample(t),
            EasingMode::Out => 1.0 - f.sample(1.0 - t),
            EasingMode::InOut => {
                if t < 0.5 {
                    f.sample(t * 2.0) / 2.0
                } else {
                    1.0 - f.sample((1.0 - t) * 2.0) / 2.0
                }
            }
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.curve {
            Curve::Linear => f.write_str("linear")?,
            Curve::Ease => f.write_str("ease")?,
            Curve::Quad => f.write_str("quad")?,
            Curve::Cubic => f.write_str("cubic")?,
            Curve::Sine => f.write_str("sine")?,
            Curve::Circle => f.write_str("circle")?,
            Curve::Exponential => f.write_str("exponential")?,
            Curve::Back { overshoot } if overshoot == DEFAULT_BACK_OVERSHOOT => {
                f.write_str("back")?;
            }
            Curve::Back { overshoot } => write!(f, "back({overshoot})")?,
            Curve::Bounce => f.write_str("bounce")?,
            Curve::Elastic { bounciness } if bounciness == DEFAULT_ELASTIC_BOUNCINESS => {
                f.write_str("elastic")?;
            }
            Curve::Elastic { bounciness } => write!(f, "elastic({bounciness})")?,
            Curve::Bezier { x1, y1, x2, y2 } => write!(f, "bezier({x1}, {y1}, {x2}, {y2})")?,
        }
        match self.mode {
            // Linear has no distinct modes worth spelling out.
            EasingMode::In if self.curve == Curve::Linear => Ok(()),
            EasingMode::In => f.write_str("-in"),
            EasingMode::Out => f.write_str("-out"),
            EasingMode::InOut => f.write_str("-in-out"),
        }
    }
}

/// Error returned when an easing name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEasingError {
    input: String,
}

impl ParseEasingError {
    fn new(input: &str) -> Self {
        Self {
            input: input.into(),
        }
    }
}

impl fmt::Display for ParseEasingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown easing '{}' (expected e.g. 'linear', 'quad-out', 'ease-in-out', 'bezier(x1, y1, x2, y2)-in')",
            self.input
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseEasingError {}

/// Parses `name(args)` into the name and its comma-separated numbers.
fn parse_args<'a>(s: &'a str, original: &str) -> Result<(&'a str, [f64; 4], usize), ParseEasingError> {
    let Some(open) = s.find('(') else {
        return Ok((s, [0.0; 4], 0));
    };
    let inner = s[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| ParseEasingError::new(original))?;
    let mut args = [0.0; 4];
    let mut count = 0;
    for part in inner.split(',') {
        if count == args.len() {
            return Err(ParseEasingError::new(original));
        }
        args[count] = part
            .trim()
            .parse()
            .map_err(|_| ParseEasingError::new(original))?;
        count += 1;
    }
    Ok((&s[..open], args, count))
}

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        let (body, mode) = if let Some(body) = lower.strip_suffix("-in-out") {
            (body, EasingMode::InOut)
        } else if let Some(body) = lower.strip_suffix("-out") {
            (body, EasingMode::Out)
        } else if let Some(body) = lower.strip_suffix("-in") {
            (body, EasingMode::In)
        } else {
            (lower.as_str(), EasingMode::In)
        };

        let (name, args, count) = parse_args(body, trimmed)?;
        let bad = || ParseEasingError::new(trimmed);

        let curve = match (name.trim(), count) {
            ("linear", 0) => Curve::Linear,
            ("ease", 0) => Curve::Ease,
            ("quad", 0) => Curve::Quad,
            ("cubic", 0) => Curve::Cubic,
            ("sine" | "sin", 0) => Curve::Sine,
            ("circle" | "circ", 0) => Curve::Circle,
            ("exponential" | "exp" | "expo", 0) => Curve::Exponential,
            ("back", 0) => Curve::Back {
                overshoot: DEFAULT_BACK_OVERSHOOT,
            },
            ("back", 1) => Curve::Back { overshoot: args[0] },
            ("bounce", 0) => Curve::Bounce,
            ("elastic", 0) => Curve::Elastic {
                bounciness: DEFAULT_ELASTIC_BOUNCINESS,
            },
            ("elastic", 1) => Curve::Elastic {
                bounciness: args[0],
            },
            ("bezier", 4) => Curve::Bezier {
                x1: args[0],
                y1: args[1],
                x2: args[2],
                y2: args[3],
            },
            _ => return Err(bad()),
        };
        Ok(Self::new(curve, mode))
    }
}

impl TryFrom<String> for Easing {
    type Error = ParseEasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        format!("{easing}")
    }
}
