//! CSS-like cubic Bézier easing curves.
//!
//! An [`EasingCurve`] is a cubic Bézier with its endpoints pinned at (0,0)
//! and (1,1) and two free control points `(x1,y1)`, `(x2,y2)`.  Solving the
//! curve for an input progress `x` means finding the parameter `t` with
//! `x(t) = x` and returning `y(t)`.
//!
//! The root finder runs Newton-Raphson seeded at `t = x` and falls back to
//! bisection when the derivative vanishes, an iterate leaves `[0, 1]`, or the
//! iteration budget runs out.  Both phases are bounded, so a solve is O(1).

use log::trace;
use serde::de::{Error as DeError, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Hard cap on bisection halvings, whatever the configured tolerance.
const MAX_BISECTION_STEPS: u32 = 64;

/// Hard cap on Newton steps, whatever the configured budget.
const MAX_NEWTON_STEPS: u32 = 64;

/// Clamp `t` into `[0, 1]`.  NaN maps to `0`.
#[inline]
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

//  Solver tuning

/// Tuning knobs for the Newton-Raphson / bisection root finder.
///
/// The defaults keep the solved output within about `1e-6` of the exact
/// answer for any curve whose control points lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of Newton steps before falling back to bisection.
    /// Values above 64 are treated as 64.
    pub newton_iterations: u32,
    /// Newton is considered converged once a step moves `t` by less than this.
    pub newton_tolerance: f64,
    /// A derivative `dx/dt` smaller than this aborts Newton.
    pub derivative_epsilon: f64,
    /// Bisection stops once the bracket on `t` is narrower than this.
    pub bisection_tolerance: f64,
}

impl SolverConfig {
    pub const DEFAULT: SolverConfig = SolverConfig {
        newton_iterations: 8,
        newton_tolerance: 1e-7,
        derivative_epsilon: 1e-6,
        bisection_tolerance: 1e-6,
    };
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

//  Curve

/// One axis of the curve in power form: `B(t) = ((a*t + b)*t + c)*t`.
///
/// With the endpoints fixed at 0 and 1 the constant term vanishes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    a: f64,
    b: f64,
    c: f64,
}

impl Axis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    #[inline]
    fn sample(&self, t: f64) -> f64 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    #[inline]
    fn derivative(&self, t: f64) -> f64 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }

    /// First, second and third derivatives at `t`.
    fn derivatives(&self, t: f64) -> [f64; 3] {
        [
            self.derivative(t),
            6.0 * self.a * t + 2.0 * self.b,
            6.0 * self.a,
        ]
    }
}

/// A cubic timing function with control points (0,0), (x1,y1), (x2,y2), (1,1).
///
/// The value is immutable; the polynomial coefficients for both axes are
/// computed once on construction.
///
/// The inversion `x -> t` is only single-valued when `x(t)` is monotonic,
/// which holds whenever `x1` and `x2` are in `[0, 1]`.  [`EasingCurve::new`]
/// does not check this; [`EasingCurve::try_new`] does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingCurve {
    p1x: f64,
    p1y: f64,
    p2x: f64,
    p2y: f64,
    x: Axis,
    y: Axis,
}

/// How a [`Solution`] was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveMethod {
    /// The input was at (or clamped to) `0` or `1`.
    Endpoint,
    /// Newton-Raphson converged.
    Newton,
    /// Newton gave up and bisection produced `t`.
    Bisection,
}

/// Result of [`EasingCurve::solve_with`], carrying solver diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// The output progress `y(t)`.
    pub value: f64,
    /// The solved curve parameter, in `[0, 1]`.
    pub t: f64,
    pub method: SolveMethod,
    /// Newton steps plus bisection halvings spent.
    pub iterations: u32,
    /// `false` only when bisection hit its hard step cap before reaching
    /// the configured tolerance.
    pub converged: bool,
}

impl EasingCurve {
    /// Build a curve from its two interior control points.  Never fails.
    pub fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        Self {
            p1x,
            p1y,
            p2x,
            p2y,
            x: Axis::new(p1x, p2x),
            y: Axis::new(p1y, p2y),
        }
    }

    /// Build a curve, rejecting non-finite coordinates and `x` control
    /// coordinates outside `[0, 1]`.
    pub fn try_new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Result<Self, CurveError> {
        if ![p1x, p1y, p2x, p2y].iter().all(|v| v.is_finite()) {
            return Err(CurveError::NonFinite);
        }
        for (which, value) in [("x1", p1x), ("x2", p2x)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CurveError::ControlXOutOfRange { which, value });
            }
        }
        Ok(Self::new(p1x, p1y, p2x, p2y))
    }

    /// `cubic-bezier(0, 0, 1, 1)`: output equals input.
    pub fn linear() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// CSS `ease`: `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    pub fn ease() -> Self {
        Self::new(0.25, 0.1, 0.25, 1.0)
    }

    /// Begins slowly and accelerates towards completion.
    pub fn ease_in() -> Self {
        Self::new(0.42, 0.0, 1.0, 1.0)
    }

    /// Begins quickly and decelerates towards completion.
    pub fn ease_out() -> Self {
        Self::new(0.0, 0.0, 0.58, 1.0)
    }

    /// Slow start, fast middle, slow finish.
    pub fn ease_in_out() -> Self {
        Self::new(0.42, 0.0, 0.58, 1.0)
    }

    /// The control points as `[x1, y1, x2, y2]`.
    pub fn control_points(&self) -> [f64; 4] {
        [self.p1x, self.p1y, self.p2x, self.p2y]
    }

    /// Whether both control points sit on the diagonal, making `y(t) = x(t)`.
    pub fn is_linear(&self) -> bool {
        self.p1x == self.p1y && self.p2x == self.p2y
    }

    /// `x(t)` for `t` in `[0, 1]`.
    pub fn x_at(&self, t: f64) -> f64 {
        self.x.sample(t)
    }

    /// `y(t)` for `t` in `[0, 1]`.
    pub fn y_at(&self, t: f64) -> f64 {
        self.y.sample(t)
    }

    /// `dx/dt` at `t`.
    pub fn dx_at(&self, t: f64) -> f64 {
        self.x.derivative(t)
    }

    /// Output progress for input progress `x`, using the default solver
    /// settings.  Out-of-range inputs are clamped.
    pub fn solve(&self, x: f64) -> f64 {
        self.solve_with(x, &SolverConfig::DEFAULT).value
    }

    /// Solve for `x` and report how the answer was reached.
    pub fn solve_with(&self, x: f64, config: &SolverConfig) -> Solution {
        let x = clamp01(x);
        if x <= 0.0 || x >= 1.0 {
            // y(0) = 0 and y(1) = 1 by construction.
            return Solution {
                value: x,
                t: x,
                method: SolveMethod::Endpoint,
                iterations: 0,
                converged: true,
            };
        }

        let (t, method, iterations, converged) = match self.newton(x, config) {
            Ok((t, steps)) => (t, SolveMethod::Newton, steps, true),
            Err(steps) => {
                trace!("newton gave up after {} step(s) at x={}, bisecting", steps, x);
                let (t, halvings, converged) = self.bisect(x, config);
                (t, SolveMethod::Bisection, steps + halvings, converged)
            }
        };

        let t = clamp01(t);
        Solution {
            value: self.y.sample(t),
            t,
            method,
            iterations,
            converged,
        }
    }

    /// `dy/dx` at input progress `x`.
    ///
    /// Where `dx/dt` vanishes (an endpoint whose control point sits on the
    /// axis, e.g. the start of `ease-out`) the slope is the limit taken from
    /// the lowest-order derivatives that do not both vanish.  A vertical
    /// tangent yields a signed infinity.
    pub fn slope(&self, x: f64) -> f64 {
        if self.is_linear() {
            return 1.0;
        }
        let config = SolverConfig::DEFAULT;
        let t = self.solve_with(x, &config).t;
        let eps = config.derivative_epsilon;
        for (dx, dy) in self.x.derivatives(t).into_iter().zip(self.y.derivatives(t)) {
            if dx.abs() >= eps {
                return dy / dx;
            }
            if dy.abs() >= eps {
                return f64::INFINITY.copysign(dy);
            }
        }
        // Unreachable for finite control points: x(0) = 0 and x(1) = 1.
        0.0
    }

    /// Newton-Raphson seeded at `t = x`.  `Err` carries the steps spent
    /// before giving up.
    fn newton(&self, x: f64, config: &SolverConfig) -> Result<(f64, u32), u32> {
        let mut t = x;
        let budget = config.newton_iterations.min(MAX_NEWTON_STEPS);
        for i in 0..budget {
            let dx = self.x.derivative(t);
            if dx.abs() < config.derivative_epsilon {
                return Err(i);
            }
            let step = (self.x.sample(t) - x) / dx;
            t -= step;
            // Also rejects NaN.
            if !(0.0..=1.0).contains(&t) {
                return Err(i + 1);
            }
            if step.abs() < config.newton_tolerance {
                return Ok((t, i + 1));
            }
        }
        Err(budget)
    }

    /// Bisection on `[0, 1]`; relies on `x(t)` being non-decreasing.
    fn bisect(&self, x: f64, config: &SolverConfig) -> (f64, u32, bool) {
        let mut lo = 0.0;
        let mut hi = 1.0;
        let mut steps = 0;
        while hi - lo > config.bisection_tolerance && steps < MAX_BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if self.x.sample(mid) < x {
                lo = mid;
            } else {
                hi = mid;
            }
            steps += 1;
        }
        (0.5 * (lo + hi), steps, hi - lo <= config.bisection_tolerance)
    }
}

/// Output progress of `curve` at input progress `x`.
pub fn solve(curve: &EasingCurve, x: f64) -> f64 {
    curve.solve(x)
}

//  Text and serde forms

/// Error from validating or parsing an [`EasingCurve`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("control point coordinates must be finite")]
    NonFinite,
    #[error("{which} = {value} is outside [0, 1]")]
    ControlXOutOfRange { which: &'static str, value: f64 },
    #[error("cannot parse curve: {0}")]
    Parse(String),
}

/// Look up a named preset (case-insensitive; accepts "ease-in-out",
/// "ease_in_out", "easeInOut", etc.).
fn parse_preset(s: &str) -> Option<EasingCurve> {
    let normalized: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "linear" => Some(EasingCurve::linear()),
        "ease" => Some(EasingCurve::ease()),
        "easein" => Some(EasingCurve::ease_in()),
        "easeout" => Some(EasingCurve::ease_out()),
        "easeinout" => Some(EasingCurve::ease_in_out()),
        _ => None,
    }
}

impl FromStr for EasingCurve {
    type Err = CurveError;

    /// Parse a preset name or `cubic-bezier(x1, y1, x2, y2)`.
    fn from_str(s: &str) -> Result<Self, CurveError> {
        let trimmed = s.trim();
        if let Some(curve) = parse_preset(trimmed) {
            return Ok(curve);
        }

        let lower = trimmed.to_ascii_lowercase();
        let inner = lower
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| CurveError::Parse(format!("unknown curve {:?}", s)))?;

        let values = inner
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CurveError::Parse(format!("{:?}: {}", s, e)))?;
        match values.as_slice() {
            &[x1, y1, x2, y2] => Self::try_new(x1, y1, x2, y2),
            other => Err(CurveError::Parse(format!(
                "cubic-bezier expects 4 numbers, got {}",
                other.len()
            ))),
        }
    }
}

impl fmt::Display for EasingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({}, {}, {}, {})",
            self.p1x, self.p1y, self.p2x, self.p2y
        )
    }
}

impl Serialize for EasingCurve {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.control_points().serialize(serializer)
    }
}

/// Accepts `[x1, y1, x2, y2]`, `{"x1", "y1", "x2", "y2"}`, a preset name, or
/// `"cubic-bezier(x1, y1, x2, y2)"`.
impl<'de> Deserialize<'de> for EasingCurve {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = EasingCurve;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "[x1, y1, x2, y2], {{x1, y1, x2, y2}}, a preset name or \"cubic-bezier(...)\""
                )
            }
            fn visit_str<E>(self, s: &str) -> Result<EasingCurve, E>
            where
                E: DeError,
            {
                s.parse().map_err(DeError::custom)
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<EasingCurve, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut p = [0.0f64; 4];
                for (i, slot) in p.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| DeError::invalid_length(i, &self))?;
                }
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(DeError::invalid_length(5, &self));
                }
                EasingCurve::try_new(p[0], p[1], p[2], p[3]).map_err(DeError::custom)
            }
            fn visit_map<A>(self, mut map: A) -> Result<EasingCurve, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut x1 = None;
                let mut y1 = None;
                let mut x2 = None;
                let mut y2 = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "x1" => x1 = Some(map.next_value()?),
                        "y1" => y1 = Some(map.next_value()?),
                        "x2" => x2 = Some(map.next_value()?),
                        "y2" => y2 = Some(map.next_value()?),
                        _ => {
                            let _: IgnoredAny = map.next_value()?;
                        }
                    }
                }
                EasingCurve::try_new(
                    x1.ok_or_else(|| DeError::missing_field("x1"))?,
                    y1.ok_or_else(|| DeError::missing_field("y1"))?,
                    x2.ok_or_else(|| DeError::missing_field("x2"))?,
                    y2.ok_or_else(|| DeError::missing_field("y2"))?,
                )
                .map_err(DeError::custom)
            }
        }
        deserializer.deserialize_any(V)
    }
}
