//! Timing functions.
//!
//! A [`TimingFunction`] reshapes the rate of change of an animated value by
//! mapping an elapsed-time fraction to a progress fraction.  Both
//! [`Linear`] and [`EasingCurve`] implement it, so callers can hold either
//! behind `&dyn TimingFunction` or `Box<dyn TimingFunction>`.

use crate::bezier::{clamp01, EasingCurve};

/// Maps elapsed-time fraction to progress fraction.
pub trait TimingFunction {
    /// Progress at elapsed fraction `t`.  Both `t` and the returned
    /// progress are clamped into `[0, 1]`.
    fn value_at(&self, t: f64) -> f64;
}

/// Timing that leaves the rate of change untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl TimingFunction for Linear {
    fn value_at(&self, t: f64) -> f64 {
        clamp01(t)
    }
}

/// Curves whose `y` overshoots `[0, 1]` are clamped here; use
/// [`EasingCurve::solve`] directly to keep the overshoot.
impl TimingFunction for EasingCurve {
    fn value_at(&self, t: f64) -> f64 {
        if self.is_linear() {
            return clamp01(t);
        }
        clamp01(self.solve(t))
    }
}

impl<T: TimingFunction + ?Sized> TimingFunction for &T {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }
}

impl<T: TimingFunction + ?Sized> TimingFunction for Box<T> {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }
}

/// Interpolate between two scalars, shaping the blend with `timing`.
pub fn interpolate<T: TimingFunction + ?Sized>(timing: &T, from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * timing.value_at(t)
}
