//! **bezier-ease** — cubic Bézier timing functions for animation easing.
//!
//! An easing curve maps an elapsed-time fraction to a progress fraction.
//! This crate solves single-segment CSS-style curves anchored at (0,0) and
//! (1,1): given input progress `x` it finds the curve parameter `t` with
//! `x(t) = x` and returns `y(t)`.
//!
//! # Architecture
//!
//! * [`bezier`] — [`EasingCurve`] and the Newton-Raphson / bisection solver.
//! * [`timing`] — the [`TimingFunction`] trait implemented by linear timing
//!   and by every curve, plus scalar interpolation through a timing function.
//! * [`config`] — JSON configuration: solver tuning and user-named curves.
//!
//! ```
//! use bezier_ease::EasingCurve;
//!
//! let curve = EasingCurve::ease_in_out();
//! assert_eq!(curve.solve(0.0), 0.0);
//! assert!(curve.solve(0.25) < 0.25);
//! ```

pub mod bezier;
pub mod config;
pub mod timing;

pub use bezier::{solve, CurveError, EasingCurve, Solution, SolveMethod, SolverConfig};
pub use timing::{interpolate, Linear, TimingFunction};
