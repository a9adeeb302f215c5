// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transition timing functions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Easing curve applied to a frame transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimingFunction {
    /// Constant speed
    Linear,
    /// CSS `ease`
    #[default]
    Ease,
    /// CSS `ease-in`
    EaseIn,
    /// CSS `ease-out`
    EaseOut,
    /// CSS `ease-in-out`
    EaseInOut,
    /// Jump to the end as soon as the transition starts
    StepStart,
    /// Hold the start until the transition ends
    StepEnd,
    /// Jump halfway through
    StepMiddle,
}

impl TimingFunction {
    /// All timing functions, in declaration order
    pub fn all() -> &'static [TimingFunction] {
        &[
            TimingFunction::Linear,
            TimingFunction::Ease,
            TimingFunction::EaseIn,
            TimingFunction::EaseOut,
            TimingFunction::EaseInOut,
            TimingFunction::StepStart,
            TimingFunction::StepEnd,
            TimingFunction::StepMiddle,
        ]
    }

    /// CSS name of this timing function
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::StepStart => "step-start",
            Self::StepEnd => "step-end",
            Self::StepMiddle => "step-middle",
        }
    }

    /// Control points of the cubic curves
    fn control_points(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Self::Linear | Self::StepStart | Self::StepEnd | Self::StepMiddle => None,
        }
    }

    /// Map elapsed fraction `t` to eased progress, both in `[0, 1]`
    pub fn ease(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::StepStart => step(t > 0.0),
            Self::StepMiddle => step(t >= 0.5),
            Self::StepEnd => step(t >= 1.0),
            Self::Ease | Self::EaseIn | Self::EaseOut | Self::EaseInOut => {
                let Some((x1, y1, x2, y2)) = self.control_points() else {
                    return t;
                };
                CubicBezier::new(x1, y1, x2, y2).solve(t)
            }
        }
    }
}

fn step(reached: bool) -> f64 {
    if reached {
        1.0
    } else {
        0.0
    }
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimingFunction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|tf| tf.name() == s)
            .ok_or_else(|| crate::Error::InvalidArgument(format!("unknown timing function '{s}'")))
    }
}

/// Cubic bezier through (0,0) and (1,1), as used by CSS easing curves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    const NEWTON_ITERATIONS: usize = 8;
    const EPSILON: f64 = 1e-7;

    /// Create a curve from its two inner control points
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// One coordinate of the curve at parameter `s`
    fn sample(p1: f64, p2: f64, s: f64) -> f64 {
        let ms = 1.0 - s;
        3.0 * p1 * ms * ms * s + 3.0 * p2 * ms * s * s + s * s * s
    }

    /// Derivative of one coordinate at parameter `s`
    fn slope(p1: f64, p2: f64, s: f64) -> f64 {
        let ms = 1.0 - s;
        3.0 * p1 * ms * ms + 6.0 * (p2 - p1) * ms * s + 3.0 * (1.0 - p2) * s * s
    }

    /// Find the curve parameter whose x coordinate is `x`
    fn parameter_for(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let err = Self::sample(self.x1, self.x2, s) - x;
            if err.abs() < Self::EPSILON {
                return s;
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        // Newton stalled: fall back to bisection, x(s) is monotonic on [0, 1]
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while hi - lo > Self::EPSILON {
            let v = Self::sample(self.x1, self.x2, s);
            if (v - x).abs() < Self::EPSILON {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }

    /// Eased progress for elapsed fraction `x`
    pub fn solve(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.parameter_for(x))
    }
}
