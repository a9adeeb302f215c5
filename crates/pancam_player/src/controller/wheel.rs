// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wheel gestures and their debounce.

use crate::config::ControllerConfig;
use crate::input::Modifiers;
use crate::timer::OneShotTimer;
use std::time::Duration;

/// What a wheel notch does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    /// Zoom about the pointer
    Zoom {
        /// Scale factor
        factor: f64,
        /// Pointer X
        cx: f64,
        /// Pointer Y
        cy: f64,
    },
    /// Rotate about the viewport centre
    Rotate {
        /// Angle in degrees
        angle: f64,
    },
}

/// Map a wheel event to its action
pub fn resolve(
    delta: f64,
    at: (f64, f64),
    modifiers: Modifiers,
    config: &ControllerConfig,
) -> Option<WheelAction> {
    if delta == 0.0 || !delta.is_finite() {
        return None;
    }
    let forward = delta > 0.0;
    if modifiers.contains(config.bindings.rotate) {
        let step = config.wheel_rotation_step;
        Some(WheelAction::Rotate {
            angle: if forward { step } else { -step },
        })
    } else {
        Some(WheelAction::Zoom {
            factor: if forward {
                1.0 / config.scale_factor
            } else {
                config.scale_factor
            },
            cx: at.0,
            cy: at.1,
        })
    }
}

/// Coalesces a burst of wheel notches into one user change
#[derive(Debug, Clone, Default)]
pub struct WheelDebounce {
    timer: OneShotTimer,
}

impl WheelDebounce {
    /// Record a notch at `now`, restarting the inactivity window
    pub fn notch(&mut self, now: Duration, window: Duration) {
        self.timer.arm(now, window);
    }

    /// Whether the burst ended at or before `now`
    pub fn settled(&mut self, now: Duration) -> bool {
        self.timer.poll(now).is_some()
    }

    /// Whether a burst is in progress
    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_and_modifier() {
        let config = ControllerConfig::default();
        assert_eq!(
            resolve(-1.0, (10.0, 20.0), Modifiers::NONE, &config),
            Some(WheelAction::Zoom {
                factor: 1.05,
                cx: 10.0,
                cy: 20.0
            })
        );
        assert_eq!(
            resolve(3.0, (0.0, 0.0), Modifiers::CTRL, &config),
            Some(WheelAction::Rotate { angle: 5.0 })
        );
        assert_eq!(resolve(0.0, (0.0, 0.0), Modifiers::NONE, &config), None);
    }

    #[test]
    fn test_burst_settles_once() {
        let window = Duration::from_millis(200);
        let mut debounce = WheelDebounce::default();
        for t in [0, 50, 100, 150, 199] {
            debounce.notch(Duration::from_millis(t), window);
            assert!(!debounce.settled(Duration::from_millis(t)));
        }
        assert!(!debounce.settled(Duration::from_millis(300)));
        assert!(debounce.settled(Duration::from_millis(399)));
        assert!(!debounce.settled(Duration::from_millis(1000)));
    }
}
