// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clip rectangle editing by drag.
//!
//! The edit mode is picked from the drag start point: an edge or corner
//! within the border threshold is resized, a point inside the rect moves it,
//! and a point outside draws a new rect.

use crate::camera::ClipRect;
use serde::{Deserialize, Serialize};

/// How a clip drag edits the rect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipMode {
    /// Resize the listed edges
    Resize {
        /// Left edge
        left: bool,
        /// Right edge
        right: bool,
        /// Top edge
        top: bool,
        /// Bottom edge
        bottom: bool,
    },
    /// Move the whole rect
    Move,
    /// Draw a new rect from the drag start to the pointer
    Draw,
}

impl ClipMode {
    /// Pick the edit mode for a drag starting at `(x, y)`
    pub fn detect(rect: &ClipRect, x: f64, y: f64, threshold: f64) -> Self {
        let within_y = y >= rect.y0 - threshold && y <= rect.y1 + threshold;
        let within_x = x >= rect.x0 - threshold && x <= rect.x1 + threshold;

        let d_left = (x - rect.x0).abs();
        let d_right = (x - rect.x1).abs();
        let d_top = (y - rect.y0).abs();
        let d_bottom = (y - rect.y1).abs();

        // Only the nearer of two opposite edges can be picked
        let left = within_y && d_left <= threshold && d_left <= d_right;
        let right = within_y && d_right <= threshold && !left;
        let top = within_x && d_top <= threshold && d_top <= d_bottom;
        let bottom = within_x && d_bottom <= threshold && !top;

        if left || right || top || bottom {
            Self::Resize {
                left,
                right,
                top,
                bottom,
            }
        } else if rect.contains(x, y) {
            Self::Move
        } else {
            Self::Draw
        }
    }

    /// Apply one drag step.
    ///
    /// Returns the edited rect and the mode for the next step. A resized
    /// edge dragged past its opposite edge becomes that opposite edge, so the
    /// returned mode keeps the grabbed edge under the pointer.
    pub fn apply(
        &self,
        rect: &ClipRect,
        start: (f64, f64),
        current: (f64, f64),
        delta: (f64, f64),
    ) -> (ClipRect, ClipMode) {
        let (dx, dy) = delta;
        match *self {
            Self::Resize {
                left,
                right,
                top,
                bottom,
            } => {
                let mut r = *rect;
                if left {
                    r.x0 += dx;
                }
                if right {
                    r.x1 += dx;
                }
                if top {
                    r.y0 += dy;
                }
                if bottom {
                    r.y1 += dy;
                }
                let crossed_x = r.x0 > r.x1;
                let crossed_y = r.y0 > r.y1;
                let next = Self::Resize {
                    left: if crossed_x { right } else { left },
                    right: if crossed_x { left } else { right },
                    top: if crossed_y { bottom } else { top },
                    bottom: if crossed_y { top } else { bottom },
                };
                (r.normalized(), next)
            }
            Self::Move => (
                ClipRect {
                    x0: rect.x0 + dx,
                    y0: rect.y0 + dy,
                    x1: rect.x1 + dx,
                    y1: rect.y1 + dy,
                },
                *self,
            ),
            Self::Draw => (
                ClipRect::from_corners(start.0, start.1, current.0, current.1),
                *self,
            ),
        }
    }
}
