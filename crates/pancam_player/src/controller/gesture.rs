// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag-versus-click recognition.

use crate::input::PointerButton;

/// A device-pixel position
pub type Point = (f64, f64);

/// What a confirmed drag does on each move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Pan
    Translate,
    /// Zoom about the viewport centre
    Scale,
    /// Rotate about the viewport centre
    Rotate,
    /// Edit the active layer's clip rect
    Clip,
}

/// Pointer gesture state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No button held
    #[default]
    Idle,
    /// Button held, pointer still within the drag threshold
    PendingDrag {
        /// Held button
        button: PointerButton,
        /// Press position
        start: Point,
    },
    /// Drag confirmed
    Dragging {
        /// Press position
        start: Point,
        /// Position of the previous move
        prev: Point,
        /// Mode used by the previous move
        mode: Option<DragMode>,
        /// A move changed the camera
        changed: bool,
        /// Unsnapped rotation accumulated while rotating
        free_rotation: Option<f64>,
    },
}

/// What a transition produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutput {
    /// Nothing to dispatch
    None,
    /// The drag was confirmed; the pointer moved from `start` to `current`
    DragStarted {
        /// Press position
        start: Point,
        /// Confirming position
        current: Point,
    },
    /// A confirmed drag moved
    Moved {
        /// Press position
        start: Point,
        /// Previous position
        prev: Point,
        /// New position
        current: Point,
    },
    /// A confirmed drag ended
    DragEnded {
        /// A move changed the camera
        changed: bool,
    },
    /// The button was released without a drag
    Clicked(PointerButton),
}

impl GestureState {
    /// Button pressed at `at`
    pub fn press(self, button: PointerButton, at: Point) -> (Self, GestureOutput) {
        match self {
            Self::Dragging { .. } => (self, GestureOutput::None),
            Self::Idle | Self::PendingDrag { .. } => (
                Self::PendingDrag { button, start: at },
                GestureOutput::None,
            ),
        }
    }

    /// Pointer moved to `at`
    pub fn motion(self, at: Point, threshold: f64) -> (Self, GestureOutput) {
        match self {
            Self::Idle => (self, GestureOutput::None),
            Self::PendingDrag { button, start } => {
                let exceeded =
                    (at.0 - start.0).abs() > threshold || (at.1 - start.1).abs() > threshold;
                if button == PointerButton::Primary && exceeded {
                    (
                        Self::Dragging {
                            start,
                            prev: at,
                            mode: None,
                            changed: false,
                            free_rotation: None,
                        },
                        GestureOutput::DragStarted { start, current: at },
                    )
                } else {
                    (self, GestureOutput::None)
                }
            }
            Self::Dragging {
                start,
                prev,
                mode,
                changed,
                free_rotation,
            } => (
                Self::Dragging {
                    start,
                    prev: at,
                    mode,
                    changed,
                    free_rotation,
                },
                GestureOutput::Moved {
                    start,
                    prev,
                    current: at,
                },
            ),
        }
    }

    /// Button released
    pub fn release(self, button: PointerButton) -> (Self, GestureOutput) {
        match self {
            Self::PendingDrag { button: held, .. } if held == button => {
                (Self::Idle, GestureOutput::Clicked(button))
            }
            Self::Dragging { changed, .. } if button == PointerButton::Primary => {
                (Self::Idle, GestureOutput::DragEnded { changed })
            }
            Self::Idle | Self::PendingDrag { .. } => (Self::Idle, GestureOutput::None),
            Self::Dragging { .. } => (self, GestureOutput::None),
        }
    }

    /// Record what the last dispatched move did
    pub fn record_move(self, used: DragMode, did_change: bool, rotation: Option<f64>) -> Self {
        match self {
            Self::Dragging {
                start,
                prev,
                changed,
                ..
            } => Self::Dragging {
                start,
                prev,
                mode: Some(used),
                changed: changed || did_change,
                free_rotation: rotation,
            },
            other => other,
        }
    }

    /// Unsnapped rotation carried by a rotate drag
    pub fn free_rotation(&self) -> Option<f64> {
        match self {
            Self::Dragging { free_rotation, .. } => *free_rotation,
            _ => None,
        }
    }

    /// Whether a drag is confirmed
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
