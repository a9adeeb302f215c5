// SPDX-License-Identifier: MIT OR Apache-2.0
//! Local changes and their replay on a mirrored player.
//!
//! Every semantic operation the controller performs is published as a
//! [`LocalChange`] before it is applied. A presenter console or remote view
//! replays the stream with [`apply`] to follow the local player.

use crate::player::Player;
use pancam_viewport::{ClipMode, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A semantic operation performed by the local user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LocalChange {
    /// Pan by a device-pixel delta
    Translate {
        /// X delta
        dx: f64,
        /// Y delta
        dy: f64,
    },
    /// Zoom about a device point
    Zoom {
        /// Scale factor
        factor: f64,
        /// Focus X
        cx: f64,
        /// Focus Y
        cy: f64,
    },
    /// Rotate about the viewport centre
    Rotate {
        /// Angle in degrees
        angle: f64,
    },
    /// One step of a clip drag on the active layer
    Clip {
        /// Edit mode of the drag
        mode: ClipMode,
        /// Drag start
        start: (f64, f64),
        /// Pointer position
        current: (f64, f64),
        /// Delta since the previous step
        delta: (f64, f64),
    },
    /// Animated move to a frame
    MoveToFrame {
        /// Target frame index
        index: usize,
    },
    /// Cut to a frame
    JumpToFrame {
        /// Target frame index
        index: usize,
    },
    /// Pause or resume auto-advance
    SetPaused {
        /// New paused state
        paused: bool,
    },
    /// Show or hide the blank screen
    SetBlankScreen {
        /// New blank screen state
        visible: bool,
    },
}

impl LocalChange {
    /// Encode as one JSON line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from JSON
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Whether the change edits cameras directly
    pub fn edits_camera(&self) -> bool {
        matches!(
            self,
            Self::Translate { .. } | Self::Zoom { .. } | Self::Rotate { .. } | Self::Clip { .. }
        )
    }
}

/// Replay a local change on another player.
///
/// Frame changes use preview semantics so the mirror follows the frame
/// without running its own auto-advance schedule.
pub fn apply(change: &LocalChange, player: &mut Player, now: Duration) -> Result<()> {
    if change.edits_camera() {
        player.viewport_mut().cancel_animation_at(now);
    }
    match *change {
        LocalChange::Translate { dx, dy } => player.viewport_mut().translate(dx, dy),
        LocalChange::Zoom { factor, cx, cy } => player.viewport_mut().zoom(factor, cx, cy)?,
        LocalChange::Rotate { angle } => player.viewport_mut().rotate(angle),
        LocalChange::Clip {
            mode,
            start,
            current,
            delta,
        } => {
            player
                .viewport_mut()
                .clip_with_mode(mode, start, current, delta)?;
        }
        LocalChange::MoveToFrame { index } => player.preview_frame(index, now)?,
        LocalChange::JumpToFrame { index } => player.preview_frame_instant(index, now)?,
        LocalChange::SetPaused { paused: true } => player.pause(),
        LocalChange::SetPaused { paused: false } => {
            if !player.is_playing() {
                player.play_from_frame(player.current_index(), now)?;
            }
        }
        LocalChange::SetBlankScreen { visible: true } => player.enable_blank_screen(),
        LocalChange::SetBlankScreen { visible: false } => player.disable_blank_screen(),
    }
    Ok(())
}
