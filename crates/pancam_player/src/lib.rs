// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback and input handling for pancam.
//!
//! This crate sits on top of `pancam_viewport`:
//! - [`Player`]: frame navigation, auto-advance and navigation history
//! - [`UiController`]: drag, click, wheel and key recognition
//! - [`mirror`]: replay of local changes on another player
//! - [`config`]: tuning loaded from RON
//!
//! The controller borrows the player for each event, so one owner drives
//! both from a single thread.

pub mod config;
pub mod controller;
pub mod history;
pub mod input;
pub mod mirror;
pub mod player;
pub mod timer;

pub use config::{ConfigError, ControllerConfig, ModifierBindings, PlayerConfig};
pub use controller::{ControllerEvent, DragMode, GestureState, UiController};
pub use history::{Arrival, HistoryEntry, NavigationHistory};
pub use input::{InputEvent, Key, KeyOutcome, Modifier, Modifiers, PointerButton};
pub use mirror::LocalChange;
pub use player::{Player, PlayerEvent, PlayerState};
pub use timer::{OneShotTimer, TimerToken};
