// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera and viewport model for pancam.
//!
//! This crate provides the bottom layer of the playback engine:
//! - Per-layer camera states and their render matrices
//! - Transition timing functions
//! - The read-only presentation model (frames, layers, capability flags)
//! - The viewport with direct manipulation and a cancellable animation driver
//!
//! ## Architecture
//!
//! The viewport owns the live camera of every layer. Everything that moves
//! the camera goes through it: direct manipulation (translate, zoom, rotate,
//! clip editing) and frame transitions (`animate_to`). Starting either one
//! cancels the other, so the camera always has a single writer.
//!
//! Time is injected as a [`std::time::Duration`] since session start, which
//! keeps the animation driver deterministic.

pub mod camera;
pub mod clip;
pub mod error;
pub mod presentation;
pub mod signal;
pub mod timing;
pub mod viewport;

pub use camera::{CameraState, ClipRect, Transform2D};
pub use clip::ClipMode;
pub use error::{Error, Result};
pub use presentation::{
    Frame, FrameId, FrameRef, InteractionFlags, LayerId, LayerProperties, Presentation,
    Transition,
};
pub use signal::{Signal, SubscriptionId};
pub use timing::TimingFunction;
pub use viewport::{
    AnimationStep, AnimationToken, LayerCamera, LayerRender, RenderSurface, Viewport,
    ViewportEvent,
};
