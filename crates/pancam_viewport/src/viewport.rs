// SPDX-License-Identifier: MIT OR Apache-2.0
//! The viewport: live layer cameras, direct manipulation and animation.

use crate::camera::{CameraState, ClipRect, Transform2D};
use crate::clip::ClipMode;
use crate::error::{Error, Result};
use crate::presentation::{LayerId, Presentation};
use crate::signal::Signal;
use crate::timing::TimingFunction;
use indexmap::IndexMap;
use std::time::Duration;

/// Default distance in pixels within which a clip edge can be grabbed
pub const DEFAULT_CLIP_BORDER: f64 = 8.0;

/// Generation number of a camera animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationToken(u64);

impl AnimationToken {
    /// Raw generation number
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Result of an animation frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStep {
    /// No animation in flight
    Idle,
    /// The animation advanced and continues
    Running(AnimationToken),
    /// The animation reached its target on this frame
    Finished(AnimationToken),
}

/// Events emitted by the viewport
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    /// Layer transforms were recomputed and published
    Repainted,
    /// A camera animation started
    AnimationStarted(AnimationToken),
    /// A camera animation reached its target
    AnimationFinished(AnimationToken),
    /// A camera animation was superseded before reaching its target
    AnimationCancelled(AnimationToken),
}

/// What the renderer needs for one layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRender {
    /// Layer being drawn
    pub layer: LayerId,
    /// Document-to-device transform
    pub transform: Transform2D,
    /// Clip in device pixels, if any
    pub clip: Option<ClipRect>,
}

/// Host surface that draws the layers
pub trait RenderSurface {
    /// Apply the given per-layer transforms and redraw
    fn present(&mut self, layers: &[LayerRender]);
}

/// Live camera of one layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerCamera {
    /// Current camera
    pub state: CameraState,
    /// Excluded from direct manipulation
    pub locked: bool,
}

/// An in-flight point-to-point camera animation
#[derive(Debug, Clone)]
struct Animation {
    token: AnimationToken,
    start: Duration,
    duration: Duration,
    timing: TimingFunction,
    from: IndexMap<LayerId, CameraState>,
    to: IndexMap<LayerId, CameraState>,
}

impl Animation {
    /// Linear progress at `now`, in `[0, 1]`
    fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

/// Owner of the camera of every layer
pub struct Viewport {
    /// Device size in pixels
    width: f64,
    height: f64,
    /// Layer cameras in document order
    layers: IndexMap<LayerId, LayerCamera>,
    /// Target of clip editing
    active_layer: Option<LayerId>,
    /// Current animation, if any
    animation: Option<Animation>,
    /// Next animation generation
    next_generation: u64,
    /// Time of the last animation sample
    last_sample: Duration,
    /// Drag scratch state
    dragging: bool,
    clip_mode: Option<ClipMode>,
    /// Clip edge grab distance
    clip_border: f64,
    /// Set by direct manipulation, cleared by the owner
    user_modified: bool,
    /// Host renderer
    surface: Option<Box<dyn RenderSurface>>,
    /// Outbound events
    events: Signal<ViewportEvent>,
}

impl Viewport {
    /// Create a viewport over the given layers, all at the identity camera
    pub fn new(width: f64, height: f64, layers: impl IntoIterator<Item = LayerId>) -> Self {
        let layers: IndexMap<_, _> = layers
            .into_iter()
            .map(|id| {
                (
                    id,
                    LayerCamera {
                        state: CameraState::default(),
                        locked: false,
                    },
                )
            })
            .collect();
        let active_layer = layers.keys().next().cloned();

        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            layers,
            active_layer,
            animation: None,
            next_generation: 1,
            last_sample: Duration::ZERO,
            dragging: false,
            clip_mode: None,
            clip_border: DEFAULT_CLIP_BORDER,
            user_modified: false,
            surface: None,
            events: Signal::new(),
        }
    }

    /// Create a viewport over the layers of a presentation
    pub fn for_presentation(presentation: &Presentation, width: f64, height: f64) -> Self {
        let mut viewport = Self::new(width, height, presentation.layers.iter().cloned());
        if let Some(cameras) = presentation.cameras_at(0) {
            for (layer, state) in cameras {
                if let Some(camera) = viewport.layers.get_mut(&layer) {
                    camera.state = state;
                }
            }
        }
        viewport
    }

    /// Attach the host renderer
    pub fn set_surface(&mut self, surface: Box<dyn RenderSurface>) {
        self.surface = Some(surface);
    }

    /// Set the clip edge grab distance
    pub fn set_clip_border(&mut self, pixels: f64) {
        self.clip_border = pixels.max(0.0);
    }

    /// Outbound events
    pub fn events(&mut self) -> &mut Signal<ViewportEvent> {
        &mut self.events
    }

    /// Device size in pixels
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Centre of the viewport in device pixels
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Host resize notification
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        tracing::debug!("Viewport resized to {}x{}", self.width, self.height);
        self.repaint();
    }

    /// Current camera of a layer
    pub fn camera(&self, layer: &LayerId) -> Option<&CameraState> {
        self.layers.get(layer).map(|c| &c.state)
    }

    /// All layer cameras in document order
    pub fn cameras(&self) -> impl Iterator<Item = (&LayerId, &CameraState)> {
        self.layers.iter().map(|(id, c)| (id, &c.state))
    }

    /// Snapshot of all layer cameras
    pub fn camera_states(&self) -> IndexMap<LayerId, CameraState> {
        self.cameras().map(|(id, s)| (id.clone(), *s)).collect()
    }

    /// Camera of the first unlocked layer, used as the rotation reference
    pub fn reference_camera(&self) -> Option<&CameraState> {
        self.layers
            .values()
            .find(|c| !c.locked)
            .or_else(|| self.layers.values().next())
            .map(|c| &c.state)
    }

    /// Lock or unlock a layer for direct manipulation
    pub fn set_layer_locked(&mut self, layer: &LayerId, locked: bool) -> Result<()> {
        let camera = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| Error::LayerNotFound(layer.clone()))?;
        camera.locked = locked;
        Ok(())
    }

    /// Select the layer whose clip is edited
    pub fn set_active_layer(&mut self, layer: LayerId) -> Result<()> {
        if !self.layers.contains_key(&layer) {
            return Err(Error::LayerNotFound(layer));
        }
        self.active_layer = Some(layer);
        Ok(())
    }

    /// Layer whose clip is edited
    pub fn active_layer(&self) -> Option<&LayerId> {
        self.active_layer.as_ref()
    }

    /// Whether direct manipulation changed the camera since the last clear
    pub fn is_user_modified(&self) -> bool {
        self.user_modified
    }

    /// Reset the user-modified mark
    pub fn clear_user_modified(&mut self) {
        self.user_modified = false;
    }

    /// Enter drag mode
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.clip_mode = None;
    }

    /// Leave drag mode
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.clip_mode = None;
    }

    /// Whether a drag gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Shift every unlocked layer by a device-pixel delta
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.interrupt();
        for camera in self.layers.values_mut().filter(|c| !c.locked) {
            camera.state.translate_device(dx, dy);
        }
        self.repaint();
    }

    /// Zoom every unlocked layer about the device point `(cx, cy)`
    pub fn zoom(&mut self, factor: f64, cx: f64, cy: f64) -> Result<()> {
        if factor <= 0.0 || !factor.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "zoom factor must be positive, got {factor}"
            )));
        }
        if factor == 1.0 {
            return Ok(());
        }
        self.interrupt();
        let (fx, fy) = (cx - self.width / 2.0, cy - self.height / 2.0);
        for camera in self.layers.values_mut().filter(|c| !c.locked) {
            camera.state.zoom_about(factor, fx, fy);
        }
        self.repaint();
        Ok(())
    }

    /// Rotate every unlocked layer about the viewport centre
    pub fn rotate(&mut self, angle_degrees: f64) {
        if angle_degrees == 0.0 || !angle_degrees.is_finite() {
            return;
        }
        self.interrupt();
        for camera in self.layers.values_mut().filter(|c| !c.locked) {
            camera.state.rotate(angle_degrees);
        }
        self.repaint();
    }

    /// Edit mode a clip drag starting at `(x, y)` would use
    pub fn clip_mode_at(&self, x: f64, y: f64) -> Option<ClipMode> {
        let layer = self.active_layer.as_ref()?;
        let rect = self.current_clip(layer)?;
        Some(ClipMode::detect(&rect, x, y, self.clip_border))
    }

    /// Edit mode of the current clip drag starting at `(start_x, start_y)`
    pub fn drag_clip_mode(&self, start_x: f64, start_y: f64) -> Option<ClipMode> {
        match self.clip_mode {
            Some(mode) if self.dragging => Some(mode),
            _ => self.clip_mode_at(start_x, start_y),
        }
    }

    /// Edit the active layer's clip rect by one drag step.
    ///
    /// The edit mode is chosen from the drag start point on the first step
    /// of a drag and kept until the drag ends.
    pub fn clip_by_mode(
        &mut self,
        start_x: f64,
        start_y: f64,
        cur_x: f64,
        cur_y: f64,
        delta_x: f64,
        delta_y: f64,
    ) -> Result<()> {
        let mode = self.drag_clip_mode(start_x, start_y).ok_or_else(|| {
            Error::InvalidArgument("no active layer for clip editing".to_string())
        })?;
        let next =
            self.clip_with_mode(mode, (start_x, start_y), (cur_x, cur_y), (delta_x, delta_y))?;
        if self.dragging {
            self.clip_mode = Some(next);
        }
        Ok(())
    }

    /// Edit the active layer's clip rect with an explicit edit mode.
    ///
    /// Returns the mode for the next step of the same drag.
    pub fn clip_with_mode(
        &mut self,
        mode: ClipMode,
        start: (f64, f64),
        current: (f64, f64),
        delta: (f64, f64),
    ) -> Result<ClipMode> {
        let layer = self
            .active_layer
            .clone()
            .ok_or_else(|| Error::InvalidArgument("no active layer".to_string()))?;
        let rect = self
            .current_clip(&layer)
            .ok_or_else(|| Error::LayerNotFound(layer.clone()))?;

        self.interrupt();
        let (clip, next) = mode.apply(&rect, start, current, delta);
        if let Some(camera) = self.layers.get_mut(&layer) {
            camera.state.clip = Some(clip);
        }
        self.repaint();
        Ok(next)
    }

    /// Clip of a layer, with a missing clip standing for the full viewport
    fn current_clip(&self, layer: &LayerId) -> Option<ClipRect> {
        let camera = self.layers.get(layer)?;
        Some(
            camera
                .state
                .clip
                .unwrap_or_else(|| ClipRect::full(self.width, self.height)),
        )
    }

    /// Whether a camera animation is in flight
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Token of the animation in flight
    pub fn current_animation(&self) -> Option<AnimationToken> {
        self.animation.as_ref().map(|a| a.token)
    }

    /// Start animating toward `targets` (layers not listed keep their camera).
    ///
    /// Any animation in flight is sampled at `now` and replaced, so the new
    /// animation starts from what is on screen. A zero duration applies the
    /// targets at once and leaves no animation in flight.
    pub fn animate_to(
        &mut self,
        targets: &IndexMap<LayerId, CameraState>,
        duration: Duration,
        timing: TimingFunction,
        now: Duration,
    ) -> Result<AnimationToken> {
        if let Some((layer, state)) = targets.iter().find(|(_, s)| !s.is_valid()) {
            return Err(Error::InvalidArgument(format!(
                "invalid target camera for layer {layer}: {state:?}"
            )));
        }

        if self.animation.is_some() {
            self.sample(now);
            self.cancel_animation();
        }

        let token = AnimationToken(self.next_generation);
        self.next_generation += 1;

        let from = self.camera_states();
        let mut to = from.clone();
        for (layer, target) in targets {
            match to.get_mut(layer) {
                Some(slot) => *slot = *target,
                None => tracing::warn!("Ignoring camera for unknown layer {layer}"),
            }
        }

        if duration.is_zero() {
            for (layer, state) in &to {
                if let Some(camera) = self.layers.get_mut(layer) {
                    camera.state = *state;
                }
            }
            self.last_sample = now;
            self.repaint();
            return Ok(token);
        }

        tracing::debug!(
            "Animation {} started: {}ms {}",
            token.0,
            duration.as_millis(),
            timing
        );
        self.animation = Some(Animation {
            token,
            start: now,
            duration,
            timing,
            from,
            to,
        });
        self.last_sample = now;
        self.events.emit(&ViewportEvent::AnimationStarted(token));
        Ok(token)
    }

    /// Apply the target cameras immediately
    pub fn apply_cameras(&mut self, targets: &IndexMap<LayerId, CameraState>, now: Duration) -> Result<()> {
        self.animate_to(targets, Duration::ZERO, TimingFunction::Linear, now)
            .map(|_| ())
    }

    /// Animation frame callback from the host
    pub fn on_animation_frame(&mut self, now: Duration) -> AnimationStep {
        let Some(token) = self.current_animation() else {
            return AnimationStep::Idle;
        };

        let done = self.sample(now);
        self.repaint();

        if done {
            self.animation = None;
            tracing::debug!("Animation {} finished", token.0);
            self.events.emit(&ViewportEvent::AnimationFinished(token));
            AnimationStep::Finished(token)
        } else {
            AnimationStep::Running(token)
        }
    }

    /// Write the interpolated cameras at `now`; returns true at the end
    fn sample(&mut self, now: Duration) -> bool {
        let Some(animation) = &self.animation else {
            return true;
        };
        let progress = animation.progress(now);
        let eased = animation.timing.ease(progress);
        let full = ClipRect::full(self.width, self.height);

        for (layer, from) in &animation.from {
            let Some(to) = animation.to.get(layer) else {
                continue;
            };
            if let Some(camera) = self.layers.get_mut(layer) {
                camera.state = if progress >= 1.0 {
                    *to
                } else {
                    from.interpolate(to, eased, full)
                };
            }
        }
        self.last_sample = self.last_sample.max(now);
        progress >= 1.0
    }

    /// Stop the animation in flight, keeping the interpolated cameras at `now`
    pub fn cancel_animation_at(&mut self, now: Duration) {
        if self.animation.is_some() {
            self.sample(now);
            self.cancel_animation();
        }
    }

    /// Stop the animation in flight, keeping the last sampled cameras.
    ///
    /// Direct manipulation cancels this way, so a camera edit made between
    /// two animation frames starts from the earlier frame. Call
    /// [`Viewport::cancel_animation_at`] first to start from the exact
    /// interpolated value instead.
    pub fn cancel_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            tracing::debug!("Animation {} cancelled", animation.token.0);
            self.events
                .emit(&ViewportEvent::AnimationCancelled(animation.token));
        }
    }

    /// Direct manipulation takes over from any animation
    fn interrupt(&mut self) {
        self.cancel_animation();
        self.user_modified = true;
    }

    /// Time of the most recent animation sample
    pub fn last_sample_time(&self) -> Duration {
        self.last_sample
    }

    /// Compute the per-layer transforms and publish them to the surface
    pub fn repaint(&mut self) -> Vec<LayerRender> {
        let renders: Vec<LayerRender> = self
            .layers
            .iter()
            .map(|(layer, camera)| LayerRender {
                layer: layer.clone(),
                transform: camera.state.matrix(self.width, self.height),
                clip: camera.state.clip,
            })
            .collect();

        if let Some(surface) = self.surface.as_mut() {
            surface.present(&renders);
        }
        self.events.emit(&ViewportEvent::Repainted);
        renders
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layers", &self.layers)
            .field("animating", &self.animation.is_some())
            .field("dragging", &self.dragging)
            .finish()
    }
}
