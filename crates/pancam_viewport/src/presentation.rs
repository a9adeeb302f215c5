// SPDX-License-Identifier: MIT OR Apache-2.0
//! Presentation model: ordered frames over a set of layers.
//!
//! The presentation is authored elsewhere and is read-only during playback.
//! Frames reference layers by id; a layer's camera in a frame is either
//! authored explicitly or inherited from the previous frame.

use crate::camera::CameraState;
use crate::error::{Error, Result};
use crate::timing::TimingFunction;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub String);

impl FrameId {
    /// Create a new random frame ID
    pub fn generate() -> Self {
        Self(format!("frame-{}", Uuid::new_v4()))
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FrameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a layer (an SVG group in the document)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Transition into a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Easing curve
    pub timing: TimingFunction,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            timing: TimingFunction::Ease,
        }
    }
}

/// Camera of one layer in one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerProperties {
    /// Authored camera state
    pub camera: CameraState,
    /// Inherit the camera from the previous frame instead
    pub follows_previous: bool,
}

impl LayerProperties {
    /// Explicitly authored camera
    pub fn authored(camera: CameraState) -> Self {
        Self {
            camera,
            follows_previous: false,
        }
    }

    /// Camera inherited from the previous frame
    pub fn inherited() -> Self {
        Self {
            camera: CameraState::default(),
            follows_previous: true,
        }
    }
}

/// One stop in the presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Stable frame ID
    #[serde(default)]
    pub id: FrameId,
    /// Frame title
    #[serde(default)]
    pub title: String,
    /// Per-layer cameras
    #[serde(default)]
    pub layers: IndexMap<LayerId, LayerProperties>,
    /// Transition used when moving to this frame
    #[serde(default)]
    pub transition: Transition,
    /// Whether the frame auto-advances
    #[serde(default)]
    pub timeout_enabled: bool,
    /// Auto-advance delay in seconds
    #[serde(default)]
    pub timeout_seconds: f64,
}

impl Frame {
    /// Create a new frame with a generated ID
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: FrameId::generate(),
            title: title.into(),
            layers: IndexMap::new(),
            transition: Transition::default(),
            timeout_enabled: false,
            timeout_seconds: 0.0,
        }
    }

    /// Set the frame ID
    pub fn with_id(mut self, id: impl Into<FrameId>) -> Self {
        self.id = id.into();
        self
    }

    /// Author a camera for a layer
    pub fn with_camera(mut self, layer: impl Into<LayerId>, camera: CameraState) -> Self {
        self.layers.insert(layer.into(), LayerProperties::authored(camera));
        self
    }

    /// Make a layer follow the previous frame
    pub fn with_inherited(mut self, layer: impl Into<LayerId>) -> Self {
        self.layers.insert(layer.into(), LayerProperties::inherited());
        self
    }

    /// Set the transition into this frame
    pub fn with_transition(mut self, duration_ms: u64, timing: TimingFunction) -> Self {
        self.transition = Transition { duration_ms, timing };
        self
    }

    /// Enable auto-advance after `seconds`
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_enabled = true;
        self.timeout_seconds = seconds;
        self
    }

    /// Auto-advance delay, if enabled
    pub fn timeout(&self) -> Option<std::time::Duration> {
        if !self.timeout_enabled {
            return None;
        }
        std::time::Duration::try_from_secs_f64(self.timeout_seconds).ok()
    }
}

/// Global interaction toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionFlags {
    /// Drag to pan
    pub enable_mouse_translation: bool,
    /// Wheel or shift-drag to zoom
    pub enable_mouse_zoom: bool,
    /// Wheel or ctrl-drag to rotate
    pub enable_mouse_rotation: bool,
    /// Click to change frame
    pub enable_mouse_navigation: bool,
    /// Arrow/page/home/end keys
    pub enable_keyboard_navigation: bool,
    /// `+` and `-`
    pub enable_keyboard_zoom: bool,
    /// `r` and `R`
    pub enable_keyboard_rotation: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self {
            enable_mouse_translation: true,
            enable_mouse_zoom: true,
            enable_mouse_rotation: true,
            enable_mouse_navigation: true,
            enable_keyboard_navigation: true,
            enable_keyboard_zoom: true,
            enable_keyboard_rotation: true,
        }
    }
}

impl InteractionFlags {
    /// Every capability switched off
    pub fn locked() -> Self {
        Self {
            enable_mouse_translation: false,
            enable_mouse_zoom: false,
            enable_mouse_rotation: false,
            enable_mouse_navigation: false,
            enable_keyboard_navigation: false,
            enable_keyboard_zoom: false,
            enable_keyboard_rotation: false,
        }
    }
}

/// Reference to a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRef {
    /// By stable ID
    Id(FrameId),
    /// By position, 0-based
    Index(usize),
}

impl FrameRef {
    /// Parse a URL fragment such as `#3` (1-based frame number) or `#intro`
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let s = fragment.trim().trim_start_matches('#');
        if s.is_empty() {
            return None;
        }
        match s.parse::<usize>() {
            Ok(0) => None,
            Ok(n) => Some(Self::Index(n - 1)),
            Err(_) => Some(Self::Id(FrameId(s.to_string()))),
        }
    }
}

impl From<usize> for FrameRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&Frame> for FrameRef {
    fn from(frame: &Frame) -> Self {
        Self::Id(frame.id.clone())
    }
}

impl From<FrameId> for FrameRef {
    fn from(id: FrameId) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Index(index) => write!(f, "index {index}"),
        }
    }
}

/// An ordered sequence of frames over a fixed set of layers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    /// Presentation title
    pub title: String,
    /// Layers in document order
    pub layers: Vec<LayerId>,
    /// Frames in playback order
    pub frames: Vec<Frame>,
    /// Capability gates for viewer input
    pub interaction: InteractionFlags,
    /// Frame to start from, as a URL fragment
    pub initial_frame: Option<String>,
}

impl Presentation {
    /// Create an empty presentation
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Add a layer
    pub fn with_layer(mut self, layer: impl Into<LayerId>) -> Self {
        self.layers.push(layer.into());
        self
    }

    /// Append a frame
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Set the capability gates
    pub fn with_interaction(mut self, interaction: InteractionFlags) -> Self {
        self.interaction = interaction;
        self
    }

    /// Parse a presentation from RON and validate it
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let presentation: Presentation = ron::from_str(source)
            .map_err(|e| Error::InvalidArgument(format!("presentation: {e}")))?;
        presentation.validate()?;
        Ok(presentation)
    }

    /// Check camera invariants and frame ID uniqueness
    pub fn validate(&self) -> Result<()> {
        for (index, frame) in self.frames.iter().enumerate() {
            if self.frames[..index].iter().any(|f| f.id == frame.id) {
                return Err(Error::InvalidArgument(format!("duplicate frame id {}", frame.id)));
            }
            if frame.timeout_enabled
                && std::time::Duration::try_from_secs_f64(frame.timeout_seconds).is_err()
            {
                return Err(Error::InvalidArgument(format!(
                    "frame {}: timeout of {} seconds is out of range",
                    frame.id, frame.timeout_seconds
                )));
            }
            for (layer, props) in &frame.layers {
                if !self.layers.contains(layer) {
                    return Err(Error::LayerNotFound(layer.clone()));
                }
                if !props.follows_previous && !props.camera.is_valid() {
                    return Err(Error::InvalidArgument(format!(
                        "frame {} layer {layer}: invalid camera {:?}",
                        frame.id, props.camera
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get a frame by index
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Index of the last frame
    pub fn last_index(&self) -> Option<usize> {
        self.frames.len().checked_sub(1)
    }

    /// Resolve a frame reference to an index
    pub fn find(&self, frame_ref: &FrameRef) -> Result<usize> {
        match frame_ref {
            FrameRef::Index(index) if *index < self.frames.len() => Ok(*index),
            FrameRef::Id(id) => self
                .frames
                .iter()
                .position(|f| &f.id == id)
                .ok_or_else(|| Error::NotFound(frame_ref.to_string())),
            FrameRef::Index(_) => Err(Error::NotFound(frame_ref.to_string())),
        }
    }

    /// Camera of `layer` at frame `index`, following inheritance backwards
    pub fn camera_at(&self, index: usize, layer: &LayerId) -> Option<CameraState> {
        let frames = self.frames.get(..=index)?;
        for frame in frames.iter().rev() {
            match frame.layers.get(layer) {
                Some(props) if !props.follows_previous => return Some(props.camera),
                _ => continue,
            }
        }
        Some(CameraState::default())
    }

    /// Cameras of every layer at frame `index`
    pub fn cameras_at(&self, index: usize) -> Option<IndexMap<LayerId, CameraState>> {
        if index >= self.frames.len() {
            return None;
        }
        let mut cameras = IndexMap::with_capacity(self.layers.len());
        for layer in &self.layers {
            let camera = self.camera_at(index, layer).unwrap_or_default();
            cameras.insert(layer.clone(), camera);
        }
        Some(cameras)
    }
}
