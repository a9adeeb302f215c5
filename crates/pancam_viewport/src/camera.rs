// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera state for a single layer.
//!
//! A camera maps document coordinates to viewport device pixels with
//! `T(viewport centre) · R(rotation) · S(scale) · T(translate)`. The
//! translation is a document-unit offset, so a camera with no translation
//! shows the document origin at the centre of the viewport.

use serde::{Deserialize, Serialize};

/// Normalize an angle in degrees to `[0, 360)`
pub fn normalize_angle(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Signed difference `to - from` along the shorter arc, in `(-180, 180]`
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    let d = normalize_angle(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Axis-aligned clip rectangle in viewport device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRect {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl ClipRect {
    /// Create a rect from two corners in any order
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
        }
    }

    /// Rect covering a whole viewport of the given size
    pub fn full(width: f64, height: f64) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: width,
            y1: height,
        }
    }

    /// Width of the rect (never negative)
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rect (never negative)
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// A zero-area rect hides the layer entirely
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Whether the point lies inside or on the border
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Swap crossed edges so that `x0 <= x1` and `y0 <= y1`
    pub fn normalized(self) -> Self {
        Self::from_corners(self.x0, self.y0, self.x1, self.y1)
    }

    /// Edge-by-edge linear interpolation
    pub fn lerp(&self, other: &ClipRect, t: f64) -> ClipRect {
        ClipRect {
            x0: lerp(self.x0, other.x0, t),
            y0: lerp(self.y0, other.y0, t),
            x1: lerp(self.x1, other.x1, t),
            y1: lerp(self.y1, other.y1, t),
        }
        .normalized()
    }
}

/// Camera pose of one layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraState {
    /// Horizontal document-unit offset
    pub translate_x: f64,
    /// Vertical document-unit offset
    pub translate_y: f64,
    /// Zoom factor, always > 0
    pub scale: f64,
    /// Rotation in degrees, in `[0, 360)`
    pub rotation: f64,
    /// Optional clip rectangle
    pub clip: Option<ClipRect>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            clip: None,
        }
    }
}

impl CameraState {
    /// Create a camera with the given translation and scale
    pub fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
            ..Self::default()
        }
    }

    /// Set the rotation (normalized)
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_angle(degrees);
        self
    }

    /// Set the clip rect (normalized)
    pub fn with_clip(mut self, clip: ClipRect) -> Self {
        self.clip = Some(clip.normalized());
        self
    }

    /// Check the model invariants
    pub fn is_valid(&self) -> bool {
        self.scale > 0.0
            && self.scale.is_finite()
            && self.translate_x.is_finite()
            && self.translate_y.is_finite()
            && (0.0..360.0).contains(&self.rotation)
            && self.clip.map_or(true, |c| c.x0 <= c.x1 && c.y0 <= c.y1)
    }

    /// Convert a device-pixel delta to a document-unit delta
    pub fn device_to_document_delta(&self, dx: f64, dy: f64) -> (f64, f64) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        // Inverse rotation, then inverse scale
        ((dx * cos + dy * sin) / self.scale, (-dx * sin + dy * cos) / self.scale)
    }

    /// Shift by a device-pixel delta
    pub fn translate_device(&mut self, dx: f64, dy: f64) {
        let (ddx, ddy) = self.device_to_document_delta(dx, dy);
        self.translate_x += ddx;
        self.translate_y += ddy;
    }

    /// Multiply the scale by `factor`, keeping the device point `(fx, fy)`
    /// (relative to the viewport centre) fixed on screen
    pub fn zoom_about(&mut self, factor: f64, fx: f64, fy: f64) {
        let (px, py) = self.device_to_document_delta(fx, fy);
        let k = 1.0 / factor - 1.0;
        self.translate_x += px * k;
        self.translate_y += py * k;
        self.scale *= factor;
    }

    /// Add a rotation delta about the viewport centre
    pub fn rotate(&mut self, degrees: f64) {
        self.rotation = normalize_angle(self.rotation + degrees);
    }

    /// Render matrix for a viewport of the given size
    pub fn matrix(&self, width: f64, height: f64) -> Transform2D {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let s = self.scale;
        let (tx, ty) = (self.translate_x, self.translate_y);
        Transform2D {
            a: s * cos,
            b: s * sin,
            c: -s * sin,
            d: s * cos,
            e: width / 2.0 + s * (cos * tx - sin * ty),
            f: height / 2.0 + s * (sin * tx + cos * ty),
        }
    }

    /// Interpolate toward `target` at eased progress `t`.
    ///
    /// `full_clip` stands in for a missing clip rect on either side.
    pub fn interpolate(&self, target: &CameraState, t: f64, full_clip: ClipRect) -> CameraState {
        if t >= 1.0 {
            return *target;
        }
        if t <= 0.0 {
            return *self;
        }

        let clip = match (self.clip, target.clip) {
            (None, None) => None,
            (from, to) => Some(
                from.unwrap_or(full_clip)
                    .lerp(&to.unwrap_or(full_clip), t),
            ),
        };

        CameraState {
            translate_x: lerp(self.translate_x, target.translate_x, t),
            translate_y: lerp(self.translate_y, target.translate_y, t),
            // Scale interpolates in log space
            scale: (lerp(self.scale.ln(), target.scale.ln(), t)).exp(),
            rotation: normalize_angle(
                self.rotation + shortest_angle_delta(self.rotation, target.rotation) * t,
            ),
            clip,
        }
    }
}

/// Affine 2D matrix in SVG `matrix(a b c d e f)` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Row 0, column 0
    pub a: f64,
    /// Row 1, column 0
    pub b: f64,
    /// Row 0, column 1
    pub c: f64,
    /// Row 1, column 1
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Transform2D {
    /// The identity transform
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Map a document point to device pixels
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Format as an SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        // Adding 0.0 folds negative zero so it prints as "0"
        format!(
            "matrix({},{},{},{},{},{})",
            self.a + 0.0,
            self.b + 0.0,
            self.c + 0.0,
            self.d + 0.0,
            self.e + 0.0,
            self.f + 0.0
        )
    }
}

/// Linear interpolation between two floats
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
