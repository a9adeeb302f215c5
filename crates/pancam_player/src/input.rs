// SPDX-License-Identifier: MIT OR Apache-2.0
//! Raw input events delivered by the host.
//!
//! Coordinates are viewport device pixels. Touch input arrives as primary
//! button pointer events.

use serde::{Deserialize, Serialize};

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left button or touch
    Primary,
    /// Right button
    Secondary,
    /// Wheel button
    Middle,
}

/// A single modifier key, as used in bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Shift
    Shift,
    /// Control
    Ctrl,
    /// Alt / Option
    Alt,
    /// Meta / Command
    Meta,
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift held
    pub shift: bool,
    /// Control held
    pub ctrl: bool,
    /// Alt held
    pub alt: bool,
    /// Meta held
    pub meta: bool,
}

impl Modifiers {
    /// No modifier held
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only shift held
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Only control held
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Only alt held
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Whether `modifier` is held
    pub fn contains(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Meta => self.meta,
        }
    }

    /// Combine with another set
    pub fn union(self, other: Self) -> Self {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
            meta: self.meta || other.meta,
        }
    }
}

/// Logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Home
    Home,
    /// End
    End,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Enter / Return
    Enter,
    /// Space bar
    Space,
    /// A printable character, after keyboard layout mapping
    Char(char),
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowLeft"`, `"PageDown"`, `"r"`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "Home" => Self::Home,
            "End" => Self::End,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Enter" | "Return" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// A raw input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Button pressed
    PointerDown {
        /// X position
        x: f64,
        /// Y position
        y: f64,
        /// Pressed button
        button: PointerButton,
        /// Held modifiers
        modifiers: Modifiers,
    },
    /// Pointer moved
    PointerMove {
        /// X position
        x: f64,
        /// Y position
        y: f64,
        /// Held modifiers
        modifiers: Modifiers,
    },
    /// Button released
    PointerUp {
        /// X position
        x: f64,
        /// Y position
        y: f64,
        /// Released button
        button: PointerButton,
    },
    /// Wheel scrolled; positive `delta` scrolls down
    Wheel {
        /// X position
        x: f64,
        /// Y position
        y: f64,
        /// Scroll amount
        delta: f64,
        /// Held modifiers
        modifiers: Modifiers,
    },
    /// Context menu requested
    ///
    /// Hosts send this after a right button release. It is the only event
    /// that moves to the previous frame; the secondary click itself is only
    /// reported as [`crate::ControllerEvent::Click`].
    ContextMenu,
    /// Key pressed
    KeyDown {
        /// Pressed key
        key: Key,
        /// Held modifiers
        modifiers: Modifiers,
    },
}

/// Whether the host should stop propagation of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled: stop propagation and prevent the default action
    Consumed,
    /// Not handled: let the host process it
    Ignored,
}

impl KeyOutcome {
    /// Whether the event was handled
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("R"), Some(Key::Char('R')));
        assert_eq!(Key::from_name("F13"), None);
    }

    #[test]
    fn test_modifier_lookup() {
        let m = Modifiers::SHIFT.union(Modifiers::CTRL);
        assert!(m.contains(Modifier::Shift));
        assert!(m.contains(Modifier::Ctrl));
        assert!(!m.contains(Modifier::Alt));
    }
}
