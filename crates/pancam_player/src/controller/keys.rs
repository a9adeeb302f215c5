// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyboard bindings.

use crate::input::{Key, Modifiers};

/// Navigation target of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// First frame
    First,
    /// Last frame
    Last,
    /// Previous frame
    Previous,
    /// Next frame
    Next,
}

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Change frame; `jump` skips the transition
    Navigate {
        /// Target frame
        target: NavTarget,
        /// Cut instead of animating
        jump: bool,
    },
    /// Zoom in about the viewport centre
    ZoomIn,
    /// Zoom out about the viewport centre
    ZoomOut,
    /// Rotate clockwise
    RotateClockwise,
    /// Rotate counter-clockwise
    RotateCounterClockwise,
    /// Pause or resume
    TogglePause,
    /// Show or hide the blank screen
    ToggleBlankScreen,
}

/// Map a key press to its action
pub fn resolve(key: Key, modifiers: Modifiers) -> Option<KeyAction> {
    if modifiers.alt || modifiers.ctrl || modifiers.meta {
        return None;
    }

    let navigate = |target| KeyAction::Navigate {
        target,
        jump: modifiers.shift,
    };

    let action = match key {
        Key::Home => navigate(NavTarget::First),
        Key::End => navigate(NavTarget::Last),
        Key::ArrowLeft | Key::ArrowUp | Key::PageUp => navigate(NavTarget::Previous),
        Key::ArrowRight | Key::ArrowDown | Key::PageDown | Key::Enter | Key::Space => {
            navigate(NavTarget::Next)
        }
        Key::Char('+' | '=') => KeyAction::ZoomIn,
        Key::Char('-') => KeyAction::ZoomOut,
        Key::Char('r') => KeyAction::RotateClockwise,
        Key::Char('R') => KeyAction::RotateCounterClockwise,
        Key::Char('p' | 'P') => KeyAction::TogglePause,
        Key::Char('.' | 'b' | 'B') => KeyAction::ToggleBlankScreen,
        Key::Char(_) => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_selects_jump() {
        assert_eq!(
            resolve(Key::ArrowRight, Modifiers::NONE),
            Some(KeyAction::Navigate {
                target: NavTarget::Next,
                jump: false
            })
        );
        assert_eq!(
            resolve(Key::Home, Modifiers::SHIFT),
            Some(KeyAction::Navigate {
                target: NavTarget::First,
                jump: true
            })
        );
    }

    #[test]
    fn test_command_modifiers_disable_bindings() {
        assert_eq!(resolve(Key::Space, Modifiers::CTRL), None);
        assert_eq!(resolve(Key::Char('+'), Modifiers::ALT), None);
    }

    #[test]
    fn test_character_keys() {
        assert_eq!(resolve(Key::Char('='), Modifiers::NONE), Some(KeyAction::ZoomIn));
        assert_eq!(
            resolve(Key::Char('R'), Modifiers::SHIFT),
            Some(KeyAction::RotateCounterClockwise)
        );
        assert_eq!(resolve(Key::Char('.'), Modifiers::NONE), Some(KeyAction::ToggleBlankScreen));
        assert_eq!(resolve(Key::Char('x'), Modifiers::NONE), None);
    }
}
