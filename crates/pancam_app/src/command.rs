// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line commands read from stdin.
//!
//! ```text
//! key ArrowRight [shift] [ctrl] [alt] [meta]
//! down 120 80 [primary|secondary|middle] [modifiers]
//! move 140 80 [modifiers]
//! up 140 80 [button]
//! wheel 400 300 -1 [modifiers]
//! menu
//! goto #3 | jump intro | preview 2
//! pause | play | blank on|off
//! resize 1920 1080 | edit on|off | clip on|off
//! status | quit
//! ```

use pancam_player::{InputEvent, Key, Modifiers, PointerButton};
use pancam_viewport::FrameRef;
use std::str::FromStr;
use thiserror::Error;

/// Command parse errors
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// The first word is not a command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// A required argument is missing
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// An argument could not be parsed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A host command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw input for the controller
    Input(InputEvent),
    /// Animate to a frame
    Goto(FrameRef),
    /// Cut to a frame
    Jump(FrameRef),
    /// Animate to a frame without affecting playback
    Preview(FrameRef),
    /// Suspend auto-advance
    Pause,
    /// Resume auto-advance from the current frame
    Play,
    /// Show or hide the blank screen
    Blank(bool),
    /// Resize the viewport
    Resize(f64, f64),
    /// Switch edit mode
    Edit(bool),
    /// Switch clip editing
    ClipEditing(bool),
    /// Log the playback state
    Status,
    /// Stop the host
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::MissingArgument("command"));
        };
        let rest: Vec<&str> = words.collect();

        let command = match name {
            "key" => {
                let key_name = rest.first().ok_or(CommandError::MissingArgument("key"))?;
                let key = Key::from_name(key_name)
                    .ok_or_else(|| CommandError::InvalidArgument(format!("key '{key_name}'")))?;
                Self::Input(InputEvent::KeyDown {
                    key,
                    modifiers: modifiers(&rest[1..])?,
                })
            }
            "down" => {
                let (x, y) = point(&rest)?;
                let (button, tail) = button(&rest[2..]);
                Self::Input(InputEvent::PointerDown {
                    x,
                    y,
                    button,
                    modifiers: modifiers(tail)?,
                })
            }
            "move" => {
                let (x, y) = point(&rest)?;
                Self::Input(InputEvent::PointerMove {
                    x,
                    y,
                    modifiers: modifiers(&rest[2..])?,
                })
            }
            "up" => {
                let (x, y) = point(&rest)?;
                let (button, _) = button(&rest[2..]);
                Self::Input(InputEvent::PointerUp { x, y, button })
            }
            "wheel" => {
                let (x, y) = point(&rest)?;
                let delta = number(rest.get(2).copied(), "delta")?;
                Self::Input(InputEvent::Wheel {
                    x,
                    y,
                    delta,
                    modifiers: modifiers(&rest[3..])?,
                })
            }
            "menu" => Self::Input(InputEvent::ContextMenu),
            "goto" => Self::Goto(frame_ref(rest.first().copied())?),
            "jump" => Self::Jump(frame_ref(rest.first().copied())?),
            "preview" => Self::Preview(frame_ref(rest.first().copied())?),
            "pause" => Self::Pause,
            "play" => Self::Play,
            "blank" => Self::Blank(switch(rest.first().copied())?),
            "resize" => {
                let (w, h) = point(&rest)?;
                Self::Resize(w, h)
            }
            "edit" => Self::Edit(switch(rest.first().copied())?),
            "clip" => Self::ClipEditing(switch(rest.first().copied())?),
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn number(word: Option<&str>, name: &'static str) -> Result<f64, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument(name))?;
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::InvalidArgument(format!("{name} '{word}'")))
}

fn point(words: &[&str]) -> Result<(f64, f64), CommandError> {
    Ok((
        number(words.first().copied(), "x")?,
        number(words.get(1).copied(), "y")?,
    ))
}

/// Optional button name; defaults to primary
fn button<'a>(words: &'a [&'a str]) -> (PointerButton, &'a [&'a str]) {
    match words.first().copied() {
        Some("primary") => (PointerButton::Primary, &words[1..]),
        Some("secondary") => (PointerButton::Secondary, &words[1..]),
        Some("middle") => (PointerButton::Middle, &words[1..]),
        _ => (PointerButton::Primary, words),
    }
}

fn modifiers(words: &[&str]) -> Result<Modifiers, CommandError> {
    let mut modifiers = Modifiers::NONE;
    for word in words {
        match *word {
            "shift" => modifiers.shift = true,
            "ctrl" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "meta" => modifiers.meta = true,
            other => {
                return Err(CommandError::InvalidArgument(format!("modifier '{other}'")));
            }
        }
    }
    Ok(modifiers)
}

fn switch(word: Option<&str>) -> Result<bool, CommandError> {
    match word {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        Some(other) => Err(CommandError::InvalidArgument(format!("expected on|off, got '{other}'"))),
        None => Err(CommandError::MissingArgument("on|off")),
    }
}

fn frame_ref(word: Option<&str>) -> Result<FrameRef, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument("frame"))?;
    FrameRef::from_fragment(word)
        .ok_or_else(|| CommandError::InvalidArgument(format!("frame '{word}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pancam_viewport::FrameId;

    #[test]
    fn test_pointer_commands() {
        assert_eq!(
            "down 10 20 secondary shift".parse::<Command>(),
            Ok(Command::Input(InputEvent::PointerDown {
                x: 10.0,
                y: 20.0,
                button: PointerButton::Secondary,
                modifiers: Modifiers::SHIFT,
            }))
        );
        assert_eq!(
            "up 1 2".parse::<Command>(),
            Ok(Command::Input(InputEvent::PointerUp {
                x: 1.0,
                y: 2.0,
                button: PointerButton::Primary,
            }))
        );
        assert_eq!(
            "wheel 5 5".parse::<Command>(),
            Err(CommandError::MissingArgument("delta"))
        );
    }

    #[test]
    fn test_frame_references() {
        assert_eq!("goto #2".parse::<Command>(), Ok(Command::Goto(FrameRef::Index(1))));
        assert_eq!(
            "jump intro".parse::<Command>(),
            Ok(Command::Jump(FrameRef::Id(FrameId::from("intro"))))
        );
        assert!("goto #0".parse::<Command>().is_err());
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert!("key F99".parse::<Command>().is_err());
        assert!("blank maybe".parse::<Command>().is_err());
        assert!("move 1 nan".parse::<Command>().is_err());
        assert!("key Space hyper".parse::<Command>().is_err());
    }
}
