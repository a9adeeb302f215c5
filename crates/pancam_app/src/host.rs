// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless host: owns the engine and applies commands.

use crate::command::Command;
use crate::config::AppConfig;
use pancam_player::{
    ControllerEvent, LocalChange, Player, PlayerEvent, PlayerState, UiController,
};
use pancam_viewport::{FrameRef, LayerRender, Presentation, RenderSurface, Viewport};
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Surface that traces layer transforms instead of drawing
struct TraceSurface;

impl RenderSurface for TraceSurface {
    fn present(&mut self, layers: &[LayerRender]) {
        for layer in layers {
            tracing::trace!(layer = %layer.layer, transform = %layer.transform.to_svg(), "present");
        }
    }
}

/// The engine plus the outbound change queue
pub struct Host {
    player: Player,
    controller: UiController,
    outbox: Rc<RefCell<Vec<LocalChange>>>,
}

impl Host {
    /// Build the engine over a presentation
    pub fn new(presentation: Arc<Presentation>, config: &AppConfig, edit_mode: bool) -> Self {
        let mut viewport = Viewport::for_presentation(&presentation, config.width, config.height);
        viewport.set_clip_border(config.controller.clip_border);
        viewport.set_surface(Box::new(TraceSurface));

        let mut player = Player::new(Arc::clone(&presentation), viewport, config.player);
        player.events().subscribe(|event| match event {
            PlayerEvent::StateChange(state) => tracing::debug!("State: {state:?}"),
            PlayerEvent::FrameChange { index, id } => {
                tracing::debug!("Frame {} ({id})", index + 1);
            }
            PlayerEvent::BlankScreenChange(visible) => {
                tracing::debug!("Blank screen: {visible}");
            }
        });

        let mut controller = UiController::new(presentation, config.controller);
        controller.set_edit_mode(edit_mode);

        let outbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outbox);
        controller.events().subscribe(move |event| {
            if let ControllerEvent::LocalChange(change) = event {
                sink.borrow_mut().push(*change);
            }
        });

        Self {
            player,
            controller,
            outbox,
        }
    }

    /// Start playback at `start`, falling back to the first frame
    pub fn start(&mut self, start: Option<FrameRef>, now: Duration) -> pancam_viewport::Result<()> {
        if let Some(frame) = start {
            match self.player.play_from_frame(frame.clone(), now) {
                Ok(()) => return Ok(()),
                Err(e) => tracing::warn!("Start frame {frame} unavailable ({e}), using the first frame"),
            }
        }
        self.player.play_from_frame(0, now)
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Advance timers and animations
    pub fn tick(&mut self, now: Duration) {
        self.player.tick(now);
        self.controller.tick(now, &mut self.player);
    }

    /// Apply one command
    pub fn apply(&mut self, command: Command, now: Duration) -> ControlFlow<()> {
        let result = match command {
            Command::Input(event) => {
                let outcome = self.controller.handle(&event, &mut self.player, now);
                tracing::debug!("{event:?}: {outcome:?}");
                Ok(())
            }
            Command::Goto(frame) => self.player.move_to_frame(frame, now),
            Command::Jump(frame) => self.player.jump_to_frame(frame, now),
            Command::Preview(frame) => self.player.preview_frame(frame, now),
            Command::Pause => {
                self.player.pause();
                Ok(())
            }
            Command::Play => self.player.play_from_frame(self.player.current_index(), now),
            Command::Blank(true) => {
                self.player.enable_blank_screen();
                Ok(())
            }
            Command::Blank(false) => {
                self.player.disable_blank_screen();
                Ok(())
            }
            Command::Resize(width, height) => {
                self.player.viewport_mut().resize(width, height);
                Ok(())
            }
            Command::Edit(on) => {
                self.controller.set_edit_mode(on);
                Ok(())
            }
            Command::ClipEditing(on) => {
                self.controller.set_clip_editing(on);
                Ok(())
            }
            Command::Status => {
                self.log_status();
                Ok(())
            }
            Command::Quit => return ControlFlow::Break(()),
        };

        // Unresolved frame references leave playback unchanged
        if let Err(e) = result {
            tracing::warn!("{e}");
        }
        ControlFlow::Continue(())
    }

    /// Take the local changes published since the last call
    pub fn drain_changes(&mut self) -> Vec<LocalChange> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    fn log_status(&self) {
        let player = &self.player;
        let title = player
            .current_frame()
            .map(|f| f.title.as_str())
            .unwrap_or_default();
        let state = match player.state() {
            PlayerState::Idle => "idle",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Transitioning => "transitioning",
        };
        tracing::info!(
            "Frame {}/{} \"{}\" {}, blank screen {}",
            player.current_index() + 1,
            player.presentation().len(),
            title,
            state,
            if player.is_blank_screen() { "on" } else { "off" }
        );
    }
}
