// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame navigation and playback state.
//!
//! The player owns the viewport and drives it toward the recorded cameras of
//! the current frame. Auto-advance and animation completion are both
//! processed from [`Player::tick`], so the whole machine runs on injected
//! time.

use crate::config::PlayerConfig;
use crate::history::{Arrival, NavigationHistory};
use crate::timer::{OneShotTimer, TimerToken};
use pancam_viewport::{
    AnimationStep, AnimationToken, Frame, FrameId, FrameRef, Presentation, Result, Signal,
    TimingFunction, Viewport,
};
use std::sync::Arc;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Playback not started
    #[default]
    Idle,
    /// Showing a frame with auto-advance enabled
    Playing,
    /// Showing a frame with auto-advance suspended
    Paused,
    /// Animating between frames
    Transitioning,
}

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The playback state changed
    StateChange(PlayerState),
    /// The current frame changed
    FrameChange {
        /// Index of the new frame
        index: usize,
        /// ID of the new frame
        id: FrameId,
    },
    /// The blank screen was shown or hidden
    BlankScreenChange(bool),
}

/// Presentation playback state machine
pub struct Player {
    presentation: Arc<Presentation>,
    viewport: Viewport,
    config: PlayerConfig,
    current: usize,
    current_arrival: Arrival,
    started: bool,
    playing: bool,
    transitioning: bool,
    blank_screen: bool,
    state: PlayerState,
    timer: OneShotTimer,
    transition: Option<AnimationToken>,
    history: NavigationHistory,
    events: Signal<PlayerEvent>,
}

impl Player {
    /// Create an idle player over a presentation
    pub fn new(presentation: Arc<Presentation>, viewport: Viewport, config: PlayerConfig) -> Self {
        Self {
            presentation,
            viewport,
            history: NavigationHistory::with_max_depth(config.history_depth),
            config,
            current: 0,
            current_arrival: Arrival::Manual,
            started: false,
            playing: false,
            transitioning: false,
            blank_screen: false,
            state: PlayerState::Idle,
            timer: OneShotTimer::new(),
            transition: None,
            events: Signal::new(),
        }
    }

    /// Outbound events
    pub fn events(&mut self) -> &mut Signal<PlayerEvent> {
        &mut self.events
    }

    /// The presentation being played
    pub fn presentation(&self) -> &Arc<Presentation> {
        &self.presentation
    }

    /// The viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The viewport, for direct manipulation
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Current playback state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether auto-advance is active
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a frame transition is animating
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Whether the blank screen is shown
    pub fn is_blank_screen(&self) -> bool {
        self.blank_screen
    }

    /// Index of the current frame
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The current frame
    pub fn current_frame(&self) -> Option<&Frame> {
        self.presentation.frame(self.current)
    }

    /// Frames visited before the current one
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    /// Pending auto-advance deadline
    pub fn auto_advance_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Resolve a frame reference to an index
    pub fn find_frame(&self, frame: &FrameRef) -> Result<usize> {
        self.presentation.find(frame)
    }

    /// Index `moveToNext` would go to
    pub fn next_index(&self) -> Option<usize> {
        let last = self.presentation.last_index()?;
        (self.current < last).then_some(self.current + 1)
    }

    /// Index `moveToPrevious` would go to.
    ///
    /// Frames whose most recent visit came from auto-advance are skipped.
    pub fn previous_index(&self) -> Option<usize> {
        if self.presentation.is_empty() || self.current == 0 {
            return None;
        }
        let mut index = self.current - 1;
        while index > 0 && self.history.last_arrival_at(index) == Some(Arrival::Timeout) {
            index -= 1;
        }
        Some(index)
    }

    /// Cut to a frame and start playing
    pub fn play_from_frame(&mut self, frame: impl Into<FrameRef>, now: Duration) -> Result<()> {
        let index = self.find_frame(&frame.into())?;
        tracing::info!("Playing from frame {}", self.describe(index));
        self.navigate(index, Duration::ZERO, TimingFunction::Linear, Arrival::Manual, now)
    }

    /// Animate to a frame and keep playing
    pub fn move_to_frame(&mut self, frame: impl Into<FrameRef>, now: Duration) -> Result<()> {
        let index = self.find_frame(&frame.into())?;
        let transition = self.transition_into(index);
        tracing::info!("Moving to frame {}", self.describe(index));
        self.navigate(index, transition.0, transition.1, Arrival::Manual, now)
    }

    /// Cut to a frame and keep playing
    pub fn jump_to_frame(&mut self, frame: impl Into<FrameRef>, now: Duration) -> Result<()> {
        let index = self.find_frame(&frame.into())?;
        tracing::info!("Jumping to frame {}", self.describe(index));
        self.navigate(index, Duration::ZERO, TimingFunction::Linear, Arrival::Manual, now)
    }

    /// Animate to a frame without touching the play state or history
    pub fn preview_frame(&mut self, frame: impl Into<FrameRef>, now: Duration) -> Result<()> {
        let index = self.find_frame(&frame.into())?;
        let (duration, timing) = self.transition_into(index);
        self.preview(index, duration, timing, now)
    }

    /// Cut to a frame without touching the play state or history
    pub fn preview_frame_instant(
        &mut self,
        frame: impl Into<FrameRef>,
        now: Duration,
    ) -> Result<()> {
        let index = self.find_frame(&frame.into())?;
        self.preview(index, Duration::ZERO, TimingFunction::Linear, now)
    }

    /// Animate to the next frame; no-op at the last frame
    pub fn move_to_next(&mut self, now: Duration) -> Result<()> {
        match self.next_index() {
            Some(index) => self.move_to_frame(index, now),
            None => {
                tracing::debug!("Already at the last frame");
                Ok(())
            }
        }
    }

    /// Animate to the previous manually reached frame; no-op at the first frame
    pub fn move_to_previous(&mut self, now: Duration) -> Result<()> {
        match self.previous_index() {
            Some(index) => self.move_to_frame(index, now),
            None => {
                tracing::debug!("Already at the first frame");
                Ok(())
            }
        }
    }

    /// Animate to the first frame
    pub fn move_to_first(&mut self, now: Duration) -> Result<()> {
        self.move_to_frame(0, now)
    }

    /// Animate to the last frame
    pub fn move_to_last(&mut self, now: Duration) -> Result<()> {
        let last = self.presentation.last_index().unwrap_or(0);
        self.move_to_frame(last, now)
    }

    /// Cut to the next frame; no-op at the last frame
    pub fn jump_to_next(&mut self, now: Duration) -> Result<()> {
        match self.next_index() {
            Some(index) => self.jump_to_frame(index, now),
            None => Ok(()),
        }
    }

    /// Cut to the previous manually reached frame; no-op at the first frame
    pub fn jump_to_previous(&mut self, now: Duration) -> Result<()> {
        match self.previous_index() {
            Some(index) => self.jump_to_frame(index, now),
            None => Ok(()),
        }
    }

    /// Cut to the first frame
    pub fn jump_to_first(&mut self, now: Duration) -> Result<()> {
        self.jump_to_frame(0, now)
    }

    /// Cut to the last frame
    pub fn jump_to_last(&mut self, now: Duration) -> Result<()> {
        let last = self.presentation.last_index().unwrap_or(0);
        self.jump_to_frame(last, now)
    }

    /// Suspend auto-advance. A running transition still completes.
    pub fn pause(&mut self) {
        self.timer.cancel();
        if self.playing {
            tracing::info!("Playback paused at frame {}", self.describe(self.current));
        }
        self.playing = false;
        self.update_state();
    }

    /// Pause when playing, otherwise resume from the current frame
    pub fn toggle_pause(&mut self, now: Duration) -> Result<()> {
        if self.playing {
            self.pause();
            Ok(())
        } else {
            self.play_from_frame(self.current, now)
        }
    }

    /// Show the blank screen
    pub fn enable_blank_screen(&mut self) {
        self.set_blank_screen(true);
    }

    /// Hide the blank screen
    pub fn disable_blank_screen(&mut self) {
        self.set_blank_screen(false);
    }

    /// Flip the blank screen
    pub fn toggle_blank_screen(&mut self) {
        self.set_blank_screen(!self.blank_screen);
    }

    fn set_blank_screen(&mut self, visible: bool) {
        if self.blank_screen == visible {
            return;
        }
        self.blank_screen = visible;
        tracing::info!("Blank screen {}", if visible { "shown" } else { "hidden" });
        self.events.emit(&PlayerEvent::BlankScreenChange(visible));
    }

    /// Advance animations and timers to `now`
    pub fn tick(&mut self, now: Duration) {
        match self.viewport.on_animation_frame(now) {
            AnimationStep::Finished(token) if Some(token) == self.transition => {
                self.finish_transition(now);
            }
            AnimationStep::Finished(token) => {
                tracing::debug!("Ignoring completion of stale animation {}", token.generation());
            }
            AnimationStep::Running(_) | AnimationStep::Idle => {}
        }

        // Direct manipulation cancelled the transition
        if self.transitioning && self.viewport.current_animation() != self.transition {
            tracing::debug!("Transition interrupted");
            self.finish_transition(now);
        }

        if self.timer.poll(now).is_some() {
            self.auto_advance(now);
        }
    }

    /// Auto-advance timer callback delivered by the host
    pub fn on_timeout(&mut self, token: TimerToken, now: Duration) {
        if !self.timer.expire(token) {
            tracing::debug!("Ignoring stale auto-advance timer");
            return;
        }
        self.auto_advance(now);
    }

    fn auto_advance(&mut self, now: Duration) {
        if !self.playing {
            return;
        }
        if self.viewport.is_dragging() {
            tracing::debug!("Auto-advance deferred while dragging");
            self.arm_timer(now);
            return;
        }

        match self.next_index() {
            Some(index) => {
                let (duration, timing) = self.transition_into(index);
                tracing::info!("Auto-advancing to frame {}", self.describe(index));
                if let Err(e) = self.navigate(index, duration, timing, Arrival::Timeout, now) {
                    tracing::warn!("Auto-advance failed: {e}");
                }
            }
            None => {
                tracing::info!("Reached the last frame, playback stopped");
                self.playing = false;
                self.update_state();
            }
        }
    }

    fn navigate(
        &mut self,
        index: usize,
        duration: Duration,
        timing: TimingFunction,
        arrival: Arrival,
        now: Duration,
    ) -> Result<()> {
        self.go_to(index, duration, timing, now)?;
        self.timer.cancel();

        if self.started && index != self.current {
            self.history.push(self.current, self.current_arrival);
        }
        let changed = !self.started || index != self.current;
        self.current = index;
        self.current_arrival = arrival;
        self.started = true;
        self.playing = true;

        if changed {
            self.emit_frame_change();
        }
        if !self.transitioning {
            self.arm_timer(now);
        }
        self.update_state();
        Ok(())
    }

    fn preview(
        &mut self,
        index: usize,
        duration: Duration,
        timing: TimingFunction,
        now: Duration,
    ) -> Result<()> {
        self.go_to(index, duration, timing, now)?;
        self.timer.cancel();

        let changed = !self.started || index != self.current;
        self.current = index;
        self.started = true;
        if changed {
            self.emit_frame_change();
        }
        if !self.transitioning {
            self.arm_timer(now);
        }
        self.update_state();
        Ok(())
    }

    /// Start the camera move toward frame `index`
    fn go_to(
        &mut self,
        index: usize,
        duration: Duration,
        timing: TimingFunction,
        now: Duration,
    ) -> Result<()> {
        let targets = self
            .presentation
            .cameras_at(index)
            .ok_or_else(|| pancam_viewport::Error::NotFound(format!("frame index {index}")))?;

        let token = self.viewport.animate_to(&targets, duration, timing, now)?;
        self.viewport.clear_user_modified();
        if duration.is_zero() {
            self.transition = None;
            self.transitioning = false;
        } else {
            self.transition = Some(token);
            self.transitioning = true;
        }
        Ok(())
    }

    fn finish_transition(&mut self, now: Duration) {
        self.transition = None;
        self.transitioning = false;
        self.arm_timer(now);
        self.update_state();
    }

    fn arm_timer(&mut self, now: Duration) {
        if !self.playing || !self.config.auto_advance {
            return;
        }
        if let Some(delay) = self.current_frame().and_then(Frame::timeout) {
            self.timer.arm(now, delay);
        }
    }

    fn transition_into(&self, index: usize) -> (Duration, TimingFunction) {
        self.presentation
            .frame(index)
            .map(|f| {
                (
                    Duration::from_millis(f.transition.duration_ms),
                    f.transition.timing,
                )
            })
            .unwrap_or((Duration::ZERO, TimingFunction::Linear))
    }

    fn emit_frame_change(&mut self) {
        let id = self
            .presentation
            .frame(self.current)
            .map(|f| f.id.clone())
            .unwrap_or_default();
        self.events.emit(&PlayerEvent::FrameChange {
            index: self.current,
            id,
        });
    }

    fn update_state(&mut self) {
        let state = if !self.started {
            PlayerState::Idle
        } else if self.transitioning {
            PlayerState::Transitioning
        } else if self.playing {
            PlayerState::Playing
        } else {
            PlayerState::Paused
        };
        if state != self.state {
            tracing::debug!("Player state {:?} -> {:?}", self.state, state);
            self.state = state;
            self.events.emit(&PlayerEvent::StateChange(state));
        }
    }

    fn describe(&self, index: usize) -> String {
        match self.presentation.frame(index) {
            Some(frame) if !frame.title.is_empty() => format!("{} ({})", index + 1, frame.title),
            _ => (index + 1).to_string(),
        }
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("current", &self.current)
            .field("state", &self.state)
            .field("playing", &self.playing)
            .field("blank_screen", &self.blank_screen)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pancam_viewport::{CameraState, Error};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn presentation() -> Arc<Presentation> {
        let mut p = Presentation::new("Test").with_layer("main");
        for i in 0..4 {
            p = p.with_frame(
                Frame::new(format!("F{i}"))
                    .with_id(format!("f{i}"))
                    .with_camera("main", CameraState::new(i as f64 * 100.0, 0.0, 1.0))
                    .with_transition(1000, TimingFunction::Linear)
                    .with_timeout(2.0),
            );
        }
        Arc::new(p)
    }

    fn player() -> Player {
        let p = presentation();
        let viewport = Viewport::for_presentation(&p, 800.0, 600.0);
        Player::new(p, viewport, PlayerConfig::default())
    }

    fn translate_x(player: &Player) -> f64 {
        player
            .viewport()
            .camera(&"main".into())
            .map(|c| c.translate_x)
            .unwrap_or(f64::NAN)
    }

    #[test]
    fn test_play_from_frame_arms_timer() {
        let mut player = player();
        assert_eq!(player.state(), PlayerState::Idle);
        player.play_from_frame(1, ms(0)).unwrap();
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.current_index(), 1);
        assert_eq!(player.auto_advance_deadline(), Some(ms(2000)));
        assert_eq!(translate_x(&player), 100.0);
    }

    #[test]
    fn test_interrupted_transition_rearms_timer() {
        let mut player = player();
        player.play_from_frame(0, ms(0)).unwrap();
        player.move_to_next(ms(0)).unwrap();
        player.tick(ms(300));
        player.viewport_mut().translate(5.0, 0.0);

        player.tick(ms(400));
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.auto_advance_deadline(), Some(ms(2400)));

        player.tick(ms(2400));
        assert_eq!(player.current_index(), 2);
    }

    #[test]
    fn test_move_to_frame_transitions_then_plays() {
        let mut player = player();
        player.play_from_frame(0, ms(0)).unwrap();
        player.move_to_frame(2, ms(100)).unwrap();
        assert_eq!(player.state(), PlayerState::Transitioning);
        assert_eq!(player.auto_advance_deadline(), None);

        player.tick(ms(600));
        assert!((translate_x(&player) - 100.0).abs() < 1e-6);

        player.tick(ms(1100));
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.auto_advance_deadline(), Some(ms(3100)));
        assert_eq!(player.history().last().map(|e| e.frame_index), Some(0));
    }

    #[test]
    fn test_auto_advance_stops_at_last_frame() {
        let mut player = player();
        player.play_from_frame(3, ms(0)).unwrap();
        player.tick(ms(2000));
        assert_eq!(player.current_index(), 3);
        assert_eq!(player.state(), PlayerState::Paused);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_pause_lets_transition_finish() {
        let mut player = player();
        player.play_from_frame(0, ms(0)).unwrap();
        player.move_to_next(ms(0)).unwrap();
        player.pause();
        assert_eq!(player.state(), PlayerState::Transitioning);
        player.tick(ms(1000));
        assert_eq!(player.state(), PlayerState::Paused);
        assert_eq!(translate_x(&player), 100.0);
        assert_eq!(player.auto_advance_deadline(), None);
    }

    #[test]
    fn test_toggle_pause_resumes_current_frame() {
        let mut player = player();
        player.play_from_frame(1, ms(0)).unwrap();
        player.pause();
        player.toggle_pause(ms(500)).unwrap();
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.current_index(), 1);
        assert!(player.history().is_empty());
    }

    #[test]
    fn test_unknown_frame_leaves_state_unchanged() {
        let mut player = player();
        player.play_from_frame(1, ms(0)).unwrap();
        let result = player.move_to_frame(FrameId::from("nope"), ms(10));
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(player.current_index(), 1);
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_preview_keeps_play_state_and_history() {
        let mut player = player();
        player.play_from_frame(0, ms(0)).unwrap();
        player.pause();
        player.preview_frame(2, ms(0)).unwrap();
        player.tick(ms(1000));
        assert_eq!(player.current_index(), 2);
        assert!(!player.is_playing());
        assert!(player.history().is_empty());
    }

    #[test]
    fn test_blank_screen_events() {
        let mut player = player();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        player.events().subscribe(move |e| {
            if let PlayerEvent::BlankScreenChange(v) = e {
                sink.borrow_mut().push(*v);
            }
        });
        player.enable_blank_screen();
        player.enable_blank_screen();
        player.toggle_blank_screen();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_direct_manipulation_interrupts_transition() {
        let mut player = player();
        player.play_from_frame(0, ms(0)).unwrap();
        player.move_to_next(ms(0)).unwrap();
        player.tick(ms(500));
        player.viewport_mut().translate(10.0, 0.0);
        player.tick(ms(600));
        assert!(!player.is_transitioning());
        assert_eq!(player.state(), PlayerState::Playing);
        assert!((translate_x(&player) - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_auto_advance_disabled_by_config() {
        let p = presentation();
        let viewport = Viewport::for_presentation(&p, 800.0, 600.0);
        let config = PlayerConfig {
            auto_advance: false,
            ..PlayerConfig::default()
        };
        let mut player = Player::new(p, viewport, config);
        player.play_from_frame(0, ms(0)).unwrap();
        assert_eq!(player.auto_advance_deadline(), None);
    }
}
