// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input gesture recognition.
//!
//! The controller turns raw pointer, wheel and key events into semantic
//! operations on the player and its viewport. Every operation is published
//! as a [`LocalChange`] before it is applied.
//!
//! Capability flags from the presentation gate each operation. Edit mode
//! bypasses the gates and disables the pause and blank-screen keys.

pub mod gesture;
pub mod keys;
pub mod wheel;

pub use gesture::{DragMode, GestureOutput, GestureState, Point};
pub use keys::{KeyAction, NavTarget};
pub use wheel::{WheelAction, WheelDebounce};

use crate::config::ControllerConfig;
use crate::input::{InputEvent, Key, KeyOutcome, Modifiers, PointerButton};
use crate::mirror::LocalChange;
use crate::player::Player;
use pancam_viewport::camera::shortest_angle_delta;
use pancam_viewport::{InteractionFlags, Presentation, Signal};
use std::sync::Arc;
use std::time::Duration;

/// Events emitted by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// A semantic operation is about to be applied
    LocalChange(LocalChange),
    /// A drag was confirmed
    DragStart,
    /// A confirmed drag ended
    DragEnd,
    /// A button was released without dragging
    Click(PointerButton),
    /// The user changed the camera; auto-advance is paused
    UserChangeState,
}

/// Gesture recognizer and input dispatcher
pub struct UiController {
    presentation: Arc<Presentation>,
    config: ControllerConfig,
    edit_mode: bool,
    clip_editing: bool,
    gesture: GestureState,
    wheel: WheelDebounce,
    events: Signal<ControllerEvent>,
    /// Time of the event being handled
    now: Duration,
}

impl UiController {
    /// Create a controller reading capability flags from `presentation`
    pub fn new(presentation: Arc<Presentation>, config: ControllerConfig) -> Self {
        Self {
            presentation,
            config,
            edit_mode: false,
            clip_editing: false,
            gesture: GestureState::Idle,
            wheel: WheelDebounce::default(),
            events: Signal::new(),
            now: Duration::ZERO,
        }
    }

    /// Outbound events
    pub fn events(&mut self) -> &mut Signal<ControllerEvent> {
        &mut self.events
    }

    /// Tuning in effect
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current gesture state
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Switch edit mode
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        tracing::debug!("Edit mode {}", if edit_mode { "on" } else { "off" });
        self.edit_mode = edit_mode;
        if !edit_mode {
            self.clip_editing = false;
        }
    }

    /// Whether edit mode is on
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Make primary drags edit the clip rect (edit mode only)
    pub fn set_clip_editing(&mut self, enabled: bool) {
        self.clip_editing = enabled;
    }

    /// Whether a capability is available
    fn allowed(&self, gate: impl Fn(&InteractionFlags) -> bool) -> bool {
        self.edit_mode || gate(&self.presentation.interaction)
    }

    fn emit_local(&mut self, change: LocalChange) {
        self.events.emit(&ControllerEvent::LocalChange(change));
    }

    /// Publish a camera edit and take the camera over from any animation
    fn begin_manipulation(&mut self, change: LocalChange, player: &mut Player) {
        self.emit_local(change);
        player.viewport_mut().cancel_animation_at(self.now);
    }

    /// Dispatch one raw input event
    pub fn handle(&mut self, event: &InputEvent, player: &mut Player, now: Duration) -> KeyOutcome {
        self.now = now;
        match *event {
            InputEvent::PointerDown { x, y, button, .. } => {
                let (next, _) = self.gesture.press(button, (x, y));
                self.gesture = next;
                KeyOutcome::Consumed
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                self.pointer_move((x, y), modifiers, player);
                KeyOutcome::Consumed
            }
            InputEvent::PointerUp { button, .. } => {
                self.pointer_up(button, player, now);
                KeyOutcome::Consumed
            }
            InputEvent::Wheel {
                x,
                y,
                delta,
                modifiers,
            } => self.wheel(delta, (x, y), modifiers, player, now),
            InputEvent::ContextMenu => {
                if self.allowed(|f| f.enable_mouse_navigation) {
                    self.navigate(NavTarget::Previous, false, player, now);
                }
                KeyOutcome::Consumed
            }
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, modifiers, player, now),
        }
    }

    /// Fire the wheel debounce when its window has passed
    pub fn tick(&mut self, now: Duration, player: &mut Player) {
        if self.wheel.settled(now) {
            tracing::debug!("Wheel gesture settled");
            self.user_change(player);
        }
    }

    fn pointer_move(&mut self, at: Point, modifiers: Modifiers, player: &mut Player) {
        let (next, output) = self.gesture.motion(at, self.config.drag_threshold);
        self.gesture = next;

        match output {
            GestureOutput::DragStarted { start, current } => {
                tracing::debug!("Drag started at ({}, {})", start.0, start.1);
                player.viewport_mut().begin_drag();
                self.events.emit(&ControllerEvent::DragStart);
                self.drag_step(start, start, current, modifiers, player);
            }
            GestureOutput::Moved {
                start,
                prev,
                current,
            } => self.drag_step(start, prev, current, modifiers, player),
            GestureOutput::None | GestureOutput::DragEnded { .. } | GestureOutput::Clicked(_) => {}
        }
    }

    fn pointer_up(&mut self, button: PointerButton, player: &mut Player, now: Duration) {
        let (next, output) = self.gesture.release(button);
        self.gesture = next;

        match output {
            GestureOutput::DragEnded { changed } => {
                tracing::debug!("Drag ended");
                player.viewport_mut().end_drag();
                self.events.emit(&ControllerEvent::DragEnd);
                if changed {
                    self.user_change(player);
                }
            }
            GestureOutput::Clicked(button) => {
                self.events.emit(&ControllerEvent::Click(button));
                if !self.allowed(|f| f.enable_mouse_navigation) {
                    return;
                }
                // Going back is driven by the context menu event that follows a right click
                if button == PointerButton::Primary {
                    self.navigate(NavTarget::Next, false, player, now);
                }
            }
            GestureOutput::None | GestureOutput::DragStarted { .. } | GestureOutput::Moved { .. } => {}
        }
    }

    fn drag_mode(&self, modifiers: Modifiers) -> DragMode {
        let bindings = &self.config.bindings;
        if self.edit_mode && self.clip_editing {
            DragMode::Clip
        } else if modifiers.contains(bindings.rotate) {
            DragMode::Rotate
        } else if modifiers.contains(bindings.zoom) {
            DragMode::Scale
        } else {
            DragMode::Translate
        }
    }

    /// Apply one move of a confirmed drag
    fn drag_step(
        &mut self,
        start: Point,
        prev: Point,
        current: Point,
        modifiers: Modifiers,
        player: &mut Player,
    ) {
        let mode = self.drag_mode(modifiers);
        let mut rotation = None;

        let changed = match mode {
            DragMode::Translate if self.allowed(|f| f.enable_mouse_translation) => {
                let (mut dx, mut dy) = (current.0 - prev.0, current.1 - prev.1);
                if modifiers.contains(self.config.bindings.constrain) {
                    if (current.0 - start.0).abs() >= (current.1 - start.1).abs() {
                        dy = 0.0;
                    } else {
                        dx = 0.0;
                    }
                }
                if dx != 0.0 || dy != 0.0 {
                    self.begin_manipulation(LocalChange::Translate { dx, dy }, player);
                    player.viewport_mut().translate(dx, dy);
                    true
                } else {
                    false
                }
            }
            DragMode::Scale if self.allowed(|f| f.enable_mouse_zoom) => {
                self.drag_scale(prev, current, player)
            }
            DragMode::Rotate if self.allowed(|f| f.enable_mouse_rotation) => {
                let (applied, free) = self.drag_rotate(prev, current, modifiers, player);
                rotation = Some(free);
                applied
            }
            DragMode::Clip => {
                let delta = (current.0 - prev.0, current.1 - prev.1);
                match player.viewport().drag_clip_mode(start.0, start.1) {
                    Some(clip_mode) => {
                        self.begin_manipulation(
                            LocalChange::Clip {
                                mode: clip_mode,
                                start,
                                current,
                                delta,
                            },
                            player,
                        );
                        let result = player.viewport_mut().clip_by_mode(
                            start.0, start.1, current.0, current.1, delta.0, delta.1,
                        );
                        match result {
                            Ok(()) => true,
                            Err(e) => {
                                tracing::warn!("Clip edit failed: {e}");
                                false
                            }
                        }
                    }
                    None => false,
                }
            }
            _ => false,
        };

        self.gesture = self.gesture.record_move(mode, changed, rotation);
    }

    /// Zoom by the change of distance to the viewport centre
    fn drag_scale(&mut self, prev: Point, current: Point, player: &mut Player) -> bool {
        let (cx, cy) = player.viewport().center();
        let d_prev = (prev.0 - cx).hypot(prev.1 - cy);
        let d_cur = (current.0 - cx).hypot(current.1 - cy);
        if d_prev < f64::EPSILON || d_cur < f64::EPSILON {
            return false;
        }
        let factor = d_cur / d_prev;
        if factor == 1.0 {
            return false;
        }
        self.begin_manipulation(LocalChange::Zoom { factor, cx, cy }, player);
        match player.viewport_mut().zoom(factor, cx, cy) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Drag zoom rejected: {e}");
                false
            }
        }
    }

    /// Rotate by the change of pointer angle about the viewport centre.
    ///
    /// Returns whether the camera changed and the unsnapped rotation.
    fn drag_rotate(
        &mut self,
        prev: Point,
        current: Point,
        modifiers: Modifiers,
        player: &mut Player,
    ) -> (bool, f64) {
        let (cx, cy) = player.viewport().center();
        let a_prev = (prev.1 - cy).atan2(prev.0 - cx).to_degrees();
        let a_cur = (current.1 - cy).atan2(current.0 - cx).to_degrees();
        let delta = shortest_angle_delta(a_prev, a_cur);

        let rotation = player
            .viewport()
            .reference_camera()
            .map(|c| c.rotation)
            .unwrap_or(0.0);
        let free = self.gesture.free_rotation().unwrap_or(rotation) + delta;

        let target = if modifiers.contains(self.config.bindings.snap) {
            let step = self.config.snap_step;
            (free / step).round() * step
        } else {
            free
        };
        let angle = shortest_angle_delta(rotation, target);
        if angle.abs() < 1e-9 {
            return (false, free);
        }
        self.begin_manipulation(LocalChange::Rotate { angle }, player);
        player.viewport_mut().rotate(angle);
        (true, free)
    }

    fn wheel(
        &mut self,
        delta: f64,
        at: Point,
        modifiers: Modifiers,
        player: &mut Player,
        now: Duration,
    ) -> KeyOutcome {
        let Some(action) = wheel::resolve(delta, at, modifiers, &self.config) else {
            return KeyOutcome::Ignored;
        };

        match action {
            WheelAction::Zoom { factor, cx, cy } if self.allowed(|f| f.enable_mouse_zoom) => {
                self.begin_manipulation(LocalChange::Zoom { factor, cx, cy }, player);
                if let Err(e) = player.viewport_mut().zoom(factor, cx, cy) {
                    tracing::warn!("Wheel zoom rejected: {e}");
                }
            }
            WheelAction::Rotate { angle } if self.allowed(|f| f.enable_mouse_rotation) => {
                self.begin_manipulation(LocalChange::Rotate { angle }, player);
                player.viewport_mut().rotate(angle);
            }
            _ => return KeyOutcome::Ignored,
        }

        self.wheel.notch(now, self.config.wheel_debounce());
        KeyOutcome::Consumed
    }

    fn key_down(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        player: &mut Player,
        now: Duration,
    ) -> KeyOutcome {
        let Some(action) = keys::resolve(key, modifiers) else {
            return KeyOutcome::Ignored;
        };

        match action {
            KeyAction::Navigate { target, jump } => {
                if !self.allowed(|f| f.enable_keyboard_navigation) {
                    return KeyOutcome::Consumed;
                }
                self.navigate(target, jump, player, now);
            }
            KeyAction::ZoomIn | KeyAction::ZoomOut => {
                if !self.allowed(|f| f.enable_keyboard_zoom) {
                    return KeyOutcome::Consumed;
                }
                let factor = if action == KeyAction::ZoomIn {
                    self.config.scale_factor
                } else {
                    1.0 / self.config.scale_factor
                };
                let (cx, cy) = player.viewport().center();
                self.begin_manipulation(LocalChange::Zoom { factor, cx, cy }, player);
                if let Err(e) = player.viewport_mut().zoom(factor, cx, cy) {
                    tracing::warn!("Key zoom rejected: {e}");
                }
                self.user_change(player);
            }
            KeyAction::RotateClockwise | KeyAction::RotateCounterClockwise => {
                if !self.allowed(|f| f.enable_keyboard_rotation) {
                    return KeyOutcome::Consumed;
                }
                let step = self.config.key_rotation_step;
                let angle = if action == KeyAction::RotateClockwise {
                    step
                } else {
                    -step
                };
                self.begin_manipulation(LocalChange::Rotate { angle }, player);
                player.viewport_mut().rotate(angle);
                self.user_change(player);
            }
            KeyAction::TogglePause => {
                if self.edit_mode {
                    return KeyOutcome::Ignored;
                }
                let paused = player.is_playing();
                self.emit_local(LocalChange::SetPaused { paused });
                if let Err(e) = player.toggle_pause(now) {
                    tracing::warn!("Cannot resume playback: {e}");
                }
            }
            KeyAction::ToggleBlankScreen => {
                if self.edit_mode {
                    return KeyOutcome::Ignored;
                }
                let visible = !player.is_blank_screen();
                self.emit_local(LocalChange::SetBlankScreen { visible });
                player.toggle_blank_screen();
            }
        }
        KeyOutcome::Consumed
    }

    /// Change frame; no-op at either end of the presentation
    fn navigate(&mut self, target: NavTarget, jump: bool, player: &mut Player, now: Duration) {
        let index = match target {
            NavTarget::First => (!player.presentation().is_empty()).then_some(0),
            NavTarget::Last => player.presentation().last_index(),
            NavTarget::Previous => player.previous_index(),
            NavTarget::Next => player.next_index(),
        };
        let Some(index) = index else {
            tracing::debug!("No frame to navigate to ({target:?})");
            return;
        };

        let result = if jump {
            self.emit_local(LocalChange::JumpToFrame { index });
            player.jump_to_frame(index, now)
        } else {
            self.emit_local(LocalChange::MoveToFrame { index });
            player.move_to_frame(index, now)
        };
        if let Err(e) = result {
            tracing::warn!("Navigation to frame {} failed: {e}", index + 1);
        }
    }

    /// Report a user camera change and suspend auto-advance
    fn user_change(&mut self, player: &mut Player) {
        self.events.emit(&ControllerEvent::UserChangeState);
        if player.is_playing() {
            self.emit_local(LocalChange::SetPaused { paused: true });
            player.pause();
        }
    }
}

impl std::fmt::Debug for UiController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiController")
            .field("edit_mode", &self.edit_mode)
            .field("clip_editing", &self.clip_editing)
            .field("gesture", &self.gesture)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use pancam_viewport::{CameraState, Frame, LayerId, Viewport};
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f64 = 1e-6;

    fn setup(interaction: InteractionFlags) -> (UiController, Player, Rc<RefCell<Vec<ControllerEvent>>>) {
        let mut p = Presentation::new("Ctl")
            .with_layer("main")
            .with_interaction(interaction);
        for i in 0..3 {
            p = p.with_frame(
                Frame::new(format!("F{i}"))
                    .with_camera("main", CameraState::new(0.0, i as f64 * 10.0, 1.0))
                    .with_transition(0, pancam_viewport::TimingFunction::Linear),
            );
        }
        let p = Arc::new(p);
        let viewport = Viewport::for_presentation(&p, 800.0, 600.0);
        let mut player = Player::new(Arc::clone(&p), viewport, PlayerConfig::default());
        player.play_from_frame(0, Duration::ZERO).unwrap();

        let mut controller = UiController::new(p, ControllerConfig::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        controller.events().subscribe(move |e| sink.borrow_mut().push(e.clone()));
        (controller, player, log)
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    fn camera(player: &Player) -> CameraState {
        player
            .viewport()
            .camera(&LayerId::from("main"))
            .copied()
            .unwrap_or_default()
    }

    #[test]
    fn test_local_change_precedes_navigation() {
        let (mut ctl, mut player, log) = setup(InteractionFlags::default());
        let outcome = ctl.handle(&key(Key::ArrowRight), &mut player, Duration::ZERO);
        assert_eq!(outcome, KeyOutcome::Consumed);
        assert_eq!(player.current_index(), 1);
        assert_eq!(
            log.borrow().first(),
            Some(&ControllerEvent::LocalChange(LocalChange::MoveToFrame { index: 1 }))
        );
    }

    #[test]
    fn test_gated_keys_are_consumed_without_effect() {
        let (mut ctl, mut player, log) = setup(InteractionFlags::locked());
        for k in [Key::ArrowRight, Key::Char('+'), Key::Char('r')] {
            assert_eq!(
                ctl.handle(&key(k), &mut player, Duration::ZERO),
                KeyOutcome::Consumed
            );
        }
        assert_eq!(player.current_index(), 0);
        assert!((camera(&player).scale - 1.0).abs() < EPS);
        assert!(camera(&player).rotation.abs() < EPS);
        assert!(player.is_playing());
        assert!(log.borrow().is_empty());

        // Unbound keys still pass through
        assert_eq!(
            ctl.handle(&key(Key::Char('x')), &mut player, Duration::ZERO),
            KeyOutcome::Ignored
        );

        ctl.set_edit_mode(true);
        assert_eq!(
            ctl.handle(&key(Key::ArrowRight), &mut player, Duration::ZERO),
            KeyOutcome::Consumed
        );
        assert_eq!(player.current_index(), 1);
    }

    #[test]
    fn test_edit_mode_disables_pause_and_blank_keys() {
        let (mut ctl, mut player, _) = setup(InteractionFlags::default());
        ctl.set_edit_mode(true);
        assert_eq!(
            ctl.handle(&key(Key::Char('p')), &mut player, Duration::ZERO),
            KeyOutcome::Ignored
        );
        assert_eq!(
            ctl.handle(&key(Key::Char('b')), &mut player, Duration::ZERO),
            KeyOutcome::Ignored
        );
        assert!(player.is_playing());
        assert!(!player.is_blank_screen());

        ctl.set_edit_mode(false);
        ctl.handle(&key(Key::Char('b')), &mut player, Duration::ZERO);
        ctl.handle(&key(Key::Char('p')), &mut player, Duration::ZERO);
        assert!(player.is_blank_screen());
        assert!(!player.is_playing());
    }

    #[test]
    fn test_key_rotation_and_zoom() {
        let (mut ctl, mut player, _) = setup(InteractionFlags::default());
        ctl.handle(&key(Key::Char('r')), &mut player, Duration::ZERO);
        assert!((camera(&player).rotation - 90.0).abs() < EPS);
        ctl.handle(&key(Key::Char('R')), &mut player, Duration::ZERO);
        assert!(camera(&player).rotation.abs() < EPS);

        ctl.handle(&key(Key::Char('+')), &mut player, Duration::ZERO);
        assert!((camera(&player).scale - 1.05).abs() < EPS);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_modifier_keys_are_ignored() {
        let (mut ctl, mut player, _) = setup(InteractionFlags::default());
        let event = InputEvent::KeyDown {
            key: Key::ArrowRight,
            modifiers: Modifiers::CTRL,
        };
        assert_eq!(ctl.handle(&event, &mut player, Duration::ZERO), KeyOutcome::Ignored);
        assert_eq!(player.current_index(), 0);
    }

    #[test]
    fn test_right_click_moves_back_once() {
        let (mut ctl, mut player, log) = setup(InteractionFlags::default());
        player.jump_to_frame(2, Duration::ZERO).unwrap();
        let events = [
            InputEvent::PointerDown {
                x: 10.0,
                y: 10.0,
                button: PointerButton::Secondary,
                modifiers: Modifiers::NONE,
            },
            InputEvent::PointerUp {
                x: 10.0,
                y: 10.0,
                button: PointerButton::Secondary,
            },
            InputEvent::ContextMenu,
        ];
        for event in &events {
            ctl.handle(event, &mut player, Duration::ZERO);
        }
        assert_eq!(player.current_index(), 1);
        assert!(log
            .borrow()
            .contains(&ControllerEvent::Click(PointerButton::Secondary)));
        let moves = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, ControllerEvent::LocalChange(LocalChange::MoveToFrame { .. })))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn test_context_menu_moves_back() {
        let (mut ctl, mut player, _) = setup(InteractionFlags::default());
        player.jump_to_frame(2, Duration::ZERO).unwrap();
        ctl.handle(&InputEvent::ContextMenu, &mut player, Duration::ZERO);
        assert_eq!(player.current_index(), 1);
    }

    #[test]
    fn test_shift_drag_zooms_about_centre() {
        let (mut ctl, mut player, _) = setup(InteractionFlags::default());
        let now = Duration::ZERO;
        let down = InputEvent::PointerDown {
            x: 500.0,
            y: 300.0,
            button: PointerButton::Primary,
            modifiers: Modifiers::SHIFT,
        };
        ctl.handle(&down, &mut player, now);
        let drag = InputEvent::PointerMove {
            x: 600.0,
            y: 300.0,
            modifiers: Modifiers::SHIFT,
        };
        ctl.handle(&drag, &mut player, now);
        // Distance to the centre went from 100 to 200
        assert!((camera(&player).scale - 2.0).abs() < EPS);
    }

    #[test]
    fn test_snapped_rotation_lands_on_step() {
        let (mut ctl, mut player, _) = setup(InteractionFlags::default());
        let now = Duration::ZERO;
        let snap = Modifiers::CTRL.union(Modifiers::SHIFT);
        ctl.handle(
            &InputEvent::PointerDown {
                x: 500.0,
                y: 300.0,
                button: PointerButton::Primary,
                modifiers: snap,
            },
            &mut player,
            now,
        );
        // Rotate the pointer by atan(17/100) ~ 9.65 degrees about the centre
        ctl.handle(
            &InputEvent::PointerMove {
                x: 500.0,
                y: 317.0,
                modifiers: snap,
            },
            &mut player,
            now,
        );
        assert!((camera(&player).rotation - 10.0).abs() < EPS);
    }

    #[test]
    fn test_constrained_translation_follows_dominant_axis() {
        let (mut ctl, mut player, _) = setup(InteractionFlags::default());
        let now = Duration::ZERO;
        let before = camera(&player);
        ctl.handle(
            &InputEvent::PointerDown {
                x: 100.0,
                y: 100.0,
                button: PointerButton::Primary,
                modifiers: Modifiers::ALT,
            },
            &mut player,
            now,
        );
        ctl.handle(
            &InputEvent::PointerMove {
                x: 130.0,
                y: 110.0,
                modifiers: Modifiers::ALT,
            },
            &mut player,
            now,
        );
        let after = camera(&player);
        assert!((after.translate_x - before.translate_x - 30.0).abs() < EPS);
        assert!((after.translate_y - before.translate_y).abs() < EPS);
    }

    #[test]
    fn test_clip_drag_in_edit_mode() {
        let (mut ctl, mut player, log) = setup(InteractionFlags::default());
        ctl.set_edit_mode(true);
        ctl.set_clip_editing(true);
        let now = Duration::ZERO;
        ctl.handle(
            &InputEvent::PointerDown {
                x: 3.0,
                y: 300.0,
                button: PointerButton::Primary,
                modifiers: Modifiers::NONE,
            },
            &mut player,
            now,
        );
        ctl.handle(
            &InputEvent::PointerMove {
                x: 103.0,
                y: 300.0,
                modifiers: Modifiers::NONE,
            },
            &mut player,
            now,
        );
        ctl.handle(
            &InputEvent::PointerUp {
                x: 103.0,
                y: 300.0,
                button: PointerButton::Primary,
            },
            &mut player,
            now,
        );
        let clip = camera(&player).clip.expect("clip was edited");
        assert!((clip.x0 - 100.0).abs() < EPS);
        assert!(log
            .borrow()
            .iter()
            .any(|e| matches!(e, ControllerEvent::LocalChange(LocalChange::Clip { .. }))));
        assert!(!player.viewport().is_dragging());
    }

    #[test]
    fn test_gated_wheel_is_ignored_without_debounce() {
        let (mut ctl, mut player, log) = setup(InteractionFlags::locked());
        for modifiers in [Modifiers::NONE, Modifiers::CTRL] {
            let outcome = ctl.handle(
                &InputEvent::Wheel {
                    x: 400.0,
                    y: 300.0,
                    delta: -1.0,
                    modifiers,
                },
                &mut player,
                Duration::ZERO,
            );
            assert_eq!(outcome, KeyOutcome::Ignored);
        }
        assert!(!ctl.wheel.is_pending());
        ctl.tick(Duration::from_secs(1), &mut player);
        assert!(log.borrow().is_empty());
        assert!((camera(&player).scale - 1.0).abs() < EPS);
        assert!(player.is_playing());
    }

    #[test]
    fn test_wheel_during_transition_starts_from_event_time() {
        let p = Arc::new(
            Presentation::new("Slow")
                .with_layer("main")
                .with_frame(Frame::new("A").with_camera("main", CameraState::new(0.0, 0.0, 1.0)))
                .with_frame(
                    Frame::new("B")
                        .with_camera("main", CameraState::new(100.0, 0.0, 1.0))
                        .with_transition(1000, pancam_viewport::TimingFunction::Linear),
                ),
        );
        let viewport = Viewport::for_presentation(&p, 800.0, 600.0);
        let mut player = Player::new(Arc::clone(&p), viewport, PlayerConfig::default());
        player.play_from_frame(0, Duration::ZERO).unwrap();
        player.move_to_next(Duration::ZERO).unwrap();
        player.tick(Duration::from_millis(200));

        let mut ctl = UiController::new(p, ControllerConfig::default());
        ctl.handle(
            &InputEvent::Wheel {
                x: 400.0,
                y: 300.0,
                delta: -1.0,
                modifiers: Modifiers::NONE,
            },
            &mut player,
            Duration::from_millis(300),
        );
        assert!(!player.viewport().is_animating());
        assert!((camera(&player).translate_x - 30.0).abs() < EPS);
        assert!((camera(&player).scale - 1.05).abs() < EPS);
    }
}
