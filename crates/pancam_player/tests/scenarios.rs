// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end playback and gesture scenarios.

use pancam_player::{
    ControllerConfig, ControllerEvent, InputEvent, Modifiers, Player, PlayerConfig, PlayerState,
    PointerButton, UiController,
};
use pancam_viewport::{
    CameraState, Frame, LayerId, Presentation, TimingFunction, Viewport, ViewportEvent,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

const EPS: f64 = 1e-6;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn talk(frames: usize, transition_ms: u64) -> Arc<Presentation> {
    let mut p = Presentation::new("Talk").with_layer("main");
    for i in 0..frames {
        p = p.with_frame(
            Frame::new(format!("Frame {i}"))
                .with_id(format!("frame-{i}"))
                .with_camera("main", CameraState::new(i as f64 * 100.0, 0.0, 1.0))
                .with_transition(transition_ms, TimingFunction::Linear)
                .with_timeout(2.0),
        );
    }
    Arc::new(p)
}

fn player(presentation: &Arc<Presentation>) -> Player {
    let viewport = Viewport::for_presentation(presentation, 800.0, 600.0);
    Player::new(Arc::clone(presentation), viewport, PlayerConfig::default())
}

fn main_camera(player: &Player) -> CameraState {
    player
        .viewport()
        .camera(&LayerId::from("main"))
        .copied()
        .unwrap_or_default()
}

fn record(controller: &mut UiController) -> Rc<RefCell<Vec<ControllerEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    controller
        .events()
        .subscribe(move |e| sink.borrow_mut().push(e.clone()));
    log
}

fn count(log: &Rc<RefCell<Vec<ControllerEvent>>>, wanted: &ControllerEvent) -> usize {
    log.borrow().iter().filter(|e| *e == wanted).count()
}

#[test]
fn test_move_to_next_at_last_frame_is_noop() {
    let p = talk(3, 0);
    let mut player = player(&p);
    player.play_from_frame(2, ms(0)).unwrap();
    let history_len = player.history().len();

    player.move_to_next(ms(10)).unwrap();
    assert_eq!(player.current_index(), 2);
    assert_eq!(player.history().len(), history_len);
    assert_eq!(player.state(), PlayerState::Playing);
}

#[test]
fn test_move_to_previous_skips_auto_advanced_frames() {
    let p = talk(4, 0);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();

    // Timeout carries the show to frame 1
    player.tick(ms(2000));
    assert_eq!(player.current_index(), 1);

    // The viewer moves on by hand, then goes back
    player.move_to_next(ms(2500)).unwrap();
    assert_eq!(player.current_index(), 2);
    player.move_to_previous(ms(2600)).unwrap();
    assert_eq!(player.current_index(), 0);
}

#[test]
fn test_move_to_previous_lands_on_manually_reached_frame() {
    let p = talk(4, 0);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();
    player.move_to_next(ms(100)).unwrap();
    player.move_to_next(ms(200)).unwrap();
    player.move_to_previous(ms(300)).unwrap();
    assert_eq!(player.current_index(), 1);
}

#[test]
fn test_jump_to_frame_is_immediate_and_recorded() {
    let p = talk(3, 1000);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();

    player.jump_to_frame(2, ms(50)).unwrap();
    assert_eq!(player.current_index(), 2);
    assert_eq!(player.state(), PlayerState::Playing);
    assert!(approx(main_camera(&player).translate_x, 200.0));
    assert_eq!(player.history().last().map(|e| e.frame_index), Some(0));
    assert_eq!(player.auto_advance_deadline(), Some(ms(2050)));
}

#[test]
fn test_sub_threshold_press_is_one_click() {
    let p = talk(3, 0);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();
    let mut ctl = UiController::new(Arc::clone(&p), ControllerConfig::default());
    let log = record(&mut ctl);

    let events = [
        InputEvent::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        },
        InputEvent::PointerMove {
            x: 103.0,
            y: 96.0,
            modifiers: Modifiers::NONE,
        },
        InputEvent::PointerUp {
            x: 103.0,
            y: 96.0,
            button: PointerButton::Primary,
        },
    ];
    for event in &events {
        ctl.handle(event, &mut player, ms(10));
    }

    assert_eq!(count(&log, &ControllerEvent::Click(PointerButton::Primary)), 1);
    assert_eq!(count(&log, &ControllerEvent::DragStart), 0);
    assert_eq!(count(&log, &ControllerEvent::DragEnd), 0);
    assert_eq!(player.current_index(), 1);
}

#[test]
fn test_threshold_crossing_drag_has_no_click() {
    let p = talk(3, 0);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();
    let mut ctl = UiController::new(Arc::clone(&p), ControllerConfig::default());
    let log = record(&mut ctl);
    let before = main_camera(&player);

    ctl.handle(
        &InputEvent::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        },
        &mut player,
        ms(10),
    );
    for x in [104.0, 110.0, 130.0, 160.0] {
        ctl.handle(
            &InputEvent::PointerMove {
                x,
                y: 100.0,
                modifiers: Modifiers::NONE,
            },
            &mut player,
            ms(20),
        );
    }
    ctl.handle(
        &InputEvent::PointerUp {
            x: 160.0,
            y: 100.0,
            button: PointerButton::Primary,
        },
        &mut player,
        ms(30),
    );

    assert_eq!(count(&log, &ControllerEvent::DragStart), 1);
    assert_eq!(count(&log, &ControllerEvent::DragEnd), 1);
    assert_eq!(count(&log, &ControllerEvent::UserChangeState), 1);
    assert!(!log
        .borrow()
        .iter()
        .any(|e| matches!(e, ControllerEvent::Click(_))));

    // The confirming move pans from the press point, so the whole 100 -> 160 travel applies
    let after = main_camera(&player);
    assert!(approx(after.translate_x - before.translate_x, 60.0));
    assert_eq!(player.current_index(), 0);
    assert!(!player.is_playing());
}

#[test]
fn test_wheel_burst_reports_one_user_change() {
    let p = talk(3, 0);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();
    let mut ctl = UiController::new(Arc::clone(&p), ControllerConfig::default());
    let log = record(&mut ctl);

    for t in [0, 40, 80, 120, 160] {
        let outcome = ctl.handle(
            &InputEvent::Wheel {
                x: 400.0,
                y: 300.0,
                delta: -1.0,
                modifiers: Modifiers::NONE,
            },
            &mut player,
            ms(t),
        );
        assert!(outcome.is_consumed());
        ctl.tick(ms(t), &mut player);
    }
    ctl.tick(ms(300), &mut player);
    assert_eq!(count(&log, &ControllerEvent::UserChangeState), 0);

    ctl.tick(ms(360), &mut player);
    ctl.tick(ms(1000), &mut player);
    assert_eq!(count(&log, &ControllerEvent::UserChangeState), 1);
    assert!(!player.is_playing());
    assert!(approx(main_camera(&player).scale, 1.05_f64.powi(5)));
}

#[test]
fn test_zoom_and_rotate_round_trip_through_wheel() {
    let p = talk(1, 0);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();
    let mut ctl = UiController::new(Arc::clone(&p), ControllerConfig::default());
    let before = main_camera(&player);

    let wheel = |delta: f64, modifiers: Modifiers| InputEvent::Wheel {
        x: 250.0,
        y: 120.0,
        delta,
        modifiers,
    };
    ctl.handle(&wheel(-1.0, Modifiers::NONE), &mut player, ms(0));
    ctl.handle(&wheel(1.0, Modifiers::NONE), &mut player, ms(10));
    ctl.handle(&wheel(1.0, Modifiers::CTRL), &mut player, ms(20));
    ctl.handle(&wheel(-1.0, Modifiers::CTRL), &mut player, ms(30));

    let after = main_camera(&player);
    assert!(approx(after.scale, before.scale));
    assert!(approx(after.translate_x, before.translate_x));
    assert!(approx(after.translate_y, before.translate_y));
    assert!(approx(after.rotation, before.rotation) || approx(after.rotation, 360.0));
}

#[test]
fn test_manual_translate_cancels_transition_without_further_callbacks() {
    let p = talk(2, 1000);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();

    let viewport_events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&viewport_events);
    player.viewport_mut().events().subscribe(move |e| {
        if !matches!(e, ViewportEvent::Repainted) {
            sink.borrow_mut().push(e.clone());
        }
    });

    player.move_to_next(ms(0)).unwrap();
    player.tick(ms(300));
    let sampled = main_camera(&player).translate_x;
    assert!(approx(sampled, 30.0));

    player.viewport_mut().translate(5.0, 0.0);
    assert!(approx(main_camera(&player).translate_x, sampled + 5.0));

    for t in [400, 700, 1000, 1500] {
        player.tick(ms(t));
    }
    assert!(approx(main_camera(&player).translate_x, sampled + 5.0));
    assert!(!viewport_events
        .borrow()
        .iter()
        .any(|e| matches!(e, ViewportEvent::AnimationFinished(_))));
    assert_eq!(player.state(), PlayerState::Playing);
}

#[test]
fn test_auto_advance_waits_for_transition_end() {
    let p = talk(3, 500);
    let mut player = player(&p);
    player.play_from_frame(0, ms(0)).unwrap();

    player.tick(ms(2000));
    assert_eq!(player.current_index(), 1);
    assert_eq!(player.state(), PlayerState::Transitioning);
    assert_eq!(player.auto_advance_deadline(), None);

    player.tick(ms(2500));
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(player.auto_advance_deadline(), Some(ms(4500)));
}
