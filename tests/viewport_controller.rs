use std::rc::Rc;

use claim_timeline::domain::timeline::{Bounds, ManualTimeSource, PersistedPosition, TimeSource};
use claim_timeline::view_state::{DEFAULT_SAVE_DEBOUNCE_MS, PAN_STEP_PX, ViewportController};
use quickcheck_macros::quickcheck;

const DAY_MS: f64 = 86_400_000.0;
const WIDTH: f64 = 800.0;

fn controller() -> (ViewportController, Rc<ManualTimeSource>) {
    let clock = Rc::new(ManualTimeSource::new(0.0));
    let source: Rc<dyn TimeSource> = clock.clone();
    let vc = ViewportController::new(WIDTH, 3650.0 * DAY_MS, source, DEFAULT_SAVE_DEBOUNCE_MS);
    (vc, clock)
}

#[test]
fn zoom_at_point_keeps_anchor_fixed() {
    let (mut vc, _) = controller();
    assert!(vc.zoom_at_point(2.0, 100.0, 0.0));
    assert_eq!(vc.viewport().scale, 2.0);
    assert_eq!(vc.viewport().translate_x, -100.0);

    assert!(vc.zoom_at_point(0.5, 100.0, 0.0));
    assert_eq!(vc.viewport().scale, 1.0);
    assert_eq!(vc.viewport().translate_x, 0.0);
}

#[test]
fn zoom_in_stops_at_max_scale() {
    let (mut vc, _) = controller();
    while vc.zoom_in() {}
    assert_eq!(vc.viewport().scale, Bounds::MAX_SCALE_CAP);
    assert!(!vc.zoom_in());
    assert_eq!(vc.viewport().scale, Bounds::MAX_SCALE_CAP);
}

#[test]
fn short_data_span_limits_max_zoom() {
    let clock: Rc<dyn TimeSource> = Rc::new(ManualTimeSource::new(0.0));
    let mut vc = ViewportController::new(WIDTH, 90.0 * DAY_MS, clock, DEFAULT_SAVE_DEBOUNCE_MS);
    while vc.zoom_in() {}
    assert_eq!(vc.viewport().scale, 3.0);
}

#[test]
fn pan_clamps_to_content_edges() {
    let (mut vc, _) = controller();
    assert!(vc.zoom_at_point(2.0, 0.0, 0.0));
    assert!(vc.pan_by(-10_000.0));
    assert_eq!(vc.viewport().translate_x, -WIDTH);
    assert!(!vc.pan_by(-1.0));
    assert!(vc.pan_by(10_000.0));
    assert_eq!(vc.viewport().translate_x, 0.0);
}

#[test]
fn discrete_pan_uses_fixed_screen_step() {
    let (mut vc, _) = controller();
    assert!(vc.zoom_at_point(4.0, 0.0, 0.0));
    assert!(vc.pan_right());
    assert_eq!(vc.viewport().translate_x, -PAN_STEP_PX);
    assert!(vc.zoom_at_point(2.0, 0.0, 0.0));
    let before = vc.viewport().translate_x;
    assert!(vc.pan_right());
    assert_eq!(vc.viewport().translate_x, before - PAN_STEP_PX);
    assert!(vc.pan_left());
    assert_eq!(vc.viewport().translate_x, before);
}

#[test]
fn reset_returns_to_identity() {
    let (mut vc, _) = controller();
    vc.zoom_at_point(3.0, 250.0, 0.0);
    assert!(vc.reset());
    assert_eq!(vc.viewport().scale, 1.0);
    assert_eq!(vc.viewport().translate_x, 0.0);
    assert!(!vc.reset());
}

#[test]
fn saves_are_debounced() {
    let (mut vc, clock) = controller();
    vc.zoom_in();
    clock.advance(100.0);
    vc.zoom_in();
    assert!(vc.has_pending_save());

    clock.advance(DEFAULT_SAVE_DEBOUNCE_MS - 1.0);
    assert!(vc.take_due_save().is_none());

    clock.advance(1.0);
    let saved = vc.take_due_save().expect("save due");
    assert_eq!(saved, vc.viewport());
    assert!(!vc.has_pending_save());
}

#[test]
fn rejected_transitions_do_not_schedule_saves() {
    let (mut vc, _) = controller();
    assert!(!vc.pan_by(-20.0));
    assert!(!vc.zoom_at_point(f64::NAN, 0.0, 0.0));
    assert!(!vc.zoom_at_point(-2.0, 0.0, 0.0));
    assert!(!vc.has_pending_save());
}

#[test]
fn restore_clamps_without_saving() {
    let (mut vc, _) = controller();
    let viewport = vc.restore(&PersistedPosition { scroll_x: -150.0, zoom: 3.0, timestamp: 0.0 });
    assert_eq!(viewport.scale, 3.0);
    assert_eq!(viewport.translate_x, -150.0);

    let viewport = vc.restore(&PersistedPosition { scroll_x: -5000.0, zoom: 50.0, timestamp: 0.0 });
    assert_eq!(viewport.scale, Bounds::MAX_SCALE_CAP);
    assert_eq!(viewport.translate_x, -5000.0);

    let viewport = vc.restore(&PersistedPosition { scroll_x: 40.0, zoom: 0.1, timestamp: 0.0 });
    assert_eq!(viewport.scale, Bounds::MIN_SCALE);
    assert_eq!(viewport.translate_x, 0.0);
    assert!(!vc.has_pending_save());
}

#[test]
fn narrowing_container_reclamps_translation() {
    let (mut vc, _) = controller();
    vc.zoom_at_point(2.0, 0.0, 0.0);
    vc.pan_by(-WIDTH);
    assert_eq!(vc.viewport().translate_x, -WIDTH);
    vc.set_layout(400.0, 3650.0 * DAY_MS);
    assert_eq!(vc.viewport().translate_x, -400.0);
    assert!(vc.bounds().contains(&vc.viewport()));
}

fn apply(vc: &mut ViewportController, op: u8, amount: i16) {
    let amount = amount as f64;
    match op % 7 {
        0 => {
            vc.zoom_in();
        }
        1 => {
            vc.zoom_out();
        }
        2 => {
            let factor = 2f64.powf(amount / 16_384.0);
            vc.zoom_at_point(factor, amount.abs() % WIDTH, 0.0);
        }
        3 => {
            vc.pan_by(amount);
        }
        4 => {
            vc.pan_left();
        }
        5 => {
            vc.pan_right();
        }
        _ => {
            vc.reset();
        }
    }
}

#[quickcheck]
fn every_transition_respects_bounds(ops: Vec<(u8, i16)>) -> bool {
    let (mut vc, _) = controller();
    ops.into_iter().all(|(op, amount)| {
        apply(&mut vc, op, amount);
        vc.bounds().contains(&vc.viewport())
    })
}

#[quickcheck]
fn unclamped_zoom_keeps_anchor_data_position(start: u8, factor: u8, anchor: u16) -> bool {
    let (mut vc, _) = controller();
    vc.zoom_at_point(1.0 + (start % 8) as f64, 0.0, 0.0);
    vc.pan_by(-(anchor as f64 % WIDTH));

    let anchor_x = anchor as f64 % WIDTH;
    let before = vc.viewport().to_base_x(anchor_x);
    let factor = 0.5 + (factor % 16) as f64 * 0.125;
    if !vc.zoom_at_point(factor, anchor_x, 0.0) {
        return true;
    }

    let bounds = vc.bounds();
    let tx = vc.viewport().translate_x;
    if tx <= bounds.min_translate_x || tx >= bounds.max_translate_x {
        // Clamped against an edge: the anchor may legitimately drift.
        return true;
    }
    (vc.viewport().to_base_x(anchor_x) - before).abs() < 1e-6
}
