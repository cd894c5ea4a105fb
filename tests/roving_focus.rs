use std::cell::RefCell;
use std::rc::Rc;

use claim_timeline::domain::timeline::{FocusDirection, RovingFocus};
use quickcheck_macros::quickcheck;

fn tab_stops(focus: &RovingFocus, count: usize) -> usize {
    (0..count).filter(|&i| focus.tab_index(i) == 0).count()
}

#[test]
fn exactly_one_tab_stop() {
    let focus = RovingFocus::new(4, 0, true);
    assert_eq!(focus.tab_index(0), 0);
    assert_eq!(focus.tab_index(1), -1);
    assert_eq!(tab_stops(&focus, 4), 1);
}

#[test]
fn next_wraps_when_enabled() {
    let mut focus = RovingFocus::new(3, 2, true);
    assert_eq!(focus.move_focus(FocusDirection::Next), Some(0));
    assert_eq!(focus.move_focus(FocusDirection::Previous), Some(2));
}

#[test]
fn next_clamps_without_wrap() {
    let mut focus = RovingFocus::new(3, 2, false);
    assert_eq!(focus.move_focus(FocusDirection::Next), None);
    assert_eq!(focus.focused_index(), Some(2));
    focus.move_focus(FocusDirection::First);
    assert_eq!(focus.move_focus(FocusDirection::Previous), None);
    assert_eq!(focus.focused_index(), Some(0));
}

#[test]
fn home_and_end_jump() {
    let mut focus = RovingFocus::new(5, 2, true);
    assert_eq!(focus.move_focus(FocusDirection::Last), Some(4));
    assert_eq!(focus.move_focus(FocusDirection::First), Some(0));
}

#[test]
fn shrinking_list_clamps_focus() {
    let mut focus = RovingFocus::new(5, 0, true);
    focus.move_focus(FocusDirection::Last);
    assert_eq!(focus.focused_index(), Some(4));

    focus.set_item_count(2);
    assert_eq!(focus.focused_index(), Some(1));
    assert_eq!(focus.state().item_count, 2);

    focus.set_item_count(0);
    assert_eq!(focus.focused_index(), None);
    assert_eq!(tab_stops(&focus, 0), 0);
    assert_eq!(focus.move_focus(FocusDirection::Next), None);
}

#[test]
fn reset_returns_to_initial_index() {
    let mut focus = RovingFocus::new(6, 3, true);
    focus.move_focus(FocusDirection::Last);
    assert_eq!(focus.reset_focus(), Some(3));
    focus.set_item_count(2);
    assert_eq!(focus.reset_focus(), None);
    assert_eq!(focus.focused_index(), Some(1));
}

#[test]
fn hook_fires_only_after_mount() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut focus =
        RovingFocus::new(4, 0, true).with_focus_change_hook(move |index| sink.borrow_mut().push(index));

    focus.move_focus(FocusDirection::Next);
    assert!(seen.borrow().is_empty());

    focus.mark_mounted();
    focus.move_focus(FocusDirection::Next);
    focus.move_focus(FocusDirection::Last);
    assert_eq!(*seen.borrow(), vec![2, 3]);
}

#[test]
fn hook_fires_when_shrinking_moves_focus() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut focus =
        RovingFocus::new(5, 0, true).with_focus_change_hook(move |index| sink.borrow_mut().push(index));
    focus.mark_mounted();

    focus.move_focus(FocusDirection::Last);
    focus.set_item_count(2);
    assert_eq!(focus.focused_index(), Some(1));
    assert_eq!(*seen.borrow(), vec![4, 1]);

    focus.set_item_count(3);
    assert_eq!(*seen.borrow(), vec![4, 1]);
}

#[test]
fn set_items_follows_moved_item() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut focus =
        RovingFocus::new(4, 2, true).with_focus_change_hook(move |index| sink.borrow_mut().push(index));
    focus.mark_mounted();

    focus.set_items(6, Some(5));
    assert_eq!(focus.focused_index(), Some(5));
    focus.set_items(6, Some(5));
    focus.set_items(3, Some(9));
    assert_eq!(focus.focused_index(), Some(2));
    assert_eq!(*seen.borrow(), vec![5, 2]);

    focus.set_items(0, None);
    assert_eq!(focus.focused_index(), None);
    assert_eq!(*seen.borrow(), vec![5, 2]);
}

#[quickcheck]
fn any_navigation_keeps_single_tab_stop(count: u8, moves: Vec<(u8, u8)>) -> bool {
    let count = count as usize % 20;
    let mut focus = RovingFocus::new(count, 0, true);
    moves.into_iter().all(|(direction, resize)| {
        let direction = match direction % 4 {
            0 => FocusDirection::Next,
            1 => FocusDirection::Previous,
            2 => FocusDirection::First,
            _ => FocusDirection::Last,
        };
        if resize % 5 == 0 {
            focus.set_item_count(resize as usize % 20);
        }
        focus.move_focus(direction);
        let n = focus.state().item_count;
        let expected = if n == 0 { 0 } else { 1 };
        tab_stops(&focus, n) == expected && focus.focused_index().is_none_or(|i| i < n)
    })
}
