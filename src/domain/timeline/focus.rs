//! Roving tabindex over the visible items.
//!
//! Exactly one item carries `tabindex=0` while the list is non-empty; arrow
//! keys move that single tab stop.

use strum::{AsRefStr, EnumString};

use super::value_objects::FocusState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum FocusDirection {
    #[strum(serialize = "next")]
    Next,
    #[strum(serialize = "previous")]
    Previous,
    #[strum(serialize = "first")]
    First,
    #[strum(serialize = "last")]
    Last,
}

pub type FocusChangeHook = Box<dyn FnMut(usize)>;

pub struct RovingFocus {
    focused: Option<usize>,
    item_count: usize,
    initial_index: usize,
    wrap: bool,
    mounted: bool,
    on_focus_change: Option<FocusChangeHook>,
}

impl std::fmt::Debug for RovingFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RovingFocus")
            .field("focused", &self.focused)
            .field("item_count", &self.item_count)
            .field("wrap", &self.wrap)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl RovingFocus {
    pub fn new(item_count: usize, initial_index: usize, wrap: bool) -> Self {
        let mut focus = Self {
            focused: None,
            item_count: 0,
            initial_index,
            wrap,
            mounted: false,
            on_focus_change: None,
        };
        focus.set_item_count(item_count);
        focus
    }

    /// Hook fired on every focus index change once mounted.
    pub fn with_focus_change_hook(mut self, hook: impl FnMut(usize) + 'static) -> Self {
        self.on_focus_change = Some(Box::new(hook));
        self
    }

    pub fn mark_mounted(&mut self) {
        self.mounted = true;
    }

    pub fn state(&self) -> FocusState {
        FocusState { focused_index: self.focused, item_count: self.item_count }
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// `0` for the single tab stop, `-1` for everything else.
    pub fn tab_index(&self, index: usize) -> i32 {
        if self.focused == Some(index) { 0 } else { -1 }
    }

    /// Move the tab stop. Returns the new index when it changed.
    pub fn move_focus(&mut self, direction: FocusDirection) -> Option<usize> {
        let last = self.item_count.checked_sub(1)?;
        let current = self.focused.unwrap_or(0);
        let target = match direction {
            FocusDirection::First => 0,
            FocusDirection::Last => last,
            FocusDirection::Next if current >= last => {
                if self.wrap { 0 } else { last }
            }
            FocusDirection::Next => current + 1,
            FocusDirection::Previous if current == 0 => {
                if self.wrap { last } else { 0 }
            }
            FocusDirection::Previous => current - 1,
        };
        self.focus_index(target)
    }

    /// Jump straight to `index` (e.g. a pointer click). Out-of-range is ignored.
    pub fn focus_index(&mut self, index: usize) -> Option<usize> {
        if index >= self.item_count || self.focused == Some(index) {
            return None;
        }
        self.focused = Some(index);
        self.notify(index);
        Some(index)
    }

    pub fn reset_focus(&mut self) -> Option<usize> {
        match self.item_count.checked_sub(1) {
            Some(last) => self.focus_index(self.initial_index.min(last)),
            None => {
                self.focused = None;
                None
            }
        }
    }

    /// Re-clamp after the visible list grows or shrinks.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.set_items(item_count, None);
    }

    /// Rebuild for a new list of `item_count` items. `follow` is the new
    /// position of the previously focused item, if it is still listed;
    /// otherwise the old index is clamped. Fires the hook when the index moves.
    pub fn set_items(&mut self, item_count: usize, follow: Option<usize>) {
        let previous = self.focused;
        self.item_count = item_count;
        self.focused = match item_count.checked_sub(1) {
            None => None,
            Some(last) => match follow.filter(|&index| index <= last) {
                Some(index) => Some(index),
                None => Some(self.focused.unwrap_or(self.initial_index).min(last)),
            },
        };
        if let Some(index) = self.focused.filter(|_| self.focused != previous) {
            self.notify(index);
        }
    }

    fn notify(&mut self, index: usize) {
        if !self.mounted {
            return;
        }
        if let Some(hook) = self.on_focus_change.as_mut() {
            hook(index);
        }
    }
}
