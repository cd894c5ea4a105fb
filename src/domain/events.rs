use std::cell::{Cell, RefCell};

use strum::AsRefStr;

/// Live-region urgency, mirrors `aria-live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Politeness {
    #[strum(serialize = "polite")]
    Polite,
    #[strum(serialize = "assertive")]
    Assertive,
}

/// Plain-text message for the screen-reader announcer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn Fn(&Announcement)>;

/// Injectable announcement store with subscriber callbacks.
///
/// Handlers must not subscribe or unsubscribe from inside `dispatch`.
#[derive(Default)]
pub struct AnnouncementStore {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Handler)>>,
    last: RefCell<Option<Announcement>>,
}

impl AnnouncementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Announcement) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    pub fn dispatch(&self, message: impl Into<String>, politeness: Politeness) {
        let announcement = Announcement { message: message.into(), politeness };
        for (_, handler) in self.handlers.borrow().iter() {
            handler(&announcement);
        }
        *self.last.borrow_mut() = Some(announcement);
    }

    pub fn polite(&self, message: impl Into<String>) {
        self.dispatch(message, Politeness::Polite);
    }

    pub fn last(&self) -> Option<Announcement> {
        self.last.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn dispatch_reaches_live_subscribers_only() {
        let store = AnnouncementStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let first = store.subscribe(move |a| sink.borrow_mut().push(a.message.clone()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |a| sink.borrow_mut().push(format!("2:{}", a.message)));

        store.polite("Zoomed in");
        assert!(store.unsubscribe(first));
        assert!(!store.unsubscribe(first));
        store.dispatch("Filter cleared", Politeness::Assertive);

        assert_eq!(
            *seen.borrow(),
            vec!["Zoomed in", "2:Zoomed in", "2:Filter cleared"]
        );
        assert_eq!(store.last().map(|a| a.politeness), Some(Politeness::Assertive));
        assert_eq!(store.subscriber_count(), 1);
    }
}
