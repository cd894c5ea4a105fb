use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use leptos::ev::EventDescriptor;
use wasm_bindgen::JsCast;

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false }
    }
}

impl EventOptions {
    /// Non-passive, so the handler may call `prevent_default` (wheel zoom).
    pub fn active() -> Self {
        Self { passive: false, ..Self::default() }
    }
}

/// Typed listener on any event target; removed when the handle drops.
pub fn typed_event_listener<E>(
    target: &web_sys::EventTarget,
    event: E,
    options: &EventOptions,
    mut cb: impl FnMut(E::EventType) + 'static,
) -> EventListener
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let listener_options = EventListenerOptions {
        phase: if options.capture { EventListenerPhase::Capture } else { EventListenerPhase::Bubble },
        passive: options.passive,
    };
    EventListener::new_with_options(target, event.name(), listener_options, move |ev| {
        cb(ev.clone().unchecked_into::<E::EventType>());
    })
}

pub fn window_event_listener_with_options<E>(
    event: E,
    options: &EventOptions,
    cb: impl FnMut(E::EventType) + 'static,
) -> Option<EventListener>
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let window = web_sys::window()?;
    Some(typed_event_listener(&window, event, options, cb))
}
