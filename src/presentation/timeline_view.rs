use std::rc::Rc;

use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use leptos::html::Div;
use leptos::*;
use wasm_bindgen::JsCast;

use crate::application::timeline_service::{POINT_ID_PREFIX, RenderedPoint};
use crate::application::{KeyOutcome, TimelineConfig, TimelineFrame, TimelineService};
use crate::domain::events::AnnouncementStore;
use crate::domain::logging::LogComponent;
use crate::domain::timeline::ClaimRecord;
use crate::event_utils::{EventOptions, typed_event_listener, window_event_listener_with_options};
use crate::infrastructure::{BrowserTimeSource, SessionKeyValueStore};
use crate::view_state::ZOOM_STEP;
use crate::{log_debug, log_warn};

/// Slack added to the save timer so the debouncer's deadline has passed.
const SAVE_TIMER_SLACK_MS: u32 = 10;

#[derive(Clone, Copy)]
enum ViewAction {
    ZoomIn,
    ZoomOut,
    Reset,
}

fn focus_dom_point(dom_id: &str) {
    let element = gloo::utils::document().get_element_by_id(dom_id);
    match element.map(|el| el.dyn_into::<web_sys::HtmlElement>()) {
        Some(Ok(el)) => {
            let _ = el.focus();
        }
        _ => {
            log_warn!(LogComponent::Presentation("Timeline"), "No element #{} to focus", dom_id);
        }
    }
}

/// Keeps at most one animation-frame loop alive; the previous registration
/// is dropped (and so cancelled) whenever a new one is stored.
fn run_frames(
    service: StoredValue<TimelineService>,
    frame: RwSignal<TimelineFrame>,
    handle: StoredValue<Option<AnimationFrame>>,
) {
    let next = request_animation_frame(move |_| {
        let again = service.try_update_value(|s| s.tick()).unwrap_or(false);
        if let Some(next) = service.try_update_value(|s| s.frame()) {
            frame.set(next);
        }
        if again {
            run_frames(service, frame, handle);
        } else {
            handle.set_value(None);
        }
    });
    handle.set_value(Some(next));
}

/// Zoomable, keyboard-navigable timeline of dated claims.
#[component]
pub fn TimelineChart(
    records: Vec<ClaimRecord>,
    #[prop(default = 960.0)] width: f64,
    #[prop(default = 420.0)] height: f64,
    #[prop(optional)] config: Option<TimelineConfig>,
    /// Fired with the claim id on Enter, Space or click.
    #[prop(optional)]
    on_activate: Option<Callback<String>>,
) -> impl IntoView {
    let announcer = Rc::new(AnnouncementStore::new());
    let live_message = create_rw_signal(String::new());
    let subscription = announcer.subscribe(move |announcement| {
        live_message.set(announcement.message.clone());
    });

    let mut timeline = TimelineService::from_records(
        records,
        width,
        height,
        config.unwrap_or_default(),
        Rc::new(BrowserTimeSource),
        Rc::new(SessionKeyValueStore::new()),
        Rc::clone(&announcer),
    );
    timeline.mount();
    let frame = create_rw_signal(timeline.frame());
    let service = store_value(timeline);
    let selected = create_rw_signal(None::<String>);

    let raf_handle = store_value(None::<AnimationFrame>);
    let save_timer = store_value(None::<Timeout>);
    let drag_origin = create_rw_signal(None::<f64>);
    let container = create_node_ref::<Div>();

    let redraw = move || {
        if let Some(next) = service.try_update_value(|s| s.frame()) {
            frame.set(next);
        }
    };
    let after_change = move || {
        redraw();
        let animating = service.with_value(|s| s.value_domain().is_animating);
        if animating && raf_handle.with_value(Option::is_none) {
            run_frames(service, frame, raf_handle);
        }
        if service.with_value(|s| s.has_pending_save()) {
            let delay = service.with_value(|s| s.config().save_debounce_ms).max(0.0) as u32;
            let timer = Timeout::new(delay + SAVE_TIMER_SLACK_MS, move || {
                service.update_value(|s| {
                    s.flush_persistence();
                });
            });
            save_timer.set_value(Some(timer));
        }
    };
    let apply = move |action: ViewAction| {
        let changed = service
            .try_update_value(|s| match action {
                ViewAction::ZoomIn => s.zoom_in(),
                ViewAction::ZoomOut => s.zoom_out(),
                ViewAction::Reset => s.reset_view(),
            })
            .unwrap_or(false);
        if changed {
            after_change();
        }
    };
    let activate = move |id: String| {
        log_debug!(LogComponent::Presentation("Timeline"), "Activated {}", id);
        selected.set(Some(id.clone()));
        if let Some(callback) = on_activate {
            callback.call(id);
        }
    };

    create_effect(move |_| {
        let Some(el) = container.get() else {
            return;
        };
        let wheel_target = el.clone();
        let wheel = typed_event_listener(&el, ev::wheel, &EventOptions::active(), move |e| {
            e.prevent_default();
            let rect = wheel_target.get_bounding_client_rect();
            let factor = if e.delta_y() < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
            let x = e.client_x() as f64 - rect.left();
            let y = e.client_y() as f64 - rect.top();
            if service.try_update_value(|s| s.zoom_at(factor, x, y)).unwrap_or(false) {
                after_change();
            }
        });
        let resize_target = el.clone();
        let resize = window_event_listener_with_options(ev::resize, &EventOptions::default(), move |_| {
            let new_width = resize_target.client_width() as f64;
            if new_width > 0.0 {
                service.update_value(|s| s.set_container_size(new_width, height));
                after_change();
            }
        });
        on_cleanup(move || {
            drop(wheel);
            drop(resize);
        });
    });

    let announcer_for_cleanup = Rc::clone(&announcer);
    on_cleanup(move || {
        announcer_for_cleanup.unsubscribe(subscription);
        service.update_value(|s| {
            s.save_now();
        });
    });

    let on_keydown = move |e: web_sys::KeyboardEvent| {
        let Some(outcome) = service.try_update_value(|s| s.handle_key(&e.key())) else {
            return;
        };
        if outcome != KeyOutcome::Ignored {
            e.prevent_default();
        }
        match outcome {
            KeyOutcome::Ignored => {}
            KeyOutcome::FocusMoved { id, .. } => {
                after_change();
                focus_dom_point(&format!("{}{}", POINT_ID_PREFIX, id));
            }
            KeyOutcome::Activated { id } => activate(id),
            KeyOutcome::ExitedToContainer => {
                if let Some(el) = container.get_untracked() {
                    let _ = el.focus();
                }
            }
            KeyOutcome::ViewChanged => after_change(),
        }
    };

    let on_point_click = move |id: String| {
        if service.try_update_value(|s| s.focus_point(&id)).flatten().is_some() {
            after_change();
        }
        activate(id);
    };

    // Buttons are keyed by claim id and only their attributes track the
    // frame, so a redraw never detaches the element holding DOM focus.
    let render_point = move |id: String| {
        let lookup = id.clone();
        let point = create_memo(move |_| {
            frame.with(|f| f.points.iter().find(|p| p.id == lookup).cloned())
        });
        let field = move |read: fn(&RenderedPoint) -> String| {
            move || point.with(|p| p.as_ref().map(read).unwrap_or_default())
        };
        let dom_id = format!("{}{}", POINT_ID_PREFIX, id);
        let description_id = format!("{}-desc", dom_id);
        view! {
            <button
                id=dom_id
                class="timeline-point"
                class:focused=move || point.with(|p| p.as_ref().is_some_and(|p| p.focused))
                data-category=field(|p| p.color_key.clone())
                tabindex=move || point.with(|p| p.as_ref().map_or(-1, |p| p.tab_index))
                aria-label=field(|p| p.aria_label.clone())
                aria-describedby=description_id.clone()
                style=field(|p| format!("position: absolute; left: {:.1}px; top: {:.1}px;", p.x, p.y))
                on:click=move |_| on_point_click(id.clone())
            >
                <span id=description_id class="visually-hidden">{field(|p| p.aria_description.clone())}</span>
            </button>
        }
    };

    view! {
        <div class="claim-timeline">
            <div class="timeline-toolbar" role="toolbar" aria-label="Timeline zoom">
                <button aria-label="Zoom in" on:click=move |_| apply(ViewAction::ZoomIn)>"+"</button>
                <button aria-label="Zoom out" on:click=move |_| apply(ViewAction::ZoomOut)>"−"</button>
                <button aria-label="Reset view" on:click=move |_| apply(ViewAction::Reset)>"Reset"</button>
                <span class="timeline-zoom-level">
                    {move || format!("{:.0}%", frame.with(|f| f.viewport.scale * 100.0))}
                </span>
            </div>
            <div
                node_ref=container
                class="timeline-plot"
                role="group"
                aria-label="Timeline of AI skepticism claims. Use arrow keys to move between claims."
                tabindex="0"
                style=format!("position: relative; width: {}px; height: {}px; overflow: hidden; touch-action: none;", width, height)
                on:keydown=on_keydown
                on:pointerdown=move |e: web_sys::PointerEvent| drag_origin.set(Some(e.client_x() as f64))
                on:pointermove=move |e: web_sys::PointerEvent| {
                    let Some(origin) = drag_origin.get_untracked() else {
                        return;
                    };
                    let x = e.client_x() as f64;
                    drag_origin.set(Some(x));
                    if service.try_update_value(|s| s.pan_by(x - origin)).unwrap_or(false) {
                        after_change();
                    }
                }
                on:pointerup=move |_| drag_origin.set(None)
                on:pointerleave=move |_| drag_origin.set(None)
            >
                <div class="timeline-axis" aria-hidden="true">
                    {move || frame.with(|f| {
                        f.ticks
                            .iter()
                            .map(|tick| view! {
                                <span class="timeline-tick" style=format!("position: absolute; left: {:.1}px; bottom: 0;", tick.x)>
                                    {tick.label.clone()}
                                </span>
                            })
                            .collect_view()
                    })}
                </div>
                {move || frame.with(|f| {
                    f.clusters
                        .iter()
                        .map(|badge| view! {
                            <div
                                class="timeline-cluster"
                                data-category=badge.color_key.clone()
                                aria-hidden="true"
                                title=format!("{} claims", badge.count)
                                style=format!("position: absolute; left: {:.1}px; top: {:.1}px;", badge.x, badge.y)
                            >
                                {badge.label.clone()}
                            </div>
                        })
                        .collect_view()
                })}
                <For
                    each=move || frame.with(|f| f.points.iter().map(|p| p.id.clone()).collect::<Vec<_>>())
                    key=|id| id.clone()
                    children=render_point
                />
            </div>
            <div class="visually-hidden" aria-live="polite" aria-atomic="true">
                {move || live_message.get()}
            </div>
            <Show when=move || selected.with(Option::is_some)>
                <div class="timeline-selection" role="status">
                    {move || selected.get().unwrap_or_default()}
                </div>
            </Show>
        </div>
    }
}
