use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use crate::application::{TimelineConfig, TimelineService};
use crate::domain::events::AnnouncementStore;
use crate::domain::logging::LogComponent;
use crate::domain::timeline::{Category, ClaimRecord};
use crate::infrastructure::{BrowserTimeSource, SessionKeyValueStore};
use crate::log_warn;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JavaScript bridge for hosts that render the timeline themselves.
///
/// Every view-changing method returns whether anything changed; call
/// `frameJson` afterwards and, while `tick` returns true, once per animation
/// frame.
#[wasm_bindgen]
pub struct TimelineApi {
    service: TimelineService,
    subscriptions: Vec<crate::domain::events::SubscriptionId>,
}

#[wasm_bindgen]
impl TimelineApi {
    /// `claims_json` is an array of content-store records; `config_json` is
    /// an optional partial [`TimelineConfig`].
    #[wasm_bindgen(constructor)]
    pub fn new(
        claims_json: &str,
        width: f64,
        height: f64,
        config_json: Option<String>,
    ) -> Result<TimelineApi, JsValue> {
        let records: Vec<ClaimRecord> = serde_json::from_str(claims_json).map_err(js_error)?;
        let config = TimelineConfig::from_json(config_json.as_deref().unwrap_or_default())
            .map_err(js_error)?;
        let service = TimelineService::from_records(
            records,
            width,
            height,
            config,
            Rc::new(BrowserTimeSource),
            Rc::new(SessionKeyValueStore::new()),
            Rc::new(AnnouncementStore::new()),
        );
        Ok(Self { service, subscriptions: Vec::new() })
    }

    /// Restore the saved position. Returns true when one was applied.
    #[wasm_bindgen(js_name = mount)]
    pub fn mount(&mut self) -> bool {
        self.service.mount().is_some()
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> bool {
        self.service.zoom_in()
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> bool {
        self.service.zoom_out()
    }

    #[wasm_bindgen(js_name = zoomAt)]
    pub fn zoom_at(&mut self, factor: f64, center_x: f64, center_y: f64) -> bool {
        self.service.zoom_at(factor, center_x, center_y)
    }

    #[wasm_bindgen(js_name = panBy)]
    pub fn pan_by(&mut self, delta_x: f64) -> bool {
        self.service.pan_by(delta_x)
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) -> bool {
        self.service.reset_view()
    }

    #[wasm_bindgen(js_name = resize)]
    pub fn resize(&mut self, width: f64, height: f64) {
        self.service.set_container_size(width, height);
    }

    /// `KeyboardEvent.key` in, serialized outcome out (`{"kind": ...}`).
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> Result<String, JsValue> {
        let outcome = self.service.handle_key(key);
        serde_json::to_string(&outcome).map_err(js_error)
    }

    #[wasm_bindgen(js_name = focusPoint)]
    pub fn focus_point(&mut self, id: &str) -> Option<u32> {
        self.service.focus_point(id).map(|index| index as u32)
    }

    /// JSON array of category tags; `[]` shows everything.
    #[wasm_bindgen(js_name = setFilters)]
    pub fn set_filters(&mut self, categories_json: &str) -> Result<(), JsValue> {
        let tags: Vec<String> = serde_json::from_str(categories_json).map_err(js_error)?;
        self.service.set_filters(tags.iter().map(|tag| Category::parse(tag)));
        Ok(())
    }

    /// Advance animations and pending saves; true while more frames are needed.
    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self) -> bool {
        self.service.tick()
    }

    #[wasm_bindgen(js_name = hasPendingSave)]
    pub fn has_pending_save(&self) -> bool {
        self.service.has_pending_save()
    }

    #[wasm_bindgen(js_name = clearSavedPosition)]
    pub fn clear_saved_position(&self) {
        self.service.clear_saved_position();
    }

    #[wasm_bindgen(js_name = frameJson)]
    pub fn frame_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.service.frame()).map_err(js_error)
    }

    /// Calls `callback(message, politeness)` for every screen-reader
    /// announcement.
    #[wasm_bindgen(js_name = onAnnouncement)]
    pub fn on_announcement(&mut self, callback: Function) {
        let id = self.service.announcer().subscribe(move |announcement| {
            let message = JsValue::from_str(&announcement.message);
            let politeness = JsValue::from_str(announcement.politeness.as_ref());
            if let Err(err) = callback.call2(&JsValue::NULL, &message, &politeness) {
                log_warn!(
                    LogComponent::Presentation("WasmApi"),
                    "Announcement callback threw: {:?}",
                    err
                );
            }
        });
        self.subscriptions.push(id);
    }

    #[wasm_bindgen(js_name = lastAnnouncement)]
    pub fn last_announcement(&self) -> Option<String> {
        self.service.announcer().last().map(|announcement| announcement.message)
    }
}

impl Drop for TimelineApi {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.service.announcer().unsubscribe(id);
        }
    }
}
