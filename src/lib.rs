use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, get_logger};

pub mod application;
pub mod domain;
pub mod event_utils;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;
pub mod view_state;

/// Install panic reporting, the console logger and the browser clock.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(
        infrastructure::services::BrowserTimeProvider::new(),
    ));

    get_logger().info(LogComponent::Presentation("Initialize"), "Timeline engine initialized");
}

/// Mount [`presentation::TimelineChart`] into `element_id` with the given
/// claims JSON and optional config JSON.
#[wasm_bindgen(js_name = mountTimeline)]
pub fn mount_timeline(
    element_id: &str,
    claims_json: &str,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    use leptos::*;
    use presentation::TimelineChart;

    let records: Vec<domain::timeline::ClaimRecord> =
        serde_json::from_str(claims_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let config = application::TimelineConfig::from_json(config_json.as_deref().unwrap_or_default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(element_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| JsValue::from_str(&format!("no element #{}", element_id)))?;

    mount_to(root, move || view! { <TimelineChart records=records config=config /> });
    Ok(())
}
