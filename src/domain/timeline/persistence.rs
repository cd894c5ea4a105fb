use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::animation::TimeSource;
use crate::domain::errors::TimelineResult;
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_warn};

pub const POSITION_KEY: &str = "timeline-position";

/// Minimal string key-value storage (browser session storage in production).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> TimelineResult<()>;
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> TimelineResult<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> TimelineResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// Stored view: `{"scrollX": .., "zoom": .., "timestamp": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPosition {
    pub scroll_x: f64,
    pub zoom: f64,
    pub timestamp: f64,
}

/// Synchronous save/load of the viewport. Last write wins.
pub struct PositionStore<S: KeyValueStore> {
    storage: S,
    clock: Rc<dyn TimeSource>,
}

impl<S: KeyValueStore> PositionStore<S> {
    pub fn new(storage: S, clock: Rc<dyn TimeSource>) -> Self {
        Self { storage, clock }
    }

    pub fn save(&self, scroll_x: f64, zoom: f64) -> TimelineResult<PersistedPosition> {
        let position = PersistedPosition { scroll_x, zoom, timestamp: self.clock.now_ms() };
        let json = serde_json::to_string(&position)?;
        self.storage.set(POSITION_KEY, &json)?;
        log_debug!(
            LogComponent::Domain("Persistence"),
            "Saved position scrollX={:.1} zoom={:.3}",
            scroll_x,
            zoom
        );
        Ok(position)
    }

    /// Last saved position with `zoom` clamped into `[min_scale, max_scale]`.
    ///
    /// Absent or unreadable records yield `None`.
    pub fn load(&self, min_scale: f64, max_scale: f64) -> Option<PersistedPosition> {
        let raw = self.storage.get(POSITION_KEY)?;
        let position: PersistedPosition = match serde_json::from_str(&raw) {
            Ok(position) => position,
            Err(err) => {
                log_warn!(
                    LogComponent::Domain("Persistence"),
                    "Ignoring unreadable saved position: {}",
                    err
                );
                return None;
            }
        };
        if !position.scroll_x.is_finite() || !position.zoom.is_finite() {
            log_warn!(LogComponent::Domain("Persistence"), "Ignoring non-finite saved position");
            return None;
        }
        Some(PersistedPosition {
            zoom: position.zoom.clamp(min_scale, max_scale.max(min_scale)),
            ..position
        })
    }

    pub fn clear(&self) {
        self.storage.remove(POSITION_KEY);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
