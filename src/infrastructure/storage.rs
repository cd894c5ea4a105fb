use web_sys::Storage;

use crate::domain::errors::{TimelineError, TimelineResult};
use crate::domain::logging::LogComponent;
use crate::domain::timeline::KeyValueStore;
use crate::log_warn;

/// Tab-scoped browser session storage.
///
/// Never fails loudly: a blocked or missing storage area behaves like an
/// empty one that refuses writes.
#[derive(Debug, Default, Clone)]
pub struct SessionKeyValueStore {
    area: Option<Storage>,
}

impl SessionKeyValueStore {
    /// Binds to `window.sessionStorage`. No window, disabled storage or a
    /// throwing getter (`SecurityError` in sandboxed iframes) yields a
    /// detached store.
    pub fn new() -> Self {
        let area = match web_sys::window().map(|w| w.session_storage()) {
            Some(Ok(area)) => area,
            Some(Err(err)) => {
                log_warn!(LogComponent::Infrastructure("Storage"), "sessionStorage unavailable: {:?}", err);
                None
            }
            None => None,
        };
        if area.is_none() {
            log_warn!(LogComponent::Infrastructure("Storage"), "Timeline position will not persist");
        }
        Self { area }
    }

    /// A store with no backing area.
    pub fn detached() -> Self {
        Self { area: None }
    }

    pub fn is_available(&self) -> bool {
        self.area.is_some()
    }
}

impl KeyValueStore for SessionKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.area.as_ref()?.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log_warn!(LogComponent::Infrastructure("Storage"), "sessionStorage read failed: {:?}", err);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> TimelineResult<()> {
        let area = self
            .area
            .as_ref()
            .ok_or_else(|| TimelineError::Storage("sessionStorage unavailable".to_string()))?;
        area.set_item(key, value)
            .map_err(|err| TimelineError::Storage(format!("sessionStorage write failed: {:?}", err)))
    }

    fn remove(&self, key: &str) {
        let Some(area) = self.area.as_ref() else {
            return;
        };
        if let Err(err) = area.remove_item(key) {
            log_warn!(LogComponent::Infrastructure("Storage"), "sessionStorage remove failed: {:?}", err);
        }
    }
}
