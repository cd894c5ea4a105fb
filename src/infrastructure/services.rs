//! Browser-backed implementations of the domain's logging and clock traits.

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};
use crate::domain::timeline::TimeSource;

/// Console logger implementation for the WASM environment
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Warn)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = entry.render();
        match entry.level {
            LogLevel::Debug => web_sys::console::debug_1(&line.into()),
            LogLevel::Info => web_sys::console::info_1(&line.into()),
            LogLevel::Warn => web_sys::console::warn_1(&line.into()),
            LogLevel::Error => web_sys::console::error_1(&line.into()),
        }
    }
}

/// Wall clock for log stamps, `HH:MM:SS.mmm` local time.
#[derive(Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&(timestamp as f64).into());
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}

/// Epoch-millisecond clock for animations, debouncing and save stamps.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTimeSource;

impl TimeSource for BrowserTimeSource {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}
