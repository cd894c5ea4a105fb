pub mod config;
pub mod debounce;
pub mod memo;
pub mod timeline_service;

pub use config::TimelineConfig;
pub use timeline_service::{KeyOutcome, TimelineFrame, TimelineService};
