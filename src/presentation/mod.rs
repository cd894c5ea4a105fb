pub mod timeline_view;
pub mod wasm_api;

pub use timeline_view::TimelineChart;
pub use wasm_api::TimelineApi;
