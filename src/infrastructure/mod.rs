pub mod services;
pub mod storage;

pub use services::{BrowserTimeProvider, BrowserTimeSource, ConsoleLogger};
pub use storage::SessionKeyValueStore;
