//! Timeline aggregate: dated claims, their projection, grouping, focus and
//! view persistence.

pub mod animation;
pub mod clustering;
pub mod entities;
pub mod focus;
pub mod persistence;
pub mod transform;
pub mod value_objects;

pub use animation::{AnimatedDomain, AnimationScheduler, DomainAnimator, Easing, ManualTimeSource, TimeSource};
pub use clustering::{cluster, count_label, should_show_clusters};
pub use entities::*;
pub use focus::{FocusDirection, RovingFocus};
pub use persistence::{InMemoryStore, KeyValueStore, PersistedPosition, PositionStore};
pub use transform::{LinearScale, LogScale, Projection, TimeScale, ValueScale, ValueScaleKind};
pub use value_objects::*;
