//! Windowed rendering for long, fixed-height lists.
//!
//! Only the items near the viewport get an element; the container is sized
//! to the whole list so scrollbars stay honest. Heavy sub-resources inside a
//! rendered item (see [`deferred`]) load once the item nears the viewport.
//!
//! Building blocks, leaves first:
//!
//! - [`throttle`]: leading-edge rate limiter for scroll and resize events.
//! - [`intersection`]: watcher reporting when rendered elements reach the
//!   viewport margin.
//! - [`renderer`]: the [`WindowedList`] itself.

pub mod config;
pub mod deferred;
pub mod error;
pub mod intersection;
pub mod item;
pub mod renderer;
pub mod stats;
pub mod throttle;
pub mod window;


pub use config::ListConfig;
pub use deferred::{
    DEFERRED_CLASS, LIVE_SRC_ATTR, PENDING_SRC_ATTR, deferred_image, has_deferred,
    promote_deferred,
};
pub use error::ConfigError;
pub use intersection::{IntersectionEntry, IntersectionWatcher, WatcherOptions};
pub use item::ListItem;
pub use renderer::{INDEX_ATTR, WindowedList, WindowedListBuilder};
pub use stats::ListStats;
pub use throttle::{Throttle, ThrottleState};
pub use window::WindowRange;
