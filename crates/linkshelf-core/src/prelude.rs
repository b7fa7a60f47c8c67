pub use crate::clock::{Clock, SystemClock, TestClock};
pub use crate::effects::{Dispose, on_unmount};
pub use crate::error::HostError;
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::node::{Node, NodeId, PositionType, Style, WeakNode};
pub use crate::signal::{Signal, SubId, WeakSignal, signal};
pub use crate::timers::{TimerId, Timers};
pub use crate::viewport::{ScrollViewport, WeakViewport};
