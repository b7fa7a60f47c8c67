//! # Host model for windowed lists
//!
//! `linkshelf-core` is the small host layer the list renderer runs against.
//! There are four pieces:
//!
//! - `Node`: a retained element tree with attributes, classes and a style
//!   block, standing in for the host document.
//! - `ScrollViewport`: the scroll parent, with a scroll offset and visible size,
//!   observable through scroll and resize listeners.
//! - `Signal<T>`: observable value behind the viewport's listeners.
//! - `Clock` and `Timers`: a swappable time source and a fire-once timeout
//!   queue for a single-threaded event loop.
//!
//! ## Signals
//!
//! ```rust
//! use linkshelf_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Subscribers run after the signal's internal borrow is released, so a
//! listener may read the value it is subscribed to.
//!
//! ## Timers
//!
//! ```rust
//! use linkshelf_core::*;
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! let timers = Timers::new(clock.clone());
//! let fired = std::rc::Rc::new(std::cell::Cell::new(false));
//! timers.set_timeout(Duration::from_millis(100), {
//!     let fired = fired.clone();
//!     move || fired.set(true)
//! });
//!
//! assert_eq!(timers.run_due(), 0);
//! clock.advance(Duration::from_millis(100));
//! assert_eq!(timers.run_due(), 1);
//! assert!(fired.get());
//! ```
//!
//! Everything here is `Rc`-based and meant for one UI thread.

pub mod clock;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod node;
pub mod prelude;
pub mod signal;
pub mod tests;
pub mod timers;
pub mod viewport;

pub use clock::*;
pub use effects::*;
pub use error::*;
pub use geometry::*;
pub use node::*;
pub use prelude::*;
pub use signal::*;
pub use timers::*;
pub use viewport::*;
