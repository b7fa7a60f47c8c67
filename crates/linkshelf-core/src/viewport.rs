//! # Scroll viewport
//!
//! `ScrollViewport` is the scroll-parent of a list: it owns the scroll offset
//! and the visible size, and hands out scroll and resize listeners. Content
//! height comes from an attached content node's style, the way a scroll
//! parent's extent follows its child.
//!
//! ```rust
//! use linkshelf_core::geometry::Size;
//! use linkshelf_core::viewport::ScrollViewport;
//!
//! let vp = ScrollViewport::new(Size::new(400.0, 800.0));
//! let off = std::rc::Rc::new(std::cell::Cell::new(0.0));
//! let _listener = vp.on_scroll({
//!     let off = off.clone();
//!     move |y| off.set(y)
//! });
//! vp.scroll_to(120.0);
//! assert_eq!(off.get(), 120.0);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::effects::Dispose;
use crate::geometry::{Rect, Size};
use crate::node::{Node, WeakNode};
use crate::signal::{Signal, signal};

#[derive(Clone)]
pub struct ScrollViewport {
    inner: Rc<ViewportInner>,
}

#[derive(Clone, Default)]
pub struct WeakViewport(Weak<ViewportInner>);

struct ViewportInner {
    scroll_offset: Signal<f32>,
    size: Signal<Size>,
    content: RefCell<WeakNode>,
    mounted: Cell<bool>,
}

impl ScrollViewport {
    pub fn new(size: Size) -> Self {
        Self {
            inner: Rc::new(ViewportInner {
                scroll_offset: signal(0.0),
                size: signal(sanitize_size(size)),
                content: RefCell::new(WeakNode::default()),
                mounted: Cell::new(true),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakViewport {
        WeakViewport(Rc::downgrade(&self.inner))
    }

    pub fn scroll_offset(&self) -> f32 {
        self.inner.scroll_offset.get()
    }

    pub fn size(&self) -> Size {
        self.inner.size.get()
    }

    pub fn viewport_height(&self) -> f32 {
        self.size().height
    }

    /// Visible region in content coordinates.
    pub fn visible_rect(&self) -> Rect {
        let size = self.size();
        Rect {
            x: 0.0,
            y: self.scroll_offset(),
            w: size.width,
            h: size.height,
        }
    }

    /// The node whose height bounds scrolling. Held weakly.
    pub fn set_content(&self, content: &Node) {
        *self.inner.content.borrow_mut() = content.downgrade();
    }

    pub fn content(&self) -> Option<Node> {
        self.inner.content.borrow().upgrade()
    }

    /// Largest reachable offset, if a content node with a height is attached.
    pub fn max_scroll_offset(&self) -> Option<f32> {
        let content_h = self.content()?.style().height?;
        Some((content_h - self.viewport_height()).max(0.0))
    }

    /// Scrolls to `off`, clamped to the content. Listeners fire only when
    /// the offset actually changes. Returns the applied offset.
    pub fn scroll_to(&self, off: f32) -> f32 {
        let before = self.scroll_offset();
        if off.is_nan() {
            return before;
        }
        let off = match self.max_scroll_offset() {
            Some(max) => off.clamp(0.0, max),
            None => off.max(0.0),
        };
        if off != before {
            self.inner.scroll_offset.set(off);
        }
        off
    }

    /// Consume `dy` pixels, return the leftover that could not be scrolled.
    pub fn scroll_by(&self, dy: f32) -> f32 {
        let before = self.scroll_offset();
        let after = self.scroll_to(before + dy);
        dy - (after - before)
    }

    /// Re-applies the content clamp after the content shrank.
    pub fn clamp_to_content(&self) {
        self.scroll_to(self.scroll_offset());
    }

    pub fn resize(&self, size: Size) {
        let size = sanitize_size(size);
        if size != self.size() {
            self.inner.size.set(size);
        }
    }

    pub fn on_scroll(&self, f: impl Fn(f32) + 'static) -> Dispose {
        let id = self.inner.scroll_offset.subscribe(move |off| f(*off));
        let sig = self.inner.scroll_offset.downgrade();
        Dispose::new(move || {
            if let Some(sig) = sig.upgrade() {
                sig.unsubscribe(id);
            }
        })
    }

    pub fn on_resize(&self, f: impl Fn(Size) + 'static) -> Dispose {
        let id = self.inner.size.subscribe(move |size| f(*size));
        let sig = self.inner.size.downgrade();
        Dispose::new(move || {
            if let Some(sig) = sig.upgrade() {
                sig.unsubscribe(id);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.inner.scroll_offset.subscriber_count() + self.inner.size.subscriber_count()
    }

    /// Marks the viewport as gone from the host. Readers treat an unmounted
    /// viewport like a missing one.
    pub fn unmount(&self) {
        self.inner.mounted.set(false);
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }
}

impl std::fmt::Debug for ScrollViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollViewport")
            .field("scroll_offset", &self.scroll_offset())
            .field("size", &self.size())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

impl WeakViewport {
    pub fn upgrade(&self) -> Option<ScrollViewport> {
        self.0.upgrade().map(|inner| ScrollViewport { inner })
    }
}

fn sanitize_size(size: Size) -> Size {
    let fix = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    Size {
        width: fix(size.width),
        height: fix(size.height),
    }
}
