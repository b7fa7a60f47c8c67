//! # Windowed list
//!
//! `WindowedList` keeps only the items near the viewport materialized. The
//! container is sized to the full list (`len * item_height`) so the native
//! scrollbar stays proportional; each rendered element is positioned
//! absolutely at `index * item_height` and tagged with `data-index`.
//!
//! A windowing pass runs on construction, after `set_items` and `refresh`,
//! and on (throttled) scroll and resize events of the viewport:
//!
//! 1. compute the window from the viewport's offset and height,
//! 2. render items entering the window and start watching them,
//! 3. remove elements whose ids left the window,
//! 4. promote deferred content of elements that reached the intersection
//!    margin, once per element.
//!
//! Scroll and resize events dropped by a throttle still run step 4. When the
//! list shrinks, the viewport is clamped to the new extent before the pass.
//!
//! Elements are never reused across items. An item that stays in the window
//! keeps its element, even if its data changed; `refresh` rebuilds
//! everything.
//!
//! The container is assumed to start at the top of the viewport's content.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use linkshelf_core::effects::Dispose;
use linkshelf_core::node::{Node, NodeId, PositionType, WeakNode};
use linkshelf_core::timers::Timers;
use linkshelf_core::viewport::{ScrollViewport, WeakViewport};

use crate::config::ListConfig;
use crate::deferred::promote_deferred;
use crate::error::ConfigError;
use crate::intersection::{IntersectionWatcher, WatcherOptions};
use crate::item::ListItem;
use crate::stats::ListStats;
use crate::throttle::Throttle;
use crate::window::WindowRange;

/// Attribute carrying an element's list index.
pub const INDEX_ATTR: &str = "data-index";

type RenderFn<T> = dyn Fn(&T) -> Node;

pub struct WindowedList<T: ListItem + 'static> {
    shared: Rc<Shared<T>>,
}

struct Shared<T: ListItem + 'static> {
    config: ListConfig,
    container: WeakNode,
    viewport: WeakViewport,
    render: Box<RenderFn<T>>,
    state: RefCell<ListState<T>>,
    // None when deferred loading is off.
    watcher: Option<RefCell<IntersectionWatcher>>,
    scroll_throttle: Throttle,
    resize_throttle: Throttle,
    listeners: RefCell<Vec<Dispose>>,
    // Set while the list itself moves the viewport; such events are not user
    // scrolls and must not claim the throttle.
    clamping: Cell<bool>,
    stats: Cell<ListStats>,
}

struct ListState<T: ListItem> {
    items: Vec<T>,
    registry: HashMap<T::Id, Rendered>,
    visible: HashSet<T::Id>,
    range: WindowRange,
    promoted: HashSet<NodeId>,
    torn_down: bool,
}

struct Rendered {
    element: Node,
    index: usize,
}

#[derive(Clone, Copy, Debug)]
enum ViewportEvent {
    Scroll,
    Resize,
}

/// Assembles a [`WindowedList`]:
///
/// ```rust
/// use linkshelf_core::prelude::*;
/// use linkshelf_virtual::{ListConfig, ListItem, WindowedListBuilder};
///
/// struct Row(u32);
/// impl ListItem for Row {
///     type Id = u32;
///     fn id(&self) -> u32 {
///         self.0
///     }
/// }
///
/// let container = Node::new("div");
/// let viewport = ScrollViewport::new(Size::new(320.0, 400.0));
/// viewport.set_content(&container);
///
/// let list = WindowedListBuilder::new(&container, &viewport)
///     .config(ListConfig::default().item_height(100.0).buffer_size(1))
///     .build(|row: &Row| Node::new("div").with_text(format!("row {}", row.0)))
///     .unwrap();
///
/// list.set_items((0..50).map(Row));
/// assert_eq!(list.visible_range().as_range(), 0..5);
/// assert_eq!(container.child_count(), 5);
/// ```
pub struct WindowedListBuilder {
    container: Node,
    viewport: ScrollViewport,
    config: ListConfig,
    timers: Option<Rc<Timers>>,
}

impl WindowedListBuilder {
    pub fn new(container: &Node, viewport: &ScrollViewport) -> Self {
        Self {
            container: container.clone(),
            viewport: viewport.clone(),
            config: ListConfig::default(),
            timers: None,
        }
    }

    pub fn config(mut self, config: ListConfig) -> Self {
        self.config = config;
        self
    }

    /// Timer queue for the throttles. Defaults to one on the system clock.
    pub fn timers(mut self, timers: Rc<Timers>) -> Self {
        self.timers = Some(timers);
        self
    }

    pub fn build<T, F>(self, render: F) -> Result<WindowedList<T>, ConfigError>
    where
        T: ListItem + 'static,
        F: Fn(&T) -> Node + 'static,
    {
        let timers = self.timers.unwrap_or_else(|| Rc::new(Timers::system()));
        WindowedList::new(self.config, &self.container, &self.viewport, timers, render)
    }
}

impl<T: ListItem + 'static> WindowedList<T> {
    pub fn new(
        config: ListConfig,
        container: &Node,
        viewport: &ScrollViewport,
        timers: Rc<Timers>,
        render: impl Fn(&T) -> Node + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let watcher = config.lazy_loading.then(|| {
            RefCell::new(IntersectionWatcher::new(WatcherOptions {
                root_margin: config.intersection_margin(),
                threshold: config.intersection_threshold,
            }))
        });
        let interval = config.throttle_interval();

        let shared = Rc::new(Shared {
            container: container.downgrade(),
            viewport: viewport.downgrade(),
            render: Box::new(render),
            state: RefCell::new(ListState {
                items: Vec::new(),
                registry: HashMap::new(),
                visible: HashSet::new(),
                range: WindowRange::default(),
                promoted: HashSet::new(),
                torn_down: false,
            }),
            watcher,
            scroll_throttle: Throttle::new(interval, timers.clone()),
            resize_throttle: Throttle::new(interval, timers),
            listeners: RefCell::new(Vec::new()),
            clamping: Cell::new(false),
            stats: Cell::new(ListStats::default()),
            config,
        });

        let weak = Rc::downgrade(&shared);
        let on_scroll = viewport.on_scroll({
            let weak = weak.clone();
            move |_| {
                if let Some(shared) = weak.upgrade() {
                    shared.handle_viewport_event(ViewportEvent::Scroll);
                }
            }
        });
        let on_resize = viewport.on_resize(move |_| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_viewport_event(ViewportEvent::Resize);
            }
        });
        shared.listeners.borrow_mut().extend([on_scroll, on_resize]);

        log::debug!(
            "windowed list mounted: item_height={} buffer={} lazy={}",
            shared.config.item_height,
            shared.config.buffer_size,
            shared.config.lazy_loading
        );

        shared.update_container();
        shared.update_visible_items();
        Ok(Self { shared })
    }

    /// Replaces the whole item sequence, resizes the container and runs a
    /// windowing pass.
    pub fn set_items(&self, items: impl IntoIterator<Item = T>) {
        let items: Vec<T> = items.into_iter().collect();
        {
            let Ok(mut state) = self.shared.state.try_borrow_mut() else {
                log::error!("set_items called from inside a windowing pass; ignored");
                return;
            };
            if state.torn_down {
                log::debug!("set_items after teardown; ignored");
                return;
            }
            warn_duplicate_ids(&items);
            state.items = items;
        }
        self.shared.update_container();
        self.shared.update_visible_items();
    }

    /// Drops every child of the container and rebuilds the window from
    /// scratch, re-running the render callback for every visible item.
    pub fn refresh(&self) {
        self.shared.refresh();
    }

    /// Runs a windowing pass now, bypassing the throttles.
    pub fn update_visible_items(&self) {
        self.shared.update_visible_items();
    }

    /// Unregisters listeners, cancels pending throttle timers, stops
    /// watching and removes every rendered element. Runs on drop as well.
    pub fn teardown(&self) {
        self.shared.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.read(|s| s.torn_down).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.read(|s| s.items.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Window computed by the last completed pass.
    pub fn visible_range(&self) -> WindowRange {
        self.read(|s| s.range).unwrap_or_default()
    }

    /// Indexes that currently have an element, ascending.
    pub fn rendered_indices(&self) -> Vec<usize> {
        let mut indices = self
            .read(|s| s.registry.values().map(|r| r.index).collect::<Vec<_>>())
            .unwrap_or_default();
        indices.sort_unstable();
        indices
    }

    /// Ids that currently have an element, in index order.
    pub fn rendered_ids(&self) -> Vec<T::Id> {
        let mut pairs = self
            .read(|s| {
                s.registry
                    .iter()
                    .map(|(id, r)| (r.index, id.clone()))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        pairs.sort_unstable_by_key(|(index, _)| *index);
        pairs.into_iter().map(|(_, id)| id).collect()
    }

    pub fn element_for(&self, id: &T::Id) -> Option<Node> {
        self.read(|s| s.registry.get(id).map(|r| r.element.clone()))
            .flatten()
    }

    /// Rendered elements still waiting for their deferred content.
    pub fn pending_lazy_loads(&self) -> usize {
        self.shared
            .watcher
            .as_ref()
            .and_then(|w| w.try_borrow().ok().map(|w| w.observed_count()))
            .unwrap_or(0)
    }

    pub fn config(&self) -> &ListConfig {
        &self.shared.config
    }

    pub fn stats(&self) -> ListStats {
        self.shared.stats.get()
    }

    fn read<R>(&self, f: impl FnOnce(&ListState<T>) -> R) -> Option<R> {
        self.shared.state.try_borrow().ok().map(|s| f(&s))
    }
}

impl<T: ListItem + 'static> Drop for WindowedList<T> {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl<T: ListItem + 'static> std::fmt::Debug for WindowedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedList")
            .field("len", &self.len())
            .field("visible_range", &self.visible_range())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<T: ListItem + 'static> Shared<T> {
    fn handle_viewport_event(&self, event: ViewportEvent) {
        if self.clamping.get() {
            return;
        }
        let throttle = match event {
            ViewportEvent::Scroll => &self.scroll_throttle,
            ViewportEvent::Resize => &self.resize_throttle,
        };
        if throttle.try_acquire() {
            self.update_visible_items();
        } else {
            log::trace!("{event:?} throttled");
            self.bump(|s| s.throttled += 1);
            // Visibility is not rate limited, only the windowing pass is.
            self.sync_intersections();
        }
    }

    /// Sizes the container to the whole list and pulls the viewport back
    /// inside it if the list shrank.
    fn update_container(&self) {
        let Some(container) = self.container.upgrade() else {
            return;
        };
        let total = {
            let Ok(state) = self.state.try_borrow() else {
                return;
            };
            state.items.len() as f32 * self.config.item_height
        };
        container.update_style(|s| s.height = Some(total));

        if let Some(viewport) = self.viewport.upgrade().filter(ScrollViewport::is_mounted) {
            self.clamping.set(true);
            viewport.clamp_to_content();
            self.clamping.set(false);
        }
    }

    /// Promotes deferred content of watched elements that reached the
    /// margin, outside of a windowing pass.
    fn sync_intersections(&self) {
        if self.watcher.is_none() {
            return;
        }
        let Some(viewport) = self.viewport.upgrade().filter(ScrollViewport::is_mounted) else {
            return;
        };
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        if state.torn_down {
            return;
        }
        let promoted = self.promote_intersecting(&viewport, &mut state.promoted);
        if promoted > 0 {
            log::trace!("{promoted} promoted between passes");
            self.bump(|s| s.promoted += promoted);
        }
    }

    fn promote_intersecting(&self, viewport: &ScrollViewport, done: &mut HashSet<NodeId>) -> u64 {
        let Some(watcher) = &self.watcher else {
            return 0;
        };
        let mut watcher = watcher.borrow_mut();
        let mut promoted = 0;
        for entry in watcher.take_records(viewport.visible_rect()) {
            if !entry.is_intersecting {
                continue;
            }
            watcher.unobserve(&entry.target);
            if done.insert(entry.target.id()) && promote_deferred(&entry.target) > 0 {
                promoted += 1;
            }
        }
        promoted
    }

    fn update_visible_items(&self) {
        let Some(container) = self.container.upgrade() else {
            log::debug!("update_visible_items: container is gone; skipping");
            return;
        };
        let Some(viewport) = self.viewport.upgrade().filter(ScrollViewport::is_mounted) else {
            log::debug!("update_visible_items: viewport is gone or unmounted; skipping");
            return;
        };
        let Ok(mut guard) = self.state.try_borrow_mut() else {
            log::error!("update_visible_items re-entered from the render callback; ignored");
            return;
        };
        if guard.torn_down {
            return;
        }
        let state = &mut *guard;

        let scroll = viewport.scroll_offset();
        let range = WindowRange::compute(
            state.items.len(),
            self.config.item_height,
            self.config.buffer_size,
            scroll,
            viewport.viewport_height(),
        );

        let mut next_visible = HashSet::with_capacity(range.len());
        let mut rendered = 0;
        let mut promoted = 0;

        for index in range.as_range() {
            let item = &state.items[index];
            let id = item.id();
            // Duplicate ids: the first occurrence in the window wins.
            if !next_visible.insert(id.clone()) {
                continue;
            }

            if let Some(entry) = state.registry.get_mut(&id) {
                if entry.index != index {
                    self.place(&entry.element, index);
                    entry.index = index;
                }
                continue;
            }

            let element = (self.render)(item);
            self.place(&element, index);
            if let Err(err) = container.append_child(&element) {
                log::warn!("could not attach element for item {id:?}: {err}");
                next_visible.remove(&id);
                continue;
            }
            match &self.watcher {
                Some(watcher) => watcher.borrow_mut().observe(&element),
                None => {
                    if promote_deferred(&element) > 0 {
                        promoted += 1;
                    }
                }
            }
            state.registry.insert(id, Rendered { element, index });
            rendered += 1;
        }

        let mut removed = 0;
        state.registry.retain(|id, entry| {
            if next_visible.contains(id) {
                return true;
            }
            entry.element.remove();
            if let Some(watcher) = &self.watcher {
                watcher.borrow_mut().unobserve(&entry.element);
            }
            state.promoted.remove(&entry.element.id());
            removed += 1;
            false
        });

        state.visible = next_visible;
        state.range = range;

        promoted += self.promote_intersecting(&viewport, &mut state.promoted);

        log::trace!(
            "window {}..{} at scroll {scroll}: +{rendered} -{removed}, {promoted} promoted",
            range.start,
            range.end
        );
        self.bump(|s| {
            s.passes += 1;
            s.rendered += rendered;
            s.removed += removed;
            s.promoted += promoted;
        });
    }

    fn place(&self, element: &Node, index: usize) {
        let h = self.config.item_height;
        let top = index as f32 * h;
        element.update_style(|s| {
            s.position_type = Some(PositionType::Absolute);
            s.offset_top = Some(top);
            s.fill_max_w = true;
            s.height.get_or_insert(h);
        });
        element.set_attr(INDEX_ATTR, index.to_string());
    }

    fn refresh(&self) {
        {
            let Ok(mut state) = self.state.try_borrow_mut() else {
                log::error!("refresh called from inside a windowing pass; ignored");
                return;
            };
            if state.torn_down {
                return;
            }
            match self.container.upgrade() {
                Some(container) => container.clear_children(),
                None => state.registry.values().for_each(|r| {
                    r.element.remove();
                }),
            }
            let cleared = state.registry.len() as u64;
            state.registry.clear();
            state.visible.clear();
            state.promoted.clear();
            state.range = WindowRange::default();
            if let Some(watcher) = &self.watcher {
                watcher.borrow_mut().disconnect();
            }
            self.bump(|s| s.removed += cleared);
        }
        self.update_container();
        self.update_visible_items();
    }

    fn teardown(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in listeners {
            listener.run();
        }
        self.scroll_throttle.cancel();
        self.resize_throttle.cancel();
        if let Some(watcher) = &self.watcher {
            watcher.borrow_mut().disconnect();
        }

        let Ok(mut state) = self.state.try_borrow_mut() else {
            log::error!("teardown called from inside a windowing pass; deferred to drop");
            return;
        };
        if state.torn_down {
            return;
        }
        let removed = state.registry.len() as u64;
        for (_, entry) in state.registry.drain() {
            entry.element.remove();
        }
        state.visible.clear();
        state.promoted.clear();
        state.range = WindowRange::default();
        state.torn_down = true;
        self.bump(|s| s.removed += removed);
        log::debug!("windowed list torn down ({removed} elements released)");
    }

    fn bump(&self, f: impl FnOnce(&mut ListStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

fn warn_duplicate_ids<T: ListItem>(items: &[T]) {
    let mut seen = HashSet::with_capacity(items.len());
    let mut dups = 0usize;
    let mut first = None;
    for item in items {
        let id = item.id();
        if !seen.insert(id.clone()) {
            dups += 1;
            first.get_or_insert(id);
        }
    }
    if let Some(id) = first {
        log::warn!(
            "set_items: {dups} duplicate id(s), first {id:?}; only the first occurrence in the window is rendered"
        );
    }
}
